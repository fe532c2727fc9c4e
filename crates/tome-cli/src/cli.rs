//! Command-line argument definitions for the `tome` binary.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Tome: a catalog manager for e-book libraries.
#[derive(Parser, Debug)]
#[command(name = "tome", about = "Manage a catalog of EPUB and PDF books", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Library directory (created on first use)
    #[arg(short, long, global = true, default_value = ".")]
    pub library: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize the library directory
    Init,
    /// Add a book from a payload file plus metadata flags
    Add(AddArgs),
    /// Load the bundled demo catalog
    Seed,
    /// List books page by page
    List(ListArgs),
    /// Search one metadata field, optionally narrowed to a file type
    Search(SearchArgs),
    /// Show every stored field of one book
    Show(ShowArgs),
    /// Set a scalar field on a book
    Set(SetArgs),
    /// Append values to a list field
    Push(PushArgs),
    /// Remove one value from a list field
    Pull(PullArgs),
    /// Delete a book and its stored file
    Remove(RemoveArgs),
    /// Copy a book's file out of the library
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Path to the .epub or .pdf payload
    pub file: PathBuf,

    /// Book title
    #[arg(short, long)]
    pub title: String,

    /// Author, either a plain name or JSON like {"name":"..","pseudonym":".."}
    #[arg(short, long = "author")]
    pub authors: Vec<String>,

    /// Language the book is written in
    #[arg(short = 'L', long)]
    pub language: String,

    /// ISBN, or "N/A" when unknown
    #[arg(short, long)]
    pub isbn: String,

    /// Publication date (YYYY-MM-DD)
    #[arg(short, long)]
    pub published: NaiveDate,

    /// Genre (repeatable)
    #[arg(short, long = "genre")]
    pub genres: Vec<String>,

    /// Sub-genre (repeatable)
    #[arg(short = 'G', long = "sub-genre")]
    pub sub_genres: Vec<String>,

    /// Main character (repeatable)
    #[arg(short = 'c', long = "character")]
    pub characters: Vec<String>,

    /// Year the story is set in
    #[arg(long)]
    pub set_year: Option<String>,

    /// Main location the story is set in
    #[arg(long)]
    pub location: Option<String>,

    /// Copyright notice
    #[arg(long)]
    pub copyright: Option<String>,

    /// Store the payload under this name instead of the source file's name
    #[arg(long)]
    pub file_name: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Page number, starting at 1
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Books per page (defaults to the library config)
    #[arg(short = 's', long)]
    pub page_size: Option<usize>,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Field to search (title, author, language, isbn, genre, sub-genre,
    /// character, set-year, location, file-name)
    pub field: String,

    /// Pattern to look for (substring, case-insensitive; set-year is exact)
    pub pattern: String,

    /// Only count books of this file type (epub or pdf)
    #[arg(short = 't', long = "type")]
    pub file_type: Option<String>,

    /// Page number, starting at 1
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Matches per page (defaults to the library config)
    #[arg(short = 's', long)]
    pub page_size: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Record ID (UUID)
    pub id: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Record ID (UUID)
    pub id: String,

    /// Field to set (title, language, isbn, published-date, authors,
    /// set-year, location, copyright)
    pub field: String,

    /// New value; authors take a JSON array
    pub value: Option<String>,

    /// Clear an optional field instead of setting it
    #[arg(long, conflicts_with = "value")]
    pub clear: bool,
}

#[derive(Args, Debug)]
pub struct PushArgs {
    /// Record ID (UUID)
    pub id: String,

    /// List field (genres, sub-genres, characters)
    pub field: String,

    /// Values to append
    #[arg(required = true)]
    pub values: Vec<String>,
}

#[derive(Args, Debug)]
pub struct PullArgs {
    /// Record ID (UUID)
    pub id: String,

    /// List field (genres, sub-genres, characters)
    pub field: String,

    /// Value to remove (exact match)
    pub value: String,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Record ID (UUID)
    pub id: String,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Record ID (UUID)
    pub id: String,

    /// Destination directory (defaults to the configured export dir)
    #[arg(short, long)]
    pub dest: Option<PathBuf>,
}
