//! Command execution: each subcommand runs against a [`Library`] rooted at
//! the directory given by `--library`.

use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;

use tome_sdk::{
    Author, BookDraft, BookRecord, ByteSource, FieldUpdate, Library, ListField, Page, PageRequest,
    QueryFilter, RecordId, SearchField, TypeFacet,
};

use crate::cli::{
    AddArgs, Cli, Command, ExportArgs, ListArgs, PullArgs, PushArgs, RemoveArgs, SearchArgs,
    SetArgs, ShowArgs,
};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let library = Library::open(&cli.library)
        .with_context(|| format!("failed to open library at {}", cli.library.display()))?;

    match cli.command {
        Command::Init => cmd_init(&library, &cli.library),
        Command::Add(args) => cmd_add(&library, args),
        Command::Seed => cmd_seed(&library),
        Command::List(args) => cmd_list(&library, args),
        Command::Search(args) => cmd_search(&library, args),
        Command::Show(args) => cmd_show(&library, args),
        Command::Set(args) => cmd_set(&library, args),
        Command::Push(args) => cmd_push(&library, args),
        Command::Pull(args) => cmd_pull(&library, args),
        Command::Remove(args) => cmd_remove(&library, args),
        Command::Export(args) => cmd_export(&library, args),
    }
}

fn cmd_init(library: &Library, root: &Path) -> anyhow::Result<()> {
    library.initialize()?;
    println!(
        "{} Initialized library in {}",
        "✓".green().bold(),
        root.display().to_string().bold()
    );
    println!("  Books: {}", library.count()?.to_string().yellow());
    Ok(())
}

fn cmd_add(library: &Library, args: AddArgs) -> anyhow::Result<()> {
    let file_name = match args.file_name {
        Some(name) => name,
        None => args
            .file
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                anyhow::anyhow!("cannot derive a file name from {}", args.file.display())
            })?,
    };

    let mut draft = BookDraft::new(args.title, args.language, args.isbn, args.published, file_name);
    for raw in &args.authors {
        draft = draft.with_author(parse_author(raw)?);
    }
    draft = draft
        .with_genres(args.genres)
        .with_sub_genres(args.sub_genres)
        .with_main_characters(args.characters);
    if let Some(year) = args.set_year {
        draft = draft.with_set_year(year);
    }
    if let Some(location) = args.location {
        draft = draft.with_set_main_location(location);
    }
    if let Some(copyright) = args.copyright {
        draft = draft.with_copyright(copyright);
    }

    let source = ByteSource::from_path(&args.file)?;
    let record = library.add_book(draft, source)?;

    println!("{} Added {}", "✓".green().bold(), record.title.bold());
    println!("  ID: {}", record.id.to_string().yellow());
    println!(
        "  File: {} [{}]",
        record.file_name,
        record.file_type.to_string().cyan()
    );
    Ok(())
}

fn cmd_seed(library: &Library) -> anyhow::Result<()> {
    let records = library.seed()?;
    println!(
        "{} Seeded {} books",
        "✓".green().bold(),
        records.len().to_string().bold()
    );
    for record in &records {
        println!("  {}  {}", record.id.short_id().yellow(), record.title);
    }
    Ok(())
}

fn cmd_list(library: &Library, args: ListArgs) -> anyhow::Result<()> {
    let size = args
        .page_size
        .unwrap_or(library.config().default_page_size);
    let page = library.list(&PageRequest::new(args.page, size))?;
    render_page(&page, "book", "books");
    Ok(())
}

fn cmd_search(library: &Library, args: SearchArgs) -> anyhow::Result<()> {
    let field: SearchField = args.field.parse()?;
    let mut filter = QueryFilter::matching(field, args.pattern);
    if let Some(kind) = &args.file_type {
        filter = filter.with_facet(TypeFacet::Only(kind.parse()?));
    }

    let size = args
        .page_size
        .unwrap_or(library.config().default_page_size);
    let page = library.search(&filter, &PageRequest::new(args.page, size))?;
    render_page(&page, "match", "matches");
    Ok(())
}

fn cmd_show(library: &Library, args: ShowArgs) -> anyhow::Result<()> {
    let record = library.book(&parse_id(&args.id)?)?;
    render_record(&record);
    Ok(())
}

fn cmd_set(library: &Library, args: SetArgs) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let update = parse_field_update(&args.field, args.value, args.clear)?;
    let field = update.field_name();
    let record = library.set_field(&id, update)?;
    println!(
        "{} Updated {} on {}",
        "✓".green().bold(),
        field.cyan(),
        record.title.bold()
    );
    Ok(())
}

fn cmd_push(library: &Library, args: PushArgs) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let field: ListField = args.field.parse()?;
    let count = args.values.len();
    let record = library.push_list_values(&id, field, args.values)?;
    println!(
        "{} Appended {} value{} to {} on {}",
        "✓".green().bold(),
        count.to_string().bold(),
        if count == 1 { "" } else { "s" },
        field.field_name().cyan(),
        record.title.bold()
    );
    Ok(())
}

fn cmd_pull(library: &Library, args: PullArgs) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let field: ListField = args.field.parse()?;
    let record = library.pull_list_value(&id, field, &args.value)?;
    println!(
        "{} Removed {} from {} on {}",
        "✓".green().bold(),
        args.value.bold(),
        field.field_name().cyan(),
        record.title.bold()
    );
    Ok(())
}

fn cmd_remove(library: &Library, args: RemoveArgs) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    if library.remove_book(&id)? {
        println!("{} Removed {}", "✓".green().bold(), args.id.yellow());
    } else {
        println!("No book with ID {}", args.id.yellow());
    }
    Ok(())
}

fn cmd_export(library: &Library, args: ExportArgs) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let dest_dir = args
        .dest
        .unwrap_or_else(|| library.config().export_dir.clone());
    let path = library.export_file(&id, &dest_dir)?;
    println!(
        "{} Exported to {}",
        "✓".green().bold(),
        path.display().to_string().bold()
    );
    Ok(())
}

// ---- Argument parsing helpers ----

fn parse_id(raw: &str) -> anyhow::Result<RecordId> {
    raw.parse()
        .with_context(|| format!("'{raw}' is not a record ID"))
}

/// Accepts either a bare name or a JSON object with `name` and `pseudonym`.
fn parse_author(raw: &str) -> anyhow::Result<Author> {
    if raw.trim_start().starts_with('{') {
        serde_json::from_str(raw).with_context(|| format!("bad author JSON: {raw}"))
    } else {
        Ok(Author::new(raw))
    }
}

fn parse_field_update(
    field: &str,
    value: Option<String>,
    clear: bool,
) -> anyhow::Result<FieldUpdate> {
    let key = field.to_ascii_lowercase();

    if clear {
        return match key.as_str() {
            "set-year" | "set_year" | "year" => Ok(FieldUpdate::SetYear(None)),
            "location" | "set-main-location" | "set_main_location" => {
                Ok(FieldUpdate::SetMainLocation(None))
            }
            "copyright" => Ok(FieldUpdate::Copyright(None)),
            _ => bail!("field '{field}' cannot be cleared"),
        };
    }

    let value = value.ok_or_else(|| anyhow::anyhow!("field '{field}' needs a value"))?;
    match key.as_str() {
        "title" => Ok(FieldUpdate::Title(value)),
        "language" => Ok(FieldUpdate::Language(value)),
        "isbn" => Ok(FieldUpdate::Isbn(value)),
        "published-date" | "published_date" | "published" => Ok(FieldUpdate::PublishedDate(
            value
                .parse()
                .with_context(|| format!("'{value}' is not a date (expected YYYY-MM-DD)"))?,
        )),
        "authors" => Ok(FieldUpdate::Authors(
            serde_json::from_str(&value).with_context(|| format!("bad authors JSON: {value}"))?,
        )),
        "set-year" | "set_year" | "year" => Ok(FieldUpdate::SetYear(Some(value))),
        "location" | "set-main-location" | "set_main_location" => {
            Ok(FieldUpdate::SetMainLocation(Some(value)))
        }
        "copyright" => Ok(FieldUpdate::Copyright(Some(value))),
        _ => bail!(
            "unknown field '{field}' (expected title, language, isbn, published-date, \
             authors, set-year, location, or copyright)"
        ),
    }
}

// ---- Rendering ----

fn render_page(page: &Page<BookRecord>, singular: &str, plural: &str) {
    for record in &page.items {
        println!(
            "{}  {} {} [{}]",
            record.id.short_id().yellow(),
            record.title.bold(),
            format!("({})", record.author_line()).dimmed(),
            record.file_type.to_string().cyan()
        );
    }
    if page.is_empty() {
        println!("{}", "Nothing on this page.".dimmed());
    }
    println!(
        "page {} of {} ({} {})",
        page.page_number.to_string().bold(),
        page.total_pages().to_string().bold(),
        page.total_count,
        if page.total_count == 1 { singular } else { plural }
    );
}

fn render_record(record: &BookRecord) {
    println!("{}", record.title.bold());
    println!("  ID: {}", record.id.to_string().yellow());
    println!("  Authors: {}", record.author_line());
    println!("  Language: {}", record.language);
    println!("  Published: {}", record.published_date);
    println!("  ISBN: {}", record.isbn);
    if !record.genres.is_empty() {
        println!("  Genres: {}", record.genres.join(", "));
    }
    if !record.sub_genres.is_empty() {
        println!("  Sub-genres: {}", record.sub_genres.join(", "));
    }
    if !record.main_characters.is_empty() {
        println!("  Characters: {}", record.main_characters.join(", "));
    }
    if let Some(year) = &record.set_year {
        println!("  Set in: {year}");
    }
    if let Some(location) = &record.set_main_location {
        println!("  Location: {location}");
    }
    if let Some(copyright) = &record.copyright {
        println!("  Copyright: {copyright}");
    }
    println!(
        "  File: {} [{}]",
        record.file_name,
        record.file_type.to_string().cyan()
    );
}
