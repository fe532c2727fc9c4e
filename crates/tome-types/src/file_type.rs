use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Recognized document format of a stored book file.
///
/// Derived from the file-name extension, ASCII case-insensitively. Both
/// `.epub` and `.pdf` are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    Epub,
    Pdf,
}

impl FileType {
    /// Derive the file type from a file name's extension.
    pub fn from_file_name(file_name: &str) -> Result<Self, TypeError> {
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .ok_or_else(|| TypeError::UnrecognizedExtension(file_name.to_string()))?;
        match ext.as_str() {
            "epub" => Ok(Self::Epub),
            "pdf" => Ok(Self::Pdf),
            _ => Err(TypeError::UnrecognizedExtension(file_name.to_string())),
        }
    }

    /// The canonical lowercase extension, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Epub => "epub",
            Self::Pdf => "pdf",
        }
    }

    /// MIME content type recorded alongside stored payloads.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Epub => "application/epub+zip",
            Self::Pdf => "application/pdf",
        }
    }
}

impl FromStr for FileType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "epub" => Ok(Self::Epub),
            "pdf" => Ok(Self::Pdf),
            _ => Err(TypeError::UnknownFileType(s.to_string())),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Epub => write!(f, "EPUB"),
            Self::Pdf => write!(f, "PDF"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_from_extension() {
        assert_eq!(
            FileType::from_file_name("Frankenstein.epub").unwrap(),
            FileType::Epub
        );
        assert_eq!(
            FileType::from_file_name("manual.pdf").unwrap(),
            FileType::Pdf
        );
    }

    #[test]
    fn extension_is_case_insensitive() {
        assert_eq!(
            FileType::from_file_name("BOOK.EPUB").unwrap(),
            FileType::Epub
        );
        assert_eq!(FileType::from_file_name("Scan.PdF").unwrap(), FileType::Pdf);
    }

    #[test]
    fn last_extension_wins() {
        assert_eq!(
            FileType::from_file_name("archive.tar.pdf").unwrap(),
            FileType::Pdf
        );
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = FileType::from_file_name("notes.txt").unwrap_err();
        assert!(matches!(err, TypeError::UnrecognizedExtension(_)));
    }

    #[test]
    fn rejects_extensionless_name() {
        let err = FileType::from_file_name("README").unwrap_err();
        assert!(matches!(err, TypeError::UnrecognizedExtension(_)));
    }

    #[test]
    fn rejects_trailing_dot() {
        assert!(FileType::from_file_name("book.").is_err());
    }

    #[test]
    fn parses_label() {
        assert_eq!("epub".parse::<FileType>().unwrap(), FileType::Epub);
        assert_eq!("PDF".parse::<FileType>().unwrap(), FileType::Pdf);
        assert!(matches!(
            "mobi".parse::<FileType>().unwrap_err(),
            TypeError::UnknownFileType(_)
        ));
    }

    #[test]
    fn content_types() {
        assert_eq!(FileType::Epub.content_type(), "application/epub+zip");
        assert_eq!(FileType::Pdf.content_type(), "application/pdf");
    }

    #[test]
    fn display_matches_catalog_labels() {
        assert_eq!(format!("{}", FileType::Epub), "EPUB");
        assert_eq!(format!("{}", FileType::Pdf), "PDF");
    }
}
