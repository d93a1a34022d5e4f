//! Directory reader: turns every file in a directory into a text document

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Formats the reader knows how to extract text from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Docx,
    Html,
    Csv,
    Markdown,
    Text,
}

impl FileType {
    /// Detect file type from extension; unknown extensions are read as text
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "docx" => FileType::Docx,
            "html" | "htm" => FileType::Html,
            "csv" => FileType::Csv,
            "md" | "markdown" => FileType::Markdown,
            _ => FileType::Text,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::Text)
    }
}

/// A document extracted from one file
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// File name inside the source directory
    pub filename: String,
    pub file_type: FileType,
    /// Extracted text
    pub content: String,
    /// SHA-256 of the extracted text
    pub content_hash: String,
}

/// Reads the files directly inside a directory (non-recursive)
pub struct DirectoryReader {
    dir: PathBuf,
}

impl DirectoryReader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load every visible regular file, sorted by name
    pub fn load_data(&self) -> Result<Vec<LoadedDocument>> {
        let mut documents = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let filename = entry.file_name().to_string_lossy().to_string();
            if filename.starts_with('.') {
                continue;
            }

            let data = std::fs::read(entry.path())?;
            let file_type = FileType::from_path(entry.path());
            tracing::debug!("Reading {} ({:?}, {} bytes)", filename, file_type, data.len());

            let content = extract_text(&filename, &file_type, &data)?;
            documents.push(LoadedDocument {
                content_hash: hash_content(&content),
                filename,
                file_type,
                content,
            });
        }

        if documents.is_empty() {
            return Err(Error::EmptyDirectory(self.dir.display().to_string()));
        }

        tracing::info!("Loaded {} documents from {}", documents.len(), self.dir.display());
        Ok(documents)
    }
}

/// Extract plain text from file bytes
pub fn extract_text(filename: &str, file_type: &FileType, data: &[u8]) -> Result<String> {
    match file_type {
        FileType::Pdf => parse_pdf(filename, data),
        FileType::Docx => parse_docx(filename, data),
        FileType::Html => Ok(parse_html(data)),
        FileType::Csv => Ok(parse_csv(data)),
        FileType::Markdown | FileType::Text => Ok(String::from_utf8_lossy(data).to_string()),
    }
}

fn parse_pdf(filename: &str, data: &[u8]) -> Result<String> {
    let content = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| Error::file_parse(filename, e.to_string()))?;

    Ok(content
        .replace('\0', "")
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
}

fn parse_docx(filename: &str, data: &[u8]) -> Result<String> {
    let doc = docx_rs::read_docx(data).map_err(|e| Error::file_parse(filename, e.to_string()))?;

    let mut content = String::new();
    for child in doc.document.children {
        if let docx_rs::DocumentChild::Paragraph(p) = child {
            for child in p.children {
                if let docx_rs::ParagraphChild::Run(run) = child {
                    for child in run.children {
                        if let docx_rs::RunChild::Text(t) = child {
                            content.push_str(&t.text);
                        }
                    }
                }
            }
            content.push('\n');
        }
    }

    Ok(content)
}

fn parse_html(data: &[u8]) -> String {
    let html = String::from_utf8_lossy(data);
    let document = scraper::Html::parse_document(&html);

    let mut content = String::new();
    for text in document.root_element().text() {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            if !content.is_empty() {
                content.push(' ');
            }
            content.push_str(trimmed);
        }
    }

    content
}

fn parse_csv(data: &[u8]) -> String {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut content = String::new();
    for record in reader.records().flatten() {
        content.push_str(&record.iter().collect::<Vec<_>>().join(", "));
        content.push('\n');
    }

    content
}

/// Hex-encoded SHA-256 of `content`
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
