use crate::error::{DocumentStoreError, Result};
use calamine::{open_workbook_auto, Reader as _};
use pulldown_cmark::{Event, Parser, TagEnd};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Extracts raw text content from one family of file formats
pub trait DocumentLoader: Send + Sync {
    /// Lower-case extensions (without the dot) this loader handles
    fn extensions(&self) -> &[&str];

    /// Read the file and return its text content
    fn load(&self, path: &Path) -> Result<String>;
}

/// Extension-keyed registry over the fixed set of supported formats
pub struct LoaderRegistry {
    loaders: HashMap<String, Arc<dyn DocumentLoader>>,
}

impl LoaderRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            loaders: HashMap::new(),
        }
    }

    /// Registry covering the supported set:
    /// txt, pdf, csv, xlsx/xls, md, html/htm
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(TextLoader);
        registry.register(PdfLoader);
        registry.register(CsvLoader);
        registry.register(SpreadsheetLoader);
        registry.register(MarkdownLoader);
        registry.register(HtmlLoader);
        registry
    }

    /// Register a loader for each of its extensions
    pub fn register<L: DocumentLoader + 'static>(&mut self, loader: L) {
        let loader = Arc::new(loader);
        for ext in loader.extensions() {
            self.loaders.insert((*ext).to_string(), loader.clone());
        }
    }

    /// Whether `ext` (without dot, any case) is supported
    #[must_use]
    pub fn supports(&self, ext: &str) -> bool {
        self.loaders.contains_key(&ext.to_ascii_lowercase())
    }

    /// Load text content from `path`, resolving the loader by extension.
    ///
    /// Anything outside the supported extension set is an
    /// [`DocumentStoreError::UnsupportedFileType`]; the file is not opened.
    pub fn load(&self, path: &Path) -> Result<String> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let loader = self
            .loaders
            .get(&ext)
            .ok_or_else(|| DocumentStoreError::UnsupportedFileType(format!(".{ext}")))?;

        log::debug!("Loading {:?} with .{ext} loader", path);
        loader.load(path)
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Plain text files
pub struct TextLoader;

impl DocumentLoader for TextLoader {
    fn extensions(&self) -> &[&str] {
        &["txt"]
    }

    fn load(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path)
            .map_err(|e| DocumentStoreError::load(path.display().to_string(), e.to_string()))
    }
}

/// PDF files, text layer only
pub struct PdfLoader;

impl DocumentLoader for PdfLoader {
    fn extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn load(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path)
            .map_err(|e| DocumentStoreError::load(path.display().to_string(), e.to_string()))?;
        pdf_extract::extract_text_from_mem(&bytes)
            .map_err(|e| DocumentStoreError::load(path.display().to_string(), e.to_string()))
    }
}

/// CSV files; each row becomes a block of `header: value` lines
pub struct CsvLoader;

impl DocumentLoader for CsvLoader {
    fn extensions(&self) -> &[&str] {
        &["csv"]
    }

    fn load(&self, path: &Path) -> Result<String> {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| DocumentStoreError::load(path.display().to_string(), e.to_string()))?;
        let headers = reader
            .headers()
            .map_err(|e| DocumentStoreError::load(path.display().to_string(), e.to_string()))?
            .clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| {
                DocumentStoreError::load(path.display().to_string(), e.to_string())
            })?;
            let lines: Vec<String> = headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| format!("{header}: {value}"))
                .collect();
            rows.push(lines.join("\n"));
        }
        Ok(rows.join("\n\n"))
    }
}

/// Excel workbooks; every sheet, rows as tab-joined cell text
pub struct SpreadsheetLoader;

impl DocumentLoader for SpreadsheetLoader {
    fn extensions(&self) -> &[&str] {
        &["xlsx", "xls"]
    }

    fn load(&self, path: &Path) -> Result<String> {
        let mut workbook = open_workbook_auto(path)
            .map_err(|e| DocumentStoreError::load(path.display().to_string(), e.to_string()))?;

        let mut sheets = Vec::new();
        let names = workbook.sheet_names().to_owned();
        for name in names {
            let range = workbook.worksheet_range(&name).map_err(|e| {
                DocumentStoreError::load(path.display().to_string(), e.to_string())
            })?;
            let mut lines = Vec::new();
            for row in range.rows() {
                let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
                lines.push(cells.join("\t"));
            }
            sheets.push(lines.join("\n"));
        }
        Ok(sheets.join("\n\n"))
    }
}

/// Markdown files, stripped to plain text
pub struct MarkdownLoader;

impl DocumentLoader for MarkdownLoader {
    fn extensions(&self) -> &[&str] {
        &["md"]
    }

    fn load(&self, path: &Path) -> Result<String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DocumentStoreError::load(path.display().to_string(), e.to_string()))?;

        let mut text = String::new();
        for event in Parser::new(&raw) {
            match event {
                Event::Text(t) => text.push_str(&t),
                Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak => text.push('\n'),
                Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item) => {
                    text.push_str("\n\n");
                }
                Event::End(TagEnd::CodeBlock) => text.push('\n'),
                _ => {}
            }
        }
        Ok(text.trim_end().to_string())
    }
}

/// HTML files; visible text only, script and style stripped
pub struct HtmlLoader;

impl DocumentLoader for HtmlLoader {
    fn extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn load(&self, path: &Path) -> Result<String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DocumentStoreError::load(path.display().to_string(), e.to_string()))?;
        let document = scraper::Html::parse_document(&raw);

        let mut text = String::new();
        for node in document.tree.nodes() {
            if let Some(fragment) = node.value().as_text() {
                let parent_tag = node
                    .parent()
                    .and_then(|p| p.value().as_element().map(|e| e.name().to_string()));
                if matches!(parent_tag.as_deref(), Some("script" | "style")) {
                    continue;
                }
                text.push_str(fragment);
            }
        }

        // Collapse the whitespace runs markup leaves behind
        let collapsed: Vec<&str> = text.split_whitespace().collect();
        Ok(collapsed.join(" "))
    }
}
