//! Document model

use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::{FrontMatter, MarkdownRenderer};
use crate::error::{Error, Result};

/// Default reading speed for the read-time estimate
pub const WORDS_PER_MINUTE: usize = 200;

/// A blog post loaded from the content directory
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// File stem, used as lookup key and URL segment
    pub id: String,

    pub title: String,

    /// Publication date as written in the front-matter
    pub date: String,

    /// Parsed publication date
    #[serde(skip)]
    pub timestamp: NaiveDateTime,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    pub tags: Vec<String>,

    /// Markdown body without the front-matter block
    #[serde(skip)]
    pub raw_body: String,

    /// Rendered HTML, filled on demand by [`Document::render`]
    #[serde(rename = "html", skip_serializing_if = "Option::is_none")]
    pub rendered_body: Option<String>,

    /// Estimated minutes to read, never below one
    pub read_time: usize,

    #[serde(skip)]
    pub source: PathBuf,
}

impl Document {
    /// Build a document from the contents of `path`
    pub fn parse(id: &str, path: &Path, content: &str, words_per_minute: usize) -> Result<Self> {
        let (fm, body) =
            FrontMatter::parse(content).map_err(|e| Error::malformed(path, e.to_string()))?;

        Ok(Self {
            id: id.to_string(),
            title: fm.title,
            date: fm.date,
            timestamp: fm.timestamp,
            excerpt: fm.excerpt,
            tags: fm.tags,
            read_time: read_time(body, words_per_minute),
            raw_body: body.to_string(),
            rendered_body: None,
            source: path.to_path_buf(),
        })
    }

    /// Render the body once and return the cached HTML
    pub fn render(&mut self, renderer: &MarkdownRenderer) -> Result<&str> {
        if self.rendered_body.is_none() {
            self.rendered_body = Some(renderer.render(&self.raw_body)?);
        }
        Ok(self.rendered_body.as_deref().unwrap_or_default())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Date in full format (like "January 15, 2024")
    pub fn display_date(&self) -> String {
        self.timestamp.format("%B %d, %Y").to_string()
    }
}

/// Whitespace-separated word count of `body`
pub fn word_count(body: &str) -> usize {
    body.split_whitespace().count()
}

/// Minutes to read `body`, rounded up, at least one
pub fn read_time(body: &str, words_per_minute: usize) -> usize {
    let words_per_minute = words_per_minute.max(1);
    word_count(body).div_ceil(words_per_minute).max(1)
}
