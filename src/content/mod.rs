//! Content module - loads blog posts and renders their markdown

mod document;
mod frontmatter;
mod markdown;
mod repository;

pub use document::{read_time, word_count, Document, WORDS_PER_MINUTE};
pub use frontmatter::{parse_date_string, FrontMatter, FrontMatterError};
pub use markdown::MarkdownRenderer;
pub use repository::ContentRepository;
