//! Create a new post

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::Folio;

#[derive(Serialize)]
struct Scaffold<'a> {
    title: &'a str,
    date: String,
    tags: &'a [String],
}

/// Create a new post file and return its path
pub fn create_post(
    folio: &Folio,
    title: &str,
    slug: Option<&str>,
    tags: &[String],
) -> Result<PathBuf> {
    let slug = match slug {
        Some(s) => slug::slugify(s),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let ext = folio
        .config
        .content
        .extensions
        .first()
        .map(String::as_str)
        .unwrap_or("md");

    fs::create_dir_all(&folio.content_dir)?;
    let file_path = folio.content_dir.join(format!("{}.{}", slug, ext));

    // Check if file already exists
    if folio.repository().get_by_id(&slug)?.is_some() || file_path.exists() {
        anyhow::bail!("Post already exists: {}", slug);
    }

    let scaffold = Scaffold {
        title,
        date: chrono::Local::now().format("%Y-%m-%d").to_string(),
        tags,
    };
    let front_matter = serde_yaml::to_string(&scaffold)?;
    fs::write(&file_path, format!("---\n{}---\n\n", front_matter))?;

    tracing::info!("Created {:?}", file_path);
    Ok(file_path)
}
