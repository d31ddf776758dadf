//! Content repository - loads blog posts from the content directory

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{Document, MarkdownRenderer};
use crate::config::{ContentConfig, SiteConfig};
use crate::error::{Error, Result};
use crate::Folio;

/// Read-only view over a directory of markdown documents.
///
/// Nothing is cached: every call reads what is on disk now.
pub struct ContentRepository {
    content_dir: PathBuf,
    config: ContentConfig,
    renderer: MarkdownRenderer,
}

impl ContentRepository {
    /// Create a repository over `content_dir`
    pub fn new<P: Into<PathBuf>>(content_dir: P, config: &SiteConfig) -> Self {
        Self {
            content_dir: content_dir.into(),
            config: config.content.clone(),
            renderer: MarkdownRenderer::with_config(config.markdown.clone()),
        }
    }

    /// Create a repository for a site's configured content directory
    pub fn from_site(folio: &Folio) -> Self {
        Self::new(folio.content_dir.clone(), &folio.config)
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    /// Load every document, newest first.
    ///
    /// Bodies are not rendered. A malformed document fails the whole listing
    /// unless `skip_malformed` is set.
    pub fn list_all(&self) -> Result<Vec<Document>> {
        let meta = fs::metadata(&self.content_dir)
            .map_err(|e| Error::unavailable(&self.content_dir, e))?;
        if !meta.is_dir() {
            return Err(Error::unavailable(
                &self.content_dir,
                io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
            ));
        }

        let mut documents = Vec::new();
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        for entry in WalkDir::new(&self.content_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(self.content_dir.as_path()).to_path_buf();
                Error::unavailable(path, io::Error::from(e))
            })?;

            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(id) = self.document_id(path) else {
                continue;
            };

            if let Some(previous) = seen.insert(id.to_string(), path.to_path_buf()) {
                tracing::error!("{:?} and {:?} share the id {}", previous, path, id);
                return Err(Error::DuplicateId { id: id.to_string() });
            }

            match self.load(id, path) {
                Ok(doc) => {
                    tracing::debug!("Loaded {} ({} min read)", doc.id, doc.read_time);
                    documents.push(doc);
                }
                Err(e @ Error::MalformedDocument { .. }) if self.config.skip_malformed => {
                    tracing::warn!("Skipping document: {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        // Sort by date descending (newest first); ties keep file-name order
        documents.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        tracing::info!(
            "Loaded {} documents from {:?}",
            documents.len(),
            self.content_dir
        );
        Ok(documents)
    }

    /// Look up one document by id.
    ///
    /// Returns `Ok(None)` when no file matches; ids that could escape the
    /// content directory never match.
    pub fn get_by_id(&self, id: &str) -> Result<Option<Document>> {
        if !is_valid_id(id) {
            tracing::debug!("Rejected document id {:?}", id);
            return Ok(None);
        }

        let mut found: Option<Document> = None;
        for ext in &self.config.extensions {
            let path = self.content_dir.join(format!("{}.{}", id, ext));
            match fs::metadata(&path) {
                Ok(meta) if meta.is_file() => {}
                // directories and other non-files are never listed either
                Ok(_) => continue,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(Error::unavailable(path, e)),
            }

            if found.is_some() {
                return Err(Error::DuplicateId { id: id.to_string() });
            }
            found = Some(self.load(id, &path)?);
        }

        Ok(found)
    }

    /// Render markdown to HTML with the configured options
    pub fn render_body(&self, raw_body: &str) -> Result<String> {
        self.renderer.render(raw_body)
    }

    /// Documents carrying `tag` (exact, case-sensitive), newest first
    pub fn list_by_tag(&self, tag: &str) -> Result<Vec<Document>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|doc| doc.has_tag(tag))
            .collect())
    }

    /// Every tag in use, deduplicated and sorted alphabetically
    pub fn list_all_tags(&self) -> Result<Vec<String>> {
        let tags: BTreeSet<String> = self
            .list_all()?
            .into_iter()
            .flat_map(|doc| doc.tags)
            .collect();
        Ok(tags.into_iter().collect())
    }

    /// Number of documents per tag, sorted by tag
    pub fn tag_counts(&self) -> Result<BTreeMap<String, usize>> {
        let mut counts = BTreeMap::new();
        for doc in self.list_all()? {
            for tag in doc.tags {
                *counts.entry(tag).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    fn load(&self, id: &str, path: &Path) -> Result<Document> {
        let content = read_document(path)?;
        Document::parse(id, path, &content, self.config.words_per_minute)
    }

    /// File stem of `path` if it is a visible file with a recognized extension
    fn document_id<'p>(&self, path: &'p Path) -> Option<&'p str> {
        let ext = path.extension().and_then(|e| e.to_str())?;
        if !self.config.extensions.iter().any(|known| known == ext) {
            return None;
        }
        let stem = path.file_stem().and_then(|s| s.to_str())?;
        if stem.is_empty() || stem.starts_with('.') {
            return None;
        }
        Some(stem)
    }
}

/// Read a document file; undecodable bytes are bad content, not an I/O failure
fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::InvalidData => Error::malformed(path, "not valid UTF-8"),
        _ => Error::unavailable(path, e),
    })
}

/// Ids are bare file stems: no separators, not hidden
fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.starts_with('.') && !id.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn post(title: &str, date: &str, tags: &[&str], body: &str) -> String {
        format!(
            "---\ntitle: {}\ndate: {}\ntags: [{}]\n---\n\n{}\n",
            title,
            date,
            tags.join(", "),
            body
        )
    }

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    fn fixture() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir,
            "nextjs-portfolio.md",
            &post(
                "Building with Next.js",
                "2024-01-05",
                &["Next.js", "React"],
                "Intro.",
            ),
        );
        write(
            &dir,
            "css-tricks.md",
            &post(
                "CSS Tricks",
                "2024-01-15",
                &["CSS", "Design"],
                "# Title\n\nHello **world**.",
            ),
        );
        write(
            &dir,
            "typescript-tips.md",
            &post("TypeScript Tips", "2024-01-10", &["TypeScript"], "Types."),
        );
        write(&dir, "notes.txt", "not a post");
        write(&dir, ".draft.md", "---\n---\n");
        fs::create_dir(dir.path().join("assets.md")).unwrap();
        dir
    }

    fn repo(dir: &TempDir) -> ContentRepository {
        ContentRepository::new(dir.path(), &SiteConfig::default())
    }

    #[test]
    fn test_list_all_sorted_by_date_descending() {
        let dir = fixture();
        let docs = repo(&dir).list_all().unwrap();
        let dates: Vec<&str> = docs.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-15", "2024-01-10", "2024-01-05"]);
        assert!(docs.iter().all(|d| d.rendered_body.is_none()));
    }

    #[test]
    fn test_list_all_ties_keep_file_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "b.md", &post("B", "2024-02-01", &[], ""));
        write(&dir, "a.md", &post("A", "2024-02-01", &[], ""));
        write(&dir, "c.md", &post("C", "2024-03-01", &[], ""));

        let ids: Vec<String> = repo(&dir).list_all().unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_list_all_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let repo = ContentRepository::new(dir.path().join("nope"), &SiteConfig::default());
        assert!(matches!(
            repo.list_all(),
            Err(Error::RepositoryUnavailable { .. })
        ));
    }

    #[test]
    fn test_list_all_fails_on_malformed_document() {
        let dir = fixture();
        write(&dir, "broken.md", "---\ntitle: Missing date\n---\nbody");

        match repo(&dir).list_all() {
            Err(Error::MalformedDocument { path, .. }) => {
                assert!(path.ends_with("broken.md"));
            }
            other => panic!("expected malformed document, got {other:?}"),
        }
    }

    #[test]
    fn test_list_all_can_skip_malformed_documents() {
        let dir = fixture();
        write(&dir, "broken.md", "no front-matter at all");

        let mut config = SiteConfig::default();
        config.content.skip_malformed = true;
        let docs = ContentRepository::new(dir.path(), &config).list_all().unwrap();
        assert_eq!(docs.len(), 3);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let dir = fixture();
        write(&dir, "css-tricks.markdown", &post("Again", "2024-01-01", &[], ""));

        let repo = repo(&dir);
        assert!(matches!(
            repo.list_all(),
            Err(Error::DuplicateId { id }) if id == "css-tricks"
        ));
        assert!(matches!(
            repo.get_by_id("css-tricks"),
            Err(Error::DuplicateId { .. })
        ));
    }

    #[test]
    fn test_get_by_id() {
        let dir = fixture();
        let doc = repo(&dir).get_by_id("css-tricks").unwrap().unwrap();
        assert_eq!(doc.title, "CSS Tricks");
        assert_eq!(doc.tags, vec!["CSS", "Design"]);
        assert_eq!(doc.read_time, 1);
        assert!(doc.rendered_body.is_none());
    }

    #[test]
    fn test_get_by_id_markdown_extension() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "long-form.markdown", &post("Long", "2023-12-01", &[], "x"));
        let doc = repo(&dir).get_by_id("long-form").unwrap().unwrap();
        assert_eq!(doc.title, "Long");
    }

    #[test]
    fn test_get_by_id_not_found() {
        let dir = fixture();
        let repo = repo(&dir);
        assert!(repo.get_by_id("missing-slug").unwrap().is_none());
        assert!(repo.get_by_id("").unwrap().is_none());
        assert!(repo.get_by_id("../etc/passwd").unwrap().is_none());
        assert!(repo.get_by_id(".draft").unwrap().is_none());
        assert!(repo.get_by_id("notes").unwrap().is_none());
        assert!(repo.get_by_id("assets").unwrap().is_none());
    }

    #[test]
    fn test_every_listed_id_resolves() {
        let dir = fixture();
        write(&dir, "v1..2-notes.md", &post("Release notes", "2024-02-02", &[], ""));
        write(&dir, "2024.recap.md", &post("Recap", "2024-12-31", &[], ""));
        let repo = repo(&dir);

        let docs = repo.list_all().unwrap();
        assert_eq!(docs.len(), 5);
        for doc in docs {
            let found = repo.get_by_id(&doc.id).unwrap();
            assert_eq!(found.map(|d| d.title), Some(doc.title), "{}", doc.id);
        }
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let dir = fixture();
        fs::write(dir.path().join("bad.md"), b"---\ntitle: \xff\xfe\n---\n").unwrap();

        let repo = repo(&dir);
        assert!(matches!(
            repo.list_all(),
            Err(Error::MalformedDocument { reason, .. }) if reason == "not valid UTF-8"
        ));
        assert!(matches!(
            repo.get_by_id("bad"),
            Err(Error::MalformedDocument { .. })
        ));

        let mut config = SiteConfig::default();
        config.content.skip_malformed = true;
        let docs = ContentRepository::new(dir.path(), &config).list_all().unwrap();
        assert_eq!(docs.len(), 3);
    }

    #[test]
    fn test_get_by_id_malformed() {
        let dir = fixture();
        write(&dir, "broken.md", "---\ntitle: T\ndate: someday\n---\n");
        assert!(matches!(
            repo(&dir).get_by_id("broken"),
            Err(Error::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_title_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir,
            "quoted.md",
            "---\ntitle: \"Why I ♥ Rust: a *love* letter\"\ndate: 2024-05-01\n---\nbody",
        );
        let doc = repo(&dir).get_by_id("quoted").unwrap().unwrap();
        assert_eq!(doc.title, "Why I ♥ Rust: a *love* letter");
    }

    #[test]
    fn test_list_by_tag() {
        let dir = fixture();
        let repo = repo(&dir);

        let css = repo.list_by_tag("CSS").unwrap();
        assert_eq!(css.len(), 1);
        assert_eq!(css[0].id, "css-tricks");

        assert!(repo.list_by_tag("css").unwrap().is_empty());
        assert!(repo.list_by_tag("nonexistent-tag").unwrap().is_empty());
    }

    #[test]
    fn test_list_by_tag_keeps_order() {
        let dir = fixture();
        write(&dir, "react-hooks.md", &post("Hooks", "2024-02-01", &["React"], ""));

        let ids: Vec<String> = repo(&dir)
            .list_by_tag("React")
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["react-hooks", "nextjs-portfolio"]);
    }

    #[test]
    fn test_list_all_tags() {
        let dir = fixture();
        write(&dir, "more-css.md", &post("More", "2023-01-01", &["CSS"], ""));
        let repo = repo(&dir);

        let tags = repo.list_all_tags().unwrap();
        assert_eq!(tags, vec!["CSS", "Design", "Next.js", "React", "TypeScript"]);
        assert_eq!(repo.list_all_tags().unwrap(), tags);

        let counts = repo.tag_counts().unwrap();
        assert_eq!(counts["CSS"], 2);
        assert_eq!(counts["React"], 1);
    }

    #[test]
    fn test_render_body() {
        let dir = fixture();
        let repo = repo(&dir);
        let mut doc = repo.get_by_id("css-tricks").unwrap().unwrap();

        let html = repo.render_body(&doc.raw_body).unwrap();
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>world</strong>"));
        assert_eq!(doc.render(repo.renderer()).unwrap(), html);
    }

    #[test]
    fn test_reads_current_disk_state() {
        let dir = fixture();
        let repo = repo(&dir);
        assert_eq!(repo.list_all().unwrap().len(), 3);

        fs::remove_file(dir.path().join("typescript-tips.md")).unwrap();
        assert_eq!(repo.list_all().unwrap().len(), 2);
        assert!(repo.get_by_id("typescript-tips").unwrap().is_none());
    }

    #[test]
    fn test_is_valid_id() {
        assert!(is_valid_id("hello-world"));
        assert!(is_valid_id("2024.recap"));
        assert!(is_valid_id("v1..2-notes"));
        assert!(!is_valid_id("a/b"));
        assert!(!is_valid_id("a\\b"));
        assert!(!is_valid_id(".."));
        assert!(!is_valid_id("."));
        assert!(!is_valid_id("../etc/passwd"));
        assert!(!is_valid_id(""));
    }
}
