//! List site content

use anyhow::Result;
use std::fmt::Write;

use crate::content::Document;
use crate::Folio;

/// List site content by type, optionally restricted to one tag
pub fn run(folio: &Folio, content_type: &str, tag: Option<&str>) -> Result<()> {
    print!("{}", render(folio, content_type, tag)?);
    Ok(())
}

/// Build the listing text printed by [`run`]
pub fn render(folio: &Folio, content_type: &str, tag: Option<&str>) -> Result<String> {
    let repo = folio.repository();
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            let posts = match tag {
                Some(tag) => repo.list_by_tag(tag)?,
                None => repo.list_all()?,
            };
            match tag {
                Some(tag) => writeln!(out, "Posts tagged {} ({}):", tag, posts.len())?,
                None => writeln!(out, "Posts ({}):", posts.len())?,
            }
            for post in &posts {
                writeln!(out, "  {}", summary_line(post))?;
            }
        }
        "tag" | "tags" => {
            let counts = repo.tag_counts()?;
            writeln!(out, "Tags ({}):", counts.len())?;
            for (tag, count) in counts {
                writeln!(out, "  {} ({})", tag, count)?;
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, tag", content_type);
        }
    }

    Ok(out)
}

fn summary_line(post: &Document) -> String {
    format!(
        "{} - {} [{}] ({} min read)",
        post.date, post.title, post.id, post.read_time
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;

    fn site() -> (tempfile::TempDir, Folio) {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::with_config(dir.path(), SiteConfig::default());
        fs::create_dir_all(&folio.content_dir).unwrap();
        fs::write(
            folio.content_dir.join("older.md"),
            "---\ntitle: Older\ndate: 2024-01-05\ntags: [CSS]\n---\nbody\n",
        )
        .unwrap();
        fs::write(
            folio.content_dir.join("newer.md"),
            "---\ntitle: Newer\ndate: 2024-01-15\ntags: [CSS, React]\n---\nbody\n",
        )
        .unwrap();
        (dir, folio)
    }

    #[test]
    fn test_list_posts() {
        let (_dir, folio) = site();
        let out = render(&folio, "post", None).unwrap();
        assert_eq!(
            out,
            "Posts (2):\n  2024-01-15 - Newer [newer] (1 min read)\n  2024-01-05 - Older [older] (1 min read)\n"
        );
    }

    #[test]
    fn test_list_posts_by_tag() {
        let (_dir, folio) = site();
        let out = render(&folio, "posts", Some("React")).unwrap();
        assert!(out.starts_with("Posts tagged React (1):"));
        assert!(out.contains("[newer]"));
        assert!(!out.contains("[older]"));
    }

    #[test]
    fn test_list_tags() {
        let (_dir, folio) = site();
        let out = render(&folio, "tags", None).unwrap();
        assert_eq!(out, "Tags (2):\n  CSS (2)\n  React (1)\n");
    }

    #[test]
    fn test_unknown_type() {
        let (_dir, folio) = site();
        assert!(render(&folio, "category", None).is_err());
    }
}
