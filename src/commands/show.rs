//! Print one rendered post

use anyhow::Result;

use crate::Folio;

/// Render the post `id` to HTML
pub fn render(folio: &Folio, id: &str) -> Result<String> {
    let repo = folio.repository();
    let Some(mut post) = repo.get_by_id(id)? else {
        anyhow::bail!("Post not found: {}", id);
    };
    Ok(post.render(repo.renderer())?.to_string())
}

/// Run the show command
pub fn run(folio: &Folio, id: &str) -> Result<()> {
    println!("{}", render(folio, id)?);
    Ok(())
}
