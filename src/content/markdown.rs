//! Markdown rendering with syntax highlighting
//!
//! Output is not sanitized. Raw HTML in a document passes straight through,
//! so only feed this renderer content written by the site owner.

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::MarkdownConfig;
use crate::error::{Error, Result};

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    config: MarkdownConfig,
}

impl MarkdownRenderer {
    /// Create a renderer with default settings
    pub fn new() -> Self {
        Self::with_config(MarkdownConfig::default())
    }

    /// Create with custom settings
    pub fn with_config(config: MarkdownConfig) -> Self {
        let (syntax_set, theme_set) = if config.highlight {
            (SyntaxSet::load_defaults_newlines(), ThemeSet::load_defaults())
        } else {
            (SyntaxSet::new(), ThemeSet::new())
        };
        Self {
            syntax_set,
            theme_set,
            config,
        }
    }

    pub fn config(&self) -> &MarkdownConfig {
        &self.config
    }

    fn options(&self) -> Options {
        if self.config.enable_tables {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_FOOTNOTES
        } else {
            Options::empty()
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        let parser = Parser::new_ext(markdown, self.options());

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<Option<String>> = None;
        let mut code = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|lang| lang.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some(lang);
                    code.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let lang = code_block.take().flatten();
                    let block = self.code_block(&code, lang.as_deref())?;
                    events.push(Event::Html(CowStr::from(block)));
                }
                Event::Text(text) if code_block.is_some() => code.push_str(&text),
                _ => events.push(event),
            }
        }

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    fn code_block(&self, code: &str, lang: Option<&str>) -> Result<String> {
        if !self.config.highlight {
            let class = lang
                .map(|l| format!(r#" class="language-{}""#, html_escape(l)))
                .unwrap_or_default();
            return Ok(format!(
                "<pre><code{}>{}</code></pre>\n",
                class,
                html_escape(code)
            ));
        }
        self.highlight_code(code, lang)
    }

    fn theme(&self) -> Result<&Theme> {
        self.theme_set
            .themes
            .get(&self.config.theme)
            .ok_or_else(|| {
                Error::RenderFailure(format!("unknown highlight theme `{}`", self.config.theme))
            })
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> Result<String> {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let highlighted = highlighted_html_for_string(code, &self.syntax_set, syntax, self.theme()?)
            .map_err(|e| Error::RenderFailure(format!("highlighting {} failed: {}", lang, e)))?;

        let lang = html_escape(lang);
        if self.config.line_number {
            Ok(add_line_numbers(&highlighted, &lang))
        } else {
            Ok(format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                lang, highlighted
            ))
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Add line numbers to highlighted code
fn add_line_numbers(code: &str, lang: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();

    let gutter = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    // syntect output already carries its own <pre>, so the code cell takes it as is
    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        lang,
        gutter,
        lines.join("\n")
    )
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
