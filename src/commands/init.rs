//! Initialize a new portfolio site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::CONFIG_FILE;

const CONFIG_TEMPLATE: &str = r#"# Portfolio configuration

# Site
title: Portfolio
author: ''

# Directory
content_dir: content/blog

# Content
content:
  words_per_minute: 200
  extensions: [md, markdown]
  skip_malformed: false

# Markdown
markdown:
  enable_tables: true
  highlight: true
  theme: base16-ocean.dark
  line_number: false

# Server
server:
  ip: localhost
  port: 4000
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{:?} already exists", config_path);
    }

    let config: SiteConfig = serde_yaml::from_str(CONFIG_TEMPLATE)?;
    let content_dir = target_dir.join(&config.content_dir);
    fs::create_dir_all(&content_dir)?;
    fs::write(&config_path, CONFIG_TEMPLATE)?;
    tracing::info!("Created {:?}", config_path);

    let sample_path = content_dir.join("hello-world.md");
    if !sample_path.exists() {
        let today = chrono::Local::now().format("%Y-%m-%d");
        let sample_post = format!(
            r#"---
title: Hello World
date: {}
excerpt: The first post on this site.
tags:
  - Meta
---

Welcome! Posts live in `{}` as markdown files with a front-matter block.

## Writing a post

```bash
$ folio new "My New Post" --tags Rust,Notes
```

## Serving posts

```bash
$ folio serve
```
"#,
            today, config.content_dir
        );
        fs::write(&sample_path, sample_post)?;
        tracing::info!("Created {:?}", sample_path);
    }

    Ok(())
}
