//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Why a front-matter block was rejected
#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("missing front-matter block")]
    Missing,

    #[error("front-matter block opened with {0} is never closed")]
    Unterminated(&'static str),

    #[error("invalid YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON front-matter: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("unrecognized date `{0}`")]
    InvalidDate(String),
}

/// Front-matter as written, before required fields are checked
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFrontMatter {
    title: Option<String>,
    date: Option<String>,
    excerpt: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    tags: Vec<String>,
}

/// Tags may be a single scalar or a list; repeats collapse to one
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a tag or a list of tags")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(vec![value.to_string()])
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(vec![value.to_string()])
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut tags: Vec<String> = Vec::new();
            while let Some(Tag(tag)) = seq.next_element::<Tag>()? {
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
            Ok(tags)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// One list element; numbers such as a year are kept as their text
struct Tag(String);

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TagVisitor;

        impl<'de> Visitor<'de> for TagVisitor {
            type Value = Tag;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a tag")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Tag, E> {
                Ok(Tag(value.to_string()))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Tag, E> {
                Ok(Tag(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Tag, E> {
                Ok(Tag(value.to_string()))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Tag, E> {
                Ok(Tag(value.to_string()))
            }
        }

        deserializer.deserialize_any(TagVisitor)
    }
}

/// Validated document metadata
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub title: String,
    /// Date exactly as written in the metadata block
    pub date: String,
    /// Parsed `date`, used for ordering
    pub timestamp: NaiveDateTime,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        let (raw, body) = if let Some((block, body)) = split_block(content, "---")? {
            let raw = if block.trim().is_empty() {
                RawFrontMatter::default()
            } else {
                serde_yaml::from_str::<RawFrontMatter>(block)?
            };
            (raw, body)
        } else if let Some((block, body)) = split_block(content, ";;;")? {
            let block = block.trim();
            let json = if block.starts_with('{') {
                block.to_string()
            } else {
                format!("{{{}}}", block)
            };
            (serde_json::from_str::<RawFrontMatter>(&json)?, body)
        } else {
            return Err(FrontMatterError::Missing);
        };

        Ok((raw.validate()?, body))
    }
}

impl RawFrontMatter {
    fn validate(self) -> Result<FrontMatter, FrontMatterError> {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or(FrontMatterError::MissingField("title"))?;
        let date = self
            .date
            .filter(|d| !d.trim().is_empty())
            .ok_or(FrontMatterError::MissingField("date"))?;
        let timestamp =
            parse_date_string(&date).ok_or_else(|| FrontMatterError::InvalidDate(date.clone()))?;

        Ok(FrontMatter {
            title,
            date,
            timestamp,
            excerpt: self.excerpt,
            tags: self.tags,
        })
    }
}

/// Split a block fenced by `fence` lines off the top of `content`.
///
/// Returns `None` when the first line is not the fence.
fn split_block<'a>(
    content: &'a str,
    fence: &'static str,
) -> Result<Option<(&'a str, &'a str)>, FrontMatterError> {
    let mut lines = content.split_inclusive('\n');
    let first = match lines.next() {
        Some(line) if line.trim_end() == fence => line,
        _ => return Ok(None),
    };

    let block_start = first.len();
    let mut offset = block_start;
    for line in lines {
        if line.trim_end() == fence {
            let block = &content[block_start..offset];
            let body = &content[offset + line.len()..];
            return Ok(Some((block, body.trim_start_matches(['\n', '\r']))));
        }
        offset += line.len();
    }

    Err(FrontMatterError::Unterminated(fence))
}

/// Parse a date string in various formats
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc())
}
