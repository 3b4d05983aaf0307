//! Talks: markdown sources that become a deck of slides.
//!
//! A talk starts with YAML front matter between two lines of dashes, followed
//! by markdown slides separated by lines containing only `+++`:
//!
//! ```text
//! ---
//! title: All you need is data and functions
//! author: Kayla
//! date: 2023.05.02
//! tags: gleam, types
//! cover:
//!   src: /images/gleam.png
//!   alt: A pink star
//! ---
//! # Hello
//! +++
//! # Goodbye
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use pulldown_cmark::{html, Options, Parser};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::document::{Document, Element};
use crate::error::{Chainable, Result};
use crate::util::slugify;

const SLIDE_SEPARATOR: &str = "+++";
const DATE_FORMAT: &str = "%Y.%m.%d";
const DATE_DISPLAY_FORMAT: &str = "%A, %B %-d, %Y";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TalkMetadata {
    pub title: String,
    pub author: String,
    #[serde(deserialize_with = "de::date", serialize_with = "ser::date_display")]
    pub date: NaiveDate,
    /// Rendered to HTML on load.
    #[serde(default, deserialize_with = "de::markdown_option")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "de::comma_separated")]
    pub tags: Vec<String>,
    /// Attributes of the cover image, such as `src` and `alt`.
    pub cover: Option<BTreeMap<String, String>>,
    pub accent_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Talk {
    pub metadata: TalkMetadata,
    /// The rendered HTML body of every slide, in order.
    pub slides: Vec<String>,
}

impl Talk {
    pub fn parse(source: &str) -> Result<Talk> {
        let is_delimiter = |line: &&str| line.len() >= 3 && line.bytes().all(|b| b == b'-');

        let mut lines = source.lines()
            .skip_while(|line| line.trim().is_empty())
            .peekable();

        if lines.next_if(is_delimiter).is_none() {
            return err!("talk is missing its front matter");
        }

        let mut closed = false;
        let front_matter = lines.by_ref()
            .take_while(|line| { closed = is_delimiter(line); !closed })
            .fold(String::new(), |acc, line| acc + line + "\n");

        if !closed {
            return err!("talk front matter is never closed");
        }

        let metadata: TalkMetadata = serde_yaml::from_str(&front_matter)
            .chain(error!("invalid talk front matter"))?;

        let mut slides = vec![];
        let mut slide = String::new();
        for line in lines {
            if line.trim_end() == SLIDE_SEPARATOR {
                slides.push(markdown_to_html(&std::mem::take(&mut slide)));
            } else {
                slide.push_str(line);
                slide.push('\n');
            }
        }

        slides.push(markdown_to_html(&slide));
        tracing::debug!(title = %metadata.title, slides = slides.len(), "parsed talk");
        Ok(Talk { metadata, slides })
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Talk> {
        let path = path.as_ref();
        std::fs::read_to_string(path)
            .map_err(crate::error::Error::from)
            .and_then(|source| Talk::parse(&source))
            .chain_with(|| error! {
                "failed to load talk",
                "path" => path.display(),
            })
    }

    /// The URL slug of the talk's title.
    pub fn slug(&self) -> String {
        slugify(&self.metadata.title)
    }

    /// The slides as elements carrying `settings.marker` and ids numbered
    /// from `0` with `settings.prefix`.
    pub fn document(&self, settings: &Settings) -> Document {
        let elements = (0..self.slides.len())
            .map(|i| Element::new("section")
                .with_attribute(&settings.marker, None)
                .with_attribute("id", Some(format!("{}{i}", settings.prefix).as_str())))
            .collect();

        Document::new(elements)
    }

    /// The slides as HTML, one `<section>` per slide.
    pub fn markup(&self, settings: &Settings) -> String {
        self.slides.iter()
            .enumerate()
            .map(|(i, html)| format!(
                "<section {} id=\"{}{i}\">\n{html}</section>\n",
                settings.marker, settings.prefix
            ))
            .collect()
    }

    /// A JSON summary of the talk: its metadata, slug, and slide count.
    pub fn manifest(&self) -> Result<serde_json::Value> {
        let mut manifest = serde_json::to_value(&self.metadata)?;
        manifest["slug"] = self.slug().into();
        manifest["slides"] = self.slides.len().into();
        Ok(manifest)
    }
}

fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES;

    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, Parser::new_ext(markdown, options));
    output
}

mod de {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer};

    pub fn date<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveDate, D::Error> {
        let string = String::deserialize(de)?;
        NaiveDate::parse_from_str(&string, super::DATE_FORMAT)
            .map_err(|e| D::Error::custom(format!("invalid date {string:?}: {e}")))
    }

    pub fn markdown_option<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<String>::deserialize(de)?.map(|s| super::markdown_to_html(&s)))
    }

    pub fn comma_separated<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
        let tags = String::deserialize(de)?
            .split(',')
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(|tag| tag.to_string())
            .collect();

        Ok(tags)
    }
}

mod ser {
    use chrono::NaiveDate;
    use serde::Serializer;

    pub fn date_display<S: Serializer>(date: &NaiveDate, ser: S) -> Result<S::Ok, S::Error> {
        ser.collect_str(&date.format(super::DATE_DISPLAY_FORMAT))
    }
}
