//! Lyrics extraction from page markup.
//!
//! The page is parsed into a DOM, page chrome (translation menus, dropdowns,
//! contributor credits) is detached, and every lyrics container is walked
//! one level deep. Hyperlinks inside a container mark annotated spans; their
//! numeric id is kept inline as `[ID: n]` when rendered.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, instrument};
use url::Url;

use lyrion_core::constants::{DEFAULT_WEB_BASE_URL, LYRICS_CONTAINER_ATTR, UNKNOWN_TITLE};
use lyrion_core::error::{LyrionError, Result};
use lyrion_core::types::{LyricLine, LyricsDocument};

/// Class names of page chrome that sits inside or around the lyrics.
static NOISE_CLASS: Lazy<std::result::Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new("Translation|Dropdown|Contributor"));

/// Selectors used by the extractor, compiled once.
struct Selectors {
    noise: Selector,
    container: Selector,
    heading: Selector,
}

static SELECTORS: Lazy<std::result::Result<Selectors, String>> = Lazy::new(|| {
    let parse = |css: &str| Selector::parse(css).map_err(|e| format!("{css}: {e}"));
    Ok(Selectors {
        noise: parse("button[class], div[class]")?,
        container: parse(&format!("[{}=\"true\"]", LYRICS_CONTAINER_ATTR))?,
        heading: parse("h1")?,
    })
});

fn selectors() -> Result<&'static Selectors> {
    SELECTORS
        .as_ref()
        .map_err(|e| LyrionError::InternalError(format!("invalid selector {e}")))
}

fn noise_class() -> Result<&'static Regex> {
    NOISE_CLASS
        .as_ref()
        .map_err(|e| LyrionError::InternalError(e.to_string()))
}

/// An immediate child of a lyrics container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LyricNode<'a> {
    /// Bare text
    Text(&'a str),
    /// `<br>`
    LineBreak,
    /// `<a>` with its flattened text and raw `href`
    Hyperlink {
        /// Visible text
        text: String,
        /// Link target as written in the page
        href: &'a str,
    },
    /// Any other element, flattened to its text
    Element {
        /// Concatenated descendant text
        text: String,
    },
}

impl<'a> LyricNode<'a> {
    /// Classifies a DOM node. Comments, doctypes and the like yield `None`.
    fn classify(value: &'a Node, element: Option<ElementRef<'a>>) -> Option<Self> {
        match value {
            Node::Text(text) => Some(LyricNode::Text(&**text)),
            Node::Element(_) => {
                let element = element?;
                Some(match element.value().name() {
                    "br" => LyricNode::LineBreak,
                    "a" => LyricNode::Hyperlink {
                        text: element.text().collect(),
                        href: element.value().attr("href").unwrap_or_default(),
                    },
                    _ => LyricNode::Element {
                        text: element.text().collect(),
                    },
                })
            }
            _ => None,
        }
    }

    /// The line this node contributes, if any.
    fn into_line(self) -> Option<LyricLine> {
        match self {
            LyricNode::Text(text) => non_empty(text).map(LyricLine::text),
            LyricNode::LineBreak => Some(LyricLine::Blank),
            LyricNode::Hyperlink { text, href } => {
                let text = text.trim();
                Some(match annotation_id(href) {
                    Some(id) => LyricLine::annotated(text, id),
                    None => LyricLine::text(text),
                })
            }
            LyricNode::Element { text } => non_empty(&text).map(LyricLine::text),
        }
    }
}

fn non_empty(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// First all-digit path segment of `href`, resolved against the site root.
fn annotation_id(href: &str) -> Option<String> {
    let base = Url::parse(DEFAULT_WEB_BASE_URL).ok()?;
    let resolved = base.join(href).ok()?;
    resolved
        .path_segments()?
        .find(|segment| !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string)
}

/// Detaches every `button`/`div` whose class list names page chrome.
fn strip_noise(html: &mut Html, selectors: &Selectors, pattern: &Regex) {
    let noisy: Vec<_> = html
        .select(&selectors.noise)
        .filter(|el| el.value().classes().any(|class| pattern.is_match(class)))
        .map(|el| el.id())
        .collect();

    for id in noisy {
        if let Some(mut node) = html.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn title_of(html: &Html, selectors: &Selectors) -> String {
    html.select(&selectors.heading)
        .next()
        .map(|h1| {
            h1.text()
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}

/// Extracts the title and annotated lyric lines from a lyrics page.
///
/// Fails with [`LyrionError::ExtractionError`] when the page has no lyrics
/// container. Links without a numeric id degrade to plain text.
#[instrument(skip(markup), fields(bytes = markup.len()))]
pub fn extract(markup: &str) -> Result<LyricsDocument> {
    let selectors = selectors()?;
    let mut html = Html::parse_document(markup);

    // Read before stripping: headings may sit inside page chrome.
    let title = title_of(&html, selectors);
    strip_noise(&mut html, selectors, noise_class()?);

    let containers: Vec<ElementRef<'_>> = html.select(&selectors.container).collect();
    if containers.is_empty() {
        return Err(LyrionError::ExtractionError(
            "no lyrics container in page".into(),
        ));
    }

    let lines: Vec<LyricLine> = containers
        .iter()
        .flat_map(|container| container.children())
        .filter_map(|node| LyricNode::classify(node.value(), ElementRef::wrap(node)))
        .filter_map(LyricNode::into_line)
        .collect();

    debug!(containers = containers.len(), lines = lines.len(), %title, "Extracted lyrics");

    Ok(LyricsDocument::new(title, lines))
}
