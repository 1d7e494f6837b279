//! Extracted lyrics.
//!
//! A lyrics page is reduced to a title and an ordered list of lines. Lines
//! that came from an annotated span keep the annotation id so callers can
//! look up the explanation later.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::TITLE_RULE_WIDTH;

/// One line of extracted lyrics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LyricLine {
    /// Plain lyric text
    Text {
        /// Line text
        text: String,
    },
    /// Line or stanza break
    Blank,
    /// Text of an annotated span with its annotation id
    Annotated {
        /// Visible text of the span
        text: String,
        /// Numeric annotation id
        id: String,
    },
}

impl LyricLine {
    /// Creates a plain text line.
    pub fn text(text: impl Into<String>) -> Self {
        LyricLine::Text { text: text.into() }
    }

    /// Creates an annotated line.
    pub fn annotated(text: impl Into<String>, id: impl Into<String>) -> Self {
        LyricLine::Annotated {
            text: text.into(),
            id: id.into(),
        }
    }

    /// Returns the annotation id, if this line carries one.
    pub fn annotation_id(&self) -> Option<&str> {
        match self {
            LyricLine::Annotated { id, .. } => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for LyricLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LyricLine::Text { text } => f.write_str(text),
            LyricLine::Blank => Ok(()),
            LyricLine::Annotated { text, id } => write!(f, "{} [ID: {}]", text, id),
        }
    }
}

/// Lyrics of one song as found on its page.
///
/// Lines are kept in document order; nothing is merged, reordered or
/// deduplicated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsDocument {
    /// Song title from the page heading
    pub title: String,
    /// Lines in document order
    pub lines: Vec<LyricLine>,
}

impl LyricsDocument {
    /// Creates a document from a title and lines.
    pub fn new(title: impl Into<String>, lines: Vec<LyricLine>) -> Self {
        Self {
            title: title.into(),
            lines,
        }
    }

    /// Each line rendered as text, `[ID: n]` markers inlined.
    pub fn rendered_lines(&self) -> Vec<String> {
        self.lines.iter().map(ToString::to_string).collect()
    }

    /// The lyrics body: rendered lines joined by newlines.
    pub fn body(&self) -> String {
        self.rendered_lines().join("\n")
    }

    /// Title, a rule, a blank line, then the body.
    pub fn render(&self) -> String {
        format!("{}\n{}\n\n{}", self.title, "=".repeat(TITLE_RULE_WIDTH), self.body())
    }

    /// Annotation ids in the order they appear.
    pub fn annotation_ids(&self) -> Vec<&str> {
        self.lines.iter().filter_map(LyricLine::annotation_id).collect()
    }
}

impl fmt::Display for LyricsDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LyricsDocument {
        LyricsDocument::new(
            "Rap God",
            vec![
                LyricLine::text("Line one"),
                LyricLine::Blank,
                LyricLine::annotated("Line two", "2310153"),
            ],
        )
    }

    #[test]
    fn test_rendered_lines_keep_order() {
        assert_eq!(
            sample().rendered_lines(),
            vec!["Line one", "", "Line two [ID: 2310153]"]
        );
    }

    #[test]
    fn test_render_layout() {
        let rendered = sample().render();
        let mut parts = rendered.splitn(3, '\n');
        assert_eq!(parts.next(), Some("Rap God"));
        assert_eq!(parts.next(), Some("=".repeat(60).as_str()));
        assert_eq!(parts.next(), Some("\nLine one\n\nLine two [ID: 2310153]"));
    }

    #[test]
    fn test_annotation_ids() {
        assert_eq!(sample().annotation_ids(), vec!["2310153"]);
    }

    #[test]
    fn test_line_serde_tagging() {
        let json = serde_json::to_value(LyricLine::annotated("x", "1")).unwrap();
        assert_eq!(json["kind"], "annotated");
        assert_eq!(json["id"], "1");
    }
}
