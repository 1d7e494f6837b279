//! Lyrics page scraping for Lyrion.
//!
//! Three steps turn a song and artist name into annotated lyrics:
//!
//! 1. [`build_song_url`] derives the page address from the names
//! 2. [`HttpPageFetcher`] downloads the page with browser-like headers
//! 3. [`extract`] walks the page DOM and keeps annotation ids inline
//!
//! ```
//! use lyrion_scraper::{build_identifier, extract};
//!
//! assert_eq!(build_identifier("Hello World!", "Jay-Z"), "Jayz-Hello-World-lyrics");
//!
//! let page = r#"<h1>Hello</h1><div data-lyrics-container="true">First line<br></div>"#;
//! let doc = extract(page).unwrap();
//! assert_eq!(doc.title, "Hello");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod extract;
mod fetch;
mod normalize;

pub use extract::{extract, LyricNode};
pub use fetch::{HttpPageFetcher, ScraperConfig};
pub use normalize::{build_identifier, build_song_url};
