//! # Lyrion Core
//!
//! Core types, errors, and traits shared by every Lyrion crate:
//!
//! - **Types**: lyrics documents, annotation records, song/artist metadata
//! - **Errors**: one closed error enum with a category for every failure
//! - **Constants**: defaults and fixed protocol values
//! - **Traits**: the page-fetch and remote-lookup seams
//!
//! ## Example
//!
//! ```rust
//! use lyrion_core::{LyricLine, LyricsDocument};
//!
//! let doc = LyricsDocument::new(
//!     "Rap God",
//!     vec![LyricLine::annotated("Look, I was gonna go easy on you", "2310153")],
//! );
//! assert!(doc.render().contains("[ID: 2310153]"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{ErrorCategory, LyrionError, Result};
pub use traits::*;
pub use types::*;
