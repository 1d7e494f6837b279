//! Domain types for Lyrion.
//!
//! - [`LyricsDocument`] / [`LyricLine`]: extracted lyrics with inline annotation ids
//! - [`AnnotationRecord`] / [`AnnotationBatch`]: referent lookups
//! - [`SongDetails`], [`ArtistDetails`], [`SearchResults`]: metadata lookups
//! - [`RateLimitStatus`]: governor snapshot reported to callers

mod annotation;
mod lyrics;
mod metadata;
mod rate;

pub use annotation::{AnnotationBatch, AnnotationRecord};
pub use lyrics::{LyricLine, LyricsDocument};
pub use metadata::{ArtistDetails, MediaLink, SearchHit, SearchResults, SocialLinks, SongDetails};
pub use rate::RateLimitStatus;
