//! Song, artist and search metadata returned by the remote API.

use serde::{Deserialize, Serialize};

/// Lyrics state the API reports for songs with full lyrics.
const COMPLETE_LYRICS_STATE: &str = "complete";

/// One search hit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Song id, absent when the API omits it
    pub id: Option<u64>,
    /// Song title
    pub title: String,
    /// Primary artist name
    pub artist: String,
    /// Song page URL
    pub url: String,
    /// Raw lyrics state ("complete", "unreleased", ...)
    pub lyrics_state: String,
    /// Whether the song has complete lyrics
    pub has_lyrics: bool,
}

impl SearchHit {
    /// Creates a hit, deriving `has_lyrics` from the lyrics state.
    pub fn new(
        id: Option<u64>,
        title: impl Into<String>,
        artist: impl Into<String>,
        url: impl Into<String>,
        lyrics_state: impl Into<String>,
    ) -> Self {
        let lyrics_state = lyrics_state.into();
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
            url: url.into(),
            has_lyrics: lyrics_state == COMPLETE_LYRICS_STATE,
            lyrics_state,
        }
    }
}

/// Search response envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResults {
    /// Query as sent
    pub query: String,
    /// Number of hits
    pub results_count: usize,
    /// Hits in API order
    pub results: Vec<SearchHit>,
    /// Always true for a returned value
    pub success: bool,
}

impl SearchResults {
    /// Wraps hits for a query.
    pub fn new(query: impl Into<String>, results: Vec<SearchHit>) -> Self {
        Self {
            query: query.into(),
            results_count: results.len(),
            results,
            success: true,
        }
    }
}

/// A streaming or store link attached to a song.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaLink {
    /// Provider name, e.g. "youtube" or "spotify"
    pub provider: String,
    /// Link target
    pub url: String,
    /// Media type, e.g. "video" or "audio"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Detailed song metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongDetails {
    /// Song id
    pub id: u64,
    /// Song title
    pub title: String,
    /// Primary artist name
    pub artist: String,
    /// Primary artist id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_id: Option<u64>,
    /// Album name
    pub album: Option<String>,
    /// Release date as displayed by the site
    pub release_date: Option<String>,
    /// Page view count, when public
    pub pageviews: Option<u64>,
    /// Whether the song is trending
    pub hot: bool,
    /// Streaming and store links
    pub media: Vec<MediaLink>,
    /// Featured artist names
    pub featured_artists: Vec<String>,
    /// Song page URL
    pub url: String,
}

/// Social handles of an artist.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    /// Facebook handle
    pub facebook: Option<String>,
    /// Instagram handle
    pub instagram: Option<String>,
    /// Twitter handle
    pub twitter: Option<String>,
}

/// Detailed artist metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistDetails {
    /// Artist id
    pub id: u64,
    /// Artist name
    pub name: String,
    /// Plain-text biography
    pub bio: Option<String>,
    /// Follower count
    pub followers_count: u64,
    /// Social handles
    pub social: SocialLinks,
    /// Alternate names
    pub alternate_names: Vec<String>,
    /// Artist page URL
    pub url: String,
    /// Artist image URL
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_lyrics_from_state() {
        assert!(SearchHit::new(Some(1), "t", "a", "u", "complete").has_lyrics);
        assert!(!SearchHit::new(Some(1), "t", "a", "u", "unreleased").has_lyrics);
        assert!(!SearchHit::new(Some(1), "t", "a", "u", "").has_lyrics);
    }

    #[test]
    fn test_search_results_count() {
        let results = SearchResults::new("rap god", vec![SearchHit::new(Some(1), "t", "a", "u", "complete")]);
        assert_eq!(results.results_count, 1);
        assert!(results.success);
    }
}
