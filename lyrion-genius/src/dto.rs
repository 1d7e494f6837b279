//! Wire shapes of the Genius API.
//!
//! Only the fields Lyrion reads are declared; everything is optional or
//! defaulted so that sparse records still decode.

use serde::Deserialize;

use lyrion_core::types::{
    AnnotationRecord, ArtistDetails, MediaLink, SearchHit, SocialLinks, SongDetails,
};

/// Every API payload is wrapped as `{"meta": {...}, "response": {...}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub response: T,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PlainText {
    #[serde(default)]
    pub plain: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// REFERENTS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub(crate) struct ReferentResponse {
    #[serde(default)]
    pub referent: Option<Referent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Referent {
    #[serde(default)]
    pub fragment: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Annotation {
    #[serde(default)]
    pub body: PlainText,
}

impl Referent {
    /// Only the first annotation of a referent is reported.
    pub fn into_record(self, annotation_id: &str) -> AnnotationRecord {
        let explanation = self
            .annotations
            .into_iter()
            .next()
            .and_then(|annotation| annotation.body.plain);
        AnnotationRecord::fetched(annotation_id, self.fragment, explanation)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SEARCH
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Hit {
    pub result: SongSummary,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SongSummary {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub lyrics_state: String,
    #[serde(default)]
    pub primary_artist: Option<ArtistRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistRef {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
}

impl From<Hit> for SearchHit {
    fn from(hit: Hit) -> Self {
        let song = hit.result;
        let artist = song.primary_artist.map(|a| a.name).unwrap_or_default();
        SearchHit::new(song.id, song.title, artist, song.url, song.lyrics_state)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SONGS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub(crate) struct SongResponse {
    pub song: Song,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Song {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub primary_artist: Option<ArtistRef>,
    #[serde(default)]
    pub album: Option<Album>,
    #[serde(default)]
    pub release_date_for_display: Option<String>,
    #[serde(default)]
    pub stats: Option<SongStats>,
    #[serde(default)]
    pub media: Vec<Media>,
    #[serde(default)]
    pub featured_artists: Vec<ArtistRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Album {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SongStats {
    #[serde(default)]
    pub pageviews: Option<u64>,
    #[serde(default)]
    pub hot: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Media {
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl From<Song> for SongDetails {
    fn from(song: Song) -> Self {
        let stats = song.stats.unwrap_or_default();
        let (artist, artist_id) = song
            .primary_artist
            .map(|a| (a.name, a.id))
            .unwrap_or_default();

        SongDetails {
            id: song.id,
            title: song.title,
            artist,
            artist_id,
            album: song.album.map(|a| a.name).filter(|name| !name.is_empty()),
            release_date: song.release_date_for_display,
            pageviews: stats.pageviews,
            hot: stats.hot,
            media: song
                .media
                .into_iter()
                .map(|m| MediaLink {
                    provider: m.provider,
                    url: m.url,
                    kind: m.kind,
                })
                .collect(),
            featured_artists: song.featured_artists.into_iter().map(|a| a.name).collect(),
            url: song.url,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ARTISTS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistResponse {
    pub artist: Artist,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Artist {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<PlainText>,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub facebook_name: Option<String>,
    #[serde(default)]
    pub instagram_name: Option<String>,
    #[serde(default)]
    pub twitter_name: Option<String>,
    #[serde(default)]
    pub alternate_names: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<Artist> for ArtistDetails {
    fn from(artist: Artist) -> Self {
        ArtistDetails {
            id: artist.id,
            name: artist.name,
            bio: artist
                .description
                .and_then(|d| d.plain)
                .map(|bio| bio.trim().to_string())
                .filter(|bio| !bio.is_empty() && bio != "?"),
            followers_count: artist.followers_count,
            social: SocialLinks {
                facebook: artist.facebook_name,
                instagram: artist.instagram_name,
                twitter: artist.twitter_name,
            },
            alternate_names: artist.alternate_names,
            url: artist.url,
            image_url: artist.image_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_referent_first_annotation_wins() {
        let referent: Referent = serde_json::from_value(json!({
            "fragment": "Look, I was gonna go easy on you",
            "annotations": [
                {"body": {"plain": "First"}},
                {"body": {"plain": "Second"}}
            ]
        }))
        .unwrap();

        let record = referent.into_record("2310153");
        assert_eq!(record.explanation, "First");
        assert_eq!(record.url, "https://genius.com/annotations/2310153");
    }

    #[test]
    fn test_referent_without_annotations() {
        let referent: Referent = serde_json::from_value(json!({"fragment": "x"})).unwrap();
        assert_eq!(referent.into_record("1").explanation, "No explanation available");
    }

    #[test]
    fn test_search_hit_without_id() {
        let response: SearchResponse = serde_json::from_value(json!({
            "hits": [
                {"result": {"id": 235729, "title": "Rap God", "lyrics_state": "complete"}},
                {"result": {"title": "Rap God (Live)"}}
            ]
        }))
        .unwrap();

        let hits: Vec<SearchHit> = response.hits.into_iter().map(SearchHit::from).collect();
        assert_eq!(hits[0].id, Some(235729));
        assert_eq!(hits[1].id, None);
        assert_eq!(hits[1].title, "Rap God (Live)");
        assert!(!hits[1].has_lyrics);
    }

    #[test]
    fn test_sparse_song_decodes() {
        let song: Song = serde_json::from_value(json!({"id": 7})).unwrap();
        let details = SongDetails::from(song);
        assert_eq!(details.id, 7);
        assert_eq!(details.artist, "");
        assert_eq!(details.artist_id, None);
        assert!(!details.hot);
        assert!(details.media.is_empty());
    }

    #[test]
    fn test_artist_placeholder_bio_dropped() {
        let artist: Artist = serde_json::from_value(json!({
            "id": 45,
            "name": "Eminem",
            "description": {"plain": "?"}
        }))
        .unwrap();
        assert_eq!(ArtistDetails::from(artist).bio, None);
    }
}
