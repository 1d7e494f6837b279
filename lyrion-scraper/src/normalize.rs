//! Song page addressing.
//!
//! Lyrics pages live at `<base>/<Artist>-<Song>-lyrics`, where both names
//! are reduced to capitalized ASCII words joined by hyphens.

/// Suffix every lyrics page path ends with.
const LYRICS_SUFFIX: &str = "lyrics";

/// Reduces a display name to a path fragment.
///
/// Drops everything except ASCII letters, digits and whitespace, lower-cases,
/// joins the remaining words with `-` and capitalizes each word.
fn clean(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    kept.to_lowercase()
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join("-")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Builds the page path segment `<Artist>-<Song>-lyrics`.
///
/// A name that cleans down to nothing leaves an empty slot in the segment;
/// the page fetch then reports the song as not found.
pub fn build_identifier(song_name: &str, artist_name: &str) -> String {
    format!("{}-{}-{}", clean(artist_name), clean(song_name), LYRICS_SUFFIX)
}

/// Builds the full lyrics page URL under `base_url`.
pub fn build_song_url(base_url: &str, song_name: &str, artist_name: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        build_identifier(song_name, artist_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("Hello World!", "Jay-Z", "Jayz-Hello-World-lyrics"; "punctuation_dropped")]
    #[test_case("rap god", "eminem", "Eminem-Rap-God-lyrics"; "lowercase_input")]
    #[test_case("  Lose   Yourself ", "EMINEM", "Eminem-Lose-Yourself-lyrics"; "whitespace_collapsed")]
    #[test_case("99 Problems", "JAY Z", "Jay-Z-99-Problems-lyrics"; "digits_kept")]
    #[test_case("Café", "Beyoncé", "Beyonc-Caf-lyrics"; "non_ascii_dropped")]
    #[test_case("!!!", "Artist", "Artist--lyrics"; "emptied_name")]
    fn test_build_identifier(song: &str, artist: &str, expected: &str) {
        assert_eq!(build_identifier(song, artist), expected);
    }

    #[test]
    fn test_build_song_url() {
        assert_eq!(
            build_song_url("https://genius.com", "Rap God", "Eminem"),
            "https://genius.com/Eminem-Rap-God-lyrics"
        );
        assert_eq!(
            build_song_url("http://127.0.0.1:8080/", "Rap God", "Eminem"),
            "http://127.0.0.1:8080/Eminem-Rap-God-lyrics"
        );
    }

    proptest! {
        #[test]
        fn prop_identifier_alphabet(song in ".{0,60}", artist in ".{0,60}") {
            let id = build_identifier(&song, &artist);
            prop_assert!(id.ends_with("-lyrics"));
            prop_assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
        }

        #[test]
        fn prop_identifier_deterministic(song in "[a-zA-Z0-9 ]{0,40}", artist in "[a-zA-Z0-9 ]{0,40}") {
            prop_assert_eq!(build_identifier(&song, &artist), build_identifier(&song, &artist));
        }

        #[test]
        fn prop_identifier_ignores_case(song in "[a-zA-Z ]{0,40}") {
            prop_assert_eq!(
                build_identifier(&song.to_uppercase(), "x"),
                build_identifier(&song.to_lowercase(), "x")
            );
        }
    }
}
