use serde::{Deserialize, Serialize};
pub use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Platforms recognized from a URL
#[derive(EnumIter, Display, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Platform {
    YouTube,
    Instagram,
    TikTok,
    Twitter,
    Facebook,
    Vimeo,
    Other,
    Unknown,
}

/// Host fragments checked in priority order
const HOST_FRAGMENTS: &[(Platform, &[&str])] = &[
    (Platform::YouTube, &["youtube.com", "youtu.be"]),
    (Platform::Instagram, &["instagram.com"]),
    (Platform::TikTok, &["tiktok.com"]),
    (Platform::Twitter, &["twitter.com", "x.com"]),
    (Platform::Facebook, &["facebook.com", "fb.watch"]),
    (Platform::Vimeo, &["vimeo.com"]),
];

/// Detect the platform of a URL by case-insensitive substring match.
///
/// Never fails: blank input is `Unknown`, anything unmatched is `Other`.
pub fn detect(url: &str) -> Platform {
    if url.trim().is_empty() {
        return Platform::Unknown;
    }

    let lower = url.to_lowercase();
    HOST_FRAGMENTS
        .iter()
        .find(|(_, fragments)| fragments.iter().any(|f| lower.contains(f)))
        .map(|(p, _)| *p)
        .unwrap_or(Platform::Other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_detect_known_hosts() {
        assert_eq!(detect("https://youtu.be/x"), Platform::YouTube);
        assert_eq!(detect("https://www.YouTube.com/watch?v=abc"), Platform::YouTube);
        assert_eq!(detect("https://instagram.com/p/xyz"), Platform::Instagram);
        assert_eq!(detect("https://www.tiktok.com/@a/video/1"), Platform::TikTok);
        assert_eq!(detect("https://x.com/a/status/1"), Platform::Twitter);
        assert_eq!(detect("https://fb.watch/abc"), Platform::Facebook);
        assert_eq!(detect("https://vimeo.com/123"), Platform::Vimeo);
    }

    #[test]
    fn test_detect_fallbacks() {
        assert_eq!(detect(""), Platform::Unknown);
        assert_eq!(detect("   "), Platform::Unknown);
        assert_eq!(detect("https://example.org"), Platform::Other);
        assert_eq!(detect("not a url"), Platform::Other);
    }

    #[test]
    fn test_priority_order() {
        // a YouTube link shared through Facebook's redirector
        let url = "https://facebook.com/l.php?u=https://youtube.com/watch?v=abc";
        assert_eq!(detect(url), Platform::YouTube);
    }

    #[test]
    fn test_labels() {
        let labels: Vec<String> = Platform::iter().map(|p| p.to_string()).collect();
        assert_eq!(
            labels,
            [
                "YouTube", "Instagram", "TikTok", "Twitter", "Facebook", "Vimeo", "Other",
                "Unknown"
            ]
        );
        assert_eq!(
            serde_json::to_string(&Platform::TikTok).unwrap(),
            "\"TikTok\""
        );
    }

    proptest! {
        #[test]
        fn detect_is_total_and_deterministic(s in any::<String>()) {
            let first = detect(&s);
            prop_assert_eq!(first, detect(&s));
            prop_assert!(Platform::iter().any(|p| p == first));
            if s.trim().is_empty() {
                prop_assert_eq!(first, Platform::Unknown);
            } else {
                prop_assert_ne!(first, Platform::Unknown);
            }
        }
    }
}
