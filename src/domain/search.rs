//! Directory search core.
//!
//! Pure functions over the in-memory profile list: slug normalization, tag
//! derivation from bio text, substring filtering and first-match
//! highlighting. No I/O happens here; the directory route loads rows and
//! feeds them through.

use serde::Serialize;

use super::profiles::ProfileSummary;

/// Normalize a free-text username into its slug form: trimmed, lowercased,
/// whitespace runs collapsed to `-`. Idempotent on already-normalized slugs.
pub fn normalize_username(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Derive search tags from a bio: lowercase, split on whitespace. No
/// de-duplication, no stopword removal. Absent bio yields no tags.
pub fn derive_tags(about: Option<&str>) -> Vec<String> {
    about
        .map(|a| a.to_lowercase().split_whitespace().map(String::from).collect())
        .unwrap_or_default()
}

/// An active search query.
///
/// `parse` returns `None` for empty or whitespace-only input, which the
/// caller surfaces as "no search active" rather than "zero matches". The
/// retained text is lowercased but deliberately not whitespace-trimmed, so a
/// query of `" wed"` only matches where that exact substring occurs.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    lowered: String,
}

impl SearchQuery {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self {
            lowered: raw.to_lowercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.lowered
    }
}

/// A profile matches when the query is a substring of its lowercased
/// username or of any derived tag.
pub fn matches(profile: &ProfileSummary, query: &SearchQuery) -> bool {
    profile.username.to_lowercase().contains(&query.lowered)
        || profile.tags.iter().any(|tag| tag.contains(&query.lowered))
}

/// Filter the candidate list down to matching profiles, preserving order.
pub fn filter<'a>(profiles: &'a [ProfileSummary], query: &SearchQuery) -> Vec<&'a ProfileSummary> {
    profiles.iter().filter(|p| matches(p, query)).collect()
}

/// One run of text in a highlighted rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub marked: bool,
}

impl Segment {
    fn unmarked(text: &str) -> Self {
        Self {
            text: text.to_string(),
            marked: false,
        }
    }

    fn marked(text: &str) -> Self {
        Self {
            text: text.to_string(),
            marked: true,
        }
    }
}

/// Split `text` around the first case-insensitive occurrence of the query,
/// marking the matched span and preserving the original casing throughout.
/// Text without a match comes back as a single unmarked segment.
pub fn highlight(text: &str, query: &SearchQuery) -> Vec<Segment> {
    let lowered = text.to_lowercase();
    let needle = &query.lowered;

    let start = match lowered.find(needle.as_str()) {
        Some(i) => i,
        None => return vec![Segment::unmarked(text)],
    };
    let end = start + needle.len();

    // Lowercasing can shift byte offsets for some scripts; fall back to an
    // unmarked rendering rather than slicing off a char boundary.
    if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
        return vec![Segment::unmarked(text)];
    }

    let mut segments = Vec::with_capacity(3);
    if start > 0 {
        segments.push(Segment::unmarked(&text[..start]));
    }
    segments.push(Segment::marked(&text[start..end]));
    if end < text.len() {
        segments.push(Segment::unmarked(&text[end..]));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(username: &str, about: Option<&str>) -> ProfileSummary {
        ProfileSummary::new(username.to_string(), about.map(String::from))
    }

    fn q(raw: &str) -> SearchQuery {
        SearchQuery::parse(raw).expect("query should be active")
    }

    #[test]
    fn normalize_collapses_and_lowercases() {
        assert_eq!(normalize_username("Jane Doe Photography"), "jane-doe-photography");
        assert_eq!(normalize_username("  DJ Max  "), "dj-max");
        assert_eq!(normalize_username("one   two\tthree"), "one-two-three");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_username("Jane Doe Photography");
        assert_eq!(normalize_username(&once), once);
    }

    #[test]
    fn tags_split_on_whitespace_without_dedup() {
        assert_eq!(
            derive_tags(Some("Wedding decor and wedding flowers")),
            vec!["wedding", "decor", "and", "wedding", "flowers"]
        );
    }

    #[test]
    fn tags_of_absent_or_blank_bio_are_empty() {
        assert!(derive_tags(None).is_empty());
        assert!(derive_tags(Some("")).is_empty());
        assert!(derive_tags(Some("   ")).is_empty());
    }

    #[test]
    fn tag_derivation_is_deterministic() {
        let bio = Some("Corporate events, galas, launches");
        assert_eq!(derive_tags(bio), derive_tags(bio));
    }

    #[test]
    fn blank_query_is_not_a_search() {
        assert!(SearchQuery::parse("").is_none());
        assert!(SearchQuery::parse("   ").is_none());
        assert!(SearchQuery::parse("\t\n").is_none());
    }

    #[test]
    fn query_keeps_surrounding_whitespace() {
        let query = q(" wed");
        assert_eq!(query.as_str(), " wed");
        // "wedding" does not contain " wed", so nothing matches
        let profiles = vec![summary("jane-doe", Some("wedding planner"))];
        assert!(filter(&profiles, &query).is_empty());
    }

    #[test]
    fn filter_matches_username_or_tags() {
        let profiles = vec![
            summary("jane-doe", Some("wedding planner")),
            summary("bob-dj", Some("music events")),
        ];

        let hits = filter(&profiles, &q("wed"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].username, "jane-doe");

        let hits = filter(&profiles, &q("bob"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].username, "bob-dj");
    }

    #[test]
    fn filter_is_case_insensitive() {
        let profiles = vec![summary("jane-doe", Some("Wedding Planner"))];
        assert_eq!(filter(&profiles, &q("WEDDING")).len(), 1);
    }

    #[test]
    fn unmatched_profiles_are_excluded_entirely() {
        let profiles = vec![summary("bob-dj", Some("music events"))];
        assert!(filter(&profiles, &q("wedding")).is_empty());
    }

    #[test]
    fn filter_preserves_candidate_order() {
        let profiles = vec![
            summary("a-events", Some("events")),
            summary("b-events", Some("events")),
            summary("c-other", Some("catering")),
        ];
        let hits = filter(&profiles, &q("events"));
        let names: Vec<_> = hits.iter().map(|p| p.username.as_str()).collect();
        assert_eq!(names, vec!["a-events", "b-events"]);
    }

    #[test]
    fn highlight_marks_first_occurrence_preserving_case() {
        let segments = highlight("Wedding Decor", &q("decor"));
        assert_eq!(
            segments,
            vec![
                Segment {
                    text: "Wedding ".to_string(),
                    marked: false
                },
                Segment {
                    text: "Decor".to_string(),
                    marked: true
                },
            ]
        );
    }

    #[test]
    fn highlight_only_marks_the_first_of_repeated_matches() {
        let segments = highlight("decor and decor", &q("decor"));
        assert_eq!(
            segments,
            vec![
                Segment {
                    text: "decor".to_string(),
                    marked: true
                },
                Segment {
                    text: " and decor".to_string(),
                    marked: false
                },
            ]
        );
    }

    #[test]
    fn highlight_without_match_is_a_single_unmarked_segment() {
        let segments = highlight("Wedding Decor", &q("catering"));
        assert_eq!(
            segments,
            vec![Segment {
                text: "Wedding Decor".to_string(),
                marked: false
            }]
        );
    }
}
