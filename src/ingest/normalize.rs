use reqwest::Url;

use crate::model::RemoteType;
use crate::text::{collapse_whitespace, tokenize};

const REMOTE_MARKERS: &[&str] = &[
    "remote",
    "hybrid",
    "on-site",
    "onsite",
    "on site",
    "work from home",
    "wfh",
    "anywhere",
];

const SUFFIX_SEPARATORS: &[&str] = &[" - ", " – ", " — ", " | ", " @ ", ", "];

const TRACKING_PARAMS: &[&str] = &[
    "ref", "refid", "source", "src", "trk", "trackingid", "gclid", "fbclid",
];

/// Strips trailing location/remote qualifiers from a title and collapses whitespace.
///
/// `"Backend Engineer - Remote (US)"` → `"Backend Engineer"`. Suffixes are only removed
/// when they carry a remote marker or consist of words of `location`; a team suffix such
/// as `"- Payments, Risk"` is kept.
pub fn normalize_title(title: &str, location: Option<&str>) -> String {
    let collapsed = collapse_whitespace(title);
    let stripped = strip_suffixes(&collapsed, |segment| {
        has_remote_marker(segment) || is_part_of(segment, location)
    });
    if stripped.is_empty() {
        collapsed
    } else {
        stripped
    }
}

/// Strips trailing remote qualifiers from a location: `"Berlin, Germany (Remote)"` →
/// `"Berlin, Germany"`. A location that is only a remote marker is kept as-is.
pub fn normalize_location(location: Option<&str>) -> Option<String> {
    let collapsed = collapse_whitespace(location?);
    if collapsed.is_empty() {
        return None;
    }
    let stripped = strip_suffixes(&collapsed, has_remote_marker);
    if stripped.is_empty() {
        Some(collapsed)
    } else {
        Some(stripped)
    }
}

/// Infers the work arrangement from title and location text.
pub fn infer_remote_type(title: &str, location: Option<&str>) -> RemoteType {
    let text = format!("{} {}", title, location.unwrap_or_default()).to_lowercase();
    if text.contains("hybrid") {
        RemoteType::Hybrid
    } else if ["remote", "work from home", "wfh", "anywhere"]
        .iter()
        .any(|m| text.contains(m))
    {
        RemoteType::Remote
    } else if ["on-site", "onsite", "on site", "in office", "in-office"]
        .iter()
        .any(|m| text.contains(m))
    {
        RemoteType::Onsite
    } else {
        RemoteType::Unknown
    }
}

/// Canonical form of a posting link, used as the natural key.
///
/// Lowercases scheme/host, drops the fragment and tracking parameters, and trims a
/// trailing slash. Links that don't parse as http(s) URLs are only trimmed. Returns
/// `None` for blank input.
pub fn canonicalize_link(link: &str) -> Option<String> {
    let trimmed = link.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Ok(mut url) = Url::parse(trimmed) else {
        return Some(trimmed.to_string());
    };
    if !matches!(url.scheme(), "http" | "https") {
        return Some(trimmed.to_string());
    }

    url.set_fragment(None);

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }

    if url.path().len() > 1 && url.path().ends_with('/') {
        let path = url.path().trim_end_matches('/').to_string();
        url.set_path(&path);
    }

    let mut canonical = url.to_string();
    if url.query().is_none() && canonical.ends_with('/') {
        canonical.pop();
    }
    Some(canonical)
}

fn is_tracking_param(key: &str) -> bool {
    let key = key.to_lowercase();
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key.as_str())
}

fn has_remote_marker(segment: &str) -> bool {
    let lower = segment.to_lowercase();
    REMOTE_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Every word of `segment` appears in `location`.
fn is_part_of(segment: &str, location: Option<&str>) -> bool {
    let Some(location) = location else {
        return false;
    };
    let location_tokens = tokenize(location);
    let segment_tokens = tokenize(segment);
    !segment_tokens.is_empty() && segment_tokens.iter().all(|t| location_tokens.contains(t))
}

fn strip_suffixes(text: &str, is_noise: impl Fn(&str) -> bool) -> String {
    let mut current = text.trim().to_string();
    loop {
        let next = strip_trailing_group(&current, &is_noise)
            .or_else(|| strip_trailing_segment(&current, &is_noise));
        match next {
            Some(next) if next != current => current = next,
            _ => return current,
        }
    }
}

fn strip_trailing_group(text: &str, is_noise: &impl Fn(&str) -> bool) -> Option<String> {
    let (open, close) = match text.chars().last()? {
        ')' => ('(', ')'),
        ']' => ('[', ']'),
        _ => return None,
    };
    let start = text.rfind(open)?;
    let inner = &text[start + open.len_utf8()..text.len() - close.len_utf8()];
    is_noise(inner).then(|| text[..start].trim_end().to_string())
}

fn strip_trailing_segment(text: &str, is_noise: &impl Fn(&str) -> bool) -> Option<String> {
    let mut splits: Vec<(usize, &str)> = SUFFIX_SEPARATORS
        .iter()
        .filter_map(|sep| text.rfind(sep).map(|idx| (idx, *sep)))
        .collect();
    // Shortest suffix first, so "- Berlin, Germany" is tried after ", Germany".
    splits.sort_by(|a, b| b.0.cmp(&a.0));
    splits
        .into_iter()
        .find(|(idx, separator)| is_noise(&text[idx + separator.len()..]))
        .map(|(idx, _)| text[..idx].trim_end().to_string())
}
