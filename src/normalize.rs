// src/normalize.rs
//! Canonical forms used for comparison: URLs, titles and free text.
//!
//! Everything here is a pure function of its input and never fails; inputs that
//! cannot be parsed are passed through unchanged.

use once_cell::sync::OnceCell;
use regex::Regex;
use url::{form_urlencoded, Url};

/// Query parameters that carry no identity and are stripped from URLs.
/// Any key starting with `utm_` is also removed.
const TRACKING_PARAMS: &[&str] = &[
    "ref", "source", "fbclid", "gclid", "mc_cid", "mc_eid", "igshid",
];

/// Cap for cleaned free text (chars).
const MAX_TEXT_CHARS: usize = 1500;

fn is_tracking_param(key: &str) -> bool {
    let k = key.to_ascii_lowercase();
    k.starts_with("utm_") || TRACKING_PARAMS.contains(&k.as_str())
}

/// Canonicalise a URL for exact-match deduplication.
///
/// 1. Lower-case scheme and host (done by the parser).
/// 2. Strip a leading `www.` from the host.
/// 3. Remove tracking query parameters, keeping the others in order.
/// 4. Drop the fragment.
/// 5. Drop a trailing slash from a non-root path.
///
/// If the input is not an absolute URL it is returned unchanged.
pub fn normalize_url(raw: &str) -> String {
    let Ok(mut parsed) = Url::parse(raw.trim()) else {
        return raw.to_string();
    };

    let bare_host = parsed
        .host_str()
        .and_then(|h| h.strip_prefix("www."))
        .filter(|h| !h.is_empty())
        .map(str::to_string);
    if let Some(host) = bare_host {
        let _ = parsed.set_host(Some(&host));
    }

    parsed.set_fragment(None);

    // Filter on the raw query text: kept segments keep their original encoding.
    if let Some(query) = parsed.query().map(str::to_string) {
        let segments: Vec<&str> = query.split('&').filter(|s| !s.is_empty()).collect();
        let kept: Vec<&str> = segments
            .iter()
            .copied()
            .filter(|seg| {
                let key = form_urlencoded::parse(seg.as_bytes())
                    .next()
                    .map(|(k, _)| k.into_owned())
                    .unwrap_or_default();
                !is_tracking_param(&key)
            })
            .collect();

        if kept.is_empty() {
            parsed.set_query(None);
        } else if kept.len() != segments.len() {
            parsed.set_query(Some(&kept.join("&")));
        }
    }

    if !parsed.cannot_be_a_base() {
        let path = parsed.path().to_string();
        let trimmed = path.trim_end_matches('/');
        if trimmed.len() != path.len() && !trimmed.is_empty() {
            parsed.set_path(trimmed);
        }
    }

    parsed.to_string()
}

fn is_edge_punct(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '\u{201C}' | '\u{201D}' | '\u{2018}' | '\u{2019}' | '\u{00AB}' | '\u{00BB}'
                | '\u{2026}' | '\u{2013}' | '\u{2014}'
        )
}

/// Comparable form of a title: lower-case, single spaces, no edge punctuation.
/// Only used for fuzzy matching, never for display.
pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| is_edge_punct(c) || c.is_whitespace())
        .to_string()
}

/// Clean summary/body text before signal detection: decode entities, strip tags,
/// fold typographic quotes, collapse whitespace, cap length.
pub fn clean_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    out = out.split_whitespace().collect::<Vec<_>>().join(" ");

    if out.chars().count() > MAX_TEXT_CHARS {
        out = out.chars().take(MAX_TEXT_CHARS).collect();
    }
    out
}
