//! Parsing of YouTube's timed-text caption XML.

use crate::core::CaptionEntry;
use crate::utils::unescape_html;
use regex::Regex;
use std::sync::OnceLock;

fn text_element_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<text\b([^>]*?)(?:/>|>(.*?)</text>)"#).expect("valid timed-text regex")
    })
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag regex"))
}

fn start_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\bstart="([^"]*)""#).expect("valid start regex"))
}

fn dur_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\bdur="([^"]*)""#).expect("valid dur regex"))
}

fn attribute(re: &Regex, attrs: &str) -> Option<f64> {
    re.captures(attrs)?.get(1)?.as_str().parse().ok()
}

/// Caption entries in document order. Elements whose text is empty are skipped.
pub fn parse_timed_text(xml: &str) -> Vec<CaptionEntry> {
    text_element_re()
        .captures_iter(xml)
        .filter_map(|captures| {
            let attrs = captures.get(1).map_or("", |m| m.as_str());
            let body = captures.get(2).map_or("", |m| m.as_str());

            // XML escaping on top of HTML escaping, so decode twice before stripping tags
            let text = unescape_html(&unescape_html(body));
            let text = tag_re().replace_all(&text, "").to_string();
            if text.is_empty() {
                return None;
            }

            Some(CaptionEntry {
                text,
                start: attribute(start_re(), attrs).unwrap_or(0.0),
                duration: attribute(dur_re(), attrs).unwrap_or(0.0),
            })
        })
        .collect()
}
