use crate::core::CaptionEntry;

pub fn join_entries(entries: &[CaptionEntry]) -> String {
    entries
        .iter()
        .map(|e| e.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keeps the first `max_words` whitespace-separated words, joined by single spaces.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decodes named and numeric HTML entities, the full HTML5 table.
pub fn unescape_html(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_entries() {
        let entries = vec![
            CaptionEntry::new("Hello", 0.0, 1.5),
            CaptionEntry::new("world", 1.5, 2.0),
        ];
        assert_eq!(join_entries(&entries), "Hello\nworld");
        assert_eq!(join_entries(&[]), "");
    }

    #[test]
    fn test_truncate_words() {
        assert_eq!(truncate_words("Bonjour\nle   monde entier", 3), "Bonjour le monde");
        assert_eq!(truncate_words("court", 50), "court");
        assert_eq!(truncate_words("", 5), "");
    }

    #[test]
    fn test_unescape_html() {
        assert_eq!(unescape_html("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(unescape_html("l&#39;eau &quot;froide&quot;"), "l'eau \"froide\"");
        assert_eq!(unescape_html("&lt;b&gt;"), "<b>");
        assert_eq!(unescape_html("caf&#xE9;"), "café");
        assert_eq!(unescape_html("a & b"), "a & b");
    }

    #[test]
    fn test_unescape_named_accents() {
        assert_eq!(unescape_html("caf&eacute; &hellip; &rsquo;"), "café … \u{2019}");
        assert_eq!(unescape_html("d&eacute;j&agrave; l&agrave;"), "déjà là");
    }
}
