//! Text helpers for notice display.

/// Unescape the HTML entities upstream sources leave in notice text.
///
/// `&amp;` is replaced last so `&amp;lt;` decodes to `&lt;`, not `<`.
pub fn unescape_html(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_html() {
        assert_eq!(unescape_html("RWY 07R"), "RWY 07R");
        assert_eq!(unescape_html("RWY 07R &amp; 25L"), "RWY 07R & 25L");
        assert_eq!(unescape_html("&lt;E&gt; &quot;X&quot; &#39;Y&#x27;"), "<E> \"X\" 'Y'");
    }

    #[test]
    fn test_unescape_amp_is_not_decoded_twice() {
        assert_eq!(unescape_html("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_unescape_leaves_unknown_entities() {
        assert_eq!(unescape_html("A & B &bogus; &#0; C"), "A & B &bogus; &#0; C");
    }
}
