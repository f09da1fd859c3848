/// Escapes markup characters in body text.
///
/// Every `&`, `<` and `>` is escaped, including ones that already look like
/// a character reference, so text reads back exactly as it was typed.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes a value placed inside a single-quoted attribute.
pub fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{escape_attr, escape_html};

    #[test]
    fn escapes_every_markup_character() {
        assert_eq!(escape_html("a < b > c & d"), "a &lt; b &gt; c &amp; d");
        assert_eq!(
            escape_html("x&ndash;y &#8230; &lt;b&gt;"),
            "x&amp;ndash;y &amp;#8230; &amp;lt;b&amp;gt;"
        );
        assert_eq!(escape_html("AT&amp;T rocks &;"), "AT&amp;amp;T rocks &amp;;");
        assert_eq!(escape_html("fish & chips; done"), "fish &amp; chips; done");
    }

    #[test]
    fn attributes_escape_quotes() {
        assert_eq!(escape_attr("O'Neil & \"Co\""), "O&#39;Neil &amp; &quot;Co&quot;");
    }
}
