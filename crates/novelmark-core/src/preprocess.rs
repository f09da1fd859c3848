use crate::options::{ConvertOptions, ProjectMeta};
use regex::{Captures, Regex};

const MODIFIER_APOSTROPHE: char = '\u{02BC}';
const RIGHT_SINGLE_QUOTE: char = '\u{2019}';

const ENTITIES: &[(char, &str)] = &[
    // Quotes
    ('\u{2018}', "&lsquo;"),
    ('\u{2019}', "&rsquo;"),
    ('\u{201A}', "&sbquo;"),
    ('\u{201C}', "&ldquo;"),
    ('\u{201D}', "&rdquo;"),
    ('\u{201E}', "&bdquo;"),
    ('\u{00AB}', "&laquo;"),
    ('\u{00BB}', "&raquo;"),
    ('\u{2039}', "&lsaquo;"),
    ('\u{203A}', "&rsaquo;"),
    // Dashes
    ('\u{2010}', "&dash;"),
    ('\u{2013}', "&ndash;"),
    ('\u{2014}', "&mdash;"),
    // Spaces
    ('\u{00A0}', "&nbsp;"),
    ('\u{2002}', "&ensp;"),
    ('\u{2003}', "&emsp;"),
    ('\u{2009}', "&thinsp;"),
    // Symbols
    ('\u{2026}', "&hellip;"),
    ('\u{2022}', "&bull;"),
    ('\u{2032}', "&prime;"),
    ('\u{2033}', "&Prime;"),
    ('\u{00A9}', "&copy;"),
    ('\u{00AE}', "&reg;"),
    ('\u{2122}', "&trade;"),
    ('\u{00B0}', "&deg;"),
    ('\u{00A7}', "&sect;"),
    ('\u{00B6}', "&para;"),
    ('\u{00D7}', "&times;"),
    ('\u{00F7}', "&divide;"),
    ('\u{00B1}', "&plusmn;"),
];

/// Normalises raw document text before tokenization.
///
/// Entity substitution and tab filling happen later, on escaped output.
pub fn preprocess(text: &str, project: &ProjectMeta, options: &ConvertOptions) -> String {
    let mut out = auto_replace(text, project);
    if out.contains(MODIFIER_APOSTROPHE) {
        out = out.replace(MODIFIER_APOSTROPHE, &RIGHT_SINGLE_QUOTE.to_string());
    }
    if !options.keep_markdown {
        out = replace_typography(&out);
    }
    out
}

fn auto_replace(text: &str, project: &ProjectMeta) -> String {
    if project.auto_replace.is_empty() || !text.contains('<') {
        return text.to_string();
    }
    let alternation = project
        .auto_replace
        .keys()
        .map(|key| regex::escape(key))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = match Regex::new(&format!("<({})>", alternation)) {
        Ok(pattern) => pattern,
        Err(err) => {
            log::warn!("auto-replace keys do not form a valid pattern: {}", err);
            return text.to_string();
        }
    };
    pattern
        .replace_all(text, |caps: &Captures| {
            project
                .auto_replace
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn replace_typography(text: &str) -> String {
    text.replace("---", "\u{2014}")
        .replace("--", "\u{2013}")
        .replace("...", "\u{2026}")
}

/// Swaps typographic characters for their named HTML entities.
pub fn replace_unicode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ENTITIES.iter().find(|(needle, _)| *needle == ch) {
            Some((_, entity)) => out.push_str(entity),
            None => out.push(ch),
        }
    }
    out
}
