use crate::token::{Inline, InlineSeq};
use fancy_regex::Regex;
use once_cell::sync::Lazy;

static STRONG: Lazy<Regex> =
    Lazy::new(|| compile(r"(?<![\w\\])(\*{2})(?![\s\*])(.+?)(?<![\s\\])(\1)(?!\w)"));
static EMPH: Lazy<Regex> =
    Lazy::new(|| compile(r"(?<![\w\\])(_)(?![\s_])(.+?)(?<![\s\\])(\1)(?!\w)"));
static STRIKE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?<![\w\\])(~{2})(?![\s~])(.+?)(?<![\s\\])(\1)(?!\w)"));
static SHORTCODE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)(?<!\\)(\[/?(?:b|i|s|u|m|sup|sub)\])"));
static FOOTNOTE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?<!\\)(\[(?i:footnote):)(.+?)(?<!\\)(\])"));

const ESCAPABLE: [char; 8] = ['\\', '*', '_', '~', '[', ']', '<', '>'];

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("inline format pattern compiles")
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Style {
    Strong,
    Emph,
    Strike,
    Underline,
    Mark,
    Superscript,
    Subscript,
}

#[derive(Clone, Debug)]
enum MarkerKind {
    Open(Style),
    Close(Style),
    Footnote(String),
}

#[derive(Clone, Debug)]
struct Marker {
    start: usize,
    end: usize,
    kind: MarkerKind,
}

impl Marker {
    fn priority(&self) -> u8 {
        match self.kind {
            MarkerKind::Footnote(_) => 0,
            _ => 1,
        }
    }
}

struct Frame {
    style: Option<Style>,
    children: InlineSeq,
}

impl Frame {
    fn open(style: Style) -> Self {
        Self {
            style: Some(style),
            children: Vec::new(),
        }
    }
}

/// Parses one line of text into a nested inline sequence.
pub fn parse_inline(text: &str) -> InlineSeq {
    let markers = collect_markers(text);
    build_tree(text, &markers)
}

fn collect_markers(text: &str) -> Vec<Marker> {
    let mut markers = Vec::new();

    let paired = [
        (&*STRONG, Style::Strong),
        (&*EMPH, Style::Emph),
        (&*STRIKE, Style::Strike),
    ];
    for (pattern, style) in paired {
        for caps in pattern.captures_iter(text) {
            let caps = match caps {
                Ok(caps) => caps,
                Err(err) => {
                    log::debug!("inline pattern gave up on {:?}: {}", text, err);
                    break;
                }
            };
            if let (Some(open), Some(close)) = (caps.get(1), caps.get(3)) {
                markers.push(Marker {
                    start: open.start(),
                    end: open.end(),
                    kind: MarkerKind::Open(style),
                });
                markers.push(Marker {
                    start: close.start(),
                    end: close.end(),
                    kind: MarkerKind::Close(style),
                });
            }
        }
    }

    for caps in SHORTCODE.captures_iter(text) {
        let Ok(caps) = caps else { break };
        let Some(code) = caps.get(1) else { continue };
        if let Some(kind) = shortcode_kind(code.as_str()) {
            markers.push(Marker {
                start: code.start(),
                end: code.end(),
                kind,
            });
        }
    }

    for caps in FOOTNOTE.captures_iter(text) {
        let Ok(caps) = caps else { break };
        if let (Some(whole), Some(key)) = (caps.get(0), caps.get(2)) {
            markers.push(Marker {
                start: whole.start(),
                end: whole.end(),
                kind: MarkerKind::Footnote(key.as_str().trim().to_string()),
            });
        }
    }

    markers.sort_by_key(|marker| (marker.start, marker.priority()));
    let mut accepted: Vec<Marker> = Vec::with_capacity(markers.len());
    let mut last_end = 0;
    for marker in markers {
        if marker.start < last_end {
            continue;
        }
        last_end = marker.end;
        accepted.push(marker);
    }
    accepted
}

fn shortcode_kind(code: &str) -> Option<MarkerKind> {
    let code = code.to_ascii_lowercase();
    let inner = code.trim_start_matches('[').trim_end_matches(']');
    let (closing, name) = match inner.strip_prefix('/') {
        Some(name) => (true, name),
        None => (false, inner),
    };
    let style = match name {
        "b" => Style::Strong,
        "i" => Style::Emph,
        "s" => Style::Strike,
        "u" => Style::Underline,
        "m" => Style::Mark,
        "sup" => Style::Superscript,
        "sub" => Style::Subscript,
        _ => return None,
    };
    Some(if closing {
        MarkerKind::Close(style)
    } else {
        MarkerKind::Open(style)
    })
}

fn build_tree(text: &str, markers: &[Marker]) -> InlineSeq {
    let mut stack = vec![Frame {
        style: None,
        children: Vec::new(),
    }];
    let mut cursor = 0usize;

    for marker in markers {
        if marker.start > cursor {
            push_text(&mut stack, &text[cursor..marker.start]);
        }
        cursor = marker.end;
        match &marker.kind {
            MarkerKind::Open(style) => stack.push(Frame::open(*style)),
            MarkerKind::Close(style) => close_style(&mut stack, *style),
            MarkerKind::Footnote(key) => {
                if let Some(top) = stack.last_mut() {
                    top.children.push(Inline::FootnoteRef(key.clone()));
                }
            }
        }
    }
    if cursor < text.len() {
        push_text(&mut stack, &text[cursor..]);
    }

    // Unclosed markers end with the line.
    while stack.len() > 1 {
        pop_frame(&mut stack);
    }
    stack.pop().map(|frame| frame.children).unwrap_or_default()
}

fn close_style(stack: &mut Vec<Frame>, style: Style) {
    let depth = match stack.iter().rposition(|frame| frame.style == Some(style)) {
        Some(depth) if depth > 0 => depth,
        _ => {
            log::debug!("dropping closing {:?} marker without an opener", style);
            return;
        }
    };
    // Frames opened inside the closed one are split and reopened after it.
    let mut reopen = Vec::new();
    while stack.len() > depth + 1 {
        if let Some(inner) = stack.last().and_then(|frame| frame.style) {
            reopen.push(inner);
        }
        pop_frame(stack);
    }
    pop_frame(stack);
    for inner in reopen.into_iter().rev() {
        stack.push(Frame::open(inner));
    }
}

fn pop_frame(stack: &mut Vec<Frame>) {
    if stack.len() <= 1 {
        return;
    }
    let Some(frame) = stack.pop() else { return };
    if frame.children.is_empty() {
        return;
    }
    let node = match frame.style {
        Some(Style::Strong) => Inline::Strong(frame.children),
        Some(Style::Emph) => Inline::Emph(frame.children),
        Some(Style::Strike) => Inline::Strikethrough(frame.children),
        Some(Style::Underline) => Inline::Underline(frame.children),
        Some(Style::Mark) => Inline::Mark(frame.children),
        Some(Style::Superscript) => Inline::Superscript(frame.children),
        Some(Style::Subscript) => Inline::Subscript(frame.children),
        None => return,
    };
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

fn push_text(stack: &mut [Frame], raw: &str) {
    let text = strip_escape(raw);
    if text.is_empty() {
        return;
    }
    let Some(top) = stack.last_mut() else { return };
    if let Some(Inline::Text(prev)) = top.children.last_mut() {
        prev.push_str(&text);
    } else {
        top.children.push(Inline::Text(text));
    }
}

/// Drops a backslash that escapes a marker character; other backslashes are
/// kept as typed.
pub(crate) fn strip_escape(text: &str) -> String {
    if !text.contains('\\') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(&next) = chars.peek() {
                if ESCAPABLE.contains(&next) {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{parse_inline, strip_escape};
    use crate::token::Inline;

    fn text(value: &str) -> Inline {
        Inline::Text(value.to_string())
    }

    #[test]
    fn plain_text_is_one_node() {
        assert_eq!(parse_inline("Just words."), vec![text("Just words.")]);
    }

    #[test]
    fn markdown_markers_nest() {
        let parsed = parse_inline("a **b _c_ d** e");
        assert_eq!(
            parsed,
            vec![
                text("a "),
                Inline::Strong(vec![text("b "), Inline::Emph(vec![text("c")]), text(" d")]),
                text(" e"),
            ]
        );
    }

    #[test]
    fn crossing_shortcodes_are_split() {
        let parsed = parse_inline("[b]one [i]two[/b] three[/i]");
        assert_eq!(
            parsed,
            vec![
                Inline::Strong(vec![text("one "), Inline::Emph(vec![text("two")])]),
                Inline::Emph(vec![text(" three")]),
            ]
        );
    }

    #[test]
    fn unmatched_closer_is_dropped_and_opener_runs_to_end() {
        assert_eq!(parse_inline("a[/b] b"), vec![text("a b")]);
        assert_eq!(
            parse_inline("[sup]up"),
            vec![Inline::Superscript(vec![text("up")])]
        );
    }

    #[test]
    fn footnote_markers_carry_keys() {
        let parsed = parse_inline("See[footnote:ab_cd_ef] here");
        assert_eq!(
            parsed,
            vec![
                text("See"),
                Inline::FootnoteRef("ab_cd_ef".to_string()),
                text(" here"),
            ]
        );
    }

    #[test]
    fn escaped_markers_stay_literal() {
        assert_eq!(
            parse_inline("x \\**_y_** z"),
            vec![text("x **"), Inline::Emph(vec![text("y")]), text("** z")]
        );
        assert_eq!(parse_inline("\\[b]no[/b]"), vec![text("[b]no")]);
    }

    #[test]
    fn word_boundaries_block_underscores() {
        assert_eq!(parse_inline("snake_case_name"), vec![text("snake_case_name")]);
    }

    #[test]
    fn strip_escape_only_drops_marker_escapes() {
        assert_eq!(strip_escape("a\\\\b\\*c\\[d\\]"), "a\\b*c[d]");
        assert_eq!(strip_escape("C:\\Users\\me"), "C:\\Users\\me");
        assert_eq!(strip_escape("trailing\\"), "trailing\\");
        assert_eq!(strip_escape("\\<kept\\>"), "<kept>");
    }
}
