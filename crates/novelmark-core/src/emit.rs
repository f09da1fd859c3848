use crate::escape::{escape_attr, escape_html};
use crate::options::{ConvertOptions, DocumentKind};
use crate::preprocess::replace_unicode;
use crate::runs::{MetaRun, classify};
use crate::token::{Flags, HeadingLevel, Inline, KeywordKind, Token, TokenKind};

/// Maps a footnote key to its display index, if it has one.
pub type ResolveFootnote<'a> = dyn FnMut(&str) -> Option<usize> + 'a;

#[derive(Clone, Copy, Debug)]
pub struct EmitContext<'a> {
    pub handle: &'a str,
    pub kind: DocumentKind,
    pub options: &'a ConvertOptions,
}

struct HtmlWriter {
    out: String,
}

impl HtmlWriter {
    fn new() -> Self {
        Self { out: String::new() }
    }

    fn line(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Renders a token sequence into HTML fragments, one line per visible token.
pub fn emit_tokens(
    ctx: &EmitContext<'_>,
    tokens: &[Token],
    resolve: &mut ResolveFootnote<'_>,
) -> String {
    let runs = classify(tokens);
    let mut writer = HtmlWriter::new();
    for (token, run) in tokens.iter().zip(runs) {
        emit_token(&mut writer, ctx, token, run, resolve);
    }
    writer.finish()
}

fn emit_token(
    writer: &mut HtmlWriter,
    ctx: &EmitContext<'_>,
    token: &Token,
    run: Option<MetaRun>,
    resolve: &mut ResolveFootnote<'_>,
) {
    let options = ctx.options;
    let style = style_attr(token.flags, run, options.styles);
    match &token.kind {
        TokenKind::Empty => {}
        TokenKind::Title | TokenKind::Heading(_) | TokenKind::Unnumbered => {
            let Some((tag, title)) = heading_tag(&token.kind, ctx.kind) else {
                return;
            };
            let class = if title { " class='title'" } else { "" };
            let anchor = if options.link_headings {
                format!(
                    "<a name='{}:T{:04}'></a>",
                    escape_attr(ctx.handle),
                    token.heading
                )
            } else {
                String::new()
            };
            writer.line(&format!(
                "<{tag}{class}{style}>{anchor}{}</{tag}>",
                encode_text(&token.raw, options)
            ));
        }
        TokenKind::Separator => {
            writer.line(&format!(
                "<p class='sep'{}>{}</p>",
                style,
                encode_text(&token.raw, options)
            ));
        }
        TokenKind::Skip => {
            writer.line(&format!("<p class='skip'{}>&nbsp;</p>", style));
        }
        TokenKind::Text => {
            writer.line(&format!(
                "<p{}>{}</p>",
                style,
                render_inlines(&token.content, options, resolve)
            ));
        }
        TokenKind::Comment => {
            if options.show_comments {
                writer.line(&format!(
                    "<p class='comment'{}><strong>Comment:</strong> {}</p>",
                    style,
                    render_inlines(&token.content, options, resolve)
                ));
            }
        }
        TokenKind::Synopsis { short } => {
            if options.show_synopsis {
                let label = if *short {
                    "Short Description"
                } else {
                    "Synopsis"
                };
                writer.line(&format!(
                    "<p class='synopsis'{}><strong>{}:</strong> {}</p>",
                    style,
                    label,
                    render_inlines(&token.content, options, resolve)
                ));
            }
        }
        TokenKind::Keyword { kind, values } => {
            if options.show_keywords {
                let links = values
                    .iter()
                    .map(|value| {
                        format!(
                            "<a class='tag' href='#tag_{}'>{}</a>",
                            escape_attr(value),
                            encode_text(value, options)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                writer.line(&format!(
                    "<p class='meta meta-{}'{}>{} {}</p>",
                    kind.key(),
                    style,
                    keyword_label(*kind),
                    links
                ));
            }
        }
        TokenKind::Tag { name, display } => {
            if options.show_keywords {
                let mut body = format!(
                    "<a class='tag' name='tag_{}'>{}</a>",
                    escape_attr(name),
                    encode_text(name, options)
                );
                if let Some(display) = display {
                    body.push_str(&format!(
                        " | <span class='optional'>{}</span>",
                        encode_text(display, options)
                    ));
                }
                writer.line(&format!(
                    "<p class='meta meta-tag'{}>{} {}</p>",
                    style,
                    keyword_label(KeywordKind::Tag),
                    body
                ));
            }
        }
    }
}

fn keyword_label(kind: KeywordKind) -> String {
    format!("<span class='keyword'>{}:</span>", kind.label())
}

/// HTML tag and title-class flag for a heading token.
fn heading_tag(kind: &TokenKind, doc: DocumentKind) -> Option<(&'static str, bool)> {
    let novel = doc.is_novel();
    let tag = match (kind, novel) {
        (TokenKind::Title, _) => return Some(("h1", true)),
        (TokenKind::Heading(HeadingLevel::H1), true) => return Some(("h1", true)),
        (TokenKind::Heading(HeadingLevel::H1), false) => "h1",
        (TokenKind::Heading(HeadingLevel::H2), true) | (TokenKind::Unnumbered, true) => "h1",
        (TokenKind::Heading(HeadingLevel::H2), false) | (TokenKind::Unnumbered, false) => "h2",
        (TokenKind::Heading(HeadingLevel::H3), true) => "h2",
        (TokenKind::Heading(HeadingLevel::H3), false) => "h3",
        (TokenKind::Heading(HeadingLevel::H4), true) => "h3",
        (TokenKind::Heading(HeadingLevel::H4), false) => "h4",
        _ => return None,
    };
    Some((tag, false))
}

/// Builds the ` style='…'` attribute, or nothing when styles are off or no
/// declaration applies.
pub fn style_attr(flags: Flags, run: Option<MetaRun>, styles: bool) -> String {
    if !styles {
        return String::new();
    }
    let mut decls: Vec<&str> = Vec::new();

    if flags.contains(Flags::ALIGN_LEFT) {
        decls.push("text-align: left;");
    } else if flags.contains(Flags::ALIGN_RIGHT) {
        decls.push("text-align: right;");
    } else if flags.contains(Flags::ALIGN_CENTRE) {
        decls.push("text-align: center;");
    } else if flags.contains(Flags::ALIGN_JUSTIFY) {
        decls.push("text-align: justify;");
    }

    if flags.contains(Flags::PAGE_BREAK_BEFORE) {
        decls.push("page-break-before: always;");
    }
    if flags.contains(Flags::PAGE_BREAK_AFTER) {
        decls.push("page-break-after: always;");
    }

    if let Some(run) = run {
        if run.continues_after() {
            decls.push("margin-bottom: 0;");
        }
        if run.continues_before() {
            decls.push("margin-top: 0;");
        }
    }

    if flags.contains(Flags::INDENT_LEFT) {
        decls.push("margin-left: 40px;");
    }
    if flags.contains(Flags::INDENT_RIGHT) {
        decls.push("margin-right: 40px;");
    }

    if decls.is_empty() {
        String::new()
    } else {
        format!(" style='{}'", decls.join(" "))
    }
}

/// Escapes user text, then applies entity substitution and tab filling.
fn encode_text(text: &str, options: &ConvertOptions) -> String {
    let mut out = escape_html(text);
    if options.replace_unicode {
        out = replace_unicode(&out);
    }
    if let Some(tabs) = &options.tabs {
        out = out.replace('\t', &tabs.expansion());
    }
    out
}

/// Renders an inline tree to HTML.
pub fn render_inlines(
    inlines: &[Inline],
    options: &ConvertOptions,
    resolve: &mut ResolveFootnote<'_>,
) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(&encode_text(text, options)),
            Inline::LineBreak => out.push_str("<br>"),
            Inline::Strong(children) => {
                wrap(&mut out, "<strong>", "</strong>", children, options, resolve)
            }
            Inline::Emph(children) => wrap(&mut out, "<em>", "</em>", children, options, resolve),
            Inline::Strikethrough(children) => {
                wrap(&mut out, "<del>", "</del>", children, options, resolve)
            }
            Inline::Underline(children) => {
                if options.styles {
                    wrap(
                        &mut out,
                        "<span style='text-decoration: underline;'>",
                        "</span>",
                        children,
                        options,
                        resolve,
                    )
                } else {
                    wrap(&mut out, "<u>", "</u>", children, options, resolve)
                }
            }
            Inline::Mark(children) => {
                wrap(&mut out, "<mark>", "</mark>", children, options, resolve)
            }
            Inline::Superscript(children) => {
                wrap(&mut out, "<sup>", "</sup>", children, options, resolve)
            }
            Inline::Subscript(children) => {
                wrap(&mut out, "<sub>", "</sub>", children, options, resolve)
            }
            Inline::FootnoteRef(key) => match resolve(key.as_str()) {
                Some(index) => out.push_str(&format!(
                    "<sup><a href='#footnote_{index}'>{index}</a></sup>"
                )),
                None => out.push_str("<sup>ERR</sup>"),
            },
        }
    }
    out
}

fn wrap(
    out: &mut String,
    open: &str,
    close: &str,
    children: &[Inline],
    options: &ConvertOptions,
    resolve: &mut ResolveFootnote<'_>,
) {
    out.push_str(open);
    out.push_str(&render_inlines(children, options, resolve));
    out.push_str(close);
}
