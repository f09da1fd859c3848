use crate::inline::parse_inline;
use crate::options::{ConvertOptions, DocumentKind};
use crate::token::{Flags, HeadingLevel, Inline, InlineSeq, KeywordKind, Token, TokenKind};

/// Per-document input to [`tokenize`].
#[derive(Clone, Copy, Debug)]
pub struct TokenizeContext<'a> {
    pub handle: &'a str,
    pub kind: DocumentKind,
    /// The document opens the output, so its first page break is dropped.
    pub first: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    /// Footnote definitions in source order, keyed as written.
    pub footnotes: Vec<(String, InlineSeq)>,
    pub markdown: Option<String>,
    pub consumed_first: bool,
}

struct Paragraph {
    raw: String,
    content: InlineSeq,
    flags: Flags,
}

struct Scanner<'o> {
    kind: DocumentKind,
    options: &'o ConvertOptions,
    tokens: Vec<Token>,
    paragraph: Option<Paragraph>,
    heading: u32,
    pending: Flags,
    footnotes: Vec<(String, InlineSeq)>,
    markdown: Vec<String>,
}

pub fn tokenize(text: &str, ctx: &TokenizeContext<'_>, options: &ConvertOptions) -> Tokenized {
    let mut scanner = Scanner {
        kind: ctx.kind,
        options,
        tokens: Vec::new(),
        paragraph: None,
        heading: 0,
        pending: Flags::NONE,
        footnotes: Vec::new(),
        markdown: Vec::new(),
    };
    for line in text.lines() {
        scanner.line(line);
    }
    scanner.flush_paragraph();

    let mut consumed_first = false;
    if ctx.first && !scanner.tokens.is_empty() {
        if let Some(token) = scanner
            .tokens
            .iter_mut()
            .find(|token| token.kind != TokenKind::Empty)
        {
            token.flags.remove(Flags::PAGE_BREAK_BEFORE);
        }
        consumed_first = true;
    }

    log::debug!(
        "tokenized {} into {} tokens, {} headings",
        ctx.handle,
        scanner.tokens.len(),
        scanner.heading
    );

    let markdown = if options.keep_markdown {
        let mut joined = scanner.markdown.join("\n");
        joined.push('\n');
        Some(joined)
    } else {
        None
    };

    Tokenized {
        tokens: scanner.tokens,
        footnotes: scanner.footnotes,
        markdown,
        consumed_first,
    }
}

impl Scanner<'_> {
    fn line(&mut self, line: &str) {
        let line = line.trim_end();
        if line.trim_start().is_empty() {
            self.blank();
            return;
        }

        let command = line.trim().to_ascii_lowercase();
        if command == "[newpage]" || command == "[new page]" {
            self.flush_paragraph();
            self.pending.insert(Flags::PAGE_BREAK_BEFORE);
            return;
        }
        if let Some(count) = vspace_count(&command) {
            self.flush_paragraph();
            for _ in 0..count {
                self.push(Token::new(TokenKind::Skip, self.heading, "", Flags::NONE));
            }
            return;
        }

        if let Some(body) = line.strip_prefix('%') {
            self.flush_paragraph();
            self.comment(line, body);
            return;
        }

        if line.starts_with('@') && self.keyword(line) {
            return;
        }

        if line.starts_with('#') && self.heading(line) {
            return;
        }

        if is_separator(line) {
            self.flush_paragraph();
            self.markdown.push(line.to_string());
            self.push(Token::new(
                TokenKind::Separator,
                self.heading,
                line.trim(),
                Flags::ALIGN_CENTRE,
            ));
            return;
        }

        self.text(line);
    }

    fn blank(&mut self) {
        self.flush_paragraph();
        let after_blank = matches!(
            self.tokens.last(),
            Some(Token {
                kind: TokenKind::Empty,
                ..
            })
        );
        if !after_blank {
            self.markdown.push(String::new());
            self.tokens
                .push(Token::new(TokenKind::Empty, self.heading, "", Flags::NONE));
        }
    }

    fn comment(&mut self, line: &str, body: &str) {
        let trimmed = body.trim_start();
        let lower = trimmed.to_ascii_lowercase();

        if let Some(rest) = prefixed(trimmed, &lower, "synopsis:") {
            self.synopsis(line, rest, false);
        } else if let Some(rest) = prefixed(trimmed, &lower, "short:") {
            self.synopsis(line, rest, true);
        } else if let Some((key, rest)) = footnote_definition(trimmed, &lower) {
            self.markdown.push(line.to_string());
            self.footnotes.push((key, parse_inline(rest)));
        } else {
            if self.options.show_comments {
                self.markdown.push(line.to_string());
            }
            let text = trimmed.trim_end();
            let token = Token::new(TokenKind::Comment, self.heading, text, Flags::NONE)
                .with_content(parse_inline(text));
            self.push(token);
        }
    }

    fn synopsis(&mut self, line: &str, rest: &str, short: bool) {
        if self.options.show_synopsis {
            self.markdown.push(line.to_string());
        }
        let text = rest.trim();
        let token = Token::new(TokenKind::Synopsis { short }, self.heading, text, Flags::NONE)
            .with_content(parse_inline(text));
        self.push(token);
    }

    fn keyword(&mut self, line: &str) -> bool {
        let Some((key, value)) = line[1..].split_once(':') else {
            log::debug!("keyword line without a colon: {:?}", line);
            return false;
        };
        let Some(kind) = KeywordKind::from_key(key) else {
            log::debug!("unknown keyword {:?}", key.trim());
            return false;
        };

        let token_kind = if kind == KeywordKind::Tag {
            let (target, display) = match value.split_once('|') {
                Some((target, display)) => (target, Some(display.trim())),
                None => (value, None),
            };
            let name = target.split(',').next().unwrap_or_default().trim();
            if name.is_empty() {
                return false;
            }
            TokenKind::Tag {
                name: name.to_string(),
                display: display.filter(|d| !d.is_empty()).map(str::to_string),
            }
        } else {
            let values: Vec<String> = value
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();
            if values.is_empty() {
                return false;
            }
            TokenKind::Keyword { kind, values }
        };

        self.flush_paragraph();
        if self.options.show_keywords {
            self.markdown.push(line.to_string());
        }
        self.push(Token::new(token_kind, self.heading, line, Flags::NONE));
        true
    }

    fn heading(&mut self, line: &str) -> bool {
        let novel = self.kind.is_novel();
        let (kind, text, flags) = if let Some(text) = line.strip_prefix("#! ") {
            (
                TokenKind::Title,
                text,
                Flags::ALIGN_CENTRE | Flags::PAGE_BREAK_BEFORE,
            )
        } else if let Some(text) = line.strip_prefix("##! ") {
            if novel {
                (TokenKind::Unnumbered, text, Flags::PAGE_BREAK_BEFORE)
            } else {
                (TokenKind::Heading(HeadingLevel::H2), text, Flags::NONE)
            }
        } else {
            let depth = line.chars().take_while(|&c| c == '#').count();
            let Some(level) = HeadingLevel::from_depth(depth) else {
                return false;
            };
            let Some(text) = line[depth..].strip_prefix(' ') else {
                return false;
            };
            let flags = match (novel, level) {
                (true, HeadingLevel::H1) => Flags::ALIGN_CENTRE | Flags::PAGE_BREAK_BEFORE,
                (true, HeadingLevel::H2) => Flags::PAGE_BREAK_BEFORE,
                _ => Flags::NONE,
            };
            (TokenKind::Heading(level), text, flags)
        };

        self.flush_paragraph();
        self.heading += 1;
        self.markdown.push(line.to_string());
        self.push(Token::new(kind, self.heading, text.trim(), flags));
        true
    }

    fn text(&mut self, line: &str) {
        self.markdown.push(line.to_string());
        let (body, flags) = alignment(line);
        let content = parse_inline(body);

        if let Some(paragraph) = self.paragraph.as_mut() {
            paragraph.raw.push('\n');
            paragraph.raw.push_str(body);
            paragraph.content.push(Inline::LineBreak);
            paragraph.content.extend(content);
            return;
        }

        let mut flags = flags;
        flags.insert(self.pending);
        self.pending = Flags::NONE;
        self.paragraph = Some(Paragraph {
            raw: body.to_string(),
            content,
            flags,
        });
    }

    fn flush_paragraph(&mut self) {
        if let Some(paragraph) = self.paragraph.take() {
            let token = Token::new(TokenKind::Text, self.heading, paragraph.raw, paragraph.flags)
                .with_content(paragraph.content);
            self.tokens.push(token);
        }
    }

    fn push(&mut self, mut token: Token) {
        token.flags.insert(self.pending);
        self.pending = Flags::NONE;
        self.tokens.push(token);
    }
}

fn prefixed<'a>(text: &'a str, lower: &str, prefix: &str) -> Option<&'a str> {
    if lower.starts_with(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}

fn footnote_definition<'a>(text: &'a str, lower: &str) -> Option<(String, &'a str)> {
    prefixed(text, lower, "footnote.")?;
    let rest = &text["footnote.".len()..];
    let (key, body) = rest.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), body.trim()))
}

const MAX_VSPACE: usize = 200;

fn vspace_count(command: &str) -> Option<usize> {
    if command == "[vspace]" {
        return Some(1);
    }
    let count = command.strip_prefix("[vspace:")?.strip_suffix(']')?;
    match count.trim().parse::<usize>() {
        Ok(count) if count > MAX_VSPACE => {
            log::debug!("vspace count {} clamped to {}", count, MAX_VSPACE);
            Some(MAX_VSPACE)
        }
        Ok(count) if count > 0 => Some(count),
        _ => None,
    }
}

fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.chars().filter(|&c| c == '*').count() >= 3
        && trimmed.chars().all(|c| c == '*' || c == ' ')
}

fn alignment(line: &str) -> (&str, Flags) {
    let mut body = line;
    let mut flags = Flags::NONE;

    let right = body.starts_with(">>");
    let left = body.ends_with("<<") && body.len() > 2;
    if right {
        body = &body[2..];
    } else if body.starts_with('>') {
        body = &body[1..];
        flags.insert(Flags::INDENT_LEFT);
    }
    if left {
        body = &body[..body.len() - 2];
    } else if body.ends_with('<') && !body.ends_with("\\<") {
        body = &body[..body.len() - 1];
        flags.insert(Flags::INDENT_RIGHT);
    }

    match (right, left) {
        (true, true) => flags.insert(Flags::ALIGN_CENTRE),
        (true, false) => flags.insert(Flags::ALIGN_RIGHT),
        (false, true) => flags.insert(Flags::ALIGN_LEFT),
        (false, false) => {}
    }

    if flags.is_empty() {
        (line, flags)
    } else {
        (body.trim(), flags)
    }
}
