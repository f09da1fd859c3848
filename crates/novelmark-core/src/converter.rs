use crate::emit::{EmitContext, emit_tokens, render_inlines};
use crate::footnotes::FootnoteRegistry;
use crate::options::{ConvertOptions, DocumentKind, ProjectMeta, SourceDocument};
use crate::preprocess::preprocess;
use crate::token::Token;
use crate::tokenizer::{TokenizeContext, tokenize};

/// Converts documents to HTML fragments and accumulates them for a build.
///
/// One converter covers one build: call [`HtmlConverter::convert_document`]
/// per chapter in output order, then [`HtmlConverter::append_footnotes`] once
/// at the end. Footnotes, the first-page state and all results persist until
/// [`HtmlConverter::reset`].
#[derive(Debug)]
pub struct HtmlConverter {
    project: ProjectMeta,
    options: ConvertOptions,
    footnotes: FootnoteRegistry,
    first_page: bool,
    result: String,
    full_html: Vec<String>,
    markdown: Vec<String>,
}

impl HtmlConverter {
    pub fn new(project: ProjectMeta, options: ConvertOptions) -> Self {
        Self {
            project,
            options,
            footnotes: FootnoteRegistry::new(),
            first_page: true,
            result: String::new(),
            full_html: Vec::new(),
            markdown: Vec::new(),
        }
    }

    pub fn project(&self) -> &ProjectMeta {
        &self.project
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Runs the full pipeline on one document and returns its HTML.
    pub fn convert_document(&mut self, doc: &SourceDocument<'_>) -> &str {
        let text = preprocess(doc.text, &self.project, &self.options);
        let tokens = self.tokenize(&SourceDocument {
            handle: doc.handle,
            kind: doc.kind,
            text: &text,
        });
        self.convert_tokens(doc.handle, doc.kind, &tokens)
    }

    /// Tokenizes text that has already been preprocessed.
    ///
    /// Footnote definitions are registered under the document handle and the
    /// first-page state is consumed once a document yields any token.
    pub fn tokenize(&mut self, doc: &SourceDocument<'_>) -> Vec<Token> {
        let ctx = TokenizeContext {
            handle: doc.handle,
            kind: doc.kind,
            first: self.first_page,
        };
        let out = tokenize(doc.text, &ctx, &self.options);
        if out.consumed_first {
            self.first_page = false;
        }
        for (key, body) in out.footnotes {
            self.footnotes.define(doc.handle, &key, body);
        }
        if let Some(markdown) = out.markdown {
            self.markdown.push(markdown);
        }
        out.tokens
    }

    /// Renders tokens, replacing the current result and recording it as a
    /// new chapter entry.
    pub fn convert_tokens(&mut self, handle: &str, kind: DocumentKind, tokens: &[Token]) -> &str {
        let ctx = EmitContext {
            handle,
            kind,
            options: &self.options,
        };
        let notes = &mut self.footnotes;
        let mut resolve = |key: &str| notes.reference(handle, key);
        let html = emit_tokens(&ctx, tokens, &mut resolve);

        log::debug!("converted {} into {} bytes of HTML", handle, html.len());
        self.full_html.push(html.clone());
        self.result = html;
        &self.result
    }

    /// Appends the footnote list to the current result and as its own
    /// chapter entry.
    ///
    /// Does nothing when no footnote was referenced. Each call appends a new
    /// block, so call it once per build.
    pub fn append_footnotes(&mut self) -> &str {
        if !self.footnotes.has_references() {
            return &self.result;
        }
        let mut block = String::from("<h3>Footnotes</h3>\n<ol>\n");
        for (index, handle, body) in self.footnotes.entries() {
            let notes = &self.footnotes;
            let mut resolve = |key: &str| notes.index_of(handle, key);
            block.push_str(&format!(
                "<li id='footnote_{}'><p>{}</p></li>\n",
                index,
                render_inlines(body, &self.options, &mut resolve)
            ));
        }
        block.push_str("</ol>\n");

        self.result.push_str(&block);
        self.full_html.push(block);
        &self.result
    }

    /// Rewrites tabs in every accumulated chapter.
    pub fn replace_tabs(&mut self, count: usize, fill: &str) {
        let expansion = fill.repeat(count);
        for chapter in &mut self.full_html {
            if chapter.contains('\t') {
                *chapter = chapter.replace('\t', &expansion);
            }
        }
        if self.result.contains('\t') {
            self.result = self.result.replace('\t', &expansion);
        }
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn full_html(&self) -> &[String] {
        &self.full_html
    }

    /// Total number of characters across all accumulated chapters.
    pub fn full_result_size(&self) -> usize {
        self.full_html.iter().map(|html| html.chars().count()).sum()
    }

    /// Markdown retained per document when `keep_markdown` is set.
    pub fn all_markdown(&self) -> &[String] {
        &self.markdown
    }

    pub fn reset(&mut self) {
        self.footnotes.clear();
        self.first_page = true;
        self.result.clear();
        self.full_html.clear();
        self.markdown.clear();
    }
}
