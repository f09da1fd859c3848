mod converter;
mod emit;
mod escape;
mod footnotes;
mod inline;
mod options;
mod preprocess;
mod runs;
mod token;
mod tokenizer;

pub use converter::HtmlConverter;
pub use emit::{EmitContext, ResolveFootnote, emit_tokens, render_inlines, style_attr};
pub use escape::{escape_attr, escape_html};
pub use footnotes::FootnoteRegistry;
pub use inline::parse_inline;
pub use options::{ConvertOptions, DocumentKind, ProjectMeta, SourceDocument, TabReplacement};
pub use preprocess::{preprocess, replace_unicode};
pub use runs::{MetaRun, classify};
pub use token::{Flags, HeadingLevel, Inline, InlineSeq, KeywordKind, Token, TokenKind};
pub use tokenizer::{TokenizeContext, Tokenized, tokenize};
