use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Conversion settings, fixed for the lifetime of a converter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConvertOptions {
    pub link_headings: bool,
    pub styles: bool,
    pub justify: bool,
    pub keep_markdown: bool,
    pub replace_unicode: bool,
    pub show_comments: bool,
    pub show_synopsis: bool,
    pub show_keywords: bool,
    pub tabs: Option<TabReplacement>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            link_headings: false,
            styles: true,
            justify: false,
            keep_markdown: false,
            replace_unicode: false,
            show_comments: false,
            show_synopsis: false,
            show_keywords: false,
            tabs: None,
        }
    }
}

impl ConvertOptions {
    pub fn with_link_headings(mut self, value: bool) -> Self {
        self.link_headings = value;
        self
    }

    pub fn with_styles(mut self, value: bool) -> Self {
        self.styles = value;
        self
    }

    pub fn with_justify(mut self, value: bool) -> Self {
        self.justify = value;
        self
    }

    pub fn with_keep_markdown(mut self, value: bool) -> Self {
        self.keep_markdown = value;
        self
    }

    pub fn with_replace_unicode(mut self, value: bool) -> Self {
        self.replace_unicode = value;
        self
    }

    pub fn with_comments(mut self, value: bool) -> Self {
        self.show_comments = value;
        self
    }

    pub fn with_synopsis(mut self, value: bool) -> Self {
        self.show_synopsis = value;
        self
    }

    pub fn with_keywords(mut self, value: bool) -> Self {
        self.show_keywords = value;
        self
    }

    pub fn with_tabs(mut self, count: usize, fill: impl Into<String>) -> Self {
        self.tabs = Some(TabReplacement {
            count,
            fill: fill.into(),
        });
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabReplacement {
    pub count: usize,
    pub fill: String,
}

impl TabReplacement {
    pub fn expansion(&self) -> String {
        self.fill.repeat(self.count)
    }
}

/// Read-only project data the converter needs for anchors and metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectMeta {
    pub name: String,
    pub author: String,
    pub auto_replace: BTreeMap<String, String>,
}

impl ProjectMeta {
    pub fn new(name: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
            auto_replace: BTreeMap::new(),
        }
    }

    pub fn with_replacement(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.auto_replace.insert(key.into(), value.into());
        self
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    #[default]
    Novel,
    Note,
}

impl DocumentKind {
    pub fn is_novel(self) -> bool {
        matches!(self, Self::Novel)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SourceDocument<'a> {
    pub handle: &'a str,
    pub kind: DocumentKind,
    pub text: &'a str,
}

impl<'a> SourceDocument<'a> {
    pub fn novel(handle: &'a str, text: &'a str) -> Self {
        Self {
            handle,
            kind: DocumentKind::Novel,
            text,
        }
    }

    pub fn note(handle: &'a str, text: &'a str) -> Self {
        Self {
            handle,
            kind: DocumentKind::Note,
            text,
        }
    }
}
