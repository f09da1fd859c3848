use std::fs;
use std::path::{Path, PathBuf};

use novelmark_core::{ConvertOptions, HtmlConverter, escape_html};
use serde::{Deserialize, Serialize};

mod json;

pub use json::{BuildMeta, HtmlJson, HtmlText};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Body typography used by the stylesheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleOptions {
    pub text_font: String,
    /// Point size of body text.
    pub text_size: u32,
    /// Line height in percent.
    pub line_height: u32,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            text_font: "serif".to_string(),
            text_size: 12,
            line_height: 150,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Renderer {
    styles: bool,
    justify: bool,
    style: StyleOptions,
}

impl Renderer {
    pub fn new(options: &ConvertOptions) -> Self {
        Self {
            styles: options.styles,
            justify: options.justify,
            style: StyleOptions::default(),
        }
    }

    pub fn with_style(mut self, style: StyleOptions) -> Self {
        self.style = style;
        self
    }

    /// CSS rules for the document, or none when styles are off.
    pub fn stylesheet(&self) -> Vec<String> {
        if !self.styles {
            return Vec::new();
        }
        let align = if self.justify { "justify" } else { "left" };
        vec![
            format!(
                "body {{font-family: '{}'; font-size: {}pt;}}",
                self.style.text_font, self.style.text_size
            ),
            format!(
                "p {{text-align: {}; line-height: {}%; margin-top: 0.5em; margin-bottom: 0.5em;}}",
                align, self.style.line_height
            ),
            "h1 {color: rgb(66, 113, 174); page-break-after: avoid;}".to_string(),
            "h2 {color: rgb(66, 113, 174); page-break-after: avoid;}".to_string(),
            "h3 {color: rgb(50, 50, 50); page-break-after: avoid;}".to_string(),
            "h4 {color: rgb(50, 50, 50); page-break-after: avoid;}".to_string(),
            "a {color: rgb(66, 113, 174);}".to_string(),
            "mark {background: rgb(255, 255, 166);}".to_string(),
            ".keyword {color: rgb(245, 135, 31); font-weight: bold;}".to_string(),
            ".tag {color: rgb(66, 113, 174); font-weight: bold;}".to_string(),
            ".optional {color: rgb(66, 113, 174); font-style: italic;}".to_string(),
            ".sep {text-align: center; margin-top: 1em; margin-bottom: 1em;}".to_string(),
            ".skip {margin: 0;}".to_string(),
            ".synopsis {font-style: italic;}".to_string(),
            ".comment {font-style: italic; color: rgb(100, 100, 100);}".to_string(),
        ]
    }

    /// Wraps chapters in a standalone HTML5 document with the stylesheet inlined.
    pub fn html5_document(&self, title: &str, chapters: &[String]) -> String {
        let body = chapters.concat();
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n");
        out.push_str("<html>\n");
        out.push_str("<head>\n");
        out.push_str("<meta charset='utf-8'>\n");
        out.push_str(&format!("<title>{}</title>\n", escape_html(title)));
        out.push_str("</head>\n");
        out.push_str("<style>\n");
        out.push_str(&self.stylesheet().join("\n"));
        out.push('\n');
        out.push_str("</style>\n");
        out.push_str("<body>\n");
        out.push_str("<article>\n");
        out.push_str(body.trim_end());
        out.push('\n');
        out.push_str("</article>\n");
        out.push_str("</body>\n");
        out.push_str("</html>\n");
        out
    }

    pub fn html_json(&self, meta: BuildMeta, chapters: &[String]) -> Result<String, RenderError> {
        let payload = HtmlJson {
            meta,
            text: HtmlText {
                css: self.stylesheet(),
                html: chapters.to_vec(),
            },
        };
        Ok(serde_json::to_string_pretty(&payload)?)
    }

    pub fn save_html5(&self, converter: &HtmlConverter, path: &Path) -> Result<(), RenderError> {
        let html = self.html5_document(&converter.project().name, converter.full_html());
        write_file(path, &html)
    }

    pub fn save_html_json(
        &self,
        converter: &HtmlConverter,
        path: &Path,
    ) -> Result<(), RenderError> {
        let meta = BuildMeta::now(converter.project());
        let json = self.html_json(meta, converter.full_html())?;
        write_file(path, &json)
    }
}

/// Writes the converter's chapters as an HTML5 document.
pub fn save_html5(converter: &HtmlConverter, path: &Path) -> Result<(), RenderError> {
    Renderer::new(converter.options()).save_html5(converter, path)
}

/// Writes the converter's chapters and stylesheet as a JSON payload.
pub fn save_html_json(converter: &HtmlConverter, path: &Path) -> Result<(), RenderError> {
    Renderer::new(converter.options()).save_html_json(converter, path)
}

fn write_file(path: &Path, contents: &str) -> Result<(), RenderError> {
    fs::write(path, contents).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Renderer, StyleOptions};
    use novelmark_core::ConvertOptions;

    #[test]
    fn stylesheet_follows_justify() {
        let left = Renderer::new(&ConvertOptions::default()).stylesheet().join(" ");
        assert!(left.contains("p {text-align: left;"));
        assert!(!left.contains("p {text-align: justify;"));

        let justified = Renderer::new(&ConvertOptions::default().with_justify(true))
            .stylesheet()
            .join(" ");
        assert!(!justified.contains("p {text-align: left;"));
        assert!(justified.contains("p {text-align: justify;"));
    }

    #[test]
    fn stylesheet_is_empty_without_styles() {
        let renderer = Renderer::new(&ConvertOptions::default().with_styles(false));
        assert!(renderer.stylesheet().is_empty());
    }

    #[test]
    fn custom_typography_reaches_body_rule() {
        let style = StyleOptions {
            text_font: "Georgia".to_string(),
            text_size: 11,
            line_height: 120,
        };
        let sheet = Renderer::new(&ConvertOptions::default()).with_style(style).stylesheet();
        assert_eq!(sheet[0], "body {font-family: 'Georgia'; font-size: 11pt;}");
        assert!(sheet[1].contains("line-height: 120%;"));
    }

    #[test]
    fn html5_document_trims_trailing_whitespace() {
        let renderer = Renderer::new(&ConvertOptions::default().with_styles(false));
        let chapters = vec!["<p>One</p>\n".to_string(), "<p>Two</p>\n\n".to_string()];
        assert_eq!(
            renderer.html5_document("A & B", &chapters),
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset='utf-8'>\n\
             <title>A &amp; B</title>\n</head>\n<style>\n\n</style>\n<body>\n<article>\n\
             <p>One</p>\n<p>Two</p>\n</article>\n</body>\n</html>\n"
        );
    }
}
