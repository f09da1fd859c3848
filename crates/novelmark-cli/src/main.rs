use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use novelmark_core::{ConvertOptions, DocumentKind, HtmlConverter, ProjectMeta, SourceDocument};
use novelmark_renderer::{BuildMeta, Renderer, StyleOptions};
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "novelmark")]
#[command(version, about = "Convert novel markup to HTML", long_about = None)]
#[command(after_help = "EXAMPLES:
    novelmark ch1.txt ch2.txt -o book.htm     Build an HTML5 document
    novelmark --format json -o book.json *.txt
    novelmark --notes --keywords notes.txt    Print note HTML to stdout")]
struct Cli {
    /// Source documents, converted in order
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Output file; stdout when omitted
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Treat inputs as project notes instead of novel text
    #[arg(long)]
    notes: bool,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    author: Option<String>,

    /// JSON build settings with `project`, `options` and `style` sections
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long)]
    link_headings: bool,

    #[arg(long)]
    justify: bool,

    #[arg(long)]
    keep_markdown: bool,

    #[arg(long)]
    replace_unicode: bool,

    #[arg(long)]
    comments: bool,

    #[arg(long)]
    synopsis: bool,

    #[arg(long)]
    keywords: bool,

    /// Append the footnote list after the last document
    #[arg(long)]
    footnotes: bool,

    #[arg(long)]
    no_styles: bool,

    /// Replace tabs in the output with N non-breaking spaces
    #[arg(long, value_name = "N")]
    tabs: Option<usize>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Standalone HTML5 document
    Html,
    /// JSON payload with metadata, stylesheet and chapters
    Json,
    /// Concatenated chapter fragments only
    Fragment,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BuildConfig {
    project: ProjectMeta,
    options: ConvertOptions,
    style: StyleOptions,
}

impl BuildConfig {
    fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid config {}", path.display()))
    }
}

impl Cli {
    fn apply(&self, mut options: ConvertOptions) -> ConvertOptions {
        options.link_headings |= self.link_headings;
        options.justify |= self.justify;
        options.keep_markdown |= self.keep_markdown;
        options.replace_unicode |= self.replace_unicode;
        options.show_comments |= self.comments;
        options.show_synopsis |= self.synopsis;
        options.show_keywords |= self.keywords;
        if self.no_styles {
            options.styles = false;
        }
        options
    }

    fn project(&self, mut project: ProjectMeta) -> ProjectMeta {
        if let Some(title) = &self.title {
            project.name = title.clone();
        }
        if let Some(author) = &self.author {
            project.author = author.clone();
        }
        project
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => BuildConfig::load(path)?,
        None => BuildConfig::default(),
    };
    let options = cli.apply(config.options);
    let project = cli.project(config.project);
    let kind = if cli.notes {
        DocumentKind::Note
    } else {
        DocumentKind::Novel
    };

    let mut converter = HtmlConverter::new(project, options);
    for input in &cli.inputs {
        let text = fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?;
        let handle = input
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("document");
        converter.convert_document(&SourceDocument {
            handle,
            kind,
            text: &text,
        });
        log::debug!("converted {}", input.display());
    }
    if cli.footnotes {
        converter.append_footnotes();
    }
    if let Some(count) = cli.tabs {
        converter.replace_tabs(count, "&nbsp;");
    }

    let renderer = Renderer::new(converter.options()).with_style(config.style);
    match (&cli.output, cli.format) {
        (Some(path), Format::Html) => renderer.save_html5(&converter, path)?,
        (Some(path), Format::Json) => renderer.save_html_json(&converter, path)?,
        (Some(path), Format::Fragment) => {
            fs::write(path, converter.full_html().concat())
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("wrote fragments to {}", path.display());
        }
        (None, Format::Html) => {
            let title = &converter.project().name;
            print!("{}", renderer.html5_document(title, converter.full_html()));
        }
        (None, Format::Json) => {
            let meta = BuildMeta::now(converter.project());
            println!("{}", renderer.html_json(meta, converter.full_html())?);
        }
        (None, Format::Fragment) => print!("{}", converter.full_html().concat()),
    }
    Ok(())
}
