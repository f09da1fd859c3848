use novelmark_core::{
    ConvertOptions, DocumentKind, Flags, HeadingLevel, HtmlConverter, ProjectMeta, SourceDocument,
    Token, TokenKind,
};

const HANDLE: &str = "0000000000000";

fn render(conv: &mut HtmlConverter, doc: SourceDocument<'_>) -> String {
    let tokens = conv.tokenize(&doc);
    conv.convert_tokens(doc.handle, doc.kind, &tokens).to_string()
}

fn render_tokens(conv: &mut HtmlConverter, tokens: &[Token]) -> String {
    conv.convert_tokens(HANDLE, DocumentKind::Novel, tokens).to_string()
}

#[test]
fn novel_headings() {
    let mut conv = HtmlConverter::new(ProjectMeta::default(), ConvertOptions::default());

    assert_eq!(
        render(&mut conv, SourceDocument::novel(HANDLE, "# Partition\n")),
        "<h1 class='title' style='text-align: center;'>Partition</h1>\n"
    );
    assert_eq!(
        render(&mut conv, SourceDocument::novel(HANDLE, "## Chapter Title\n")),
        "<h1 style='page-break-before: always;'>Chapter Title</h1>\n"
    );
    assert_eq!(
        render(&mut conv, SourceDocument::novel(HANDLE, "### Scene Title\n")),
        "<h2>Scene Title</h2>\n"
    );
    assert_eq!(
        render(&mut conv, SourceDocument::novel(HANDLE, "#### Section Title\n")),
        "<h3>Section Title</h3>\n"
    );
    assert_eq!(
        render(&mut conv, SourceDocument::novel(HANDLE, "#! Title\n")),
        "<h1 class='title' style='text-align: center; page-break-before: always;'>Title</h1>\n"
    );
    assert_eq!(
        render(&mut conv, SourceDocument::novel(HANDLE, "##! Prologue\n")),
        "<h1 style='page-break-before: always;'>Prologue</h1>\n"
    );
}

#[test]
fn note_headings_with_links() {
    let options = ConvertOptions::default().with_link_headings(true);
    let mut conv = HtmlConverter::new(ProjectMeta::default(), options);

    assert_eq!(
        render(&mut conv, SourceDocument::note(HANDLE, "# Heading One\n")),
        "<h1><a name='0000000000000:T0001'></a>Heading One</h1>\n"
    );
    assert_eq!(
        render(&mut conv, SourceDocument::note(HANDLE, "## Heading Two\n")),
        "<h2><a name='0000000000000:T0001'></a>Heading Two</h2>\n"
    );
    assert_eq!(
        render(&mut conv, SourceDocument::note(HANDLE, "### Heading Three\n")),
        "<h3><a name='0000000000000:T0001'></a>Heading Three</h3>\n"
    );
    assert_eq!(
        render(&mut conv, SourceDocument::note(HANDLE, "#### Heading Four\n")),
        "<h4><a name='0000000000000:T0001'></a>Heading Four</h4>\n"
    );
    assert_eq!(
        render(&mut conv, SourceDocument::note(HANDLE, "#! Heading One\n")),
        "<h1 class='title' style='text-align: center; page-break-before: always;'>\
         <a name='0000000000000:T0001'></a>Heading One</h1>\n"
    );
    assert_eq!(
        render(&mut conv, SourceDocument::note(HANDLE, "##! Heading Two\n")),
        "<h2><a name='0000000000000:T0001'></a>Heading Two</h2>\n"
    );
}

#[test]
fn heading_counter_runs_through_the_document() {
    let options = ConvertOptions::default().with_link_headings(true);
    let mut conv = HtmlConverter::new(ProjectMeta::default(), options);
    let html = render(
        &mut conv,
        SourceDocument::note("h", "# One\n\nText.\n\n## Two\n### Three\n"),
    );
    assert_eq!(
        html,
        "<h1><a name='h:T0001'></a>One</h1>\n\
         <p>Text.</p>\n\
         <h2><a name='h:T0002'></a>Two</h2>\n\
         <h3><a name='h:T0003'></a>Three</h3>\n"
    );
}

#[test]
fn special_titles_from_tokens() {
    let options = ConvertOptions::default().with_link_headings(true);
    let mut conv = HtmlConverter::new(ProjectMeta::default(), options);

    let title = Token::new(
        TokenKind::Title,
        1,
        "A Title",
        Flags::PAGE_BREAK_BEFORE | Flags::ALIGN_CENTRE,
    );
    assert_eq!(
        render_tokens(&mut conv, &[title]),
        "<h1 class='title' style='text-align: center; page-break-before: always;'>\
         <a name='0000000000000:T0001'></a>A Title</h1>\n"
    );

    let unnumbered = Token::new(
        TokenKind::Heading(HeadingLevel::H2),
        1,
        "Prologue",
        Flags::PAGE_BREAK_BEFORE,
    );
    assert_eq!(
        render_tokens(&mut conv, &[unnumbered]),
        "<h1 style='page-break-before: always;'>\
         <a name='0000000000000:T0001'></a>Prologue</h1>\n"
    );
}

#[test]
fn separators_and_skips_from_tokens() {
    let mut conv = HtmlConverter::new(ProjectMeta::default(), ConvertOptions::default());

    let sep = Token::new(TokenKind::Separator, 1, "* * *", Flags::ALIGN_CENTRE);
    assert_eq!(
        render_tokens(&mut conv, &[sep]),
        "<p class='sep' style='text-align: center;'>* * *</p>\n"
    );

    let skip = Token::new(TokenKind::Skip, 1, "", Flags::NONE);
    assert_eq!(render_tokens(&mut conv, &[skip]), "<p class='skip'>&nbsp;</p>\n");
}

#[test]
fn alignment_flags_from_tokens() {
    let heading = |flags| Token::new(TokenKind::Heading(HeadingLevel::H1), 1, "A Title", flags);

    let plain = ConvertOptions::default().with_styles(false);
    let mut conv = HtmlConverter::new(ProjectMeta::default(), plain);
    assert_eq!(
        render_tokens(&mut conv, &[heading(Flags::ALIGN_LEFT)]),
        "<h1 class='title'>A Title</h1>\n"
    );

    let mut conv = HtmlConverter::new(ProjectMeta::default(), ConvertOptions::default());
    let cases = [
        (Flags::ALIGN_LEFT, "text-align: left;"),
        (Flags::ALIGN_RIGHT, "text-align: right;"),
        (Flags::ALIGN_CENTRE, "text-align: center;"),
        (Flags::ALIGN_JUSTIFY, "text-align: justify;"),
        (
            Flags::PAGE_BREAK_BEFORE | Flags::PAGE_BREAK_AFTER,
            "page-break-before: always; page-break-after: always;",
        ),
    ];
    for (flags, style) in cases {
        assert_eq!(
            render_tokens(&mut conv, &[heading(flags)]),
            format!("<h1 class='title' style='{}'>A Title</h1>\n", style)
        );
    }
}

#[test]
fn indent_flags_from_tokens() {
    let mut conv = HtmlConverter::new(ProjectMeta::default(), ConvertOptions::default());

    let left = Token::new(TokenKind::Text, 1, "Some text ...", Flags::INDENT_LEFT);
    assert_eq!(
        render_tokens(&mut conv, &[left]),
        "<p style='margin-left: 40px;'>Some text ...</p>\n"
    );

    let right = Token::new(TokenKind::Text, 1, "Some text ...", Flags::INDENT_RIGHT);
    assert_eq!(
        render_tokens(&mut conv, &[right]),
        "<p style='margin-right: 40px;'>Some text ...</p>\n"
    );
}

#[test]
fn text_markers_set_alignment_and_page_breaks() {
    let mut conv = HtmlConverter::new(ProjectMeta::default(), ConvertOptions::default());
    render(&mut conv, SourceDocument::novel("a", "Opening.\n"));

    let text = ">> Right\n\nLeft <<\n\n>> Centre <<\n\n> Indented\n\n[newpage]\nAfter break\n";
    assert_eq!(
        render(&mut conv, SourceDocument::novel("b", text)),
        "<p style='text-align: right;'>Right</p>\n\
         <p style='text-align: left;'>Left</p>\n\
         <p style='text-align: center;'>Centre</p>\n\
         <p style='margin-left: 40px;'>Indented</p>\n\
         <p style='page-break-before: always;'>After break</p>\n"
    );

    assert_eq!(
        render(&mut conv, SourceDocument::novel("c", "[vspace:2]\n* * *\n")),
        "<p class='skip'>&nbsp;</p>\n\
         <p class='skip'>&nbsp;</p>\n\
         <p class='sep' style='text-align: center;'>* * *</p>\n"
    );
}

#[test]
fn trailing_angle_bracket_indents_unless_escaped() {
    let mut conv = HtmlConverter::new(ProjectMeta::default(), ConvertOptions::default());
    render(&mut conv, SourceDocument::novel("a", "Opening.\n"));

    assert_eq!(
        render(&mut conv, SourceDocument::novel("b", "Text with > and <\n")),
        "<p style='margin-right: 40px;'>Text with &gt; and</p>\n"
    );
    assert_eq!(
        render(&mut conv, SourceDocument::novel("c", "Text with > and \\<\n")),
        "<p>Text with &gt; and &lt;</p>\n"
    );
    assert_eq!(
        render(&mut conv, SourceDocument::novel("d", "\\> Not indented\n")),
        "<p>&gt; Not indented</p>\n"
    );
}

#[test]
fn vspace_count_is_clamped() {
    let mut conv = HtmlConverter::new(ProjectMeta::default(), ConvertOptions::default());
    let doc = SourceDocument::novel("a", "[vspace:999999999]\n");
    let tokens = conv.tokenize(&doc);
    assert_eq!(tokens.len(), 200);
    assert!(tokens.iter().all(|token| token.kind == TokenKind::Skip));
}
