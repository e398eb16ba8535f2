use gfmark::{parse, ParseOptions};

fn assert_html(md: &str, expected: &str) {
    let doc = parse(md, &ParseOptions::default());
    assert_eq!(doc.to_html(), expected, "input: {md:?}");
}

#[test]
fn parses_empty_and_whitespace_input() {
    assert_html("", "");
    assert_html("   \n\n\t\n", "");
}

#[test]
fn parses_headings_h1_to_h6() {
    assert_html(
        "# h1\n## h2\n### h3\n#### h4\n##### h5\n###### h6",
        "<h1>h1</h1>\n<h2>h2</h2>\n<h3>h3</h3>\n<h4>h4</h4>\n<h5>h5</h5>\n<h6>h6</h6>\n",
    );
}

#[test]
fn parses_setext_headings() {
    assert_html(
        "Heading one\n===========\n\nHeading two\n-----------",
        "<h1>Heading one</h1>\n<h2>Heading two</h2>\n",
    );
}

#[test]
fn parses_indented_heading() {
    assert_html("   ## heading", "<h2>heading</h2>\n");
}

#[test]
fn non_heading_without_space_after_hash() {
    assert_html("##heading", "<p>##heading</p>\n");
}

#[test]
fn heading_trailing_hashes_stripped() {
    assert_html("# foo ##", "<h1>foo</h1>\n");
    assert_html("# foo#", "<h1>foo#</h1>\n");
}

#[test]
fn paragraph_collapses_lines_until_block_boundary() {
    assert_html(
        "line one\nline two\n\n# h\nline three",
        "<p>line one\nline two</p>\n<h1>h</h1>\n<p>line three</p>\n",
    );
}

#[test]
fn parses_inline_styles() {
    assert_html(
        "this is **strong** and *em* and `code`",
        "<p>this is <strong>strong</strong> and <em>em</em> and <code>code</code></p>\n",
    );
}

#[test]
fn parses_underscore_variants() {
    assert_html(
        "__strong__ and _em_",
        "<p><strong>strong</strong> and <em>em</em></p>\n",
    );
}

#[test]
fn underscore_does_not_work_intraword() {
    assert_html("snake_case_name", "<p>snake_case_name</p>\n");
    assert_html("star*works*intraword", "<p>star<em>works</em>intraword</p>\n");
}

#[test]
fn parses_nested_inline_markup() {
    assert_html(
        "**outer *inner***",
        "<p><strong>outer <em>inner</em></strong></p>\n",
    );
}

#[test]
fn emphasis_rule_of_three() {
    assert_html("a***b* c*", "<p>a*<em><em>b</em> c</em></p>\n");
}

#[test]
fn backslash_escapes_punctuation() {
    assert_html("\\*not em\\*", "<p>*not em*</p>\n");
    assert_html("\\# not a heading", "<p># not a heading</p>\n");
}

#[test]
fn code_span_backtick_handling() {
    assert_html("``a`b``", "<p><code>a`b</code></p>\n");
    assert_html("`` `x` ``", "<p><code>`x`</code></p>\n");
    assert_html("`unclosed", "<p>`unclosed</p>\n");
}

#[test]
fn code_span_interior_is_escaped() {
    assert_html("`<a>&`", "<p><code>&lt;a&gt;&amp;</code></p>\n");
}

#[test]
fn parses_links_and_inline_label_markup() {
    assert_html(
        "visit [**site**](https://example.com)",
        "<p>visit <a href=\"https://example.com\"><strong>site</strong></a></p>\n",
    );
}

#[test]
fn parses_link_with_title() {
    assert_html(
        "[x](/url \"the title\")",
        "<p><a href=\"/url\" title=\"the title\">x</a></p>\n",
    );
}

#[test]
fn parses_reference_style_links_and_shortcuts() {
    assert_html(
        "[A ref][id]\n\n[Shortcut]\n\n[id]: https://example.com \"Ref\"\n[shortcut]: https://shortcut.test",
        "<p><a href=\"https://example.com\" title=\"Ref\">A ref</a></p>\n<p><a href=\"https://shortcut.test\">Shortcut</a></p>\n",
    );
}

#[test]
fn parses_collapsed_reference() {
    assert_html(
        "[label][]\n\n[label]: /here",
        "<p><a href=\"/here\">label</a></p>\n",
    );
}

#[test]
fn parses_reference_style_images() {
    assert_html(
        "![Logo][brand]\n\n[brand]: https://img.test/logo.png \"Logo title\"",
        "<p><img src=\"https://img.test/logo.png\" alt=\"Logo\" title=\"Logo title\" /></p>\n",
    );
}

#[test]
fn image_alt_text_is_flattened() {
    assert_html(
        "![a **b** c](/img.png)",
        "<p><img src=\"/img.png\" alt=\"a b c\" /></p>\n",
    );
}

#[test]
fn link_url_is_html_escaped() {
    assert_html(
        "[x](https://example.com?a=1&b=2)",
        "<p><a href=\"https://example.com?a=1&amp;b=2\">x</a></p>\n",
    );
}

#[test]
fn link_url_tilde_passes_through() {
    assert_html(
        "[a](http://members.aon.at/~nkehrer/ibm_5110/emu5110.html)",
        "<p><a href=\"http://members.aon.at/~nkehrer/ibm_5110/emu5110.html\">a</a></p>\n",
    );
}

#[test]
fn link_url_space_is_percent_escaped() {
    assert_html("[a](<my url>)", "<p><a href=\"my%20url\">a</a></p>\n");
}

#[test]
fn unparsable_link_is_left_as_text() {
    assert_html("look [here](missing", "<p>look [here](missing</p>\n");
    assert_html("[no def]", "<p>[no def]</p>\n");
}

#[test]
fn no_links_inside_links() {
    assert_html(
        "[a [b](/inner) c](/outer)",
        "<p>[a <a href=\"/inner\">b</a> c](/outer)</p>\n",
    );
}

#[test]
fn link_reference_definition_is_removed_from_paragraph() {
    assert_html("[a]: /url\nrest", "<p>rest</p>\n");
    assert_html("[a]: /url\n\n[a]", "<p><a href=\"/url\">a</a></p>\n");
}

#[test]
fn first_link_definition_wins() {
    assert_html(
        "[a]\n\n[a]: /first\n[a]: /second",
        "<p><a href=\"/first\">a</a></p>\n",
    );
}

#[test]
fn parses_lists() {
    assert_html(
        "- one\n- two\n\n1. first\n2. second",
        "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n<ol>\n<li>first</li>\n<li>second</li>\n</ol>\n",
    );
}

#[test]
fn ordered_list_start_attribute() {
    assert_html(
        "3. a\n4. b",
        "<ol start=\"3\">\n<li>a</li>\n<li>b</li>\n</ol>\n",
    );
}

#[test]
fn loose_list_wraps_items_in_paragraphs() {
    assert_html(
        "- a\n\n- b",
        "<ul>\n<li>\n<p>a</p>\n</li>\n<li>\n<p>b</p>\n</li>\n</ul>\n",
    );
}

#[test]
fn blank_inside_item_makes_list_loose() {
    assert_html(
        "- a\n\n  b\n- c",
        "<ul>\n<li>\n<p>a</p>\n<p>b</p>\n</li>\n<li>\n<p>c</p>\n</li>\n</ul>\n",
    );
}

#[test]
fn nested_tight_list() {
    assert_html(
        "- a\n  - b",
        "<ul>\n<li>a\n<ul>\n<li>b</li>\n</ul>\n</li>\n</ul>\n",
    );
}

#[test]
fn different_bullets_start_new_lists() {
    assert_html(
        "- a\n* b",
        "<ul>\n<li>a</li>\n</ul>\n<ul>\n<li>b</li>\n</ul>\n",
    );
}

#[test]
fn empty_list_item() {
    assert_html(
        "- a\n-\n- b",
        "<ul>\n<li>a</li>\n<li></li>\n<li>b</li>\n</ul>\n",
    );
}

#[test]
fn list_item_continuation_is_lazy() {
    assert_html("- foo\nbar", "<ul>\n<li>foo\nbar</li>\n</ul>\n");
}

#[test]
fn ordered_list_interrupting_paragraph_must_start_at_one() {
    assert_html("text\n2. nope", "<p>text\n2. nope</p>\n");
    assert_html("text\n1. yes", "<p>text</p>\n<ol>\n<li>yes</li>\n</ol>\n");
}

#[test]
fn parses_blockquotes_with_lazy_continuation() {
    assert_html(
        "> foo\nbar",
        "<blockquote>\n<p>foo\nbar</p>\n</blockquote>\n",
    );
    assert_html(
        "> foo\n> bar",
        "<blockquote>\n<p>foo\nbar</p>\n</blockquote>\n",
    );
}

#[test]
fn blank_line_splits_blockquotes() {
    assert_html(
        "> a\n\n> b",
        "<blockquote>\n<p>a</p>\n</blockquote>\n<blockquote>\n<p>b</p>\n</blockquote>\n",
    );
}

#[test]
fn nested_blockquotes() {
    assert_html(
        "> > a",
        "<blockquote>\n<blockquote>\n<p>a</p>\n</blockquote>\n</blockquote>\n",
    );
}

#[test]
fn parses_fenced_code_block() {
    assert_html(
        "```rust\nfn main() {}\n```",
        "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n",
    );
    assert_html("```\n<&>\n```", "<pre><code>&lt;&amp;&gt;\n</code></pre>\n");
}

#[test]
fn unterminated_fence_runs_to_end() {
    assert_html("```\ncode", "<pre><code>code\n</code></pre>\n");
}

#[test]
fn parses_indented_code_block() {
    assert_html(
        "    one\n    two",
        "<pre><code>one\ntwo\n</code></pre>\n",
    );
}

#[test]
fn indented_code_keeps_interior_blank_lines() {
    assert_html(
        "    a\n\n    b",
        "<pre><code>a\n\nb\n</code></pre>\n",
    );
}

#[test]
fn indented_code_cannot_interrupt_paragraph() {
    assert_html("para\n    still para", "<p>para\nstill para</p>\n");
}

#[test]
fn parses_thematic_breaks() {
    assert_html("***\n---\n___", "<hr />\n<hr />\n<hr />\n");
    assert_html(" * * *", "<hr />\n");
}

#[test]
fn setext_wins_over_thematic_break_after_paragraph() {
    assert_html("foo\n---\nbar", "<h2>foo</h2>\n<p>bar</p>\n");
}

#[test]
fn hard_and_soft_breaks() {
    assert_html("foo  \nbar", "<p>foo<br />\nbar</p>\n");
    assert_html("foo\\\nbar", "<p>foo<br />\nbar</p>\n");
    assert_html("foo\nbar", "<p>foo\nbar</p>\n");
}

#[test]
fn parses_uri_and_email_autolinks() {
    assert_html(
        "<http://example.com>",
        "<p><a href=\"http://example.com\">http://example.com</a></p>\n",
    );
    assert_html(
        "<user@example.com>",
        "<p><a href=\"mailto:user@example.com\">user@example.com</a></p>\n",
    );
    assert_html("<not an autolink>", "<p>&lt;not an autolink&gt;</p>\n");
}

#[test]
fn inline_html_passes_through() {
    assert_html("a <b>bold</b> tag", "<p>a <b>bold</b> tag</p>\n");
    assert_html("a <!-- comment --> b", "<p>a <!-- comment --> b</p>\n");
    assert_html("bad < tag", "<p>bad &lt; tag</p>\n");
}

#[test]
fn html_block_modes() {
    assert_html("<div>\n*x*\n</div>", "<div>\n*x*\n</div>\n");
    assert_html("<!-- note -->", "<!-- note -->\n");
    assert_html("<?php echo 1 ?>", "<?php echo 1 ?>\n");
    assert_html(
        "<pre>\nkeeps *markdown* raw\n</pre>",
        "<pre>\nkeeps *markdown* raw\n</pre>\n",
    );
}

#[test]
fn html_block_mode6_ends_at_blank_line() {
    assert_html(
        "<div>\nraw\n\npara *em*",
        "<div>\nraw\n<p>para <em>em</em></p>\n",
    );
}

#[test]
fn entities_resolve_in_text() {
    assert_html(
        "&amp; &auml; &#228; &#xE4; &bogus;",
        "<p>&amp; ä ä ä &amp;bogus;</p>\n",
    );
    assert_html("&#0;", "<p>\u{FFFD}</p>\n");
}

#[test]
fn nul_bytes_are_replaced_and_flagged() {
    let doc = parse("a\0b", &ParseOptions::default());
    assert!(doc.corner);
    assert_eq!(doc.to_html(), "<p>a\u{FFFD}b</p>\n");
}

#[test]
fn crlf_input_parses_like_lf() {
    assert_html("a\r\nb\r\n\r\n# h\r\n", "<p>a\nb</p>\n<h1>h</h1>\n");
}

#[test]
fn quote_containing_list() {
    assert_html(
        "> - a\n> - b",
        "<blockquote>\n<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n</blockquote>\n",
    );
}

#[test]
fn code_block_inside_list_item() {
    assert_html(
        "- a\n\n      code",
        "<ul>\n<li>\n<p>a</p>\n<pre><code>code\n</code></pre>\n</li>\n</ul>\n",
    );
}

#[test]
fn deeply_nested_quotes_render_without_crashing() {
    // Parsing, the tree passes, rendering, and drop all walk explicit
    // stacks, so this must survive on a default-size thread stack.
    let depth = 50_000;
    let mut input = String::new();
    for _ in 0..depth {
        input.push_str("> ");
    }
    input.push('x');
    let doc = parse(&input, &ParseOptions::default());
    let html = doc.to_html();
    assert_eq!(html.matches("<blockquote>").count(), depth);
    assert!(html.contains("<p>x</p>"));
    drop(doc);
}

#[test]
fn long_backtick_runs_are_plain_text() {
    let run = "`".repeat(81);
    let input = format!("{run}x{run}");
    let doc = parse(&input, &ParseOptions::default());
    assert!(!doc.to_html().contains("<code>"));
}

#[test]
fn link_destination_paren_nesting_is_capped() {
    let nested = format!("[a]({}x{})", "(".repeat(33), ")".repeat(33));
    let doc = parse(&nested, &ParseOptions::default());
    assert!(!doc.to_html().contains("<a "));
}

#[test]
fn overlong_link_labels_are_rejected() {
    let label = "x".repeat(1000);
    let input = format!("[{label}]\n\n[{label}]: /url");
    let doc = parse(&input, &ParseOptions::default());
    assert!(!doc.to_html().contains("<a "));
}
