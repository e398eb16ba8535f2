use gfmark::{parse, ParseOptions};

fn opts(f: impl FnOnce(&mut ParseOptions)) -> ParseOptions {
    let mut o = ParseOptions::default();
    f(&mut o);
    o
}

fn assert_html_with(o: &ParseOptions, md: &str, expected: &str) {
    let doc = parse(md, o);
    assert_eq!(doc.to_html(), expected, "input: {md:?}");
}

// ── Tables ───────────────────────────────────────────────────────────

#[test]
fn basic_table() {
    assert_html_with(
        &opts(|o| o.tables = true),
        "| foo | bar |\n| --- | --- |\n| baz | bim |\n",
        "<table>\n<thead>\n<tr>\n<th>foo</th>\n<th>bar</th>\n</tr>\n</thead>\n<tbody>\n<tr>\n<td>baz</td>\n<td>bim</td>\n</tr>\n</tbody>\n</table>\n",
    );
}

#[test]
fn table_alignment_attributes() {
    assert_html_with(
        &opts(|o| o.tables = true),
        "| a | b | c |\n| :-- | :-: | --: |\n| 1 | 2 | 3 |\n",
        "<table>\n<thead>\n<tr>\n<th align=\"left\">a</th>\n<th align=\"center\">b</th>\n<th align=\"right\">c</th>\n</tr>\n</thead>\n<tbody>\n<tr>\n<td align=\"left\">1</td>\n<td align=\"center\">2</td>\n<td align=\"right\">3</td>\n</tr>\n</tbody>\n</table>\n",
    );
}

#[test]
fn table_without_body_has_no_tbody() {
    assert_html_with(
        &opts(|o| o.tables = true),
        "| a |\n| --- |\n",
        "<table>\n<thead>\n<tr>\n<th>a</th>\n</tr>\n</thead>\n</table>\n",
    );
}

#[test]
fn table_rows_pad_and_truncate_to_header_width() {
    assert_html_with(
        &opts(|o| o.tables = true),
        "| a | b |\n| --- | --- |\n| 1 |\n| 1 | 2 | 3 |\n",
        "<table>\n<thead>\n<tr>\n<th>a</th>\n<th>b</th>\n</tr>\n</thead>\n<tbody>\n<tr>\n<td>1</td>\n<td></td>\n</tr>\n<tr>\n<td>1</td>\n<td>2</td>\n</tr>\n</tbody>\n</table>\n",
    );
}

#[test]
fn escaped_pipe_stays_inside_cell() {
    assert_html_with(
        &opts(|o| o.tables = true),
        "| a \\| b |\n| --- |\n",
        "<table>\n<thead>\n<tr>\n<th>a | b</th>\n</tr>\n</thead>\n</table>\n",
    );
}

#[test]
fn table_cells_parse_inline_markup() {
    assert_html_with(
        &opts(|o| o.tables = true),
        "| *em* |\n| --- |\n| `c` |\n",
        "<table>\n<thead>\n<tr>\n<th><em>em</em></th>\n</tr>\n</thead>\n<tbody>\n<tr>\n<td><code>c</code></td>\n</tr>\n</tbody>\n</table>\n",
    );
}

#[test]
fn mismatched_delimiter_row_is_not_a_table() {
    assert_html_with(
        &opts(|o| o.tables = true),
        "| a | b |\n| --- |\n",
        "<p>| a | b |\n| --- |</p>\n",
    );
}

#[test]
fn lone_pipe_does_not_continue_a_table() {
    let doc = parse("| a |\n| --- |\n|\n", &opts(|o| o.tables = true));
    assert!(doc.corner);
    let html = doc.to_html();
    assert!(html.contains("<table>"), "{html}");
    assert!(html.contains("<p>|</p>"), "{html}");
}

#[test]
fn tables_disabled_by_default() {
    let doc = parse("| a |\n| --- |\n", &ParseOptions::default());
    assert!(!doc.to_html().contains("<table>"));
}

// ── Task lists ───────────────────────────────────────────────────────

#[test]
fn task_list_items() {
    assert_html_with(
        &opts(|o| o.task_lists = true),
        "- [x] foo\n- [ ] bar\n",
        "<ul>\n<li><input checked=\"\" disabled=\"\" type=\"checkbox\"> foo</li>\n<li><input disabled=\"\" type=\"checkbox\"> bar</li>\n</ul>\n",
    );
}

#[test]
fn loose_task_list_wraps_checkbox_in_paragraph() {
    assert_html_with(
        &opts(|o| o.task_lists = true),
        "- [x] foo\n\n- [ ] bar\n",
        "<ul>\n<li>\n<p><input checked=\"\" disabled=\"\" type=\"checkbox\"> foo</p>\n</li>\n<li>\n<p><input disabled=\"\" type=\"checkbox\"> bar</p>\n</li>\n</ul>\n",
    );
}

#[test]
fn checkbox_requires_following_space() {
    assert_html_with(
        &opts(|o| o.task_lists = true),
        "- [x]done\n",
        "<ul>\n<li>[x]done</li>\n</ul>\n",
    );
}

// ── Strikethrough ────────────────────────────────────────────────────

#[test]
fn strikethrough_double_tilde() {
    assert_html_with(
        &opts(|o| o.strikethrough = true),
        "~~gone~~ and ~single~ and ~~~three~~~",
        "<p><del>gone</del> and ~single~ and ~~~three~~~</p>\n",
    );
}

#[test]
fn strikethrough_disabled_by_default() {
    assert_html_with(&ParseOptions::default(), "~~x~~", "<p>~~x~~</p>\n");
}

// ── Extended autolinks ───────────────────────────────────────────────

#[test]
fn autolinks_bare_urls() {
    assert_html_with(
        &opts(|o| o.autolink_text = true),
        "see http://example.com/x for details",
        "<p>see <a href=\"http://example.com/x\">http://example.com/x</a> for details</p>\n",
    );
}

#[test]
fn autolinks_www_promotes_scheme() {
    assert_html_with(
        &opts(|o| o.autolink_text = true),
        "visit www.example.com now",
        "<p>visit <a href=\"https://www.example.com\">www.example.com</a> now</p>\n",
    );
    assert_html_with(
        &opts(|o| {
            o.autolink_text = true;
            o.autolink_assume_http = true;
        }),
        "visit www.example.com now",
        "<p>visit <a href=\"http://www.example.com\">www.example.com</a> now</p>\n",
    );
}

#[test]
fn autolink_trims_trailing_punctuation() {
    assert_html_with(
        &opts(|o| o.autolink_text = true),
        "go to https://example.com/a.",
        "<p>go to <a href=\"https://example.com/a\">https://example.com/a</a>.</p>\n",
    );
    assert_html_with(
        &opts(|o| o.autolink_text = true),
        "(see https://example.com/a)",
        "<p>(see <a href=\"https://example.com/a\">https://example.com/a</a>)</p>\n",
    );
}

#[test]
fn autolinks_emails() {
    assert_html_with(
        &opts(|o| o.autolink_text = true),
        "mail me@example.com.",
        "<p>mail <a href=\"mailto:me@example.com\">me@example.com</a>.</p>\n",
    );
}

#[test]
fn autolink_requires_word_boundary() {
    assert_html_with(
        &opts(|o| o.autolink_text = true),
        "xhttp://example.com/",
        "<p>xhttp://example.com/</p>\n",
    );
}

#[test]
fn autolink_inside_emphasis() {
    assert_html_with(
        &opts(|o| o.autolink_text = true),
        "*www.example.com*",
        "<p><em><a href=\"https://www.example.com\">www.example.com</a></em></p>\n",
    );
}

#[test]
fn no_autolinks_without_valid_domain() {
    assert_html_with(
        &opts(|o| o.autolink_text = true),
        "http://nodots here",
        "<p>http://nodots here</p>\n",
    );
}

// ── Emoji ────────────────────────────────────────────────────────────

#[test]
fn emoji_shortcodes() {
    assert_html_with(
        &opts(|o| o.emoji = true),
        "ship it :tada: :+1:",
        "<p>ship it 🎉 👍</p>\n",
    );
    assert_html_with(
        &opts(|o| o.emoji = true),
        "not an emoji :unknown_thing: here",
        "<p>not an emoji :unknown_thing: here</p>\n",
    );
}

// ── Smart typography ─────────────────────────────────────────────────

#[test]
fn smart_quotes() {
    assert_html_with(
        &opts(|o| o.smart_quote = true),
        "\"'Shelob' is my name.\"",
        "<p>“‘Shelob’ is my name.”</p>\n",
    );
}

#[test]
fn unmatched_smart_quote_is_right_curly() {
    assert_html_with(
        &opts(|o| o.smart_quote = true),
        "it's fine",
        "<p>it’s fine</p>\n",
    );
}

#[test]
fn smart_dashes() {
    let o = opts(|o| o.smart_dash = true);
    assert_html_with(&o, "a--b", "<p>a–b</p>\n");
    assert_html_with(&o, "a---b", "<p>a—b</p>\n");
    assert_html_with(&o, "a----b", "<p>a––b</p>\n");
    assert_html_with(&o, "a-b", "<p>a-b</p>\n");
}

#[test]
fn smart_dots() {
    assert_html_with(
        &opts(|o| o.smart_dot = true),
        "wait...",
        "<p>wait…</p>\n",
    );
}

// ── Heading IDs ──────────────────────────────────────────────────────

#[test]
fn heading_id_attribute() {
    assert_html_with(
        &opts(|o| o.heading_ids = true),
        "# Title {#custom}",
        "<h1 id=\"custom\">Title</h1>\n",
    );
    assert_html_with(
        &ParseOptions::default(),
        "# Title {#custom}",
        "<h1>Title {#custom}</h1>\n",
    );
}

// ── Footnotes ────────────────────────────────────────────────────────

#[test]
fn footnote_reference_and_definition() {
    assert_html_with(
        &opts(|o| o.footnotes = true),
        "Text[^1].\n\n[^1]: Note.\n",
        "<p>Text<sup class=\"fn\"><a id=\"fnref-1\" href=\"#fn-1\">1</a></sup>.</p>\n\
         <div class=\"footnotes\">Footnotes</div>\n<ol>\n<li id=\"fn-1\">\n\
         <p>Note.\n<a class=\"fnref\" href=\"#fnref-1\">↩</a></p>\n</li>\n</ol>\n",
    );
}

#[test]
fn repeated_footnote_references_get_suffixed_anchors() {
    let doc = parse(
        "a[^n] b[^n].\n\n[^n]: Note.\n",
        &opts(|o| o.footnotes = true),
    );
    let html = doc.to_html();
    assert!(html.contains("id=\"fnref-1\""), "{html}");
    assert!(html.contains("id=\"fnref-1-2\""), "{html}");
    assert!(html.contains("href=\"#fnref-1-2\""), "{html}");
}

#[test]
fn footnotes_are_numbered_in_reference_order() {
    let doc = parse(
        "b[^beta] a[^alpha].\n\n[^alpha]: A.\n\n[^beta]: B.\n",
        &opts(|o| o.footnotes = true),
    );
    let html = doc.to_html();
    let beta = html.find("<li id=\"fn-1\">\nB.").or_else(|| html.find("<li id=\"fn-1\">\n<p>B."));
    assert!(beta.is_some(), "{html}");
}

#[test]
fn unknown_footnote_is_literal_text() {
    assert_html_with(
        &opts(|o| o.footnotes = true),
        "x[^nope] y\n",
        "<p>x[^nope] y</p>\n",
    );
}

#[test]
fn duplicate_footnote_definition_sets_corner() {
    let doc = parse(
        "a[^n].\n\n[^n]: one.\n\n[^n]: two.\n",
        &opts(|o| o.footnotes = true),
    );
    assert!(doc.corner);
}

#[test]
fn footnote_definitions_do_not_render_in_place() {
    let doc = parse("[^n]: hidden.\n\ntext\n", &opts(|o| o.footnotes = true));
    assert_eq!(doc.to_html(), "<p>text</p>\n");
    assert_eq!(doc.footnotes.len(), 1);
}

// ── Configuration wire format ────────────────────────────────────────

#[test]
fn options_deserialize_from_partial_json() {
    let o: ParseOptions = serde_json::from_str(r#"{"Table": true, "SmartQuote": true}"#).unwrap();
    assert!(o.tables);
    assert!(o.smart_quote);
    assert!(!o.strikethrough);
    assert!(!o.footnotes);

    let o: ParseOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(o, ParseOptions::default());
}

#[test]
fn options_roundtrip_through_json() {
    let o = opts(|o| {
        o.heading_ids = true;
        o.autolink_assume_http = true;
    });
    let json = serde_json::to_string(&o).unwrap();
    assert!(json.contains("\"HeadingID\":true"));
    let back: ParseOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, o);
}
