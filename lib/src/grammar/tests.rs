use crate::grammar::*;

fn grammar(rules: Vec<Matcher>) -> Grammar {
    Grammar::builder("test").rules(rules).build().unwrap()
}

fn string(quote: &str) -> Span {
    Span::new(quote, quote).class("string")
}

/// Checks that the events are balanced and cover `text` exactly once.
fn assert_well_formed(highlight: &Highlight<'_>, text: &str) {
    let mut depth = 0usize;
    let mut cursor = 0;
    for event in highlight.events() {
        match *event {
            HighlightEvent::Start(_) => depth += 1,
            HighlightEvent::End => depth = depth.checked_sub(1).expect("unbalanced end"),
            HighlightEvent::Source { start, end } => {
                assert_eq!(start, cursor);
                assert!(end > start);
                cursor = end;
            }
        }
    }

    assert_eq!(depth, 0);
    assert_eq!(cursor, text.len());
}

#[test]
fn text_without_delimiters_is_untouched() {
    let grammar = grammar(vec![
        string("'").into(),
        langs::line_comment(),
        langs::c_number(),
    ]);

    let text = "plain words & <tags>, nothing else";
    let highlight = grammar.highlight(text);
    assert_eq!(highlight.runs(), vec![(None, text)]);
    assert_eq!(highlight.to_html(), "plain words &amp; &lt;tags&gt;, nothing else");
    assert_eq!(highlight.relevance(), 0);
}

#[test]
fn well_formed_pair_yields_one_span() {
    let text = "x 'abc' y";
    let highlight = grammar(vec![string("'").into()]).highlight(text);
    assert_well_formed(&highlight, text);

    let starts = highlight.events().iter()
        .filter(|e| matches!(e, HighlightEvent::Start(_)))
        .count();

    assert_eq!(starts, 1);
    assert_eq!(highlight.classified("string"), vec!["'abc'"]);
}

#[test]
fn excluded_delimiters_sit_outside_the_span() {
    let text = "x [abc] y";
    let both = grammar(vec![Span::new(r"\[", r"\]").class("string").exclude_begin().exclude_end().into()]);
    assert_eq!(both.highlight(text).to_html(), "x [<span class=\"hljs-string\">abc</span>] y");

    let begin = grammar(vec![Span::new(r"\[", r"\]").class("string").exclude_begin().into()]);
    assert_eq!(begin.highlight(text).classified("string"), vec!["abc]"]);

    let end = grammar(vec![Span::new(r"\[", r"\]").class("string").exclude_end().into()]);
    assert_eq!(end.highlight(text).classified("string"), vec!["[abc"]);
}

#[test]
fn unterminated_span_closes_at_end_of_input() {
    let text = "'abc";
    let highlight = grammar(vec![string("'").into()]).highlight(text);
    assert_well_formed(&highlight, text);
    assert_eq!(highlight.runs(), vec![(Some("string"), "'abc")]);
    assert_eq!(highlight.illegal(), 0);
}

#[test]
fn illegal_match_aborts_the_span() {
    let text = "'ab\ncd";
    let highlight = grammar(vec![string("'").illegal(r"\n").into()]).highlight(text);
    assert_well_formed(&highlight, text);
    assert_eq!(highlight.runs(), vec![(None, text)]);
    assert_eq!(highlight.illegal(), 1);
}

#[test]
fn illegal_abort_discards_nested_classes() {
    let rules: Vec<Matcher> = vec![
        string("'")
            .illegal(";")
            .contains([Matcher::from(Match::new(r"\d+").class("number"))])
            .into(),
        Match::new(r"\d+").class("number").into(),
    ];

    let text = "'a1; 2";
    let highlight = grammar(rules).highlight(text);
    assert_well_formed(&highlight, text);
    assert_eq!(highlight.classified("string"), Vec::<&str>::new());
    assert_eq!(highlight.classified("number"), vec!["2"]);
}

#[test]
fn recursion_nests_without_native_recursion() {
    let parens = Span::new(r"\(", r"\)").class("paren").contains([Matcher::Recurse]);
    let grammar = grammar(vec![parens.into()]);

    let highlight = grammar.highlight("(()(()))");
    assert_eq!(highlight.max_depth(), 3);
    assert_well_formed(&highlight, "(()(()))");

    let depth = 10_000;
    let deep = format!("{}{}", "(".repeat(depth), ")".repeat(depth));
    let highlight = grammar.highlight(&deep);
    assert_eq!(highlight.max_depth(), depth);
    assert_well_formed(&highlight, &deep);
}

#[test]
fn zero_width_recursion_is_not_reopened() {
    let parens = Span::new(r"(?=\()", r"\)")
        .class("paren")
        .return_begin()
        .contains([Matcher::Recurse, Match::new(r"\(").into()]);

    let grammar = grammar(vec![parens.into()]);
    let highlight = grammar.highlight("(x)");
    assert_well_formed(&highlight, "(x)");
    assert_eq!(highlight.max_depth(), 1);
    assert_eq!(highlight.to_html(), r#"<span class="hljs-paren">(x)</span>"#);

    let highlight = grammar.highlight("((x))");
    assert_well_formed(&highlight, "((x))");
    assert_eq!(highlight.max_depth(), 2);
    assert_eq!(highlight.to_html(),
        r#"<span class="hljs-paren">(<span class="hljs-paren">(x)</span>)</span>"#);
}

#[test]
fn recurse_at_top_level_is_ignored() {
    let text = "abc";
    let highlight = grammar(vec![Matcher::Recurse]).highlight(text);
    assert_eq!(highlight.runs(), vec![(None, text)]);
}

#[test]
fn capture_groups_get_their_own_classes() {
    let rule = Match::new(r"(let)(\s+)(\w+)").captures(&[(3, "title"), (1, "keyword")]);
    let highlight = grammar(vec![rule.into()]).highlight("let x;");
    assert_eq!(highlight.runs(), vec![
        (Some("keyword"), "let"),
        (None, " "),
        (Some("title"), "x"),
        (None, ";"),
    ]);
}

#[test]
fn keywords_follow_precedence() {
    let keywords = KeywordClasses::new()
        .with(KeywordClass::Literal, &["null", "true"])
        .with(KeywordClass::Keyword, &["null"])
        .with(KeywordClass::Variable, &["self"]);

    let grammar = Grammar::builder("test")
        .keywords(keywords)
        .rules([Matcher::keywords(r"\w+")])
        .build()
        .unwrap();

    let highlight = grammar.highlight("null true self other");
    assert_eq!(highlight.classified("keyword"), vec!["null"]);
    assert_eq!(highlight.classified("literal"), vec!["true"]);
    assert_eq!(highlight.classified("variable.language"), vec!["self"]);
    assert_eq!(highlight.relevance(), 3);
}

#[test]
fn keywords_match_whole_identifiers() {
    let keywords = KeywordClasses::new().with(KeywordClass::Keyword, &["for"]);
    let grammar = Grammar::builder("test")
        .keywords(keywords)
        .rules([Matcher::keywords(r"\w+")])
        .build()
        .unwrap();

    assert_eq!(grammar.highlight("format for").classified("keyword"), vec!["for"]);
}

#[test]
fn return_begin_lets_children_see_the_begin() {
    let function = Span::new(r"fn\s+\w+", r"\)")
        .class("function")
        .return_begin()
        .contains([
            Matcher::from(Match::new("fn").class("keyword")),
            Match::new(r"\w+").class("title").into(),
        ]);

    let text = "fn go() x";
    let highlight = grammar(vec![function.into()]).highlight(text);
    assert_well_formed(&highlight, text);
    assert_eq!(highlight.classified("keyword"), vec!["fn"]);
    assert_eq!(highlight.classified("title"), vec!["go"]);
    assert_eq!(highlight.runs().last(), Some(&(None, " x")));
}

#[test]
fn open_span_closes_when_no_child_matches() {
    let number = Span::open(r"\d+").class("number").contains([Matcher::from(Match::new(r"_\d+"))]);
    let highlight = grammar(vec![number.into()]).highlight("12_34_5 x");
    assert_eq!(highlight.runs(), vec![(Some("number"), "12_34_5"), (None, " x")]);
}

#[test]
fn empty_matches_are_passed_over() {
    let rules: Vec<Matcher> = vec![
        Match::new(r"(?=x)").class("never").into(),
        Span::open(r"(?=x)").class("never").return_begin().into(),
        Match::new("x").class("letter").into(),
    ];

    let text = "xyx";
    let highlight = grammar(rules).highlight(text);
    assert_well_formed(&highlight, text);
    assert_eq!(highlight.classified("never"), Vec::<&str>::new());
    assert_eq!(highlight.classified("letter"), vec!["x", "x"]);
}

#[test]
fn multibyte_text_passes_through() {
    let text = "héllo 'wörld' ✓";
    let highlight = grammar(vec![string("'").into()]).highlight(text);
    assert_well_formed(&highlight, text);
    assert_eq!(highlight.classified("string"), vec!["'wörld'"]);
}

#[test]
fn rendering_escapes_and_prefixes() {
    let grammar = grammar(vec![Match::new("<").class("title.class").into()]);
    let highlight = grammar.highlight("a<b&");
    assert_eq!(highlight.to_html(), "a<span class=\"hljs-title class_\">&lt;</span>b&amp;");
    assert_eq!(
        highlight.render_html("x-"),
        "a<span class=\"x-title class_\">&lt;</span>b&amp;"
    );
}

#[test]
fn invalid_patterns_fail_the_build() {
    let result = Grammar::builder("broken")
        .rules([Matcher::from(string("'").contains([Matcher::from(Match::new("("))]))])
        .build();

    let error = result.unwrap_err();
    assert_eq!(error.message(), "invalid grammar");
    assert!(error.to_string().contains("broken"));
}

#[test]
fn registry_lookup_is_case_sensitive() {
    let registry = Registry::standard().unwrap();
    assert_eq!(registry.get("Haxe").unwrap().name(), "Haxe");
    assert_eq!(registry.get("hx").unwrap().name(), "Haxe");
    assert_eq!(registry.get("jsonc").unwrap().name(), "json");

    let unknown = registry.get("HAXE").unwrap_err();
    assert_eq!(unknown.id, "HAXE");
    assert_eq!(unknown.to_string(), "unknown grammar `HAXE`");
    assert!(unknown.known.iter().any(|id| id == "hsc"));
    assert!(registry.highlight("x", "rust").is_err());
}

#[test]
fn registry_rejects_duplicate_ids() {
    let result = Registry::builder()
        .register(langs::plaintext().unwrap())
        .unwrap()
        .register(Grammar::builder("text").build().unwrap());

    let error = result.unwrap_err();
    assert_eq!(error.message(), "duplicate grammar identifier");
}

#[test]
fn registry_ids_are_sorted() {
    let registry = Registry::standard().unwrap();
    let ids: Vec<_> = registry.ids().collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
    assert_eq!(registry.len(), 3);
    assert!(registry.contains("plain"));
}

#[test]
fn auto_detection_prefers_relevance() {
    let registry = Registry::standard().unwrap();
    registry.warm_up();

    let (grammar, _) = registry.highlight_auto("class Main extends Base {}").unwrap();
    assert_eq!(grammar.name(), "Haxe");

    let (grammar, _) = registry.highlight_auto(r#"{"a": true}"#).unwrap();
    assert_eq!(grammar.name(), "json");

    assert!(Registry::default().highlight_auto("x").is_none());
}

static_assertions::assert_impl_all!(Registry: Send, Sync);
static_assertions::assert_impl_all!(Grammar: Send, Sync, Clone);
