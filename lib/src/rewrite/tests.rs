use crate::grammar::Registry;
use crate::html::{self, Document};
use crate::rewrite::*;

fn registry() -> Registry {
    Registry::standard().unwrap()
}

fn body(html: &str) -> &str {
    let start = html.find("<body>").map_or(0, |i| i + "<body>".len());
    let end = html.find("</body>").unwrap_or(html.len());
    &html[start..end]
}

fn rewrite_with(settings: RewriteSettings, input: &str) -> String {
    let registry = registry();
    let html = Rewriter::new(&registry, settings).rewrite_html(input).unwrap();
    body(&html).to_string()
}

fn rewrite_body(input: &str) -> String {
    rewrite_with(RewriteSettings::default(), input)
}

fn wiki() -> RewriteSettings {
    RewriteSettings { page_dir: "wiki".into(), ..Default::default() }
}

#[test]
fn references_are_rewritten_in_place() {
    let html = rewrite_with(wiki(), concat!(
        r#"<a href="/foo.md">a</a>"#,
        r#"<link href="root/style.css">"#,
        r#"<a href="notes.force-md">b</a>"#,
        r##"<a href="#">c</a>"##,
        r#"<img src="/img/x.png" srcset="root/x.png 2x">"#,
    ));

    assert!(html.contains(r#"<a href="/wiki/foo.html">a</a>"#));
    assert!(html.contains(r#"<link href="/style.css">"#));
    assert!(html.contains(r#"<a href="notes">b</a>"#));
    assert!(html.contains(r##"<a href="#">c</a>"##));
    assert!(html.contains(r#"<img src="/img/x.png" srcset="/x.png 2x">"#));
}

#[test]
fn actions_mode_elides_html_extensions() {
    let settings = RewriteSettings { mode: OutputMode::Actions, ..Default::default() };
    let html = rewrite_with(settings, r#"<a href="/page.html">p</a><iframe src="/embed.html"></iframe>"#);
    assert_eq!(html, r#"<a href="/page">p</a><iframe src="/embed"></iframe>"#);
}

#[test]
fn code_blocks_are_highlighted() {
    let html = rewrite_body(r#"<pre><code class="language-haxe">var x = 'a' &lt; b;</code></pre>"#);
    assert_eq!(html, concat!(
        r#"<pre class="hljs"><code class="language-haxe">"#,
        r#"<span class="hljs-keyword">var</span> x = <span class="hljs-string">'a'</span> &lt; b;"#,
        r#"</code></pre>"#,
    ));
}

#[test]
fn grammar_comes_from_the_first_class() {
    let html = rewrite_body(r#"<pre><code class="language-json extra">true</code></pre>"#);
    assert!(html.contains(r#"<span class="hljs-literal">true</span>"#));
}

#[test]
fn class_prefix_is_configurable() {
    let settings = RewriteSettings {
        class_prefix: "hl-".into(),
        highlighted_class: "highlighted".into(),
        ..Default::default()
    };

    let html = rewrite_with(settings, r#"<pre><code class="language-json">null</code></pre>"#);
    assert!(html.starts_with(r#"<pre class="highlighted">"#));
    assert!(html.contains(r#"<span class="hl-literal">null</span>"#));
}

#[test]
fn language_code_outside_pre_is_left_alone() {
    let input = r#"<p><code class="language-haxe">var</code></p>"#;
    assert_eq!(rewrite_body(input), input);
}

#[test]
fn inline_marking_is_idempotent() {
    let registry = registry();
    let rewriter = Rewriter::new(&registry, RewriteSettings::default());
    let mut document = Document::parse(r#"<p><code>a</code> <code class="x inline-code">b</code></p>"#);

    let first = rewriter.rewrite(&mut document).unwrap();
    let second = rewriter.rewrite(&mut document).unwrap();
    assert_eq!(first.inline, 1);
    assert_eq!(second.inline, 0);

    let classes: Vec<_> = document.elements_named("code").iter().map(html::classes).collect();
    assert_eq!(classes, [vec!["inline-code"], vec!["x", "inline-code"]]);
}

#[test]
fn opt_out_is_consumed_by_one_pass() {
    let registry = registry();
    let rewriter = Rewriter::new(&registry, RewriteSettings::default());
    let mut document = Document::parse(r#"<p><code class="no-inline">a</code></p>"#);

    let first = rewriter.rewrite(&mut document).unwrap();
    let code = document.elements_named("code")[0].clone();
    assert_eq!(first.opt_outs, 1);
    assert_eq!(html::attr(&code, "class"), None);

    // The marker is gone, so a second pass marks the element.
    let second = rewriter.rewrite(&mut document).unwrap();
    assert_eq!(second.inline, 1);
    assert_eq!(html::classes(&code), ["inline-code"]);
}

#[test]
fn plain_pre_blocks_are_marked_inline() {
    let html = rewrite_body("<pre><code>plain</code></pre>");
    assert_eq!(html, r#"<pre class="inline-code"><code class="inline-code">plain</code></pre>"#);

    let html = rewrite_body(r#"<pre class="no-inline wide"><code>plain</code></pre>"#);
    assert_eq!(html, r#"<pre class="wide"><code class="inline-code">plain</code></pre>"#);
}

#[test]
fn syntax_elements_become_code() {
    let html = rewrite_body(r#"<p><syntax lang="hx">trace(1)</syntax> and <syntax id="r">raw</syntax></p>"#);
    assert_eq!(html, concat!(
        r#"<p><code class="inline-syntax inline-code">"#,
        r#"<span class="hljs-title function_">trace</span>(<span class="hljs-number">1</span>)"#,
        r#"</code> and <code id="r" class="inline-syntax inline-code">raw</code></p>"#,
    ));
}

#[test]
fn unknown_grammars_fail_by_default() {
    let registry = registry();
    let rewriter = Rewriter::new(&registry, RewriteSettings::default());
    let error = rewriter.rewrite_html(r#"<pre><code class="language-rust">fn</code></pre>"#).unwrap_err();
    assert_eq!(error.message(), "unknown grammar `rust`");

    let error = rewriter.rewrite_html(r#"<syntax lang="Haxe ">x</syntax>"#).unwrap_err();
    assert_eq!(error.message(), "unknown grammar `Haxe `");
}

#[test]
fn unknown_grammars_can_warn() {
    let registry = registry();
    let settings = RewriteSettings { unknown_grammar: UnknownGrammarPolicy::Warn, ..Default::default() };
    let rewriter = Rewriter::new(&registry, settings);

    let input = r#"<pre><code class="language-rust">fn &lt;T&gt;</code></pre>"#;
    let mut document = Document::parse(input);
    let stats = rewriter.rewrite(&mut document).unwrap();
    assert_eq!(stats.unknown, 1);
    assert_eq!(stats.blocks, 0);
    assert_eq!(body(&document.to_html().unwrap()), input);
}

#[test]
fn empty_headings_are_dropped() {
    assert_eq!(rewrite_body("<h2></h2><h2>kept</h2>"), "<h2>kept</h2>");
}

#[test]
fn directories_get_trailing_slashes() {
    let registry = registry();
    let settings = RewriteSettings { page_dir: "wiki".into(), site_root: "..".into(), ..Default::default() };
    let rewriter = Rewriter::new(&registry, settings);
    assert_eq!(rewriter.settings().page_dir, "wiki/");
    assert_eq!(rewriter.settings().site_root, "../");
}
