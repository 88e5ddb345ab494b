//! The reference rewriter: a post-processing pass over generated HTML.
//!
//! A [`Rewriter`] walks a parsed [`Document`] in four phases, each over a
//! snapshot of the nodes it touches:
//!
//!   1. Every `href`, `src`, and `srcset` attribute is rewritten with
//!      [`rewrite()`] so links are root-relative and point at
//!      `.html` outputs.
//!   2. Every `<code class="language-X">` inside a `<pre>` is highlighted with
//!      grammar `X`; its parent is marked with the highlighted class.
//!   3. Every other `<code>` (and the parent of such a `<code>` inside a
//!      `<pre>`) is marked as inline code unless it carries `no-inline`. The
//!      `no-inline` class is consumed: it is removed, so a second pass marks
//!      the element.
//!   4. Every `<syntax>` element becomes a `<code class="inline-syntax
//!      inline-code">`. If it had a `lang` attribute, it is highlighted with
//!      that grammar.

mod refs;

pub use refs::*;

use log::{debug, warn};
use markup5ever_rcdom::Handle;
use serde::Deserialize;

use crate::error::Result;
use crate::grammar::{css_classes, Highlight, HighlightEvent, Registry, DEFAULT_CLASS_PREFIX};
use crate::html::{self, Document};
use crate::util::with_trailing_slash;

/// Marks code that is styled inline.
pub const INLINE_CLASS: &str = "inline-code";
/// Marks `<syntax>` elements after conversion to `<code>`.
pub const INLINE_SYNTAX_CLASS: &str = "inline-syntax";
/// Opts an element out of inline marking, once.
pub const OPT_OUT_CLASS: &str = "no-inline";
/// Prefix of the class naming a code block's grammar.
pub const LANGUAGE_PREFIX: &str = "language-";

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Standard,
    /// Link targets are emitted without their `.html` extension.
    Actions,
}

/// What to do with a code block naming a grammar that isn't registered.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownGrammarPolicy {
    /// Fail the rewrite with an [`UnknownGrammar`](crate::grammar::UnknownGrammar) error.
    Fail,
    /// Log a warning and leave the element untouched.
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteSettings {
    /// Directory of the page, relative to the site root.
    pub page_dir: String,
    /// Path from the page's output to the site root.
    pub site_root: String,
    pub mode: OutputMode,
    pub unknown_grammar: UnknownGrammarPolicy,
    /// Prefix of highlight span classes.
    pub class_prefix: String,
    /// Class added to the parent of a highlighted block.
    pub highlighted_class: String,
}

/// What a rewrite changed.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RewriteStats {
    /// Reference attributes whose value changed.
    pub references: usize,
    /// Highlighted code blocks.
    pub blocks: usize,
    /// Elements newly marked as inline code.
    pub inline: usize,
    /// `no-inline` markers consumed.
    pub opt_outs: usize,
    /// Converted `<syntax>` elements.
    pub syntax: usize,
    /// Elements left alone because their grammar is unknown.
    pub unknown: usize,
}

impl std::ops::AddAssign for RewriteStats {
    fn add_assign(&mut self, other: Self) {
        self.references += other.references;
        self.blocks += other.blocks;
        self.inline += other.inline;
        self.opt_outs += other.opt_outs;
        self.syntax += other.syntax;
        self.unknown += other.unknown;
    }
}

pub struct Rewriter<'r> {
    registry: &'r Registry,
    settings: RewriteSettings,
}

impl Default for RewriteSettings {
    fn default() -> Self {
        RewriteSettings {
            page_dir: "./".into(),
            site_root: "./".into(),
            mode: OutputMode::Standard,
            unknown_grammar: UnknownGrammarPolicy::Fail,
            class_prefix: DEFAULT_CLASS_PREFIX.into(),
            highlighted_class: "hljs".into(),
        }
    }
}

impl<'r> Rewriter<'r> {
    /// A rewriter highlighting with grammars from `registry`. Directories in
    /// `settings` get a trailing `/` if they are missing one.
    pub fn new(registry: &'r Registry, mut settings: RewriteSettings) -> Self {
        settings.page_dir = with_trailing_slash(&settings.page_dir);
        settings.site_root = with_trailing_slash(&settings.site_root);
        Rewriter { registry, settings }
    }

    pub fn settings(&self) -> &RewriteSettings {
        &self.settings
    }

    /// Parses, rewrites, and serializes `html`.
    pub fn rewrite_html(&self, html: &str) -> Result<String> {
        let mut document = Document::parse(html);
        self.rewrite(&mut document)?;
        document.to_html()
    }

    /// Rewrites `document` in place.
    pub fn rewrite(&self, document: &mut Document) -> Result<RewriteStats> {
        let mut stats = RewriteStats::default();
        self.rewrite_refs(document, &mut stats);
        self.highlight_blocks(document, &mut stats)?;
        self.mark_inline(document, &mut stats);
        self.convert_syntax(document, &mut stats)?;

        debug!("rewrote {} references, highlighted {} blocks, marked {} inline, \
            converted {} syntax elements ({} unknown grammars)",
            stats.references, stats.blocks, stats.inline, stats.syntax, stats.unknown);

        Ok(stats)
    }

    fn rewrite_refs(&self, document: &Document, stats: &mut RewriteStats) {
        let cx = RefContext {
            page_dir: &self.settings.page_dir,
            site_root: &self.settings.site_root,
            actions: self.settings.mode == OutputMode::Actions,
        };

        for element in document.elements() {
            for kind in RefKind::ALL {
                let Some(value) = html::attr(&element, kind.attribute()) else { continue };
                let rewritten = rewrite(&value, kind, &cx);
                if rewritten != value {
                    html::set_attr(&element, kind.attribute(), &rewritten);
                    stats.references += 1;
                }
            }
        }
    }

    fn highlight_blocks(&self, document: &Document, stats: &mut RewriteStats) -> Result<()> {
        for code in document.elements_named("code") {
            let Some(id) = grammar_id(&code) else { continue };
            if !html::has_ancestor(&code, "pre") {
                continue;
            }

            if self.highlight_into(&code, &id, stats)? {
                if let Some(parent) = html::parent(&code) {
                    html::add_classes(&parent, &[self.settings.highlighted_class.as_str()]);
                }

                stats.blocks += 1;
            }
        }

        Ok(())
    }

    fn mark_inline(&self, document: &Document, stats: &mut RewriteStats) {
        let plain: Vec<Handle> = document.elements_named("code")
            .into_iter()
            .filter(|code| !is_language_block(code))
            .collect();

        for code in &plain {
            mark_element(code, stats);
        }

        for code in plain.iter().filter(|code| html::has_ancestor(code, "pre")) {
            if let Some(parent) = html::parent(code) {
                mark_element(&parent, stats);
            }
        }
    }

    fn convert_syntax(&self, document: &Document, stats: &mut RewriteStats) -> Result<()> {
        for syntax in document.elements_named("syntax") {
            let code = html::rename(&syntax, "code");
            html::add_classes(&code, &[INLINE_SYNTAX_CLASS, INLINE_CLASS]);
            if let Some(lang) = html::remove_attr(&code, "lang") {
                self.highlight_into(&code, &lang, stats)?;
            }

            stats.syntax += 1;
        }

        Ok(())
    }

    /// Replaces the content of `node` with its text highlighted by grammar
    /// `id`. Returns `false` if the grammar is unknown and the policy is to
    /// warn.
    fn highlight_into(&self, node: &Handle, id: &str, stats: &mut RewriteStats) -> Result<bool> {
        let grammar = match self.registry.get(id) {
            Ok(grammar) => grammar,
            Err(e) => match self.settings.unknown_grammar {
                UnknownGrammarPolicy::Fail => return Err(e.into()),
                UnknownGrammarPolicy::Warn => {
                    warn!("{e}: leaving code unhighlighted");
                    stats.unknown += 1;
                    return Ok(false);
                }
            },
        };

        let source = html::text_content(node);
        let highlight = grammar.highlight(&source);
        html::set_children(node, highlighted_nodes(&highlight, &self.settings.class_prefix));
        Ok(true)
    }
}

/// Whether the `class` attribute of `node` starts with `language-`.
fn is_language_block(node: &Handle) -> bool {
    html::attr(node, "class").is_some_and(|class| class.starts_with(LANGUAGE_PREFIX))
}

/// The grammar named by the `language-X` class of `node`.
fn grammar_id(node: &Handle) -> Option<String> {
    if !is_language_block(node) {
        return None;
    }

    html::classes(node).first()
        .and_then(|class| class.strip_prefix(LANGUAGE_PREFIX))
        .map(String::from)
}

fn mark_element(node: &Handle, stats: &mut RewriteStats) {
    if html::has_class(node, OPT_OUT_CLASS) {
        html::remove_class(node, OPT_OUT_CLASS);
        stats.opt_outs += 1;
    } else if !html::has_class(node, INLINE_CLASS) {
        html::add_classes(node, &[INLINE_CLASS]);
        stats.inline += 1;
    }
}

/// Builds `<span>` elements and text nodes from highlight events.
fn highlighted_nodes(highlight: &Highlight<'_>, prefix: &str) -> Vec<Handle> {
    let mut roots = vec![];
    let mut open: Vec<Handle> = vec![];
    let mut push = |node: Handle, open: &[Handle]| match open.last() {
        Some(parent) => html::append(parent, node),
        None => roots.push(node),
    };

    for event in highlight.events() {
        match *event {
            HighlightEvent::Start(class) => {
                let classes = css_classes(class, prefix);
                let span = html::element("span", &[("class", classes.as_str())]);
                push(span.clone(), &open);
                open.push(span);
            }
            HighlightEvent::Source { start, end } => {
                push(html::text(&highlight.source()[start..end]), &open);
            }
            HighlightEvent::End => { open.pop(); }
        }
    }

    roots
}

#[cfg(test)]
mod tests;
