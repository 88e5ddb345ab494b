//! The grammar engine: declarative, ordered rule tables that tokenize source
//! text into classified spans.
//!
//! A [`Grammar`] is a named list of [`Matcher`]s. Scanning proceeds left to
//! right; at each position the active rules are tried in declaration order and
//! the first to match wins. A [`Span`] rule pushes its own rules as the active
//! set until its end pattern matches. Unterminated spans close at the end of
//! input. A span's illegal pattern aborts it, leaving its text unclassified.
//!
//! Grammars are looked up by name or alias in an immutable [`Registry`].

mod pattern;
mod matcher;
mod keywords;
mod engine;
mod render;
mod registry;

pub mod langs;

pub use pattern::*;
pub use matcher::*;
pub use keywords::*;
pub use engine::{Highlight, HighlightEvent};
pub use render::*;
pub use registry::*;

use crate::error::{Chainable, Result};

/// A named language definition.
#[derive(Debug, Clone)]
pub struct Grammar {
    name: &'static str,
    aliases: Vec<&'static str>,
    pub(crate) keywords: KeywordClasses,
    pub(crate) rules: Vec<Matcher>,
    pub(crate) illegal: Option<Pattern>,
}

#[derive(Debug, Clone)]
pub struct GrammarBuilder {
    grammar: Grammar,
}

impl Grammar {
    pub fn builder(name: &'static str) -> GrammarBuilder {
        GrammarBuilder {
            grammar: Grammar {
                name,
                aliases: vec![],
                keywords: KeywordClasses::new(),
                rules: vec![],
                illegal: None,
            }
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn aliases(&self) -> &[&'static str] {
        &self.aliases
    }

    /// The name followed by every alias.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }

    pub fn keywords(&self) -> &KeywordClasses {
        &self.keywords
    }

    /// Tokenizes `text`. Never fails: unmatched text passes through
    /// unclassified and unterminated spans close at the end of input.
    pub fn highlight<'t>(&self, text: &'t str) -> Highlight<'t> {
        engine::highlight(self, text)
    }

    /// Visits every pattern in the grammar. Patterns in shared rules are
    /// visited once per occurrence.
    pub(crate) fn for_each_pattern<'a>(&'a self, f: &mut dyn FnMut(&'a Pattern)) {
        self.illegal.iter().for_each(&mut *f);
        self.rules.iter().for_each(|rule| rule.for_each_pattern(f));
    }
}

impl GrammarBuilder {
    pub fn aliases(mut self, aliases: &[&'static str]) -> Self {
        self.grammar.aliases.extend_from_slice(aliases);
        self
    }

    pub fn keywords(mut self, keywords: KeywordClasses) -> Self {
        self.grammar.keywords = keywords;
        self
    }

    pub fn rules<I: IntoIterator<Item = Matcher>>(mut self, rules: I) -> Self {
        self.grammar.rules.extend(rules);
        self
    }

    /// A pattern that, at the top level, is consumed as unclassified text.
    pub fn illegal(mut self, illegal: &str) -> Self {
        self.grammar.illegal = Some(Pattern::new(illegal));
        self
    }

    /// Checks every pattern, returning the grammar if all of them compile.
    pub fn build(self) -> Result<Grammar> {
        let grammar = self.grammar;
        let mut result = Ok(());
        grammar.for_each_pattern(&mut |pattern| {
            if result.is_ok() {
                result = pattern.check();
            }
        });

        result.chain_with(|| error!("invalid grammar", "grammar" => grammar.name))?;
        Ok(grammar)
    }
}

#[cfg(test)]
mod tests;
