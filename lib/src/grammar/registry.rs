use std::fmt;

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::error::{ErrorDetail, Result};
use crate::grammar::{langs, Grammar, Highlight, Pattern};

/// An immutable table of grammars indexed by name and alias.
///
/// Built once, at startup, with a [`RegistryBuilder`], then shared by
/// reference. Lookups are case-sensitive.
#[derive(Debug, Default)]
pub struct Registry {
    grammars: Vec<Grammar>,
    index: FxHashMap<&'static str, usize>,
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: Registry,
}

/// No registered grammar has the requested name or alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGrammar {
    pub id: String,
    pub known: Vec<String>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// A registry with every built-in grammar.
    pub fn standard() -> Result<Registry> {
        Ok(Registry::builder()
            .register(langs::haxe()?)?
            .register(langs::json()?)?
            .register(langs::plaintext()?)?
            .build())
    }

    pub fn get(&self, id: &str) -> Result<&Grammar, UnknownGrammar> {
        self.index.get(id)
            .map(|&i| &self.grammars[i])
            .ok_or_else(|| UnknownGrammar {
                id: id.to_string(),
                known: self.ids().map(|id| id.to_string()).collect(),
            })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Every name and alias, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> {
        let mut ids: Vec<_> = self.index.keys().copied().collect();
        ids.sort_unstable();
        ids.into_iter()
    }

    pub fn grammars(&self) -> impl Iterator<Item = &Grammar> {
        self.grammars.iter()
    }

    pub fn len(&self) -> usize {
        self.grammars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grammars.is_empty()
    }

    /// Tokenizes `text` with the grammar named or aliased `id`.
    pub fn highlight<'t>(&self, text: &'t str, id: &str) -> Result<Highlight<'t>, UnknownGrammar> {
        Ok(self.get(id)?.highlight(text))
    }

    /// Tokenizes `text` with every grammar and returns the most relevant
    /// result. Ties go to the grammar registered first.
    pub fn highlight_auto<'t>(&self, text: &'t str) -> Option<(&Grammar, Highlight<'t>)> {
        self.grammars.iter()
            .map(|grammar| (grammar, grammar.highlight(text)))
            .reduce(|best, next| match next.1.relevance() > best.1.relevance() {
                true => next,
                false => best,
            })
    }

    /// Compiles every pattern of every grammar, in parallel.
    pub fn warm_up(&self) {
        let mut patterns: Vec<&Pattern> = vec![];
        for grammar in &self.grammars {
            grammar.for_each_pattern(&mut |pattern| patterns.push(pattern));
        }

        patterns.par_iter().for_each(|pattern| pattern.compile());
    }
}

impl RegistryBuilder {
    /// Adds `grammar`. Fails if its name or an alias is already taken.
    pub fn register(mut self, grammar: Grammar) -> Result<Self> {
        let registry = &mut self.registry;
        let position = registry.grammars.len();
        for id in grammar.ids() {
            if let Some(&existing) = registry.index.get(id) {
                return err! {
                    "duplicate grammar identifier",
                    "identifier" => id,
                    "grammar" => grammar.name(),
                    "already used by" => registry.grammars[existing].name(),
                };
            }

            registry.index.insert(id, position);
        }

        registry.grammars.push(grammar);
        Ok(self)
    }

    pub fn build(self) -> Registry {
        self.registry
    }
}

impl fmt::Display for UnknownGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown grammar `{}`", self.id)
    }
}

impl std::error::Error for UnknownGrammar { }

impl ErrorDetail for UnknownGrammar {
    fn context(&self) -> Vec<(Option<String>, String)> {
        vec![(Some("known grammars".into()), self.known.join(", "))]
    }
}
