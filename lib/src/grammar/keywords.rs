use rustc_hash::FxHashSet;

use crate::grammar::Class;

/// Keyword categories, in order of precedence.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum KeywordClass {
    Keyword,
    Literal,
    BuiltIn,
    Variable,
}

/// Sets of literal words, one per [`KeywordClass`].
#[derive(Debug, Clone, Default)]
pub struct KeywordClasses {
    sets: [FxHashSet<&'static str>; 4],
}

impl KeywordClass {
    pub const PRECEDENCE: [KeywordClass; 4] = [
        KeywordClass::Keyword,
        KeywordClass::Literal,
        KeywordClass::BuiltIn,
        KeywordClass::Variable,
    ];

    pub fn class(self) -> Class {
        match self {
            KeywordClass::Keyword => "keyword",
            KeywordClass::Literal => "literal",
            KeywordClass::BuiltIn => "built_in",
            KeywordClass::Variable => "variable.language",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl KeywordClasses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, class: KeywordClass, words: &[&'static str]) -> Self {
        self.sets[class.index()].extend(words.iter().copied());
        self
    }

    /// Returns the highest precedence class containing `word`, if any.
    pub fn classify(&self, word: &str) -> Option<KeywordClass> {
        KeywordClass::PRECEDENCE.into_iter()
            .find(|class| self.sets[class.index()].contains(word))
    }

    pub fn is_empty(&self) -> bool {
        self.sets.iter().all(|set| set.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_is_fixed() {
        let classes = KeywordClasses::new()
            .with(KeywordClass::Variable, &["this", "trace"])
            .with(KeywordClass::BuiltIn, &["trace", "String"])
            .with(KeywordClass::Literal, &["null", "String"])
            .with(KeywordClass::Keyword, &["var", "null"]);

        assert_eq!(classes.classify("var"), Some(KeywordClass::Keyword));
        assert_eq!(classes.classify("null"), Some(KeywordClass::Keyword));
        assert_eq!(classes.classify("String"), Some(KeywordClass::Literal));
        assert_eq!(classes.classify("trace"), Some(KeywordClass::BuiltIn));
        assert_eq!(classes.classify("this"), Some(KeywordClass::Variable));
        assert_eq!(classes.classify("foo"), None);
        assert_eq!(classes.classify("Var"), None);
    }
}
