use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use syntect::parsing::{Regex, Region};

use crate::error::Result;

/// A regular expression that only ever matches starting at a given position.
///
/// Patterns use the oniguruma dialect, so lookahead, lookbehind, and `\b` see
/// the whole input, not just the text from the match position onward.
/// Compilation is lazy; [`Pattern::check()`] compiles eagerly and reports
/// errors, and is run for every pattern when a grammar is built.
#[derive(Clone)]
pub struct Pattern {
    source: Arc<str>,
    regex: Arc<Regex>,
}

/// The capture groups of a successful [`Pattern::find_at()`].
#[derive(Debug)]
pub struct Captures {
    region: Region,
    range: Range<usize>,
}

impl Pattern {
    pub fn new(source: &str) -> Pattern {
        let anchored = format!(r"\G(?:{source})");
        Pattern {
            source: source.into(),
            regex: Arc::new(Regex::new(anchored)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Compiles the pattern now, returning an error if it is invalid.
    pub fn check(&self) -> Result<()> {
        match Regex::try_compile(self.regex.regex_str()) {
            Some(e) => err! {
                "invalid pattern",
                "pattern" => &*self.source,
                "reason" => e,
            },
            None => Ok(()),
        }
    }

    /// Forces compilation of a checked pattern.
    pub(crate) fn compile(&self) {
        let _ = self.regex.is_match("");
    }

    /// Matches `self` against `text` beginning exactly at byte `pos`.
    pub fn find_at(&self, text: &str, pos: usize) -> Option<Captures> {
        let mut region = Region::new();
        if !self.regex.search(text, pos, text.len(), Some(&mut region)) {
            return None;
        }

        match region.pos(0) {
            Some((start, end)) if start == pos => Some(Captures { region, range: start..end }),
            _ => None,
        }
    }
}

impl Captures {
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn start(&self) -> usize {
        self.range.start
    }

    pub fn end(&self) -> usize {
        self.range.end
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// The range of capture group `index`, if it participated in the match.
    pub fn group(&self, index: usize) -> Option<Range<usize>> {
        self.region.pos(index).map(|(start, end)| start..end)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.source)
    }
}
