use std::sync::Arc;

use crate::grammar::Pattern;

/// A highlight class such as `keyword` or `title.class`. Dots separate
/// sub-scopes.
pub type Class = &'static str;

/// How the text matched by a pattern is classified.
#[derive(Debug, Clone, Default)]
pub enum Scope {
    /// The matched text is emitted unclassified.
    #[default]
    None,
    /// All of the matched text receives one class.
    Class(Class),
    /// Capture group `n` receives the paired class. Text outside of any listed
    /// group is emitted unclassified.
    Captures(Vec<(usize, Class)>),
}

/// A single tokenization rule.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// A single-shot match with no nested content.
    Match(Match),
    /// A delimited region with its own set of active rules.
    Span(Arc<Span>),
    /// Matches an identifier and classifies it with the grammar's
    /// [`KeywordClasses`](crate::grammar::KeywordClasses). Identifiers in no
    /// class are consumed and emitted unclassified.
    Keywords(Pattern),
    /// Stands for the innermost enclosing [`Span`], permitting unbounded
    /// nesting such as balanced parentheses. Ignored at the top level.
    Recurse,
}

#[derive(Debug, Clone)]
pub struct Match {
    pub pattern: Pattern,
    pub scope: Scope,
    pub relevance: u32,
}

#[derive(Debug, Clone)]
pub struct Span {
    /// Class wrapping the whole span, delimiters included unless excluded.
    pub class: Option<Class>,
    pub begin: Pattern,
    pub begin_scope: Scope,
    /// When `None`, the span closes at the first position where none of its
    /// rules match.
    pub end: Option<Pattern>,
    pub contains: Vec<Matcher>,
    /// Matching this inside the span aborts it; the span's text so far is
    /// emitted unclassified.
    pub illegal: Option<Pattern>,
    pub exclude_begin: bool,
    pub exclude_end: bool,
    /// Don't consume the text matched by `begin`: the span's rules see it.
    pub return_begin: bool,
    pub relevance: u32,
}

impl Match {
    pub fn new(pattern: &str) -> Self {
        Match { pattern: Pattern::new(pattern), scope: Scope::None, relevance: 1 }
    }

    pub fn class(mut self, class: Class) -> Self {
        self.scope = Scope::Class(class);
        self
    }

    pub fn captures(mut self, groups: &[(usize, Class)]) -> Self {
        self.scope = Scope::captures(groups);
        self
    }

    pub fn relevance(mut self, relevance: u32) -> Self {
        self.relevance = relevance;
        self
    }
}

impl Span {
    /// A span delimited by `begin` and `end`.
    pub fn new(begin: &str, end: &str) -> Self {
        Span::open(begin).end(end)
    }

    /// A span delimited by `begin` that ends when none of its rules match.
    pub fn open(begin: &str) -> Self {
        Span {
            class: None,
            begin: Pattern::new(begin),
            begin_scope: Scope::None,
            end: None,
            contains: vec![],
            illegal: None,
            exclude_begin: false,
            exclude_end: false,
            return_begin: false,
            relevance: 1,
        }
    }

    pub fn end(mut self, end: &str) -> Self {
        self.end = Some(Pattern::new(end));
        self
    }

    pub fn class(mut self, class: Class) -> Self {
        self.class = Some(class);
        self
    }

    pub fn begin_captures(mut self, groups: &[(usize, Class)]) -> Self {
        self.begin_scope = Scope::captures(groups);
        self
    }

    pub fn contains<I: IntoIterator<Item = Matcher>>(mut self, matchers: I) -> Self {
        self.contains.extend(matchers);
        self
    }

    pub fn illegal(mut self, illegal: &str) -> Self {
        self.illegal = Some(Pattern::new(illegal));
        self
    }

    pub fn exclude_begin(mut self) -> Self {
        self.exclude_begin = true;
        self
    }

    pub fn exclude_end(mut self) -> Self {
        self.exclude_end = true;
        self
    }

    pub fn return_begin(mut self) -> Self {
        self.return_begin = true;
        self
    }

    pub fn relevance(mut self, relevance: u32) -> Self {
        self.relevance = relevance;
        self
    }
}

impl Scope {
    fn captures(groups: &[(usize, Class)]) -> Self {
        let mut groups = groups.to_vec();
        groups.sort_by_key(|(index, _)| *index);
        Scope::Captures(groups)
    }
}

impl Matcher {
    pub fn keywords(pattern: &str) -> Self {
        Matcher::Keywords(Pattern::new(pattern))
    }

    /// Visits every pattern reachable from `self`.
    pub(crate) fn for_each_pattern<'a>(&'a self, f: &mut dyn FnMut(&'a Pattern)) {
        match self {
            Matcher::Match(m) => f(&m.pattern),
            Matcher::Keywords(pattern) => f(pattern),
            Matcher::Recurse => {},
            Matcher::Span(span) => {
                f(&span.begin);
                span.end.iter().chain(span.illegal.iter()).for_each(&mut *f);
                span.contains.iter().for_each(|m| m.for_each_pattern(f));
            }
        }
    }
}

impl From<Match> for Matcher {
    fn from(value: Match) -> Self {
        Matcher::Match(value)
    }
}

impl From<Span> for Matcher {
    fn from(value: Span) -> Self {
        Matcher::Span(Arc::new(value))
    }
}
