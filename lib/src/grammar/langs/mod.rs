//! Built-in grammars and the rules they share.

mod haxe;
mod json;

pub use haxe::haxe;
pub use json::json;

use crate::error::Result;
use crate::grammar::{Grammar, Match, Matcher, Span};

/// Operators and punctuation after which an expression (a "value") may begin.
pub const RE_STARTERS: &str = concat!(
    r"!|!=|!==|%|%=|&|&&|&=|\*|\*=|\+|\+=|,|-|-=|/=|/|:|;|<<|<<=|<=|<|===|==|=|",
    r">>>=|>>=|>=|>>>|>>|>|\?|\[|\{|\(|\^|\^=|\||\|=|\|\||~",
);

pub const UNDERSCORE_IDENT: &str = r"[a-zA-Z_]\w*";

/// Text with no rules at all: every character passes through unclassified.
pub fn plaintext() -> Result<Grammar> {
    Grammar::builder("plaintext")
        .aliases(&["text", "txt", "plain"])
        .build()
}

/// A backslash and the character it escapes, unclassified.
pub fn backslash_escape() -> Matcher {
    Match::new(r"\\[\s\S]").relevance(0).into()
}

fn quoted_string(quote: &str) -> Matcher {
    Span::new(quote, quote)
        .class("string")
        .illegal(r"\n")
        .relevance(0)
        .contains([backslash_escape()])
        .into()
}

/// A single-quoted string with backslash escapes.
pub fn apos_string() -> Matcher {
    quoted_string("'")
}

/// A double-quoted string with backslash escapes.
pub fn quote_string() -> Matcher {
    quoted_string("\"")
}

fn doctag() -> Matcher {
    Match::new(r"(?:TODO|FIXME|NOTE|BUG|OPTIMIZE|HACK|XXX):")
        .class("doctag")
        .relevance(0)
        .into()
}

pub fn comment(begin: &str, end: &str) -> Span {
    Span::new(begin, end)
        .class("comment")
        .relevance(0)
        .contains([doctag()])
}

/// `// ...` to the end of the line.
pub fn line_comment() -> Matcher {
    comment("//", "$").into()
}

/// `/* ... */`.
pub fn block_comment() -> Matcher {
    comment(r"/\*", r"\*/").into()
}

/// Integers, decimals, hexadecimals, and exponents, optionally negative.
pub fn c_number() -> Matcher {
    Match::new(r"(?:-?)(?:\b0[xX][a-fA-F0-9]+|(?:\b\d+(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?)")
        .class("number")
        .relevance(0)
        .into()
}

/// A `/.../flags` regular expression literal.
pub fn regexp() -> Matcher {
    Span::new(r"/(?=[^/\n]*/)", r"/[gimuy]*")
        .class("regexp")
        .contains([
            backslash_escape(),
            Span::new(r"\[", r"\]").relevance(0).contains([backslash_escape()]).into(),
        ])
        .into()
}

/// A `#!` line naming `binary`.
pub fn shebang(binary: &str) -> Matcher {
    Match::new(&format!(r"^#![ ]*/.*\b{binary}\b.*"))
        .class("meta")
        .relevance(5)
        .into()
}
