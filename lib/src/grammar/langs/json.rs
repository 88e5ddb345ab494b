use crate::error::Result;
use crate::grammar::{Grammar, KeywordClass, KeywordClasses, Match, Matcher};

use super::{block_comment, c_number, line_comment, quote_string};

pub fn json() -> Result<Grammar> {
    let keywords = KeywordClasses::new()
        .with(KeywordClass::Literal, &["true", "false", "null"]);

    Grammar::builder("json")
        .aliases(&["jsonc"])
        .keywords(keywords)
        .illegal(r"\S")
        .rules([
            Match::new(r#""(?:\\.|[^\\"\r\n])*"(?=\s*:)"#).class("attr").into(),
            Match::new(r"[{}\[\],:]").class("punctuation").relevance(0).into(),
            quote_string(),
            Matcher::keywords(r"[A-Za-z]+"),
            c_number(),
            line_comment(),
            block_comment(),
        ])
        .build()
}
