use crate::error::Result;
use crate::grammar::{Grammar, KeywordClass, KeywordClasses, Match, Matcher, Span};

use super::*;

const IDENT: &str = r"[A-Za-z$_][0-9A-Za-z$_]*";

const KEYWORDS: &[&str] = &[
    "as", "in", "of", "if", "for", "while", "finally", "var", "public",
    "private", "static", "dynamic", "inline", "override", "macro", "extern",
    "interface", "abstract", "enum", "typedef", "package", "new", "function",
    "do", "return", "void", "else", "break", "catch", "throw", "case",
    "default", "try", "switch", "continue", "final", "class", "import", "from",
    "extends",
];

const LITERALS: &[&str] = &["true", "false", "null"];

const TYPES: &[&str] = &[
    "Object", "Function", "Boolean", "Math", "Date", "Int", "Float", "String",
    "RegExp", "Array", "Map", "Json", "Reflect",
];

const ERROR_TYPES: &[&str] = &[
    "Error", "EvalError", "InternalError", "RangeError", "ReferenceError",
    "SyntaxError", "TypeError", "URIError",
];

const BUILT_IN_VARIABLES: &[&str] = &["this", "super", "trace"];

/// An optionally parenthesized parameter list followed by `=>`, with up to
/// three levels of nested parentheses.
fn func_lead_in() -> String {
    format!(r"(?:\([^()]*(?:\([^()]*(?:\([^()]*\)[^()]*)*\)[^()]*)*\)|{UNDERSCORE_IDENT})\s*=>")
}

fn keywords() -> Matcher {
    Matcher::keywords(IDENT)
}

fn numbers() -> Vec<Matcher> {
    let digits = r"[0-9](?:_?[0-9])*";
    let frac = format!(r"\.(?:{digits})");
    let integer = r"0|[1-9](?:_?[0-9])*|0[0-7]*[89][0-9]*";

    [
        format!(r"(?:\b(?:{integer})(?:(?:{frac})|\.)?|(?:{frac}))[eE][+-]?(?:{digits})\b"),
        format!(r"\b(?:{integer})\b(?:(?:{frac})\b|\.)?|(?:{frac})\b"),
        r"\b0[xX][0-9a-fA-F](?:_?[0-9a-fA-F])*n?\b".into(),
        r"\b0[bB][0-1](?:_?[0-1])*n?\b".into(),
    ].iter()
        .map(|pattern| Match::new(pattern).class("number").relevance(0).into())
        .collect()
}

fn comments() -> [Matcher; 2] {
    [block_comment(), line_comment()]
}

/// Strings, numbers, and balanced braces: what may appear inside parameters.
fn value_parts() -> Vec<Matcher> {
    let mut parts = vec![apos_string(), quote_string(), Match::new(r"\$\d+").into()];
    parts.extend(numbers());
    parts
}

fn braces() -> Matcher {
    let mut contains = vec![Matcher::Recurse];
    contains.extend(value_parts());
    contains.push(keywords());
    Span::new(r"\{", r"\}").contains(contains).into()
}

fn params_contains() -> Vec<Matcher> {
    let mut contains: Vec<Matcher> = comments().into();
    contains.extend(value_parts());
    contains.push(braces());

    let mut parens = vec![Matcher::Recurse];
    parens.extend(contains.iter().cloned());
    parens.push(keywords());
    contains.push(Span::new(r"(\s*)\(", r"\)").contains(parens).into());
    contains
}

/// A parenthesized parameter list, parentheses excluded from the class.
fn params() -> Matcher {
    Span::new(r"(\s*)\(", r"\)")
        .class("params")
        .exclude_begin()
        .exclude_end()
        .contains(params_contains())
        .contains([keywords()])
        .into()
}

fn class_reference() -> Matcher {
    let pattern = [
        r"\bJSON",
        r"\b[A-Z][a-z]+(?:[A-Z][a-z]*|\d)*",
        r"\b[A-Z]{2,}(?:[A-Z][a-z]+|\d)+(?:[A-Z][a-z]*)*",
        r"\b[A-Z]{2,}[a-z]+(?:[A-Z][a-z]+|\d)*(?:[A-Z][a-z]*)*",
    ].join("|");

    Match::new(&pattern).class("title.class").relevance(0).into()
}

/// `var f = (a, b) => ...`: the variable is titled as a function.
fn function_variable() -> Matcher {
    Span::open(&format!(r"(var|final)(\s+)({IDENT})(\s*)(=\s*)(?={})", func_lead_in()))
        .begin_captures(&[(1, "keyword"), (3, "title.function")])
        .contains([params()])
        .into()
}

/// Opens after an operator or `case`/`return`/`throw`, where a regular
/// expression or an arrow function may appear.
fn value_container() -> Matcher {
    let arrow_params: [Matcher; 3] = [
        Match::new(UNDERSCORE_IDENT).class("params").relevance(0).into(),
        Match::new(r"\(\s*\)").into(),
        Span::new(r"(\s*)\(", r"\)")
            .class("params")
            .exclude_begin()
            .exclude_end()
            .contains(params_contains())
            .contains([keywords()])
            .into(),
    ];

    let arrow_function = Span::new(&func_lead_in(), r"\s*(?:->|=>)")
        .class("function")
        .return_begin()
        .contains(arrow_params);

    Span::open(&format!(r"(?:{RE_STARTERS}|\b(case|return|throw)\b)\s*"))
        .begin_captures(&[(1, "keyword")])
        .relevance(0)
        .contains(comments())
        .contains([
            regexp(),
            arrow_function.into(),
            Match::new(",").relevance(0).into(),
            Match::new(r"\s+").relevance(0).into(),
        ])
        .into()
}

fn function_definitions() -> [Matcher; 2] {
    let named = format!(r"(function)(\s+)({IDENT})(?=\s*\()");
    let anonymous = r"(function)(\s*)(?=\()";

    [named.as_str(), anonymous].map(|begin| {
        Span::open(begin)
            .begin_captures(&[(1, "keyword"), (3, "title.function")])
            .illegal("%")
            .contains([params()])
            .into()
    })
}

/// `name(args) {`: a method declaration without the `function` keyword.
fn method_definition() -> Matcher {
    let begin = format!(concat!(
        r"\b(?!function){}\(",
        r"[^()]*(?:\([^()]*(?:\([^()]*\)[^()]*)*\)[^()]*)*",
        r"\)\s*\{{",
    ), UNDERSCORE_IDENT);

    Span::open(&begin)
        .return_begin()
        .contains([
            params(),
            Match::new(IDENT).class("title.function").relevance(0).into(),
        ])
        .into()
}

fn property_access() -> Matcher {
    Span::new(&format!(r"\.(?={IDENT}(?![0-9A-Za-z$_(]))"), IDENT)
        .class("property")
        .exclude_begin()
        .relevance(0)
        .into()
}

fn class_declarations() -> [Matcher; 2] {
    let extends = format!(r"(class)(\s+)({IDENT})(\s+)(extends)(\s+)({IDENT}(?:\.{IDENT})*)");
    let plain = format!(r"(class)(\s+)({IDENT})");

    [
        Match::new(&extends).captures(&[
            (1, "keyword"),
            (3, "title.class"),
            (5, "keyword"),
            (7, "title.class.inherited"),
        ]).into(),
        Match::new(&plain).captures(&[(1, "keyword"), (3, "title.class")]).into(),
    ]
}

fn accessor() -> Matcher {
    Span::open(&format!(r"(get|set)(\s+)({IDENT})(?=\()"))
        .begin_captures(&[(1, "keyword"), (3, "title.function")])
        .contains([Match::new(r"\(\)").into(), params()])
        .into()
}

/// The Haxe grammar, registered as `Haxe` with aliases `haxe`, `hx`,
/// `hscript`, and `hsc`.
pub fn haxe() -> Result<Grammar> {
    let classes = KeywordClasses::new()
        .with(KeywordClass::Keyword, KEYWORDS)
        .with(KeywordClass::Literal, LITERALS)
        .with(KeywordClass::BuiltIn, TYPES)
        .with(KeywordClass::BuiltIn, ERROR_TYPES)
        .with(KeywordClass::Variable, BUILT_IN_VARIABLES);

    let mut rules = vec![shebang("node"), apos_string(), quote_string()];
    rules.extend(comments());
    rules.push(Match::new(r"\$\d+").into());
    rules.extend(numbers());
    rules.extend([
        class_reference(),
        Match::new(&format!("{IDENT}(?=:)")).class("attr").relevance(0).into(),
        function_variable(),
        value_container(),
    ]);
    rules.extend(function_definitions());
    rules.extend([
        Match::new(r"\b(?:while|if|switch|catch|for)(?!\.)(?=\b|\s)").class("keyword").into(),
        method_definition(),
        Match::new(r"\.\.\.").relevance(0).into(),
        property_access(),
        Match::new(&format!(r"\${IDENT}")).relevance(0).into(),
        Span::open(r"(\bnew)(?=\s*\()")
            .begin_captures(&[(1, "title.function")])
            .contains([params()])
            .into(),
        Match::new(&format!(r"\b(?!(?:super|import)\s*\(){IDENT}(?=\s*\()"))
            .class("title.function")
            .relevance(0)
            .into(),
        Match::new(r"\b[A-Z][A-Z_0-9]+\b").class("variable.constant").relevance(0).into(),
    ]);
    rules.extend(class_declarations());
    rules.extend([
        accessor(),
        Match::new(r"\$[(.]").into(),
        keywords(),
    ]);

    Grammar::builder("Haxe")
        .aliases(&["haxe", "hx", "hscript", "hsc"])
        .keywords(classes)
        .illegal(r"#(?![$_A-z])")
        .rules(rules)
        .build()
}
