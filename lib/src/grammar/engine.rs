use std::ops::Range;
use std::sync::Arc;

use crate::grammar::{Captures, Class, Grammar, Matcher, Scope, Span};

/// One step of a highlighted rendition of some source text. `Start` and `End`
/// are balanced; `Source` events cover the input exactly once, in order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HighlightEvent {
    Start(Class),
    Source { start: usize, end: usize },
    End,
}

/// The result of tokenizing some text with a [`Grammar`].
#[derive(Debug, Clone)]
pub struct Highlight<'a> {
    source: &'a str,
    events: Vec<HighlightEvent>,
    relevance: u32,
    max_depth: usize,
    illegal: usize,
}

/// An open span on the scanner's stack.
struct Frame {
    span: Arc<Span>,
    /// Position of the span's begin match.
    start: usize,
    /// Length of the event list before the span emitted anything.
    mark: usize,
    /// Index of the rule that opened the span in its parent's rule list.
    index: usize,
}

/// Where to resume trying rules after a span closed without consuming input,
/// so the same rule isn't reopened at the same position forever.
#[derive(Copy, Clone)]
struct Resume {
    pos: usize,
    depth: usize,
    next: usize,
}

/// An explicit-stack scanner. Nested spans, including self-recursive ones,
/// push frames onto `stack` instead of recursing natively.
struct Scanner<'g, 't> {
    grammar: &'g Grammar,
    text: &'t str,
    pos: usize,
    stack: Vec<Frame>,
    events: Vec<HighlightEvent>,
    resume: Option<Resume>,
    relevance: u32,
    max_depth: usize,
    illegal: usize,
}

pub(crate) fn highlight<'t>(grammar: &Grammar, text: &'t str) -> Highlight<'t> {
    let mut scanner = Scanner {
        grammar,
        text,
        pos: 0,
        stack: vec![],
        events: vec![],
        resume: None,
        relevance: 0,
        max_depth: 0,
        illegal: 0,
    };

    while scanner.pos < text.len() {
        if scanner.step_rules() || scanner.step_end() {
            continue;
        }

        scanner.step_literal();
    }

    scanner.finish()
}

impl<'t> Scanner<'_, 't> {
    /// Tries the active rules in order at the current position.
    fn step_rules(&mut self) -> bool {
        let first = match self.resume.take() {
            Some(r) if r.pos == self.pos && r.depth == self.stack.len() => r.next,
            _ => 0,
        };

        let (grammar, text) = (self.grammar, self.text);
        let current = self.stack.last().map(|frame| frame.span.clone());
        let rules = match &current {
            Some(span) => &span.contains[..],
            None => &grammar.rules[..],
        };

        for (index, rule) in rules.iter().enumerate().skip(first) {
            let matched = match rule {
                Matcher::Match(m) => match m.pattern.find_at(text, self.pos) {
                    Some(caps) if !caps.is_empty() => {
                        self.emit_scoped(&m.scope, &caps);
                        self.relevance += m.relevance;
                        self.pos = caps.end();
                        true
                    }
                    _ => false,
                },
                Matcher::Keywords(pattern) => match pattern.find_at(text, self.pos) {
                    Some(caps) if !caps.is_empty() => {
                        match grammar.keywords.classify(&text[caps.range()]) {
                            Some(kind) => {
                                self.emit_classed(kind.class(), caps.range());
                                self.relevance += 1;
                            }
                            None => self.emit_text(caps.range()),
                        }

                        self.pos = caps.end();
                        true
                    }
                    _ => false,
                },
                Matcher::Span(span) => self.open(span, index),
                Matcher::Recurse => match &current {
                    Some(span) => self.open(span, index),
                    None => false,
                },
            };

            if matched {
                return true;
            }
        }

        false
    }

    fn open(&mut self, span: &Arc<Span>, index: usize) -> bool {
        let caps = match span.begin.find_at(self.text, self.pos) {
            Some(caps) if span.return_begin || !caps.is_empty() => caps,
            _ => return false,
        };

        // Frames opened at this position sit on top of the stack. Reopening
        // one of them here would loop without consuming input.
        let reopened = self.stack.iter().rev()
            .take_while(|frame| frame.start == self.pos)
            .any(|frame| Arc::ptr_eq(&frame.span, span));

        if reopened {
            return false;
        }

        let frame = Frame {
            span: span.clone(),
            start: self.pos,
            mark: self.events.len(),
            index,
        };

        if span.return_begin {
            self.events.extend(span.class.map(HighlightEvent::Start));
        } else if span.exclude_begin {
            self.emit_scoped(&span.begin_scope, &caps);
            self.events.extend(span.class.map(HighlightEvent::Start));
            self.pos = caps.end();
        } else {
            self.events.extend(span.class.map(HighlightEvent::Start));
            self.emit_scoped(&span.begin_scope, &caps);
            self.pos = caps.end();
        }

        self.relevance += span.relevance;
        self.stack.push(frame);
        self.max_depth = self.max_depth.max(self.stack.len());
        true
    }

    /// Closes or aborts the innermost span if its end or illegal pattern
    /// matches here.
    fn step_end(&mut self) -> bool {
        let Some(span) = self.stack.last().map(|frame| frame.span.clone()) else {
            return false;
        };

        let Some(end) = &span.end else {
            self.close(None);
            return true;
        };

        if let Some(caps) = end.find_at(self.text, self.pos) {
            self.close(Some(caps));
            return true;
        }

        if let Some(illegal) = &span.illegal {
            if illegal.find_at(self.text, self.pos).is_some() {
                self.abort();
                return true;
            }
        }

        false
    }

    fn close(&mut self, caps: Option<Captures>) {
        let Some(frame) = self.stack.pop() else { return };
        let span = &frame.span;
        match caps {
            Some(caps) if span.exclude_end => {
                self.events.extend(span.class.map(|_| HighlightEvent::End));
                self.emit_text(caps.range());
                self.pos = caps.end();
            }
            Some(caps) => {
                self.emit_text(caps.range());
                self.events.extend(span.class.map(|_| HighlightEvent::End));
                self.pos = caps.end();
            }
            None => self.events.extend(span.class.map(|_| HighlightEvent::End)),
        }

        if self.pos == frame.start {
            self.events.truncate(frame.mark);
            self.resume_after(&frame);
        }
    }

    /// Drops the innermost span's classification: everything from its begin
    /// up to the current position becomes plain text.
    fn abort(&mut self) {
        let Some(frame) = self.stack.pop() else { return };
        self.events.truncate(frame.mark);
        self.emit_text(frame.start..self.pos);
        self.illegal += 1;
        if self.pos == frame.start {
            self.resume_after(&frame);
        }
    }

    fn resume_after(&mut self, frame: &Frame) {
        self.resume = Some(Resume {
            pos: self.pos,
            depth: self.stack.len(),
            next: frame.index + 1,
        });
    }

    /// Consumes an unmatched top-level illegal lexeme or a single character.
    fn step_literal(&mut self) {
        if self.stack.is_empty() {
            let illegal = self.grammar.illegal.as_ref()
                .and_then(|p| p.find_at(self.text, self.pos))
                .filter(|caps| !caps.is_empty());

            if let Some(caps) = illegal {
                self.illegal += 1;
                self.emit_text(caps.range());
                self.pos = caps.end();
                return;
            }
        }

        let len = self.text[self.pos..].chars().next().map_or(1, char::len_utf8);
        self.emit_text(self.pos..self.pos + len);
        self.pos += len;
    }

    fn emit_text(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }

        if let Some(HighlightEvent::Source { end, .. }) = self.events.last_mut() {
            if *end == range.start {
                *end = range.end;
                return;
            }
        }

        self.events.push(HighlightEvent::Source { start: range.start, end: range.end });
    }

    fn emit_classed(&mut self, class: Class, range: Range<usize>) {
        self.events.push(HighlightEvent::Start(class));
        self.emit_text(range);
        self.events.push(HighlightEvent::End);
    }

    fn emit_scoped(&mut self, scope: &Scope, caps: &Captures) {
        match scope {
            Scope::None => self.emit_text(caps.range()),
            Scope::Class(class) => self.emit_classed(*class, caps.range()),
            Scope::Captures(groups) => {
                let mut cursor = caps.start();
                for &(index, class) in groups {
                    let Some(group) = caps.group(index) else { continue };
                    if group.is_empty() || group.start < cursor || group.end > caps.end() {
                        continue;
                    }

                    self.emit_text(cursor..group.start);
                    self.emit_classed(class, group.clone());
                    cursor = group.end;
                }

                self.emit_text(cursor..caps.end());
            }
        }
    }

    /// Implicitly closes every span left open at the end of input.
    fn finish(mut self) -> Highlight<'t> {
        while let Some(frame) = self.stack.pop() {
            self.events.extend(frame.span.class.map(|_| HighlightEvent::End));
        }

        Highlight {
            source: self.text,
            events: self.events,
            relevance: self.relevance,
            max_depth: self.max_depth,
            illegal: self.illegal,
        }
    }
}

impl<'a> Highlight<'a> {
    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn events(&self) -> &[HighlightEvent] {
        &self.events
    }

    /// Sum of the relevance of every rule that matched.
    pub fn relevance(&self) -> u32 {
        self.relevance
    }

    /// The deepest span nesting reached while scanning.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of illegal matches: aborted spans plus top-level lexemes.
    pub fn illegal(&self) -> usize {
        self.illegal
    }

    /// Returns runs of source text paired with their innermost class.
    pub fn runs(&self) -> Vec<(Option<Class>, &'a str)> {
        let mut classes = vec![];
        let mut runs = vec![];
        for event in &self.events {
            match *event {
                HighlightEvent::Start(class) => classes.push(class),
                HighlightEvent::End => { classes.pop(); },
                HighlightEvent::Source { start, end } => {
                    runs.push((classes.last().copied(), &self.source[start..end]));
                }
            }
        }

        runs
    }

    /// Returns the text of every run classified exactly as `class`.
    pub fn classified(&self, class: Class) -> Vec<&'a str> {
        self.runs().into_iter()
            .filter(|(c, _)| *c == Some(class))
            .map(|(_, text)| text)
            .collect()
    }
}
