//! Markdown sources, rendered to HTML ahead of rewriting.
//!
//! Fenced code blocks come out as `<pre><code class="language-X">`, which is
//! exactly what the rewriter highlights.

use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};

#[derive(Debug, Clone)]
pub struct Markdown<'a> {
    input: &'a str,
    options: Options,
}

/// Rendered Markdown: the HTML and the text of the first heading, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
    pub title: Option<String>,
}

impl<'a> Markdown<'a> {
    /// Markdown with every extension enabled except smart punctuation.
    pub fn new(input: &'a str) -> Self {
        Markdown {
            input,
            options: Options::all().difference(Options::ENABLE_SMART_PUNCTUATION),
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn render(&self) -> Rendered {
        let mut title: Option<String> = None;
        let mut in_title = false;
        let events = Parser::new_ext(self.input, self.options).inspect(|event| {
            match event {
                Event::Start(Tag::Heading { .. }) if title.is_none() => {
                    in_title = true;
                    title = Some(String::new());
                }
                Event::End(TagEnd::Heading(_)) => in_title = false,
                Event::Text(text) | Event::Code(text) if in_title => {
                    title.get_or_insert_with(String::new).push_str(text);
                }
                _ => {}
            }
        });

        let mut output = String::with_capacity(self.input.len() * 3 / 2);
        html::push_html(&mut output, events);
        Rendered { html: output, title }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_code_names_its_language() {
        let rendered = Markdown::new("```haxe\nvar x;\n```\n").render();
        assert_eq!(rendered.html, "<pre><code class=\"language-haxe\">var x;\n</code></pre>\n");
        assert_eq!(rendered.title, None);
    }

    #[test]
    fn title_is_the_first_heading() {
        let rendered = Markdown::new("# The `quire` book\n\n## Second\n").render();
        assert_eq!(rendered.title.as_deref(), Some("The quire book"));
    }

    #[test]
    fn punctuation_is_not_smart() {
        let rendered = Markdown::new("dashes -- and ... stay").render();
        assert_eq!(rendered.html, "<p>dashes -- and ... stay</p>\n");
    }
}
