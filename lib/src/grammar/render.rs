use pulldown_cmark_escape::escape_html;

use crate::grammar::{Class, Highlight, HighlightEvent};

/// The class prefix used when none is configured.
pub const DEFAULT_CLASS_PREFIX: &str = "hljs-";

/// Expands a dotted class into CSS class names: the first segment is
/// prefixed and each following segment gets one more trailing underscore than
/// the last.
///
/// ```
/// use quire::grammar::css_classes;
///
/// assert_eq!(css_classes("keyword", "hljs-"), "hljs-keyword");
/// assert_eq!(css_classes("title.class", "hljs-"), "hljs-title class_");
/// assert_eq!(css_classes("title.class.inherited", "x-"), "x-title class_ inherited__");
/// ```
pub fn css_classes(class: Class, prefix: &str) -> String {
    let mut segments = class.split('.');
    let mut output = String::with_capacity(prefix.len() + class.len() + 4);
    output.push_str(prefix);
    output.push_str(segments.next().unwrap_or_default());
    for (i, segment) in segments.enumerate() {
        output.push(' ');
        output.push_str(segment);
        output.extend(std::iter::repeat('_').take(i + 1));
    }

    output
}

impl Highlight<'_> {
    /// Renders the highlight as HTML `<span>`s using the default prefix.
    pub fn to_html(&self) -> String {
        self.render_html(DEFAULT_CLASS_PREFIX)
    }

    pub fn render_html(&self, prefix: &str) -> String {
        let mut html = String::with_capacity(self.source().len() * 2);
        for event in self.events() {
            match *event {
                HighlightEvent::Start(class) => {
                    html.push_str("<span class=\"");
                    html.push_str(&css_classes(class, prefix));
                    html.push_str("\">");
                }
                HighlightEvent::Source { start, end } => {
                    // Writing to a `String` can't fail.
                    let _ = escape_html(&mut html, &self.source()[start..end]);
                }
                HighlightEvent::End => html.push_str("</span>"),
            }
        }

        html
    }
}
