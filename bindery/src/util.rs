use std::path::Path;

use quire::html::{self, Document};

/// Whether `output` exists and is at least as new as `input`.
pub fn is_fresh(input: &Path, output: &Path) -> bool {
    let modified = |path: &Path| std::fs::metadata(path).and_then(|m| m.modified()).ok();
    match (modified(input), modified(output)) {
        (Some(input), Some(output)) => output >= input,
        _ => false,
    }
}

/// Parses rendered Markdown into a page, setting its `<title>` when there is
/// one.
pub fn page(body: &str, title: Option<&str>) -> Document {
    let document = Document::parse(body);
    if let Some(head) = document.elements_named("head").first() {
        html::append(head, html::element("meta", &[("charset", "utf-8")]));
        if let Some(title) = title {
            let element = html::element("title", &[]);
            html::append(&element, html::text(title));
            html::append(head, element);
        }
    }

    document
}
