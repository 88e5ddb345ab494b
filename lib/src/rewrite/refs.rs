use crate::util::{fix_separators, normalize};

/// The attribute a reference was found in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RefKind {
    Href,
    Src,
    Srcset,
}

/// Where a page lives, relative to the site root, and how links are emitted.
#[derive(Debug, Copy, Clone)]
pub struct RefContext<'a> {
    /// Directory of the page being rewritten, with a trailing `/`.
    pub page_dir: &'a str,
    /// Directory of the site root, with a trailing `/`.
    pub site_root: &'a str,
    /// Strip `.html` from every reference.
    pub actions: bool,
}

impl RefKind {
    pub const ALL: [RefKind; 3] = [RefKind::Href, RefKind::Src, RefKind::Srcset];

    pub fn attribute(self) -> &'static str {
        match self {
            RefKind::Href => "href",
            RefKind::Src => "src",
            RefKind::Srcset => "srcset",
        }
    }
}

/// Returns the scheme of `url`, if it has one: the text before a `:` that
/// precedes any `?`, `/`, or `#`.
///
/// ```
/// use quire::rewrite::scheme;
///
/// assert_eq!(scheme("https://example.com"), Some("https"));
/// assert_eq!(scheme("mailto:me@example.com"), Some("mailto"));
/// assert_eq!(scheme("wiki/a:b"), None);
/// assert_eq!(scheme("page#a:b"), None);
/// ```
pub fn scheme(url: &str) -> Option<&str> {
    let bytes = url.as_bytes();
    match memchr::memchr3(b':', b'?', b'/', bytes) {
        Some(i) if bytes[i] == b':' => match memchr::memrchr(b'#', &bytes[..i]) {
            Some(_) => None,
            None => Some(&url[..i]),
        },
        _ => None,
    }
}

/// Rewrites one reference value. `srcset` values are rewritten candidate by
/// candidate; descriptors are kept.
pub fn rewrite(value: &str, kind: RefKind, cx: &RefContext<'_>) -> String {
    if kind != RefKind::Srcset {
        return rewrite_url(value, kind, cx);
    }

    srcset_candidates(value)
        .into_iter()
        .map(|(url, descriptor)| match descriptor {
            Some(descriptor) => format!("{} {descriptor}", rewrite_url(url, kind, cx)),
            None => rewrite_url(url, kind, cx),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Splits a `srcset` into `(url, descriptor)` pairs. A URL runs up to
/// whitespace, so commas inside it (as in `data:` URLs) don't split it; a
/// comma ends a candidate only after its URL or outside parentheses in its
/// descriptor.
///
/// ```
/// use quire::rewrite::srcset_candidates;
///
/// assert_eq!(srcset_candidates("a.png, b.png 2x"), [("a.png", None), ("b.png", Some("2x"))]);
/// assert_eq!(srcset_candidates("data:,x 1x,c.png"), [("data:,x", Some("1x")), ("c.png", None)]);
/// ```
pub fn srcset_candidates(srcset: &str) -> Vec<(&str, Option<&str>)> {
    let is_separator = |c: char| c.is_ascii_whitespace() || c == ',';

    let mut candidates = vec![];
    let mut rest = srcset;
    loop {
        rest = rest.trim_start_matches(is_separator);
        if rest.is_empty() {
            break;
        }

        let url_end = rest.find(|c: char| c.is_ascii_whitespace()).unwrap_or(rest.len());
        let (url, after) = rest.split_at(url_end);
        if url.ends_with(',') {
            candidates.push((url.trim_end_matches(','), None));
            rest = after;
            continue;
        }

        let mut depth = 0usize;
        let descriptor_end = after.char_indices()
            .find(|&(_, c)| match c {
                '(' => { depth += 1; false }
                ')' => { depth = depth.saturating_sub(1); false }
                ',' => depth == 0,
                _ => false,
            })
            .map_or(after.len(), |(i, _)| i);

        let descriptor = after[..descriptor_end].trim();
        candidates.push((url, (!descriptor.is_empty()).then_some(descriptor)));
        rest = &after[descriptor_end..];
    }

    candidates
}

fn rewrite_url(value: &str, kind: RefKind, cx: &RefContext<'_>) -> String {
    if value == "#" || value.starts_with("//") || scheme(value).is_some() {
        return value.to_string();
    }

    let mut url = fix_separators(value);
    if let Some(stem) = url.strip_suffix(".md") {
        url = format!("{stem}.html");
    }

    let relative = format!("./{}", cx.page_dir);
    if let Some(i) = url.find(&relative) {
        url.replace_range(i..i + relative.len(), "./");
    }

    if let Some(rest) = url.strip_prefix('/') {
        let base = match kind {
            RefKind::Href => cx.page_dir,
            RefKind::Src | RefKind::Srcset => cx.site_root,
        };

        url = normalize(&format!("/{base}{rest}"));
    }

    if let Some(rest) = url.strip_prefix("root/") {
        url = normalize(&format!("/{}{rest}", cx.site_root));
    }

    if let Some(stem) = url.strip_suffix(".force-md") {
        url.truncate(stem.len());
    }

    let mut url = fix_separators(&url);
    if cx.actions {
        if let Some(stem) = url.strip_suffix(".html") {
            url.truncate(stem.len());
        }
    }

    url
}
