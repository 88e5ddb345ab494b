/// Replaces every `\` with `/`.
///
/// References authored on Windows hosts arrive with backslash separators; the
/// web only knows forward slashes.
///
/// ```
/// use quire::util::fix_separators;
///
/// assert_eq!(fix_separators(r"img\logo.png"), "img/logo.png");
/// assert_eq!(fix_separators("img/logo.png"), "img/logo.png");
/// ```
pub fn fix_separators(path: &str) -> String {
    if memchr::memchr(b'\\', path.as_bytes()).is_none() {
        return path.to_string();
    }

    path.replace('\\', "/")
}

/// Lexically normalizes a `/`-separated path: collapses repeated separators,
/// removes `.` segments, and resolves `..` against the preceding segment. A
/// trailing separator is preserved. `..` segments that would climb above the
/// root of an absolute path are dropped; in a relative path they are kept.
///
/// ```
/// use quire::util::normalize;
///
/// assert_eq!(normalize("/./wiki//foo.html"), "/wiki/foo.html");
/// assert_eq!(normalize("/wiki/../style.css"), "/style.css");
/// assert_eq!(normalize("/../x"), "/x");
/// assert_eq!(normalize("../a/./b/../c/"), "../a/c/");
/// assert_eq!(normalize("a/.."), ".");
/// assert_eq!(normalize("./"), "./");
/// assert_eq!(normalize(""), ".");
/// ```
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return ".".into();
    }

    let absolute = path.starts_with('/');
    let trailing = path.ends_with('/');

    let mut segments: Vec<&str> = vec![];
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => match segments.last() {
                Some(&last) if last != ".." => { segments.pop(); }
                _ if absolute => continue,
                _ => segments.push(".."),
            },
            segment => segments.push(segment),
        }
    }

    let mut output = String::with_capacity(path.len());
    if absolute {
        output.push('/');
    }

    output.push_str(&segments.join("/"));
    if segments.is_empty() {
        if absolute {
            return output;
        }

        output.push('.');
    }

    if trailing {
        output.push('/');
    }

    output
}

/// Returns `dir` with a trailing `/`, appending one if it is missing.
///
/// ```
/// use quire::util::with_trailing_slash;
///
/// assert_eq!(with_trailing_slash("wiki"), "wiki/");
/// assert_eq!(with_trailing_slash("wiki/"), "wiki/");
/// assert_eq!(with_trailing_slash(""), "/");
/// ```
pub fn with_trailing_slash(dir: &str) -> String {
    match dir.ends_with('/') {
        true => dir.to_string(),
        false => format!("{dir}/"),
    }
}
