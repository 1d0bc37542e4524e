//! Lexical path helpers
//!
//! All paths handled here are `/`-separated strings relative to the export
//! root. Nothing touches the local filesystem.

/// Collapse a path lexically.
///
/// Surrounding whitespace is trimmed, backslashes become `/`, empty and `.`
/// segments are dropped and `..` removes the preceding segment. A leading
/// `./` disappears, so `./A/RAW/x.raw` and `A/RAW/x.raw` normalize the same.
/// An empty result is returned as `.`.
pub fn normalize_path(line: &str) -> String {
    let unified = line.trim().replace('\\', "/");
    let absolute = unified.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                // `/..` is still `/`
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Split a path into its directory and final component.
///
/// `A/B/x.raw` gives `("A/B", "x.raw")`; a bare name has an empty directory.
pub fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

/// File name without its last extension. Dot-files keep their name.
pub fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// Join non-empty segments with `/`
pub fn join_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    segments
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Prefix a relative path with a root, yielding exactly one `/` between them
pub fn join_root(root: &str, relative: &str) -> String {
    format!(
        "{}/{}",
        root.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}
