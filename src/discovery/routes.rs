use std::path::{Component, Path};

/// Logical route of a page file relative to the pages root.
///
/// The file name is dropped, route groups such as `(marketing)` vanish from
/// the URL, and the root page maps to `/`.
pub fn route_for(pages_root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(pages_root).unwrap_or(file);
    let dir = relative.parent().unwrap_or(Path::new(""));

    let segments: Vec<String> = dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .filter(|s| !(s.starts_with('(') && s.ends_with(')')))
        .collect();

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}
