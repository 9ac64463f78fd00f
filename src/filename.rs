/// Normalize bundler/debugger style filenames before taking the file part.
pub fn normalize_filename(filename: &str) -> String {
    let mut s = filename.replace('\\', "/");
    s = s.replace("%5Bproject%5D", "[project]");
    s = s.replace("%5bproject%5d", "[project]");
    if let Some(rest) = s.strip_prefix("file:///") {
        s = rest.to_string();
    } else if let Some(rest) = s.strip_prefix("file://") {
        s = rest.to_string();
    }
    for prefix in &["turbopack/[project]/", "/turbopack/[project]/", "[project]/"] {
        if let Some(rest) = s.strip_prefix(prefix) {
            return rest.to_string();
        }
    }
    s
}

/// The value written into the source-file attribute for `filename`.
///
/// This is the last path segment, except that `index.*` files keep their
/// parent directory (`button/index.jsx`) so they stay distinguishable.
pub fn source_file_id(filename: &str) -> String {
    let normalized = normalize_filename(filename);
    let mut parts = normalized.rsplit('/').filter(|part| !part.is_empty());

    let Some(file_part) = parts.next() else {
        return "unknown".to_string();
    };
    if file_part.starts_with("index.") {
        if let Some(parent) = parts.next() {
            return format!("{parent}/{file_part}");
        }
    }
    file_part.to_string()
}
