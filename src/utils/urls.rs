/// Turn a server-relative resource path (uploaded covers, profile pictures)
/// into an absolute URL against the API base.
///
/// Absolute URLs pass through untouched and a missing or empty path stays
/// `None` instead of becoming a bare base URL.
pub fn resolve_resource_url(base_url: &str, path: Option<&str>) -> Option<String> {
    let path = path?.trim();
    if path.is_empty() {
        return None;
    }

    if path.starts_with("http://") || path.starts_with("https://") {
        return Some(path.to_string());
    }

    // Uploads stored from Windows hosts come back with backslashes
    let mut sanitized = path.replace('\\', "/");
    if !sanitized.starts_with('/') {
        sanitized.insert(0, '/');
    }

    Some(format!("{}{}", base_url.trim_end_matches('/'), sanitized))
}
