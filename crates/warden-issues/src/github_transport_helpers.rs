/// Clamp a response body for inclusion in an error message.
pub fn truncate_for_error(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated = text.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}

/// Repository-relative path for the contents API, without stray slashes.
pub fn contents_api_path(owner: &str, repo: &str, path: &str) -> String {
    format!("repos/{owner}/{repo}/contents/{}", path.trim_matches('/'))
}
