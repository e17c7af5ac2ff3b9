//! Resolution of import locators against the importing resource.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! All functions here are pure string transformations: nothing touches the
//! filesystem and nothing fails. Malformed input yields a best-effort
//! normalized string.

use url::Url;

/// Schemes that mark a locator as an external reference.
const EXTERNAL_SCHEMES: &[&str] = &["http", "https", "ftp", "file"];

/// Convert Windows separators to `/`.
pub fn normalize_separators(uri: &str) -> String {
    uri.replace('\\', "/")
}

/// Check whether `locator` is a well-formed, scheme-qualified reference.
///
/// Only `http`, `https`, `ftp` and `file` count, so a Windows drive letter
/// (`C:/styles/a.css`) or a `classpath:` style prefix is resolved like any
/// other relative locator.
pub fn is_external(locator: &str) -> bool {
    Url::parse(locator).is_ok_and(|url| EXTERNAL_SCHEMES.contains(&url.scheme()))
}

/// The folder part of `uri`, up to and including its last `/`.
///
/// Returns an empty string when the uri has no separator.
pub fn folder_of(uri: &str) -> String {
    let uri = normalize_separators(uri);
    match uri.rfind('/') {
        Some(idx) => uri[..=idx].to_string(),
        None => String::new(),
    }
}

/// Normalize `.` and `..` segments away.
///
/// A `prefix:` in front of the first `/` (a scheme or drive letter) is kept
/// as is, a leading `/` stays, and `..` segments that would climb above the
/// start of the path are preserved at the front.
///
/// ```
/// use cssbundle_core::clean_path;
///
/// assert_eq!(clean_path("styles/./theme/../base.css"), "styles/base.css");
/// assert_eq!(clean_path("../shared/a.css"), "../shared/a.css");
/// assert_eq!(clean_path("http://cdn.example.com/a/../b.css"), "http://cdn.example.com/b.css");
/// ```
pub fn clean_path(path: &str) -> String {
    let normalized = normalize_separators(path);
    let mut rest = normalized.as_str();
    let mut prefix = String::new();

    if let Some(idx) = rest.find(':') {
        let candidate = &rest[..=idx];
        if !candidate.contains('/') {
            prefix.push_str(candidate);
            rest = &rest[idx + 1..];
        }
    }

    if let Some(stripped) = rest.strip_prefix('/') {
        prefix.push('/');
        rest = stripped;
    }

    let mut elements: Vec<&str> = Vec::new();
    let mut tops = 0usize;
    for element in rest.split('/').rev() {
        match element {
            "." => {}
            ".." => tops += 1,
            _ if tops > 0 => tops -= 1,
            _ => elements.push(element),
        }
    }
    elements.extend(std::iter::repeat_n("..", tops));
    elements.reverse();

    prefix + &elements.join("/")
}

/// Compute the absolute locator of an import found in `base_uri`.
///
/// External locators are returned unchanged. Locators starting with `/` are
/// absolute already and are only normalized. Everything else is appended to
/// the folder of `base_uri` and normalized.
///
/// ```
/// use cssbundle_core::resolve_import;
///
/// assert_eq!(resolve_import("styles/site/main.scss", "../vars.scss"), "styles/vars.scss");
/// assert_eq!(
///     resolve_import("styles/main.css", "https://fonts.example.com/a.css"),
///     "https://fonts.example.com/a.css"
/// );
/// ```
pub fn resolve_import(base_uri: &str, locator: &str) -> String {
    if is_external(locator) {
        return locator.to_string();
    }
    let locator = normalize_separators(locator);
    if locator.starts_with('/') {
        return clean_path(&locator);
    }
    clean_path(&format!("{}{}", folder_of(base_uri), locator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_external() {
        assert!(is_external("http://example.com/a.css"));
        assert!(is_external("https://example.com/a.css"));
        assert!(is_external("file:///tmp/a.css"));
        assert!(!is_external("a.css"));
        assert!(!is_external("../a.css"));
        assert!(!is_external("C:/styles/a.css"));
        assert!(!is_external("classpath:styles/a.css"));
        assert!(!is_external("//cdn.example.com/a.css"));
    }

    #[test]
    fn test_folder_of() {
        assert_eq!(folder_of("styles/site/main.css"), "styles/site/");
        assert_eq!(folder_of("/abs/main.css"), "/abs/");
        assert_eq!(folder_of("main.css"), "");
        assert_eq!(folder_of("styles\\win\\main.css"), "styles/win/");
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("a/b/../c.css"), "a/c.css");
        assert_eq!(clean_path("a/./b/./c.css"), "a/b/c.css");
        assert_eq!(clean_path("/a/../../b.css"), "/../b.css");
        assert_eq!(clean_path("a/b/../../../c.css"), "../c.css");
        assert_eq!(clean_path("C:\\styles\\..\\a.css"), "C:/a.css");
        assert_eq!(clean_path("dir/"), "dir/");
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(resolve_import("styles/main.css", "a.css"), "styles/a.css");
        assert_eq!(resolve_import("styles/main.css", "./sub/a.css"), "styles/sub/a.css");
        assert_eq!(resolve_import("main.css", "a.css"), "a.css");
        assert_eq!(
            resolve_import("/srv/site/css/main.css", "../../shared/a.css"),
            "/srv/shared/a.css"
        );
    }

    #[test]
    fn test_resolve_absolute_locator() {
        assert_eq!(resolve_import("styles/main.css", "/global/a.css"), "/global/a.css");
    }

    #[test]
    fn test_resolve_relative_to_external_base() {
        assert_eq!(
            resolve_import("https://cdn.example.com/css/theme.css", "../fonts/f.css"),
            "https://cdn.example.com/fonts/f.css"
        );
    }
}
