//! Discovery and removal of `@import` statements.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A statement runs from `@import` to the next `;` (or the end of the line
//! when the semicolon is missing). Inside a statement, locators are read from
//! `url(...)` arguments and from quoted strings:
//!
//! ```text
//! @import 'variables.scss';
//! @import url("print.css") print;
//! @import url(reset.css);
//! @import 'a', 'b';
//! ```
//!
//! Statements without a recognizable locator are left alone by both
//! [`find_imports`] and [`remove_import_statements`].

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Matches a whole `@import` statement; group 1 holds its arguments.
static IMPORT_STATEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@import\b([^;\n]*);?").unwrap());

/// Matches one locator inside the arguments of a statement.
///
/// Group 1 is a `url(...)` argument, group 2 a quoted string.
static IMPORT_LOCATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"url\(\s*['"]?([^'"()\s]+)['"]?\s*\)|['"]([^'"]+)['"]"#).unwrap()
});

fn statement_locators(args: &str) -> impl Iterator<Item = &str> {
    IMPORT_LOCATOR.captures_iter(args).filter_map(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
    })
}

/// Find every import locator in `css`, in the order they appear.
///
/// Duplicates are kept; deciding what to do with them is up to the caller.
///
/// # Example
///
/// ```
/// use cssbundle_core::find_imports;
///
/// let css = "@import 'a.css';\n@import url(\"b.css\") screen;\n.x { color: red; }";
/// assert_eq!(find_imports(css), vec!["a.css", "b.css"]);
/// ```
pub fn find_imports(css: &str) -> Vec<String> {
    IMPORT_STATEMENT
        .captures_iter(css)
        .filter_map(|caps| caps.get(1))
        .flat_map(|args| statement_locators(args.as_str()))
        .map(String::from)
        .collect()
}

/// Check whether `css` holds at least one recognizable import statement.
pub fn contains_import(css: &str) -> bool {
    IMPORT_STATEMENT
        .captures_iter(css)
        .filter_map(|caps| caps.get(1))
        .any(|args| statement_locators(args.as_str()).next().is_some())
}

/// Remove every recognizable import statement from `css`.
pub fn remove_import_statements(css: &str) -> String {
    IMPORT_STATEMENT
        .replace_all(css, |caps: &Captures<'_>| {
            let args = caps.get(1).map_or("", |m| m.as_str());
            if statement_locators(args).next().is_some() {
                String::new()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_quoted_imports() {
        let css = "@import 'a.css';\n@import \"b/c.scss\";";
        assert_eq!(find_imports(css), vec!["a.css", "b/c.scss"]);
    }

    #[test]
    fn test_find_url_imports() {
        let css = "@import url(reset.css);\n@import url( 'print.css' ) print;\n@import url(\"https://fonts.example.com/x.css\");";
        assert_eq!(
            find_imports(css),
            vec!["reset.css", "print.css", "https://fonts.example.com/x.css"]
        );
    }

    #[test]
    fn test_find_comma_separated_imports() {
        assert_eq!(find_imports("@import 'a', 'b';"), vec!["a", "b"]);
    }

    #[test]
    fn test_find_keeps_duplicates_and_order() {
        let css = "@import 'b.css';\n@import 'a.css';\n@import 'b.css';";
        assert_eq!(find_imports(css), vec!["b.css", "a.css", "b.css"]);
    }

    #[test]
    fn test_find_without_trailing_semicolon() {
        assert_eq!(find_imports("@import 'last.css'\n.a{}"), vec!["last.css"]);
    }

    #[test]
    fn test_no_imports() {
        let css = ".a { color: red; }\n@media print { .b { display: none; } }";
        assert!(find_imports(css).is_empty());
        assert!(!contains_import(css));
        assert_eq!(remove_import_statements(css), css);
    }

    #[test]
    fn test_remove_import_statements() {
        let css = "@import 'a.css';\n.a { color: red; }\n@import url(b.css) screen;\n.b {}";
        assert_eq!(
            remove_import_statements(css),
            "\n.a { color: red; }\n\n.b {}"
        );
    }

    #[test]
    fn test_malformed_import_is_preserved() {
        let css = "@import foo;\n.a {}";
        assert!(find_imports(css).is_empty());
        assert!(!contains_import(css));
        assert_eq!(remove_import_statements(css), css);
    }

    #[test]
    fn test_contains_import() {
        assert!(contains_import(".x{}\n@import 'y.css';"));
    }
}
