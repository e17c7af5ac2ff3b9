//! Rewriting of module-style `@use` directives into `@import` directives.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Three forms are normalized, in this order:
//!
//! ```text
//! @use 'footer/newsletter' as news;   ->  @import 'footer/newsletter.scss';   (news. stripped)
//! @use 'mobile' as *;                 ->  @import 'mobile.scss';
//! @use 'variables';                   ->  @import 'variables.scss';
//! ```
//!
//! The alias form runs first because its pattern is the most specific one;
//! running it later would let the bare pattern see directives that still
//! carry an alias.
//!
//! NOTE: This is pattern matching, not a Sass parser. Paths may only contain
//! word characters, `/`, `.` and `-`, so built-in modules such as
//! `@use 'sass:math'` never match and pass through untouched, aliases
//! included. `@use ... with (...)` configuration forms pass through as well.

use once_cell::sync::Lazy;
use regex::Regex;

/// `@use '<path>' as <alias>;` - captures the path (group 1) and alias (group 2).
static USE_WITH_ALIAS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"@use\s+['"]([\w/.\-]+)['"]\s+as\s+([\w\-]+)\s*;"#).unwrap()
});

/// `@use '<path>' as *;` - captures the path in group 1.
static USE_WITH_WILDCARD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"@use\s+['"]([\w/.\-]+)['"]\s+as\s+\*\s*;"#).unwrap());

/// `@use '<path>';` - captures the path in group 1.
static USE_BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"@use\s+['"]([\w/.\-]+)['"]\s*;"#).unwrap());

const IMPORT_REPLACEMENT: &str = "@import '${1}.scss';";

/// Result of [`rewrite_use_directives`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewrittenSource {
    /// Content with every recognized `@use` turned into `@import`
    pub content: String,
    /// Namespace aliases that were declared and have been stripped
    pub aliases: Vec<String>,
}

/// Normalize `@use` directives into `@import` directives.
///
/// Aliases declared with `as <alias>` are returned in declaration order and
/// every `<alias>.` prefix is removed from the content (see
/// [`strip_alias_prefix`]).
///
/// # Example
///
/// ```
/// use cssbundle_core::rewrite_use_directives;
///
/// let out = rewrite_use_directives("@use 'vars' as v;\n.a{color:v.$red;}");
/// assert_eq!(out.content, "@import 'vars.scss';\n.a{color:$red;}");
/// assert_eq!(out.aliases, vec!["v".to_string()]);
/// ```
pub fn rewrite_use_directives(content: &str) -> RewrittenSource {
    let aliases: Vec<String> = USE_WITH_ALIAS
        .captures_iter(content)
        .filter_map(|caps| caps.get(2).map(|m| m.as_str().to_string()))
        .collect();

    let mut out = USE_WITH_ALIAS
        .replace_all(content, IMPORT_REPLACEMENT)
        .into_owned();

    for alias in &aliases {
        out = strip_alias_prefix(&out, alias);
    }

    let out = USE_WITH_WILDCARD.replace_all(&out, IMPORT_REPLACEMENT);
    let out = USE_BARE.replace_all(&out, IMPORT_REPLACEMENT).into_owned();

    if !aliases.is_empty() {
        tracing::trace!(aliases = ?aliases, "Stripped @use namespace aliases");
    }

    RewrittenSource {
        content: out,
        aliases,
    }
}

/// Remove every `<alias>.` occurrence that is not immediately followed by
/// `sass` or `scss`.
///
/// The exception keeps file extensions intact: after rewriting
/// `@use 'v' as v;` the content holds `@import 'v.scss';`, and that `v.` must
/// survive. Occurrences are removed wherever they appear, without checking
/// what precedes them.
pub fn strip_alias_prefix(content: &str, alias: &str) -> String {
    if alias.is_empty() {
        return content.to_string();
    }

    let needle = format!("{}.", alias);
    let mut out = String::with_capacity(content.len());
    let mut last = 0;

    // `needle` ends with the only `.` it contains, so matches never overlap
    for (start, _) in content.match_indices(&needle) {
        let end = start + needle.len();
        let rest = &content[end..];
        if rest.starts_with("sass") || rest.starts_with("scss") {
            continue;
        }
        out.push_str(&content[last..start]);
        last = end;
    }
    out.push_str(&content[last..]);
    out
}
