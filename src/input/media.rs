//! Extraction of `{{media url=...}}` references from exported page content.

use std::sync::LazyLock;

use regex::Regex;

/// Resource root prepended to every extracted media path.
pub const MEDIA_ROOT: &str = "/media/";

/// Matches the CMS media directive. The captured path is limited to
/// `[A-Za-z0-9_./-]`, so quoted or parameterised variants never match.
#[allow(clippy::expect_used)]
static MEDIA_TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{media url=([-_a-zA-Z0-9./]+)\}\}").expect("media token regex is valid") // Static pattern, safe to panic
});

/// Returns every media reference in `content`, in order of appearance,
/// rewritten as a target under [`MEDIA_ROOT`].
///
/// Duplicates are kept; the job set removes them later.
///
/// # Example
///
/// ```
/// use mediadump_core::input::extract_media_links;
///
/// let links = extract_media_links(r#"<img src="{{media url=wysiwyg/x.jpg}}">"#);
/// assert_eq!(links, vec!["/media/wysiwyg/x.jpg".to_string()]);
/// ```
#[must_use]
pub fn extract_media_links(content: &str) -> Vec<String> {
    MEDIA_TOKEN_PATTERN
        .captures_iter(content)
        .filter_map(|captures| captures.get(1))
        .map(|path| format!("{MEDIA_ROOT}{}", path.as_str()))
        .collect()
}
