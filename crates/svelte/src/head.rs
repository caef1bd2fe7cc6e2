//! Head markup generated from page frontmatter.

use leger_core::{Frontmatter, FrontmatterValue};
use std::borrow::Cow;

/// Title used when the page does not set one.
pub const DEFAULT_TITLE: &str = "Leger";

/// Renders `<title>` plus the optional site-name and description meta tags.
///
/// Only the `title`, `siteName`, and `description` keys are read. Values are
/// HTML-escaped; list values are joined with `", "`.
///
/// # Examples
///
/// ```
/// use leger_core::parse_frontmatter;
/// use leger_svelte::render_frontmatter;
///
/// assert_eq!(render_frontmatter(&parse_frontmatter("")), "<title>Leger</title>");
///
/// let head = render_frontmatter(&parse_frontmatter("title: Home\ndescription: Welcome"));
/// assert_eq!(
///     head,
///     "<title>Home</title>\n<meta name=\"description\" content=\"Welcome\">"
/// );
/// ```
pub fn render_frontmatter(frontmatter: &Frontmatter) -> String {
    let title = frontmatter
        .get("title")
        .map(value_text)
        .unwrap_or(Cow::Borrowed(DEFAULT_TITLE));
    let mut head = format!("<title>{}</title>", html_escape::encode_text(&title));

    if let Some(site_name) = frontmatter.get("siteName") {
        head.push_str(&format!(
            "\n<meta property=\"og:site_name\" content=\"{}\">",
            html_escape::encode_double_quoted_attribute(&value_text(site_name))
        ));
    }

    if let Some(description) = frontmatter.get("description") {
        head.push_str(&format!(
            "\n<meta name=\"description\" content=\"{}\">",
            html_escape::encode_double_quoted_attribute(&value_text(description))
        ));
    }

    head
}

fn value_text(value: &FrontmatterValue) -> Cow<'_, str> {
    match value {
        FrontmatterValue::Text(text) => Cow::Borrowed(text),
        FrontmatterValue::List(items) => Cow::Owned(items.join(", ")),
    }
}
