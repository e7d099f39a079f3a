use std::sync::LazyLock;

use regex::Regex;
use url::Url;

const GIF_EXTENSION: &str = ".gif";

static GIF_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.gif(\?|#|$)").expect("static gif pattern"));

/// Classifies a completed request URL by its path component.
///
/// The query string and fragment are ignored, so `a.gif?v=1` matches while
/// `page?img=a.gif` does not. Unparsable input is simply not a GIF.
pub fn is_gif_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_ascii_lowercase().ends_with(GIF_EXTENSION),
        Err(_) => false,
    }
}

/// Classifies an already resolved href found in page markup.
///
/// `.gif` must be followed by the end of the string, a query or a fragment.
pub fn is_gif_href(href: &str) -> bool {
    GIF_HREF.is_match(href)
}
