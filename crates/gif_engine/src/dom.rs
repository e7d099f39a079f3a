use std::collections::HashSet;
use std::sync::LazyLock;

use gif_core::is_gif_href;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

static CSS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(\s*['"]?([^'")\s]+)['"]?\s*\)"#).expect("static css url pattern")
});

/// Lazy-load attributes that image widgets commonly park the real source in.
const LAZY_IMAGE_ATTRS: &[&str] = &["data-src", "data-original", "data-lazy", "data-gif"];

/// Markup construct a candidate was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Image,
    MediaSource,
    Video,
    PreloadLink,
    MetaImage,
    InlineStyle,
    StyleSheet,
    Anchor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateUrl {
    /// Reference exactly as written in the markup.
    pub raw: String,
    /// Absolute form after resolving against the document base.
    pub resolved: String,
    pub surface: Surface,
}

/// Read-only GIF reference scanner over a document snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct DomScanner;

impl DomScanner {
    pub fn new() -> Self {
        Self
    }

    /// Walks every element in document order and returns GIF candidates,
    /// deduplicated by resolved URL.
    pub fn scan(&self, html: &str, page_url: &str) -> Vec<CandidateUrl> {
        let document = Html::parse_document(html);
        let page_url = Url::parse(page_url.trim()).ok();
        let base_url = document_base(&document, page_url.as_ref()).or(page_url);
        let mut ctx = ScanContext::new(base_url);

        // Pre-order walk; nesting depth never grows the stack.
        for node in document.tree.root().descendants() {
            if let Some(element) = ElementRef::wrap(node) {
                self.visit_element(element, &mut ctx);
            }
        }

        ctx.candidates
    }

    fn visit_element(&self, element: ElementRef, ctx: &mut ScanContext) {
        let el = element.value();
        match el.name() {
            "img" => {
                ctx.add_attr(element, "src", Surface::Image);
                for attr in LAZY_IMAGE_ATTRS {
                    ctx.add_attr(element, attr, Surface::Image);
                }
                ctx.add_srcset(element, Surface::Image);
            }
            "source" => {
                ctx.add_attr(element, "src", Surface::MediaSource);
                ctx.add_srcset(element, Surface::MediaSource);
            }
            "video" => ctx.add_attr(element, "src", Surface::Video),
            "link" if is_image_preload(element) => {
                ctx.add_attr(element, "href", Surface::PreloadLink)
            }
            "meta" if is_social_image(element) => {
                ctx.add_attr(element, "content", Surface::MetaImage)
            }
            "style" => {
                let text: String = element.text().collect();
                ctx.add_css(&text, Surface::StyleSheet);
            }
            "a" => ctx.add_attr(element, "href", Surface::Anchor),
            _ => {}
        }

        if let Some(style) = el.attr("style") {
            ctx.add_css(style, Surface::InlineStyle);
        }
    }
}

/// Resolved GIF URLs referenced by the document, in document order.
pub fn scan_document(html: &str, page_url: &str) -> Vec<String> {
    DomScanner::new()
        .scan(html, page_url)
        .into_iter()
        .map(|candidate| candidate.resolved)
        .collect()
}

fn document_base(document: &Html, page_url: Option<&Url>) -> Option<Url> {
    let selector = Selector::parse("base[href]").ok()?;
    let href = document.select(&selector).next()?.value().attr("href")?;
    resolve_url(href, page_url)
}

fn is_image_preload(element: ElementRef) -> bool {
    let el = element.value();
    let preload = el
        .attr("rel")
        .map(|rel| {
            rel.split_ascii_whitespace()
                .any(|token| token.eq_ignore_ascii_case("preload"))
        })
        .unwrap_or(false);
    let image = el
        .attr("as")
        .map(|kind| kind.trim().eq_ignore_ascii_case("image"))
        .unwrap_or(false);
    preload && image
}

fn is_social_image(element: ElementRef) -> bool {
    let el = element.value();
    el.attr("property").map(str::trim) == Some("og:image")
        || el.attr("name").map(str::trim) == Some("twitter:image")
}

fn resolve_url(reference: &str, base: Option<&Url>) -> Option<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    match base {
        Some(base) => base.join(trimmed).ok(),
        None => Url::parse(trimmed).ok(),
    }
}

struct ScanContext {
    base_url: Option<Url>,
    candidates: Vec<CandidateUrl>,
    seen: HashSet<String>,
}

impl ScanContext {
    fn new(base_url: Option<Url>) -> Self {
        Self {
            base_url,
            candidates: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn add_attr(&mut self, element: ElementRef, attr: &str, surface: Surface) {
        if let Some(raw) = element.value().attr(attr) {
            self.add(raw, surface);
        }
    }

    fn add_srcset(&mut self, element: ElementRef, surface: Surface) {
        let Some(srcset) = element.value().attr("srcset") else {
            return;
        };
        for item in srcset.split(',') {
            if let Some(candidate) = item.split_whitespace().next() {
                self.add(candidate, surface);
            }
        }
    }

    fn add_css(&mut self, css: &str, surface: Surface) {
        for caps in CSS_URL.captures_iter(css) {
            if let Some(reference) = caps.get(1) {
                self.add(reference.as_str(), surface);
            }
        }
    }

    fn add(&mut self, raw: &str, surface: Surface) {
        // Malformed references are dropped, never reported.
        let Some(url) = resolve_url(raw, self.base_url.as_ref()) else {
            return;
        };
        let resolved: String = url.into();
        if !is_gif_href(&resolved) || !self.seen.insert(resolved.clone()) {
            return;
        }
        self.candidates.push(CandidateUrl {
            raw: raw.trim().to_string(),
            resolved,
            surface,
        });
    }
}
