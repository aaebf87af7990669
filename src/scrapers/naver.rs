//! Naver News site profile.
//!
//! Selector chains and URL rules for the health/life category listing and its
//! article pages. Chains are ordered most-specific first; the current article
//! layout (`media_end_*`) comes before the legacy layout (`#articleTitle`).

use super::selectors::{SelectorChain, Strategy};
use url::Url;

/// Fallback label when no press name can be extracted.
pub const FALLBACK_PRESS: &str = "네이버뉴스";

const ARTICLE_HOST: &str = "news.naver.com";
const ARTICLE_PATH_MARKER: &str = "/article/";
const NON_CONTENT_MARKERS: &[&str] = &["logo", "icon"];

/// Selectors for the listing's "load more" control.
pub fn load_more() -> SelectorChain {
    SelectorChain::new([
        Strategy::Text(".section_more_inner"),
        Strategy::Text(".btn_more"),
        Strategy::Text("[class*=\"more\"]"),
    ])
}

pub fn title() -> SelectorChain {
    SelectorChain::new([
        Strategy::Text("#title_area span"),
        Strategy::Text(".media_end_head_headline"),
        Strategy::Text("h2#articleTitle"),
    ])
}

pub fn body() -> SelectorChain {
    SelectorChain::new([
        Strategy::Text("#newsct_article"),
        Strategy::Text(".article_body"),
        Strategy::Text("#articeBody"),
    ])
}

pub fn press() -> SelectorChain {
    SelectorChain::new([
        Strategy::Attr(".media_end_head_top_logo img", "alt"),
        Strategy::Text(".media_end_head_top_logo_text"),
    ])
}

pub fn date() -> SelectorChain {
    SelectorChain::new([
        Strategy::Text(".media_end_head_info_datestamp_time"),
        Strategy::Attr(".media_end_head_info_datestamp_time", "data-date-time"),
        Strategy::Text("._ARTICLE_DATE_TIME"),
        Strategy::Attr("._ARTICLE_DATE_TIME", "data-date-time"),
    ])
}

/// Structured metadata image first, then in-body images.
pub fn thumbnail() -> SelectorChain {
    SelectorChain::new([
        Strategy::Attr("meta[property=\"og:image\"]", "content"),
        Strategy::Attr("#img1", "data-src"),
        Strategy::Attr("#img1", "src"),
        Strategy::Attr(".end_photo_org img", "data-src"),
        Strategy::Attr(".end_photo_org img", "src"),
        Strategy::Attr("#newsct_article img", "data-src"),
        Strategy::Attr("#newsct_article img", "src"),
    ])
}

/// Whether an image URL points at site chrome (logos, icons) rather than content.
pub fn is_non_content_image(url: &str) -> bool {
    let lower = url.to_lowercase();
    NON_CONTENT_MARKERS.iter().any(|m| lower.contains(m))
}

/// Normalize an anchor `href` into a candidate article URL.
///
/// Relative links are resolved against `base`. Returns `None` for links that
/// are not article pages on the news host. Query string and fragment are
/// stripped so tracking parameters do not produce duplicates.
pub fn article_url(base: &Url, href: &str) -> Option<String> {
    let mut url = base.join(href.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?;
    if !host.contains(ARTICLE_HOST) || !url.path().contains(ARTICLE_PATH_MARKER) {
        return None;
    }
    url.set_query(None);
    url.set_fragment(None);
    Some(url.to_string())
}
