//! Per-article field extraction.
//!
//! [`extract`] never fails: any load or read error for one article is logged
//! and turned into `None`, so a single broken page cannot abort a run. Every
//! visit, successful or not, is followed by the inter-item delay.

use super::naver;
use super::selectors::SelectorChain;
use crate::config::HarvestConfig;
use crate::error::RenderError;
use crate::models::ExtractedItem;
use crate::renderer::Renderer;
use crate::utils::{collapse_whitespace, normalize_date, truncate_chars};
use chrono::{DateTime, Utc};
use scraper::Html;
use tracing::{debug, instrument, warn};
use url::Url;

/// How much of the body is kept as the raw description.
pub const DESCRIPTION_SOURCE_CHARS: usize = 200;

/// Field-by-field selector chains for one article layout.
#[derive(Debug, Clone)]
pub struct ArticleExtractor {
    title: SelectorChain,
    body: SelectorChain,
    press: SelectorChain,
    date: SelectorChain,
    thumbnail: SelectorChain,
}

impl ArticleExtractor {
    pub fn naver() -> Self {
        Self {
            title: naver::title(),
            body: naver::body(),
            press: naver::press(),
            date: naver::date(),
            thumbnail: naver::thumbnail(),
        }
    }

    /// Read all fields out of rendered article HTML.
    ///
    /// `url` is the candidate URL recorded on the item; `page_url` is where the
    /// renderer actually ended up and is used to resolve relative image links.
    pub fn parse(
        &self,
        html: &str,
        url: &str,
        page_url: &str,
        crawled_at: DateTime<Utc>,
    ) -> ExtractedItem {
        let doc = Html::parse_document(html);

        // Titles are only trimmed; the body is whitespace-collapsed.
        let title = self.title.first(&doc).unwrap_or_default();
        let body_text = self
            .body
            .first(&doc)
            .map(|b| collapse_whitespace(&b))
            .unwrap_or_default();
        let press = self.press.first(&doc).unwrap_or_default();
        let published_date = self
            .date
            .first(&doc)
            .and_then(|raw| normalize_date(&raw))
            .unwrap_or_default();

        let base = Url::parse(page_url).or_else(|_| Url::parse(url)).ok();
        let thumbnail_url = self
            .thumbnail
            .first_accepted(&doc, |candidate| !naver::is_non_content_image(candidate))
            .map(|src| resolve(base.as_ref(), &src))
            .unwrap_or_default();

        let description = truncate_chars(&body_text, DESCRIPTION_SOURCE_CHARS);

        ExtractedItem {
            url: url.to_string(),
            title,
            body_text,
            press,
            published_date,
            thumbnail_url,
            description,
            crawled_at,
        }
    }
}

fn resolve(base: Option<&Url>, src: &str) -> String {
    base.and_then(|b| b.join(src).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| src.to_string())
}

/// Visit one candidate and extract it, swallowing any failure.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn extract<R: Renderer>(
    renderer: &mut R,
    extractor: &ArticleExtractor,
    url: &str,
    config: &HarvestConfig,
) -> Option<ExtractedItem> {
    let result = visit(renderer, extractor, url, config).await;
    renderer.wait(config.inter_item_delay()).await;

    match result {
        Ok(item) => {
            debug!(title = %item.title, body_chars = item.body_text.chars().count(), "Extracted article");
            Some(item)
        }
        Err(e) => {
            warn!(error = %e, "Article extraction failed; skipping");
            None
        }
    }
}

async fn visit<R: Renderer>(
    renderer: &mut R,
    extractor: &ArticleExtractor,
    url: &str,
    config: &HarvestConfig,
) -> Result<ExtractedItem, RenderError> {
    renderer
        .load(url, config.item_load())
        .await?;
    renderer.wait(config.item_settle()).await;

    let html = renderer.content()?;
    let page_url = renderer.current_url().unwrap_or_else(|| url.to_string());
    Ok(extractor.parse(&html, url, &page_url, Utc::now()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Launcher;
    use crate::renderer::fake::FakeSite;
    use chrono::TimeZone;

    const URL: &str = "https://n.news.naver.com/mnews/article/001/0015123456";

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 6, 0, 0).unwrap()
    }

    fn article_html() -> String {
        r#"<html><head>
            <meta property="og:image" content="https://imgnews.pstatic.net/image/001/2025/01/15/walk.jpg">
          </head><body>
            <div class="media_end_head_top_logo"><img alt="연합뉴스" src="/logo.png"></div>
            <div id="title_area"><span>건강한 걷기 습관 만들기</span></div>
            <span class="media_end_head_info_datestamp_time" data-date-time="2025-01-14 09:30:00">2025.01.14. 오전 9:30</span>
            <article id="newsct_article">
               매일   30분씩
               걷는 운동은   심혈관 건강에 좋습니다.
            </article>
          </body></html>"#
            .to_string()
    }

    #[test]
    fn test_parse_reads_all_fields() {
        let item = ArticleExtractor::naver().parse(&article_html(), URL, URL, at());
        assert_eq!(item.url, URL);
        assert_eq!(item.title, "건강한 걷기 습관 만들기");
        assert_eq!(item.body_text, "매일 30분씩 걷는 운동은 심혈관 건강에 좋습니다.");
        assert_eq!(item.press, "연합뉴스");
        assert_eq!(item.published_date, "2025.01.14");
        assert_eq!(
            item.thumbnail_url,
            "https://imgnews.pstatic.net/image/001/2025/01/15/walk.jpg"
        );
        assert_eq!(item.description, item.body_text);
        assert_eq!(item.crawled_at, at());
    }

    #[test]
    fn test_parse_falls_back_to_legacy_layout() {
        let html = r#"<html><body>
            <h2 id="articleTitle">레거시 레이아웃의 기사 제목</h2>
            <div id="articeBody">본문 <img src="/photos/a.jpg"></div>
            <span class="_ARTICLE_DATE_TIME" data-date-time="2024-12-31 23:59:00"></span>
        </body></html>"#;
        let item = ArticleExtractor::naver().parse(html, URL, URL, at());
        assert_eq!(item.title, "레거시 레이아웃의 기사 제목");
        assert_eq!(item.body_text, "본문");
        assert_eq!(item.published_date, "2024.12.31");
        assert_eq!(item.press, "");
    }

    #[test]
    fn test_thumbnail_skips_logos_and_resolves_relative() {
        let html = r#"<html><head>
            <meta property="og:image" content="https://static.example/press_logo.png">
          </head><body>
            <article id="newsct_article"><img data-src="/image/2025/photo.jpg" src="/blank.gif"></article>
          </body></html>"#;
        let item = ArticleExtractor::naver().parse(html, URL, URL, at());
        assert_eq!(item.thumbnail_url, "https://n.news.naver.com/image/2025/photo.jpg");
    }

    #[test]
    fn test_title_is_trimmed_but_not_collapsed() {
        let html = r#"<div id="title_area"><span>
            건강 검진,  꼭 받아야 할 항목  </span></div>"#;
        let item = ArticleExtractor::naver().parse(html, URL, URL, at());
        assert_eq!(item.title, "건강 검진,  꼭 받아야 할 항목");
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let item = ArticleExtractor::naver().parse("<html><body></body></html>", URL, URL, at());
        assert!(item.title.is_empty());
        assert!(item.body_text.is_empty());
        assert!(item.published_date.is_empty());
        assert!(item.thumbnail_url.is_empty());
    }

    #[test]
    fn test_unparsable_date_is_empty() {
        let html = r#"<span class="media_end_head_info_datestamp_time">어제 오후</span>"#;
        let item = ArticleExtractor::naver().parse(html, URL, URL, at());
        assert_eq!(item.published_date, "");
    }

    #[test]
    fn test_description_is_leading_body_slice() {
        let body = "가".repeat(500);
        let html = format!(r#"<div id="newsct_article">{body}</div>"#);
        let item = ArticleExtractor::naver().parse(&html, URL, URL, at());
        assert_eq!(item.description.chars().count(), DESCRIPTION_SOURCE_CHARS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_extract_swallows_load_failure_and_still_waits() {
        let site = FakeSite::new().failing(URL);
        let mut renderer = site.launcher().launch().await.unwrap();
        let config = HarvestConfig::default();

        let t0 = tokio::time::Instant::now();
        let item = extract(&mut renderer, &ArticleExtractor::naver(), URL, &config).await;

        assert!(item.is_none());
        assert_eq!(site.visits(), vec![URL.to_string()]);
        assert!(t0.elapsed() >= config.inter_item_delay());
    }

    #[tokio::test(start_paused = true)]
    async fn test_extract_success() {
        let site = FakeSite::new().page(URL, article_html());
        let mut renderer = site.launcher().launch().await.unwrap();
        let config = HarvestConfig::default();

        let t0 = tokio::time::Instant::now();
        let item = extract(&mut renderer, &ArticleExtractor::naver(), URL, &config)
            .await
            .unwrap();

        assert_eq!(item.title, "건강한 걷기 습관 만들기");
        assert!(t0.elapsed() >= config.item_settle() + config.inter_item_delay());
    }
}
