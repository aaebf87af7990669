//! Scrapers for the Naver News health/life category.
//!
//! Scraping follows a two-phase pattern:
//!
//! 1. **Discovery** ([`discovery`]): load the category listing, expand it and
//!    collect candidate article URLs
//! 2. **Extraction** ([`extractor`]): visit each candidate and read its fields
//!    through ordered selector fallback chains ([`selectors`])
//!
//! Site-specific selectors and URL rules live in [`naver`].
//!
//! Both phases drive a [`crate::renderer::Renderer`] strictly sequentially:
//! one page at a time, no fan-out across candidates.

pub mod discovery;
pub mod extractor;
pub mod naver;
pub mod selectors;
