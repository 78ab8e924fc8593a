//! Anchor-text heuristics for grant and funding portals.
//!
//! These pages have no structure worth targeting with selectors, so every
//! `<a href>` on the page is a candidate and keyword rules decide which ones
//! point at a real, open opportunity:
//!
//! 1. Anchor text must be 15–200 characters.
//! 2. The href must be absolute (`http…`) or root-relative (`/…`); anything
//!    else (`schemes/x`, `#top`, `javascript:`, `mailto:`) is discarded.
//! 3. Text containing a noise word (navigation, legal, social, generic
//!    calls to action) or with fewer than 3 words is rejected.
//! 4. Text must contain at least one strong indicator for the category.
//!    No positive signal means no listing, even if nothing looked like noise.
//! 5. The parent element's text (first 250 characters) becomes the summary,
//!    unless it equals the title.
//! 6. Grants only: listings whose context looks closed or expired are dropped.
//! 7. The batch is deduplicated and capped per source, in document order.

use chrono::{DateTime, Utc};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::RegexSet;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::extract::dedup::dedup_batch;
use crate::models::Article;
use crate::sources::ScrapeTarget;
use crate::utils::{collapse_whitespace, take_chars};

pub const MIN_TEXT_CHARS: usize = 15;
pub const MAX_TEXT_CHARS: usize = 200;
pub const MIN_WORDS: usize = 3;
pub const CONTEXT_CHARS: usize = 250;

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

// The year list is fixed, not relative to today: deadlines in 2025 or later
// never count as expired.
static EXPIRED_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"closed",
        r"expired",
        r"deadline\s*:\s*\d{1,2}[/-]\d{1,2}[/-](2024|2023|2022|2021|2020)",
        r"last date.*?(2024|2023|2022|2021|2020)",
    ])
    .expect("valid expired patterns")
});

/// Keyword tables and limits for one scraped category.
#[derive(Debug, Clone)]
pub struct KeywordRules {
    /// At least one must appear in the lowercased anchor text.
    pub strong_indicators: Vec<String>,
    /// Any one of these in the lowercased anchor text rejects it.
    pub noise_words: Vec<String>,
    /// Drop listings whose context mentions a closed or past deadline.
    pub reject_expired: bool,
    /// Listings kept per source after dedup.
    pub max_per_source: usize,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl KeywordRules {
    /// Rules for government and institutional scheme portals.
    pub fn grants() -> Self {
        Self {
            strong_indicators: owned(&[
                "scheme",
                "grant",
                "fund scheme",
                "seed fund",
                "subsidy",
                "incentive scheme",
                "call for proposal",
                "call for application",
                "apply now",
                "open for application",
                "credit guarantee",
                "equity support",
                "interest subvention",
                "incubation program",
                "accelerator program",
                "fellowship",
            ]),
            noise_words: owned(&[
                "login", "sign up", "register", "contact us", "about us", "home", "faq", "terms",
                "privacy", "disclaimer", "sitemap", "feedback", "download app", "play store",
                "app store", "twitter", "facebook", "linkedin", "instagram", "youtube", "blog",
                "news", "media", "gallery", "photo", "video", "annual report", "press release",
                "logo", "certificate", "modify certificate", "access/modify",
                "regulatory support", "playbook", "guide", "handbook", "manual", "know more",
                "read more", "click here", "learn more", "view all", "explore", "menu",
                "navigation", "cookie",
            ]),
            reject_expired: true,
            max_per_source: 10,
        }
    }

    /// Rules for accelerator, investor and program sites.
    pub fn funding() -> Self {
        Self {
            strong_indicators: owned(&[
                "apply",
                "application",
                "program",
                "programme",
                "batch",
                "cohort",
                "accelerator",
                "incubat",
                "seed fund",
                "pre-seed",
                "fellowship",
                "pitch",
                "demo day",
                "open call",
                "invest",
                "funding round",
            ]),
            noise_words: owned(&[
                "login", "sign up", "register", "contact", "about", "home", "faq", "terms",
                "privacy", "disclaimer", "sitemap", "feedback", "twitter", "facebook",
                "linkedin", "instagram", "youtube", "blog", "news", "media", "gallery", "photo",
                "video", "press release", "cookie", "subscribe", "newsletter", "read more",
                "learn more", "view all", "know more", "click here", "portfolio", "team",
                "mentor", "alumni", "partner", "career", "job", "hiring",
            ]),
            reject_expired: false,
            max_per_source: 8,
        }
    }

    /// Noise word present, or too few words to be a listing title.
    pub fn is_noise(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.noise_words.iter().any(|w| lower.contains(w.as_str()))
            || text.split_whitespace().count() < MIN_WORDS
    }

    pub fn has_strong_signal(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.strong_indicators.iter().any(|w| lower.contains(w.as_str()))
    }

    /// Full text classification: length window, noise rejection, then the
    /// positive-signal requirement.
    pub fn accepts(&self, text: &str) -> bool {
        let len = text.chars().count();
        (MIN_TEXT_CHARS..=MAX_TEXT_CHARS).contains(&len)
            && !self.is_noise(text)
            && self.has_strong_signal(text)
    }
}

/// Context text suggests the opportunity is closed or its deadline passed.
pub fn looks_expired(context: &str) -> bool {
    EXPIRED_PATTERNS.is_match(&context.to_lowercase())
}

/// Absolute form of `href` found on the page at `base`.
///
/// Absolute http(s) links are kept as they are. Root-relative links get the
/// page's scheme and host; protocol-relative links (`//host/x`) get its
/// scheme. Everything else is `None`.
pub fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    if href.starts_with("//") {
        return base.join(href).ok().map(|u| u.to_string());
    }
    if href.starts_with('/') {
        return Some(format!("{}{}", base.origin().ascii_serialization(), href));
    }
    None
}

/// Visible text of an element: text nodes trimmed, joined by single spaces.
fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().join(" "))
}

fn parent_context(anchor: &ElementRef<'_>) -> String {
    anchor
        .parent()
        .and_then(ElementRef::wrap)
        .map(|parent| take_chars(&element_text(&parent), CONTEXT_CHARS))
        .unwrap_or_default()
}

/// Listings found on one scraped page, deduplicated and capped.
///
/// Each listing is stamped with `target.name` as its source and `fetched_at`
/// as its publish time.
pub fn extract_listings(
    html: &str,
    target: &ScrapeTarget,
    rules: &KeywordRules,
    fetched_at: DateTime<Utc>,
) -> Vec<Article> {
    let Ok(base) = Url::parse(&target.url) else {
        return Vec::new();
    };
    let document = Html::parse_document(html);

    let listings = document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let text = element_text(&anchor);
            if !rules.accepts(&text) {
                return None;
            }
            let link = resolve_link(&base, href)?;

            let context = parent_context(&anchor);
            if rules.reject_expired && looks_expired(&context) {
                return None;
            }

            Some(Article {
                summary: if context == text { String::new() } else { context },
                title: text,
                link,
                source: target.name.clone(),
                published: fetched_at,
            })
        })
        .collect();

    let mut unique = dedup_batch(listings);
    unique.truncate(rules.max_per_source);
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(url: &str) -> ScrapeTarget {
        ScrapeTarget::new("Test Portal", url, "Central")
    }

    #[test]
    fn test_grant_classification_examples() {
        let rules = KeywordRules::grants();
        assert!(rules.accepts("Apply now for Seed Fund 2024"));
        assert!(!rules.accepts("Contact Us"));
        assert!(!rules.accepts("Click here to read the scheme"));
        assert!(!rules.accepts("Startup Grant"));
        assert!(!rules.accepts("Seed-fund-grant-scheme-details"));
    }

    #[test]
    fn test_two_words_always_noise() {
        let rules = KeywordRules::grants();
        assert!(rules.is_noise("Grant Scheme"));
        assert!(rules.is_noise("Seed-Fund-Scheme Subsidy-Grant-Program"));
        assert!(!rules.is_noise("Seed Fund Scheme"));
    }

    #[test]
    fn test_no_strong_signal_is_rejected() {
        let rules = KeywordRules::grants();
        let text = "Annual startup conference schedule";
        assert!(!rules.is_noise(text));
        assert!(!rules.accepts(text));
    }

    #[test]
    fn test_funding_rules() {
        let rules = KeywordRules::funding();
        assert!(rules.accepts("Apply to the Summer 2026 batch"));
        assert!(!rules.accepts("Meet our portfolio companies and apply"));
        assert_eq!(rules.max_per_source, 8);
        assert!(!rules.reject_expired);
    }

    #[test]
    fn test_resolve_link() {
        let base = Url::parse("https://example.com/page").unwrap();
        assert_eq!(
            resolve_link(&base, "/schemes/x"),
            Some("https://example.com/schemes/x".to_string())
        );
        assert_eq!(resolve_link(&base, "schemes/x"), None);
        assert_eq!(
            resolve_link(&base, "https://other.org/call"),
            Some("https://other.org/call".to_string())
        );
        assert_eq!(
            resolve_link(&base, "//cdn.example.com/a"),
            Some("https://cdn.example.com/a".to_string())
        );
        assert_eq!(resolve_link(&base, "javascript:void(0)"), None);
        assert_eq!(resolve_link(&base, "mailto:grants@example.com"), None);
        assert_eq!(resolve_link(&base, "#apply"), None);
    }

    #[test]
    fn test_resolve_link_keeps_port() {
        let base = Url::parse("http://localhost:8080/portal/index.html").unwrap();
        assert_eq!(
            resolve_link(&base, "/schemes/1"),
            Some("http://localhost:8080/schemes/1".to_string())
        );
    }

    #[test]
    fn test_looks_expired() {
        assert!(looks_expired("This call is now CLOSED"));
        assert!(looks_expired("Deadline: 15/03/2023 for all applicants"));
        assert!(looks_expired("Last date for submission was 30 June 2022"));
        assert!(!looks_expired("Deadline: 15/03/2027"));
        assert!(!looks_expired("Applications open until further notice"));
    }

    #[test]
    fn test_extract_listings_end_to_end() {
        let html = r#"
            <html><body>
              <nav><a href="/">Home</a> <a href="/contact">Contact Us</a></nav>
              <ul>
                <li><a href="/schemes/seed">Apply now for Seed Fund 2024</a> Grants up to 50 lakh for early startups.</li>
                <li><a href="https://partner.gov.in/cfp">Call for Proposals: Deep Tech Grant</a></li>
                <li><a href="relative/scheme">Relative Link Grant Scheme Page</a></li>
                <li><a href="/schemes/old">Women Entrepreneur Grant Scheme</a> Status: closed</li>
                <li><a href="/read">Click here to read more about schemes</a></li>
                <li><a href="/schemes/seed-again">apply now for seed fund 2024</a></li>
                <li><a href="/events">Upcoming events and workshops calendar</a></li>
              </ul>
            </body></html>
        "#;
        let fetched_at = Utc::now();
        let listings = extract_listings(
            html,
            &target("https://portal.example.gov/schemes/index.html"),
            &KeywordRules::grants(),
            fetched_at,
        );

        let links: Vec<&str> = listings.iter().map(|l| l.link.as_str()).collect();
        assert_eq!(
            links,
            vec![
                "https://portal.example.gov/schemes/seed",
                "https://partner.gov.in/cfp",
            ]
        );

        let first = &listings[0];
        assert_eq!(first.title, "Apply now for Seed Fund 2024");
        assert_eq!(
            first.summary,
            "Apply now for Seed Fund 2024 Grants up to 50 lakh for early startups."
        );
        assert_eq!(first.source, "Test Portal");
        assert_eq!(first.published, fetched_at);

        // parent text equals anchor text
        assert_eq!(listings[1].summary, "");
    }

    #[test]
    fn test_extract_listings_caps_per_source() {
        let anchors: String = (0..15)
            .map(|i| format!(r#"<p><a href="/s/{i}">Startup seed fund scheme number {i}</a></p>"#))
            .collect();
        let html = format!("<html><body>{anchors}</body></html>");

        let grants = extract_listings(
            &html,
            &target("https://example.com/"),
            &KeywordRules::grants(),
            Utc::now(),
        );
        assert_eq!(grants.len(), 10);
        assert_eq!(grants[0].link, "https://example.com/s/0");
        assert_eq!(grants[9].link, "https://example.com/s/9");
    }

    #[test]
    fn test_context_is_capped() {
        let filler = "x".repeat(400);
        let html = format!(
            r#"<div><a href="/g">National seed fund scheme for startups</a> {filler}</div>"#
        );
        let listings = extract_listings(
            &html,
            &target("https://example.com/"),
            &KeywordRules::grants(),
            Utc::now(),
        );
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].summary.chars().count(), CONTEXT_CHARS);
    }

    #[test]
    fn test_unparseable_target_url_yields_nothing() {
        let listings = extract_listings(
            r#"<a href="/g">National seed fund scheme for startups</a>"#,
            &target("not a url"),
            &KeywordRules::grants(),
            Utc::now(),
        );
        assert!(listings.is_empty());
    }
}
