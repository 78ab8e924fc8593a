//! Trending repository pages.
//!
//! Each repository is an `article.Box-row`; rows without a heading link are
//! skipped. Star counts that fail to parse become 0.

use chrono::{DateTime, Utc};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::extract::dedup::dedup_batch;
use crate::models::Repo;
use crate::utils::{collapse_whitespace, take_chars};

const GITHUB_ORIGIN: &str = "https://github.com";
const DESCRIPTION_MAX_CHARS: usize = 300;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid trending selector")
}

static ROW: Lazy<Selector> = Lazy::new(|| selector("article.Box-row"));
static HEADING_LINK: Lazy<Selector> = Lazy::new(|| selector("h2 a"));
static DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector("p"));
static LANGUAGE: Lazy<Selector> = Lazy::new(|| selector("[itemprop='programmingLanguage']"));
static STAR_LINK: Lazy<Selector> = Lazy::new(|| selector("a.Link--muted"));
static INLINE_SPAN: Lazy<Selector> = Lazy::new(|| selector("span.d-inline-block"));

static STARS_TODAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([\d,]+)\s+stars?\s+today").expect("valid stars regex"));
static STARS_THIS_WEEK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([\d,]+)\s+stars?\s+this\s+week").expect("valid stars regex"));

fn text_of(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().join(" "))
}

fn first_text(row: &ElementRef<'_>, selector: &Selector) -> String {
    row.select(selector)
        .next()
        .map(|e| text_of(&e))
        .unwrap_or_default()
}

/// Parse `"12,345"` style counts.
pub fn parse_count(text: &str) -> Option<u64> {
    text.trim().replace(',', "").parse().ok()
}

/// Star gain from a `"1,234 stars today"` or `"567 stars this week"` label.
pub fn parse_stars_gained(text: &str) -> Option<u64> {
    STARS_TODAY
        .captures(text)
        .or_else(|| STARS_THIS_WEEK.captures(text))
        .and_then(|caps| parse_count(&caps[1]))
}

fn parse_row(row: &ElementRef<'_>, label: &str, fetched_at: DateTime<Utc>) -> Option<Repo> {
    let heading = row.select(&HEADING_LINK).next()?;
    let href = heading.value().attr("href")?;
    let name: String = heading.text().flat_map(str::chars).filter(|c| !c.is_whitespace()).collect();

    let stars = row
        .select(&STAR_LINK)
        .next()
        .and_then(|a| parse_count(&text_of(&a)))
        .unwrap_or(0);
    let stars_today = row
        .select(&INLINE_SPAN)
        .find_map(|span| parse_stars_gained(&text_of(&span)))
        .unwrap_or(0);

    Some(Repo {
        name,
        link: format!("{GITHUB_ORIGIN}{}", href.trim()),
        description: take_chars(&first_text(row, &DESCRIPTION), DESCRIPTION_MAX_CHARS),
        language: first_text(row, &LANGUAGE),
        stars,
        stars_today,
        source: label.to_string(),
        published: fetched_at,
    })
}

/// Repositories listed on a trending page, labelled with `label` as source.
/// Repeated links or names keep their first row only.
pub fn extract_repos(html: &str, label: &str, fetched_at: DateTime<Utc>) -> Vec<Repo> {
    let document = Html::parse_document(html);
    let repos = document
        .select(&ROW)
        .filter_map(|row| parse_row(&row, label, fetched_at))
        .collect();
    dedup_batch(repos)
}
