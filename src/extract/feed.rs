//! Feed extraction for news and papers.
//!
//! RSS and Atom are both read through `feed-rs`. For every entry:
//!
//! 1. Title and link are required; entries missing either are skipped.
//! 2. The publish time is the entry's `published` date, else its `updated`
//!    date. Entries with a known time older than the category window are
//!    dropped; entries with no time are kept (arXiv omits them) and stamped
//!    with the fetch time.
//! 3. The summary (else the content body) is stripped to plain text and
//!    capped at 500 characters.
//! 4. Papers additionally get a conference tag and author list.
//!
//! Output keeps feed order.

use chrono::{DateTime, Duration, Utc};
use feed_rs::model::{Entry, Feed};
use feed_rs::parser;
use itertools::Itertools;

use crate::error::FetchError;
use crate::models::{Article, Paper};
use crate::utils::clean_summary;

/// News entries older than this many hours are dropped.
pub const NEWS_WINDOW_HOURS: i64 = 24;

/// Paper entries older than this many hours are dropped. Wide enough that a
/// Monday run still sees Friday's papers.
pub const PAPERS_WINDOW_HOURS: i64 = 72;

/// Parse a fetched RSS/Atom body.
pub fn parse(body: &[u8]) -> Result<Feed, FetchError> {
    Ok(parser::parse(body)?)
}

/// The fields every feed record needs, read from one entry.
struct EntryFields {
    title: String,
    link: String,
    raw_summary: String,
    published: Option<DateTime<Utc>>,
}

fn read_entry(entry: &Entry) -> Option<EntryFields> {
    let title = entry
        .title
        .as_ref()
        .map(|t| t.content.trim().to_string())
        .unwrap_or_default();
    let link = entry_link(entry);
    if title.is_empty() || link.is_empty() {
        return None;
    }

    let raw_summary = entry
        .summary
        .as_ref()
        .map(|s| s.content.clone())
        .or_else(|| entry.content.as_ref().and_then(|c| c.body.clone()))
        .unwrap_or_default();

    Some(EntryFields {
        title,
        link,
        raw_summary,
        published: published_at(entry),
    })
}

/// Article URL of an entry: the first link with no `rel` or
/// `rel="alternate"`, else the first non-empty link of any kind.
///
/// Atom entries may list `replies`, `edit` or `self` links ahead of the
/// article itself.
pub fn entry_link(entry: &Entry) -> String {
    let mut hrefs = entry
        .links
        .iter()
        .map(|l| (l.href.trim(), l.rel.as_deref().map(str::trim).unwrap_or("")))
        .filter(|(href, _)| !href.is_empty());
    let fallback = hrefs.clone().next().map(|(href, _)| href);
    hrefs
        .find(|(_, rel)| rel.is_empty() || rel.eq_ignore_ascii_case("alternate"))
        .map(|(href, _)| href)
        .or(fallback)
        .unwrap_or_default()
        .to_string()
}

/// Publish time of an entry: `published`, falling back to `updated`.
pub fn published_at(entry: &Entry) -> Option<DateTime<Utc>> {
    entry.published.or(entry.updated)
}

/// Recency check. Unknown publish times always pass.
pub fn within_window(published: Option<DateTime<Utc>>, now: DateTime<Utc>, window_hours: i64) -> bool {
    match published {
        Some(published) => published >= now - Duration::hours(window_hours),
        None => true,
    }
}

/// First conference keyword contained in `text` (case-insensitive), upper-cased.
pub fn detect_conference(text: &str, keywords: &[String]) -> Option<String> {
    let text = text.to_lowercase();
    keywords
        .iter()
        .find(|kw| text.contains(kw.as_str()))
        .map(|kw| kw.to_uppercase())
}

/// News articles from `feed`, published within the last 24 hours of `now`.
pub fn extract_articles(feed: &Feed, source: &str, now: DateTime<Utc>) -> Vec<Article> {
    feed.entries
        .iter()
        .filter_map(read_entry)
        .filter(|e| within_window(e.published, now, NEWS_WINDOW_HOURS))
        .map(|e| Article {
            summary: clean_summary(&e.raw_summary),
            published: e.published.unwrap_or(now),
            source: source.to_string(),
            title: e.title,
            link: e.link,
        })
        .collect()
}

/// Papers from `feed`, published within the last 72 hours of `now`.
///
/// An empty summary becomes `"Paper: <title>"`. The conference tag is looked
/// up in the title and the cleaned summary.
pub fn extract_papers(
    feed: &Feed,
    source: &str,
    now: DateTime<Utc>,
    conference_keywords: &[String],
) -> Vec<Paper> {
    feed.entries
        .iter()
        .filter_map(|entry| read_entry(entry).map(|fields| (entry, fields)))
        .filter(|(_, e)| within_window(e.published, now, PAPERS_WINDOW_HOURS))
        .map(|(entry, e)| {
            let mut summary = clean_summary(&e.raw_summary);
            if summary.is_empty() {
                summary = format!("Paper: {}", e.title);
            }
            let conference_tag =
                detect_conference(&format!("{} {}", e.title, summary), conference_keywords);
            let authors = entry
                .authors
                .iter()
                .map(|p| p.name.trim())
                .filter(|n| !n.is_empty())
                .join(", ");

            Paper {
                base: Article {
                    title: e.title,
                    link: e.link,
                    summary,
                    source: source.to_string(),
                    published: e.published.unwrap_or(now),
                },
                authors,
                conference_tag,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> Vec<String> {
        ["neurips", "icml", "acl"].iter().map(|s| s.to_string()).collect()
    }

    fn rss(items: &str) -> Vec<u8> {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <link>https://example.com/</link>
    <description>Fixture</description>
    {items}
  </channel>
</rss>"#
        )
        .into_bytes()
    }

    fn item(title: &str, link: &str, description: &str, pub_date: Option<DateTime<Utc>>) -> String {
        let date = pub_date
            .map(|d| format!("<pubDate>{}</pubDate>", d.to_rfc2822()))
            .unwrap_or_default();
        format!(
            "<item><title>{title}</title><link>{link}</link><description><![CDATA[{description}]]></description>{date}</item>"
        )
    }

    #[test]
    fn test_within_window() {
        let now = Utc::now();
        assert!(within_window(None, now, 24));
        assert!(within_window(Some(now - Duration::hours(23)), now, 24));
        assert!(!within_window(Some(now - Duration::hours(25)), now, 24));
        assert!(within_window(Some(now - Duration::hours(71)), now, 72));
    }

    #[test]
    fn test_news_recency_filter() {
        let now = Utc::now();
        let body = rss(&[
            item("Fresh story", "https://example.com/fresh", "new", Some(now - Duration::hours(2))),
            item("Stale story", "https://example.com/stale", "old", Some(now - Duration::hours(30))),
            item("Undated story", "https://example.com/undated", "no date", None),
        ]
        .concat());

        let feed = parse(&body).unwrap();
        let articles = extract_articles(&feed, "Test Feed", now);
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Fresh story", "Undated story"]);

        let undated = &articles[1];
        assert_eq!(undated.published, now);
        assert_eq!(undated.source, "Test Feed");
    }

    #[test]
    fn test_entries_missing_title_or_link_are_skipped() {
        let now = Utc::now();
        let body = rss(concat!(
            "<item><title>Only a title</title></item>",
            "<item><link>https://example.com/only-link</link></item>",
            "<item><title>Complete</title><link>https://example.com/ok</link></item>",
        ));
        let feed = parse(&body).unwrap();
        let articles = extract_articles(&feed, "Test Feed", now);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].link, "https://example.com/ok");
    }

    fn atom_entry(links: &str) -> Vec<u8> {
        let updated = Utc::now().to_rfc3339();
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Blog</title>
  <id>urn:test:blog</id>
  <updated>{updated}</updated>
  <entry>
    <title>Shipping the new model</title>
    <id>urn:test:post:1</id>
    <updated>{updated}</updated>
    {links}
    <summary>Release notes.</summary>
  </entry>
</feed>"#
        )
        .into_bytes()
    }

    #[test]
    fn test_atom_entry_uses_alternate_link() {
        let body = atom_entry(concat!(
            r#"<link rel="replies" type="application/atom+xml" href="https://blog.example/feeds/1/comments/default"/>"#,
            r#"<link rel="edit" type="application/atom+xml" href="https://blog.example/feeds/posts/default/1"/>"#,
            r#"<link rel="self" type="application/atom+xml" href="https://blog.example/feeds/posts/default/1"/>"#,
            r#"<link rel="alternate" type="text/html" href="https://blog.example/2026/10/post.html"/>"#,
        ));
        let feed = parse(&body).unwrap();
        let articles = extract_articles(&feed, "Test Blog", Utc::now());
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].link, "https://blog.example/2026/10/post.html");
    }

    #[test]
    fn test_atom_entry_without_alternate_falls_back_to_first_link() {
        let body = atom_entry(concat!(
            r#"<link rel="replies" href="https://blog.example/feeds/1/comments/default"/>"#,
            r#"<link rel="self" href="https://blog.example/feeds/posts/default/1"/>"#,
        ));
        let feed = parse(&body).unwrap();
        let articles = extract_articles(&feed, "Test Blog", Utc::now());
        assert_eq!(articles[0].link, "https://blog.example/feeds/1/comments/default");
    }

    #[test]
    fn test_summary_is_cleaned_and_truncated() {
        let now = Utc::now();
        let long = format!("<p>{}</p>", "lorem ipsum ".repeat(80));
        let body = rss(&item("Long", "https://example.com/long", &long, None));
        let feed = parse(&body).unwrap();
        let articles = extract_articles(&feed, "Test Feed", now);

        let summary = &articles[0].summary;
        assert_eq!(summary.chars().count(), 500);
        assert!(summary.ends_with("..."));
        assert!(!summary.contains("<p>"));
    }

    #[test]
    fn test_papers_window_and_conference_tag() {
        let now = Utc::now();
        let body = rss(&[
            item(
                "Scaling Laws Revisited",
                "https://arxiv.org/abs/1",
                "Accepted at <b>NeurIPS</b> 2025.",
                Some(now - Duration::hours(48)),
            ),
            item("Too Old", "https://arxiv.org/abs/2", "", Some(now - Duration::hours(80))),
            item("Plain Paper", "https://arxiv.org/abs/3", "", None),
        ]
        .concat());

        let feed = parse(&body).unwrap();
        let papers = extract_papers(&feed, "arXiv cs.LG", now, &keywords());
        assert_eq!(papers.len(), 2);
        assert_eq!(papers[0].conference_tag.as_deref(), Some("NEURIPS"));
        assert_eq!(papers[0].base.summary, "Accepted at NeurIPS 2025.");
        assert_eq!(papers[1].base.summary, "Paper: Plain Paper");
        assert_eq!(papers[1].conference_tag, None);
    }

    #[test]
    fn test_detect_conference_first_match_wins() {
        let kws = keywords();
        assert_eq!(
            detect_conference("An ICML and NeurIPS workshop paper", &kws),
            Some("NEURIPS".to_string())
        );
        assert_eq!(detect_conference("nothing here", &kws), None);
    }

    #[test]
    fn test_garbage_body_is_a_parse_error() {
        assert!(parse(b"this is not a feed").is_err());
    }
}
