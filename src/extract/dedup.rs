//! Intra-batch deduplication.

use std::collections::HashSet;

use crate::models::Record;

/// Title key used for batch dedup: lowercased and trimmed.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Drop every record that repeats the link or the normalized title of an
/// earlier kept record. Order is preserved and the first occurrence wins.
pub fn dedup_batch<T: Record>(items: Vec<T>) -> Vec<T> {
    let mut seen_links = HashSet::new();
    let mut seen_titles = HashSet::new();

    items
        .into_iter()
        .filter(|item| {
            let link = item.link().to_string();
            let title = normalize_title(item.title());
            if seen_links.contains(&link) || seen_titles.contains(&title) {
                return false;
            }
            seen_links.insert(link);
            seen_titles.insert(title);
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Article;
    use chrono::Utc;

    fn article(title: &str, link: &str) -> Article {
        Article {
            title: title.to_string(),
            link: link.to_string(),
            summary: String::new(),
            source: "Test".to_string(),
            published: Utc::now(),
        }
    }

    #[test]
    fn test_same_link_keeps_first() {
        let out = dedup_batch(vec![
            article("First title", "https://example.com/a"),
            article("Second title", "https://example.com/a"),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "First title");
    }

    #[test]
    fn test_same_normalized_title_keeps_first() {
        let out = dedup_batch(vec![
            article("Seed Fund Scheme", "https://example.com/a"),
            article("  seed fund scheme ", "https://example.com/b"),
            article("Other scheme", "https://example.com/c"),
        ]);
        let links: Vec<&str> = out.iter().map(|a| a.link.as_str()).collect();
        assert_eq!(links, vec!["https://example.com/a", "https://example.com/c"]);
    }

    #[test]
    fn test_order_preserved() {
        let out = dedup_batch(vec![
            article("C", "https://example.com/c"),
            article("A", "https://example.com/a"),
            article("B", "https://example.com/b"),
            article("A", "https://example.com/a2"),
        ]);
        let titles: Vec<&str> = out.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_empty_batch() {
        assert!(dedup_batch(Vec::<Article>::new()).is_empty());
    }
}
