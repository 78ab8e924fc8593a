//! Daily digest assembly and HTML rendering.
//!
//! [`assemble`] reads one day of the store in fixed category order and drops
//! categories with nothing stored. [`render`] turns the result into an email
//! subject and an inline-styled HTML body. Every piece of collected text is
//! escaped before it reaches the markup.

use chrono::NaiveDate;
use html_escape::{encode_double_quoted_attribute, encode_text};
use itertools::Itertools;
use tracing::{info, instrument};

use crate::error::StoreError;
use crate::models::{Article, Category, Funding, Grant, Item, Paper, Repo};
use crate::sources::Registry;
use crate::store::DailyStore;
use crate::utils::TAG_RE;

const CARD_STYLE: &str = "background:#ffffff;border-radius:6px;padding:16px 18px;margin-bottom:12px;border:1px solid #e8e8e8;";
const LINK_STYLE: &str = "font-size:15px;color:#1a1a2e;text-decoration:none;font-weight:600;line-height:1.4;display:block;";
const SUMMARY_STYLE: &str = "margin:8px 0 0 0;color:#555;font-size:13px;line-height:1.55;";
const BODY_STYLE: &str = "font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;margin:0;padding:0;background:#f4f4f8;";
const HEADER_STYLE: &str = "background:#1a1a2e;border-radius:10px 10px 0 0;padding:28px 30px;";

/// One non-empty category of the day.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub category: Category,
    pub items: Vec<Item>,
}

impl Section {
    fn heading(&self) -> &'static str {
        match self.category {
            Category::News => "AI News",
            Category::Papers => "Research Papers",
            Category::Grants => "Grants & Schemes",
            Category::Funding => "Funding Opportunities",
            Category::Github => "GitHub Trending",
        }
    }

    fn colour(&self) -> &'static str {
        match self.category {
            Category::News => "#0984E3",
            Category::Papers => "#6C5CE7",
            Category::Grants => "#00B894",
            Category::Funding => "#E17055",
            Category::Github => "#2D3436",
        }
    }
}

async fn load_items(
    store: &DailyStore,
    category: Category,
    day: NaiveDate,
) -> Result<Vec<Item>, StoreError> {
    let items = match category {
        Category::News => store
            .load::<Article>(category, day)
            .await?
            .into_iter()
            .map(Item::News)
            .collect(),
        Category::Papers => store
            .load::<Paper>(category, day)
            .await?
            .into_iter()
            .map(Item::Paper)
            .collect(),
        Category::Grants => store
            .load::<Grant>(category, day)
            .await?
            .into_iter()
            .map(Item::Grant)
            .collect(),
        Category::Funding => store
            .load::<Funding>(category, day)
            .await?
            .into_iter()
            .map(Item::Funding)
            .collect(),
        Category::Github => store
            .load::<Repo>(category, day)
            .await?
            .into_iter()
            .map(Item::Repo)
            .collect(),
    };
    Ok(items)
}

/// Every category with records on `day`, in digest order.
///
/// News keeps storage order within each tier, tier-1 sources first. Other
/// categories keep storage order.
#[instrument(level = "info", skip(store, registry))]
pub async fn assemble(
    store: &DailyStore,
    registry: &Registry,
    day: NaiveDate,
) -> Result<Vec<Section>, StoreError> {
    let mut sections = Vec::new();
    for category in Category::ALL {
        let mut items = load_items(store, category, day).await?;
        if items.is_empty() {
            continue;
        }
        if category == Category::News {
            // stable: false sorts before true
            items.sort_by_key(|item| !registry.is_tier1(item.source()));
        }
        sections.push(Section { category, items });
    }
    info!(
        sections = sections.len(),
        items = sections.iter().map(|s| s.items.len()).sum::<usize>(),
        "Digest assembled"
    );
    Ok(sections)
}

/// `"Your Daily Briefing - May 06, 2025"`
pub fn subject(day: NaiveDate) -> String {
    format!("Your Daily Briefing - {}", long_date(day))
}

fn long_date(day: NaiveDate) -> String {
    day.format("%B %d, %Y").to_string()
}

/// `1234567` → `"1,234,567"`
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let bytes = digits.as_bytes();
    bytes
        .rchunks(3)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .join(",")
}

fn badge(text: &str, background: &str, colour: &str) -> String {
    format!(
        r#"<span style="display:inline-block;margin-top:6px;padding:2px 8px;background:{background};border-radius:10px;font-size:11px;color:{colour};font-weight:500;">{}</span>"#,
        encode_text(text)
    )
}

fn card(title: &str, link: &str, badges: &str, text: &str) -> String {
    let paragraph = if text.is_empty() {
        String::new()
    } else {
        format!(r#"<p style="{SUMMARY_STYLE}">{}</p>"#, encode_text(text))
    };
    format!(
        r#"
            <div style="{CARD_STYLE}">
                <a href="{}" style="{LINK_STYLE}" target="_blank">{}</a>
                {badges}
                {paragraph}
            </div>"#,
        encode_double_quoted_attribute(link),
        encode_text(title),
    )
}

fn render_article(item: &Item, registry: &Registry) -> String {
    let mut badges = vec![badge(item.source(), "#f0f0f5", "#666")];
    match item {
        Item::Paper(paper) => {
            if let Some(tag) = &paper.conference_tag {
                badges.push(badge(tag, "#fff3e0", "#e65100"));
            }
        }
        Item::Grant(grant) if !grant.region.is_empty() => {
            badges.push(badge(&grant.region, "#e8f5e9", "#2e7d32"));
        }
        Item::Funding(funding) if !funding.kind.is_empty() => {
            badges.push(badge(&funding.kind, "#fce4ec", "#c62828"));
        }
        _ => {}
    }
    if registry.is_tier1(item.source()) {
        badges.push(badge("Tier 1", "#e3f2fd", "#1565c0"));
    }

    let summary = TAG_RE.replace_all(item.summary(), "");
    card(item.title(), item.link(), &badges.join(" "), &summary)
}

fn render_repo(repo: &Repo) -> String {
    let mut badges = Vec::new();
    if !repo.language.is_empty() {
        badges.push(badge(&repo.language, "#f0f0f5", "#666"));
    }
    badges.push(badge(&format!("★ {}", thousands(repo.stars)), "#fff8e1", "#f57f17"));
    if repo.stars_today > 0 {
        badges.push(badge(
            &format!("+{} today", thousands(repo.stars_today)),
            "#e8f5e9",
            "#2e7d32",
        ));
    }
    card(&repo.name, &repo.link, &badges.join(" "), &repo.description)
}

fn render_section(section: &Section, registry: &Registry) -> String {
    let cards = section
        .items
        .iter()
        .map(|item| match item {
            Item::Repo(repo) => render_repo(repo),
            other => render_article(other, registry),
        })
        .join("\n");
    let colour = section.colour();
    format!(
        r#"
        <div style="margin-bottom:28px;padding-left:16px;border-left:4px solid {colour};">
            <h2 style="margin:0 0 14px 0;font-size:17px;font-weight:700;color:{colour};text-transform:uppercase;letter-spacing:0.5px;">{}
                <span style="font-size:12px;font-weight:400;color:#999;margin-left:8px;">({})</span>
            </h2>
{cards}
        </div>"#,
        encode_text(section.heading()),
        section.items.len(),
    )
}

fn page(header_line: &str, content: &str) -> String {
    format!(
        r#"<html>
<body style="{BODY_STYLE}">
    <div style="max-width:640px;margin:0 auto;padding:20px;">
        <div style="{HEADER_STYLE}">
            <h1 style="margin:0;color:#ffffff;font-size:22px;font-weight:700;">Your Daily Briefing</h1>
            <p style="margin:8px 0 0 0;color:#a0a0c0;font-size:13px;">{header_line}</p>
        </div>
{content}
    </div>
</body>
</html>"#
    )
}

/// Subject line and HTML body for `day`.
///
/// With no sections the body says nothing was collected and points at
/// `--collect`.
pub fn render(sections: &[Section], registry: &Registry, day: NaiveDate) -> (String, String) {
    let date = long_date(day);
    if sections.is_empty() {
        let content = r#"        <div style="background:#ffffff;padding:30px;border-radius:0 0 10px 10px;">
            <p style="color:#666;font-size:14px;">Nothing collected today. Run <code>daily_briefing --collect</code> first.</p>
        </div>"#;
        return (subject(day), page(&date, content));
    }

    let total: usize = sections.iter().map(|s| s.items.len()).sum();
    let body = sections
        .iter()
        .map(|section| render_section(section, registry))
        .join("");
    let content = format!(
        r#"        <div style="background:#fafafe;padding:28px 26px;border-radius:0 0 10px 10px;">
{body}
            <div style="border-top:1px solid #e8e8e8;margin-top:10px;padding-top:18px;text-align:center;">
                <p style="font-size:11px;color:#aaa;margin:0;">Curated by Daily Briefing</p>
            </div>
        </div>"#
    );
    let header = format!("{date} &nbsp;&middot;&nbsp; {total} items collected");
    (subject(day), page(&header, &content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 6).unwrap()
    }

    fn article(title: &str, link: &str, source: &str) -> Article {
        Article {
            title: title.to_string(),
            link: link.to_string(),
            summary: format!("About {title}"),
            source: source.to_string(),
            published: Utc::now(),
        }
    }

    #[test]
    fn test_subject_format() {
        assert_eq!(subject(day()), "Your Daily Briefing - May 06, 2025");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }

    #[tokio::test]
    async fn test_assemble_orders_and_omits() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DailyStore::new(tmp.path());
        let registry = Registry::default();
        store
            .save(
                Category::News,
                day(),
                &[
                    article("Funding round", "https://tc.example/1", "TechCrunch AI"),
                    article("New model", "https://openai.example/1", "OpenAI Blog"),
                    article("Agents", "https://vb.example/1", "VentureBeat AI"),
                    article("Safety", "https://anthropic.example/1", "Anthropic Blog"),
                ],
            )
            .await
            .unwrap();
        store
            .save(
                Category::Grants,
                day(),
                &[Grant {
                    base: article("Seed Fund Scheme", "https://gov.example/1", "Startup India"),
                    region: "Central".to_string(),
                    deadline: None,
                }],
            )
            .await
            .unwrap();
        // an empty file is omitted like a missing one
        store.save::<Paper>(Category::Papers, day(), &[]).await.unwrap();

        let sections = assemble(&store, &registry, day()).await.unwrap();
        let categories: Vec<Category> = sections.iter().map(|s| s.category).collect();
        assert_eq!(categories, vec![Category::News, Category::Grants]);

        let sources: Vec<&str> = sections[0].items.iter().map(|i| i.source()).collect();
        assert_eq!(
            sources,
            vec!["OpenAI Blog", "Anthropic Blog", "TechCrunch AI", "VentureBeat AI"]
        );
    }

    #[tokio::test]
    async fn test_assemble_empty_day() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DailyStore::new(tmp.path());
        let sections = assemble(&store, &Registry::default(), day()).await.unwrap();
        assert!(sections.is_empty());

        let (subject, html) = render(&sections, &Registry::default(), day());
        assert_eq!(subject, "Your Daily Briefing - May 06, 2025");
        assert!(html.contains("Nothing collected today"));
    }

    #[test]
    fn test_render_escapes_and_badges() {
        let registry = Registry::default();
        let sections = vec![
            Section {
                category: Category::News,
                items: vec![Item::News(article(
                    "<script>alert(1)</script> & more",
                    "https://openai.example/a?x=1&y=\"2\"",
                    "OpenAI Blog",
                ))],
            },
            Section {
                category: Category::Papers,
                items: vec![Item::Paper(Paper {
                    base: article("Sparse Attention", "https://arxiv.example/1", "arXiv cs.LG"),
                    authors: "A. Author".to_string(),
                    conference_tag: Some("ICML".to_string()),
                })],
            },
        ];

        let (_, html) = render(&sections, &registry, day());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; more"));
        assert!(html.contains("Tier 1"));
        assert!(html.contains("ICML"));
        assert!(html.contains("#0984E3"));
        assert!(html.contains("#6C5CE7"));
        assert!(html.contains("2 items collected"));
        assert!(!html.contains("y=\"2\""));
    }

    #[test]
    fn test_render_repo() {
        let repo = Repo {
            name: "acme/agent".to_string(),
            link: "https://github.com/acme/agent".to_string(),
            description: "Agents toolkit".to_string(),
            language: "Rust".to_string(),
            stars: 12_345,
            stars_today: 1_204,
            source: "GitHub Trending Daily".to_string(),
            published: Utc::now(),
        };
        let sections = vec![Section {
            category: Category::Github,
            items: vec![Item::Repo(repo)],
        }];

        let (_, html) = render(&sections, &Registry::default(), day());
        assert!(html.contains("★ 12,345"));
        assert!(html.contains("+1,204 today"));
        assert!(html.contains("GitHub Trending"));
        assert!(html.contains("(1)"));
    }
}
