//! Data models for collected items and the categories they belong to.
//!
//! Every agent produces records of one concrete type:
//! - [`Article`]: a news item, and the shared base of papers, grants and funding calls
//! - [`Paper`]: a research paper with authors and an optional conference tag
//! - [`Grant`]: a government or institutional scheme, tagged with a region
//! - [`Funding`]: an accelerator or investor program, tagged with a type
//! - [`Repo`]: a trending repository (uses `name`/`description` instead of `title`/`summary`)
//!
//! The [`Item`] enum wraps all of them for consumers that handle several
//! categories at once, such as the digest.
//!
//! Field names match the persisted JSON layout, so a daily file holds a plain
//! list of flat objects.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownCategory;

/// Source category. Doubles as the agent name and the storage directory name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    News,
    Papers,
    Grants,
    Funding,
    Github,
}

impl Category {
    /// All categories in digest order.
    pub const ALL: [Category; 5] = [
        Category::News,
        Category::Papers,
        Category::Grants,
        Category::Funding,
        Category::Github,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::News => "news",
            Category::Papers => "papers",
            Category::Grants => "grants",
            Category::Funding => "funding",
            Category::Github => "github",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Behaviour shared by every storable record.
///
/// `link` is the cross-run dedup key inside one category+day file; `title` is
/// only used for dedup inside a single extraction batch.
pub trait Record: Serialize + DeserializeOwned {
    fn title(&self) -> &str;
    fn link(&self) -> &str;

    /// Records without a title or link never reach storage.
    fn is_valid(&self) -> bool {
        !self.title().trim().is_empty() && !self.link().trim().is_empty()
    }
}

/// A news article, and the common fields of every title/summary record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    /// Absolute URL; unique within one category+day.
    pub link: String,
    /// Plain text, at most 500 characters.
    pub summary: String,
    /// Name of the originating feed or site.
    pub source: String,
    /// Publish time from the source, or the fetch time when it gave none.
    pub published: DateTime<Utc>,
}

/// A research paper collected from a feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    #[serde(flatten)]
    pub base: Article,
    #[serde(default)]
    pub authors: String,
    /// Upper-cased conference keyword found in the title or summary.
    #[serde(default)]
    pub conference_tag: Option<String>,
}

/// A grant or scheme scraped from a government or institutional portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    #[serde(flatten)]
    pub base: Article,
    pub region: String,
    #[serde(default)]
    pub deadline: Option<String>,
}

/// An accelerator, investor or program call scraped from a funding site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Funding {
    #[serde(flatten)]
    pub base: Article,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub deadline: Option<String>,
}

/// A trending repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repo {
    /// `owner/repo`.
    pub name: String,
    pub link: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub stars: u64,
    #[serde(default)]
    pub stars_today: u64,
    pub source: String,
    pub published: DateTime<Utc>,
}

impl Record for Article {
    fn title(&self) -> &str {
        &self.title
    }
    fn link(&self) -> &str {
        &self.link
    }
}

impl Record for Paper {
    fn title(&self) -> &str {
        &self.base.title
    }
    fn link(&self) -> &str {
        &self.base.link
    }
}

impl Record for Grant {
    fn title(&self) -> &str {
        &self.base.title
    }
    fn link(&self) -> &str {
        &self.base.link
    }
}

impl Record for Funding {
    fn title(&self) -> &str {
        &self.base.title
    }
    fn link(&self) -> &str {
        &self.base.link
    }
}

impl Record for Repo {
    fn title(&self) -> &str {
        &self.name
    }
    fn link(&self) -> &str {
        &self.link
    }
}

/// A record of any category, tagged by its variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    News(Article),
    Paper(Paper),
    Grant(Grant),
    Funding(Funding),
    Repo(Repo),
}

impl Item {
    /// Title, or repository name.
    pub fn title(&self) -> &str {
        match self {
            Item::News(a) => a.title(),
            Item::Paper(p) => p.title(),
            Item::Grant(g) => g.title(),
            Item::Funding(f) => f.title(),
            Item::Repo(r) => r.title(),
        }
    }

    pub fn link(&self) -> &str {
        match self {
            Item::News(a) => a.link(),
            Item::Paper(p) => p.link(),
            Item::Grant(g) => g.link(),
            Item::Funding(f) => f.link(),
            Item::Repo(r) => r.link(),
        }
    }

    /// Summary, or repository description.
    pub fn summary(&self) -> &str {
        match self {
            Item::News(a) => &a.summary,
            Item::Paper(p) => &p.base.summary,
            Item::Grant(g) => &g.base.summary,
            Item::Funding(f) => &f.base.summary,
            Item::Repo(r) => &r.description,
        }
    }

    pub fn source(&self) -> &str {
        match self {
            Item::News(a) => &a.source,
            Item::Paper(p) => &p.base.source,
            Item::Grant(g) => &g.base.source,
            Item::Funding(f) => &f.base.source,
            Item::Repo(r) => &r.source,
        }
    }
}
