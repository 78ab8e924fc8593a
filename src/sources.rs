//! Static source registry.
//!
//! Named endpoints per category: syndication feeds for news and papers,
//! scrape targets (with region or type metadata) for grants and funding, and
//! the trending pages for repositories. The [`Registry`] is built once and
//! handed to each agent; nothing here is mutable at runtime.
//!
//! # Sources
//!
//! | Category | Kind | Count |
//! |----------|------|-------|
//! | news | RSS/Atom feed | 10 |
//! | papers | RSS/Atom feed | 9 |
//! | grants | HTML scrape, with region | 12 |
//! | funding | HTML scrape, with type | 7 |
//! | github | HTML scrape | 2 |

use std::collections::HashSet;

/// A named endpoint: a syndication feed or a page scraped as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSource {
    pub name: String,
    pub url: String,
}

impl NamedSource {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

/// A page scraped for anchors. `tag` carries the region (grants) or the
/// program type (funding).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeTarget {
    pub name: String,
    pub url: String,
    pub tag: String,
}

impl ScrapeTarget {
    pub fn new(name: &str, url: &str, tag: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            tag: tag.to_string(),
        }
    }
}

/// Everything the agents poll, plus the keyword data tied to specific sources.
#[derive(Debug, Clone)]
pub struct Registry {
    pub news_feeds: Vec<NamedSource>,
    pub paper_feeds: Vec<NamedSource>,
    pub grant_sources: Vec<ScrapeTarget>,
    pub funding_sources: Vec<ScrapeTarget>,
    /// Trending pages; `name` becomes the `source` of every repo found there.
    pub trending_pages: Vec<NamedSource>,
    /// Lowercase conference names searched in paper titles and summaries.
    pub conference_keywords: Vec<String>,
    /// News sources rendered first in the digest.
    pub news_tier1: HashSet<String>,
}

pub const GITHUB_TRENDING_URL: &str = "https://github.com/trending";

impl Default for Registry {
    fn default() -> Self {
        Self {
            news_feeds: vec![
                // Tier 1: company and lab blogs
                NamedSource::new(
                    "MIT Technology Review AI",
                    "https://www.technologyreview.com/topic/artificial-intelligence/feed",
                ),
                NamedSource::new("OpenAI Blog", "https://openai.com/blog/rss.xml"),
                NamedSource::new("Google AI Blog", "https://blog.google/technology/ai/rss/"),
                NamedSource::new("Anthropic Blog", "https://www.anthropic.com/rss.xml"),
                NamedSource::new("DeepMind Blog", "https://deepmind.google/blog/rss.xml"),
                NamedSource::new(
                    "NVIDIA AI Blog",
                    "https://blogs.nvidia.com/blog/category/deep-learning/feed/",
                ),
                NamedSource::new("Microsoft AI Blog", "https://blogs.microsoft.com/ai/feed/"),
                NamedSource::new(
                    "The Verge AI",
                    "https://www.theverge.com/rss/ai-artificial-intelligence/index.xml",
                ),
                // Tier 2: tech media
                NamedSource::new(
                    "TechCrunch AI",
                    "https://techcrunch.com/category/artificial-intelligence/feed/",
                ),
                NamedSource::new("VentureBeat AI", "https://venturebeat.com/category/ai/feed/"),
            ],
            paper_feeds: vec![
                NamedSource::new("arXiv cs.AI", "https://rss.arxiv.org/rss/cs.AI"),
                NamedSource::new("arXiv cs.LG", "https://rss.arxiv.org/rss/cs.LG"),
                NamedSource::new("arXiv cs.CL", "https://rss.arxiv.org/rss/cs.CL"),
                NamedSource::new("arXiv cs.CV", "https://rss.arxiv.org/rss/cs.CV"),
                NamedSource::new("arXiv cs.NE", "https://rss.arxiv.org/rss/cs.NE"),
                NamedSource::new("arXiv cs.RO", "https://rss.arxiv.org/rss/cs.RO"),
                NamedSource::new("arXiv stat.ML", "https://rss.arxiv.org/rss/stat.ML"),
                NamedSource::new("Hugging Face Papers", "https://huggingface.co/papers/rss"),
                NamedSource::new("Papers With Code", "https://paperswithcode.com/latest/rss"),
            ],
            grant_sources: vec![
                ScrapeTarget::new(
                    "Startup India",
                    "https://www.startupindia.gov.in/content/sih/en/government-schemes.html",
                    "Central",
                ),
                ScrapeTarget::new("MEITY Schemes", "https://www.meity.gov.in/schemes", "Central"),
                ScrapeTarget::new(
                    "DST Call for Proposals",
                    "https://dst.gov.in/call-for-proposals",
                    "Central",
                ),
                ScrapeTarget::new("MSME Schemes", "https://msme.gov.in/all-schemes", "Central"),
                ScrapeTarget::new("BIRAC", "https://birac.nic.in/cfp.php", "Central"),
                ScrapeTarget::new("T-Hub", "https://www.t-hub.co/", "Telangana"),
                ScrapeTarget::new("WE-Hub", "https://wehub.telangana.gov.in/", "Telangana"),
                ScrapeTarget::new("Telangana IT", "https://it.telangana.gov.in/", "Telangana"),
                ScrapeTarget::new(
                    "AP Innovation Society",
                    "https://apis.ap.gov.in/",
                    "Andhra Pradesh",
                ),
                ScrapeTarget::new("APIIC", "https://apiic.ap.gov.in/", "Andhra Pradesh"),
                ScrapeTarget::new("IIIT-H CIE", "https://cie.iiit.ac.in/", "Institutional"),
                ScrapeTarget::new(
                    "iHub-Data IIIT-H",
                    "https://ihub-data.iiit.ac.in/",
                    "Institutional",
                ),
            ],
            funding_sources: vec![
                ScrapeTarget::new("Y Combinator", "https://www.ycombinator.com/apply/", "accelerator"),
                ScrapeTarget::new("Antler India", "https://www.antler.co/location/india", "pre-seed"),
                ScrapeTarget::new("100X.VC", "https://www.100x.vc/", "pre-seed"),
                ScrapeTarget::new("T-Hub Programs", "https://www.t-hub.co/", "accelerator"),
                ScrapeTarget::new(
                    "Indian Angel Network",
                    "https://www.indianangelnetwork.com/",
                    "seed",
                ),
                ScrapeTarget::new("Better Capital", "https://bettercapital.vc/", "pre-seed"),
                ScrapeTarget::new(
                    "Techstars India",
                    "https://www.techstars.com/accelerators",
                    "accelerator",
                ),
            ],
            trending_pages: vec![
                NamedSource::new("GitHub Trending Daily", GITHUB_TRENDING_URL),
                NamedSource::new(
                    "GitHub Trending Weekly",
                    &format!("{GITHUB_TRENDING_URL}?since=weekly"),
                ),
            ],
            conference_keywords: [
                "neurips", "nips", "icml", "iclr", "cvpr", "iccv", "eccv", "acl", "emnlp",
                "naacl", "aaai", "ijcai", "kdd", "sigir", "sigmod", "vldb", "icde", "www",
                "cikm", "wsdm", "recsys", "uai", "aistats", "colt", "icra", "iros", "corl",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            news_tier1: [
                "MIT Technology Review AI",
                "OpenAI Blog",
                "Google AI Blog",
                "Anthropic Blog",
                "DeepMind Blog",
                "NVIDIA AI Blog",
                "Microsoft AI Blog",
                "The Verge AI",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl Registry {
    pub fn is_tier1(&self, source: &str) -> bool {
        self.news_tier1.contains(source)
    }
}
