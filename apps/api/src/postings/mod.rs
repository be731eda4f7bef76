//! Job posting scraper: fetches a posting page and pulls out its description text.

pub mod handlers;

use std::collections::HashSet;
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, info};

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const REQUEST_TIMEOUT_SECS: u64 = 10;
/// Blocks this short are usually navigation or button labels.
const MIN_BLOCK_CHARS: usize = 20;
const MAX_BLOCKS: usize = 100;

lazy_static! {
    static ref LINKEDIN_CURRENT_JOB: Regex = Regex::new(r"currentJobId=(\d+)").expect("static regex");
    static ref LINKEDIN_VIEW_PATH: Regex = Regex::new(r"jobs/view/(\d+)").expect("static regex");
    static ref DESCRIPTION_CLASS: Regex =
        Regex::new(r"(?i)(description|show-more-less-html|job-details)").expect("static regex");
    static ref CLASSED: Selector = Selector::parse("[class]").expect("static selector");
    static ref FALLBACK_ROOTS: [Selector; 3] = [
        Selector::parse("main").expect("static selector"),
        Selector::parse("article").expect("static selector"),
        Selector::parse("body").expect("static selector"),
    ];
    static ref TEXT_BLOCKS: Selector =
        Selector::parse("p, li, h1, h2, h3, h4, ul, div").expect("static selector");
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Failed to scrape URL: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Scraper blocked or failed (Status {0})")]
    Status(u16),

    #[error("Could not extract content from page")]
    NoContent,
}

/// Rewrites LinkedIn search/collection links to the public `jobs/view` page,
/// which can usually be fetched without signing in. Other URLs pass through.
pub fn normalize_job_url(url: &str) -> String {
    if !url.contains("linkedin.com") {
        return url.to_string();
    }

    let job_id = LINKEDIN_CURRENT_JOB
        .captures(url)
        .or_else(|| LINKEDIN_VIEW_PATH.captures(url))
        .and_then(|c| c.get(1));

    match job_id {
        Some(id) => format!("https://www.linkedin.com/jobs/view/{}", id.as_str()),
        None => url.to_string(),
    }
}

fn content_root(document: &Html) -> Option<ElementRef<'_>> {
    let by_class = document.select(&CLASSED).find(|element| {
        element
            .value()
            .classes()
            .any(|class| DESCRIPTION_CLASS.is_match(class))
    });

    by_class.or_else(|| {
        FALLBACK_ROOTS
            .iter()
            .find_map(|selector| document.select(selector).next())
    })
}

fn block_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts readable description text from a posting page.
///
/// Picks the description container (or `main`/`article`/`body`), collects
/// the text of its block elements, drops short and repeated blocks and joins
/// the first hundred with blank lines.
pub fn extract_description(html: &str) -> Result<String, ScrapeError> {
    let document = Html::parse_document(html);
    let root = content_root(&document).ok_or(ScrapeError::NoContent)?;

    let mut seen = HashSet::new();
    let blocks: Vec<String> = root
        .select(&TEXT_BLOCKS)
        .filter(|element| element.id() != root.id())
        .map(block_text)
        .filter(|text| text.chars().count() > MIN_BLOCK_CHARS)
        .filter(|text| seen.insert(text.clone()))
        .take(MAX_BLOCKS)
        .collect();

    Ok(blocks.join("\n\n"))
}

/// HTTP side of the scraper. Cheap to clone.
#[derive(Clone)]
pub struct PostingScraper {
    client: Client,
}

impl PostingScraper {
    pub fn new() -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }

    pub async fn fetch_description(&self, url: &str) -> Result<String, ScrapeError> {
        let requested = url.trim();
        let url = normalize_job_url(requested);
        if url != requested {
            debug!("Rewrote posting URL {requested} to {url}");
        }
        info!("Scraping job posting {url}");

        let response = self
            .client
            .get(&url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() != 200 {
            return Err(ScrapeError::Status(status.as_u16()));
        }

        let html = response.text().await?;
        extract_description(&html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_linkedin_current_job_id_is_rewritten() {
        assert_eq!(
            normalize_job_url("https://www.linkedin.com/jobs/collections/recommended/?currentJobId=3912345678&origin=x"),
            "https://www.linkedin.com/jobs/view/3912345678"
        );
    }

    #[test]
    fn test_linkedin_view_path_is_canonicalized() {
        assert_eq!(
            normalize_job_url("https://de.linkedin.com/jobs/view/12345/?trk=abc"),
            "https://www.linkedin.com/jobs/view/12345"
        );
    }

    #[test]
    fn test_other_urls_pass_through() {
        let url = "https://boards.greenhouse.io/acme/jobs/42";
        assert_eq!(normalize_job_url(url), url);
        let search = "https://www.linkedin.com/jobs/search/?keywords=rust";
        assert_eq!(normalize_job_url(search), search);
    }

    #[test]
    fn test_extracts_from_description_container() {
        let html = r#"<html><body>
            <nav><div>Home | Jobs | Sign in to see more roles here</div></nav>
            <section class="jobs Show-More-Less-Html__markup">
                <h2>About the role and the team you will join</h2>
                <p>You will design and operate <b>Rust</b> services at scale.</p>
                <ul><li>Five years of backend engineering experience</li></ul>
                <p>short</p>
                <p>You will design and operate <b>Rust</b> services at scale.</p>
            </section>
        </body></html>"#;

        let text = extract_description(html).unwrap();
        let blocks: Vec<&str> = text.split("\n\n").collect();
        assert_eq!(
            blocks,
            vec![
                "About the role and the team you will join",
                "You will design and operate Rust services at scale.",
                "Five years of backend engineering experience",
            ]
        );
        assert!(!text.contains("Sign in"));
    }

    #[test]
    fn test_falls_back_to_main() {
        let html = r#"<html><body>
            <header><p>Cookie banner text that is long enough to count</p></header>
            <main><p>We are hiring a platform engineer for our team.</p></main>
        </body></html>"#;
        assert_eq!(
            extract_description(html).unwrap(),
            "We are hiring a platform engineer for our team."
        );
    }

    #[test]
    fn test_caps_block_count() {
        let paragraphs: String = (0..150)
            .map(|i| format!("<p>Responsibility number {i} for this particular role</p>"))
            .collect();
        let html = format!("<html><body><article>{paragraphs}</article></body></html>");
        let text = extract_description(&html).unwrap();
        assert_eq!(text.split("\n\n").count(), MAX_BLOCKS);
    }
}
