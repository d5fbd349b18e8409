//! Web search by scraping a search engine's HTML results page.
//!
//! No API key is involved, so callers must pace their requests; `SearchResolver` does.

use async_trait::async_trait;
use reqwest::{Client, Url};
use scraper::{Html, Selector};
use tracing::debug;

use super::{SearchError, WebSearch};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Query parameters search engines use to wrap outbound result links.
const REDIRECT_PARAMS: &[&str] = &["q", "url", "uddg"];

pub struct ScrapingWebSearch {
    client: Client,
    /// The engine's results page, e.g. `https://www.google.com/search`.
    base_url: Url,
}

impl ScrapingWebSearch {
    pub fn new(base_url: &str) -> Result<Self, SearchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| SearchError::Malformed(format!("invalid search URL '{base_url}': {e}")))?;
        Ok(Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            base_url,
        })
    }
}

#[async_trait]
impl WebSearch for ScrapingWebSearch {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
        lang: &str,
    ) -> Result<Vec<String>, SearchError> {
        let endpoint = results_page(&self.base_url, query, num_results + 2, lang);

        let response = self.client.get(endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: format!("search page returned {status}"),
            });
        }

        let html = response.text().await?;
        let links = extract_result_links(&html, &self.base_url, num_results)?;
        debug!("Web search returned {} links for '{}'", links.len(), query);
        Ok(links)
    }
}

/// The results page URL for `query`, keeping any path and parameters already on `base_url`.
fn results_page(base_url: &Url, query: &str, num: usize, lang: &str) -> Url {
    let mut url = base_url.clone();
    url.query_pairs_mut()
        .append_pair("q", query)
        .append_pair("num", &num.to_string())
        .append_pair("hl", lang);
    url
}

/// Outbound result links from a results page, in page order, deduplicated.
///
/// Links back into the engine are dropped unless they wrap an outbound
/// target in a redirect parameter, in which case the target is returned.
pub fn extract_result_links(
    html: &str,
    base_url: &Url,
    limit: usize,
) -> Result<Vec<String>, SearchError> {
    let selector =
        Selector::parse("a[href]").map_err(|e| SearchError::Malformed(e.to_string()))?;
    let engine = engine_domain(base_url);
    let document = Html::parse_document(html);

    let mut links: Vec<String> = Vec::new();
    for anchor in document.select(&selector) {
        if links.len() >= limit {
            break;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if let Some(url) = result_url(base_url, href, &engine) {
            if !links.contains(&url) {
                links.push(url);
            }
        }
    }
    Ok(links)
}

fn result_url(base_url: &Url, href: &str, engine: &str) -> Option<String> {
    let url = base_url.join(href).ok()?;

    if is_engine_host(&url, engine) {
        let target = url
            .query_pairs()
            .find(|(key, _)| REDIRECT_PARAMS.contains(&key.as_ref()))
            .map(|(_, value)| value.into_owned())?;
        let target = Url::parse(&target).ok()?;
        return (is_http(&target) && !is_engine_host(&target, engine))
            .then(|| target.to_string());
    }

    is_http(&url).then(|| url.to_string())
}

/// Last two labels of the engine host, e.g. `google.com` for `www.google.com`.
fn engine_domain(base_url: &Url) -> String {
    let host = base_url.host_str().unwrap_or_default();
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 {
        return host.to_string();
    }
    labels[labels.len() - 2..].join(".")
}

fn is_engine_host(url: &Url, engine: &str) -> bool {
    url.host_str()
        .is_some_and(|host| host == engine || host.ends_with(&format!(".{engine}")))
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.host_str().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOGLE_RESULTS: &str = r#"
        <html><body>
          <a href="/search?q=more+results">More results</a>
          <div class="g">
            <a href="/url?q=https://example.com/solar-guide&amp;sa=U&amp;ved=abc">Solar guide</a>
          </div>
          <a href="https://www.google.com/preferences">Settings</a>
          <a href="https://accounts.google.com/ServiceLogin">Sign in</a>
          <div class="g"><a href="https://docs.rs/tokio">Tokio docs</a></div>
          <a href="/url?q=https://example.com/solar-guide&amp;sa=U">Duplicate</a>
          <a href="mailto:someone@example.com">Mail</a>
          <div class="g"><a href="https://example.org/third">Third</a></div>
        </body></html>
    "#;

    fn google() -> Url {
        Url::parse("https://www.google.com").unwrap()
    }

    #[test]
    fn test_extracts_outbound_links_in_order() {
        let links = extract_result_links(GOOGLE_RESULTS, &google(), 10).unwrap();
        assert_eq!(
            links,
            vec![
                "https://example.com/solar-guide".to_string(),
                "https://docs.rs/tokio".to_string(),
                "https://example.org/third".to_string(),
            ]
        );
    }

    #[test]
    fn test_respects_limit() {
        let links = extract_result_links(GOOGLE_RESULTS, &google(), 1).unwrap();
        assert_eq!(links, vec!["https://example.com/solar-guide".to_string()]);
    }

    #[test]
    fn test_decodes_duckduckgo_redirects() {
        let html = r#"<a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.org%2Fwind%3Fa%3D1&amp;rut=xyz">Wind</a>"#;
        let base = Url::parse("https://html.duckduckgo.com/html/").unwrap();
        let links = extract_result_links(html, &base, 5).unwrap();
        assert_eq!(links, vec!["https://example.org/wind?a=1".to_string()]);
    }

    #[test]
    fn test_page_without_results_is_empty() {
        let links = extract_result_links("<html><body>captcha</body></html>", &google(), 1).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_results_page_keeps_configured_path() {
        let ddg = Url::parse("https://html.duckduckgo.com/html/").unwrap();
        let url = results_page(&ddg, "grid storage tutorial", 3, "en");
        assert_eq!(url.path(), "/html/");
        assert!(url.as_str().contains("q=grid+storage+tutorial"));

        let google = Url::parse("https://www.google.com/search").unwrap();
        let url = results_page(&google, "kinematics", 3, "de");
        assert_eq!(
            url.as_str(),
            "https://www.google.com/search?q=kinematics&num=3&hl=de"
        );
    }

    #[test]
    fn test_engine_domain() {
        assert_eq!(engine_domain(&google()), "google.com");
        assert_eq!(
            engine_domain(&Url::parse("http://localhost:8080").unwrap()),
            "localhost"
        );
    }
}
