//! Candidate link extraction from HTML pages.

use scraper::{Html, Selector};
use scout_utils::{ScoutError, ScoutResult, SourcesConfig};
use std::collections::{HashMap, HashSet};
use tracing::debug;
use url::Url;

/// Every `a[href]` in document order, resolved against `base` and with
/// search-engine redirect wrappers removed.
pub fn extract_links(html: &str, base: &Url) -> ScoutResult<Vec<Url>> {
    let selector = Selector::parse("a[href]")
        .map_err(|e| ScoutError::internal(format!("invalid link selector: {:?}", e)))?;
    let document = Html::parse_document(html);

    Ok(document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| base.join(href.trim()).ok())
        .map(unwrap_redirect)
        .collect())
}

/// Search result pages link through redirectors such as
/// `//duckduckgo.com/l/?uddg=<target>` or `/url?q=<target>`.
pub fn unwrap_redirect(url: Url) -> Url {
    let target = url.query_pairs().find_map(|(key, value)| {
        let is_wrapper = key == "uddg" || (url.path() == "/url" && (key == "q" || key == "url"));
        is_wrapper.then(|| value.into_owned())
    });

    target
        .and_then(|t| Url::parse(&t).ok())
        .filter(is_http)
        .unwrap_or(url)
}

pub fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

pub fn has_pdf_path(url: &Url) -> bool {
    url.path().to_ascii_lowercase().ends_with(".pdf")
}

/// Host of a URL, for reporting which provider served a document.
pub fn provider(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// Applies skip words, de-duplication and visit caps to links in source order.
///
/// Counters live in this value, so limits apply to one request only.
pub struct CandidateFilter<'a> {
    config: &'a SourcesConfig,
    seen: HashSet<String>,
    domain_visits: HashMap<String, usize>,
}

impl<'a> CandidateFilter<'a> {
    pub fn new(config: &'a SourcesConfig) -> Self {
        Self {
            config,
            seen: HashSet::new(),
            domain_visits: HashMap::new(),
        }
    }

    pub fn select(mut self, links: Vec<Url>) -> Vec<Url> {
        let mut selected = Vec::new();

        for mut link in links {
            if selected.len() >= self.config.max_candidates {
                break;
            }
            link.set_fragment(None);
            if self.admit(&link) {
                selected.push(link);
            }
        }

        selected
    }

    fn admit(&mut self, link: &Url) -> bool {
        if !is_http(link) {
            return false;
        }
        let Some(host) = link.host_str().map(str::to_ascii_lowercase) else {
            return false;
        };

        let full = link.as_str().to_ascii_lowercase();
        if let Some(word) = self
            .config
            .skip_words
            .iter()
            .find(|w| host.contains(w.as_str()) || full.contains(w.as_str()))
        {
            debug!(url = %link, skip_word = %word, "Skipping link");
            return false;
        }

        if !self.seen.insert(link.as_str().to_string()) {
            return false;
        }

        let visits = self.domain_visits.entry(host).or_insert(0);
        if *visits >= self.config.max_domain_visits {
            debug!(url = %link, "Skipping link (domain visit limit reached)");
            return false;
        }
        *visits += 1;

        true
    }
}
