//! Configured news sources and the small URL helpers the pipeline uses.
//! Sources are static and defined in-process; the pipeline is written for N
//! of them even though the current list has one entry.

/// One news website with the CSS selectors used to pull titles and
/// summaries out of its front page.
#[derive(Debug, Clone)]
pub struct NewsSource {
    pub url: &'static str,
    pub title_selector: &'static str,
    pub summary_selector: &'static str,
}

pub fn default_sources() -> Vec<NewsSource> {
    vec![NewsSource {
        url: "https://www.timesnownews.com/",
        title_selector: ".news-title a",
        summary_selector: ".news-content p",
    }]
}

/// Host portion of a source URL with a leading `www.` removed, e.g.
/// `https://www.timesnownews.com/` -> `timesnownews.com`.
pub fn host_name(url: &str) -> String {
    let after_scheme = url.split("//").nth(1).unwrap_or(url);
    let host = after_scheme.split('/').next().unwrap_or(after_scheme);
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// Resolve a scraped link against its source URL.
///
/// Absolute links pass through untouched. Relative links are appended to
/// the source URL truncated to its last path segment. This is deliberately
/// simplified resolution: `../`, query strings, and protocol-relative
/// links are not handled, so emitted links stay byte-for-byte comparable
/// across runs.
pub fn resolve_link(base_url: &str, link: &str) -> String {
    if link.is_empty() || link.starts_with("http://") || link.starts_with("https://") {
        return link.to_string();
    }
    let mut base = base_url.to_string();
    if !base.ends_with('/') {
        match base.rfind('/') {
            Some(i) => base.truncate(i + 1),
            None => base = "/".to_string(),
        }
    }
    format!("{}{}", base, link.trim_start_matches('/'))
}
