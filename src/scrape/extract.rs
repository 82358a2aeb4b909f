//! HTML extraction: select title and summary candidates with the source's
//! CSS selectors and pair them by index. Pairing is positional, not
//! DOM-structural; on an irregular page the i-th summary may belong to a
//! different article than the i-th title. That is a known simplification.

use anyhow::{anyhow, Result};
use once_cell::sync::OnceCell;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use super::sources::{resolve_link, NewsSource};

/// Cap on articles taken from any single source.
pub const MAX_PER_SOURCE: usize = 5;
/// Summaries longer than this are cut and marked with an ellipsis.
pub const SUMMARY_MAX_CHARS: usize = 200;

/// Title/link/summary as pulled from the page, before relevance filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct RawArticle {
    pub title: String,
    pub link: String,
    pub summary: String,
}

/// Extract up to [`MAX_PER_SOURCE`] articles from one fetched page.
/// A failure on one candidate pair skips only that pair.
pub fn extract_articles(html: &str, source: &NewsSource) -> Result<Vec<RawArticle>> {
    let doc = Html::parse_document(html);
    let title_sel = parse_selector(source.title_selector)?;
    let summary_sel = parse_selector(source.summary_selector)?;

    let titles: Vec<ElementRef> = doc.select(&title_sel).collect();
    let summaries: Vec<ElementRef> = doc.select(&summary_sel).collect();

    let mut out = Vec::new();
    for i in 0..titles.len().min(MAX_PER_SOURCE) {
        match extract_one(titles[i], summaries.get(i).copied(), source) {
            Ok(article) => out.push(article),
            Err(e) => {
                warn!(url = source.url, index = i, error = ?e, "skipping article");
            }
        }
    }
    Ok(out)
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("invalid selector {selector:?}: {e}"))
}

fn extract_one(
    title_el: ElementRef<'_>,
    summary_el: Option<ElementRef<'_>>,
    source: &NewsSource,
) -> Result<RawArticle> {
    let title = element_text(title_el);
    let href = title_el.value().attr("href").unwrap_or("");
    let link = resolve_link(source.url, href);

    let summary = summary_el
        .map(|el| truncate_summary(&element_text(el)))
        .unwrap_or_default();

    Ok(RawArticle { title, link, summary })
}

/// Concatenated text of an element with whitespace collapsed and trimmed.
fn element_text(el: ElementRef<'_>) -> String {
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    let joined: String = el.text().collect();
    re_ws.replace_all(joined.trim(), " ").to_string()
}

fn truncate_summary(text: &str) -> String {
    if text.chars().count() > SUMMARY_MAX_CHARS {
        let mut cut: String = text.chars().take(SUMMARY_MAX_CHARS).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> NewsSource {
        NewsSource {
            url: "https://www.example.com/",
            title_selector: ".news-title a",
            summary_selector: ".news-content p",
        }
    }

    fn page(n_titles: usize, n_summaries: usize) -> String {
        let mut html = String::from("<html><body>");
        for i in 0..n_titles {
            html.push_str(&format!(
                r#"<h3 class="news-title"><a href="/story-{i}">Headline {i}</a></h3>"#
            ));
        }
        for i in 0..n_summaries {
            html.push_str(&format!(
                r#"<div class="news-content"><p>Summary {i}</p></div>"#
            ));
        }
        html.push_str("</body></html>");
        html
    }

    #[test]
    fn at_most_five_articles_per_source() {
        let articles = extract_articles(&page(8, 8), &source()).unwrap();
        assert_eq!(articles.len(), MAX_PER_SOURCE);
        assert_eq!(articles[0].title, "Headline 0");
        assert_eq!(articles[4].title, "Headline 4");
    }

    #[test]
    fn titles_without_matching_summary_get_an_empty_one() {
        let articles = extract_articles(&page(3, 1), &source()).unwrap();
        assert_eq!(articles.len(), 3);
        assert_eq!(articles[0].summary, "Summary 0");
        assert_eq!(articles[1].summary, "");
        assert_eq!(articles[2].summary, "");
    }

    #[test]
    fn relative_links_resolve_against_the_source() {
        let articles = extract_articles(&page(1, 1), &source()).unwrap();
        assert_eq!(articles[0].link, "https://www.example.com/story-0");
    }

    #[test]
    fn long_summaries_are_cut_at_200_chars_with_ellipsis() {
        let long = "x".repeat(250);
        let html = format!(
            r#"<h3 class="news-title"><a href="/a">T</a></h3>
               <div class="news-content"><p>{long}</p></div>"#
        );
        let articles = extract_articles(&html, &source()).unwrap();
        assert_eq!(articles[0].summary.len(), SUMMARY_MAX_CHARS + 3);
        assert!(articles[0].summary.ends_with("..."));
    }

    #[test]
    fn summary_at_exactly_200_chars_is_untouched() {
        let exact = "y".repeat(SUMMARY_MAX_CHARS);
        let html = format!(
            r#"<h3 class="news-title"><a href="/a">T</a></h3>
               <div class="news-content"><p>{exact}</p></div>"#
        );
        let articles = extract_articles(&html, &source()).unwrap();
        assert_eq!(articles[0].summary, exact);
    }

    #[test]
    fn nested_markup_text_is_collapsed() {
        let html = r#"<h3 class="news-title"><a href="/a">  Spaced
               <b>headline</b>  here </a></h3>"#;
        let articles = extract_articles(html, &source()).unwrap();
        assert_eq!(articles[0].title, "Spaced headline here");
    }

    #[test]
    fn bad_selector_is_an_error() {
        let bad = NewsSource {
            url: "https://www.example.com/",
            title_selector: ":::nope",
            summary_selector: "p",
        };
        assert!(extract_articles("<html></html>", &bad).is_err());
    }

    #[test]
    fn empty_title_text_flows_through() {
        // No title validation: an element with no text still yields an
        // article, with its link and position intact.
        let html = r#"<h3 class="news-title"><a href="/a"></a></h3>
                      <h3 class="news-title"><a href="/b">Real story</a></h3>"#;
        let articles = extract_articles(html, &source()).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "");
        assert_eq!(articles[0].link, "https://www.example.com/a");
        assert_eq!(articles[1].title, "Real story");
    }
}
