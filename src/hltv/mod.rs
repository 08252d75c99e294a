pub(crate) mod match_detail;
pub(crate) mod player;

pub(crate) use ::scraper::Html;
use ::scraper::{ElementRef, Selector};
use tracing::debug;

use crate::client::RequestConfig;
use crate::error::{HltvError, Result};

pub(crate) const BASE_URL: &str = "https://www.hltv.org";

/// Fetch a URL with the configured browser-like headers and parse the
/// response body as an HTML document.
pub(crate) async fn get_document(
    client: &reqwest::Client,
    config: &RequestConfig,
    url: &str,
) -> Result<Html> {
    debug!(url, "fetching page");

    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, config.user_agent.as_str())
        .header(reqwest::header::REFERER, config.referer.as_str())
        .header(
            reqwest::header::COOKIE,
            format!("hltvTimeZone={}", config.timezone),
        )
        .send()
        .await
        .map_err(|e| HltvError::Http {
            url: url.to_owned(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(HltvError::UnexpectedStatus {
            url: url.to_owned(),
            status,
        });
    }

    let body = response.text().await.map_err(|e| HltvError::ResponseBody {
        url: url.to_owned(),
        source: e,
    })?;

    Ok(Html::parse_document(&body))
}

/// Extract trimmed text content from the first element matching `selector`
/// inside `element`. Returns an empty string if nothing matches.
pub(crate) fn select_text(element: &ElementRef, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .and_then(|d| d.text().map(|t| t.trim()).find(|t| !t.is_empty()))
        .unwrap_or_default()
        .trim()
        .replace(['\n', '\t'], "")
        .to_string()
}

/// All text content of `element`, concatenated as-is. Keeps newlines,
/// which the veto parsers rely on for line structure.
pub(crate) fn text_content(element: &ElementRef) -> String {
    element.text().collect()
}

/// Normalize a site-relative path to an absolute HLTV URL.
pub(crate) fn absolute_url(path: &str) -> String {
    if path.starts_with('/') {
        format!("{BASE_URL}{path}")
    } else {
        path.to_string()
    }
}
