use tracing::instrument;

use crate::error::Result;
use crate::hltv;
use crate::model::*;

/// Static request configuration applied to every page fetch.
///
/// HLTV serves different markup (or a block page) depending on these
/// headers, so they are injected at construction rather than living as
/// module-level state.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub user_agent: String,
    pub referer: String,
    /// Value of the `hltvTimeZone` cookie; all timestamps on the page
    /// are rendered in this zone.
    pub timezone: String,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
            referer: "https://www.hltv.org/stats".to_string(),
            timezone: "Europe/Copenhagen".to_string(),
        }
    }
}

/// The main entry point for interacting with HLTV.org.
///
/// `HltvClient` wraps a [`reqwest::Client`] and exposes methods to
/// fetch match details and player profiles.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> hltv_scraper::Result<()> {
/// use hltv_scraper::HltvClient;
///
/// let client = HltvClient::new();
/// let details = client
///     .get_match(2346694, "mouz-vs-movistar-riders-v4-future-masters")
///     .await?;
/// println!("{}: {}", details.title, details.status);
/// # Ok(())
/// # }
/// ```
pub struct HltvClient {
    http: reqwest::Client,
    config: RequestConfig,
}

impl HltvClient {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        Self::with_config(RequestConfig::default())
    }

    /// Create a new client with the given request configuration.
    pub fn with_config(config: RequestConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Create a new client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure timeouts, proxies, etc.
    pub fn with_client(client: reqwest::Client, config: RequestConfig) -> Self {
        Self {
            http: client,
            config,
        }
    }

    /// Fetch full details for a match by id and URL slug
    /// (`/matches/<id>/<slug>`).
    #[instrument(skip(self))]
    pub async fn get_match(&self, match_id: u32, slug: &str) -> Result<Match> {
        hltv::match_detail::get_match(&self.http, &self.config, match_id, slug).await
    }

    /// Fetch a player profile by id and URL slug (`/player/<id>/<slug>`).
    #[instrument(skip(self))]
    pub async fn get_player(&self, player_id: u32, slug: &str) -> Result<PlayerProfile> {
        hltv::player::get_player(&self.http, &self.config, player_id, slug).await
    }
}

impl Default for HltvClient {
    fn default() -> Self {
        Self::new()
    }
}
