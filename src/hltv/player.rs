use scraper::{Html, Selector};
use tracing::{debug, instrument};

use crate::client::RequestConfig;
use crate::error::{HltvError, Result};
use crate::hltv::{self, text_content};
use crate::model::PlayerProfile;

#[instrument(skip(client, config))]
pub(crate) async fn get_player(
    client: &reqwest::Client,
    config: &RequestConfig,
    id: u32,
    slug: &str,
) -> Result<PlayerProfile> {
    let url = format!("{}/player/{id}/{slug}", hltv::BASE_URL);
    let document = hltv::get_document(client, config, &url).await?;
    let profile = parse_player(&document)?;
    debug!(id, nickname = %profile.nickname, "parsed player profile");
    Ok(profile)
}

/// Parse a player overview page. Unlike match pages, the identity
/// fields here are structural: their absence means the document is not
/// a player profile at all, so it is an error rather than a `None`.
pub(crate) fn parse_player(document: &Html) -> Result<PlayerProfile> {
    let root = document.root_element();

    let meta_selector = Selector::parse(r#"meta[property="og:url"]"#)?;
    let id = root
        .select(&meta_selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .and_then(|url| url.split('/').nth(4))
        .ok_or(HltvError::ElementNotFound {
            context: "profile url (meta og:url)",
        })?
        .parse()?;

    let nickname_selector = Selector::parse("h1.playerNickname")?;
    let nickname = root
        .select(&nickname_selector)
        .next()
        .map(|e| text_content(&e).trim().to_string())
        .ok_or(HltvError::ElementNotFound {
            context: "player nickname (h1.playerNickname)",
        })?;

    // shows a literal "-" for players who keep their name undisclosed
    let real_name_selector = Selector::parse("div.playerRealname")?;
    let real_name = root
        .select(&real_name_selector)
        .next()
        .map(|e| text_content(&e).trim().to_string())
        .ok_or(HltvError::ElementNotFound {
            context: "player real name (div.playerRealname)",
        })?;

    let team_selector = Selector::parse("div.playerTeam span.listRight")?;
    let team_cell = root
        .select(&team_selector)
        .next()
        .ok_or(HltvError::ElementNotFound {
            context: "player team (div.playerTeam span.listRight)",
        })?;
    let team_name = text_content(&team_cell).trim().to_string();

    let team_id = if team_name.eq_ignore_ascii_case("no team") {
        0
    } else {
        let link_selector = Selector::parse("a")?;
        team_cell
            .select(&link_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| href.split('/').nth(2))
            .ok_or(HltvError::ElementNotFound {
                context: "player team link (div.playerTeam a)",
            })?
            .parse()?
    };

    let benched = team_name.to_ascii_lowercase().contains("benched");

    let age_selector = Selector::parse("div.playerAge span.listRight")?;
    let age_cell = root
        .select(&age_selector)
        .next()
        .ok_or(HltvError::ElementNotFound {
            context: "player age (div.playerAge span.listRight)",
        })?;
    let age_text = text_content(&age_cell);
    // the first token is the age, or a placeholder for unknown ages
    let age = age_text
        .trim()
        .split_whitespace()
        .next()
        .and_then(|token| token.parse().ok());

    Ok(PlayerProfile {
        id,
        nickname,
        real_name,
        team_name,
        team_id,
        benched,
        age,
    })
}
