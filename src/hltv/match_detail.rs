use chrono::{DateTime, Utc};
use itertools::Itertools;
use scraper::{CaseSensitivity, ElementRef, Html, Selector};
use tracing::{debug, instrument};

use crate::client::RequestConfig;
use crate::error::{HltvError, Result};
use crate::hltv::{self, absolute_url, select_text, text_content};
use crate::model::{
    CommunityOdds, EventRef, HalfResult, MapResult, MapScore, Maps, Match, MatchFormat,
    MatchPlayers, MatchStatus, PlayerRef, Stream, TeamRef, VetoAction, VetoEvent,
};

#[instrument(skip(client, config))]
pub(crate) async fn get_match(
    client: &reqwest::Client,
    config: &RequestConfig,
    id: u32,
    slug: &str,
) -> Result<Match> {
    let url = format!("{}/matches/{id}/{slug}", hltv::BASE_URL);
    let document = hltv::get_document(client, config, &url).await?;
    let result = parse_match(&document)?;
    debug!(id, status = %result.status, "parsed match detail");
    Ok(result)
}

pub(crate) fn parse_match(document: &Html) -> Result<Match> {
    let root = document.root_element();

    let team1 = parse_team(&root, 1)?;
    let team2 = parse_team(&root, 2)?;
    let winner_team = parse_winner(&root, &team1, &team2)?;

    Ok(Match {
        title: parse_title(&root)?,
        date: parse_date(&root)?,
        format: parse_format(&root)?,
        significance: parse_significance(&root)?,
        status: parse_status(&root)?,
        has_scorebot: parse_has_scorebot(&root)?,
        stats_id: parse_stats_id(&root)?,
        team1,
        team2,
        vetoes: parse_vetoes(&root)?,
        event: parse_event(&root)?,
        odds: parse_community_odds(&root)?,
        maps: parse_maps(&root)?,
        players: parse_players(&root)?,
        streams: parse_streams(&root)?,
        demo_url: parse_demo_url(&root)?,
        winner_team,
    })
}

fn parse_title(root: &ElementRef) -> Result<String> {
    let panel_selector = Selector::parse("div.timeAndEvent")?;
    let panel = root
        .select(&panel_selector)
        .next()
        .ok_or(HltvError::ElementNotFound {
            context: "time and event panel (div.timeAndEvent)",
        })?;
    Ok(panel
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .join(" "))
}

fn parse_date(root: &ElementRef) -> Result<DateTime<Utc>> {
    let date_selector = Selector::parse("div.timeAndEvent div.date")?;
    let millis = root
        .select(&date_selector)
        .next()
        .and_then(|e| e.value().attr("data-unix"))
        .ok_or(HltvError::ElementNotFound {
            context: "match date (div.date[data-unix])",
        })?;
    let millis: i64 = millis.parse()?;
    DateTime::from_timestamp_millis(millis).ok_or(HltvError::InvalidTimestamp(millis))
}

fn parse_format(root: &ElementRef) -> Result<Option<MatchFormat>> {
    let block_selector = Selector::parse("div.preformatted-text")?;
    let Some(block) = root.select(&block_selector).next() else {
        return Ok(None);
    };
    let text = text_content(&block);
    let first_line = text.lines().next().unwrap_or_default().trim();
    let format = match first_line.split_once(" (") {
        Some((kind, rest)) => {
            // the location keeps its closing parenthesis; drop it
            let mut location = rest.to_string();
            location.pop();
            MatchFormat {
                kind: kind.to_string(),
                location: Some(location),
            }
        }
        None => MatchFormat {
            kind: first_line.to_string(),
            location: None,
        },
    };
    Ok(Some(format))
}

fn parse_significance(root: &ElementRef) -> Result<Option<String>> {
    let block_selector = Selector::parse("div.preformatted-text")?;
    let Some(block) = root.select(&block_selector).next() else {
        return Ok(None);
    };
    let text = text_content(&block);
    let last_line = text.lines().last().unwrap_or_default();
    // the line starts with a single marker character, e.g. "*"
    let mut chars = last_line.chars();
    chars.next();
    Ok(Some(chars.as_str().trim().to_string()))
}

fn parse_status(root: &ElementRef) -> Result<MatchStatus> {
    let countdown_selector = Selector::parse("div.countdown")?;
    let indicator = root
        .select(&countdown_selector)
        .next()
        .ok_or(HltvError::ElementNotFound {
            context: "status indicator (div.countdown)",
        })?;
    Ok(status_from_indicator(&text_content(&indicator)))
}

/// Map the countdown indicator text to a match status. Scheduled
/// matches show a running countdown instead of parsable text, so
/// anything unrecognized falls back to [`MatchStatus::Scheduled`].
fn status_from_indicator(text: &str) -> MatchStatus {
    let normalized = text.split_whitespace().join(" ").to_ascii_lowercase();
    match normalized.as_str() {
        "live" => MatchStatus::Live,
        "match postponed" => MatchStatus::Postponed,
        "match deleted" => MatchStatus::Deleted,
        "match over" => MatchStatus::Over,
        _ => MatchStatus::Scheduled,
    }
}

fn parse_has_scorebot(root: &ElementRef) -> Result<bool> {
    let scorebot_selector = Selector::parse("div#scoreboardElement")?;
    Ok(root.select(&scorebot_selector).next().is_some())
}

fn parse_stats_id(root: &ElementRef) -> Result<Option<u32>> {
    let link_selector = Selector::parse("div.stats-detailed-stats a")?;
    Ok(root
        .select(&link_selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        // a mapstats link points at a single map, not the match
        .filter(|href| !href.contains("mapstats"))
        .and_then(|href| href.split('/').nth(3))
        .and_then(|id| id.parse().ok()))
}

fn parse_team(root: &ElementRef, index: u8) -> Result<Option<TeamRef>> {
    let panel_class = format!("div.team{index}-gradient");
    let panel_selector = Selector::parse(&panel_class)?;
    let Some(panel) = root.select(&panel_selector).next() else {
        return Ok(None);
    };
    if text_content(&panel).trim().is_empty() {
        return Ok(None);
    }

    let name_selector = Selector::parse("div.teamName")?;
    let name = select_text(&panel, &name_selector);

    // Both teams' ids are read from the team-1 panel link; the origin
    // markup mirrors the same link target for both panels.
    let id_selector = Selector::parse("div.team1-gradient a")?;
    let id = root
        .select(&id_selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| href.split('/').nth(2))
        .and_then(|id| id.parse().ok())
        .unwrap_or_default();

    Ok(Some(TeamRef { name, id }))
}

fn parse_vetoes(root: &ElementRef) -> Result<Option<Vec<VetoEvent>>> {
    let box_selector = Selector::parse("div.veto-box")?;
    let boxes = root.select(&box_selector).collect_vec();

    let mut vetoes = Vec::new();
    // the format block carries the veto-box class too, so the new
    // layout only exists when more than one box is present
    if boxes.len() > 1 {
        if let Some(last) = boxes.last() {
            vetoes.extend(parse_vetoes_new(last)?);
        }
    }
    if let Some(first) = boxes.first() {
        vetoes.extend(parse_vetoes_old(first));
    }

    Ok(if vetoes.is_empty() {
        None
    } else {
        Some(vetoes)
    })
}

/// Current veto markup: one line per step inside the last veto panel.
fn parse_vetoes_new(veto_box: &ElementRef) -> Result<Vec<VetoEvent>> {
    let line_selector = Selector::parse("div.padding div")?;
    Ok(veto_box
        .select(&line_selector)
        .filter_map(|line| {
            let text = text_content(&line);
            // strip the leading "N. " index marker
            let line = text.trim().get(3..).unwrap_or_default();
            parse_veto_line(line)
        })
        .collect_vec())
}

/// Parse one new-layout veto line: "<team> removed <map>",
/// "<team> picked <map>" or "<map> was left over". The split happens
/// at the first occurrence of either keyword so that team names
/// containing spaces (e.g. "MAD Lions") survive. Lines matching
/// neither shape are dropped.
fn parse_veto_line(line: &str) -> Option<VetoEvent> {
    let keyword = match (line.find("removed"), line.find("picked")) {
        (Some(r), Some(p)) if p < r => Some((p, "picked")),
        (Some(r), _) => Some((r, "removed")),
        (None, Some(p)) => Some((p, "picked")),
        (None, None) => None,
    };

    let Some((index, word)) = keyword else {
        return leftover_veto(line);
    };

    let action = if line.contains("picked") {
        VetoAction::Picked
    } else {
        VetoAction::Removed
    };
    Some(VetoEvent {
        team: Some(line[..index].trim().to_string()),
        action,
        map: line[index + word.len()..].trim().to_string(),
    })
}

fn leftover_veto(line: &str) -> Option<VetoEvent> {
    if !line.ends_with("was left over") {
        return None;
    }
    Some(VetoEvent {
        team: None,
        action: VetoAction::Leftover,
        map: line.split(' ').next().unwrap_or_default().to_string(),
    })
}

/// Historical veto markup: a plain text list after a "Veto process"
/// heading inside the first veto panel, one whitespace-separated
/// team/action/map triple per line. Team names with spaces are not
/// representable in this layout.
fn parse_vetoes_old(veto_box: &ElementRef) -> Vec<VetoEvent> {
    let text = text_content(veto_box);
    let lines = text.split('\n').collect_vec();
    let Some(heading) = lines.iter().rposition(|line| line.contains("Veto process")) else {
        return Vec::new();
    };
    // skip the heading and its following blank line; the final line of
    // the panel is not part of the list
    let end = lines.len().saturating_sub(1);
    let Some(list) = lines.get(heading + 2..end) else {
        return Vec::new();
    };

    list.iter()
        .filter_map(|line| {
            let veto = line.get(3..).unwrap_or_default();
            if let Some(event) = leftover_veto(veto) {
                return Some(event);
            }
            let mut tokens = veto.split(' ');
            let team = tokens.next()?.to_string();
            let action = match tokens.next()? {
                "picked" => VetoAction::Picked,
                "removed" => VetoAction::Removed,
                _ => return None,
            };
            let map = tokens.next()?.to_string();
            Some(VetoEvent {
                team: Some(team),
                action,
                map,
            })
        })
        .collect_vec()
}

fn parse_event(root: &ElementRef) -> Result<EventRef> {
    let link_selector = Selector::parse("div.timeAndEvent a, div.event a")?;
    let link = root
        .select(&link_selector)
        .next()
        .ok_or(HltvError::ElementNotFound {
            context: "event link (div.timeAndEvent a)",
        })?;
    let name = text_content(&link).trim().to_string();
    let id = link
        .value()
        .attr("href")
        .and_then(|href| href.split('/').nth(2))
        .and_then(|id| id.parse().ok())
        .unwrap_or_default();
    Ok(EventRef { name, id })
}

fn parse_community_odds(root: &ElementRef) -> Result<Option<CommunityOdds>> {
    let panel_selector = Selector::parse("div.pick-a-winner")?;
    let Some(panel) = root.select(&panel_selector).next() else {
        return Ok(None);
    };
    let team1_selector = Selector::parse("div.team1 div.percentage")?;
    let team2_selector = Selector::parse("div.team2 div.percentage")?;
    Ok(Some(CommunityOdds {
        provider: "community".to_string(),
        team1: select_text(&panel, &team1_selector).replace('%', ""),
        team2: select_text(&panel, &team2_selector).replace('%', ""),
    }))
}

fn parse_maps(root: &ElementRef) -> Result<Option<Maps>> {
    let holder_selector = Selector::parse("div.mapholder")?;
    let name_selector = Selector::parse("div.mapname")?;
    let holders = root.select(&holder_selector).collect_vec();
    if holders.is_empty() {
        return Ok(None);
    }

    let mut maps = Vec::new();
    for holder in holders {
        let name = select_text(&holder, &name_selector);
        // placeholder panels mean the whole schedule is unannounced
        if name == "TBA" {
            return Ok(Some(Maps::NotAnnounced));
        }
        maps.push(parse_map(&holder, name)?);
    }
    Ok(Some(Maps::Played(maps)))
}

fn parse_map(holder: &ElementRef, name: String) -> Result<MapResult> {
    let left_selector = Selector::parse("div.results-left div.results-team-score")?;
    let right_selector = Selector::parse("span.results-right div.results-team-score")?;
    let (Some(left), Some(right)) = (
        holder.select(&left_selector).next(),
        holder.select(&right_selector).next(),
    ) else {
        // upcoming map, no scores on the page yet
        return Ok(MapResult {
            name,
            result: None,
            stats_id: None,
            stats_url: None,
        });
    };

    let team1_total_rounds = score_value(&text_content(&left));
    let team2_total_rounds = score_value(&text_content(&right));

    let half_selector = Selector::parse("div.results-center-half-score")?;
    let half_results = holder
        .select(&half_selector)
        .next()
        .map(|e| parse_half_results(&text_content(&e)));

    // stats links only exist once a map has finished
    let stats_selector = Selector::parse("a.results-stats")?;
    let stats_href = holder
        .select(&stats_selector)
        .next()
        .and_then(|a| a.value().attr("href"));
    let stats_id = stats_href
        .and_then(|href| href.split('/').nth(4))
        .and_then(|id| id.parse().ok());
    let stats_url = stats_href.map(absolute_url);

    let result = match (team1_total_rounds, team2_total_rounds, half_results) {
        // both totals indeterminate and no half breakdown: emitting a
        // result object would be vacuous
        (None, None, None) => None,
        (team1, team2, halves) => Some(MapScore {
            team1_total_rounds: team1,
            team2_total_rounds: team2,
            half_results: halves,
        }),
    };

    Ok(MapResult {
        name,
        result,
        stats_id,
        stats_url,
    })
}

/// Half scores come as "(9:6) (5:9) (2:0)", optionally with ";"
/// separators; overtime chunks follow the regular halves in order.
fn parse_half_results(raw: &str) -> Vec<HalfResult> {
    let cleaned = raw.trim().replace([';', '(', ')'], "");
    cleaned
        .split_whitespace()
        .map(|half| {
            let (team1, team2) = half.split_once(':').unwrap_or((half, "-"));
            HalfResult {
                team1_rounds: score_value(team1),
                team2_rounds: score_value(team2),
            }
        })
        .collect_vec()
}

/// A score cell showing the dash placeholder carries no data; that is
/// distinct from zero rounds won.
fn score_value(text: &str) -> Option<u8> {
    let text = text.trim();
    if text == "-" {
        None
    } else {
        text.parse().ok()
    }
}

fn parse_players(root: &ElementRef) -> Result<Option<MatchPlayers>> {
    let table_selector = Selector::parse("div.players")?;
    let tables = root.select(&table_selector).collect_vec();
    if tables.is_empty() {
        return Ok(None);
    }
    let team1 = tables
        .first()
        .map(parse_lineup)
        .transpose()?
        .unwrap_or_default();
    let team2 = tables
        .get(1)
        .map(parse_lineup)
        .transpose()?
        .unwrap_or_default();
    Ok(Some(MatchPlayers { team1, team2 }))
}

fn parse_lineup(table: &ElementRef) -> Result<Vec<PlayerRef>> {
    let row_selector = Selector::parse("tr")?;
    let cell_selector = Selector::parse("div.flagAlign")?;
    let name_selector = Selector::parse("div.text-ellipsis")?;
    // the last row is the most current lineup
    let Some(row) = table.select(&row_selector).last() else {
        return Ok(Vec::new());
    };
    Ok(row
        .select(&cell_selector)
        .map(|cell| {
            let name = select_text(&cell, &name_selector);
            let id = cell
                .value()
                .attr("data-player-id")
                .and_then(|id| id.parse().ok())
                .unwrap_or_default();
            PlayerRef { name, id }
        })
        .collect_vec())
}

fn parse_streams(root: &ElementRef) -> Result<Option<Vec<Stream>>> {
    let box_selector = Selector::parse("div.stream-box")?;
    let flag_selector = Selector::parse("img.stream-flag")?;
    let embed_selector = Selector::parse("div.stream-box-embed")?;
    let viewers_selector = Selector::parse("span.gtSmartphone-only")?;
    let link_selector = Selector::parse("a")?;

    let streams = root
        .select(&box_selector)
        .filter_map(|stream_box| {
            // embedded third-party stream with a viewer counter
            if stream_box.select(&flag_selector).next().is_some() {
                let embed = stream_box.select(&embed_selector).next()?;
                let name = text_content(&embed).trim().to_string();
                let link = embed
                    .value()
                    .attr("data-stream-embed")
                    .unwrap_or_default()
                    .to_string();
                let viewers = select_text(&stream_box, &viewers_selector).parse().ok()?;
                return Some(Stream {
                    name,
                    link,
                    viewers,
                });
            }
            // built-in live scoreboard panel
            if stream_box
                .value()
                .has_class("hltv-live", CaseSensitivity::CaseSensitive)
            {
                let link = stream_box
                    .select(&link_selector)
                    .next()
                    .and_then(|a| a.value().attr("href"))
                    .map(absolute_url)
                    .unwrap_or_default();
                return Some(Stream {
                    name: "HLTV Live".to_string(),
                    link,
                    viewers: -1,
                });
            }
            // GOTV panel, the connect address is quoted inside the text
            if stream_box
                .value()
                .has_class("gotv", CaseSensitivity::CaseSensitive)
            {
                let text = text_content(&stream_box);
                let link = text.split('"').nth(1).unwrap_or_default().to_string();
                return Some(Stream {
                    name: "GOTV".to_string(),
                    link,
                    viewers: -1,
                });
            }
            None
        })
        .collect_vec();

    Ok(if streams.is_empty() {
        None
    } else {
        Some(streams)
    })
}

fn parse_demo_url(root: &ElementRef) -> Result<Option<String>> {
    let box_selector = Selector::parse("div.stream-box")?;
    let link_selector = Selector::parse("a")?;
    let Some(first) = root.select(&box_selector).next() else {
        return Ok(None);
    };
    if text_content(&first).trim() != "GOTV Demo" {
        return Ok(None);
    }
    Ok(first
        .select(&link_selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(absolute_url))
}

fn parse_winner(
    root: &ElementRef,
    team1: &Option<TeamRef>,
    team2: &Option<TeamRef>,
) -> Result<Option<TeamRef>> {
    let (Some(team1), Some(team2)) = (team1, team2) else {
        return Ok(None);
    };
    let won1_selector = Selector::parse("div.team1-gradient div.won")?;
    let won2_selector = Selector::parse("div.team2-gradient div.won")?;
    let team1_won = root.select(&won1_selector).next().is_some();
    let team2_won = root.select(&won2_selector).next().is_some();
    Ok(match (team1_won, team2_won) {
        (true, false) => Some(team1.clone()),
        (false, true) => Some(team2.clone()),
        _ => None,
    })
}
