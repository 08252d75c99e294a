use chrono::{DateTime, Utc};
use serde::Serialize;

/// Full details of a single match page.
///
/// Most fields are optional: scheduled, live, finished and deleted
/// matches expose different subsets of the page, and a missing section
/// yields `None` rather than an error.
#[derive(Debug, Clone, Serialize)]
pub struct Match {
    pub title: String,
    pub date: DateTime<Utc>,
    pub format: Option<MatchFormat>,
    pub significance: Option<String>,
    pub status: MatchStatus,
    pub has_scorebot: bool,
    pub stats_id: Option<u32>,
    pub team1: Option<TeamRef>,
    pub team2: Option<TeamRef>,
    pub vetoes: Option<Vec<VetoEvent>>,
    pub event: EventRef,
    pub odds: Option<CommunityOdds>,
    pub maps: Option<Maps>,
    pub players: Option<MatchPlayers>,
    pub streams: Option<Vec<Stream>>,
    pub demo_url: Option<String>,
    pub winner_team: Option<TeamRef>,
}

/// Lifecycle state of a match, derived from the countdown indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum MatchStatus {
    Scheduled,
    #[strum(serialize = "LIVE")]
    Live,
    Postponed,
    Deleted,
    Over,
}

/// Match format, e.g. "Best of 3" played on "LAN".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchFormat {
    #[serde(rename = "type")]
    pub kind: String,
    pub location: Option<String>,
}

/// A team as referenced from a match page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamRef {
    pub name: String,
    pub id: u32,
}

/// The event (tournament) a match belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRef {
    pub name: String,
    pub id: u32,
}

/// One step of the pre-match map-selection process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VetoEvent {
    /// `None` for leftover maps, which no team actively chose.
    pub team: Option<String>,
    #[serde(rename = "type")]
    pub action: VetoAction,
    pub map: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VetoAction {
    Picked,
    Removed,
    Leftover,
}

/// Community win-probability poll, percentage strings per team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommunityOdds {
    pub provider: String,
    pub team1: String,
    pub team2: String,
}

/// The map list of a match.
///
/// Distinguishes "the schedule has not been announced yet" (panels
/// reading "TBA") from an actual list of maps; an absent field means
/// the page carried no map panels at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Maps {
    NotAnnounced,
    Played(Vec<MapResult>),
}

/// One map within a match, with its score and stats linkage when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapResult {
    pub name: String,
    pub result: Option<MapScore>,
    pub stats_id: Option<u32>,
    pub stats_url: Option<String>,
}

/// Round totals for one map. A side whose score cell shows the dash
/// placeholder is `None`, never zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapScore {
    pub team1_total_rounds: Option<u8>,
    pub team2_total_rounds: Option<u8>,
    pub half_results: Option<Vec<HalfResult>>,
}

/// Per-half round breakdown within one map (regular halves, then
/// overtime chunks in page order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HalfResult {
    pub team1_rounds: Option<u8>,
    pub team2_rounds: Option<u8>,
}

/// The current lineups shown on the match page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchPlayers {
    pub team1: Vec<PlayerRef>,
    pub team2: Vec<PlayerRef>,
}

/// A player as referenced from a match lineup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerRef {
    pub name: String,
    pub id: u32,
}

/// A live stream or broadcast feed for a match.
///
/// `viewers` is `-1` for feeds with no viewer counter (the built-in
/// live panel and GOTV); it is a sentinel, not a missing value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stream {
    pub name: String,
    pub link: String,
    pub viewers: i32,
}
