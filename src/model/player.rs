use serde::Serialize;

/// Profile data from a player overview page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerProfile {
    pub id: u32,
    pub nickname: String,
    /// The page shows a literal "-" for players who do not disclose
    /// their real name; that sentinel is passed through as-is.
    pub real_name: String,
    pub team_name: String,
    /// `0` when the player is not affiliated with any team.
    pub team_id: u32,
    pub benched: bool,
    pub age: Option<u8>,
}
