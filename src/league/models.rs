use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key under which a `2sets-tb` match records its deciding tiebreaker.
pub const TIEBREAK_KEY: &str = "tb";

/// Sports a league can be played in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sport {
    Tennis,
    Badminton,
    Pickleball,
}

impl Sport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Tennis => "Tennis",
            Sport::Badminton => "Badminton",
            Sport::Pickleball => "Pickleball",
        }
    }

    pub fn parse(s: &str) -> Option<Sport> {
        match s {
            "Tennis" => Some(Sport::Tennis),
            "Badminton" => Some(Sport::Badminton),
            "Pickleball" => Some(Sport::Pickleball),
            _ => None,
        }
    }
}

/// How a tennis match is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TennisFormat {
    /// Best of three full sets
    #[serde(rename = "3sets")]
    ThreeSets,
    /// Two sets, decided by a tiebreaker stored under `"tb"`
    #[serde(rename = "2sets-tb")]
    TwoSetsTiebreak,
}

impl TennisFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TennisFormat::ThreeSets => "3sets",
            TennisFormat::TwoSetsTiebreak => "2sets-tb",
        }
    }

    pub fn parse(s: &str) -> Option<TennisFormat> {
        match s {
            "3sets" => Some(TennisFormat::ThreeSets),
            "2sets-tb" => Some(TennisFormat::TwoSetsTiebreak),
            _ => None,
        }
    }
}

/// Parsed form of a key in a match's `scores` map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetId {
    /// Ordinal set number ("1", "2", "3")
    Ordinal(u32),
    /// The `"tb"` tiebreaker slot
    Tiebreak,
    /// Anything else the client sent; scored as a normal set
    Other(String),
}

impl SetId {
    pub fn from_key(key: &str) -> SetId {
        if key == TIEBREAK_KEY {
            return SetId::Tiebreak;
        }
        match key.trim().parse::<u32>() {
            Ok(n) => SetId::Ordinal(n),
            Err(_) => SetId::Other(key.to_string()),
        }
    }
}

/// One side's raw value for a set, as the client submitted it.
///
/// Form inputs arrive as numbers or strings (and sometimes neither), so every shape is
/// accepted and converted to a game count on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreCell {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl ScoreCell {
    /// Whole games recorded in this cell. Anything that isn't a finite, positive number
    /// counts as 0; fractions are truncated.
    pub fn games(&self) -> u32 {
        let value = match self {
            ScoreCell::Number(n) => *n,
            ScoreCell::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            ScoreCell::Other(_) => 0.0,
        };
        if value.is_finite() && value > 0.0 {
            // `as` saturates at u32::MAX
            value.trunc() as u32
        } else {
            0
        }
    }
}

impl From<u32> for ScoreCell {
    fn from(games: u32) -> Self {
        ScoreCell::Number(games as f64)
    }
}

/// Both sides' values for one set. Either cell may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player1: Option<ScoreCell>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player2: Option<ScoreCell>,
}

impl SetScore {
    pub fn new(player1: u32, player2: u32) -> Self {
        SetScore {
            player1: Some(player1.into()),
            player2: Some(player2.into()),
        }
    }

    pub fn player1_games(&self) -> u32 {
        self.player1.as_ref().map(ScoreCell::games).unwrap_or(0)
    }

    pub fn player2_games(&self) -> u32 {
        self.player2.as_ref().map(ScoreCell::games).unwrap_or(0)
    }
}

/// A completed match between two players of one league
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    /// Store row id; absent until persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,
    /// Empty when the client left it out; rejected by `validate_match`
    #[serde(default)]
    pub player1: String,
    #[serde(default)]
    pub player2: String,
    pub sport: Sport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tennis_format: Option<TennisFormat>,
    /// Set key ("1", "2", "3", "tb") → both sides' values
    #[serde(default)]
    pub scores: BTreeMap<String, SetScore>,
    pub date: NaiveDate,
    /// Server time the score was submitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl MatchRecord {
    /// Whether the `"tb"` key is scored with tiebreaker rules for this match.
    /// The format only means something for tennis.
    pub fn uses_tiebreak(&self) -> bool {
        self.sport == Sport::Tennis && self.tennis_format == Some(TennisFormat::TwoSetsTiebreak)
    }
}

/// One member of a league roster, as shown on the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
}

impl RosterEntry {
    pub fn new(name: impl Into<String>) -> Self {
        RosterEntry { name: name.into() }
    }
}

/// A signed-up user, identified by phone number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    /// Name under which the user appears in league rosters and match records
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
