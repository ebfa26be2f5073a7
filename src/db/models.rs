use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::league::{RosterEntry, User};

/// A user's membership in one league
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueMember {
    pub league: String,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub joined_at: DateTime<Utc>,
}

impl LeagueMember {
    pub fn user(&self) -> User {
        User {
            phone: self.phone.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }

    /// How the member is listed on the league leaderboard
    pub fn roster_entry(&self) -> RosterEntry {
        RosterEntry::new(self.user().display_name())
    }
}

/// Result of asking to join a league
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Phone was not in the league yet
    Added,
    /// Phone was already a member; stored names were refreshed
    Updated,
}
