use serde::{Deserialize, Serialize};

pub mod models;
pub use models::*;

/// Leagues offered for one sport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueGroup {
    pub sport: Sport,
    pub leagues: Vec<String>,
}

const CATALOG: &[(Sport, &[&str])] = &[
    (
        Sport::Tennis,
        &["Arbors Tennis League", "Gateway Tennis League"],
    ),
    (Sport::Badminton, &["Stratford Badminton League"]),
    (Sport::Pickleball, &["Monroe Manor Pickleball League"]),
];

/// All leagues players can join, grouped by sport
pub fn catalog() -> Vec<LeagueGroup> {
    CATALOG
        .iter()
        .map(|(sport, leagues)| LeagueGroup {
            sport: *sport,
            leagues: leagues.iter().map(|l| l.to_string()).collect(),
        })
        .collect()
}

/// Look up the sport a catalog league is played in
pub fn sport_of(league: &str) -> Option<Sport> {
    CATALOG
        .iter()
        .find(|(_, leagues)| leagues.contains(&league))
        .map(|(sport, _)| *sport)
}

/// Canonical form used to match roster names against match player names:
/// surrounding whitespace dropped, inner runs collapsed to one space. Case is kept.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}
