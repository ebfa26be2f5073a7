use std::collections::HashMap;

use super::scoring::{tally_match, Side};
use super::{InvalidMatchError, MatchResult, StandingsRow};
use crate::league::{normalize_name, MatchRecord, RosterEntry};

/// Standings for one league, recomputed from scratch on every call to
/// [`compute_standings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standings {
    rows: HashMap<String, StandingsRow>,
    /// Normalized roster names, duplicates dropped, in roster order
    roster: Vec<String>,
    /// Names seen in matches but missing from the roster, by first appearance
    unlisted: Vec<String>,
}

impl Standings {
    /// Row for `name` (normalized before lookup)
    pub fn row(&self, name: &str) -> Option<&StandingsRow> {
        self.rows.get(&normalize_name(name))
    }

    /// Number of players with a row, roster and unlisted alike
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Roster names ordered by points, highest first. Equal points keep roster order.
    pub fn ranking(&self) -> Vec<&str> {
        self.rank(self.roster.iter())
    }

    /// Like [`Standings::ranking`], with players that only appear in matches
    /// ranked alongside the roster.
    pub fn merged_ranking(&self) -> Vec<&str> {
        self.rank(self.roster.iter().chain(self.unlisted.iter()))
    }

    /// Ranked rows for the roster
    pub fn leaderboard(&self) -> Vec<StandingsRow> {
        self.ranking()
            .into_iter()
            .filter_map(|name| self.rows.get(name).cloned())
            .collect()
    }

    fn rank<'a>(&'a self, names: impl Iterator<Item = &'a String>) -> Vec<&'a str> {
        let mut ranked: Vec<&StandingsRow> =
            names.filter_map(|name| self.rows.get(name)).collect();
        // stable: ties stay in input order
        ranked.sort_by(|a, b| b.points.cmp(&a.points));
        ranked.into_iter().map(|row| row.name.as_str()).collect()
    }
}

/// Check that a match names two distinct players. Returns the normalized names.
pub fn validate_match(m: &MatchRecord) -> Result<(String, String), InvalidMatchError> {
    let player1 = normalize_name(&m.player1);
    let player2 = normalize_name(&m.player2);
    if player1.is_empty() {
        return Err(InvalidMatchError::MissingPlayer("player1"));
    }
    if player2.is_empty() {
        return Err(InvalidMatchError::MissingPlayer("player2"));
    }
    if player1 == player2 {
        return Err(InvalidMatchError::SamePlayer(player1));
    }
    Ok((player1, player2))
}

/// Compute standings for `roster` from `matches`, supplied most recent first.
///
/// Matches are replayed oldest to newest so each decided result is pushed onto the
/// front of the players' streaks, leaving the newest result first. Score cells that
/// can't be read count as 0; the only error is a match without two distinct players.
pub fn compute_standings(
    roster: &[RosterEntry],
    matches: &[MatchRecord],
) -> Result<Standings, InvalidMatchError> {
    let players = matches
        .iter()
        .map(validate_match)
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows: HashMap<String, StandingsRow> = HashMap::new();
    let mut roster_names = Vec::with_capacity(roster.len());
    for entry in roster {
        let name = normalize_name(&entry.name);
        if name.is_empty() || rows.contains_key(&name) {
            continue;
        }
        rows.insert(name.clone(), StandingsRow::new(name.clone()));
        roster_names.push(name);
    }

    let mut unlisted = Vec::new();
    for (player1, player2) in &players {
        for name in [player1, player2] {
            if !rows.contains_key(name) {
                rows.insert(name.clone(), StandingsRow::new(name.clone()));
                unlisted.push(name.clone());
            }
        }
    }

    for (m, (player1, player2)) in matches.iter().zip(&players).rev() {
        let tally = tally_match(m);

        for (name, points) in [
            (player1, tally.player1_points),
            (player2, tally.player2_points),
        ] {
            if let Some(row) = rows.get_mut(name) {
                row.points = row.points.saturating_add(points);
                row.matches_played += 1;
            }
        }

        let (winner, loser) = match tally.winner() {
            Some(Side::Player1) => (player1, player2),
            Some(Side::Player2) => (player2, player1),
            None => continue,
        };
        if let Some(row) = rows.get_mut(winner) {
            row.matches_won += 1;
            row.push_recent(MatchResult::Win);
        }
        if let Some(row) = rows.get_mut(loser) {
            row.matches_lost += 1;
            row.push_recent(MatchResult::Loss);
        }
    }

    Ok(Standings {
        rows,
        roster: roster_names,
        unlisted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::{SetScore, Sport, TennisFormat};
    use crate::standings::MatchResult::{Loss, Win};
    use crate::standings::RECENT_RESULTS_LIMIT;
    use chrono::NaiveDate;

    fn roster(names: &[&str]) -> Vec<RosterEntry> {
        names.iter().map(|n| RosterEntry::new(*n)).collect()
    }

    fn tennis(
        p1: &str,
        p2: &str,
        format: TennisFormat,
        sets: &[(&str, u32, u32)],
    ) -> MatchRecord {
        MatchRecord {
            id: None,
            league: Some("Arbors Tennis League".into()),
            player1: p1.into(),
            player2: p2.into(),
            sport: Sport::Tennis,
            tennis_format: Some(format),
            scores: sets
                .iter()
                .map(|(k, a, b)| (k.to_string(), SetScore::new(*a, *b)))
                .collect(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            recorded_at: None,
        }
    }

    /// Straight-sets win for `p1`
    fn win(p1: &str, p2: &str) -> MatchRecord {
        tennis(p1, p2, TennisFormat::ThreeSets, &[("1", 6, 0), ("2", 6, 0)])
    }

    #[test]
    fn test_three_set_example() {
        let matches = vec![tennis(
            "A",
            "B",
            TennisFormat::ThreeSets,
            &[("1", 6, 3), ("2", 4, 6), ("3", 6, 2)],
        )];
        let s = compute_standings(&roster(&["A", "B", "C"]), &matches).unwrap();

        let a = s.row("A").unwrap();
        assert_eq!(a.points, 16);
        assert_eq!(a.matches_played, 1);
        assert_eq!(a.matches_won, 1);
        assert_eq!(a.recent_results, vec![Win]);

        let b = s.row("B").unwrap();
        assert_eq!(b.points, 11);
        assert_eq!(b.matches_lost, 1);
        assert_eq!(b.recent_results, vec![Loss]);

        assert_eq!(s.row("C").unwrap(), &StandingsRow::new("C"));
        assert_eq!(s.ranking(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_two_sets_tiebreak_example() {
        let matches = vec![tennis(
            "A",
            "B",
            TennisFormat::TwoSetsTiebreak,
            &[("1", 6, 4), ("2", 3, 6), ("tb", 7, 5)],
        )];
        let s = compute_standings(&roster(&["A", "B"]), &matches).unwrap();
        assert_eq!(s.row("A").unwrap().points, 15);
        assert_eq!(s.row("B").unwrap().points, 10);
        assert_eq!(s.row("A").unwrap().matches_won, 1);
        assert_eq!(s.row("B").unwrap().matches_lost, 1);
    }

    #[test]
    fn test_undecided_match_adds_points_only() {
        let matches = vec![tennis(
            "A",
            "B",
            TennisFormat::ThreeSets,
            &[("1", 6, 4), ("2", 4, 6), ("3", 5, 5)],
        )];
        let s = compute_standings(&roster(&["A", "B"]), &matches).unwrap();
        for (name, points) in [("A", 15), ("B", 15)] {
            let row = s.row(name).unwrap();
            assert_eq!(row.points, points);
            assert_eq!(row.matches_played, 1);
            assert_eq!(row.matches_won, 0);
            assert_eq!(row.matches_lost, 0);
            assert!(row.recent_results.is_empty());
        }
    }

    #[test]
    fn test_match_without_scores_still_counts_as_played() {
        let matches = vec![tennis("A", "B", TennisFormat::ThreeSets, &[])];
        let s = compute_standings(&roster(&["A", "B"]), &matches).unwrap();
        let a = s.row("A").unwrap();
        assert_eq!(a.matches_played, 1);
        assert_eq!(a.points, 0);
        assert!(a.recent_results.is_empty());
    }

    #[test]
    fn test_recent_results_newest_first_and_bounded() {
        // most recent first: A lost the latest match, won the six before it
        let mut matches = vec![win("B", "A")];
        for _ in 0..6 {
            matches.push(win("A", "B"));
        }
        let s = compute_standings(&roster(&["A", "B"]), &matches).unwrap();

        let a = s.row("A").unwrap();
        assert_eq!(a.recent_results.len(), RECENT_RESULTS_LIMIT);
        assert_eq!(a.recent_results, vec![Loss, Win, Win, Win, Win]);
        assert_eq!(a.matches_won, 6);
        assert_eq!(a.matches_lost, 1);
        assert_eq!(a.matches_played, 7);

        let b = s.row("B").unwrap();
        assert_eq!(b.recent_results, vec![Win, Loss, Loss, Loss, Loss]);
    }

    #[test]
    fn test_recent_results_keep_newest_five() {
        // newest two are losses for A, the oldest five are wins
        let mut matches = vec![win("B", "A"), win("B", "A")];
        for _ in 0..5 {
            matches.push(win("A", "B"));
        }
        let s = compute_standings(&roster(&["A", "B"]), &matches).unwrap();
        assert_eq!(
            s.row("A").unwrap().recent_results,
            vec![Loss, Loss, Win, Win, Win]
        );
    }

    #[test]
    fn test_ranking_is_stable_for_equal_points() {
        let matches = vec![
            tennis("D", "B", TennisFormat::ThreeSets, &[("1", 3, 3)]),
            tennis("A", "C", TennisFormat::ThreeSets, &[("1", 6, 1)]),
        ];
        let s = compute_standings(&roster(&["B", "C", "D", "A", "E"]), &matches).unwrap();
        // A=6, B=3, D=3, C=1, E=0; B before D as in the roster
        assert_eq!(s.ranking(), vec!["A", "B", "D", "C", "E"]);

        let leaderboard = s.leaderboard();
        assert_eq!(leaderboard.len(), 5);
        assert_eq!(leaderboard[0].name, "A");
        assert_eq!(leaderboard[4].points, 0);
    }

    #[test]
    fn test_equal_points_with_different_wins_keep_roster_order() {
        // B takes two sets and the match, yet both finish on 12 points
        let matches = vec![tennis(
            "A",
            "B",
            TennisFormat::ThreeSets,
            &[("1", 7, 0), ("2", 0, 6), ("3", 5, 6)],
        )];
        let s = compute_standings(&roster(&["A", "B"]), &matches).unwrap();
        assert_eq!(s.row("B").unwrap().matches_won, 1);
        assert_eq!(s.ranking(), vec!["A", "B"]);
    }

    #[test]
    fn test_unlisted_players_get_rows_but_not_roster_rank() {
        let matches = vec![win("Z", "A"), win("A", "Y")];
        let s = compute_standings(&roster(&["A"]), &matches).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.row("Z").unwrap().points, 12);
        assert_eq!(s.ranking(), vec!["A"]);
        assert_eq!(s.merged_ranking(), vec!["A", "Z", "Y"]);
    }

    #[test]
    fn test_names_are_normalized() {
        let matches = vec![win(" Amit  Shah", "Priya ")];
        let s = compute_standings(&roster(&["Amit Shah", "  Priya"]), &matches).unwrap();
        assert_eq!(s.row("Amit Shah").unwrap().matches_won, 1);
        assert_eq!(s.row("Priya").unwrap().matches_lost, 1);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_duplicate_roster_names_ranked_once() {
        let s = compute_standings(&roster(&["A", "A ", "B"]), &[]).unwrap();
        assert_eq!(s.ranking(), vec!["A", "B"]);
    }

    #[test]
    fn test_rejects_same_player_twice() {
        let err = compute_standings(&roster(&["A"]), &[win("A", " A")]).unwrap_err();
        assert_eq!(err, InvalidMatchError::SamePlayer("A".into()));
    }

    #[test]
    fn test_rejects_missing_player() {
        let err = compute_standings(&roster(&["A"]), &[win("A", "  ")]).unwrap_err();
        assert_eq!(err, InvalidMatchError::MissingPlayer("player2"));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let matches = vec![
            win("A", "B"),
            tennis(
                "B",
                "C",
                TennisFormat::TwoSetsTiebreak,
                &[("1", 6, 4), ("2", 3, 6), ("tb", 4, 7)],
            ),
            win("C", "A"),
        ];
        let r = roster(&["A", "B", "C"]);
        let first = compute_standings(&r, &matches).unwrap();
        let second = compute_standings(&r, &matches).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.leaderboard(), second.leaderboard());
    }
}
