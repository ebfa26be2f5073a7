use crate::league::{MatchRecord, SetId, SetScore};

/// Points awarded to the winner of a `2sets-tb` tiebreaker, in place of its raw score.
pub const TIEBREAK_POINTS: u32 = 6;

/// Which side of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player1,
    Player2,
}

/// What one set contributes to its match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetOutcome {
    pub player1_points: u32,
    pub player2_points: u32,
    /// Side that took the set, if either did
    pub won_by: Option<Side>,
}

/// Running totals for a single match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchTally {
    pub player1_points: u32,
    pub player2_points: u32,
    pub player1_sets: u32,
    pub player2_sets: u32,
    /// Sets scored, tiebreaker included. Not part of the standings output.
    pub sets_played: u32,
}

impl MatchTally {
    /// Side with more sets won; `None` when the tallies are level
    pub fn winner(&self) -> Option<Side> {
        if self.player1_sets > self.player2_sets {
            Some(Side::Player1)
        } else if self.player2_sets > self.player1_sets {
            Some(Side::Player2)
        } else {
            None
        }
    }

    fn add(&mut self, outcome: SetOutcome) {
        self.player1_points = self.player1_points.saturating_add(outcome.player1_points);
        self.player2_points = self.player2_points.saturating_add(outcome.player2_points);
        match outcome.won_by {
            Some(Side::Player1) => self.player1_sets += 1,
            Some(Side::Player2) => self.player2_sets += 1,
            None => {}
        }
        self.sets_played += 1;
    }
}

fn higher(p1: u32, p2: u32) -> Option<Side> {
    if p1 > p2 {
        Some(Side::Player1)
    } else if p2 > p1 {
        Some(Side::Player2)
    } else {
        None
    }
}

/// Score one set.
///
/// With `tiebreak_rules` set, a `"tb"` set is worth a flat [`TIEBREAK_POINTS`] to whoever
/// scored higher and nothing to the other side. Every other set is worth its game count
/// to each side.
pub fn score_set(id: &SetId, set: &SetScore, tiebreak_rules: bool) -> SetOutcome {
    let p1 = set.player1_games();
    let p2 = set.player2_games();
    let won_by = higher(p1, p2);

    if tiebreak_rules && *id == SetId::Tiebreak {
        let (player1_points, player2_points) = match won_by {
            Some(Side::Player1) => (TIEBREAK_POINTS, 0),
            Some(Side::Player2) => (0, TIEBREAK_POINTS),
            None => (0, 0),
        };
        return SetOutcome {
            player1_points,
            player2_points,
            won_by,
        };
    }

    SetOutcome {
        player1_points: p1,
        player2_points: p2,
        won_by,
    }
}

/// Score every set of a match. Never fails: unreadable cells count as 0.
pub fn tally_match(m: &MatchRecord) -> MatchTally {
    let tiebreak_rules = m.uses_tiebreak();
    m.scores
        .iter()
        .fold(MatchTally::default(), |mut tally, (key, set)| {
            tally.add(score_set(&SetId::from_key(key), set, tiebreak_rules));
            tally
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::{ScoreCell, Sport, TennisFormat};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn tennis(format: TennisFormat, sets: &[(&str, u32, u32)]) -> MatchRecord {
        MatchRecord {
            id: None,
            league: None,
            player1: "A".into(),
            player2: "B".into(),
            sport: Sport::Tennis,
            tennis_format: Some(format),
            scores: sets
                .iter()
                .map(|(k, p1, p2)| (k.to_string(), SetScore::new(*p1, *p2)))
                .collect(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            recorded_at: None,
        }
    }

    #[test]
    fn test_three_set_match() {
        let m = tennis(
            TennisFormat::ThreeSets,
            &[("1", 6, 3), ("2", 4, 6), ("3", 6, 2)],
        );
        let t = tally_match(&m);
        assert_eq!(t.player1_points, 16);
        assert_eq!(t.player2_points, 11);
        assert_eq!((t.player1_sets, t.player2_sets), (2, 1));
        assert_eq!(t.sets_played, 3);
        assert_eq!(t.winner(), Some(Side::Player1));
    }

    #[test]
    fn test_tiebreak_awards_flat_points() {
        let m = tennis(
            TennisFormat::TwoSetsTiebreak,
            &[("1", 6, 4), ("2", 3, 6), ("tb", 7, 5)],
        );
        let t = tally_match(&m);
        assert_eq!(t.player1_points, 15);
        assert_eq!(t.player2_points, 10);
        assert_eq!((t.player1_sets, t.player2_sets), (2, 1));
        assert_eq!(t.winner(), Some(Side::Player1));
    }

    #[test]
    fn test_tied_tiebreak_awards_nothing_but_counts_as_played() {
        let m = tennis(TennisFormat::TwoSetsTiebreak, &[("tb", 10, 10)]);
        let t = tally_match(&m);
        assert_eq!((t.player1_points, t.player2_points), (0, 0));
        assert_eq!(t.sets_played, 1);
        assert_eq!(t.winner(), None);
    }

    #[test]
    fn test_tb_key_in_three_set_format_is_a_normal_set() {
        let m = tennis(TennisFormat::ThreeSets, &[("tb", 7, 5)]);
        let t = tally_match(&m);
        assert_eq!((t.player1_points, t.player2_points), (7, 5));
    }

    #[test]
    fn test_tb_key_outside_tennis_is_a_normal_set() {
        let mut m = tennis(TennisFormat::TwoSetsTiebreak, &[("tb", 7, 5)]);
        m.sport = Sport::Pickleball;
        let t = tally_match(&m);
        assert_eq!((t.player1_points, t.player2_points), (7, 5));
    }

    #[test]
    fn test_missing_and_garbage_cells_count_as_zero() {
        let mut scores = BTreeMap::new();
        scores.insert(
            "1".to_string(),
            SetScore {
                player1: Some(ScoreCell::Text("abc".into())),
                player2: Some(ScoreCell::Text("3".into())),
            },
        );
        scores.insert(
            "2".to_string(),
            SetScore {
                player1: Some(ScoreCell::Number(6.0)),
                player2: None,
            },
        );
        let mut m = tennis(TennisFormat::ThreeSets, &[]);
        m.scores = scores;

        let t = tally_match(&m);
        assert_eq!(t.player1_points, 6);
        assert_eq!(t.player2_points, 3);
        assert_eq!(t.winner(), None);
    }

    #[test]
    fn test_empty_scores_have_no_winner() {
        let m = tennis(TennisFormat::ThreeSets, &[]);
        let t = tally_match(&m);
        assert_eq!(t, MatchTally::default());
        assert_eq!(t.winner(), None);
    }
}
