use crate::error::{Result, SimError};
use crate::league::League;

/// A single scheduled game. Teams are league indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Game {
    pub home: usize,
    pub away: usize,
    pub week: u8,
}

/// Ordered list of scheduled games for one season.
#[derive(Clone, Debug)]
pub struct Schedule {
    games: Vec<Game>,
}

impl Schedule {
    /// Build a schedule from `(week, home, away)` abbreviation triples,
    /// preserving their order.
    pub fn from_matchups(league: &League, matchups: &[(u8, &str, &str)]) -> Result<Self> {
        let mut games = Vec::with_capacity(matchups.len());
        for &(week, home, away) in matchups {
            let home = league
                .team_index(home)
                .ok_or_else(|| SimError::Input(format!("unknown team {home} in week {week}")))?;
            let away = league
                .team_index(away)
                .ok_or_else(|| SimError::Input(format!("unknown team {away} in week {week}")))?;
            if home == away {
                return Err(SimError::Input(format!(
                    "{} is scheduled against itself in week {}",
                    league.team(home).abbr,
                    week
                )));
            }
            games.push(Game { home, away, week });
        }
        Ok(Schedule { games })
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Check that the schedule supports every comparison the standings
    /// resolver may need: every club plays, all clubs play the same number
    /// of games, and division rivals meet at least once (head-to-head).
    pub fn validate(&self, league: &League) -> Result<()> {
        if self.games.is_empty() {
            return Err(SimError::IncompleteSchedule("schedule has no games".into()));
        }

        let n = league.teams().len();
        let mut counts = vec![0usize; n];
        let mut met = vec![false; n * n];
        for game in &self.games {
            counts[game.home] += 1;
            counts[game.away] += 1;
            met[game.home * n + game.away] = true;
            met[game.away * n + game.home] = true;
        }

        for (i, &count) in counts.iter().enumerate() {
            if count == 0 {
                return Err(SimError::IncompleteSchedule(format!(
                    "{} has no scheduled games",
                    league.team(i).abbr
                )));
            }
            if count != counts[0] {
                return Err(SimError::IncompleteSchedule(format!(
                    "{} plays {} games but {} plays {}",
                    league.team(i).abbr,
                    count,
                    league.team(0).abbr,
                    counts[0]
                )));
            }
        }

        for division in league.divisions() {
            for (k, &a) in division.teams.iter().enumerate() {
                for &b in &division.teams[k + 1..] {
                    if !met[a * n + b] {
                        return Err(SimError::IncompleteSchedule(format!(
                            "division rivals {} and {} never meet, head-to-head cannot be resolved",
                            league.team(a).abbr,
                            league.team(b).abbr
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::Team;

    fn four_team_league() -> League {
        let teams = vec![
            Team::new("A", "A", "East", "X", 0.0),
            Team::new("B", "B", "East", "X", 0.0),
            Team::new("C", "C", "West", "X", 0.0),
            Team::new("D", "D", "West", "X", 0.0),
        ];
        League::new(teams, 2).unwrap()
    }

    fn round_robin() -> Vec<(u8, &'static str, &'static str)> {
        vec![
            (1, "A", "B"),
            (1, "C", "D"),
            (2, "A", "C"),
            (2, "B", "D"),
            (3, "A", "D"),
            (3, "B", "C"),
        ]
    }

    #[test]
    fn round_robin_validates() {
        let league = four_team_league();
        let schedule = Schedule::from_matchups(&league, &round_robin()).unwrap();
        assert_eq!(schedule.len(), 6);
        schedule.validate(&league).unwrap();
    }

    #[test]
    fn rejects_unknown_team() {
        let league = four_team_league();
        let err = Schedule::from_matchups(&league, &[(1, "A", "Z")]).unwrap_err();
        assert!(matches!(err, SimError::Input(msg) if msg.contains('Z')));
    }

    #[test]
    fn rejects_self_game() {
        let league = four_team_league();
        let err = Schedule::from_matchups(&league, &[(1, "A", "A")]).unwrap_err();
        assert!(matches!(err, SimError::Input(_)));
    }

    #[test]
    fn flags_missing_division_meeting() {
        let league = four_team_league();
        // Uniform three games each, but the East rivals never meet.
        let matchups = vec![
            (1, "A", "C"),
            (1, "B", "D"),
            (2, "A", "D"),
            (2, "B", "C"),
            (3, "A", "C"),
            (3, "B", "D"),
        ];
        let schedule = Schedule::from_matchups(&league, &matchups).unwrap();
        let err = schedule.validate(&league).unwrap_err();
        assert!(matches!(err, SimError::IncompleteSchedule(msg) if msg.contains('A') && msg.contains('B')));
    }

    #[test]
    fn flags_uneven_game_counts() {
        let league = four_team_league();
        let mut matchups = round_robin();
        matchups.push((4, "A", "B"));
        let schedule = Schedule::from_matchups(&league, &matchups).unwrap();
        assert!(matches!(
            schedule.validate(&league),
            Err(SimError::IncompleteSchedule(_))
        ));
    }

    #[test]
    fn flags_empty_schedule() {
        let league = four_team_league();
        let schedule = Schedule::from_matchups(&league, &[]).unwrap();
        assert!(matches!(
            schedule.validate(&league),
            Err(SimError::IncompleteSchedule(_))
        ));
    }
}
