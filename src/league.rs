use std::collections::HashMap;

use crate::constants::{team_name, DIVISIONS, PLAYOFF_SEEDS_PER_CONFERENCE};
use crate::error::{Result, SimError};
use crate::team::Team;

/// A division's membership within a league. Teams are league indices.
#[derive(Clone, Debug)]
pub struct Division {
    pub name: String,
    pub conference: String,
    pub teams: Vec<usize>,
}

/// A conference's membership within a league.
#[derive(Clone, Debug)]
pub struct Conference {
    pub name: String,
    pub divisions: Vec<usize>,
    pub teams: Vec<usize>,
}

/// Validated league structure: teams, their division/conference grouping,
/// and the playoff format.
///
/// Construction rejects malformed team data up front (duplicate
/// abbreviations, non-finite ratings, undersized divisions, a division
/// claimed by two conferences) so nothing downstream needs to re-check.
#[derive(Clone, Debug)]
pub struct League {
    teams: Vec<Team>,
    index: HashMap<String, usize>,
    divisions: Vec<Division>,
    conferences: Vec<Conference>,
    division_of: Vec<usize>,
    conference_of: Vec<usize>,
    seeds_per_conference: usize,
}

impl League {
    /// Build a league from a team list.
    ///
    /// `seeds_per_conference` is the playoff field per conference: one berth
    /// per division winner plus wild cards.
    pub fn new(teams: Vec<Team>, seeds_per_conference: usize) -> Result<Self> {
        if teams.is_empty() {
            return Err(SimError::Input("league has no teams".into()));
        }

        let mut index = HashMap::with_capacity(teams.len());
        for (i, team) in teams.iter().enumerate() {
            if !team.rating.is_finite() {
                return Err(SimError::Input(format!(
                    "{} has no usable rating ({})",
                    team.abbr, team.rating
                )));
            }
            if index.insert(team.abbr.clone(), i).is_some() {
                return Err(SimError::Input(format!(
                    "duplicate team abbreviation {}",
                    team.abbr
                )));
            }
        }

        let mut divisions: Vec<Division> = Vec::new();
        let mut division_of = vec![0usize; teams.len()];
        for (i, team) in teams.iter().enumerate() {
            match divisions.iter().position(|d| d.name == team.division) {
                Some(d) => {
                    if divisions[d].conference != team.conference {
                        return Err(SimError::Input(format!(
                            "division {} is claimed by both {} and {}",
                            team.division, divisions[d].conference, team.conference
                        )));
                    }
                    divisions[d].teams.push(i);
                    division_of[i] = d;
                }
                None => {
                    division_of[i] = divisions.len();
                    divisions.push(Division {
                        name: team.division.clone(),
                        conference: team.conference.clone(),
                        teams: vec![i],
                    });
                }
            }
        }
        for division in &divisions {
            if division.teams.len() < 2 {
                return Err(SimError::Input(format!(
                    "division {} has fewer than two teams",
                    division.name
                )));
            }
        }

        let mut conferences: Vec<Conference> = Vec::new();
        let mut conference_of = vec![0usize; teams.len()];
        for (d, division) in divisions.iter().enumerate() {
            let c = match conferences.iter().position(|c| c.name == division.conference) {
                Some(c) => c,
                None => {
                    conferences.push(Conference {
                        name: division.conference.clone(),
                        divisions: Vec::new(),
                        teams: Vec::new(),
                    });
                    conferences.len() - 1
                }
            };
            conferences[c].divisions.push(d);
            for &t in &division.teams {
                conferences[c].teams.push(t);
                conference_of[t] = c;
            }
        }
        if conferences.len() > 2 {
            return Err(SimError::Input(format!(
                "{} conferences declared, at most two are supported",
                conferences.len()
            )));
        }
        for conference in &conferences {
            if seeds_per_conference < conference.divisions.len()
                || seeds_per_conference > conference.teams.len()
            {
                return Err(SimError::Configuration(format!(
                    "{} playoff seeds cannot fit conference {} ({} divisions, {} teams)",
                    seeds_per_conference,
                    conference.name,
                    conference.divisions.len(),
                    conference.teams.len()
                )));
            }
        }

        Ok(League {
            teams,
            index,
            divisions,
            conferences,
            division_of,
            conference_of,
            seeds_per_conference,
        })
    }

    /// The canonical 32-club, 8-division, 2-conference league.
    ///
    /// Every club must have a rating in `ratings`; a missing club is an
    /// input error, never defaulted.
    pub fn standard(ratings: &HashMap<String, f64>) -> Result<Self> {
        let mut teams = Vec::with_capacity(32);
        for (division, conference, members) in DIVISIONS {
            for abbr in members {
                let rating = *ratings
                    .get(abbr)
                    .ok_or_else(|| SimError::Input(format!("no rating supplied for {abbr}")))?;
                let name = team_name(abbr).unwrap_or(abbr);
                teams.push(Team::new(abbr, name, division, conference, rating));
            }
        }
        Self::new(teams, PLAYOFF_SEEDS_PER_CONFERENCE)
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, idx: usize) -> &Team {
        &self.teams[idx]
    }

    pub fn team_index(&self, abbr: &str) -> Option<usize> {
        self.index.get(abbr).copied()
    }

    pub fn divisions(&self) -> &[Division] {
        &self.divisions
    }

    pub fn conferences(&self) -> &[Conference] {
        &self.conferences
    }

    pub fn division_of(&self, team: usize) -> usize {
        self.division_of[team]
    }

    pub fn conference_of(&self, team: usize) -> usize {
        self.conference_of[team]
    }

    pub fn same_division(&self, a: usize, b: usize) -> bool {
        self.division_of[a] == self.division_of[b]
    }

    pub fn same_conference(&self, a: usize, b: usize) -> bool {
        self.conference_of[a] == self.conference_of[b]
    }

    pub fn seeds_per_conference(&self) -> usize {
        self.seeds_per_conference
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(abbr: &str, division: &str, conference: &str, rating: f64) -> Team {
        Team::new(abbr, abbr, division, conference, rating)
    }

    #[test]
    fn standard_league_structure() {
        let ratings: HashMap<String, f64> = crate::constants::TEAM_NAMES
            .iter()
            .map(|(abbr, _)| (abbr.to_string(), 0.0))
            .collect();
        let league = League::standard(&ratings).unwrap();

        assert_eq!(league.teams().len(), 32);
        assert_eq!(league.divisions().len(), 8);
        assert_eq!(league.conferences().len(), 2);
        assert_eq!(league.seeds_per_conference(), 7);

        let kc = league.team_index("KC").unwrap();
        let den = league.team_index("DEN").unwrap();
        let phi = league.team_index("PHI").unwrap();
        assert!(league.same_division(kc, den));
        assert!(!league.same_conference(kc, phi));
    }

    #[test]
    fn standard_league_requires_every_rating() {
        let mut ratings: HashMap<String, f64> = crate::constants::TEAM_NAMES
            .iter()
            .map(|(abbr, _)| (abbr.to_string(), 0.0))
            .collect();
        ratings.remove("SEA");

        let err = League::standard(&ratings).unwrap_err();
        assert!(matches!(err, SimError::Input(msg) if msg.contains("SEA")));
    }

    #[test]
    fn rejects_duplicate_abbreviations() {
        let teams = vec![
            team("A", "East", "X", 0.0),
            team("A", "East", "X", 1.0),
        ];
        assert!(matches!(League::new(teams, 1), Err(SimError::Input(_))));
    }

    #[test]
    fn rejects_non_finite_rating() {
        let teams = vec![
            team("A", "East", "X", f64::NAN),
            team("B", "East", "X", 0.0),
        ];
        assert!(matches!(League::new(teams, 1), Err(SimError::Input(_))));
    }

    #[test]
    fn rejects_division_in_two_conferences() {
        let teams = vec![
            team("A", "East", "X", 0.0),
            team("B", "East", "Y", 0.0),
        ];
        assert!(matches!(League::new(teams, 1), Err(SimError::Input(_))));
    }

    #[test]
    fn rejects_oversized_playoff_field() {
        let teams = vec![
            team("A", "East", "X", 0.0),
            team("B", "East", "X", 0.0),
        ];
        assert!(matches!(
            League::new(teams, 3),
            Err(SimError::Configuration(_))
        ));
    }

    #[test]
    fn rejects_three_conferences() {
        let teams = vec![
            team("A", "East", "X", 0.0),
            team("B", "East", "X", 0.0),
            team("C", "North", "Y", 0.0),
            team("D", "North", "Y", 0.0),
            team("E", "South", "Z", 0.0),
            team("F", "South", "Z", 0.0),
        ];
        assert!(matches!(League::new(teams, 1), Err(SimError::Input(_))));
    }
}
