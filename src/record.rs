use std::cmp::Ordering;

use crate::league::League;
use crate::sample::SeasonResult;

/// One team's derived record for a single simulated season.
///
/// Recomputed fresh each trial from that trial's [`SeasonResult`]; never
/// mutated afterwards. Opponent lists keep multiplicity so strength
/// figures weight repeat meetings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub div_wins: u32,
    pub div_losses: u32,
    pub div_ties: u32,
    pub conf_wins: u32,
    pub conf_losses: u32,
    pub conf_ties: u32,
    pub net_points: i64,
    pub defeated: Vec<usize>,
    pub opponents: Vec<usize>,
}

impl Record {
    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// Winning percentage with ties counted as half a win.
    pub fn win_pct(&self) -> f64 {
        pct(self.wins, self.losses, self.ties)
    }

    pub fn division_pct(&self) -> f64 {
        pct(self.div_wins, self.div_losses, self.div_ties)
    }

    pub fn conference_pct(&self) -> f64 {
        pct(self.conf_wins, self.conf_losses, self.conf_ties)
    }
}

fn pct(wins: u32, losses: u32, ties: u32) -> f64 {
    let games = wins + losses + ties;
    if games == 0 {
        return 0.0;
    }
    (f64::from(wins) + 0.5 * f64::from(ties)) / f64::from(games)
}

/// Compute every team's record from one sampled season.
pub fn compute_records(league: &League, season: &SeasonResult) -> Vec<Record> {
    let mut records = vec![Record::default(); league.teams().len()];

    for result in season.results() {
        let (h, a) = (result.home, result.away);
        let division = league.same_division(h, a);
        let conference = league.same_conference(h, a);

        records[h].opponents.push(a);
        records[a].opponents.push(h);
        records[h].net_points += i64::from(result.home_margin);
        records[a].net_points -= i64::from(result.home_margin);

        match result.home_margin.cmp(&0) {
            Ordering::Greater => {
                records[h].wins += 1;
                records[a].losses += 1;
                records[h].defeated.push(a);
                if division {
                    records[h].div_wins += 1;
                    records[a].div_losses += 1;
                }
                if conference {
                    records[h].conf_wins += 1;
                    records[a].conf_losses += 1;
                }
            }
            Ordering::Less => {
                records[a].wins += 1;
                records[h].losses += 1;
                records[a].defeated.push(h);
                if division {
                    records[a].div_wins += 1;
                    records[h].div_losses += 1;
                }
                if conference {
                    records[a].conf_wins += 1;
                    records[h].conf_losses += 1;
                }
            }
            Ordering::Equal => {
                records[h].ties += 1;
                records[a].ties += 1;
                if division {
                    records[h].div_ties += 1;
                    records[a].div_ties += 1;
                }
                if conference {
                    records[h].conf_ties += 1;
                    records[a].conf_ties += 1;
                }
            }
        }
    }

    records
}

/// Mean final win percentage of the opponents a team defeated.
/// No victories yields 0.0.
pub fn strength_of_victory(records: &[Record], team: usize) -> f64 {
    mean_pct(records, &records[team].defeated)
}

/// Mean final win percentage of every opponent a team faced.
pub fn strength_of_schedule(records: &[Record], team: usize) -> f64 {
    mean_pct(records, &records[team].opponents)
}

fn mean_pct(records: &[Record], opponents: &[usize]) -> f64 {
    if opponents.is_empty() {
        return 0.0;
    }
    opponents.iter().map(|&o| records[o].win_pct()).sum::<f64>() / opponents.len() as f64
}
