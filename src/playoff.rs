use rand::Rng;

use crate::error::{Result, SimError};
use crate::league::League;
use crate::overrides::OverridesMap;
use crate::record::Record;
use crate::standings::Standings;
use crate::win_prob::OutcomeModel;

/// One simulated playoff game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BracketGame {
    pub round: u32,
    pub home: usize,
    pub away: usize,
    pub winner: usize,
}

/// Full bracket outcome for one trial.
#[derive(Clone, Debug, PartialEq)]
pub struct BracketResult {
    pub games: Vec<BracketGame>,
    /// Champion of each conference, in conference order.
    pub conference_champions: Vec<usize>,
    pub champion: usize,
}

/// Simulate the elimination bracket for one trial.
///
/// Matchups are recomputed every round from the seeds still alive: the top
/// seeds take the byes needed to reach a power of two, the rest pair best
/// against worst, and the better seed hosts. Each matchup is one model
/// prediction plus one draw under the sudden-death model, so any tie mass
/// in the regular-season model is redistributed by thresholding the margin
/// distribution at zero. With two conferences the champions meet in a
/// neutral-site title game.
pub fn simulate_playoffs<R: Rng>(
    league: &League,
    standings: &Standings,
    records: &[Record],
    model: &OutcomeModel,
    overrides: Option<&OverridesMap>,
    rng: &mut R,
) -> Result<BracketResult> {
    let playoff_model = model.sudden_death();
    let mut games = Vec::new();
    let mut champions: Vec<(usize, usize)> = Vec::new();

    for seeding in &standings.conferences {
        // (seed number, team), best seed first
        let mut alive: Vec<(usize, usize)> = seeding
            .seeds
            .iter()
            .enumerate()
            .map(|(i, s)| (i + 1, s.team))
            .collect();
        if alive.is_empty() {
            return Err(SimError::Input(format!(
                "conference {} has no playoff seeds",
                seeding.conference
            )));
        }

        let mut round = 1;
        while alive.len() > 1 {
            let mut p = 1;
            while p * 2 < alive.len() {
                p *= 2;
            }
            let byes = 2 * p - alive.len();

            let mut survivors: Vec<(usize, usize)> = alive[..byes].to_vec();
            let playing = &alive[byes..];
            for i in 0..playing.len() / 2 {
                let (home_seed, home) = playing[i];
                let (away_seed, away) = playing[playing.len() - 1 - i];
                let winner = play_game(league, home, away, &playoff_model, overrides, rng)?;
                games.push(BracketGame {
                    round,
                    home,
                    away,
                    winner,
                });
                survivors.push(if winner == home {
                    (home_seed, home)
                } else {
                    (away_seed, away)
                });
            }
            survivors.sort_by_key(|&(seed, _)| seed);
            alive = survivors;
            round += 1;
        }
        champions.push(alive[0]);
    }

    let conference_champions: Vec<usize> = champions.iter().map(|&(_, team)| team).collect();
    let champion = match champions.as_slice() {
        [(_, only)] => *only,
        [a, b] => {
            let (home, away) = title_matchup(*a, *b, records, league);
            let title_round = games.iter().map(|g| g.round).max().unwrap_or(0) + 1;
            let winner = play_game(
                league,
                home,
                away,
                &playoff_model.neutral_site(),
                overrides,
                rng,
            )?;
            games.push(BracketGame {
                round: title_round,
                home,
                away,
                winner,
            });
            winner
        }
        _ => {
            return Err(SimError::Input(format!(
                "{} conference champions, at most two are supported",
                champions.len()
            )))
        }
    };

    Ok(BracketResult {
        games,
        conference_champions,
        champion,
    })
}

/// Nominal home team for the title game: better seed number, then better
/// regular-season record, then net points, then abbreviation. The game
/// itself is played on a neutral field.
fn title_matchup(
    a: (usize, usize),
    b: (usize, usize),
    records: &[Record],
    league: &League,
) -> (usize, usize) {
    let better = {
        let (ra, rb) = (&records[a.1], &records[b.1]);
        if a.0 != b.0 {
            a.0 < b.0
        } else if ra.win_pct() != rb.win_pct() {
            ra.win_pct() > rb.win_pct()
        } else if ra.net_points != rb.net_points {
            ra.net_points > rb.net_points
        } else {
            league.team(a.1).abbr < league.team(b.1).abbr
        }
    };
    if better {
        (a.1, b.1)
    } else {
        (b.1, a.1)
    }
}

fn play_game<R: Rng>(
    league: &League,
    home: usize,
    away: usize,
    model: &OutcomeModel,
    overrides: Option<&OverridesMap>,
    rng: &mut R,
) -> Result<usize> {
    let (h, a) = (league.team(home), league.team(away));
    let probs = model.predict(h, a, overrides)?;
    if !probs.is_valid() {
        return Err(SimError::Input(format!(
            "malformed outcome distribution for {} at {}: {probs:?}",
            a.abbr, h.abbr
        )));
    }
    Ok(if rng.gen::<f64>() < probs.home_win {
        home
    } else {
        away
    })
}
