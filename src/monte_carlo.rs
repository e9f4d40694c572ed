use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::constants::DEFAULT_HOME_FIELD;
use crate::error::{Result, SimError};
use crate::league::League;
use crate::overrides::OverridesMap;
use crate::playoff::{self, BracketResult};
use crate::record;
use crate::sample::{self, SeasonResult};
use crate::schedule::Schedule;
use crate::standings::{self, Standings};
use crate::win_prob::OutcomeModel;

/// Monte Carlo run configuration.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Number of simulated seasons.
    pub trials: usize,
    /// Run seed; every trial derives its own reproducible sub-seed.
    pub seed: u64,
    /// Whether regular-season games can end tied.
    pub tie_allowed: bool,
    /// Home-field advantage, in points.
    pub home_field_advantage: f64,
    /// Keep per-trial season/standings/bracket detail in the report.
    /// Memory grows with trials times schedule size.
    pub retain_trial_detail: bool,
    /// Trials per convergence checkpoint; also the cancellation
    /// granularity.
    pub convergence_window: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            trials: 10_000,
            seed: 0,
            tie_allowed: true,
            home_field_advantage: DEFAULT_HOME_FIELD,
            retain_trial_detail: false,
            convergence_window: 1_000,
        }
    }
}

impl SimConfig {
    fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(SimError::Configuration(
                "trial count must be positive".into(),
            ));
        }
        if self.convergence_window == 0 {
            return Err(SimError::Configuration(
                "convergence window must be positive".into(),
            ));
        }
        if !self.home_field_advantage.is_finite() {
            return Err(SimError::Configuration(format!(
                "home-field advantage must be finite, got {}",
                self.home_field_advantage
            )));
        }
        Ok(())
    }
}

/// Raw per-team outcome counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TeamCounts {
    pub playoff_berths: u64,
    pub division_titles: u64,
    pub conference_titles: u64,
    pub championships: u64,
}

/// Cross-trial counters, the only state shared between trials. Workers
/// accumulate into private partials that are merged by summation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutcomeAccumulator {
    counts: Vec<TeamCounts>,
    trials: u64,
}

impl OutcomeAccumulator {
    fn new(team_count: usize) -> Self {
        OutcomeAccumulator {
            counts: vec![TeamCounts::default(); team_count],
            trials: 0,
        }
    }

    fn record(&mut self, outcome: &TrialOutcome) {
        self.trials += 1;
        for &t in &outcome.playoff_teams {
            self.counts[t].playoff_berths += 1;
        }
        for &t in &outcome.division_winners {
            self.counts[t].division_titles += 1;
        }
        for &t in &outcome.conference_champions {
            self.counts[t].conference_titles += 1;
        }
        self.counts[outcome.champion].championships += 1;
    }

    fn merge(mut self, other: Self) -> Self {
        self.trials += other.trials;
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts) {
            mine.playoff_berths += theirs.playoff_berths;
            mine.division_titles += theirs.division_titles;
            mine.conference_titles += theirs.conference_titles;
            mine.championships += theirs.championships;
        }
        self
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn counts(&self) -> &[TeamCounts] {
        &self.counts
    }

    /// Counts converted to probabilities, keyed by team abbreviation.
    /// With zero completed trials every probability is zero.
    pub fn finalize(&self, league: &League) -> BTreeMap<String, TeamProbabilities> {
        let trials = self.trials.max(1) as f64;
        self.counts
            .iter()
            .enumerate()
            .map(|(t, counts)| {
                (
                    league.team(t).abbr.clone(),
                    TeamProbabilities {
                        playoff_berth: counts.playoff_berths as f64 / trials,
                        division_title: counts.division_titles as f64 / trials,
                        conference_title: counts.conference_titles as f64 / trials,
                        championship: counts.championships as f64 / trials,
                    },
                )
            })
            .collect()
    }

    fn championship_probs(&self) -> Vec<f64> {
        let trials = self.trials.max(1) as f64;
        self.counts
            .iter()
            .map(|c| c.championships as f64 / trials)
            .collect()
    }
}

/// Finalized outcome probabilities for one team.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TeamProbabilities {
    pub playoff_berth: f64,
    pub division_title: f64,
    pub conference_title: f64,
    pub championship: f64,
}

/// Compact outcome of one trial, the unit of accumulation.
#[derive(Clone, Debug)]
struct TrialOutcome {
    division_winners: Vec<usize>,
    playoff_teams: Vec<usize>,
    conference_champions: Vec<usize>,
    champion: usize,
}

/// Full detail for one trial, retained on request.
#[derive(Clone, Debug)]
pub struct TrialDetail {
    pub season: SeasonResult,
    pub standings: Standings,
    pub bracket: BracketResult,
}

/// Running championship-probability movement at one checkpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Checkpoint {
    pub trials: u64,
    /// Largest absolute change in any club's championship probability
    /// since the previous checkpoint.
    pub max_delta: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConvergenceReport {
    pub window: usize,
    pub checkpoints: Vec<Checkpoint>,
}

/// Outcome of a full Monte Carlo run.
#[derive(Clone, Debug)]
pub struct SimulationReport {
    /// Per-team probabilities, keyed by abbreviation.
    pub probabilities: BTreeMap<String, TeamProbabilities>,
    pub accumulator: OutcomeAccumulator,
    pub convergence: ConvergenceReport,
    pub trials_completed: u64,
    pub details: Option<Vec<TrialDetail>>,
}

/// Season simulation engine: validated inputs plus run configuration.
///
/// Construction performs every detectable validation (configuration,
/// schedule coverage, a probe prediction of each scheduled game) so no
/// input error can surface mid-run and bias the accumulators.
#[derive(Clone, Debug)]
pub struct SeasonSim {
    league: League,
    schedule: Schedule,
    overrides: OverridesMap,
    config: SimConfig,
    model: OutcomeModel,
}

impl SeasonSim {
    pub fn new(league: League, schedule: Schedule, config: SimConfig) -> Result<Self> {
        Self::with_overrides(league, schedule, OverridesMap::new(), config)
    }

    pub fn with_overrides(
        league: League,
        schedule: Schedule,
        overrides: OverridesMap,
        config: SimConfig,
    ) -> Result<Self> {
        config.validate()?;
        let model = OutcomeModel::new(config.home_field_advantage, config.tie_allowed)?;
        schedule.validate(&league)?;
        for game in schedule.games() {
            let probs = model.predict(
                league.team(game.home),
                league.team(game.away),
                Some(&overrides),
            )?;
            if !probs.is_valid() {
                return Err(SimError::Input(format!(
                    "malformed outcome distribution for {} at {} in week {}: {probs:?}",
                    league.team(game.away).abbr,
                    league.team(game.home).abbr,
                    game.week
                )));
            }
        }
        Ok(SeasonSim {
            league,
            schedule,
            overrides,
            config,
            model,
        })
    }

    pub fn league(&self) -> &League {
        &self.league
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Simulate one complete trial from a trial seed: season sampling,
    /// standings resolution, playoff bracket.
    pub fn run_trial(&self, trial_seed: u64) -> Result<TrialDetail> {
        let mut rng = ChaCha8Rng::seed_from_u64(trial_seed);
        let season = sample::sample_season(
            &self.league,
            &self.schedule,
            &self.model,
            Some(&self.overrides),
            &mut rng,
        )?;
        let records = record::compute_records(&self.league, &season);
        let standings = standings::resolve_with_records(&self.league, &season, &records)?;
        let bracket = playoff::simulate_playoffs(
            &self.league,
            &standings,
            &records,
            &self.model,
            Some(&self.overrides),
            &mut rng,
        )?;
        Ok(TrialDetail {
            season,
            standings,
            bracket,
        })
    }

    /// Run the full Monte Carlo loop.
    pub fn run(&self) -> Result<SimulationReport> {
        self.run_inner(None)
    }

    /// Run, checking `cancel` between trial windows; a started window
    /// always completes, so finished trials stay reproducible for a given
    /// cancellation point.
    pub fn run_with_cancel(&self, cancel: &AtomicBool) -> Result<SimulationReport> {
        self.run_inner(Some(cancel))
    }

    fn run_inner(&self, cancel: Option<&AtomicBool>) -> Result<SimulationReport> {
        let n = self.league.teams().len();
        let trial_seeds = self.trial_seeds();
        log::debug!(
            "starting run: {} trials, seed {}, window {}",
            self.config.trials,
            self.config.seed,
            self.config.convergence_window
        );

        let mut total = OutcomeAccumulator::new(n);
        let mut details = self.config.retain_trial_detail.then(Vec::<TrialDetail>::new);
        let mut checkpoints = Vec::new();
        let mut last_probs = vec![0.0; n];

        for window in trial_seeds.chunks(self.config.convergence_window) {
            if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                log::info!("run cancelled after {} trials", total.trials);
                break;
            }

            let partial = if let Some(details) = details.as_mut() {
                let window_details: Vec<TrialDetail> = window
                    .par_iter()
                    .map(|&seed| self.run_trial(seed))
                    .collect::<Result<_>>()?;
                let mut acc = OutcomeAccumulator::new(n);
                for detail in &window_details {
                    acc.record(&outcome_of(detail));
                }
                details.extend(window_details);
                acc
            } else {
                window
                    .par_iter()
                    .map(|&seed| self.run_trial(seed).map(|d| outcome_of(&d)))
                    .try_fold(
                        || OutcomeAccumulator::new(n),
                        |mut acc, outcome| {
                            acc.record(&outcome?);
                            Ok(acc)
                        },
                    )
                    .try_reduce(|| OutcomeAccumulator::new(n), |a, b| Ok(a.merge(b)))?
            };

            total = total.merge(partial);
            let probs = total.championship_probs();
            let max_delta = probs
                .iter()
                .zip(&last_probs)
                .map(|(p, q)| (p - q).abs())
                .fold(0.0, f64::max);
            checkpoints.push(Checkpoint {
                trials: total.trials,
                max_delta,
            });
            last_probs = probs;
            log::debug!(
                "checkpoint: {} trials, max championship delta {:.5}",
                total.trials,
                max_delta
            );
        }

        log::info!("run complete: {} trials", total.trials);
        Ok(SimulationReport {
            probabilities: total.finalize(&self.league),
            trials_completed: total.trials,
            convergence: ConvergenceReport {
                window: self.config.convergence_window,
                checkpoints,
            },
            details,
            accumulator: total,
        })
    }

    /// One sub-seed per trial index, drawn from a master stream seeded
    /// with the run seed: trial `i` is a pure function of `(seed, i)`, so
    /// results match across any degree of parallelism.
    fn trial_seeds(&self) -> Vec<u64> {
        let mut master = ChaCha8Rng::seed_from_u64(self.config.seed);
        (0..self.config.trials).map(|_| master.gen()).collect()
    }
}

fn outcome_of(detail: &TrialDetail) -> TrialOutcome {
    TrialOutcome {
        division_winners: detail.standings.division_winners(),
        playoff_teams: detail
            .standings
            .conferences
            .iter()
            .flat_map(|c| c.seeds.iter().map(|s| s.team))
            .collect(),
        conference_champions: detail.bracket.conference_champions.clone(),
        champion: detail.bracket.champion,
    }
}
