//! Season outcome simulation engine for a professional football league.
//!
//! Each trial samples every scheduled game from a rating-based outcome
//! model, resolves standings under the league's multi-level tiebreak
//! procedure, and plays the playoff bracket to a champion. The Monte Carlo
//! orchestrator repeats trials with reproducible per-trial seeds and
//! accumulates per-team outcome frequencies into probabilities.
//!
//! The crate is a pure computation library: schedules and team strength
//! inputs come from the caller, and results go back as finalized
//! probability reports. It performs no I/O.

pub mod constants;
pub mod error;
pub mod league;
pub mod monte_carlo;
pub mod overrides;
pub mod playoff;
pub mod record;
pub mod sample;
pub mod schedule;
pub mod standings;
pub mod team;
pub mod win_prob;

pub use error::{Result, SimError};
pub use league::{Conference, Division, League};
pub use monte_carlo::{
    Checkpoint, ConvergenceReport, OutcomeAccumulator, SeasonSim, SimConfig, SimulationReport,
    TeamCounts, TeamProbabilities, TrialDetail,
};
pub use overrides::OverridesMap;
pub use playoff::{simulate_playoffs, BracketGame, BracketResult};
pub use record::{compute_records, strength_of_schedule, strength_of_victory, Record};
pub use sample::{sample_game, sample_season, GameResult, SeasonResult};
pub use schedule::{Game, Schedule};
pub use standings::{
    resolve_standings, resolve_with_records, ConferenceSeeding, DivisionStanding, RankedTeam,
    Standings, TiebreakRule,
};
pub use team::Team;
pub use win_prob::{GameProbs, OutcomeModel};
