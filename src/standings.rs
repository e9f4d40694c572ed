use std::cmp::Ordering;
use std::fmt;

use crate::error::{Result, SimError};
use crate::league::League;
use crate::record::{self, Record};
use crate::sample::SeasonResult;

/// The rule that settled a standings slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TiebreakRule {
    HeadToHead,
    DivisionRecord,
    ConferenceRecord,
    StrengthOfVictory,
    StrengthOfSchedule,
    NetPoints,
    /// Same-division tie in a wild-card group, settled by division ranking.
    DivisionRanking,
    /// Declared exhaustion fallback: alphabetical by abbreviation.
    Alphabetical,
}

impl fmt::Display for TiebreakRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TiebreakRule::HeadToHead => "head-to-head",
            TiebreakRule::DivisionRecord => "division record",
            TiebreakRule::ConferenceRecord => "conference record",
            TiebreakRule::StrengthOfVictory => "strength of victory",
            TiebreakRule::StrengthOfSchedule => "strength of schedule",
            TiebreakRule::NetPoints => "net points",
            TiebreakRule::DivisionRanking => "division ranking",
            TiebreakRule::Alphabetical => "alphabetical fallback",
        };
        f.write_str(label)
    }
}

/// One resolved standings slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankedTeam {
    pub team: usize,
    /// Rule that broke the tie for this slot; `None` when win percentage
    /// alone separated the team from the rest of its group.
    pub decided_by: Option<TiebreakRule>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DivisionStanding {
    pub division: String,
    pub ranks: Vec<RankedTeam>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConferenceSeeding {
    pub conference: String,
    /// Playoff seeds in order: division winners first, then wild cards.
    pub seeds: Vec<RankedTeam>,
}

/// Fully resolved standings for one simulated season: a total,
/// deterministic order within every comparison group.
#[derive(Clone, Debug, PartialEq)]
pub struct Standings {
    pub divisions: Vec<DivisionStanding>,
    pub conferences: Vec<ConferenceSeeding>,
}

impl Standings {
    /// Playoff fields per conference, each in seed order.
    pub fn playoff_fields(&self) -> Vec<Vec<usize>> {
        self.conferences
            .iter()
            .map(|c| c.seeds.iter().map(|s| s.team).collect())
            .collect()
    }

    /// Division winners across the league.
    pub fn division_winners(&self) -> Vec<usize> {
        self.divisions.iter().map(|d| d.ranks[0].team).collect()
    }
}

/// Resolve standings from one sampled season.
pub fn resolve_standings(league: &League, season: &SeasonResult) -> Result<Standings> {
    let records = record::compute_records(league, season);
    resolve_with_records(league, season, &records)
}

/// Resolve standings with records the caller already computed for this
/// season.
pub fn resolve_with_records(
    league: &League,
    season: &SeasonResult,
    records: &[Record],
) -> Result<Standings> {
    let n = league.teams().len();
    let mut ctx = Context {
        league,
        records,
        h2h: build_h2h(n, season),
        sov: (0..n).map(|t| record::strength_of_victory(records, t)).collect(),
        sos: (0..n).map(|t| record::strength_of_schedule(records, t)).collect(),
        division_rank: vec![usize::MAX; n],
    };

    // Division ranks first; conference comparisons depend on them.
    let mut divisions = Vec::with_capacity(league.divisions().len());
    for division in league.divisions() {
        let ranks = order_group(&division.teams, GroupKind::Division, &ctx)?;
        for (rank, entry) in ranks.iter().enumerate() {
            ctx.division_rank[entry.team] = rank;
        }
        divisions.push(DivisionStanding {
            division: division.name.clone(),
            ranks,
        });
    }

    let mut conferences = Vec::with_capacity(league.conferences().len());
    for conference in league.conferences() {
        let winners: Vec<usize> = conference
            .divisions
            .iter()
            .map(|&d| divisions[d].ranks[0].team)
            .collect();

        // Division winners take the top seeds, then wild cards fill out
        // the field from everyone else in the conference.
        let mut seeds = order_group(&winners, GroupKind::Conference, &ctx)?;
        let mut pool: Vec<usize> = conference
            .teams
            .iter()
            .copied()
            .filter(|t| !winners.contains(t))
            .collect();
        let wild_cards = league.seeds_per_conference() - winners.len();
        for _ in 0..wild_cards {
            let pick = pick_top(&pool, GroupKind::Conference, &ctx)?;
            pool.retain(|&t| t != pick.team);
            seeds.push(pick);
        }

        conferences.push(ConferenceSeeding {
            conference: conference.name.clone(),
            seeds,
        });
    }

    Ok(Standings {
        divisions,
        conferences,
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum GroupKind {
    Division,
    Conference,
}

/// Head-to-head record of a row team against a column team.
#[derive(Clone, Copy, Debug, Default)]
struct PairRecord {
    wins: u32,
    losses: u32,
    ties: u32,
}

impl PairRecord {
    fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }
}

struct Context<'a> {
    league: &'a League,
    records: &'a [Record],
    h2h: Vec<PairRecord>,
    sov: Vec<f64>,
    sos: Vec<f64>,
    /// Rank within the own division; filled as divisions resolve.
    division_rank: Vec<usize>,
}

impl Context<'_> {
    fn pair(&self, a: usize, b: usize) -> PairRecord {
        self.h2h[a * self.records.len() + b]
    }

    fn abbr(&self, team: usize) -> &str {
        &self.league.team(team).abbr
    }
}

fn build_h2h(n: usize, season: &SeasonResult) -> Vec<PairRecord> {
    let mut h2h = vec![PairRecord::default(); n * n];
    for result in season.results() {
        let (h, a) = (result.home, result.away);
        match result.home_margin.cmp(&0) {
            Ordering::Greater => {
                h2h[h * n + a].wins += 1;
                h2h[a * n + h].losses += 1;
            }
            Ordering::Less => {
                h2h[h * n + a].losses += 1;
                h2h[a * n + h].wins += 1;
            }
            Ordering::Equal => {
                h2h[h * n + a].ties += 1;
                h2h[a * n + h].ties += 1;
            }
        }
    }
    h2h
}

/// Order a whole comparison group, best first, by repeatedly selecting the
/// top remaining club. Selecting a club restarts the procedure for the
/// remainder, so each slot re-evaluates the tiebreak chain for its own
/// group.
fn order_group(members: &[usize], kind: GroupKind, ctx: &Context) -> Result<Vec<RankedTeam>> {
    let mut remaining: Vec<usize> = members.to_vec();
    let mut out = Vec::with_capacity(members.len());
    while !remaining.is_empty() {
        let pick = pick_top(&remaining, kind, ctx)?;
        remaining.retain(|&t| t != pick.team);
        out.push(pick);
    }
    Ok(out)
}

/// Select the top club among `remaining`: best win percentage, ties broken
/// by the chain for this group kind.
fn pick_top(remaining: &[usize], kind: GroupKind, ctx: &Context) -> Result<RankedTeam> {
    let mut best_pct = f64::NEG_INFINITY;
    for &t in remaining {
        best_pct = best_pct.max(ctx.records[t].win_pct());
    }
    let tied: Vec<usize> = remaining
        .iter()
        .copied()
        .filter(|&t| ctx.records[t].win_pct() == best_pct)
        .collect();

    if tied.len() == 1 {
        return Ok(RankedTeam {
            team: tied[0],
            decided_by: None,
        });
    }
    let (team, rule) = select_best(&tied, kind, ctx)?;
    Ok(RankedTeam {
        team,
        decided_by: Some(rule),
    })
}

const DIVISION_CHAIN: [TiebreakRule; 6] = [
    TiebreakRule::HeadToHead,
    TiebreakRule::DivisionRecord,
    TiebreakRule::ConferenceRecord,
    TiebreakRule::StrengthOfVictory,
    TiebreakRule::StrengthOfSchedule,
    TiebreakRule::NetPoints,
];

const CONFERENCE_CHAIN: [TiebreakRule; 5] = [
    TiebreakRule::HeadToHead,
    TiebreakRule::ConferenceRecord,
    TiebreakRule::StrengthOfVictory,
    TiebreakRule::StrengthOfSchedule,
    TiebreakRule::NetPoints,
];

/// Break a tie: pick the single best club from a group with equal records.
fn select_best(group: &[usize], kind: GroupKind, ctx: &Context) -> Result<(usize, TiebreakRule)> {
    debug_assert!(group.len() >= 2);
    let mut candidates: Vec<usize> = group.to_vec();

    // A division sends only its best-ranked club into a cross-division
    // comparison; the others wait for the next selection round.
    if kind == GroupKind::Conference {
        let reduced = reduce_same_division(&candidates, ctx);
        if reduced.len() == 1 {
            return Ok((reduced[0], TiebreakRule::DivisionRanking));
        }
        candidates = reduced;
    }

    let chain: &[TiebreakRule] = match kind {
        GroupKind::Division => &DIVISION_CHAIN,
        GroupKind::Conference => &CONFERENCE_CHAIN,
    };

    'restart: loop {
        for &rule in chain {
            let Some(metrics) = rule_metrics(rule, &candidates, kind, ctx)? else {
                continue;
            };
            let survivors = argmax(&candidates, &metrics);
            if survivors.len() < candidates.len() {
                if survivors.len() == 1 {
                    return Ok((survivors[0], rule));
                }
                // A narrowed group re-enters the chain from the top.
                candidates = survivors;
                continue 'restart;
            }
        }
        break;
    }

    // Chain exhausted with a residual tie.
    let mut best = candidates[0];
    for &t in &candidates[1..] {
        if ctx.abbr(t) < ctx.abbr(best) {
            best = t;
        }
    }
    Ok((best, TiebreakRule::Alphabetical))
}

/// Keep, per division, the club ranked highest in its division standing.
fn reduce_same_division(candidates: &[usize], ctx: &Context) -> Vec<usize> {
    let mut keep: Vec<usize> = Vec::with_capacity(candidates.len());
    for &t in candidates {
        match keep
            .iter()
            .position(|&k| ctx.league.division_of(k) == ctx.league.division_of(t))
        {
            Some(i) => {
                if ctx.division_rank[t] < ctx.division_rank[keep[i]] {
                    keep[i] = t;
                }
            }
            None => keep.push(t),
        }
    }
    keep
}

/// Evaluate one chain rule over a tied group. `Ok(None)` means the rule is
/// not applicable to this group.
fn rule_metrics(
    rule: TiebreakRule,
    group: &[usize],
    kind: GroupKind,
    ctx: &Context,
) -> Result<Option<Vec<f64>>> {
    let metrics = match rule {
        TiebreakRule::HeadToHead => match kind {
            GroupKind::Division => return h2h_group_pct(group, ctx).map(Some),
            GroupKind::Conference => return Ok(h2h_sweep(group, ctx)),
        },
        TiebreakRule::DivisionRecord => {
            if kind != GroupKind::Division {
                return Ok(None);
            }
            group.iter().map(|&t| ctx.records[t].division_pct()).collect()
        }
        TiebreakRule::ConferenceRecord => group
            .iter()
            .map(|&t| ctx.records[t].conference_pct())
            .collect(),
        TiebreakRule::StrengthOfVictory => group.iter().map(|&t| ctx.sov[t]).collect(),
        TiebreakRule::StrengthOfSchedule => group.iter().map(|&t| ctx.sos[t]).collect(),
        TiebreakRule::NetPoints => group
            .iter()
            .map(|&t| ctx.records[t].net_points as f64)
            .collect(),
        TiebreakRule::DivisionRanking | TiebreakRule::Alphabetical => return Ok(None),
    };
    Ok(Some(metrics))
}

/// Win percentage in games among the tied clubs. Division groups require
/// every pair to have met; a missing meeting means the schedule cannot
/// support the comparison.
fn h2h_group_pct(group: &[usize], ctx: &Context) -> Result<Vec<f64>> {
    for (i, &a) in group.iter().enumerate() {
        for &b in &group[i + 1..] {
            if ctx.pair(a, b).games() == 0 {
                return Err(SimError::IncompleteSchedule(format!(
                    "{} and {} are tied in {} but never met",
                    ctx.abbr(a),
                    ctx.abbr(b),
                    ctx.league.divisions()[ctx.league.division_of(a)].name
                )));
            }
        }
    }

    Ok(group
        .iter()
        .map(|&t| {
            let mut agg = PairRecord::default();
            for &o in group {
                if o != t {
                    let p = ctx.pair(t, o);
                    agg.wins += p.wins;
                    agg.losses += p.losses;
                    agg.ties += p.ties;
                }
            }
            (f64::from(agg.wins) + 0.5 * f64::from(agg.ties)) / f64::from(agg.games().max(1))
        })
        .collect())
}

/// Conference-group head-to-head: applicable only when one club beat every
/// other tied club (ranked first) or lost to every other tied club
/// (eliminated from this selection).
fn h2h_sweep(group: &[usize], ctx: &Context) -> Option<Vec<f64>> {
    let swept_all = |t: usize| {
        group.iter().all(|&o| {
            o == t || {
                let p = ctx.pair(t, o);
                p.games() > 0 && p.wins == p.games()
            }
        })
    };
    let lost_all = |t: usize| {
        group.iter().all(|&o| {
            o == t || {
                let p = ctx.pair(t, o);
                p.games() > 0 && p.losses == p.games()
            }
        })
    };

    if let Some(&winner) = group.iter().find(|&&t| swept_all(t)) {
        return Some(
            group
                .iter()
                .map(|&t| if t == winner { 1.0 } else { 0.0 })
                .collect(),
        );
    }
    if let Some(&loser) = group.iter().find(|&&t| lost_all(t)) {
        return Some(
            group
                .iter()
                .map(|&t| if t == loser { 0.0 } else { 1.0 })
                .collect(),
        );
    }
    None
}

fn argmax(candidates: &[usize], metrics: &[f64]) -> Vec<usize> {
    let mut best = f64::NEG_INFINITY;
    for &m in metrics {
        best = best.max(m);
    }
    candidates
        .iter()
        .zip(metrics)
        .filter(|&(_, &m)| m == best)
        .map(|(&t, _)| t)
        .collect()
}
