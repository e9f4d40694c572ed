use statrs::distribution::{ContinuousCDF, Normal};

use crate::constants::MARGIN_STDDEV;
use crate::error::{Result, SimError};
use crate::overrides::OverridesMap;
use crate::team::Team;

/// Outcome distribution for a single game, from the home side's view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameProbs {
    pub home_win: f64,
    pub tie: f64,
    pub away_win: f64,
}

impl GameProbs {
    /// Distribution sanity check: entries in [0, 1] summing to one.
    pub fn is_valid(&self) -> bool {
        let parts = [self.home_win, self.tie, self.away_win];
        parts
            .iter()
            .all(|p| p.is_finite() && (0.0..=1.0).contains(p))
            && (parts.iter().sum::<f64>() - 1.0).abs() < 1e-9
    }
}

/// Margin-based game outcome model.
///
/// Final score margins are modeled as normal around the rating difference
/// plus the home-field term. When ties are modeled, a game is a tie iff its
/// margin rounds to zero; otherwise the distribution is thresholded at zero
/// and carries no tie mass.
#[derive(Clone, Copy, Debug)]
pub struct OutcomeModel {
    home_field: f64,
    margin_stddev: f64,
    tie_allowed: bool,
}

impl OutcomeModel {
    pub fn new(home_field: f64, tie_allowed: bool) -> Result<Self> {
        if !home_field.is_finite() {
            return Err(SimError::Configuration(format!(
                "home-field advantage must be finite, got {home_field}"
            )));
        }
        Ok(OutcomeModel {
            home_field,
            margin_stddev: MARGIN_STDDEV,
            tie_allowed,
        })
    }

    /// Copy of this model with tie mass redistributed by thresholding the
    /// margin distribution at zero (playoff rounds).
    pub fn sudden_death(&self) -> Self {
        OutcomeModel {
            tie_allowed: false,
            ..*self
        }
    }

    /// Copy of this model with no home-field term (neutral-site games).
    pub fn neutral_site(&self) -> Self {
        OutcomeModel {
            home_field: 0.0,
            ..*self
        }
    }

    pub fn tie_allowed(&self) -> bool {
        self.tie_allowed
    }

    pub fn home_field(&self) -> f64 {
        self.home_field
    }

    /// Expected final margin from the home side's view.
    pub fn expected_margin(&self, home: &Team, away: &Team) -> f64 {
        home.rating - away.rating + self.home_field
    }

    /// Outcome distribution for `away` visiting `home`.
    ///
    /// Overrides are consulted first; an override replaces the whole
    /// distribution. Identical teams or unusable ratings are input errors,
    /// never a silent coin flip.
    pub fn predict(
        &self,
        home: &Team,
        away: &Team,
        overrides: Option<&OverridesMap>,
    ) -> Result<GameProbs> {
        if home.abbr == away.abbr {
            return Err(SimError::Input(format!("{} cannot play itself", home.abbr)));
        }
        if !home.rating.is_finite() || !away.rating.is_finite() {
            return Err(SimError::Input(format!(
                "unusable rating in {} at {} ({} / {})",
                away.abbr, home.abbr, away.rating, home.rating
            )));
        }

        if let Some(p) = overrides.and_then(|ovr| ovr.get(&home.abbr, &away.abbr)) {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::Input(format!(
                    "override for {} vs {} is not a probability: {p}",
                    home.abbr, away.abbr
                )));
            }
            return Ok(GameProbs {
                home_win: p,
                tie: 0.0,
                away_win: 1.0 - p,
            });
        }

        let m = self.expected_margin(home, away);
        let normal = Normal::new(0.0, 1.0).unwrap();
        if self.tie_allowed {
            let home_win = 1.0 - normal.cdf((0.5 - m) / self.margin_stddev);
            let away_win = normal.cdf((-0.5 - m) / self.margin_stddev);
            Ok(GameProbs {
                home_win,
                tie: (1.0 - home_win - away_win).max(0.0),
                away_win,
            })
        } else {
            let home_win = normal.cdf(m / self.margin_stddev);
            Ok(GameProbs {
                home_win,
                tie: 0.0,
                away_win: 1.0 - home_win,
            })
        }
    }

    /// Map a uniform draw to a sampled final margin via the inverse CDF.
    ///
    /// Decreasing in `u`, so `u < P(home wins)` exactly when the sampled
    /// margin clears the winning threshold the distribution was built from.
    pub(crate) fn margin_from_uniform(&self, expected: f64, u: f64) -> f64 {
        let u = u.clamp(f64::MIN_POSITIVE, 1.0 - f64::EPSILON);
        let normal = Normal::new(0.0, 1.0).unwrap();
        expected - self.margin_stddev * normal.inverse_cdf(u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(abbr: &str, rating: f64) -> Team {
        Team::new(abbr, abbr, "East", "X", rating)
    }

    #[test]
    fn equal_teams_neutral_field_are_symmetric() {
        let model = OutcomeModel::new(0.0, true).unwrap();
        let probs = model.predict(&team("A", 0.0), &team("B", 0.0), None).unwrap();

        assert!(probs.is_valid());
        assert!((probs.home_win - probs.away_win).abs() < 1e-12);
        assert!(probs.tie > 0.0 && probs.tie < 0.05);
    }

    #[test]
    fn equal_teams_no_ties_are_a_coin_flip() {
        let model = OutcomeModel::new(0.0, false).unwrap();
        let probs = model.predict(&team("A", 0.0), &team("B", 0.0), None).unwrap();

        assert!((probs.home_win - 0.5).abs() < 1e-12);
        assert_eq!(probs.tie, 0.0);
    }

    #[test]
    fn home_field_favors_host() {
        let model = OutcomeModel::new(2.0, true).unwrap();
        let probs = model.predict(&team("A", 0.0), &team("B", 0.0), None).unwrap();

        assert!(probs.home_win > probs.away_win);
        assert!(probs.is_valid());
    }

    #[test]
    fn stronger_team_is_favored_but_not_certain() {
        let model = OutcomeModel::new(0.0, true).unwrap();
        let probs = model
            .predict(&team("A", 6.0), &team("B", -3.0), None)
            .unwrap();

        assert!(probs.home_win > 0.7);
        assert!(probs.home_win < 1.0);
    }

    #[test]
    fn overwhelming_rating_gap_is_a_lock() {
        let model = OutcomeModel::new(0.0, true).unwrap();
        let probs = model
            .predict(&team("A", 1000.0), &team("B", 0.0), None)
            .unwrap();

        assert_eq!(probs.home_win, 1.0);
        assert_eq!(probs.tie, 0.0);
        assert_eq!(probs.away_win, 0.0);
    }

    #[test]
    fn sudden_death_strips_tie_mass() {
        let model = OutcomeModel::new(2.0, true).unwrap();
        let probs = model
            .sudden_death()
            .predict(&team("A", 0.0), &team("B", 0.0), None)
            .unwrap();

        assert_eq!(probs.tie, 0.0);
        assert!(probs.is_valid());
    }

    #[test]
    fn neutral_site_drops_home_field() {
        let model = OutcomeModel::new(2.0, false).unwrap();
        let probs = model
            .neutral_site()
            .predict(&team("A", 0.0), &team("B", 0.0), None)
            .unwrap();

        assert!((probs.home_win - 0.5).abs() < 1e-12);
    }

    #[test]
    fn override_replaces_distribution() {
        let model = OutcomeModel::new(2.0, true).unwrap();
        let mut overrides = OverridesMap::new();
        overrides.add_override("A", "B", 0.75);

        let probs = model
            .predict(&team("A", 0.0), &team("B", 0.0), Some(&overrides))
            .unwrap();
        assert!((probs.home_win - 0.75).abs() < 1e-12);
        assert_eq!(probs.tie, 0.0);

        let reversed = model
            .predict(&team("B", 0.0), &team("A", 0.0), Some(&overrides))
            .unwrap();
        assert!((reversed.home_win - 0.25).abs() < 1e-12);
    }

    #[test]
    fn identical_teams_are_an_input_error() {
        let model = OutcomeModel::new(0.0, true).unwrap();
        let err = model.predict(&team("A", 0.0), &team("A", 0.0), None).unwrap_err();
        assert!(matches!(err, SimError::Input(_)));
    }

    #[test]
    fn non_finite_rating_is_an_input_error() {
        let model = OutcomeModel::new(0.0, true).unwrap();
        let err = model
            .predict(&team("A", f64::NAN), &team("B", 0.0), None)
            .unwrap_err();
        assert!(matches!(err, SimError::Input(_)));
    }

    #[test]
    fn non_finite_home_field_is_a_configuration_error() {
        assert!(matches!(
            OutcomeModel::new(f64::INFINITY, true),
            Err(SimError::Configuration(_))
        ));
    }

    #[test]
    fn margin_sampling_agrees_with_distribution() {
        let model = OutcomeModel::new(2.0, true).unwrap();
        let (home, away) = (team("A", 1.0), team("B", -1.0));
        let probs = model.predict(&home, &away, None).unwrap();
        let m = model.expected_margin(&home, &away);

        // Just inside the home-win mass: margin rounds to at least one.
        let margin = model.margin_from_uniform(m, probs.home_win - 1e-6);
        assert!(margin.round() >= 1.0);

        // Just past it: inside the tie band.
        let margin = model.margin_from_uniform(m, probs.home_win + 1e-6);
        assert_eq!(margin.round(), 0.0);

        // Past the tie band: an away win.
        let margin = model.margin_from_uniform(m, probs.home_win + probs.tie + 1e-6);
        assert!(margin.round() <= -1.0);
    }
}
