/// A club with identity, league placement, and a power rating.
///
/// The rating is expressed in points relative to a league-average club on a
/// neutral field (e.g., 3.5 means three and a half points better than
/// average). Ratings are fixed for the duration of a run; recalibration
/// between runs builds a new league from adjusted teams.
#[derive(Clone, Debug, PartialEq)]
pub struct Team {
    pub abbr: String,
    pub name: String,
    pub division: String,
    pub conference: String,
    pub rating: f64,
}

impl Team {
    pub fn new(abbr: &str, name: &str, division: &str, conference: &str, rating: f64) -> Self {
        Team {
            abbr: abbr.to_string(),
            name: name.to_string(),
            division: division.to_string(),
            conference: conference.to_string(),
            rating,
        }
    }

    /// Copy of this team with its rating shifted by `points`.
    pub fn with_adjustment(&self, points: f64) -> Self {
        Team {
            rating: self.rating + points,
            ..self.clone()
        }
    }
}
