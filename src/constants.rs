/// Standard deviation of a single game's final score margin, in points.
pub const MARGIN_STDDEV: f64 = 13.45;

/// Default home-field advantage, in points.
pub const DEFAULT_HOME_FIELD: f64 = 2.0;

/// Minimum winning margin credited to a sudden-death resolution.
pub const SUDDEN_DEATH_MARGIN: i32 = 1;

/// Margin recorded for games decided by a manual override.
pub const OVERRIDE_MARGIN: i32 = 3;

/// Regular-season weeks in the standard league.
pub const REGULAR_SEASON_WEEKS: u8 = 18;

/// Games each club plays in the standard league's regular season.
pub const GAMES_PER_TEAM: usize = 17;

/// Playoff seeds per conference in the standard league.
pub const PLAYOFF_SEEDS_PER_CONFERENCE: usize = 7;

/// Division memberships for the standard 32-club league:
/// (division name, conference name, member abbreviations).
pub const DIVISIONS: [(&str, &str, [&str; 4]); 8] = [
    ("AFC East", "AFC", ["BUF", "MIA", "NYJ", "NE"]),
    ("AFC North", "AFC", ["BAL", "PIT", "CLE", "CIN"]),
    ("AFC South", "AFC", ["HOU", "JAX", "IND", "TEN"]),
    ("AFC West", "AFC", ["KC", "DEN", "LAC", "LV"]),
    ("NFC East", "NFC", ["DAL", "NYG", "PHI", "WAS"]),
    ("NFC North", "NFC", ["MIN", "GB", "DET", "CHI"]),
    ("NFC South", "NFC", ["CAR", "TB", "ATL", "NO"]),
    ("NFC West", "NFC", ["SEA", "SF", "LAR", "ARI"]),
];

/// Canonical abbreviation / full name pairs for the standard league.
pub const TEAM_NAMES: [(&str, &str); 32] = [
    ("ARI", "Arizona Cardinals"),
    ("ATL", "Atlanta Falcons"),
    ("BAL", "Baltimore Ravens"),
    ("BUF", "Buffalo Bills"),
    ("CAR", "Carolina Panthers"),
    ("CHI", "Chicago Bears"),
    ("CIN", "Cincinnati Bengals"),
    ("CLE", "Cleveland Browns"),
    ("DAL", "Dallas Cowboys"),
    ("DEN", "Denver Broncos"),
    ("DET", "Detroit Lions"),
    ("GB", "Green Bay Packers"),
    ("HOU", "Houston Texans"),
    ("IND", "Indianapolis Colts"),
    ("JAX", "Jacksonville Jaguars"),
    ("KC", "Kansas City Chiefs"),
    ("LV", "Las Vegas Raiders"),
    ("LAC", "Los Angeles Chargers"),
    ("LAR", "Los Angeles Rams"),
    ("MIA", "Miami Dolphins"),
    ("MIN", "Minnesota Vikings"),
    ("NE", "New England Patriots"),
    ("NO", "New Orleans Saints"),
    ("NYG", "New York Giants"),
    ("NYJ", "New York Jets"),
    ("PHI", "Philadelphia Eagles"),
    ("PIT", "Pittsburgh Steelers"),
    ("SF", "San Francisco 49ers"),
    ("SEA", "Seattle Seahawks"),
    ("TB", "Tampa Bay Buccaneers"),
    ("TEN", "Tennessee Titans"),
    ("WAS", "Washington Commanders"),
];

/// Full name for a standard-league abbreviation, if known.
pub fn team_name(abbr: &str) -> Option<&'static str> {
    TEAM_NAMES
        .iter()
        .find(|(a, _)| *a == abbr)
        .map(|(_, name)| *name)
}
