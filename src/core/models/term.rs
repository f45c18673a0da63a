//! Academic term calendar
//!
//! A [`Term`] is a `(season, year)` value. Terms are totally ordered with the
//! year dominating and `Winter < Summer < Fall` inside a year. Term strings are
//! parsed once at the data boundary; everything past that compares structured
//! values.
//!
//! Combined Fall/Winter terms (`"Fall/Winter 2025-2026"`) are a Fall term of
//! the first year flagged as combined. They span September to April, order
//! right after the plain Fall term of the same year and are followed by the
//! Summer term of the next year.

use crate::core::error::PlannerError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Season of an academic term, declared in calendar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    /// January to early May
    Winter,
    /// May to August
    Summer,
    /// September to December
    Fall,
}

impl Season {
    /// All seasons in calendar order
    pub const ALL: [Self; 3] = [Self::Winter, Self::Summer, Self::Fall];

    /// Parse a season name, ignoring case and surrounding whitespace
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "winter" => Some(Self::Winter),
            "summer" => Some(Self::Summer),
            "fall" | "autumn" => Some(Self::Fall),
            _ => None,
        }
    }

    /// Season of the term in progress on `date`
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        match (date.month(), date.day()) {
            (1..=4, _) | (5, 1..=4) => Self::Winter,
            (5..=8, _) => Self::Summer,
            _ => Self::Fall,
        }
    }

    /// Display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Winter => "Winter",
            Self::Summer => "Summer",
            Self::Fall => "Fall",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive calendar window of a term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First day of the term
    pub start: NaiveDate,
    /// Last day of the term
    pub end: NaiveDate,
}

impl DateRange {
    /// Whether `date` falls inside the window (both ends inclusive)
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Fixed calendar window for a season.
///
/// Winter: Jan 1 – May 4, Summer: May 5 – Aug 31, Fall: Sep 1 – Dec 31.
/// Returns `None` only for years outside the supported calendar range.
#[must_use]
pub fn season_date_range(season: Season, year: i32) -> Option<DateRange> {
    let ((sm, sd), (em, ed)) = match season {
        Season::Winter => ((1, 1), (5, 4)),
        Season::Summer => ((5, 5), (8, 31)),
        Season::Fall => ((9, 1), (12, 31)),
    };
    Some(DateRange {
        start: NaiveDate::from_ymd_opt(year, sm, sd)?,
        end: NaiveDate::from_ymd_opt(year, em, ed)?,
    })
}

/// Calendar window of a combined Fall/Winter term: Sep 1 – Apr 30 of the next year
#[must_use]
pub fn fall_winter_date_range(year: i32) -> Option<DateRange> {
    Some(DateRange {
        start: NaiveDate::from_ymd_opt(year, 9, 1)?,
        end: NaiveDate::from_ymd_opt(year.checked_add(1)?, 4, 30)?,
    })
}

/// An academic term.
///
/// Field order drives the derived ordering: year first, then season, then the
/// combined flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Term {
    year: i32,
    season: Season,
    combined: bool,
}

impl Term {
    /// Create a regular single-season term
    #[must_use]
    pub const fn new(season: Season, year: i32) -> Self {
        Self {
            year,
            season,
            combined: false,
        }
    }

    /// Create a combined Fall/Winter term starting in the fall of `year`
    #[must_use]
    pub const fn fall_winter(year: i32) -> Self {
        Self {
            year,
            season: Season::Fall,
            combined: true,
        }
    }

    /// Season of the term (Fall for combined terms)
    #[must_use]
    pub const fn season(&self) -> Season {
        self.season
    }

    /// Authoritative year (the first year for combined terms)
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Whether this is a combined Fall/Winter term
    #[must_use]
    pub const fn is_combined(&self) -> bool {
        self.combined
    }

    /// Seasons covered by the term
    #[must_use]
    pub fn seasons(&self) -> &'static [Season] {
        if self.combined {
            &[Season::Fall, Season::Winter]
        } else {
            match self.season {
                Season::Winter => &[Season::Winter],
                Season::Summer => &[Season::Summer],
                Season::Fall => &[Season::Fall],
            }
        }
    }

    /// Successor term: Fall → Winter (next year), Winter → Summer, Summer → Fall.
    /// A combined Fall/Winter term is followed by the next year's Summer.
    #[must_use]
    pub const fn next(&self) -> Self {
        if self.combined {
            return Self::new(Season::Summer, self.year + 1);
        }
        match self.season {
            Season::Fall => Self::new(Season::Winter, self.year + 1),
            Season::Winter => Self::new(Season::Summer, self.year),
            Season::Summer => Self::new(Season::Fall, self.year),
        }
    }

    /// Term reached after `steps` successive calls to [`Term::next`]
    #[must_use]
    pub fn advance(&self, steps: usize) -> Self {
        (0..steps).fold(*self, |term, _| term.next())
    }

    /// Regular term in progress on `date`
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self::new(Season::containing(date), date.year())
    }

    /// Calendar window of the term
    #[must_use]
    pub fn date_range(&self) -> Option<DateRange> {
        if self.combined {
            fall_winter_date_range(self.year)
        } else {
            season_date_range(self.season, self.year)
        }
    }

    /// Whether the term is in progress on `today`
    #[must_use]
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.date_range().is_some_and(|range| range.contains(today))
    }

    /// Whether the term finished before `today`
    #[must_use]
    pub fn has_ended(&self, today: NaiveDate) -> bool {
        self.date_range().is_some_and(|range| range.end < today)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.combined {
            write!(f, "Fall/Winter {}-{}", self.year, self.year + 1)
        } else {
            write!(f, "{} {}", self.season, self.year)
        }
    }
}

fn parse_year(value: &str) -> Option<i32> {
    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        value.parse().ok()
    } else {
        None
    }
}

/// Parse `"2025"`, `"2025-2026"` or `"2025-26"`. For ranges the second year
/// must follow the first and the first one is returned.
fn parse_year_part(value: &str) -> Option<i32> {
    let Some((first, second)) = value.split_once('-') else {
        return parse_year(value);
    };
    let first = parse_year(first.trim())?;
    let second = second.trim();
    let follows = match second.len() {
        4 => parse_year(second) == Some(first + 1),
        2 => second.parse::<i32>().ok() == Some((first + 1) % 100),
        _ => false,
    };
    follows.then_some(first)
}

impl FromStr for Term {
    type Err = PlannerError;

    /// Parse `<Season> <Year>`, case-insensitively.
    ///
    /// Accepts `Fall/Winter <Year>[-<Year>]` for combined terms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PlannerError::InvalidTermFormat(s.to_string());
        let trimmed = s.trim();
        let (season_part, year_part) = trimmed.rsplit_once(char::is_whitespace).ok_or_else(invalid)?;
        let year = parse_year_part(year_part.trim()).ok_or_else(invalid)?;

        let season_key: String = season_part
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match season_key.as_str() {
            "fall/winter" | "fall-winter" => Ok(Self::fall_winter(year)),
            other => Season::parse(other)
                .map(|season| Self::new(season, year))
                .ok_or_else(invalid),
        }
    }
}

impl TryFrom<String> for Term {
    type Error = PlannerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Term> for String {
    fn from(term: Term) -> Self {
        term.to_string()
    }
}

/// Parse a term string
///
/// # Errors
/// Returns [`PlannerError::InvalidTermFormat`] when `s` is not `<Season> <Year>`.
pub fn parse_term(s: &str) -> Result<Term, PlannerError> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_regular_terms() {
        assert_eq!(parse_term("Fall 2025").unwrap(), Term::new(Season::Fall, 2025));
        assert_eq!(parse_term("WINTER 2026").unwrap(), Term::new(Season::Winter, 2026));
        assert_eq!(parse_term("  summer 2024 ").unwrap(), Term::new(Season::Summer, 2024));
    }

    #[test]
    fn test_parse_combined_term_uses_first_year() {
        let term = parse_term("Fall/Winter 2025-2026").unwrap();
        assert!(term.is_combined());
        assert_eq!(term.year(), 2025);
        assert_eq!(term.season(), Season::Fall);
        assert_eq!(parse_term("fall/winter 2025-26").unwrap(), term);
        assert_eq!(parse_term("Fall/Winter 2025").unwrap(), term);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "Fall", "2025", "Spring 2025", "Fall 25", "Fall 2025-2027", "Fall twenty"] {
            assert!(
                matches!(parse_term(bad), Err(PlannerError::InvalidTermFormat(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_round_trips() {
        for raw in ["Winter 2024", "Summer 2024", "Fall 2024", "Fall/Winter 2024-2025"] {
            assert_eq!(parse_term(raw).unwrap().to_string(), raw);
        }
    }

    #[test]
    fn test_ordering_is_total() {
        let w = Term::new(Season::Winter, 2025);
        let s = Term::new(Season::Summer, 2025);
        let f = Term::new(Season::Fall, 2025);
        let fw = Term::fall_winter(2025);
        let next_w = Term::new(Season::Winter, 2026);
        assert!(w < s && s < f && f < fw && fw < next_w);
        assert!(Term::new(Season::Fall, 2024) < w);
        assert_eq!(w.cmp(&w), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_next_term_cycle() {
        let fall = Term::new(Season::Fall, 2025);
        assert_eq!(fall.next(), Term::new(Season::Winter, 2026));
        assert_eq!(fall.next().next(), Term::new(Season::Summer, 2026));
        assert_eq!(fall.advance(3), Term::new(Season::Fall, 2026));
        assert_eq!(Term::fall_winter(2025).next(), Term::new(Season::Summer, 2026));
        assert!(fall.next() > fall);
    }

    #[test]
    fn test_season_date_ranges() {
        let winter = season_date_range(Season::Winter, 2025).unwrap();
        assert_eq!(winter.start, date(2025, 1, 1));
        assert_eq!(winter.end, date(2025, 5, 4));
        let summer = season_date_range(Season::Summer, 2025).unwrap();
        assert_eq!(summer.start, date(2025, 5, 5));
        assert_eq!(summer.end, date(2025, 8, 31));
        let combined = Term::fall_winter(2025).date_range().unwrap();
        assert_eq!(combined.start, date(2025, 9, 1));
        assert_eq!(combined.end, date(2026, 4, 30));
    }

    #[test]
    fn test_active_and_containing() {
        let today = date(2025, 5, 4);
        assert_eq!(Term::containing(today), Term::new(Season::Winter, 2025));
        assert_eq!(Term::containing(date(2025, 5, 5)).season(), Season::Summer);
        assert_eq!(Term::containing(date(2025, 12, 31)).season(), Season::Fall);
        assert!(Term::new(Season::Winter, 2025).is_active(today));
        assert!(!Term::new(Season::Summer, 2025).is_active(today));
        assert!(Term::new(Season::Fall, 2024).has_ended(today));
        assert!(Term::fall_winter(2024).is_active(date(2025, 2, 1)));
    }

    #[test]
    fn test_serde_as_string() {
        let term = Term::new(Season::Summer, 2026);
        let json = serde_json::to_string(&term).unwrap();
        assert_eq!(json, "\"Summer 2026\"");
        let back: Term = serde_json::from_str(&json).unwrap();
        assert_eq!(back, term);
        assert!(serde_json::from_str::<Term>("\"Sprung 2026\"").is_err());
    }
}
