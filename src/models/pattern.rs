//! Weekday patterns for recurring class sessions.
//!
//! Patterns arrive as dash-separated weekday codes in the local school
//! convention: `2`..`7` (or `T2`..`T7`) map Monday through Saturday and
//! `CN` is Sunday. `"2-4-6"` is Monday/Wednesday/Friday, `"3-5"` is
//! Tuesday/Thursday and `"7-CN"` is the weekend.

use chrono::Weekday;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::models::error::ScheduleError;

/// Ordered set of weekdays on which a class meets.
///
/// Always non-empty; days are kept sorted Monday first and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeekdayPattern {
    days: Vec<Weekday>,
}

impl WeekdayPattern {
    /// Parse a dash-separated pattern string.
    ///
    /// Duplicate days collapse to one; an empty string or an unknown
    /// token fails the whole pattern.
    pub fn parse(input: &str) -> Result<Self, ScheduleError> {
        let invalid = || ScheduleError::InvalidPattern {
            input: input.to_string(),
        };

        // split always yields at least one token and empty tokens fail,
        // so a parsed pattern is never empty
        let mut days = Vec::new();
        for token in input.split('-') {
            let day = parse_day_token(token.trim()).ok_or_else(invalid)?;
            days.push(day);
        }

        days.sort_by_key(|d| d.number_from_monday());
        days.dedup();
        Ok(Self { days })
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }

    /// Days in ascending Monday-first order.
    pub fn days(&self) -> &[Weekday] {
        &self.days
    }

    /// Number of sessions per week.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of weekdays present in exactly one of the two patterns.
    ///
    /// `"2-4-6"` vs `"3-5-7"` is 6; `"2-4-6"` vs `"2-4"` is 1.
    pub fn distance(&self, other: &Self) -> usize {
        let only_here = self.days.iter().filter(|d| !other.contains(**d)).count();
        let only_there = other.days.iter().filter(|d| !self.contains(**d)).count();
        only_here + only_there
    }
}

impl fmt::Display for WeekdayPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, day) in self.days.iter().enumerate() {
            if i > 0 {
                write!(f, "-")?;
            }
            f.write_str(format_day_token(*day))?;
        }
        Ok(())
    }
}

// Patterns travel as their string form on the wire.
impl Serialize for WeekdayPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WeekdayPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        WeekdayPattern::parse(&raw).map_err(de::Error::custom)
    }
}

fn parse_day_token(token: &str) -> Option<Weekday> {
    match token.to_ascii_uppercase().as_str() {
        "2" | "T2" => Some(Weekday::Mon),
        "3" | "T3" => Some(Weekday::Tue),
        "4" | "T4" => Some(Weekday::Wed),
        "5" | "T5" => Some(Weekday::Thu),
        "6" | "T6" => Some(Weekday::Fri),
        "7" | "T7" => Some(Weekday::Sat),
        "CN" => Some(Weekday::Sun),
        _ => None,
    }
}

fn format_day_token(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "T2",
        Weekday::Tue => "T3",
        Weekday::Wed => "T4",
        Weekday::Thu => "T5",
        Weekday::Fri => "T6",
        Weekday::Sat => "T7",
        Weekday::Sun => "CN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_pattern() {
        let p = WeekdayPattern::parse("2-4-6").unwrap();
        assert_eq!(p.days(), &[Weekday::Mon, Weekday::Wed, Weekday::Fri]);
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn test_parse_prefixed_pattern() {
        let p = WeekdayPattern::parse("T2-T4-T6").unwrap();
        assert_eq!(p.days(), &[Weekday::Mon, Weekday::Wed, Weekday::Fri]);
    }

    #[test]
    fn test_parse_weekend_pattern() {
        let p = WeekdayPattern::parse("7-CN").unwrap();
        assert_eq!(p.days(), &[Weekday::Sat, Weekday::Sun]);
    }

    #[test]
    fn test_parse_sorts_and_dedupes() {
        let p = WeekdayPattern::parse("6-2-4-2").unwrap();
        assert_eq!(p.days(), &[Weekday::Mon, Weekday::Wed, Weekday::Fri]);
    }

    #[test]
    fn test_parse_case_insensitive() {
        let p = WeekdayPattern::parse("t3-t5").unwrap();
        assert_eq!(p.days(), &[Weekday::Tue, Weekday::Thu]);
        let weekend = WeekdayPattern::parse("cn").unwrap();
        assert_eq!(weekend.days(), &[Weekday::Sun]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(WeekdayPattern::parse("").is_err());
        assert!(WeekdayPattern::parse("1-3").is_err());
        assert!(WeekdayPattern::parse("2-4-9").is_err());
        assert!(WeekdayPattern::parse("Mon-Wed").is_err());
        assert!(WeekdayPattern::parse("2--4").is_err());
    }

    #[test]
    fn test_display_canonical_form() {
        assert_eq!(WeekdayPattern::parse("2-4-6").unwrap().to_string(), "T2-T4-T6");
        assert_eq!(WeekdayPattern::parse("cn-7").unwrap().to_string(), "T7-CN");
    }

    #[test]
    fn test_contains() {
        let p = WeekdayPattern::parse("3-5").unwrap();
        assert!(p.contains(Weekday::Tue));
        assert!(p.contains(Weekday::Thu));
        assert!(!p.contains(Weekday::Mon));
    }

    #[test]
    fn test_distance_symmetric_difference() {
        let mwf = WeekdayPattern::parse("2-4-6").unwrap();
        let tts = WeekdayPattern::parse("3-5-7").unwrap();
        let mw = WeekdayPattern::parse("2-4").unwrap();

        assert_eq!(mwf.distance(&tts), 6);
        assert_eq!(mwf.distance(&mw), 1);
        assert_eq!(mwf.distance(&mwf), 0);
        assert_eq!(mw.distance(&mwf), 1);
    }

    #[test]
    fn test_serde_round_trips_as_string() {
        let p = WeekdayPattern::parse("2-4-6").unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"T2-T4-T6\"");

        let back: WeekdayPattern = serde_json::from_str("\"3-5\"").unwrap();
        assert_eq!(back.days(), &[Weekday::Tue, Weekday::Thu]);

        assert!(serde_json::from_str::<WeekdayPattern>("\"8-9\"").is_err());
    }
}
