use serde::{Deserialize, Serialize};

/// A day in the fortnightly grid: 1..=7 is Week 1 (Mon..Sun), 8..=14 is
/// Week 2. Kept as a plain integer, never as a two-value enum, so that a
/// day set can't accidentally lose its Week-2 half the way the original
/// implementation's `Day` enum did when a day number arrived as a bare
/// `int` instead of an enum member.
pub type DayNumber = u8;

pub const WEEKDAYS_WEEK1: [DayNumber; 5] = [1, 2, 3, 4, 5];
pub const WEEKDAYS_BOTH_WEEKS: [DayNumber; 10] = [1, 2, 3, 4, 5, 8, 9, 10, 11, 12];

/// Two-letter day tokens as they appear in Input A, e.g. `"MoWe"`.
const TOKENS: [(&str, DayNumber); 7] = [
    ("Mo", 1),
    ("Tu", 2),
    ("We", 3),
    ("Th", 4),
    ("Fr", 5),
    ("Sa", 6),
    ("Su", 7),
];

/// Parses a concatenated day-pattern string like `"MoWe"` or `"TuTh"` into
/// Week-1 day numbers. Returns both the Week-1 and Week-2 number for each
/// token, mirroring a weekly-recurring lecture meeting twice per fortnight.
pub fn parse_day_pattern(raw: &str) -> Result<Vec<DayNumber>, String> {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace() && *c != ',' && *c != '/' && *c != ';' && *c != '-').collect();
    if cleaned.is_empty() {
        return Err("day_of_week is empty".to_string());
    }
    let bytes = cleaned.as_bytes();
    if bytes.len() % 2 != 0 {
        return Err(format!("malformed day pattern '{raw}'"));
    }
    let mut days = Vec::new();
    for chunk in cleaned.as_bytes().chunks(2) {
        let token = std::str::from_utf8(chunk).unwrap();
        let base = TOKENS
            .iter()
            .find(|(t, _)| t.eq_ignore_ascii_case(token))
            .map(|(_, d)| *d)
            .ok_or_else(|| format!("invalid day token '{token}' in '{raw}'"))?;
        days.push(base);
    }
    Ok(days)
}

/// Expands a set of Week-1 weekday numbers into their fortnight-wide
/// (Week-1, Week-2) pairs, e.g. `[2]` -> `[2, 9]`.
pub fn both_weeks(week1_days: &[DayNumber]) -> Vec<DayNumber> {
    let mut out = Vec::with_capacity(week1_days.len() * 2);
    for &d in week1_days {
        out.push(d);
        out.push(d + 7);
    }
    out
}

/// Folds any fortnight day number back onto its Week-1 weekday (1..=7),
/// used when emitting the weekly boolean day-of-week flags in Output D.
pub fn week1_weekday(day: DayNumber) -> DayNumber {
    if day > 7 {
        day - 7
    } else {
        day
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Fall,
    Winter,
    Summer,
}

impl Season {
    pub fn code(self) -> u8 {
        match self {
            Season::Fall => 2,
            Season::Winter => 4,
            Season::Summer => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_day_pattern() {
        assert_eq!(parse_day_pattern("MoWe").unwrap(), vec![1, 3]);
        assert_eq!(parse_day_pattern("TuTh").unwrap(), vec![2, 4]);
    }

    #[test]
    fn rejects_unknown_token() {
        assert!(parse_day_pattern("Xx").is_err());
    }

    #[test]
    fn rejects_empty() {
        assert!(parse_day_pattern("").is_err());
    }

    #[test]
    fn both_weeks_pairs_correctly() {
        assert_eq!(both_weeks(&[2]), vec![2, 9]);
        assert_eq!(both_weeks(&[1, 3]), vec![1, 8, 3, 10]);
    }

    #[test]
    fn week1_weekday_folds_week2() {
        assert_eq!(week1_weekday(10), 3);
        assert_eq!(week1_weekday(3), 3);
    }
}
