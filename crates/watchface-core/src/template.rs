//! Label template evaluation.
//!
//! A template is free text containing zero or more `{token}` placeholders.
//! Every occurrence of a known token is replaced; anything else, including
//! unknown `{...}` sequences, passes through verbatim.

use crate::sample::Sample;

const WEEK_DAYS: [&str; 7] = [
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];
const WEEK_DAYS_SHORT: [&str; 7] = ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
const MONTHS_SHORT: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// A placeholder kind recognised in label templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    DayName,
    DayShort,
    MonthName,
    MonthShort,
    BatteryPercent,
}

impl Token {
    pub const ALL: [Token; 11] = [
        Token::Year,
        Token::Month,
        Token::Day,
        Token::Hour,
        Token::Minute,
        Token::Second,
        Token::DayName,
        Token::DayShort,
        Token::MonthName,
        Token::MonthShort,
        Token::BatteryPercent,
    ];

    /// The literal placeholder text, braces included.
    pub const fn literal(self) -> &'static str {
        match self {
            Token::Year => "{YYYY}",
            Token::Month => "{MM}",
            Token::Day => "{DD}",
            Token::Hour => "{HH}",
            Token::Minute => "{mm}",
            Token::Second => "{ss}",
            Token::DayName => "{day}",
            Token::DayShort => "{day_short}",
            Token::MonthName => "{month}",
            Token::MonthShort => "{month_short}",
            Token::BatteryPercent => "{battery_percent}",
        }
    }

    /// Resolve this token against a sample.
    ///
    /// Out-of-range weekday/month values resolve to an empty string.
    pub fn resolve(self, sample: &Sample) -> String {
        let t = &sample.time;
        match self {
            Token::Year => format!("{:04}", t.year),
            Token::Month => format!("{:02}", t.month),
            Token::Day => format!("{:02}", t.day),
            Token::Hour => format!("{:02}", t.hour),
            Token::Minute => format!("{:02}", t.minute),
            Token::Second => format!("{:02}", t.second),
            Token::DayName => lookup(&WEEK_DAYS, t.weekday as usize),
            Token::DayShort => lookup(&WEEK_DAYS_SHORT, t.weekday as usize),
            Token::MonthName => lookup(&MONTHS, (t.month as usize).wrapping_sub(1)),
            Token::MonthShort => lookup(&MONTHS_SHORT, (t.month as usize).wrapping_sub(1)),
            Token::BatteryPercent => sample
                .battery_percent
                .map(|p| p.to_string())
                .unwrap_or_default(),
        }
    }
}

fn lookup(table: &[&str], idx: usize) -> String {
    table.get(idx).copied().unwrap_or_default().to_string()
}

/// Substitute every known token present in `template`.
pub fn evaluate(template: &str, sample: &Sample) -> String {
    let mut text = template.to_string();
    for token in Token::ALL {
        let literal = token.literal();
        if text.contains(literal) {
            text = text.replace(literal, &token.resolve(sample));
        }
    }
    text
}

/// Whether `template` contains any token. A template without one resolves
/// to itself on every tick.
pub fn is_dynamic(template: &str) -> bool {
    Token::ALL.iter().any(|t| template.contains(t.literal()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::TimeSample;

    fn sample(year: i32, month: u32, day: u32, weekday: u32) -> Sample {
        Sample {
            time: TimeSample {
                year,
                month,
                day,
                hour: 7,
                minute: 5,
                second: 9,
                weekday,
            },
            battery_percent: Some(42),
        }
    }

    #[test]
    fn test_date_tokens_zero_padded() {
        assert_eq!(evaluate("{YYYY}-{MM}-{DD}", &sample(2023, 1, 2, 0)), "2023-01-02");
    }

    #[test]
    fn test_time_tokens_zero_padded() {
        assert_eq!(evaluate("{HH}:{mm}:{ss}", &sample(2023, 1, 2, 0)), "07:05:09");
    }

    #[test]
    fn test_day_short_monday() {
        assert_eq!(evaluate("{day_short}", &sample(2023, 1, 2, 0)), "MON");
    }

    #[test]
    fn test_day_and_month_names() {
        let s = sample(2023, 12, 31, 6);
        assert_eq!(evaluate("{day}, {month} {DD}", &s), "Sunday, December 31");
        assert_eq!(evaluate("{day_short} {month_short}", &s), "SUN DEC");
    }

    #[test]
    fn test_all_occurrences_replaced() {
        assert_eq!(evaluate("{HH}{HH}-{HH}", &sample(2023, 1, 2, 0)), "0707-07");
    }

    #[test]
    fn test_unknown_tokens_pass_through() {
        assert_eq!(
            evaluate("{hh} {YYYY} {battery}", &sample(2023, 1, 2, 0)),
            "{hh} 2023 {battery}"
        );
        assert_eq!(evaluate("plain text", &sample(2023, 1, 2, 0)), "plain text");
    }

    #[test]
    fn test_case_sensitive_minutes_vs_month() {
        assert_eq!(evaluate("{MM}/{mm}", &sample(2023, 3, 2, 0)), "03/05");
    }

    #[test]
    fn test_battery_percent() {
        assert_eq!(evaluate("{battery_percent}%", &sample(2023, 1, 2, 0)), "42%");
        let mut s = sample(2023, 1, 2, 0);
        s.battery_percent = None;
        assert_eq!(evaluate("{battery_percent}%", &s), "%");
    }

    #[test]
    fn test_out_of_range_names_resolve_empty() {
        let s = sample(2023, 0, 2, 9);
        assert_eq!(evaluate("[{day}][{month_short}]", &s), "[][]");
    }

    #[test]
    fn test_is_dynamic() {
        assert!(is_dynamic("Battery {battery_percent}"));
        assert!(!is_dynamic("{hh}:{MIN}"));
    }
}
