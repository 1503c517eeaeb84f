//! Time and battery inputs to template evaluation.
//!
//! Both are capabilities injected at session construction so that
//! evaluation itself stays a pure function of a [`Sample`].

use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use std::str::FromStr;
use std::sync::Arc;

/// Broken-down local time, the way a wall clock reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSample {
    pub year: i32,
    /// 1–12.
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// 0 = Monday … 6 = Sunday.
    pub weekday: u32,
}

impl TimeSample {
    pub fn from_datetime<T: Datelike + Timelike>(dt: &T) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
            weekday: dt.weekday().num_days_from_monday(),
        }
    }

    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    /// Build a sample from a calendar date/time, deriving the weekday.
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<Self> {
        let dt: NaiveDateTime = chrono::NaiveDate::from_ymd_opt(year, month, day)?
            .and_hms_opt(hour, minute, second)?;
        Some(Self::from_datetime(&dt))
    }
}

/// Parses the tuple form `YYYY,MM,DD,hh,mm,ss,weekday` used by preview tooling.
///
/// The weekday field is optional; when omitted it is derived from the date.
impl FromStr for TimeSample {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')')
            .split(',')
            .map(|p| p.trim().parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid time tuple {s:?}: {e}"))?;

        let field = |i: usize| u32::try_from(parts[i]).map_err(|_| format!("field {i} out of range"));
        match parts.len() {
            6 | 7 => {
                let year = i32::try_from(parts[0]).map_err(|_| "year out of range".to_string())?;
                let mut sample =
                    Self::from_ymd_hms(year, field(1)?, field(2)?, field(3)?, field(4)?, field(5)?)
                        .ok_or_else(|| format!("invalid date/time {s:?}"))?;
                if parts.len() == 7 {
                    let weekday = field(6)?;
                    if weekday > 6 {
                        return Err(format!("weekday {weekday} out of range 0..=6"));
                    }
                    sample.weekday = weekday;
                }
                Ok(sample)
            }
            n => Err(format!("time tuple needs 6 or 7 fields, got {n}")),
        }
    }
}

/// Everything a template may depend on, captured once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub time: TimeSample,
    /// `None` when no battery gauge is available.
    pub battery_percent: Option<u8>,
}

/// Source of the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> TimeSample;
}

/// Wall clock backed by the system's local timezone.
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> TimeSample {
        TimeSample::now()
    }
}

/// Clock frozen at one instant (previews and tests).
pub struct FixedClock(pub TimeSample);

impl Clock for FixedClock {
    fn now(&self) -> TimeSample {
        self.0
    }
}

/// Battery/power module capability.
pub trait BatteryGauge: Send + Sync {
    /// Charge level 0–100, or `None` if unreadable.
    fn battery_percent(&self) -> Option<u8>;
}

/// Gauge reporting a constant level (previews and tests).
pub struct FixedBattery(pub u8);

impl BatteryGauge for FixedBattery {
    fn battery_percent(&self) -> Option<u8> {
        Some(self.0)
    }
}

/// Captures [`Sample`]s from the injected clock and optional battery gauge.
#[derive(Clone)]
pub struct Sampler {
    clock: Arc<dyn Clock>,
    battery: Option<Arc<dyn BatteryGauge>>,
}

impl Sampler {
    pub fn new(clock: Arc<dyn Clock>, battery: Option<Arc<dyn BatteryGauge>>) -> Self {
        Self { clock, battery }
    }

    pub fn sample(&self) -> Sample {
        Sample {
            time: self.clock.now(),
            battery_percent: self.battery.as_ref().and_then(|b| b.battery_percent()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_monday_is_zero() {
        // 2023-01-02 was a Monday
        let s = TimeSample::from_ymd_hms(2023, 1, 2, 10, 8, 5).unwrap();
        assert_eq!(s.weekday, 0);
        assert_eq!((s.year, s.month, s.day), (2023, 1, 2));
        assert_eq!((s.hour, s.minute, s.second), (10, 8, 5));
    }

    #[test]
    fn test_parse_tuple_with_weekday() {
        let s: TimeSample = "(2023, 1, 2, 10, 8, 0, 4)".parse().unwrap();
        assert_eq!(s.weekday, 4);
        assert_eq!(s.day, 2);
    }

    #[test]
    fn test_parse_tuple_derives_weekday() {
        let s: TimeSample = "2024,12,29,23,59,59".parse().unwrap();
        assert_eq!(s.weekday, 6);
    }

    #[test]
    fn test_parse_tuple_rejects_bad_input() {
        assert!("2023,13,1,0,0,0".parse::<TimeSample>().is_err());
        assert!("2023,1,1".parse::<TimeSample>().is_err());
        assert!("2023,1,1,0,0,0,7".parse::<TimeSample>().is_err());
        assert!("a,b,c,d,e,f".parse::<TimeSample>().is_err());
    }

    #[test]
    fn test_sampler_without_battery() {
        let t = TimeSample::from_ymd_hms(2020, 2, 29, 0, 0, 0).unwrap();
        let sampler = Sampler::new(Arc::new(FixedClock(t)), None);
        let s = sampler.sample();
        assert_eq!(s.time, t);
        assert_eq!(s.battery_percent, None);
    }

    #[test]
    fn test_sampler_with_battery() {
        let t = TimeSample::from_ymd_hms(2020, 2, 29, 0, 0, 0).unwrap();
        let sampler = Sampler::new(Arc::new(FixedClock(t)), Some(Arc::new(FixedBattery(87))));
        assert_eq!(sampler.sample().battery_percent, Some(87));
    }
}
