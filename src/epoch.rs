//! Epoch marker parsing
use crate::error::ParsingError;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Modern (V3+) observation epochs are delimited by this marker
pub const EPOCH_MARKER: char = '>';

/// [Epoch] described by an epoch marker line, in whole seconds.
/// Fractional seconds are truncated on parsing, this conversion is lossy
/// on purpose: all records of an epoch share the same integer second.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Epoch {
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl Epoch {
    /// Builds a new [Epoch], returns None if this is not a valid
    /// gregorian date and time of day.
    pub fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Option<Self> {
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        hifitime::Epoch::maybe_from_gregorian_utc(year, month, day, hour, minute, second, 0)
            .ok()?;
        Some(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }
    pub fn year(&self) -> i32 {
        self.year
    }
    pub fn month(&self) -> u8 {
        self.month
    }
    pub fn day(&self) -> u8 {
        self.day
    }
    pub fn hour(&self) -> u8 {
        self.hour
    }
    pub fn minute(&self) -> u8 {
        self.minute
    }
    pub fn second(&self) -> u8 {
        self.second
    }
    /// Elapsed seconds since midnight
    pub fn seconds_of_day(&self) -> f64 {
        (self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32) as f64
    }
    /// Converts to [hifitime::Epoch], interpreting self as UTC datetime
    pub fn to_utc(&self) -> hifitime::Epoch {
        hifitime::Epoch::from_gregorian_utc(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            0,
        )
    }
}

impl std::fmt::Display for Epoch {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

impl FromStr for Epoch {
    type Err = ParsingError;
    /// Parses an epoch marker line like
    /// "> 2024 02 14 04 19 08.0000000  0  8".
    /// First token is the marker itself and is not interpreted.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let error = |reason: &'static str| ParsingError::EpochParseError {
            line: line.to_string(),
            reason,
        };

        let items = line.split_whitespace().collect::<Vec<_>>();
        if items.len() < 7 {
            return Err(error("expecting \"> yyyy mm dd hh mm ss.sssssss\" format"));
        }

        let year = items[1]
            .parse::<i32>()
            .map_err(|_| error("invalid year"))?;
        let month = items[2]
            .parse::<u8>()
            .map_err(|_| error("invalid month"))?;
        let day = items[3].parse::<u8>().map_err(|_| error("invalid day"))?;
        let hour = items[4]
            .parse::<u8>()
            .map_err(|_| error("invalid hours"))?;
        let minute = items[5]
            .parse::<u8>()
            .map_err(|_| error("invalid minutes"))?;

        let seconds = items[6]
            .parse::<f64>()
            .map_err(|_| error("invalid seconds"))?;
        if !(0.0..60.0).contains(&seconds) {
            return Err(error("seconds out of range"));
        }

        // truncation: fractional seconds are dropped
        let second = seconds.trunc() as u8;

        Self::new(year, month, day, hour, minute, second)
            .ok_or_else(|| error("invalid gregorian datetime"))
    }
}
