//! Deployment time slots.
//!
//! A slot is a one or two hour window starting on the hour. The set is closed:
//! 24 one-hour windows (`00:00-01:00` .. `23:00-00:00`) and 23 two-hour
//! windows (`00:00-02:00` .. `22:00-00:00`), so no window crosses into the
//! next day except by ending exactly at midnight.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Window length
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SlotLength {
    OneHour,
    TwoHours,
}

impl SlotLength {
    pub fn hours(self) -> u8 {
        match self {
            SlotLength::OneHour => 1,
            SlotLength::TwoHours => 2,
        }
    }
}

/// A deployment window, displayed as `HH:00-HH:00`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot {
    start_hour: u8,
    length: SlotLength,
}

impl TimeSlot {
    /// Build a slot, `None` if the window would run past midnight
    pub fn new(start_hour: u8, length: SlotLength) -> Option<Self> {
        if start_hour + length.hours() > 24 {
            return None;
        }
        Some(Self { start_hour, length })
    }

    /// Every valid slot, ordered by start hour then length
    pub fn all() -> Vec<TimeSlot> {
        (0..24u8)
            .flat_map(|hour| {
                [SlotLength::OneHour, SlotLength::TwoHours]
                    .into_iter()
                    .filter_map(move |length| TimeSlot::new(hour, length))
            })
            .collect()
    }

    pub fn start_hour(&self) -> u8 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u8 {
        (self.start_hour + self.length.hours()) % 24
    }

    pub fn length(&self) -> SlotLength {
        self.length
    }

    pub fn label(&self) -> String {
        format!("{:02}:00-{:02}:00", self.start_hour, self.end_hour())
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        TimeSlot::all()
            .into_iter()
            .find(|slot| slot.label() == label)
            .ok_or_else(|| format!("Unknown time slot: {}", label))
    }
}

impl Serialize for TimeSlot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
