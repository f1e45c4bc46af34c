//! World state - clock, weather, moon and the per-entity environment snapshot.

mod simulated;

pub use simulated::*;

use serde::{Deserialize, Serialize};

/// World time tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WorldTime {
    pub day: u32,
    pub hour: u8,
    pub minute: u8,
}

impl WorldTime {
    /// Create a new world time.
    pub fn new(day: u32, hour: u8, minute: u8) -> Self {
        Self { day, hour, minute }
    }

    /// Check if it's currently night.
    pub fn is_night(&self) -> bool {
        self.hour < 6 || self.hour >= 20
    }

    pub fn is_day(&self) -> bool {
        !self.is_night()
    }

    /// Moon phase of the current day; the cycle repeats every eight days.
    pub fn moon_phase(&self) -> MoonPhase {
        MoonPhase::from_day(self.day)
    }

    /// Advance time by given minutes.
    pub fn advance_time(&mut self, minutes: u32) {
        let total_minutes = self.minute as u32 + minutes;
        self.minute = (total_minutes % 60) as u8;

        let hours_passed = total_minutes / 60;
        let total_hours = self.hour as u32 + hours_passed;
        self.hour = (total_hours % 24) as u8;

        self.day += total_hours / 24;
    }
}

/// Phases of the moon, in cycle order starting at full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MoonPhase {
    #[default]
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
}

impl MoonPhase {
    const CYCLE: [MoonPhase; 8] = [
        MoonPhase::Full,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
        MoonPhase::New,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
    ];

    pub fn from_day(day: u32) -> Self {
        Self::CYCLE[(day % 8) as usize]
    }

    /// Full or gibbous.
    pub fn is_bright(&self) -> bool {
        matches!(
            self,
            MoonPhase::Full | MoonPhase::WaningGibbous | MoonPhase::WaxingGibbous
        )
    }

    /// New or crescent.
    pub fn is_dark(&self) -> bool {
        matches!(
            self,
            MoonPhase::New | MoonPhase::WaningCrescent | MoonPhase::WaxingCrescent
        )
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MoonPhase::Full => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
            MoonPhase::New => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
        }
    }
}

/// Weather conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Thunder,
}

impl Weather {
    /// Rain or thunder.
    pub fn has_storm(&self) -> bool {
        !matches!(self, Weather::Clear)
    }
}

/// Dimensions (realms) an entity can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Dimension {
    #[default]
    Overworld,
    Nether,
    End,
}

/// Everything environmental a condition may ask about one entity, captured at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surroundings {
    pub is_day: bool,
    pub moon_phase: MoonPhase,
    pub weather: Weather,
    pub dimension: Dimension,
    pub sky_access: bool,
    pub has_helmet: bool,
}

impl Surroundings {
    pub fn is_night(&self) -> bool {
        !self.is_day
    }
}
