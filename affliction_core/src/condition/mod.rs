//! Conditions - pure predicates over an entity's surroundings.

mod trigger;

pub use trigger::*;

use serde::{Deserialize, Serialize};
use world_host::{Dimension, EntityId, GameHost, MoonPhase, Surroundings, Weather};

/// A data-only predicate tree. Conditions hold no state of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    Always,
    Never,
    Day,
    Night,
    FullMoon,
    NewMoon,
    /// Full or gibbous.
    BrightMoon,
    /// New or crescent.
    DarkMoon,
    SkyAccess,
    /// Rain or thunder.
    Storm,
    Thundering,
    ClearWeather,
    InDimension(Dimension),
    HasHelmet,
    Not(Box<Condition>),
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

impl Condition {
    /// Day, under open sky, in clear weather.
    pub fn sunlight() -> Self {
        Condition::All(vec![Condition::Day, Condition::SkyAccess, Condition::ClearWeather])
    }

    pub fn under_cover() -> Self {
        Condition::SkyAccess.negate()
    }

    pub fn protected_from_sun() -> Self {
        Condition::sunlight().negate()
    }

    pub fn full_moon_night() -> Self {
        Condition::Night.and(Condition::FullMoon)
    }

    pub fn bright_moon_night() -> Self {
        Condition::Night.and(Condition::BrightMoon)
    }

    pub fn no_helmet() -> Self {
        Condition::HasHelmet.negate()
    }

    pub fn and(self, other: Condition) -> Self {
        match self {
            Condition::All(mut parts) => {
                parts.push(other);
                Condition::All(parts)
            }
            first => Condition::All(vec![first, other]),
        }
    }

    pub fn or(self, other: Condition) -> Self {
        match self {
            Condition::Any(mut parts) => {
                parts.push(other);
                Condition::Any(parts)
            }
            first => Condition::Any(vec![first, other]),
        }
    }

    pub fn negate(self) -> Self {
        match self {
            Condition::Not(inner) => *inner,
            other => Condition::Not(Box::new(other)),
        }
    }

    /// Evaluate against a snapshot. An absent entity (`None`) only satisfies `Always`.
    pub fn test(&self, surroundings: Option<&Surroundings>) -> bool {
        let Some(env) = surroundings else {
            return matches!(self, Condition::Always);
        };

        match self {
            Condition::Always => true,
            Condition::Never => false,
            Condition::Day => env.is_day,
            Condition::Night => env.is_night(),
            Condition::FullMoon => env.moon_phase == MoonPhase::Full,
            Condition::NewMoon => env.moon_phase == MoonPhase::New,
            Condition::BrightMoon => env.moon_phase.is_bright(),
            Condition::DarkMoon => env.moon_phase.is_dark(),
            Condition::SkyAccess => env.sky_access,
            Condition::Storm => env.weather.has_storm(),
            Condition::Thundering => env.weather == Weather::Thunder,
            Condition::ClearWeather => env.weather == Weather::Clear,
            Condition::InDimension(dimension) => env.dimension == *dimension,
            Condition::HasHelmet => env.has_helmet,
            Condition::Not(inner) => !inner.test(Some(env)),
            Condition::All(parts) => parts.iter().all(|c| c.test(Some(env))),
            Condition::Any(parts) => parts.iter().any(|c| c.test(Some(env))),
        }
    }

    /// Evaluate for a live entity.
    pub fn holds(&self, host: &dyn GameHost, entity: EntityId) -> bool {
        self.test(host.surroundings(entity).as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noon() -> Surroundings {
        Surroundings {
            is_day: true,
            moon_phase: MoonPhase::Full,
            weather: Weather::Clear,
            dimension: Dimension::Overworld,
            sky_access: true,
            has_helmet: false,
        }
    }

    #[test]
    fn test_sunlight_needs_sky_and_clear_weather() {
        let mut env = noon();
        assert!(Condition::sunlight().test(Some(&env)));

        env.weather = Weather::Rain;
        assert!(!Condition::sunlight().test(Some(&env)));
        assert!(Condition::protected_from_sun().test(Some(&env)));

        env.weather = Weather::Clear;
        env.sky_access = false;
        assert!(!Condition::sunlight().test(Some(&env)));
        assert!(Condition::under_cover().test(Some(&env)));
    }

    #[test]
    fn test_moon_nights() {
        let mut env = noon();
        env.is_day = false;
        assert!(Condition::full_moon_night().test(Some(&env)));

        env.moon_phase = MoonPhase::WaxingGibbous;
        assert!(!Condition::full_moon_night().test(Some(&env)));
        assert!(Condition::bright_moon_night().test(Some(&env)));

        env.moon_phase = MoonPhase::WaningCrescent;
        assert!(Condition::DarkMoon.test(Some(&env)));
    }

    #[test]
    fn test_absent_entity_only_passes_always() {
        assert!(Condition::Always.test(None));
        assert!(!Condition::Never.test(None));
        assert!(!Condition::Day.negate().test(None));
        assert!(!Condition::no_helmet().test(None));
    }

    #[test]
    fn test_combinators() {
        let env = noon();
        let either = Condition::Night.or(Condition::HasHelmet).or(Condition::Day);
        assert!(matches!(&either, Condition::Any(parts) if parts.len() == 3));
        assert!(either.test(Some(&env)));

        assert_eq!(Condition::Day.negate().negate(), Condition::Day);
        assert!(!Condition::InDimension(Dimension::Nether).test(Some(&env)));
        assert!(Condition::Storm.negate().test(Some(&env)));
    }
}
