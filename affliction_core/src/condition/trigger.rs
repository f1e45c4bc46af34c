//! Named triggers as they appear in affliction configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;
use world_host::Dimension;

use super::Condition;

/// The trigger of a data-driven affliction: a named condition, optionally inverted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub inverted: bool,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            kind: "always".to_string(),
            inverted: false,
        }
    }
}

impl TriggerConfig {
    pub fn of(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            inverted: false,
        }
    }

    pub fn invert(mut self) -> Self {
        self.inverted = !self.inverted;
        self
    }

    /// Literally `always` and not inverted. Components under such a trigger are not wrapped.
    pub fn is_unconditional(&self) -> bool {
        self.kind.trim().eq_ignore_ascii_case("always") && !self.inverted
    }

    /// Resolve to a condition. Unknown names fall back to [`Condition::Always`].
    pub fn to_condition(&self) -> Condition {
        let condition = match named_condition(&self.kind) {
            Some(condition) => condition,
            None => {
                warn!(trigger = %self.kind, "unknown trigger type, treating as always");
                Condition::Always
            }
        };
        if self.inverted {
            condition.negate()
        } else {
            condition
        }
    }
}

/// Look up a trigger name (case-insensitive).
pub fn named_condition(name: &str) -> Option<Condition> {
    let condition = match name.trim().to_ascii_lowercase().as_str() {
        "always" => Condition::Always,
        "never" => Condition::Never,

        "day" => Condition::Day,
        "night" => Condition::Night,

        "full_moon" => Condition::FullMoon,
        "new_moon" => Condition::NewMoon,
        "bright_moon" => Condition::BrightMoon,
        "dark_moon" => Condition::DarkMoon,
        "full_moon_night" => Condition::full_moon_night(),
        "bright_moon_night" => Condition::bright_moon_night(),

        "sunlight" => Condition::sunlight(),
        "underground" | "under_cover" => Condition::under_cover(),
        "sky_access" => Condition::SkyAccess,
        "protected_from_sun" => Condition::protected_from_sun(),

        "rain" | "storm" => Condition::Storm,
        "thunder" | "thunderstorm" => Condition::Thundering,
        "clear" | "clear_weather" => Condition::ClearWeather,

        "overworld" => Condition::InDimension(Dimension::Overworld),
        "nether" => Condition::InDimension(Dimension::Nether),
        "end" => Condition::InDimension(Dimension::End),

        "has_helmet" => Condition::HasHelmet,
        "no_helmet" => Condition::no_helmet(),

        _ => return None,
    };
    Some(condition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve_to_same_condition() {
        assert_eq!(named_condition("underground"), named_condition("under_cover"));
        assert_eq!(named_condition("RAIN"), Some(Condition::Storm));
        assert_eq!(named_condition("thunderstorm"), Some(Condition::Thundering));
        assert_eq!(
            named_condition("Nether"),
            Some(Condition::InDimension(Dimension::Nether))
        );
        assert!(named_condition("eclipse").is_none());
    }

    #[test]
    fn test_unknown_trigger_degrades_to_always() {
        let trigger = TriggerConfig::of("eclipse");
        assert_eq!(trigger.to_condition(), Condition::Always);
        assert!(!trigger.is_unconditional());
    }

    #[test]
    fn test_inverted_trigger() {
        let trigger = TriggerConfig::of("night").invert();
        assert_eq!(trigger.to_condition(), Condition::Night.negate());

        let inverted_always = TriggerConfig::default().invert();
        assert!(!inverted_always.is_unconditional());
        assert_eq!(inverted_always.to_condition(), Condition::Not(Box::new(Condition::Always)));
    }

    #[test]
    fn test_deserialize_trigger_section() {
        let trigger: TriggerConfig = toml::from_str("type = \"full_moon_night\"\ninverted = true").unwrap();
        assert_eq!(trigger.kind, "full_moon_night");
        assert!(trigger.inverted);

        let defaulted: TriggerConfig = toml::from_str("").unwrap();
        assert!(defaulted.is_unconditional());
    }
}
