//! Vampirism - the supernatural affliction built in code rather than from data.
//!
//! Components, in tick order:
//! 1. blood pool (`vampirism_blood`), when blood is enabled
//! 2. sunlight damage (`vampirism_sun_damage`)
//! 3. night bonus (`vampirism_night_bonus`), when enabled
//! 4. blood hunger (`vampirism_blood_hunger`), when blood and hunger are enabled
//!
//! Feeding happens outside the tick loop, see [`Feeder`].

mod blood;
mod feeding;
mod hunger;
mod night_bonus;
mod sunlight;

pub use blood::*;
pub use feeding::*;
pub use hunger::*;
pub use night_bonus::*;
pub use sunlight::*;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{error, info, warn};
use world_host::CreatureKind;

use crate::affliction::{AfflictionCategory, AfflictionDefinition, DefinitionSpec, PoolSpec};
use crate::assembly::{strip_markup, DisplayConfig};
use crate::engine::AfflictionEngine;
use crate::error::Result;
use crate::resource::BLOOD_KEY;

pub const VAMPIRISM_ID: &str = "vampirism";

/// Notification keys sent to the afflicted entity.
pub mod notices {
    pub const SUN_WARNING: &str = "vampirism.sun-warning";
    pub const SUN_BURNING: &str = "vampirism.sun-burning";
    pub const NIGHT_FALLS: &str = "vampirism.night-falls";
    pub const DAWN_APPROACHES: &str = "vampirism.dawn-approaches";
    pub const HUNGER_START: &str = "vampirism.hunger-start";
    pub const HUNGER_END: &str = "vampirism.hunger-end";
    pub const FEEDING: &str = "vampirism.feeding";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VampirismConfig {
    pub display: DisplayConfig,
    pub enabled: bool,
    pub max_level: u32,
    pub curable: bool,
    pub level_titles: BTreeMap<String, String>,
    pub blood: BloodConfig,
    pub sun_damage: SunDamageConfig,
    pub blood_hunger: BloodHungerConfig,
    pub night_bonus: NightBonusConfig,
}

impl Default for VampirismConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig {
                name: "<#c93434>Vampire".to_string(),
                affliction_name: "<#8b0000>Vampirism".to_string(),
                prefix: "<#8b0000>[<#c93434>V<#8b0000>] ".to_string(),
                description: "A dark curse that burns in sunlight but grants power in darkness.".to_string(),
            },
            enabled: true,
            max_level: 5,
            curable: true,
            level_titles: BTreeMap::new(),
            blood: BloodConfig::default(),
            sun_damage: SunDamageConfig::default(),
            blood_hunger: BloodHungerConfig::default(),
            night_bonus: NightBonusConfig::default(),
        }
    }
}

impl VampirismConfig {
    /// Parse and validate. Out-of-range values are replaced by defaults with a warning.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: VampirismConfig = toml::from_str(source)?;
        Ok(config.validated())
    }

    /// Replace values that cannot build a definition by their defaults.
    pub fn validated(mut self) -> Self {
        let defaults = VampirismConfig::default();
        if self.max_level == 0 {
            warn!(max_level = self.max_level, "invalid vampirism max_level, using {}", defaults.max_level);
            self.max_level = defaults.max_level;
        }

        let blood = &mut self.blood;
        if !(blood.max_blood.is_finite() && blood.max_blood > 0.0) {
            warn!(
                max_blood = blood.max_blood,
                "invalid max_blood, using {}", defaults.blood.max_blood
            );
            blood.max_blood = defaults.blood.max_blood;
        }
        let start = if blood.start_blood.is_nan() { 0.0 } else { blood.start_blood };
        let start = start.clamp(0.0, blood.max_blood);
        if start != blood.start_blood {
            warn!(
                start_blood = blood.start_blood,
                max_blood = blood.max_blood,
                "start_blood out of range, using {start}"
            );
            blood.start_blood = start;
        }
        self
    }

    pub fn level_title(&self, level: u32) -> Option<&str> {
        self.level_titles.get(&level.to_string()).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloodConfig {
    pub enabled: bool,
    pub max_blood: f64,
    pub start_blood: f64,
    /// Blood gained per point of damage dealt to a valid source.
    pub gain_per_damage: f64,
    /// Drained every blood tick.
    pub passive_drain: f64,
    /// Drained every tick spent burning in the sun.
    pub sun_drain: f64,
    /// Sun damage multiplier while the pool is empty.
    pub empty_sun_multiplier: f64,
    pub sources: BloodSourcesConfig,
}

impl Default for BloodConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_blood: 100.0,
            start_blood: 50.0,
            gain_per_damage: 2.0,
            passive_drain: 0.1,
            sun_drain: 0.5,
            empty_sun_multiplier: 2.0,
            sources: BloodSourcesConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Every creature except the listed ones.
    #[default]
    Blacklist,
    /// Only the listed creatures.
    Whitelist,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloodSourcesConfig {
    pub enabled: bool,
    pub mode: SourceMode,
    /// Creature kind names; unknown names are ignored with a warning.
    pub entities: Vec<String>,
}

impl Default for BloodSourcesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: SourceMode::Blacklist,
            entities: Vec::new(),
        }
    }
}

impl BloodSourcesConfig {
    /// The listed kinds that parse.
    pub fn kinds(&self) -> HashSet<CreatureKind> {
        self.entities
            .iter()
            .filter_map(|name| match name.parse() {
                Ok(kind) => Some(kind),
                Err(err) => {
                    warn!(error = %err, "ignoring blood source entry");
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunDamageConfig {
    pub enabled: bool,
    pub base_damage: f64,
    pub tick_interval: u64,
    /// Rain and thunder block the sun.
    pub weather_protection: bool,
    /// Fraction of damage a helmet absorbs.
    pub helmet_reduction: f64,
    pub minimum_damage: f64,
    pub fire_ticks: u32,
    pub grace_period: GracePeriodConfig,
}

impl Default for SunDamageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_damage: 2.0,
            tick_interval: 1,
            weather_protection: true,
            helmet_reduction: 0.5,
            minimum_damage: 0.5,
            fire_ticks: 40,
            grace_period: GracePeriodConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GracePeriodConfig {
    pub enabled: bool,
    pub base_seconds: f64,
    pub level_scaling: f64,
    /// Smoke particles per tick while in grace; 0 disables them.
    pub warning_particles: u32,
}

impl Default for GracePeriodConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_seconds: 3.0,
            level_scaling: 1.0,
            warning_particles: 5,
        }
    }
}

/// One optional timed effect of a bonus or penalty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostConfig {
    pub enabled: bool,
    pub base_amplifier: i32,
    pub scaling: f64,
}

impl BoostConfig {
    pub fn new(enabled: bool, base_amplifier: i32, scaling: f64) -> Self {
        Self {
            enabled,
            base_amplifier,
            scaling,
        }
    }

    pub(crate) fn when_enabled(self) -> Option<Self> {
        self.enabled.then_some(self)
    }
}

/// A boost written out in a document is on unless it says otherwise.
impl Default for BoostConfig {
    fn default() -> Self {
        Self::new(true, 0, 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloodHungerConfig {
    pub enabled: bool,
    pub tick_interval: u64,
    /// Blood percentage at or below which hunger sets in.
    pub threshold: f64,
    /// `scaling` is the extra amplifier at full severity.
    pub slowness: BoostConfig,
    pub weakness: BoostConfig,
}

impl Default for BloodHungerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tick_interval: 1,
            threshold: 20.0,
            slowness: BoostConfig::new(true, 0, 2.0),
            weakness: BoostConfig::new(true, 0, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NightBonusConfig {
    pub enabled: bool,
    pub tick_interval: u64,
    /// `scaling` is the extra amplifier per level above the first.
    pub speed: BoostConfig,
    pub strength: BoostConfig,
    pub jump: BoostConfig,
    pub night_vision: bool,
}

impl Default for NightBonusConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tick_interval: 1,
            speed: BoostConfig::new(true, 0, 0.25),
            strength: BoostConfig::new(false, 0, 0.25),
            jump: BoostConfig::new(false, 0, 0.25),
            night_vision: true,
        }
    }
}

/// Build the vampirism definition from its configuration.
pub fn build_vampirism(config: &VampirismConfig) -> Result<AfflictionDefinition> {
    let config = &config.clone().validated();
    let blood = &config.blood;
    let mut spec = DefinitionSpec::new(
        VAMPIRISM_ID,
        display_name(&config.display),
        AfflictionCategory::Supernatural,
        config.max_level,
    );
    spec.description = config.display.description.clone();
    spec.curable = config.curable;

    if blood.enabled {
        spec.pools.push(PoolSpec::new(BLOOD_KEY, blood.max_blood, blood.start_blood));
        spec.components.push(BloodPool::from_config(blood).into_component("vampirism_blood"));
    }

    if config.sun_damage.enabled {
        let sunlight = SunlightDamage::from_config(&config.sun_damage, blood);
        spec.components.push(sunlight.into_component("vampirism_sun_damage"));
    }

    if config.night_bonus.enabled {
        let night = NightBonus::from_config(&config.night_bonus);
        spec.components.push(night.into_component("vampirism_night_bonus"));
    }

    if blood.enabled && config.blood_hunger.enabled {
        let hunger = BloodHunger::from_config(&config.blood_hunger, blood.max_blood);
        spec.components.push(hunger.into_component("vampirism_blood_hunger"));
    }

    AfflictionDefinition::new(spec)
}

/// Build and register vampirism unless it is disabled. Failures are logged.
pub fn register_vampirism(engine: &AfflictionEngine, config: &VampirismConfig) -> Option<Arc<AfflictionDefinition>> {
    if !config.enabled {
        info!("vampirism disabled, not registering");
        return None;
    }
    match build_vampirism(config).and_then(|definition| engine.register(definition)) {
        Ok(definition) => Some(definition),
        Err(err) => {
            error!(error = %err, "failed to register vampirism");
            None
        }
    }
}

fn display_name(display: &DisplayConfig) -> String {
    let name = strip_markup(&display.affliction_name);
    if name.is_empty() {
        "Vampirism".to_string()
    } else {
        name
    }
}
