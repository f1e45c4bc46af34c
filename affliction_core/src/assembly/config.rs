//! Curse configuration as read from a data file.
//!
//! Every field has a default, so a document only needs the parts it changes:
//!
//! ```toml
//! id = "withering"
//! max_level = 3
//!
//! [display]
//! affliction_name = "<#444444>Withering"
//!
//! [trigger]
//! type = "night"
//!
//! [[effects.potions]]
//! type = "WEAKNESS"
//! level_scaling = 1.0
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::condition::TriggerConfig;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurseConfig {
    pub id: String,
    pub display: DisplayConfig,
    pub enabled: bool,
    pub max_level: u32,
    pub duration: DurationConfig,
    /// Title per level, keyed by the level number.
    pub level_titles: BTreeMap<String, String>,
    pub trigger: TriggerConfig,
    pub effects: EffectsConfig,
    pub messages: MessageConfig,
}

impl Default for CurseConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            display: DisplayConfig::default(),
            enabled: true,
            max_level: 3,
            duration: DurationConfig::default(),
            level_titles: BTreeMap::new(),
            trigger: TriggerConfig::default(),
            effects: EffectsConfig::default(),
            messages: MessageConfig::default(),
        }
    }
}

impl CurseConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn level_title(&self, level: u32) -> Option<&str> {
        self.level_titles.get(&level.to_string()).map(String::as_str)
    }
}

/// Names as shown to players. May carry `<...>` markup tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub name: String,
    pub affliction_name: String,
    pub prefix: String,
    pub description: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            name: "<#666666>Cursed".to_string(),
            affliction_name: "<#444444>Curse".to_string(),
            prefix: "<#444444>[C] ".to_string(),
            description: "A dark curse.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DurationKind {
    #[default]
    Permanent,
    /// `base_seconds` regardless of level.
    Fixed,
    /// `base_seconds + (level - 1) * level_scaling`.
    LevelScaled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DurationConfig {
    pub kind: DurationKind,
    pub base_seconds: i64,
    pub level_scaling: f64,
}

impl DurationConfig {
    pub fn is_permanent(&self) -> bool {
        self.kind == DurationKind::Permanent || self.base_seconds <= 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EffectsConfig {
    pub potions: Vec<PotionConfig>,
    pub damage: DamageConfig,
    pub attributes: Vec<AttributeConfig>,
    pub particles: ParticleConfig,
    pub sound: SoundConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PotionConfig {
    #[serde(rename = "type")]
    pub effect: String,
    pub base_amplifier: i32,
    pub level_scaling: f64,
    pub ambient: bool,
    pub particles: bool,
    pub icon: bool,
}

impl Default for PotionConfig {
    fn default() -> Self {
        Self {
            effect: String::new(),
            base_amplifier: 0,
            level_scaling: 0.0,
            ambient: true,
            particles: false,
            icon: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageConfig {
    pub enabled: bool,
    pub base_damage: f64,
    pub level_scaling: f64,
    pub bypass_armor: bool,
    pub tick_interval: u64,
}

impl Default for DamageConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_damage: 1.0,
            level_scaling: 0.0,
            bypass_armor: false,
            tick_interval: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeConfig {
    pub attribute: String,
    pub base_amount: f64,
    pub level_scaling: f64,
    pub operation: String,
}

impl Default for AttributeConfig {
    fn default() -> Self {
        Self {
            attribute: String::new(),
            base_amount: 0.0,
            level_scaling: 0.0,
            operation: "ADD_NUMBER".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub count: u32,
    pub offset_x: f64,
    pub offset_y: f64,
    pub offset_z: f64,
    pub speed: f64,
    pub height_offset: f64,
    pub tick_interval: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            kind: "WITCH".to_string(),
            count: 5,
            offset_x: 0.3,
            offset_y: 0.5,
            offset_z: 0.3,
            speed: 0.01,
            height_offset: 1.0,
            tick_interval: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub sound: String,
    pub volume: f32,
    pub pitch: f32,
    pub tick_interval: u64,
    pub play_on_apply: bool,
    pub play_on_remove: bool,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sound: "ENTITY_WITHER_AMBIENT".to_string(),
            volume: 0.5,
            pitch: 1.0,
            tick_interval: 100,
            play_on_apply: false,
            play_on_remove: false,
        }
    }
}

/// Message keys sent to the entity; formatting belongs to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MessageConfig {
    pub on_apply: Option<String>,
    pub on_remove: Option<String>,
}

impl MessageConfig {
    pub fn is_empty(&self) -> bool {
        self.on_apply.is_none() && self.on_remove.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = CurseConfig::from_toml_str("id = \"hex\"").unwrap();
        assert_eq!(config.id, "hex");
        assert!(config.enabled);
        assert_eq!(config.max_level, 3);
        assert!(config.duration.is_permanent());
        assert!(config.trigger.is_unconditional());
        assert!(!config.effects.damage.enabled);
        assert_eq!(config.effects.particles.count, 5);
        assert_eq!(config.effects.sound.tick_interval, 100);
        assert!(config.messages.is_empty());
    }

    #[test]
    fn test_level_titles() {
        let config = CurseConfig::from_toml_str(
            r#"
            id = "hex"
            [level_titles]
            1 = "Faint"
            3 = "Consuming"
            "#,
        )
        .unwrap();

        assert_eq!(config.level_title(1), Some("Faint"));
        assert_eq!(config.level_title(2), None);
        assert_eq!(config.level_title(3), Some("Consuming"));
    }

    #[test]
    fn test_duration_kinds() {
        let config = CurseConfig::from_toml_str(
            r#"
            [duration]
            kind = "level_scaled"
            base_seconds = 60
            level_scaling = 30.0
            "#,
        )
        .unwrap();
        assert_eq!(config.duration.kind, DurationKind::LevelScaled);
        assert!(!config.duration.is_permanent());

        let zero = DurationConfig {
            kind: DurationKind::Fixed,
            base_seconds: 0,
            level_scaling: 0.0,
        };
        assert!(zero.is_permanent());
    }
}
