//! Host mechanics: timed effects, attributes, modifiers, particles and sounds.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::HostError;

/// Implements `as_str` and case-insensitive `FromStr` over SCREAMING_SNAKE names.
macro_rules! host_names {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// All variants, in declaration order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// The canonical upper-case name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl FromStr for $ty {
            type Err = HostError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_uppercase().replace(['-', ' ', '.'], "_");
                match normalized.as_str() {
                    $($name => Ok($ty::$variant),)+
                    _ => Err(HostError::unknown($kind, s)),
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Potion-like timed effects the host can put on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectType {
    // Buffs
    Speed,
    Haste,
    Strength,
    InstantHealth,
    JumpBoost,
    Regeneration,
    Resistance,
    FireResistance,
    WaterBreathing,
    Invisibility,
    NightVision,
    HealthBoost,
    Absorption,
    Saturation,
    Luck,
    SlowFalling,

    // Debuffs
    Slowness,
    MiningFatigue,
    InstantDamage,
    Nausea,
    Blindness,
    Hunger,
    Weakness,
    Poison,
    Wither,
    Glowing,
    Levitation,
    BadLuck,
    Darkness,
}

host_names!(EffectType, "effect", {
    Speed => "SPEED",
    Haste => "HASTE",
    Strength => "STRENGTH",
    InstantHealth => "INSTANT_HEALTH",
    JumpBoost => "JUMP_BOOST",
    Regeneration => "REGENERATION",
    Resistance => "RESISTANCE",
    FireResistance => "FIRE_RESISTANCE",
    WaterBreathing => "WATER_BREATHING",
    Invisibility => "INVISIBILITY",
    NightVision => "NIGHT_VISION",
    HealthBoost => "HEALTH_BOOST",
    Absorption => "ABSORPTION",
    Saturation => "SATURATION",
    Luck => "LUCK",
    SlowFalling => "SLOW_FALLING",
    Slowness => "SLOWNESS",
    MiningFatigue => "MINING_FATIGUE",
    InstantDamage => "INSTANT_DAMAGE",
    Nausea => "NAUSEA",
    Blindness => "BLINDNESS",
    Hunger => "HUNGER",
    Weakness => "WEAKNESS",
    Poison => "POISON",
    Wither => "WITHER",
    Glowing => "GLOWING",
    Levitation => "LEVITATION",
    BadLuck => "BAD_LUCK",
    Darkness => "DARKNESS",
});

/// A timed effect as handed to (and reported by) the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedEffect {
    pub effect_type: EffectType,
    /// Remaining duration in host ticks.
    pub duration_ticks: u32,
    /// Zero-based strength (0 = level I).
    pub amplifier: u8,
    pub ambient: bool,
    pub particles: bool,
    pub icon: bool,
}

impl TimedEffect {
    /// A visible effect with particles and icon.
    pub fn new(effect_type: EffectType, duration_ticks: u32, amplifier: u8) -> Self {
        Self {
            effect_type,
            duration_ticks,
            amplifier,
            ambient: false,
            particles: true,
            icon: true,
        }
    }

    /// Set ambient/particle/icon display flags.
    pub fn with_display(mut self, ambient: bool, particles: bool, icon: bool) -> Self {
        self.ambient = ambient;
        self.particles = particles;
        self.icon = icon;
        self
    }
}

/// Numeric attributes that modifiers can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    MaxHealth,
    MovementSpeed,
    AttackDamage,
    AttackSpeed,
    AttackKnockback,
    Armor,
    ArmorToughness,
    KnockbackResistance,
    Luck,
    Scale,
    JumpStrength,
}

host_names!(Attribute, "attribute", {
    MaxHealth => "MAX_HEALTH",
    MovementSpeed => "MOVEMENT_SPEED",
    AttackDamage => "ATTACK_DAMAGE",
    AttackSpeed => "ATTACK_SPEED",
    AttackKnockback => "ATTACK_KNOCKBACK",
    Armor => "ARMOR",
    ArmorToughness => "ARMOR_TOUGHNESS",
    KnockbackResistance => "KNOCKBACK_RESISTANCE",
    Luck => "LUCK",
    Scale => "SCALE",
    JumpStrength => "JUMP_STRENGTH",
});

impl Attribute {
    /// Parse an attribute name, accepting the legacy `GENERIC_` prefix.
    pub fn parse_lenient(name: &str) -> Result<Self, HostError> {
        let trimmed = name.trim();
        let upper = trimmed.to_ascii_uppercase();
        let stripped = upper.strip_prefix("GENERIC_").unwrap_or(&upper);
        stripped
            .parse()
            .map_err(|_| HostError::unknown("attribute", trimmed))
    }

    /// Lower-case key fragment used when naming modifiers.
    pub fn key(&self) -> String {
        self.as_str().to_ascii_lowercase()
    }

    /// Base value of the attribute on a fresh entity.
    pub fn default_base(&self) -> f64 {
        match self {
            Attribute::MaxHealth => 20.0,
            Attribute::MovementSpeed => 0.1,
            Attribute::AttackDamage => 1.0,
            Attribute::AttackSpeed => 4.0,
            Attribute::Scale => 1.0,
            Attribute::JumpStrength => 0.42,
            _ => 0.0,
        }
    }
}

/// How a modifier combines with the attribute's base value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ModifierOperation {
    /// Adds `amount` to the base.
    #[default]
    AddNumber,
    /// Adds `base * amount`.
    AddScalar,
    /// Multiplies the running total by `1 + amount`.
    MultiplyScalarOne,
}

host_names!(ModifierOperation, "operation", {
    AddNumber => "ADD_NUMBER",
    AddScalar => "ADD_SCALAR",
    MultiplyScalarOne => "MULTIPLY_SCALAR_1",
});

/// A keyed modifier on one attribute. The key is stable so it can be removed later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeModifier {
    pub key: String,
    pub amount: f64,
    pub operation: ModifierOperation,
}

impl AttributeModifier {
    pub fn new(key: impl Into<String>, amount: f64, operation: ModifierOperation) -> Self {
        Self {
            key: key.into(),
            amount,
            operation,
        }
    }
}

/// Particle kinds the host can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ParticleKind {
    #[default]
    Witch,
    Smoke,
    LargeSmoke,
    Flame,
    SoulFireFlame,
    Soul,
    Portal,
    Enchant,
    Dust,
    DrippingLava,
    Ash,
    Heart,
    AngryVillager,
    Cloud,
}

host_names!(ParticleKind, "particle", {
    Witch => "WITCH",
    Smoke => "SMOKE",
    LargeSmoke => "LARGE_SMOKE",
    Flame => "FLAME",
    SoulFireFlame => "SOUL_FIRE_FLAME",
    Soul => "SOUL",
    Portal => "PORTAL",
    Enchant => "ENCHANT",
    Dust => "DUST",
    DrippingLava => "DRIPPING_LAVA",
    Ash => "ASH",
    Heart => "HEART",
    AngryVillager => "ANGRY_VILLAGER",
    Cloud => "CLOUD",
});

/// One burst of particles around an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleBurst {
    pub kind: ParticleKind,
    pub count: u32,
    pub offset: (f64, f64, f64),
    pub speed: f64,
    /// Vertical offset from the entity's feet.
    pub height_offset: f64,
}

/// A sound played to an entity. `sound` is a namespaced key such as `entity.wither.ambient`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundCue {
    pub sound: String,
    pub volume: f32,
    pub pitch: f32,
}

impl SoundCue {
    pub const DEFAULT_SOUND: &'static str = "entity.wither.ambient";

    /// Normalize a sound name (`ENTITY_WITHER_AMBIENT` or `entity.wither.ambient`) to key form.
    /// Empty names fall back to the default sound.
    pub fn normalize_key(name: &str) -> String {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Self::DEFAULT_SOUND.to_string();
        }
        trimmed.to_ascii_lowercase().replace('_', ".")
    }
}
