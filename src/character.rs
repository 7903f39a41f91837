//! Selectable hero roster

use serde::{Deserialize, Serialize};

use crate::audio::SoundEffect;

/// Cosmetic head feature drawn by the procedural fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// Triangular wing crest
    Wing,
    /// Pointed ears
    Ears,
    /// Dark shell disc over the body
    Shell,
}

/// Playable characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Character {
    /// Fire hero
    #[default]
    Blaze,
    /// Electric hero
    Volt,
    /// Water hero
    Splash,
}

impl Character {
    pub const ALL: [Character; 3] = [Character::Blaze, Character::Volt, Character::Splash];

    pub fn as_str(&self) -> &'static str {
        match self {
            Character::Blaze => "blaze",
            Character::Volt => "volt",
            Character::Splash => "splash",
        }
    }

    /// Parse a `?character=` query value
    pub fn from_query_value(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "blaze" | "fire" => Some(Character::Blaze),
            "volt" | "electric" => Some(Character::Volt),
            "splash" | "water" => Some(Character::Splash),
            _ => None,
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Character::Blaze => "Blaze",
            Character::Volt => "Volt",
            Character::Splash => "Splash",
        }
    }

    /// Sprite artwork id (file `<id>.png` under the sprite base URL)
    pub fn sprite_id(&self) -> u16 {
        match self {
            Character::Blaze => 6,
            Character::Volt => 25,
            Character::Splash => 7,
        }
    }

    /// Body colour (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            Character::Blaze => 0xFF8C00,
            Character::Volt => 0xFFD700,
            Character::Splash => 0x4682B4,
        }
    }

    /// Accent colour for particles and the jump glow (0xRRGGBB)
    pub fn effect_color(&self) -> u32 {
        match self {
            Character::Blaze => 0xFF4500,
            Character::Volt => 0xFFD700,
            Character::Splash => 0x00CED1,
        }
    }

    pub fn feature(&self) -> Feature {
        match self {
            Character::Blaze => Feature::Wing,
            Character::Volt => Feature::Ears,
            Character::Splash => Feature::Shell,
        }
    }

    /// Signature sound for the special attack
    pub fn special_sound(&self) -> SoundEffect {
        match self {
            Character::Blaze => SoundEffect::FireBlast,
            Character::Volt => SoundEffect::Thunder,
            Character::Splash => SoundEffect::HydroPump,
        }
    }
}
