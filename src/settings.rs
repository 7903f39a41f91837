//! Game settings and preferences
//!
//! Read once at startup from the page URL (`?character=volt&volume=0.5`)
//! plus an optional `<script type="application/json" id="tuning">` block.

use serde::{Deserialize, Serialize};

use crate::character::Character;
use crate::tuning::Tuning;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Chosen hero
    pub character: Character,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,

    // === Visual Effects ===
    /// Full-screen flash on special attacks
    pub screen_flash: bool,

    // === Accessibility ===
    /// Reduced motion (no flashes)
    pub reduced_motion: bool,

    /// Directory holding `<sprite id>.png`
    pub sprite_base_url: String,

    /// Game balance
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            character: Character::default(),
            master_volume: 0.8,
            muted: false,
            screen_flash: true,
            reduced_motion: false,
            sprite_base_url: "assets/sprites".to_string(),
            tuning: Tuning::default(),
        }
    }
}

/// Query parameters `apply_param` understands
#[cfg(target_arch = "wasm32")]
const QUERY_KEYS: [&str; 6] = ["character", "volume", "muted", "flash", "reduced_motion", "sprites"];

/// Decode `application/x-www-form-urlencoded` text: `+` is a space and
/// `%XX` an escaped byte. Malformed escapes pass through unchanged.
fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => {
                let escaped = raw
                    .get(i + 1..i + 3)
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                if let Some(byte) = escaped {
                    out.push(byte);
                    i += 2;
                } else {
                    out.push(b'%');
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Parse a query flag: `1`/`true`/`on`/`yes` or `0`/`false`/`off`/`no`
fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" | "" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

impl Settings {
    /// Build settings from a URL query string (with or without the leading `?`).
    /// Unknown keys and unparsable values are ignored.
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        settings.apply_query(query);
        settings
    }

    pub fn apply_query(&mut self, query: &str) {
        let query = query.strip_prefix('?').unwrap_or(query);
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            self.apply_param(&decode_component(key), &decode_component(value));
        }
    }

    /// Apply one already-decoded query parameter
    pub fn apply_param(&mut self, key: &str, value: &str) {
        match key {
            "character" => match Character::from_query_value(value) {
                Some(c) => self.character = c,
                None => log::warn!("Unknown character '{}', keeping {}", value, self.character.name()),
            },
            "volume" => {
                if let Ok(v) = value.parse::<f32>() {
                    self.master_volume = v.clamp(0.0, 1.0);
                }
            }
            "muted" => self.muted = parse_flag(value).unwrap_or(self.muted),
            "flash" => self.screen_flash = parse_flag(value).unwrap_or(self.screen_flash),
            "reduced_motion" => self.reduced_motion = parse_flag(value).unwrap_or(self.reduced_motion),
            "sprites" if !value.is_empty() => self.sprite_base_url = value.trim_end_matches('/').to_string(),
            _ => {}
        }
    }

    /// Effective screen flash (respects reduced_motion)
    pub fn effective_screen_flash(&self) -> bool {
        self.screen_flash && !self.reduced_motion
    }

    /// Image URL for a sprite id
    pub fn sprite_url(&self, id: u16) -> String {
        format!("{}/{}.png", self.sprite_base_url, id)
    }

    /// Load settings from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };

        let mut settings = Self::default();
        let search = window.location().search().unwrap_or_default();
        match web_sys::UrlSearchParams::new_with_str(&search) {
            Ok(params) => {
                for key in QUERY_KEYS {
                    if let Some(value) = params.get(key) {
                        settings.apply_param(key, &value);
                    }
                }
            }
            Err(e) => log::warn!("Ignoring query string: {:?}", e),
        }

        let tuning_json = window
            .document()
            .and_then(|d| d.get_element_by_id("tuning"))
            .and_then(|el| el.text_content());

        if let Some(json) = tuning_json {
            match Tuning::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning overrides");
                    settings.tuning = tuning;
                }
                Err(e) => log::warn!("Ignoring tuning block: {}", e),
            }
        }

        log::info!("Settings: {:?} at volume {}", settings.character, settings.master_volume);
        settings
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.character, Character::Blaze);
        assert_eq!(settings.master_volume, 0.8);
        assert!(settings.effective_screen_flash());
        assert_eq!(settings.tuning, Tuning::default());
    }

    #[test]
    fn test_from_query() {
        let settings = Settings::from_query("?character=volt&volume=0.5&muted=1&flash=0");
        assert_eq!(settings.character, Character::Volt);
        assert_eq!(settings.master_volume, 0.5);
        assert!(settings.muted);
        assert!(!settings.screen_flash);
    }

    #[test]
    fn test_bad_values_are_ignored() {
        let settings = Settings::from_query("character=dragon&volume=loud&muted=maybe&x=1");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_volume_is_clamped() {
        assert_eq!(Settings::from_query("volume=7").master_volume, 1.0);
        assert_eq!(Settings::from_query("volume=-1").master_volume, 0.0);
    }

    #[test]
    fn test_reduced_motion_disables_flash() {
        let settings = Settings::from_query("reduced_motion");
        assert!(settings.reduced_motion);
        assert!(settings.screen_flash);
        assert!(!settings.effective_screen_flash());
    }

    #[test]
    fn test_sprite_url() {
        let settings = Settings::from_query("sprites=https://cdn.example.org/img/");
        assert_eq!(
            settings.sprite_url(Character::Splash.sprite_id()),
            "https://cdn.example.org/img/7.png"
        );
        assert_eq!(Settings::default().sprite_url(25), "assets/sprites/25.png");
    }

    #[test]
    fn test_query_values_are_decoded() {
        let settings = Settings::from_query("sprites=https%3A%2F%2Fcdn.example.org%2Fmy+sprites%2F&character=%76olt");
        assert_eq!(settings.sprite_base_url, "https://cdn.example.org/my sprites");
        assert_eq!(settings.character, Character::Volt);
    }

    #[test]
    fn test_malformed_escape_passes_through() {
        assert_eq!(decode_component("100%"), "100%");
        assert_eq!(decode_component("%zz%4"), "%zz%4");
        assert_eq!(decode_component("caf%C3%A9"), "café");
    }
}
