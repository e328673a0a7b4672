/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Missing file or missing keys fall back to the stock game tuning.
/// A file that exists but cannot be read, parsed or validated is reported
/// as a `ConfigError`; the caller decides whether to fall back.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub field: FieldConfig,
    pub speed: SpeedConfig,
    pub gamepad: GamepadConfig,
    pub general: GeneralConfig,
}

/// Playing-field geometry and gameplay tuning, all in pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    pub size: i32,
    pub sprite_size: i32,
    pub proximity: i32,
    pub player_speed: i32,
    pub cat_speed: i32,
    pub cats_per_level: usize,
    pub goal_size: i32,
    pub trap_size: i32,
    pub spawn_margin: i32,
    pub hitbox_inset: i32,   // shrink applied to a cat's square before overlap tests
    pub cat_inset: i32,      // inward push for a cat clamped at a wall
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpeedConfig {
    pub frame_ms: u64,
    pub anim_interval_ms: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneralConfig {
    /// Empty path disables logging.
    pub log_file: PathBuf,
    pub log_filter: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    field: TomlField,
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlField {
    #[serde(default = "default_size")]
    size: i32,
    #[serde(default = "default_sprite_size")]
    sprite_size: i32,
    #[serde(default = "default_proximity")]
    proximity: i32,
    #[serde(default = "default_player_speed")]
    player_speed: i32,
    #[serde(default = "default_cat_speed")]
    cat_speed: i32,
    #[serde(default = "default_cats_per_level")]
    cats_per_level: usize,
    #[serde(default = "default_goal_size")]
    goal_size: i32,
    #[serde(default = "default_trap_size")]
    trap_size: i32,
    #[serde(default = "default_spawn_margin")]
    spawn_margin: i32,
    #[serde(default = "default_hitbox_inset")]
    hitbox_inset: i32,
    #[serde(default = "default_cat_inset")]
    cat_inset: i32,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
    #[serde(default = "default_anim_interval")]
    anim_interval_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    log_file: String,
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

// ── Defaults ──

fn default_size() -> i32 { 600 }
fn default_sprite_size() -> i32 { 64 }
fn default_proximity() -> i32 { 75 }
fn default_player_speed() -> i32 { 6 }
fn default_cat_speed() -> i32 { 7 }
fn default_cats_per_level() -> usize { 5 }
fn default_goal_size() -> i32 { 64 }
fn default_trap_size() -> i32 { 48 }
fn default_spawn_margin() -> i32 { 64 }
fn default_hitbox_inset() -> i32 { 11 }
fn default_cat_inset() -> i32 { 32 }   // half a sprite

fn default_frame_ms() -> u64 { 16 }
fn default_anim_interval() -> u64 { 120 }

fn default_confirm() -> Vec<String> { vec!["A".into(), "Start".into()] }
fn default_cancel() -> Vec<String> { vec!["B".into(), "Select".into()] }
fn default_log_filter() -> String { "info".into() }

impl Default for TomlField {
    fn default() -> Self {
        TomlField {
            size: default_size(),
            sprite_size: default_sprite_size(),
            proximity: default_proximity(),
            player_speed: default_player_speed(),
            cat_speed: default_cat_speed(),
            cats_per_level: default_cats_per_level(),
            goal_size: default_goal_size(),
            trap_size: default_trap_size(),
            spawn_margin: default_spawn_margin(),
            hitbox_inset: default_hitbox_inset(),
            cat_inset: default_cat_inset(),
        }
    }
}

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            frame_ms: default_frame_ms(),
            anim_interval_ms: default_anim_interval(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            cancel: default_cancel(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            log_file: String::new(),
            log_filter: default_log_filter(),
        }
    }
}

impl From<TomlConfig> for GameConfig {
    fn from(t: TomlConfig) -> Self {
        GameConfig {
            field: FieldConfig {
                size: t.field.size,
                sprite_size: t.field.sprite_size,
                proximity: t.field.proximity,
                player_speed: t.field.player_speed,
                cat_speed: t.field.cat_speed,
                cats_per_level: t.field.cats_per_level,
                goal_size: t.field.goal_size,
                trap_size: t.field.trap_size,
                spawn_margin: t.field.spawn_margin,
                hitbox_inset: t.field.hitbox_inset,
                cat_inset: t.field.cat_inset,
            },
            speed: SpeedConfig {
                frame_ms: t.speed.frame_ms,
                anim_interval_ms: t.speed.anim_interval_ms,
            },
            gamepad: GamepadConfig {
                confirm: t.gamepad.confirm,
                cancel: t.gamepad.cancel,
            },
            general: GeneralConfig {
                log_file: PathBuf::from(t.general.log_file),
                log_filter: t.general.log_filter,
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

impl FieldConfig {
    /// Largest coordinate a sprite may occupy on either axis.
    pub fn max_pos(&self) -> i32 {
        self.size - self.sprite_size
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// No file at all is not an error: defaults are returned.
    pub fn load() -> Result<Self, ConfigError> {
        for dir in candidate_dirs() {
            let path = dir.join("config.toml");
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        let cfg: GameConfig = toml_cfg.into();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject tunings the simulation cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.field;
        if f.sprite_size <= 0 || f.goal_size <= 0 || f.trap_size <= 0 {
            return Err(ConfigError::Invalid("sprite and item sizes must be positive".into()));
        }
        if f.sprite_size >= f.size {
            return Err(ConfigError::Invalid(format!(
                "sprite_size {} does not fit in a field of {}", f.sprite_size, f.size
            )));
        }
        if f.spawn_margin < 0 || f.spawn_margin >= f.size - f.spawn_margin {
            return Err(ConfigError::Invalid(format!(
                "spawn_margin {} leaves no room to spawn in a field of {}", f.spawn_margin, f.size
            )));
        }
        if f.hitbox_inset < 0 || f.hitbox_inset * 2 >= f.sprite_size {
            return Err(ConfigError::Invalid("hitbox_inset must be less than half the sprite".into()));
        }
        if f.player_speed <= 0 || f.cat_speed <= 0 || f.proximity <= 0 {
            return Err(ConfigError::Invalid("speeds and proximity must be positive".into()));
        }
        if f.cats_per_level == 0 {
            return Err(ConfigError::Invalid("cats_per_level must be at least 1".into()));
        }
        if self.speed.anim_interval_ms == 0 {
            return Err(ConfigError::Invalid("anim_interval_ms must be positive".into()));
        }
        Ok(())
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_stock_tuning() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.field.size, 600);
        assert_eq!(cfg.field.proximity, 75);
        assert_eq!(cfg.field.cats_per_level, 5);
        assert_eq!(cfg.field.max_pos(), 536);
        assert_eq!(cfg.speed.anim_interval_ms, 120);
        assert!(cfg.general.log_file.as_os_str().is_empty());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = GameConfig::from_toml_str("[field]\nproximity = 90\n").unwrap();
        assert_eq!(cfg.field.proximity, 90);
        assert_eq!(cfg.field.cat_speed, 7);
        assert_eq!(cfg.gamepad.confirm, vec!["A".to_string(), "Start".to_string()]);
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = GameConfig::from_toml_str("[field\nsize = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn sprite_larger_than_field_rejected() {
        let err = GameConfig::from_toml_str("[field]\nsize = 50\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn oversized_hitbox_inset_rejected() {
        let err = GameConfig::from_toml_str("[field]\nhitbox_inset = 40\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn catless_levels_rejected() {
        let err = GameConfig::from_toml_str("[field]\ncats_per_level = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = GameConfig::load_from(Path::new("/nonexistent/herding/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
