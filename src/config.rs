use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Env var naming the JSON config file.
pub const CONFIG_PATH_VAR: &str = "MUD_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TerrainKind {
    #[default]
    Flat,
    Noise,
}

impl TerrainKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "flat" => Some(TerrainKind::Flat),
            "noise" => Some(TerrainKind::Noise),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub name: String,
    pub map_rows: usize,
    pub map_cols: usize,
    pub terrain: TerrainKind,
    /// Seeds terrain noise and enemy randomness; `None` draws from entropy.
    pub seed: Option<u64>,
    pub tick_interval_ms: u64,
    pub poll_interval_ms: u64,
    pub queue_capacity: usize,
    pub enemy_move_chance: f64,
    /// Identities allowed to use `!` cheat commands.
    pub cheat_allow_list: Vec<String>,
    pub bind_addr: String,
    /// Identity the `--local` console plays as.
    pub local_player: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            name: "JoPy".to_string(),
            map_rows: 5,
            map_cols: 5,
            terrain: TerrainKind::Flat,
            seed: None,
            tick_interval_ms: 1000,
            poll_interval_ms: 100,
            queue_capacity: 256,
            enemy_move_chance: 0.10,
            cheat_allow_list: vec!["blacklabel".to_string()],
            bind_addr: "127.0.0.1:9001".to_string(),
            local_player: "blacklabel".to_string(),
        }
    }
}

impl GameConfig {
    /// Defaults, overlaid by the file named in `MUD_CONFIG` (if any), then
    /// by individual `MUD_*` environment variables.
    pub fn load() -> Self {
        let base = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::load_from_file(Path::new(&path)),
            Err(_) => Self::default(),
        };
        let config = Self::with_overrides(base, |key| std::env::var(key).ok());
        info!(
            "Config: game {} on a {}x{} {:?} map, tick {}ms",
            config.name, config.map_rows, config.map_cols, config.terrain, config.tick_interval_ms
        );
        config
    }

    /// Apply `MUD_*` overrides to `base` and validate the result.
    /// Falls back to defaults if the overridden config is invalid.
    pub fn with_overrides(mut base: Self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        base.apply_overrides(lookup);
        match base.validate() {
            Ok(()) => base,
            Err(e) => {
                warn!("Invalid config after MUD_* overrides: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Load from a JSON file on disk.
    /// Falls back to defaults if the file is missing or malformed.
    pub fn load_from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(config) => {
                    info!("Loaded game config from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!(
                        "Failed to parse game config at {}: {}. Using defaults.",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                warn!(
                    "Failed to read game config at {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn from_json(contents: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(contents).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.map_rows == 0 || self.map_cols == 0 {
            return Err(format!("map must be at least 1x1, got {}x{}", self.map_rows, self.map_cols));
        }
        if !(0.0..=1.0).contains(&self.enemy_move_chance) {
            return Err(format!("enemy_move_chance {} is not a probability", self.enemy_move_chance));
        }
        if self.queue_capacity == 0 {
            return Err("queue_capacity must be positive".to_string());
        }
        Ok(())
    }

    /// Override fields from `MUD_*` variables resolved through `lookup`.
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("MUD_NAME") {
            self.name = name;
        }
        override_parsed(&lookup, "MUD_MAP_ROWS", &mut self.map_rows);
        override_parsed(&lookup, "MUD_MAP_COLS", &mut self.map_cols);
        if let Some(value) = lookup("MUD_TERRAIN") {
            match TerrainKind::parse(&value) {
                Some(terrain) => self.terrain = terrain,
                None => warn!("Ignoring MUD_TERRAIN={}: expected flat or noise", value),
            }
        }
        if let Some(value) = lookup("MUD_SEED") {
            match value.trim().parse() {
                Ok(seed) => self.seed = Some(seed),
                Err(e) => warn!("Ignoring MUD_SEED={}: {}", value, e),
            }
        }
        override_parsed(&lookup, "MUD_TICK_INTERVAL_MS", &mut self.tick_interval_ms);
        override_parsed(&lookup, "MUD_POLL_INTERVAL_MS", &mut self.poll_interval_ms);
        override_parsed(&lookup, "MUD_QUEUE_CAPACITY", &mut self.queue_capacity);
        override_parsed(&lookup, "MUD_ENEMY_MOVE_CHANCE", &mut self.enemy_move_chance);
        if let Some(list) = lookup("MUD_CHEAT_ALLOW_LIST") {
            self.cheat_allow_list = list
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(addr) = lookup("MUD_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(player) = lookup("MUD_LOCAL_PLAYER") {
            self.local_player = player;
        }
    }

    pub fn map_size(&self) -> (usize, usize) {
        (self.map_rows, self.map_cols)
    }
}

fn override_parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, field: &mut T)
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(value) = lookup(key) {
        match value.trim().parse() {
            Ok(parsed) => *field = parsed,
            Err(e) => warn!("Ignoring {}={}: {}", key, value, e),
        }
    }
}
