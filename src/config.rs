use std::time::Duration;

use tracing::warn;

pub const TILE: f64 = 32.0;
pub const DEFAULT_RENDER_FPS: u64 = 60;
pub const DEFAULT_SCALE: f64 = 8.0;
const SMOOTH_TICK_MS: u64 = 16;
const STEPPED_TICK_MS: u64 = 150;

/// How the player moves through the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// Sub-tile pixel movement with cornering tolerance and ghosts.
    Smooth,
    /// Whole-tile steps, no tolerance gating and no ghosts.
    Stepped,
}

impl Variant {
    pub fn default_tick_ms(self) -> u64 {
        match self {
            Variant::Smooth => SMOOTH_TICK_MS,
            Variant::Stepped => STEPPED_TICK_MS,
        }
    }

    fn parse(raw: &str) -> Option<Variant> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "smooth" => Some(Variant::Smooth),
            "stepped" | "simple" => Some(Variant::Stepped),
            _ => None,
        }
    }
}

/// Movement and scoring constants.
#[derive(Clone, Debug, PartialEq)]
pub struct Tuning {
    pub tile: f64,
    pub player_speed: f64,
    /// Added to the player's speed to form the cornering window.
    pub turn_slack: f64,
    /// Ghosts choose a new direction when closer than this to a tile center.
    pub decision_window: f64,
    /// Pellets are eaten when closer than this to a tile center.
    pub eat_window: f64,
    pub power_duration: Duration,
    pub frightened_speed: f64,
    /// Capture distance as a fraction of the tile size.
    pub catch_radius: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            tile: TILE,
            player_speed: 2.2,
            turn_slack: 0.5,
            decision_window: 2.0,
            eat_window: 3.0,
            power_duration: Duration::from_millis(7000),
            frightened_speed: 0.9,
            catch_radius: 0.6,
        }
    }
}

/// Log file and filter. Read on their own so the subscriber is installed
/// before the other settings are validated.
#[derive(Clone, Debug, PartialEq)]
pub struct LogSettings {
    pub path: Option<String>,
    pub level: String,
}

impl LogSettings {
    pub fn from_env() -> LogSettings {
        LogSettings::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LogSettings {
        LogSettings {
            path: lookup("PACMAN_LOG").filter(|v| !v.is_empty()),
            level: lookup("PACMAN_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub variant: Variant,
    pub tick_ms: u64,
    pub render_fps: u64,
    pub scale: f64,
    pub log: LogSettings,
    pub tuning: Tuning,
}

impl Settings {
    pub fn from_env() -> Settings {
        Settings::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`; unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Settings {
        let variant = match lookup("PACMAN_VARIANT") {
            Some(raw) => Variant::parse(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "unknown PACMAN_VARIANT, using smooth");
                Variant::Smooth
            }),
            None => Variant::Smooth,
        };
        let tick_ms = read_positive(&lookup, "PACMAN_TICK_MS").unwrap_or(variant.default_tick_ms());
        let render_fps = read_positive(&lookup, "PACMAN_FPS").unwrap_or(DEFAULT_RENDER_FPS);
        let scale = lookup("PACMAN_SCALE")
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 1.0)
            .unwrap_or(DEFAULT_SCALE);
        let log = LogSettings::from_lookup(&lookup);

        Settings {
            variant,
            tick_ms,
            render_fps,
            scale,
            log,
            tuning: Tuning::default(),
        }
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.render_fps.max(1))
    }
}

fn read_positive(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    let parsed = raw.parse::<u64>().ok().filter(|v| *v > 0);
    if parsed.is_none() {
        warn!(key, value = %raw, "ignoring invalid setting");
    }
    parsed
}
