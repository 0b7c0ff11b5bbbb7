use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

use super::alerts::EscalationConfig;
use super::haptic;

/// Controller settings. Every field has a default, so a partial or missing
/// settings.json still yields a working configuration.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Idle pause between loop iterations
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_ms: u64,
    #[serde(default)]
    pub escalation: EscalationConfig,
    #[serde(default)]
    pub haptic: HapticSettings,
    /// Fixed RNG seed for the simulated vitals
    #[serde(default)]
    pub vitals_seed: Option<u64>,
}

fn default_tick_interval() -> u64 {
    10
}

fn default_heartbeat_interval() -> u64 {
    5000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            heartbeat_interval_ms: default_heartbeat_interval(),
            escalation: EscalationConfig::default(),
            haptic: HapticSettings::default(),
            vitals_seed: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct HapticSettings {
    /// When false the haptic bus is treated as detached
    #[serde(default = "default_haptic_enabled")]
    pub enabled: bool,
    #[serde(default = "default_haptic_address")]
    pub address: u8,
}

fn default_haptic_enabled() -> bool {
    true
}

fn default_haptic_address() -> u8 {
    haptic::DEFAULT_ADDRESS
}

impl Default for HapticSettings {
    fn default() -> Self {
        Self {
            enabled: default_haptic_enabled(),
            address: default_haptic_address(),
        }
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            config_path: config_dir.join("settings.json"),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Settings {
        if self.config_path.exists() {
            match fs::read_to_string(&self.config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(settings) => return settings,
                    Err(e) => log::warn!("Invalid {:?}, using defaults: {}", self.config_path, e),
                },
                Err(e) => log::warn!("Cannot read {:?}, using defaults: {}", self.config_path, e),
            }
        }
        Settings::default()
    }

    /// Load settings, writing the defaults out on first start so there is a
    /// file to edit. A failed write is logged and the defaults still apply.
    pub fn load_or_init(&self) -> Settings {
        if self.config_path.exists() {
            return self.load();
        }
        let settings = Settings::default();
        match self.save(&settings) {
            Ok(()) => log::info!("Wrote default settings to {:?}", self.config_path),
            Err(e) => log::warn!("Cannot write {:?}: {}", self.config_path, e),
        }
        settings
    }

    pub fn save(&self, settings: &Settings) -> io::Result<()> {
        // Ensure directory exists
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.config_path, content)
    }
}
