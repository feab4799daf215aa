use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::admission::TickConfig;
use crate::error::{LanescrollError, Result};
use crate::render::LaneLayout;
use crate::source::TailerConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub lanes: LanesConfig,
    pub scheduler: SchedulerConfig,
    pub source: SourceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanesConfig {
    pub count: usize,
    pub start_row: u16,
    pub spacing: u16,
}

impl Default for LanesConfig {
    fn default() -> Self {
        Self {
            count: 5,
            start_row: 2,
            spacing: 2,
        }
    }
}

impl LanesConfig {
    pub fn layout(&self) -> LaneLayout {
        LaneLayout {
            start_row: self.start_row,
            spacing: self.spacing,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub tick_interval_ms: u64,
    pub speed: f64,
    pub max_render_attempts: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 16,
            speed: 1.0,
            max_render_attempts: 3,
        }
    }
}

impl SchedulerConfig {
    pub fn tick_config(&self) -> TickConfig {
        TickConfig::new(Duration::from_millis(self.tick_interval_ms), self.speed)
            .with_max_render_attempts(self.max_render_attempts)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub dir: PathBuf,
    pub pattern: String,
    pub poll_interval_ms: u64,
    pub replay_existing: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("chat_logs"),
            pattern: "*_log.csv".to_string(),
            poll_interval_ms: 500,
            replay_existing: false,
        }
    }
}

impl SourceConfig {
    pub fn tailer_config(&self) -> TailerConfig {
        TailerConfig::new(&self.dir)
            .with_pattern(&self.pattern)
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
            .with_replay_existing(self.replay_existing)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            lanes: LanesConfig::default(),
            scheduler: SchedulerConfig::default(),
            source: SourceConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| LanescrollError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;

        log::info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Reject values the scheduler cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.lanes.count == 0 {
            return Err(LanescrollError::Config("lanes.count must be at least 1".to_string()));
        }
        if !self.scheduler.speed.is_finite() || self.scheduler.speed <= 0.0 {
            return Err(LanescrollError::Config("scheduler.speed must be positive".to_string()));
        }
        if self.scheduler.tick_interval_ms == 0 {
            return Err(LanescrollError::Config("scheduler.tick_interval_ms must be positive".to_string()));
        }
        if self.source.poll_interval_ms == 0 {
            return Err(LanescrollError::Config("source.poll_interval_ms must be positive".to_string()));
        }
        Ok(())
    }
}
