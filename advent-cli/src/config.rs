use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use advent_core::time::DEFAULT_WINDOW_DAYS;
use advent_core::DEFAULT_TARGET_DAY;

use crate::state::ensure_advent_home;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub planning: PlanningSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningSection {
    pub target_day: u32,
    /// Length of a window when no end date is given, start day included.
    pub window_days: u32,
    /// Longest window the planner will simulate.
    pub max_window_days: u32,
    /// IANA zone of the game server; decides what "today" is.
    pub timezone: String,
    /// Directory holding one `<guild>.csv` roster per guild.
    pub roster_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// "pretty" or "json".
    pub format: String,
}

impl Default for PlanningSection {
    fn default() -> Self {
        Self {
            target_day: DEFAULT_TARGET_DAY,
            window_days: DEFAULT_WINDOW_DAYS,
            max_window_days: DEFAULT_WINDOW_DAYS,
            timezone: "Asia/Seoul".to_string(),
            roster_dir: None,
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            format: "pretty".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            planning: PlanningSection::default(),
            logging: LoggingSection::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_advent_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config_to(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
