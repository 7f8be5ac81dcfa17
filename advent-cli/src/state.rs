//! On-disk state under `~/.advent` (or `$ADVENT_HOME`).

use advent_core::{Cycle, CycleStore};
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn advent_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("ADVENT_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".advent"))
}

pub fn ensure_advent_home() -> Result<PathBuf> {
    let dir = advent_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// One JSON file per cycle: `<dir>/<cycle id>.json`.
#[derive(Debug, Clone)]
pub struct FileCycleStore {
    dir: PathBuf,
}

impl FileCycleStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn in_home() -> Result<Self> {
        Self::open(ensure_advent_home()?.join("cycles"))
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    pub fn all(&self) -> Result<Vec<Cycle>> {
        let mut out = Vec::new();
        for entry in fs::read_dir(&self.dir).with_context(|| format!("read {}", self.dir.display()))? {
            let path = entry?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                let s = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
                let cycle: Cycle =
                    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
                out.push(cycle);
            }
        }
        out.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }
}

impl CycleStore for FileCycleStore {
    fn load(&self, id: &str) -> Result<Option<Cycle>> {
        let p = self.path_for(id);
        if !p.exists() {
            return Ok(None);
        }
        let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
        Ok(Some(serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))?))
    }

    fn open_cycle_for(&self, guild: &str) -> Result<Option<Cycle>> {
        Ok(self.all()?.into_iter().find(|c| c.guild == guild && c.is_open()))
    }

    fn save(&mut self, cycle: &Cycle) -> Result<()> {
        let p = self.path_for(&cycle.id);
        let json = serde_json::to_string_pretty(cycle)?;
        fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advent_core::CycleStatus;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn temp_store(tag: &str) -> (PathBuf, FileCycleStore) {
        let dir = std::env::temp_dir().join(format!("advent-store-{tag}-{}", std::process::id()));
        fs::remove_dir_all(&dir).ok();
        let store = FileCycleStore::open(&dir).unwrap();
        (dir, store)
    }

    fn cycle(guild: &str, day: u32) -> Cycle {
        let start = NaiveDate::from_ymd_opt(2026, 10, day).unwrap();
        Cycle::new(guild, start, Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_save_and_load() {
        let (dir, mut store) = temp_store("load");
        let c = cycle("moon", 18);
        store.save(&c).unwrap();

        assert_eq!(store.load(&c.id).unwrap(), Some(c));
        assert_eq!(store.load("missing").unwrap(), None);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_open_cycle_for_skips_completed() {
        let (dir, mut store) = temp_store("open");
        let mut old = cycle("moon", 1);
        old.status = CycleStatus::Completed;
        store.save(&old).unwrap();
        assert!(store.open_cycle_for("moon").unwrap().is_none());

        let current = cycle("moon", 18);
        store.save(&current).unwrap();
        store.save(&cycle("sun", 18)).unwrap();

        assert_eq!(store.open_cycle_for("moon").unwrap().map(|c| c.id), Some(current.id));
        assert_eq!(store.all().unwrap().len(), 3);
        fs::remove_dir_all(&dir).ok();
    }
}
