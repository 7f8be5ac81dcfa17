//! The four Advent Expedition bosses.
//!
//! The boss set is closed: tie-breaking in the simulator depends on the fixed
//! enumeration order `teo, yeonhee, kyle, karma`, so this stays an enum rather
//! than data.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Hit points of a fresh boss. Used whenever no starting HP is supplied.
pub const BOSS_MAX_HP: i64 = 100_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boss {
    Teo,
    Yeonhee,
    Kyle,
    Karma,
}

impl Boss {
    /// Every boss, in tie-break order.
    pub const ALL: [Boss; 4] = [Boss::Teo, Boss::Yeonhee, Boss::Kyle, Boss::Karma];

    pub fn as_str(self) -> &'static str {
        match self {
            Boss::Teo => "teo",
            Boss::Yeonhee => "yeonhee",
            Boss::Kyle => "kyle",
            Boss::Karma => "karma",
        }
    }

    fn index(self) -> usize {
        match self {
            Boss::Teo => 0,
            Boss::Yeonhee => 1,
            Boss::Kyle => 2,
            Boss::Karma => 3,
        }
    }
}

impl fmt::Display for Boss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Boss {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "teo" => Ok(Boss::Teo),
            "yeonhee" => Ok(Boss::Yeonhee),
            "kyle" => Ok(Boss::Kyle),
            "karma" => Ok(Boss::Karma),
            other => bail!("unknown boss: {other} (expected teo, yeonhee, kyle or karma)"),
        }
    }
}

/// Fixed-size per-boss table, indexed by [`Boss`].
///
/// Used for the simulator's hot state (remaining HP, same-day committed
/// damage, entry counters) where a map would only add hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BossTable<T>([T; 4]);

impl<T: Copy> BossTable<T> {
    pub fn filled(value: T) -> Self {
        Self([value; 4])
    }

    pub fn get(&self, boss: Boss) -> T {
        self.0[boss.index()]
    }

    pub fn set(&mut self, boss: Boss, value: T) {
        self.0[boss.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Boss, T)> + '_ {
        Boss::ALL.into_iter().map(move |b| (b, self.get(b)))
    }

    pub fn to_map(&self) -> BTreeMap<Boss, T> {
        self.iter().collect()
    }
}

impl<T: Copy + std::ops::AddAssign> BossTable<T> {
    pub fn add(&mut self, boss: Boss, value: T) {
        self.0[boss.index()] += value;
    }
}

impl BossTable<i64> {
    /// Like [`BossTable::add`], clamped at `i64::MAX`.
    pub fn saturating_add(&mut self, boss: Boss, value: i64) {
        let slot = &mut self.0[boss.index()];
        *slot = slot.saturating_add(value);
    }
}

/// Parse `teo=12000000` style pairs into a starting-HP map.
///
/// Thousands separators are accepted (`teo=12,000,000`).
pub fn parse_hp_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<BTreeMap<Boss, i64>> {
    let mut out = BTreeMap::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let Some((name, value)) = pair.split_once('=') else {
            bail!("expected boss=hp, got '{pair}'");
        };
        let boss: Boss = name.parse()?;
        let hp: i64 = value
            .trim()
            .replace(',', "")
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid hp for {boss} '{value}': {e}"))?;
        if out.insert(boss, hp).is_some() {
            bail!("starting hp for {boss} given twice");
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_boss_case_insensitive() {
        assert_eq!("Teo".parse::<Boss>().unwrap(), Boss::Teo);
        assert_eq!(" KARMA ".parse::<Boss>().unwrap(), Boss::Karma);
        assert!("dragon".parse::<Boss>().is_err());
    }

    #[test]
    fn test_enumeration_order_is_tie_break_order() {
        let names: Vec<&str> = Boss::ALL.iter().map(|b| b.as_str()).collect();
        assert_eq!(names, vec!["teo", "yeonhee", "kyle", "karma"]);
        assert!(Boss::Teo < Boss::Karma);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Boss::Yeonhee).unwrap();
        assert_eq!(json, "\"yeonhee\"");
    }

    #[test]
    fn test_boss_table_accumulates() {
        let mut t = BossTable::filled(0i64);
        t.add(Boss::Kyle, 40);
        t.add(Boss::Kyle, 2);
        assert_eq!(t.get(Boss::Kyle), 42);
        assert_eq!(t.get(Boss::Teo), 0);
        assert_eq!(t.to_map().len(), 4);
    }

    #[test]
    fn test_boss_table_saturates() {
        let mut t = BossTable::filled(0i64);
        t.saturating_add(Boss::Teo, i64::MAX / 2 + 1);
        t.saturating_add(Boss::Teo, i64::MAX / 2 + 1);
        assert_eq!(t.get(Boss::Teo), i64::MAX);
    }

    #[test]
    fn test_parse_hp_pairs() {
        let hp = parse_hp_pairs(&["teo=12,000,000", "karma=5"]).unwrap();
        assert_eq!(hp.get(&Boss::Teo), Some(&12_000_000));
        assert_eq!(hp.get(&Boss::Karma), Some(&5));
        assert!(hp.get(&Boss::Kyle).is_none());

        assert!(parse_hp_pairs(&["teo"]).is_err());
        assert!(parse_hp_pairs(&["teo=1", "teo=2"]).is_err());
        assert!(parse_hp_pairs(&["teo=lots"]).is_err());
    }
}
