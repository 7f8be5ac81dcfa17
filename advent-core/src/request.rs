//! Scheduling input and its validation.
//!
//! The simulator assumes validated input. Callers run [`PlanRequest::validate`]
//! first; the kernel does this for every regeneration.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::boss::{Boss, BOSS_MAX_HP};
use crate::member::MemberDamage;
use crate::time::{default_end, window_len};

pub const DEFAULT_TARGET_DAY: u32 = 9;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub roster: Vec<MemberDamage>,
    /// Defaults to the caller's "today".
    pub start_date: Option<NaiveDate>,
    /// Defaults to start + 13 days.
    pub end_date: Option<NaiveDate>,
    pub target_day: Option<u32>,
    /// Member id -> first date the member may be assigned.
    #[serde(default)]
    pub availability: BTreeMap<String, NaiveDate>,
    /// Boss -> HP at the start of the window, for resuming a cycle.
    #[serde(default)]
    pub starting_hp: BTreeMap<Boss, i64>,
}

impl PlanRequest {
    pub fn new(roster: Vec<MemberDamage>) -> Self {
        Self {
            roster,
            ..Self::default()
        }
    }

    pub fn with_window(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn with_start(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn with_target_day(mut self, day: u32) -> Self {
        self.target_day = Some(day);
        self
    }

    pub fn with_availability(mut self, member_id: impl Into<String>, from: NaiveDate) -> Self {
        self.availability.insert(member_id.into(), from);
        self
    }

    pub fn with_starting_hp(mut self, boss: Boss, hp: i64) -> Self {
        self.starting_hp.insert(boss, hp);
        self
    }

    /// Inclusive `(start, end)` after applying defaults.
    pub fn window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = self.start_date.unwrap_or(today);
        let end = self.end_date.unwrap_or_else(|| default_end(start));
        (start, end)
    }

    pub fn target_day(&self) -> u32 {
        self.target_day.unwrap_or(DEFAULT_TARGET_DAY)
    }

    pub fn starting_hp_for(&self, boss: Boss) -> i64 {
        self.starting_hp.get(&boss).copied().unwrap_or(BOSS_MAX_HP)
    }

    /// Reject input the simulator is not defined for.
    ///
    /// `max_window_days` bounds the loop; `None` leaves it unbounded.
    pub fn validate(&self, today: NaiveDate, max_window_days: Option<u32>) -> Result<()> {
        let (start, end) = self.window(today);
        if end < start {
            bail!("end date {end} is before start date {start}");
        }
        if let Some(max) = max_window_days {
            let len = window_len(start, end);
            if len > i64::from(max) {
                bail!("window {start}..={end} spans {len} days, more than the allowed {max}");
            }
        }
        if self.target_day == Some(0) {
            bail!("target day must be at least 1");
        }

        let mut seen = HashSet::new();
        for m in &self.roster {
            if m.member_id.trim().is_empty() {
                bail!("member '{}' has an empty id", m.name);
            }
            if !seen.insert(m.member_id.as_str()) {
                bail!("member id '{}' appears more than once in the roster", m.member_id);
            }
            if let Some((boss, dmg)) = m.damage.iter().find(|(_, d)| **d < 0) {
                bail!("member '{}' has negative damage {dmg} against {boss}", m.member_id);
            }
        }

        if let Some((boss, hp)) = self.starting_hp.iter().find(|(_, hp)| **hp < 0) {
            bail!("starting hp for {boss} is negative ({hp})");
        }

        for id in self.availability.keys() {
            if !seen.contains(id.as_str()) {
                tracing::warn!(member_id = %id, "availability given for a member not in the roster");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_defaults() {
        let today = date(2026, 10, 18);
        let req = PlanRequest::new(vec![]);
        assert_eq!(req.window(today), (today, date(2026, 10, 31)));
        assert_eq!(req.target_day(), 9);
        assert_eq!(req.starting_hp_for(Boss::Kyle), BOSS_MAX_HP);
    }

    #[test]
    fn test_end_defaults_from_explicit_start() {
        let req = PlanRequest::new(vec![]).with_start(date(2026, 1, 1));
        assert_eq!(req.window(date(2030, 1, 1)).1, date(2026, 1, 14));
    }

    #[test]
    fn test_rejects_reversed_window() {
        let req = PlanRequest::new(vec![]).with_window(date(2026, 10, 18), date(2026, 10, 17));
        let err = req.validate(date(2026, 10, 18), None).unwrap_err();
        assert!(err.to_string().contains("before start"));
    }

    #[test]
    fn test_rejects_window_over_cap() {
        let today = date(2026, 10, 18);
        let req = PlanRequest::new(vec![]).with_window(today, date(2026, 11, 30));
        assert!(req.validate(today, Some(14)).is_err());
        assert!(req.validate(today, None).is_ok());
    }

    #[test]
    fn test_rejects_negative_damage_and_hp() {
        let today = date(2026, 10, 18);
        let bad = MemberDamage::new("m1", "Alice").with_damage(Boss::Teo, -5);
        assert!(PlanRequest::new(vec![bad]).validate(today, None).is_err());

        let req = PlanRequest::new(vec![]).with_starting_hp(Boss::Karma, -1);
        assert!(req.validate(today, None).is_err());
    }

    #[test]
    fn test_rejects_duplicate_ids_and_zero_target() {
        let today = date(2026, 10, 18);
        let roster = vec![MemberDamage::new("m1", "Alice"), MemberDamage::new("m1", "Alias")];
        let err = PlanRequest::new(roster).validate(today, None).unwrap_err();
        assert!(err.to_string().contains("more than once"));

        let req = PlanRequest::new(vec![]).with_target_day(0);
        assert!(req.validate(today, None).is_err());
    }
}
