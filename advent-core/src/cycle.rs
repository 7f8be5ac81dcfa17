//! Cycle records: one Advent Expedition event window for one guild.
//!
//! A cycle owns its configuration and its latest plan. Storage is the
//! caller's concern; see [`crate::kernel::CycleStore`].

use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::boss::Boss;
use crate::member::MemberDamage;
use crate::plan::PlanResult;
use crate::request::{PlanRequest, DEFAULT_TARGET_DAY};
use crate::time::default_end;

/// Guild names become cycle ids and file names, so only ASCII letters,
/// digits, `_` and `-` are accepted.
pub fn validate_guild(guild: &str) -> Result<()> {
    if guild.is_empty() {
        bail!("guild name is empty");
    }
    if let Some(bad) = guild
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        bail!("invalid character {bad:?} in guild name '{guild}' (allowed: A-Z, a-z, 0-9, _ and -)");
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleStatus {
    /// Opened, no plan generated yet.
    Planning,
    /// Has a plan; may be regenerated.
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    pub id: String,
    pub guild: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub target_day: u32,
    #[serde(default)]
    pub availability: BTreeMap<String, NaiveDate>,
    #[serde(default)]
    pub starting_hp: BTreeMap<Boss, i64>,
    pub status: CycleStatus,
    pub plan: Option<PlanResult>,
    pub created_at: DateTime<Utc>,
}

impl Cycle {
    /// A new cycle over the default window starting at `start_date`.
    pub fn new(guild: impl Into<String>, start_date: NaiveDate, created_at: DateTime<Utc>) -> Self {
        let guild = guild.into();
        Self {
            id: format!("{guild}-{start_date}"),
            guild,
            start_date,
            end_date: default_end(start_date),
            target_day: DEFAULT_TARGET_DAY,
            availability: BTreeMap::new(),
            starting_hp: BTreeMap::new(),
            status: CycleStatus::Planning,
            plan: None,
            created_at,
        }
    }

    pub fn with_end_date(mut self, end: NaiveDate) -> Self {
        self.end_date = end;
        self
    }

    pub fn with_target_day(mut self, day: u32) -> Self {
        self.target_day = day;
        self
    }

    pub fn is_open(&self) -> bool {
        self.status != CycleStatus::Completed
    }

    /// Build the scheduling input for this cycle from the current roster.
    pub fn to_request(&self, roster: Vec<MemberDamage>) -> PlanRequest {
        PlanRequest {
            roster,
            start_date: Some(self.start_date),
            end_date: Some(self.end_date),
            target_day: Some(self.target_day),
            availability: self.availability.clone(),
            starting_hp: self.starting_hp.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_cycle_defaults() {
        let start = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap();
        let c = Cycle::new("moonlight", start, now);
        assert_eq!(c.id, "moonlight-2026-10-18");
        assert_eq!(c.end_date, NaiveDate::from_ymd_opt(2026, 10, 31).unwrap());
        assert_eq!(c.target_day, 9);
        assert_eq!(c.status, CycleStatus::Planning);
        assert!(c.is_open());
    }

    #[test]
    fn test_validate_guild() {
        assert!(validate_guild("moonlight").is_ok());
        assert!(validate_guild("Moon_Light-2").is_ok());
        assert!(validate_guild("").is_err());
        assert!(validate_guild("../evil").is_err());
        assert!(validate_guild("moon light").is_err());
        assert!(validate_guild("달빛").is_err());
    }

    #[test]
    fn test_to_request_carries_overrides() {
        let start = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap();
        let mut c = Cycle::new("moonlight", start, now).with_target_day(7);
        c.starting_hp.insert(Boss::Teo, 5_000);
        c.availability.insert("m1".into(), start.succ_opt().unwrap());

        let req = c.to_request(vec![MemberDamage::new("m1", "Alice")]);
        assert_eq!(req.target_day(), 7);
        assert_eq!(req.starting_hp_for(Boss::Teo), 5_000);
        assert_eq!(req.window(start).1, c.end_date);
        assert_eq!(req.roster.len(), 1);
        assert_eq!(req.availability.len(), 1);
    }
}
