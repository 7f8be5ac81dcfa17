//! Plan output types.
//!
//! These are serde-ready so the caller can persist a plan as JSON next to its
//! cycle record and render it later without the roster.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::boss::Boss;

/// One member sent against one boss on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAssignment {
    pub member_id: String,
    pub name: String,
    pub boss: Boss,
    /// Damage this member deals to `boss` per attempt.
    pub damage: i64,
}

/// A single simulated calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub date: NaiveDate,
    /// 1-based.
    pub day: u32,
    pub assignments: Vec<DailyAssignment>,
    /// Remaining HP per boss after this day's damage, floored at 0.
    pub remaining_hp: BTreeMap<Boss, i64>,
    pub killed_today: Vec<Boss>,
}

impl DayPlan {
    pub fn total_damage(&self) -> i64 {
        self.assignments
            .iter()
            .fold(0i64, |acc, a| acc.saturating_add(a.damage))
    }

    pub fn assignments_for(&self, boss: Boss) -> impl Iterator<Item = &DailyAssignment> {
        self.assignments.iter().filter(move |a| a.boss == boss)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    pub estimated_days: u32,
    pub target_day: u32,
    pub target_met: bool,
    pub warning_message: Option<String>,
    pub daily_plans: Vec<DayPlan>,
    /// Boss -> day number it died on. Bosses never killed are absent.
    pub summary: BTreeMap<Boss, u32>,
    pub total_entries_per_boss: BTreeMap<Boss, u32>,
    pub total_members: usize,
    pub members_with_scores: usize,
    pub members_without_scores: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl PlanResult {
    /// HP snapshot after the last simulated day, if any day was simulated.
    pub fn final_hp(&self) -> Option<&BTreeMap<Boss, i64>> {
        self.daily_plans.last().map(|p| &p.remaining_hp)
    }

    pub fn day(&self, day: u32) -> Option<&DayPlan> {
        self.daily_plans.iter().find(|p| p.day == day)
    }
}
