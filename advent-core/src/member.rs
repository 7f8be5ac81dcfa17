//! Roster input: one guild member's damage against each boss.

use crate::boss::Boss;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A member's flat damage per attempt, keyed by boss.
///
/// A boss missing from `damage` counts as 0. There is no way to tell a member
/// who never submitted a score from one who deals zero damage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDamage {
    pub member_id: String,
    pub name: String,
    #[serde(default)]
    pub damage: BTreeMap<Boss, i64>,
}

impl MemberDamage {
    pub fn new(member_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
            name: name.into(),
            damage: BTreeMap::new(),
        }
    }

    pub fn with_damage(mut self, boss: Boss, damage: i64) -> Self {
        self.damage.insert(boss, damage);
        self
    }

    pub fn damage_to(&self, boss: Boss) -> i64 {
        self.damage.get(&boss).copied().unwrap_or(0)
    }

    /// True when at least one boss has a nonzero score.
    pub fn has_scores(&self) -> bool {
        self.damage.values().any(|d| *d > 0)
    }
}
