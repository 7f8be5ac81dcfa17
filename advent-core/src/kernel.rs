//! Planning kernel: wires the simulator to its collaborators.
//!
//! Scores, cycle storage and the clock are supplied by the caller through
//! the traits below; the kernel itself holds no state between calls.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::info;

use crate::cycle::{validate_guild, Cycle, CycleStatus};
use crate::member::MemberDamage;
use crate::plan::PlanResult;
use crate::simulator::simulate;
use crate::time::today_in;

/// Supplies the current per-member boss damage for a guild.
pub trait ScoreSource {
    fn member_damage(&self, guild: &str) -> Result<Vec<MemberDamage>>;
}

/// Persists cycles. Implementations must return at most one open cycle per
/// guild from [`CycleStore::open_cycle_for`].
pub trait CycleStore {
    fn load(&self, id: &str) -> Result<Option<Cycle>>;
    fn open_cycle_for(&self, guild: &str) -> Result<Option<Cycle>>;
    fn save(&mut self, cycle: &Cycle) -> Result<()>;
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone)]
pub struct PlanningKernel<S: ScoreSource, C: Clock> {
    scores: S,
    clock: C,
    tz: Tz,
    max_window_days: Option<u32>,
}

impl<S: ScoreSource, C: Clock> PlanningKernel<S, C> {
    pub fn new(scores: S, clock: C, tz: Tz) -> Self {
        Self {
            scores,
            clock,
            tz,
            max_window_days: None,
        }
    }

    pub fn with_max_window_days(mut self, days: u32) -> Self {
        self.max_window_days = Some(days);
        self
    }

    /// The guild-local calendar date right now.
    pub fn today(&self) -> NaiveDate {
        today_in(self.tz, self.clock.now())
    }

    /// Register a new cycle. Fails if the guild already has an open one.
    pub fn open_cycle(&self, store: &mut impl CycleStore, cycle: Cycle) -> Result<Cycle> {
        validate_guild(&cycle.guild)?;
        if let Some(existing) = store.open_cycle_for(&cycle.guild)? {
            bail!(
                "guild '{}' already has an open cycle ({}); complete it first",
                cycle.guild,
                existing.id
            );
        }
        if store.load(&cycle.id)?.is_some() {
            bail!("cycle '{}' already exists", cycle.id);
        }

        // Shape checks only; the roster is not known yet.
        cycle
            .to_request(Vec::new())
            .validate(self.today(), self.max_window_days)
            .with_context(|| format!("opening cycle {}", cycle.id))?;

        let mut cycle = cycle;
        cycle.status = CycleStatus::Planning;
        cycle.plan = None;
        store.save(&cycle)?;
        info!(cycle = %cycle.id, guild = %cycle.guild, "cycle opened");
        Ok(cycle)
    }

    /// Re-run the simulation for a cycle against current scores and store
    /// the new plan on it.
    pub fn regenerate(&self, store: &mut impl CycleStore, cycle_id: &str) -> Result<PlanResult> {
        let mut cycle = store
            .load(cycle_id)?
            .with_context(|| format!("cycle '{cycle_id}' not found"))?;
        if !cycle.is_open() {
            bail!("cycle '{cycle_id}' is completed; open a new cycle to plan again");
        }

        let roster = self
            .scores
            .member_damage(&cycle.guild)
            .with_context(|| format!("loading scores for guild {}", cycle.guild))?;

        let request = cycle.to_request(roster);
        let today = self.today();
        request
            .validate(today, self.max_window_days)
            .with_context(|| format!("validating cycle {cycle_id}"))?;

        let plan = simulate(&request, today, self.clock.now());
        cycle.plan = Some(plan.clone());
        cycle.status = CycleStatus::Active;
        store.save(&cycle)?;

        info!(
            cycle = %cycle.id,
            estimated_days = plan.estimated_days,
            target_met = plan.target_met,
            "cycle plan regenerated"
        );
        Ok(plan)
    }

    pub fn complete_cycle(&self, store: &mut impl CycleStore, cycle_id: &str) -> Result<Cycle> {
        let mut cycle = store
            .load(cycle_id)?
            .with_context(|| format!("cycle '{cycle_id}' not found"))?;
        if cycle.status == CycleStatus::Completed {
            bail!("cycle '{cycle_id}' is already completed");
        }
        cycle.status = CycleStatus::Completed;
        store.save(&cycle)?;
        info!(cycle = %cycle.id, "cycle completed");
        Ok(cycle)
    }
}
