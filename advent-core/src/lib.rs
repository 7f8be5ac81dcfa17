//! advent-core: boss assignment planning for the Advent Expedition event.

pub mod boss;
pub mod cycle;
pub mod kernel;
pub mod member;
pub mod plan;
pub mod request;
pub mod simulator;
pub mod time;

pub use boss::{parse_hp_pairs, Boss, BossTable, BOSS_MAX_HP};
pub use cycle::{validate_guild, Cycle, CycleStatus};
pub use kernel::{Clock, CycleStore, PlanningKernel, ScoreSource, SystemClock};
pub use member::MemberDamage;
pub use plan::{DailyAssignment, DayPlan, PlanResult};
pub use request::{PlanRequest, DEFAULT_TARGET_DAY};
pub use simulator::{generate_plan, simulate, UNESTIMABLE_DAYS};
