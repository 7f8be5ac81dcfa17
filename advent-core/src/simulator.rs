//! Day-by-day boss assignment simulation.
//!
//! Greedy per day: every available member, in roster order, attacks the alive
//! boss they hurt the most, skipping bosses that earlier members already
//! finished off today. HP is applied at the end of each day; the loop stops as
//! soon as every boss is down or the window runs out.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::boss::{Boss, BossTable};
use crate::member::MemberDamage;
use crate::plan::{DailyAssignment, DayPlan, PlanResult};
use crate::request::PlanRequest;
use crate::time::days_between;

/// Estimate reported when the remaining HP cannot be projected from the
/// damage dealt so far. This includes the case where no assigned damage ever
/// reached a boss that is still standing.
pub const UNESTIMABLE_DAYS: u32 = 30;

/// Run the simulation with an explicit "today" (for window defaults) and
/// generation timestamp.
pub fn simulate(request: &PlanRequest, today: NaiveDate, generated_at: DateTime<Utc>) -> PlanResult {
    let (start, end) = request.window(today);
    let target_day = request.target_day();

    let mut hp = BossTable::filled(0i64);
    for boss in Boss::ALL {
        hp.set(boss, request.starting_hp_for(boss));
    }

    let (scored, unscored): (Vec<&MemberDamage>, Vec<&MemberDamage>) =
        request.roster.iter().partition(|m| m.has_scores());
    let available_from: Vec<NaiveDate> = scored
        .iter()
        .map(|m| request.availability.get(&m.member_id).copied().unwrap_or(start))
        .collect();

    let mut entries = BossTable::filled(0u32);
    let mut kill_days: BTreeMap<Boss, u32> = BTreeMap::new();
    let mut daily_plans: Vec<DayPlan> = Vec::new();

    for (day, date) in (1u32..).zip(days_between(start, end)) {
        let alive: Vec<Boss> = Boss::ALL.into_iter().filter(|b| hp.get(*b) > 0).collect();
        if alive.is_empty() {
            debug!(day, %date, "all bosses cleared, stopping");
            break;
        }

        // Same-day running damage per boss; read by later members this day.
        let mut committed = BossTable::filled(0i64);
        let mut assignments = Vec::new();

        for (member, from) in scored.iter().zip(&available_from) {
            if *from > date {
                continue;
            }
            let Some(boss) = choose_boss(member, &alive, &hp, &committed) else {
                continue;
            };
            let damage = member.damage_to(boss);
            committed.saturating_add(boss, damage);
            entries.add(boss, 1);
            assignments.push(DailyAssignment {
                member_id: member.member_id.clone(),
                name: member.name.clone(),
                boss,
                damage,
            });
        }

        let mut killed_today = Vec::new();
        for boss in &alive {
            let left = hp.get(*boss) - committed.get(*boss);
            hp.set(*boss, left);
            if left <= 0 && !kill_days.contains_key(boss) {
                kill_days.insert(*boss, day);
                killed_today.push(*boss);
            }
        }

        debug!(
            day,
            %date,
            assigned = assignments.len(),
            killed = ?killed_today,
            "simulated day"
        );

        daily_plans.push(DayPlan {
            date,
            day,
            assignments,
            remaining_hp: hp.iter().map(|(b, v)| (b, v.max(0))).collect(),
            killed_today,
        });
    }

    let estimated_days = estimate_days(&hp, &kill_days, &daily_plans);
    let target_met = estimated_days <= target_day;
    let warning_message = if target_met {
        None
    } else {
        Some(format!(
            "Target day {target_day} will be missed: bosses are estimated to be cleared on day {estimated_days}. Total daily damage is insufficient."
        ))
    };

    info!(
        estimated_days,
        target_day,
        target_met,
        days = daily_plans.len(),
        members = request.roster.len(),
        "plan generated"
    );
    if let Some(msg) = &warning_message {
        warn!("{msg}");
    }

    PlanResult {
        estimated_days,
        target_day,
        target_met,
        warning_message,
        daily_plans,
        summary: kill_days,
        total_entries_per_boss: entries.to_map(),
        total_members: request.roster.len(),
        members_with_scores: scored.len(),
        members_without_scores: unscored.iter().map(|m| m.name.clone()).collect(),
        generated_at,
    }
}

/// [`simulate`] against the system clock, with "today" in UTC.
pub fn generate_plan(request: &PlanRequest) -> PlanResult {
    let now = Utc::now();
    simulate(request, now.date_naive(), now)
}

/// Pick today's boss for one member.
///
/// Best damage among alive bosses not already covered by earlier members
/// today; ties go to the earlier boss in enumeration order. When every such
/// boss is covered, fall back to the first alive boss the member can hurt.
fn choose_boss(
    member: &MemberDamage,
    alive: &[Boss],
    hp: &BossTable<i64>,
    committed: &BossTable<i64>,
) -> Option<Boss> {
    let mut best: Option<(Boss, i64)> = None;
    for &boss in alive {
        if hp.get(boss) - committed.get(boss) <= 0 {
            continue;
        }
        let damage = member.damage_to(boss);
        if damage > best.map_or(0, |(_, d)| d) {
            best = Some((boss, damage));
        }
    }

    best.map(|(boss, _)| boss)
        .or_else(|| alive.iter().copied().find(|b| member.damage_to(*b) > 0))
}

fn estimate_days(
    hp: &BossTable<i64>,
    kill_days: &BTreeMap<Boss, u32>,
    daily_plans: &[DayPlan],
) -> u32 {
    let simulated = daily_plans.len() as u32;

    if hp.iter().all(|(_, v)| v <= 0) {
        return kill_days.values().max().copied().unwrap_or(simulated);
    }

    let remaining = hp.iter().fold(0i64, |acc, (_, v)| acc.saturating_add(v.max(0)));
    let total_damage = daily_plans
        .iter()
        .fold(0i64, |acc, p| acc.saturating_add(p.total_damage()));
    // Damage that landed on bosses still standing; without any, their
    // remaining HP has no rate to project from.
    let standing_damage: i64 = daily_plans
        .iter()
        .flat_map(|p| &p.assignments)
        .filter(|a| hp.get(a.boss) > 0)
        .fold(0i64, |acc, a| acc.saturating_add(a.damage));

    if simulated == 0 || total_damage <= 0 || standing_damage <= 0 {
        return UNESTIMABLE_DAYS;
    }

    // remaining / (total_damage / simulated), rounded up.
    let extra = (remaining as u128 * u128::from(simulated)).div_ceil(total_damage as u128);
    simulated.saturating_add(u32::try_from(extra).unwrap_or(u32::MAX))
}
