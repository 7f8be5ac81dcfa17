//! Plain-text rendering of a plan for the terminal.

use advent_core::{Boss, Cycle, DayPlan, PlanResult};

/// 12345678 -> "12,345,678".
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if n < 0 {
        out.insert(0, '-');
    }
    out
}

fn render_day(out: &mut String, p: &DayPlan) {
    out.push_str(&format!("Day {} ({})\n", p.day, p.date));
    if p.assignments.is_empty() {
        out.push_str("  (no assignments)\n");
    }
    for boss in Boss::ALL {
        let names: Vec<&str> = p.assignments_for(boss).map(|a| a.name.as_str()).collect();
        if names.is_empty() {
            continue;
        }
        let dmg = p
            .assignments_for(boss)
            .fold(0i64, |acc, a| acc.saturating_add(a.damage));
        out.push_str(&format!(
            "  {:<8} <- {} ({})\n",
            boss.as_str(),
            names.join(", "),
            group_thousands(dmg)
        ));
    }

    let hp: Vec<String> = p
        .remaining_hp
        .iter()
        .map(|(b, v)| format!("{b} {}", group_thousands(*v)))
        .collect();
    out.push_str(&format!("  HP: {}\n", hp.join(" | ")));

    if !p.killed_today.is_empty() {
        let killed: Vec<&str> = p.killed_today.iter().map(|b| b.as_str()).collect();
        out.push_str(&format!("  Killed: {}\n", killed.join(", ")));
    }
}

pub fn render_plan(plan: &PlanResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Advent Expedition plan (generated {})\n",
        plan.generated_at.to_rfc3339()
    ));
    out.push_str(&format!(
        "Roster: {} members, {} with scores",
        plan.total_members, plan.members_with_scores
    ));
    if !plan.members_without_scores.is_empty() {
        out.push_str(&format!(" (no scores: {})", plan.members_without_scores.join(", ")));
    }
    out.push_str("\n\n");

    for p in &plan.daily_plans {
        render_day(&mut out, p);
    }

    out.push('\n');
    let kills: Vec<String> = Boss::ALL
        .iter()
        .map(|b| match plan.summary.get(b) {
            Some(day) => format!("{b} day {day}"),
            None => format!("{b} -"),
        })
        .collect();
    out.push_str(&format!("Kills: {}\n", kills.join(", ")));

    let entries: Vec<String> = plan
        .total_entries_per_boss
        .iter()
        .map(|(b, n)| format!("{b} {n}"))
        .collect();
    out.push_str(&format!("Entries: {}\n", entries.join(", ")));

    out.push_str(&format!(
        "Estimated clear: day {} (target day {}) {}\n",
        plan.estimated_days,
        plan.target_day,
        if plan.target_met { "OK" } else { "MISSED" }
    ));
    if let Some(w) = &plan.warning_message {
        out.push_str(&format!("Warning: {w}\n"));
    }
    out
}

pub fn render_cycle(cycle: &Cycle) -> String {
    let mut out = format!(
        "Cycle {} [{:?}]\nGuild: {}\nWindow: {} .. {} (target day {})\n",
        cycle.id, cycle.status, cycle.guild, cycle.start_date, cycle.end_date, cycle.target_day
    );
    if !cycle.starting_hp.is_empty() {
        let hp: Vec<String> = cycle
            .starting_hp
            .iter()
            .map(|(b, v)| format!("{b} {}", group_thousands(*v)))
            .collect();
        out.push_str(&format!("Starting HP: {}\n", hp.join(" | ")));
    }
    if !cycle.availability.is_empty() {
        out.push_str(&format!("Availability overrides: {}\n", cycle.availability.len()));
    }
    match &cycle.plan {
        Some(plan) => {
            out.push('\n');
            out.push_str(&render_plan(plan));
        }
        None => out.push_str("\n(no plan yet; run `advent cycle regenerate`)\n"),
    }
    out
}
