use advent_core::{simulate, Boss, PlanRequest, ScoreSource};
use advent_ingest::{parse_availability_csv, parse_roster_csv, RosterDir};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use std::path::PathBuf;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

/// Fixture regression: resubmitted rows merge and unscored members are reported.
#[test]
fn test_fixture_roster_shape() {
    let roster = parse_roster_csv(fixtures().join("moonlight.csv")).unwrap();
    assert_eq!(roster.len(), 12);

    let haneul = &roster[0];
    assert_eq!(haneul.member_id, "u01");
    assert_eq!(haneul.damage_to(Boss::Teo), 10_100_000);
    assert_eq!(haneul.damage_to(Boss::Karma), 850_000);

    let unscored: Vec<&str> = roster
        .iter()
        .filter(|m| !m.has_scores())
        .map(|m| m.member_id.as_str())
        .collect();
    assert_eq!(unscored, vec!["u09", "u11"]);
}

/// Score source keyed by guild name resolves to `<dir>/<guild>.csv`.
#[test]
fn test_roster_dir_score_source() {
    let source = RosterDir::new(fixtures());
    assert_eq!(source.member_damage("moonlight").unwrap().len(), 12);
    assert!(source.member_damage("no-such-guild").is_err());
}

/// Fixture regression: a full plan from CSV input honors availability and counts.
#[test]
fn test_plan_from_fixture_roster() {
    let roster = parse_roster_csv(fixtures().join("moonlight.csv")).unwrap();
    let availability = parse_availability_csv(fixtures().join("moonlight_availability.csv")).unwrap();

    let mut req = PlanRequest::new(roster)
        .with_window(start(), start() + Duration::days(13))
        .with_target_day(9);
    req.availability = availability;
    for boss in Boss::ALL {
        req = req.with_starting_hp(boss, 30_000_000);
    }

    let now = Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap();
    let plan = simulate(&req, start(), now);

    assert_eq!(plan.total_members, 12);
    assert_eq!(plan.members_with_scores, 10);
    assert_eq!(plan.members_without_scores, vec!["Eunbi".to_string(), "Nari".to_string()]);

    // Sora (u07) joins on day 3, Kangmin (u10) on day 5.
    for p in &plan.daily_plans {
        let ids: Vec<&str> = p.assignments.iter().map(|a| a.member_id.as_str()).collect();
        assert_eq!(ids.contains(&"u07"), p.day >= 3, "day {}", p.day);
        if p.day < 5 {
            assert!(!ids.contains(&"u10"), "day {}", p.day);
        }
        assert!(!ids.contains(&"u09"));
        assert!(!ids.contains(&"u11"));
    }

    // Every boss dies inside the window with this roster.
    assert_eq!(plan.summary.len(), 4);
    assert_eq!(plan.estimated_days, *plan.summary.values().max().unwrap());
    assert_eq!(plan.daily_plans.len() as u32, plan.estimated_days);

    for boss in Boss::ALL {
        let counted = plan
            .daily_plans
            .iter()
            .flat_map(|p| p.assignments_for(boss))
            .count() as u32;
        assert_eq!(plan.total_entries_per_boss[&boss], counted);
    }
}
