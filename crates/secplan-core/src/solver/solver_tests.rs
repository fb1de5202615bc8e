use crate::availability::AvailabilityMap;
use crate::domain::{NeedKind, Period, WeekData};
use crate::needs::NeedIndex;
use crate::solver::{build_model, solve, ObjectiveWeights, SolveOutcome, SolveStatus};
use crate::testing::fixtures::*;
use crate::AdminBlock;
use rstest::rstest;
use std::time::Duration;

fn run(data: &WeekData, admin_blocks: &[AdminBlock]) -> SolveOutcome {
    let availability = AvailabilityMap::from_rows(&data.availability);
    let index = NeedIndex::build(data, admin_blocks, &availability);
    let model = build_model(
        data,
        &availability,
        &index,
        &ObjectiveWeights::default(),
        Duration::from_secs(10),
    );
    solve(model, data, &index)
}

#[test]
fn s1_single_secretary_single_need() {
    let spec = NeedSpec::new(100, day(0), Period::Am, DEPT_OPHTA, 1, ROLE_STANDARD, 1);
    let (data, admin_blocks) = WeekBuilder::new()
        .secretary(secretary(1, "Durand"))
        .available(1, day(0), &[Period::Am])
        .need_with_candidates(spec, &[1])
        .build();

    let outcome = run(&data, &admin_blocks);

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_eq!(outcome.assignments.len(), 1);
    assert_eq!(outcome.admin_assignments.len(), 0);
    assert_eq!(outcome.unfilled.len(), 0);
    let a = &outcome.assignments[0];
    assert_eq!(a.id_staff, 1);
    assert_eq!(a.id_block, 100);
    assert_eq!(a.kind, NeedKind::Medical);
}

#[test]
fn s2_flexibility_rounding_three_of_five_days() {
    let mut builder = WeekBuilder::new()
        .secretary(flexible(1, "Durand", 0.6, false))
        .admin_week();
    for offset in 0..5 {
        builder = builder.available(1, day(offset), &[Period::Am, Period::Pm]);
    }
    let (data, admin_blocks) = builder.build();

    let outcome = run(&data, &admin_blocks);

    assert_eq!(outcome.status, SolveStatus::Optimal);
    let worked = outcome.flexible_days.get(&1).map(Vec::len).unwrap_or(0);
    assert_eq!(worked, 3, "round(5 x 0.6) = 3 worked days");
    assert_eq!(outcome.admin_assignments.len(), 6);
    assert_eq!(outcome.assignments.len(), 0);
}

#[test]
fn s2_full_day_pairing_keeps_days_whole() {
    let mut builder = WeekBuilder::new()
        .secretary(flexible(1, "Durand", 0.6, true))
        .admin_week();
    for offset in 0..5 {
        builder = builder.available(1, day(offset), &[Period::Am, Period::Pm]);
    }
    let (data, admin_blocks) = builder.build();

    let outcome = run(&data, &admin_blocks);

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_eq!(outcome.flexible_days.get(&1).map(Vec::len), Some(3));
    assert_eq!(outcome.admin_assignments.len(), 6);
    // Every worked day carries both halves.
    for date in &outcome.flexible_days[&1] {
        let halves: Vec<Period> = outcome
            .admin_assignments
            .iter()
            .filter(|a| a.date == *date)
            .map(|a| a.period)
            .collect();
        assert_eq!(halves.len(), 2, "day {date} is not fully worked");
    }
}

#[test]
fn s3_reception_requires_same_person_all_day() {
    let am = NeedSpec::new(101, day(0), Period::Am, DEPT_OPHTA, 1, ROLE_RECEPTION, 1);
    let pm = NeedSpec::new(102, day(0), Period::Pm, DEPT_OPHTA, 1, ROLE_RECEPTION, 1);
    let (data, admin_blocks) = WeekBuilder::new()
        .secretary(secretary(1, "Durand"))
        .secretary(secretary(2, "Martin"))
        .available(1, day(0), &[Period::Am, Period::Pm])
        .available(2, day(0), &[Period::Am])
        .need_with_candidates(am, &[1, 2])
        .need_with_candidates(pm, &[1])
        .admin_block(9000, day(0), Period::Am)
        .admin_block(9001, day(0), Period::Pm)
        .build();

    let outcome = run(&data, &admin_blocks);

    assert_eq!(outcome.status, SolveStatus::Optimal);
    // A covers reception on both halves.
    let reception: Vec<_> = outcome
        .assignments
        .iter()
        .filter(|a| a.id_role == Some(ROLE_RECEPTION))
        .collect();
    assert_eq!(reception.len(), 2);
    assert!(reception.iter().all(|a| a.id_staff == 1));
    // B cannot enter the reception family at all and falls back to admin.
    let b_assignments: Vec<_> = outcome
        .admin_assignments
        .iter()
        .filter(|a| a.id_staff == 2)
        .collect();
    assert_eq!(b_assignments.len(), 1);
    assert_eq!(b_assignments[0].period, Period::Am);
}

#[test]
fn gap_cap_limits_need_to_one_fill() {
    let spec = NeedSpec::new(100, day(0), Period::Am, DEPT_OPHTA, 1, ROLE_STANDARD, 1);
    let (data, admin_blocks) = WeekBuilder::new()
        .secretary(secretary(1, "Durand"))
        .secretary(secretary(2, "Martin"))
        .available(1, day(0), &[Period::Am])
        .available(2, day(0), &[Period::Am])
        .need_with_candidates(spec, &[1, 2])
        .admin_block(9000, day(0), Period::Am)
        .build();

    let outcome = run(&data, &admin_blocks);

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_eq!(outcome.assignments.len(), 1);
    assert_eq!(outcome.admin_assignments.len(), 1);
    assert_eq!(outcome.unfilled.len(), 0);
}

#[test]
fn existing_assignment_removes_half_day_from_model() {
    let spec = NeedSpec::new(100, day(0), Period::Am, DEPT_OPHTA, 1, ROLE_STANDARD, 1);
    let (data, admin_blocks) = WeekBuilder::new()
        .secretary(secretary(1, "Durand"))
        .available(1, day(0), &[Period::Am])
        .need_with_candidates(spec, &[1])
        .existing(1, 500, day(0), Period::Am)
        .admin_block(9000, day(0), Period::Am)
        .build();

    let outcome = run(&data, &admin_blocks);

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert!(outcome.assignments.is_empty());
    assert!(outcome.admin_assignments.is_empty());
    // The need stays open and shows no usable candidates.
    assert_eq!(outcome.unfilled.len(), 1);
    assert_eq!(outcome.unfilled[0].eligible_count, 0);
}

#[test]
fn full_day_non_flexible_pairs_medical_with_admin() {
    let spec = NeedSpec::new(100, day(0), Period::Am, DEPT_OPHTA, 1, ROLE_STANDARD, 1);
    let mut sec = secretary(1, "Durand");
    sec.full_day_only = true;
    let (data, admin_blocks) = WeekBuilder::new()
        .secretary(sec)
        .available(1, day(0), &[Period::Am, Period::Pm])
        .need_with_candidates(spec, &[1])
        .admin_block(9000, day(0), Period::Am)
        .admin_block(9001, day(0), Period::Pm)
        .build();

    let outcome = run(&data, &admin_blocks);

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_eq!(outcome.assignments.len(), 1);
    assert_eq!(outcome.assignments[0].period, Period::Am);
    assert_eq!(outcome.admin_assignments.len(), 1);
    assert_eq!(outcome.admin_assignments[0].period, Period::Pm);
}

#[test]
fn full_day_without_counterpart_is_infeasible() {
    // Mandatory placement wants the AM filled, full-day coupling forbids
    // it: no admin fallback exists to complete the day.
    let spec = NeedSpec::new(100, day(0), Period::Am, DEPT_OPHTA, 1, ROLE_STANDARD, 1);
    let mut sec = secretary(1, "Durand");
    sec.full_day_only = true;
    let (data, admin_blocks) = WeekBuilder::new()
        .secretary(sec)
        .available(1, day(0), &[Period::Am, Period::Pm])
        .need_with_candidates(spec, &[1])
        .build();

    let outcome = run(&data, &admin_blocks);

    assert_eq!(outcome.status, SolveStatus::Infeasible);
    assert!(outcome.assignments.is_empty());
}

#[test]
fn medical_always_beats_admin_on_same_half_day() {
    let spec = NeedSpec::new(100, day(0), Period::Am, DEPT_OPHTA, 1, ROLE_STANDARD, 1);
    let (data, admin_blocks) = WeekBuilder::new()
        .secretary(secretary(1, "Durand"))
        .available(1, day(0), &[Period::Am])
        .need_with_candidates(spec, &[1])
        .admin_block(9000, day(0), Period::Am)
        .build();

    let outcome = run(&data, &admin_blocks);

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_eq!(outcome.assignments.len(), 1);
    assert!(outcome.admin_assignments.is_empty());
}

#[test]
fn partial_fill_is_reported_with_remaining_count() {
    let spec = NeedSpec::new(100, day(0), Period::Am, DEPT_OPHTA, 1, ROLE_STANDARD, 2);
    let (data, admin_blocks) = WeekBuilder::new()
        .secretary(secretary(1, "Durand"))
        .available(1, day(0), &[Period::Am])
        .need_with_candidates(spec, &[1])
        .build();

    let outcome = run(&data, &admin_blocks);

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_eq!(outcome.assignments.len(), 1);
    assert_eq!(outcome.unfilled.len(), 1);
    let u = &outcome.unfilled[0];
    assert_eq!(u.gap, 2);
    assert_eq!(u.filled, 1);
    assert_eq!(u.remaining, 1);
    assert_eq!(u.eligible_count, 1);
}

#[test]
fn need_without_candidates_is_reported_unfilled() {
    let spec = NeedSpec::new(100, day(0), Period::Am, DEPT_OPHTA, 1, ROLE_STANDARD, 1);
    let (data, admin_blocks) = WeekBuilder::new().need(spec).build();

    let outcome = run(&data, &admin_blocks);

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_eq!(outcome.unfilled.len(), 1);
    assert_eq!(outcome.unfilled[0].eligible_count, 0);
    assert_eq!(outcome.unfilled[0].remaining, 1);
}

#[test]
fn surgery_assignment_links_to_matching_doctor() {
    let spec = NeedSpec::new(100, day(0), Period::Am, DEPT_CHIR, 7, ROLE_STANDARD, 1).surgery();
    let (data, admin_blocks) = WeekBuilder::new()
        .secretary(secretary(1, "Durand"))
        .available(1, day(0), &[Period::Am])
        .need_with_candidates(spec, &[1])
        .doctor(42, 100, 7)
        .build();

    let outcome = run(&data, &admin_blocks);

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_eq!(outcome.assignments.len(), 1);
    assert_eq!(outcome.assignments[0].id_linked_doctor, Some(42));
}

#[test]
fn same_site_afternoon_wins_over_cross_site() {
    // Equal scores everywhere: only site continuity separates keeping the
    // afternoon at Centre from crossing to Nord.
    let am_centre = NeedSpec::new(100, day(0), Period::Am, DEPT_OPHTA, 1, ROLE_STANDARD, 1);
    let pm_centre = NeedSpec::new(101, day(0), Period::Pm, DEPT_CHIR, 1, ROLE_STANDARD, 1);
    let pm_nord = NeedSpec::new(102, day(0), Period::Pm, DEPT_RETINE, 1, ROLE_STANDARD, 1);
    let (data, admin_blocks) = WeekBuilder::new()
        .secretary(secretary(1, "Durand"))
        .available(1, day(0), &[Period::Am, Period::Pm])
        .need_with_candidates(am_centre, &[1])
        .need_with_candidates(pm_centre, &[1])
        .need_with_candidates(pm_nord, &[1])
        .build();

    let outcome = run(&data, &admin_blocks);

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_eq!(outcome.assignments.len(), 2);
    let pm = outcome
        .assignments
        .iter()
        .find(|a| a.period == Period::Pm)
        .unwrap();
    assert_eq!(pm.site, "Centre");
}

#[test]
fn flexible_without_full_day_option_works_zero_days() {
    // full_day_only with a lone AM availability: no day variable fits, so
    // the flexibility target trivially holds at zero worked days.
    let spec = NeedSpec::new(100, day(0), Period::Am, DEPT_OPHTA, 1, ROLE_STANDARD, 1);
    let (data, admin_blocks) = WeekBuilder::new()
        .secretary(flexible(1, "Durand", 1.0, true))
        .available(1, day(0), &[Period::Am])
        .need_with_candidates(spec, &[1])
        .admin_block(9000, day(0), Period::Am)
        .build();

    let outcome = run(&data, &admin_blocks);

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert!(outcome.assignments.is_empty());
    assert!(outcome.admin_assignments.is_empty());
    assert!(outcome.flexible_days.get(&1).is_none());
}

#[rstest]
#[case(5, 0.6, 3)]
#[case(5, 0.2, 1)]
#[case(4, 0.5, 2)]
#[case(5, 0.5, 3)] // half rounds away from zero
#[case(3, 1.0, 3)]
fn flexibility_target_rounds_half_away_from_zero(
    #[case] avail_days: u64,
    #[case] pct: f64,
    #[case] expected: usize,
) {
    let mut builder = WeekBuilder::new()
        .secretary(flexible(1, "Durand", pct, false))
        .admin_week();
    for offset in 0..avail_days {
        builder = builder.available(1, day(offset), &[Period::Am, Period::Pm]);
    }
    let (data, admin_blocks) = builder.build();

    let outcome = run(&data, &admin_blocks);

    assert_eq!(outcome.status, SolveStatus::Optimal);
    let worked = outcome.flexible_days.get(&1).map(Vec::len).unwrap_or(0);
    assert_eq!(worked, expected);
}

#[test]
fn empty_week_solves_to_an_empty_plan() {
    let (data, admin_blocks) = WeekBuilder::new().build();

    let outcome = run(&data, &admin_blocks);

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert!(outcome.assignments.is_empty());
    assert!(outcome.admin_assignments.is_empty());
    assert!(outcome.unfilled.is_empty());
}
