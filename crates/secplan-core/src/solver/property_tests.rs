//! Randomized-instance checks of the solution invariants: no double
//! booking, gap respect, full-day integrity, exact flexibility targets,
//! mandatory placement and admin-only-when-available.

use crate::availability::AvailabilityMap;
use crate::domain::{Assignment, Period, Secretary, StaffId, WeekData};
use crate::needs::NeedIndex;
use crate::solver::{build_model, solve, ObjectiveWeights, SolveOutcome};
use crate::testing::fixtures::*;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

const SECRETARIES: usize = 3;
const DAYS: u64 = 3;

const PCT_CHOICES: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

#[derive(Debug, Clone, Copy)]
struct SecProfile {
    flexible: bool,
    pct_idx: usize,
    full_day_only: bool,
}

#[derive(Debug, Clone, Copy)]
struct NeedDraw {
    day: u64,
    pm: bool,
    retine: bool,
    skill: i64,
    gap: i32,
    eligible_mask: u32,
}

fn sec_profile() -> impl Strategy<Value = SecProfile> {
    (any::<bool>(), 0..PCT_CHOICES.len(), any::<bool>()).prop_map(
        |(flexible, pct_idx, full_day_only)| SecProfile {
            flexible,
            pct_idx,
            // Only flexible secretaries draw the full-day option here; a
            // non-flexible full-day secretary with a half-available day is
            // legitimately infeasible and not interesting to this suite.
            full_day_only: flexible && full_day_only,
        },
    )
}

fn need_draw() -> impl Strategy<Value = NeedDraw> {
    (0..DAYS, any::<bool>(), any::<bool>(), 1..3i64, 1..3i32, 0..(1u32 << SECRETARIES))
        .prop_map(|(day, pm, retine, skill, gap, eligible_mask)| NeedDraw {
            day,
            pm,
            retine,
            skill,
            gap,
            eligible_mask,
        })
}

fn build_instance(
    profiles: [SecProfile; SECRETARIES],
    avail: Vec<bool>,
    needs: Vec<NeedDraw>,
) -> (WeekData, Vec<crate::AdminBlock>) {
    let mut builder = WeekBuilder::new();

    for (i, profile) in profiles.iter().enumerate() {
        let id = (i + 1) as StaffId;
        let sec = if profile.flexible {
            flexible(id, "Agent", PCT_CHOICES[profile.pct_idx], profile.full_day_only)
        } else {
            secretary(id, "Agent")
        };
        builder = builder.secretary(sec);
    }

    for (i, _) in profiles.iter().enumerate() {
        let id = (i + 1) as StaffId;
        for d in 0..DAYS {
            for (p, period) in Period::BOTH.into_iter().enumerate() {
                let slot = (i * DAYS as usize + d as usize) * 2 + p;
                if avail[slot] {
                    builder = builder.available(id, day(d), &[period]);
                }
            }
        }
    }

    for (n, draw) in needs.iter().enumerate() {
        let period = if draw.pm { Period::Pm } else { Period::Am };
        let dept = if draw.retine { DEPT_RETINE } else { DEPT_OPHTA };
        let spec = NeedSpec::new(
            100 + n as i64,
            day(draw.day),
            period,
            dept,
            draw.skill,
            ROLE_STANDARD,
            draw.gap,
        );
        let eligible: Vec<StaffId> = (0..SECRETARIES)
            .filter(|i| draw.eligible_mask & (1 << i) != 0)
            .map(|i| (i + 1) as StaffId)
            .collect();
        builder = builder.need_with_candidates(spec, &eligible);
    }

    // Admin fallback for every half-day keeps mandatory placement
    // satisfiable.
    let mut id = 9000;
    for d in 0..DAYS {
        for period in Period::BOTH {
            builder = builder.admin_block(id, day(d), period);
            id += 1;
        }
    }

    builder.build()
}

fn all_assignments(outcome: &SolveOutcome) -> Vec<&Assignment> {
    outcome
        .assignments
        .iter()
        .chain(outcome.admin_assignments.iter())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 12,
        .. ProptestConfig::default()
    })]

    #[test]
    fn solution_respects_hard_invariants(
        profiles in prop::array::uniform3(sec_profile()),
        avail in prop::collection::vec(any::<bool>(), SECRETARIES * DAYS as usize * 2),
        needs in prop::collection::vec(need_draw(), 0..4),
    ) {
        let (data, admin_blocks) = build_instance(profiles, avail, needs);
        let availability = AvailabilityMap::from_rows(&data.availability);
        let index = NeedIndex::build(&data, &admin_blocks, &availability);
        let model = build_model(
            &data,
            &availability,
            &index,
            &ObjectiveWeights::default(),
            Duration::from_secs(10),
        );
        let outcome = solve(model, &data, &index);

        prop_assert!(outcome.status.is_solution(), "status was {}", outcome.status);

        // 1. No double booking.
        let mut slots = HashSet::new();
        for a in all_assignments(&outcome) {
            prop_assert!(
                slots.insert((a.id_staff, a.date, a.period)),
                "{} doubly booked on {} {}", a.id_staff, a.date, a.period
            );
        }

        // 2. Gap respect.
        let mut fills: HashMap<_, i32> = HashMap::new();
        for a in all_assignments(&outcome) {
            *fills.entry((a.id_block, a.id_skill, a.id_role)).or_insert(0) += 1;
        }
        for need in index.needs() {
            let filled = fills.get(&need.key()).copied().unwrap_or(0);
            prop_assert!(filled <= need.gap, "need {:?} overfilled", need.key());
        }

        // 8. Admin placements sit on available half-days.
        for a in &outcome.admin_assignments {
            prop_assert!(availability.is_available(a.id_staff, a.date, a.period));
        }

        for sec in &data.secretaries {
            check_secretary(&outcome, &availability, sec)?;
        }
    }
}

fn check_secretary(
    outcome: &SolveOutcome,
    availability: &AvailabilityMap,
    sec: &Secretary,
) -> Result<(), TestCaseError> {
    let mine: Vec<&Assignment> = all_assignments(outcome)
        .into_iter()
        .filter(|a| a.id_staff == sec.id)
        .collect();

    let mut halves_per_day: HashMap<_, HashSet<Period>> = HashMap::new();
    for a in &mine {
        halves_per_day.entry(a.date).or_default().insert(a.period);
    }

    // 4. Full-day integrity.
    if sec.full_day_only {
        for (date, halves) in &halves_per_day {
            prop_assert_eq!(
                halves.len(),
                2,
                "full-day secretary {} works a half day on {}",
                sec.id,
                date
            );
        }
    }

    if sec.is_flexible {
        // 5. Exact flexibility target.
        let countable_days = availability
            .days(sec.id)
            .into_iter()
            .filter(|&d| {
                let periods = availability.periods(sec.id, d);
                if sec.full_day_only {
                    periods.len() == 2
                } else {
                    !periods.is_empty()
                }
            })
            .count();
        let expected = (countable_days as f64 * sec.flexibility_pct).round() as usize;
        prop_assert_eq!(
            halves_per_day.len(),
            expected,
            "flexible secretary {} worked {} days, target {}",
            sec.id,
            halves_per_day.len(),
            expected
        );
        let reported = outcome
            .flexible_days
            .get(&sec.id)
            .map(Vec::len)
            .unwrap_or(0);
        prop_assert_eq!(reported, expected);
    } else {
        // 6. Mandatory placement on every available half-day.
        for d in availability.days(sec.id) {
            for period in availability.periods(sec.id, d) {
                let count = mine
                    .iter()
                    .filter(|a| a.date == d && a.period == period)
                    .count();
                prop_assert_eq!(
                    count,
                    1,
                    "secretary {} has {} assignments on {} {}",
                    sec.id,
                    count,
                    d,
                    period
                );
            }
        }
    }

    Ok(())
}
