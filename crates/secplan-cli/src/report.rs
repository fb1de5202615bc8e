//! Console report: per-secretary counts, pénibilité, preference
//! violations, site continuity and unfilled needs.

use secplan_core::{
    AvailabilityMap, NeedIndex, NeedRow, PreferenceKind, PreferenceTarget, SolveOutcome, StaffId,
    WeekData, EVITER_WEIGHT,
};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::Write;

struct EviterViolation {
    name: String,
    target: String,
    date: chrono::NaiveDate,
    period: secplan_core::Period,
}

pub fn render_report(
    data: &WeekData,
    outcome: &SolveOutcome,
    availability: &AvailabilityMap,
) -> String {
    let mut out = String::new();
    let role_weight = data.role_weights();

    let _ = writeln!(out, "\n{}", "=".repeat(60));
    let _ = writeln!(out, "  Assignation Secrétaires");
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(
        out,
        "Solver: {} en {:.1}s",
        outcome.status,
        outcome.wall_time.as_secs_f64()
    );
    if let Some(objective) = outcome.objective {
        let _ = writeln!(out, "Objectif: {objective}");
    }

    let total_medical: i32 = data.needs.iter().map(|n| n.gap).sum();
    let filled = outcome.assignments.len();
    let unfilled_count: i32 = outcome.unfilled.iter().map(|u| u.remaining).sum();
    let admin_count = outcome.admin_assignments.len();

    let _ = writeln!(
        out,
        "\nBesoins médicaux: {total_medical} total | {filled} remplis | {unfilled_count} non remplis"
    );
    let _ = writeln!(out, "Assignations admin: {admin_count}");
    let _ = writeln!(out, "Total assignations: {}", filled + admin_count);

    // Per-secretary counters
    let mut medical_by_staff: HashMap<StaffId, usize> = HashMap::new();
    let mut admin_by_staff: HashMap<StaffId, usize> = HashMap::new();
    let mut hardship_by_staff: HashMap<StaffId, i32> = HashMap::new();
    for a in &outcome.assignments {
        *medical_by_staff.entry(a.id_staff).or_insert(0) += 1;
        let w = a
            .id_role
            .and_then(|r| role_weight.get(&r).copied())
            .unwrap_or(0);
        *hardship_by_staff.entry(a.id_staff).or_insert(0) += w;
    }
    for a in &outcome.admin_assignments {
        *admin_by_staff.entry(a.id_staff).or_insert(0) += 1;
    }

    let (eviter_by_staff, eviter_violations) = eviter_violations(data, outcome);

    let _ = writeln!(out, "\n--- Par secrétaire ---");
    let _ = writeln!(
        out,
        "{:<25} {:>4} {:>5} {:>5} {:>5} {:>5}  Status",
        "Nom", "Méd", "Admin", "Cible", "Total", "Pénib"
    );
    let _ = writeln!(out, "{}", "-".repeat(80));

    let mut secretaries = data.secretaries.clone();
    secretaries.sort_by(|a, b| a.lastname.cmp(&b.lastname));

    for sec in &secretaries {
        let med = medical_by_staff.get(&sec.id).copied().unwrap_or(0);
        let adm = admin_by_staff.get(&sec.id).copied().unwrap_or(0);
        let hardship = hardship_by_staff.get(&sec.id).copied().unwrap_or(0);
        let eviter = eviter_by_staff.get(&sec.id).copied().unwrap_or(0);
        let penibilite = hardship + eviter as i32 * EVITER_WEIGHT;

        let mut status_parts: Vec<String> = Vec::new();
        if sec.is_flexible {
            let worked = outcome
                .flexible_days
                .get(&sec.id)
                .map(Vec::len)
                .unwrap_or(0);
            let avail_days = availability.days(sec.id).len();
            status_parts.push(format!("Flex: {worked}/{avail_days}j"));
        }
        if sec.admin_target > 0 {
            if adm as i32 >= sec.admin_target {
                status_parts.push("Admin OK".to_string());
            } else {
                status_parts.push(format!("Admin {adm}/{} !", sec.admin_target));
            }
        }
        if eviter > 0 {
            status_parts.push(format!("EVITER x{eviter}"));
        }

        let target = if sec.admin_target > 0 {
            sec.admin_target.to_string()
        } else {
            "-".to_string()
        };
        let _ = writeln!(
            out,
            "{:<25} {:>4} {:>5} {:>5} {:>5} {:>5}  {}",
            sec.display_name(),
            med,
            adm,
            target,
            med + adm,
            penibilite,
            status_parts.join(", ")
        );
    }

    // Site continuity
    let mut staff_day_sites: HashMap<StaffId, HashMap<chrono::NaiveDate, BTreeSet<&str>>> =
        HashMap::new();
    for a in &outcome.assignments {
        staff_day_sites
            .entry(a.id_staff)
            .or_default()
            .entry(a.date)
            .or_default()
            .insert(a.site.as_str());
    }
    let mut staff_admin_days: HashMap<StaffId, HashSet<chrono::NaiveDate>> = HashMap::new();
    for a in &outcome.admin_assignments {
        staff_admin_days
            .entry(a.id_staff)
            .or_default()
            .insert(a.date);
    }

    let mut site_same = 0;
    let mut site_cross = 0;
    let mut site_admin_half = 0;
    for (sid, days) in &staff_day_sites {
        for sites in days.values() {
            if sites.len() == 1 {
                site_same += 1;
            } else {
                site_cross += 1;
            }
        }
        if let Some(admin_days) = staff_admin_days.get(sid) {
            site_admin_half += admin_days.iter().filter(|d| days.contains_key(d)).count();
        }
    }

    let _ = writeln!(out, "\n--- Continuité site ---");
    let _ = writeln!(out, "  Même site AM/PM: {site_same} jours");
    let _ = writeln!(out, "  Changement site: {site_cross} jours");
    let _ = writeln!(out, "  Médical + admin: {site_admin_half} jours");

    if !outcome.unfilled.is_empty() {
        let _ = writeln!(
            out,
            "\n--- Besoins non remplis ({}) ---",
            outcome.unfilled.len()
        );
        for u in &outcome.unfilled {
            let _ = writeln!(
                out,
                "  Block {:>5}  {} {}  {:<20} {:<15} {:<10} reste={}  ({} éligibles)",
                u.id_block,
                u.date,
                u.period,
                u.department,
                u.skill_name.as_deref().unwrap_or("-"),
                u.role_name.as_deref().unwrap_or("-"),
                u.remaining,
                u.eligible_count
            );
        }
    }

    if !eviter_violations.is_empty() {
        let _ = writeln!(
            out,
            "\n--- Violations EVITER ({}) ---",
            eviter_violations.len()
        );
        for v in &eviter_violations {
            let _ = writeln!(out, "  {} -> {} ({} {})", v.name, v.target, v.date, v.period);
        }
    }

    // Secretaries without any declared skill
    let skilled: HashSet<StaffId> = data.skills.iter().map(|s| s.id_staff).collect();
    let no_skills: Vec<_> = secretaries
        .iter()
        .filter(|s| !skilled.contains(&s.id))
        .collect();
    if !no_skills.is_empty() {
        let _ = writeln!(out, "\n--- Secrétaires sans skills ({}) ---", no_skills.len());
        for s in no_skills {
            let _ = writeln!(out, "  {} (id={})", s.display_name(), s.id);
        }
    }

    let _ = writeln!(out);
    out
}

/// Recomputes SITE/DEPARTMENT avoidance violations from the declared
/// preferences (the solver only saw the decomposed scores).
fn eviter_violations(
    data: &WeekData,
    outcome: &SolveOutcome,
) -> (HashMap<StaffId, usize>, Vec<EviterViolation>) {
    let site_names: HashMap<_, _> = data
        .sites
        .iter()
        .map(|s| (s.id_site, s.name.as_str()))
        .collect();
    let need_by_block: HashMap<i64, &NeedRow> =
        data.needs.iter().map(|n| (n.id_block, n)).collect();

    let mut pref_map: HashMap<StaffId, Vec<&secplan_core::StaffPreference>> = HashMap::new();
    for p in &data.preferences {
        if p.preference == PreferenceKind::Eviter {
            pref_map.entry(p.id_staff).or_default().push(p);
        }
    }

    let mut by_staff: HashMap<StaffId, usize> = HashMap::new();
    let mut violations = Vec::new();

    for a in &outcome.assignments {
        let Some(need) = need_by_block.get(&a.id_block) else {
            continue;
        };
        let Some(prefs) = pref_map.get(&a.id_staff) else {
            continue;
        };
        for p in prefs {
            let target = match p.target_type {
                PreferenceTarget::Site => p
                    .id_site
                    .filter(|site| need.id_site == Some(*site))
                    .map(|site| site_names.get(&site).copied().unwrap_or("?").to_string()),
                PreferenceTarget::Department => p
                    .id_department
                    .filter(|dept| need.id_department == *dept)
                    .map(|dept| {
                        data.departments
                            .iter()
                            .find(|d| d.id_department == dept)
                            .map(|d| d.name.clone())
                            .unwrap_or_else(|| "?".to_string())
                    }),
                PreferenceTarget::Staff => None,
            };
            if let Some(target) = target {
                let name = data
                    .secretary(a.id_staff)
                    .map(|s| s.display_name())
                    .unwrap_or_else(|| format!("#{}", a.id_staff));
                *by_staff.entry(a.id_staff).or_insert(0) += 1;
                violations.push(EviterViolation {
                    name,
                    target,
                    date: a.date,
                    period: a.period,
                });
            }
        }
    }

    violations.sort_by_key(|v| (v.date, v.period));
    (by_staff, violations)
}

/// Verbose diagnostics: medical needs with zero or very few usable
/// candidates, the usual cause of an unfillable week.
pub fn render_need_diagnostics(index: &NeedIndex, eligible_counts: &[usize]) -> String {
    let mut out = String::new();

    let zero: Vec<_> = index
        .medical()
        .iter()
        .filter(|n| eligible_counts[n.index] == 0)
        .collect();
    if !zero.is_empty() {
        let _ = writeln!(out, "\n--- Besoins sans éligible ({}) ---", zero.len());
        for n in &zero {
            let _ = writeln!(
                out,
                "  {} {} {:<22} {:<25} {:<15} gap={}",
                n.date,
                n.period,
                n.department,
                n.skill_name.as_deref().unwrap_or("-"),
                n.role_name.as_deref().unwrap_or("-"),
                n.gap
            );
        }
    }

    let scarce: Vec<_> = index
        .medical()
        .iter()
        .filter(|n| (1..=2).contains(&eligible_counts[n.index]))
        .collect();
    if !scarce.is_empty() {
        let _ = writeln!(out, "\n--- Besoins avec 1-2 éligibles ({}) ---", scarce.len());
        for n in &scarce {
            let _ = writeln!(
                out,
                "  {} {} {:<22} {:<25} {:<15} gap={} éligibles={}",
                n.date,
                n.period,
                n.department,
                n.skill_name.as_deref().unwrap_or("-"),
                n.role_name.as_deref().unwrap_or("-"),
                n.gap,
                eligible_counts[n.index]
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use secplan_core::testing::fixtures::*;
    use secplan_core::{build_model, solve, NeedIndex, ObjectiveWeights, Period};
    use std::time::Duration;

    fn solved_week() -> (WeekData, AvailabilityMap, NeedIndex, SolveOutcome) {
        let spec = NeedSpec::new(100, day(0), Period::Am, DEPT_OPHTA, 1, ROLE_STANDARD, 2);
        let (data, admin_blocks) = WeekBuilder::new()
            .secretary(secretary(1, "Durand"))
            .secretary(secretary(2, "Martin"))
            .available(1, day(0), &[Period::Am, Period::Pm])
            .available(2, day(0), &[Period::Am])
            .need_with_candidates(spec, &[1])
            .admin_block(9000, day(0), Period::Am)
            .admin_block(9001, day(0), Period::Pm)
            .build();
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
        (data, availability, index, outcome)
    }

    #[test]
    fn report_lists_secretaries_and_totals() {
        let (data, availability, _, outcome) = solved_week();
        let report = render_report(&data, &outcome, &availability);

        assert!(report.contains("Assignation Secrétaires"));
        assert!(report.contains("Durand Test"));
        assert!(report.contains("Martin Test"));
        assert!(report.contains("Besoins médicaux: 2 total | 1 remplis | 1 non remplis"));
        assert!(report.contains("--- Besoins non remplis (1) ---"));
        assert!(report.contains("Continuité site"));
    }

    #[test]
    fn diagnostics_flag_scarce_and_orphan_needs() {
        let (_, _, index, _) = solved_week();
        // The lone medical need had exactly one usable candidate.
        let counts = vec![1; index.len()];
        let text = render_need_diagnostics(&index, &counts);
        assert!(text.contains("Besoins avec 1-2 éligibles"));

        let counts = vec![0; index.len()];
        let text = render_need_diagnostics(&index, &counts);
        assert!(text.contains("Besoins sans éligible"));
    }
}
