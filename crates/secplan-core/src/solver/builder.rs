//! CP model construction.
//!
//! Declares the assignment booleans `x[s, ni]` and flexible-day booleans
//! `y[s, d]`, posts the hard constraints and assembles the weighted linear
//! objective. The model is staged here once and consumed by the driver;
//! nothing is mutated after `build_model` returns.

use crate::availability::AvailabilityMap;
use crate::domain::{DepartmentId, Period, RoleId, SiteId, StaffId, WeekData};
use crate::needs::NeedIndex;
use crate::solver::weights::{ObjectiveWeights, EVITER_WEIGHT, RECEPTION_ROLE_IDS};
use chrono::NaiveDate;
use selen::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Duration;

/// Upper bound of a per-secretary pénibilité deviation variable.
const PENIBILITE_DEV_MAX: i32 = 50;
/// Upper bound of a per-secretary workload deviation variable.
const WORKLOAD_DEV_MAX: i32 = 20;
/// Upper bound of a per-secretary admin-target deficit variable.
const ADMIN_DEFICIT_MAX: i32 = 10;

/// Counters reported under `--verbose`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelStats {
    pub x_vars: usize,
    pub y_vars: usize,
    pub aux_vars: usize,
    pub medical_needs: usize,
    pub admin_needs: usize,
    pub eviter_terms: usize,
    pub objective_terms: usize,
}

/// A staged, immutable CP model ready for one solve.
pub struct AssignmentModel {
    pub(crate) model: Model,
    pub(crate) objective: VarId,
    pub(crate) time_limit: Duration,
    /// (secretary, need index) -> assignment boolean.
    pub(crate) x: HashMap<(StaffId, usize), VarId>,
    /// (secretary, date) -> flexible worked-day boolean.
    pub(crate) y: HashMap<(StaffId, NaiveDate), VarId>,
    /// Secretaries that received a variable, per need index.
    pub(crate) active_candidates: Vec<Vec<StaffId>>,
    /// Set when the model is structurally unusable (objective overflow).
    pub(crate) invalid: Option<String>,
    pub stats: ModelStats,
}

impl AssignmentModel {
    /// Candidates that actually received a variable for a need.
    pub fn eligible_count(&self, ni: usize) -> usize {
        self.active_candidates[ni].len()
    }
}

/// One weighted objective term; `ub` is the variable's upper bound, used to
/// size the objective domain exactly.
struct Term {
    coeff: i32,
    var: VarId,
    ub: i32,
}

#[derive(Debug, Default, Clone, Copy)]
struct ScoreParts {
    skill: i32,
    prefere: i32,
    /// Number of violated avoidance components (0-3).
    eviter: i32,
}

/// Builds the full model for one week.
pub fn build_model(
    data: &WeekData,
    availability: &AvailabilityMap,
    index: &NeedIndex,
    weights: &ObjectiveWeights,
    time_limit: Duration,
) -> AssignmentModel {
    let config = SolverConfig::default().with_timeout_ms(time_limit.as_millis() as u64);
    let week_dates: Vec<NaiveDate> = data
        .availability
        .iter()
        .map(|row| row.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut builder = Builder {
        data,
        availability,
        index,
        weights,
        model: Model::with_config(config),
        x: HashMap::new(),
        y: HashMap::new(),
        scores: HashMap::new(),
        slot_needs: HashMap::new(),
        active_candidates: vec![Vec::new(); index.len()],
        week_dates,
        existing_slots: data.existing_slots(),
        role_weight: data.role_weights(),
        terms: Vec::new(),
        aux_vars: 0,
        eviter_terms: 0,
    };

    builder.create_assignment_vars();
    builder.create_flexible_day_vars();

    builder.post_slot_exclusivity();
    builder.post_gap_caps();
    builder.post_flexible_coupling();
    builder.post_flexibility_targets();
    builder.post_full_day_coupling();
    builder.post_mandatory_placement();
    builder.post_reception_continuity();

    builder.add_fill_terms();
    builder.add_site_continuity_terms();
    builder.add_penibilite_balance_terms();
    builder.add_admin_terms();
    builder.add_workload_balance_terms();

    builder.finish(time_limit)
}

struct Builder<'a> {
    data: &'a WeekData,
    availability: &'a AvailabilityMap,
    index: &'a NeedIndex,
    weights: &'a ObjectiveWeights,
    model: Model,
    x: HashMap<(StaffId, usize), VarId>,
    y: HashMap<(StaffId, NaiveDate), VarId>,
    scores: HashMap<(StaffId, usize), ScoreParts>,
    /// (secretary, date, period) -> need indices with a variable there.
    slot_needs: HashMap<(StaffId, NaiveDate, Period), Vec<usize>>,
    active_candidates: Vec<Vec<StaffId>>,
    week_dates: Vec<NaiveDate>,
    existing_slots: HashSet<(StaffId, NaiveDate, Period)>,
    role_weight: HashMap<RoleId, i32>,
    terms: Vec<Term>,
    aux_vars: usize,
    eviter_terms: usize,
}

impl<'a> Builder<'a> {
    // === Variables ===

    /// One boolean per (eligible secretary, need), skipping half-days that
    /// are unavailable or already occupied by a persisted assignment.
    fn create_assignment_vars(&mut self) {
        let data = self.data;
        let index = self.index;
        let availability = self.availability;

        for e in &data.eligibility {
            let key = (e.id_block, e.id_skill, e.id_role);
            let Some(ni) = index.lookup(&key) else {
                continue;
            };
            if !availability.is_available(e.id_staff, e.date, e.period) {
                continue;
            }
            if self.existing_slots.contains(&(e.id_staff, e.date, e.period)) {
                continue;
            }
            if self.x.contains_key(&(e.id_staff, ni)) {
                continue;
            }

            let var = self.model.bool();
            self.x.insert((e.id_staff, ni), var);
            self.active_candidates[ni].push(e.id_staff);
            self.slot_needs
                .entry((e.id_staff, e.date, e.period))
                .or_default()
                .push(ni);

            let eviter = [
                e.eviter_site_score,
                e.eviter_dept_score,
                e.eviter_staff_score,
            ]
            .iter()
            .filter(|&&score| score < 0)
            .count() as i32;
            if eviter > 0 {
                self.eviter_terms += 1;
            }
            self.scores.insert(
                (e.id_staff, ni),
                ScoreParts {
                    skill: e.skill_score,
                    prefere: e.prefere_total(),
                    eviter,
                },
            );
        }

        // Admin needs accept any available secretary.
        for need in index.admin() {
            let ni = need.index;
            for &sid in index.candidates(ni) {
                if self.existing_slots.contains(&(sid, need.date, need.period)) {
                    continue;
                }
                let var = self.model.bool();
                self.x.insert((sid, ni), var);
                self.active_candidates[ni].push(sid);
                self.slot_needs
                    .entry((sid, need.date, need.period))
                    .or_default()
                    .push(ni);
            }
        }
    }

    /// `y[s, d]` exists for flexible secretaries only: full-day-only ones
    /// need both periods available, the others at least one.
    fn create_flexible_day_vars(&mut self) {
        let data = self.data;
        let availability = self.availability;
        let dates = self.week_dates.clone();

        for sec in data.secretaries.iter().filter(|s| s.is_flexible) {
            for &d in &dates {
                let periods = availability.periods(sec.id, d);
                let wanted = if sec.full_day_only {
                    periods.contains(&Period::Am) && periods.contains(&Period::Pm)
                } else {
                    !periods.is_empty()
                };
                if wanted {
                    let var = self.model.bool();
                    self.y.insert((sec.id, d), var);
                }
            }
        }
    }

    fn slot_vars(&self, sid: StaffId, date: NaiveDate, period: Period) -> Vec<VarId> {
        self.slot_needs
            .get(&(sid, date, period))
            .map(|needs| needs.iter().map(|&ni| self.x[&(sid, ni)]).collect())
            .unwrap_or_default()
    }

    // === Hard constraints ===

    /// C1: at most one assignment per secretary per half-day.
    fn post_slot_exclusivity(&mut self) {
        let keys: Vec<(StaffId, NaiveDate, Period)> = self
            .slot_needs
            .iter()
            .filter(|(_, needs)| needs.len() > 1)
            .map(|(&key, _)| key)
            .collect();
        for (sid, date, period) in keys {
            let vars = self.slot_vars(sid, date, period);
            self.sum_le(&vars, 1);
        }
    }

    /// C2: a need is filled at most `gap` times.
    fn post_gap_caps(&mut self) {
        let index = self.index;
        for need in index.needs() {
            let vars: Vec<VarId> = self.active_candidates[need.index]
                .iter()
                .map(|&sid| self.x[&(sid, need.index)])
                .collect();
            if !vars.is_empty() {
                self.sum_le(&vars, need.gap);
            }
        }
    }

    /// C3: flexible secretaries work a half-day iff their day boolean is
    /// on (both halves for full-day-only ones).
    fn post_flexible_coupling(&mut self) {
        let data = self.data;
        let dates = self.week_dates.clone();

        for sec in data.secretaries.iter().filter(|s| s.is_flexible) {
            for &d in &dates {
                let Some(&y) = self.y.get(&(sec.id, d)) else {
                    continue;
                };
                let am = self.slot_vars(sec.id, d, Period::Am);
                let pm = self.slot_vars(sec.id, d, Period::Pm);
                if sec.full_day_only {
                    self.sum_eq_var(&am, y);
                    self.sum_eq_var(&pm, y);
                } else {
                    let both: Vec<VarId> = am.iter().chain(pm.iter()).copied().collect();

                    // y <= sum(x)
                    let mut coeffs = vec![1];
                    let mut vars = vec![y];
                    coeffs.extend(std::iter::repeat(-1).take(both.len()));
                    vars.extend(both.iter().copied());
                    self.model.int_lin_le(&coeffs, &vars, 0);

                    // sum(x) <= 2y
                    let mut coeffs = vec![1; both.len()];
                    let mut vars = both;
                    coeffs.push(-2);
                    vars.push(y);
                    self.model.int_lin_le(&coeffs, &vars, 0);
                }
            }
        }
    }

    /// C4: hard equality on the number of worked days.
    fn post_flexibility_targets(&mut self) {
        let data = self.data;
        let dates = self.week_dates.clone();

        for sec in data.secretaries.iter().filter(|s| s.is_flexible) {
            let y_vars: Vec<VarId> = dates
                .iter()
                .filter_map(|&d| self.y.get(&(sec.id, d)).copied())
                .collect();
            if y_vars.is_empty() {
                continue;
            }
            let target = (y_vars.len() as f64 * sec.flexibility_pct).round() as i32;
            let coeffs = vec![1; y_vars.len()];
            self.model.int_lin_eq(&coeffs, &y_vars, target);
        }
    }

    /// C5: non-flexible full-day-only secretaries work AM iff they work
    /// PM; a half-day whose counterpart is unavailable stays empty.
    fn post_full_day_coupling(&mut self) {
        let data = self.data;
        let dates = self.week_dates.clone();

        for sec in data
            .secretaries
            .iter()
            .filter(|s| !s.is_flexible && s.full_day_only)
        {
            for &d in &dates {
                let am = self.slot_vars(sec.id, d, Period::Am);
                let pm = self.slot_vars(sec.id, d, Period::Pm);
                match (am.is_empty(), pm.is_empty()) {
                    (false, false) => self.sums_equal(&am, &pm),
                    (false, true) => self.sum_eq(&am, 0),
                    (true, false) => self.sum_eq(&pm, 0),
                    (true, true) => {}
                }
            }
        }
    }

    /// C6: every available, unoccupied half-day with at least one
    /// candidate variable is assigned - unconditionally for non-flexible
    /// secretaries, tied to the day boolean for flexible ones. A flexible
    /// half-day with no day boolean (partial availability under
    /// full-day-only) is forced empty so worked days always coincide with
    /// y days.
    fn post_mandatory_placement(&mut self) {
        let data = self.data;
        let availability = self.availability;
        let dates = self.week_dates.clone();

        for sec in &data.secretaries {
            for &d in &dates {
                for period in Period::BOTH {
                    if !availability.is_available(sec.id, d, period) {
                        continue;
                    }
                    if self.existing_slots.contains(&(sec.id, d, period)) {
                        continue;
                    }
                    let vars = self.slot_vars(sec.id, d, period);
                    if vars.is_empty() {
                        continue;
                    }
                    if sec.is_flexible {
                        match self.y.get(&(sec.id, d)).copied() {
                            Some(y) => self.sum_eq_var(&vars, y),
                            None => self.sum_eq(&vars, 0),
                        }
                    } else {
                        self.sum_eq(&vars, 1);
                    }
                }
            }
        }
    }

    /// C7: reception-type roles keep the same person all day within a
    /// department. Secretaries present on only one period are barred from
    /// the whole (department, role) family that day.
    fn post_reception_continuity(&mut self) {
        let index = self.index;
        let mut groups: HashMap<(NaiveDate, DepartmentId, RoleId), (Vec<usize>, Vec<usize>)> =
            HashMap::new();
        for need in index.medical() {
            let Some(role) = need.id_role else { continue };
            if !RECEPTION_ROLE_IDS.contains(&role) {
                continue;
            }
            let entry = groups
                .entry((need.date, need.id_department, role))
                .or_default();
            match need.period {
                Period::Am => entry.0.push(need.index),
                Period::Pm => entry.1.push(need.index),
            }
        }

        for (am_needs, pm_needs) in groups.into_values() {
            if am_needs.is_empty() || pm_needs.is_empty() {
                continue;
            }
            let am_eligible = self.staff_with_vars(&am_needs);
            let pm_eligible = self.staff_with_vars(&pm_needs);

            let both: Vec<StaffId> = am_eligible.intersection(&pm_eligible).copied().collect();
            let am_only: Vec<StaffId> = am_eligible.difference(&pm_eligible).copied().collect();
            let pm_only: Vec<StaffId> = pm_eligible.difference(&am_eligible).copied().collect();

            for sid in both {
                let am = self.group_vars(sid, &am_needs);
                let pm = self.group_vars(sid, &pm_needs);
                self.sums_equal(&am, &pm);
            }
            for sid in am_only {
                let am = self.group_vars(sid, &am_needs);
                self.sum_eq(&am, 0);
            }
            for sid in pm_only {
                let pm = self.group_vars(sid, &pm_needs);
                self.sum_eq(&pm, 0);
            }
        }
    }

    fn staff_with_vars(&self, needs: &[usize]) -> BTreeSet<StaffId> {
        needs
            .iter()
            .flat_map(|&ni| self.active_candidates[ni].iter().copied())
            .collect()
    }

    fn group_vars(&self, sid: StaffId, needs: &[usize]) -> Vec<VarId> {
        needs
            .iter()
            .filter_map(|&ni| self.x.get(&(sid, ni)).copied())
            .collect()
    }

    // === Objective ===

    /// O1 + O2 + O6: medical fill bonus, skill match, expressed
    /// preferences.
    fn add_fill_terms(&mut self) {
        let index = self.index;
        for need in index.medical() {
            for &sid in &self.active_candidates[need.index] {
                let var = self.x[&(sid, need.index)];
                let parts = self
                    .scores
                    .get(&(sid, need.index))
                    .copied()
                    .unwrap_or(ScoreParts {
                        skill: 10,
                        prefere: 0,
                        eviter: 0,
                    });
                let score = self.weights.fill_bonus
                    + parts.skill * self.weights.skill_mult
                    + parts.prefere * self.weights.prefere_mult;
                self.terms.push(Term {
                    coeff: score,
                    var,
                    ub: 1,
                });
            }
        }
    }

    /// O3: same-site AM/PM bonus and cross-site penalty, per secretary and
    /// day. Both are AND-linearizations of two count-at-least-one
    /// predicates; the three-inequality pattern keeps the objective honest.
    fn add_site_continuity_terms(&mut self) {
        let data = self.data;
        let index = self.index;
        let dates = self.week_dates.clone();

        let mut by_slot: HashMap<(NaiveDate, SiteId, Period), Vec<usize>> = HashMap::new();
        for need in index.medical() {
            let Some(site) = need.id_site else { continue };
            by_slot
                .entry((need.date, site, need.period))
                .or_default()
                .push(need.index);
        }
        let site_ids: Vec<SiteId> = data.sites.iter().map(|s| s.id_site).collect();

        for sec in &data.secretaries {
            for &d in &dates {
                let mut am_by_site: HashMap<SiteId, Vec<VarId>> = HashMap::new();
                let mut pm_by_site: HashMap<SiteId, Vec<VarId>> = HashMap::new();
                for &site in &site_ids {
                    for (period, out) in [
                        (Period::Am, &mut am_by_site),
                        (Period::Pm, &mut pm_by_site),
                    ] {
                        let vars: Vec<VarId> = by_slot
                            .get(&(d, site, period))
                            .into_iter()
                            .flatten()
                            .filter_map(|&ni| self.x.get(&(sec.id, ni)).copied())
                            .collect();
                        if !vars.is_empty() {
                            out.insert(site, vars);
                        }
                    }
                }
                if am_by_site.is_empty() || pm_by_site.is_empty() {
                    continue;
                }

                let am_sites: BTreeSet<SiteId> = am_by_site.keys().copied().collect();
                let pm_sites: BTreeSet<SiteId> = pm_by_site.keys().copied().collect();

                for &site in am_sites.intersection(&pm_sites) {
                    let both = self.model.bool();
                    self.aux_vars += 1;
                    self.at_most_sum(both, &am_by_site[&site]);
                    self.at_most_sum(both, &pm_by_site[&site]);
                    let bonus = self.weights.site_same_bonus;
                    self.terms.push(Term {
                        coeff: bonus,
                        var: both,
                        ub: 1,
                    });
                }

                for &site_a in &am_sites {
                    for &site_b in &pm_sites {
                        if site_a == site_b {
                            continue;
                        }
                        let am = am_by_site[&site_a].clone();
                        let pm = pm_by_site[&site_b].clone();
                        let cross = self.model.bool();
                        self.aux_vars += 1;

                        // cross >= sum(am) + sum(pm) - 1
                        let mut coeffs = vec![1; am.len() + pm.len()];
                        let mut vars: Vec<VarId> =
                            am.iter().chain(pm.iter()).copied().collect();
                        coeffs.push(-1);
                        vars.push(cross);
                        self.model.int_lin_le(&coeffs, &vars, 1);

                        self.at_most_sum(cross, &am);
                        self.at_most_sum(cross, &pm);
                        let penalty = self.weights.site_cross_penalty;
                        self.terms.push(Term {
                            coeff: penalty,
                            var: cross,
                            ub: 1,
                        });
                    }
                }
            }
        }
    }

    /// O4: spread the combined pénibilité (role hardship + avoidance
    /// violations) evenly across active secretaries.
    fn add_penibilite_balance_terms(&mut self) {
        let data = self.data;
        let index = self.index;

        let mut loads: Vec<Vec<(i32, VarId)>> = Vec::new();
        for sec in &data.secretaries {
            let mut parts: Vec<(i32, VarId)> = Vec::new();
            for need in index.medical() {
                let Some(&var) = self.x.get(&(sec.id, need.index)) else {
                    continue;
                };
                let hardship = need
                    .id_role
                    .and_then(|r| self.role_weight.get(&r).copied())
                    .unwrap_or(0);
                if hardship > 0 {
                    parts.push((hardship, var));
                }
                let eviter = self
                    .scores
                    .get(&(sec.id, need.index))
                    .map(|p| p.eviter)
                    .unwrap_or(0);
                if eviter > 0 {
                    parts.push((eviter * EVITER_WEIGHT, var));
                }
            }
            if !parts.is_empty() {
                loads.push(parts);
            }
        }
        if loads.is_empty() {
            return;
        }

        let total_hardship: i64 = index
            .medical()
            .iter()
            .map(|need| {
                let w = need
                    .id_role
                    .and_then(|r| self.role_weight.get(&r).copied())
                    .unwrap_or(0) as i64;
                need.gap as i64 * w
            })
            .sum();
        let avg = (total_hardship / loads.len() as i64) as i32;

        let penalty = self.weights.penibilite_dev_penalty;
        for parts in loads {
            let dev = self.deviation_from_average(&parts, avg, PENIBILITE_DEV_MAX);
            self.terms.push(Term {
                coeff: penalty,
                var: dev,
                ub: PENIBILITE_DEV_MAX,
            });
        }
    }

    /// O7 + O8: small admin fill reward plus the admin-target deficit
    /// penalty.
    fn add_admin_terms(&mut self) {
        let data = self.data;
        let index = self.index;

        for need in index.admin() {
            for &sid in &self.active_candidates[need.index] {
                let var = self.x[&(sid, need.index)];
                let bonus = self.weights.admin_fill_bonus;
                self.terms.push(Term {
                    coeff: bonus,
                    var,
                    ub: 1,
                });
            }
        }

        for sec in &data.secretaries {
            if sec.admin_target <= 0 {
                continue;
            }
            let admin_vars: Vec<VarId> = index
                .admin()
                .iter()
                .filter_map(|need| self.x.get(&(sec.id, need.index)).copied())
                .collect();
            if admin_vars.is_empty() {
                continue;
            }

            // deficit >= target - sum(admin)
            let deficit = self.model.int(0, ADMIN_DEFICIT_MAX);
            self.aux_vars += 1;
            let mut coeffs = vec![-1; admin_vars.len()];
            let mut vars = admin_vars;
            coeffs.push(-1);
            vars.push(deficit);
            self.model.int_lin_le(&coeffs, &vars, -sec.admin_target);

            let penalty = self.weights.admin_target_penalty;
            self.terms.push(Term {
                coeff: penalty,
                var: deficit,
                ub: ADMIN_DEFICIT_MAX,
            });
        }
    }

    /// O9: spread the medical count evenly across active secretaries.
    fn add_workload_balance_terms(&mut self) {
        let data = self.data;
        let index = self.index;

        let counted = if self.weights.count_admin_in_balance {
            index.needs()
        } else {
            index.medical()
        };

        let mut loads: Vec<Vec<(i32, VarId)>> = Vec::new();
        for sec in &data.secretaries {
            let vars: Vec<(i32, VarId)> = counted
                .iter()
                .filter_map(|need| self.x.get(&(sec.id, need.index)).map(|&v| (1, v)))
                .collect();
            if !vars.is_empty() {
                loads.push(vars);
            }
        }
        if loads.is_empty() {
            return;
        }

        let total_gap: i64 = index.medical().iter().map(|n| n.gap as i64).sum();
        let avg = (total_gap / loads.len() as i64) as i32;

        let penalty = self.weights.workload_dev_penalty;
        for vars in loads {
            let dev = self.deviation_from_average(&vars, avg, WORKLOAD_DEV_MAX);
            self.terms.push(Term {
                coeff: penalty,
                var: dev,
                ub: WORKLOAD_DEV_MAX,
            });
        }
    }

    // === Assembly ===

    fn finish(mut self, time_limit: Duration) -> AssignmentModel {
        let mut lo: i64 = 0;
        let mut hi: i64 = 0;
        for term in &self.terms {
            let extent = term.coeff as i64 * term.ub as i64;
            if extent >= 0 {
                hi += extent;
            } else {
                lo += extent;
            }
        }

        let mut invalid = None;
        let objective = if self.terms.is_empty() {
            self.model.int(0, 0)
        } else if lo < i32::MIN as i64 || hi > i32::MAX as i64 {
            invalid = Some(format!(
                "objective bounds [{lo}, {hi}] exceed the solver's integer range"
            ));
            self.model.int(0, 0)
        } else {
            let obj = self.model.int(lo as i32, hi as i32);
            let mut coeffs: Vec<i32> = self.terms.iter().map(|t| t.coeff).collect();
            let mut vars: Vec<VarId> = self.terms.iter().map(|t| t.var).collect();
            coeffs.push(-1);
            vars.push(obj);
            self.model.int_lin_eq(&coeffs, &vars, 0);
            obj
        };

        let stats = ModelStats {
            x_vars: self.x.len(),
            y_vars: self.y.len(),
            aux_vars: self.aux_vars,
            medical_needs: self.index.medical().len(),
            admin_needs: self.index.admin().len(),
            eviter_terms: self.eviter_terms,
            objective_terms: self.terms.len(),
        };
        tracing::debug!(
            x_vars = stats.x_vars,
            y_vars = stats.y_vars,
            aux_vars = stats.aux_vars,
            objective_terms = stats.objective_terms,
            "model staged"
        );

        AssignmentModel {
            model: self.model,
            objective,
            time_limit,
            x: self.x,
            y: self.y,
            active_candidates: self.active_candidates,
            invalid,
            stats,
        }
    }

    // === Linear helpers ===

    fn sum_le(&mut self, vars: &[VarId], bound: i32) {
        if vars.is_empty() {
            return;
        }
        let coeffs = vec![1; vars.len()];
        self.model.int_lin_le(&coeffs, vars, bound);
    }

    fn sum_eq(&mut self, vars: &[VarId], value: i32) {
        if vars.is_empty() {
            return;
        }
        let coeffs = vec![1; vars.len()];
        self.model.int_lin_eq(&coeffs, vars, value);
    }

    /// sum(vars) == rhs
    fn sum_eq_var(&mut self, vars: &[VarId], rhs: VarId) {
        let mut coeffs = vec![1; vars.len()];
        let mut all: Vec<VarId> = vars.to_vec();
        coeffs.push(-1);
        all.push(rhs);
        self.model.int_lin_eq(&coeffs, &all, 0);
    }

    /// sum(left) == sum(right)
    fn sums_equal(&mut self, left: &[VarId], right: &[VarId]) {
        let mut coeffs = vec![1; left.len()];
        coeffs.extend(std::iter::repeat(-1).take(right.len()));
        let vars: Vec<VarId> = left.iter().chain(right.iter()).copied().collect();
        self.model.int_lin_eq(&coeffs, &vars, 0);
    }

    /// aux <= sum(vars)
    fn at_most_sum(&mut self, aux: VarId, vars: &[VarId]) {
        let mut coeffs = vec![1];
        let mut all = vec![aux];
        coeffs.extend(std::iter::repeat(-1).take(vars.len()));
        all.extend(vars.iter().copied());
        self.model.int_lin_le(&coeffs, &all, 0);
    }

    /// Posts `dev >= |load - avg|` for a weighted load and returns the
    /// deviation variable.
    fn deviation_from_average(&mut self, parts: &[(i32, VarId)], avg: i32, max: i32) -> VarId {
        let dev = self.model.int(0, max);
        self.aux_vars += 1;

        // load - dev <= avg
        let mut coeffs: Vec<i32> = parts.iter().map(|&(w, _)| w).collect();
        let mut vars: Vec<VarId> = parts.iter().map(|&(_, v)| v).collect();
        coeffs.push(-1);
        vars.push(dev);
        self.model.int_lin_le(&coeffs, &vars, avg);

        // -load - dev <= -avg
        let mut coeffs: Vec<i32> = parts.iter().map(|&(w, _)| -w).collect();
        let mut vars: Vec<VarId> = parts.iter().map(|&(_, v)| v).collect();
        coeffs.push(-1);
        vars.push(dev);
        self.model.int_lin_le(&coeffs, &vars, -avg);

        dev
    }
}
