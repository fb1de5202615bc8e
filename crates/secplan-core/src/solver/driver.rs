//! Time-limited search, status classification and solution extraction.

use crate::domain::{Assignment, NeedKind, StaffId, UnfilledNeed, WeekData};
use crate::needs::{Need, NeedIndex};
use crate::solver::builder::AssignmentModel;
use crate::solver::linkage::link_surgery_assignments;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::time::Instant;

/// Default wall-clock budget for one solve.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 30;

/// Outcome classification, mirroring the usual CP status taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
    ModelInvalid,
    Unknown,
}

impl SolveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::ModelInvalid => "MODEL_INVALID",
            SolveStatus::Unknown => "UNKNOWN",
        }
    }

    /// True when the outcome carries a usable assignment set.
    pub fn is_solution(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Search counters from the underlying engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    pub propagations: usize,
    pub nodes: usize,
}

/// Everything extracted from one solve.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub objective: Option<i64>,
    pub wall_time: std::time::Duration,
    pub assignments: Vec<Assignment>,
    pub admin_assignments: Vec<Assignment>,
    pub unfilled: Vec<UnfilledNeed>,
    pub flexible_days: HashMap<StaffId, Vec<NaiveDate>>,
    pub search: Option<SearchStats>,
}

impl SolveOutcome {
    fn empty(status: SolveStatus, wall_time: std::time::Duration) -> Self {
        Self {
            status,
            objective: None,
            wall_time,
            assignments: Vec::new(),
            admin_assignments: Vec::new(),
            unfilled: Vec::new(),
            flexible_days: HashMap::new(),
            search: None,
        }
    }
}

/// Runs the search and extracts the best incumbent.
///
/// The engine yields improving solutions until the search space is
/// exhausted or the wall-clock budget runs out; the last incumbent wins.
/// Exhausted-within-budget means OPTIMAL, an incumbent at the deadline is
/// FEASIBLE, no incumbent is INFEASIBLE (proved) or UNKNOWN (timed out).
pub fn solve(model: AssignmentModel, data: &WeekData, index: &NeedIndex) -> SolveOutcome {
    let AssignmentModel {
        model: cp_model,
        objective,
        time_limit,
        x,
        y,
        active_candidates,
        invalid,
        stats: _,
    } = model;

    if let Some(reason) = invalid {
        tracing::warn!(%reason, "model rejected before search");
        return SolveOutcome::empty(SolveStatus::ModelInvalid, std::time::Duration::ZERO);
    }

    let started = Instant::now();
    let mut best = None;
    for solution in cp_model.maximize_and_iterate(objective) {
        best = Some(solution);
    }
    let wall_time = started.elapsed();
    let timed_out = wall_time >= time_limit;

    let Some(solution) = best else {
        let status = if timed_out {
            SolveStatus::Unknown
        } else {
            SolveStatus::Infeasible
        };
        tracing::info!(status = status.as_str(), ?wall_time, "no solution");
        return SolveOutcome::empty(status, wall_time);
    };

    let status = if timed_out {
        SolveStatus::Feasible
    } else {
        SolveStatus::Optimal
    };

    let mut assignments = Vec::new();
    let mut admin_assignments = Vec::new();
    let mut filled_per_need: HashMap<usize, i32> = HashMap::new();

    for (&(sid, ni), &var) in &x {
        if solution.get_int(var) != 1 {
            continue;
        }
        let need = index.get(ni);
        *filled_per_need.entry(ni).or_insert(0) += 1;
        let record = assignment_from(need, sid);
        match need.kind {
            NeedKind::Medical => assignments.push(record),
            NeedKind::Admin => admin_assignments.push(record),
        }
    }
    sort_assignments(&mut assignments);
    sort_assignments(&mut admin_assignments);

    let mut flexible_days: HashMap<StaffId, Vec<NaiveDate>> = HashMap::new();
    for (&(sid, date), &var) in &y {
        if solution.get_int(var) == 1 {
            flexible_days.entry(sid).or_default().push(date);
        }
    }
    for days in flexible_days.values_mut() {
        days.sort_unstable();
    }

    let mut unfilled: Vec<UnfilledNeed> = index
        .medical()
        .iter()
        .filter_map(|need| {
            let filled = filled_per_need.get(&need.index).copied().unwrap_or(0);
            (filled < need.gap).then(|| UnfilledNeed {
                id_block: need.id_block,
                date: need.date,
                period: need.period,
                department: need.department.clone(),
                site: need.site.clone(),
                skill_name: need.skill_name.clone(),
                role_name: need.role_name.clone(),
                gap: need.gap,
                filled,
                remaining: need.gap - filled,
                eligible_count: active_candidates[need.index].len(),
            })
        })
        .collect();
    unfilled.sort_by_key(|u| (u.date, u.period, u.id_block));

    link_surgery_assignments(&mut assignments, &data.doctor_activities);

    let search = SearchStats {
        propagations: solution.stats.propagation_count,
        nodes: solution.stats.node_count,
    };

    tracing::info!(
        status = status.as_str(),
        medical = assignments.len(),
        admin = admin_assignments.len(),
        unfilled = unfilled.len(),
        ?wall_time,
        "solve finished"
    );

    SolveOutcome {
        status,
        objective: Some(solution.get_int(objective) as i64),
        wall_time,
        assignments,
        admin_assignments,
        unfilled,
        flexible_days,
        search: Some(search),
    }
}

fn assignment_from(need: &Need, sid: StaffId) -> Assignment {
    Assignment {
        id_block: need.id_block,
        id_staff: sid,
        id_role: need.id_role,
        id_skill: need.id_skill,
        id_linked_doctor: None,
        date: need.date,
        period: need.period,
        kind: need.kind,
        block_type: need.block_type.clone(),
        department: need.department.clone(),
        site: need.site.clone(),
        skill_name: need.skill_name.clone(),
        role_name: need.role_name.clone(),
    }
}

fn sort_assignments(assignments: &mut [Assignment]) {
    assignments.sort_by_key(|a| (a.date, a.period, a.id_block, a.id_staff));
}
