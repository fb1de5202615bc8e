use super::errors::DomainError;
use super::week::Week;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub type StaffId = i64;
pub type BlockId = i64;
pub type SkillId = i64;
pub type RoleId = i64;
pub type DepartmentId = i64;
pub type SiteId = i64;
pub type AssignmentId = i64;

/// Half-day period of a work block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl Period {
    pub const BOTH: [Period; 2] = [Period::Am, Period::Pm];

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "AM" => Ok(Period::Am),
            "PM" => Ok(Period::Pm),
            _ => Err(DomainError::InvalidPeriod(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Am => "AM",
            Period::Pm => "PM",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Family of a work block. Medical families come from the schedule; ADMIN
/// blocks are created by the planner itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    Surgery,
    Consultation,
    Admin,
    Other(String),
}

impl BlockType {
    pub fn as_str(&self) -> &str {
        match self {
            BlockType::Surgery => "SURGERY",
            BlockType::Consultation => "CONSULTATION",
            BlockType::Admin => "ADMIN",
            BlockType::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for BlockType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "SURGERY" => BlockType::Surgery,
            "CONSULTATION" => BlockType::Consultation,
            "ADMIN" => BlockType::Admin,
            _ => BlockType::Other(s),
        }
    }
}

impl From<BlockType> for String {
    fn from(bt: BlockType) -> Self {
        bt.as_str().to_string()
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tag distinguishing medical needs (from the staffing views) from the
/// admin fallback needs created by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NeedKind {
    Medical,
    Admin,
}

/// A secretary and her planning settings for the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Secretary {
    pub id: StaffId,
    pub lastname: String,
    pub firstname: String,
    pub is_flexible: bool,
    /// Fraction of available days that must actually be worked. Hard target.
    pub flexibility_pct: f64,
    /// AM and PM of a worked day must both be assigned.
    pub full_day_only: bool,
    /// Desired number of administrative half-days this week.
    pub admin_target: i32,
}

impl Secretary {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.lastname, self.firstname)
    }
}

/// One (secretary, date, period) tuple from the availability view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRow {
    pub id_staff: StaffId,
    pub date: NaiveDate,
    pub period: Period,
}

/// Pre-computed (secretary, need) pair from the eligibility view, with the
/// decomposed score components. The solver never recomputes these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityRow {
    pub id_staff: StaffId,
    pub id_block: BlockId,
    pub date: NaiveDate,
    pub period: Period,
    pub block_type: BlockType,
    pub department: String,
    pub site: String,
    pub skill_name: Option<String>,
    pub role_name: Option<String>,
    pub id_skill: Option<SkillId>,
    pub id_role: Option<RoleId>,
    pub gap: i32,
    pub id_department: DepartmentId,
    pub id_site: Option<SiteId>,
    pub skill_score: i32,
    pub eviter_site_score: i32,
    pub eviter_dept_score: i32,
    pub eviter_staff_score: i32,
    pub prefere_site_score: i32,
    pub prefere_dept_score: i32,
    pub prefere_staff_score: i32,
}

impl EligibilityRow {
    /// Sum of the positive preference components, carried verbatim into the
    /// objective.
    pub fn prefere_total(&self) -> i32 {
        self.prefere_site_score + self.prefere_dept_score + self.prefere_staff_score
    }

    /// True when assigning here violates at least one soft avoidance.
    pub fn violates_eviter(&self) -> bool {
        self.eviter_site_score < 0 || self.eviter_dept_score < 0 || self.eviter_staff_score < 0
    }
}

/// One row of the staffing-gap view (gap > 0), kept even when no secretary
/// is eligible so the need can be reported as unfilled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeedRow {
    pub id_block: BlockId,
    pub date: NaiveDate,
    pub period: Period,
    pub block_type: BlockType,
    pub department: String,
    pub site: String,
    pub skill_name: Option<String>,
    pub role_name: Option<String>,
    pub id_skill: Option<SkillId>,
    pub id_role: Option<RoleId>,
    pub needed: i32,
    pub assigned: i32,
    pub gap: i32,
    pub id_department: DepartmentId,
    pub id_site: Option<SiteId>,
}

/// A previously persisted MANUAL secretary assignment. Its half-day is
/// removed from the model entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingAssignment {
    pub id_block: BlockId,
    pub id_staff: StaffId,
    pub id_role: Option<RoleId>,
    pub date: NaiveDate,
    pub period: Period,
}

/// A doctor assignment with the skill its activity requires, used by the
/// surgery linkage post-processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorActivity {
    pub id_assignment: AssignmentId,
    pub id_block: BlockId,
    pub id_staff: StaffId,
    pub id_activity: i64,
    pub id_skill: SkillId,
}

/// An ADMIN work block (one per workday half-day, created idempotently).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminBlock {
    pub id_block: BlockId,
    pub date: NaiveDate,
    pub period: Period,
    pub id_department: DepartmentId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleInfo {
    pub id_role: RoleId,
    pub name: String,
    /// How tiring the role is (Standard = 0, Aide fermeture = 2, Fermeture = 3).
    pub hardship_weight: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteInfo {
    pub id_site: SiteId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentInfo {
    pub id_department: DepartmentId,
    pub name: String,
    pub id_site: SiteId,
    pub site_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreferenceKind {
    Prefere,
    Eviter,
}

impl PreferenceKind {
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "PREFERE" => Ok(PreferenceKind::Prefere),
            "EVITER" => Ok(PreferenceKind::Eviter),
            _ => Err(DomainError::InvalidPreference(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreferenceTarget {
    Site,
    Department,
    Staff,
}

impl PreferenceTarget {
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "SITE" => Ok(PreferenceTarget::Site),
            "DEPARTMENT" => Ok(PreferenceTarget::Department),
            "STAFF" => Ok(PreferenceTarget::Staff),
            _ => Err(DomainError::InvalidPreference(s.to_string())),
        }
    }
}

/// A declared staff preference (report display only; the solver sees the
/// decomposed scores instead).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffPreference {
    pub id_staff: StaffId,
    pub target_type: PreferenceTarget,
    pub id_site: Option<SiteId>,
    pub id_department: Option<DepartmentId>,
    pub id_target_staff: Option<StaffId>,
    pub preference: PreferenceKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffName {
    pub id_staff: StaffId,
    pub lastname: String,
    pub firstname: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffSkill {
    pub id_staff: StaffId,
    pub id_skill: SkillId,
}

/// Everything loaded for one week of assignment.
#[derive(Debug, Clone)]
pub struct WeekData {
    pub week: Week,
    pub secretaries: Vec<Secretary>,
    pub availability: Vec<AvailabilityRow>,
    pub eligibility: Vec<EligibilityRow>,
    pub needs: Vec<NeedRow>,
    pub existing: Vec<ExistingAssignment>,
    pub departments: Vec<DepartmentInfo>,
    pub sites: Vec<SiteInfo>,
    pub roles: Vec<RoleInfo>,
    pub preferences: Vec<StaffPreference>,
    pub doctor_activities: Vec<DoctorActivity>,
    pub admin_dept_id: Option<DepartmentId>,
    pub all_secretaries: Vec<StaffName>,
    pub skills: Vec<StaffSkill>,
}

impl WeekData {
    pub fn secretary(&self, id: StaffId) -> Option<&Secretary> {
        self.secretaries.iter().find(|s| s.id == id)
    }

    /// Role id -> hardship weight, defaulted to 1 for roles without one.
    pub fn role_weights(&self) -> HashMap<RoleId, i32> {
        self.roles
            .iter()
            .map(|r| (r.id_role, r.hardship_weight))
            .collect()
    }

    pub fn department_sites(&self) -> HashMap<DepartmentId, SiteId> {
        self.departments
            .iter()
            .map(|d| (d.id_department, d.id_site))
            .collect()
    }

    /// Half-days blocked by previously persisted MANUAL assignments.
    pub fn existing_slots(&self) -> HashSet<(StaffId, NaiveDate, Period)> {
        self.existing
            .iter()
            .map(|ea| (ea.id_staff, ea.date, ea.period))
            .collect()
    }
}

/// One assignment extracted from a solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id_block: BlockId,
    pub id_staff: StaffId,
    pub id_role: Option<RoleId>,
    pub id_skill: Option<SkillId>,
    /// Doctor assignment assisted on the same surgery block, when resolved.
    pub id_linked_doctor: Option<AssignmentId>,
    pub date: NaiveDate,
    pub period: Period,
    pub kind: NeedKind,
    pub block_type: BlockType,
    pub department: String,
    pub site: String,
    pub skill_name: Option<String>,
    pub role_name: Option<String>,
}

/// A medical need left with fewer assignees than its gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnfilledNeed {
    pub id_block: BlockId,
    pub date: NaiveDate,
    pub period: Period,
    pub department: String,
    pub site: String,
    pub skill_name: Option<String>,
    pub role_name: Option<String>,
    pub gap: i32,
    pub filled: i32,
    pub remaining: i32,
    pub eligible_count: usize,
}
