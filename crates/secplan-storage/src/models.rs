//! Row types decoded from the planning views and their conversions into
//! the core domain. All ids are cast to bigint and scores to int in the
//! queries so decoding does not depend on the underlying column types.

use chrono::NaiveDate;
use secplan_core::{
    AdminBlock, AvailabilityRow, BlockType, DepartmentInfo, DoctorActivity, EligibilityRow,
    ExistingAssignment, NeedRow, Period, PreferenceKind, PreferenceTarget, RoleInfo, Secretary,
    SiteInfo, StaffName, StaffPreference, StaffSkill,
};
use sqlx::FromRow;

use crate::error::Result;

#[derive(Debug, FromRow)]
pub(crate) struct AvailabilitySqlRow {
    pub id_staff: i64,
    pub date: NaiveDate,
    pub period: String,
}

impl AvailabilitySqlRow {
    pub fn into_domain(self) -> Result<AvailabilityRow> {
        Ok(AvailabilityRow {
            id_staff: self.id_staff,
            date: self.date,
            period: Period::parse(&self.period)?,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct SecretarySqlRow {
    pub id_staff: i64,
    pub lastname: String,
    pub firstname: String,
    pub is_flexible: bool,
    pub flexibility_pct: f64,
    pub full_day_only: bool,
    pub admin_target: i32,
}

impl From<SecretarySqlRow> for Secretary {
    fn from(row: SecretarySqlRow) -> Self {
        Secretary {
            id: row.id_staff,
            lastname: row.lastname,
            firstname: row.firstname,
            is_flexible: row.is_flexible,
            flexibility_pct: row.flexibility_pct,
            full_day_only: row.full_day_only,
            admin_target: row.admin_target,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct EligibilitySqlRow {
    pub id_staff: i64,
    pub id_block: i64,
    pub date: NaiveDate,
    pub period: String,
    pub block_type: String,
    pub department: String,
    pub site: String,
    pub skill_name: Option<String>,
    pub role_name: Option<String>,
    pub id_skill: Option<i64>,
    pub id_role: Option<i64>,
    pub gap: i32,
    pub id_department: i64,
    pub id_site: Option<i64>,
    pub skill_score: i32,
    pub eviter_site_score: i32,
    pub eviter_dept_score: i32,
    pub eviter_staff_score: i32,
    pub prefere_site_score: i32,
    pub prefere_dept_score: i32,
    pub prefere_staff_score: i32,
}

impl EligibilitySqlRow {
    pub fn into_domain(self) -> Result<EligibilityRow> {
        Ok(EligibilityRow {
            id_staff: self.id_staff,
            id_block: self.id_block,
            date: self.date,
            period: Period::parse(&self.period)?,
            block_type: BlockType::from(self.block_type),
            department: self.department,
            site: self.site,
            skill_name: self.skill_name,
            role_name: self.role_name,
            id_skill: self.id_skill,
            id_role: self.id_role,
            gap: self.gap,
            id_department: self.id_department,
            id_site: self.id_site,
            skill_score: self.skill_score,
            eviter_site_score: self.eviter_site_score,
            eviter_dept_score: self.eviter_dept_score,
            eviter_staff_score: self.eviter_staff_score,
            prefere_site_score: self.prefere_site_score,
            prefere_dept_score: self.prefere_dept_score,
            prefere_staff_score: self.prefere_staff_score,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct NeedSqlRow {
    pub id_block: i64,
    pub date: NaiveDate,
    pub period: String,
    pub block_type: String,
    pub department: String,
    pub site: String,
    pub skill_name: Option<String>,
    pub role_name: Option<String>,
    pub id_skill: Option<i64>,
    pub id_role: Option<i64>,
    pub needed: i32,
    pub assigned: i32,
    pub gap: i32,
    pub id_department: i64,
    pub id_site: Option<i64>,
}

impl NeedSqlRow {
    pub fn into_domain(self) -> Result<NeedRow> {
        Ok(NeedRow {
            id_block: self.id_block,
            date: self.date,
            period: Period::parse(&self.period)?,
            block_type: BlockType::from(self.block_type),
            department: self.department,
            site: self.site,
            skill_name: self.skill_name,
            role_name: self.role_name,
            id_skill: self.id_skill,
            id_role: self.id_role,
            needed: self.needed,
            assigned: self.assigned,
            gap: self.gap,
            id_department: self.id_department,
            id_site: self.id_site,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ExistingSqlRow {
    pub id_block: i64,
    pub id_staff: i64,
    pub id_role: Option<i64>,
    pub date: NaiveDate,
    pub period: String,
}

impl ExistingSqlRow {
    pub fn into_domain(self) -> Result<ExistingAssignment> {
        Ok(ExistingAssignment {
            id_block: self.id_block,
            id_staff: self.id_staff,
            id_role: self.id_role,
            date: self.date,
            period: Period::parse(&self.period)?,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct DepartmentSqlRow {
    pub id_department: i64,
    pub name: String,
    pub id_site: i64,
    pub site_name: String,
}

impl From<DepartmentSqlRow> for DepartmentInfo {
    fn from(row: DepartmentSqlRow) -> Self {
        DepartmentInfo {
            id_department: row.id_department,
            name: row.name,
            id_site: row.id_site,
            site_name: row.site_name,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct SiteSqlRow {
    pub id_site: i64,
    pub name: String,
}

impl From<SiteSqlRow> for SiteInfo {
    fn from(row: SiteSqlRow) -> Self {
        SiteInfo {
            id_site: row.id_site,
            name: row.name,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct RoleSqlRow {
    pub id_role: i64,
    pub name: String,
    pub hardship_weight: i32,
}

impl From<RoleSqlRow> for RoleInfo {
    fn from(row: RoleSqlRow) -> Self {
        RoleInfo {
            id_role: row.id_role,
            name: row.name,
            hardship_weight: row.hardship_weight,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct PreferenceSqlRow {
    pub id_staff: i64,
    pub target_type: String,
    pub id_site: Option<i64>,
    pub id_department: Option<i64>,
    pub id_target_staff: Option<i64>,
    pub preference: String,
}

impl PreferenceSqlRow {
    pub fn into_domain(self) -> Result<StaffPreference> {
        Ok(StaffPreference {
            id_staff: self.id_staff,
            target_type: PreferenceTarget::parse(&self.target_type)?,
            id_site: self.id_site,
            id_department: self.id_department,
            id_target_staff: self.id_target_staff,
            preference: PreferenceKind::parse(&self.preference)?,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct DoctorActivitySqlRow {
    pub id_assignment: i64,
    pub id_block: i64,
    pub id_staff: i64,
    pub id_activity: i64,
    pub id_skill: i64,
}

impl From<DoctorActivitySqlRow> for DoctorActivity {
    fn from(row: DoctorActivitySqlRow) -> Self {
        DoctorActivity {
            id_assignment: row.id_assignment,
            id_block: row.id_block,
            id_staff: row.id_staff,
            id_activity: row.id_activity,
            id_skill: row.id_skill,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct StaffNameSqlRow {
    pub id_staff: i64,
    pub lastname: String,
    pub firstname: String,
}

impl From<StaffNameSqlRow> for StaffName {
    fn from(row: StaffNameSqlRow) -> Self {
        StaffName {
            id_staff: row.id_staff,
            lastname: row.lastname,
            firstname: row.firstname,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct StaffSkillSqlRow {
    pub id_staff: i64,
    pub id_skill: i64,
}

impl From<StaffSkillSqlRow> for StaffSkill {
    fn from(row: StaffSkillSqlRow) -> Self {
        StaffSkill {
            id_staff: row.id_staff,
            id_skill: row.id_skill,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct AdminBlockSqlRow {
    pub id_block: i64,
    pub date: NaiveDate,
    pub period: String,
    pub id_department: i64,
}

impl AdminBlockSqlRow {
    pub fn into_domain(self) -> Result<AdminBlock> {
        Ok(AdminBlock {
            id_block: self.id_block,
            date: self.date,
            period: Period::parse(&self.period)?,
            id_department: self.id_department,
        })
    }
}

/// A doctor assignment as shown in the HTML week view.
#[derive(Debug, Clone, FromRow)]
pub struct DoctorViewRow {
    pub id_staff: i64,
    pub lastname: String,
    pub firstname: String,
    pub date: NaiveDate,
    pub period: String,
    pub department: String,
    pub site: String,
    pub position_name: Option<String>,
}
