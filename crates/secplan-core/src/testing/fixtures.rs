//! In-memory week fixtures for solver and index tests.

use crate::domain::*;
use chrono::{Days, NaiveDate};

/// Monday of the fixture week.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
}

/// Day offset within the fixture week (0 = Monday).
pub fn day(offset: u64) -> NaiveDate {
    monday() + Days::new(offset)
}

pub fn secretary(id: StaffId, lastname: &str) -> Secretary {
    Secretary {
        id,
        lastname: lastname.to_string(),
        firstname: "Test".to_string(),
        is_flexible: false,
        flexibility_pct: 1.0,
        full_day_only: false,
        admin_target: 0,
    }
}

pub fn flexible(id: StaffId, lastname: &str, pct: f64, full_day_only: bool) -> Secretary {
    Secretary {
        is_flexible: true,
        flexibility_pct: pct,
        full_day_only,
        ..secretary(id, lastname)
    }
}

/// Builds a `WeekData` plus its admin blocks piece by piece.
///
/// Ships with two sites, a handful of departments (including
/// "Administration") and the standard role table so most tests only add
/// secretaries, availability and needs.
pub struct WeekBuilder {
    data: WeekData,
    admin_blocks: Vec<AdminBlock>,
}

pub const DEPT_OPHTA: DepartmentId = 10;
pub const DEPT_CHIR: DepartmentId = 11;
pub const DEPT_RETINE: DepartmentId = 12;
pub const DEPT_ADMIN: DepartmentId = 99;

pub const SITE_CENTRE: SiteId = 1;
pub const SITE_NORD: SiteId = 2;

pub const ROLE_STANDARD: RoleId = 1;
pub const ROLE_RECEPTION: RoleId = 2;
pub const ROLE_ACCUEIL: RoleId = 3;
pub const ROLE_AIDE_FERMETURE: RoleId = 4;
pub const ROLE_FERMETURE: RoleId = 5;

impl WeekBuilder {
    pub fn new() -> Self {
        let sites = vec![
            SiteInfo {
                id_site: SITE_CENTRE,
                name: "Centre".to_string(),
            },
            SiteInfo {
                id_site: SITE_NORD,
                name: "Nord".to_string(),
            },
        ];
        let departments = vec![
            dept(DEPT_OPHTA, "Ophtalmologie", SITE_CENTRE, "Centre"),
            dept(DEPT_CHIR, "Chirurgie", SITE_CENTRE, "Centre"),
            dept(DEPT_RETINE, "Retine", SITE_NORD, "Nord"),
            dept(DEPT_ADMIN, "Administration", SITE_CENTRE, "Centre"),
        ];
        let roles = vec![
            role(ROLE_STANDARD, "Standard", 0),
            role(ROLE_RECEPTION, "Reception", 0),
            role(ROLE_ACCUEIL, "Accueil", 0),
            role(ROLE_AIDE_FERMETURE, "Aide fermeture", 2),
            role(ROLE_FERMETURE, "Fermeture", 3),
        ];

        Self {
            data: WeekData {
                week: Week::starting(monday()).unwrap(),
                secretaries: Vec::new(),
                availability: Vec::new(),
                eligibility: Vec::new(),
                needs: Vec::new(),
                existing: Vec::new(),
                departments,
                sites,
                roles,
                preferences: Vec::new(),
                doctor_activities: Vec::new(),
                admin_dept_id: Some(DEPT_ADMIN),
                all_secretaries: Vec::new(),
                skills: Vec::new(),
            },
            admin_blocks: Vec::new(),
        }
    }

    pub fn secretary(mut self, sec: Secretary) -> Self {
        self.data.all_secretaries.push(StaffName {
            id_staff: sec.id,
            lastname: sec.lastname.clone(),
            firstname: sec.firstname.clone(),
        });
        self.data.secretaries.push(sec);
        self
    }

    pub fn available(mut self, staff: StaffId, date: NaiveDate, periods: &[Period]) -> Self {
        for &period in periods {
            self.data.availability.push(AvailabilityRow {
                id_staff: staff,
                date,
                period,
            });
        }
        self
    }

    /// Declares a medical need in the staffing-gap view.
    pub fn need(mut self, spec: NeedSpec) -> Self {
        let row = spec.to_row(&self.data);
        self.data.needs.push(row);
        self
    }

    /// Declares a medical need together with eligibility rows for the given
    /// secretaries (default scores).
    pub fn need_with_candidates(mut self, spec: NeedSpec, staff: &[StaffId]) -> Self {
        let rows: Vec<EligibilityRow> = staff
            .iter()
            .map(|&sid| spec.eligibility(sid, &self.data))
            .collect();
        self.data.eligibility.extend(rows);
        let row = spec.to_row(&self.data);
        self.data.needs.push(row);
        self
    }

    pub fn eligibility(mut self, row: EligibilityRow) -> Self {
        self.data.eligibility.push(row);
        self
    }

    pub fn admin_block(mut self, id_block: BlockId, date: NaiveDate, period: Period) -> Self {
        self.admin_blocks.push(AdminBlock {
            id_block,
            date,
            period,
            id_department: DEPT_ADMIN,
        });
        self
    }

    /// One admin block per weekday half-day (Mon-Sat), ids starting at 9000.
    pub fn admin_week(mut self) -> Self {
        let mut id = 9000;
        for offset in 0..6 {
            for period in Period::BOTH {
                self.admin_blocks.push(AdminBlock {
                    id_block: id,
                    date: day(offset),
                    period,
                    id_department: DEPT_ADMIN,
                });
                id += 1;
            }
        }
        self
    }

    pub fn existing(
        mut self,
        staff: StaffId,
        id_block: BlockId,
        date: NaiveDate,
        period: Period,
    ) -> Self {
        self.data.existing.push(ExistingAssignment {
            id_block,
            id_staff: staff,
            id_role: Some(ROLE_STANDARD),
            date,
            period,
        });
        self
    }

    pub fn doctor(mut self, id_assignment: AssignmentId, id_block: BlockId, id_skill: SkillId) -> Self {
        self.data.doctor_activities.push(DoctorActivity {
            id_assignment,
            id_block,
            id_staff: 500 + id_assignment,
            id_activity: 700 + id_assignment,
            id_skill,
        });
        self
    }

    pub fn preference(mut self, pref: StaffPreference) -> Self {
        self.data.preferences.push(pref);
        self
    }

    pub fn build(self) -> (WeekData, Vec<AdminBlock>) {
        (self.data, self.admin_blocks)
    }
}

impl Default for WeekBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Compact description of one medical need used by the builder.
#[derive(Debug, Clone, Copy)]
pub struct NeedSpec {
    pub id_block: BlockId,
    pub date: NaiveDate,
    pub period: Period,
    pub dept: DepartmentId,
    pub skill: SkillId,
    pub role: RoleId,
    pub gap: i32,
    pub surgery: bool,
}

impl NeedSpec {
    pub fn new(
        id_block: BlockId,
        date: NaiveDate,
        period: Period,
        dept: DepartmentId,
        skill: SkillId,
        role: RoleId,
        gap: i32,
    ) -> Self {
        Self {
            id_block,
            date,
            period,
            dept,
            skill,
            role,
            gap,
            surgery: false,
        }
    }

    pub fn surgery(mut self) -> Self {
        self.surgery = true;
        self
    }

    fn block_type(&self) -> BlockType {
        if self.surgery {
            BlockType::Surgery
        } else {
            BlockType::Consultation
        }
    }

    fn dept_info<'a>(&self, data: &'a WeekData) -> &'a DepartmentInfo {
        data.departments
            .iter()
            .find(|d| d.id_department == self.dept)
            .expect("fixture department")
    }

    fn to_row(&self, data: &WeekData) -> NeedRow {
        let dept = self.dept_info(data);
        NeedRow {
            id_block: self.id_block,
            date: self.date,
            period: self.period,
            block_type: self.block_type(),
            department: dept.name.clone(),
            site: dept.site_name.clone(),
            skill_name: Some(format!("Skill {}", self.skill)),
            role_name: role_name(self.role),
            id_skill: Some(self.skill),
            id_role: Some(self.role),
            needed: self.gap,
            assigned: 0,
            gap: self.gap,
            id_department: self.dept,
            id_site: Some(dept.id_site),
        }
    }

    pub fn eligibility(&self, staff: StaffId, data: &WeekData) -> EligibilityRow {
        let dept = self.dept_info(data);
        EligibilityRow {
            id_staff: staff,
            id_block: self.id_block,
            date: self.date,
            period: self.period,
            block_type: self.block_type(),
            department: dept.name.clone(),
            site: dept.site_name.clone(),
            skill_name: Some(format!("Skill {}", self.skill)),
            role_name: role_name(self.role),
            id_skill: Some(self.skill),
            id_role: Some(self.role),
            gap: self.gap,
            id_department: self.dept,
            id_site: Some(dept.id_site),
            skill_score: 10,
            eviter_site_score: 0,
            eviter_dept_score: 0,
            eviter_staff_score: 0,
            prefere_site_score: 0,
            prefere_dept_score: 0,
            prefere_staff_score: 0,
        }
    }
}

fn dept(id: DepartmentId, name: &str, site: SiteId, site_name: &str) -> DepartmentInfo {
    DepartmentInfo {
        id_department: id,
        name: name.to_string(),
        id_site: site,
        site_name: site_name.to_string(),
    }
}

fn role(id: RoleId, name: &str, hardship_weight: i32) -> RoleInfo {
    RoleInfo {
        id_role: id,
        name: name.to_string(),
        hardship_weight,
    }
}

fn role_name(id: RoleId) -> Option<String> {
    let name = match id {
        ROLE_STANDARD => "Standard",
        ROLE_RECEPTION => "Reception",
        ROLE_ACCUEIL => "Accueil",
        ROLE_AIDE_FERMETURE => "Aide fermeture",
        ROLE_FERMETURE => "Fermeture",
        _ => return None,
    };
    Some(name.to_string())
}
