//! Canonical indexed need collection.
//!
//! Medical needs are inserted first (deduplicated between the eligibility
//! view and the raw staffing-gap view), admin needs after; the partition
//! point is remembered so extraction can tell the two apart cheaply.

use crate::availability::AvailabilityMap;
use crate::domain::{
    AdminBlock, BlockId, BlockType, DepartmentId, NeedKind, Period, RoleId, SiteId, SkillId,
    StaffId, WeekData,
};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// Nominal gap of an admin need: large enough never to bind, only there to
/// allow overflow placement.
pub const ADMIN_NEED_GAP: i32 = 30;

/// Role assigned to admin needs ("Standard").
pub const STANDARD_ROLE_ID: RoleId = 1;

/// Identity of a need: a block can request several (skill, role) pairs.
pub type NeedKey = (BlockId, Option<SkillId>, Option<RoleId>);

/// One slot-request the solver can fill, medical or admin.
#[derive(Debug, Clone, PartialEq)]
pub struct Need {
    pub index: usize,
    pub kind: NeedKind,
    pub id_block: BlockId,
    pub date: NaiveDate,
    pub period: Period,
    pub block_type: BlockType,
    pub id_department: DepartmentId,
    pub id_site: Option<SiteId>,
    pub id_skill: Option<SkillId>,
    pub id_role: Option<RoleId>,
    pub gap: i32,
    pub department: String,
    pub site: String,
    pub skill_name: Option<String>,
    pub role_name: Option<String>,
}

impl Need {
    pub fn key(&self) -> NeedKey {
        (self.id_block, self.id_skill, self.id_role)
    }
}

/// Indexed needs plus the raw candidate list per need.
///
/// Candidates are pre-eligibility only: the model builder still filters out
/// occupied half-days before creating variables.
#[derive(Debug, Clone, Default)]
pub struct NeedIndex {
    needs: Vec<Need>,
    by_key: HashMap<NeedKey, usize>,
    candidates: Vec<Vec<StaffId>>,
    admin_offset: usize,
}

impl NeedIndex {
    /// Builds the canonical need list for one week.
    pub fn build(
        data: &WeekData,
        admin_blocks: &[AdminBlock],
        availability: &AvailabilityMap,
    ) -> Self {
        let dept_sites = data.department_sites();

        let mut index = NeedIndex::default();
        let mut seen_candidates: HashSet<(StaffId, usize)> = HashSet::new();

        // Medical needs: the eligibility view is authoritative for the rows
        // it covers.
        for e in &data.eligibility {
            let key = (e.id_block, e.id_skill, e.id_role);
            let ni = match index.by_key.get(&key).copied() {
                Some(ni) => ni,
                None => index.push(Need {
                    index: 0,
                    kind: NeedKind::Medical,
                    id_block: e.id_block,
                    date: e.date,
                    period: e.period,
                    block_type: e.block_type.clone(),
                    id_department: e.id_department,
                    id_site: e.id_site,
                    id_skill: e.id_skill,
                    id_role: e.id_role,
                    gap: e.gap,
                    department: e.department.clone(),
                    site: e.site.clone(),
                    skill_name: e.skill_name.clone(),
                    role_name: e.role_name.clone(),
                }),
            };
            if seen_candidates.insert((e.id_staff, ni)) {
                index.candidates[ni].push(e.id_staff);
            }
        }

        // Staffing-gap rows with no eligibility row are still indexed so
        // they can be reported as unfilled; they carry zero candidates.
        for n in &data.needs {
            let key = (n.id_block, n.id_skill, n.id_role);
            if index.by_key.contains_key(&key) {
                continue;
            }
            index.push(Need {
                index: 0,
                kind: NeedKind::Medical,
                id_block: n.id_block,
                date: n.date,
                period: n.period,
                block_type: n.block_type.clone(),
                id_department: n.id_department,
                id_site: n.id_site.or_else(|| dept_sites.get(&n.id_department).copied()),
                id_skill: n.id_skill,
                id_role: n.id_role,
                gap: n.gap,
                department: n.department.clone(),
                site: n.site.clone(),
                skill_name: n.skill_name.clone(),
                role_name: n.role_name.clone(),
            });
        }

        index.admin_offset = index.needs.len();

        // Admin needs: any secretary available on the half-day is a
        // candidate.
        for ab in admin_blocks {
            let ni = index.push(Need {
                index: 0,
                kind: NeedKind::Admin,
                id_block: ab.id_block,
                date: ab.date,
                period: ab.period,
                block_type: BlockType::Admin,
                id_department: ab.id_department,
                id_site: dept_sites.get(&ab.id_department).copied(),
                id_skill: None,
                id_role: Some(STANDARD_ROLE_ID),
                gap: ADMIN_NEED_GAP,
                department: "Administration".to_string(),
                site: "N/A".to_string(),
                skill_name: Some("Admin".to_string()),
                role_name: Some("Standard".to_string()),
            });
            let mut staff: Vec<StaffId> = availability
                .staff_ids()
                .filter(|&sid| availability.is_available(sid, ab.date, ab.period))
                .collect();
            staff.sort_unstable();
            index.candidates[ni] = staff;
        }

        index
    }

    fn push(&mut self, mut need: Need) -> usize {
        let ni = self.needs.len();
        need.index = ni;
        self.by_key.insert(need.key(), ni);
        self.needs.push(need);
        self.candidates.push(Vec::new());
        ni
    }

    pub fn needs(&self) -> &[Need] {
        &self.needs
    }

    pub fn get(&self, ni: usize) -> &Need {
        &self.needs[ni]
    }

    pub fn lookup(&self, key: &NeedKey) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    /// Raw eligible secretaries for a need (before occupied-slot filtering).
    pub fn candidates(&self, ni: usize) -> &[StaffId] {
        &self.candidates[ni]
    }

    pub fn medical(&self) -> &[Need] {
        &self.needs[..self.admin_offset]
    }

    pub fn admin(&self) -> &[Need] {
        &self.needs[self.admin_offset..]
    }

    pub fn admin_offset(&self) -> usize {
        self.admin_offset
    }

    pub fn len(&self) -> usize {
        self.needs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.needs.is_empty()
    }
}
