//! Postgres boundary: week loading from the pre-computed views, idempotent
//! ADMIN-block creation, clearing of proposed assignments and the batched
//! result upsert. Doctor assignments and MANUAL secretary assignments are
//! never written.

use crate::error::Result;
use crate::models::*;
use secplan_core::{AdminBlock, Assignment, DepartmentId, DepartmentInfo, Secretary, Week, WeekData};
use sqlx::postgres::PgPoolOptions;
use sqlx::{query_as, query_scalar, PgPool, QueryBuilder};

/// Connects with a small pool; the tool runs one week at a time.
pub async fn connect(database_url: &str) -> Result<PgPlanningStore> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;
    tracing::info!("database connection established");
    Ok(PgPlanningStore::new(pool))
}

pub struct PgPlanningStore {
    pool: PgPool,
}

impl PgPlanningStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Loads everything needed for one week of assignment, using the
    /// pre-computed views.
    pub async fn load_week_data(&self, week: Week) -> Result<WeekData> {
        let (start, end) = (week.monday(), week.end());

        let availability = query_as::<_, AvailabilitySqlRow>(
            "SELECT id_staff::bigint AS id_staff, date, period
             FROM v_secretary_availability
             WHERE date BETWEEN $1 AND $2
             ORDER BY id_staff, date, period",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(AvailabilitySqlRow::into_domain)
        .collect::<Result<Vec<_>>>()?;

        let eligibility = query_as::<_, EligibilitySqlRow>(
            "SELECT id_staff::bigint AS id_staff, id_block::bigint AS id_block,
                    date, period, block_type,
                    department, site, skill_name, role_name,
                    id_skill::bigint AS id_skill, id_role::bigint AS id_role, gap::int AS gap,
                    id_department::bigint AS id_department, id_site::bigint AS id_site,
                    skill_score::int AS skill_score,
                    eviter_site_score::int AS eviter_site_score,
                    eviter_dept_score::int AS eviter_dept_score,
                    eviter_staff_score::int AS eviter_staff_score,
                    prefere_site_score::int AS prefere_site_score,
                    prefere_dept_score::int AS prefere_dept_score,
                    prefere_staff_score::int AS prefere_staff_score
             FROM v_secretary_eligibility
             WHERE date BETWEEN $1 AND $2
             ORDER BY id_staff, date, period",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(EligibilitySqlRow::into_domain)
        .collect::<Result<Vec<_>>>()?;

        let secretaries = query_as::<_, SecretarySqlRow>(
            "SELECT DISTINCT id_staff::bigint AS id_staff, lastname, firstname,
                    is_flexible, flexibility_pct::float8 AS flexibility_pct,
                    full_day_only, admin_target::int AS admin_target
             FROM v_secretary_availability
             WHERE date BETWEEN $1 AND $2
             ORDER BY lastname",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Secretary::from)
        .collect();

        let needs = query_as::<_, NeedSqlRow>(
            "SELECT sn.id_block::bigint AS id_block, sn.date, sn.period, sn.block_type,
                    sn.department, sn.site, sn.skill_name, sn.role_name,
                    sn.id_skill::bigint AS id_skill, sn.id_role::bigint AS id_role,
                    sn.needed::int AS needed, sn.assigned::int AS assigned, sn.gap::int AS gap,
                    wb.id_department::bigint AS id_department, d.id_site::bigint AS id_site
             FROM v_staffing_needs sn
             JOIN work_blocks wb ON sn.id_block = wb.id_block
             JOIN departments d ON wb.id_department = d.id_department
             WHERE sn.date BETWEEN $1 AND $2 AND sn.gap > 0",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(NeedSqlRow::into_domain)
        .collect::<Result<Vec<_>>>()?;

        let existing = query_as::<_, ExistingSqlRow>(
            "SELECT a.id_block::bigint AS id_block, a.id_staff::bigint AS id_staff,
                    a.id_role::bigint AS id_role, wb.date, wb.period
             FROM assignments a
             JOIN work_blocks wb ON a.id_block = wb.id_block
             WHERE a.assignment_type = 'SECRETARY'
               AND a.source = 'MANUAL'
               AND a.status NOT IN ('CANCELLED', 'INVALIDATED')
               AND wb.date BETWEEN $1 AND $2",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(ExistingSqlRow::into_domain)
        .collect::<Result<Vec<_>>>()?;

        let departments = query_as::<_, DepartmentSqlRow>(
            "SELECT d.id_department::bigint AS id_department, d.name,
                    d.id_site::bigint AS id_site, si.name AS site_name
             FROM departments d JOIN sites si ON d.id_site = si.id_site",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(DepartmentInfo::from)
        .collect();

        let sites = query_as::<_, SiteSqlRow>(
            "SELECT id_site::bigint AS id_site, name FROM sites ORDER BY id_site",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

        let roles = query_as::<_, RoleSqlRow>(
            "SELECT id_role::bigint AS id_role, name,
                    COALESCE(hardship_weight, 1)::int AS hardship_weight
             FROM secretary_roles ORDER BY id_role",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

        let preferences = query_as::<_, PreferenceSqlRow>(
            "SELECT sp.id_staff::bigint AS id_staff, sp.target_type,
                    sp.id_site::bigint AS id_site, sp.id_department::bigint AS id_department,
                    sp.id_target_staff::bigint AS id_target_staff, sp.preference
             FROM staff_preferences sp
             JOIN staff s ON sp.id_staff = s.id_staff
             WHERE s.id_primary_position = 2 AND s.is_active = true",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(PreferenceSqlRow::into_domain)
        .collect::<Result<Vec<_>>>()?;

        let doctor_activities = query_as::<_, DoctorActivitySqlRow>(
            "SELECT a.id_assignment::bigint AS id_assignment, a.id_block::bigint AS id_block,
                    a.id_staff::bigint AS id_staff, a.id_activity::bigint AS id_activity,
                    ar.id_skill::bigint AS id_skill
             FROM assignments a
             JOIN activity_requirements ar ON ar.id_activity = a.id_activity
             JOIN work_blocks wb ON a.id_block = wb.id_block
             WHERE a.assignment_type = 'DOCTOR'
               AND a.status NOT IN ('CANCELLED', 'INVALIDATED')
               AND a.id_activity IS NOT NULL
               AND wb.date BETWEEN $1 AND $2",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

        let admin_dept_id: Option<i64> = query_scalar(
            "SELECT id_department::bigint
             FROM departments WHERE name = 'Administration' LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        let all_secretaries = query_as::<_, StaffNameSqlRow>(
            "SELECT s.id_staff::bigint AS id_staff, s.lastname, s.firstname
             FROM staff s
             WHERE s.id_primary_position = 2 AND s.is_active = true
             ORDER BY s.lastname",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

        let skills = query_as::<_, StaffSkillSqlRow>(
            "SELECT ss.id_staff::bigint AS id_staff, ss.id_skill::bigint AS id_skill
             FROM staff_skills ss
             JOIN staff s ON ss.id_staff = s.id_staff
             WHERE s.id_primary_position = 2 AND s.is_active = true",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

        let data = WeekData {
            week,
            secretaries,
            availability,
            eligibility,
            needs,
            existing,
            departments,
            sites,
            roles,
            preferences,
            doctor_activities,
            admin_dept_id,
            all_secretaries,
            skills,
        };
        tracing::debug!(
            secretaries = data.secretaries.len(),
            eligibility = data.eligibility.len(),
            needs = data.needs.len(),
            availability = data.availability.len(),
            "week data loaded"
        );
        Ok(data)
    }

    /// Creates one ADMIN block per workday half-day of the week, skipping
    /// Sundays, holidays and any block already present. Safe to run twice.
    pub async fn create_admin_blocks(
        &self,
        week: Week,
        admin_dept: DepartmentId,
    ) -> Result<Vec<AdminBlock>> {
        let created = query_as::<_, AdminBlockSqlRow>(
            "INSERT INTO work_blocks (id_department, date, period, block_type, id_calendar)
             SELECT $1, c.date, p.period::varchar, 'ADMIN', c.id_calendar
             FROM calendar c
             CROSS JOIN (VALUES ('AM'), ('PM')) AS p(period)
             WHERE c.date BETWEEN $2 AND $3
               AND c.day_of_week NOT IN ('SUN')
               AND NOT c.is_holiday
               AND NOT EXISTS (
                 SELECT 1 FROM work_blocks wb
                 WHERE wb.block_type = 'ADMIN'
                   AND wb.date = c.date
                   AND wb.period = p.period::varchar
               )
             RETURNING id_block::bigint AS id_block, date, period,
                       id_department::bigint AS id_department",
        )
        .bind(admin_dept)
        .bind(week.monday())
        .bind(week.end())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(AdminBlockSqlRow::into_domain)
        .collect::<Result<Vec<_>>>()?;

        if !created.is_empty() {
            tracing::info!(count = created.len(), "admin blocks created");
        }
        Ok(created)
    }

    pub async fn load_admin_blocks(&self, week: Week) -> Result<Vec<AdminBlock>> {
        query_as::<_, AdminBlockSqlRow>(
            "SELECT wb.id_block::bigint AS id_block, wb.date, wb.period,
                    wb.id_department::bigint AS id_department
             FROM work_blocks wb
             WHERE wb.block_type = 'ADMIN'
               AND wb.date BETWEEN $1 AND $2
             ORDER BY wb.date, wb.period",
        )
        .bind(week.monday())
        .bind(week.end())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(AdminBlockSqlRow::into_domain)
        .collect()
    }

    /// Deletes the week's non-MANUAL secretary assignments (SCHEDULE and
    /// ALGORITHM) so the solver can recreate them. MANUAL is preserved.
    pub async fn clear_proposed(&self, week: Week) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM assignments
             WHERE assignment_type = 'SECRETARY'
               AND source IN ('SCHEDULE', 'ALGORITHM')
               AND id_block IN (
                 SELECT id_block FROM work_blocks WHERE date BETWEEN $1 AND $2
               )",
        )
        .bind(week.monday())
        .bind(week.end())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Batched upsert of solver results, source ALGORITHM / status
    /// PROPOSED, unique on (id_block, id_staff). The role defaults to
    /// Standard when the need carried none.
    pub async fn write_assignments(&self, assignments: &[Assignment]) -> Result<u64> {
        if assignments.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO assignments \
             (id_block, id_staff, assignment_type, id_role, id_skill, id_linked_doctor, source, status) ",
        );
        builder.push_values(assignments, |mut row, a| {
            row.push_bind(a.id_block)
                .push_bind(a.id_staff)
                .push_bind("SECRETARY")
                .push_bind(a.id_role.unwrap_or(1))
                .push_bind(a.id_skill)
                .push_bind(a.id_linked_doctor)
                .push_bind("ALGORITHM")
                .push_bind("PROPOSED");
        });
        builder.push(
            " ON CONFLICT (id_block, id_staff) DO UPDATE SET \
             id_role = EXCLUDED.id_role, id_skill = EXCLUDED.id_skill, \
             id_linked_doctor = EXCLUDED.id_linked_doctor, \
             source = EXCLUDED.source, status = EXCLUDED.status",
        );

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Doctor assignments for the HTML week view, with display names.
    pub async fn load_doctor_view_rows(&self, week: Week) -> Result<Vec<DoctorViewRow>> {
        Ok(query_as::<_, DoctorViewRow>(
            "SELECT a.id_staff::bigint AS id_staff, s.lastname, s.firstname,
                    wb.date, wb.period,
                    d.name AS department, si.name AS site,
                    p.name AS position_name
             FROM assignments a
             JOIN staff s ON a.id_staff = s.id_staff
             JOIN work_blocks wb ON a.id_block = wb.id_block
             JOIN departments d ON wb.id_department = d.id_department
             JOIN sites si ON d.id_site = si.id_site
             LEFT JOIN positions p ON s.id_primary_position = p.id_position
             WHERE a.assignment_type = 'DOCTOR'
               AND a.status NOT IN ('CANCELLED', 'INVALIDATED')
               AND wb.date BETWEEN $1 AND $2
             ORDER BY wb.date, wb.period, d.name, s.lastname",
        )
        .bind(week.monday())
        .bind(week.end())
        .fetch_all(&self.pool)
        .await?)
    }
}
