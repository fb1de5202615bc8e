//! HTML week view: doctors and secretaries grouped by site and
//! department, one card per day, color-coded role badges.

use chrono::{Datelike, NaiveDate};
use secplan_core::{NeedKind, Period, SolveOutcome, StaffId, Week, WeekData};
use secplan_storage::DoctorViewRow;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write;

const DOW_NAMES: [&str; 7] = [
    "Lundi", "Mardi", "Mercredi", "Jeudi", "Vendredi", "Samedi", "Dimanche",
];

const SITE_PALETTE: [&str; 5] = ["#1565c0", "#2e7d32", "#6a1b9a", "#c62828", "#ef6c00"];

struct SecEntry {
    name: String,
    role_name: Option<String>,
    skill_name: Option<String>,
    admin: bool,
}

struct DocEntry {
    name: String,
}

type SlotKey = (NaiveDate, Period, String, String);

pub fn render_week(
    week: Week,
    data: &WeekData,
    doctors: &[DoctorViewRow],
    outcome: &SolveOutcome,
) -> String {
    let names: HashMap<StaffId, String> = data
        .all_secretaries
        .iter()
        .map(|s| (s.id_staff, short_name(&s.lastname, &s.firstname)))
        .collect();

    let mut docs_by_slot: BTreeMap<SlotKey, Vec<DocEntry>> = BTreeMap::new();
    for row in doctors {
        let Ok(period) = Period::parse(&row.period) else {
            continue;
        };
        let key = (row.date, period, row.site.clone(), row.department.clone());
        docs_by_slot.entry(key).or_default().push(DocEntry {
            name: short_name(&row.lastname, &row.firstname),
        });
    }

    let mut secs_by_slot: BTreeMap<SlotKey, Vec<SecEntry>> = BTreeMap::new();
    for a in outcome
        .assignments
        .iter()
        .chain(outcome.admin_assignments.iter())
    {
        let name = names
            .get(&a.id_staff)
            .cloned()
            .unwrap_or_else(|| format!("#{}", a.id_staff));
        let key = (a.date, a.period, a.site.clone(), a.department.clone());
        secs_by_slot.entry(key).or_default().push(SecEntry {
            name,
            role_name: a.role_name.clone(),
            skill_name: a.skill_name.clone(),
            admin: a.kind == NeedKind::Admin,
        });
    }

    // Sites and their departments, Administration set apart.
    let mut site_depts: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for (_, _, site, dept) in docs_by_slot.keys().chain(secs_by_slot.keys()) {
        if dept != "Administration" {
            site_depts
                .entry(site.clone())
                .or_default()
                .insert(dept.clone());
        }
    }
    let site_colors: HashMap<&String, &str> = site_depts
        .keys()
        .enumerate()
        .map(|(i, site)| (site, SITE_PALETTE[i % SITE_PALETTE.len()]))
        .collect();

    let medical_total: i32 = data.needs.iter().map(|n| n.gap).sum();

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
<meta charset="UTF-8">
<title>Planning {start} - {end}</title>
<style>
* {{ box-sizing: border-box; margin: 0; padding: 0; }}
body {{ font-family: 'Segoe UI', system-ui, -apple-system, sans-serif; background: #f0f2f5; padding: 16px; color: #1a1a1a; font-size: 14px; }}
h1 {{ text-align: center; margin-bottom: 4px; font-size: 1.4em; }}
.subtitle {{ text-align: center; color: #666; margin-bottom: 16px; font-size: 0.85em; }}
.legend {{ display: flex; flex-wrap: wrap; gap: 8px; justify-content: center; margin-bottom: 20px; padding: 10px; background: #fff; border-radius: 8px; box-shadow: 0 1px 2px rgba(0,0,0,0.08); }}
.legend-item {{ display: flex; align-items: center; gap: 4px; font-size: 0.8em; }}
.legend-dot {{ width: 12px; height: 12px; border-radius: 3px; border: 1px solid rgba(0,0,0,0.15); }}
.day-card {{ background: #fff; border-radius: 8px; box-shadow: 0 1px 3px rgba(0,0,0,0.1); margin-bottom: 20px; overflow: hidden; }}
.day-header {{ background: #1e3a5f; color: #fff; padding: 8px 16px; font-weight: 600; display: flex; justify-content: space-between; }}
.day-header.weekend {{ background: #78909c; }}
.day-header .day-stats {{ font-size: 0.78em; font-weight: 400; opacity: 0.85; }}
.period-row {{ display: flex; border-bottom: 1px solid #e8e8e8; }}
.period-row:last-child {{ border-bottom: none; }}
.period-label {{ width: 40px; min-width: 40px; background: #f5f7fa; display: flex; align-items: center; justify-content: center; font-weight: 700; font-size: 0.8em; color: #5a6977; border-right: 2px solid #e0e4e8; }}
.period-content {{ flex: 1; padding: 6px 0; }}
.site-block {{ border-bottom: 1px solid #f0f0f0; padding: 4px 12px 6px; }}
.site-block:last-child {{ border-bottom: none; }}
.site-name {{ font-size: 0.72em; font-weight: 700; text-transform: uppercase; letter-spacing: 0.8px; margin-bottom: 4px; }}
.dept-block {{ display: flex; align-items: flex-start; padding: 3px 0; gap: 8px; }}
.dept-name {{ min-width: 150px; font-weight: 600; font-size: 0.85em; color: #37474f; padding-top: 3px; }}
.dept-staff {{ flex: 1; display: flex; flex-wrap: wrap; gap: 3px; }}
.badge {{ display: inline-flex; align-items: center; gap: 3px; border-radius: 4px; padding: 3px 7px; font-size: 0.78em; line-height: 1.3; border: 1px solid; }}
.badge .name {{ font-weight: 600; }}
.badge .detail {{ font-weight: 400; opacity: 0.8; font-size: 0.9em; }}
.doc {{ background: #e8f0fe; border-color: #aecbfa; color: #1a56db; }}
.sec-std {{ background: #e6f4ea; border-color: #a8dab5; color: #1e7e34; }}
.sec-aidf {{ background: #fef3e0; border-color: #f9cb80; color: #c75300; }}
.sec-ferm {{ background: #fde7e9; border-color: #f5a3ab; color: #b71c1c; }}
.sec-rec {{ background: #e0f0ff; border-color: #90c2f9; color: #0850a0; }}
.sec-other {{ background: #f5f5f5; border-color: #ccc; color: #444; }}
.sec-admin {{ background: #f3e8fd; border-color: #ce93d8; color: #6a1b9a; }}
.admin-block {{ padding: 4px 12px 6px; border-top: 1px dashed #e0e0e0; }}
.admin-label {{ font-size: 0.75em; font-weight: 700; color: #6a1b9a; margin-bottom: 3px; }}
.admin-list {{ display: flex; flex-wrap: wrap; gap: 3px; }}
.empty-day {{ color: #999; padding: 20px; text-align: center; font-style: italic; font-size: 0.9em; }}
</style>
</head>
<body>
<h1>Planning Semaine</h1>
<div class="subtitle">{start} &rarr; {end} &mdash; Solver: {status} &mdash; {filled}/{total} med, {admin} admin, {unfilled} non rempli(s)</div>
<div class="legend">
  <div class="legend-item"><div class="legend-dot" style="background:#e8f0fe;border-color:#aecbfa"></div>M&eacute;decin</div>
  <div class="legend-item"><div class="legend-dot" style="background:#e6f4ea;border-color:#a8dab5"></div>Standard</div>
  <div class="legend-item"><div class="legend-dot" style="background:#fef3e0;border-color:#f9cb80"></div>Aide fermeture</div>
  <div class="legend-item"><div class="legend-dot" style="background:#fde7e9;border-color:#f5a3ab"></div>Fermeture</div>
  <div class="legend-item"><div class="legend-dot" style="background:#e0f0ff;border-color:#90c2f9"></div>R&eacute;ception</div>
  <div class="legend-item"><div class="legend-dot" style="background:#f5f5f5;border-color:#ccc"></div>Autre</div>
  <div class="legend-item"><div class="legend-dot" style="background:#f3e8fd;border-color:#ce93d8"></div>Admin</div>
</div>
"#,
        start = week.monday(),
        end = week.end(),
        status = escape(outcome.status.as_str()),
        filled = outcome.assignments.len(),
        total = medical_total,
        admin = outcome.admin_assignments.len(),
        unfilled = outcome.unfilled.len(),
    );

    for date in week.days() {
        let dow = DOW_NAMES[date.weekday().num_days_from_monday() as usize];
        let weekend = date.weekday().num_days_from_monday() >= 5;
        let header_class = if weekend {
            "day-header weekend"
        } else {
            "day-header"
        };

        let day_docs: usize = docs_by_slot
            .iter()
            .filter(|((d, ..), _)| *d == date)
            .map(|(_, v)| v.len())
            .sum();
        let day_med: usize = secs_by_slot
            .iter()
            .filter(|((d, ..), _)| *d == date)
            .map(|(_, v)| v.iter().filter(|s| !s.admin).count())
            .sum();
        let day_adm: usize = secs_by_slot
            .iter()
            .filter(|((d, ..), _)| *d == date)
            .map(|(_, v)| v.iter().filter(|s| s.admin).count())
            .sum();

        let _ = writeln!(out, r#"<div class="day-card">"#);
        let _ = writeln!(out, r#"<div class="{header_class}">"#);
        let _ = writeln!(out, "  <span>{} {}</span>", dow, date.format("%d/%m/%Y"));
        if day_docs + day_med > 0 {
            let _ = writeln!(
                out,
                r#"  <span class="day-stats">{day_docs} m&eacute;d. / {day_med} sec. / {day_adm} admin</span>"#
            );
        }
        let _ = writeln!(out, "</div>");

        let mut day_has_content = false;
        for period in Period::BOTH {
            let rendered =
                render_period(date, period, &site_depts, &site_colors, &docs_by_slot, &secs_by_slot);
            if let Some(body) = rendered {
                day_has_content = true;
                let _ = writeln!(out, r#"<div class="period-row">"#);
                let _ = writeln!(out, r#"  <div class="period-label">{period}</div>"#);
                let _ = writeln!(out, r#"  <div class="period-content">"#);
                out.push_str(&body);
                let _ = writeln!(out, "  </div>");
                let _ = writeln!(out, "</div>");
            }
        }
        if !day_has_content {
            let _ = writeln!(out, r#"<div class="empty-day">Aucune activit&eacute;</div>"#);
        }
        let _ = writeln!(out, "</div>");
    }

    out.push_str("</body></html>\n");
    out
}

fn render_period(
    date: NaiveDate,
    period: Period,
    site_depts: &BTreeMap<String, BTreeSet<String>>,
    site_colors: &HashMap<&String, &str>,
    docs_by_slot: &BTreeMap<SlotKey, Vec<DocEntry>>,
    secs_by_slot: &BTreeMap<SlotKey, Vec<SecEntry>>,
) -> Option<String> {
    let mut out = String::new();
    let mut admin_entries: Vec<&SecEntry> = Vec::new();
    let mut has_medical = false;

    for (site, depts) in site_depts {
        let mut site_out = String::new();
        for dept in depts {
            let key = (date, period, site.clone(), dept.clone());
            let docs = docs_by_slot.get(&key);
            let secs = secs_by_slot.get(&key);
            let med: Vec<&SecEntry> = secs
                .into_iter()
                .flatten()
                .filter(|s| !s.admin)
                .collect();
            if let Some(secs) = secs {
                admin_entries.extend(secs.iter().filter(|s| s.admin));
            }
            if docs.is_none() && med.is_empty() {
                continue;
            }

            let _ = writeln!(site_out, r#"      <div class="dept-block">"#);
            let _ = writeln!(
                site_out,
                r#"        <div class="dept-name">{}</div>"#,
                escape(dept)
            );
            let _ = writeln!(site_out, r#"        <div class="dept-staff">"#);
            for doc in docs.into_iter().flatten() {
                let _ = writeln!(
                    site_out,
                    r#"          <span class="badge doc"><span class="name">{}</span></span>"#,
                    escape(&doc.name)
                );
            }
            for s in med {
                let detail: Vec<&str> = [
                    role_short(s.role_name.as_deref()),
                    s.skill_name.as_deref().unwrap_or(""),
                ]
                .into_iter()
                .filter(|part| !part.is_empty() && *part != "-")
                .collect();
                let detail = detail.join(" | ");
                let _ = write!(
                    site_out,
                    r#"          <span class="badge {}"><span class="name">{}</span>"#,
                    role_class(s.role_name.as_deref()),
                    escape(&s.name)
                );
                if !detail.is_empty() {
                    let _ = write!(
                        site_out,
                        r#" <span class="detail">{}</span>"#,
                        escape(&detail)
                    );
                }
                let _ = writeln!(site_out, "</span>");
            }
            let _ = writeln!(site_out, "        </div>");
            let _ = writeln!(site_out, "      </div>");
        }

        if !site_out.is_empty() {
            has_medical = true;
            let color = site_colors.get(site).copied().unwrap_or("#333");
            let _ = writeln!(out, r#"    <div class="site-block">"#);
            let _ = writeln!(
                out,
                r#"      <div class="site-name" style="color:{color}">{}</div>"#,
                escape(site)
            );
            out.push_str(&site_out);
            let _ = writeln!(out, "    </div>");
        }
    }

    // Admin blocks live outside the site grid.
    for (key, secs) in secs_by_slot {
        if key.0 == date && key.1 == period && key.3 == "Administration" {
            admin_entries.extend(secs.iter().filter(|s| s.admin));
        }
    }
    if !admin_entries.is_empty() {
        let mut seen = BTreeSet::new();
        let unique: Vec<&&SecEntry> = admin_entries
            .iter()
            .filter(|s| seen.insert(s.name.clone()))
            .collect();
        let _ = writeln!(out, r#"    <div class="admin-block">"#);
        let _ = writeln!(
            out,
            r#"      <div class="admin-label">Administration ({})</div>"#,
            unique.len()
        );
        let _ = writeln!(out, r#"      <div class="admin-list">"#);
        for s in unique {
            let _ = writeln!(
                out,
                r#"        <span class="badge sec-admin"><span class="name">{}</span></span>"#,
                escape(&s.name)
            );
        }
        let _ = writeln!(out, "      </div>");
        let _ = writeln!(out, "    </div>");
    } else if !has_medical {
        return None;
    }

    Some(out)
}

fn short_name(lastname: &str, firstname: &str) -> String {
    match firstname.chars().next() {
        Some(initial) => format!("{lastname} {initial}."),
        None => lastname.to_string(),
    }
}

fn role_class(role: Option<&str>) -> &'static str {
    match role {
        Some("Standard") => "sec-std",
        Some("Aide fermeture") => "sec-aidf",
        Some("Fermeture") => "sec-ferm",
        Some(r) if r.contains("ception") => "sec-rec",
        _ => "sec-other",
    }
}

fn role_short(role: Option<&str>) -> &'static str {
    match role {
        Some("Standard") => "Std",
        Some("Aide fermeture") => "AidF",
        Some("Fermeture") => "Ferm",
        Some(r) if r.contains("ception") => "Réc",
        _ => "-",
    }
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use secplan_core::testing::fixtures::*;
    use secplan_core::{build_model, solve, AvailabilityMap, NeedIndex, ObjectiveWeights};
    use std::time::Duration;

    #[test]
    fn renders_grouped_week_with_badges() {
        let spec = NeedSpec::new(100, day(0), Period::Am, DEPT_OPHTA, 1, ROLE_STANDARD, 1);
        let (data, admin_blocks) = WeekBuilder::new()
            .secretary(secretary(1, "Durand"))
            .secretary(secretary(2, "Martin"))
            .available(1, day(0), &[Period::Am])
            .available(2, day(0), &[Period::Am])
            .need_with_candidates(spec, &[1])
            .admin_block(9000, day(0), Period::Am)
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

        let doctors = vec![DoctorViewRow {
            id_staff: 77,
            lastname: "Husson".to_string(),
            firstname: "Anne".to_string(),
            date: day(0),
            period: "AM".to_string(),
            department: "Ophtalmologie".to_string(),
            site: "Centre".to_string(),
            position_name: Some("Ophtalmologue".to_string()),
        }];

        let page = render_week(data.week, &data, &doctors, &outcome);

        assert!(page.contains("<!DOCTYPE html>"));
        assert!(page.contains("Lundi 05/01/2026"));
        assert!(page.contains("CENTRE") || page.contains("Centre"));
        assert!(page.contains("Durand T."));
        assert!(page.contains("sec-std"));
        assert!(page.contains("Husson A."));
        assert!(page.contains("Administration (1)"));
        assert!(page.contains("Aucune activit&eacute;"));
    }

    #[test]
    fn escapes_markup_in_names() {
        assert_eq!(escape("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }
}
