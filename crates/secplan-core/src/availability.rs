//! Availability lookup built from the availability view rows.

use crate::domain::{AvailabilityRow, Period, StaffId};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Secretary -> date -> available periods.
///
/// Dates are kept ordered so iteration over a secretary's days is stable.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityMap {
    map: HashMap<StaffId, BTreeMap<NaiveDate, HashSet<Period>>>,
}

impl AvailabilityMap {
    pub fn from_rows(rows: &[AvailabilityRow]) -> Self {
        let mut map: HashMap<StaffId, BTreeMap<NaiveDate, HashSet<Period>>> = HashMap::new();
        for row in rows {
            map.entry(row.id_staff)
                .or_default()
                .entry(row.date)
                .or_default()
                .insert(row.period);
        }
        Self { map }
    }

    pub fn is_available(&self, staff: StaffId, date: NaiveDate, period: Period) -> bool {
        self.map
            .get(&staff)
            .and_then(|days| days.get(&date))
            .is_some_and(|periods| periods.contains(&period))
    }

    /// Periods available to a secretary on a given day (empty if none).
    pub fn periods(&self, staff: StaffId, date: NaiveDate) -> HashSet<Period> {
        self.map
            .get(&staff)
            .and_then(|days| days.get(&date))
            .cloned()
            .unwrap_or_default()
    }

    /// Days on which the secretary has at least one available period.
    pub fn days(&self, staff: StaffId) -> Vec<NaiveDate> {
        self.map
            .get(&staff)
            .map(|days| days.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn staff_ids(&self) -> impl Iterator<Item = StaffId> + '_ {
        self.map.keys().copied()
    }

    /// Total number of available half-days across all secretaries.
    pub fn total_slots(&self) -> usize {
        self.map
            .values()
            .flat_map(|days| days.values())
            .map(|periods| periods.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(staff: StaffId, date: NaiveDate, period: Period) -> AvailabilityRow {
        AvailabilityRow {
            id_staff: staff,
            date,
            period,
        }
    }

    #[test]
    fn builds_per_staff_per_day_sets() {
        let monday = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2026, 1, 6).unwrap();
        let map = AvailabilityMap::from_rows(&[
            row(1, monday, Period::Am),
            row(1, monday, Period::Pm),
            row(1, tuesday, Period::Am),
            row(2, monday, Period::Pm),
        ]);

        assert!(map.is_available(1, monday, Period::Am));
        assert!(map.is_available(1, monday, Period::Pm));
        assert!(!map.is_available(2, monday, Period::Am));
        assert!(!map.is_available(2, tuesday, Period::Pm));

        assert_eq!(map.days(1), vec![monday, tuesday]);
        assert_eq!(map.days(3), Vec::<NaiveDate>::new());
        assert_eq!(map.total_slots(), 4);
    }

    #[test]
    fn duplicate_rows_collapse() {
        let monday = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let map = AvailabilityMap::from_rows(&[
            row(1, monday, Period::Am),
            row(1, monday, Period::Am),
        ]);
        assert_eq!(map.total_slots(), 1);
    }
}
