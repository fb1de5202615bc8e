use super::errors::DomainError;
use chrono::{Datelike, Days, NaiveDate, Weekday};

/// A planning week, anchored on its Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Week {
    monday: NaiveDate,
}

impl Week {
    /// Builds a week from its Monday. Any other weekday is rejected.
    pub fn starting(monday: NaiveDate) -> Result<Self, DomainError> {
        if monday.weekday() != Weekday::Mon {
            return Err(DomainError::NotMonday(monday));
        }
        Ok(Self { monday })
    }

    pub fn monday(&self) -> NaiveDate {
        self.monday
    }

    /// Sunday of the same week.
    pub fn end(&self) -> NaiveDate {
        self.monday + Days::new(6)
    }

    /// Monday through Sunday.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let monday = self.monday;
        (0..7).map(move |i| monday + Days::new(i))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.monday && date <= self.end()
    }
}

impl std::fmt::Display for Week {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.monday, self.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn accepts_monday() {
        let week = Week::starting(date(2026, 1, 5)).unwrap();
        assert_eq!(week.monday(), date(2026, 1, 5));
        assert_eq!(week.end(), date(2026, 1, 11));
    }

    #[test]
    fn rejects_non_monday() {
        let err = Week::starting(date(2026, 1, 6)).unwrap_err();
        assert!(matches!(err, DomainError::NotMonday(_)));
    }

    #[test]
    fn spans_seven_days() {
        let week = Week::starting(date(2026, 1, 5)).unwrap();
        let days: Vec<_> = week.days().collect();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], date(2026, 1, 5));
        assert_eq!(days[6], date(2026, 1, 11));
        assert!(week.contains(date(2026, 1, 8)));
        assert!(!week.contains(date(2026, 1, 12)));
    }
}
