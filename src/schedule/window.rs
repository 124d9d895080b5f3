use crate::models::Applicant;
use crate::schedule::ScheduleError;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::Serialize;
use tracing::warn;

/// Number of weekdays an applicant may pick from
pub const WINDOW_WEEKDAYS: usize = 8;

const REFERENCE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse the interview date-time the admin scheduled. RFC 3339 offsets are
/// dropped and the wall-clock time kept.
pub fn parse_reference(raw: &str) -> Result<NaiveDateTime, ScheduleError> {
    let trimmed = raw.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(with_offset.naive_local());
    }

    REFERENCE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| ScheduleError::InvalidReference(raw.to_string()))
}

pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Inclusive weekday range an interview can be moved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RescheduleWindow {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
}

impl RescheduleWindow {
    /// Window starting on the reference day itself (when it is a weekday) and
    /// spanning [`WINDOW_WEEKDAYS`] weekdays. `None` when the calendar runs
    /// out before that many weekdays.
    pub fn from_reference(reference: NaiveDateTime) -> Option<Self> {
        let dates = weekdays_from(reference.date(), WINDOW_WEEKDAYS);
        if dates.len() < WINDOW_WEEKDAYS {
            return None;
        }
        Some(Self {
            min_date: *dates.first()?,
            max_date: *dates.last()?,
        })
    }

    /// `None` when the applicant has no interview date or it cannot be parsed;
    /// date selection must then stay disabled.
    pub fn for_applicant(applicant: &Applicant) -> Option<Self> {
        let raw = applicant.interview_at.as_deref()?;
        match parse_reference(raw) {
            Ok(reference) => {
                let window = Self::from_reference(reference);
                if window.is_none() {
                    warn!("Applicant {}: no weekdays left after {}", applicant.id, reference);
                }
                window
            }
            Err(err) => {
                warn!("Applicant {}: {}", applicant.id, err);
                None
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min_date <= date && date <= self.max_date && is_weekday(date)
    }

    /// Every date the picker should enable
    pub fn selectable_dates(&self) -> Vec<NaiveDate> {
        weekdays_from(self.min_date, WINDOW_WEEKDAYS)
    }
}

fn weekdays_from(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    start
        .iter_days()
        .filter(|date| is_weekday(*date))
        .take(count)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApplicantId, ApplicantStatus, JobId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at_ten(day: NaiveDate) -> NaiveDateTime {
        day.and_hms_opt(10, 0, 0).unwrap()
    }

    #[test]
    fn test_friday_reference_counts_itself() {
        let window = RescheduleWindow::from_reference(at_ten(date(2025, 1, 3))).unwrap();
        assert_eq!(window.min_date, date(2025, 1, 3));
        assert_eq!(window.max_date, date(2025, 1, 14));
        assert_eq!(
            window.selectable_dates(),
            vec![
                date(2025, 1, 3),
                date(2025, 1, 6),
                date(2025, 1, 7),
                date(2025, 1, 8),
                date(2025, 1, 9),
                date(2025, 1, 10),
                date(2025, 1, 13),
                date(2025, 1, 14),
            ]
        );
    }

    #[test]
    fn test_saturday_reference_starts_monday() {
        let window = RescheduleWindow::from_reference(at_ten(date(2025, 1, 4))).unwrap();
        assert_eq!(window.min_date, date(2025, 1, 6));
        assert_eq!(window.max_date, date(2025, 1, 15));
    }

    #[test]
    fn test_window_always_spans_eight_weekdays() {
        let mut day = date(2024, 12, 20);
        for _ in 0..60 {
            let window = RescheduleWindow::from_reference(at_ten(day)).unwrap();
            let inside = window
                .min_date
                .iter_days()
                .take_while(|d| *d <= window.max_date)
                .filter(|d| is_weekday(*d))
                .count();

            assert_eq!(inside, WINDOW_WEEKDAYS, "reference {}", day);
            assert!(is_weekday(window.min_date));
            assert!(is_weekday(window.max_date));
            assert!(window.min_date <= window.max_date);

            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_contains_excludes_weekends_and_outside_dates() {
        let window = RescheduleWindow::from_reference(at_ten(date(2025, 1, 3))).unwrap();
        assert!(window.contains(date(2025, 1, 3)));
        assert!(window.contains(date(2025, 1, 14)));
        assert!(!window.contains(date(2025, 1, 4)));
        assert!(!window.contains(date(2025, 1, 2)));
        assert!(!window.contains(date(2025, 1, 15)));
    }

    #[test]
    fn test_reference_at_end_of_calendar_has_no_window() {
        let reference = parse_reference("+262142-12-30T10:00:00").unwrap();
        assert_eq!(RescheduleWindow::from_reference(reference), None);

        let last_day = NaiveDate::MAX.and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(RescheduleWindow::from_reference(last_day), None);
    }

    #[test]
    fn test_applicant_with_end_of_calendar_interview_is_unavailable() {
        let applicant = Applicant {
            id: ApplicantId(9),
            job_id: JobId(1),
            name: "Dee".to_string(),
            email: String::new(),
            status: ApplicantStatus::InterviewScheduled,
            interview_at: Some("+262142-12-30T10:00:00".to_string()),
            reschedule_requested_at: None,
        };
        assert_eq!(RescheduleWindow::for_applicant(&applicant), None);
    }

    #[test]
    fn test_parse_reference_formats() {
        let expected = date(2025, 1, 3).and_hms_opt(14, 30, 0).unwrap();
        assert_eq!(parse_reference("2025-01-03T14:30:00").unwrap(), expected);
        assert_eq!(parse_reference("2025-01-03T14:30").unwrap(), expected);
        assert_eq!(parse_reference("2025-01-03 14:30:00").unwrap(), expected);
        assert_eq!(parse_reference("2025-01-03T14:30:00.000000").unwrap(), expected);
        assert_eq!(parse_reference("2025-01-03T14:30:00+08:00").unwrap(), expected);
        assert_eq!(parse_reference(" 2025-01-03T14:30:00Z ").unwrap(), expected);
    }

    #[test]
    fn test_parse_reference_rejects_garbage() {
        assert!(matches!(
            parse_reference("next tuesday"),
            Err(ScheduleError::InvalidReference(_))
        ));
        assert!(parse_reference("").is_err());
    }

    #[test]
    fn test_window_unavailable_for_applicant_without_valid_interview() {
        let mut applicant = Applicant {
            id: ApplicantId(3),
            job_id: JobId(1),
            name: "Ben".to_string(),
            email: String::new(),
            status: ApplicantStatus::InterviewScheduled,
            interview_at: None,
            reschedule_requested_at: None,
        };
        assert_eq!(RescheduleWindow::for_applicant(&applicant), None);

        applicant.interview_at = Some("soon".to_string());
        assert_eq!(RescheduleWindow::for_applicant(&applicant), None);

        applicant.interview_at = Some("2025-01-04T09:00:00".to_string());
        let window = RescheduleWindow::for_applicant(&applicant).unwrap();
        assert_eq!(window.min_date, date(2025, 1, 6));
    }
}
