use crate::models::{Applicant, ApplicantId};
use crate::schedule::window::{is_weekday, parse_reference};
use crate::schedule::{RescheduleWindow, ScheduleError};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;
use tracing::{debug, info};

/// First bookable hour (08:00)
pub const OFFICE_OPEN_HOUR: u32 = 8;
/// Last bookable hour (17:00 sharp)
pub const OFFICE_CLOSE_HOUR: u32 = 17;

pub fn within_office_hours(time: NaiveTime) -> bool {
    let secs = time.num_seconds_from_midnight();
    secs >= OFFICE_OPEN_HOUR * 3600 && secs <= OFFICE_CLOSE_HOUR * 3600
}

/// Parse an "HH:MM" picker value and check it against office hours
/// (both ends inclusive).
pub fn validate_time(raw: &str) -> Result<NaiveTime, ScheduleError> {
    let trimmed = raw.trim();
    let time = NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| ScheduleError::InvalidTime(raw.to_string()))?;

    if !within_office_hours(time) {
        return Err(ScheduleError::TimeOutsideOfficeHours);
    }
    Ok(time)
}

/// Payload sent to the backend when an applicant asks for a new slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RescheduleRequest {
    #[serde(skip)]
    pub applicant_id: ApplicantId,
    #[serde(with = "wall_clock")]
    pub requested_at: NaiveDateTime,
}

mod wall_clock {
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format("%Y-%m-%dT%H:%M:%S").to_string())
    }
}

/// State of one applicant's reschedule form.
///
/// Invalid selections are rejected and the previous valid value is kept.
/// Once the backend has accepted a request the form is terminal.
#[derive(Debug, Clone)]
pub struct RescheduleForm {
    applicant_id: ApplicantId,
    window: Option<RescheduleWindow>,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
    submitted: bool,
}

impl RescheduleForm {
    pub fn for_applicant(applicant: &Applicant) -> Self {
        let window = RescheduleWindow::for_applicant(applicant);

        // Pre-fill the time-of-day of the current interview when it is valid
        let time = applicant
            .interview_at
            .as_deref()
            .and_then(|raw| parse_reference(raw).ok())
            .map(|reference| reference.time())
            .filter(|t| within_office_hours(*t));

        Self {
            applicant_id: applicant.id,
            window,
            date: None,
            time,
            submitted: applicant.reschedule_submitted(),
        }
    }

    pub fn window(&self) -> Option<&RescheduleWindow> {
        self.window.as_ref()
    }

    /// Whether the date picker should be enabled at all
    pub fn is_editable(&self) -> bool {
        self.window.is_some() && !self.submitted
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn time(&self) -> Option<NaiveTime> {
        self.time
    }

    pub fn select_date(&mut self, date: NaiveDate) -> Result<(), ScheduleError> {
        let window = self.editable_window()?;

        if !is_weekday(date) {
            return Err(ScheduleError::Weekend);
        }
        if !window.contains(date) {
            return Err(ScheduleError::DateOutsideWindow {
                min: window.min_date,
                max: window.max_date,
            });
        }

        debug!("Applicant {}: picked {}", self.applicant_id, date);
        self.date = Some(date);
        Ok(())
    }

    pub fn select_time(&mut self, raw: &str) -> Result<(), ScheduleError> {
        self.editable_window()?;
        self.time = Some(validate_time(raw)?);
        Ok(())
    }

    /// Picked date combined with picked time-of-day
    pub fn merged(&self) -> Option<NaiveDateTime> {
        Some(self.date?.and_time(self.time?))
    }

    /// Build the request to send. The form stays editable until
    /// [`RescheduleForm::mark_submitted`] is called.
    pub fn request(&self) -> Result<RescheduleRequest, ScheduleError> {
        self.editable_window()?;
        let requested_at = self.merged().ok_or(ScheduleError::Incomplete)?;

        Ok(RescheduleRequest {
            applicant_id: self.applicant_id,
            requested_at,
        })
    }

    /// Record that the backend accepted `request`. No further selection or
    /// request is allowed afterwards.
    pub fn mark_submitted(&mut self, request: &RescheduleRequest) {
        info!(
            "Applicant {}: reschedule requested for {}",
            self.applicant_id, request.requested_at
        );
        self.submitted = true;
    }

    fn editable_window(&self) -> Result<RescheduleWindow, ScheduleError> {
        if self.submitted {
            return Err(ScheduleError::AlreadySubmitted);
        }
        self.window.ok_or(ScheduleError::WindowUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApplicantStatus, JobId};

    fn applicant(interview_at: Option<&str>) -> Applicant {
        Applicant {
            id: ApplicantId(42),
            job_id: JobId(7),
            name: "Carla".to_string(),
            email: "carla@example.com".to_string(),
            status: ApplicantStatus::InterviewScheduled,
            interview_at: interview_at.map(str::to_string),
            reschedule_requested_at: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_time_bounds_are_inclusive() {
        assert_eq!(validate_time("08:00").ok(), NaiveTime::from_hms_opt(8, 0, 0));
        assert_eq!(validate_time("17:00").ok(), NaiveTime::from_hms_opt(17, 0, 0));
        assert_eq!(validate_time("07:59"), Err(ScheduleError::TimeOutsideOfficeHours));
        assert_eq!(validate_time("17:01"), Err(ScheduleError::TimeOutsideOfficeHours));
    }

    #[test]
    fn test_time_must_parse() {
        assert!(matches!(validate_time("noon"), Err(ScheduleError::InvalidTime(_))));
        assert!(matches!(validate_time("25:00"), Err(ScheduleError::InvalidTime(_))));
    }

    #[test]
    fn test_form_prefills_reference_time() {
        let form = RescheduleForm::for_applicant(&applicant(Some("2025-01-03T10:30:00")));
        assert_eq!(form.time(), NaiveTime::from_hms_opt(10, 30, 0));
        assert!(form.is_editable());
    }

    #[test]
    fn test_invalid_selection_keeps_previous_value() {
        let mut form = RescheduleForm::for_applicant(&applicant(Some("2025-01-03T10:00:00")));

        form.select_date(date(2025, 1, 7)).unwrap();
        assert_eq!(form.select_date(date(2025, 1, 11)), Err(ScheduleError::Weekend));
        assert!(matches!(
            form.select_date(date(2025, 1, 15)),
            Err(ScheduleError::DateOutsideWindow { .. })
        ));
        assert_eq!(form.date(), Some(date(2025, 1, 7)));

        form.select_time("16:45").unwrap();
        assert!(form.select_time("18:00").is_err());
        assert_eq!(form.time(), NaiveTime::from_hms_opt(16, 45, 0));
    }

    #[test]
    fn test_submit_once_then_terminal() {
        let mut form = RescheduleForm::for_applicant(&applicant(Some("2025-01-03T10:00:00")));
        form.select_date(date(2025, 1, 8)).unwrap();
        form.select_time("09:15").unwrap();

        let request = form.request().unwrap();
        assert_eq!(request.applicant_id, ApplicantId(42));
        assert_eq!(
            request.requested_at,
            date(2025, 1, 8).and_hms_opt(9, 15, 0).unwrap()
        );
        assert!(form.is_editable());

        form.mark_submitted(&request);

        assert_eq!(form.request(), Err(ScheduleError::AlreadySubmitted));
        assert_eq!(form.select_date(date(2025, 1, 9)), Err(ScheduleError::AlreadySubmitted));
        assert!(!form.is_editable());
    }

    #[test]
    fn test_submit_requires_date_and_time() {
        let mut form = RescheduleForm::for_applicant(&applicant(Some("2025-01-03T07:00:00")));
        form.select_date(date(2025, 1, 6)).unwrap();

        // 07:00 is outside office hours so nothing was pre-filled
        assert_eq!(form.request(), Err(ScheduleError::Incomplete));
        assert!(!form.is_submitted());
    }

    #[test]
    fn test_previously_requested_applicant_is_terminal() {
        let mut record = applicant(Some("2025-01-03T10:00:00"));
        record.status = ApplicantStatus::RescheduleRequested;

        let mut form = RescheduleForm::for_applicant(&record);

        assert!(form.is_submitted());
        assert_eq!(form.select_time("09:00"), Err(ScheduleError::AlreadySubmitted));
    }

    #[test]
    fn test_missing_window_disables_selection() {
        let mut form = RescheduleForm::for_applicant(&applicant(Some("not a date")));

        assert!(!form.is_editable());
        assert_eq!(form.select_date(date(2025, 1, 6)), Err(ScheduleError::WindowUnavailable));
        assert_eq!(form.request(), Err(ScheduleError::WindowUnavailable));
        assert_eq!(form.select_time("09:00"), Err(ScheduleError::WindowUnavailable));
    }

    #[test]
    fn test_request_serializes_wall_clock_time() {
        let request = RescheduleRequest {
            applicant_id: ApplicantId(1),
            requested_at: date(2025, 1, 8).and_hms_opt(9, 15, 0).unwrap(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({ "requested_at": "2025-01-08T09:15:00" })
        );
    }
}
