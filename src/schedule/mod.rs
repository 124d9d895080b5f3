pub mod form;
pub mod window;

pub use form::{RescheduleForm, RescheduleRequest};
pub use window::{parse_reference, RescheduleWindow};

use chrono::NaiveDate;
use thiserror::Error;

/// Rejected input on the interview reschedule form. Messages are shown to
/// the applicant as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid interview date: {0}")]
    InvalidReference(String),

    #[error("Rescheduling is unavailable because no interview date is set")]
    WindowUnavailable,

    #[error("Please pick a date between {min} and {max}")]
    DateOutsideWindow { min: NaiveDate, max: NaiveDate },

    #[error("Interviews are not held on weekends")]
    Weekend,

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Please pick a time between 08:00 and 17:00")]
    TimeOutsideOfficeHours,

    #[error("Please pick both a date and a time")]
    Incomplete,

    #[error("A reschedule request has already been submitted")]
    AlreadySubmitted,
}
