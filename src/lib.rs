//! Property listing browser: price ranges, side-by-side comparison with
//! exports, and the applicant interview reschedule form.

pub mod api;
pub mod compare;
pub mod config;
pub mod models;
pub mod pricing;
pub mod schedule;
