//! Graduation announcement lookup service.
//!
//! A visitor submits a student number; the service reads the dataset sheet,
//! resolves the matching row by header name and returns the record together
//! with a presentation view (status badge, WhatsApp link, confetti flag).

pub mod announcement;
pub mod celebration;
pub mod config;
pub mod contact;
pub mod lookup;
pub mod middleware;
pub mod routes;
pub mod startup;
pub mod status;
