//! Rollcall Core: school, student and teacher models, the error taxonomy,
//! console configuration, and the typed gateway to the school-management backend.

pub mod config;
pub mod csv_upload;
pub mod error;
pub mod gateway;
pub mod labels;
pub mod models;
pub mod validation;
