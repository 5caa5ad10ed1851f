pub mod auth;
pub mod certificate;
pub mod common;
pub mod school;
pub mod student;
pub mod teacher;
