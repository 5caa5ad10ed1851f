//! Typed access to the console backend.
//!
//! The traits are the seams the console view models depend on; [`HttpGateway`]
//! is the production implementation.

pub mod client;
pub mod wire;

use async_trait::async_trait;

use crate::csv_upload::CsvUpload;
use crate::error::Result;
use crate::models::auth::AuthResponse;
use crate::models::certificate::{CertificateTemplate, NewCertificateTemplate};
use crate::models::school::{NewSchool, School, SchoolUpdate};
use crate::models::student::{ImportSummary, NewStudent, Student, StudentUpdate};
use crate::models::teacher::{NewTeacher, Teacher};

pub use client::HttpGateway;
pub use wire::StudentPage;

/// Student roster operations against a server-paged resource.
#[async_trait]
pub trait RosterGateway: Send + Sync {
    /// Fetch one page of a school's roster. A school without students is an
    /// empty page, never an error.
    async fn fetch_page(&self, school_id: &str, page: u32) -> Result<StudentPage>;
    async fn create(&self, student: &NewStudent) -> Result<Student>;
    async fn update(&self, id: &str, update: &StudentUpdate) -> Result<Student>;
    /// Upload a CSV file. Rejected rows are reported in the summary.
    async fn bulk_import(&self, school_id: &str, file: &CsvUpload) -> Result<ImportSummary>;
    async fn remove(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait TeacherGateway: Send + Sync {
    async fn list_teachers(&self, school_id: &str) -> Result<Vec<Teacher>>;
    async fn create_teacher(&self, teacher: &NewTeacher) -> Result<Teacher>;
}

#[async_trait]
pub trait SchoolGateway: Send + Sync {
    async fn list_schools(&self) -> Result<Vec<School>>;
    /// Returns `NotFound` when the school does not exist.
    async fn get_school(&self, id: &str) -> Result<School>;
    async fn create_school(&self, school: &NewSchool) -> Result<School>;
    async fn update_school(&self, id: &str, update: &SchoolUpdate) -> Result<School>;
    async fn delete_school(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait CertificateGateway: Send + Sync {
    async fn list_templates(&self, school_id: &str) -> Result<Vec<CertificateTemplate>>;
    async fn create_template(
        &self,
        template: &NewCertificateTemplate,
    ) -> Result<CertificateTemplate>;
    /// Fill a stored template for one student, returning raw ZPL.
    async fn generate(&self, student_id: &str, template_id: &str) -> Result<String>;
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse>;
    async fn register(&self, email: &str, password: &str, name: &str) -> Result<AuthResponse>;
}
