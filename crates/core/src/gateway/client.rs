//! reqwest implementation of the gateway traits.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::wire::{EntityEnvelope, ErrorBody, ListEnvelope, StudentPage, UploadEnvelope};
use super::{AuthGateway, CertificateGateway, RosterGateway, SchoolGateway, TeacherGateway};
use crate::config::ApiConfig;
use crate::csv_upload::CsvUpload;
use crate::error::{Result, RollcallError};
use crate::models::auth::AuthResponse;
use crate::models::certificate::{CertificateTemplate, NewCertificateTemplate};
use crate::models::school::{NewSchool, School, SchoolUpdate};
use crate::models::student::{ImportSummary, NewStudent, Student, StudentUpdate};
use crate::models::teacher::{NewTeacher, Teacher};

/// HTTP client for the console backend.
///
/// Attaches `Authorization: Bearer <token>` to every request once a token is set.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Self {
        Self::with_http_client(base_url, Client::new())
    }

    /// Build a gateway honouring the configured base URL and timeout.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RollcallError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_http_client(&config.base_url, http))
    }

    /// Create a gateway with a custom reqwest::Client (useful for testing).
    pub fn with_http_client(base_url: &str, http: Client) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| RollcallError::Config(format!("invalid base URL {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| {
                RollcallError::Config(format!("base URL {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let req = self.http.request(method, self.url(segments)?);
        Ok(match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        })
    }

    /// Send a request and turn any non-2xx status into a typed error.
    async fn execute(&self, req: RequestBuilder, action: &str) -> Result<Response> {
        let resp = req.send().await.map_err(|e| {
            warn!(error = %e, action, "request failed to reach backend");
            RollcallError::Network(format!("{action} request failed: {e}"))
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(status = %status, error = %e, action, "failed to read error body");
                String::new()
            }
        };
        warn!(status = %status, action, "backend rejected request");
        Err(classify_failure(status, &body, action))
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
        action: &str,
    ) -> Result<Response> {
        self.execute(self.request(method, segments)?.json(body), action)
            .await
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        action: &str,
    ) -> Result<Vec<T>> {
        match self.execute(self.request(Method::GET, segments)?, action).await {
            Ok(resp) => Ok(decode::<ListEnvelope<T>>(resp, action).await?.into_vec()),
            Err(RollcallError::NotFound(_)) => {
                debug!(action, "list endpoint returned 404; treating as empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

/// Map a non-success response onto the error taxonomy.
pub(crate) fn classify_failure(status: StatusCode, body: &str, action: &str) -> RollcallError {
    if status == StatusCode::NOT_FOUND {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| format!("{action}: resource not found"));
        return RollcallError::NotFound(message);
    }

    if status.is_client_error() {
        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                let message = parsed
                    .message
                    .unwrap_or_else(|| format!("{action}: not authorized"));
                return RollcallError::Auth(message);
            }
            if parsed.is_structured() {
                return RollcallError::Validation(parsed.into_field_errors());
            }
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return RollcallError::Auth(format!("{action}: not authorized"));
        }
    }

    RollcallError::Unknown {
        status: Some(status.as_u16()),
        message: format!("{action} failed: {body}"),
    }
}

async fn decode<T: DeserializeOwned>(resp: Response, action: &str) -> Result<T> {
    let body = resp
        .text()
        .await
        .map_err(|e| RollcallError::Network(format!("{action}: failed to read body: {e}")))?;
    serde_json::from_str(&body)
        .map_err(|e| RollcallError::Decode(format!("{action}: {e}")))
}

#[async_trait]
impl RosterGateway for HttpGateway {
    async fn fetch_page(&self, school_id: &str, page: u32) -> Result<StudentPage> {
        debug!(school_id, page, "Fetching roster page");
        let req = self
            .request(Method::GET, &["student", school_id])?
            .query(&[("page", page)]);

        match self.execute(req, "fetch students").await {
            Ok(resp) => {
                let (records, total) = decode::<ListEnvelope<Student>>(resp, "fetch students")
                    .await?
                    .into_parts();
                debug!(school_id, page, count = records.len(), ?total, "Roster page received");
                Ok(StudentPage { records, total })
            }
            // The backend answers 404 for a school with no students yet.
            Err(RollcallError::NotFound(_)) => {
                debug!(school_id, page, "Roster not found; treating as empty");
                Ok(StudentPage::empty())
            }
            Err(e) => Err(e),
        }
    }

    async fn create(&self, student: &NewStudent) -> Result<Student> {
        let resp = self
            .send_json(Method::POST, &["student"], student, "create student")
            .await?;
        Ok(decode::<EntityEnvelope<Student>>(resp, "create student")
            .await?
            .into_inner())
    }

    async fn update(&self, id: &str, update: &StudentUpdate) -> Result<Student> {
        let resp = self
            .send_json(
                Method::PATCH,
                &["student", id],
                update,
                "update student",
            )
            .await?;
        Ok(decode::<EntityEnvelope<Student>>(resp, "update student")
            .await?
            .into_inner())
    }

    async fn bulk_import(&self, school_id: &str, file: &CsvUpload) -> Result<ImportSummary> {
        debug!(school_id, file = %file.file_name, bytes = file.bytes.len(), "Uploading CSV");
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str("text/csv")
            .map_err(|e| RollcallError::Csv(format!("invalid upload part: {e}")))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("schoolId", school_id.to_string());

        let resp = self
            .execute(
                self.request(Method::POST, &["student", "upload"])?.multipart(form),
                "upload students",
            )
            .await?;
        let summary = decode::<UploadEnvelope>(resp, "upload students")
            .await?
            .summary;
        debug!(saved = summary.saved, failed = summary.failed, "CSV import finished");
        Ok(summary)
    }

    async fn remove(&self, id: &str) -> Result<()> {
        self.execute(
            self.request(Method::DELETE, &["student", id])?,
            "delete student",
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl TeacherGateway for HttpGateway {
    async fn list_teachers(&self, school_id: &str) -> Result<Vec<Teacher>> {
        self.get_list(&["teacher", school_id], "list teachers")
            .await
    }

    async fn create_teacher(&self, teacher: &NewTeacher) -> Result<Teacher> {
        let resp = self
            .send_json(Method::POST, &["teacher"], teacher, "create teacher")
            .await?;
        Ok(decode::<EntityEnvelope<Teacher>>(resp, "create teacher")
            .await?
            .into_inner())
    }
}

#[async_trait]
impl SchoolGateway for HttpGateway {
    async fn list_schools(&self) -> Result<Vec<School>> {
        self.get_list(&["school"], "list schools").await
    }

    async fn get_school(&self, id: &str) -> Result<School> {
        let resp = self
            .execute(
                self.request(Method::GET, &["school", id])?,
                "get school",
            )
            .await?;
        Ok(decode::<EntityEnvelope<School>>(resp, "get school")
            .await?
            .into_inner())
    }

    async fn create_school(&self, school: &NewSchool) -> Result<School> {
        let resp = self
            .send_json(Method::POST, &["school"], school, "create school")
            .await?;
        Ok(decode::<EntityEnvelope<School>>(resp, "create school")
            .await?
            .into_inner())
    }

    async fn update_school(&self, id: &str, update: &SchoolUpdate) -> Result<School> {
        let resp = self
            .send_json(
                Method::PATCH,
                &["school", id],
                update,
                "update school",
            )
            .await?;
        Ok(decode::<EntityEnvelope<School>>(resp, "update school")
            .await?
            .into_inner())
    }

    async fn delete_school(&self, id: &str) -> Result<()> {
        self.execute(
            self.request(Method::DELETE, &["school", id])?,
            "delete school",
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl CertificateGateway for HttpGateway {
    async fn list_templates(&self, school_id: &str) -> Result<Vec<CertificateTemplate>> {
        self.get_list(&["certificate", school_id], "list certificates")
            .await
    }

    async fn create_template(
        &self,
        template: &NewCertificateTemplate,
    ) -> Result<CertificateTemplate> {
        let resp = self
            .send_json(Method::POST, &["certificate"], template, "create certificate")
            .await?;
        Ok(
            decode::<EntityEnvelope<CertificateTemplate>>(resp, "create certificate")
                .await?
                .into_inner(),
        )
    }

    async fn generate(&self, student_id: &str, template_id: &str) -> Result<String> {
        let resp = self
            .execute(
                self.request(Method::POST, &["certificate", student_id, template_id])?,
                "generate certificate",
            )
            .await?;
        let body = resp.text().await.map_err(|e| {
            RollcallError::Network(format!("generate certificate: failed to read body: {e}"))
        })?;

        // Either raw ZPL text or a JSON string / `{data: "..."}`.
        let parsed = serde_json::from_str::<EntityEnvelope<String>>(&body).ok();
        let zpl = match parsed {
            Some(env) => env.into_inner(),
            None => body,
        };
        if zpl.trim().is_empty() {
            return Err(RollcallError::Decode(
                "generate certificate: empty ZPL body".into(),
            ));
        }
        Ok(zpl)
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[async_trait]
impl AuthGateway for HttpGateway {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let body = Credentials {
            email,
            password,
            name: None,
        };
        let resp = self
            .send_json(Method::POST, &["auth", "login"], &body, "login")
            .await?;
        decode(resp, "login").await
    }

    async fn register(&self, email: &str, password: &str, name: &str) -> Result<AuthResponse> {
        let body = Credentials {
            email,
            password,
            name: Some(name),
        };
        let resp = self
            .send_json(Method::POST, &["auth", "register"], &body, "register")
            .await?;
        decode(resp, "register").await
    }
}
