//! Certificate preview through an external ZPL label renderer.
//!
//! The console never interprets ZPL itself: the backend fills a stored
//! template for one student and the label service turns the markup into an
//! image.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::LabelConfig;
use crate::error::{Result, RollcallError};
use crate::gateway::CertificateGateway;
use crate::models::certificate::RenderedLabel;

/// Client for a Labelary-compatible rendering endpoint.
pub struct LabelRenderer {
    http: Client,
    base_url: String,
    dpmm: u8,
    width_in: f32,
    height_in: f32,
}

impl LabelRenderer {
    pub fn new(config: &LabelConfig) -> Self {
        Self::with_http_client(config, Client::new())
    }

    pub fn with_http_client(config: &LabelConfig, http: Client) -> Self {
        Self {
            http,
            base_url: config.render_url.trim_end_matches('/').to_string(),
            dpmm: config.dpmm,
            width_in: config.width_in,
            height_in: config.height_in,
        }
    }

    /// Render endpoint for the first label of the configured size.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1/printers/{}dpmm/labels/{}x{}/0/",
            self.base_url, self.dpmm, self.width_in, self.height_in
        )
    }

    /// POST raw ZPL and return the rendered image.
    pub async fn render(&self, zpl: &str) -> Result<RenderedLabel> {
        if zpl.trim().is_empty() {
            return Err(RollcallError::invalid("templateCode", "ZPL code is empty"));
        }

        let url = self.endpoint();
        debug!(url = %url, bytes = zpl.len(), "Rendering label");

        let resp = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(zpl.to_string())
            .send()
            .await
            .map_err(|e| RollcallError::Network(format!("label render request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = match resp.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(status = %status, error = %e, "Failed to read label renderer error body");
                    String::new()
                }
            };
            warn!(status = %status, "Label renderer rejected ZPL");
            return Err(RollcallError::Unknown {
                status: Some(status.as_u16()),
                message: format!("label render failed: {body}"),
            });
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/png")
            .to_string();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| RollcallError::Network(format!("label render body failed: {e}")))?
            .to_vec();

        if bytes.is_empty() {
            return Err(RollcallError::Decode("label renderer returned no image".into()));
        }

        Ok(RenderedLabel {
            content_type,
            bytes,
        })
    }
}

/// Generate a student's certificate on the backend and render it for preview.
pub async fn preview_certificate<G>(
    gateway: &G,
    renderer: &LabelRenderer,
    student_id: &str,
    template_id: &str,
) -> Result<RenderedLabel>
where
    G: CertificateGateway + ?Sized,
{
    if student_id.trim().is_empty() {
        return Err(RollcallError::invalid("studentId", "Student ID is missing"));
    }
    let zpl = gateway.generate(student_id, template_id).await?;
    renderer.render(&zpl).await
}
