use serde::{Deserialize, Serialize};

/// A stored ZPL certificate template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateTemplate {
    #[serde(rename = "_id")]
    pub id: String,
    pub school_id: String,
    pub name: String,
    #[serde(default)]
    pub template_code: String,
}

/// Payload for `POST /certificate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewCertificateTemplate {
    pub school_id: String,
    pub name: String,
    pub template_code: String,
}

/// A rendered label image returned by the label service.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLabel {
    pub content_type: String,
    pub bytes: Vec<u8>,
}
