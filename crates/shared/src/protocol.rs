use serde::{Deserialize, Serialize};

use crate::domain::BYTES_PER_MIB;

/// Body of a successful `POST /api/upload-audio`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub filename: String,
    pub size: u64,
    pub analysis: Analysis,
}

impl AnalysisResponse {
    /// Size in mebibytes with two decimals, e.g. `"1.00"`.
    pub fn size_mib_display(&self) -> String {
        format!("{:.2}", self.size as f64 / BYTES_PER_MIB as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub score: u8,
    pub feedback: String,
    pub details: AnalysisDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDetails {
    pub pitch_accuracy: String,
    pub rhythm_stability: String,
    pub vocal_range: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Optional JSON body of a rejected upload.
///
/// `detail` is usually a string, but validation failures carry a structured value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Human-readable detail, `None` when absent or falsy (null, `""`, `0`, `false`).
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null | serde_json::Value::Bool(false) => None,
            serde_json::Value::Number(n) if n.as_f64() == Some(0.0) => None,
            serde_json::Value::String(text) if text.is_empty() => None,
            serde_json::Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}
