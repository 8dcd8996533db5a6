//! Response shapes for today's measurements

use serde::Serialize;

/// One download sample for `/downloads`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadPoint {
    /// Creation timestamp, RFC 3339 UTC
    pub date: String,
    pub download: Option<f64>,
}

/// Means over today's rows; `None` when there are no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Averages {
    pub average_download: Option<f64>,
    pub average_upload: Option<f64>,
    pub average_ping: Option<f64>,
}
