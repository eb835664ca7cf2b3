//! Counterfeit incident reporting.
//!
//! When a user decides to report a suspect product, the report is handed to
//! a [`ReportSink`]. Actual delivery (mail transport, queueing, retries)
//! lives behind that boundary and is not this crate's concern.

pub mod html;

use crate::model::ImageBlob;
use async_trait::async_trait;

/// A user-filed counterfeit report, bound for the regulator.
#[derive(Debug, Clone)]
pub struct IncidentReport {
    pub drug_name: String,
    pub registration_number: String,
    pub reason: String,
    pub location: String,
    pub package_image: ImageBlob,
    pub secondary_image: Option<ImageBlob>,
}

impl IncidentReport {
    pub fn attachment_count(&self) -> usize {
        1 + usize::from(self.secondary_image.is_some())
    }
}

/// Delivery channel for incident reports.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn dispatch(&self, report: &IncidentReport) -> anyhow::Result<()>;
    fn sink_name(&self) -> &'static str;
}

/// Logs the report instead of delivering it.
///
/// Stands in for a real delivery channel in development deployments, so the
/// rest of the flow can be exercised without outbound credentials.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl ReportSink for LogSink {
    async fn dispatch(&self, report: &IncidentReport) -> anyhow::Result<()> {
        tracing::debug!(body_len = html::render(report).len(), "rendered report body");
        tracing::info!(
            drug = %report.drug_name,
            registration = %report.registration_number,
            location = %report.location,
            attachments = report.attachment_count(),
            "incident report (log sink, not delivered): {}",
            report.reason
        );
        Ok(())
    }

    fn sink_name(&self) -> &'static str {
        "log"
    }
}
