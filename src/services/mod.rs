//! Services
//!
//! Business logic: the model gateway, the analysis orchestrator, suggestion
//! application, the upload boundary, and the per-document session controller.

pub mod gateway;
pub mod orchestrator;
pub mod session;
pub mod suggestions;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

pub use gateway::{GatewaySettings, ModelGateway, ParseIssue};
pub use orchestrator::{route_tab, AnalysisOrchestrator, RunOutcome, ScanHandle, SharedSession};
pub use session::DocumentSession;
pub use suggestions::{ApplyAllReport, ApplyOutcome};
