//! finledger ops — the operation CRUD surface exposed to the transport
//! layer, and CSV report import/export.

pub mod reports;
pub mod service;

pub use reports::ReportService;
pub use service::OperationService;
