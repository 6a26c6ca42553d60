pub mod compliance;
pub mod error;
pub mod progress;

pub use compliance::{
    CategoryResult, CheckResult, ComplianceResult, DEFAULT_DISCLAIMER, Source, SubProcessor,
    TrafficLight,
};
pub use error::{CheckerError, ErrorCategory, LlmError, Result};
pub use progress::{CheckEvent, CheckRequest, LeadRequest, ProgressUpdate, ToolCandidate};
