pub mod config;
pub mod errors;
pub mod span;

pub use config::PipecheckConfig;
pub use errors::{Diagnostic, DiagnosticBag, Severity};
pub use span::{Position, Range};
