pub mod diagnostics;
pub mod logger;

pub use diagnostics::{Diagnostic, DiagnosticSeverity, Reporter};
pub use logger::init_logging;
