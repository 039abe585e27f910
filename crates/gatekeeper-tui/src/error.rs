use tracing::{error, warn};

/// Severity levels for error events
#[derive(Debug, Clone, Copy)]
pub enum ErrorSeverity {
    Warning,
    Error,
    Fatal,
}

/// Extension trait for ergonomic error logging on `Result`s
pub trait ResultExt<T> {
    /// Log the error side at the given severity, passing the result through
    fn emit_event(self, severity: ErrorSeverity) -> Self;

    /// Log a warning event
    fn emit_warning(self) -> Self;

    /// Log an error event
    fn emit_error(self) -> Self;
}

/// Extension trait for direct error logging
pub trait ErrorExt {
    fn emit_event(&self, severity: ErrorSeverity);
    fn emit_warning(&self) {
        self.emit_event(ErrorSeverity::Warning)
    }
    fn emit_error(&self) {
        self.emit_event(ErrorSeverity::Error)
    }
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: std::fmt::Debug,
{
    fn emit_event(self, severity: ErrorSeverity) -> Self {
        if let Err(err) = self.as_ref() {
            match severity {
                ErrorSeverity::Warning => {
                    warn!(target: "gatekeeper_tui::error", "Warning: {:?}", err)
                }
                ErrorSeverity::Error => error!(target: "gatekeeper_tui::error", "Error: {:?}", err),
                ErrorSeverity::Fatal => error!(target: "gatekeeper_tui::error", "Fatal: {:?}", err),
            }
        }
        self
    }

    fn emit_warning(self) -> Self {
        self.emit_event(ErrorSeverity::Warning)
    }

    fn emit_error(self) -> Self {
        self.emit_event(ErrorSeverity::Error)
    }
}

impl<E> ErrorExt for E
where
    E: std::fmt::Debug,
{
    fn emit_event(&self, severity: ErrorSeverity) {
        match severity {
            ErrorSeverity::Warning => {
                warn!(target: "gatekeeper_tui::error", "Warning: {:?}", self)
            }
            ErrorSeverity::Error => error!(target: "gatekeeper_tui::error", "Error: {:?}", self),
            ErrorSeverity::Fatal => error!(target: "gatekeeper_tui::error", "Fatal: {:?}", self),
        }
    }
}
