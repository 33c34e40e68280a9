use crate::trace::SqlTrace;

/// Builder-wide settings.
///
/// By default every statement is traced at `DEBUG` and unrecognized join sides
/// degrade to a plain `JOIN`.
#[derive(Debug, Clone, PartialEq)]
pub struct BuilderConfig {
    /// Tracing output for finished statements. `None` disables it.
    pub trace: Option<SqlTrace>,
    /// Reject unrecognized join sides instead of dropping them.
    pub strict_join_side: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            trace: Some(SqlTrace::default()),
            strict_join_side: false,
        }
    }
}

impl BuilderConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tracing output for finished statements.
    pub fn with_trace(mut self, trace: SqlTrace) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Disable statement tracing.
    pub fn without_trace(mut self) -> Self {
        self.trace = None;
        self
    }

    /// Fail with a config error when a join side keyword is not recognized.
    pub fn strict_join_side(mut self, strict: bool) -> Self {
        self.strict_join_side = strict;
        self
    }
}
