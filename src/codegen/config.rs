//! Generator Configuration

/// How the generated program captures and restores host-graph state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BacktrackPolicy {
    /// Record individual graph changes on the change stack and replay them
    /// backwards on rollback.
    #[default]
    RecordChanges,
    /// Push whole copies of the host graph onto the graph stack and swap a
    /// copy back in on rollback.
    CopyGraphs,
}

/// Trace output emitted into the generated program. All off by default;
/// when any toggle is on, the runtime opens and closes a trace file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraceConfig {
    /// Trace rule match attempts and outcomes.
    pub rules: bool,
    /// Print the host graph after applications and restorations.
    pub graphs: bool,
    /// Trace restore-point capture, refresh, discard and undo.
    pub backtracking: bool,
}

impl TraceConfig {
    pub fn any(&self) -> bool {
        self.rules || self.graphs || self.backtracking
    }
}

/// Configuration for one generator invocation.
#[derive(Debug, Clone, Default)]
pub struct GenConfig {
    pub backtracking: BacktrackPolicy,
    pub tracing: TraceConfig,
    /// The runtime was built with a hashed host list store; teardown must
    /// free it.
    pub list_hashing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenConfig::default();
        assert_eq!(config.backtracking, BacktrackPolicy::RecordChanges);
        assert!(!config.tracing.any());
        assert!(!config.list_hashing);
    }

    #[test]
    fn test_any_trace_toggle_counts() {
        assert!(TraceConfig { rules: false, graphs: true, backtracking: false }.any());
        assert!(TraceConfig { rules: false, graphs: false, backtracking: true }.any());
    }
}
