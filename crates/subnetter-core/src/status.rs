use crate::models::LifecycleState;
use log::warn;

/// Receives a message whenever a provider status has no canonical mapping.
///
/// Emission is fire-and-forget: a sink must never fail its caller.
pub trait DiagnosticSink {
    fn emit(&self, message: &str);
}

/// Default sink, forwards diagnostics to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&self, message: &str) {
        warn!("{}", message);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn emit(&self, message: &str) {
        (**self).emit(message)
    }
}

/// Map a provider stack status to its canonical state.
///
/// Unmapped statuses become `Unknown` and emit exactly one diagnostic naming
/// the status. No memory between calls and no transition checks.
pub fn normalize(status: &str, sink: &dyn DiagnosticSink) -> LifecycleState {
    match LifecycleState::from_provider(status) {
        Some(state) => state,
        None => {
            sink.emit(&format!("unknown status: {}", status));
            LifecycleState::Unknown
        }
    }
}

/// Normalizer bound to a diagnostic sink
#[derive(Debug, Clone, Default)]
pub struct StatusNormalizer<S = LogSink> {
    sink: S,
}

impl<S: DiagnosticSink> StatusNormalizer<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn normalize(&self, status: &str) -> LifecycleState {
        normalize(status, &self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl DiagnosticSink for RecordingSink {
        fn emit(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn test_known_statuses() {
        let normalizer = StatusNormalizer::new(RecordingSink::default());

        let cases = [
            ("CREATE_IN_PROGRESS", LifecycleState::Creating),
            ("CREATE_COMPLETE", LifecycleState::Running),
            ("DELETE_FAILED", LifecycleState::Running),
            ("DELETE_IN_PROGRESS", LifecycleState::Deleting),
            ("ROLLBACK_IN_PROGRESS", LifecycleState::Rollback),
            ("ROLLBACK_COMPLETE", LifecycleState::Failed),
        ];
        for (status, expected) in cases {
            assert_eq!(normalizer.normalize(status), expected, "{}", status);
        }

        assert!(normalizer.sink().messages().is_empty());
    }

    #[test]
    fn test_unknown_status_emits_one_diagnostic() {
        let normalizer = StatusNormalizer::new(RecordingSink::default());

        assert_eq!(normalizer.normalize("WAT"), LifecycleState::Unknown);
        assert_eq!(normalizer.sink().messages(), vec!["unknown status: WAT"]);
    }

    #[test]
    fn test_matching_is_exact() {
        let sink = RecordingSink::default();

        assert_eq!(normalize("create_complete", &sink), LifecycleState::Unknown);
        assert_eq!(normalize("UPDATE_COMPLETE", &sink), LifecycleState::Unknown);
        assert_eq!(normalize("", &sink), LifecycleState::Unknown);
        assert_eq!(sink.messages().len(), 3);
    }

    #[test]
    fn test_repeated_calls_are_idempotent() {
        let sink = RecordingSink::default();
        let normalizer = StatusNormalizer::new(&sink);

        for _ in 0..3 {
            assert_eq!(normalizer.normalize("ROLLBACK_COMPLETE"), LifecycleState::Failed);
            assert_eq!(normalizer.normalize("WAT"), LifecycleState::Unknown);
        }

        // One diagnostic per unmapped call, none for mapped ones
        assert_eq!(sink.messages().len(), 3);
    }

    #[test]
    fn test_stack_summary_lifecycle() {
        let sink = RecordingSink::default();
        let stack = crate::models::StackSummary::new("web", "DELETE_IN_PROGRESS");
        assert_eq!(stack.lifecycle(&sink), LifecycleState::Deleting);
    }
}
