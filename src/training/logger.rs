//! Structured training output with verbosity levels.

use super::eval::MetricValue;

/// Verbosity level for training output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent,
    /// Per-round metric lines and training milestones.
    Info,
    /// Everything, including per-round diagnostics.
    Debug,
}

/// Writes training progress to standard error.
///
/// All output is gated on the configured [`Verbosity`], so a `Silent`
/// logger costs nothing beyond the branch.
#[derive(Debug, Clone)]
pub struct TrainingLogger {
    verbosity: Verbosity,
}

impl TrainingLogger {
    /// Create a logger with the given verbosity.
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// The configured verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Log an informational message.
    pub fn info(&self, message: &str) {
        if self.verbosity >= Verbosity::Info {
            eprintln!("[train] {message}");
        }
    }

    /// Log a debug message.
    pub fn debug(&self, message: &str) {
        if self.verbosity >= Verbosity::Debug {
            eprintln!("[train] {message}");
        }
    }

    /// Log the metric values for one boosting round.
    pub fn log_round(&self, round: usize, metrics: &[MetricValue]) {
        if self.verbosity < Verbosity::Info || metrics.is_empty() {
            return;
        }
        let line = metrics
            .iter()
            .map(|m| format!("{}: {:.6}", m.name, m.value))
            .collect::<Vec<_>>()
            .join("  ");
        eprintln!("[train] round {round}  {line}");
    }

    /// Log an early stopping event.
    pub fn log_early_stopping(&self, round: usize, best_round: usize, metric: &str) {
        self.info(&format!(
            "early stopping at round {round} (best {metric} at round {best_round})"
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_ordering() {
        assert!(Verbosity::Silent < Verbosity::Info);
        assert!(Verbosity::Info < Verbosity::Debug);
        assert_eq!(Verbosity::default(), Verbosity::Silent);
    }
}
