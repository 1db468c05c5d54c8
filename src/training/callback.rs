//! Early stopping callback for training.
//!
//! Monitors a validation metric and stops training when no improvement is
//! seen for a specified number of rounds.

/// Result of an early stopping update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarlyStopAction {
    /// The metric improved this round.
    Improved,
    /// No improvement, but patience is not exhausted.
    Continue,
    /// Patience exhausted; training should stop.
    Stop,
}

/// Early stopping configuration and state.
///
/// Created with `patience == 0` the callback is disabled and
/// [`update`](Self::update) always returns [`EarlyStopAction::Improved`]
/// or [`EarlyStopAction::Continue`].
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    /// Rounds without improvement before stopping. 0 disables.
    patience: usize,
    best_value: Option<f64>,
    best_round: usize,
    current_round: usize,
    higher_is_better: bool,
}

impl EarlyStopping {
    /// Create a new early stopping callback.
    pub fn new(patience: usize, higher_is_better: bool) -> Self {
        Self {
            patience,
            best_value: None,
            best_round: 0,
            current_round: 0,
            higher_is_better,
        }
    }

    /// Whether the callback is active.
    pub fn is_enabled(&self) -> bool {
        self.patience > 0
    }

    /// Record this round's metric value and decide what to do.
    pub fn update(&mut self, value: f64) -> EarlyStopAction {
        let is_improvement = match self.best_value {
            None => true,
            Some(best) => {
                if self.higher_is_better {
                    value > best
                } else {
                    value < best
                }
            }
        };

        if is_improvement {
            self.best_value = Some(value);
            self.best_round = self.current_round;
        }

        self.current_round += 1;

        if is_improvement {
            EarlyStopAction::Improved
        // `current_round` already points past this round, so the streak of
        // non-improving rounds is `current_round - best_round - 1`.
        } else if self.is_enabled() && self.current_round - self.best_round - 1 > self.patience {
            EarlyStopAction::Stop
        } else {
            EarlyStopAction::Continue
        }
    }

    /// Best metric value observed.
    pub fn best_value(&self) -> Option<f64> {
        self.best_value
    }

    /// Round at which the best value was observed.
    pub fn best_round(&self) -> usize {
        self.best_round
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn improving_rounds_never_stop() {
        let mut es = EarlyStopping::new(3, false); // lower is better

        assert_eq!(es.update(1.0), EarlyStopAction::Improved);
        assert_eq!(es.update(0.9), EarlyStopAction::Improved);
        assert_eq!(es.update(0.8), EarlyStopAction::Improved);
        assert_eq!(es.best_round(), 2);
        assert_eq!(es.best_value(), Some(0.8));
    }

    #[test]
    fn stops_after_patience_exhausted() {
        let mut es = EarlyStopping::new(2, false);

        assert_eq!(es.update(0.5), EarlyStopAction::Improved);
        assert_eq!(es.update(0.6), EarlyStopAction::Continue);
        assert_eq!(es.update(0.7), EarlyStopAction::Continue);
        assert_eq!(es.update(0.8), EarlyStopAction::Stop);
        assert_eq!(es.best_round(), 0);
    }

    #[test]
    fn improvement_resets_patience() {
        let mut es = EarlyStopping::new(2, false);

        es.update(1.0);
        es.update(1.1);
        assert_eq!(es.update(0.9), EarlyStopAction::Improved);
        assert_eq!(es.update(1.0), EarlyStopAction::Continue);
        assert_eq!(es.update(1.0), EarlyStopAction::Continue);
        assert_eq!(es.update(1.0), EarlyStopAction::Stop);
        assert_eq!(es.best_round(), 2);
    }

    #[test]
    fn higher_is_better_direction() {
        let mut es = EarlyStopping::new(1, true);

        assert_eq!(es.update(0.8), EarlyStopAction::Improved);
        assert_eq!(es.update(0.9), EarlyStopAction::Improved);
        assert_eq!(es.update(0.85), EarlyStopAction::Continue);
        assert_eq!(es.update(0.85), EarlyStopAction::Stop);
    }

    #[test]
    fn zero_patience_disables_stopping() {
        let mut es = EarlyStopping::new(0, false);
        assert!(!es.is_enabled());

        es.update(0.5);
        for _ in 0..10 {
            assert_ne!(es.update(0.9), EarlyStopAction::Stop);
        }
    }
}
