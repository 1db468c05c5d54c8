//! Nested parameter groups for GBM configuration.
//!
//! Parameters are grouped by concern: [`TreeParams`] for tree structure,
//! [`RegularizationParams`] for split constraints, [`SamplingParams`] for
//! row subsampling. Each group has validation and defaults matching the
//! trainer's behavior.

use thiserror::Error;

/// Parameter validation errors for the nested groups.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ParamValidationError {
    #[error("max_depth must be at least 1, got {0}")]
    InvalidMaxDepth(u32),
    #[error("lambda must be non-negative, got {0}")]
    InvalidLambda(f32),
    #[error("min_child_weight must be non-negative, got {0}")]
    InvalidMinChildWeight(f32),
    #[error("min_split_gain must be non-negative, got {0}")]
    InvalidMinSplitGain(f32),
    #[error("subsample must be in (0, 1], got {0}")]
    InvalidSubsample(f32),
}

/// Tree structure parameters.
#[derive(Debug, Clone)]
pub struct TreeParams {
    /// Maximum depth of each tree. Default: 5.
    pub max_depth: u32,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self { max_depth: 5 }
    }
}

impl TreeParams {
    pub fn depth_wise(max_depth: u32) -> Self {
        Self { max_depth }
    }

    pub fn validate(&self) -> Result<(), ParamValidationError> {
        if self.max_depth == 0 {
            return Err(ParamValidationError::InvalidMaxDepth(self.max_depth));
        }
        Ok(())
    }
}

/// Regularization and split-constraint parameters.
#[derive(Debug, Clone)]
pub struct RegularizationParams {
    /// L2 regularization on leaf weights. Default: 0.0.
    pub lambda: f32,
    /// Minimum sum of hessians in each child. Default: 10.0.
    ///
    /// With unit hessians this is a minimum row count per leaf.
    pub min_child_weight: f32,
    /// Minimum gain required to make a split. Default: 0.0.
    pub min_split_gain: f32,
}

impl Default for RegularizationParams {
    fn default() -> Self {
        Self {
            lambda: 0.0,
            min_child_weight: 10.0,
            min_split_gain: 0.0,
        }
    }
}

impl RegularizationParams {
    pub fn validate(&self) -> Result<(), ParamValidationError> {
        if !(self.lambda >= 0.0) {
            return Err(ParamValidationError::InvalidLambda(self.lambda));
        }
        if !(self.min_child_weight >= 0.0) {
            return Err(ParamValidationError::InvalidMinChildWeight(
                self.min_child_weight,
            ));
        }
        if !(self.min_split_gain >= 0.0) {
            return Err(ParamValidationError::InvalidMinSplitGain(
                self.min_split_gain,
            ));
        }
        Ok(())
    }
}

/// Row subsampling parameters.
#[derive(Debug, Clone)]
pub struct SamplingParams {
    /// Fraction of rows sampled per boosting round. Default: 1.0.
    pub subsample: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self { subsample: 1.0 }
    }
}

impl SamplingParams {
    pub fn validate(&self) -> Result<(), ParamValidationError> {
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return Err(ParamValidationError::InvalidSubsample(self.subsample));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(TreeParams::default().validate().is_ok());
        assert!(RegularizationParams::default().validate().is_ok());
        assert!(SamplingParams::default().validate().is_ok());
    }

    #[test]
    fn default_values() {
        assert_eq!(TreeParams::default().max_depth, 5);
        let reg = RegularizationParams::default();
        assert_eq!(reg.lambda, 0.0);
        assert_eq!(reg.min_child_weight, 10.0);
        assert_eq!(SamplingParams::default().subsample, 1.0);
    }

    #[test]
    fn invalid_params_are_rejected() {
        assert!(TreeParams { max_depth: 0 }.validate().is_err());
        assert!(RegularizationParams {
            lambda: -1.0,
            ..Default::default()
        }
        .validate()
        .is_err());
        assert_eq!(
            SamplingParams { subsample: 0.0 }.validate(),
            Err(ParamValidationError::InvalidSubsample(0.0))
        );
        assert!(SamplingParams { subsample: 1.5 }.validate().is_err());
        // NaN fails every range check.
        assert!(SamplingParams {
            subsample: f32::NAN
        }
        .validate()
        .is_err());
    }
}
