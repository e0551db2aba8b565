use serde::Serialize;
use strum::{Display, IntoStaticStr};
use tracing::debug;

use crate::error::{AnalyzerError, Result};

/// Linear analyzer lifecycle. A destroyed analyzer is never reused; obtain a
/// fresh instance from the factory instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    Initialized,
    Destroyed,
}

impl LifecycleState {
    /// Move `Uninitialized -> Initialized`
    pub fn initialize(&mut self) -> Result<()> {
        match *self {
            Self::Uninitialized => {
                *self = Self::Initialized;
                debug!("analyzer initialized");
                Ok(())
            }
            Self::Initialized => Err(AnalyzerError::FailedInitialize(
                "analyzer is already initialized".to_string(),
            )),
            Self::Destroyed => Err(AnalyzerError::FailedInitialize(
                "analyzer was destroyed; create a new instance".to_string(),
            )),
        }
    }

    /// Move `Initialized -> Destroyed`
    pub fn destroy(&mut self) -> Result<()> {
        match *self {
            Self::Initialized => {
                *self = Self::Destroyed;
                debug!("analyzer destroyed");
                Ok(())
            }
            Self::Uninitialized => Err(AnalyzerError::FailedDestruct(
                "analyzer was never initialized".to_string(),
            )),
            Self::Destroyed => Err(AnalyzerError::FailedDestruct(
                "analyzer is already destroyed".to_string(),
            )),
        }
    }

    /// Guard for every configuration call
    pub fn ensure_ready(&self) -> Result<()> {
        match self {
            Self::Initialized => Ok(()),
            Self::Uninitialized => Err(AnalyzerError::FailedInitialize(
                "analyzer must be initialized before it is configured".to_string(),
            )),
            Self::Destroyed => Err(AnalyzerError::FailedDestruct(
                "analyzer was destroyed and may not be used".to_string(),
            )),
        }
    }

    pub fn is_initialized(&self) -> bool {
        *self == Self::Initialized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyzerStatus;

    #[test]
    fn test_linear_transitions() {
        let mut state = LifecycleState::default();
        assert_eq!(state, LifecycleState::Uninitialized);
        assert_eq!(state.destroy().unwrap_err().status(), AnalyzerStatus::FailedDestruct);
        assert_eq!(state, LifecycleState::Uninitialized);
        assert!(state.initialize().is_ok());
        assert!(state.is_initialized());
        assert!(state.destroy().is_ok());
        assert_eq!(state, LifecycleState::Destroyed);
    }

    #[test]
    fn test_no_reentry_after_destroy() {
        let mut state = LifecycleState::Initialized;
        state.destroy().unwrap();

        let err = state.initialize().unwrap_err();
        assert_eq!(err.status(), AnalyzerStatus::FailedInitialize);
        let err = state.destroy().unwrap_err();
        assert_eq!(err.status(), AnalyzerStatus::FailedDestruct);
        assert_eq!(state, LifecycleState::Destroyed);
    }

    #[test]
    fn test_ready_guard() {
        assert_eq!(
            LifecycleState::Uninitialized.ensure_ready().unwrap_err().status(),
            AnalyzerStatus::FailedInitialize
        );
        assert!(LifecycleState::Initialized.ensure_ready().is_ok());
        assert_eq!(
            LifecycleState::Destroyed.ensure_ready().unwrap_err().status(),
            AnalyzerStatus::FailedDestruct
        );
    }

    #[test]
    fn test_double_initialize_is_rejected() {
        let mut state = LifecycleState::Uninitialized;
        state.initialize().unwrap();
        assert!(state.initialize().is_err());
        assert!(state.is_initialized());
    }
}
