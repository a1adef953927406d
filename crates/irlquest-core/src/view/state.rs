//! Observable screen state

/// State of one screen
///
/// Data from the last successful operation rides along while a new one is
/// loading and after it fails, so the screen never goes blank on a retry.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState<T> {
    /// Nothing has run yet
    #[default]
    Idle,
    /// An operation is in flight
    Loading { last: Option<T> },
    /// The most recent operation succeeded
    Success(T),
    /// The most recent operation failed
    Failure { message: String, last: Option<T> },
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ViewState::Idle)
    }

    /// Error message of the last operation, if it failed
    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failure { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Current data, or the last successful data while loading or failed
    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Idle => None,
            ViewState::Success(data) => Some(data),
            ViewState::Loading { last } | ViewState::Failure { last, .. } => last.as_ref(),
        }
    }

    /// Take ownership of the data
    pub fn into_data(self) -> Option<T> {
        match self {
            ViewState::Idle => None,
            ViewState::Success(data) => Some(data),
            ViewState::Loading { last } | ViewState::Failure { last, .. } => last,
        }
    }
}

impl<T: Clone> ViewState<T> {
    /// Loading state carrying this state's data forward
    pub fn to_loading(&self) -> Self {
        ViewState::Loading {
            last: self.data().cloned(),
        }
    }

    /// Failure state carrying this state's data forward
    pub fn to_failure(&self, message: impl Into<String>) -> Self {
        ViewState::Failure {
            message: message.into(),
            last: self.data().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_has_nothing() {
        let state: ViewState<Vec<i32>> = ViewState::default();
        assert!(state.is_idle());
        assert!(!state.is_loading());
        assert!(state.error().is_none());
        assert!(state.data().is_none());
    }

    #[test]
    fn test_data_survives_loading_and_failure() {
        let state = ViewState::Success(vec![1, 2]);

        let loading = state.to_loading();
        assert!(loading.is_loading());
        assert!(loading.error().is_none());
        assert_eq!(loading.data(), Some(&vec![1, 2]));

        let failed = loading.to_failure("Task not found");
        assert!(!failed.is_loading());
        assert_eq!(failed.error(), Some("Task not found"));
        assert_eq!(failed.into_data(), Some(vec![1, 2]));
    }

    #[test]
    fn test_failure_from_idle_has_no_data() {
        let state: ViewState<i32> = ViewState::Idle;
        let failed = state.to_loading().to_failure("Network error");
        assert!(failed.data().is_none());
        assert_eq!(failed.error(), Some("Network error"));
    }
}
