//! External collaborator result shapes
//!
//! The engine consumes typed results from the identity provider, the
//! code-execution backend, and the question generator. These are shapes
//! only; how the collaborators work is not the engine's concern.

use serde::{Deserialize, Serialize};

/// Identity provider result. The engine never branches on identity:
/// quotas and streaks are local regardless of sign-in state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityStatus {
    pub signed_in: bool,
    pub guest: bool,
}

/// Code-execution backend result for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub output: Option<String>,
    pub error: Option<String>,
}

impl ExecutionOutcome {
    /// `success` is the sole trigger for recording a completion; failed
    /// attempts cause no engine mutation.
    pub fn confirms_completion(&self) -> bool {
        self.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_success_confirms() {
        let failed = ExecutionOutcome {
            success: false,
            output: None,
            error: Some("SyntaxError: unexpected token".to_string()),
        };
        assert!(!failed.confirms_completion());

        let passed = ExecutionOutcome {
            success: true,
            output: Some("42\n".to_string()),
            error: None,
        };
        assert!(passed.confirms_completion());
    }
}
