use thiserror::Error;

/// Errors a user can see after pressing `=`.
///
/// Everything that is not a division by zero collapses into
/// [`EvalError::Calculation`]; the reason is kept for logging only.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Calculation error")]
    Calculation(String),
}

impl EvalError {
    pub fn calc(reason: impl Into<String>) -> Self {
        EvalError::Calculation(reason.into())
    }

    /// Detail for logs; the user-facing text is the `Display` impl.
    pub fn reason(&self) -> &str {
        match self {
            EvalError::DivisionByZero => "division by zero",
            EvalError::Calculation(reason) => reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calculation_error_hides_reason() {
        let err = EvalError::calc("Unknown identifier: 'foo'");
        assert_eq!(err.to_string(), "Calculation error");
        assert_eq!(err.reason(), "Unknown identifier: 'foo'");
    }

    #[test]
    fn division_by_zero_message() {
        assert_eq!(EvalError::DivisionByZero.to_string(), "Division by zero");
    }
}
