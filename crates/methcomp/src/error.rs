/// Errors raised while validating inputs or computing an analysis.
///
/// Validation errors (`ShapeMismatch`, `Range`, `Domain`) surface when a
/// sample or an analysis is constructed. `InsufficientData` surfaces when an
/// estimator is asked to compute and the data cannot support a finite result.
/// No partial results are ever returned alongside an error.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum Error {
    #[display(
        "length mismatch: method1 has {method1_len} values but method2 has {method2_len}"
    )]
    ShapeMismatch {
        method1_len: usize,
        method2_len: usize,
    },
    #[display("{name} must be {expected}, got {value}")]
    Range {
        name: &'static str,
        expected: &'static str,
        value: f64,
    },
    #[display("{name} must be {expected}, got '{value}'")]
    Domain {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
    #[display("insufficient data: {reason}")]
    InsufficientData { reason: &'static str },
}

impl Error {
    #[must_use]
    pub fn range(name: &'static str, expected: &'static str, value: f64) -> Self {
        Self::Range {
            name,
            expected,
            value,
        }
    }

    /// Builds a [`Error::Domain`] for a categorical option.
    #[must_use]
    pub fn domain(name: &'static str, expected: &'static str, value: impl ToString) -> Self {
        Self::Domain {
            name,
            expected,
            value: value.to_string(),
        }
    }

    #[must_use]
    pub fn insufficient(reason: &'static str) -> Self {
        Self::InsufficientData { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = Error::ShapeMismatch {
            method1_len: 3,
            method2_len: 4,
        };
        assert_eq!(
            err.to_string(),
            "length mismatch: method1 has 3 values but method2 has 4"
        );

        let err = Error::range("confidence level", "in the open interval (0, 1)", 1.5);
        assert_eq!(
            err.to_string(),
            "confidence level must be in the open interval (0, 1), got 1.5"
        );

        let err = Error::domain("difference mode", "one of 'absolute', 'percentage'", "ratio");
        assert!(err.is_domain());
        assert_eq!(
            err.to_string(),
            "difference mode must be one of 'absolute', 'percentage', got 'ratio'"
        );
    }
}
