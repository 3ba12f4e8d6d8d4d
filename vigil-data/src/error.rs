use thiserror::Error;

/// All errors generated in `vigil-data`.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum DataError {
    #[error("http request failed: {0}")]
    Http(String),

    #[error("unexpected payload from {provider}: {detail}")]
    Payload {
        provider: &'static str,
        detail: String,
    },

    #[error("all providers exhausted for {0}")]
    ProvidersExhausted(&'static str),

    #[error("feed error: {0}")]
    Feed(String),
}

impl DataError {
    /// Determine whether retrying against another provider can help.
    ///
    /// Payload errors mean the venue answered but with a shape we do not
    /// understand - the next venue in the cascade may still work. An
    /// exhausted cascade is final until the next refresh cycle.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, DataError::ProvidersExhausted(_))
    }
}

impl From<reqwest::Error> for DataError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_error_is_retryable() {
        struct TestCase {
            input: DataError,
            expected: bool,
        }

        let tests = vec![
            TestCase {
                // TC0: transport failure, next venue may be reachable
                input: DataError::Http("connection refused".to_string()),
                expected: true,
            },
            TestCase {
                // TC1: venue answered garbage, cascade continues
                input: DataError::Payload {
                    provider: "kraken",
                    detail: "missing result field".to_string(),
                },
                expected: true,
            },
            TestCase {
                // TC2: every venue already tried
                input: DataError::ProvidersExhausted("order_book"),
                expected: false,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            assert_eq!(test.input.is_retryable(), test.expected, "TC{} failed", index);
        }
    }
}
