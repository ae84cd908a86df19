//! Application error type.
//!
//! Every failure in this tool is caused by invalid input or a degenerate
//! dataset, so errors carry a process exit code and a human-readable message
//! and nothing else:
//!
//! - `2`: input/config error (missing column, non-numeric cell, missing feature)
//! - `3`: insufficient data (`n <= k`)
//! - `4`: numerical error (singular/collinear design, undefined inference)

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Input data or configuration violates the expected contract.
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Not enough observations for the number of estimated coefficients.
    pub fn insufficient(n_obs: usize, n_coef: usize) -> Self {
        Self::new(
            3,
            format!("Insufficient data: n={n_obs} observations for k={n_coef} coefficients (need n > k)."),
        )
    }

    /// A numerical routine could not produce a trustworthy result.
    pub fn numerical(message: impl Into<String>) -> Self {
        Self::new(4, format!("Numerical error: {}", message.into()))
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
