use thiserror::Error;

pub const DEFAULT_ROWS: usize = 15;
pub const DEFAULT_COLS: usize = 10;
pub const DEFAULT_FALL_DELAY: u32 = 20;

/// Upper bound on either board dimension; keeps coordinates inside `i32`.
pub const MAX_DIMENSION: usize = 1024;

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum ConfigError {
    #[error("board needs at least one row")]
    ZeroRows,
    #[error("board needs at least one column")]
    ZeroCols,
    #[error("fall delay must be at least one tick")]
    ZeroFallDelay,
    #[error("board dimension {0} exceeds the maximum of {}", MAX_DIMENSION)]
    DimensionTooLarge(usize),
}

/// Parameters fixed for the lifetime of a session (and reused on restart).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Config {
    pub rows: usize,
    pub cols: usize,
    /// Ticks per one-row drop at the start of a game.
    pub fall_delay: u32,
    /// Seeds the random piece provider. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 {
            return Err(ConfigError::ZeroRows);
        }
        if self.cols == 0 {
            return Err(ConfigError::ZeroCols);
        }
        if self.fall_delay == 0 {
            return Err(ConfigError::ZeroFallDelay);
        }
        if let Some(&too_large) = [self.rows, self.cols].iter().find(|d| **d > MAX_DIMENSION) {
            return Err(ConfigError::DimensionTooLarge(too_large));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            fall_delay: DEFAULT_FALL_DELAY,
            seed: None,
        }
    }
}
