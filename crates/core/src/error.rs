use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("got {positions} positions but {colors} colors")]
    LengthMismatch { positions: usize, colors: usize },
}
