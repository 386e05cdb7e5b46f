//! Error types for property evaluation.

use thiserror::Error;

/// Errors surfaced by keyframe evaluation. Only malformed requests fail;
/// degenerate keyframe data always has a defined result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("frame must be finite, got {frame}")]
    NonFiniteFrame { frame: f64 },
}

/// Reject NaN/inf frames at the boundary.
#[inline]
pub(crate) fn check_frame(frame: f64) -> Result<f64, EvalError> {
    if frame.is_finite() {
        Ok(frame)
    } else {
        Err(EvalError::NonFiniteFrame { frame })
    }
}
