use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("particle frame must be finite, got {frame}")]
    NonFiniteFrame { frame: f64 },
}

/// Normalize a requested frame to a simulation frame index: floor, clamp at 0,
/// cap at `max`.
pub(crate) fn frame_index(frame: f64, max: u32) -> Result<u32, SimError> {
    if !frame.is_finite() {
        return Err(SimError::NonFiniteFrame { frame });
    }
    Ok(frame.floor().clamp(0.0, max as f64) as u32)
}
