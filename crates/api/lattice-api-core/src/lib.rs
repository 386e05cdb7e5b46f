//! lattice-api-core: shared Value model (engine-agnostic)

pub mod coercion;
pub mod color;
pub mod value;

pub use color::{ColorError, HexWidth, Rgba8};
pub use value::{Value, ValueKind};
