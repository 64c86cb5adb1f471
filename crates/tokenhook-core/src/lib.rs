//! # tokenhook-core
//!
//! Chain-agnostic pieces of the token hooks: error normalization, call
//! results, observable result cells, configuration and audit logging.

pub mod audit;
pub mod config;
pub mod normalize;
pub mod result;
pub mod state;

pub use normalize::{normalize, normalize_any, NormalizedError, Payload};
pub use result::CallResult;
pub use state::{Observer, ResultCell, ResultReader};
