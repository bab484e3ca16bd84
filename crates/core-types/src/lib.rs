//! # Core Types
//!
//! Layer 0 of the workspace: the plain data records exchanged between the
//! configuration, analytics and risk crates, together with their range checks.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{RiskBand, Verdict};
pub use error::CoreError;
pub use structs::{FinancialAssumptions, ProductTier, TestArm};
