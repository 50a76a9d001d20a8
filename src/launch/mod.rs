//! Launch module for rearrange operations.
//!
//! Provides the high-level API for rearranging tensors.

mod config;
mod executor;

pub use config::RearrangeConfig;
pub use executor::{execute_plan, rearrange, rearrange_with_config, rearrange_with_pattern};
