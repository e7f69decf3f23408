//! Unit and property tests for the per-action policy state.
//!
//! - `authorization_tests`: the capability gate and its bitfield.
//! - `threshold_tests`: default and per-asset value bands.
//! - `limit_accrual_tests`: the rolling-window state machine.
//! - `config_tests`: allow lists, gas configuration and action parameters.
//! - `gated_setters_tests`: every configuration setter behind its operation.
//! - `layout_zero_copy`: pinned sizes of every zero-copy record.

pub mod authorization_tests;
pub mod layout_zero_copy;
pub mod limit_accrual_tests;
