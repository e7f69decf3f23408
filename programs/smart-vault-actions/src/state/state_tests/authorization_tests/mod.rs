//! Tests for `AuthorizationGate` and `Permissions`.
//!
//! - `core_unit_tests`: grant, revoke and lookup semantics.
//! - `property_tests`: random grant/revoke sequences against a model.
//! - `attack_scenarios`: privilege escalation attempts through the gate.

pub mod attack_scenarios;
