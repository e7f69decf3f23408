//! Tests for the stateless components.
//!
//! - `price_resolver_tests`: resolution order, bundle trust and deadlines.
//! - `ed25519_offsets_tests`: precompile instruction introspection.
//! - `relayer_meter_tests`: ceilings, cost conversion and permissive mode.
//! - `custody_tests`: CPI instruction encoding and account privileges.
