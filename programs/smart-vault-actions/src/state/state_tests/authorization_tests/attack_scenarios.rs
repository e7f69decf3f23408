//! Privilege escalation attempts through the public gate API.
//!
//! Each scenario assumes the attacker already holds some narrower grant and
//! tries to turn it into control over other operations or accounts.

use crate::error::AuthorizationError;
use crate::state::authorization::{AuthorizationGate, Operation};
use crate::test_utils::{assert_anchor_error, key, EXECUTOR, OWNER};
use bytemuck::Zeroable;

const ATTACKER: u8 = 66;

fn gate_with_executor() -> AuthorizationGate {
    let mut gate = AuthorizationGate::zeroed();
    gate.bootstrap(&key(OWNER)).expect("bootstrap");
    gate.authorize(&key(OWNER), &key(EXECUTOR), Operation::Execute)
        .expect("grant execute");
    gate
}

#[test]
fn executor_cannot_grant_itself_more() {
    let mut gate = gate_with_executor();

    assert_anchor_error(
        gate.authorize(&key(EXECUTOR), &key(EXECUTOR), Operation::SetGasLimits),
        AuthorizationError::Unauthorized,
    );
    assert!(!gate.is_authorized(&key(EXECUTOR), Operation::SetGasLimits));
}

#[test]
fn outsider_cannot_revoke_owner() {
    let mut gate = gate_with_executor();

    assert_anchor_error(
        gate.unauthorize(&key(ATTACKER), &key(OWNER), Operation::Authorize),
        AuthorizationError::Unauthorized,
    );
    assert!(gate.is_authorized(&key(OWNER), Operation::Authorize));
}

#[test]
fn authorize_holder_cannot_revoke_without_unauthorize() {
    let mut gate = gate_with_executor();
    gate.authorize(&key(OWNER), &key(ATTACKER), Operation::Authorize)
        .expect("grant authorize");

    assert_anchor_error(
        gate.unauthorize(&key(ATTACKER), &key(EXECUTOR), Operation::Execute),
        AuthorizationError::Unauthorized,
    );
    assert!(gate.is_authorized(&key(EXECUTOR), Operation::Execute));
}

#[test]
fn revoked_delegate_loses_all_reach() {
    let mut gate = gate_with_executor();
    gate.authorize(&key(OWNER), &key(ATTACKER), Operation::Authorize)
        .expect("grant authorize");
    gate.unauthorize(&key(OWNER), &key(ATTACKER), Operation::Authorize)
        .expect("revoke authorize");

    assert_anchor_error(
        gate.authorize(&key(ATTACKER), &key(ATTACKER), Operation::Execute),
        AuthorizationError::Unauthorized,
    );
    assert!(gate.permissions_of(&key(ATTACKER)).is_empty());
}

#[test]
fn owner_can_drop_itself_after_handing_over() {
    let mut gate = gate_with_executor();
    gate.authorize(&key(OWNER), &key(ATTACKER), Operation::Authorize)
        .expect("hand over authorize");
    gate.unauthorize(&key(OWNER), &key(OWNER), Operation::Authorize)
        .expect("owner drops authorize");

    assert_anchor_error(
        gate.authorize(&key(OWNER), &key(EXECUTOR), Operation::SetLimit),
        AuthorizationError::Unauthorized,
    );
    gate.authorize(&key(ATTACKER), &key(EXECUTOR), Operation::SetLimit)
        .expect("new holder grants");
}
