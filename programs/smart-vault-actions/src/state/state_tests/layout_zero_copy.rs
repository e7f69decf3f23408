//! Byte-level layout contract of the action account.
//!
//! `ActionState` is mapped straight onto account data. Any change to a size
//! or alignment below breaks existing accounts and needs a migration plan,
//! which is why the numbers are spelled out rather than derived.

use crate::state::action_state::{ActionParams, ActionState};
use crate::state::allow_list::AllowList;
use crate::state::authorization::{AuthorizationGate, PermissionEntry, Permissions};
use crate::state::gas_config::GasConfig;
use crate::state::limit_accrual::LimitState;
use crate::state::threshold::{CustomThreshold, Threshold, ThresholdGuard};
use crate::test_utils::{action_fixture, key, ASSET_Y, OWNER};
use crate::state::action_state::ActionKind;
use bytemuck::{bytes_of, Zeroable};
use std::mem::{align_of, offset_of, size_of};

#[test]
fn component_sizes_are_pinned() {
    assert_eq!(size_of::<Permissions>(), 8);
    assert_eq!(size_of::<PermissionEntry>(), 40);
    assert_eq!(size_of::<AuthorizationGate>(), 648);
    assert_eq!(size_of::<Threshold>(), 48);
    assert_eq!(size_of::<CustomThreshold>(), 80);
    assert_eq!(size_of::<ThresholdGuard>(), 696);
    assert_eq!(size_of::<LimitState>(), 64);
    assert_eq!(size_of::<AllowList>(), 264);
    assert_eq!(size_of::<GasConfig>(), 360);
    assert_eq!(size_of::<ActionParams>(), 80);
}

#[test]
fn action_state_layout_contract() {
    const EXPECTED_SIZE: usize = 2_376;
    assert_eq!(
        size_of::<ActionState>(),
        EXPECTED_SIZE,
        "ActionState size drifted; existing accounts would no longer load"
    );
    assert_eq!(align_of::<ActionState>(), 8);
    assert_eq!(ActionState::INIT_SPACE, EXPECTED_SIZE);

    assert_eq!(offset_of!(ActionState, params), 128);
    assert_eq!(offset_of!(ActionState, gate), 208);
    assert_eq!(offset_of!(ActionState, thresholds), 856);
    assert_eq!(offset_of!(ActionState, limit), 1_552);
    assert_eq!(offset_of!(ActionState, gas), 1_616);
    assert_eq!(offset_of!(ActionState, oracle_signers), 1_976);
    assert_eq!(offset_of!(ActionState, kind), 2_240);
    assert_eq!(offset_of!(ActionState, reserved), 2_248);
}

#[test]
fn zeroed_state_is_fully_inactive() {
    let state = ActionState::zeroed();

    assert!(bytes_of(&state).iter().all(|byte| *byte == 0));
    assert_eq!(state.gate.entry_count, 0);
    assert!(!state.thresholds.default_threshold.is_set());
    assert!(!state.limit.is_active());
    assert!(state.gas.relayers.members().is_empty());
    assert!(state.oracle_signers.members().is_empty());
}

#[test]
fn policy_updates_leave_reserved_words_untouched() {
    let mut state = action_fixture(ActionKind::Withdrawer);
    state
        .gate
        .authorize(&key(OWNER), &key(77), crate::state::authorization::Operation::Execute)
        .expect("grant");
    state
        .thresholds
        .set_default(Threshold {
            accounting_asset: key(ASSET_Y),
            minimum: 1,
            maximum: 0,
        })
        .expect("threshold");
    state.gas.set_permissive(true);

    assert!(state.reserved.iter().all(|word| *word == 0));
    assert!(state._padding.iter().all(|byte| *byte == 0));
    assert!(state.gate._padding.iter().all(|byte| *byte == 0));
}
