// Shared fixtures for the unit test trees.
//
// Everything here runs off-chain: custody is an in-memory ledger, the
// execution meter is scripted and quote signatures are produced and checked
// with ed25519-dalek instead of the precompile.

use crate::components::custody::{ConvertRequest, CustodyService, DefaultOracle};
use crate::components::price_resolver::{
    PriceOverride, PriceResolver, QuoteBundle, QuoteVerifier, Rate, RateSource,
};
use crate::components::relayer_meter::ExecutionMeter;
use crate::error::CustodyError;
use crate::state::action_state::{ActionKind, ActionParams, ActionState};
use crate::state::authorization::Operation;
use anchor_lang::error::Error;
use anchor_lang::prelude::*;
use bytemuck::Zeroable;
use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey};
use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt::Debug;

pub(crate) const OWNER: u8 = 1;
pub(crate) const EXECUTOR: u8 = 2;
pub(crate) const RELAYER: u8 = 3;
pub(crate) const FEE_COLLECTOR: u8 = 4;
pub(crate) const RECIPIENT: u8 = 5;
pub(crate) const ASSET_X: u8 = 10;
pub(crate) const ASSET_Y: u8 = 11;
pub(crate) const STABLE: u8 = 12;

pub(crate) const T0: i64 = 1_700_000_000;
pub(crate) const DAY: u64 = 86_400;

/// Deterministic, never-default key.
pub(crate) fn deterministic_pubkey(seed: u8) -> Pubkey {
    let mut bytes = [0u8; 32];
    for (idx, byte) in bytes.iter_mut().enumerate() {
        *byte = seed
            .wrapping_add((idx as u8).wrapping_mul(37))
            .wrapping_add(1);
    }
    Pubkey::new_from_array(bytes)
}

pub(crate) fn key(seed: u8) -> Pubkey {
    deterministic_pubkey(seed)
}

fn error_code_number(err: &Error) -> Option<u32> {
    match err {
        Error::AnchorError(anchor_err) => Some(anchor_err.error_code_number),
        Error::ProgramError(_) => None,
    }
}

/// Asserts `result` failed with exactly `expected`.
pub(crate) fn assert_anchor_error<T: Debug>(result: Result<T>, expected: impl Into<Error>) {
    let err = result.expect_err("expected error result");
    let expected: Error = expected.into();

    let actual_code = error_code_number(&err).expect("expected anchor error code");
    let expected_code = error_code_number(&expected).expect("expected anchor error code");
    assert_eq!(actual_code, expected_code, "unexpected error: {err:?}");
}

/// Whole-unit rate helper, `rate(5)` is 5.0.
pub(crate) fn rate(units: u64) -> Rate {
    Rate::from_integer(units)
}

/// Static price table implementing both oracle seams.
#[derive(Clone, Debug, Default)]
pub(crate) struct FixedRates {
    rates: BTreeMap<(Pubkey, Pubkey), Rate>,
}

impl FixedRates {
    pub(crate) fn with(mut self, base: Pubkey, quote: Pubkey, rate: Rate) -> Self {
        self.rates.insert((base, quote), rate);
        self
    }
}

impl RateSource for FixedRates {
    fn rate(&self, base: &Pubkey, quote: &Pubkey) -> Result<Rate> {
        if base == quote {
            return Ok(Rate::ONE);
        }
        self.rates
            .get(&(*base, *quote))
            .copied()
            .ok_or_else(|| error!(crate::error::OracleError::MissingPriceFeed))
    }
}

impl DefaultOracle for FixedRates {
    fn default_price(&self, base: &Pubkey, quote: &Pubkey) -> Result<Option<Rate>> {
        Ok(self.rates.get(&(*base, *quote)).copied())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CustodyCall {
    Convert(ConvertRequest),
    TransferOut {
        asset: Pubkey,
        amount: u64,
        recipient: Pubkey,
    },
    CrossDomain {
        asset: Pubkey,
        amount_in: u64,
        min_amount_out: u64,
        domain_id: u64,
    },
}

/// In-memory custody: balances, a default price table, fill rates for
/// conversions and a journal of primitive calls.
#[derive(Clone, Debug, Default)]
pub(crate) struct MockCustody {
    pub balances: BTreeMap<Pubkey, u64>,
    pub prices: BTreeMap<(Pubkey, Pubkey), Rate>,
    /// Rate conversions actually fill at; falls back to `prices`.
    pub fills: BTreeMap<(Pubkey, Pubkey), Rate>,
    pub journal: Vec<CustodyCall>,
}

impl MockCustody {
    pub(crate) fn with_balance(mut self, asset: Pubkey, amount: u64) -> Self {
        self.balances.insert(asset, amount);
        self
    }

    pub(crate) fn with_price(mut self, base: Pubkey, quote: Pubkey, rate: Rate) -> Self {
        self.prices.insert((base, quote), rate);
        self
    }

    pub(crate) fn with_fill(mut self, base: Pubkey, quote: Pubkey, rate: Rate) -> Self {
        self.fills.insert((base, quote), rate);
        self
    }

    pub(crate) fn balance(&self, asset: &Pubkey) -> u64 {
        self.balances.get(asset).copied().unwrap_or_default()
    }

    fn debit(&mut self, asset: &Pubkey, amount: u64) -> Result<()> {
        let balance = self.balance(asset);
        require!(balance >= amount, CustodyError::InsufficientBalance);
        self.balances.insert(*asset, balance - amount);
        Ok(())
    }

    fn credit(&mut self, asset: &Pubkey, amount: u64) {
        *self.balances.entry(*asset).or_default() += amount;
    }

    pub(crate) fn transfers_to(&self, recipient: &Pubkey) -> Vec<(Pubkey, u64)> {
        self.journal
            .iter()
            .filter_map(|call| match call {
                CustodyCall::TransferOut {
                    asset,
                    amount,
                    recipient: to,
                } if to == recipient => Some((*asset, *amount)),
                _ => None,
            })
            .collect()
    }
}

impl DefaultOracle for MockCustody {
    fn default_price(&self, base: &Pubkey, quote: &Pubkey) -> Result<Option<Rate>> {
        Ok(self.prices.get(&(*base, *quote)).copied())
    }
}

impl CustodyService for MockCustody {
    fn convert(&mut self, request: &ConvertRequest) -> Result<u64> {
        let pair = (request.asset_in, request.asset_out);
        let fill = self
            .fills
            .get(&pair)
            .or_else(|| self.prices.get(&pair))
            .copied()
            .ok_or(CustodyError::AdapterFailure)?;
        let amount_out = fill.apply(request.amount_in)?;

        // The floor is left to the caller so its own post-check is observable.
        self.debit(&request.asset_in, request.amount_in)?;
        self.credit(&request.asset_out, amount_out);
        self.journal.push(CustodyCall::Convert(request.clone()));
        Ok(amount_out)
    }

    fn transfer_out(
        &mut self,
        asset: &Pubkey,
        amount: u64,
        recipient: &Pubkey,
        _aux_data: &[u8],
    ) -> Result<()> {
        self.debit(asset, amount)?;
        self.journal.push(CustodyCall::TransferOut {
            asset: *asset,
            amount,
            recipient: *recipient,
        });
        Ok(())
    }

    fn transfer_cross_domain(
        &mut self,
        asset: &Pubkey,
        amount_in: u64,
        min_amount_out: u64,
        domain_id: u64,
        _aux_data: &[u8],
    ) -> Result<()> {
        self.debit(asset, amount_in)?;
        self.journal.push(CustodyCall::CrossDomain {
            asset: *asset,
            amount_in,
            min_amount_out,
            domain_id,
        });
        Ok(())
    }

    fn balance_of(&self, asset: &Pubkey) -> Result<u64> {
        Ok(self.balance(asset))
    }
}

pub(crate) const COMPUTE_BUDGET: u64 = 1_400_000;

/// Reports `consumed` units between each pair of readings.
pub(crate) struct ScriptedMeter {
    pub unit_price: u64,
    pub consumed: u64,
    readings: Cell<u32>,
}

impl ScriptedMeter {
    pub(crate) fn new(unit_price: u64, consumed: u64) -> Self {
        Self {
            unit_price,
            consumed,
            readings: Cell::new(0),
        }
    }
}

impl ExecutionMeter for ScriptedMeter {
    fn unit_price(&self) -> Result<u64> {
        Ok(self.unit_price)
    }

    fn remaining_units(&self) -> u64 {
        let readings = self.readings.get();
        self.readings.set(readings + 1);
        if readings % 2 == 0 {
            COMPUTE_BUDGET
        } else {
            COMPUTE_BUDGET - self.consumed
        }
    }
}

/// Off-chain stand-in for the Ed25519 precompile.
pub(crate) struct DalekVerifier;

impl QuoteVerifier for DalekVerifier {
    fn verify(&self, signer: &Pubkey, message: &[u8; 32], signature: &[u8; 64]) -> bool {
        VerifyingKey::from_bytes(&signer.to_bytes())
            .map(|key| key.verify(message, &Signature::from_bytes(signature)).is_ok())
            .unwrap_or(false)
    }
}

pub(crate) fn signing_key(seed: u8) -> SigningKey {
    SigningKey::from_bytes(&[seed; 32])
}

pub(crate) fn signer_pubkey(key: &SigningKey) -> Pubkey {
    Pubkey::new_from_array(key.verifying_key().to_bytes())
}

pub(crate) fn signed_bundle(key: &SigningKey, overrides: Vec<PriceOverride>) -> QuoteBundle {
    let digest = QuoteBundle::digest(&overrides);
    QuoteBundle {
        overrides,
        signer: signer_pubkey(key),
        signature: key.sign(&digest).to_bytes(),
    }
}

pub(crate) fn encode_bundle(bundle: &QuoteBundle) -> Vec<u8> {
    let mut payload = Vec::new();
    bundle.serialize(&mut payload).expect("bundle encodes");
    payload
}

pub(crate) fn quote(base: Pubkey, quote: Pubkey, rate: Rate, deadline: i64) -> PriceOverride {
    PriceOverride {
        base,
        quote,
        rate: rate.raw(),
        deadline,
    }
}

/// Fresh action owned by `OWNER` with kind-appropriate parameters.
pub(crate) fn action_fixture(kind: ActionKind) -> ActionState {
    let mut state = ActionState::zeroed();
    state.owner = key(OWNER);
    state.custody = key(40);
    state.custody_program = key(41);
    state.kind = kind as u8;
    state
        .gate
        .bootstrap(&key(OWNER))
        .expect("owner bootstrap");
    state.params = ActionParams {
        max_slippage_bps: 100,
        destination_domain: match kind {
            ActionKind::Bridger => 42,
            _ => 0,
        },
        recipient: match kind {
            ActionKind::Withdrawer => key(RECIPIENT),
            _ => Pubkey::default(),
        },
        token_out: match kind {
            ActionKind::Swapper => key(STABLE),
            _ => Pubkey::default(),
        },
    };
    state
}

/// Grants `Execute` to `account` through the owner.
pub(crate) fn grant_execute(state: &mut ActionState, account: &Pubkey) {
    state
        .gate
        .authorize(&key(OWNER), account, Operation::Execute)
        .expect("owner can grant");
}

/// Host ledger emulation: an invocation runs against copies and commits only
/// when it returns `Ok`, as a transaction would.
#[derive(Clone)]
pub(crate) struct Ledger {
    pub state: ActionState,
    pub custody: MockCustody,
}

impl Ledger {
    pub(crate) fn new(state: ActionState, custody: MockCustody) -> Self {
        Self { state, custody }
    }

    pub(crate) fn invoke<T>(
        &mut self,
        call: impl FnOnce(&mut ActionState, &mut MockCustody) -> Result<T>,
    ) -> Result<T> {
        let mut state = self.state;
        let mut custody = self.custody.clone();
        let value = call(&mut state, &mut custody)?;
        self.state = state;
        self.custody = custody;
        Ok(value)
    }
}

/// Resolver without signed quotes.
pub(crate) fn oracle_resolver(now: i64) -> PriceResolver {
    PriceResolver::oracle_only(now)
}
