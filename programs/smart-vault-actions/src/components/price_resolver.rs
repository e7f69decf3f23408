//! Exchange-rate resolution with signed, deadline-bounded overrides.
//!
//! # Resolution Order
//!
//! Every lookup walks a fixed list of strategies, each answering
//! `Result<Option<Rate>>`:
//!
//! 1. **Identity**: a pair of equal assets resolves to [`Rate::ONE`].
//! 2. **Signed quotes**: entries of a quote bundle whose signature verified
//!    and whose signer is allow-listed. Inverse pairs are inverted. A matching
//!    entry past its deadline is a hard `OracleFeedOutdated` failure.
//! 3. **Default oracle**: the custody service's own price feed.
//!
//! `None` moves to the next strategy; an error stops the walk. When every
//! strategy declines the lookup fails with `MissingPriceFeed`.
//!
//! # Trust Model
//!
//! A bundle that does not parse, is not signed by an allow-listed key, or
//! carries an invalid signature is dropped before any lookup and the
//! resolver behaves exactly as if no bundle were supplied.
use crate::components::custody::DefaultOracle;
use crate::error::OracleError;
use crate::state::allow_list::AllowList;
use crate::utils::constants::{
    ED25519_PROGRAM_ID, MAX_QUOTE_BUNDLE_LEN, MAX_QUOTE_OVERRIDES, QUOTE_DIGEST_DOMAIN, RATE_SCALE,
};
use anchor_lang::prelude::*;
use anchor_lang::solana_program::keccak;
use anchor_lang::solana_program::sysvar::instructions::load_instruction_at_checked;
use ethnum::U256;

/// Fixed-point exchange rate: units of quote asset per unit of base asset,
/// scaled by [`RATE_SCALE`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rate(u128);

impl Rate {
    pub const ONE: Self = Self(RATE_SCALE);

    #[inline(always)]
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// Whole-unit rate, e.g. `from_integer(5)` is 5.0.
    #[inline(always)]
    pub const fn from_integer(units: u64) -> Self {
        Self(units as u128 * RATE_SCALE)
    }

    #[inline(always)]
    pub const fn raw(self) -> u128 {
        self.0
    }

    #[inline(always)]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Converts `amount` of the base asset into quote units, rounding down.
    pub fn apply(self, amount: u64) -> Result<u64> {
        let scaled = U256::from(amount) * U256::from(self.0) / U256::from(RATE_SCALE);
        require!(scaled <= U256::from(u64::MAX), OracleError::MathOverflow);
        Ok(scaled.as_u128() as u64)
    }

    /// Rate of the swapped pair (`1 / self`).
    pub fn inverse(self) -> Result<Self> {
        require!(self.0 != 0, OracleError::InvalidQuoteRate);

        let inverse = U256::from(RATE_SCALE) * U256::from(RATE_SCALE) / U256::from(self.0);
        require!(inverse <= U256::from(u128::MAX), OracleError::MathOverflow);

        let raw = inverse.as_u128();
        require!(raw != 0, OracleError::MathOverflow);
        Ok(Self(raw))
    }
}

/// Anything able to price one asset in terms of another.
pub trait RateSource {
    /// Units of `quote` per unit of `base`.
    fn rate(&self, base: &Pubkey, quote: &Pubkey) -> Result<Rate>;

    /// Values `amount` of `from` in units of `to`. Equal assets skip the
    /// lookup.
    fn convert(&self, amount: u64, from: &Pubkey, to: &Pubkey) -> Result<u64> {
        if from == to {
            return Ok(amount);
        }
        self.rate(from, to)?.apply(amount)
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceOverride {
    pub base: Pubkey,
    pub quote: Pubkey,
    pub rate: u128,
    pub deadline: i64,
}

impl PriceOverride {
    const ENCODED_LEN: usize = 32 + 32 + 16 + 8;

    /// Borsh layout of the entry, appended to `out`.
    fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.base.as_ref());
        out.extend_from_slice(self.quote.as_ref());
        out.extend_from_slice(&self.rate.to_le_bytes());
        out.extend_from_slice(&self.deadline.to_le_bytes());
    }
}

/// Off-chain price overrides signed by an oracle signer.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct QuoteBundle {
    pub overrides: Vec<PriceOverride>,
    pub signer: Pubkey,
    pub signature: [u8; 64],
}

impl QuoteBundle {
    /// Message the signer commits to: the domain tag followed by every entry
    /// in order.
    pub fn digest(overrides: &[PriceOverride]) -> [u8; 32] {
        let mut message =
            Vec::with_capacity(QUOTE_DIGEST_DOMAIN.len() + overrides.len() * PriceOverride::ENCODED_LEN);
        message.extend_from_slice(QUOTE_DIGEST_DOMAIN);
        for entry in overrides {
            entry.encode_into(&mut message);
        }
        keccak::hashv(&[&message]).0
    }

    /// Decodes a payload. Returns `None` for anything that is not a
    /// well-formed bundle (bad encoding, trailing bytes, empty or oversized
    /// list, zero rate).
    pub fn parse(payload: &[u8]) -> Option<Self> {
        if payload.is_empty() || payload.len() > MAX_QUOTE_BUNDLE_LEN {
            return None;
        }

        let bundle = Self::try_from_slice(payload).ok()?;
        let well_formed = !bundle.overrides.is_empty()
            && bundle.overrides.len() <= MAX_QUOTE_OVERRIDES
            && bundle.overrides.iter().all(|entry| entry.rate != 0);

        well_formed.then_some(bundle)
    }
}

/// Signature check for quote bundles.
pub trait QuoteVerifier {
    fn verify(&self, signer: &Pubkey, message: &[u8; 32], signature: &[u8; 64]) -> bool;
}

/// Accepts a signature when the transaction carries an Ed25519 precompile
/// instruction covering exactly `(signer, message, signature)`.
///
/// The runtime rejects the whole transaction when a precompile signature is
/// invalid, so finding the instruction is proof of verification.
pub struct Ed25519InstructionVerifier<'a, 'info> {
    instructions: &'a AccountInfo<'info>,
}

impl<'a, 'info> Ed25519InstructionVerifier<'a, 'info> {
    pub fn new(instructions: &'a AccountInfo<'info>) -> Self {
        Self { instructions }
    }
}

impl QuoteVerifier for Ed25519InstructionVerifier<'_, '_> {
    fn verify(&self, signer: &Pubkey, message: &[u8; 32], signature: &[u8; 64]) -> bool {
        let mut index = 0usize;
        while let Ok(instruction) = load_instruction_at_checked(index, self.instructions) {
            if instruction.program_id == ED25519_PROGRAM_ID
                && ed25519_instruction_covers(&instruction.data, signer, message, signature)
            {
                return true;
            }
            index += 1;
        }
        false
    }
}

const ED25519_HEADER_LEN: usize = 2;
const ED25519_OFFSETS_LEN: usize = 14;
const CURRENT_INSTRUCTION: u16 = u16::MAX;

/// Walks the precompile's signature offset table. Only entries whose data
/// lives inside the precompile instruction itself are considered.
pub(crate) fn ed25519_instruction_covers(
    data: &[u8],
    signer: &Pubkey,
    message: &[u8; 32],
    signature: &[u8; 64],
) -> bool {
    let Some(&count) = data.first() else {
        return false;
    };

    (0..count as usize).any(|slot| {
        let start = ED25519_HEADER_LEN + slot * ED25519_OFFSETS_LEN;
        let Some(offsets) = data.get(start..start + ED25519_OFFSETS_LEN) else {
            return false;
        };
        let field = |at: usize| u16::from_le_bytes([offsets[at], offsets[at + 1]]);

        let (signature_offset, signature_ix) = (field(0), field(2));
        let (pubkey_offset, pubkey_ix) = (field(4), field(6));
        let (message_offset, message_len, message_ix) = (field(8), field(10), field(12));

        if [signature_ix, pubkey_ix, message_ix]
            .iter()
            .any(|ix| *ix != CURRENT_INSTRUCTION)
        {
            return false;
        }

        message_len as usize == message.len()
            && slice_at(data, pubkey_offset, 32) == Some(&signer.to_bytes()[..])
            && slice_at(data, signature_offset, 64) == Some(signature.as_slice())
            && slice_at(data, message_offset, 32) == Some(message.as_slice())
    })
}

#[inline]
fn slice_at(data: &[u8], offset: u16, len: usize) -> Option<&[u8]> {
    let start = offset as usize;
    data.get(start..start.checked_add(len)?)
}

/// One step of the resolution chain.
pub trait PriceSource {
    fn lookup(
        &self,
        oracle: &dyn DefaultOracle,
        base: &Pubkey,
        quote: &Pubkey,
        now: i64,
    ) -> Result<Option<Rate>>;
}

pub struct IdentityPrice;

impl PriceSource for IdentityPrice {
    fn lookup(&self, _: &dyn DefaultOracle, base: &Pubkey, quote: &Pubkey, _: i64) -> Result<Option<Rate>> {
        Ok((base == quote).then_some(Rate::ONE))
    }
}

/// Overrides from a verified, allow-listed bundle. Empty when no bundle was
/// trusted.
#[derive(Clone, Debug, Default)]
pub struct SignedQuotes {
    overrides: Vec<PriceOverride>,
}

impl SignedQuotes {
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    pub fn overrides(&self) -> &[PriceOverride] {
        &self.overrides
    }
}

impl PriceSource for SignedQuotes {
    fn lookup(&self, _: &dyn DefaultOracle, base: &Pubkey, quote: &Pubkey, now: i64) -> Result<Option<Rate>> {
        let matching = self.overrides.iter().find_map(|entry| {
            if entry.base == *base && entry.quote == *quote {
                Some((entry, false))
            } else if entry.base == *quote && entry.quote == *base {
                Some((entry, true))
            } else {
                None
            }
        });

        let Some((entry, inverted)) = matching else {
            return Ok(None);
        };

        require!(entry.deadline >= now, OracleError::OracleFeedOutdated);

        let rate = Rate::from_raw(entry.rate);
        if inverted {
            rate.inverse().map(Some)
        } else {
            Ok(Some(rate))
        }
    }
}

pub struct DefaultOraclePrice;

impl PriceSource for DefaultOraclePrice {
    fn lookup(&self, oracle: &dyn DefaultOracle, base: &Pubkey, quote: &Pubkey, _: i64) -> Result<Option<Rate>> {
        Ok(oracle
            .default_price(base, quote)?
            .filter(|rate| !rate.is_zero()))
    }
}

/// Per-invocation resolver. The quote bundle is parsed and verified once at
/// construction.
#[derive(Clone, Debug)]
pub struct PriceResolver {
    signed: SignedQuotes,
    now: i64,
}

impl PriceResolver {
    pub fn new(
        payload: Option<&[u8]>,
        signers: &AllowList,
        verifier: &dyn QuoteVerifier,
        now: i64,
    ) -> Self {
        let overrides = payload
            .and_then(|payload| trusted_overrides(payload, signers, verifier))
            .unwrap_or_default();

        Self {
            signed: SignedQuotes { overrides },
            now,
        }
    }

    /// Resolver that only consults the default oracle.
    pub fn oracle_only(now: i64) -> Self {
        Self {
            signed: SignedQuotes::default(),
            now,
        }
    }

    pub fn signed_quotes(&self) -> &SignedQuotes {
        &self.signed
    }

    pub fn resolve(&self, oracle: &dyn DefaultOracle, base: &Pubkey, quote: &Pubkey) -> Result<Rate> {
        let chain: [&dyn PriceSource; 3] = [&IdentityPrice, &self.signed, &DefaultOraclePrice];

        for source in chain {
            if let Some(rate) = source.lookup(oracle, base, quote, self.now)? {
                return Ok(rate);
            }
        }

        Err(OracleError::MissingPriceFeed.into())
    }

    /// Pairs the resolver with the oracle it falls back to.
    pub fn bind<'a>(&'a self, oracle: &'a dyn DefaultOracle) -> BoundResolver<'a> {
        BoundResolver {
            resolver: self,
            oracle,
        }
    }
}

fn trusted_overrides(
    payload: &[u8],
    signers: &AllowList,
    verifier: &dyn QuoteVerifier,
) -> Option<Vec<PriceOverride>> {
    let Some(bundle) = QuoteBundle::parse(payload) else {
        msg!("Quote bundle rejected: malformed payload");
        return None;
    };

    if !signers.contains(&bundle.signer) {
        msg!("Quote bundle rejected: signer {} is not allow-listed", bundle.signer);
        return None;
    }

    let digest = QuoteBundle::digest(&bundle.overrides);
    if !verifier.verify(&bundle.signer, &digest, &bundle.signature) {
        msg!("Quote bundle rejected: signature not verified");
        return None;
    }

    Some(bundle.overrides)
}

pub struct BoundResolver<'a> {
    resolver: &'a PriceResolver,
    oracle: &'a dyn DefaultOracle,
}

impl RateSource for BoundResolver<'_> {
    fn rate(&self, base: &Pubkey, quote: &Pubkey) -> Result<Rate> {
        self.resolver.resolve(self.oracle, base, quote)
    }
}
