use anchor_lang::prelude::*;

/// State constants
pub const MAX_AUTHORIZED_ACCOUNTS: usize = 16;
pub const MAX_CUSTOM_THRESHOLDS: usize = 8;
pub const MAX_ALLOW_LIST: usize = 8;

/// Fixed-point scale for rates: 1.0 == 1e18.
pub const RATE_SCALE: u128 = 1_000_000_000_000_000_000;
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Lamports are the native metering unit; the all-zero key stands for them.
pub const NATIVE_ASSET: Pubkey = Pubkey::new_from_array([0u8; 32]);

/// Relayer metering
pub const MICRO_LAMPORTS_PER_LAMPORT: u64 = 1_000_000;
pub const BASE_TX_COST: u64 = 5_000; // one signature
pub const METERING_OVERHEAD_UNITS: u64 = 12_000; // reimbursement CPI not captured by the meter

/// Quote bundles
pub const MAX_QUOTE_BUNDLE_LEN: usize = 1_024;
pub const MAX_QUOTE_OVERRIDES: usize = 12;
pub const QUOTE_DIGEST_DOMAIN: &[u8] = b"smart-vault-actions:quote-bundle:v1";

/// Native program ids consulted through the instructions sysvar
pub const ED25519_PROGRAM_ID: Pubkey =
    anchor_lang::solana_program::pubkey!("Ed25519SigVerify111111111111111111111111111");
pub const COMPUTE_BUDGET_PROGRAM_ID: Pubkey =
    anchor_lang::solana_program::pubkey!("ComputeBudget111111111111111111111111111111");

/// PDA seed constants
pub const ACTION_STATE_SEED: &[u8] = b"action_state";
pub const ACTION_AUTHORITY_SEED: &[u8] = b"action_authority";
