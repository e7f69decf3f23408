use anchor_lang::prelude::*;

/// Caller lacks the permission an entry point requires.
#[error_code]
pub enum AuthorizationError {
    #[msg("Caller is not authorized to perform this operation")]
    Unauthorized,
    #[msg("Permission table has no free slot for a new account")]
    AuthorizationTableFull,
    #[msg("Permissions cannot be granted to the default public key")]
    InvalidAccount,
}

/// Rejected configuration values and action bindings.
#[error_code(offset = 6100)]
pub enum ConfigurationError {
    #[msg("Threshold minimum exceeds its maximum")]
    InvalidThresholdBand,
    #[msg("Limit capacity and period must both be zero or both be non-zero")]
    InvalidLimitParameters,
    #[msg("Address must not be the default public key")]
    ZeroAddress,
    #[msg("Custom threshold table is full")]
    CustomThresholdTableFull,
    #[msg("Allow list is full")]
    AllowListFull,
    #[msg("Slippage must be expressed in basis points up to 10000")]
    InvalidSlippage,
    #[msg("Cost percentage limit must be expressed in basis points up to 10000")]
    InvalidCostPercentage,
    #[msg("Instruction does not match the action kind")]
    UnexpectedActionKind,
    #[msg("Withdrawal recipient is not configured")]
    MissingRecipient,
    #[msg("Output token is not configured")]
    MissingTokenOut,
    #[msg("Destination domain is not configured")]
    MissingDestinationDomain,
    #[msg("Fee collector is not configured")]
    MissingFeeCollector,
    #[msg("Custody account does not belong to this action")]
    CustodyMismatch,
    #[msg("Custody program is not executable")]
    InvalidCustodyProgram,
}

/// Price resolution failures.
#[error_code(offset = 6200)]
pub enum OracleError {
    #[msg("No price feed resolves the requested pair")]
    MissingPriceFeed,
    #[msg("Signed price quote is past its deadline")]
    OracleFeedOutdated,
    #[msg("Signature verification context is invalid")]
    InvalidSignatureStructure,
    #[msg("Price rate must be greater than zero")]
    InvalidQuoteRate,
    #[msg("Fixed-point arithmetic overflow")]
    MathOverflow,
}

/// Threshold, limit and slippage guards.
#[error_code(offset = 6300)]
pub enum PolicyError {
    #[msg("Amount is below the configured threshold minimum")]
    ThresholdNotMet,
    #[msg("Amount is above the configured threshold maximum")]
    ThresholdExceeded,
    #[msg("Amount exceeds the remaining limit capacity for the current period")]
    SwapLimitExceeded,
    #[msg("Requested slippage is above the configured maximum")]
    SlippageAboveMax,
    #[msg("Custody returned less than the minimum amount out")]
    MinAmountOutNotMet,
    #[msg("Amount must be greater than zero")]
    InvalidAmount,
    #[msg("Output token must differ from the input token")]
    SameTokenConversion,
}

/// Relayer execution cost ceilings.
#[error_code(offset = 6400)]
pub enum CostError {
    #[msg("Compute unit price is above the configured limit")]
    GasPriceAboveLimit,
    #[msg("Transaction cost is above the configured limit")]
    CostAboveLimit,
    #[msg("Transaction cost is above the configured share of the amount")]
    CostPercentageAboveLimit,
}

/// Custody program failures surfaced to the action.
#[error_code(offset = 6500)]
pub enum CustodyError {
    #[msg("Custody balance is insufficient")]
    InsufficientBalance,
    #[msg("Custody adapter rejected the operation")]
    AdapterFailure,
    #[msg("Custody program returned no data")]
    MissingReturnData,
    #[msg("Return data was produced by an unexpected program")]
    UnexpectedReturnProgram,
}
