//! # Campaign Errors

use am_01_transaction_bundle::BundleError;
use shared_types::{KVStoreError, Satoshis};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Key-value store error: {0}")]
    Store(#[from] KVStoreError),

    #[error("Corrupt record at {key}: {message}")]
    Corrupt { key: String, message: String },
}

/// Errors from the external wallet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error("Wallet unreachable: {0}")]
    Transport(String),

    #[error("Wallet rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid wallet response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("Missing {0} in request body")]
    MissingField(&'static str),

    #[error("Questions and answers length mismatch. Questions: {questions}, Answers: {answers}")]
    LengthMismatch { questions: usize, answers: usize },

    #[error("Campaign end date must be after its start date")]
    InvalidSchedule,

    #[error("You have already submitted answers for this ad")]
    AlreadySubmitted,

    #[error("Campaign funding not found")]
    FundingNotFound(String),

    #[error("Incorrect number of answers: expected {expected}, got {actual}")]
    AnswerCountMismatch { expected: usize, actual: usize },

    #[error("Insufficient campaign balance: reward {reward}, balance {balance}")]
    InsufficientBalance { reward: Satoshis, balance: Satoshis },

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid server private key")]
    InvalidServerKey,

    #[error("Wallet returned no transaction")]
    MissingTransaction,

    #[error("Invalid payment bundle: {0}")]
    InvalidPaymentBundle(#[from] BundleError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl CampaignError {
    /// Caller mistakes, as opposed to server-side failures.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField(_)
                | Self::LengthMismatch { .. }
                | Self::InvalidSchedule
                | Self::AlreadySubmitted
                | Self::FundingNotFound(_)
                | Self::AnswerCountMismatch { .. }
                | Self::InsufficientBalance { .. }
                | Self::InvalidPublicKey(_)
        )
    }
}
