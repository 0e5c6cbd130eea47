//! Receipt intake: validation, reward-points scoring, and storage of scored receipts.
//!
//! Submissions flow through [`Validator`] first; only accepted receipts reach the
//! [`ScoringEngine`], and only scored receipts are handed to a [`ReceiptStore`].

pub mod domain;
pub mod money;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{Item, ItemSubmission, Receipt, ReceiptId, ReceiptSubmission, ScoredReceipt};
pub use money::{Amount, AmountError};
pub use router::receipt_router;
pub use scoring::{
    ReceiptBonusMode, ScoreCard, ScoreComponent, ScoringConfig, ScoringEngine, ScoringRule,
};
pub use service::{ProcessedReceipt, ReceiptService, ReceiptServiceError};
pub use store::{InMemoryReceiptStore, ReceiptStore, StoreError};
pub use validation::{
    DateValidation, ValidationConfig, ValidationErrors, ValidationFailure, ValidationFailureView,
    Validator,
};
