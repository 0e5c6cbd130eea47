use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{Receipt, ReceiptId, ReceiptSubmission, ScoredReceipt};
use super::scoring::{ScoreCard, ScoringConfig, ScoringEngine};
use super::store::{ReceiptStore, StoreError};
use super::validation::{ValidationConfig, ValidationErrors, Validator};

/// Service composing the validator, scoring engine, and store.
pub struct ReceiptService<S> {
    store: Arc<S>,
    validator: Validator,
    engine: ScoringEngine,
}

/// Result of a successful submission.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedReceipt {
    pub id: ReceiptId,
    pub receipt: ScoredReceipt,
}

impl<S> ReceiptService<S>
where
    S: ReceiptStore + 'static,
{
    pub fn new(store: Arc<S>, validation: ValidationConfig, scoring: ScoringConfig) -> Self {
        Self {
            store,
            validator: Validator::new(validation),
            engine: ScoringEngine::new(scoring),
        }
    }

    /// Validate and score a submission without storing it.
    pub fn evaluate(
        &self,
        submission: ReceiptSubmission,
    ) -> Result<(Receipt, ScoreCard), ValidationErrors> {
        let receipt = self.validator.validate(submission)?;
        let card = self.engine.breakdown(&receipt);
        Ok((receipt, card))
    }

    /// Validate, score, and store a submission. Rejected receipts are never stored.
    pub fn process(
        &self,
        submission: ReceiptSubmission,
    ) -> Result<ProcessedReceipt, ReceiptServiceError> {
        let (receipt, card) = self.evaluate(submission).map_err(|errors| {
            warn!(failures = errors.failures().len(), %errors, "receipt rejected");
            errors
        })?;

        debug!(retailer = receipt.retailer(), components = ?card.components, "receipt scored");

        let scored = ScoredReceipt::new(receipt, card.total);
        let id = self.store.insert(scored.clone())?;

        info!(receipt_id = %id, points = card.total, "receipt processed");
        Ok(ProcessedReceipt {
            id,
            receipt: scored,
        })
    }

    pub fn points(&self, id: &ReceiptId) -> Result<u64, ReceiptServiceError> {
        let receipt = self.store.fetch(id)?.ok_or(StoreError::NotFound)?;
        Ok(receipt.points())
    }

    pub fn snapshot(&self) -> Result<BTreeMap<ReceiptId, ScoredReceipt>, ReceiptServiceError> {
        Ok(self.store.snapshot()?)
    }
}

/// Error raised by the receipt service.
#[derive(Debug, thiserror::Error)]
pub enum ReceiptServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Store(#[from] StoreError),
}
