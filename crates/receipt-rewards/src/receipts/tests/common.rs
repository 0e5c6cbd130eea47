use std::collections::BTreeMap;
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::receipts::domain::{ItemSubmission, ReceiptId, ReceiptSubmission, ScoredReceipt};
use crate::receipts::store::{InMemoryReceiptStore, ReceiptStore, StoreError};
use crate::receipts::{
    receipt_router, ReceiptBonusMode, ReceiptService, ScoringConfig, ValidationConfig,
};

pub(super) fn item(description: &str, price: &str) -> ItemSubmission {
    ItemSubmission {
        short_description: description.to_string(),
        price: price.to_string(),
    }
}

pub(super) fn target_submission() -> ReceiptSubmission {
    ReceiptSubmission {
        retailer: "Target".to_string(),
        purchase_date: "2022-01-01".to_string(),
        purchase_time: "13:01".to_string(),
        items: vec![
            item("Mountain Dew 12PK", "6.49"),
            item("Emils Cheese Pizza", "12.25"),
            item("Knorr Creamy Chicken", "1.26"),
            item("Doritos Nacho Cheese", "3.35"),
            item("   Klarbrunn 12-PK 12 FL OZ  ", "12.00"),
        ],
        total: "35.35".to_string(),
    }
}

pub(super) fn corner_market_submission() -> ReceiptSubmission {
    ReceiptSubmission {
        retailer: "M&M Corner Market".to_string(),
        purchase_date: "2022-03-20".to_string(),
        purchase_time: "14:33".to_string(),
        items: vec![
            item("Gatorade", "2.25"),
            item("Gatorade", "2.25"),
            item("Gatorade", "2.25"),
            item("Gatorade", "2.25"),
        ],
        total: "9.00".to_string(),
    }
}

pub(super) fn build_service() -> (ReceiptService<InMemoryReceiptStore>, InMemoryReceiptStore) {
    build_service_with_mode(ReceiptBonusMode::PerReceipt)
}

pub(super) fn build_service_with_mode(
    mode: ReceiptBonusMode,
) -> (ReceiptService<InMemoryReceiptStore>, InMemoryReceiptStore) {
    let store = InMemoryReceiptStore::default();
    let service = ReceiptService::new(
        Arc::new(store.clone()),
        ValidationConfig::default(),
        ScoringConfig { bonus_mode: mode },
    );
    (service, store)
}

pub(super) fn router_with_service(
    service: ReceiptService<InMemoryReceiptStore>,
) -> axum::Router {
    receipt_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}

/// Store whose backend is always down.
pub(super) struct UnavailableStore;

impl ReceiptStore for UnavailableStore {
    fn insert(&self, _receipt: ScoredReceipt) -> Result<ReceiptId, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn fetch(&self, _id: &ReceiptId) -> Result<Option<ScoredReceipt>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn snapshot(&self) -> Result<BTreeMap<ReceiptId, ScoredReceipt>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
}
