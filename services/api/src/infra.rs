use metrics_exporter_prometheus::PrometheusHandle;
use receipt_rewards::config::ReceiptsConfig;
use receipt_rewards::receipts::{InMemoryReceiptStore, ReceiptService};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Receipt service backed by the process-local store.
pub(crate) fn in_memory_receipt_service(
    config: &ReceiptsConfig,
) -> Arc<ReceiptService<InMemoryReceiptStore>> {
    let store = Arc::new(InMemoryReceiptStore::default());
    Arc::new(ReceiptService::new(
        store,
        config.validation(),
        config.scoring(),
    ))
}
