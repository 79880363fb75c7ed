use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use mentor_kpi::config::StoreConfig;
use mentor_kpi::error::AppError;
use mentor_kpi::workflows::kpi::{Center, KpiService, KpiType, MemoryStore, StoreSnapshot};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory store, preloaded from the configured snapshot when one is set.
pub(crate) fn bootstrap_store(config: &StoreConfig) -> Result<MemoryStore, AppError> {
    match config.snapshot_path.as_deref() {
        Some(path) => load_snapshot_store(path),
        None => Ok(MemoryStore::default()),
    }
}

pub(crate) fn load_snapshot_store(path: &Path) -> Result<MemoryStore, AppError> {
    let snapshot = StoreSnapshot::from_path(path)?;
    info!(
        path = %path.display(),
        mentors = snapshot.mentors.len(),
        submissions = snapshot.kpi_submissions.len(),
        "snapshot loaded"
    );
    Ok(MemoryStore::from_snapshot(snapshot))
}

pub(crate) fn snapshot_service(path: &Path) -> Result<KpiService<MemoryStore>, AppError> {
    let store = load_snapshot_store(path)?;
    Ok(KpiService::new(Arc::new(store)))
}

pub(crate) fn parse_kpi_type(raw: &str) -> Result<KpiType, String> {
    raw.parse()
}

pub(crate) fn parse_center(raw: &str) -> Result<Center, String> {
    raw.parse()
}
