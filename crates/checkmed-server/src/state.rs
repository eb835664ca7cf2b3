//! Shared application state.

use checkmed_core::report::ReportSink;
use checkmed_core::{Comparator, Pipeline};
use checkmed_registry::{ImageDir, Store};
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub store: Arc<Store>,
    pub images: Arc<ImageDir>,
    pub reports: Arc<dyn ReportSink>,
}

impl AppState {
    /// Open the stores and wire the pipeline against them.
    pub fn build(
        db: &Path,
        images_dir: &Path,
        comparator: Arc<dyn Comparator>,
        reports: Arc<dyn ReportSink>,
    ) -> anyhow::Result<Self> {
        let store = Store::open(db)?;
        store.init_schema()?;
        let store = Arc::new(store);
        let images = Arc::new(ImageDir::new(images_dir));
        let pipeline = Arc::new(Pipeline::new(
            store.clone(),
            images.clone(),
            comparator,
        ));
        Ok(Self {
            pipeline,
            store,
            images,
            reports,
        })
    }
}
