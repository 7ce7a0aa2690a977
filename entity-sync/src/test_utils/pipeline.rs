use config::shared::CatalogConfig;

use crate::destination::memory::MemoryDestination;
use crate::entity::catalog;
use crate::pipeline::SyncPipeline;

/// Creates a pipeline over the default catalog, writing to a fresh [`MemoryDestination`].
///
/// The returned destination shares its storage with the one owned by the pipeline.
pub fn create_memory_pipeline() -> (SyncPipeline<MemoryDestination>, MemoryDestination) {
    create_memory_pipeline_with(&CatalogConfig::default())
}

/// Creates a pipeline over the catalog described by `config`.
///
/// # Panics
///
/// Panics if the catalog or the pipeline cannot be built.
pub fn create_memory_pipeline_with(
    config: &CatalogConfig,
) -> (SyncPipeline<MemoryDestination>, MemoryDestination) {
    let destination = MemoryDestination::new();
    let specs = catalog::build_all(config).expect("catalog should build");
    let pipeline =
        SyncPipeline::new(specs, destination.clone()).expect("pipeline should be created");

    (pipeline, destination)
}
