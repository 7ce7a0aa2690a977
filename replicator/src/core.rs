use std::path::PathBuf;

use anyhow::Context;
use config::shared::{ReplicatorConfig, SinkConnectionConfigWithoutSecrets};
use entity_sync::destination::Destination;
use entity_sync::destination::memory::MemoryDestination;
use entity_sync::entity::catalog;
use entity_sync::pipeline::SyncPipeline;
use entity_sync::types::RawEvent;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

/// Counters of a replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ReplayStats {
    lines: usize,
    batches: usize,
    rows: usize,
}

pub async fn start_replicator(
    replicator_config: ReplicatorConfig,
    events: Option<PathBuf>,
) -> anyhow::Result<()> {
    log_connections(&replicator_config);

    // We build every spec up front, so that a broken catalog fails before any event is read.
    let specs = catalog::build_all(&replicator_config.catalog)?;

    let destination = MemoryDestination::new();
    let pipeline = SyncPipeline::new(specs, destination.clone())?;

    info!(subscription = %pipeline.subscription(), "subscribed to topics");

    let max_size = replicator_config.batch.max_size;
    let result = match events {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("failed to open events file {}", path.display()))?;
            replay_events(&pipeline, BufReader::new(file), max_size).await
        }
        None => replay_events(&pipeline, BufReader::new(tokio::io::stdin()), max_size).await,
    };

    // The destination is shut down even when the replay failed.
    if let Err(err) = pipeline.shutdown().await {
        warn!("failed to shut down the pipeline: {err}");
    }

    let stats = match result {
        Ok(stats) => stats,
        Err(err) => {
            error!("event replay failed: {err:#}");
            return Err(err);
        }
    };

    info!(
        lines = stats.lines,
        batches = stats.batches,
        rows = stats.rows,
        "event replay finished"
    );

    let mut counts = destination.table_row_counts().await.into_iter().collect::<Vec<_>>();
    counts.sort();
    for (table, rows) in counts {
        info!(table = %table, rows, "table row count");
    }

    Ok(())
}

fn log_connections(replicator_config: &ReplicatorConfig) {
    let source = &replicator_config.source;
    info!(
        bootstrap_servers = %source.bootstrap_servers_list(),
        checkpoint_location = %source.checkpoint_location,
        app_name = %source.app_name,
        "source configured"
    );

    let property_names = replicator_config
        .sink
        .properties()
        .into_iter()
        .map(|(name, _)| name)
        .collect::<Vec<_>>()
        .join(",");
    let sink = SinkConnectionConfigWithoutSecrets::from(replicator_config.sink.clone());
    info!(
        url = %sink.url,
        username = %sink.username,
        use_ssl = sink.use_ssl,
        properties = %property_names,
        "sink configured"
    );
}

/// Reads JSON-lines events from `reader` and feeds them to `pipeline` in batches of at most
/// `max_size` events.
///
/// Blank lines are skipped. The pending batch is flushed at the end of the input or on Ctrl+C.
async fn replay_events<D, R>(
    pipeline: &SyncPipeline<D>,
    reader: R,
    max_size: usize,
) -> anyhow::Result<ReplayStats>
where
    D: Destination + Send + Sync,
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut batch = Vec::with_capacity(max_size);
    let mut stats = ReplayStats::default();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            result = &mut shutdown => {
                result.context("failed to listen for Ctrl+C")?;
                info!("Ctrl+C received, stopping event replay");
                break;
            }
            line = lines.next_line() => line.context("failed to read events")?,
        };

        let Some(line) = line else {
            break;
        };
        stats.lines += 1;

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event: RawEvent = serde_json::from_str(line)
            .with_context(|| format!("invalid event on line {}", stats.lines))?;
        batch.push(event);

        if batch.len() >= max_size {
            stats.rows += pipeline.process_events(std::mem::take(&mut batch)).await?;
            stats.batches += 1;
        }
    }

    if !batch.is_empty() {
        stats.rows += pipeline.process_events(batch).await?;
        stats.batches += 1;
    }

    Ok(stats)
}
