//! asgraph-features entrypoint: extract structural features from a time-ordered
//! series of topology snapshots. Arguments are edge-list files or directories
//! of them; records are appended to `<output.dir>/graph_features.ndjson` and
//! node tables written under `<output.dir>/nodes/`.

use asgraph_features::{
    config::{EngineConfig, OutputConfig},
    features::{FeatureExtractor, SnapshotFeatures},
    graph::{discover_snapshot_files, load_edge_list, parse_snapshot_timestamp, Snapshot},
    logging::StructuredLogger,
};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{info, warn};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn snapshot_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn write_outputs(
    features: &SnapshotFeatures,
    output: &OutputConfig,
    records: &mut impl Write,
) -> Result<(), BoxError> {
    StructuredLogger::emit_json(&features.graph, records)?;
    records.flush()?;
    if output.node_tables {
        let path = output.dir.join("nodes").join(format!("{}.json", features.nodes.snapshot));
        let mut w = BufWriter::new(File::create(&path)?);
        serde_json::to_writer(&mut w, &features.nodes)?;
        w.flush()?;
    }
    Ok(())
}

fn run_one_snapshot(
    path: &Path,
    config: &EngineConfig,
    extractor: &FeatureExtractor,
    records: &mut impl Write,
) -> Result<(), BoxError> {
    let started = Instant::now();
    let full = load_edge_list(path, &config.input)?;
    let snapshot =
        Snapshot::from_full_graph(snapshot_label(path), parse_snapshot_timestamp(path), full);
    info!(
        snapshot = %snapshot.label,
        full_nodes = snapshot.full_nodes,
        lcc_nodes = snapshot.graph.node_count(),
        load_ms = started.elapsed().as_millis() as u64,
        "snapshot loaded"
    );
    let features = extractor.extract(&snapshot)?;
    write_outputs(&features, &config.output, records)
}

fn main() -> Result<(), BoxError> {
    let config_path = std::env::var("ASGRAPH_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"));
    let config = EngineConfig::load(&config_path);

    StructuredLogger::init(config.log.json, &config.log.level);

    let inputs: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if inputs.is_empty() {
        return Err("usage: asgraph-features <snapshot-file-or-dir>...".into());
    }
    let files = discover_snapshot_files(&inputs, &config.input);
    info!(files = files.len(), output = ?config.output.dir, "asgraph-features starting");

    std::fs::create_dir_all(&config.output.dir)?;
    if config.output.node_tables {
        std::fs::create_dir_all(config.output.dir.join("nodes"))?;
    }
    let mut records = BufWriter::new(
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.output.dir.join("graph_features.ndjson"))?,
    );

    let extractor = FeatureExtractor::new(config.extraction.clone());

    static STOP: AtomicBool = AtomicBool::new(false);
    let _ = ctrlc::set_handler(|| {
        STOP.store(true, Ordering::Relaxed);
    });

    let mut done = 0usize;
    for path in &files {
        if STOP.load(Ordering::Relaxed) {
            info!(remaining = files.len() - done, "interrupted, stopping");
            break;
        }
        if let Err(e) = run_one_snapshot(path, &config, &extractor, &mut records) {
            warn!(path = %path.display(), error = %e, "snapshot failed");
        }
        done += 1;
    }
    info!(processed = done, "asgraph-features finished");
    Ok(())
}
