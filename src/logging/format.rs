//! Log subscriber setup and ndjson record lines (one JSON object per line).

use serde::Serialize;
use std::io::Write;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub struct StructuredLogger;

impl StructuredLogger {
    /// Install the global subscriber writing to stdout; `RUST_LOG` overrides `default_level`.
    /// A second call is a no-op.
    pub fn init(json: bool, default_level: &str) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));
        let installed = if json {
            let fmt = tracing_subscriber::fmt::layer()
                .json()
                .with_span_events(FmtSpan::NONE)
                .with_writer(std::io::stdout);
            tracing_subscriber::registry().with(filter).with(fmt).try_init()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
                .try_init()
        };
        if installed.is_err() {
            tracing::debug!("log subscriber already installed");
        }
    }

    /// Write `record` as a single ndjson line.
    pub fn emit_json(record: &impl Serialize, w: &mut impl Write) -> std::io::Result<()> {
        let line = serde_json::to_string(record)?;
        writeln!(w, "{}", line)
    }
}
