//! Edge-list snapshot files: `asn_a asn_b [count]` per line.
//! Separators may be whitespace, `|` or `,`; `#` starts a comment.

use super::{Asn, TopologyGraph};
use crate::config::InputConfig;
use crate::error::GraphError;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn parse_line(line: &str) -> Result<Option<(Asn, Asn, u32)>, String> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }
    let fields: Vec<&str> = line
        .split(|c: char| c.is_whitespace() || c == '|' || c == ',')
        .filter(|f| !f.is_empty())
        .collect();
    if fields.len() < 2 || fields.len() > 3 {
        return Err(format!("expected 2 or 3 fields, found {}", fields.len()));
    }
    let parse_asn = |s: &str| s.parse::<Asn>().map_err(|e| format!("bad ASN {s:?}: {e}"));
    let a = parse_asn(fields[0])?;
    let b = parse_asn(fields[1])?;
    let w = match fields.get(2) {
        Some(s) => s.parse::<u32>().map_err(|e| format!("bad count {s:?}: {e}"))?,
        None => 1,
    };
    Ok(Some((a, b, w)))
}

/// Read one snapshot file into a (possibly disconnected) topology graph.
pub fn load_edge_list(path: &Path, config: &InputConfig) -> Result<TopologyGraph, GraphError> {
    let data = std::fs::read_to_string(path).map_err(|source| GraphError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut edges = Vec::new();
    let mut dropped = 0usize;
    for (i, line) in data.lines().enumerate() {
        match parse_line(line) {
            Ok(Some((a, b, w))) if a >= config.min_asn && b >= config.min_asn => {
                edges.push((a, b, w))
            }
            Ok(Some(_)) => dropped += 1,
            Ok(None) => {}
            Err(message) => {
                return Err(GraphError::Parse {
                    path: path.to_path_buf(),
                    line: i + 1,
                    message,
                })
            }
        }
    }
    if dropped > 0 {
        tracing::debug!(path = %path.display(), dropped, "dropped edges below min_asn");
    }
    Ok(TopologyGraph::from_weighted_edges(edges))
}

/// Timestamp from a RIS-style `YYYYMMDD.HHMM` name component, if any.
pub fn parse_snapshot_timestamp(path: &Path) -> Option<DateTime<Utc>> {
    let name = path.file_name()?.to_str()?;
    let parts: Vec<&str> = name.split('.').collect();
    parts.windows(2).find_map(|w| {
        if w[0].len() != 8 || w[1].len() != 4 {
            return None;
        }
        NaiveDateTime::parse_from_str(&format!("{}.{}", w[0], w[1]), "%Y%m%d.%H%M")
            .ok()
            .map(|dt| Utc.from_utc_datetime(&dt))
    })
}

/// Expand files and directories into a sorted list of snapshot files.
pub fn discover_snapshot_files(inputs: &[PathBuf], config: &InputConfig) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
            continue;
        }
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().flatten() {
            let p = entry.path();
            let wanted = p
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| config.extensions.iter().any(|x| x == e))
                .unwrap_or(false);
            if entry.file_type().is_file() && wanted {
                files.push(p.to_path_buf());
            }
        }
    }
    files
}
