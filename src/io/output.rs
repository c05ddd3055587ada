//! Output records for the web visualizer.
//!
//! The visualizer consumes a JSON array of top-level cluster records.
//! Hub members expand recursively into nested cluster records; definition
//! members flatten to their symbol, feature vector, and connection
//! count. Radii are pre-multiplied by a fixed display scale so small
//! numeric spreads remain visible on screen.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::core::{ClusterId, ClusterKind, Member, Result, FEATURE_DIMENSIONS};
use crate::engine::ClusterEngine;

/// Radius multiplier applied to every emitted cluster record
pub const RADIUS_DISPLAY_SCALE: f64 = 1000.0;

#[derive(Debug, Serialize)]
pub struct ClusterRecord {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub radius: f64,
    pub vector: [f64; FEATURE_DIMENSIONS],
    pub definitions: Vec<MemberRecord>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MemberRecord {
    Cluster(ClusterRecord),
    Definition(DefinitionRecord),
}

#[derive(Debug, Serialize)]
pub struct DefinitionRecord {
    pub symbol: String,
    pub vector: [f64; FEATURE_DIMENSIONS],
    pub connections: usize,
}

/// Build the visualizer record for one cluster
pub fn cluster_record(engine: &ClusterEngine, id: ClusterId) -> Option<ClusterRecord> {
    let cluster = engine.cluster_node(id)?;
    let definitions = cluster
        .members
        .iter()
        .filter_map(|member| member_record(engine, *member))
        .collect();

    Some(ClusterRecord {
        kind: cluster.kind.as_str(),
        symbol: cluster.symbol.clone(),
        radius: cluster.radius * RADIUS_DISPLAY_SCALE,
        vector: engine.cluster_vector(id),
        definitions,
    })
}

fn member_record(engine: &ClusterEngine, member: Member) -> Option<MemberRecord> {
    match member {
        Member::Cluster(id) => cluster_record(engine, id).map(MemberRecord::Cluster),
        Member::Definition(id) => {
            let def = engine.definition_by_id(id)?;
            Some(MemberRecord::Definition(DefinitionRecord {
                symbol: def.symbol.clone(),
                vector: def.feature_vector(),
                connections: def.connections.len(),
            }))
        }
    }
}

/// Collect the top-level records: dissonance hubs only (the visualizer's
/// default view) or the full cluster list
pub fn visualization_records(engine: &ClusterEngine, hubs_only: bool) -> Vec<ClusterRecord> {
    engine
        .clusters()
        .filter(|(_, c)| !hubs_only || c.kind == ClusterKind::DissonanceHub)
        .filter_map(|(id, _)| cluster_record(engine, id))
        .collect()
}

/// Serialize the records to any sink
pub fn write_records<W: Write>(writer: W, records: &[ClusterRecord]) -> Result<()> {
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}

/// Serialize the records to a file path
pub fn write_records_to_path(path: &Path, records: &[ClusterRecord]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_records(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
