/*
CSV in and out.

Edges are read from a headed CSV with one `from,to,cost` edge per row. Ids are kept as they
appear (up to u64); making them dense is left to the caller. A path is written as
`step,node_id,cost_from_start`.
*/

use crate::dense_ids::{RawEdge, RawId};
use crate::dijkstra::{Cost, ShortestPath};
use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, Writer};
use std::io;
use std::path::Path;

pub fn read_edges_from_path(path: impl AsRef<Path>) -> Result<Vec<RawEdge>> {
    let path = path.as_ref();
    let rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    read_edges(rdr).with_context(|| format!("reading {}", path.display()))
}

pub fn read_edges_from_reader<R: io::Read>(reader: R) -> Result<Vec<RawEdge>> {
    let rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    read_edges(rdr)
}

fn read_edges<R: io::Read>(mut rdr: csv::Reader<R>) -> Result<Vec<RawEdge>> {
    let mut edges = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let row = i + 1;
        let record = result.with_context(|| format!("record {}", row))?;
        if record.len() < 3 {
            return Err(anyhow!(
                "record {}: expected from,to,cost but found {} fields",
                row,
                record.len()
            ));
        }
        let from: RawId = record[0]
            .parse()
            .with_context(|| format!("record {}: bad from id {:?}", row, &record[0]))?;
        let to: RawId = record[1]
            .parse()
            .with_context(|| format!("record {}: bad to id {:?}", row, &record[1]))?;
        let cost: Cost = record[2]
            .parse()
            .with_context(|| format!("record {}: bad cost {:?}", row, &record[2]))?;
        edges.push(RawEdge::new(from, to, cost));
    }
    Ok(edges)
}

/// Writes `found` with `nodes` as the id column; `nodes` is `found.path` in whatever id space the
/// caller reports in.
pub fn write_path_to_path(
    path: impl AsRef<Path>,
    nodes: &[RawId],
    found: &ShortestPath,
) -> Result<()> {
    let path = path.as_ref();
    let wtr = Writer::from_path(path).with_context(|| format!("creating CSV {}", path.display()))?;
    write_path(wtr, nodes, found)
}

pub fn write_path<W: io::Write>(
    mut wtr: Writer<W>,
    nodes: &[RawId],
    found: &ShortestPath,
) -> Result<()> {
    if nodes.len() != found.costs.len() {
        return Err(anyhow!(
            "{} node ids for a path of {} nodes",
            nodes.len(),
            found.costs.len()
        ));
    }
    wtr.write_record(["step", "node_id", "cost_from_start"])?;
    for (step, (node_id, cost)) in nodes.iter().zip(&found.costs).enumerate() {
        wtr.write_record(&[step.to_string(), node_id.to_string(), format!("{:.6}", cost)])?;
    }
    wtr.flush()?;
    Ok(())
}
