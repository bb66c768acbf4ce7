//! Minimal OSM XML output.
//!
//! Produces files JOSM and osmium can open: one `<node>` per stair tagged
//! `highway=steps` plus its `step_count`, and ski jumps tagged
//! `man_made=ski_jump`. All element ids are negative (new, unuploaded objects)
//! and unique within a file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::{GpsPoint, SkiJump, StairPoint};

const GENERATOR: &str = "stair-cluster";

/// Hands out -1, -2, -3, ...
#[derive(Debug, Default)]
struct IdAllocator {
    last: i64,
}

impl IdAllocator {
    fn next_id(&mut self) -> i64 {
        self.last -= 1;
        self.last
    }
}

fn write_header<W: Write>(writer: &mut W) -> io::Result<()> {
    writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(writer, r#"<osm version="0.6" generator="{}">"#, GENERATOR)
}

fn write_footer<W: Write>(writer: &mut W) -> io::Result<()> {
    writeln!(writer, "</osm>")
}

fn write_node<W: Write>(
    writer: &mut W,
    id: i64,
    location: &GpsPoint,
    tags: &[(&str, &str)],
) -> io::Result<()> {
    if tags.is_empty() {
        return writeln!(
            writer,
            r#"  <node id="{}" lat="{}" lon="{}"/>"#,
            id, location.latitude, location.longitude
        );
    }

    writeln!(
        writer,
        r#"  <node id="{}" lat="{}" lon="{}">"#,
        id, location.latitude, location.longitude
    )?;
    for (key, value) in tags {
        write_tag(writer, key, value)?;
    }
    writeln!(writer, "  </node>")
}

fn write_tag<W: Write>(writer: &mut W, key: &str, value: &str) -> io::Result<()> {
    writeln!(writer, r#"    <tag k="{}" v="{}"/>"#, key, value)
}

/// Write stairs as tagged nodes.
pub fn write_stairs<W: Write>(writer: &mut W, stairs: &[StairPoint]) -> io::Result<()> {
    let mut ids = IdAllocator::default();

    write_header(writer)?;
    for stair in stairs {
        let step_count = stair.step_count.to_string();
        write_node(
            writer,
            ids.next_id(),
            &stair.location,
            &[("highway", "steps"), ("step_count", step_count.as_str())],
        )?;
    }
    write_footer(writer)
}

/// Write ski jumps. Point jumps become tagged nodes; line jumps become
/// untagged vertex nodes plus a tagged way, written after all nodes.
pub fn write_ski_jumps<W: Write>(writer: &mut W, ski_jumps: &[SkiJump]) -> io::Result<()> {
    let mut ids = IdAllocator::default();
    let mut ways: Vec<Vec<i64>> = Vec::new();

    write_header(writer)?;
    for jump in ski_jumps {
        match jump {
            SkiJump::Point(location) => {
                write_node(writer, ids.next_id(), location, &[("man_made", "ski_jump")])?;
            }
            SkiJump::Line(vertices) => {
                let mut refs = Vec::with_capacity(vertices.len());
                for vertex in vertices {
                    let id = ids.next_id();
                    write_node(writer, id, vertex, &[])?;
                    refs.push(id);
                }
                ways.push(refs);
            }
        }
    }

    for refs in ways {
        writeln!(writer, r#"  <way id="{}">"#, ids.next_id())?;
        for node_ref in refs {
            writeln!(writer, r#"    <nd ref="{}"/>"#, node_ref)?;
        }
        write_tag(writer, "man_made", "ski_jump")?;
        writeln!(writer, "  </way>")?;
    }
    write_footer(writer)
}

/// Write stairs to a new file at `path`.
pub fn write_stairs_to_file(path: &Path, stairs: &[StairPoint]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_stairs(&mut writer, stairs)?;
    writer.flush()?;
    Ok(())
}

/// Write ski jumps to a new file at `path`.
pub fn write_ski_jumps_to_file(path: &Path, ski_jumps: &[SkiJump]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_ski_jumps(&mut writer, ski_jumps)?;
    writer.flush()?;
    Ok(())
}
