//! Order command: print the frame hierarchy, optionally exporting a
//! spreadsheet for annotation.

use crate::cli::OrderArgs;
use crate::error::Result;
use crate::io::read_jsonl;
use crate::report::{
    render_hierarchy, write_annotation_csv, write_relation_csv, AnnotationRow, RelationRow,
};
use framescope_domain::{Frame, FrameId, RelationEdge};
use framescope_graph::{order_hierarchy, propagated_counts, HierarchyEntry};
use std::collections::BTreeMap;
use tracing::info;

// Reduced frames are sparse; they are keyed by the ids recorded in the file,
// not by position, so historical edge endpoints still resolve.
fn load_frames(args: &OrderArgs) -> Result<BTreeMap<FrameId, Frame>> {
    let frames: Vec<Frame> = read_jsonl(&args.frames)?;
    Ok(frames.into_iter().map(|f| (f.id, f)).collect())
}

fn annotation_rows(
    frames: &BTreeMap<FrameId, Frame>,
    totals: &BTreeMap<FrameId, u64>,
    entries: &[HierarchyEntry],
) -> Vec<AnnotationRow> {
    entries
        .iter()
        .map(|entry| {
            let frame = &frames[&entry.id];
            AnnotationRow {
                f_id: format!("F{}", entry.id),
                count: frame.count,
                propagated: totals[&entry.id],
                text: frame.text.clone(),
                reasoning: frame.reasoning.clone(),
            }
        })
        .collect()
}

// Surviving relations sorted by endpoints, edges naming unknown frames
// skipped (they reference ids merged away in earlier stages).
fn relation_rows(
    frames: &BTreeMap<FrameId, Frame>,
    relations: &[RelationEdge],
) -> Vec<RelationRow> {
    let mut edges: Vec<&RelationEdge> = relations
        .iter()
        .filter(|e| frames.contains_key(&e.x) && frames.contains_key(&e.y))
        .collect();
    edges.sort_by_key(|e| (e.x, e.y));

    edges
        .into_iter()
        .map(|edge| RelationRow {
            r_id: format!("{}-{}-{}", edge.relation.as_str(), edge.x, edge.y),
            fx_text: frames[&edge.x].text.clone(),
            relation: edge.relation.as_str().to_string(),
            fy_text: frames[&edge.y].text.clone(),
        })
        .collect()
}

/// Run the order stage: weight-first traversal and presentation.
pub fn execute_order(args: OrderArgs) -> Result<()> {
    let frames = load_frames(&args)?;
    let relations: Vec<RelationEdge> = read_jsonl(&args.relations)?;

    let totals = propagated_counts(&frames, &relations)?;
    let entries = order_hierarchy(&frames, &relations, args.max_depth)?;
    print!("{}", render_hierarchy(&frames, &totals, &entries));

    if let Some(path) = &args.csv {
        let rows = annotation_rows(&frames, &totals, &entries);
        write_annotation_csv(&rows, path)?;
        info!("frame annotation sheet written to {}", path.display());
    }
    if let Some(path) = &args.relations_csv {
        let rows = relation_rows(&frames, &relations);
        write_relation_csv(&rows, path)?;
        info!("relation annotation sheet written to {}", path.display());
    }
    Ok(())
}
