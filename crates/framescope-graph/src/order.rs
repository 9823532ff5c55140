//! Hierarchy ordering: weight-first traversal of the specialization forest

use crate::error::GraphError;
use framescope_domain::{Frame, FrameId, RelationEdge, RelationType};
use std::collections::{BTreeMap, HashSet};

/// One row of the presentation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyEntry {
    /// Frame at this row
    pub id: FrameId,

    /// Depth below its root (roots are depth 0)
    pub depth: usize,
}

// Children per parent in the specializes forest, restricted to known frames,
// parallel edges collapsed, insertion order preserved.
fn children_of(
    frames: &BTreeMap<FrameId, Frame>,
    relations: &[RelationEdge],
) -> BTreeMap<FrameId, Vec<FrameId>> {
    let mut children: BTreeMap<FrameId, Vec<FrameId>> = BTreeMap::new();
    for edge in relations {
        if edge.relation != RelationType::Specializes {
            continue;
        }
        if !frames.contains_key(&edge.x) || !frames.contains_key(&edge.y) {
            continue;
        }
        let list = children.entry(edge.y).or_default();
        if !list.contains(&edge.x) {
            list.push(edge.x);
        }
    }
    children
}

/// Compute each frame's propagated count: its own count plus the propagated
/// counts of everything that specializes it.
///
/// Implemented as an iterative post-order traversal with a visiting set, so
/// a cyclic specializes graph is reported as `CycleDetected` instead of
/// recursing forever.
pub fn propagated_counts(
    frames: &BTreeMap<FrameId, Frame>,
    relations: &[RelationEdge],
) -> Result<BTreeMap<FrameId, u64>, GraphError> {
    let children = children_of(frames, relations);
    let mut totals: BTreeMap<FrameId, u64> = BTreeMap::new();
    let mut visiting: HashSet<FrameId> = HashSet::new();

    enum Visit {
        Enter(FrameId),
        Exit(FrameId),
    }

    for &start in frames.keys() {
        if totals.contains_key(&start) {
            continue;
        }
        let mut stack = vec![Visit::Enter(start)];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(node) => {
                    if totals.contains_key(&node) {
                        continue;
                    }
                    if !visiting.insert(node) {
                        return Err(GraphError::CycleDetected(node));
                    }
                    stack.push(Visit::Exit(node));
                    for &child in children.get(&node).map(Vec::as_slice).unwrap_or_default() {
                        if totals.contains_key(&child) {
                            continue;
                        }
                        if visiting.contains(&child) {
                            return Err(GraphError::CycleDetected(child));
                        }
                        stack.push(Visit::Enter(child));
                    }
                }
                Visit::Exit(node) => {
                    let mut total = frames[&node].count;
                    for &child in children.get(&node).map(Vec::as_slice).unwrap_or_default() {
                        total += totals[&child];
                    }
                    visiting.remove(&node);
                    totals.insert(node, total);
                }
            }
        }
    }

    Ok(totals)
}

/// Produce the depth-first, most-weight-first presentation order of the
/// final frame graph.
///
/// Roots (frames with no outgoing specializes edge) come first, sorted by
/// descending propagated count with ascending id on ties; children of every
/// node are sorted the same way. `max_depth` truncates the traversal:
/// entries at depth >= max_depth are omitted. Pure presentation; the graph
/// is not mutated.
pub fn order_hierarchy(
    frames: &BTreeMap<FrameId, Frame>,
    relations: &[RelationEdge],
    max_depth: Option<usize>,
) -> Result<Vec<HierarchyEntry>, GraphError> {
    let totals = propagated_counts(frames, relations)?;
    let children = children_of(frames, relations);

    let mut has_parent: HashSet<FrameId> = HashSet::new();
    for edge in relations {
        if edge.relation == RelationType::Specializes
            && frames.contains_key(&edge.x)
            && frames.contains_key(&edge.y)
        {
            has_parent.insert(edge.x);
        }
    }

    let by_weight = |id: &FrameId| (std::cmp::Reverse(totals[id]), *id);

    let mut roots: Vec<FrameId> = frames
        .keys()
        .copied()
        .filter(|id| !has_parent.contains(id))
        .collect();
    roots.sort_by_key(by_weight);

    let mut ordered = Vec::new();
    // Depth-first with an explicit stack; children pushed in reverse so the
    // heaviest subtree is visited first.
    let mut stack: Vec<(FrameId, usize)> = roots.into_iter().rev().map(|id| (id, 0)).collect();
    while let Some((node, depth)) = stack.pop() {
        if let Some(limit) = max_depth {
            if depth >= limit {
                continue;
            }
        }
        ordered.push(HierarchyEntry { id: node, depth });

        let mut kids: Vec<FrameId> = children.get(&node).cloned().unwrap_or_default();
        kids.sort_by_key(by_weight);
        for child in kids.into_iter().rev() {
            stack.push((child, depth + 1));
        }
    }

    Ok(ordered)
}
