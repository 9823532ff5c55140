//! Graph reduction: paraphrase collapse and specialization folding

use crate::error::GraphError;
use framescope_domain::{Frame, FrameId, RelationEdge, RelationType};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use tracing::info;

/// Frames with a final count below this are folded into their parents
pub const MIN_COUNT: u64 = 2;

/// Result of pass 1: paraphrase components collapsed to representatives
///
/// Representatives carry the summed counts of their whole component. Dropped
/// members' ids remain valid inside historical edge endpoints; the relation
/// list here has already been rewired through the representatives.
#[derive(Debug, Clone, PartialEq)]
pub struct ParaphraseCollapse {
    /// Surviving representative frames, counts absorbed from their component
    pub frames: BTreeMap<FrameId, Frame>,

    /// Non-paraphrase relations with endpoints remapped to representatives
    pub relations: Vec<RelationEdge>,

    /// Ids of the surviving representatives
    pub kept: BTreeSet<FrameId>,
}

/// Result of pass 2: low-support specializations folded into parents
#[derive(Debug, Clone, PartialEq)]
pub struct SpecializationFold {
    /// Surviving frames with final counts
    pub frames: BTreeMap<FrameId, Frame>,

    /// Surviving relations, including synthesized rewired edges
    pub relations: Vec<RelationEdge>,

    /// Ids folded away during this pass
    pub merged: BTreeSet<FrameId>,

    /// Count mass of deleted frames that had no parent to fold into
    pub discarded: u64,
}

/// Pass 1: collapse every connected paraphrase component to a single
/// representative.
///
/// The representative is the member with maximum degree in the paraphrase
/// graph, ties broken by smallest FrameId. It absorbs all members' counts;
/// every non-paraphrase edge is rewired through the component map. Frame ids
/// are positions in `frames`.
pub fn collapse_paraphrases(
    frames: &[Frame],
    relations: &[RelationEdge],
) -> Result<ParaphraseCollapse, GraphError> {
    let n = frames.len();
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];

    for edge in relations {
        if edge.x >= n {
            return Err(GraphError::UnknownFrame(edge.x));
        }
        if edge.y >= n {
            return Err(GraphError::UnknownFrame(edge.y));
        }
        if edge.relation == RelationType::Paraphrases && edge.x != edge.y {
            if !adjacency[edge.x].contains(&edge.y) {
                adjacency[edge.x].push(edge.y);
                adjacency[edge.y].push(edge.x);
            }
        }
    }

    let mut node_map: Vec<FrameId> = vec![0; n];
    let mut kept: BTreeSet<FrameId> = BTreeSet::new();
    let mut counts: BTreeMap<FrameId, u64> = BTreeMap::new();
    let mut visited = vec![false; n];

    for start in 0..n {
        if visited[start] {
            continue;
        }
        let mut component = Vec::new();
        let mut queue = VecDeque::from([start]);
        visited[start] = true;
        while let Some(node) = queue.pop_front() {
            component.push(node);
            for &next in &adjacency[node] {
                if !visited[next] {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }
        component.sort_unstable();

        // Max degree wins, smallest id on ties.
        let mut representative = component[0];
        let mut max_degree = adjacency[representative].len();
        for &node in &component[1..] {
            if adjacency[node].len() > max_degree {
                max_degree = adjacency[node].len();
                representative = node;
            }
        }

        kept.insert(representative);
        for &node in &component {
            node_map[node] = representative;
            *counts.entry(representative).or_insert(0) += frames[node].count;
        }
    }

    let reduced_relations = relations
        .iter()
        .filter(|edge| edge.relation != RelationType::Paraphrases)
        .map(|edge| RelationEdge {
            relation: edge.relation.clone(),
            x: node_map[edge.x],
            y: node_map[edge.y],
            reasoning: edge.reasoning.clone(),
        })
        .collect();

    let reduced_frames = kept
        .iter()
        .map(|&id| {
            let mut frame = frames[id].clone();
            frame.count = counts[&id];
            (id, frame)
        })
        .collect();

    info!("paraphrase collapse: {} -> {} frames", n, kept.len());

    Ok(ParaphraseCollapse {
        frames: reduced_frames,
        relations: reduced_relations,
        kept,
    })
}

/// Pass 2: fold every frame whose count is below `MIN_COUNT` into its
/// specialization parents.
///
/// For each deleted node, contradiction neighbors are rewired to every
/// parent (carrying the original contradiction's reasoning), the node's
/// count is added to every parent (once per outgoing edge - a node with
/// multiple parents multiplies its count into each), and incoming
/// specializations are re-homed onto the parents. A deleted node with no
/// parent contributes its count to the reported discarded mass instead.
/// Threshold checks use the counts as they stood entering this pass.
pub fn fold_specializations(
    collapse: &ParaphraseCollapse,
) -> Result<SpecializationFold, GraphError> {
    let kept = &collapse.kept;

    let mut out_edges: BTreeMap<FrameId, Vec<FrameId>> = BTreeMap::new();
    let mut in_edges: BTreeMap<FrameId, Vec<FrameId>> = BTreeMap::new();
    let mut contradiction_neighbors: BTreeMap<FrameId, Vec<FrameId>> = BTreeMap::new();
    let mut specialize_reasoning: HashMap<(FrameId, FrameId), String> = HashMap::new();
    let mut contradict_reasoning: HashMap<(FrameId, FrameId), String> = HashMap::new();

    for edge in &collapse.relations {
        if !kept.contains(&edge.x) || !kept.contains(&edge.y) {
            continue;
        }
        match edge.relation {
            RelationType::Specializes => {
                let outs = out_edges.entry(edge.x).or_default();
                if !outs.contains(&edge.y) {
                    outs.push(edge.y);
                    in_edges.entry(edge.y).or_default().push(edge.x);
                }
                specialize_reasoning.insert((edge.x, edge.y), edge.reasoning.clone());
            }
            RelationType::Contradicts => {
                let xs = contradiction_neighbors.entry(edge.x).or_default();
                if !xs.contains(&edge.y) && edge.x != edge.y {
                    xs.push(edge.y);
                    contradiction_neighbors.entry(edge.y).or_default().push(edge.x);
                }
                contradict_reasoning.insert((edge.x, edge.y), edge.reasoning.clone());
            }
            _ => {}
        }
    }

    let mut merged_count: BTreeMap<FrameId, u64> = collapse
        .frames
        .iter()
        .map(|(&id, frame)| (id, frame.count))
        .collect();
    let mut merged_relations = collapse.relations.clone();
    let mut merged: BTreeSet<FrameId> = BTreeSet::new();
    let mut discarded = 0u64;

    for &node in kept {
        // Pre-pass count: mass absorbed from earlier folds does not save a
        // node from deletion.
        let count = collapse.frames[&node].count;
        if count >= MIN_COUNT {
            continue;
        }
        merged.insert(node);

        let outs = out_edges.get(&node).cloned().unwrap_or_default();
        if outs.is_empty() {
            discarded += count;
        }
        for &parent in &outs {
            for &neighbor in contradiction_neighbors
                .get(&node)
                .map(Vec::as_slice)
                .unwrap_or_default()
            {
                let reasoning = contradict_reasoning
                    .get(&(node, neighbor))
                    .or_else(|| contradict_reasoning.get(&(neighbor, node)))
                    .ok_or(GraphError::MissingReasoning {
                        x: node,
                        y: neighbor,
                    })?;
                merged_relations.push(RelationEdge::new(
                    RelationType::Contradicts,
                    neighbor,
                    parent,
                    reasoning.clone(),
                ));
            }

            *merged_count.entry(parent).or_insert(0) += count;

            for &child in in_edges.get(&node).map(Vec::as_slice).unwrap_or_default() {
                let reasoning = specialize_reasoning.get(&(node, parent)).ok_or(
                    GraphError::MissingReasoning {
                        x: node,
                        y: parent,
                    },
                )?;
                merged_relations.push(RelationEdge::new(
                    RelationType::Specializes,
                    child,
                    parent,
                    reasoning.clone(),
                ));
            }
        }
    }

    let relations: Vec<RelationEdge> = merged_relations
        .into_iter()
        .filter(|edge| !merged.contains(&edge.x) && !merged.contains(&edge.y))
        .collect();

    let frames: BTreeMap<FrameId, Frame> = collapse
        .frames
        .iter()
        .filter(|(id, _)| !merged.contains(id))
        .map(|(&id, frame)| {
            let mut frame = frame.clone();
            frame.count = merged_count[&id];
            (id, frame)
        })
        .collect();

    info!(
        "specialization folding: {} merged, {} discarded mass",
        merged.len(),
        discarded
    );

    Ok(SpecializationFold {
        frames,
        relations,
        merged,
        discarded,
    })
}
