//! Reduce command: paraphrase collapse and specialization folding.

use crate::cli::ReduceArgs;
use crate::error::Result;
use crate::io::{read_jsonl, write_jsonl};
use framescope_domain::{Frame, RelationEdge};
use framescope_extractor::text::clean_reasoning;
use framescope_graph::{collapse_paraphrases, fold_specializations};
use tracing::info;

/// Run the reduce stage end to end.
///
/// Reads the unique frames and the relate stage's edge list, applies both
/// reduction passes, and writes the surviving frames (ids preserved, counts
/// re-homed) and rewired relations.
pub fn execute_reduce(args: ReduceArgs) -> Result<()> {
    let mut frames: Vec<Frame> = read_jsonl(&args.frames)?;
    for (position, frame) in frames.iter_mut().enumerate() {
        frame.id = position;
    }
    let relations: Vec<RelationEdge> = read_jsonl(&args.relations)?;
    info!(
        "{} frames, {} relations before reduction",
        frames.len(),
        relations.len()
    );

    let collapse = collapse_paraphrases(&frames, &relations)?;
    info!(
        "{} frames, {} relations after paraphrase collapse",
        collapse.frames.len(),
        collapse.relations.len()
    );

    let fold = fold_specializations(&collapse)?;
    info!(
        "{} frames, {} relations after specialization folding ({} folded, {} count mass discarded)",
        fold.frames.len(),
        fold.relations.len(),
        fold.merged.len(),
        fold.discarded
    );

    let reduced: Vec<Frame> = fold
        .frames
        .values()
        .map(|frame| {
            let mut frame = frame.clone();
            frame.reasoning = clean_reasoning(&frame.reasoning);
            frame
        })
        .collect();

    let predictions = args.output_dir.join("predictions");
    write_jsonl(&reduced, &predictions.join("frames-reduced.jsonl"))?;
    write_jsonl(&fold.relations, &predictions.join("relations-reduced.jsonl"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use framescope_domain::RelationType;

    #[test]
    fn test_reduce_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let frames_path = dir.path().join("frames.jsonl");
        let relations_path = dir.path().join("relations.jsonl");
        let output_dir = dir.path().join("out");

        let mut frames = vec![
            Frame::new(0, "Vaccines cause harm", "a safety worry, as harm is claimed"),
            Frame::new(1, "Vaccines are harmful", ""),
            Frame::new(2, "Unrelated singleton", ""),
        ];
        frames[0].count = 2;
        frames[1].count = 3;
        write_jsonl(&frames, &frames_path).unwrap();

        let relations = vec![RelationEdge::new(RelationType::Paraphrases, 1, 0, "same claim")];
        write_jsonl(&relations, &relations_path).unwrap();

        execute_reduce(ReduceArgs {
            frames: frames_path,
            relations: relations_path,
            output_dir: output_dir.clone(),
        })
        .unwrap();

        let reduced: Vec<Frame> =
            read_jsonl(&output_dir.join("predictions/frames-reduced.jsonl")).unwrap();
        // The paraphrase pair collapses into one representative with the
        // summed count; the singleton falls below the support threshold with
        // no parent to fold into and is dropped.
        assert_eq!(reduced.len(), 1);
        assert_eq!(reduced[0].id, 0);
        assert_eq!(reduced[0].count, 5);
        assert_eq!(reduced[0].reasoning, "Harm is claimed");

        let edges: Vec<RelationEdge> =
            read_jsonl(&output_dir.join("predictions/relations-reduced.jsonl")).unwrap();
        assert!(edges.is_empty());
    }

    #[test]
    fn test_reduce_keeps_specialization_structure() {
        let dir = tempfile::tempdir().unwrap();
        let frames_path = dir.path().join("frames.jsonl");
        let relations_path = dir.path().join("relations.jsonl");
        let output_dir = dir.path().join("out");

        let mut frames = vec![
            Frame::new(0, "General claim", ""),
            Frame::new(1, "Specific version of the claim", ""),
        ];
        frames[0].count = 4;
        frames[1].count = 3;
        write_jsonl(&frames, &frames_path).unwrap();

        let relations = vec![RelationEdge::new(
            RelationType::Specializes,
            1,
            0,
            "narrows the general claim",
        )];
        write_jsonl(&relations, &relations_path).unwrap();

        execute_reduce(ReduceArgs {
            frames: frames_path,
            relations: relations_path,
            output_dir: output_dir.clone(),
        })
        .unwrap();

        let reduced: Vec<Frame> =
            read_jsonl(&output_dir.join("predictions/frames-reduced.jsonl")).unwrap();
        assert_eq!(reduced.len(), 2);

        let edges: Vec<RelationEdge> =
            read_jsonl(&output_dir.join("predictions/relations-reduced.jsonl")).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].relation, RelationType::Specializes);
    }
}
