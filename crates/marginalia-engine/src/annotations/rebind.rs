use crate::annotations::flatten::FlatAnnotation;
use crate::annotations::set::{Annotation, AnnotationId, AnnotationSet};
use crate::document::DocumentSnapshot;

/// Map surviving flat annotations back onto the new snapshot's block
/// structure, rejoining each with its payload from the pre-edit set.
///
/// Offsets are resolved with [`DocumentSnapshot::position_at`], so a
/// boundary sitting exactly on a block split lands at the start of the
/// following block. Insertion order of the source set is preserved by the
/// flat list, which keeps active-annotation tie-breaking stable.
pub fn rebind<P: Clone>(
    snapshot: &DocumentSnapshot,
    flat: &[FlatAnnotation],
    source: &AnnotationSet<P>,
) -> AnnotationSet<P> {
    let mut rebound = AnnotationSet::new();
    for annotation in flat {
        let (Some(start), Some(end)) = (
            snapshot.position_at(annotation.start),
            snapshot.position_at(annotation.end),
        ) else {
            // Only reachable when the new snapshot has no blocks at all.
            log::warn!(
                "dropping annotation {}: no block to re-anchor to",
                annotation.id
            );
            continue;
        };
        let Some(original) = source.get(annotation.id) else {
            log::warn!(
                "dropping annotation {}: absent from the source set",
                annotation.id
            );
            continue;
        };
        rebound.insert(Annotation {
            id: annotation.id,
            start,
            end,
            payload: original.payload.clone(),
        });
    }
    rebound
}

/// Find the annotation a collapsed cursor sits inside, if any. Both range
/// endpoints count as inside. First match in set order wins when ranges
/// overlap.
pub fn find_active(flat: &[FlatAnnotation], cursor: usize) -> Option<AnnotationId> {
    flat.iter()
        .find(|a| a.start <= cursor && cursor <= a.end)
        .map(|a| a.id)
}
