use crate::annotations::set::{AnnotationId, AnnotationSet};
use crate::document::DocumentSnapshot;

/// An annotation reduced to absolute offsets in the separator-adjusted
/// plain text, ready for shift arithmetic. The payload stays behind in the
/// source set and is rejoined by id during re-anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatAnnotation {
    pub id: AnnotationId,
    pub start: usize,
    pub end: usize,
}

/// Convert every annotation in the set to absolute offsets against the
/// given snapshot.
///
/// An annotation whose anchor no longer resolves (block deleted out from
/// under it, or offset past the block end) is dropped with a diagnostic
/// rather than aborting the recomputation; the rest of the set is
/// unaffected.
pub fn flatten<P>(snapshot: &DocumentSnapshot, set: &AnnotationSet<P>) -> Vec<FlatAnnotation> {
    let mut flat = Vec::with_capacity(set.len());
    for annotation in set.iter() {
        let start = match snapshot.offset_at(&annotation.start) {
            Ok(offset) => offset,
            Err(err) => {
                log::warn!("dropping annotation {}: {err}", annotation.id);
                continue;
            }
        };
        let end = match snapshot.offset_at(&annotation.end) {
            Ok(offset) => offset,
            Err(err) => {
                log::warn!("dropping annotation {}: {err}", annotation.id);
                continue;
            }
        };
        flat.push(FlatAnnotation {
            id: annotation.id,
            start,
            end,
        });
    }
    flat
}
