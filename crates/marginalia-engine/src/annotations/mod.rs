/*!
 * # Annotation offset tracking
 *
 * Keeps character-range annotations (comments, highlights) anchored to the
 * right text while the document underneath them is edited.
 *
 * The engine is a pure transformer: it holds no state of its own and runs
 * synchronously on every accepted edit. One recomputation flows through
 * four stages:
 *
 * 1. **Flatten** (`flatten`): block-anchored positions become absolute
 *    offsets into the old snapshot's separator-adjusted plain text.
 * 2. **Diff** (`diff`): the old and new plain texts are diffed into
 *    retain/insert/delete ops with separator-corrected visible lengths.
 * 3. **Shift** (`shift`): each annotation's offsets are walked through the
 *    op list; deleted-over annotations are dropped, straddled ones are
 *    truncated, the rest are shifted.
 * 4. **Rebind** (`rebind`): surviving offsets are mapped back onto the new
 *    snapshot's block structure and rejoined with their payloads.
 *
 * Recomputation only runs for content-mutating edits ([`EditKind`]); style
 * toggles and caret movement return the set unchanged without diffing.
 *
 * The caller owns both snapshots and the annotation set; a fresh set is
 * always returned rather than mutating the input, which keeps the engine
 * trivially compatible with undo layering (the recomputation is a derived
 * transform, never a user-visible action of its own).
 */

pub mod diff;
pub mod flatten;
pub mod rebind;
pub mod set;
pub mod shift;

pub use diff::{DiffOp, EditKind, diff_ops};
pub use flatten::{FlatAnnotation, flatten};
pub use rebind::{find_active, rebind};
pub use set::{Annotation, AnnotationId, AnnotationSet};
pub use shift::shift_annotations;

use crate::document::{DocumentSnapshot, Position};

/// Result of one annotation recomputation.
#[derive(Debug, Clone, PartialEq)]
pub struct Recomputed<P> {
    /// The annotation set re-anchored to the new snapshot.
    pub annotations: AnnotationSet<P>,
    /// The annotation a collapsed cursor currently sits inside, if any.
    pub active: Option<AnnotationId>,
}

/// Recompute an annotation set after a document edit.
///
/// `old` is the snapshot the set's anchors are valid against, `new` is the
/// post-edit snapshot, `edit` classifies the edit for gating, and `cursor`
/// is the current collapsed selection position in the new snapshot (used
/// only for active-annotation detection).
///
/// Never panics: unresolvable anchors are dropped with a `log::warn!`
/// diagnostic and the rest of the set is processed normally.
pub fn recompute<P: Clone>(
    old: &DocumentSnapshot,
    new: &DocumentSnapshot,
    annotations: &AnnotationSet<P>,
    edit: EditKind,
    cursor: Option<Position>,
) -> Recomputed<P> {
    let cursor_offset = cursor.and_then(|position| new.offset_at(&position).ok());

    // Structural edits cannot move text, so the anchors stay valid as-is.
    if !edit.is_content_edit() {
        let flat = flatten(new, annotations);
        return Recomputed {
            annotations: annotations.clone(),
            active: cursor_offset.and_then(|offset| find_active(&flat, offset)),
        };
    }

    let old_text = old.plain_text();
    let new_text = new.plain_text();
    if old_text == new_text {
        // Content-classified edit that changed nothing (e.g. an empty
        // paste); skip the diff and return the set untouched.
        let flat = flatten(new, annotations);
        return Recomputed {
            annotations: annotations.clone(),
            active: cursor_offset.and_then(|offset| find_active(&flat, offset)),
        };
    }

    let flat = flatten(old, annotations);
    let ops = diff_ops(&old_text, &new_text);
    let shifted = shift_annotations(flat, &ops, new.visible_len());

    Recomputed {
        active: cursor_offset.and_then(|offset| find_active(&shifted, offset)),
        annotations: rebind(new, &shifted, annotations),
    }
}
