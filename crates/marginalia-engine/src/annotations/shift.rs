use crate::annotations::diff::DiffOp;
use crate::annotations::flatten::FlatAnnotation;

/// Recompute flattened annotation offsets against the post-edit text by
/// walking the diff ops left to right.
///
/// The pivot cursor tracks how much post-edit text the processed ops have
/// produced: `Retain` and `Insert` advance it by their visible length,
/// `Delete` does not. Each `Insert`/`Delete` applies one shift pass over
/// every annotation, so boundaries left of the pivot are already in
/// post-edit coordinates when later ops compare against it.
///
/// Boundary policy (uniform for both annotation endpoints):
/// - an insertion at an annotation's start pushes the whole annotation
///   right rather than extending it leftward;
/// - an insertion exactly at an annotation's end does not extend it.
///
/// Every returned annotation satisfies `start <= end <= new_visible_len`.
pub fn shift_annotations(
    mut flat: Vec<FlatAnnotation>,
    ops: &[DiffOp],
    new_visible_len: usize,
) -> Vec<FlatAnnotation> {
    let mut pivot = 0;

    for op in ops {
        match *op {
            DiffOp::Retain { len } => pivot += len,
            DiffOp::Insert { len } => {
                for annotation in &mut flat {
                    if annotation.start >= pivot {
                        annotation.start += len;
                    }
                    if annotation.end > pivot {
                        annotation.end += len;
                    }
                }
                pivot += len;
            }
            DiffOp::Delete { len } => {
                if len == 0 {
                    // A deleted bare separator removes no visible text and
                    // must not swallow collapsed annotations at the pivot.
                    continue;
                }
                let span_end = pivot + len;
                flat.retain(|a| !(a.start >= pivot && a.end <= span_end));
                for annotation in &mut flat {
                    if annotation.start >= span_end {
                        annotation.start -= len;
                    } else if annotation.start >= pivot {
                        // Deletion eats into the annotation from the left.
                        annotation.start = pivot;
                    }
                    if annotation.end >= span_end {
                        annotation.end -= len;
                    } else if annotation.end > pivot {
                        // Deletion eats into the annotation from the right.
                        annotation.end = pivot;
                    }
                }
            }
        }
    }

    // A malformed op sequence cannot be detected here; clamping keeps the
    // output well-formed regardless.
    for annotation in &mut flat {
        annotation.end = annotation.end.min(new_visible_len);
        annotation.start = annotation.start.min(annotation.end);
    }
    flat
}
