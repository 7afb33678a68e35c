use dissimilar::Chunk;

use crate::document::BLOCK_SEPARATOR;

/// One span of the diff between the pre-edit and post-edit plain text.
///
/// `len` is the span's *visible* length: its character count minus the
/// characters taken up by block separators inside it. Annotation offsets
/// never count separators, so all shift arithmetic runs on visible lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOp {
    /// Text present in both snapshots; advances the pivot.
    Retain { len: usize },
    /// Text only present in the new snapshot.
    Insert { len: usize },
    /// Text only present in the old snapshot.
    Delete { len: usize },
}

/// Kind of edit that produced the new snapshot. Used to gate recomputation:
/// only content-mutating edits can move annotation offsets, so everything
/// else skips the diff entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Typing one or more characters at the caret.
    InsertCharacters,
    /// Deleting the character before the caret.
    Backspace,
    /// Deleting the character after the caret.
    DeleteForward,
    /// Removing a non-collapsed selection.
    RemoveRange,
    /// Pasting or dropping a text fragment.
    InsertFragment,
    /// Splitting a block in two (Enter).
    SplitBlock,
    /// Inline or block style toggles; text is unchanged.
    StyleChange,
    /// Caret or selection movement only.
    SelectionMove,
    /// Block-level metadata updates with no text change.
    BlockMetadata,
}

impl EditKind {
    /// Whether this edit can change the plain text and therefore requires
    /// the annotation set to be recomputed.
    pub fn is_content_edit(self) -> bool {
        match self {
            EditKind::InsertCharacters
            | EditKind::Backspace
            | EditKind::DeleteForward
            | EditKind::RemoveRange
            | EditKind::InsertFragment
            | EditKind::SplitBlock => true,
            EditKind::StyleChange | EditKind::SelectionMove | EditKind::BlockMetadata => false,
        }
    }
}

/// Diff two plain-text renderings into an ordered op list with visible
/// lengths. Consecutive ops partition both texts.
pub fn diff_ops(old_text: &str, new_text: &str) -> Vec<DiffOp> {
    dissimilar::diff(old_text, new_text)
        .into_iter()
        .map(|chunk| match chunk {
            Chunk::Equal(text) => DiffOp::Retain {
                len: visible_len(text),
            },
            Chunk::Insert(text) => DiffOp::Insert {
                len: visible_len(text),
            },
            Chunk::Delete(text) => DiffOp::Delete {
                len: visible_len(text),
            },
        })
        .collect()
}

/// Character count of a chunk minus the characters occupied by block
/// separators within it. The separator occupies two characters in the
/// literal string but is zero-width in annotation-offset space.
fn visible_len(chunk: &str) -> usize {
    let chars = chunk.chars().count();
    let separators = chunk.matches(BLOCK_SEPARATOR).count();
    chars - separators * BLOCK_SEPARATOR.len()
}
