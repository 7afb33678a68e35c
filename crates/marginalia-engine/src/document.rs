use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Separator inserted between blocks when the document is rendered as one
/// plain-text string. Two characters long, but logically zero-width at the
/// annotation-offset level: annotation offsets count block characters only.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Errors produced when resolving an anchor against a snapshot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnchorError {
    #[error("anchor references unknown block {0}")]
    UnknownBlock(BlockId),

    #[error("anchor offset {offset} is past the end of block {block} (length {len})")]
    OffsetPastBlockEnd {
        block: BlockId,
        offset: usize,
        len: usize,
    },
}

/// Stable identifier for a document block.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct BlockId(pub Uuid);

impl BlockId {
    pub fn new() -> Self {
        BlockId(Uuid::new_v4())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One block of document text. Block text must not contain the block
/// separator sequence; the snapshot's offset arithmetic depends on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub text: String,
}

impl Block {
    pub fn new(text: impl Into<String>) -> Self {
        Block {
            id: BlockId::new(),
            text: text.into(),
        }
    }

    /// Length of the block in characters (not bytes).
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// An annotation endpoint: a block plus a character offset within it.
///
/// This is the serializable anchoring representation that survives being
/// attached to stored documents; all arithmetic happens on flattened
/// absolute offsets instead.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub block: BlockId,
    pub offset: usize,
}

impl Position {
    pub fn new(block: BlockId, offset: usize) -> Self {
        Position { block, offset }
    }
}

/// Read-only view of a document as an ordered sequence of blocks.
///
/// The engine never mutates a snapshot. Edits are observed by handing the
/// engine a pre-edit and a post-edit snapshot and letting it diff their
/// plain-text renderings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    blocks: Vec<Block>,
}

impl DocumentSnapshot {
    pub fn new(blocks: Vec<Block>) -> Self {
        DocumentSnapshot { blocks }
    }

    /// Build a snapshot from plain block texts, generating fresh block ids.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DocumentSnapshot {
            blocks: texts.into_iter().map(Block::new).collect(),
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Whole-document plain text with blocks joined by [`BLOCK_SEPARATOR`].
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                text.push_str(BLOCK_SEPARATOR);
            }
            text.push_str(&block.text);
        }
        text
    }

    /// Total character length excluding block separators. This is the
    /// coordinate space annotation offsets live in.
    pub fn visible_len(&self) -> usize {
        self.blocks.iter().map(Block::len).sum()
    }

    /// Flatten a position to an absolute offset: the lengths of all blocks
    /// before the anchor block, plus the in-block offset.
    pub fn offset_at(&self, position: &Position) -> Result<usize, AnchorError> {
        let mut preceding = 0;
        for block in &self.blocks {
            if block.id == position.block {
                let len = block.len();
                if position.offset > len {
                    return Err(AnchorError::OffsetPastBlockEnd {
                        block: block.id,
                        offset: position.offset,
                        len,
                    });
                }
                return Ok(preceding + position.offset);
            }
            preceding += block.len();
        }
        Err(AnchorError::UnknownBlock(position.block))
    }

    /// Map an absolute offset back to a (block, in-block offset) pair.
    ///
    /// An offset equal to the exact end of block *i* resolves to the start
    /// of block *i+1* when a next block exists, so that a boundary landing
    /// on a block split re-anchors into the right-hand block. Offsets past
    /// the end of the document clamp to the last block's end.
    pub fn position_at(&self, offset: usize) -> Option<Position> {
        let last = self.blocks.len().checked_sub(1)?;
        let mut remaining = offset;
        for (i, block) in self.blocks.iter().enumerate() {
            let len = block.len();
            if remaining < len || (remaining == len && i == last) {
                return Some(Position::new(block.id, remaining));
            }
            remaining -= len;
        }
        // Past the end of the document; clamp to the last block's end.
        let block = &self.blocks[last];
        Some(Position::new(block.id, block.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(texts: &[&str]) -> DocumentSnapshot {
        DocumentSnapshot::from_texts(texts.iter().copied())
    }

    #[test]
    fn test_plain_text_joins_blocks_with_separator() {
        let doc = snapshot(&["first", "second", "third"]);
        assert_eq!(doc.plain_text(), "first\n\nsecond\n\nthird");
    }

    #[test]
    fn test_visible_len_ignores_separators() {
        let doc = snapshot(&["first", "second"]);
        assert_eq!(doc.visible_len(), 11);
        assert_eq!(doc.plain_text().chars().count(), 13);
    }

    #[test]
    fn test_offset_at_single_block() {
        let doc = snapshot(&["hello world"]);
        let block = doc.blocks()[0].id;
        assert_eq!(doc.offset_at(&Position::new(block, 0)), Ok(0));
        assert_eq!(doc.offset_at(&Position::new(block, 6)), Ok(6));
    }

    #[test]
    fn test_offset_at_spans_preceding_blocks() {
        let doc = snapshot(&["abcde", "fghij", "klmno"]);
        let third = doc.blocks()[2].id;
        assert_eq!(doc.offset_at(&Position::new(third, 2)), Ok(12));
    }

    #[test]
    fn test_offset_at_unknown_block() {
        let doc = snapshot(&["abc"]);
        let missing = BlockId::new();
        assert_eq!(
            doc.offset_at(&Position::new(missing, 0)),
            Err(AnchorError::UnknownBlock(missing))
        );
    }

    #[test]
    fn test_offset_at_past_block_end() {
        let doc = snapshot(&["abc"]);
        let block = doc.blocks()[0].id;
        assert!(matches!(
            doc.offset_at(&Position::new(block, 4)),
            Err(AnchorError::OffsetPastBlockEnd { offset: 4, len: 3, .. })
        ));
    }

    #[test]
    fn test_position_at_block_boundary_maps_to_next_block() {
        let doc = snapshot(&["abcde", "fghij"]);
        // Offset 5 is the exact end of the first block: it must resolve to
        // the start of the second block, not the end of the first.
        let pos = doc.position_at(5).unwrap();
        assert_eq!(pos.block, doc.blocks()[1].id);
        assert_eq!(pos.offset, 0);
    }

    #[test]
    fn test_position_at_document_end_sticks_to_last_block() {
        let doc = snapshot(&["abcde", "fghij"]);
        let pos = doc.position_at(10).unwrap();
        assert_eq!(pos.block, doc.blocks()[1].id);
        assert_eq!(pos.offset, 5);
    }

    #[test]
    fn test_position_at_clamps_past_document_end() {
        let doc = snapshot(&["abc"]);
        let pos = doc.position_at(100).unwrap();
        assert_eq!(pos.block, doc.blocks()[0].id);
        assert_eq!(pos.offset, 3);
    }

    #[test]
    fn test_position_at_empty_document() {
        let doc = DocumentSnapshot::new(Vec::new());
        assert_eq!(doc.position_at(0), None);
    }

    #[test]
    fn test_flatten_then_reanchor_round_trip() {
        let doc = snapshot(&["abcde", "fghij", "klmno"]);
        for block in doc.blocks() {
            for offset in 0..block.len() {
                let original = Position::new(block.id, offset);
                let absolute = doc.offset_at(&original).unwrap();
                let restored = doc.position_at(absolute).unwrap();
                assert_eq!(restored, original, "round trip at absolute {absolute}");
            }
        }
    }

    #[test]
    fn test_unicode_offsets_are_character_based() {
        let doc = snapshot(&["héllo wörld"]);
        let block = doc.blocks()[0].id;
        assert_eq!(doc.offset_at(&Position::new(block, 11)), Ok(11));
        assert_eq!(doc.visible_len(), 11);
    }
}
