pub mod annotations;
pub mod document;

// Re-export key types for easier usage
pub use annotations::{
    Annotation, AnnotationId, AnnotationSet, DiffOp, EditKind, Recomputed, recompute,
};
pub use document::{AnchorError, BLOCK_SEPARATOR, Block, BlockId, DocumentSnapshot, Position};
