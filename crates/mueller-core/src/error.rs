//! Error types for Mueller matrix construction and batched kernels

use thiserror::Error;

/// Error type for Mueller/Stokes array construction and batched operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MuellerError {
    /// A scalar-or-array parameter could not be broadcast to the batch shape
    #[error("cannot broadcast parameter of shape {param:?} to batch shape {batch:?}")]
    BroadcastMismatch { param: Vec<usize>, batch: Vec<usize> },

    /// An array did not carry the expected trailing matrix/vector dimensions
    #[error("{operation}: expected trailing dimensions {expected:?}, got shape {actual:?}")]
    TrailingShape {
        operation: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Two batched operands disagreed on their leading batch shape
    #[error("{operation}: batch shapes {lhs:?} and {rhs:?} do not match")]
    BatchMismatch {
        operation: &'static str,
        lhs: Vec<usize>,
        rhs: Vec<usize>,
    },

    /// Inner dimensions of a matrix product do not line up
    #[error("{operation}: inner dimensions {lhs} and {rhs} do not match")]
    InnerDimension {
        operation: &'static str,
        lhs: usize,
        rhs: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_mismatch_display() {
        let err = MuellerError::BroadcastMismatch {
            param: vec![3, 2],
            batch: vec![5, 5],
        };
        let msg = format!("{}", err);
        assert!(msg.contains("[3, 2]"));
        assert!(msg.contains("[5, 5]"));
    }

    #[test]
    fn test_trailing_shape_display() {
        let err = MuellerError::TrailingShape {
            operation: "mueller_to_jones",
            expected: vec![4, 4],
            actual: vec![4, 1],
        };
        let msg = format!("{}", err);
        assert!(msg.contains("mueller_to_jones"));
        assert!(msg.contains("[4, 4]"));
        assert!(msg.contains("[4, 1]"));
    }
}
