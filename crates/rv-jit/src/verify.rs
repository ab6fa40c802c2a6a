//! Structural checks for freshly built blocks.
//!
//! A debug aid for the front-end: the evaluator itself trusts the builder
//! and never consults these checks. `verify` reports every defect it finds
//! rather than stopping at the first, so a decoder bug shows up with its
//! full blast radius.

use thiserror::Error;

use crate::ir::{Block, NodeId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// A value-producing node is a root: the evaluator would compute it and
    /// discard the result. Well-formed front-ends attach every value to a
    /// consumer.
    #[error("{node}: value-producing node is never consumed")]
    DeadValue { node: NodeId },

    /// A side-effecting node is used as an operand. Its effect would run
    /// once per reference instead of once in program order.
    #[error("{node}: side-effecting node is an operand of {consumer}")]
    EffectAsOperand { node: NodeId, consumer: NodeId },
}

/// Check `block` for structural defects, returning every finding.
pub fn verify(block: &Block) -> Result<(), Vec<VerifyError>> {
    let mut errors = Vec::new();

    for (i, node) in block.nodes().iter().enumerate() {
        let id = NodeId(i as u32);
        if !node.op.has_side_effect() && node.consumed_by.is_none() {
            errors.push(VerifyError::DeadValue { node: id });
        }
        node.op.visit_operands(|operand| {
            if block.node(operand).op.has_side_effect() {
                errors.push(VerifyError::EffectAsOperand {
                    node: operand,
                    consumer: id,
                });
            }
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
