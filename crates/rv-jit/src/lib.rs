//! Tree IR for one translated RV32 code region.
//!
//! The front-end decoder lowers guest instructions into an arena-backed
//! [`Block`] through one builder method per operation, then executes the
//! block with [`evaluate`] against a `CpuState` and any `SystemBus`
//! implementation. Nodes reference their operands by index within the same
//! block; a node used as an operand is marked consumed, and the evaluator
//! runs exactly the unconsumed nodes (the root statements) in construction
//! order.
//!
//! The IR is deliberately unoptimized: no value numbering, no folding, no
//! register allocation. It exists to reproduce RV32 semantics exactly,
//! including the M-extension division/multiply edge cases in [`alu`], with
//! an allocation discipline suited to a fixed-size translation cache.

#![forbid(unsafe_code)]

pub mod alu;
mod interp;
mod ir;
pub mod verify;

pub use interp::evaluate;
pub use ir::{BinOp, Block, CmpOp, MemWidth, Node, NodeId, Op};
