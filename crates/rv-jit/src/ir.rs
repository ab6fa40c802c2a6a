//! Node model, arena block, and the builder API the front-end lowers into.

use std::fmt;

use rv_cpu_core::state::REG_COUNT;

/// Index of a node within its [`Block`] arena.
///
/// Ids are only meaningful for the block that produced them; handing an id to
/// a different block is a contract violation caught at construction time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Two-operand value-producing ALU operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    And,
    Or,
    Xor,
    /// Logical shift left. The amount is the full right operand, unmasked.
    Shl,
    /// Logical shift right. The amount is the full right operand, unmasked.
    Shr,
    /// Arithmetic shift right. The amount is the full right operand, unmasked.
    Sar,
    Mul,
    Mulh,
    Mulhsu,
    Mulhu,
    Div,
    Divu,
    Rem,
    Remu,
}

/// Comparison operation; evaluates to 0 or 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    LtS,
    GeS,
    LtU,
    GeU,
}

/// Access width of a guest memory operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemWidth {
    Byte,
    Half,
    Word,
}

/// Operation tag plus operand references for one IR node.
///
/// Operand ids always refer to nodes allocated strictly earlier in the same
/// block, so the node set forms a forest ordered topologically by
/// construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Imm { value: i32 },
    LoadReg { reg: u32 },
    StoreReg { reg: u32, value: NodeId },
    StorePc { value: NodeId },
    Bin { op: BinOp, lhs: NodeId, rhs: NodeId },
    Cmp { op: CmpOp, lhs: NodeId, rhs: NodeId },
    /// Memory load; `signed` selects sign extension of sub-word widths.
    Load {
        width: MemWidth,
        signed: bool,
        addr: NodeId,
    },
    Store {
        width: MemWidth,
        addr: NodeId,
        value: NodeId,
    },
    Branch {
        cond: NodeId,
        taken: NodeId,
        not_taken: NodeId,
    },
    Ecall,
    Ebreak,
}

impl Op {
    /// Whether evaluating this kind mutates external state (registers, pc,
    /// memory, traps). Side-effecting kinds yield no usable value and are
    /// only ever roots in well-formed blocks.
    #[must_use]
    pub fn has_side_effect(&self) -> bool {
        matches!(
            self,
            Op::StoreReg { .. }
                | Op::StorePc { .. }
                | Op::Store { .. }
                | Op::Branch { .. }
                | Op::Ecall
                | Op::Ebreak
        )
    }

    pub(crate) fn visit_operands(&self, mut f: impl FnMut(NodeId)) {
        match *self {
            Op::Imm { .. } | Op::LoadReg { .. } | Op::Ecall | Op::Ebreak => {}
            Op::StoreReg { value, .. } | Op::StorePc { value } => f(value),
            Op::Bin { lhs, rhs, .. } | Op::Cmp { lhs, rhs, .. } => {
                f(lhs);
                f(rhs);
            }
            Op::Load { addr, .. } => f(addr),
            Op::Store { addr, value, .. } => {
                f(addr);
                f(value);
            }
            Op::Branch {
                cond,
                taken,
                not_taken,
            } => {
                f(cond);
                f(taken);
                f(not_taken);
            }
        }
    }
}

/// One IR node: the operation plus its consumed-by liveness marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    pub op: Op,
    /// Id of the most recent node that used this one as an operand, or
    /// `None` for roots. A liveness marker only, not ownership; overwritten
    /// on every use.
    pub consumed_by: Option<NodeId>,
}

/// Arena holding every node of one translated block, in construction order.
///
/// Capacity is fixed at creation; exceeding it is a fatal sizing bug in the
/// caller, which pre-sizes one arena per translation unit. Nodes are never
/// freed individually; the whole block is dropped or rebuilt as a unit when
/// the region is retranslated.
pub struct Block {
    nodes: Vec<Node>,
    capacity: usize,
}

impl Block {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn alloc(&mut self, op: Op) -> NodeId {
        assert!(
            self.nodes.len() < self.capacity,
            "translation block capacity exceeded ({} nodes)",
            self.capacity
        );
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            op,
            consumed_by: None,
        });
        id
    }

    fn consume(&mut self, operand: NodeId, by: NodeId) {
        assert!(
            operand.index() < by.index(),
            "operand {operand} does not precede its consumer {by}"
        );
        self.nodes[operand.index()].consumed_by = Some(by);
    }

    /// Load a 32-bit signed constant.
    pub fn imm(&mut self, value: i32) -> NodeId {
        self.alloc(Op::Imm { value })
    }

    /// Read integer register `reg`.
    pub fn load_reg(&mut self, reg: u32) -> NodeId {
        assert!((reg as usize) < REG_COUNT, "register index {reg} out of range");
        self.alloc(Op::LoadReg { reg })
    }

    /// Write `value` to integer register `reg`.
    pub fn store_reg(&mut self, reg: u32, value: NodeId) -> NodeId {
        assert!((reg as usize) < REG_COUNT, "register index {reg} out of range");
        let id = self.alloc(Op::StoreReg { reg, value });
        self.consume(value, id);
        id
    }

    /// Write `value` to the program counter, redirecting control flow.
    pub fn store_pc(&mut self, value: NodeId) -> NodeId {
        let id = self.alloc(Op::StorePc { value });
        self.consume(value, id);
        id
    }

    fn bin(&mut self, op: BinOp, lhs: NodeId, rhs: NodeId) -> NodeId {
        let id = self.alloc(Op::Bin { op, lhs, rhs });
        self.consume(lhs, id);
        self.consume(rhs, id);
        id
    }

    pub fn add(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.bin(BinOp::Add, lhs, rhs)
    }

    pub fn sub(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.bin(BinOp::Sub, lhs, rhs)
    }

    pub fn and(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.bin(BinOp::And, lhs, rhs)
    }

    pub fn or(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.bin(BinOp::Or, lhs, rhs)
    }

    pub fn xor(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.bin(BinOp::Xor, lhs, rhs)
    }

    /// Logical shift left. The amount is taken from the full evaluated right
    /// operand; front-ends wanting RV32's 5-bit amounts mask before emitting.
    pub fn shl(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.bin(BinOp::Shl, lhs, rhs)
    }

    /// Logical shift right; amount unmasked, see [`Block::shl`].
    pub fn shr(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.bin(BinOp::Shr, lhs, rhs)
    }

    /// Arithmetic shift right; amount unmasked, see [`Block::shl`].
    pub fn sar(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.bin(BinOp::Sar, lhs, rhs)
    }

    pub fn mul(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.bin(BinOp::Mul, lhs, rhs)
    }

    pub fn mulh(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.bin(BinOp::Mulh, lhs, rhs)
    }

    pub fn mulhsu(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.bin(BinOp::Mulhsu, lhs, rhs)
    }

    pub fn mulhu(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.bin(BinOp::Mulhu, lhs, rhs)
    }

    /// Signed division with the RV32 M edge cases; see [`crate::alu::div`].
    pub fn div(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.bin(BinOp::Div, lhs, rhs)
    }

    pub fn divu(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.bin(BinOp::Divu, lhs, rhs)
    }

    pub fn rem(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.bin(BinOp::Rem, lhs, rhs)
    }

    pub fn remu(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.bin(BinOp::Remu, lhs, rhs)
    }

    fn cmp(&mut self, op: CmpOp, lhs: NodeId, rhs: NodeId) -> NodeId {
        let id = self.alloc(Op::Cmp { op, lhs, rhs });
        self.consume(lhs, id);
        self.consume(rhs, id);
        id
    }

    pub fn cmp_eq(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.cmp(CmpOp::Eq, lhs, rhs)
    }

    pub fn cmp_ne(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.cmp(CmpOp::Ne, lhs, rhs)
    }

    /// Signed less-than.
    pub fn cmp_lt(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.cmp(CmpOp::LtS, lhs, rhs)
    }

    /// Signed greater-or-equal.
    pub fn cmp_ge(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.cmp(CmpOp::GeS, lhs, rhs)
    }

    pub fn cmp_ltu(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.cmp(CmpOp::LtU, lhs, rhs)
    }

    pub fn cmp_geu(&mut self, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.cmp(CmpOp::GeU, lhs, rhs)
    }

    fn load(&mut self, width: MemWidth, signed: bool, addr: NodeId) -> NodeId {
        let id = self.alloc(Op::Load {
            width,
            signed,
            addr,
        });
        self.consume(addr, id);
        id
    }

    fn store(&mut self, width: MemWidth, addr: NodeId, value: NodeId) -> NodeId {
        let id = self.alloc(Op::Store { width, addr, value });
        self.consume(addr, id);
        self.consume(value, id);
        id
    }

    /// Load byte, sign-extended.
    pub fn lb(&mut self, addr: NodeId) -> NodeId {
        self.load(MemWidth::Byte, true, addr)
    }

    /// Load half-word, sign-extended.
    pub fn lh(&mut self, addr: NodeId) -> NodeId {
        self.load(MemWidth::Half, true, addr)
    }

    /// Load word.
    pub fn lw(&mut self, addr: NodeId) -> NodeId {
        self.load(MemWidth::Word, true, addr)
    }

    /// Load byte, zero-extended.
    pub fn lbu(&mut self, addr: NodeId) -> NodeId {
        self.load(MemWidth::Byte, false, addr)
    }

    /// Load half-word, zero-extended.
    pub fn lhu(&mut self, addr: NodeId) -> NodeId {
        self.load(MemWidth::Half, false, addr)
    }

    /// Store byte.
    pub fn sb(&mut self, addr: NodeId, value: NodeId) -> NodeId {
        self.store(MemWidth::Byte, addr, value)
    }

    /// Store half-word.
    pub fn sh(&mut self, addr: NodeId, value: NodeId) -> NodeId {
        self.store(MemWidth::Half, addr, value)
    }

    /// Store word.
    pub fn sw(&mut self, addr: NodeId, value: NodeId) -> NodeId {
        self.store(MemWidth::Word, addr, value)
    }

    /// Conditional control transfer: evaluates `cond`, then exactly one of
    /// `taken` / `not_taken`, and assigns the result to the program counter.
    /// The untaken target subtree is never evaluated.
    pub fn branch(&mut self, cond: NodeId, taken: NodeId, not_taken: NodeId) -> NodeId {
        let id = self.alloc(Op::Branch {
            cond,
            taken,
            not_taken,
        });
        self.consume(cond, id);
        self.consume(taken, id);
        self.consume(not_taken, id);
        id
    }

    /// Environment-call trap.
    pub fn ecall(&mut self) -> NodeId {
        self.alloc(Op::Ecall)
    }

    /// Breakpoint trap.
    pub fn ebreak(&mut self) -> NodeId {
        self.alloc(Op::Ebreak)
    }
}

impl BinOp {
    fn mnemonic(self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Xor => "xor",
            BinOp::Shl => "shl",
            BinOp::Shr => "shr",
            BinOp::Sar => "sar",
            BinOp::Mul => "mul",
            BinOp::Mulh => "mulh",
            BinOp::Mulhsu => "mulhsu",
            BinOp::Mulhu => "mulhu",
            BinOp::Div => "div",
            BinOp::Divu => "divu",
            BinOp::Rem => "rem",
            BinOp::Remu => "remu",
        }
    }
}

impl CmpOp {
    fn mnemonic(self) -> &'static str {
        match self {
            CmpOp::Eq => "eq",
            CmpOp::Ne => "ne",
            CmpOp::LtS => "lt",
            CmpOp::GeS => "ge",
            CmpOp::LtU => "ltu",
            CmpOp::GeU => "geu",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Op::Imm { value } => write!(f, "imm {value}"),
            Op::LoadReg { reg } => write!(f, "ld_reg x{reg}"),
            Op::StoreReg { reg, value } => write!(f, "st_reg x{reg}, {value}"),
            Op::StorePc { value } => write!(f, "st_pc {value}"),
            Op::Bin { op, lhs, rhs } => write!(f, "{} {lhs}, {rhs}", op.mnemonic()),
            Op::Cmp { op, lhs, rhs } => write!(f, "{} {lhs}, {rhs}", op.mnemonic()),
            Op::Load {
                width,
                signed,
                addr,
            } => {
                let m = match (width, signed) {
                    (MemWidth::Byte, true) => "lb",
                    (MemWidth::Byte, false) => "lbu",
                    (MemWidth::Half, true) => "lh",
                    (MemWidth::Half, false) => "lhu",
                    (MemWidth::Word, _) => "lw",
                };
                write!(f, "{m} {addr}")
            }
            Op::Store { width, addr, value } => {
                let m = match width {
                    MemWidth::Byte => "sb",
                    MemWidth::Half => "sh",
                    MemWidth::Word => "sw",
                };
                write!(f, "{m} {addr}, {value}")
            }
            Op::Branch {
                cond,
                taken,
                not_taken,
            } => write!(f, "branch {cond}, {taken}, {not_taken}"),
            Op::Ecall => write!(f, "ecall"),
            Op::Ebreak => write!(f, "ebreak"),
        }
    }
}

/// One line per node, in construction order: `n2: add n0, n1`.
impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            writeln!(f, "n{i}: {}", node.op)?;
        }
        Ok(())
    }
}
