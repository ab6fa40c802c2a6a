//! Tree-walking evaluator: executes a built block against live guest state.

use rv_cpu_core::bus::SystemBus;
use rv_cpu_core::state::CpuState;

use crate::alu;
use crate::ir::{Block, MemWidth, Node, NodeId, Op};

/// Execute every root statement of `block` in construction order.
///
/// A root is any node whose consumed-by marker is unset; that filter alone
/// decides what runs, with no per-kind special cases at the top level.
/// Side effects flow out through `cpu` and `bus`; values produced by roots
/// are discarded.
pub fn evaluate<B: SystemBus>(block: &Block, cpu: &mut CpuState, bus: &mut B) {
    for node in block.nodes() {
        if node.consumed_by.is_none() {
            eval_node(block, node, cpu, bus);
        }
    }
}

fn eval_id<B: SystemBus>(block: &Block, id: NodeId, cpu: &mut CpuState, bus: &mut B) -> u32 {
    eval_node(block, block.node(id), cpu, bus)
}

fn eval_node<B: SystemBus>(block: &Block, node: &Node, cpu: &mut CpuState, bus: &mut B) -> u32 {
    // Side-effecting kinds are only ever roots; the builder never hands one
    // out as an operand of a well-formed program.
    debug_assert!(
        !node.op.has_side_effect() || node.consumed_by.is_none(),
        "side-effecting node evaluated as an operand"
    );

    match node.op {
        Op::Imm { value } => value as u32,
        Op::LoadReg { reg } => cpu.get_reg(reg),
        Op::StoreReg { reg, value } => {
            let v = eval_id(block, value, cpu, bus);
            cpu.set_reg(reg, v);
            0
        }
        Op::StorePc { value } => {
            cpu.pc = eval_id(block, value, cpu, bus);
            0
        }
        Op::Bin { op, lhs, rhs } => {
            let a = eval_id(block, lhs, cpu, bus);
            let b = eval_id(block, rhs, cpu, bus);
            alu::bin(op, a, b)
        }
        Op::Cmp { op, lhs, rhs } => {
            let a = eval_id(block, lhs, cpu, bus);
            let b = eval_id(block, rhs, cpu, bus);
            alu::cmp(op, a, b)
        }
        Op::Load {
            width,
            signed,
            addr,
        } => {
            let addr = eval_id(block, addr, cpu, bus);
            match (width, signed) {
                (MemWidth::Byte, true) => bus.read_u8(addr) as i8 as u32,
                (MemWidth::Byte, false) => bus.read_u8(addr) as u32,
                (MemWidth::Half, true) => bus.read_u16(addr) as i16 as u32,
                (MemWidth::Half, false) => bus.read_u16(addr) as u32,
                (MemWidth::Word, _) => bus.read_u32(addr),
            }
        }
        Op::Store { width, addr, value } => {
            let addr = eval_id(block, addr, cpu, bus);
            let v = eval_id(block, value, cpu, bus);
            match width {
                MemWidth::Byte => bus.write_u8(addr, v as u8),
                MemWidth::Half => bus.write_u16(addr, v as u16),
                MemWidth::Word => bus.write_u32(addr, v),
            }
            0
        }
        Op::Branch {
            cond,
            taken,
            not_taken,
        } => {
            // Exactly one target subtree runs; side effects nested in the
            // untaken target must not occur.
            let c = eval_id(block, cond, cpu, bus);
            cpu.pc = if c != 0 {
                eval_id(block, taken, cpu, bus)
            } else {
                eval_id(block, not_taken, cpu, bus)
            };
            0
        }
        Op::Ecall => {
            bus.ecall(cpu, 0, 0);
            0
        }
        Op::Ebreak => {
            bus.ebreak(cpu, 0, 0);
            0
        }
    }
}
