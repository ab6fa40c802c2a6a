//! RV32 integer ALU semantics.
//!
//! The single authority the evaluator defers to for operator behavior,
//! including the M-extension division edge cases and the multiply-high
//! variants. Division by zero and overflowing signed division are defined
//! results here, matching the guest architecture, never host errors.

use crate::ir::{BinOp, CmpOp};

/// Apply a two-operand ALU operation to raw 32-bit values.
#[must_use]
pub fn bin(op: BinOp, lhs: u32, rhs: u32) -> u32 {
    match op {
        BinOp::Add => lhs.wrapping_add(rhs),
        BinOp::Sub => lhs.wrapping_sub(rhs),
        BinOp::And => lhs & rhs,
        BinOp::Or => lhs | rhs,
        BinOp::Xor => lhs ^ rhs,
        BinOp::Shl => shl(lhs, rhs),
        BinOp::Shr => shr(lhs, rhs),
        BinOp::Sar => sar(lhs, rhs),
        BinOp::Mul => lhs.wrapping_mul(rhs),
        BinOp::Mulh => mulh(lhs, rhs),
        BinOp::Mulhsu => mulhsu(lhs, rhs),
        BinOp::Mulhu => mulhu(lhs, rhs),
        BinOp::Div => div(lhs, rhs),
        BinOp::Divu => divu(lhs, rhs),
        BinOp::Rem => rem(lhs, rhs),
        BinOp::Remu => remu(lhs, rhs),
    }
}

/// Apply a comparison, yielding 0 or 1.
#[must_use]
pub fn cmp(op: CmpOp, lhs: u32, rhs: u32) -> u32 {
    let taken = match op {
        CmpOp::Eq => lhs == rhs,
        CmpOp::Ne => lhs != rhs,
        CmpOp::LtS => (lhs as i32) < (rhs as i32),
        CmpOp::GeS => (lhs as i32) >= (rhs as i32),
        CmpOp::LtU => lhs < rhs,
        CmpOp::GeU => lhs >= rhs,
    };
    taken as u32
}

/// Logical shift left.
///
/// The amount is not masked to 5 bits: amounts >= 32 shift every bit out.
/// Front-ends wanting RV32's masked shift amounts mask before emitting IR.
#[must_use]
pub fn shl(value: u32, amount: u32) -> u32 {
    if amount < 32 {
        value << amount
    } else {
        0
    }
}

/// Logical shift right; amount unmasked, see [`shl`].
#[must_use]
pub fn shr(value: u32, amount: u32) -> u32 {
    if amount < 32 {
        value >> amount
    } else {
        0
    }
}

/// Arithmetic shift right; amount unmasked. Amounts >= 32 leave only the
/// propagated sign.
#[must_use]
pub fn sar(value: u32, amount: u32) -> u32 {
    let v = value as i32;
    if amount < 32 {
        (v >> amount) as u32
    } else {
        (v >> 31) as u32
    }
}

/// High word of the signed x signed 64-bit product.
#[must_use]
pub fn mulh(lhs: u32, rhs: u32) -> u32 {
    let a = lhs as i32 as i64;
    let b = rhs as i32 as i64;
    ((a * b) >> 32) as u32
}

/// High word of the signed x unsigned 64-bit product.
#[must_use]
pub fn mulhsu(lhs: u32, rhs: u32) -> u32 {
    let a = lhs as i32 as i64;
    let b = rhs as i64;
    ((a * b) >> 32) as u32
}

/// High word of the unsigned x unsigned 64-bit product.
#[must_use]
pub fn mulhu(lhs: u32, rhs: u32) -> u32 {
    let a = lhs as u64;
    let b = rhs as u64;
    ((a * b) >> 32) as u32
}

/// Signed division. Division by zero yields all bits set; `i32::MIN / -1`
/// yields the dividend unchanged.
#[must_use]
pub fn div(dividend: u32, divisor: u32) -> u32 {
    let n = dividend as i32;
    let d = divisor as i32;
    if d == 0 {
        u32::MAX
    } else if n == i32::MIN && d == -1 {
        dividend
    } else {
        (n / d) as u32
    }
}

/// Unsigned division. Division by zero yields all bits set.
#[must_use]
pub fn divu(dividend: u32, divisor: u32) -> u32 {
    if divisor == 0 {
        u32::MAX
    } else {
        dividend / divisor
    }
}

/// Signed remainder. Division by zero yields the dividend; `i32::MIN % -1`
/// yields 0.
#[must_use]
pub fn rem(dividend: u32, divisor: u32) -> u32 {
    let n = dividend as i32;
    let d = divisor as i32;
    if d == 0 {
        dividend
    } else if n == i32::MIN && d == -1 {
        0
    } else {
        (n % d) as u32
    }
}

/// Unsigned remainder. Division by zero yields the dividend.
#[must_use]
pub fn remu(dividend: u32, divisor: u32) -> u32 {
    if divisor == 0 {
        dividend
    } else {
        dividend % divisor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_by_zero_table() {
        for x in [0u32, 1, 7, 0x8000_0000, u32::MAX] {
            assert_eq!(div(x, 0), u32::MAX);
            assert_eq!(divu(x, 0), 0xffff_ffff);
            assert_eq!(rem(x, 0), x);
            assert_eq!(remu(x, 0), x);
        }
    }

    #[test]
    fn signed_overflow_division_saturates() {
        let min = 0x8000_0000u32;
        let neg1 = (-1i32) as u32;
        assert_eq!(div(min, neg1), min);
        assert_eq!(rem(min, neg1), 0);
    }

    #[test]
    fn division_truncates_toward_zero() {
        assert_eq!(div((-7i32) as u32, 2), (-3i32) as u32);
        assert_eq!(rem((-7i32) as u32, 2), (-1i32) as u32);
        assert_eq!(div(7, (-2i32) as u32), (-3i32) as u32);
        assert_eq!(rem(7, (-2i32) as u32), 1);
    }

    #[test]
    fn multiply_high_variants() {
        // -2147483648 * 2 = -4294967296, high word 0xffffffff.
        assert_eq!(mulh(0x8000_0000, 2), 0xffff_ffff);
        // Same bits treated signed x unsigned / unsigned x unsigned.
        assert_eq!(mulhsu(0x8000_0000, 2), 0xffff_ffff);
        assert_eq!(mulhu(0x8000_0000, 2), 1);
        assert_eq!(mulhu(u32::MAX, u32::MAX), 0xffff_fffe);
        assert_eq!(mulh(u32::MAX, u32::MAX), 0);
    }

    #[test]
    fn shifts_follow_operand_signedness() {
        assert_eq!(shr(0x8000_0000, 1), 0x4000_0000);
        assert_eq!(sar(0x8000_0000, 1), 0xc000_0000);
        assert_eq!(shl(1, 31), 0x8000_0000);
    }

    #[test]
    fn oversized_shift_amounts_shift_everything_out() {
        assert_eq!(shl(1, 32), 0);
        assert_eq!(shr(u32::MAX, 33), 0);
        assert_eq!(sar(0x8000_0000, 100), 0xffff_ffff);
        assert_eq!(sar(0x7fff_ffff, 100), 0);
    }

    #[test]
    fn comparisons_yield_zero_or_one() {
        assert_eq!(cmp(CmpOp::LtS, (-1i32) as u32, 1), 1);
        assert_eq!(cmp(CmpOp::LtU, (-1i32) as u32, 1), 0);
        assert_eq!(cmp(CmpOp::GeS, (-1i32) as u32, 1), 0);
        assert_eq!(cmp(CmpOp::GeU, (-1i32) as u32, 1), 1);
        assert_eq!(cmp(CmpOp::Eq, 5, 5), 1);
        assert_eq!(cmp(CmpOp::Ne, 5, 5), 0);
    }
}
