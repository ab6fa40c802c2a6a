//! Property tests for the ALU semantics against wide-integer references.

use proptest::prelude::*;
use rv_jit::alu;

proptest! {
    #[test]
    fn signed_division_reconstructs_the_dividend(a in any::<u32>(), b in any::<u32>()) {
        let n = a as i32;
        let d = b as i32;
        prop_assume!(d != 0 && !(n == i32::MIN && d == -1));
        let q = alu::div(a, b) as i32;
        let r = alu::rem(a, b) as i32;
        prop_assert_eq!(q.wrapping_mul(d).wrapping_add(r), n);
        // Truncating division: |r| < |d| and r has the dividend's sign (or 0).
        prop_assert!(r.unsigned_abs() < d.unsigned_abs());
        prop_assert!(r == 0 || (r < 0) == (n < 0));
    }

    #[test]
    fn unsigned_division_reconstructs_the_dividend(a in any::<u32>(), b in 1u32..) {
        let q = alu::divu(a, b);
        let r = alu::remu(a, b);
        prop_assert_eq!(q as u64 * b as u64 + r as u64, a as u64);
        prop_assert!(r < b);
    }

    #[test]
    fn multiply_high_matches_wide_reference(a in any::<u32>(), b in any::<u32>()) {
        let ss = ((a as i32 as i64) * (b as i32 as i64)) as u64;
        let su = ((a as i32 as i64 as i128) * (b as i128)) as u64;
        let uu = (a as u64) * (b as u64);
        prop_assert_eq!(alu::mulh(a, b), (ss >> 32) as u32);
        prop_assert_eq!(alu::mulhsu(a, b), (su >> 32) as u32);
        prop_assert_eq!(alu::mulhu(a, b), (uu >> 32) as u32);
        // The low word is the same for every signedness.
        prop_assert_eq!(alu::bin(rv_jit::BinOp::Mul, a, b), (uu & 0xffff_ffff) as u32);
    }

    #[test]
    fn every_alu_op_is_total(a in any::<u32>(), b in any::<u32>()) {
        use rv_jit::BinOp::*;
        for op in [Add, Sub, And, Or, Xor, Shl, Shr, Sar, Mul, Mulh, Mulhsu, Mulhu, Div, Divu, Rem, Remu] {
            let _ = alu::bin(op, a, b);
        }
        use rv_jit::CmpOp::*;
        for op in [Eq, Ne, LtS, GeS, LtU, GeU] {
            prop_assert!(alu::cmp(op, a, b) <= 1);
        }
    }

    #[test]
    fn oversized_shifts_saturate(v in any::<u32>(), amt in 32u32..) {
        prop_assert_eq!(alu::shl(v, amt), 0);
        prop_assert_eq!(alu::shr(v, amt), 0);
        let sign = ((v as i32) >> 31) as u32;
        prop_assert_eq!(alu::sar(v, amt), sign);
    }
}
