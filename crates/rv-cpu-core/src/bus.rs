//! Memory and trap collaborator boundary.

use crate::state::CpuState;

/// Memory accesses and trap entry points supplied by the surrounding
/// emulator.
///
/// Reads return the raw stored bits for the accessed width; any sign or zero
/// extension is the caller's job. The trap hooks receive the processor-state
/// handle plus two reserved arguments whose meaning is defined by the
/// implementor, not by this crate.
///
/// All operations are synchronous; implementations must not suspend.
pub trait SystemBus {
    fn read_u8(&mut self, addr: u32) -> u8;
    fn read_u16(&mut self, addr: u32) -> u16;
    fn read_u32(&mut self, addr: u32) -> u32;

    fn write_u8(&mut self, addr: u32, value: u8);
    fn write_u16(&mut self, addr: u32, value: u16);
    fn write_u32(&mut self, addr: u32, value: u32);

    /// Environment-call trap (`ecall`).
    fn ecall(&mut self, cpu: &mut CpuState, arg0: u32, arg1: u32);

    /// Breakpoint trap (`ebreak`).
    fn ebreak(&mut self, cpu: &mut CpuState, arg0: u32, arg1: u32);
}

impl<T: SystemBus + ?Sized> SystemBus for &mut T {
    #[inline]
    fn read_u8(&mut self, addr: u32) -> u8 {
        <T as SystemBus>::read_u8(&mut **self, addr)
    }

    #[inline]
    fn read_u16(&mut self, addr: u32) -> u16 {
        <T as SystemBus>::read_u16(&mut **self, addr)
    }

    #[inline]
    fn read_u32(&mut self, addr: u32) -> u32 {
        <T as SystemBus>::read_u32(&mut **self, addr)
    }

    #[inline]
    fn write_u8(&mut self, addr: u32, value: u8) {
        <T as SystemBus>::write_u8(&mut **self, addr, value)
    }

    #[inline]
    fn write_u16(&mut self, addr: u32, value: u16) {
        <T as SystemBus>::write_u16(&mut **self, addr, value)
    }

    #[inline]
    fn write_u32(&mut self, addr: u32, value: u32) {
        <T as SystemBus>::write_u32(&mut **self, addr, value)
    }

    #[inline]
    fn ecall(&mut self, cpu: &mut CpuState, arg0: u32, arg1: u32) {
        <T as SystemBus>::ecall(&mut **self, cpu, arg0, arg1)
    }

    #[inline]
    fn ebreak(&mut self, cpu: &mut CpuState, arg0: u32, arg1: u32) {
        <T as SystemBus>::ebreak(&mut **self, cpu, arg0, arg1)
    }
}
