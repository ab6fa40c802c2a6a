//! Flat little-endian RAM bus for tests and benches.

use crate::bus::SystemBus;
use crate::state::CpuState;

/// Little-endian flat RAM with trap recording.
///
/// Out-of-range accesses panic; callers size the RAM to cover every address
/// a test touches.
pub struct FlatTestBus {
    ram: Vec<u8>,
    /// `(arg0, arg1)` of every `ecall` in invocation order.
    pub ecalls: Vec<(u32, u32)>,
    /// `(arg0, arg1)` of every `ebreak` in invocation order.
    pub ebreaks: Vec<(u32, u32)>,
}

impl FlatTestBus {
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            ram: vec![0; size],
            ecalls: Vec::new(),
            ebreaks: Vec::new(),
        }
    }

    pub fn load(&mut self, addr: u32, bytes: &[u8]) {
        let addr = addr as usize;
        self.ram[addr..addr + bytes.len()].copy_from_slice(bytes);
    }

    #[must_use]
    pub fn ram(&self) -> &[u8] {
        &self.ram
    }
}

impl SystemBus for FlatTestBus {
    fn read_u8(&mut self, addr: u32) -> u8 {
        self.ram[addr as usize]
    }

    fn read_u16(&mut self, addr: u32) -> u16 {
        let addr = addr as usize;
        u16::from_le_bytes(self.ram[addr..addr + 2].try_into().unwrap())
    }

    fn read_u32(&mut self, addr: u32) -> u32 {
        let addr = addr as usize;
        u32::from_le_bytes(self.ram[addr..addr + 4].try_into().unwrap())
    }

    fn write_u8(&mut self, addr: u32, value: u8) {
        self.ram[addr as usize] = value;
    }

    fn write_u16(&mut self, addr: u32, value: u16) {
        let addr = addr as usize;
        self.ram[addr..addr + 2].copy_from_slice(&value.to_le_bytes());
    }

    fn write_u32(&mut self, addr: u32, value: u32) {
        let addr = addr as usize;
        self.ram[addr..addr + 4].copy_from_slice(&value.to_le_bytes());
    }

    fn ecall(&mut self, _cpu: &mut CpuState, arg0: u32, arg1: u32) {
        self.ecalls.push((arg0, arg1));
    }

    fn ebreak(&mut self, _cpu: &mut CpuState, arg0: u32, arg1: u32) {
        self.ebreaks.push((arg0, arg1));
    }
}
