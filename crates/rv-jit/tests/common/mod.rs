//! Shared test bus that logs every memory access.

use rv_cpu_core::bus::SystemBus;
use rv_cpu_core::state::CpuState;

/// Flat little-endian RAM that records the address of every read and write,
/// in access order.
pub struct LoggingBus {
    pub ram: Vec<u8>,
    pub reads: Vec<u32>,
    pub writes: Vec<u32>,
}

impl LoggingBus {
    pub fn new(size: usize) -> Self {
        Self {
            ram: vec![0; size],
            reads: Vec::new(),
            writes: Vec::new(),
        }
    }

    pub fn seed_u32(&mut self, addr: u32, value: u32) {
        let addr = addr as usize;
        self.ram[addr..addr + 4].copy_from_slice(&value.to_le_bytes());
    }
}

impl SystemBus for LoggingBus {
    fn read_u8(&mut self, addr: u32) -> u8 {
        self.reads.push(addr);
        self.ram[addr as usize]
    }

    fn read_u16(&mut self, addr: u32) -> u16 {
        self.reads.push(addr);
        let addr = addr as usize;
        u16::from_le_bytes(self.ram[addr..addr + 2].try_into().unwrap())
    }

    fn read_u32(&mut self, addr: u32) -> u32 {
        self.reads.push(addr);
        let addr = addr as usize;
        u32::from_le_bytes(self.ram[addr..addr + 4].try_into().unwrap())
    }

    fn write_u8(&mut self, addr: u32, value: u8) {
        self.writes.push(addr);
        self.ram[addr as usize] = value;
    }

    fn write_u16(&mut self, addr: u32, value: u16) {
        self.writes.push(addr);
        let addr = addr as usize;
        self.ram[addr..addr + 2].copy_from_slice(&value.to_le_bytes());
    }

    fn write_u32(&mut self, addr: u32, value: u32) {
        self.writes.push(addr);
        let addr = addr as usize;
        self.ram[addr..addr + 4].copy_from_slice(&value.to_le_bytes());
    }

    fn ecall(&mut self, _cpu: &mut CpuState, _arg0: u32, _arg1: u32) {
        panic!("unexpected ecall");
    }

    fn ebreak(&mut self, _cpu: &mut CpuState, _arg0: u32, _arg1: u32) {
        panic!("unexpected ebreak");
    }
}
