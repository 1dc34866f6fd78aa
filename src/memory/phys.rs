use volatile::{ReadOnly, Volatile};
use x86_64::structures::paging::{PhysFrame, Size4KiB};
use x86_64::PhysAddr;

use super::layout::EntryWidth;

/// Access to the physical memory holding page tables.
///
/// Walks only ever go through this trait, so tests can stand in a sparse
/// fake for real RAM.
pub trait TableMemory {
    fn read_entry(&self, slot: PhysAddr, width: EntryWidth) -> u64;
    fn write_entry(&mut self, slot: PhysAddr, width: EntryWidth, value: u64);
    fn zero_frame(&mut self, frame: PhysFrame<Size4KiB>);
}

/// Physical memory reachable at a fixed virtual offset.
///
/// AtomicOS identity-maps low memory at boot, so the kernel uses an offset of 0.
pub struct OffsetTables {
    phys_offset: u64,
}

impl OffsetTables {
    /// # Safety
    /// All physical memory a walk can reach must be mapped at `phys_offset`.
    pub const unsafe fn new(phys_offset: u64) -> Self {
        OffsetTables { phys_offset }
    }

    fn virt(&self, phys: PhysAddr) -> usize {
        (self.phys_offset + phys.as_u64()) as usize
    }
}

impl TableMemory for OffsetTables {
    fn read_entry(&self, slot: PhysAddr, width: EntryWidth) -> u64 {
        let addr = self.virt(slot);
        // Entries are hardware-owned (accessed/dirty bits), so read through volatile cells.
        unsafe {
            match width {
                EntryWidth::U32 => (*(addr as *const ReadOnly<u32>)).read() as u64,
                EntryWidth::U64 => (*(addr as *const ReadOnly<u64>)).read(),
            }
        }
    }

    fn write_entry(&mut self, slot: PhysAddr, width: EntryWidth, value: u64) {
        let addr = self.virt(slot);
        unsafe {
            match width {
                EntryWidth::U32 => (*(addr as *mut Volatile<u32>)).write(value as u32),
                EntryWidth::U64 => (*(addr as *mut Volatile<u64>)).write(value),
            }
        }
    }

    fn zero_frame(&mut self, frame: PhysFrame<Size4KiB>) {
        let addr = self.virt(frame.start_address());
        unsafe { core::ptr::write_bytes(addr as *mut u8, 0, 4096) };
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use alloc::collections::BTreeMap;

    /// Sparse physical memory; unwritten slots read as zero.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct FakeTables {
        pub slots: BTreeMap<u64, u64>,
        pub writes: usize,
    }

    impl FakeTables {
        pub fn set(&mut self, slot: u64, value: u64) {
            self.slots.insert(slot, value);
        }
    }

    impl TableMemory for FakeTables {
        fn read_entry(&self, slot: PhysAddr, width: EntryWidth) -> u64 {
            let raw = self.slots.get(&slot.as_u64()).copied().unwrap_or(0);
            match width {
                EntryWidth::U32 => raw & 0xFFFF_FFFF,
                EntryWidth::U64 => raw,
            }
        }

        fn write_entry(&mut self, slot: PhysAddr, _width: EntryWidth, value: u64) {
            self.writes += 1;
            self.slots.insert(slot.as_u64(), value);
        }

        fn zero_frame(&mut self, frame: PhysFrame<Size4KiB>) {
            let start = frame.start_address().as_u64();
            self.slots.retain(|&slot, _| slot < start || slot >= start + 4096);
        }
    }
}
