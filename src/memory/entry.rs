use bitflags::bitflags;
use x86_64::PhysAddr;

use super::layout::PagingLayout;
use super::phys::TableMemory;

bitflags! {
    /// Hardware flag bits shared by the 32-bit and 64-bit x86 formats.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EntryFlags: u64 {
        const PRESENT         = 1 << 0;
        const WRITABLE        = 1 << 1;
        const USER_ACCESSIBLE = 1 << 2;
        const WRITE_THROUGH   = 1 << 3;
        const NO_CACHE        = 1 << 4;
        const ACCESSED        = 1 << 5;
        const DIRTY           = 1 << 6;
        const HUGE_PAGE       = 1 << 7;
        const GLOBAL          = 1 << 8;
        const NO_EXECUTE      = 1 << 63;
    }
}

/// Value of one page-table entry, widened to 64 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTableEntry {
    raw: u64,
}

impl PageTableEntry {
    pub const fn from_raw(raw: u64) -> Self {
        PageTableEntry { raw }
    }

    pub fn new(frame: PhysAddr, flags: EntryFlags, layout: &PagingLayout) -> Self {
        PageTableEntry { raw: (frame.as_u64() & layout.addr_mask) | flags.bits() }
    }

    pub const fn raw(&self) -> u64 {
        self.raw
    }

    pub fn flags(&self) -> EntryFlags {
        EntryFlags::from_bits_truncate(self.raw)
    }

    pub fn is_present(&self) -> bool {
        self.flags().contains(EntryFlags::PRESENT)
    }

    pub fn is_huge(&self) -> bool {
        self.flags().contains(EntryFlags::HUGE_PAGE)
    }

    /// Frame address field. The field is undefined while the entry is not
    /// present, so it is only handed out for present entries.
    pub fn frame_address(&self, layout: &PagingLayout) -> Option<PhysAddr> {
        if !self.is_present() {
            return None;
        }
        Some(PhysAddr::new_truncate(self.raw & layout.addr_mask))
    }
}

/// Storage location of an entry inside the live table structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRef {
    /// Physical address of the entry itself.
    pub slot: PhysAddr,
    /// Level the entry lives at; below the leaf level it maps a huge page.
    pub level: usize,
}

impl EntryRef {
    pub fn read<M: TableMemory + ?Sized>(&self, mem: &M, layout: &PagingLayout) -> PageTableEntry {
        PageTableEntry::from_raw(mem.read_entry(self.slot, layout.entry_width))
    }

    pub fn write<M: TableMemory + ?Sized>(&self, mem: &mut M, layout: &PagingLayout, entry: PageTableEntry) {
        mem.write_entry(self.slot, layout.entry_width, entry.raw());
    }

    /// Physical base of the 4 KiB frame backing `va` through `entry`.
    pub fn page_base(&self, layout: &PagingLayout, entry: PageTableEntry, va: u64) -> Option<PhysAddr> {
        let frame = entry.frame_address(layout)?.as_u64();
        let span = layout.level_span(self.level);
        if span == layout.page_size() {
            return Some(PhysAddr::new_truncate(frame));
        }
        let base = frame & !(span - 1);
        let within = va & (span - 1) & !(layout.page_size() - 1);
        Some(PhysAddr::new_truncate(base + within))
    }
}
