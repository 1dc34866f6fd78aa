use bit_field::BitField;

/// Width of a single page-table entry in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryWidth {
    U32,
    U64,
}

impl EntryWidth {
    pub const fn bytes(self) -> u64 {
        match self {
            EntryWidth::U32 => 4,
            EntryWidth::U64 => 8,
        }
    }
}

/// Bit-field description of a hierarchical page-table format.
///
/// Level 0 is the root (directory); the last level holds 4 KiB leaf entries.
/// A virtual address is split, from the top, into one index per level
/// followed by `offset_bits` of in-page offset.
#[derive(Debug)]
pub struct PagingLayout {
    pub name: &'static str,
    /// Index width per level, root first.
    pub index_bits: &'static [u32],
    pub offset_bits: u32,
    pub entry_width: EntryWidth,
    /// Bits of an entry holding the physical frame address.
    pub addr_mask: u64,
    /// Upper address bits must replicate the top index bit (x86_64 canonical form).
    pub sign_extended: bool,
    /// Bit `n` set: a present entry at level `n` with `HUGE_PAGE` is a leaf.
    pub huge_levels: u32,
}

/// 32-bit x86 without PAE: 10-bit directory, 10-bit table, 4 KiB pages, 4 MiB PSE pages.
///
/// Assumes CR4.PSE is set. With PSE clear the hardware ignores PDE bit 7 and
/// walks such an entry as a page table, which this layout does not model.
pub static TWO_LEVEL_32: PagingLayout = PagingLayout {
    name: "x86 2-level",
    index_bits: &[10, 10],
    offset_bits: 12,
    entry_width: EntryWidth::U32,
    addr_mask: 0xFFFF_F000,
    sign_extended: false,
    huge_levels: 0b01,
};

/// x86_64 4-level paging: PML4, PDPT, PD, PT. 1 GiB and 2 MiB pages.
pub static FOUR_LEVEL_48: PagingLayout = PagingLayout {
    name: "x86_64 4-level",
    index_bits: &[9, 9, 9, 9],
    offset_bits: 12,
    entry_width: EntryWidth::U64,
    addr_mask: 0x000F_FFFF_FFFF_F000,
    sign_extended: true,
    huge_levels: 0b0110,
};

impl PagingLayout {
    pub fn levels(&self) -> usize {
        self.index_bits.len()
    }

    pub fn leaf_level(&self) -> usize {
        self.levels() - 1
    }

    pub fn page_size(&self) -> u64 {
        1 << self.offset_bits
    }

    /// Number of translated virtual-address bits.
    pub fn va_bits(&self) -> u32 {
        self.offset_bits + self.index_bits.iter().sum::<u32>()
    }

    /// Lowest bit of the index field for `level`.
    fn shift(&self, level: usize) -> u32 {
        self.offset_bits + self.index_bits[level + 1..].iter().sum::<u32>()
    }

    /// Bytes of address space covered by one entry at `level`.
    pub fn level_span(&self, level: usize) -> u64 {
        1 << self.shift(level)
    }

    /// Table index selected by `va` at `level`.
    pub fn index(&self, va: u64, level: usize) -> u64 {
        let lo = self.shift(level) as usize;
        let hi = lo + self.index_bits[level] as usize;
        va.get_bits(lo..hi)
    }

    /// Slot address of entry `index` in the table at `table`.
    pub fn slot(&self, table: u64, index: u64) -> u64 {
        table + index * self.entry_width.bytes()
    }

    pub fn allows_huge(&self, level: usize) -> bool {
        level < self.leaf_level() && self.huge_levels.get_bit(level)
    }

    pub fn is_canonical(&self, va: u64) -> bool {
        let bits = self.va_bits();
        if bits >= 64 {
            return true;
        }
        if !self.sign_extended {
            return va >> bits == 0;
        }
        let top = va >> (bits - 1);
        top == 0 || top == (1u64 << (64 - bits + 1)) - 1
    }

    /// True when `va` sits in the sign-extended upper half.
    pub fn is_upper_half(&self, va: u64) -> bool {
        self.sign_extended && va.get_bit(self.va_bits() as usize - 1)
    }
}
