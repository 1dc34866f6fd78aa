use core::fmt;
use x86_64::{
    structures::paging::{FrameAllocator, Size4KiB},
    PhysAddr, VirtAddr,
};

use super::entry::{EntryFlags, EntryRef, PageTableEntry};
use super::layout::PagingLayout;
use super::phys::TableMemory;

/// Failure of a create-mode walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkError {
    /// No frame left for a missing intermediate table.
    FrameAllocationFailed,
    /// A huge page already covers the address at `level`.
    HugePage { level: usize },
    /// The allocator handed out a frame the layout's entries cannot address.
    FrameOutOfRange { frame: u64 },
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WalkError::FrameAllocationFailed => write!(f, "Out of frames for a page table"),
            WalkError::HugePage { level } => write!(f, "Address covered by a huge page at level {}", level),
            WalkError::FrameOutOfRange { frame } => {
                write!(f, "Frame {:#x} is outside the range a page-table entry can address", frame)
            }
        }
    }
}

/// Read-only walker over the table hierarchy rooted at `root`.
///
/// Holds only a shared borrow of table memory, so a lookup cannot alter any
/// entry it passes through.
pub struct PageTableWalker<'m, M: ?Sized> {
    mem: &'m M,
    layout: &'static PagingLayout,
    root: PhysAddr,
}

impl<'m, M: TableMemory + ?Sized> PageTableWalker<'m, M> {
    pub fn new(mem: &'m M, layout: &'static PagingLayout, root: PhysAddr) -> Self {
        PageTableWalker { mem, layout, root }
    }

    pub fn layout(&self) -> &'static PagingLayout {
        self.layout
    }

    /// Find the leaf entry describing `va`.
    ///
    /// Returns `None` as soon as an intermediate entry is not present. A
    /// present huge entry ends the walk early and is returned as the leaf.
    /// The returned leaf itself may still be non-present.
    pub fn lookup(&self, va: VirtAddr) -> Option<EntryRef> {
        let va = va.as_u64();
        let layout = self.layout;
        let mut table = self.root.as_u64();

        for level in 0..layout.leaf_level() {
            let at = EntryRef {
                slot: PhysAddr::new_truncate(layout.slot(table, layout.index(va, level))),
                level,
            };
            let entry = at.read(self.mem, layout);
            let next = entry.frame_address(layout)?;
            if entry.is_huge() && layout.allows_huge(level) {
                return Some(at);
            }
            table = next.as_u64();
        }

        let leaf = layout.leaf_level();
        Some(EntryRef {
            slot: PhysAddr::new_truncate(layout.slot(table, layout.index(va, leaf))),
            level: leaf,
        })
    }

    /// Read the entry behind `at` and resolve the 4 KiB frame backing `va`.
    pub fn translate(&self, at: EntryRef, va: VirtAddr) -> (PageTableEntry, Option<PhysAddr>) {
        let entry = at.read(self.mem, self.layout);
        (entry, at.page_base(self.layout, entry, va.as_u64()))
    }
}

/// Find the leaf slot for `va`, allocating and installing zeroed tables for
/// every missing intermediate level.
///
/// New tables are installed PRESENT | WRITABLE | USER_ACCESSIBLE so the leaf
/// alone decides the final permissions. Existing entries are never rewritten.
pub fn walk_create<M, A>(
    mem: &mut M,
    frames: &mut A,
    layout: &'static PagingLayout,
    root: PhysAddr,
    va: VirtAddr,
) -> Result<EntryRef, WalkError>
where
    M: TableMemory + ?Sized,
    A: FrameAllocator<Size4KiB> + ?Sized,
{
    let va = va.as_u64();
    let mut table = root.as_u64();

    for level in 0..layout.leaf_level() {
        let at = EntryRef {
            slot: PhysAddr::new_truncate(layout.slot(table, layout.index(va, level))),
            level,
        };
        let entry = at.read(mem, layout);

        table = match entry.frame_address(layout) {
            Some(_) if entry.is_huge() && layout.allows_huge(level) => {
                return Err(WalkError::HugePage { level });
            }
            Some(next) => next.as_u64(),
            None => {
                let frame = match frames.allocate_frame() {
                    Some(frame) => frame,
                    None => {
                        crate::log_warn!("paging: no frame for level {} table of {:#x}", level + 1, va);
                        return Err(WalkError::FrameAllocationFailed);
                    }
                };
                let start = frame.start_address().as_u64();
                if start & !layout.addr_mask != 0 {
                    crate::log_warn!("paging: frame {:#x} not addressable by {} entries", start, layout.name);
                    return Err(WalkError::FrameOutOfRange { frame: start });
                }
                mem.zero_frame(frame);
                let flags = EntryFlags::PRESENT | EntryFlags::WRITABLE | EntryFlags::USER_ACCESSIBLE;
                at.write(mem, layout, PageTableEntry::new(frame.start_address(), flags, layout));
                start
            }
        };
    }

    let leaf = layout.leaf_level();
    Ok(EntryRef {
        slot: PhysAddr::new_truncate(layout.slot(table, layout.index(va, leaf))),
        level: leaf,
    })
}

/// Physical address of the active top-level table, read from CR3.
#[cfg(all(target_arch = "x86_64", not(test)))]
pub fn active_root() -> PhysAddr {
    use x86_64::registers::control::Cr3;

    let (root_frame, _) = Cr3::read();
    root_frame.start_address()
}
