use core::fmt;
use x86_64::{PhysAddr, VirtAddr};

use super::entry::EntryFlags;
use super::layout::PagingLayout;
use super::paging::PageTableWalker;
use super::phys::TableMemory;

/// A range the reporter refuses to walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportError {
    Inverted { begin: u64, end: u64 },
    NotCanonical { addr: u64 },
    SpansHole { begin: u64, end: u64 },
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReportError::Inverted { begin, end } => {
                write!(f, "begin va (0x{:x}) is greater than end va (0x{:x})", begin, end)
            }
            ReportError::NotCanonical { addr } => {
                write!(f, "va 0x{:x} is outside the translated address space", addr)
            }
            ReportError::SpansHole { begin, end } => {
                write!(f, "range 0x{:x}..0x{:x} crosses the non-canonical hole", begin, end)
            }
        }
    }
}

/// Translation state of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMapping {
    Unmapped {
        va: u64,
    },
    Mapped {
        va: u64,
        phys: PhysAddr,
        present: bool,
        writable: bool,
        user: bool,
    },
}

impl fmt::Display for PageMapping {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PageMapping::Unmapped { va } => write!(f, "va 0x{:x} is not mapped", va),
            PageMapping::Mapped { va, phys, present, writable, user } => write!(
                f,
                "va 0x{:x}: 0x{:x} PTE_P {} PTE_W {} PTE_U {}",
                va,
                phys.as_u64(),
                present as u8,
                writable as u8,
                user as u8,
            ),
        }
    }
}

/// Lazy per-page report over an already validated range.
pub struct MappingReport<'m, M: ?Sized> {
    walker: PageTableWalker<'m, M>,
    next: Option<u64>,
    end: u64,
}

impl<'m, M: TableMemory + ?Sized> Iterator for MappingReport<'m, M> {
    type Item = PageMapping;

    fn next(&mut self) -> Option<PageMapping> {
        let va = self.next.filter(|&va| va <= self.end)?;
        self.next = va.checked_add(self.walker.layout().page_size());
        Some(self.describe(va))
    }
}

impl<'m, M: TableMemory + ?Sized> MappingReport<'m, M> {
    fn describe(&self, va: u64) -> PageMapping {
        let addr = VirtAddr::new_truncate(va);
        let Some(at) = self.walker.lookup(addr) else {
            return PageMapping::Unmapped { va };
        };
        let (entry, phys) = self.walker.translate(at, addr);
        match phys {
            Some(phys) => {
                let flags = entry.flags();
                PageMapping::Mapped {
                    va,
                    phys,
                    present: flags.contains(EntryFlags::PRESENT),
                    writable: flags.contains(EntryFlags::WRITABLE),
                    user: flags.contains(EntryFlags::USER_ACCESSIBLE),
                }
            }
            None => PageMapping::Unmapped { va },
        }
    }
}

/// Report the mapping of every page from `begin` to `end` inclusive.
///
/// The range is validated up front, so an error means no page was examined.
/// `begin` is not rounded: iteration steps from it by whole pages and each
/// step lands on whatever page contains it.
pub fn report<'m, M: TableMemory + ?Sized>(
    mem: &'m M,
    layout: &'static PagingLayout,
    root: PhysAddr,
    begin: u64,
    end: u64,
) -> Result<MappingReport<'m, M>, ReportError> {
    if begin > end {
        return Err(ReportError::Inverted { begin, end });
    }
    for addr in [begin, end] {
        if !layout.is_canonical(addr) {
            return Err(ReportError::NotCanonical { addr });
        }
    }
    if layout.is_upper_half(begin) != layout.is_upper_half(end) {
        return Err(ReportError::SpansHole { begin, end });
    }

    Ok(MappingReport {
        walker: PageTableWalker::new(mem, layout, root),
        next: Some(begin),
        end,
    })
}
