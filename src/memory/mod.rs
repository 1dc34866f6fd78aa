//! Read-side view of the paging hierarchy: layouts, entries, the walker and
//! the per-page mapping reporter.

pub mod entry;
pub mod frame_allocator;
pub mod layout;
pub mod mappings;
pub mod paging;
pub mod phys;

pub use entry::{EntryFlags, EntryRef, PageTableEntry};
pub use layout::{EntryWidth, PagingLayout, FOUR_LEVEL_48, TWO_LEVEL_32};
pub use mappings::{report, MappingReport, PageMapping, ReportError};
pub use paging::{walk_create, PageTableWalker, WalkError};
pub use phys::{OffsetTables, TableMemory};
