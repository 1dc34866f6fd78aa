use x86_64::PhysAddr;

use crate::debug::{StackMemory, SymbolResolver};
use crate::memory::{PagingLayout, TableMemory};

/// Addresses of the kernel image's special linker symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelSections {
    /// Physical load address of `_start`.
    pub start: usize,
    pub entry: usize,
    pub etext: usize,
    pub edata: usize,
    pub end: usize,
    /// Virtual base the kernel is linked at; virt - kernbase = phys.
    pub kernbase: usize,
}

/// Machine state handed to every command.
///
/// Captured once when the monitor is entered. The page-table root is passed
/// in here rather than read from CR3 by the commands themselves.
pub struct Machine<'a> {
    pub frame_pointer: usize,
    pub stack: &'a dyn StackMemory,
    pub page_table_root: PhysAddr,
    pub tables: &'a dyn TableMemory,
    pub layout: &'static PagingLayout,
    pub symbols: &'a dyn SymbolResolver,
    pub kernel: Option<KernelSections>,
}
