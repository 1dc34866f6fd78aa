/// Word-granular reads of stack memory.
///
/// This is the only place the unwinder touches memory; everything past it
/// works on values already read.
pub trait StackMemory {
    fn read_word(&self, addr: usize) -> usize;
}

/// Reads straight from the current address space.
///
/// No validation is done: a corrupt frame-pointer chain makes this read
/// wherever the chain points and can fault the whole session.
pub struct RawStack;

impl StackMemory for RawStack {
    fn read_word(&self, addr: usize) -> usize {
        unsafe { core::ptr::read_volatile(addr as *const usize) }
    }
}
