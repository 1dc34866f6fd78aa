use core::mem::size_of;

use super::stack::StackMemory;
use super::symbols::{SymbolInfo, SymbolResolver};

const WORD: usize = size_of::<usize>();

/// Words shown as "arguments" after each return address.
pub const ARG_WINDOW: usize = 5;

/// One activation record, as read from the frame-pointer chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub frame_pointer: usize,
    pub return_address: usize,
    /// The words just above the return address. Only meaningful when the
    /// caller passed arguments on the stack; otherwise whatever was there.
    pub arguments: [usize; ARG_WINDOW],
}

/// Lazy walk of saved frame pointers, innermost frame first.
///
/// `[fp]` holds the caller's saved frame pointer and `[fp + WORD]` the
/// return address into the caller. The walk ends when a saved frame pointer
/// reads as zero. There is no depth cap and no cycle check: a corrupt chain
/// loops forever or reads wild memory.
pub struct Backtrace<'a, S: ?Sized, R: ?Sized> {
    stack: &'a S,
    symbols: &'a R,
    frame_pointer: usize,
}

pub fn unwind<'a, S, R>(stack: &'a S, symbols: &'a R, start_frame_pointer: usize) -> Backtrace<'a, S, R>
where
    S: StackMemory + ?Sized,
    R: SymbolResolver + ?Sized,
{
    Backtrace { stack, symbols, frame_pointer: start_frame_pointer }
}

impl<'a, S, R> Backtrace<'a, S, R>
where
    S: StackMemory + ?Sized,
    R: SymbolResolver + ?Sized,
{
    fn read_frame(&self, fp: usize) -> (Frame, usize) {
        let word = |slot: usize| self.stack.read_word(fp.wrapping_add(slot * WORD));
        let mut arguments = [0; ARG_WINDOW];
        for (i, arg) in arguments.iter_mut().enumerate() {
            *arg = word(2 + i);
        }
        let frame = Frame { frame_pointer: fp, return_address: word(1), arguments };
        (frame, word(0))
    }
}

impl<'a, S, R> Iterator for Backtrace<'a, S, R>
where
    S: StackMemory + ?Sized,
    R: SymbolResolver + ?Sized,
{
    type Item = (Frame, Option<SymbolInfo<'a>>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.frame_pointer == 0 {
            return None;
        }
        let (frame, saved) = self.read_frame(self.frame_pointer);
        self.frame_pointer = saved;
        let symbols: &'a R = self.symbols;
        Some((frame, symbols.resolve(frame.return_address).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::stack::fake::FakeStack;
    use crate::debug::stack::RawStack;
    use crate::debug::symbols::fixtures;
    use crate::debug::symbols::NoSymbols;
    use alloc::vec;
    use alloc::vec::Vec;

    /// Lay out `frames` (return addresses, innermost first) as a linked chain.
    fn chain(returns: &[usize]) -> (FakeStack, usize) {
        let mut stack = FakeStack::default();
        let base = 0x8000;
        let stride = 8 * WORD;
        for (i, &ret) in returns.iter().enumerate() {
            let fp = base + i * stride;
            let saved = if i + 1 == returns.len() { 0 } else { fp + stride };
            stack.set(fp, saved);
            stack.set(fp + WORD, ret);
            for a in 0..ARG_WINDOW {
                stack.set(fp + (2 + a) * WORD, 0x100 * (i + 1) + a);
            }
        }
        (stack, base)
    }

    #[test]
    fn yields_every_frame_innermost_first() {
        let (stack, start) = chain(&[0x1115, 0x1010, 0x9999]);
        let frames: Vec<_> = unwind(&stack, &NoSymbols, start).map(|(frame, _)| frame).collect();
        assert_eq!(frames.len(), 3);
        assert_eq!(
            frames.iter().map(|f| f.return_address).collect::<Vec<_>>(),
            vec![0x1115, 0x1010, 0x9999]
        );
        assert!(frames.windows(2).all(|w| w[0].frame_pointer < w[1].frame_pointer));
        assert_eq!(frames[0].frame_pointer, start);
        assert_eq!(frames[1].arguments, [0x200, 0x201, 0x202, 0x203, 0x204]);
    }

    #[test]
    fn frame_count_does_not_depend_on_symbols() {
        let (stack, start) = chain(&[0x1115, 0x1010, 0x9999, 0x1170]);
        let symbols = fixtures::table();
        let resolved: Vec<_> = unwind(&stack, &symbols, start).collect();
        assert_eq!(resolved.len(), 4);
        assert_eq!(unwind(&stack, &NoSymbols, start).count(), 4);

        let names: Vec<_> = resolved.iter().map(|(_, sym)| sym.map(|s| s.function_name())).collect();
        assert_eq!(names, vec![Some("monitor"), Some("kernel_main"), None, Some("run_command")]);
        let monitor = resolved[0].1.unwrap();
        assert_eq!((monitor.file, monitor.line), ("src/shell/mod.rs", 174));
    }

    #[test]
    fn zero_start_yields_nothing() {
        let stack = FakeStack::default();
        assert_eq!(unwind(&stack, &NoSymbols, 0).count(), 0);
    }

    #[test]
    fn unwinds_a_chain_in_real_memory() {
        // Two frames laid out in a real buffer, read back through RawStack.
        let mut buf = [0usize; 16];
        let base = buf.as_ptr() as usize;
        buf[0] = base + 8 * WORD;
        buf[1] = 0xAAAA;
        buf[2..7].copy_from_slice(&[1, 2, 3, 4, 5]);
        buf[8] = 0;
        buf[9] = 0xBBBB;
        // The writes above are only observed through raw reads, so keep them.
        let buf = core::hint::black_box(&buf);
        assert_eq!(buf.as_ptr() as usize, base);

        let frames: Vec<_> = unwind(&RawStack, &NoSymbols, base).map(|(frame, _)| frame).collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].return_address, 0xAAAA);
        assert_eq!(frames[0].arguments, [1, 2, 3, 4, 5]);
        assert_eq!(frames[1].frame_pointer, base + 8 * WORD);
        assert_eq!(frames[1].return_address, 0xBBBB);
    }
}
