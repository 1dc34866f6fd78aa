//! Hooks into the live x86_64 machine. Kernel builds only.

use core::arch::asm;

use crate::debug::{RawStack, SymbolResolver};
use crate::memory::paging::active_root;
use crate::memory::{OffsetTables, FOUR_LEVEL_48};
use crate::serial::SerialConsole;
use crate::shell::readline::SerialLineReader;
use crate::shell::state::{KernelSections, Machine};
use crate::shell::{Monitor, MonitorConfig};

/// Current value of RBP. Needs the kernel built with frame pointers
/// (`-C force-frame-pointers=yes`), otherwise the chain is meaningless.
#[inline(always)]
pub fn read_frame_pointer() -> usize {
    let rbp: usize;
    unsafe {
        asm!("mov {}, rbp", out(reg) rbp, options(nomem, nostack, preserves_flags));
    }
    rbp
}

/// Run the monitor on COM1 until the user types `exit`.
///
/// Interrupts stay masked for the whole session, so nothing else touches the
/// stack or the page tables while they are being inspected.
pub fn enter_monitor(symbols: &dyn SymbolResolver, kernel: Option<KernelSections>) {
    crate::serial::init();
    x86_64::instructions::interrupts::without_interrupts(|| {
        let stack = RawStack;
        // Low memory is identity mapped, so physical addresses are usable as-is.
        let tables = unsafe { OffsetTables::new(0) };
        let machine = Machine {
            frame_pointer: read_frame_pointer(),
            stack: &stack,
            page_table_root: active_root(),
            tables: &tables,
            layout: &FOUR_LEVEL_48,
            symbols,
            kernel,
        };

        let config = MonitorConfig::default();
        let mut lines = SerialLineReader::new(config.line_capacity);
        if Monitor::new(config).run(&mut lines, &mut SerialConsole, &machine).is_err() {
            crate::log_error!("monitor: console write failed, leaving session");
        }
    });
}
