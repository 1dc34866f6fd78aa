//! AtomicOS kernel monitor: an interactive serial shell for inspecting the
//! live call stack and the active page tables.
//!
//! Everything here only reads machine state. The stack unwinder and the page
//! table walker go through narrow memory-access traits, so the same code runs
//! against real memory in the kernel and against fakes in host tests.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod serial;
pub mod debug;
pub mod memory;
pub mod shell;

#[cfg(all(target_arch = "x86_64", not(test)))]
pub mod arch;

pub use shell::state::{KernelSections, Machine};
pub use shell::{Flow, Monitor, MonitorConfig};
