use core::fmt::Write;
use core::mem::size_of;

use crate::debug::unwind;
use crate::shell::state::Machine;
use crate::shell::{CommandResult, Flow};

const WIDTH: usize = 2 * size_of::<usize>();

#[cfg(target_pointer_width = "64")]
const REGS: (&str, &str) = ("rbp", "rip");
#[cfg(not(target_pointer_width = "64"))]
const REGS: (&str, &str) = ("ebp", "eip");

/// backtrace — walk the frame-pointer chain from the monitor's entry frame.
pub fn run(_args: &[&str], machine: &Machine, out: &mut dyn Write) -> CommandResult {
    writeln!(out, "Stack backtrace:")?;
    for (frame, symbol) in unwind(machine.stack, machine.symbols, machine.frame_pointer) {
        write!(
            out,
            "  {} {:0w$x} {} {:0w$x} args",
            REGS.0,
            frame.frame_pointer,
            REGS.1,
            frame.return_address,
            w = WIDTH
        )?;
        for arg in frame.arguments {
            write!(out, " {:0w$x}", arg, w = WIDTH)?;
        }
        writeln!(out)?;

        if let Some(sym) = symbol {
            writeln!(
                out,
                "\t{}:{}: {:.len$}+{}",
                sym.file,
                sym.line,
                sym.name,
                sym.offset_of(frame.return_address),
                len = sym.name_len
            )?;
        }
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::fixture::Fixture;
    use alloc::string::String;
    use alloc::vec::Vec;

    #[test]
    fn prints_frames_with_symbol_lines() {
        let mut fixture = Fixture::new();
        let start = fixture.push_chain(&[0x1115, 0x9999, 0x1010]);
        fixture.frame_pointer = start;

        let mut out = String::new();
        assert_eq!(run(&["backtrace"], &fixture.machine(), &mut out), Ok(Flow::Continue));
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Stack backtrace:");
        assert_eq!(
            lines[1],
            "  rbp 0000000000008000 rip 0000000000001115 args \
             0000000000000100 0000000000000101 0000000000000102 0000000000000103 0000000000000104"
        );
        assert_eq!(lines[2], "\tsrc/shell/mod.rs:174: monitor+21");
        // 0x9999 is outside every function: raw line only.
        assert!(lines[3].starts_with("  rbp 0000000000008040 rip 0000000000009999"));
        assert!(lines[4].starts_with("  rbp 0000000000008080 rip 0000000000001010"));
        assert_eq!(lines[5], "\tsrc/lib.rs:14: kernel_main+16");
    }

    #[test]
    fn empty_chain_prints_header_only() {
        let fixture = Fixture::new();
        let mut out = String::new();
        run(&["backtrace"], &fixture.machine(), &mut out).unwrap();
        assert_eq!(out, "Stack backtrace:\n");
    }
}
