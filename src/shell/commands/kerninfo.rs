use core::fmt::Write;

use crate::shell::state::Machine;
use crate::shell::{CommandResult, Flow};

/// kerninfo — show where the kernel image sits and how large it is.
pub fn run(_args: &[&str], machine: &Machine, out: &mut dyn Write) -> CommandResult {
    let Some(k) = machine.kernel else {
        writeln!(out, "kerninfo: kernel image layout unavailable")?;
        return Ok(Flow::Continue);
    };

    let phys = |virt: usize| virt.wrapping_sub(k.kernbase);
    writeln!(out, "Special kernel symbols:")?;
    writeln!(out, "  _start                  {:08x} (phys)", k.start)?;
    writeln!(out, "  entry  {:08x} (virt)  {:08x} (phys)", k.entry, phys(k.entry))?;
    writeln!(out, "  etext  {:08x} (virt)  {:08x} (phys)", k.etext, phys(k.etext))?;
    writeln!(out, "  edata  {:08x} (virt)  {:08x} (phys)", k.edata, phys(k.edata))?;
    writeln!(out, "  end    {:08x} (virt)  {:08x} (phys)", k.end, phys(k.end))?;

    let footprint = k.end.saturating_sub(k.entry);
    writeln!(out, "Kernel executable memory footprint: {}KB", footprint.div_ceil(1024))?;
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::fixture::Fixture;
    use crate::shell::state::KernelSections;
    use alloc::string::String;
    use pretty_assertions::assert_eq;

    #[test]
    fn prints_sections_and_rounded_footprint() {
        let mut fixture = Fixture::new();
        fixture.kernel = Some(KernelSections {
            start: 0x0010_000c,
            entry: 0xf010_000c,
            etext: 0xf010_1a05,
            edata: 0xf011_2300,
            end: 0xf011_2960,
            kernbase: 0xf000_0000,
        });
        let mut out = String::new();
        run(&["kerninfo"], &fixture.machine(), &mut out).unwrap();
        assert_eq!(
            out,
            "Special kernel symbols:\n\
             \x20 _start                  0010000c (phys)\n\
             \x20 entry  f010000c (virt)  0010000c (phys)\n\
             \x20 etext  f0101a05 (virt)  00101a05 (phys)\n\
             \x20 edata  f0112300 (virt)  00112300 (phys)\n\
             \x20 end    f0112960 (virt)  00112960 (phys)\n\
             Kernel executable memory footprint: 75KB\n"
        );
    }

    #[test]
    fn missing_layout_is_reported() {
        let fixture = Fixture::new();
        let mut out = String::new();
        assert_eq!(run(&["kerninfo"], &fixture.machine(), &mut out), Ok(Flow::Continue));
        assert_eq!(out, "kerninfo: kernel image layout unavailable\n");
    }
}
