use core::fmt::Write;

use crate::memory::{report, ReportError};
use crate::shell::parse::parse_address;
use crate::shell::state::Machine;
use crate::shell::{CommandResult, Flow};

/// showmappings <begin_va> <end_va> — print the mapping of each page in the range.
pub fn run(args: &[&str], machine: &Machine, out: &mut dyn Write) -> CommandResult {
    if args.len() != 3 {
        writeln!(out, "usage: showmappings begin_va end_va")?;
        return Ok(Flow::Continue);
    }

    let mut range = [0u64; 2];
    for (slot, arg) in range.iter_mut().zip(&args[1..]) {
        match parse_address(arg) {
            Ok(va) => *slot = va,
            Err(err) => {
                writeln!(out, "showmappings: invalid address '{}': {}", arg, err)?;
                return Ok(Flow::Continue);
            }
        }
    }
    let [begin, end] = range;

    let pages = match report(machine.tables, machine.layout, machine.page_table_root, begin, end) {
        Ok(pages) => pages,
        Err(err @ ReportError::Inverted { .. }) => {
            writeln!(out, "{}", err)?;
            return Ok(Flow::Continue);
        }
        Err(err) => {
            writeln!(out, "showmappings: {}", err)?;
            return Ok(Flow::Continue);
        }
    };

    for page in pages {
        writeln!(out, "{}", page)?;
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::fixture::Fixture;
    use alloc::string::String;
    use pretty_assertions::assert_eq;

    fn show(fixture: &Fixture, args: &[&str]) -> String {
        let mut out = String::new();
        assert_eq!(run(args, &fixture.machine(), &mut out), Ok(Flow::Continue));
        out
    }

    #[test]
    fn reports_mapped_and_unmapped_pages() {
        let fixture = Fixture::new();
        assert_eq!(
            show(&fixture, &["showmappings", "0xf0000000", "0xf0002000"]),
            "va 0xf0000000: 0x123000 PTE_P 1 PTE_W 0 PTE_U 1\n\
             va 0xf0001000: 0x124000 PTE_P 1 PTE_W 1 PTE_U 1\n\
             va 0xf0002000 is not mapped\n"
        );
    }

    #[test]
    fn wrong_argument_count_prints_usage() {
        let fixture = Fixture::new();
        let usage = "usage: showmappings begin_va end_va\n";
        assert_eq!(show(&fixture, &["showmappings"]), usage);
        assert_eq!(show(&fixture, &["showmappings", "0x1000"]), usage);
        assert_eq!(show(&fixture, &["showmappings", "1", "2", "3"]), usage);
    }

    #[test]
    fn inverted_range_prints_single_error() {
        let fixture = Fixture::new();
        assert_eq!(
            show(&fixture, &["showmappings", "0xf0001000", "0xf0000000"]),
            "begin va (0xf0001000) is greater than end va (0xf0000000)\n"
        );
    }

    #[test]
    fn bad_number_is_a_user_error() {
        let fixture = Fixture::new();
        assert_eq!(
            show(&fixture, &["showmappings", "0xzz", "0x1000"]),
            "showmappings: invalid address '0xzz': invalid digit\n"
        );
    }

    #[test]
    fn octal_and_decimal_arguments() {
        let fixture = Fixture::new();
        assert_eq!(show(&fixture, &["showmappings", "010000", "4096"]), "va 0x1000 is not mapped\n");
    }

    #[test]
    fn out_of_range_address_is_rejected() {
        let fixture = Fixture::new();
        assert_eq!(
            show(&fixture, &["showmappings", "0", "0x100000000"]),
            "showmappings: va 0x100000000 is outside the translated address space\n"
        );
    }
}
