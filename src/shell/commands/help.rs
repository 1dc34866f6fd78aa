use core::fmt::Write;

use super::COMMANDS;
use crate::shell::state::Machine;
use crate::shell::{CommandResult, Flow};

/// help — list every monitor command with its description.
pub fn run(_args: &[&str], _machine: &Machine, out: &mut dyn Write) -> CommandResult {
    for cmd in COMMANDS {
        writeln!(out, "{} - {}", cmd.name, cmd.desc)?;
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::fixture::Fixture;
    use alloc::string::String;

    #[test]
    fn lists_each_command_once() {
        let fixture = Fixture::new();
        let mut out = String::new();
        assert_eq!(run(&["help"], &fixture.machine(), &mut out), Ok(Flow::Continue));
        assert_eq!(out.lines().count(), COMMANDS.len());
        assert!(out.starts_with("help - Display this list of commands\n"));
        assert!(out.contains("showmappings - Display memory mappings"));
    }
}
