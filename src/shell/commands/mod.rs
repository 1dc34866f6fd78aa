pub mod backtrace;
pub mod exit;
pub mod help;
pub mod kerninfo;
pub mod showmappings;

use core::fmt::Write;

use super::state::Machine;
use super::CommandResult;

/// Handler signature: arguments (command name first), machine state, console.
pub type CommandFn = fn(&[&str], &Machine, &mut dyn Write) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub desc: &'static str,
    pub func: CommandFn,
}

/// Built-in monitor commands, in `help` order.
pub static COMMANDS: &[Command] = &[
    Command { name: "help",         desc: "Display this list of commands",                            func: help::run },
    Command { name: "kerninfo",     desc: "Display information about the kernel",                     func: kerninfo::run },
    Command { name: "backtrace",    desc: "Display a backtrace of the current call stack",           func: backtrace::run },
    Command { name: "showmappings", desc: "Display memory mappings for a range of virtual addresses", func: showmappings::run },
    Command { name: "exit",         desc: "Leave the monitor and resume the kernel",                  func: exit::run },
];

pub fn find(name: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|cmd| cmd.name == name)
}
