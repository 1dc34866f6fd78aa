pub mod commands;
pub mod parse;
pub mod readline;
pub mod state;

use alloc::vec::Vec;
use core::fmt::{self, Write};

use readline::LineSource;
use state::Machine;

/// What the monitor does after a command returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Leave the monitor loop.
    Exit,
}

pub type CommandResult = Result<Flow, fmt::Error>;

const WHITESPACE: &[char] = &['\t', '\r', '\n', ' '];

pub struct MonitorConfig {
    pub prompt: &'static str,
    /// Token limit per line, command name included.
    pub max_args: usize,
    /// Longest line the editor accepts.
    pub line_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig { prompt: "K> ", max_args: 16, line_capacity: 80 }
    }
}

pub struct Monitor {
    config: MonitorConfig,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Self {
        Monitor { config }
    }

    /// Tokenize one input line and dispatch it.
    pub fn run_command(&self, line: &str, machine: &Machine, out: &mut dyn Write) -> CommandResult {
        let mut argv: Vec<&str> = Vec::new();
        for token in line.split(WHITESPACE).filter(|t| !t.is_empty()) {
            // One slot stays reserved, as in the C argv convention.
            if argv.len() + 1 >= self.config.max_args {
                writeln!(out, "Too many arguments (max {})", self.config.max_args)?;
                return Ok(Flow::Continue);
            }
            argv.push(token);
        }

        let Some(&name) = argv.first() else {
            return Ok(Flow::Continue);
        };
        match commands::find(name) {
            Some(cmd) => (cmd.func)(&argv, machine, out),
            None => {
                writeln!(out, "Unknown command '{}'", name)?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Read-eval loop. Returns after `exit` or once `lines` runs dry.
    pub fn run(&self, lines: &mut dyn LineSource, out: &mut dyn Write, machine: &Machine) -> fmt::Result {
        crate::log_info!("Kernel monitor entered ({} paging).", machine.layout.name);
        writeln!(out, "Welcome to the AtomicOS kernel monitor!")?;
        writeln!(out, "Type 'help' for a list of commands.")?;

        loop {
            write!(out, "{}", self.config.prompt)?;
            let Some(line) = lines.read_line() else {
                break;
            };
            if self.run_command(&line, machine, out)? == Flow::Exit {
                break;
            }
        }

        crate::log_info!("Kernel monitor left.");
        Ok(())
    }
}
