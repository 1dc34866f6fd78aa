use core::fmt::Write;

use crate::shell::state::Machine;
use crate::shell::{CommandResult, Flow};

/// exit — hand control back to the kernel.
pub fn run(_args: &[&str], _machine: &Machine, _out: &mut dyn Write) -> CommandResult {
    Ok(Flow::Exit)
}
