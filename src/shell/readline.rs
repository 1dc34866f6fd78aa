use alloc::string::String;
use core::fmt::{self, Write};

/// Source of command lines; blocks until a full line is available.
pub trait LineSource {
    /// `None` once the source is exhausted and the session should end.
    fn read_line(&mut self) -> Option<String>;
}

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;
const KILL_LINE: u8 = 0x15;

/// Byte-at-a-time line editing with echo.
pub struct LineEditor {
    buffer: String,
    capacity: usize,
}

impl LineEditor {
    pub fn new(capacity: usize) -> Self {
        LineEditor { buffer: String::new(), capacity }
    }

    /// Feed one input byte. Returns the finished line on CR or LF.
    pub fn push(&mut self, byte: u8, echo: &mut dyn Write) -> Result<Option<String>, fmt::Error> {
        match byte {
            b'\r' | b'\n' => {
                echo.write_str("\n")?;
                return Ok(Some(core::mem::take(&mut self.buffer)));
            }
            BACKSPACE | DELETE => {
                if self.buffer.pop().is_some() {
                    echo.write_str("\x08 \x08")?;
                }
            }
            KILL_LINE => {
                while self.buffer.pop().is_some() {
                    echo.write_str("\x08 \x08")?;
                }
            }
            0x20..=0x7E => {
                if self.buffer.len() < self.capacity {
                    self.buffer.push(byte as char);
                    echo.write_char(byte as char)?;
                }
            }
            _ => {}
        }
        Ok(None)
    }
}

/// Polls COM1 for keystrokes and echoes them back.
#[cfg(not(test))]
pub struct SerialLineReader {
    editor: LineEditor,
}

#[cfg(not(test))]
impl SerialLineReader {
    pub fn new(capacity: usize) -> Self {
        SerialLineReader { editor: LineEditor::new(capacity) }
    }
}

#[cfg(not(test))]
impl LineSource for SerialLineReader {
    fn read_line(&mut self) -> Option<String> {
        let mut console = crate::serial::SerialConsole;
        loop {
            let byte = crate::serial::SERIAL1.lock().receive();
            match self.editor.push(byte, &mut console) {
                Ok(Some(line)) => return Some(line),
                Ok(None) => {}
                Err(_) => return None,
            }
        }
    }
}
