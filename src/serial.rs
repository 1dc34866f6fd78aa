#[cfg(not(test))]
use lazy_static::lazy_static;
#[cfg(not(test))]
use spin::Mutex;
use x86_64::instructions::port::Port;

/// COM1 base I/O port.
pub const COM1: u16 = 0x3F8;

const LSR_DATA_READY: u8 = 0x01;
const LSR_TX_EMPTY: u8 = 0x20;

pub struct SerialPort {
    data: Port<u8>,
    int_en: Port<u8>,
    fifo_ctrl: Port<u8>,
    line_ctrl: Port<u8>,
    modem_ctrl: Port<u8>,
    line_sts: Port<u8>,
}

impl SerialPort {
    pub unsafe fn new(base: u16) -> SerialPort {
        SerialPort {
            data: Port::new(base),
            int_en: Port::new(base + 1),
            fifo_ctrl: Port::new(base + 2),
            line_ctrl: Port::new(base + 3),
            modem_ctrl: Port::new(base + 4),
            line_sts: Port::new(base + 5),
        }
    }

    pub fn init(&mut self) {
        unsafe {
            self.int_en.write(0x00);
            self.line_ctrl.write(0x80);
            self.data.write(0x03);
            self.int_en.write(0x00);
            self.line_ctrl.write(0x03);
            self.fifo_ctrl.write(0xC7);
            self.modem_ctrl.write(0x0B);
            // The monitor polls for input, so receive interrupts stay off.
            self.int_en.write(0x00);
        }
    }

    fn line_status(&mut self) -> u8 {
        unsafe { self.line_sts.read() }
    }

    pub fn send(&mut self, data: u8) {
        while self.line_status() & LSR_TX_EMPTY == 0 {}
        unsafe {
            self.data.write(data);
        }
    }

    /// Non-blocking read of one received byte.
    pub fn try_receive(&mut self) -> Option<u8> {
        if self.line_status() & LSR_DATA_READY == 0 {
            return None;
        }
        Some(unsafe { self.data.read() })
    }

    /// Spin until a byte arrives on the line.
    pub fn receive(&mut self) -> u8 {
        loop {
            if let Some(byte) = self.try_receive() {
                return byte;
            }
            core::hint::spin_loop();
        }
    }
}

impl core::fmt::Write for SerialPort {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.send(b'\r');
            }
            self.send(byte);
        }
        Ok(())
    }
}

#[cfg(not(test))]
lazy_static! {
    pub static ref SERIAL1: Mutex<SerialPort> = {
        let mut serial_port = unsafe { SerialPort::new(COM1) };
        serial_port.init();
        Mutex::new(serial_port)
    };
}

#[doc(hidden)]
#[cfg(not(test))]
pub fn _print(args: ::core::fmt::Arguments) {
    use core::fmt::Write;
    // Logging must never take the session down, so a failed write is dropped.
    let _ = SERIAL1.lock().write_fmt(args);
}

// Host test builds have no COM1; port I/O would fault the test process.
#[doc(hidden)]
#[cfg(test)]
pub fn _print(args: ::core::fmt::Arguments) {
    std::eprint!("{}", args);
}

/// Console sink for monitor output, backed by COM1.
#[cfg(not(test))]
pub struct SerialConsole;

#[cfg(not(test))]
impl core::fmt::Write for SerialConsole {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        SERIAL1.lock().write_str(s)
    }
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::serial::_print(format_args!("[INFO] "));
        $crate::serial::_print(format_args!($($arg)*));
        $crate::serial::_print(format_args!("\n"));
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::serial::_print(format_args!("[WARN] "));
        $crate::serial::_print(format_args!($($arg)*));
        $crate::serial::_print(format_args!("\n"));
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::serial::_print(format_args!("[ERROR] "));
        $crate::serial::_print(format_args!($($arg)*));
        $crate::serial::_print(format_args!("\n"));
    };
}

#[cfg(not(test))]
pub fn init() {
    let _ = SERIAL1.lock();
}
