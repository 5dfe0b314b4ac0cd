//! Destination for output written by `echo` and `echod`.

use parking_lot::Mutex;

/// Where printed lines go. Enum dispatch; no trait objects.
#[derive(Default)]
pub enum PrintHandler {
    /// Write to stdout.
    #[default]
    Stdout,
    /// Collect into a buffer (tests, embedding).
    Buffer(Mutex<String>),
    /// Discard.
    Silent,
}

impl PrintHandler {
    pub fn buffer() -> Self {
        PrintHandler::Buffer(Mutex::new(String::new()))
    }

    pub fn println(&self, line: &str) {
        match self {
            PrintHandler::Stdout => println!("{line}"),
            PrintHandler::Buffer(buf) => {
                let mut buf = buf.lock();
                buf.push_str(line);
                buf.push('\n');
            }
            PrintHandler::Silent => {}
        }
    }

    /// Captured output; empty unless buffering.
    pub fn output(&self) -> String {
        match self {
            PrintHandler::Buffer(buf) => buf.lock().clone(),
            PrintHandler::Stdout | PrintHandler::Silent => String::new(),
        }
    }
}
