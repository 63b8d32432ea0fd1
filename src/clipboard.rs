use std::io::Write;

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), String>;
}

/// Pipes the copied text to stdout, e.g. `kalita-billing qr --copy | xclip`.
pub struct StdoutClipboard;

impl Clipboard for StdoutClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), String> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{text}").map_err(|err| err.to_string())?;
        handle.flush().map_err(|err| err.to_string())
    }
}
