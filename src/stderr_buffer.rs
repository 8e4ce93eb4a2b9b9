use std::io::{self, Write};
use std::sync::Mutex;

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

/// Activate buffering. While active, log lines are stored instead of
/// being printed over the terminal UI.
pub fn activate() {
    if let Ok(mut guard) = BUFFER.lock() {
        *guard = Some(Vec::new());
    }
}

/// Deactivate buffering and return all collected lines.
pub fn drain() -> Vec<String> {
    BUFFER
        .lock()
        .map(|mut guard| guard.take().unwrap_or_default())
        .unwrap_or_default()
}

pub fn is_active() -> bool {
    BUFFER.lock().map(|guard| guard.is_some()).unwrap_or(false)
}

/// Log writer handed to the tracing subscriber.
///
/// Each `write` call carries one formatted event. If buffering is active the
/// line is stored; otherwise it goes straight to stderr.
pub struct BufferedStderr;

pub fn writer() -> BufferedStderr {
    BufferedStderr
}

impl Write for BufferedStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = match BUFFER.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(lines) = guard.as_mut() {
            let text = String::from_utf8_lossy(buf);
            lines.push(text.trim_end_matches('\n').to_string());
            Ok(buf.len())
        } else {
            drop(guard);
            io::stderr().write(buf)
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}
