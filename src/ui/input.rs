//! # Input decoding
//!
//! Turns the raw byte stream of a terminal in raw mode into [`InputEvent`]s.
//!
//! ## Grammar
//!
//! ```text
//! event   := ESC escape | CR | LF | DEL | BS | byte
//! escape  := <timeout>                      -> Escape
//!          | '[' csi                        -> see below
//!          | 'O' ('A'|'B'|'C'|'D')          -> arrows (application mode)
//! csi     := params* final                  -> arrows, Home/End, PgUp/PgDn
//!          | '<' num ';' num ';' num ('M'|'m')   -> SGR mouse report
//! ```
//!
//! The first byte of an event is read with a blocking read; that is the only
//! place the event loop waits indefinitely. Bytes after an `ESC` are read
//! with a short per-byte timeout so a bare Escape key press is not mistaken
//! for the start of a sequence. A sequence that stalls, overflows or does
//! not match the grammar decodes to [`InputEvent::Unrecognized`].

use std::collections::VecDeque;
use std::io::{self, Read};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

const ESC: u8 = 0x1b;

/// How long to wait for each continuation byte of an escape sequence.
pub const ESCAPE_TIMEOUT: Duration = Duration::from_millis(25);

/// Longest CSI body that is kept for decoding. Longer ones are drained and
/// reported as unrecognized.
const MAX_CSI_LEN: usize = 32;

/// Keys that arrive as escape sequences or control bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedKey {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Escape,
    Backspace,
}

/// A decoded SGR (`ESC [ < b ; x ; y M`) mouse report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// Raw button code, modifier and motion bits included.
    pub button: u16,
    /// 1-based column.
    pub x: u16,
    /// 1-based row.
    pub y: u16,
    /// `M` (press) rather than `m` (release).
    pub is_press: bool,
}

impl MouseEvent {
    pub const PRIMARY: u16 = 0;
    pub const WHEEL_UP: u16 = 64;
    pub const WHEEL_DOWN: u16 = 65;

    pub fn is_primary_press(&self) -> bool {
        self.is_press && self.button == Self::PRIMARY
    }

    /// `-1` for wheel up, `1` for wheel down.
    pub fn wheel_delta(&self) -> Option<isize> {
        match self.button {
            Self::WHEEL_UP => Some(-1),
            Self::WHEEL_DOWN => Some(1),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(u8),
    Named(NamedKey),
    Mouse(MouseEvent),
    Unrecognized,
}

/// Where decoder bytes come from.
pub trait ByteSource {
    /// Block until a byte is available. `None` once input is closed.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Wait at most `timeout` for a byte. `None` if none arrived in time or
    /// input is closed.
    fn read_byte_timeout(&mut self, timeout: Duration) -> io::Result<Option<u8>>;
}

/// Bytes from standard input.
///
/// A reader thread forwards stdin into a channel so continuation bytes can be
/// awaited with a timeout. The thread only performs blocking reads and exits
/// when stdin closes.
pub struct StdinBytes {
    rx: Receiver<io::Result<u8>>,
}

impl StdinBytes {
    pub fn spawn() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || {
                let mut stdin = io::stdin().lock();
                let mut buf = [0u8; 64];
                loop {
                    match stdin.read(&mut buf) {
                        Ok(0) => break,
                        Ok(n) => {
                            if buf[..n].iter().any(|&b| tx.send(Ok(b)).is_err()) {
                                break;
                            }
                        }
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                        Err(e) => {
                            let _ = tx.send(Err(e));
                            break;
                        }
                    }
                }
            })?;
        Ok(Self { rx })
    }
}

impl ByteSource for StdinBytes {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        match self.rx.recv() {
            Ok(byte) => byte.map(Some),
            Err(_) => Ok(None),
        }
    }

    fn read_byte_timeout(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        match self.rx.recv_timeout(timeout) {
            Ok(byte) => byte.map(Some),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => Ok(None),
        }
    }
}

/// Replays a recorded byte stream.
///
/// `None` entries stand for a pause longer than the escape timeout: a
/// timed read returns `None` and consumes the pause, a blocking read skips
/// over it.
#[derive(Debug, Default)]
pub struct ReplayBytes {
    script: VecDeque<Option<u8>>,
}

impl ReplayBytes {
    pub fn new(bytes: &[u8]) -> Self {
        let mut replay = Self::default();
        replay.push(bytes);
        replay
    }

    /// Append bytes that arrive back to back.
    pub fn push(&mut self, bytes: &[u8]) -> &mut Self {
        self.script.extend(bytes.iter().copied().map(Some));
        self
    }

    /// Append a pause.
    pub fn pause(&mut self) -> &mut Self {
        self.script.push_back(None);
        self
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.script.iter().all(Option::is_none)
    }
}

impl ByteSource for ReplayBytes {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        while let Some(entry) = self.script.pop_front() {
            if entry.is_some() {
                return Ok(entry);
            }
        }
        Ok(None)
    }

    fn read_byte_timeout(&mut self, _timeout: Duration) -> io::Result<Option<u8>> {
        Ok(self.script.pop_front().flatten())
    }
}

/// Byte-level state machine producing one [`InputEvent`] per call.
pub struct InputDecoder<S> {
    source: S,
    escape_timeout: Duration,
}

impl<S: ByteSource> InputDecoder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            escape_timeout: ESCAPE_TIMEOUT,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Next event, or `None` once input is closed.
    pub fn next_event(&mut self) -> io::Result<Option<InputEvent>> {
        let Some(byte) = self.source.read_byte()? else {
            return Ok(None);
        };
        let event = match byte {
            ESC => self.decode_escape()?,
            b'\r' | b'\n' => InputEvent::Named(NamedKey::Enter),
            0x7f | 0x08 => InputEvent::Named(NamedKey::Backspace),
            other => InputEvent::Key(other),
        };
        Ok(Some(event))
    }

    fn continuation(&mut self) -> io::Result<Option<u8>> {
        self.source.read_byte_timeout(self.escape_timeout)
    }

    fn decode_escape(&mut self) -> io::Result<InputEvent> {
        match self.continuation()? {
            None => Ok(InputEvent::Named(NamedKey::Escape)),
            Some(b'[') => self.decode_csi(),
            Some(b'O') => Ok(match self.continuation()? {
                Some(b'A') => InputEvent::Named(NamedKey::Up),
                Some(b'B') => InputEvent::Named(NamedKey::Down),
                Some(b'C') => InputEvent::Named(NamedKey::Right),
                Some(b'D') => InputEvent::Named(NamedKey::Left),
                _ => InputEvent::Unrecognized,
            }),
            Some(_) => Ok(InputEvent::Unrecognized),
        }
    }

    fn decode_csi(&mut self) -> io::Result<InputEvent> {
        let mut body = Vec::with_capacity(16);
        let mut overflow = false;
        loop {
            let Some(byte) = self.continuation()? else {
                return Ok(InputEvent::Unrecognized);
            };
            if overflow {
                if is_final_byte(byte) {
                    return Ok(InputEvent::Unrecognized);
                }
                continue;
            }
            body.push(byte);
            if terminates(&body) {
                return Ok(decode_csi_body(&body));
            }
            overflow = body.len() >= MAX_CSI_LEN;
        }
    }
}

fn is_final_byte(byte: u8) -> bool {
    (0x40..=0x7e).contains(&byte)
}

/// Mouse reports only end on `M`/`m`, so a stray letter inside one does not
/// cut it short and leak the rest of the report as key presses.
fn terminates(body: &[u8]) -> bool {
    match body {
        [b'<'] | [] => false,
        [b'<', .., last] => matches!(last, b'M' | b'm'),
        [.., last] => is_final_byte(*last),
    }
}

/// Decode the part of a CSI sequence after `ESC [`, final byte included.
pub fn decode_csi_body(body: &[u8]) -> InputEvent {
    let key = match body {
        b"A" => NamedKey::Up,
        b"B" => NamedKey::Down,
        b"C" => NamedKey::Right,
        b"D" => NamedKey::Left,
        b"H" | b"1~" => NamedKey::Home,
        b"F" | b"4~" => NamedKey::End,
        b"5~" => NamedKey::PageUp,
        b"6~" => NamedKey::PageDown,
        [b'<', mouse @ ..] => {
            return parse_sgr_mouse(mouse).map_or(InputEvent::Unrecognized, InputEvent::Mouse)
        }
        _ => return InputEvent::Unrecognized,
    };
    InputEvent::Named(key)
}

/// Parse an SGR mouse body such as `0;5;7M` (the part after `ESC [ <`).
pub fn parse_sgr_mouse(body: &[u8]) -> Option<MouseEvent> {
    let (&last, fields) = body.split_last()?;
    let is_press = match last {
        b'M' => true,
        b'm' => false,
        _ => return None,
    };

    let mut parts = fields.split(|&b| b == b';');
    let button = parse_number(parts.next()?)?;
    let x = parse_number(parts.next()?)?;
    let y = parse_number(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }

    Some(MouseEvent {
        button,
        x,
        y,
        is_press,
    })
}

fn parse_number(field: &[u8]) -> Option<u16> {
    if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(field).ok()?.parse().ok()
}
