//! Non-blocking keyboard input from a raw-mode terminal.

use std::collections::VecDeque;
use std::io::{self, Read};

use crate::error::DevError;
use crate::terminal::RawTerminal;

const ESC: u8 = 0x1b;
const READ_CHUNK: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Escape,
    Enter,
    Space,
    Backspace,
    Tab,
    Home,
    End,
    PageUp,
    PageDown,
    Delete,
    /// Ctrl-C, delivered as a byte since signals are off in raw mode.
    Interrupt,
    Char(char),
}

impl Key {
    /// Equality where letters match regardless of case.
    pub fn matches(self, other: Key) -> bool {
        match (self, other) {
            (Key::Char(a), Key::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        }
    }
}

/// Decode a chunk of raw terminal input into keys.
pub fn parse_keys(input: &[u8]) -> Vec<Key> {
    let mut keys = Vec::new();
    let mut i = 0;
    while i < input.len() {
        let b = input[i];
        i += 1;
        let key = match b {
            ESC => match input.get(i) {
                Some(b'[') => {
                    let (key, used) = parse_csi(&input[i + 1..]);
                    i += 1 + used;
                    key
                }
                Some(b'O') => match input.get(i + 1).copied().and_then(ss3_key) {
                    Some(key) => {
                        i += 2;
                        Some(key)
                    }
                    None => Some(Key::Escape),
                },
                _ => Some(Key::Escape),
            },
            b'\r' | b'\n' => Some(Key::Enter),
            b' ' => Some(Key::Space),
            b'\t' => Some(Key::Tab),
            0x7f | 0x08 => Some(Key::Backspace),
            0x03 => Some(Key::Interrupt),
            0x21..=0x7e => Some(Key::Char(b as char)),
            _ => None,
        };
        keys.extend(key);
    }
    keys
}

/// Parse what follows `ESC [`. Returns the key (if known) and bytes consumed.
fn parse_csi(rest: &[u8]) -> (Option<Key>, usize) {
    let params = rest
        .iter()
        .take_while(|b| (0x30..=0x3f).contains(*b))
        .count();
    let Some(&final_byte) = rest.get(params) else {
        // truncated sequence: swallow what is there
        return (None, rest.len());
    };
    if !(0x40..=0x7e).contains(&final_byte) {
        return (None, params);
    }
    let key = match final_byte {
        b'A' => Some(Key::Up),
        b'B' => Some(Key::Down),
        b'C' => Some(Key::Right),
        b'D' => Some(Key::Left),
        b'H' => Some(Key::Home),
        b'F' => Some(Key::End),
        b'~' => match &rest[..params] {
            b"1" | b"7" => Some(Key::Home),
            b"4" | b"8" => Some(Key::End),
            b"3" => Some(Key::Delete),
            b"5" => Some(Key::PageUp),
            b"6" => Some(Key::PageDown),
            _ => None,
        },
        _ => None,
    };
    (key, params + 1)
}

fn ss3_key(b: u8) -> Option<Key> {
    match b {
        b'A' => Some(Key::Up),
        b'B' => Some(Key::Down),
        b'C' => Some(Key::Right),
        b'D' => Some(Key::Left),
        b'H' => Some(Key::Home),
        b'F' => Some(Key::End),
        _ => None,
    }
}

/// Polled keyboard state.
///
/// `update()` once per frame and then ask `is_down()`, or drain events one
/// at a time with `get_key()`.
pub struct Keyboard<R = io::Stdin> {
    source: R,
    queue: VecDeque<Key>,
    down: Vec<Key>,
    _raw: Option<RawTerminal>,
}

impl Keyboard<io::Stdin> {
    /// Put stdin into raw mode and read keys from it.
    pub fn stdin() -> Result<Self, DevError> {
        let raw = RawTerminal::enable(libc::STDIN_FILENO)?;
        Ok(Self {
            source: io::stdin(),
            queue: VecDeque::new(),
            down: Vec::new(),
            _raw: Some(raw),
        })
    }
}

impl Keyboard<io::Cursor<Vec<u8>>> {
    /// A keyboard that replays a fixed byte stream.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::from_reader(io::Cursor::new(bytes.into()))
    }
}

impl<R: Read> Keyboard<R> {
    /// Read keys from any byte source. The source must not block when empty.
    pub fn from_reader(source: R) -> Self {
        Self {
            source,
            queue: VecDeque::new(),
            down: Vec::new(),
            _raw: None,
        }
    }

    /// Pull every pending byte from the source into the key queue.
    fn poll(&mut self) -> Result<usize, DevError> {
        let mut pending = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match self.source.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    pending.extend_from_slice(&chunk[..n]);
                    if n < chunk.len() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => return Err(DevError::Input(e)),
            }
        }
        let keys = parse_keys(&pending);
        let count = keys.len();
        self.queue.extend(keys);
        Ok(count)
    }

    /// Read pending input and make it the set of keys down this frame.
    pub fn update(&mut self) -> Result<(), DevError> {
        self.poll()?;
        self.down.clear();
        self.down.extend(self.queue.drain(..));
        Ok(())
    }

    /// Was `key` seen in the last `update()`?
    pub fn is_down(&self, key: Key) -> bool {
        self.down.iter().any(|k| k.matches(key))
    }

    /// Next pending key, without blocking.
    pub fn get_key(&mut self) -> Result<Option<Key>, DevError> {
        if self.queue.is_empty() {
            self.poll()?;
        }
        Ok(self.queue.pop_front())
    }

    /// Drain pending input and report whether Escape or Ctrl-C was in it.
    pub fn esc_pressed(&mut self) -> Result<bool, DevError> {
        self.poll()?;
        let quit = self
            .queue
            .drain(..)
            .any(|k| matches!(k, Key::Escape | Key::Interrupt));
        Ok(quit)
    }
}
