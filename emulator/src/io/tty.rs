
use std::collections::VecDeque;
use std::io::{self, IsTerminal, Read, Write, stdin, stdout};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

// Character device behind the keyboard registers and the I/O traps.
pub trait Tty: Send + Sync {
    // Writes and flushes.
    fn handle_output(&self, bytes: &[u8]) -> io::Result<()>;

    // Never blocks; None if nothing is pending.
    fn poll_input(&self) -> io::Result<Option<u8>>;

    // Blocks until a character arrives.
    fn read_input(&self) -> io::Result<u8>;
}

////////////////////////////////////////////////////////////////////////////////

// The process' terminal. When stdin is a terminal it is read through crossterm
// key events, which assumes the caller has put it in raw mode; otherwise a
// reader thread drains stdin into a channel, so polling never waits on the
// writer.
#[derive(Default, Debug)]
pub struct StdIo {
    piped: OnceLock<Mutex<Receiver<io::Result<u8>>>>,
}

impl StdIo {
    fn interactive() -> bool {
        stdin().is_terminal()
    }

    fn raw() -> bool {
        terminal::is_raw_mode_enabled().unwrap_or(false)
    }

    // Translate a key event into the byte a terminal line would carry.
    fn key_byte(event: Event) -> io::Result<Option<u8>> {
        let Event::Key(KeyEvent { code, modifiers, kind, .. }) = event else {
            return Ok(None);
        };
        if kind == KeyEventKind::Release {
            return Ok(None);
        }

        let byte = match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted"));
            }
            KeyCode::Char(ch) if modifiers.contains(KeyModifiers::CONTROL) && ch.is_ascii_alphabetic() => {
                Some(ch.to_ascii_lowercase() as u8 & 0x1f)
            }
            KeyCode::Char(ch) if ch.is_ascii() => Some(ch as u8),
            KeyCode::Enter => Some(b'\n'),
            KeyCode::Tab => Some(b'\t'),
            KeyCode::Backspace => Some(0x08),
            KeyCode::Esc => Some(0x1b),
            _ => None,
        };
        Ok(byte)
    }

    // Started on first use. The channel disconnects once stdin hits EOF or
    // fails, after forwarding the error.
    fn piped(&self) -> MutexGuard<'_, Receiver<io::Result<u8>>> {
        let rx = self.piped.get_or_init(|| {
            let (tx, rx) = mpsc::channel();
            thread::spawn(move || {
                let mut stdin = stdin().lock();
                let mut buf = [0u8; 1];
                loop {
                    let res = match stdin.read(&mut buf) {
                        Ok(0) => break,
                        Ok(_) => Ok(buf[0]),
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Err(e) => Err(e),
                    };
                    let failed = res.is_err();
                    if tx.send(res).is_err() || failed {
                        break;
                    }
                }
            });
            Mutex::new(rx)
        });
        lock(rx)
    }
}

fn end_of_input() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "end of input")
}

impl Tty for StdIo {
    fn handle_output(&self, bytes: &[u8]) -> io::Result<()> {
        let mut out = stdout().lock();
        if Self::raw() {
            // Raw mode turns off output post-processing.
            for line in bytes.split_inclusive(|b| *b == b'\n') {
                match line.split_last() {
                    Some((&b'\n', rest)) => {
                        out.write_all(rest)?;
                        out.write_all(b"\r\n")?;
                    }
                    _ => out.write_all(line)?,
                }
            }
        } else {
            out.write_all(bytes)?;
        }
        out.flush()
    }

    fn poll_input(&self) -> io::Result<Option<u8>> {
        if !Self::interactive() {
            return match self.piped().try_recv() {
                Ok(res) => res.map(Some),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => Ok(None),
            };
        }
        while event::poll(Duration::ZERO)? {
            if let Some(byte) = Self::key_byte(event::read()?)? {
                return Ok(Some(byte));
            }
        }
        Ok(None)
    }

    fn read_input(&self) -> io::Result<u8> {
        if !Self::interactive() {
            return self.piped().recv().unwrap_or_else(|_| Err(end_of_input()));
        }
        loop {
            if let Some(byte) = Self::key_byte(event::read()?)? {
                return Ok(byte);
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

// In-memory device, for tests and embedding.
#[derive(Default)]
pub struct PipeTty {
    out_buf: Mutex<VecDeque<u8>>,
    in_buf: Mutex<VecDeque<u8>>,
}

// The buffers hold plain bytes, so a panic elsewhere can't leave them
// inconsistent.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PipeTty {
    pub fn take_output(&self) -> VecDeque<u8> {
        std::mem::take(&mut *lock(&self.out_buf))
    }

    pub fn output_string(&self) -> String {
        let buf = self.take_output();
        String::from_utf8_lossy(&Vec::from(buf)).into_owned()
    }

    pub fn is_out_empty(&self) -> bool {
        lock(&self.out_buf).is_empty()
    }

    pub fn push_input(&self, val: u8) {
        lock(&self.in_buf).push_back(val);
    }

    pub fn write_input(&self, vals: &[u8]) {
        lock(&self.in_buf).extend(vals);
    }
}

impl Tty for PipeTty {
    fn handle_output(&self, bytes: &[u8]) -> io::Result<()> {
        lock(&self.out_buf).extend(bytes);
        Ok(())
    }

    fn poll_input(&self) -> io::Result<Option<u8>> {
        Ok(lock(&self.in_buf).pop_front())
    }

    // There is no writer to wait for, so running dry is end of input.
    fn read_input(&self) -> io::Result<u8> {
        lock(&self.in_buf)
            .pop_front()
            .ok_or_else(end_of_input)
    }
}
