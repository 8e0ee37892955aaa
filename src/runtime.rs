use std::io::{self, Read};
use std::sync::mpsc::{self, Receiver, RecvError, RecvTimeoutError, SyncSender};
use std::thread;
use std::time::Duration;

/// Bounded queue between the stdin reader and the session loop. Typing
/// bandwidth is low, so backpressure here is harmless.
const KEY_CHANNEL_CAPACITY: usize = 32;

/// Source of raw keyboard bytes consumed by the session loop.
pub trait KeySource {
    /// Block until the next byte arrives or the source closes.
    fn recv(&self) -> Result<u8, RecvError>;

    /// Block for up to `timeout` waiting for the next byte.
    fn recv_timeout(&self, timeout: Duration) -> Result<u8, RecvTimeoutError>;
}

/// Production source: a background thread reads stdin one byte at a time
/// for the lifetime of the program. It never writes to the terminal and
/// goes quiet on stdin error or EOF.
pub struct StdinKeySource {
    rx: Receiver<u8>,
}

impl StdinKeySource {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::sync_channel(KEY_CHANNEL_CAPACITY);
        thread::spawn(move || read_stdin_bytes(tx));
        Self { rx }
    }
}

fn read_stdin_bytes(tx: SyncSender<u8>) {
    let mut stdin = io::stdin();
    let mut buf = [0u8; 1];
    loop {
        match stdin.read(&mut buf) {
            Ok(1) => {
                if tx.send(buf[0]).is_err() {
                    break;
                }
            }
            Ok(_) | Err(_) => break,
        }
    }
}

impl KeySource for StdinKeySource {
    fn recv(&self) -> Result<u8, RecvError> {
        self.rx.recv()
    }

    fn recv_timeout(&self, timeout: Duration) -> Result<u8, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Receiver-backed source for driving the session loop in tests.
pub struct TestKeySource {
    rx: Receiver<u8>,
}

impl TestKeySource {
    pub fn new(rx: Receiver<u8>) -> Self {
        Self { rx }
    }
}

impl KeySource for TestKeySource {
    fn recv(&self) -> Result<u8, RecvError> {
        self.rx.recv()
    }

    fn recv_timeout(&self, timeout: Duration) -> Result<u8, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}
