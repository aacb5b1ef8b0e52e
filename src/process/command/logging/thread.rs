use super::logger::Logger;
use crate::{
    event::broadcaster::unbounded::UnboundedBroadcast, utils::threads::spawn_named_thread,
};

use std::{
    io::{BufRead, BufReader, ErrorKind, Read},
    thread::JoinHandle,
};
use tracing::debug;

/// Relays every line read from `handle` to all the `loggers`. Returns the handles of the spawned
/// threads, which finish once the stream reaches its end and every line was written.
pub(crate) fn spawn_logger<R>(handle: R, loggers: Vec<Logger>) -> Vec<JoinHandle<()>>
where
    R: Read + Send + 'static,
{
    if loggers.is_empty() {
        return Vec::new();
    }
    let (sender_thread, mut log_threads) = spawn_logger_inner(handle, loggers);
    log_threads.push(sender_thread);
    log_threads
}

fn spawn_logger_inner<R>(handle: R, loggers: Vec<Logger>) -> (JoinHandle<()>, Vec<JoinHandle<()>>)
where
    R: Read + Send + 'static,
{
    let mut loggers_channel = UnboundedBroadcast::default();

    let log_threads = loggers
        .into_iter()
        .map(|logger| logger.log(loggers_channel.subscribe()))
        .collect();

    let sender_thread = spawn_named_thread("Service output reader", move || {
        let mut reader = BufReader::new(handle);
        let mut buf = Vec::new();
        loop {
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    loggers_channel.broadcast(decode_line(&buf));
                    buf.clear();
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    debug!("stopped reading service output: {err}");
                    break;
                }
            }
        }
    });

    (sender_thread, log_threads)
}

/// Decodes one raw line without its terminator. Invalid UTF-8 sequences are replaced instead of
/// dropping the line.
pub(crate) fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
