//! Read-Send-Print Loop
//!
//! Turns user lines into request frames and prints decoded replies.
//!
//! The REPL and the printer run on different threads: requests go straight to
//! the socket while replies arrive through the scanner's channel, so a reply
//! may be printed after the next prompt.

use std::io::{BufRead, Write};

use crossbeam::channel::Receiver;

use crate::error::Result;
use crate::protocol::{encode_command, Message};

/// Prompt printed before each line is read
pub const PROMPT: &str = "> ";

/// Split a user line on whitespace and encode it as a request frame.
///
/// Blank lines produce no frame.
pub fn encode_line(line: &str) -> Option<Vec<u8>> {
    let args: Vec<&str> = line.split_whitespace().collect();
    if args.is_empty() {
        return None;
    }
    Some(encode_command(&args))
}

/// Read lines from `input` and send each as a command on `server`.
///
/// Returns the number of commands sent once `input` is exhausted.
pub fn run_repl<R, W, P>(input: R, server: &mut W, prompt: &mut P) -> Result<usize>
where
    R: BufRead,
    W: Write,
    P: Write,
{
    let mut sent = 0;
    let mut lines = input.lines();

    loop {
        prompt.write_all(PROMPT.as_bytes())?;
        prompt.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        if let Some(frame) = encode_line(&line) {
            server.write_all(&frame)?;
            server.flush()?;
            sent += 1;
            tracing::debug!("Sent command: {}", line.trim());
        }
    }

    Ok(sent)
}

/// Render a reply as `[<tag>] <value>`
pub fn format_reply(message: &Message) -> String {
    format!("[{}] {}", message.resp_type().tag() as char, message)
}

/// Print replies in arrival order until the channel closes.
///
/// Returns the number of replies printed.
pub fn run_printer<W: Write>(replies: Receiver<Message>, out: &mut W) -> Result<usize> {
    let mut printed = 0;
    for message in replies.iter() {
        writeln!(out, "\n{}", format_reply(&message))?;
        out.flush()?;
        printed += 1;
    }
    Ok(printed)
}
