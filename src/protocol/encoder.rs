//! Request encoder
//!
//! Redis expects every command as an array of bulk strings:
//!
//! ```text
//! *<argc>\r\n
//! $<len(arg0)>\r\n<arg0>\r\n
//! ...
//! ```

use std::io::Write;

use crate::error::Result;

/// Encode a command and its arguments as an array of bulk strings
pub fn encode_command<A: AsRef<[u8]>>(args: &[A]) -> Vec<u8> {
    let payload_len: usize = args.iter().map(|a| a.as_ref().len() + 16).sum();
    let mut frame = Vec::with_capacity(16 + payload_len);

    frame.extend_from_slice(format!("*{}\r\n", args.len()).as_bytes());
    for arg in args {
        let arg = arg.as_ref();
        frame.extend_from_slice(format!("${}\r\n", arg.len()).as_bytes());
        frame.extend_from_slice(arg);
        frame.extend_from_slice(b"\r\n");
    }

    frame
}

/// Write a command to a stream
pub fn write_command<W: Write, A: AsRef<[u8]>>(writer: &mut W, args: &[A]) -> Result<()> {
    let bytes = encode_command(args);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
