//! REPL Tests
//!
//! Tests for turning user lines into requests and printing replies.

use std::io::Cursor;

use rego::network::hand_off;
use rego::protocol::Decoder;
use rego::repl::{encode_line, format_reply, run_printer, run_repl, PROMPT};

fn decode_one(input: &[u8]) -> rego::Message {
    Decoder::new(Cursor::new(input.to_vec())).decode_next().unwrap()
}

#[test]
fn test_encode_line_splits_on_whitespace() {
    let frame = encode_line("  SET   greeting hello ").unwrap();
    assert_eq!(
        frame,
        b"*3\r\n$3\r\nSET\r\n$8\r\ngreeting\r\n$5\r\nhello\r\n".to_vec()
    );
}

#[test]
fn test_encode_line_blank() {
    assert!(encode_line("").is_none());
    assert!(encode_line("   \t ").is_none());
}

#[test]
fn test_run_repl_sends_one_frame_per_line() {
    let input = Cursor::new(b"PING\n\nGET key\n".to_vec());
    let mut server = Vec::new();
    let mut prompt = Vec::new();

    let sent = run_repl(input, &mut server, &mut prompt).unwrap();

    assert_eq!(sent, 2);
    assert_eq!(
        server,
        b"*1\r\n$4\r\nPING\r\n*2\r\n$3\r\nGET\r\n$3\r\nkey\r\n".to_vec()
    );
    // One prompt per line read, plus the one answered by end of input
    assert_eq!(prompt, PROMPT.repeat(4).into_bytes());
}

#[test]
fn test_format_reply_uses_type_tag() {
    assert_eq!(format_reply(&decode_one(b"+OK\r\n")), "[+] OK");
    assert_eq!(format_reply(&decode_one(b"-ERR nope\r\n")), "[-] ERR nope");
    assert_eq!(format_reply(&decode_one(b":3\r\n")), "[:] 3");
    assert_eq!(format_reply(&decode_one(b"$-1\r\n")), "[$] (nil)");
    assert_eq!(
        format_reply(&decode_one(b"*2\r\n$1\r\na\r\n:1\r\n")),
        "[*] [a,1]"
    );
}

#[test]
fn test_run_printer_prints_in_order_until_closed() {
    let (sender, receiver) = hand_off(None);
    sender.send(decode_one(b"+first\r\n")).unwrap();
    sender.send(decode_one(b":2\r\n")).unwrap();
    drop(sender);

    let mut out = Vec::new();
    let printed = run_printer(receiver, &mut out).unwrap();

    assert_eq!(printed, 2);
    assert_eq!(String::from_utf8(out).unwrap(), "\n[+] first\n\n[:] 2\n");
}
