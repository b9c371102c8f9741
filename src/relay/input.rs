//! Decodes host terminal input
//!
//! The host reports focus changes as `CSI I` / `CSI O` once focus reporting
//! is on, and modified keys as `CSI 27 ; mods ; code ~` (xterm
//! modifyOtherKeys) or `CSI code ; mods u`. Those become events; every other
//! byte is passed through for the child.

use crate::keys::{Key, KeyPress, Modifiers};

const ESC: u8 = 0x1b;

/// Longest parameter string considered part of a recognizable sequence
const MAX_PARAMS_LEN: usize = 32;

/// Keypad codepoints from the kitty keyboard protocol
const KP_SUBTRACT: u32 = 57412;
const KP_ADD: u32 = 57413;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostInput {
    Data(Vec<u8>),
    Key { press: KeyPress, raw: Vec<u8> },
    Focus(bool),
}

#[derive(Debug, Default)]
pub struct InputDecoder {
    pending: Vec<u8>,
}

enum Csi {
    /// Not enough bytes yet
    Incomplete,
    /// Not a sequence this decoder handles; length of the bytes to forward
    Other(usize),
    Event(HostInput, usize),
}

impl InputDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, input: &[u8]) -> Vec<HostInput> {
        let mut buf = std::mem::take(&mut self.pending);
        buf.extend_from_slice(input);

        let mut events = Vec::new();
        let mut data = Vec::new();
        let mut i = 0;
        while i < buf.len() {
            if buf[i] != ESC || buf.get(i + 1) != Some(&b'[') {
                data.push(buf[i]);
                i += 1;
                continue;
            }
            match parse_csi(&buf[i..]) {
                Csi::Incomplete => {
                    self.pending = buf[i..].to_vec();
                    break;
                }
                Csi::Other(len) => {
                    data.extend_from_slice(&buf[i..i + len]);
                    i += len;
                }
                Csi::Event(event, len) => {
                    if !data.is_empty() {
                        events.push(HostInput::Data(std::mem::take(&mut data)));
                    }
                    events.push(event);
                    i += len;
                }
            }
        }
        if !data.is_empty() {
            events.push(HostInput::Data(data));
        }
        events
    }
}

/// `seq` starts with `ESC [`.
fn parse_csi(seq: &[u8]) -> Csi {
    let params_start = 2;
    let mut end = params_start;
    while end < seq.len() && (seq[end].is_ascii_digit() || seq[end] == b';') {
        end += 1;
        if end - params_start > MAX_PARAMS_LEN {
            return Csi::Other(end);
        }
    }
    let Some(&final_byte) = seq.get(end) else {
        return Csi::Incomplete;
    };
    let len = end + 1;
    let params: Vec<u32> = match std::str::from_utf8(&seq[params_start..end]) {
        Ok("") => Vec::new(),
        Ok(text) => match text
            .split(';')
            .map(str::parse::<u32>)
            .collect::<Result<Vec<u32>, _>>()
        {
            Ok(params) => params,
            Err(_) => return Csi::Other(len),
        },
        Err(_) => return Csi::Other(len),
    };

    let event = match (final_byte, params.as_slice()) {
        (b'I', []) => HostInput::Focus(true),
        (b'O', []) => HostInput::Focus(false),
        (b'u', &[code, mods]) | (b'~', &[27, mods, code]) => match key_of(code) {
            Some(key) => HostInput::Key {
                press: KeyPress::new(key, Modifiers::from_param(mods)),
                raw: seq[..len].to_vec(),
            },
            None => return Csi::Other(len),
        },
        _ => return Csi::Other(len),
    };
    Csi::Event(event, len)
}

fn key_of(code: u32) -> Option<Key> {
    match code {
        KP_ADD => Some(Key::KeypadAdd),
        KP_SUBTRACT => Some(Key::KeypadSubtract),
        _ => char::from_u32(code).map(Key::Char),
    }
}
