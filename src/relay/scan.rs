//! Watches child output for the bell and for title changes
//!
//! Everything else passes through untouched. Title sequences (OSC 0 and
//! OSC 2) and bells are taken out of the stream and reported instead, so
//! the application decides what reaches the host.

const ESC: u8 = 0x1b;
const BEL: u8 = 0x07;
const CAN: u8 = 0x18;
const SUB: u8 = 0x1a;

/// Longest OSC payload buffered before giving up on it
const MAX_OSC_LEN: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Data(Vec<u8>),
    Bell,
    Title(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Ground,
    Escape,
    Osc,
    OscEscape,
}

#[derive(Debug, Default)]
pub struct OutputScanner {
    state: State,
    osc: Vec<u8>,
}

impl OutputScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scan(&mut self, input: &[u8]) -> Vec<Output> {
        let mut out = Vec::new();
        let mut data = Vec::with_capacity(input.len());

        for &byte in input {
            self.step(byte, &mut data, &mut out);
        }
        if !data.is_empty() {
            out.push(Output::Data(data));
        }
        out
    }

    fn step(&mut self, byte: u8, data: &mut Vec<u8>, out: &mut Vec<Output>) {
        match self.state {
            State::Ground => match byte {
                BEL => {
                    flush(data, out);
                    out.push(Output::Bell);
                }
                ESC => self.state = State::Escape,
                _ => data.push(byte),
            },
            State::Escape => match byte {
                b']' => {
                    self.osc.clear();
                    self.state = State::Osc;
                }
                ESC => data.push(ESC),
                _ => {
                    data.extend_from_slice(&[ESC, byte]);
                    self.state = State::Ground;
                }
            },
            State::Osc => match byte {
                BEL => self.finish_osc(&[BEL], data, out),
                ESC => self.state = State::OscEscape,
                CAN | SUB => {
                    self.abandon_osc(data);
                    data.push(byte);
                }
                _ if self.osc.len() >= MAX_OSC_LEN => {
                    self.abandon_osc(data);
                    data.push(byte);
                }
                _ => self.osc.push(byte),
            },
            State::OscEscape => {
                if byte == b'\\' {
                    self.finish_osc(&[ESC, b'\\'], data, out);
                } else {
                    self.abandon_osc(data);
                    self.state = State::Escape;
                    self.step(byte, data, out);
                }
            }
        }
    }

    fn finish_osc(&mut self, terminator: &[u8], data: &mut Vec<u8>, out: &mut Vec<Output>) {
        self.state = State::Ground;
        let payload = std::mem::take(&mut self.osc);
        match title_of(&payload) {
            Some(title) => {
                flush(data, out);
                out.push(Output::Title(title));
            }
            None => {
                data.extend_from_slice(&[ESC, b']']);
                data.extend_from_slice(&payload);
                data.extend_from_slice(terminator);
            }
        }
    }

    /// Forward an unterminated OSC as plain bytes.
    fn abandon_osc(&mut self, data: &mut Vec<u8>) {
        self.state = State::Ground;
        data.extend_from_slice(&[ESC, b']']);
        data.append(&mut self.osc);
    }
}

fn flush(data: &mut Vec<u8>, out: &mut Vec<Output>) {
    if !data.is_empty() {
        out.push(Output::Data(std::mem::take(data)));
    }
}

fn title_of(payload: &[u8]) -> Option<String> {
    let split = payload.iter().position(|&b| b == b';')?;
    match &payload[..split] {
        b"0" | b"2" => Some(String::from_utf8_lossy(&payload[split + 1..]).into_owned()),
        _ => None,
    }
}
