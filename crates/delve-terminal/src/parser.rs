//! Streaming escape-sequence decoder
//!
//! Built on the vte state machine, the tokenizer Alacritty uses. Bytes go
//! in, primitive [`TermOp`]s come out; a sequence split across `advance`
//! calls resumes where it left off, so the transport may deliver chunks of
//! any size, including chunks that end mid-escape.

use crate::grid::Color;
use crate::ops::{ClearKind, ScreenBuffer, StyleOp, TermOp};
use tracing::trace;
use vte::{Params, Perform};

/// Streaming parser: raw bytes to primitive operations.
pub struct Parser {
    machine: vte::Parser,
    collector: OpCollector,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            machine: vte::Parser::new(),
            collector: OpCollector { ops: Vec::new() },
        }
    }

    /// Process a chunk of output, returning the operations it decodes to.
    ///
    /// Every byte is consumed exactly once. A truncated escape sequence at
    /// the end of the chunk leaves the state machine mid-sequence; the next
    /// call completes it.
    pub fn advance(&mut self, bytes: &[u8]) -> Vec<TermOp> {
        for &byte in bytes {
            self.machine.advance(&mut self.collector, byte);
        }
        std::mem::take(&mut self.collector.ops)
    }
}

/// Accumulates operations emitted by the vte callbacks.
struct OpCollector {
    ops: Vec<TermOp>,
}

impl OpCollector {
    fn push(&mut self, op: TermOp) {
        self.ops.push(op);
    }
}

impl Perform for OpCollector {
    fn print(&mut self, c: char) {
        self.push(TermOp::Print(c));
    }

    fn execute(&mut self, byte: u8) {
        let op = match byte {
            0x07 => TermOp::Bell,
            0x08 => TermOp::Backspace,
            0x09 => TermOp::Tab,
            0x0A..=0x0C => TermOp::LineFeed,
            0x0D => TermOp::CarriageReturn,
            _ => TermOp::Ignored,
        };
        self.push(op);
    }

    fn hook(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _c: char) {
        // DCS strings carry nothing the game needs.
        self.push(TermOp::Ignored);
    }

    fn put(&mut self, _byte: u8) {}

    fn unhook(&mut self) {}

    fn osc_dispatch(&mut self, _params: &[&[u8]], _bell_terminated: bool) {
        // Title setting and friends.
        self.push(TermOp::Ignored);
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], _ignore: bool, c: char) {
        if intermediates == b"?" {
            self.private_mode(params, c);
            return;
        }
        if !intermediates.is_empty() {
            self.push(TermOp::Ignored);
            return;
        }

        match c {
            'A' => self.push(TermOp::MoveRows(-count(params))),
            'B' => self.push(TermOp::MoveRows(count(params))),
            'C' => self.push(TermOp::MoveCols(count(params))),
            'D' => self.push(TermOp::MoveCols(-count(params))),

            'H' | 'f' => {
                let row = nth_or(params, 0, 1).saturating_sub(1);
                let col = nth_or(params, 1, 1).saturating_sub(1);
                self.push(TermOp::MoveCursor { row, col });
            }
            'd' => self.push(TermOp::SetRow(nth_or(params, 0, 1).saturating_sub(1))),
            'G' | '`' => self.push(TermOp::SetCol(nth_or(params, 0, 1).saturating_sub(1))),

            'J' => {
                let op = match nth_or(params, 0, 0) {
                    0 => TermOp::Clear(ClearKind::ToScreenEnd),
                    1 => TermOp::Clear(ClearKind::ToScreenStart),
                    2 | 3 => TermOp::Clear(ClearKind::Screen),
                    _ => TermOp::Ignored,
                };
                self.push(op);
            }
            'K' => {
                let op = match nth_or(params, 0, 0) {
                    0 => TermOp::Clear(ClearKind::ToLineEnd),
                    1 => TermOp::Clear(ClearKind::ToLineStart),
                    2 => TermOp::Clear(ClearKind::Line),
                    _ => TermOp::Ignored,
                };
                self.push(op);
            }

            'm' => self.sgr(params),

            _ => {
                trace!(final_byte = %c, "ignoring CSI sequence");
                self.push(TermOp::Ignored);
            }
        }
    }

    fn esc_dispatch(&mut self, intermediates: &[u8], _ignore: bool, byte: u8) {
        match byte {
            // RIS: full reset. `ESC ( c` and friends are charset picks,
            // not resets, hence the intermediates check.
            b'c' if intermediates.is_empty() => {
                self.push(TermOp::ResetStyle);
                self.push(TermOp::Clear(ClearKind::Screen));
                self.push(TermOp::MoveCursor { row: 0, col: 0 });
            }
            // Charset selection and the rest.
            _ => self.push(TermOp::Ignored),
        }
    }
}

impl OpCollector {
    fn private_mode(&mut self, params: &Params, c: char) {
        let set = match c {
            'h' => true,
            'l' => false,
            _ => {
                self.push(TermOp::Ignored);
                return;
            }
        };

        for param in params.iter() {
            let op = match param.first().copied() {
                Some(25) => TermOp::SetCursorVisible(set),
                Some(47) | Some(1047) | Some(1049) => {
                    if set {
                        TermOp::SwitchBuffer(ScreenBuffer::Alternate)
                    } else {
                        TermOp::SwitchBuffer(ScreenBuffer::Primary)
                    }
                }
                _ => TermOp::Ignored,
            };
            self.push(op);
        }
    }

    fn sgr(&mut self, params: &Params) {
        if params.is_empty() {
            self.push(TermOp::ResetStyle);
            return;
        }

        let mut iter = params.iter();
        while let Some(param) = iter.next() {
            let code = param.first().copied().unwrap_or(0);
            let op = match code {
                0 => TermOp::ResetStyle,
                1 => TermOp::SetStyle(StyleOp::Bold(true)),
                4 => TermOp::SetStyle(StyleOp::Underline(true)),
                7 => TermOp::SetStyle(StyleOp::Reverse(true)),
                22 => TermOp::SetStyle(StyleOp::Bold(false)),
                24 => TermOp::SetStyle(StyleOp::Underline(false)),
                27 => TermOp::SetStyle(StyleOp::Reverse(false)),

                30..=37 => TermOp::SetStyle(StyleOp::Fg(Color::Indexed(code as u8 - 30))),
                39 => TermOp::SetStyle(StyleOp::Fg(Color::Default)),
                40..=47 => TermOp::SetStyle(StyleOp::Bg(Color::Indexed(code as u8 - 40))),
                49 => TermOp::SetStyle(StyleOp::Bg(Color::Default)),
                90..=97 => TermOp::SetStyle(StyleOp::Fg(Color::Indexed(code as u8 - 90 + 8))),
                100..=107 => TermOp::SetStyle(StyleOp::Bg(Color::Indexed(code as u8 - 100 + 8))),

                38 => match extended_color(param, &mut iter) {
                    Some(color) => TermOp::SetStyle(StyleOp::Fg(color)),
                    None => TermOp::Ignored,
                },
                48 => match extended_color(param, &mut iter) {
                    Some(color) => TermOp::SetStyle(StyleOp::Bg(color)),
                    None => TermOp::Ignored,
                },

                _ => TermOp::Ignored,
            };
            self.push(op);
        }
    }
}

/// Decode the 256-color / RGB forms of SGR 38 and 48. Handles both the
/// colon form (`38:5:n` arrives as one multi-part param) and the legacy
/// semicolon form (`38;5;n` arrives as separate params pulled from `iter`).
fn extended_color<'a>(
    param: &[u16],
    iter: &mut impl Iterator<Item = &'a [u16]>,
) -> Option<Color> {
    if param.len() > 1 {
        return match *param.get(1)? {
            5 => Some(Color::Indexed(*param.get(2)? as u8)),
            2 => Some(Color::Rgb(
                *param.get(2)? as u8,
                *param.get(3)? as u8,
                *param.get(4)? as u8,
            )),
            _ => None,
        };
    }

    match *iter.next()?.first()? {
        5 => Some(Color::Indexed(*iter.next()?.first()? as u8)),
        2 => {
            let r = *iter.next()?.first()? as u8;
            let g = *iter.next()?.first()? as u8;
            let b = *iter.next()?.first()? as u8;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

/// First parameter as a repeat count; absent or zero means one.
fn count(params: &Params) -> i16 {
    nth_or(params, 0, 1).min(i16::MAX as u16) as i16
}

/// The n-th parameter, with `default` substituted when absent or zero.
fn nth_or(params: &Params, n: usize, default: u16) -> u16 {
    params
        .iter()
        .nth(n)
        .and_then(|p| p.first().copied())
        .filter(|&v| v != 0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cup_is_converted_to_zero_based() {
        let mut parser = Parser::new();
        let ops = parser.advance(b"\x1b[6;5H");
        assert_eq!(ops, vec![TermOp::MoveCursor { row: 5, col: 4 }]);
    }

    #[test]
    fn cup_defaults_to_home() {
        let mut parser = Parser::new();
        let ops = parser.advance(b"\x1b[H");
        assert_eq!(ops, vec![TermOp::MoveCursor { row: 0, col: 0 }]);
    }

    #[test]
    fn split_sequence_resumes_across_chunks() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b[6;").is_empty());
        let ops = parser.advance(b"5H");
        assert_eq!(ops, vec![TermOp::MoveCursor { row: 5, col: 4 }]);
    }

    #[test]
    fn sgr_semicolon_256_color() {
        let mut parser = Parser::new();
        let ops = parser.advance(b"\x1b[38;5;196m");
        assert_eq!(ops, vec![TermOp::SetStyle(StyleOp::Fg(Color::Indexed(196)))]);
    }

    #[test]
    fn unknown_csi_is_ignored_not_an_error() {
        let mut parser = Parser::new();
        let ops = parser.advance(b"\x1b[5n");
        assert_eq!(ops, vec![TermOp::Ignored]);
    }

    #[test]
    fn alternate_screen_toggles() {
        let mut parser = Parser::new();
        let ops = parser.advance(b"\x1b[?1049h\x1b[?1049l");
        assert_eq!(
            ops,
            vec![
                TermOp::SwitchBuffer(ScreenBuffer::Alternate),
                TermOp::SwitchBuffer(ScreenBuffer::Primary),
            ]
        );
    }
}
