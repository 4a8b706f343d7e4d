// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Compile receipt operations to ESC/POS bytes and to a plain-text transcript.

use crate::encoding;
use crate::ops::{Alignment, Op};

const ESC: u8 = 0x1B;
const GS: u8 = 0x1D;
const LF: u8 = 0x0A;

/// Compile `ops` to the ESC/POS byte stream sent to the printer.
pub fn to_bytes(ops: &[Op]) -> Vec<u8> {
    let mut out = Vec::with_capacity(1024);

    for op in ops {
        match op {
            Op::Init => out.extend_from_slice(&[ESC, b'@']),
            Op::CodePage(n) => out.extend_from_slice(&[ESC, b't', *n]),
            Op::SetAlign(align) => {
                let n = match align {
                    Alignment::Left => 0,
                    Alignment::Center => 1,
                    Alignment::Right => 2,
                };
                out.extend_from_slice(&[ESC, b'a', n]);
            }
            Op::SetBold(on) => out.extend_from_slice(&[ESC, b'E', u8::from(*on)]),
            Op::SetSize { width, height } => {
                let w = (*width).clamp(1, 8) - 1;
                let h = (*height).clamp(1, 8) - 1;
                out.extend_from_slice(&[GS, b'!', (w << 4) | h]);
            }
            Op::Text(s) => out.extend(encoding::encode_text(s)),
            Op::Newline => out.push(LF),
            Op::Feed(n) => out.extend_from_slice(&[ESC, b'd', *n]),
            Op::Cut { feed: 0 } => out.extend_from_slice(&[GS, b'V', 0x00]),
            // GS V 66 n: feed n lines, then full cut.
            Op::Cut { feed } => out.extend_from_slice(&[GS, b'V', 0x42, *feed]),
        }
    }

    out
}

/// Render `ops` as the text a reader would see on paper `paper_width`
/// characters wide.  Styling is dropped; alignment is kept.
pub fn to_transcript(ops: &[Op], paper_width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut align = Alignment::Left;
    let mut size_width = 1usize;

    let layout = |text: &str, align: Alignment, size_width: usize| -> String {
        let width = (paper_width / size_width).max(1);
        let len = encoding::width(text);
        let pad = match align {
            Alignment::Left => 0,
            Alignment::Center => width.saturating_sub(len) / 2,
            Alignment::Right => width.saturating_sub(len),
        };
        let line = format!("{}{text}", " ".repeat(pad));
        line.trim_end().to_string()
    };

    for op in ops {
        match op {
            Op::Init => {
                align = Alignment::Left;
                size_width = 1;
            }
            Op::CodePage(_) | Op::SetBold(_) => {}
            Op::SetAlign(a) => align = *a,
            Op::SetSize { width, .. } => size_width = (*width).clamp(1, 8) as usize,
            Op::Text(s) => current.push_str(s),
            Op::Newline => {
                lines.push(layout(&current, align, size_width));
                current.clear();
            }
            Op::Feed(n) | Op::Cut { feed: n } => {
                if !current.is_empty() {
                    lines.push(layout(&current, align, size_width));
                    current.clear();
                }
                lines.extend(std::iter::repeat_n(String::new(), *n as usize));
            }
        }
    }
    if !current.is_empty() {
        lines.push(layout(&current, align, size_width));
    }

    let mut transcript = lines.join("\n");
    transcript.push('\n');
    transcript
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::EscPosBuilder;

    #[test]
    fn init_and_code_page_bytes() {
        let bytes = to_bytes(&EscPosBuilder::new(32).finish());
        assert_eq!(bytes, vec![0x1B, 0x40, 0x1B, 0x74, 0x00]);
    }

    #[test]
    fn style_bytes() {
        let ops = [
            Op::SetAlign(Alignment::Center),
            Op::SetBold(true),
            Op::SetSize { width: 2, height: 2 },
            Op::SetSize { width: 1, height: 1 },
        ];
        assert_eq!(
            to_bytes(&ops),
            vec![
                0x1B, 0x61, 0x01, // center
                0x1B, 0x45, 0x01, // bold
                0x1D, 0x21, 0x11, // double
                0x1D, 0x21, 0x00, // normal
            ]
        );
    }

    #[test]
    fn cut_bytes() {
        assert_eq!(to_bytes(&[Op::Cut { feed: 0 }]), vec![0x1D, 0x56, 0x00]);
        assert_eq!(to_bytes(&[Op::Cut { feed: 3 }]), vec![0x1D, 0x56, 0x42, 0x03]);
    }

    #[test]
    fn transcript_centres_and_pads() {
        let mut b = EscPosBuilder::new(10);
        b.centered("abcd").line_lr("a", "b").right().line("xy");
        let transcript = to_transcript(&b.finish(), 10);
        assert_eq!(transcript, "   abcd\na        b\n        xy\n");
    }

    #[test]
    fn transcript_centres_double_width_in_half_the_columns() {
        let mut b = EscPosBuilder::new(20);
        b.center().double_size().line("ab").reset_size();
        let transcript = to_transcript(&b.finish(), 20);
        assert_eq!(transcript, "    ab\n");
    }

    #[test]
    fn feed_adds_blank_lines() {
        let mut b = EscPosBuilder::new(10);
        b.line("x").cut(2);
        assert_eq!(to_transcript(&b.finish(), 10), "x\n\n\n");
    }
}
