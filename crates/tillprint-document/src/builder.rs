// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fluent builder that receipt templates write into.

use crate::encoding::{self, CODE_PAGE_PC437};
use crate::ops::{Alignment, Op};

/// Accumulates receipt operations for a paper `width` given in characters.
///
/// Common widths: 32 for 58 mm paper, 48 for 80 mm paper.
#[derive(Debug, Clone)]
pub struct EscPosBuilder {
    ops: Vec<Op>,
    width: usize,
    size_width: u8,
}

impl EscPosBuilder {
    pub fn new(width: usize) -> Self {
        Self {
            ops: vec![Op::Init, Op::CodePage(CODE_PAGE_PC437)],
            width,
            size_width: 1,
        }
    }

    /// Characters per line at the current character width.
    pub fn width(&self) -> usize {
        (self.width / self.size_width as usize).max(1)
    }

    // -- Text --

    pub fn text(&mut self, s: &str) -> &mut Self {
        self.ops.push(Op::Text(encoding::sanitize(s)));
        self
    }

    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.newline()
    }

    pub fn newline(&mut self) -> &mut Self {
        self.ops.push(Op::Newline);
        self
    }

    pub fn feed(&mut self, lines: u8) -> &mut Self {
        self.ops.push(Op::Feed(lines));
        self
    }

    // -- Alignment --

    pub fn center(&mut self) -> &mut Self {
        self.ops.push(Op::SetAlign(Alignment::Center));
        self
    }

    pub fn left(&mut self) -> &mut Self {
        self.ops.push(Op::SetAlign(Alignment::Left));
        self
    }

    pub fn right(&mut self) -> &mut Self {
        self.ops.push(Op::SetAlign(Alignment::Right));
        self
    }

    // -- Style --

    pub fn bold(&mut self) -> &mut Self {
        self.ops.push(Op::SetBold(true));
        self
    }

    pub fn bold_off(&mut self) -> &mut Self {
        self.ops.push(Op::SetBold(false));
        self
    }

    /// Double width and height.
    pub fn double_size(&mut self) -> &mut Self {
        self.size(2, 2)
    }

    pub fn double_height(&mut self) -> &mut Self {
        self.size(1, 2)
    }

    pub fn reset_size(&mut self) -> &mut Self {
        self.size(1, 1)
    }

    fn size(&mut self, width: u8, height: u8) -> &mut Self {
        self.size_width = width;
        self.ops.push(Op::SetSize { width, height });
        self
    }

    // -- Separators --

    /// A line of '=' across the paper.
    pub fn sep_double(&mut self) -> &mut Self {
        let sep = "=".repeat(self.width());
        self.line(&sep)
    }

    /// A line of '-' across the paper.
    pub fn sep_single(&mut self) -> &mut Self {
        let sep = "-".repeat(self.width());
        self.line(&sep)
    }

    // -- Layout helpers --

    /// Left text left-aligned, right text right-aligned, spaces between.
    pub fn line_lr(&mut self, left: &str, right: &str) -> &mut Self {
        let lw = encoding::width(left);
        let rw = encoding::width(right);
        let width = self.width();

        if lw + rw >= width {
            self.text(left);
            self.text(" ");
            self.line(right)
        } else {
            let spaces = width - lw - rw;
            self.text(left);
            self.text(&" ".repeat(spaces));
            self.line(right)
        }
    }

    /// One centred line, leaving alignment at left afterwards.
    pub fn centered(&mut self, s: &str) -> &mut Self {
        self.center();
        self.line(s);
        self.left()
    }

    /// Word-wrap `s` to the current width, prefixing continuation lines
    /// with `indent` spaces.
    pub fn paragraph(&mut self, s: &str, indent: usize) -> &mut Self {
        let width = self.width();
        for line in wrap(&encoding::sanitize(s), width, indent) {
            self.line(&line);
        }
        self
    }

    /// A "label: ____" line for handwritten signatures.
    pub fn signature(&mut self, label: &str) -> &mut Self {
        let prefix = format!("{label}: ");
        let blank = self.width().saturating_sub(encoding::width(&prefix));
        self.newline();
        self.line(&format!("{prefix}{}", "_".repeat(blank)))
    }

    // -- Paper control --

    /// Feed `feed` lines and cut.
    pub fn cut(&mut self, feed: u8) -> &mut Self {
        self.ops.push(Op::Cut { feed });
        self
    }

    pub fn finish(self) -> Vec<Op> {
        self.ops
    }
}

fn wrap(s: &str, width: usize, indent: usize) -> Vec<String> {
    let indent = indent.min(width.saturating_sub(1));
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in s.split_whitespace() {
        let mut word = word.to_string();

        loop {
            let available = if lines.is_empty() { width } else { width - indent };
            let cur_len = encoding::width(&current);
            let word_len = encoding::width(&word);
            let needed = if cur_len == 0 { word_len } else { cur_len + 1 + word_len };

            if needed <= available {
                if cur_len > 0 {
                    current.push(' ');
                }
                current.push_str(&word);
                break;
            }
            if cur_len > 0 {
                lines.push(current);
                current = String::new();
                continue;
            }
            // A single word longer than the line: hard split.
            let head = encoding::truncate(&word, available);
            let rest: String = word.chars().skip(available).collect();
            lines.push(head);
            word = rest;
            if word.is_empty() {
                break;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
        .into_iter()
        .enumerate()
        .map(|(i, l)| if i == 0 { l } else { format!("{}{l}", " ".repeat(indent)) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_init_and_code_page() {
        let ops = EscPosBuilder::new(32).finish();
        assert_eq!(ops, vec![Op::Init, Op::CodePage(CODE_PAGE_PC437)]);
    }

    #[test]
    fn line_lr_pads_to_width() {
        let mut b = EscPosBuilder::new(20);
        b.line_lr("Total", "$9.99");
        let ops = b.finish();
        assert_eq!(ops[2], Op::Text("Total".into()));
        assert_eq!(ops[3], Op::Text(" ".repeat(10)));
        assert_eq!(ops[4], Op::Text("$9.99".into()));
        assert_eq!(ops[5], Op::Newline);
    }

    #[test]
    fn line_lr_overflow_uses_single_space() {
        let mut b = EscPosBuilder::new(10);
        b.line_lr("Blueberry Muffin", "$3.25");
        let ops = b.finish();
        assert_eq!(ops[3], Op::Text(" ".into()));
    }

    #[test]
    fn double_size_halves_width() {
        let mut b = EscPosBuilder::new(48);
        b.double_size();
        assert_eq!(b.width(), 24);
        b.reset_size();
        assert_eq!(b.width(), 48);
    }

    #[test]
    fn text_is_sanitized() {
        let mut b = EscPosBuilder::new(32);
        b.text("A\x1Bd\x05");
        assert_eq!(b.finish()[2], Op::Text("A d ".into()));
    }

    #[test]
    fn wrap_respects_width_and_indent() {
        let lines = wrap("the quick brown fox jumps over the lazy dog", 12, 2);
        assert_eq!(lines[0], "the quick");
        assert!(lines.iter().all(|l| l.chars().count() <= 12));
        assert!(lines[1..].iter().all(|l| l.starts_with("  ")));
        let joined: Vec<&str> = lines.iter().flat_map(|l| l.split_whitespace()).collect();
        assert_eq!(joined.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn wrap_splits_overlong_words() {
        let lines = wrap("abcdefghijkl", 5, 0);
        assert_eq!(lines, vec!["abcde", "fghij", "kl"]);
    }
}
