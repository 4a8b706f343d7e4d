// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Receipt opcodes.
//
// Templates do not write bytes directly.  They emit a flat list of `Op`s,
// which is compiled twice: once to ESC/POS bytes for the printer and once to
// a plain-text transcript for previews and logs.  Both outputs come from the
// same list, so a preview always shows what the printer receives.

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// A single atomic printer operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Reset the printer (ESC @).
    Init,
    /// Select character code table (ESC t n).
    CodePage(u8),
    SetAlign(Alignment),
    SetBold(bool),
    /// Character size multipliers, 1 to 8 each (GS ! n).
    SetSize { width: u8, height: u8 },
    /// Text without a trailing newline.
    Text(String),
    Newline,
    /// Print and feed `n` lines (ESC d n).
    Feed(u8),
    /// Cut the paper, feeding `feed` lines first when non-zero.
    Cut { feed: u8 },
}
