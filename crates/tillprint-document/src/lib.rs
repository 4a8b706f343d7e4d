// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// tillprint-document: receipt rendering for the Tillprint print service.
//
// Receipt documents are laid out by per-type templates into a list of
// printer operations, which is compiled to an ESC/POS byte stream and a
// plain-text transcript.  Rendering is pure and total: every document
// renders, and the same input always gives the same bytes.

pub mod builder;
pub mod codegen;
pub mod encoding;
pub mod ops;
pub mod renderer;
mod templates;

pub use builder::EscPosBuilder;
pub use ops::{Alignment, Op};
pub use renderer::{EscPosRenderer, ReceiptRenderer, RenderedReceipt};
