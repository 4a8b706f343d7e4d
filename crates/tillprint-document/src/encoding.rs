// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text encoding for thermal printers.
//
// Receipt printers power up in code page 437.  Text is mapped to that table
// one character per column; anything it cannot represent becomes '?'.
// Control characters inside user text are replaced by spaces so a receipt
// field can never smuggle printer commands into the stream.

/// Code page number selected with ESC t (PC437, USA standard Europe).
pub const CODE_PAGE_PC437: u8 = 0;

/// Encode one character to its PC437 byte.
pub fn encode_char(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        c if c.is_control() => b' ',
        'Ç' => 0x80,
        'ü' => 0x81,
        'é' => 0x82,
        'â' => 0x83,
        'ä' => 0x84,
        'à' => 0x85,
        'å' => 0x86,
        'ç' => 0x87,
        'ê' => 0x88,
        'ë' => 0x89,
        'è' => 0x8A,
        'ï' => 0x8B,
        'î' => 0x8C,
        'ì' => 0x8D,
        'Ä' => 0x8E,
        'Å' => 0x8F,
        'É' => 0x90,
        'æ' => 0x91,
        'Æ' => 0x92,
        'ô' => 0x93,
        'ö' => 0x94,
        'ò' => 0x95,
        'û' => 0x96,
        'ù' => 0x97,
        'ÿ' => 0x98,
        'Ö' => 0x99,
        'Ü' => 0x9A,
        '¢' => 0x9B,
        '£' => 0x9C,
        '¥' => 0x9D,
        'á' => 0xA0,
        'í' => 0xA1,
        'ó' => 0xA2,
        'ú' => 0xA3,
        'ñ' => 0xA4,
        'Ñ' => 0xA5,
        '¿' => 0xA8,
        '¡' => 0xAD,
        _ => b'?',
    }
}

/// Encode text for the printer.
pub fn encode_text(s: &str) -> Vec<u8> {
    s.chars().map(encode_char).collect()
}

/// Replace control characters with spaces; the transcript twin of
/// `encode_text`.
pub fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Printed width of `s` in columns.
pub fn width(s: &str) -> usize {
    s.chars().count()
}

/// Truncate `s` to at most `max` columns.
pub fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        assert_eq!(encode_text("Total $9.99"), b"Total $9.99".to_vec());
    }

    #[test]
    fn latin_accents_map_to_pc437() {
        assert_eq!(encode_text("José"), vec![b'J', b'o', b's', 0x82]);
        assert_eq!(encode_text("£"), vec![0x9C]);
    }

    #[test]
    fn unmappable_becomes_question_mark() {
        assert_eq!(encode_text("€"), vec![b'?']);
    }

    #[test]
    fn control_characters_cannot_inject_commands() {
        let bytes = encode_text("Ana\x1B@\x1DV\x00");
        assert!(!bytes.contains(&0x1B));
        assert!(!bytes.contains(&0x1D));
        assert!(!bytes.contains(&0x00));
        assert_eq!(sanitize("a\tb\nc"), "a b c");
    }
}
