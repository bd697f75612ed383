//! WinAnsiEncoding (PDF Reference, Appendix D).
//!
//! Codes 0x20..=0x7E are ASCII and 0xA0..=0xFF are Latin-1; the 0x80..=0x9F
//! block carries the Windows-1252 typographic characters.

/// Character substituted for anything WinAnsi cannot represent.
pub const SUBSTITUTE: char = '?';

const HIGH_BLOCK: [(u8, char); 27] = [
    (0x80, '\u{20AC}'),
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201C}'),
    (0x94, '\u{201D}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'),
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

/// The WinAnsi code for `ch`, if it has one.
pub fn win_ansi_code(ch: char) -> Option<u8> {
    let cp = ch as u32;
    match cp {
        0x20..=0x7E | 0xA0..=0xFF => Some(cp as u8),
        _ => HIGH_BLOCK
            .iter()
            .find(|(_, c)| *c == ch)
            .map(|(code, _)| *code),
    }
}

/// The character encoded by `code`, if the code is defined.
pub fn win_ansi_char(code: u8) -> Option<char> {
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as char),
        _ => HIGH_BLOCK
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, ch)| *ch),
    }
}

/// Maps `ch` to itself when encodable, otherwise to [`SUBSTITUTE`].
pub fn normalize(ch: char) -> char {
    if win_ansi_code(ch).is_some() { ch } else { SUBSTITUTE }
}

/// Encodes `text`, replacing unencodable characters with `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut lossy = false;
    let bytes = text
        .chars()
        .map(|ch| {
            win_ansi_code(ch).unwrap_or_else(|| {
                lossy = true;
                SUBSTITUTE as u8
            })
        })
        .collect();
    if lossy {
        log::warn!("Text contains characters outside WinAnsiEncoding: {:?}", text);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_and_latin1_are_identity() {
        assert_eq!(win_ansi_code('A'), Some(0x41));
        assert_eq!(win_ansi_code('é'), Some(0xE9));
        assert_eq!(win_ansi_char(0xE9), Some('é'));
    }

    #[test]
    fn high_block_round_trips() {
        for (code, ch) in HIGH_BLOCK {
            assert_eq!(win_ansi_code(ch), Some(code));
            assert_eq!(win_ansi_char(code), Some(ch));
        }
        assert_eq!(win_ansi_char(0x81), None);
    }

    #[test]
    fn unencodable_characters_become_question_marks() {
        assert_eq!(encode_win_ansi("a\u{4E2D}b"), b"a?b".to_vec());
        assert_eq!(encode_win_ansi("\u{20AC}5"), vec![0x80, b'5']);
        assert_eq!(normalize('\n'), '?');
    }
}
