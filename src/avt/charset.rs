//! The fixed byte-to-character remap used by every string in a world file.
//!
//! AVT strings are 8-bit. A handful of high-bit code units stand for
//! Esperanto accented letters; every other byte decodes to the character
//! with the same code point. Two historical variants of the remap table
//! survive and neither is authoritative, so the table is pluggable.

/// A byte-to-character remap table.
///
/// `decode_byte` is total: bytes absent from `entries` fall through to the
/// latin-1 identity mapping, so every one of the 256 byte values decodes.
#[derive(Debug, Clone, Copy)]
pub struct Charset {
    pub name: &'static str,
    entries: &'static [(u8, char)],
}

/// The fuller remap: all six accented letters plus their capitals.
pub const EXTENDED: Charset = Charset {
    name: "extended",
    entries: &[
        (0x80, 'ĉ'),
        (0x8e, 'Ĉ'),
        (0x90, 'ĝ'),
        (0x91, 'Ĝ'),
        (0x92, 'ĥ'),
        (0x96, 'ĵ'),
        (0x97, 'ŭ'),
        (0x99, 'Ĥ'),
        (0x9a, 'Ŭ'),
        (0xa5, 'ŝ'),
        (0xa7, 'Ŝ'),
    ],
};

/// The older remap: no ĵ, and the capital code units fold to lowercase.
pub const LOWERCASE: Charset = Charset {
    name: "lowercase",
    entries: &[
        (0x80, 'ĉ'),
        (0x90, 'ĝ'),
        (0x91, 'ĝ'),
        (0x92, 'ĥ'),
        (0x97, 'ŭ'),
        (0x9a, 'ŭ'),
        (0xa5, 'ŝ'),
        (0xa7, 'ŝ'),
    ],
};

impl Charset {
    /// Decode one raw code unit. Never fails.
    pub fn decode_byte(&self, byte: u8) -> char {
        self.entries
            .iter()
            .find(|(code, _)| *code == byte)
            .map(|(_, ch)| *ch)
            .unwrap_or(char::from(byte))
    }

    /// Decode a whole byte run.
    pub fn decode_string(&self, bytes: &[u8]) -> String {
        bytes.iter().map(|&b| self.decode_byte(b)).collect()
    }
}
