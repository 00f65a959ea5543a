//! The fixed absolute layout of a world file.
//!
//! Offsets, strides and capacities are part of the external contract: the
//! sections sit back to back at these exact positions, and the normalizer
//! pads each one out to exactly `capacity * stride` bytes.

/// One fixed-stride, capacity-bounded run of slots.
#[derive(Debug, Clone, Copy)]
pub struct Section {
    pub name: &'static str,
    pub offset: u64,
    pub stride: usize,
    pub capacity: usize,
}

impl Section {
    /// Total bytes the section occupies in a normalized file.
    pub fn byte_len(&self) -> u64 {
        (self.capacity * self.stride) as u64
    }
}

pub const ROOMS: Section = Section {
    name: "rooms",
    offset: 0x101,
    stride: 31,
    capacity: 150,
};

pub const DIRECTIONS: Section = Section {
    name: "directions",
    offset: 0x132b,
    stride: 25,
    capacity: 500,
};

pub const ITEMS: Section = Section {
    name: "items",
    offset: 0x43ff,
    stride: 62,
    capacity: 150,
};

pub const SYNONYMS: Section = Section {
    name: "synonyms",
    offset: 0x6853,
    stride: 23,
    capacity: 400,
};

pub const MONSTERS: Section = Section {
    name: "monsters",
    offset: 0x8c43,
    stride: 57,
    capacity: 75,
};

pub const PHENOMENA: Section = Section {
    name: "phenomena",
    offset: 0x9cf6,
    stride: 20,
    capacity: 200,
};

pub const VERBS: Section = Section {
    name: "verbs",
    offset: 0xbc41,
    stride: 11,
    capacity: 199,
};

/// Start of the string pool. Entries are 128-byte chunks until end of file.
pub const STRINGS_OFFSET: u64 = 0xca80;

/// Stride of a string-pool entry: 1 length byte + up to 127 content bytes.
pub const STRING_STRIDE: usize = 128;

/// End of the file header block (the rooms section starts here).
pub const HEADER_END: u64 = ROOMS.offset;

/// End of the opaque indicator block between phenomena and verbs.
pub const INDICATORS_END: u64 = VERBS.offset;

/// End of the opaque block following the verb list. Its internal layout is
/// not understood; the normalizer copies it verbatim.
pub const MYSTERY_END: u64 = 0xc51a;

/// End of the game-attribute block.
pub const ATTRIBUTES_END: u64 = 0xc8e0;

/// End of the info block (the string pool starts here).
pub const INFO_END: u64 = STRINGS_OFFSET;
