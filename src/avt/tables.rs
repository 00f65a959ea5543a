//! Named code-to-label enumerations shared by every record schema.
//!
//! These are loaded once as read-only data; record schemas reference them
//! rather than repeating the literals per record kind. The pronoun,
//! location, insideness and synonym tables have no unknown-value tolerance:
//! a byte outside them is a hard decode failure. The rule and action kind
//! tables are different — the on-disk rule encoding is only partially
//! understood, so unmapped kinds must degrade to an "unknown" display
//! rather than abort.

/// An immutable byte-to-label mapping with a name for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct LookupTable {
    pub name: &'static str,
    entries: &'static [(u8, &'static str)],
}

impl LookupTable {
    /// Look up a code, `None` if unmapped.
    pub fn get(&self, code: u8) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| *label)
    }
}

/// Grammatical pronoun of an item or monster.
pub const PRONOUNS: LookupTable = LookupTable {
    name: "pronoun",
    entries: &[(0, "man"), (1, "woman"), (2, "animal"), (3, "plural")],
};

/// Where a movable entity currently is.
pub const LOCATION_KINDS: LookupTable = LookupTable {
    name: "location kind",
    entries: &[
        (0x00, "in room"),
        (0x01, "in item"),
        (0x03, "with monster"),
        (0x0f, "nowhere"),
        (0x10, "carried"),
    ],
};

/// Whether an item can be entered, can contain things, or is solid.
pub const INSIDE_KINDS: LookupTable = LookupTable {
    name: "inside kind",
    entries: &[(0x00, "enterable"), (0x09, "container"), (0x0c, "solid")],
};

/// What a synonym resolves to.
pub const SYNONYM_KINDS: LookupTable = LookupTable {
    name: "synonym kind",
    entries: &[(1, "item"), (3, "monster")],
};

/// Phenomenon rule kinds, base variant. Everything beyond "none" is still
/// undeciphered and renders through the unknown fallback.
pub const RULE_KINDS: LookupTable = LookupTable {
    name: "rule kind",
    entries: &[(0x00, "none")],
};

/// Phenomenon rule kinds, older variant: no mapped entries at all, every
/// kind goes through the unknown fallback carrying its raw byte.
pub const RULE_KINDS_BARE: LookupTable = LookupTable {
    name: "rule kind",
    entries: &[],
};

/// Phenomenon action kinds, base variant.
pub const ACTION_KINDS: LookupTable = LookupTable {
    name: "action kind",
    entries: &[(0x00, "none")],
};

/// Phenomenon action kinds, older variant with no mapped entries.
pub const ACTION_KINDS_BARE: LookupTable = LookupTable {
    name: "action kind",
    entries: &[],
};
