//! Schema-driven field decoding shared by every record kind.
//!
//! A schema is an ordered list of typed field descriptors applied
//! left-to-right over one slot's bytes. All stride and offset bookkeeping
//! lives here, so it cannot drift between record kinds. Schemas are
//! intentionally partial: bytes nobody has deciphered yet are exposed
//! verbatim through `RawTail` rather than rejected.

use byteorder::{ByteOrder, LittleEndian};
use std::fmt;

use super::charset::Charset;
use super::error::{AvtError, Result};
use super::tables::{
    LookupTable, INSIDE_KINDS, LOCATION_KINDS, PRONOUNS, SYNONYM_KINDS,
};

/// One typed field within a slot.
#[derive(Debug, Clone, Copy)]
pub enum FieldType {
    /// 1 length byte followed by `size - 1` reserved content bytes.
    FixedString { size: usize },
    /// 1 unsigned byte.
    Byte,
    /// 2 bytes, little-endian unsigned 16-bit.
    Word,
    /// 1 byte looked up in a table. An unmapped byte is a hard failure.
    Enum(&'static LookupTable),
    /// (kind, operand) byte pair. Unmapped kinds are not an error.
    RuleRef,
    /// (kind, operand) byte pair, same tolerance as `RuleRef`.
    ActionRef,
    /// 1 byte, 1-based index into the decoded verb name list.
    VerbRef,
    /// All remaining slot bytes, verbatim. Must be the last field.
    RawTail,
}

/// A named field descriptor.
#[derive(Debug, Clone, Copy)]
pub struct FieldDesc {
    pub name: &'static str,
    pub ty: FieldType,
}

const fn field(name: &'static str, ty: FieldType) -> FieldDesc {
    FieldDesc { name, ty }
}

/// Everything `Schema::apply` needs beyond the slot bytes: which charset
/// and rule/action table variants to use, the decoded verb names for
/// `VerbRef` resolution, and the record identity for diagnostics.
pub struct DecodeContext<'a> {
    pub section: &'static str,
    /// 1-based slot index within the section.
    pub index: usize,
    pub charset: &'a Charset,
    pub rule_kinds: &'a LookupTable,
    pub action_kinds: &'a LookupTable,
    pub verbs: &'a [String],
}

impl DecodeContext<'_> {
    fn record_identity(&self) -> String {
        format!("{} record {}", self.section, self.index)
    }
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Byte(u8),
    Word(u16),
    /// An enum byte together with its resolved label.
    Label { code: u8, label: &'static str },
    /// A rule or action pair. `label` is `None` for undeciphered kinds,
    /// which still round-trip through the raw `kind` byte.
    Rule {
        kind: u8,
        operand: u8,
        label: Option<&'static str>,
    },
    /// A verb reference with its resolved 1-based name.
    Verb { index: u8, name: String },
    /// Unschematized trailing bytes, verbatim.
    Tail(Vec<u8>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Byte(b) => write!(f, "{}", b),
            FieldValue::Word(w) => write!(f, "{}", w),
            FieldValue::Label { label, .. } => write!(f, "{}", label),
            FieldValue::Rule {
                operand,
                label: Some(label),
                ..
            } => write!(f, "{}({})", label, operand),
            FieldValue::Rule { kind, operand, label: None } => {
                write!(f, "unknown({:#04x})({})", kind, operand)
            }
            FieldValue::Verb { index, name } => write!(f, "{}({})", index, name),
            FieldValue::Tail(bytes) => {
                let hex: Vec<String> =
                    bytes.iter().map(|b| format!("{:02x}", b)).collect();
                write!(f, "{}", hex.join(" "))
            }
        }
    }
}

/// A named, decoded field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub value: FieldValue,
}

/// One decoded slot: an ordered mapping from field name to value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub fields: Vec<Field>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.value)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", field.name, field.value)?;
        }
        Ok(())
    }
}

/// An ordered list of field descriptors covering (part of) a slot.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub fields: &'static [FieldDesc],
}

impl Schema {
    /// Decode one slot. Fails only on an unmapped `Enum` byte or an
    /// unresolvable `VerbRef`; everything else, including trailing bytes
    /// no descriptor claims, decodes.
    pub fn apply(&self, slot: &[u8], ctx: &DecodeContext) -> Result<Record> {
        let mut pos = 0usize;
        let mut fields = Vec::with_capacity(self.fields.len());

        for desc in self.fields {
            let value = match desc.ty {
                FieldType::FixedString { size } => {
                    let chunk = take(slot, &mut pos, size, ctx)?;
                    let len = (chunk[0] as usize).min(size - 1);
                    FieldValue::Text(ctx.charset.decode_string(&chunk[1..1 + len]))
                }
                FieldType::Byte => FieldValue::Byte(take(slot, &mut pos, 1, ctx)?[0]),
                FieldType::Word => {
                    FieldValue::Word(LittleEndian::read_u16(take(slot, &mut pos, 2, ctx)?))
                }
                FieldType::Enum(table) => {
                    let code = take(slot, &mut pos, 1, ctx)?[0];
                    match table.get(code) {
                        Some(label) => FieldValue::Label { code, label },
                        None => {
                            return Err(AvtError::UnknownEnum {
                                field: desc.name,
                                record: ctx.record_identity(),
                                value: code,
                            })
                        }
                    }
                }
                FieldType::RuleRef => decode_pair(slot, &mut pos, ctx, ctx.rule_kinds)?,
                FieldType::ActionRef => decode_pair(slot, &mut pos, ctx, ctx.action_kinds)?,
                FieldType::VerbRef => {
                    let index = take(slot, &mut pos, 1, ctx)?[0];
                    let name = (index as usize)
                        .checked_sub(1)
                        .and_then(|i| ctx.verbs.get(i))
                        .ok_or_else(|| AvtError::InvalidVerb {
                            field: desc.name,
                            record: ctx.record_identity(),
                            index,
                            count: ctx.verbs.len(),
                        })?;
                    FieldValue::Verb {
                        index,
                        name: name.clone(),
                    }
                }
                FieldType::RawTail => {
                    let tail = slot[pos..].to_vec();
                    pos = slot.len();
                    FieldValue::Tail(tail)
                }
            };
            fields.push(Field {
                name: desc.name,
                value,
            });
        }

        Ok(Record { fields })
    }
}

fn decode_pair(
    slot: &[u8],
    pos: &mut usize,
    ctx: &DecodeContext,
    table: &LookupTable,
) -> Result<FieldValue> {
    let bytes = take(slot, pos, 2, ctx)?;
    let kind = bytes[0];
    let operand = bytes[1];
    Ok(FieldValue::Rule {
        kind,
        operand,
        label: table.get(kind),
    })
}

fn take<'a>(
    slot: &'a [u8],
    pos: &mut usize,
    len: usize,
    ctx: &DecodeContext,
) -> Result<&'a [u8]> {
    let end = *pos + len;
    let chunk = slot.get(*pos..end).ok_or_else(|| {
        AvtError::InvalidFormat(format!(
            "schema for {} needs {} bytes at offset {} but the slot holds {}",
            ctx.section,
            len,
            pos,
            slot.len()
        ))
    })?;
    *pos = end;
    Ok(chunk)
}

/// Room slot, 31 bytes. Byte 23 has no known meaning.
pub const ROOM: Schema = Schema {
    fields: &[
        field("name", FieldType::FixedString { size: 21 }),
        field("description", FieldType::Word),
        field("unknown", FieldType::Byte),
        field("north", FieldType::Byte),
        field("east", FieldType::Byte),
        field("south", FieldType::Byte),
        field("west", FieldType::Byte),
        field("up", FieldType::Byte),
        field("down", FieldType::Byte),
        field("out", FieldType::Byte),
    ],
};

/// Direction-link slot, 25 bytes.
pub const DIRECTION: Schema = Schema {
    fields: &[
        field("name", FieldType::FixedString { size: 21 }),
        field("description", FieldType::Word),
        field("source", FieldType::Byte),
        field("target", FieldType::Byte),
    ],
};

/// Item slot, 62 bytes.
pub const ITEM: Schema = Schema {
    fields: &[
        field("name", FieldType::FixedString { size: 21 }),
        field("adjective", FieldType::FixedString { size: 21 }),
        field("description", FieldType::Word),
        field("pronoun", FieldType::Enum(&PRONOUNS)),
        field("points", FieldType::Byte),
        field("weight", FieldType::Byte),
        field("size", FieldType::Byte),
        field("shot damage", FieldType::Byte),
        field("shots", FieldType::Byte),
        field("hit damage", FieldType::Byte),
        field("stab damage", FieldType::Byte),
        field("read text", FieldType::Word),
        field("food", FieldType::Byte),
        field("drink", FieldType::Byte),
        field("burn time", FieldType::Byte),
        field("end", FieldType::Byte),
        field("location kind", FieldType::Enum(&LOCATION_KINDS)),
        field("location", FieldType::Byte),
        field("inside kind", FieldType::Enum(&INSIDE_KINDS)),
        field("inside", FieldType::Byte),
    ],
};

/// Synonym slot, 23 bytes.
pub const SYNONYM: Schema = Schema {
    fields: &[
        field("name", FieldType::FixedString { size: 21 }),
        field("kind", FieldType::Enum(&SYNONYM_KINDS)),
        field("target", FieldType::Byte),
    ],
};

/// Monster slot, 57 bytes.
pub const MONSTER: Schema = Schema {
    fields: &[
        field("name", FieldType::FixedString { size: 21 }),
        field("adjective", FieldType::FixedString { size: 21 }),
        field("description", FieldType::Word),
        field("pronoun", FieldType::Enum(&PRONOUNS)),
        field("dead item", FieldType::Byte),
        field("hunger", FieldType::Byte),
        field("thirst", FieldType::Byte),
        field("aggression", FieldType::Word),
        field("attack", FieldType::Byte),
        field("protection", FieldType::Byte),
        field("lives", FieldType::Byte),
        field("escape", FieldType::Byte),
        field("wander", FieldType::Byte),
        field("location kind", FieldType::Enum(&LOCATION_KINDS)),
        field("location", FieldType::Byte),
    ],
};

/// Phenomenon slot, 20 bytes. The only schema with a `VerbRef`, which is
/// why the verb section must be decoded first.
pub const PHENOMENON: Schema = Schema {
    fields: &[
        field("verb", FieldType::VerbRef),
        field("rule room", FieldType::RuleRef),
        field("rule item", FieldType::RuleRef),
        field("rule tool", FieldType::RuleRef),
        field("rule monster", FieldType::RuleRef),
        field("description", FieldType::Word),
        field("new room", FieldType::ActionRef),
        field("new item", FieldType::ActionRef),
        field("new tool", FieldType::ActionRef),
        field("new monster", FieldType::ActionRef),
        field("points", FieldType::Byte),
    ],
};

/// Verb slot, 11 bytes: just a name.
pub const VERB: Schema = Schema {
    fields: &[field("name", FieldType::FixedString { size: 11 })],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avt::charset;
    use crate::avt::tables;

    fn ctx<'a>(section: &'static str, verbs: &'a [String]) -> DecodeContext<'a> {
        DecodeContext {
            section,
            index: 1,
            charset: &charset::EXTENDED,
            rule_kinds: &tables::RULE_KINDS,
            action_kinds: &tables::ACTION_KINDS,
            verbs,
        }
    }

    #[test]
    fn room_with_name_and_zero_fields() {
        let mut slot = [0u8; 31];
        slot[0] = 5;
        slot[1..6].copy_from_slice(b"Halo!");

        let record = ROOM.apply(&slot, &ctx("rooms", &[])).unwrap();
        assert_eq!(record.get("name"), Some(&FieldValue::Text("Halo!".into())));
        assert_eq!(record.get("description"), Some(&FieldValue::Word(0)));
        for dir in ["north", "east", "south", "west", "up", "down", "out"] {
            assert_eq!(record.get(dir), Some(&FieldValue::Byte(0)));
        }
    }

    #[test]
    fn fixed_string_decodes_through_the_charset() {
        let mut slot = [0u8; 31];
        slot[0] = 4;
        slot[1] = 0x80; // ĉ
        slot[2..5].copy_from_slice(b"elo");

        let record = ROOM.apply(&slot, &ctx("rooms", &[])).unwrap();
        assert_eq!(record.get("name"), Some(&FieldValue::Text("ĉelo".into())));
    }

    #[test]
    fn word_fields_are_little_endian() {
        let mut slot = [0u8; 31];
        slot[0] = 1;
        slot[1] = b'x';
        slot[21] = 0x34;
        slot[22] = 0x12;

        let record = ROOM.apply(&slot, &ctx("rooms", &[])).unwrap();
        assert_eq!(record.get("description"), Some(&FieldValue::Word(0x1234)));
    }

    #[test]
    fn unmapped_enum_byte_is_fatal_and_identified() {
        let mut slot = [0u8; 23];
        slot[0] = 3;
        slot[1..4].copy_from_slice(b"akv");
        slot[21] = 7; // not a synonym kind

        let err = SYNONYM.apply(&slot, &ctx("synonyms", &[])).unwrap_err();
        match err {
            AvtError::UnknownEnum {
                field,
                record,
                value,
            } => {
                assert_eq!(field, "kind");
                assert_eq!(value, 7);
                assert!(record.contains("synonyms"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unmapped_rule_kind_degrades_to_unknown_display() {
        let verbs = vec!["iri".to_string()];
        let mut slot = [0u8; 20];
        slot[0] = 1; // verb 1
        slot[1] = 0x42; // undeciphered rule kind
        slot[2] = 9;

        let record = PHENOMENON.apply(&slot, &ctx("phenomena", &verbs)).unwrap();
        let rule = record.get("rule room").unwrap();
        assert_eq!(
            rule,
            &FieldValue::Rule {
                kind: 0x42,
                operand: 9,
                label: None
            }
        );
        assert_eq!(rule.to_string(), "unknown(0x42)(9)");
    }

    #[test]
    fn verb_refs_are_one_based() {
        let verbs = vec!["iri".to_string(), "preni".to_string()];
        let mut slot = [0u8; 20];
        slot[0] = 2;

        let record = PHENOMENON.apply(&slot, &ctx("phenomena", &verbs)).unwrap();
        assert_eq!(
            record.get("verb"),
            Some(&FieldValue::Verb {
                index: 2,
                name: "preni".into()
            })
        );
    }

    #[test]
    fn verb_ref_zero_and_out_of_range_fail() {
        let verbs = vec!["iri".to_string()];
        let slot = [0u8; 20];
        let err = PHENOMENON.apply(&slot, &ctx("phenomena", &verbs)).unwrap_err();
        assert!(matches!(err, AvtError::InvalidVerb { index: 0, .. }));

        let mut slot = [0u8; 20];
        slot[0] = 2;
        let err = PHENOMENON.apply(&slot, &ctx("phenomena", &verbs)).unwrap_err();
        assert!(matches!(
            err,
            AvtError::InvalidVerb {
                index: 2,
                count: 1,
                ..
            }
        ));
    }

    #[test]
    fn raw_tail_keeps_trailing_bytes_verbatim() {
        // A deliberately partial schema over a 6-byte slot.
        const PARTIAL: Schema = Schema {
            fields: &[
                field("flag", FieldType::Byte),
                field("rest", FieldType::RawTail),
            ],
        };
        let slot = [1u8, 0xde, 0xad, 0xbe, 0xef, 0x00];
        let record = PARTIAL.apply(&slot, &ctx("test", &[])).unwrap();
        assert_eq!(
            record.get("rest"),
            Some(&FieldValue::Tail(vec![0xde, 0xad, 0xbe, 0xef, 0x00]))
        );
        assert_eq!(record.get("rest").unwrap().to_string(), "de ad be ef 00");
    }

    #[test]
    fn schema_wider_than_slot_is_invalid_format() {
        let slot = [0u8; 10];
        let err = ROOM.apply(&slot, &ctx("rooms", &[])).unwrap_err();
        assert!(matches!(err, AvtError::InvalidFormat(_)));
    }

    #[test]
    fn overlong_length_byte_is_clamped() {
        let mut slot = [0u8; 31];
        slot[0] = 255; // claims more content than the field holds
        for b in slot[1..21].iter_mut() {
            *b = b'x';
        }
        let record = ROOM.apply(&slot, &ctx("rooms", &[])).unwrap();
        assert_eq!(
            record.get("name"),
            Some(&FieldValue::Text("x".repeat(20)))
        );
    }

    #[test]
    fn verb_slot_is_just_a_name() {
        let mut slot = [0u8; 11];
        slot[0] = 5;
        slot[1..6].copy_from_slice(b"preni");
        slot[7] = 0xab; // past the length, reserved

        let record = VERB.apply(&slot, &ctx("verbs", &[])).unwrap();
        assert_eq!(record.get("name"), Some(&FieldValue::Text("preni".into())));
    }

    #[test]
    fn item_slot_decodes_every_field() {
        let mut slot = [0u8; 62];
        slot[0] = 4;
        slot[1..5].copy_from_slice(b"glav");
        slot[21] = 5;
        slot[22..27].copy_from_slice(b"akraj");
        slot[44] = 1; // pronoun: woman
        slot[45] = 10; // points
        slot[58] = 0x10; // carried
        slot[60] = 0x0c; // solid

        let record = ITEM.apply(&slot, &ctx("items", &[])).unwrap();
        assert_eq!(record.get("name"), Some(&FieldValue::Text("glav".into())));
        assert_eq!(
            record.get("adjective"),
            Some(&FieldValue::Text("akraj".into()))
        );
        assert_eq!(
            record.get("pronoun"),
            Some(&FieldValue::Label {
                code: 1,
                label: "woman"
            })
        );
        assert_eq!(record.get("points"), Some(&FieldValue::Byte(10)));
        assert_eq!(
            record.get("location kind"),
            Some(&FieldValue::Label {
                code: 0x10,
                label: "carried"
            })
        );
        assert_eq!(
            record.get("inside kind"),
            Some(&FieldValue::Label {
                code: 0x0c,
                label: "solid"
            })
        );
    }
}
