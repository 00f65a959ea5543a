//! Core AVT world-file module.

pub mod charset;
pub mod error;
pub mod layout;
pub mod reader;
pub mod repack;
pub mod schema;
pub mod tables;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::info;

use self::charset::Charset;
use self::schema::{DecodeContext, Record, Schema};
use self::tables::LookupTable;

pub use self::error::{AvtError, Result};

/// Which charset and rule/action table variants to decode with.
///
/// Two historical variants of each survive and neither is authoritative,
/// so the choice stays with the caller. The defaults are the fuller
/// tables.
#[derive(Debug, Clone, Copy)]
pub struct DecodeConfig {
    pub charset: Charset,
    pub rule_kinds: LookupTable,
    pub action_kinds: LookupTable,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        DecodeConfig {
            charset: charset::EXTENDED,
            rule_kinds: tables::RULE_KINDS,
            action_kinds: tables::ACTION_KINDS,
        }
    }
}

/// A fully decoded world file.
///
/// Decoding is a single forward pass per section; the only ordering
/// dependency is that verbs are decoded first, because phenomenon slots
/// reference them by 1-based index.
#[derive(Debug)]
pub struct WorldFile {
    pub rooms: Vec<Record>,
    pub directions: Vec<Record>,
    pub items: Vec<Record>,
    pub synonyms: Vec<Record>,
    pub monsters: Vec<Record>,
    pub phenomena: Vec<Record>,
    pub verbs: Vec<String>,
    pub strings: Vec<String>,
}

impl WorldFile {
    /// Decode a world file with the default table variants.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(path, &DecodeConfig::default())
    }

    /// Decode a world file with explicit table variants.
    pub fn load_with(path: impl AsRef<Path>, config: &DecodeConfig) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening world file: {}", path.display());
        let mut src = BufReader::new(File::open(path)?);

        // Verbs first: phenomenon decoding needs the full name list.
        let verbs = reader::read_verb_names(&mut src, &config.charset)?;

        let rooms = decode_section(&mut src, &layout::ROOMS, &schema::ROOM, config, &verbs)?;
        let directions =
            decode_section(&mut src, &layout::DIRECTIONS, &schema::DIRECTION, config, &verbs)?;
        let items = decode_section(&mut src, &layout::ITEMS, &schema::ITEM, config, &verbs)?;
        let synonyms =
            decode_section(&mut src, &layout::SYNONYMS, &schema::SYNONYM, config, &verbs)?;
        let monsters =
            decode_section(&mut src, &layout::MONSTERS, &schema::MONSTER, config, &verbs)?;
        let phenomena =
            decode_section(&mut src, &layout::PHENOMENA, &schema::PHENOMENON, config, &verbs)?;
        let strings = reader::read_string_pool(&mut src, &config.charset)?;

        info!(
            "World file decoded: {} rooms, {} directions, {} items, {} synonyms, \
             {} monsters, {} phenomena, {} verbs, {} strings",
            rooms.len(),
            directions.len(),
            items.len(),
            synonyms.len(),
            monsters.len(),
            phenomena.len(),
            verbs.len(),
            strings.len()
        );

        Ok(WorldFile {
            rooms,
            directions,
            items,
            synonyms,
            monsters,
            phenomena,
            verbs,
            strings,
        })
    }
}

fn decode_section<R: std::io::Read + std::io::Seek>(
    src: &mut R,
    section: &layout::Section,
    schema: &Schema,
    config: &DecodeConfig,
    verbs: &[String],
) -> Result<Vec<Record>> {
    let slots = reader::read_slots(src, section)?;
    slots
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            let ctx = DecodeContext {
                section: section.name,
                index: i + 1,
                charset: &config.charset,
                rule_kinds: &config.rule_kinds,
                action_kinds: &config.action_kinds,
                verbs,
            };
            schema.apply(slot, &ctx)
        })
        .collect()
}
