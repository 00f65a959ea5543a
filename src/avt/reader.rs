//! Raw slot reading: fixed-stride, capacity-bounded, sentinel-terminated.

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use log::{debug, trace};

use super::charset::Charset;
use super::error::{AvtError, Result};
use super::layout::{Section, STRINGS_OFFSET, STRING_STRIDE, VERBS};

/// Read the in-use slots of one fixed-capacity section.
///
/// Slots are `section.stride` bytes each. The run ends at the first slot
/// whose first byte is 0 (the sentinel, which is not returned) or after
/// `section.capacity` slots, whichever comes first. A slot that must be
/// read but comes up short is a truncation error.
pub fn read_slots<R: Read + Seek>(src: &mut R, section: &Section) -> Result<Vec<Vec<u8>>> {
    src.seek(SeekFrom::Start(section.offset))?;

    let mut slots = Vec::new();
    while slots.len() < section.capacity {
        let mut slot = vec![0u8; section.stride];
        read_exact_or_truncated(src, &mut slot, section.name, slots.len() + 1)?;
        if slot[0] == 0 {
            break;
        }
        slots.push(slot);
    }

    debug!(
        "Section {}: {} of {} slots in use",
        section.name,
        slots.len(),
        section.capacity
    );
    Ok(slots)
}

/// Read and decode the verb section to a plain name list.
///
/// Phenomenon slots hold 1-based indexes into this list, so it has to be
/// decoded before the phenomena section.
pub fn read_verb_names<R: Read + Seek>(src: &mut R, charset: &Charset) -> Result<Vec<String>> {
    let slots = read_slots(src, &VERBS)?;
    let names = slots
        .iter()
        .map(|slot| {
            let len = (slot[0] as usize).min(VERBS.stride - 1);
            charset.decode_string(&slot[1..1 + len])
        })
        .collect();
    Ok(names)
}

/// Read and decode the string pool.
///
/// No sentinel here: 128-byte chunks from the pool offset until the first
/// short or empty read. Each chunk is a length byte plus up to 127 content
/// bytes; whatever sits past the length is opaque and not decoded.
pub fn read_string_pool<R: Read + Seek>(src: &mut R, charset: &Charset) -> Result<Vec<String>> {
    src.seek(SeekFrom::Start(STRINGS_OFFSET))?;

    let mut strings = Vec::new();
    let mut chunk = [0u8; STRING_STRIDE];
    loop {
        let got = read_up_to(src, &mut chunk)?;
        if got < STRING_STRIDE {
            trace!("String pool ended after {} entries ({} stray bytes)", strings.len(), got);
            break;
        }
        let len = (chunk[0] as usize).min(STRING_STRIDE - 1);
        strings.push(charset.decode_string(&chunk[1..1 + len]));
    }

    debug!("String pool: {} entries", strings.len());
    Ok(strings)
}

fn read_exact_or_truncated<R: Read>(
    src: &mut R,
    buf: &mut [u8],
    section: &'static str,
    slot: usize,
) -> Result<()> {
    src.read_exact(buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            AvtError::Truncated { section, slot }
        } else {
            AvtError::Io(e)
        }
    })
}

/// Fill as much of `buf` as the source can still provide.
pub(crate) fn read_up_to<R: Read>(src: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avt::charset::EXTENDED;
    use std::io::Cursor;

    const TEST_SECTION: Section = Section {
        name: "test",
        offset: 4,
        stride: 3,
        capacity: 4,
    };

    fn file_with(slots: &[&[u8]]) -> Vec<u8> {
        let mut bytes = vec![0xaa; TEST_SECTION.offset as usize];
        for slot in slots {
            bytes.extend_from_slice(slot);
        }
        bytes
    }

    #[test]
    fn stops_at_the_sentinel() {
        let bytes = file_with(&[b"abc", b"def", b"\0xx", b"ghi"]);
        let slots = read_slots(&mut Cursor::new(bytes), &TEST_SECTION).unwrap();
        assert_eq!(slots, vec![b"abc".to_vec(), b"def".to_vec()]);
    }

    #[test]
    fn later_nonzero_slots_do_not_resurrect_the_section() {
        // Garbage after the sentinel, still within capacity, stays ignored.
        let bytes = file_with(&[b"abc", b"\0\0\0", b"zzz", b"zzz"]);
        let slots = read_slots(&mut Cursor::new(bytes), &TEST_SECTION).unwrap();
        assert_eq!(slots, vec![b"abc".to_vec()]);
    }

    #[test]
    fn stops_at_capacity_without_a_sentinel() {
        let bytes = file_with(&[b"abc", b"def", b"ghi", b"jkl", b"mno"]);
        let slots = read_slots(&mut Cursor::new(bytes), &TEST_SECTION).unwrap();
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[3], b"jkl".to_vec());
    }

    #[test]
    fn short_slot_is_a_truncation_error() {
        let bytes = file_with(&[b"abc", b"de"]);
        let err = read_slots(&mut Cursor::new(bytes), &TEST_SECTION).unwrap_err();
        match err {
            AvtError::Truncated { section, slot } => {
                assert_eq!(section, "test");
                assert_eq!(slot, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn verb_names_decode_in_order() {
        let mut bytes = vec![0u8; VERBS.offset as usize];
        let mut verb = [0u8; 11];
        verb[0] = 3;
        verb[1..4].copy_from_slice(b"iri");
        bytes.extend_from_slice(&verb);
        verb = [0u8; 11];
        verb[0] = 5;
        verb[1..6].copy_from_slice(b"preni");
        bytes.extend_from_slice(&verb);
        bytes.extend_from_slice(&[0u8; 11]);

        let names = read_verb_names(&mut Cursor::new(bytes), &EXTENDED).unwrap();
        assert_eq!(names, vec!["iri".to_string(), "preni".to_string()]);
    }

    #[test]
    fn string_pool_runs_to_end_of_file() {
        let mut bytes = vec![0u8; STRINGS_OFFSET as usize];
        let mut entry = [0u8; 128];
        entry[0] = 5;
        entry[1..6].copy_from_slice(b"salon");
        entry[100] = 0xff; // opaque, must not be decoded
        bytes.extend_from_slice(&entry);
        entry = [0u8; 128];
        entry[0] = 2;
        entry[1] = 0x80;
        entry[2] = b'u';
        bytes.extend_from_slice(&entry);

        let strings = read_string_pool(&mut Cursor::new(bytes), &EXTENDED).unwrap();
        assert_eq!(strings, vec!["salon".to_string(), "ĉu".to_string()]);
    }

    #[test]
    fn short_final_chunk_ends_the_pool() {
        let mut bytes = vec![0u8; STRINGS_OFFSET as usize];
        let mut entry = [0u8; 128];
        entry[0] = 2;
        entry[1..3].copy_from_slice(b"je");
        bytes.extend_from_slice(&entry);
        bytes.extend_from_slice(&[3, b'n', b'e']); // 3 stray bytes

        let strings = read_string_pool(&mut Cursor::new(bytes), &EXTENDED).unwrap();
        assert_eq!(strings, vec!["je".to_string()]);
    }
}
