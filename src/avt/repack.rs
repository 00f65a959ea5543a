//! File normalization: rewrite a world file so every fixed-capacity
//! section occupies exactly `capacity * stride` bytes with deterministic
//! zero padding, and string-pool entries carry no stray bytes past their
//! length prefix.
//!
//! The pass works at raw-byte granularity; it shares the stride, capacity
//! and sentinel model with the record reader but never decodes a field.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::error::{AvtError, Result};
use super::layout::{
    Section, ATTRIBUTES_END, DIRECTIONS, HEADER_END, INDICATORS_END, INFO_END, ITEMS,
    MONSTERS, MYSTERY_END, PHENOMENA, ROOMS, STRING_STRIDE, SYNONYMS, VERBS,
};
use super::reader::read_up_to;

/// A strict, non-resumable linear walk over one source/destination pair.
/// The source read cursor and `pos` move forward together; nothing is
/// ever revisited.
struct Repacker<R, W> {
    src: R,
    dst: W,
    pos: u64,
}

impl<R: Read + Seek, W: Write> Repacker<R, W> {
    fn new(src: R, dst: W) -> Self {
        Repacker { src, dst, pos: 0 }
    }

    /// Copy bytes verbatim up to the given absolute offset. Used for
    /// blocks whose internal layout this tool does not interpret.
    fn copy_block(&mut self, end: u64) -> Result<()> {
        let len = end - self.pos;
        let copied = std::io::copy(&mut self.src.by_ref().take(len), &mut self.dst)?;
        if copied < len {
            return Err(AvtError::Truncated {
                section: "opaque block",
                slot: 0,
            });
        }
        self.pos = end;
        Ok(())
    }

    /// Copy the in-use slots of one sentinel-terminated section, zero-pad
    /// the destination to the section's full capacity, and land the source
    /// cursor exactly at the end of the section's declared extent.
    fn copy_terminated_set(&mut self, section: &Section) -> Result<()> {
        let mut slot = vec![0u8; section.stride];
        let mut in_use = 0usize;

        while in_use < section.capacity {
            self.src.read_exact(&mut slot).map_err(|e| {
                if e.kind() == ErrorKind::UnexpectedEof {
                    AvtError::Truncated {
                        section: section.name,
                        slot: in_use + 1,
                    }
                } else {
                    AvtError::Io(e)
                }
            })?;
            if slot[0] == 0 {
                break;
            }
            self.dst.write_all(&slot)?;
            in_use += 1;
        }

        let unused = section.capacity - in_use;
        write_zeros(&mut self.dst, unused * section.stride)?;

        // The sentinel slot, if there was one, has already been consumed.
        if unused > 0 {
            self.src
                .seek(SeekFrom::Current(((unused - 1) * section.stride) as i64))?;
        }
        self.pos += section.byte_len();

        debug!(
            "Section {}: kept {} slots, padded {}",
            section.name, in_use, unused
        );
        Ok(())
    }

    /// Rewrite every string-pool entry with bytes past the length prefix
    /// forced to zero, until the source runs out. A short final chunk is
    /// padded up to a full stride.
    fn redact_string_pool(&mut self) -> Result<()> {
        let mut entries = 0usize;
        loop {
            let mut chunk = [0u8; STRING_STRIDE];
            let got = read_up_to(&mut self.src, &mut chunk)?;
            if got == 0 {
                break;
            }
            let keep = (chunk[0] as usize + 1).min(STRING_STRIDE);
            for b in chunk[keep..].iter_mut() {
                *b = 0;
            }
            self.dst.write_all(&chunk)?;
            self.pos += got as u64;
            entries += 1;
        }
        debug!("String pool: redacted {} entries", entries);
        Ok(())
    }

    /// The fixed section plan of a world file, in on-disk order.
    fn run(&mut self) -> Result<()> {
        self.copy_block(HEADER_END)?;
        self.copy_terminated_set(&ROOMS)?;
        self.copy_terminated_set(&DIRECTIONS)?;
        self.copy_terminated_set(&ITEMS)?;
        self.copy_terminated_set(&SYNONYMS)?;
        self.copy_terminated_set(&MONSTERS)?;
        self.copy_terminated_set(&PHENOMENA)?;
        self.copy_block(INDICATORS_END)?;
        self.copy_terminated_set(&VERBS)?;
        self.copy_block(MYSTERY_END)?;
        self.copy_block(ATTRIBUTES_END)?;
        self.copy_block(INFO_END)?;
        self.redact_string_pool()
    }
}

fn write_zeros<W: Write>(dst: &mut W, mut len: usize) -> Result<()> {
    const ZEROS: [u8; 4096] = [0u8; 4096];
    while len > 0 {
        let n = len.min(ZEROS.len());
        dst.write_all(&ZEROS[..n])?;
        len -= n;
    }
    Ok(())
}

/// Removes the temporary destination unless the rename went through.
struct TempGuard {
    path: PathBuf,
    committed: bool,
}

impl Drop for TempGuard {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Normalize one stream. Exposed for callers that already hold handles;
/// `repack_file` is the usual entry point.
pub fn repack_stream<R: Read + Seek, W: Write>(src: R, dst: W) -> Result<()> {
    Repacker::new(src, dst).run()
}

/// Normalize a world file in place.
///
/// The source is read-only throughout. Output goes to `<path>.tmp` beside
/// it and is renamed over the source only after the whole plan succeeds;
/// any failure leaves the source untouched and discards the temp file.
pub fn repack_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = {
        let mut os = path.as_os_str().to_os_string();
        os.push(".tmp");
        PathBuf::from(os)
    };
    info!("Repacking {} via {}", path.display(), tmp_path.display());

    let src = BufReader::new(File::open(path)?);
    let mut guard = TempGuard {
        path: tmp_path,
        committed: false,
    };
    let mut dst = BufWriter::new(File::create(&guard.path)?);

    repack_stream(src, &mut dst)?;
    dst.flush()?;
    drop(dst);

    fs::rename(&guard.path, path)?;
    guard.committed = true;
    Ok(())
}
