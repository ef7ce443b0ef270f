//! Snapshot persistence
//!
//! Persists a set of captured memory regions into the storage driver so
//! they survive a reset and can be uploaded later. The on-medium layout
//! is little-endian words:
//!
//! ```text
//! offset 0   [ magic (4) | version (4) | total_len (4) | regions (4) ]
//! offset 16  [ kind (4) | len (4) | payload ... ]   per region
//! ```
//!
//! The header is written after all region payloads, so a save that dies
//! partway never presents a valid magic and the region reads as empty
//! on the next boot. Invalidation after upload goes the other way: one
//! programmed zero word breaks the magic without a full erase.
//!
//! # Save session
//!
//! `save_snapshot` runs the whole `save_begin -> erase* -> write*`
//! sequence. There is no resume; any failure means the next attempt
//! restarts from the beginning, which is acceptable in the crash-path
//! context where saves happen.

use faultline_storage::{FlashMedium, FlashStore, IrqControl};

use crate::error::{CaptureError, Result};

/// First word of a valid snapshot.
pub const SNAPSHOT_MAGIC: u32 = 0x544C_4643;

/// Version of the snapshot layout.
pub const SNAPSHOT_VERSION: u32 = 1;

const HEADER_LEN: u32 = 16;
const REGION_HEADER_LEN: u32 = 8;

/// What a captured region holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// Plain memory contents
    Memory = 1,
}

/// One span of memory to persist, handed in by an external enumerator.
#[derive(Debug, Clone, Copy)]
pub struct CaptureRegion<'a> {
    pub kind: RegionKind,
    pub data: &'a [u8],
}

impl<'a> CaptureRegion<'a> {
    /// Descriptor for a plain memory span.
    pub fn memory(data: &'a [u8]) -> Self {
        Self {
            kind: RegionKind::Memory,
            data,
        }
    }
}

/// Total bytes the snapshot occupies on the medium.
pub fn snapshot_len(regions: &[CaptureRegion<'_>]) -> u32 {
    let mut total = HEADER_LEN;
    for region in regions {
        total += REGION_HEADER_LEN + region.data.len() as u32;
    }
    total
}

/// Persist `regions` as one snapshot, replacing whatever the region
/// held before.
///
/// Runs the full save sequence: power-up hook, sector-granular erase of
/// the covering span, region payloads, then the header. Fails up front
/// with `SnapshotTooLarge` when the snapshot cannot fit the medium.
pub fn save_snapshot<M: FlashMedium, I: IrqControl>(
    store: &mut FlashStore<M, I>,
    regions: &[CaptureRegion<'_>],
) -> Result<()> {
    let info = store.info();
    let total = snapshot_len(regions);

    // Erase whole sectors covering the snapshot
    let span = ((total + info.sector_size - 1) / info.sector_size) * info.sector_size;
    if span > info.capacity {
        log::error!("snapshot does not fit storage region");
        return Err(CaptureError::SnapshotTooLarge {
            required: total,
            available: info.capacity,
        });
    }

    store.save_begin()?;
    store.erase(0, span as usize)?;

    let mut offset = HEADER_LEN;
    for region in regions {
        let mut region_header = [0u8; REGION_HEADER_LEN as usize];
        region_header[..4].copy_from_slice(&(region.kind as u32).to_le_bytes());
        region_header[4..].copy_from_slice(&(region.data.len() as u32).to_le_bytes());

        store.write(offset, &region_header)?;
        offset += REGION_HEADER_LEN;
        store.write(offset, region.data)?;
        offset += region.data.len() as u32;
    }

    // Header last: a torn save never validates
    let mut header = [0u8; HEADER_LEN as usize];
    header[..4].copy_from_slice(&SNAPSHOT_MAGIC.to_le_bytes());
    header[4..8].copy_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
    header[8..12].copy_from_slice(&total.to_le_bytes());
    header[12..].copy_from_slice(&(regions.len() as u32).to_le_bytes());
    store.write(0, &header)?;

    Ok(())
}

/// Whether the medium currently holds a complete snapshot.
pub fn has_valid_snapshot<M: FlashMedium, I: IrqControl>(store: &FlashStore<M, I>) -> bool {
    let mut word = [0u8; 4];
    if store.read(0, &mut word).is_err() {
        return false;
    }
    u32::from_le_bytes(word) == SNAPSHOT_MAGIC
}

/// Total stored length of the current snapshot, if one is valid.
/// Upload code reads exactly this many bytes from offset zero.
pub fn snapshot_size<M: FlashMedium, I: IrqControl>(store: &FlashStore<M, I>) -> Option<u32> {
    if !has_valid_snapshot(store) {
        return None;
    }
    let mut word = [0u8; 4];
    if store.read(8, &mut word).is_err() {
        return None;
    }
    Some(u32::from_le_bytes(word))
}

/// Invalidate the stored snapshot after a successful upload.
///
/// Costs a single word program instead of a full-region erase; the next
/// save erases the region anyway.
pub fn mark_uploaded<M: FlashMedium, I: IrqControl>(store: &mut FlashStore<M, I>) -> Result<()> {
    store.clear().map_err(|e| {
        log::error!("unable to invalidate uploaded snapshot");
        CaptureError::from(e)
    })
}
