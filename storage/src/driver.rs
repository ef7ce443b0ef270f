//! Flash storage driver
//!
//! Presents byte-addressable read/write/erase/clear over a
//! [`FlashMedium`], hiding the medium's word-program and sector-erase
//! constraints from callers.
//!
//! # Save sessions
//!
//! One logical save follows `save_begin -> erase* -> write*` with no
//! explicit end or abort. A failed erase or write terminates the
//! session; already-programmed bytes are not rolled back, and the next
//! attempt restarts the whole sequence from `save_begin`. Partially
//! written regions are never validated as consistent, so the restart is
//! the recovery mechanism.

use crate::error::{Result, StorageError};
use crate::irq::{IrqControl, IrqGuard};
use crate::medium::{FlashMedium, StorageInfo};
use crate::plan::{Splice, WritePlan};

/// Largest program word any medium may declare; sizes the driver's
/// stack-local splice scratch.
pub const MAX_WORD_SIZE: usize = 8;

/// Byte-addressable storage driver over a word-programmable medium.
///
/// Holds no buffered state besides transient stack scratch during
/// unaligned writes; storage state lives in the medium itself.
pub struct FlashStore<M: FlashMedium, I: IrqControl> {
    medium: M,
    irq: I,
}

impl<M: FlashMedium, I: IrqControl> FlashStore<M, I> {
    /// Wrap a medium and its interrupt control.
    pub fn new(medium: M, irq: I) -> Self {
        debug_assert!(M::WORD_SIZE.is_power_of_two());
        debug_assert!(M::WORD_SIZE <= MAX_WORD_SIZE);
        Self { medium, irq }
    }

    /// Capacity and sector size of the backing medium.
    pub fn info(&self) -> StorageInfo {
        self.medium.info()
    }

    /// Access the underlying medium, e.g. for platform maintenance or
    /// diagnostics counters.
    pub fn medium(&self) -> &M {
        &self.medium
    }

    /// Byte-exact read at any offset.
    ///
    /// Fails with `OutOfBounds` when `offset + out.len()` exceeds the
    /// capacity; nothing is copied in that case.
    pub fn read(&self, offset: u32, out: &mut [u8]) -> Result<()> {
        self.check_bounds(offset, out.len())?;
        self.medium.read(offset, out)
    }

    /// Erase `len` bytes starting at `offset`, sector by sector.
    ///
    /// `len` must be a multiple of the sector size and the range must
    /// lie within capacity; violations are rejected before any sector
    /// is touched. The first failing sector aborts the loop and its
    /// error is propagated; sectors after it are left as they were.
    pub fn erase(&mut self, offset: u32, len: usize) -> Result<()> {
        let info = self.medium.info();
        if len % info.sector_size as usize != 0 {
            return Err(StorageError::BadEraseLength);
        }
        self.check_bounds(offset, len)?;

        let mut sector = offset;
        let end = offset + len as u32;
        while sector < end {
            self.guarded_erase(sector)?;
            sector += info.sector_size;
        }
        Ok(())
    }

    /// Write `data` at any byte offset.
    ///
    /// The write executes as up to three physical steps (see
    /// [`WritePlan`]): an unaligned head word is read back, patched and
    /// reprogrammed; the aligned interior programs directly from `data`
    /// in one call; a sub-word tail is patched like the head. The first
    /// failing program aborts the write immediately; earlier steps stay
    /// programmed.
    pub fn write(&mut self, offset: u32, data: &[u8]) -> Result<()> {
        self.check_bounds(offset, data.len())?;

        let plan = WritePlan::compute(offset, data.len(), M::WORD_SIZE);
        let mut consumed = 0;

        if let Some(head) = plan.head {
            self.splice_word(head, &data[..head.len])?;
            consumed += head.len;
        }
        if let Some(span) = plan.interior {
            self.guarded_program(span.offset, &data[consumed..consumed + span.len])?;
            consumed += span.len;
        }
        if let Some(tail) = plan.tail {
            self.splice_word(tail, &data[consumed..])?;
        }
        Ok(())
    }

    /// Hook called at most once per logical save, before any erase or
    /// write of that save; powers up the medium lazily.
    pub fn save_begin(&mut self) -> Result<()> {
        self.medium.power_up()
    }

    /// Invalidate a stored snapshot cheaply by programming the first
    /// word of the region to zero.
    ///
    /// Zero is never a valid snapshot marker, so readers treat the
    /// region as empty afterwards without the cost of a full erase.
    /// Programming zero only clears bits, so no erase is needed first.
    pub fn clear(&mut self) -> Result<()> {
        let zeros = [0u8; MAX_WORD_SIZE];
        self.write(0, &zeros[..M::WORD_SIZE])
    }

    /// Read back the word containing a splice step, patch the payload
    /// in, and reprogram the whole word.
    fn splice_word(&mut self, step: Splice, payload: &[u8]) -> Result<()> {
        let mut scratch = [0u8; MAX_WORD_SIZE];
        let word = &mut scratch[..M::WORD_SIZE];

        self.medium.read(step.word_offset, word)?;
        word[step.shift..step.shift + step.len].copy_from_slice(payload);
        self.guarded_program(step.word_offset, word)
    }

    fn guarded_program(&mut self, offset: u32, words: &[u8]) -> Result<()> {
        let _guard = IrqGuard::enter(&mut self.irq);
        self.medium.program(offset, words)
    }

    fn guarded_erase(&mut self, offset: u32) -> Result<()> {
        let _guard = IrqGuard::enter(&mut self.irq);
        self.medium.erase_sector(offset)
    }

    fn check_bounds(&self, offset: u32, len: usize) -> Result<()> {
        let capacity = self.medium.info().capacity as u64;
        if offset as u64 + len as u64 > capacity {
            return Err(StorageError::OutOfBounds);
        }
        Ok(())
    }
}
