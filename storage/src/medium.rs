//! Flash medium port contract
//!
//! Implemented by a concrete hardware/platform adapter. The driver
//! depends only on this trait, never on a specific controller.

use crate::error::Result;

/// Static properties of the backing medium, queried once by callers to
/// size regions and validate erase requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageInfo {
    /// Addressable capacity in bytes
    pub capacity: u32,
    /// Erase granularity (sector size) in bytes
    pub sector_size: u32,
}

/// Word-programmable, sector-erasable non-volatile medium.
///
/// Offsets are relative to the start of the storage window. The driver
/// performs all bounds checking and alignment planning; implementations
/// may assume the documented preconditions hold.
pub trait FlashMedium {
    /// Program granularity in bytes. Must be a power of two and at most
    /// [`MAX_WORD_SIZE`](crate::MAX_WORD_SIZE).
    const WORD_SIZE: usize;

    /// Capacity and sector size of the medium.
    fn info(&self) -> StorageInfo;

    /// Byte-exact copy out of the medium; no alignment constraint.
    ///
    /// # Contract
    /// - `offset + out.len()` does not exceed the capacity
    fn read(&self, offset: u32, out: &mut [u8]) -> Result<()>;

    /// Program whole words.
    ///
    /// # Contract
    /// - `offset` is word-aligned and `words.len()` is a whole-word
    ///   multiple
    /// - bits only transition from erased (1) to programmed (0);
    ///   attempting to set a programmed bit fails
    fn program(&mut self, offset: u32, words: &[u8]) -> Result<()>;

    /// Erase one sector, resetting every bit in it to 1.
    ///
    /// # Contract
    /// - `offset` is sector-aligned and within capacity
    fn erase_sector(&mut self, offset: u32) -> Result<()>;

    /// Lazy power-up hook, invoked once per save session before any
    /// erase or write.
    fn power_up(&mut self) -> Result<()> {
        Ok(())
    }
}
