//! Memory-backed fake flash medium with NOR program/erase semantics
//!
//! Mirrors the constraints of a real internal-flash controller:
//! programs whole aligned words, refuses any 0 -> 1 bit transition, and
//! resets bits only through a sector erase. Physical calls are counted
//! so tests can assert exactly how many programs/erases a driver
//! operation performs.

use faultline_storage::{FlashMedium, IrqControl, Result, StorageError, StorageInfo};

pub const WORD_SIZE: usize = 4;
pub const SECTOR_SIZE: u32 = 2048;
pub const CAPACITY: u32 = 4 * SECTOR_SIZE;

pub struct RamFlash {
    pub cells: Vec<u8>,
    pub program_calls: usize,
    pub erase_calls: usize,
    pub power_ups: usize,
    /// Fail every program call once this many have succeeded
    pub fail_program_after: Option<usize>,
    /// Fail the erase of the sector at this offset
    pub fail_erase_at: Option<u32>,
}

impl RamFlash {
    /// A fully erased medium (every bit 1).
    pub fn erased() -> Self {
        Self {
            cells: vec![0xFF; CAPACITY as usize],
            program_calls: 0,
            erase_calls: 0,
            power_ups: 0,
            fail_program_after: None,
            fail_erase_at: None,
        }
    }
}

impl FlashMedium for RamFlash {
    const WORD_SIZE: usize = WORD_SIZE;

    fn info(&self) -> StorageInfo {
        StorageInfo {
            capacity: CAPACITY,
            sector_size: SECTOR_SIZE,
        }
    }

    fn read(&self, offset: u32, out: &mut [u8]) -> Result<()> {
        let start = offset as usize;
        out.copy_from_slice(&self.cells[start..start + out.len()]);
        Ok(())
    }

    fn program(&mut self, offset: u32, words: &[u8]) -> Result<()> {
        if let Some(limit) = self.fail_program_after {
            if self.program_calls >= limit {
                self.program_calls += 1;
                return Err(StorageError::ProgramFailed);
            }
        }
        self.program_calls += 1;

        assert_eq!(offset as usize % WORD_SIZE, 0, "unaligned program at {}", offset);
        assert_eq!(words.len() % WORD_SIZE, 0, "partial-word program of {} bytes", words.len());
        assert_ne!(words.len(), 0, "empty program");

        let start = offset as usize;
        for (cell, incoming) in self.cells[start..start + words.len()].iter_mut().zip(words) {
            // NOR flash can only clear bits; setting one needs an erase
            if incoming & !*cell != 0 {
                return Err(StorageError::ProgramFailed);
            }
            *cell &= incoming;
        }
        Ok(())
    }

    fn erase_sector(&mut self, offset: u32) -> Result<()> {
        self.erase_calls += 1;

        if self.fail_erase_at == Some(offset) {
            return Err(StorageError::EraseFailed);
        }

        assert_eq!(offset % SECTOR_SIZE, 0, "unaligned erase at {}", offset);

        let start = offset as usize;
        self.cells[start..start + SECTOR_SIZE as usize].fill(0xFF);
        Ok(())
    }

    fn power_up(&mut self) -> Result<()> {
        self.power_ups += 1;
        Ok(())
    }
}

/// Interrupt-masking statistics shared between a [`CountingIrq`] handed
/// to the driver and the test that asserts on it.
#[derive(Debug, Default, Clone, Copy)]
pub struct IrqStats {
    pub depth: i32,
    pub max_depth: i32,
    pub disables: u32,
    pub restores: u32,
}

/// Interrupt control that tracks nesting so tests can verify every
/// physical call ran exactly one balanced critical section.
#[derive(Default, Clone)]
pub struct CountingIrq {
    pub stats: std::rc::Rc<std::cell::RefCell<IrqStats>>,
}

impl IrqControl for CountingIrq {
    fn disable(&mut self) -> bool {
        let mut stats = self.stats.borrow_mut();
        stats.depth += 1;
        stats.max_depth = stats.max_depth.max(stats.depth);
        stats.disables += 1;
        true
    }

    fn restore(&mut self, _was_enabled: bool) {
        let mut stats = self.stats.borrow_mut();
        stats.depth -= 1;
        stats.restores += 1;
    }
}
