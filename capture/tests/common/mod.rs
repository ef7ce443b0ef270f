//! Memory-backed fake flash medium with NOR program/erase semantics

use faultline_storage::{FlashMedium, Result, StorageError, StorageInfo};

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
