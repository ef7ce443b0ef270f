//! Block Snapshot Storage Driver
//!
//! Emulates arbitrary-offset, arbitrary-length byte writes on top of a
//! non-volatile medium that only programs whole aligned words, only
//! clears bits (1 to 0), and needs a sector-granularity erase before any
//! bit can be set again. Captured snapshots persisted through this
//! driver survive a reset and can be read back for upload.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    FlashStore<M, I>                      │
//! │   bounds checks · write planning · scoped IRQ masking    │
//! ├────────────────────────────┬─────────────────────────────┤
//! │   FlashMedium (port)       │   IrqControl (port)         │
//! │   read / program /         │   disable / restore         │
//! │   erase_sector / power_up  │                             │
//! └────────────────────────────┴─────────────────────────────┘
//! ```
//!
//! The two port traits are implemented by a hardware adapter outside
//! this crate; the driver never touches a register layout. Splitting an
//! unaligned write into its physical steps is pure arithmetic and lives
//! in [`WritePlan`] so it can be tested exhaustively without a medium.
//!
//! # Concurrency
//!
//! All operations are synchronous and non-suspending. One save session
//! is owned by one logical caller at a time; there is no internal
//! locking. Each physical program/erase runs as a short critical section
//! with interrupts masked, so storage operations must be invoked from
//! task context, never from an interrupt handler.

#![no_std]
#![forbid(unsafe_code)]

mod driver;
mod error;
mod irq;
mod medium;
mod plan;

pub use driver::{FlashStore, MAX_WORD_SIZE};
pub use error::{Result, StorageError};
pub use irq::{IrqControl, IrqGuard, NopIrq};
pub use medium::{FlashMedium, StorageInfo};
pub use plan::{Direct, Splice, WritePlan};
