//! Diagnostics Capture Layer
//!
//! Ties the two leaf components of the capture core to the data they
//! carry: runtime events (heartbeats, trace events) serialized through
//! the wire encoder, and crash snapshots persisted through the storage
//! driver. The leaves themselves never call each other; this layer owns
//! the formats that flow through them.
//!
//! Everything the platform must provide comes in as a value or a port
//! trait: device identity as [`DeviceInfo`], capture spans as
//! [`CaptureRegion`] descriptors from an external enumerator, and the
//! medium behind `faultline_storage`'s port traits. Upload transport,
//! reboot-reason classification, and retry policy all live above this
//! crate.

#![no_std]
#![forbid(unsafe_code)]

mod error;
mod event;
mod snapshot;

pub use error::{CaptureError, Result};
pub use event::{
    heartbeat_to_arena, heartbeat_worst_case_size, serialize_heartbeat, serialize_trace,
    trace_to_arena, DeviceInfo, MetricValue, TraceEvent, SCHEMA_VERSION,
};
pub use snapshot::{
    has_valid_snapshot, mark_uploaded, save_snapshot, snapshot_len, snapshot_size, CaptureRegion,
    RegionKind, SNAPSHOT_MAGIC, SNAPSHOT_VERSION,
};
