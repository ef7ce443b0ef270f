//! Diagnostic event serialization
//!
//! Heartbeats and trace events share one envelope: a CBOR map with
//! small integer keys so the header bytes stay single-byte. The
//! envelope is
//!
//! ```text
//! { 1: event type,
//!   2: schema version,
//!   3: device serial,
//!   4: software type,
//!   5: software version,
//!   6: hardware version,
//!   7: event payload }
//! ```
//!
//! A heartbeat payload is `{1: [metric values...]}`; metric order is
//! fixed by the firmware's metric table, so values travel positionally.
//! A trace payload is `{1: reason, 2: pc, 3: lr}` with the reason code
//! passed through verbatim.

use faultline_wire::{Encoder, SliceSink};

use crate::error::Result;

/// Version of the event envelope layout.
pub const SCHEMA_VERSION: u32 = 1;

// Envelope keys
const KEY_TYPE: u32 = 1;
const KEY_SCHEMA_VERSION: u32 = 2;
const KEY_DEVICE_SERIAL: u32 = 3;
const KEY_SOFTWARE_TYPE: u32 = 4;
const KEY_SOFTWARE_VERSION: u32 = 5;
const KEY_HARDWARE_VERSION: u32 = 6;
const KEY_EVENT_INFO: u32 = 7;
const ENVELOPE_PAIRS: u32 = 7;

// Event type discriminators
const EVENT_TYPE_HEARTBEAT: u32 = 1;
const EVENT_TYPE_TRACE: u32 = 2;

// Heartbeat payload keys
const KEY_METRICS: u32 = 1;

// Trace payload keys
const KEY_REASON: u32 = 1;
const KEY_PC: u32 = 2;
const KEY_LR: u32 = 3;

/// Identity of the reporting device.
///
/// Built once by the integrator from its own identity sources and
/// passed in by reference; this crate never queries the platform.
#[derive(Debug, Clone, Copy)]
pub struct DeviceInfo<'a> {
    pub device_serial: &'a str,
    pub software_type: &'a str,
    pub software_version: &'a str,
    pub hardware_version: &'a str,
}

/// One sampled metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricValue {
    Unsigned(u32),
    Signed(i32),
    /// Elapsed-time counter, reported in milliseconds
    Timer(u32),
}

/// Program state captured alongside a fault, reported verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEvent {
    /// Platform fault/reset reason code; classification happens above
    /// this crate
    pub reason: u32,
    /// Program counter at the fault site
    pub pc: u32,
    /// Link register at the fault site
    pub lr: u32,
}

/// Serialize a heartbeat event through an existing encoding session.
pub fn serialize_heartbeat(
    enc: &mut Encoder<'_>,
    device: &DeviceInfo<'_>,
    metrics: &[MetricValue],
) -> Result<()> {
    encode_envelope(enc, EVENT_TYPE_HEARTBEAT, device)?;

    enc.begin_map(1)?;
    enc.encode_unsigned(KEY_METRICS)?;
    enc.begin_array(metrics.len() as u32)?;
    for metric in metrics {
        match metric {
            MetricValue::Unsigned(v) | MetricValue::Timer(v) => enc.encode_unsigned(*v)?,
            MetricValue::Signed(v) => enc.encode_signed(*v)?,
        }
    }
    Ok(())
}

/// Serialize a trace event through an existing encoding session.
pub fn serialize_trace(
    enc: &mut Encoder<'_>,
    device: &DeviceInfo<'_>,
    trace: &TraceEvent,
) -> Result<()> {
    encode_envelope(enc, EVENT_TYPE_TRACE, device)?;

    enc.begin_map(3)?;
    enc.encode_unsigned(KEY_REASON)?;
    enc.encode_unsigned(trace.reason)?;
    enc.encode_unsigned(KEY_PC)?;
    enc.encode_unsigned(trace.pc)?;
    enc.encode_unsigned(KEY_LR)?;
    enc.encode_unsigned(trace.lr)?;
    Ok(())
}

/// Serialize a heartbeat into a caller-owned arena, returning the
/// encoded length.
pub fn heartbeat_to_arena(
    arena: &mut [u8],
    device: &DeviceInfo<'_>,
    metrics: &[MetricValue],
) -> Result<usize> {
    let capacity = arena.len();
    let mut sink = SliceSink::new(arena);
    let mut enc = Encoder::new(&mut sink, capacity);

    match serialize_heartbeat(&mut enc, device, metrics) {
        Ok(()) => Ok(enc.finish()),
        Err(e) => {
            log::error!("heartbeat serialization: storage out of space");
            Err(e)
        }
    }
}

/// Serialize a trace event into a caller-owned arena, returning the
/// encoded length.
pub fn trace_to_arena(
    arena: &mut [u8],
    device: &DeviceInfo<'_>,
    trace: &TraceEvent,
) -> Result<usize> {
    let capacity = arena.len();
    let mut sink = SliceSink::new(arena);
    let mut enc = Encoder::new(&mut sink, capacity);

    match serialize_trace(&mut enc, device, trace) {
        Ok(()) => Ok(enc.finish()),
        Err(e) => {
            log::error!("trace serialization: storage out of space");
            Err(e)
        }
    }
}

/// Upper bound on the encoded size of a heartbeat with `num_metrics`
/// values, computed with a size-only session carrying maximum-magnitude
/// values. Used to size event arenas at build time.
pub fn heartbeat_worst_case_size(device: &DeviceInfo<'_>, num_metrics: u32) -> usize {
    let mut enc = Encoder::size_only();
    // A size-only session has no ceiling, so this cannot fail
    let _ = encode_worst_case(&mut enc, device, num_metrics);
    enc.finish()
}

fn encode_worst_case(
    enc: &mut Encoder<'_>,
    device: &DeviceInfo<'_>,
    num_metrics: u32,
) -> Result<()> {
    encode_envelope(enc, EVENT_TYPE_HEARTBEAT, device)?;
    enc.begin_map(1)?;
    enc.encode_unsigned(KEY_METRICS)?;
    enc.begin_array(num_metrics)?;
    for _ in 0..num_metrics {
        enc.encode_signed(i32::MIN)?;
    }
    Ok(())
}

/// Encode the shared envelope up to (and including) the payload key;
/// the caller writes the payload map next.
fn encode_envelope(
    enc: &mut Encoder<'_>,
    event_type: u32,
    device: &DeviceInfo<'_>,
) -> Result<()> {
    enc.begin_map(ENVELOPE_PAIRS)?;
    enc.encode_unsigned(KEY_TYPE)?;
    enc.encode_unsigned(event_type)?;
    enc.encode_unsigned(KEY_SCHEMA_VERSION)?;
    enc.encode_unsigned(SCHEMA_VERSION)?;
    enc.encode_unsigned(KEY_DEVICE_SERIAL)?;
    enc.encode_text(device.device_serial)?;
    enc.encode_unsigned(KEY_SOFTWARE_TYPE)?;
    enc.encode_text(device.software_type)?;
    enc.encode_unsigned(KEY_SOFTWARE_VERSION)?;
    enc.encode_text(device.software_version)?;
    enc.encode_unsigned(KEY_HARDWARE_VERSION)?;
    enc.encode_text(device.hardware_version)?;
    enc.encode_unsigned(KEY_EVENT_INFO)?;
    Ok(())
}
