//! Little-endian stream cursors with sticky fault state.
//!
//! Every log codec in this crate reads and writes through these cursors. The
//! wire format is little-endian with no padding, so a codec is just a straight
//! sequence of `read_*`/`write_*` calls in field order.
//!
//! # Fault discipline
//!
//! A cursor that runs out of data (or space) does not fail the offending call:
//! it latches a fault, returns a zero value (reads) or discards the value
//! (writes), and turns every subsequent operation into a no-op. Codecs perform
//! their whole field sequence unconditionally and check the accumulated fault
//! exactly once at the end via [`ReadCursor::finish`] / [`WriteCursor::finish`].
//! This keeps a twenty-field decode to a single error branch while still
//! guaranteeing that no partially-valid structure escapes.
//!
//! The cursor never reads or writes past its backing slice, and its offset is
//! monotonically non-decreasing within one pass. Cursors are cheap,
//! stack-allocated, and created fresh per payload; a poisoned cursor is simply
//! dropped.
//!
//! Cursors are not thread-safe; `&mut self` enforces exclusive access.

use crate::{NavlinkError, Result};

/// Internal record of the first operation that faulted.
#[derive(Debug, Clone, Copy)]
struct Fault {
    op: &'static str,
    needed: usize,
    available: usize,
}

impl Fault {
    fn to_error(self) -> NavlinkError {
        NavlinkError::Cursor { op: self.op, needed: self.needed, available: self.available }
    }
}

/// Sequential little-endian reader over a borrowed byte slice.
#[derive(Debug)]
pub struct ReadCursor<'a> {
    data: &'a [u8],
    offset: usize,
    fault: Option<Fault>,
}

impl<'a> ReadCursor<'a> {
    /// Create a cursor over `data`, positioned at the start.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0, fault: None }
    }

    /// Bytes not yet consumed.
    ///
    /// Version-tolerant codecs rely on this being exact: a non-zero remainder
    /// after the base fields means a newer-format payload.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Whether a previous operation faulted.
    pub fn is_poisoned(&self) -> bool {
        self.fault.is_some()
    }

    /// Report the accumulated fault, if any.
    pub fn finish(&self) -> Result<()> {
        match self.fault {
            Some(fault) => Err(fault.to_error()),
            None => Ok(()),
        }
    }

    fn take<const N: usize>(&mut self, op: &'static str) -> Option<[u8; N]> {
        if self.fault.is_some() {
            return None;
        }
        let available = self.remaining();
        if available < N {
            self.fault = Some(Fault { op, needed: N, available });
            return None;
        }
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.data[self.offset..self.offset + N]);
        self.offset += N;
        Some(bytes)
    }

    pub fn read_u8(&mut self) -> u8 {
        self.take::<1>("read_u8").map(u8::from_le_bytes).unwrap_or(0)
    }

    pub fn read_i8(&mut self) -> i8 {
        self.take::<1>("read_i8").map(i8::from_le_bytes).unwrap_or(0)
    }

    pub fn read_u16(&mut self) -> u16 {
        self.take::<2>("read_u16").map(u16::from_le_bytes).unwrap_or(0)
    }

    pub fn read_i16(&mut self) -> i16 {
        self.take::<2>("read_i16").map(i16::from_le_bytes).unwrap_or(0)
    }

    pub fn read_u32(&mut self) -> u32 {
        self.take::<4>("read_u32").map(u32::from_le_bytes).unwrap_or(0)
    }

    pub fn read_i32(&mut self) -> i32 {
        self.take::<4>("read_i32").map(i32::from_le_bytes).unwrap_or(0)
    }

    pub fn read_u64(&mut self) -> u64 {
        self.take::<8>("read_u64").map(u64::from_le_bytes).unwrap_or(0)
    }

    pub fn read_i64(&mut self) -> i64 {
        self.take::<8>("read_i64").map(i64::from_le_bytes).unwrap_or(0)
    }

    pub fn read_f32(&mut self) -> f32 {
        self.take::<4>("read_f32").map(f32::from_le_bytes).unwrap_or(0.0)
    }

    pub fn read_f64(&mut self) -> f64 {
        self.take::<8>("read_f64").map(f64::from_le_bytes).unwrap_or(0.0)
    }

    /// Read exactly `len` raw bytes as a borrowed sub-slice.
    ///
    /// Returns an empty slice (and poisons the cursor) on shortfall.
    pub fn read_bytes(&mut self, len: usize) -> &'a [u8] {
        if self.fault.is_some() {
            return &[];
        }
        let available = self.remaining();
        if available < len {
            self.fault = Some(Fault { op: "read_bytes", needed: len, available });
            return &[];
        }
        let slice = &self.data[self.offset..self.offset + len];
        self.offset += len;
        slice
    }

    /// Advance the cursor by `len` bytes without interpreting them.
    pub fn skip(&mut self, len: usize) {
        let _ = self.read_bytes(len);
    }
}

/// Sequential little-endian writer over a borrowed mutable byte slice.
#[derive(Debug)]
pub struct WriteCursor<'a> {
    data: &'a mut [u8],
    offset: usize,
    fault: Option<Fault>,
}

impl<'a> WriteCursor<'a> {
    /// Create a cursor over `data`, positioned at the start.
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data, offset: 0, fault: None }
    }

    /// Bytes of capacity left.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Bytes written so far.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Whether a previous operation faulted.
    pub fn is_poisoned(&self) -> bool {
        self.fault.is_some()
    }

    /// Report the accumulated fault, if any.
    pub fn finish(&self) -> Result<()> {
        match self.fault {
            Some(fault) => Err(fault.to_error()),
            None => Ok(()),
        }
    }

    /// The written prefix of the backing buffer.
    pub fn written(&self) -> &[u8] {
        &self.data[..self.offset]
    }

    fn put(&mut self, op: &'static str, bytes: &[u8]) {
        if self.fault.is_some() {
            return;
        }
        let available = self.remaining();
        if available < bytes.len() {
            // No partial write: the buffer is left untouched.
            self.fault = Some(Fault { op, needed: bytes.len(), available });
            return;
        }
        self.data[self.offset..self.offset + bytes.len()].copy_from_slice(bytes);
        self.offset += bytes.len();
    }

    pub fn write_u8(&mut self, value: u8) {
        self.put("write_u8", &value.to_le_bytes());
    }

    pub fn write_i8(&mut self, value: i8) {
        self.put("write_i8", &value.to_le_bytes());
    }

    pub fn write_u16(&mut self, value: u16) {
        self.put("write_u16", &value.to_le_bytes());
    }

    pub fn write_i16(&mut self, value: i16) {
        self.put("write_i16", &value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.put("write_u32", &value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.put("write_i32", &value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.put("write_u64", &value.to_le_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.put("write_i64", &value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.put("write_f32", &value.to_le_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.put("write_f64", &value.to_le_bytes());
    }

    /// Write a raw byte range.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.put("write_bytes", bytes);
    }
}
