//! Growable byte buffer that accumulates a streamed response body.
//!
//! Response bodies arrive in chunks of arbitrary size. Each chunk is
//! appended in order; the buffer is owned by the request that created it
//! and handed to the caller inside [`HttpResponse`](crate::HttpResponse).
//!
//! ## Growth contract
//!
//! Before copying a chunk, the buffer makes sure it can hold
//! `len + chunk.len() + 1` bytes. The spare byte keeps room for a
//! terminator so the contents can always be handed to code that expects a
//! bounded, NUL-terminated string. Growth uses `Vec::try_reserve`, so an
//! allocation failure surfaces as [`TransportError::OutOfMemory`] and the
//! request is aborted. Data is never silently truncated.

use std::fmt;

use crate::TransportError;

/// Accumulates the bytes of one in-flight response.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ResponseBuffer {
    bytes: Vec<u8>,
}

impl ResponseBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk to the end of the buffer.
    ///
    /// # Errors
    /// Returns [`TransportError::OutOfMemory`] if the backing storage
    /// cannot grow. The buffer is left unchanged in that case.
    pub fn append(&mut self, chunk: &[u8]) -> Result<(), TransportError> {
        let requested = self
            .bytes
            .len()
            .checked_add(chunk.len())
            .and_then(|n| n.checked_add(1))
            .ok_or(TransportError::OutOfMemory {
                requested: usize::MAX,
            })?;

        // `try_reserve` takes the number of *additional* bytes beyond len.
        self.bytes
            .try_reserve(requested - self.bytes.len())
            .map_err(|_| TransportError::OutOfMemory { requested })?;
        self.bytes.extend_from_slice(chunk);
        Ok(())
    }

    /// Number of body bytes received so far.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if no bytes have been received.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the bytes received so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Allocated capacity. Always at least `len() + 1` after an append.
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// Consumes the buffer and returns the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Consumes the buffer and returns its contents as text.
    ///
    /// Invalid UTF-8 sequences are replaced with `U+FFFD`, so a garbled
    /// body is still visible to the caller for diagnostics.
    pub fn into_string(self) -> String {
        match String::from_utf8(self.bytes) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }
}

impl fmt::Debug for ResponseBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseBuffer")
            .field("len", &self.bytes.len())
            .field("body", &String::from_utf8_lossy(&self.bytes))
            .finish()
    }
}
