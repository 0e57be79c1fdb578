//! Reusable host buffer for device transfers.

use vx_verify::{decode_slice, encode_slice, Element};

/// Host-side byte buffer reused for every transfer in both directions.
///
/// Sized once for the largest transfer the run makes, then borrowed as a
/// prefix for each upload and download. All encoding methods panic if the
/// requested length exceeds the capacity.
#[derive(Debug)]
pub struct StagingBuffer {
    bytes: Vec<u8>,
}

impl StagingBuffer {
    pub fn new(capacity: usize) -> Self {
        StagingBuffer {
            bytes: vec![0; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Copy raw bytes into the front of the buffer and return the written
    /// prefix.
    pub fn pack_bytes(&mut self, data: &[u8]) -> &[u8] {
        self.bytes[..data.len()].copy_from_slice(data);
        &self.bytes[..data.len()]
    }

    /// Encode `values` little-endian into the front of the buffer and
    /// return the written prefix.
    pub fn pack_elements<T: Element>(&mut self, values: &[T]) -> &[u8] {
        let len = values.len() * T::WIRE_SIZE;
        encode_slice(values, &mut self.bytes[..len]);
        &self.bytes[..len]
    }

    /// Zero the first `len` bytes and return them.
    pub fn zeroed(&mut self, len: usize) -> &[u8] {
        self.bytes[..len].fill(0);
        &self.bytes[..len]
    }

    /// Mutable view of the first `len` bytes, for downloads.
    pub fn recv(&mut self, len: usize) -> &mut [u8] {
        &mut self.bytes[..len]
    }

    /// Decode `count` elements from the front of the buffer.
    pub fn unpack_elements<T: Element>(&self, count: usize) -> Vec<T> {
        decode_slice(&self.bytes, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack_i32() {
        let mut staging = StagingBuffer::new(16);
        let values = [1i32, -1, 7, 0x0102_0304];
        staging.pack_elements(&values);
        assert_eq!(staging.unpack_elements::<i32>(4), values);
    }

    #[test]
    fn test_pack_unpack_f32() {
        let mut staging = StagingBuffer::new(16);
        let values = [1.5f32, -2.25, 0.0, 19.0];
        staging.pack_elements(&values);
        assert_eq!(staging.unpack_elements::<f32>(4), values);
    }

    #[test]
    fn test_pack_returns_exact_prefix() {
        let mut staging = StagingBuffer::new(64);
        let written = staging.pack_elements(&[5i32, 6]).to_vec();
        assert_eq!(written.len(), 8);
        assert_eq!(written, staging.pack_bytes(&written));
    }

    #[test]
    fn test_zeroed_clears_previous_contents() {
        let mut staging = StagingBuffer::new(8);
        staging.pack_bytes(&[0xff; 8]);
        assert_eq!(staging.zeroed(8), &[0u8; 8]);
    }

    #[test]
    fn test_recv_exposes_writable_prefix() {
        let mut staging = StagingBuffer::new(8);
        staging.recv(4).copy_from_slice(&7i32.to_le_bytes());
        assert_eq!(staging.unpack_elements::<i32>(1), [7]);
    }
}
