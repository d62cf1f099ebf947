//! Little-endian integer codecs for header fields.
//!
//! Every header access in the crate goes through these helpers so that a
//! field is always decoded from the bytes currently stored at its offset.

/// Decode an unsigned 16-bit integer stored at `offset`.
pub fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

/// Decode a signed 16-bit integer stored at `offset`.
pub fn read_i16(bytes: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

/// Decode an unsigned 32-bit integer stored at `offset`.
pub fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Decode a signed 32-bit integer stored at `offset`.
pub fn read_i32(bytes: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Encode `value` into the two bytes starting at `offset`.
pub fn write_u16(bytes: &mut [u8], offset: usize, value: u16) {
    bytes[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// Encode `value` into the two bytes starting at `offset`.
pub fn write_i16(bytes: &mut [u8], offset: usize, value: i16) {
    bytes[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// Encode `value` into the four bytes starting at `offset`.
pub fn write_u32(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Encode `value` into the four bytes starting at `offset`.
pub fn write_i32(bytes: &mut [u8], offset: usize, value: i32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u32_little_endian() {
        let bytes = [0x36, 0x00, 0x0C, 0x00];
        assert_eq!(read_u32(&bytes, 0), 0x000C_0036);
    }

    #[test]
    fn test_read_at_offset() {
        let bytes = [0xFF, 0xFF, 0x18, 0x00, 0x01, 0x00];
        assert_eq!(read_u16(&bytes, 2), 24);
        assert_eq!(read_u16(&bytes, 4), 1);
    }

    #[test]
    fn test_signed_values() {
        let mut bytes = [0u8; 6];
        write_i32(&mut bytes, 1, -2);
        assert_eq!(&bytes[1..5], &[0xFE, 0xFF, 0xFF, 0xFF]);
        assert_eq!(read_i32(&bytes, 1), -2);

        write_i16(&mut bytes, 4, -300);
        assert_eq!(read_i16(&bytes, 4), -300);
    }

    #[test]
    fn test_write_does_not_touch_neighbours() {
        let mut bytes = [0xAAu8; 8];
        write_u32(&mut bytes, 2, 0x1234_5678);
        assert_eq!(bytes, [0xAA, 0xAA, 0x78, 0x56, 0x34, 0x12, 0xAA, 0xAA]);

        write_u16(&mut bytes, 0, 0x4D42);
        assert_eq!(&bytes[..2], b"BM");
    }
}
