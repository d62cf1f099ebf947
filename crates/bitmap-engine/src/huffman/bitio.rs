//! MSB-first bit packing for the Huffman stream.

/// Accumulates bits MSB-first and pads the final byte with zeros.
#[derive(Debug, Default)]
pub struct BitWriter {
    output: Vec<u8>,
    buf: u8,
    bits_used: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_bit(&mut self, bit: bool) {
        self.buf = (self.buf << 1) | u8::from(bit);
        self.bits_used += 1;
        if self.bits_used == 8 {
            self.output.push(self.buf);
            self.buf = 0;
            self.bits_used = 0;
        }
    }

    pub fn write_code(&mut self, code: &[bool]) {
        for &bit in code {
            self.write_bit(bit);
        }
    }

    /// Number of bits written so far, padding excluded.
    pub fn bit_len(&self) -> usize {
        self.output.len() * 8 + usize::from(self.bits_used)
    }

    /// Zero-pad the pending byte and return the packed output.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bits_used > 0 {
            self.output.push(self.buf << (8 - self.bits_used));
        }
        self.output
    }
}

/// Yields the bits of a byte slice, MSB of each byte first.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    bit: u8,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0, bit: 0 }
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let byte = *self.data.get(self.pos)?;
        let value = (byte >> (7 - self.bit)) & 1 == 1;
        self.bit += 1;
        if self.bit == 8 {
            self.bit = 0;
            self.pos += 1;
        }
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.data.len() - self.pos) * 8 - usize::from(self.bit);
        (remaining, Some(remaining))
    }
}
