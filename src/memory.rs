use crate::error::Chip8Error;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents flat, byte-addressable RAM. Every access is bounds checked and
/// reports `Chip8Error::OutOfBounds` rather than panicking.
pub trait MemoryMap {
    /// how many bytes are addressable
    fn capacity(&self) -> usize;

    /// get a r/w slice of the underlying memory
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Chip8Error>;

    /// get a r/o slice of the underlying memory
    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], Chip8Error>;

    /// read a single byte
    fn read(&self, addr: u16) -> Result<u8, Chip8Error> {
        Ok(self.get_ro_slice(addr, 1)?[0])
    }

    /// write a chunk of bytes into "RAM"
    fn write(&mut self, addr: u16, data: &[u8]) -> Result<(), Chip8Error> {
        self.get_rw_slice(addr, data.len())?.copy_from_slice(data);
        Ok(())
    }

    /// get a big-endian two-byte word (instruction fetch)
    fn get_word(&self, addr: u16) -> Result<u16, Chip8Error> {
        let word = self.get_ro_slice(addr, 2)?;
        Ok(u16::from_be_bytes([word[0], word[1]]))
    }
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// where the hex digit glyphs live
pub const CHIP8_FONT_ADDR: u16 = 0x050;

/// Defines the CHIP-8 standard 4K memory map
///   0x0000-0x004f  unused
///   0x0050-0x009f  font (16 glyphs of 5 bytes)
///   0x00a0-0x01ff  unused
///   0x0200-0x0fff  program
///
/// nothing stops a program from overwriting the font
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
    pub program_addr: u16,
    pub font_addr: u16,
}

impl MemoryMap for Chip8MemoryMap {
    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Chip8Error> {
        let range = self.checked_range(addr, len)?;
        Ok(&mut self.bytes[range])
    }

    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], Chip8Error> {
        let range = self.checked_range(addr, len)?;
        Ok(&self.bytes[range])
    }
}

impl Chip8MemoryMap {
    /// zeroed RAM with the contemporary font baked in
    pub fn new() -> Result<Self, Chip8Error> {
        let mut mm = Chip8MemoryMap {
            bytes: vec![0u8; CHIP8_RAM_SIZE_BYTES].into_boxed_slice(),
            program_addr: CHIP8_PROGRAM_ADDR,
            font_addr: CHIP8_FONT_ADDR,
        };
        mm.write(CHIP8_FONT_ADDR, &CHIP8_FONT)?;
        Ok(mm)
    }

    fn checked_range(&self, addr: u16, len: usize) -> Result<std::ops::Range<usize>, Chip8Error> {
        let start = usize::from(addr);
        match start.checked_add(len) {
            Some(end) if end <= self.capacity() => Ok(start..end),
            _ => Err(Chip8Error::OutOfBounds { addr: start, len }),
        }
    }
}

/// 0-F, each glyph 4 pixels wide in the high nibble
#[rustfmt::skip]
pub const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_zeroed() -> Result<(), Chip8Error> {
        let m = Chip8MemoryMap::new()?;
        // NB. memory is zeroed from 0xa0 because before that we bake in the font
        assert!(m.bytes[0xa0..].iter().all(|&b| b == 0));
        assert!(m.bytes[..0x50].iter().all(|&b| b == 0));
        Ok(())
    }

    #[test]
    fn test_font_installed() -> Result<(), Chip8Error> {
        let m = Chip8MemoryMap::new()?;
        assert_eq!(m.get_ro_slice(0x50, 80)?, &CHIP8_FONT[..]);
        // glyph "1" starts 5 bytes in
        assert_eq!(m.read(m.font_addr + 5)?, 0x20);
        assert_eq!(m.capacity(), CHIP8_RAM_SIZE_BYTES);
        Ok(())
    }

    #[test]
    fn test_write_data_ok() -> Result<(), Chip8Error> {
        let mut dst = Chip8MemoryMap::new()?;
        dst.write(8, &[0, 1, 2, 3, 4, 5, 6, 7])?;
        assert_eq!(
            dst.bytes[..16],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7]
        );
        Ok(())
    }

    #[test]
    fn test_read_word() -> Result<(), Chip8Error> {
        let mut m = Chip8MemoryMap::new()?;
        m.write(0x300, &[0, 1, 2, 3, 4, 5, 6, 7])?;
        assert_eq!(m.get_word(0x304)?, 0x0405);
        Ok(())
    }

    #[test]
    fn test_last_byte_addressable() -> Result<(), Chip8Error> {
        let mut m = Chip8MemoryMap::new()?;
        m.write(0xfff, &[0xab])?;
        assert_eq!(m.read(0xfff)?, 0xab);
        Ok(())
    }

    #[test]
    fn test_read_out_of_bounds() {
        let m = Chip8MemoryMap::new().unwrap();
        assert!(matches!(
            m.read(0x1000),
            Err(Chip8Error::OutOfBounds { addr: 0x1000, len: 1 })
        ));
        // a word straddling the end of RAM
        assert!(matches!(
            m.get_word(0xfff),
            Err(Chip8Error::OutOfBounds { addr: 0xfff, len: 2 })
        ));
    }

    #[test]
    fn test_write_too_much_rejected() {
        let mut dst = Chip8MemoryMap::new().unwrap();
        let r = dst.write(4089, &[0xee; 8]);
        assert!(matches!(r, Err(Chip8Error::OutOfBounds { addr: 4089, len: 8 })));
        // nothing partially written
        assert_eq!(dst.bytes[4089..], [0; 7]);
    }

    #[test]
    fn test_write_past_end_rejected() {
        let mut dst = Chip8MemoryMap::new().unwrap();
        assert!(dst.write(0x1000, &[1]).is_err());
        assert!(dst.write(0x0, &[]).is_ok());
    }
}
