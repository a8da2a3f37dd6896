use crc::{Algorithm, Crc};

/// CRC-8 used by the AHT21 over the status byte and the five data bytes.
///
/// Polynomial: 0x31 (x^8 + x^5 + x^4 + 1)
/// Initial Value: 0xFF
/// Input/Output Reflected: false
/// Final XOR: 0x00
/// Check Value: 0xF7 (for "123456789"), catalogued as CRC-8/NRSC-5
pub const AHT21_CRC: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0x31,
    init: 0xFF,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0xF7,
    residue: 0x00,
};

const CRC_COMPUTER: Crc<u8> = Crc::<u8>::new(&AHT21_CRC);

/// Calculates the sensor CRC-8 over `data`.
///
/// An empty slice yields the initial value, `0xFF`.
#[inline]
pub fn crc8(data: &[u8]) -> u8 {
    CRC_COMPUTER.checksum(data)
}
