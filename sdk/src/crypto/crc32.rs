//! CRC-32 with the Koopman polynomial.
//!
//! Only used for the 4-byte checksum inside account ids. The polynomial is
//! given in reflected form, so the table is built LSB-first like the
//! standard IEEE CRC-32, with initial value and final xor both `!0`.

use crate::config::CRC32_KOOPMAN;

/// Lookup table for [`CRC32_KOOPMAN`], built at compile time.
static KOOPMAN_TABLE: [u32; 256] = make_table(CRC32_KOOPMAN);

const fn make_table(poly: u32) -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 == 1 { (crc >> 1) ^ poly } else { crc >> 1 };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Koopman CRC-32 of `data`.
pub fn crc32_koopman(data: &[u8]) -> u32 {
    let crc = data.iter().fold(!0u32, |crc, &b| {
        KOOPMAN_TABLE[((crc ^ u32::from(b)) & 0xff) as usize] ^ (crc >> 8)
    });
    !crc
}
