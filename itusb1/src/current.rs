//! Conversion of LTC2312 readings to VBUS current.

/// ADC codes per milliamp of VBUS current.
const CODES_PER_MA: f64 = 4.0;

/// Extract the 12-bit conversion code from a 2-byte LTC2312 read.
///
/// The code is left-aligned in the 16 bits clocked out. Anything other than
/// exactly two bytes gives 0, so a failed or short read pulls an average down
/// rather than aborting it.
pub(crate) fn code_from_bytes(bytes: &[u8]) -> u16 {
    match bytes {
        &[high, low] => u16::from(high) << 4 | u16::from(low) >> 4,
        _ => 0,
    }
}

/// Average current in milliamps from the sum of `samples` ADC codes.
pub(crate) fn milliamps(code_sum: u32, samples: u32) -> f32 {
    (f64::from(code_sum) / (CODES_PER_MA * f64::from(samples))) as f32
}
