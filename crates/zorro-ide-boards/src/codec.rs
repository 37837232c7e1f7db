//! Data-line scrambling.
//!
//! AdIDE wires the drive's data lines to the bus in a perfect shuffle: bus
//! bit `i` of the low byte goes to drive bit `2i`, bus bit `i` of the high
//! byte to drive bit `2i + 1`. Software writes task-file registers through
//! [`shuffle_encode`] and reads them back through [`shuffle_decode`].

/// Bus word → drive word.
#[must_use]
pub const fn shuffle_encode(value: u16) -> u16 {
    let mut out = 0;
    let mut bit = 0;
    while bit < 8 {
        out |= ((value >> bit) & 1) << (2 * bit);
        out |= ((value >> (bit + 8)) & 1) << (2 * bit + 1);
        bit += 1;
    }
    out
}

/// Drive word → bus word.
#[must_use]
pub const fn shuffle_decode(value: u16) -> u16 {
    let mut out = 0;
    let mut bit = 0;
    while bit < 8 {
        out |= ((value >> (2 * bit)) & 1) << bit;
        out |= ((value >> (2 * bit + 1)) & 1) << (bit + 8);
        bit += 1;
    }
    out
}

/// Data-port byte order conversion.
#[must_use]
pub const fn swap_if(value: u16, swap: bool) -> u16 {
    if swap { value.swap_bytes() } else { value }
}
