
// Two's complement sign extension of the low `bits` bits of `field`.
pub fn sign_extend(field: u16, bits: u32) -> u16 {
    debug_assert!(bits > 0 && bits < u16::BITS);
    let mask = (1u16 << bits) - 1;
    let field = field & mask;
    if field & (1u16 << (bits - 1)) != 0 {
        field | !mask
    } else {
        field
    }
}

// Extract `bits` bits of `word` starting at `shift`.
pub fn field(word: u16, shift: u32, bits: u32) -> u16 {
    (word >> shift) & ((1u16 << bits) - 1)
}
