//! Arithmetic in GF(2^8) = GF(2)[x] / (x^8 + x^4 + x^3 + x^2 + 1).
//!
//! Elements are bytes. Addition is XOR; multiplication goes through
//! exponent/logarithm tables built at compile time from the generator
//! `alpha = x` (`0x02`).

/// Reduction polynomial, including the `x^8` term.
pub const MODULUS: u16 = 0x11D;

/// Primitive element.
pub const ALPHA: u8 = 0x02;

/// Multiplicative group order.
pub const ORDER: usize = 255;

#[allow(clippy::cast_possible_truncation)]
const fn build_tables() -> ([u8; 2 * ORDER], [u8; 256]) {
    let mut exp = [0u8; 2 * ORDER];
    let mut log = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < ORDER {
        exp[i] = x as u8;
        log[x as usize] = i as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= MODULUS;
        }
        i += 1;
    }
    // Second copy so exp[log a + log b] needs no reduction.
    while i < 2 * ORDER {
        exp[i] = exp[i - ORDER];
        i += 1;
    }
    (exp, log)
}

const TABLES: ([u8; 2 * ORDER], [u8; 256]) = build_tables();

/// `EXP[i] = alpha^i`, repeated twice.
pub const EXP: [u8; 2 * ORDER] = TABLES.0;

/// `LOG[alpha^i] = i`. `LOG[0]` is meaningless.
pub const LOG: [u8; 256] = TABLES.1;

#[must_use]
pub const fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

#[must_use]
pub const fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    EXP[LOG[a as usize] as usize + LOG[b as usize] as usize]
}

/// Shift-and-add multiplication, independent of the tables.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn mul_reference(a: u8, b: u8) -> u8 {
    let mut acc: u16 = 0;
    let mut a = a as u16;
    let mut b = b;
    while b != 0 {
        if b & 1 != 0 {
            acc ^= a;
        }
        a <<= 1;
        if a & 0x100 != 0 {
            a ^= MODULUS;
        }
        b >>= 1;
    }
    acc as u8
}

#[must_use]
pub const fn square(a: u8) -> u8 {
    mul(a, a)
}

/// `alpha^i`.
#[must_use]
pub const fn exp(i: usize) -> u8 {
    EXP[i % ORDER]
}

/// Discrete logarithm base alpha; `None` for zero.
#[must_use]
pub const fn log(a: u8) -> Option<u8> {
    if a == 0 { None } else { Some(LOG[a as usize]) }
}

/// Multiplicative inverse; `None` for zero.
#[must_use]
pub const fn inverse(a: u8) -> Option<u8> {
    if a == 0 {
        return None;
    }
    Some(EXP[ORDER - LOG[a as usize] as usize])
}

/// `a^e`, with `0^0 = 1`.
#[must_use]
pub const fn pow(a: u8, e: u32) -> u8 {
    if e == 0 {
        return 1;
    }
    if a == 0 {
        return 0;
    }
    let exponent = (LOG[a as usize] as u64 * e as u64) % ORDER as u64;
    EXP[exponent as usize]
}
