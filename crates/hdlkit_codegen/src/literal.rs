//! Bit-exact literal formatting shared by every dialect.

use hdlkit_common::BitVec;

use crate::error::SerializeError;

/// Formats a bit string.
///
/// Fully valid values whose width is a multiple of four render as
/// `X"…"` with `width / 4` lowercase hex digits. Everything else renders
/// MSB first as `"…"`, with `X` for every undefined bit.
pub fn bit_string(bits: &BitVec) -> String {
    let width = bits.width();
    if width % 4 == 0 && bits.is_fully_valid() {
        let digits = (width / 4) as usize;
        let hex = bits.val().to_str_radix(16);
        return format!("X\"{hex:0>digits$}\"");
    }
    binary_string(bits)
}

fn binary_string(bits: &BitVec) -> String {
    let body: String = (0..bits.width())
        .rev()
        .map(|i| match bits.get(i) {
            Some(true) => '1',
            Some(false) => '0',
            None => 'X',
        })
        .collect();
    format!("\"{body}\"")
}

/// Formats a single bit as `'1'`, `'0'`, or `'X'`.
pub fn bit_literal(bits: &BitVec) -> String {
    match bits.get(0) {
        Some(true) => "'1'".to_string(),
        Some(false) => "'0'".to_string(),
        None => "'X'".to_string(),
    }
}

/// Formats a signed fixed-width literal as `TO_SIGNED(v, w)`.
///
/// The value is the two's-complement interpretation of the bits.
pub fn signed_bit_string(bits: &BitVec) -> Result<String, SerializeError> {
    require_valid(bits, "signed")?;
    Ok(format!("TO_SIGNED({}, {})", bits.to_signed(), bits.width()))
}

/// Formats an unsigned fixed-width literal as `TO_UNSIGNED(v, w)`.
pub fn unsigned_bit_string(bits: &BitVec) -> Result<String, SerializeError> {
    require_valid(bits, "unsigned")?;
    Ok(format!("TO_UNSIGNED({}, {})", bits.val(), bits.width()))
}

fn require_valid(bits: &BitVec, kind: &str) -> Result<(), SerializeError> {
    if bits.is_fully_valid() {
        Ok(())
    } else {
        Err(SerializeError::type_mismatch(format!(
            "value {bits} can not be serialized as a {kind} literal because not all bits are valid"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    #[test]
    fn hex_when_aligned_and_valid() {
        assert_eq!(bit_string(&BitVec::from_u64(0xa5, 8)), "X\"a5\"");
        assert_eq!(bit_string(&BitVec::from_u64(0x3, 12)), "X\"003\"");
    }

    #[test]
    fn hex_reparses_to_magnitude() {
        for (value, width) in [(0u64, 4u32), (0xdead, 16), (0x1, 32), (u64::MAX, 64)] {
            let text = bit_string(&BitVec::from_u64(value, width));
            let digits = text.trim_start_matches("X\"").trim_end_matches('"');
            assert_eq!(digits.len(), (width / 4) as usize);
            let parsed = BigUint::parse_bytes(digits.as_bytes(), 16).unwrap();
            assert_eq!(parsed, BigUint::from(value));
        }
    }

    #[test]
    fn binary_when_unaligned() {
        assert_eq!(bit_string(&BitVec::from_u64(0b101, 3)), "\"101\"");
    }

    #[test]
    fn x_exactly_where_invalid() {
        let bits = BitVec::from_binary_str("1X0X10X1").unwrap();
        let text = bit_string(&bits);
        assert_eq!(text, "\"1X0X10X1\"");
        let body = text.trim_matches('"');
        for (pos, c) in body.chars().enumerate() {
            let index = bits.width() - 1 - pos as u32;
            assert_eq!(c == 'X', bits.get(index).is_none());
        }
    }

    #[test]
    fn single_bits() {
        assert_eq!(bit_literal(&BitVec::from_bool(true)), "'1'");
        assert_eq!(bit_literal(&BitVec::from_bool(false)), "'0'");
        assert_eq!(bit_literal(&BitVec::undefined(1)), "'X'");
    }

    #[test]
    fn signed_uses_twos_complement() {
        assert_eq!(
            signed_bit_string(&BitVec::from_u64(0xff, 8)).unwrap(),
            "TO_SIGNED(-1, 8)"
        );
        assert_eq!(
            unsigned_bit_string(&BitVec::from_u64(0xff, 8)).unwrap(),
            "TO_UNSIGNED(255, 8)"
        );
    }

    #[test]
    fn signed_requires_full_mask() {
        let bits = BitVec::from_binary_str("1X").unwrap();
        assert!(matches!(
            signed_bit_string(&bits),
            Err(SerializeError::TypeMismatch { .. })
        ));
        assert!(unsigned_bit_string(&bits).is_err());
    }
}
