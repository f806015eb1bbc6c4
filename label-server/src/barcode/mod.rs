//! EAN-13 barcode encoding and in-house code generation
//!
//! The encoder is pure: normalize a numeric code to 12 digits, compute
//! the mod-10 weighted check digit and expand the resulting 13-digit
//! code into the 95-module bar/space pattern. Code generation derives
//! the next in-house barcode from the company prefix and the sequence
//! embedded in the last issued code.

use thiserror::Error;

/// Company GS1 prefix for in-house barcodes.
const COMPANY_PREFIX: &str = "789846581";

/// Offset of the 3-digit sequence inside a stored 12/13-digit code.
const SEQUENCE_RANGE: std::ops::Range<usize> = 9..12;

const MAX_SEQUENCE: u32 = 999;

/// Left-hand odd-parity patterns (L table), indexed by digit.
const LEFT_ODD: [&str; 10] = [
    "0001101", "0011001", "0010011", "0111101", "0100011", "0110001", "0101111", "0111011",
    "0110111", "0001011",
];

/// Left-hand even-parity patterns (G table), indexed by digit.
const LEFT_EVEN: [&str; 10] = [
    "0100111", "0110011", "0011011", "0100001", "0011101", "0111001", "0000101", "0010001",
    "0001001", "0010111",
];

/// Right-hand patterns (R table), indexed by digit.
const RIGHT: [&str; 10] = [
    "1110010", "1100110", "1101100", "1000010", "1011100", "1001110", "1010000", "1000100",
    "1001000", "1110100",
];

const START_GUARD: &str = "101";
const MIDDLE_GUARD: &str = "01010";
const END_GUARD: &str = "101";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BarcodeError {
    #[error("Code contains non-numeric character '{0}'")]
    NonNumeric(char),

    #[error("Code is empty")]
    Empty,

    #[error("Sequence limit reached (999)")]
    SequenceExhausted,
}

pub type BarcodeResult<T> = Result<T, BarcodeError>;

/// A fully encoded EAN-13 symbol.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EncodedBarcode {
    /// 13 digits: the normalized 12-digit code plus its check digit.
    pub full_code: String,
    /// 95 modules, '1' = bar, '0' = space.
    pub pattern: String,
}

/// Normalize a numeric code to exactly 12 digits.
///
/// Shorter inputs are left-padded with zeros, longer inputs keep only
/// their first 12 digits. Non-digit characters are rejected here so
/// the arithmetic below never sees them.
pub fn normalize(code: &str) -> BarcodeResult<String> {
    if code.is_empty() {
        return Err(BarcodeError::Empty);
    }
    if let Some(bad) = code.chars().find(|c| !c.is_ascii_digit()) {
        return Err(BarcodeError::NonNumeric(bad));
    }

    if code.len() >= 12 {
        Ok(code[..12].to_string())
    } else {
        Ok(format!("{:0>12}", code))
    }
}

/// Standard EAN-13 check digit over a 12-digit code.
///
/// Digits at even indices weigh 1, odd indices weigh 3.
/// Callers must pass digits only (see [`normalize`]).
pub fn check_digit(code12: &str) -> u8 {
    let sum: u32 = code12
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let digit = (b - b'0') as u32;
            digit * if i % 2 == 0 { 1 } else { 3 }
        })
        .sum();

    ((10 - (sum % 10)) % 10) as u8
}

/// Encode a numeric code into the full 13-digit value and its
/// 95-module bar pattern.
///
/// Layout: start guard (3) + six left digits (42) + middle guard (5)
/// + six right digits (42) + end guard (3). The first digit of the
/// full code is not drawn itself; bit `5-(i-1)` of its value picks
/// the odd or even parity table for left-hand position `i`.
pub fn encode(code: &str) -> BarcodeResult<EncodedBarcode> {
    let code12 = normalize(code)?;
    let check = check_digit(&code12);
    let full_code = format!("{}{}", code12, check);

    let digits: Vec<usize> = full_code.bytes().map(|b| (b - b'0') as usize).collect();
    let first = digits[0];

    let mut pattern = String::with_capacity(95);
    pattern.push_str(START_GUARD);

    for (i, &digit) in digits[1..7].iter().enumerate() {
        let parity = (first >> (5 - i)) & 1;
        let table = if parity == 0 { &LEFT_ODD } else { &LEFT_EVEN };
        pattern.push_str(table[digit]);
    }

    pattern.push_str(MIDDLE_GUARD);

    for &digit in &digits[7..13] {
        pattern.push_str(RIGHT[digit]);
    }

    pattern.push_str(END_GUARD);

    Ok(EncodedBarcode { full_code, pattern })
}

/// Derive the next in-house barcode from the most recently issued one.
///
/// Codes are `COMPANY_PREFIX` + 3-digit sequence + check digit. A
/// missing or malformed last code restarts the sequence at 1; the
/// sequence hard-stops at 999.
pub fn generate_next(last_barcode: Option<&str>) -> BarcodeResult<String> {
    let sequence = next_sequence(last_barcode)?;
    let code12 = format!("{}{:03}", COMPANY_PREFIX, sequence);
    let check = check_digit(&code12);
    Ok(format!("{}{}", code12, check))
}

fn next_sequence(last_barcode: Option<&str>) -> BarcodeResult<u32> {
    let Some(last) = last_barcode else {
        return Ok(1);
    };

    let Some(sequence_str) = last.get(SEQUENCE_RANGE) else {
        return Ok(1);
    };

    let current = sequence_str.parse::<u32>().unwrap_or(0);
    let next = current + 1;
    if next > MAX_SEQUENCE {
        return Err(BarcodeError::SequenceExhausted);
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_digit_known_answer() {
        assert_eq!(check_digit("789846581577"), 1);
    }

    #[test]
    fn test_check_digit_in_range() {
        for code in ["000000000000", "123456789012", "999999999999", "789846581001"] {
            assert!(check_digit(code) <= 9);
        }
    }

    #[test]
    fn test_check_digit_satisfies_weighted_sum() {
        let code = "123456789012";
        let check = check_digit(code) as u32;
        let sum: u32 = code
            .bytes()
            .enumerate()
            .map(|(i, b)| (b - b'0') as u32 * if i % 2 == 0 { 1 } else { 3 })
            .sum();
        assert_eq!((sum + check) % 10, 0);
    }

    #[test]
    fn test_encode_known_answer() {
        let encoded = encode("789846581577").unwrap();
        assert_eq!(encoded.full_code, "7898465815771");
    }

    #[test]
    fn test_encode_pattern_shape() {
        let encoded = encode("789846581577").unwrap();
        assert_eq!(encoded.pattern.len(), 95);
        assert!(encoded.pattern.chars().all(|c| c == '0' || c == '1'));
        assert!(encoded.pattern.starts_with("101"));
        assert!(encoded.pattern.ends_with("101"));
        assert_eq!(&encoded.pattern[45..50], "01010");
    }

    #[test]
    fn test_normalize_pads_short_input() {
        assert_eq!(normalize("123").unwrap(), "000000000123");
    }

    #[test]
    fn test_normalize_truncates_long_input() {
        assert_eq!(normalize("1234567890123456").unwrap(), "123456789012");
    }

    #[test]
    fn test_normalize_rejects_non_digit() {
        assert_eq!(normalize("12345678901X"), Err(BarcodeError::NonNumeric('X')));
        assert_eq!(normalize(""), Err(BarcodeError::Empty));
    }

    #[test]
    fn test_generate_first_code() {
        let code = generate_next(None).unwrap();
        assert!(code.starts_with("789846581001"));
        assert_eq!(code.len(), 13);
    }

    #[test]
    fn test_generate_increments_sequence() {
        let code = generate_next(Some("7898465810574")).unwrap();
        assert!(code.starts_with("789846581058"));
    }

    #[test]
    fn test_generate_restarts_on_short_code() {
        let code = generate_next(Some("12345")).unwrap();
        assert!(code.starts_with("789846581001"));
    }

    #[test]
    fn test_generate_sequence_exhausted() {
        assert_eq!(
            generate_next(Some("7898465819992")),
            Err(BarcodeError::SequenceExhausted)
        );
    }

    #[test]
    fn test_generated_code_has_valid_check_digit() {
        let code = generate_next(Some("7898465810123")).unwrap();
        let check = check_digit(&code[..12]);
        assert_eq!(code.as_bytes()[12] - b'0', check);
    }
}
