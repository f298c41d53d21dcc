//! Card number generation and Luhn validation. The Luhn check only catches
//! accidental transcription errors; it is an input gate, not a security
//! measure.

use rand::Rng;

/// Generates a Luhn-valid 16-digit card number: the 6-digit BIN prefix,
/// nine random digits and the check digit. Demo/test issuance only.
pub fn generate(bin: &str) -> String {
    let mut number = String::with_capacity(16);
    number.push_str(bin);

    let mut rng = rand::rng();
    while number.len() < 15 {
        let digit: u8 = rng.random_range(0..10);
        number.push((b'0' + digit) as char);
    }

    let check = luhn_check_digit(&number);
    number.push((b'0' + check as u8) as char);

    number
}

/// Check digit over a digit string: starting from the rightmost digit,
/// every digit at an even distance from the end is doubled (minus 9 when
/// the double exceeds 9) before summing.
pub fn luhn_check_digit(digits: &str) -> u32 {
    let sum: u32 = digits
        .chars()
        .rev()
        .enumerate()
        .map(|(i, c)| {
            let mut digit = c.to_digit(10).unwrap_or(0);
            if i % 2 == 0 {
                digit *= 2;
                if digit > 9 {
                    digit -= 9;
                }
            }
            digit
        })
        .sum();

    (10 - sum % 10) % 10
}

/// A number is valid when it is exactly 16 ASCII digits and the check
/// digit recomputed over the first 15 matches the 16th.
pub fn validate(number: &str) -> bool {
    if number.len() != 16 || !number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let (payload, check) = number.split_at(15);
    check
        .parse::<u32>()
        .map(|digit| digit == luhn_check_digit(payload))
        .unwrap_or(false)
}
