/// Display-only masking. Card numbers keep their last four digits; short
/// secrets (CVV-sized) are replaced entirely. Never used for storage or
/// comparison.
pub fn mask(value: &str) -> String {
    let len = value.chars().count();

    if len > 4 {
        let tail: String = value.chars().skip(len - 4).collect();
        format!("**** **** **** {tail}")
    } else {
        "*".repeat(len)
    }
}
