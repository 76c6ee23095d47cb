//! Common regex patterns for order-sheet extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Size lines and tokens
    pub static ref SIZE_LINE: Regex = Regex::new(r"(?i)\bsize\b").unwrap();

    pub static ref SIZE_TOKEN: Regex = Regex::new(r"\d{2,3}").unwrap();

    // Phone lines (substring match, "Number", "phone no", "Telephone")
    pub static ref PHONE_LINE: Regex = Regex::new(r"(?i)number|phone").unwrap();

    // Loosely phone-shaped: digit, 8+ of digit/space/dash/paren, digit
    pub static ref PHONE_LOOSE: Regex = Regex::new(r"\+?\d[\d \t\-()]{8,}\d").unwrap();

    pub static ref PHONE_BARE: Regex = Regex::new(r"\b\d{10,13}\b").unwrap();

    // Bill label, the capture is the amount expression
    pub static ref BILL_LINE: Regex = Regex::new(
        r"(?i)\b(?:total\s+)?bill\b[ \t]*[:\-]?[ \t]*(.*)$"
    ).unwrap();

    // Currency words and signs stripped before evaluation
    pub static ref CURRENCY: Regex = Regex::new(r"(?i)(?:taka|tk)\.?|৳").unwrap();

    // Decimal-like numeric token ("1,250" and "99.5" are single tokens)
    pub static ref NUMBER_TOKEN: Regex = Regex::new(r"\d+(?:[.,]\d+)?").unwrap();

    pub static ref ARITHMETIC_ONLY: Regex = Regex::new(r"^[0-9+\-*/.\s()]+$").unwrap();
}
