//! Facts extracted from a single document.

use std::fmt;

use serde::{Serialize, Serializer};

/// Key used for amounts that could not be tied to any phone number.
pub const UNKNOWN_CUSTOMER: &str = "unknown";

/// Customer an amount is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CustomerKey {
    /// Normalized phone number (10-13 digits).
    Phone(String),
    /// No phone number could be associated.
    Unknown,
}

impl CustomerKey {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Phone(phone) => phone,
            Self::Unknown => UNKNOWN_CUSTOMER,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for CustomerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CustomerKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A 2-3 digit size token found on a "size" line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeObservation {
    /// Raw size token, e.g. `"36"`.
    pub size: String,
    /// Index of the block the token was found in.
    pub block: usize,
}

/// A phone number attributed to a customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneObservation {
    /// Digits-only phone number.
    pub phone: String,
    /// Index of the block the number was found in.
    pub block: usize,
}

/// A billed amount and the customer it was attributed to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmountObservation {
    pub customer: CustomerKey,
    pub amount: f64,
    /// Source filename.
    pub filename: String,
    /// Block index, `None` when recovered by the document-wide fallback.
    pub block: Option<usize>,
}

/// Phone number to source file provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerFileObservation {
    pub phone: String,
    pub filename: String,
}

/// Everything extracted from one document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionResult {
    /// Source filename.
    pub filename: String,
    pub sizes: Vec<SizeObservation>,
    pub phones: Vec<PhoneObservation>,
    pub amounts: Vec<AmountObservation>,
    pub customer_files: Vec<CustomerFileObservation>,
}

impl ExtractionResult {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Default::default()
        }
    }

    /// Size tokens in extraction order.
    pub fn size_tokens(&self) -> Vec<&str> {
        self.sizes.iter().map(|s| s.size.as_str()).collect()
    }

    /// Phone numbers in extraction order.
    pub fn phone_numbers(&self) -> Vec<&str> {
        self.phones.iter().map(|p| p.phone.as_str()).collect()
    }

    /// Record a phone together with its provenance.
    pub(crate) fn push_phone(&mut self, phone: String, block: usize) {
        self.customer_files.push(CustomerFileObservation {
            phone: phone.clone(),
            filename: self.filename.clone(),
        });
        self.phones.push(PhoneObservation { phone, block });
    }
}
