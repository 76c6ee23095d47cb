//! Aggregated report returned to clients.

use serde::{Deserialize, Serialize};

/// A size and how many times it was ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeCount {
    pub size: String,
    pub count: usize,
}

/// Per-file breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSummary {
    pub filename: String,
    pub top_sizes: Vec<SizeCount>,
    /// Number of size observations in this file.
    pub total_orders: usize,
}

/// One row of the customer table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSummary {
    /// Customer key (phone number).
    pub customer: String,
    pub order_count: usize,
    /// Sum of billed amounts, 0 when none were found.
    pub amount: f64,
    /// Sorted, de-duplicated source filenames joined with `", "`.
    pub filename: String,
}

/// Forecast entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedSize {
    pub size: String,
    pub predicted_demand: f64,
}

/// Full analysis report for a batch of documents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub top_sizes: Vec<SizeCount>,
    pub total_orders: usize,
    pub per_file: Vec<FileSummary>,
    pub top_customers: Vec<CustomerSummary>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub predicted_top_sizes: Option<Vec<PredictedSize>>,
}
