//! Merging per-document observations into a report.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::models::config::ReportConfig;
use crate::models::observation::{CustomerKey, ExtractionResult};
use crate::models::report::{
    AnalysisReport, CustomerSummary, FileSummary, PredictedSize, SizeCount,
};

/// Count values, most frequent first, ties in order of first appearance.
pub fn rank_by_frequency<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for value in values {
        match index.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn size_counts(ranked: &[(String, usize)], limit: usize) -> Vec<SizeCount> {
    ranked
        .iter()
        .take(limit)
        .map(|(size, count)| SizeCount {
            size: size.clone(),
            count: *count,
        })
        .collect()
}

/// Builds an [`AnalysisReport`] from extraction results.
pub struct Aggregator {
    config: ReportConfig,
}

impl Aggregator {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Build the report. One result per submitted document, in input order.
    pub fn build(&self, results: &[ExtractionResult]) -> AnalysisReport {
        let per_file = self.per_file(results);

        let all_sizes: Vec<&str> = results
            .iter()
            .flat_map(|r| r.sizes.iter().map(|s| s.size.as_str()))
            .collect();

        if all_sizes.is_empty() {
            return AnalysisReport {
                per_file,
                ..Default::default()
            };
        }

        let ranked = rank_by_frequency(all_sizes.iter().copied());

        AnalysisReport {
            top_sizes: size_counts(&ranked, self.config.top_sizes),
            total_orders: all_sizes.len(),
            per_file,
            top_customers: self.customers(results),
            predicted_top_sizes: self.forecast(&ranked),
        }
    }

    fn per_file(&self, results: &[ExtractionResult]) -> Vec<FileSummary> {
        results
            .iter()
            .map(|result| {
                let ranked = rank_by_frequency(result.sizes.iter().map(|s| s.size.as_str()));
                FileSummary {
                    filename: result.filename.clone(),
                    top_sizes: size_counts(&ranked, self.config.per_file_top_sizes),
                    total_orders: result.sizes.len(),
                }
            })
            .collect()
    }

    /// Customer table: order counts, summed amounts and source files.
    ///
    /// With a single document every customer is listed; with several, only
    /// customers seen more than once.
    pub fn customers(&self, results: &[ExtractionResult]) -> Vec<CustomerSummary> {
        let min_orders = if results.len() == 1 { 1 } else { 2 };

        let ranked = rank_by_frequency(
            results
                .iter()
                .flat_map(|r| r.phones.iter().map(|p| p.phone.as_str())),
        );

        let mut amounts: HashMap<&CustomerKey, f64> = HashMap::new();
        for observation in results.iter().flat_map(|r| &r.amounts) {
            *amounts.entry(&observation.customer).or_insert(0.0) += observation.amount;
        }
        if let Some(unattributed) = amounts.get(&CustomerKey::Unknown) {
            debug!("{} billed to no known customer", unattributed);
        }

        let mut files: HashMap<&str, BTreeSet<&str>> = HashMap::new();
        for observation in results.iter().flat_map(|r| &r.customer_files) {
            files
                .entry(observation.phone.as_str())
                .or_default()
                .insert(observation.filename.as_str());
        }

        ranked
            .into_iter()
            .filter(|(_, count)| *count >= min_orders)
            .take(self.config.max_customers)
            .map(|(phone, order_count)| {
                let key = CustomerKey::Phone(phone);
                let amount = amounts.get(&key).copied().unwrap_or(0.0);
                let filename = files
                    .get(key.as_str())
                    .map(|names| names.iter().copied().collect::<Vec<_>>().join(", "))
                    .unwrap_or_default();

                CustomerSummary {
                    customer: key.as_str().to_string(),
                    order_count,
                    amount,
                    filename,
                }
            })
            .collect()
    }

    /// Naive demand forecast over all size counts.
    ///
    /// Sizes are ordered numerically and smoothed with a trailing moving
    /// average (shorter at the start), scaled by the growth factor. Returns
    /// `None` when disabled or when any size is not an integer.
    pub fn forecast(&self, ranked: &[(String, usize)]) -> Option<Vec<PredictedSize>> {
        let settings = &self.config.forecast;
        if !settings.enabled || settings.window == 0 {
            return None;
        }

        let mut numeric = ranked
            .iter()
            .map(|(size, count)| size.parse::<u32>().ok().map(|n| (n, size.as_str(), *count)))
            .collect::<Option<Vec<_>>>()?;
        numeric.sort_by_key(|(n, _, _)| *n);

        let mut predicted: Vec<(f64, &str)> = numeric
            .iter()
            .enumerate()
            .map(|(i, (_, size, _))| {
                let window = &numeric[(i + 1).saturating_sub(settings.window)..=i];
                let total: usize = window.iter().map(|(_, _, count)| count).sum();
                let average = total as f64 / window.len() as f64;
                (average * settings.growth_factor, *size)
            })
            .collect();

        predicted.sort_by(|a, b| b.0.total_cmp(&a.0));
        predicted.truncate(settings.top);

        Some(
            predicted
                .into_iter()
                .map(|(demand, size)| PredictedSize {
                    size: size.to_string(),
                    predicted_demand: (demand * 100.0).round() / 100.0,
                })
                .collect(),
        )
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(ReportConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::observation::{AmountObservation, SizeObservation};
    use pretty_assertions::assert_eq;

    fn result(filename: &str, sizes: &[&str], phones: &[&str], amounts: &[(&str, f64)]) -> ExtractionResult {
        let mut result = ExtractionResult::new(filename);
        for size in sizes {
            result.sizes.push(SizeObservation {
                size: size.to_string(),
                block: 0,
            });
        }
        for phone in phones {
            result.push_phone(phone.to_string(), 0);
        }
        for (customer, amount) in amounts {
            let customer = if *customer == "unknown" {
                CustomerKey::Unknown
            } else {
                CustomerKey::Phone(customer.to_string())
            };
            result.amounts.push(AmountObservation {
                customer,
                amount: *amount,
                filename: filename.to_string(),
                block: Some(0),
            });
        }
        result
    }

    #[test]
    fn test_rank_by_frequency_is_stable() {
        let ranked = rank_by_frequency(["38", "36", "40", "36", "38", "42"]);
        assert_eq!(
            ranked,
            vec![
                ("38".to_string(), 2),
                ("36".to_string(), 2),
                ("40".to_string(), 1),
                ("42".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_top_sizes_and_per_file() {
        let results = vec![
            result("a.docx", &["36", "38", "36", "40", "42", "44", "46"], &[], &[]),
            result("b.docx", &["38"], &[], &[]),
        ];
        let report = Aggregator::default().build(&results);

        assert_eq!(report.total_orders, 8);
        assert_eq!(report.top_sizes.len(), 5);
        assert_eq!(report.top_sizes[0], SizeCount { size: "36".into(), count: 2 });
        assert_eq!(report.top_sizes[1], SizeCount { size: "38".into(), count: 2 });
        assert_eq!(report.top_sizes[4].size, "44");

        assert_eq!(report.per_file.len(), 2);
        assert_eq!(report.per_file[0].total_orders, 7);
        assert_eq!(report.per_file[0].top_sizes.len(), 5);
        assert_eq!(report.per_file[1].filename, "b.docx");
        assert_eq!(report.per_file[1].top_sizes, vec![SizeCount { size: "38".into(), count: 1 }]);
    }

    #[test]
    fn test_no_sizes_gives_empty_shaped_report() {
        let results = vec![
            result("a.docx", &[], &["01712345678"], &[("01712345678", 100.0)]),
            result("b.docx", &[], &[], &[]),
        ];
        let report = Aggregator::default().build(&results);

        assert!(report.top_sizes.is_empty());
        assert_eq!(report.total_orders, 0);
        assert!(report.top_customers.is_empty());
        assert!(report.predicted_top_sizes.is_none());
        assert_eq!(report.per_file.len(), 2);
        assert!(report.per_file.iter().all(|f| f.top_sizes.is_empty() && f.total_orders == 0));
    }

    #[test]
    fn test_single_document_keeps_single_orders() {
        let results = vec![result("a.docx", &["36"], &["01712345678"], &[])];
        let customers = Aggregator::default().customers(&results);

        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].order_count, 1);
        assert_eq!(customers[0].amount, 0.0);
        assert_eq!(customers[0].filename, "a.docx");
    }

    #[test]
    fn test_multiple_documents_require_repeat_customers() {
        let results = vec![
            result("b.docx", &["36"], &["01712345678", "01812345678"], &[("01812345678", 200.0)]),
            result("a.docx", &["38"], &["01812345678"], &[("01812345678", 50.5)]),
        ];
        let customers = Aggregator::default().customers(&results);

        assert_eq!(
            customers,
            vec![CustomerSummary {
                customer: "01812345678".into(),
                order_count: 2,
                amount: 250.5,
                filename: "a.docx, b.docx".into(),
            }]
        );
    }

    #[test]
    fn test_unknown_amounts_are_not_reported() {
        let results = vec![result(
            "a.docx",
            &["36"],
            &["01712345678"],
            &[("unknown", 900.0), ("01712345678", 100.0)],
        )];
        let customers = Aggregator::default().customers(&results);

        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].amount, 100.0);
    }

    #[test]
    fn test_customer_table_is_truncated() {
        let phones: Vec<String> = (0..25).map(|i| format!("017000000{:02}", i)).collect();
        let phone_refs: Vec<&str> = phones.iter().map(String::as_str).collect();
        let results = vec![result("a.docx", &["36"], &phone_refs, &[])];

        assert_eq!(Aggregator::default().customers(&results).len(), 20);
    }

    #[test]
    fn test_forecast_moving_average() {
        // Numeric order: 36 (4), 38 (2), 40 (6), 42 (1)
        let ranked = rank_by_frequency(
            std::iter::repeat_n("36", 4)
                .chain(std::iter::repeat_n("38", 2))
                .chain(std::iter::repeat_n("40", 6))
                .chain(std::iter::once("42")),
        );
        let predicted = Aggregator::default().forecast(&ranked).unwrap();

        // Averages: 36 -> 4, 38 -> 3, 40 -> 4, 42 -> 3 (x 1.1)
        assert_eq!(
            predicted,
            vec![
                PredictedSize { size: "36".into(), predicted_demand: 4.4 },
                PredictedSize { size: "40".into(), predicted_demand: 4.4 },
                PredictedSize { size: "38".into(), predicted_demand: 3.3 },
                PredictedSize { size: "42".into(), predicted_demand: 3.3 },
            ]
        );
    }

    #[test]
    fn test_forecast_disabled_or_non_numeric() {
        let ranked = vec![("36".to_string(), 1)];
        let mut config = ReportConfig::default();
        config.forecast.enabled = false;
        assert!(Aggregator::new(config).forecast(&ranked).is_none());

        let ranked = vec![("36".to_string(), 1), ("3x".to_string(), 1)];
        assert!(Aggregator::default().forecast(&ranked).is_none());
    }
}
