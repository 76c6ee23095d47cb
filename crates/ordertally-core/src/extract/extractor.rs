//! Per-document fact extraction pipeline.

use std::collections::HashSet;
use std::time::Instant;

use tracing::{debug, trace};

use super::rules::patterns::PHONE_LINE;
use super::rules::{
    evaluate_bill_expression, BillExtractor, FieldExtractor, PhoneExtractor, SizeExtractor,
};
use crate::document::{DocumentSource, DocxDocument};
use crate::models::observation::{AmountObservation, CustomerKey, ExtractionResult, SizeObservation};
use crate::text::{normalize_document, Block, SegmentationPipeline};

/// Where the customers of a bill amount came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribution {
    /// Phone numbers in the same block.
    Block,
    /// Phone numbers anywhere in the document.
    Document,
    /// No phone number at all.
    Unknown,
}

/// Turns one document into size, phone and amount observations.
pub struct FactExtractor {
    segmentation: SegmentationPipeline,
    sizes: SizeExtractor,
    phones: PhoneExtractor,
    bills: BillExtractor,
}

impl FactExtractor {
    /// Create an extractor with the default segmentation strategies.
    pub fn new() -> Self {
        Self {
            segmentation: SegmentationPipeline::default(),
            sizes: SizeExtractor::new(),
            phones: PhoneExtractor::new(),
            bills: BillExtractor::new(),
        }
    }

    /// Replace the block segmentation strategies.
    pub fn with_segmentation(mut self, segmentation: SegmentationPipeline) -> Self {
        self.segmentation = segmentation;
        self
    }

    /// Open a DOCX document and extract its facts.
    pub fn extract_bytes(&self, data: &[u8], filename: &str) -> crate::Result<ExtractionResult> {
        let document = DocxDocument::from_bytes(data)?;
        Ok(self.extract_document(&document, filename))
    }

    /// Extract facts from any document source.
    pub fn extract_document<D: DocumentSource + ?Sized>(
        &self,
        source: &D,
        filename: &str,
    ) -> ExtractionResult {
        self.extract_text(&normalize_document(source), filename)
    }

    /// Extract facts from already normalized text.
    pub fn extract_text(&self, text: &str, filename: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut result = ExtractionResult::new(filename);

        // Document-wide pre-pass, used only as last-resort fallbacks.
        let doc_phones = distinct(self.candidates(text));
        let doc_bills = self.bills.extract_all(text);

        let blocks = self.segmentation.segment(text);

        for block in &blocks {
            self.extract_block(block, &doc_phones, &mut result);
        }

        if result.amounts.is_empty() && !doc_bills.is_empty() {
            debug!(
                "No amounts found in blocks of {}, re-reading {} bill lines",
                filename,
                doc_bills.len()
            );
            let customers = if doc_phones.is_empty() {
                vec![CustomerKey::Unknown]
            } else {
                phone_keys(&doc_phones)
            };

            for bill in &doc_bills {
                if let Ok(amount) = evaluate_bill_expression(&bill.value) {
                    for customer in &customers {
                        result.amounts.push(AmountObservation {
                            customer: customer.clone(),
                            amount,
                            filename: filename.to_string(),
                            block: None,
                        });
                    }
                }
            }
        }

        debug!(
            "Extracted {} sizes, {} phones, {} amounts from {} ({} blocks) in {}ms",
            result.sizes.len(),
            result.phones.len(),
            result.amounts.len(),
            filename,
            blocks.len(),
            start.elapsed().as_millis()
        );

        result
    }

    fn extract_block(&self, block: &Block<'_>, doc_phones: &[String], result: &mut ExtractionResult) {
        for size in self.sizes.extract_all(block.text) {
            result.sizes.push(SizeObservation {
                size: size.value,
                block: block.index,
            });
        }

        for phone in self.block_phones(block.text) {
            result.push_phone(phone, block.index);
        }

        let bills = self.bills.amounts(block.text);
        if bills.is_empty() {
            return;
        }

        let (attribution, customers) = self.attribute(block.text, doc_phones);
        for (bill, amount) in bills {
            match amount {
                Ok(amount) => {
                    trace!(
                        "Block {}: {} -> {} attributed to {:?} ({} customers)",
                        block.index,
                        bill.value,
                        amount,
                        attribution,
                        customers.len()
                    );
                    for customer in &customers {
                        result.amounts.push(AmountObservation {
                            customer: customer.clone(),
                            amount,
                            filename: result.filename.clone(),
                            block: Some(block.index),
                        });
                    }
                }
                Err(e) => debug!("Dropping bill expression {:?}: {}", bill.value, e),
            }
        }
    }

    /// Phones recorded for a block.
    ///
    /// Lines mentioning "number" or "phone" are read first; all of their
    /// candidates are kept. Only when the block has no such line is the whole
    /// block scanned, with duplicates suppressed.
    fn block_phones(&self, text: &str) -> Vec<String> {
        let labeled: Vec<&str> = text.split('\n').filter(|l| PHONE_LINE.is_match(l)).collect();

        if labeled.is_empty() {
            distinct(self.candidates(text))
        } else {
            labeled.into_iter().flat_map(|line| self.candidates(line)).collect()
        }
    }

    /// Customers a bill amount in this block belongs to.
    ///
    /// Every phone candidate in the block gets the full amount, repeats
    /// included. Without one, every distinct phone in the document, then the
    /// unknown customer.
    pub fn attribute(&self, block_text: &str, doc_phones: &[String]) -> (Attribution, Vec<CustomerKey>) {
        let block_phones = self.candidates(block_text);

        if !block_phones.is_empty() {
            (Attribution::Block, phone_keys(&block_phones))
        } else if !doc_phones.is_empty() {
            (Attribution::Document, phone_keys(doc_phones))
        } else {
            (Attribution::Unknown, vec![CustomerKey::Unknown])
        }
    }

    fn candidates(&self, text: &str) -> Vec<String> {
        self.phones.extract_all(text).into_iter().map(|m| m.value).collect()
    }
}

impl Default for FactExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn distinct(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values.into_iter().filter(|v| seen.insert(v.clone())).collect()
}

fn phone_keys(phones: &[String]) -> Vec<CustomerKey> {
    phones.iter().cloned().map(CustomerKey::Phone).collect()
}
