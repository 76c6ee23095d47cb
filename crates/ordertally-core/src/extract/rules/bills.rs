//! Bill line detection and amount evaluation.

use super::expression::evaluate_arithmetic;
use super::patterns::{ARITHMETIC_ONLY, BILL_LINE, CURRENCY, NUMBER_TOKEN};
use super::{lines_with_offsets, ExtractionMatch, FieldExtractor};
use crate::error::EvalError;

/// Captures the expression following a "bill" / "total bill" label.
pub struct BillExtractor;

impl BillExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract and evaluate every bill line, keeping failures.
    pub fn amounts(&self, text: &str) -> Vec<(ExtractionMatch<String>, Result<f64, EvalError>)> {
        self.extract_all(text)
            .into_iter()
            .map(|m| {
                let amount = evaluate_bill_expression(&m.value);
                (m, amount)
            })
            .collect()
    }
}

impl Default for BillExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for BillExtractor {
    /// The raw expression text after the label.
    type Output = ExtractionMatch<String>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for (offset, line) in lines_with_offsets(text) {
            if let Some(caps) = BILL_LINE.captures(line) {
                if let Some(expression) = caps.get(1) {
                    results.push(
                        ExtractionMatch::new(expression.as_str().trim().to_string(), line)
                            .with_position(offset + expression.start(), offset + expression.end()),
                    );
                }
            }
        }

        results
    }
}

/// Evaluate the text following a bill label.
///
/// Rules, in order:
/// 1. With an `=`, the last number after the last `=` wins
///    (`"100+50=150"` is 150, the written total).
/// 2. With an operator, the expression is evaluated as arithmetic.
/// 3. Otherwise, or when arithmetic fails, the last number in the text.
pub fn evaluate_bill_expression(expression: &str) -> Result<f64, EvalError> {
    if expression.is_empty() {
        return Err(EvalError::Empty);
    }

    let without_currency = CURRENCY.replace_all(expression, "");
    let cleaned = without_currency.replace(',', "");
    let cleaned = cleaned.trim();

    if let Some((_, rhs)) = cleaned.rsplit_once('=') {
        if let Some(value) = last_number(rhs) {
            return Ok(value);
        }
    } else if cleaned.contains(['+', '-', '*', '/']) {
        let filtered: String = cleaned
            .chars()
            .filter(|c| c.is_ascii_digit() || "+-*/.() ".contains(*c) || c.is_whitespace())
            .collect();

        if ARITHMETIC_ONLY.is_match(&filtered) {
            if let Ok(value) = evaluate_arithmetic(&filtered) {
                return Ok(value);
            }
        }
    }

    last_number(cleaned).ok_or_else(|| EvalError::NoNumber {
        expression: expression.to_string(),
    })
}

fn last_number(text: &str) -> Option<f64> {
    NUMBER_TOKEN
        .find_iter(text)
        .last()
        .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equals_takes_written_total() {
        assert_eq!(evaluate_bill_expression("100+50=150"), Ok(150.0));
        assert_eq!(evaluate_bill_expression("100+50=160"), Ok(160.0));
        assert_eq!(evaluate_bill_expression("a=1 = 250 tk"), Ok(250.0));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(evaluate_bill_expression("120+60"), Ok(180.0));
        assert_eq!(evaluate_bill_expression("(250 * 2) + 60"), Ok(560.0));
        // Letters are filtered out, leaving "2  500 + 120", which is not valid.
        assert_eq!(evaluate_bill_expression("2 x 500 + 120"), Ok(120.0));
    }

    #[test]
    fn test_currency_words_are_stripped() {
        assert_eq!(evaluate_bill_expression("680 tk"), Ok(680.0));
        assert_eq!(evaluate_bill_expression("Tk. 1,250"), Ok(1250.0));
        assert_eq!(evaluate_bill_expression("500 Taka"), Ok(500.0));
        assert_eq!(evaluate_bill_expression("৳ 300+200"), Ok(500.0));
    }

    #[test]
    fn test_failed_arithmetic_falls_back_to_last_number() {
        assert_eq!(evaluate_bill_expression("500/-"), Ok(500.0));
        assert_eq!(evaluate_bill_expression("1200 - paid"), Ok(1200.0));
        assert_eq!(evaluate_bill_expression("300/0"), Ok(0.0));

        let nested = format!("{}250{}+40", "(".repeat(100_000), ")".repeat(100_000));
        assert_eq!(evaluate_bill_expression(&nested), Ok(40.0));
        let signs = format!("{}900", "-".repeat(100_000));
        assert_eq!(evaluate_bill_expression(&signs), Ok(900.0));
    }

    #[test]
    fn test_no_number() {
        assert_eq!(evaluate_bill_expression(""), Err(EvalError::Empty));
        assert_eq!(
            evaluate_bill_expression("due"),
            Err(EvalError::NoNumber {
                expression: "due".to_string()
            })
        );
        assert_eq!(
            evaluate_bill_expression("tk"),
            Err(EvalError::NoNumber {
                expression: "tk".to_string()
            })
        );
    }

    #[test]
    fn test_bill_lines() {
        let text = "Name: Rahim\nTotal Bill: 100+50\nbill - 680 tk\nBilling address: Road 12\nrebill 5";
        let found: Vec<String> = BillExtractor::new()
            .extract_all(text)
            .into_iter()
            .map(|m| m.value)
            .collect();

        assert_eq!(found, vec!["100+50", "680 tk"]);
    }

    #[test]
    fn test_amounts_keep_failures() {
        let amounts = BillExtractor::new().amounts("Bill: 450\nBill: pending");
        assert_eq!(amounts.len(), 2);
        assert_eq!(amounts[0].1, Ok(450.0));
        assert!(amounts[1].1.is_err());
    }
}
