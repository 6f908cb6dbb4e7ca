//! Strategy orchestration: primary extractor, conditional fallback, final ordering.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{AxisExtractor, ExtractorOutput, GenericExtractor, ParseDiagnostic, StatementExtractor};
use crate::error::{ExtractionError, Result};
use crate::models::config::RupaiyaConfig;
use crate::models::transaction::Transaction;
use crate::pdf::{TextExtractor, validate_mime};
use crate::text::{LineNormalizer, PageText};

/// Orchestrator states, recorded in the order they were entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineState {
    ExtractingPrimary,
    ExtractingFallback,
    PostProcessing,
    Done,
    Failed,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Newest first.
    pub transactions: Vec<Transaction>,
    /// Name of the strategy whose output was kept.
    pub strategy: &'static str,
    /// Lines the kept strategy skipped.
    pub diagnostics: Vec<ParseDiagnostic>,
    pub states: Vec<PipelineState>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Runs extraction strategies in priority order.
pub struct StatementPipeline {
    normalizer: LineNormalizer,
    strategies: Vec<Box<dyn StatementExtractor>>,
    min_primary_records: usize,
}

impl StatementPipeline {
    /// Axis-style extractor first, generic extractor as fallback.
    pub fn new(config: &RupaiyaConfig) -> Self {
        let strategies: Vec<Box<dyn StatementExtractor>> = vec![
            Box::new(AxisExtractor::new(&config.extraction, config.categories.clone())),
            Box::new(GenericExtractor::new(&config.extraction, config.categories.clone())),
        ];
        Self::with_strategies(
            LineNormalizer::new(&config.normalizer),
            strategies,
            config.extraction.min_primary_records,
        )
    }

    /// Custom strategy list; the first entry is the primary.
    pub fn with_strategies(
        normalizer: LineNormalizer,
        strategies: Vec<Box<dyn StatementExtractor>>,
        min_primary_records: usize,
    ) -> Self {
        Self {
            normalizer,
            strategies,
            min_primary_records,
        }
    }

    /// Read a document through `extractor` and run the pipeline on its text.
    pub fn process_document(
        &self,
        data: &[u8],
        mime: &str,
        extractor: &dyn TextExtractor,
    ) -> Result<PipelineOutcome> {
        validate_mime(mime)?;
        let pages = extractor.extract_pages(data)?;
        debug!("Document yielded {} pages of text", pages.len());
        self.run_pages(&pages)
    }

    pub fn run_pages(&self, pages: &[PageText]) -> Result<PipelineOutcome> {
        let lines = self.normalizer.normalize_pages(pages);
        self.run_lines(&lines)
    }

    pub fn run_text(&self, text: &str) -> Result<PipelineOutcome> {
        let lines = self.normalizer.normalize_text(text);
        self.run_lines(&lines)
    }

    /// Run the strategies over normalized lines.
    pub fn run_lines(&self, lines: &[String]) -> Result<PipelineOutcome> {
        let start = Instant::now();
        let mut states = Vec::new();

        let Some((primary, fallbacks)) = self.strategies.split_first() else {
            return Err(ExtractionError::Strategy {
                name: "pipeline".to_string(),
                reason: "no extraction strategies configured".to_string(),
            }
            .into());
        };

        info!("Extracting transactions from {} lines", lines.len());
        enter(&mut states, PipelineState::ExtractingPrimary);
        let mut chosen = primary.name();
        let mut best = primary.extract(lines);
        debug!("Strategy {} produced {} records", chosen, best.len());

        for fallback in fallbacks {
            if best.len() >= self.min_primary_records {
                break;
            }
            enter(&mut states, PipelineState::ExtractingFallback);
            let output = fallback.extract(lines);
            debug!("Strategy {} produced {} records", fallback.name(), output.len());

            if output.len() >= best.len() {
                chosen = fallback.name();
                best = output;
            }
        }

        enter(&mut states, PipelineState::PostProcessing);
        let ExtractorOutput {
            mut transactions,
            diagnostics,
        } = best;

        if transactions.is_empty() {
            enter(&mut states, PipelineState::Failed);
            warn!(
                "No transactions found in {} lines ({} skipped)",
                lines.len(),
                diagnostics.len()
            );
            return Err(ExtractionError::NoTransactionsFound.into());
        }

        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        enter(&mut states, PipelineState::Done);

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Extracted {} transactions using {} strategy in {}ms",
            transactions.len(),
            chosen,
            processing_time_ms
        );

        Ok(PipelineOutcome {
            transactions,
            strategy: chosen,
            diagnostics,
            states,
            processing_time_ms,
        })
    }
}

impl Default for StatementPipeline {
    fn default() -> Self {
        Self::new(&RupaiyaConfig::default())
    }
}

fn enter(states: &mut Vec<PipelineState>, state: PipelineState) {
    debug!("Pipeline state -> {:?}", state);
    states.push(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PdfError, RupaiyaError};
    use crate::models::category::Category;
    use crate::models::config::NormalizerConfig;
    use crate::pdf;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    struct FakeExtractor {
        pages: Option<Vec<PageText>>,
    }

    impl TextExtractor for FakeExtractor {
        fn extract_pages(&self, _data: &[u8]) -> pdf::Result<Vec<PageText>> {
            self.pages
                .clone()
                .ok_or_else(|| PdfError::Parse("broken xref table".to_string()))
        }
    }

    #[test]
    fn test_zomato_scenario() {
        let outcome = StatementPipeline::default()
            .run_text("12-03-2024 UPI/P2M/ZOMATO/ref123 450.00 10500.00")
            .unwrap();
        assert_eq!(outcome.transactions.len(), 1);

        let t = &outcome.transactions[0];
        assert_eq!(t.date_string(), "2024-03-12");
        assert!(t.description.contains("ZOMATO"));
        assert_eq!(t.merchant, "ZOMATO");
        assert_eq!(t.amount, dec("-450.00"));
        assert_eq!(t.category, Category::DiningOut);
    }

    #[test]
    fn test_salary_scenario() {
        let outcome = StatementPipeline::default()
            .run_text("01/04/2024 Salary Credit 50000.00 125000.00")
            .unwrap();
        let t = &outcome.transactions[0];
        assert_eq!(t.date_string(), "2024-04-01");
        assert_eq!(t.amount, dec("50000.00"));
        assert_eq!(t.category, Category::Others);
    }

    #[test]
    fn test_primary_sufficient_sorted_descending() {
        let text = r#"
            Tran Date  Chq No  Particulars  Debit  Credit  Balance
            01-03-2024  UPI/P2M/SWIGGY/991  300.00  9,700.00
            05-03-2024  NEFT/ACME CORP/SALARY  50,000.00  59,700.00
            03-03-2024  ATM WDL  1,000.00  8,700.00
        "#;
        let outcome = StatementPipeline::default().run_text(text).unwrap();

        assert_eq!(outcome.strategy, "axis");
        assert_eq!(
            outcome.states,
            vec![
                PipelineState::ExtractingPrimary,
                PipelineState::PostProcessing,
                PipelineState::Done,
            ]
        );
        let dates: Vec<String> = outcome.transactions.iter().map(|t| t.date_string()).collect();
        assert_eq!(dates, vec!["2024-03-05", "2024-03-03", "2024-03-01"]);
    }

    #[test]
    fn test_fallback_when_primary_finds_nothing() {
        let text = "2024-03-01 Coffee -100.00\n2024-03-05 Refund 50.00";
        let outcome = StatementPipeline::default().run_text(text).unwrap();

        assert_eq!(outcome.strategy, "generic");
        assert!(outcome.states.contains(&PipelineState::ExtractingFallback));
        assert_eq!(outcome.transactions[0].date_string(), "2024-03-05");
        assert_eq!(outcome.transactions[0].amount, dec("50.00"));
        assert_eq!(outcome.transactions[1].amount, dec("-100.00"));
    }

    #[test]
    fn test_fallback_output_never_mixed() {
        let text = r#"
            12-03-2024 UPI/P2M/ZOMATO/ref123 450.00 10500.00
            2024-03-14 Coffee -100.00
            2024-03-15 Tea -50.00
        "#;
        let outcome = StatementPipeline::default().run_text(text).unwrap();

        assert_eq!(outcome.strategy, "generic");
        assert_eq!(outcome.transactions.len(), 3);
        assert!(outcome.transactions.iter().all(|t| t.id.starts_with("generic-")));
    }

    #[test]
    fn test_primary_kept_when_fallback_smaller() {
        // The generic table starts after its header, so it sees no rows.
        let text = "12-03-2024 UPI/P2M/ZOMATO/ref123 450.00 10500.00\nDate Description Amount";
        let outcome = StatementPipeline::default().run_text(text).unwrap();

        assert_eq!(outcome.strategy, "axis");
        assert_eq!(outcome.transactions.len(), 1);
        assert!(outcome.states.contains(&PipelineState::ExtractingFallback));
    }

    #[test]
    fn test_preamble_lines_never_become_records() {
        let text = r#"
            Statement period 01/03/2024 to 31/03/2024 Page 1 of 3
            Customer DOB 12/05/1990 PIN 560001
            12-03-2024 UPI/P2M/ZOMATO/ref123 450.00 10500.00
        "#;
        let outcome = StatementPipeline::default().run_text(text).unwrap();

        assert_eq!(outcome.transactions.len(), 1);
        assert_eq!(outcome.transactions[0].date_string(), "2024-03-12");
        assert_eq!(outcome.transactions[0].merchant, "ZOMATO");
        assert_eq!(outcome.transactions[0].amount, dec("-450.00"));
    }

    #[test]
    fn test_threshold_zero_skips_fallback() {
        let mut config = RupaiyaConfig::default();
        config.extraction.min_primary_records = 0;

        let err = StatementPipeline::new(&config)
            .run_text("2024-03-01 Coffee -100.00")
            .unwrap_err();
        assert!(err.is_unsupported_format());
    }

    #[test]
    fn test_no_dates_is_error() {
        let err = StatementPipeline::default()
            .run_text("Welcome to your bank\nNo activity this period")
            .unwrap_err();
        assert!(err.is_unsupported_format());
    }

    #[test]
    fn test_empty_strategy_list() {
        let pipeline = StatementPipeline::with_strategies(
            LineNormalizer::new(&NormalizerConfig::default()),
            Vec::new(),
            2,
        );
        let err = pipeline.run_text("12-03-2024 X 1.00").unwrap_err();
        assert!(matches!(
            err,
            RupaiyaError::Extraction(ExtractionError::Strategy { .. })
        ));
    }

    #[test]
    fn test_process_document() {
        let extractor = FakeExtractor {
            pages: Some(vec![
                PageText::Plain("Tran Date Particulars Debit Credit Balance".to_string()),
                PageText::Plain("01-03-2024 ATM WDL 500.00 1,500.00\n02-03-2024 ATM WDL 100.00 1,400.00".to_string()),
            ]),
        };
        let outcome = StatementPipeline::default()
            .process_document(b"%PDF", "application/pdf", &extractor)
            .unwrap();
        assert_eq!(outcome.transactions.len(), 2);
    }

    #[test]
    fn test_process_document_errors() {
        let pipeline = StatementPipeline::default();
        let ok = FakeExtractor { pages: Some(Vec::new()) };

        let err = pipeline.process_document(b"", "text/plain", &ok).unwrap_err();
        assert!(matches!(err, RupaiyaError::InvalidInputFormat { .. }));

        let broken = FakeExtractor { pages: None };
        let err = pipeline
            .process_document(b"", "application/pdf", &broken)
            .unwrap_err();
        assert!(matches!(err, RupaiyaError::Pdf(PdfError::Parse(_))));
        assert!(err.to_string().contains("valid, unencrypted PDF"));

        let err = pipeline.process_document(b"", "application/pdf", &ok).unwrap_err();
        assert!(err.is_unsupported_format());
    }
}
