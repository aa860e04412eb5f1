use std::path::Path;

use chrono::{Datelike, Local, NaiveDate};
use skyline_core::calculations::{
    AmortizationCalculator, ProjectionCalculator, ProjectionConfig, ValuationEngine,
};
use skyline_core::{
    ConstructionMaterial, LoanInput, ModelConfig, ModelRegistry, PredictionModel,
    PredictionResult, PropertyInput, ValuationError,
};
use skyline_data::{MarketDataError, MarketDataLoader};
use skyline_model_json::JsonModelLoader;
use thiserror::Error;
use tracing::{info, warn};

use crate::form::{FormErrors, PropertyForm};
use crate::report::{LoanSummary, MarketReport, ValuationReport};

/// Build the registry of every model format compiled into this binary.
pub fn build_registry() -> ModelRegistry {
    let mut registry = ModelRegistry::new();
    registry.register(Box::new(JsonModelLoader));
    registry
}

/// Why one row of a batch could not be valued.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BatchError {
    #[error(transparent)]
    Form(#[from] FormErrors),

    #[error(transparent)]
    Valuation(#[from] ValuationError),
}

/// Outcome for one row of a batch, numbered from 1 in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    pub row: usize,
    pub result: Result<PredictionResult, BatchError>,
}

/// The loaded model plus the calculators every view shares.
///
/// The model is loaded once, in [`Dashboard::start`]. A load failure is kept
/// and reported by each valuation instead of aborting, so loan and market
/// views keep working without a model.
pub struct Dashboard {
    model: Result<Box<dyn PredictionModel>, ValuationError>,
    amortization: AmortizationCalculator,
    projection: ProjectionCalculator,
    today: NaiveDate,
}

impl Dashboard {
    /// Startup phase: resolve the model format and load the artifact.
    pub fn start(
        registry: &ModelRegistry,
        model_config: &ModelConfig,
        projection: ProjectionConfig,
    ) -> Self {
        let model = registry.load(model_config);
        match &model {
            Ok(m) => info!(model = m.name(), path = %model_config.artifact_path.display(), "model ready"),
            Err(e) => warn!(error = %e, "valuation disabled"),
        }
        Self::with_model(model, projection)
    }

    pub fn with_model(
        model: Result<Box<dyn PredictionModel>, ValuationError>,
        projection: ProjectionConfig,
    ) -> Self {
        Self {
            model,
            amortization: AmortizationCalculator::default(),
            projection: ProjectionCalculator::new(projection),
            today: Local::now().date_naive(),
        }
    }

    /// Pin "today", which bounds construction dates and sets the age
    /// reference year.
    pub fn with_today(
        mut self,
        today: NaiveDate,
    ) -> Self {
        self.today = today;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn model_error(&self) -> Option<&ValuationError> {
        self.model.as_ref().err()
    }

    fn engine(&self) -> Result<ValuationEngine<'_>, ValuationError> {
        let model = self.model.as_ref().map_err(Clone::clone)?;
        Ok(ValuationEngine::new(Some(model.as_ref())).with_reference_year(self.today.year()))
    }

    pub fn estimate(
        &self,
        property: &PropertyInput,
    ) -> Result<PredictionResult, ValuationError> {
        self.engine()?.estimate(property)
    }

    pub fn loan_summary(
        &self,
        loan: &LoanInput,
    ) -> Result<LoanSummary, ValuationError> {
        loan_summary(&self.amortization, loan)
    }

    /// Runs the full report: valuation, then projection of the valuation,
    /// with the loan summary computed independently.
    pub fn valuation_report(
        &self,
        property: &PropertyInput,
        material: ConstructionMaterial,
        loan: &LoanInput,
    ) -> ValuationReport {
        let valuation = self.estimate(property);
        let projection = valuation
            .as_ref()
            .ok()
            .map(|prediction| self.projection.project(prediction));

        ValuationReport {
            property: property.clone(),
            material,
            reference_year: self.today.year(),
            valuation,
            projection,
            loan: self.loan_summary(loan),
        }
    }

    /// Validates and values every form, keeping going past bad rows.
    pub fn value_batch(
        &self,
        forms: &[PropertyForm],
    ) -> Vec<BatchRow> {
        forms
            .iter()
            .enumerate()
            .map(|(idx, form)| {
                let result = form
                    .validate(self.today)
                    .map_err(BatchError::from)
                    .and_then(|input| self.estimate(&input).map_err(BatchError::from));
                if let Err(e) = &result {
                    warn!(row = idx + 1, error = %e, "batch row not valued");
                }
                BatchRow {
                    row: idx + 1,
                    result,
                }
            })
            .collect()
    }
}

/// EMI plus principal/interest split. Needs no model.
pub fn loan_summary(
    calculator: &AmortizationCalculator,
    loan: &LoanInput,
) -> Result<LoanSummary, ValuationError> {
    Ok(LoanSummary {
        loan: *loan,
        emi: calculator.calculate(loan)?,
        split: calculator.principal_interest_split(loan)?,
    })
}

/// Loads the market dataset and builds the analytics view.
///
/// [`MarketDataError::DataUnavailable`] is returned as-is so the caller can
/// show a notice instead of failing.
pub fn market_report(path: &Path) -> Result<MarketReport, MarketDataError> {
    let records = MarketDataLoader::load_from_file(path)?;
    info!(records = records.len(), path = %path.display(), "market data loaded");
    Ok(MarketReport::from_records(&records))
}
