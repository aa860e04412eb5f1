//! Plain-text rendering of valuation, loan and market results.

use std::fmt::{self, Display, Formatter};

use skyline_core::{
    AmortizationPeriod, AmortizationResult, ConstructionMaterial, LoanInput, PredictionResult,
    PrincipalInterestSplit, ProjectionResult, PropertyDimensions, PropertyInput, ValuationError,
};
use skyline_data::{
    AgePricePoint, AreaPricePoint, BedroomCount, MarketRecord, MarketSummary, age_depreciation,
    bedroom_distribution, price_vs_area, summary,
};

use crate::app::BatchRow;
use crate::utils::{format_amount, format_area, format_lakhs, format_rupees};

const LABEL_WIDTH: usize = 16;

fn heading(
    f: &mut Formatter<'_>,
    title: &str,
) -> fmt::Result {
    writeln!(f, "{title}")?;
    writeln!(f, "{}", "-".repeat(title.chars().count()))
}

fn row(
    f: &mut Formatter<'_>,
    label: &str,
    value: impl Display,
) -> fmt::Result {
    writeln!(f, "  {label:<width$}{value}", width = LABEL_WIDTH)
}

/// EMI and principal/interest breakdown for one loan.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanSummary {
    pub loan: LoanInput,
    pub emi: AmortizationResult,
    pub split: PrincipalInterestSplit,
}

impl Display for LoanSummary {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> fmt::Result {
        row(f, "Loan amount", format_amount(self.loan.principal))?;
        row(
            f,
            "Interest rate",
            format!(
                "{}% for {} years ({} installments)",
                self.loan.annual_rate_percent, self.loan.tenure_years, self.emi.installments
            ),
        )?;
        row(f, "Monthly EMI", format_rupees(self.emi.monthly_installment))?;
        row(f, "Total interest", format_amount(self.emi.total_interest))?;
        row(f, "Total payable", format_amount(self.emi.total_payable))?;
        row(f, "Interest share", format!("{}%", self.split.interest_share_percent))
    }
}

/// Everything the valuation report shows for one property.
///
/// Each section carries its own outcome so a failed valuation still leaves
/// the loan summary intact.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationReport {
    pub property: PropertyInput,
    pub material: ConstructionMaterial,
    pub reference_year: i32,
    pub valuation: Result<PredictionResult, ValuationError>,
    /// Present only when the valuation succeeded.
    pub projection: Option<Result<ProjectionResult, ValuationError>>,
    pub loan: Result<LoanSummary, ValuationError>,
}

impl ValuationReport {
    fn fmt_property(
        &self,
        f: &mut Formatter<'_>,
    ) -> fmt::Result {
        let p = &self.property;
        heading(f, "Property")?;
        row(f, "Type", p.property_type().label())?;
        match p.dimensions {
            PropertyDimensions::House { plot_area, floors } => {
                row(f, "Plot area", format_area(plot_area))?;
                row(f, "Floors", floors)?;
            }
            PropertyDimensions::Apartment {
                carpet_area,
                balcony_area,
            } => {
                row(f, "Carpet area", format_area(carpet_area))?;
                row(f, "Balcony", format_area(balcony_area))?;
            }
        }
        row(f, "Total area", format_area(p.area()))?;
        row(
            f,
            "Built",
            format!("{} ({} years)", p.construction_date, p.age(self.reference_year)),
        )?;
        row(f, "Bedrooms", format!("{} BHK", p.bedrooms))?;
        row(f, "Distance", format!("{} km", p.distance_km))?;
        row(
            f,
            "Material",
            format!(
                "{} (quality {}/100)",
                self.material.label(),
                self.material.quality_score()
            ),
        )
    }
}

impl Display for ValuationReport {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "SkyLine Valuation Report")?;
        writeln!(f, "========================")?;
        writeln!(f)?;

        self.fmt_property(f)?;
        writeln!(f)?;

        heading(f, "Estimated Market Value")?;
        match &self.valuation {
            Ok(prediction) => row(f, "Value", format_lakhs(prediction.price_lakhs))?,
            Err(e) => writeln!(f, "  Valuation unavailable: {e}")?,
        }
        writeln!(f)?;

        heading(f, "Financial Summary")?;
        match &self.loan {
            Ok(summary) => write!(f, "{summary}")?,
            Err(e) => writeln!(f, "  Loan summary unavailable: {e}")?,
        }

        if let Some(projection) = &self.projection {
            writeln!(f)?;
            match projection {
                Ok(p) => {
                    heading(f, &format!("Future Projection ({}Y)", p.years))?;
                    row(f, "Projected value", format_amount(p.future_value))?;
                    row(f, "Growth", format!("{}% per year", p.annual_growth_percent))?;
                    row(f, "Appreciation", format_amount(p.appreciation()))?;
                }
                Err(e) => {
                    heading(f, "Future Projection")?;
                    writeln!(f, "  Projection unavailable: {e}")?;
                }
            }
        }
        Ok(())
    }
}

/// A standalone projection, as printed by `skyline project`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionSummary(pub ProjectionResult);

impl Display for ProjectionSummary {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> fmt::Result {
        let p = &self.0;
        heading(f, &format!("Future Projection ({}Y)", p.years))?;
        row(f, "Present value", format_amount(p.present_value))?;
        row(f, "Growth", format!("{}% per year", p.annual_growth_percent))?;
        row(f, "Projected value", format_amount(p.future_value))?;
        row(f, "Appreciation", format_amount(p.appreciation()))
    }
}

/// Month-by-month repayment table.
pub struct ScheduleTable<'a>(pub &'a [AmortizationPeriod]);

impl Display for ScheduleTable<'_> {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "{:>5}  {:>14}  {:>14}  {:>14}  {:>16}",
            "Month", "Installment", "Interest", "Principal", "Balance"
        )?;
        for p in self.0 {
            writeln!(
                f,
                "{:>5}  {:>14}  {:>14}  {:>14}  {:>16}",
                p.period, p.installment, p.interest, p.principal, p.balance
            )?;
        }
        Ok(())
    }
}

/// One line per batch row: the price, or why the row was skipped.
pub struct BatchTable<'a>(pub &'a [BatchRow]);

impl Display for BatchTable<'_> {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "{:>4}  {:>12}  {:>12}  {:>4}", "Row", "Price", "Area", "Age")?;
        let mut valued = 0;
        for r in self.0 {
            match &r.result {
                Ok(p) => {
                    valued += 1;
                    writeln!(
                        f,
                        "{:>4}  {:>12}  {:>12}  {:>4}",
                        r.row,
                        format_lakhs(p.price_lakhs),
                        format_area(p.area),
                        p.age
                    )?;
                }
                Err(e) => writeln!(f, "{:>4}  skipped: {e}", r.row)?,
            }
        }
        writeln!(f)?;
        writeln!(f, "{valued} of {} rows valued", self.0.len())
    }
}

/// Market analytics view over the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketReport {
    pub summary: Option<MarketSummary>,
    pub price_vs_area: Vec<AreaPricePoint>,
    pub bedrooms: Vec<BedroomCount>,
    pub age_depreciation: Vec<AgePricePoint>,
}

impl MarketReport {
    pub fn from_records(records: &[MarketRecord]) -> Self {
        Self {
            summary: summary(records),
            price_vs_area: price_vs_area(records),
            bedrooms: bedroom_distribution(records),
            age_depreciation: age_depreciation(records),
        }
    }
}

impl Display for MarketReport {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Market Trends & Insights")?;
        writeln!(f, "========================")?;
        writeln!(f)?;

        let Some(stats) = &self.summary else {
            return writeln!(f, "  No market records.");
        };
        row(f, "Sales", stats.count)?;
        row(f, "Mean price", format!("{:.2} L", stats.mean_price))?;
        row(
            f,
            "Price range",
            format!("{:.2} L to {:.2} L", stats.min_price, stats.max_price),
        )?;
        row(f, "Mean area", format_area(stats.mean_area))?;
        writeln!(f)?;

        heading(f, "Price vs Area")?;
        writeln!(f, "  {:>10}  {:>10}", "Area", "Price (L)")?;
        for p in &self.price_vs_area {
            writeln!(f, "  {:>10.0}  {:>10.2}", p.area, p.price)?;
        }
        writeln!(f)?;

        heading(f, "Bedroom Distribution")?;
        writeln!(f, "  {:>5}  {:>6}  {:>6}", "BHK", "Count", "Share")?;
        for b in &self.bedrooms {
            let share = b.count as f64 / stats.count as f64 * 100.0;
            writeln!(f, "  {:>5}  {:>6}  {:>5.1}%", b.bedrooms, b.count, share)?;
        }
        writeln!(f)?;

        heading(f, "Property Age Depreciation")?;
        writeln!(f, "  {:>6}  {:>10}  {:>9}", "Age", "Price (L)", "Dist (km)")?;
        for p in &self.age_depreciation {
            writeln!(f, "  {:>6.0}  {:>10.2}  {:>9.1}", p.age, p.price, p.distance)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use skyline_core::FeatureVector;

    use super::*;

    fn property() -> PropertyInput {
        PropertyInput {
            construction_date: NaiveDate::from_ymd_opt(2016, 1, 1).unwrap(),
            dimensions: PropertyDimensions::House {
                plot_area: 1200.0,
                floors: 2.0,
            },
            bedrooms: 3,
            distance_km: 5.0,
        }
    }

    fn loan_summary() -> LoanSummary {
        LoanSummary {
            loan: LoanInput::new(dec!(5000000), dec!(8.5), 20),
            emi: AmortizationResult {
                monthly_installment: dec!(43391.16),
                total_interest: dec!(5413878.40),
                total_payable: dec!(10413878.40),
                installments: 240,
            },
            split: PrincipalInterestSplit {
                principal: dec!(5000000),
                interest: dec!(5413878.40),
                interest_share_percent: dec!(51.99),
            },
        }
    }

    fn report(valuation: Result<PredictionResult, ValuationError>) -> ValuationReport {
        let projection = valuation.as_ref().ok().map(|_| {
            Ok(ProjectionResult {
                present_value: dec!(5500000),
                annual_growth_percent: dec!(8),
                years: 10,
                future_value: dec!(11874087.49),
            })
        });
        ValuationReport {
            property: property(),
            material: ConstructionMaterial::Rcc,
            reference_year: 2026,
            valuation,
            projection,
            loan: Ok(loan_summary()),
        }
    }

    #[test]
    fn loan_summary_lines() {
        let text = loan_summary().to_string();

        assert!(text.contains("Monthly EMI     ₹43,391"), "{text}");
        assert!(text.contains("Total interest  ₹54.14 L"));
        assert!(text.contains("Total payable   ₹1.04 Cr"));
        assert!(text.contains("8.5% for 20 years (240 installments)"));
    }

    #[test]
    fn full_report_sections() {
        let prediction = PredictionResult {
            price_lakhs: dec!(55),
            area: 2400.0,
            age: 10,
            features: FeatureVector::new(2400.0, 3.0, 10.0, 5.0),
        };

        let text = report(Ok(prediction)).to_string();

        assert!(text.contains("Total area      2,400 sq.ft"), "{text}");
        assert!(text.contains("2016-01-01 (10 years)"));
        assert!(text.contains("RCC (quality 82/100)"));
        assert!(text.contains("Value           ₹55.00 L"));
        assert!(text.contains("Future Projection (10Y)"));
        assert!(text.contains("Projected value ₹1.19 Cr"));
    }

    #[test]
    fn failed_valuation_keeps_loan_summary() {
        let text = report(Err(ValuationError::ModelUnavailable(
            "model artifact 'house_model.json' not found".to_string(),
        )))
        .to_string();

        assert!(text.contains("Valuation unavailable: model unavailable"), "{text}");
        assert!(text.contains("Monthly EMI"));
        assert!(!text.contains("Future Projection"));
    }

    #[test]
    fn schedule_table_has_header_and_rows() {
        let periods = [AmortizationPeriod {
            period: 1,
            installment: dec!(100.50),
            interest: dec!(10.00),
            principal: dec!(90.50),
            balance: dec!(909.50),
        }];

        let text = ScheduleTable(&periods).to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Installment"));
        assert!(lines[1].trim_start().starts_with('1'));
        assert!(lines[1].trim_end().ends_with("909.50"));
    }

    #[test]
    fn market_report_sections() {
        let records = vec![
            MarketRecord {
                area: 1200.0,
                bedrooms: 2,
                price: 40.0,
                distance: 8.0,
                age: 5.0,
            },
            MarketRecord {
                area: 900.0,
                bedrooms: 2,
                price: 30.0,
                distance: 12.0,
                age: 12.0,
            },
        ];

        let report = MarketReport::from_records(&records);
        let text = report.to_string();

        assert_eq!(report.bedrooms, vec![BedroomCount { bedrooms: 2, count: 2 }]);
        assert!(text.contains("Sales           2"), "{text}");
        assert!(text.contains("100.0%"));
        assert!(text.contains("Property Age Depreciation"));
    }

    #[test]
    fn empty_market_report() {
        let text = MarketReport::from_records(&[]).to_string();

        assert!(text.contains("No market records."));
    }

    #[test]
    fn batch_table_counts_valued_rows() {
        let rows = vec![
            BatchRow {
                row: 1,
                result: Ok(PredictionResult {
                    price_lakhs: dec!(55),
                    area: 2400.0,
                    age: 10,
                    features: FeatureVector::new(2400.0, 3.0, 10.0, 5.0),
                }),
            },
            BatchRow {
                row: 2,
                result: Err(ValuationError::ModelUnavailable("no model".to_string()).into()),
            },
        ];

        let text = BatchTable(&rows).to_string();
        let lines: Vec<_> = text.lines().collect();

        assert!(lines[1].contains("₹55.00 L"), "{text}");
        assert!(lines[1].contains("2,400 sq.ft"));
        assert!(lines[2].contains("skipped"));
        assert_eq!(lines.last().copied(), Some("1 of 2 rows valued"));
    }
}
