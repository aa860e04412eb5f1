//! Aggregations behind the market analytics view.

use std::collections::BTreeMap;

use crate::market::MarketRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaPricePoint {
    pub area: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BedroomCount {
    pub bedrooms: u32,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgePricePoint {
    pub age: f64,
    pub price: f64,
    pub distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketSummary {
    pub count: usize,
    pub mean_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub mean_area: f64,
}

/// Price against area, sorted by area.
pub fn price_vs_area(records: &[MarketRecord]) -> Vec<AreaPricePoint> {
    let mut points: Vec<AreaPricePoint> = records
        .iter()
        .map(|r| AreaPricePoint {
            area: r.area,
            price: r.price,
        })
        .collect();
    points.sort_by(|a, b| a.area.total_cmp(&b.area));
    points
}

/// Number of sales per BHK, most frequent first. Ties go to the smaller BHK.
pub fn bedroom_distribution(records: &[MarketRecord]) -> Vec<BedroomCount> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.bedrooms).or_default() += 1;
    }

    let mut distribution: Vec<BedroomCount> = counts
        .into_iter()
        .map(|(bedrooms, count)| BedroomCount { bedrooms, count })
        .collect();
    // stable sort keeps BHK order within equal counts
    distribution.sort_by(|a, b| b.count.cmp(&a.count));
    distribution
}

/// Price against age, with distance carried along for colouring. Sorted by age.
pub fn age_depreciation(records: &[MarketRecord]) -> Vec<AgePricePoint> {
    let mut points: Vec<AgePricePoint> = records
        .iter()
        .map(|r| AgePricePoint {
            age: r.age,
            price: r.price,
            distance: r.distance,
        })
        .collect();
    points.sort_by(|a, b| a.age.total_cmp(&b.age));
    points
}

/// Headline statistics, or `None` for an empty dataset.
pub fn summary(records: &[MarketRecord]) -> Option<MarketSummary> {
    if records.is_empty() {
        return None;
    }

    let count = records.len();
    let (price_sum, area_sum, min_price, max_price) = records.iter().fold(
        (0.0, 0.0, f64::INFINITY, f64::NEG_INFINITY),
        |(price_sum, area_sum, min, max), r| {
            (price_sum + r.price, area_sum + r.area, min.min(r.price), max.max(r.price))
        },
    );

    Some(MarketSummary {
        count,
        mean_price: price_sum / count as f64,
        min_price,
        max_price,
        mean_area: area_sum / count as f64,
    })
}
