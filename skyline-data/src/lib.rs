pub mod analytics;
pub mod market;
pub mod trainer;

pub use analytics::{
    AgePricePoint, AreaPricePoint, BedroomCount, MarketSummary, age_depreciation,
    bedroom_distribution, price_vs_area, summary,
};
pub use market::{MarketDataError, MarketDataLoader, MarketRecord};
pub use trainer::{TrainError, TrainedModel, train};
