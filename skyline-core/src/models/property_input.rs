use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    House,
    Apartment,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::House => "house",
            Self::Apartment => "apartment",
        }
    }

    /// Case-insensitive parse of `"house"` / `"apartment"`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "house" => Some(Self::House),
            "apartment" => Some(Self::Apartment),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::House => "House",
            Self::Apartment => "Apartment",
        }
    }
}

/// Dimensional inputs, shaped by the property type.
///
/// Areas are in square feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PropertyDimensions {
    House { plot_area: f64, floors: f64 },
    Apartment { carpet_area: f64, balcony_area: f64 },
}

impl PropertyDimensions {
    pub fn property_type(&self) -> PropertyType {
        match self {
            Self::House { .. } => PropertyType::House,
            Self::Apartment { .. } => PropertyType::Apartment,
        }
    }

    /// Total built-up area: plot × floors for a house, carpet + balcony for
    /// an apartment.
    pub fn area(&self) -> f64 {
        match *self {
            Self::House { plot_area, floors } => plot_area * floors,
            Self::Apartment {
                carpet_area,
                balcony_area,
            } => carpet_area + balcony_area,
        }
    }
}

/// Raw property attributes as entered on the valuation form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInput {
    pub construction_date: NaiveDate,
    pub dimensions: PropertyDimensions,
    pub bedrooms: u32,
    pub distance_km: f64,
}

impl PropertyInput {
    pub fn property_type(&self) -> PropertyType {
        self.dimensions.property_type()
    }

    pub fn area(&self) -> f64 {
        self.dimensions.area()
    }

    /// Age in whole years relative to `reference_year`.
    ///
    /// Only the calendar years are compared, so a property completed in
    /// December is one year old the following January.
    pub fn age(
        &self,
        reference_year: i32,
    ) -> i32 {
        reference_year - self.construction_date.year()
    }
}
