use serde::{Deserialize, Serialize};

/// Primary structural material, shown as a descriptive quality score.
///
/// The score is display-only and never reaches the price model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstructionMaterial {
    #[default]
    Rcc,
    Steel,
    Brick,
}

impl ConstructionMaterial {
    pub fn all() -> &'static [ConstructionMaterial] {
        &[Self::Rcc, Self::Steel, Self::Brick]
    }

    /// Quality score out of 100.
    pub fn quality_score(&self) -> u8 {
        match self {
            Self::Rcc => 82,
            Self::Steel => 75,
            Self::Brick => 60,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Rcc => "RCC",
            Self::Steel => "Steel",
            Self::Brick => "Brick",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RCC" => Some(Self::Rcc),
            "STEEL" => Some(Self::Steel),
            "BRICK" => Some(Self::Brick),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn quality_scores_match_material() {
        assert_eq!(ConstructionMaterial::Rcc.quality_score(), 82);
        assert_eq!(ConstructionMaterial::Steel.quality_score(), 75);
        assert_eq!(ConstructionMaterial::Brick.quality_score(), 60);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(ConstructionMaterial::parse("rcc"), Some(ConstructionMaterial::Rcc));
        assert_eq!(ConstructionMaterial::parse(" Steel "), Some(ConstructionMaterial::Steel));
        assert_eq!(ConstructionMaterial::parse("BRICK"), Some(ConstructionMaterial::Brick));
        assert_eq!(ConstructionMaterial::parse("timber"), None);
    }

    #[test]
    fn parse_round_trips_labels() {
        for material in ConstructionMaterial::all() {
            assert_eq!(ConstructionMaterial::parse(material.label()), Some(*material));
        }
    }
}
