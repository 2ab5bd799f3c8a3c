use crate::category::Category;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum length of the example product and company lists
pub const EXAMPLE_LIMIT: usize = 3;

/// One row of the regulatory filing dataset. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub active_ingredient: Option<String>,
    pub therapeutic_class: Option<String>,
    pub product_name: Option<String>,
    pub company: Option<String>,
    pub registration_status: Option<String>,
    pub registration_number: Option<String>,
}

/// Coarse high/medium/low bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "alta")]
    High,
    #[serde(rename = "media")]
    Medium,
    #[serde(rename = "baixa")]
    Low,
}

impl Tier {
    /// Market popularity from the number of registered products
    pub fn popularity(product_count: usize) -> Self {
        match product_count {
            n if n >= 10 => Tier::High,
            n if n >= 5 => Tier::Medium,
            _ => Tier::Low,
        }
    }

    /// Formulation diversity from the number of distinct product names
    pub fn diversity(distinct_products: usize) -> Self {
        match distinct_products {
            n if n >= 5 => Tier::High,
            n if n >= 3 => Tier::Medium,
            _ => Tier::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::High => "alta",
            Tier::Medium => "media",
            Tier::Low => "baixa",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown tier: {0:?}")]
pub struct UnknownTier(pub String);

impl FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alta" | "high" => Ok(Tier::High),
            "media" | "média" | "medium" => Ok(Tier::Medium),
            "baixa" | "low" => Ok(Tier::Low),
            _ => Err(UnknownTier(s.to_string())),
        }
    }
}

/// One entry per distinct active ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedMedication {
    /// Grouping key: the normalized ingredient. Unique among aggregated
    /// records, not necessarily in a loaded corpus file.
    pub ingredient_key: String,
    pub display_name: String,
    /// First-seen raw ingredient spelling. Equals `display_name` for records
    /// loaded back from a corpus file.
    pub source_ingredient: String,
    /// First-seen raw therapeutic class, if any
    pub therapeutic_class: Option<String>,
    pub category: Category,
    pub product_count: usize,
    pub example_products: Vec<String>,
    pub example_companies: Vec<String>,
    pub popularity_tier: Tier,
    pub formulation_diversity: Tier,
    /// Embedded document
    pub search_text: String,
    pub summary_text: String,
}

impl AggregatedMedication {
    /// Copy of the fields shown to callers
    pub fn view(&self) -> MedicationView {
        MedicationView {
            display_name: self.display_name.clone(),
            category: self.category,
            product_count: self.product_count,
            example_products: self.example_products.clone(),
            example_companies: self.example_companies.clone(),
            popularity_tier: self.popularity_tier,
            formulation_diversity: self.formulation_diversity,
            search_text: self.search_text.clone(),
            summary_text: self.summary_text.clone(),
        }
    }

    /// Case-insensitive substring match against the display name or key
    pub fn matches_name(&self, lowered_needle: &str) -> bool {
        self.display_name.to_lowercase().contains(lowered_needle)
            || self.ingredient_key.to_lowercase().contains(lowered_needle)
    }
}

/// Display fields of an [`AggregatedMedication`], detached from the record store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationView {
    pub display_name: String,
    pub category: Category,
    pub product_count: usize,
    pub example_products: Vec<String>,
    pub example_companies: Vec<String>,
    pub popularity_tier: Tier,
    pub formulation_diversity: Tier,
    pub search_text: String,
    pub summary_text: String,
}
