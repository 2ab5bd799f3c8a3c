//! # medindex Records
//!
//! Turns regulatory filing rows into the record set behind the search index.
//!
//! ```text
//! RawRecord ──> normalize / categorize ──> aggregate ──> AggregatedMedication
//!                                                             │
//!                                                      build_corpus
//!                                                             │
//!                                                      search texts
//! ```
//!
//! ## Example
//!
//! ```rust
//! use medindex_records::{aggregate, Category, RawRecord, Tier};
//!
//! let row = RawRecord {
//!     active_ingredient: Some("PARACETAMOL".into()),
//!     therapeutic_class: Some("ANALGESICOS".into()),
//!     product_name: Some("TYLENOL".into()),
//!     company: Some("JANSSEN".into()),
//!     registration_status: Some("VÁLIDO".into()),
//!     registration_number: Some("1000".into()),
//! };
//!
//! let records = aggregate(&[row]);
//! assert_eq!(records[0].display_name, "Paracetamol");
//! assert_eq!(records[0].category, Category::Analgesic);
//! assert_eq!(records[0].popularity_tier, Tier::Low);
//! ```

pub mod normalize;
pub mod category;
pub mod medication;
pub mod aggregate;
pub mod corpus;

pub use normalize::{normalize, normalize_opt, title_case};
pub use category::{categorize, Category, UnknownCategory};
pub use medication::{AggregatedMedication, MedicationView, RawRecord, Tier, UnknownTier, EXAMPLE_LIMIT};
pub use aggregate::{aggregate, ingredient_key, is_active_registration};
pub use corpus::{build_corpus, search_text, summary_text};
