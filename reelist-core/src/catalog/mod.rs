//! Catalog cache reconciliation.

pub mod reconciler;
pub mod similarity;

pub use reconciler::{CatalogReconciler, EnsureOutcome, id_reuse_suspected};
pub use similarity::{title_jaccard, titles_differ_significantly};
