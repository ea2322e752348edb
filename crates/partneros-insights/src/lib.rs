//! Signal ingestion and insight ranking.
//!
//! Turns raw feed items into stored signals and scored insights, and closes
//! the loop from user feedback back into preference weights. External text
//! services are reached only through the `partneros-llm` traits and every call
//! has a deterministic fallback; storage is reached only through the traits in
//! [`store`].

pub mod approval;
pub mod classify;
pub mod digest;
pub mod draft;
pub mod error;
pub mod feed;
pub mod feedback;
pub mod memory;
pub mod pipeline;
pub mod store;
pub mod summarize;
pub mod synthesize;
pub mod text;

#[cfg(test)]
mod test_support;

pub use approval::{advance_status, MAX_BATCH_IDS};
pub use classify::classify_signal;
pub use digest::{build_digest, DigestItem, DEFAULT_DIGEST_LIMIT};
pub use draft::{default_outreach_draft, format_outreach_draft};
pub use error::{FeedError, InsightError, StoreError};
pub use feed::parse_feed;
pub use feedback::{record_feedback, FeedbackOutcome};
pub use memory::MemoryStore;
pub use pipeline::{
    IngestReport, InsightTally, ItemOutcome, Pipeline, PipelineConfig, PipelineStores,
    TextServices,
};
pub use store::{
    CatalogStore, FeedPartner, InsertOutcome, InsightStore, OwnedInsight, RankedInsight,
    SignalStore, StatusUpdate, WeightStore,
};
pub use summarize::summarize_content;
pub use synthesize::InsightSynthesizer;
