//! Flow layout passes

pub mod block;
pub mod float;
pub mod inline;

pub use block::layout_block_level_box;
pub use block::layout_contribution;
pub use block::Bfc;
pub use block::CollapsedMargin;
pub use float::FloatContext;
pub use inline::ContributionMode;
