//! # Strategies Crate
//!
//! Capability traits and baseline implementations for pluggable
//! recommendation strategies.
//!
//! ## Components
//!
//! ### Capability traits
//! - [`RecommendationStrategy`]: train a recommender from a preference model
//! - [`Recommender`]: per-pair estimation and top-N ranked recommendation
//!
//! ### Registry
//! [`StrategyRegistry`] holds the candidates in evaluation order; the order
//! doubles as the selection tie-break.
//!
//! ### Baseline strategies
//! - **item-average**: predicts each item's mean rating
//! - **item-user-average**: item mean shifted by the user's own bias
//!
//! Similarity-based or factorization strategies are deliberately not
//! implemented here; they plug in through the same traits.
//!
//! ## Example Usage
//!
//! ```ignore
//! use strategies::{ItemAverageStrategy, ItemUserAverageStrategy, StrategyRegistry};
//!
//! let registry = StrategyRegistry::new()
//!     .register(ItemAverageStrategy)
//!     .register(ItemUserAverageStrategy);
//!
//! for strategy in registry.iter() {
//!     let recommender = strategy.build(&model)?;
//!     let top = recommender.recommend(user_id, 10)?;
//! }
//! ```

// Public modules
pub mod item_average;
pub mod item_user_average;
pub mod registry;
pub mod traits;

// Re-export commonly used types
pub use item_average::ItemAverageStrategy;
pub use item_user_average::ItemUserAverageStrategy;
pub use registry::StrategyRegistry;
pub use traits::{RecommendationStrategy, Recommender, ScoredItem};
