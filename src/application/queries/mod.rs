pub mod client;
pub mod feed;
pub mod invalidation;

pub use client::{QueryClient, QueryState};
pub use feed::{FeedState, InfiniteFeed};
pub use invalidation::{Mutation, invalidation_set};
