pub mod error;
pub mod model;
pub mod render;
pub mod rss;
pub mod service;
pub mod size;
pub mod validation;

pub use error::FeedServiceError;
pub use model::{FeedAction, FeedRequest, RenderedFeed, TorrentRecord, UpstreamQuery};
pub use service::{FeedService, FeedServiceApi};
pub use validation::FeedQuery;
