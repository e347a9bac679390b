pub mod socket_client;
pub mod types;

pub use socket_client::{FeedSubscription, LiveFeedConnector};
pub use types::{FeedEndpoint, FeedMessage, FeedStatus};
