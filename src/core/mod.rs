pub mod discovery;
pub mod transport;
pub mod web_client;
pub mod webrtc_client;

pub use crate::domain::model::{Channel, ChannelData, ServerKind, Stream};
pub use crate::domain::ports::OfferClient;
pub use crate::utils::error::Result;
