pub mod hub;
pub mod normalizer;

pub use hub::{StatusHub, SubscriptionHandle};
pub use normalizer::normalize;
