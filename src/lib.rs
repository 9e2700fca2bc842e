pub mod builder;
pub mod client;
pub mod config;
pub mod delay;
pub mod errors;
pub mod filter;
pub mod reconcile;

pub use builder::*;
pub use client::*;
pub use config::*;
pub use delay::*;
pub use errors::*;
pub use filter::*;
pub use reconcile::*;

pub mod prelude {
    pub use crate::builder::MyAnimeBuilder;
    pub use crate::client::MyAnimeClient;
    pub use crate::config::{DEFAULT_LISTING_URL, DEFAULT_SHOW_NAME, EpisodeRange, ShowConfig};
    pub use crate::delay::Delay;
    pub use crate::errors::{MyAnimeError, Result};
    pub use crate::filter::{
        DEFAULT_EPISODE_PATTERN, compile_episode_pattern, episode_number, filter_episode_links,
    };
    pub use crate::reconcile::{ListingSource, RangeReconciler, Reconciled};
}
