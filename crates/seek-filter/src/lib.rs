pub mod config;
pub mod feed;
pub mod startup;

pub use config::*;
pub use feed::*;
pub use startup::*;
