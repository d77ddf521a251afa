//! ogs-compat-core: data normalization shared by the browser client and tools
//!
//! Three independent pieces live here:
//! - [`rank`]: legacy ranking numbers to structured ranks and labels
//! - [`challenge`]: the seek graph challenge projection and its filter
//! - [`translate`]: per-endpoint schema translation for REST bodies

pub mod challenge;
pub mod errors;
pub mod game;
pub mod rank;
pub mod rating;
pub mod translate;
mod transforms;

pub use challenge::*;
pub use errors::*;
pub use game::*;
pub use rank::*;
pub use rating::*;
pub use translate::*;
