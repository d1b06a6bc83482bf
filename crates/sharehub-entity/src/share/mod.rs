//! Share domain entities.

pub mod model;
pub mod view;

pub use model::{DeactivationReason, NewShareLink, ShareLink};
pub use view::ShareLinkView;
