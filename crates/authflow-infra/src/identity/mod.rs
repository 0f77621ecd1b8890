//! Identity provider adapter - Firebase Identity Toolkit over REST.

mod firebase;
mod popup;

pub use firebase::{FirebaseConfig, FirebaseIdentity};
pub use popup::PopupHandler;
