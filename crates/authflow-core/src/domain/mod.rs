//! Domain entities - sessions, panels and status lines.

mod flow;
mod operation;
mod session;
mod status;

pub use flow::{FlowState, Navigation, Panel};
pub use operation::Operation;
pub use session::{Session, UserProfile};
pub use status::{StatusKind, StatusMessage};
