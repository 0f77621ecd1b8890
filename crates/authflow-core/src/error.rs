//! Controller-level error types.

use thiserror::Error;

use crate::domain::{Navigation, Operation, Panel};
use crate::ports::{ApiError, IdentityError, StoreError};

/// Flow errors - why a single user action failed. None of them are fatal to
/// the controller.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Email address is not verified")]
    EmailNotVerified,

    #[error("No pending registration email")]
    NoPendingEmail,

    #[error("A {0} is already in progress")]
    Busy(Operation),

    #[error("Cannot {navigation} from the {from} panel")]
    InvalidTransition { from: Panel, navigation: Navigation },
}
