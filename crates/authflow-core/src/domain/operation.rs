use std::fmt;

/// Kinds of asynchronous work the controller runs; at most one of each kind
/// is in flight at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Register,
    Login,
    FederatedLogin,
    ResendVerification,
    PasswordReset,
    ConfirmPasswordReset,
    CheckBackend,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Register => "registration",
            Operation::Login => "login",
            Operation::FederatedLogin => "federated login",
            Operation::ResendVerification => "verification resend",
            Operation::PasswordReset => "password reset request",
            Operation::ConfirmPasswordReset => "password reset",
            Operation::CheckBackend => "backend check",
        };
        f.write_str(name)
    }
}
