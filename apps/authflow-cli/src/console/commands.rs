//! Console command parsing.

use authflow_core::domain::Navigation;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Navigate(Navigation),
    Register {
        display_name: String,
        email: String,
        password: String,
    },
    Login {
        email: String,
        password: String,
    },
    Google,
    Resend,
    ResetPassword {
        email: String,
    },
    ConfirmReset {
        oob_code: String,
        new_password: String,
    },
    Logout,
    Clear,
    Whoami,
    Ping,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for a list.")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

pub const HELP: &str = "\
Commands:
  goto login | goto signup             switch between the login and sign-up panels
  forgot                               open the password reset panel
  back                                 return to the login panel
  signup <name...> <email> <password>  create an account
  login <email> <password>             log in with email and password
  google                               sign in with Google
  resend                               resend the verification email
  reset <email>                        request a password reset link
  confirm-reset <code> <new-password>  set a new password
  logout                               remove the stored session
  clear                                remove all locally stored data
  whoami                               show the stored session
  ping                                 check that the backend is reachable
  show                                 redraw the current panel
  help                                 show this list
  quit                                 exit";

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match (head.to_lowercase().as_str(), args.as_slice()) {
            ("goto", ["login"]) => Command::Navigate(Navigation::ShowLogin),
            ("goto", ["signup"]) => Command::Navigate(Navigation::ShowSignup),
            ("goto", _) => return Err(CommandError::Usage("goto login | goto signup")),
            ("forgot", []) => Command::Navigate(Navigation::ForgotPassword),
            ("back", []) => Command::Navigate(Navigation::Back),

            ("signup" | "register", [name @ .., email, password]) if !name.is_empty() => {
                Command::Register {
                    display_name: name.join(" "),
                    email: email.to_string(),
                    password: password.to_string(),
                }
            }
            ("signup" | "register", _) => {
                return Err(CommandError::Usage("signup <name...> <email> <password>"));
            }

            ("login", [email, password]) => Command::Login {
                email: email.to_string(),
                password: password.to_string(),
            },
            ("login", _) => return Err(CommandError::Usage("login <email> <password>")),

            ("google", []) => Command::Google,
            ("resend", []) => Command::Resend,

            ("reset", [email]) => Command::ResetPassword {
                email: email.to_string(),
            },
            ("reset", _) => return Err(CommandError::Usage("reset <email>")),

            ("confirm-reset", [code, password]) => Command::ConfirmReset {
                oob_code: code.to_string(),
                new_password: password.to_string(),
            },
            ("confirm-reset", _) => {
                return Err(CommandError::Usage("confirm-reset <code> <new-password>"));
            }

            ("logout", []) => Command::Logout,
            ("clear", []) => Command::Clear,
            ("whoami", []) => Command::Whoami,
            ("ping", []) => Command::Ping,
            ("show", []) => Command::Show,
            ("help" | "?", _) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            (other, _) => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}
