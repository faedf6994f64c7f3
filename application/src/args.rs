//! [`Args`] definitions.

use clap::{Parser, Subcommand};

/// Client session of the company risk verification platform.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// [`Command`] to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Operation on the client session.
#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Authenticates with the provided credentials.
    Login {
        /// Email to authenticate as.
        #[arg(short, long)]
        email: String,

        /// Password to authenticate with.
        #[arg(short, long, env = "SESSION_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Ends the current session.
    Logout,

    /// Prints the current session.
    Status,

    /// Restores the session from a previously issued token.
    Restore {
        /// Token to restore the session with.
        #[arg(short, long)]
        token: String,
    },

    /// Navigates to the provided path, respecting the route guard.
    Open {
        /// Path to navigate to, like `/companies/42`.
        path: String,
    },
}

#[cfg(test)]
mod spec {
    use clap::Parser as _;

    use super::{Args, Command};

    #[test]
    fn parses_subcommands() {
        let args = Args::try_parse_from([
            "session", "login", "--email", "u@example.com", "-p", "pw",
        ])
        .unwrap();
        assert_eq!(args.config, "config.toml");
        assert!(matches!(
            args.command,
            Command::Login { email, password }
                if email == "u@example.com" && password == "pw",
        ));

        let args =
            Args::try_parse_from(["session", "-c", "x.toml", "open", "/"])
                .unwrap();
        assert_eq!(args.config, "x.toml");
        assert!(matches!(args.command, Command::Open { path } if path == "/"));
    }

    #[test]
    fn requires_subcommand() {
        assert!(Args::try_parse_from(["session"]).is_err());
    }
}
