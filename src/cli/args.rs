//! Command-line argument parsing for the Realit CLI.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Sign in; the password is read from the terminal
    Login { identifier: String },
    /// Create an account; the password is read from the terminal
    Signup {
        email: String,
        username: Option<String>,
        display_name: Option<String>,
    },
    /// Sign out and clear stored credentials
    Logout,
    /// Show whether credentials are stored and when the access token expires
    Status,
    /// Print the signed-in user's profile
    Profile,
    /// Print a page of the signed-in user's posts
    Posts { page: Option<u32>, limit: Option<u32> },
    /// Print the home feed
    Feed { cursor: Option<String>, limit: Option<u32> },
    /// Print the latest notifications
    Notifications { page: Option<u32>, limit: Option<u32> },
    /// Mark every notification as read
    ReadAll,
    /// Search users
    Search { query: String },
    /// Arguments that could not be parsed
    Invalid(String),
}

pub const USAGE: &str = "\
Usage: realit <command> [options]

Commands:
  login <identifier>                     Sign in (password is prompted)
  signup <email> [username] [display]    Create an account
  logout                                 Sign out
  status                                 Show sign-in status
  profile                                Show your profile
  posts [--page N] [--limit N]           List your posts
  feed [--cursor C] [--limit N]          Show your feed
  notifications [--page N] [--limit N]   Show notifications
  read-all                               Mark all notifications read
  search <query>                         Search users

Options:
  -V, --version                          Print version
  -h, --help                             Print this help

Environment:
  REALIT_API_URL, REALIT_TIMEOUT_SECS, REALIT_CREDENTIALS_PATH, RUST_LOG";

/// Parse command-line arguments and return the appropriate command.
///
/// # Arguments
///
/// * `args` - Iterator of command-line arguments (typically `std::env::args()`)
///
/// # Examples
///
/// ```
/// use realit::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["realit".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let args: Vec<String> = args.skip(1).collect();

    for arg in &args {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            _ => {}
        }
    }

    let Some((command, rest)) = args.split_first() else {
        return CliCommand::Help;
    };

    match parse_command(command, rest) {
        Ok(command) => command,
        Err(message) => CliCommand::Invalid(message),
    }
}

fn parse_command(command: &str, rest: &[String]) -> Result<CliCommand, String> {
    let (positional, options) = split_options(rest)?;

    let command = match command {
        "login" => CliCommand::Login {
            identifier: required(&positional, 0, "login <identifier>")?,
        },
        "signup" => CliCommand::Signup {
            email: required(&positional, 0, "signup <email>")?,
            username: positional.get(1).cloned(),
            display_name: positional.get(2).cloned(),
        },
        "logout" => CliCommand::Logout,
        "status" => CliCommand::Status,
        "profile" => CliCommand::Profile,
        "posts" => CliCommand::Posts {
            page: number(&options, "--page")?,
            limit: number(&options, "--limit")?,
        },
        "feed" => CliCommand::Feed {
            cursor: option(&options, "--cursor"),
            limit: number(&options, "--limit")?,
        },
        "notifications" => CliCommand::Notifications {
            page: number(&options, "--page")?,
            limit: number(&options, "--limit")?,
        },
        "read-all" => CliCommand::ReadAll,
        "search" => CliCommand::Search {
            query: positional.join(" "),
        },
        other => return Err(format!("unknown command: {}", other)),
    };
    Ok(command)
}

type Options = Vec<(String, String)>;

fn split_options(args: &[String]) -> Result<(Vec<String>, Options), String> {
    let mut positional = Vec::new();
    let mut options = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            let value = iter
                .next()
                .ok_or_else(|| format!("missing value for {}", arg))?;
            options.push((arg.clone(), value.clone()));
        } else {
            positional.push(arg.clone());
        }
    }
    Ok((positional, options))
}

fn required(positional: &[String], index: usize, usage: &str) -> Result<String, String> {
    positional
        .get(index)
        .cloned()
        .ok_or_else(|| format!("usage: realit {}", usage))
}

fn option(options: &Options, name: &str) -> Option<String> {
    options
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.clone())
}

fn number(options: &Options, name: &str) -> Result<Option<u32>, String> {
    option(options, name)
        .map(|value| {
            value
                .parse::<u32>()
                .map_err(|_| format!("{} expects a number, got {:?}", name, value))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliCommand {
        let args: Vec<String> = std::iter::once("realit")
            .chain(args.iter().copied())
            .map(String::from)
            .collect();
        parse_args(args.into_iter())
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]), CliCommand::Version);
        assert_eq!(parse(&["feed", "-V"]), CliCommand::Version);
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(parse(&[]), CliCommand::Help);
    }

    #[test]
    fn test_parse_login() {
        assert_eq!(
            parse(&["login", "ana@example.com"]),
            CliCommand::Login {
                identifier: "ana@example.com".to_string()
            }
        );
        assert!(matches!(parse(&["login"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_signup() {
        assert_eq!(
            parse(&["signup", "ana@example.com", "ana"]),
            CliCommand::Signup {
                email: "ana@example.com".to_string(),
                username: Some("ana".to_string()),
                display_name: None,
            }
        );
    }

    #[test]
    fn test_parse_feed_options() {
        assert_eq!(
            parse(&["feed", "--limit", "5", "--cursor", "abc"]),
            CliCommand::Feed {
                cursor: Some("abc".to_string()),
                limit: Some(5),
            }
        );
        assert_eq!(
            parse(&["feed"]),
            CliCommand::Feed {
                cursor: None,
                limit: None
            }
        );
    }

    #[test]
    fn test_parse_bad_number() {
        assert!(matches!(
            parse(&["posts", "--page", "two"]),
            CliCommand::Invalid(ref msg) if msg.contains("--page")
        ));
        assert!(matches!(
            parse(&["notifications", "--limit"]),
            CliCommand::Invalid(_)
        ));
    }

    #[test]
    fn test_parse_search_joins_words() {
        assert_eq!(
            parse(&["search", "ana", "bo"]),
            CliCommand::Search {
                query: "ana bo".to_string()
            }
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(matches!(parse(&["dance"]), CliCommand::Invalid(_)));
    }
}
