//! Parsing of interactive terminal input.
//!
//! Plain lines are search text. Lines starting with `:` are commands:
//!
//! | Input        | Meaning                                   |
//! |--------------|-------------------------------------------|
//! | `:more`      | The scroll sentinel became visible        |
//! | `:retry`     | Retry after a failed fetch                |
//! | `:show <id>` | Open the detail view for one image        |
//! | `:quit`      | Exit                                      |

use gallery_core::types::ImageId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    More,
    Retry,
    Show(ImageId),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command `:{0}`")]
    Unknown(String),

    #[error("`:show` needs a numeric image id")]
    MissingId,
}

/// Parse one line of input.
pub fn parse_line(line: &str) -> Result<Command, CommandError> {
    let Some(rest) = line.trim().strip_prefix(':') else {
        return Ok(Command::Search(line.to_string()));
    };

    let mut parts = rest.split_whitespace();
    match parts.next().unwrap_or_default() {
        "more" | "m" => Ok(Command::More),
        "retry" | "r" => Ok(Command::Retry),
        "quit" | "q" => Ok(Command::Quit),
        "show" | "s" => parts
            .next()
            .and_then(|id| id.parse::<ImageId>().ok())
            .filter(|id| *id > 0)
            .map(Command::Show)
            .ok_or(CommandError::MissingId),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}
