//! Line commands understood by the shell.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Scroll to the bottom of the list.
    More,
    /// Scroll so that this 1-based row is the last one visible.
    Scroll(usize),
    ToggleRuc,
    ToggleVerified,
    /// Open the edit modal on this 1-based row.
    Edit(usize),
    Set { field: String, value: String },
    Save,
    Close,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{0}` needs {1}")]
    MissingArgument(&'static str, &'static str),
    #[error("`{0}` is not a row number")]
    InvalidRow(String),
}

pub const HELP: &str = "\
commands:
  more                 scroll to the end (loads the next page)
  scroll <row>         scroll until <row> is the last visible row
  ruc                  toggle the RUC filter
  verified             toggle the verified filter
  edit <row>           open the edit modal on <row>
  set <field> <value>  change a field of the record being edited
  save                 send the edited record to the registry
  close                close the modal without saving
  show                 redraw the screen
  quit                 leave";

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        match word {
            "" | "show" | "ls" => Ok(Command::Show),
            "more" | "m" => Ok(Command::More),
            "scroll" => Ok(Command::Scroll(parse_row("scroll", rest)?)),
            "ruc" => Ok(Command::ToggleRuc),
            "verified" | "ver" => Ok(Command::ToggleVerified),
            "edit" | "e" => Ok(Command::Edit(parse_row("edit", rest)?)),
            "set" => {
                let (field, value) = match rest.split_once(char::is_whitespace) {
                    Some((field, value)) => (field, value.trim()),
                    None => (rest, ""),
                };
                if field.is_empty() {
                    return Err(CommandError::MissingArgument("set", "a field name"));
                }
                Ok(Command::Set {
                    field: field.to_string(),
                    value: value.to_string(),
                })
            }
            "save" => Ok(Command::Save),
            "close" | "cancel" => Ok(Command::Close),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_row(command: &'static str, arg: &str) -> Result<usize, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument(command, "a row number"));
    }
    match arg.parse::<usize>() {
        Ok(row) if row > 0 => Ok(row),
        _ => Err(CommandError::InvalidRow(arg.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_words() {
        assert_eq!(Command::parse("more"), Ok(Command::More));
        assert_eq!(Command::parse("  ruc "), Ok(Command::ToggleRuc));
        assert_eq!(Command::parse("verified"), Ok(Command::ToggleVerified));
        assert_eq!(Command::parse(""), Ok(Command::Show));
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
    }

    #[test]
    fn parses_rows() {
        assert_eq!(Command::parse("edit 3"), Ok(Command::Edit(3)));
        assert_eq!(Command::parse("scroll 12"), Ok(Command::Scroll(12)));
        assert_eq!(
            Command::parse("edit 0"),
            Err(CommandError::InvalidRow("0".to_string()))
        );
        assert_eq!(
            Command::parse("edit"),
            Err(CommandError::MissingArgument("edit", "a row number"))
        );
    }

    #[test]
    fn set_keeps_spaces_in_value() {
        assert_eq!(
            Command::parse("set razon_social Comercial  Andina S.A."),
            Ok(Command::Set {
                field: "razon_social".to_string(),
                value: "Comercial  Andina S.A.".to_string(),
            })
        );
    }

    #[test]
    fn set_without_value_clears_the_field() {
        assert_eq!(
            Command::parse("set ruc"),
            Ok(Command::Set {
                field: "ruc".to_string(),
                value: String::new(),
            })
        );
        assert!(Command::parse("set").is_err());
    }

    #[test]
    fn unknown_word_is_an_error() {
        assert_eq!(
            Command::parse("delete 1"),
            Err(CommandError::Unknown("delete".to_string()))
        );
    }
}
