use thiserror::Error;

use crate::models::{DraftField, LocationField};

pub const HELP: &str = "\
Commands:
  name <text>       set school name
  address <text>    set school address
  lat <number>      set school latitude
  lon <number>      set school longitude
  my-lat <number>   set your latitude
  my-lon <number>   set your longitude
  submit            add the school
  refresh           update school distances
  show              redraw the screen
  help              show this help
  quit              exit
A field command without a value clears the field.";

/// One line of terminal input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Draft(DraftField, String),
    Location(LocationField, String),
    Submit,
    Refresh,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command {0:?}, type `help` for a list")]
    Unknown(String),
    #[error("{command} expects a number, got {value:?}")]
    NotANumber { command: String, value: String },
    #[error("{0} takes no arguments")]
    UnexpectedArgument(String),
}

/// Parse a line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "name" => Command::Draft(DraftField::Name, rest.to_string()),
        "address" => Command::Draft(DraftField::Address, rest.to_string()),
        "lat" => Command::Draft(DraftField::Latitude, numeric_value(word, rest)?),
        "lon" => Command::Draft(DraftField::Longitude, numeric_value(word, rest)?),
        "my-lat" => Command::Location(LocationField::Latitude, numeric_value(word, rest)?),
        "my-lon" => Command::Location(LocationField::Longitude, numeric_value(word, rest)?),
        "submit" => no_args(word, rest, Command::Submit)?,
        "refresh" => no_args(word, rest, Command::Refresh)?,
        "show" => no_args(word, rest, Command::Show)?,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(InputError::Unknown(other.to_string())),
    };

    Ok(Some(command))
}

/// Accept what a numeric form input would: empty, or a finite number
pub fn numeric_value(command: &str, value: &str) -> Result<String, InputError> {
    if value.is_empty() || value.parse::<f64>().map(f64::is_finite).unwrap_or(false) {
        Ok(value.to_string())
    } else {
        Err(InputError::NotANumber {
            command: command.to_string(),
            value: value.to_string(),
        })
    }
}

fn no_args(command: &str, rest: &str, parsed: Command) -> Result<Command, InputError> {
    if rest.is_empty() {
        Ok(parsed)
    } else {
        Err(InputError::UnexpectedArgument(command.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_fields_keep_inner_spaces() {
        assert_eq!(
            parse_command("  address   12 Main Street  "),
            Ok(Some(Command::Draft(DraftField::Address, "12 Main Street".into())))
        );
    }

    #[test]
    fn coordinates_must_be_numeric() {
        assert_eq!(
            parse_command("my-lat 1.23"),
            Ok(Some(Command::Location(LocationField::Latitude, "1.23".into())))
        );
        assert_eq!(
            parse_command("lon -4.5e1"),
            Ok(Some(Command::Draft(DraftField::Longitude, "-4.5e1".into())))
        );
        assert_eq!(
            parse_command("my-lon east"),
            Err(InputError::NotANumber {
                command: "my-lon".into(),
                value: "east".into()
            })
        );
        assert!(parse_command("lat NaN").is_err());
    }

    #[test]
    fn bare_field_command_clears_it() {
        assert_eq!(
            parse_command("my-lon"),
            Ok(Some(Command::Location(LocationField::Longitude, String::new())))
        );
        assert_eq!(
            parse_command("name"),
            Ok(Some(Command::Draft(DraftField::Name, String::new())))
        );
    }

    #[test]
    fn actions_and_errors() {
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("submit"), Ok(Some(Command::Submit)));
        assert_eq!(parse_command("exit"), Ok(Some(Command::Quit)));
        assert_eq!(
            parse_command("refresh now"),
            Err(InputError::UnexpectedArgument("refresh".into()))
        );
        assert_eq!(
            parse_command("delete 1"),
            Err(InputError::Unknown("delete".into()))
        );
    }
}
