//! Console command parsing

use std::str::FromStr;

use crate::{
    error::CommandError,
    state::{Device, DeviceKind},
};

const PRESS_USAGE: &str = "press <washer|dryer> <id>";
const STATUS_USAGE: &str = "status [<washer|dryer> <id>]";

/// One line of console input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Press(Device),
    Status(Option<Device>),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(CommandError::Empty);
        };
        let args: Vec<&str> = words.collect();

        match verb.to_ascii_lowercase().as_str() {
            "press" | "p" => match args.as_slice() {
                [kind, id] => Ok(Self::Press(parse_device(kind, id)?)),
                _ => Err(CommandError::Usage(PRESS_USAGE)),
            },
            "status" | "s" => match args.as_slice() {
                [] => Ok(Self::Status(None)),
                [kind, id] => Ok(Self::Status(Some(parse_device(kind, id)?))),
                _ => Err(CommandError::Usage(STATUS_USAGE)),
            },
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_device(kind: &str, id: &str) -> Result<Device, CommandError> {
    let kind: DeviceKind = kind.parse().map_err(CommandError::InvalidKind)?;
    let id = id
        .parse()
        .map_err(|_| CommandError::InvalidId(id.to_string()))?;
    Ok(Device::new(kind, id))
}

/// Help text listing every command
pub fn help_text() -> String {
    format!(
        "commands: {}, {}, help, quit",
        PRESS_USAGE, STATUS_USAGE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_press_and_status() {
        assert_eq!("press washer 1".parse::<Command>(), Ok(Command::Press(Device::washer(1))));
        assert_eq!("  P Dryer 2 ".parse::<Command>(), Ok(Command::Press(Device::dryer(2))));
        assert_eq!("status".parse::<Command>(), Ok(Command::Status(None)));
        assert_eq!("status dryer 1".parse::<Command>(), Ok(Command::Status(Some(Device::dryer(1)))));
        assert_eq!("quit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!("press washer".parse::<Command>(), Err(CommandError::Usage(PRESS_USAGE)));
        assert_eq!(
            "press washer one".parse::<Command>(),
            Err(CommandError::InvalidId("one".to_string()))
        );
        assert!(matches!(
            "press oven 1".parse::<Command>(),
            Err(CommandError::InvalidKind(_))
        ));
        assert_eq!(
            "dance".parse::<Command>(),
            Err(CommandError::Unknown("dance".to_string()))
        );
    }
}
