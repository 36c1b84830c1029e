//! Command-line argument parsing.

use kisstrack_types::{CallType, Property, SimpleText, Timestamp};
use thiserror::Error;

pub const USAGE: &str = "\
usage:
  kisstrack [--config PATH] record <event> <identity> [--time now|<epoch>] [name=value ...]
  kisstrack [--config PATH] set <identity> [--time now|<epoch>] [name=value ...]
  kisstrack [--config PATH] alias <identity> <identity2>

Arguments after `--` are taken literally as <event>/<identity>, so names
containing `=` can be passed, e.g. `kisstrack set plan=pro -- a=b`.";

/// A parsed command line.
#[derive(Debug, PartialEq, Eq)]
pub struct Invocation {
    pub config_path: Option<String>,
    pub command: Command,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Record {
        event: String,
        identity: String,
        timestamp: Timestamp,
        properties: Vec<Property>,
    },
    SetProps {
        identity: String,
        timestamp: Timestamp,
        properties: Vec<Property>,
    },
    Alias {
        identity: String,
        identity2: String,
    },
    Help,
}

impl Command {
    /// Converts the command into the call it sends. `None` for `Help`.
    pub fn into_call(self) -> Option<CallType> {
        match self {
            Self::Record {
                event,
                identity,
                timestamp,
                properties,
            } => Some(CallType::record(
                SimpleText::from(event),
                SimpleText::from(identity),
                timestamp,
                properties,
            )),
            Self::SetProps {
                identity,
                timestamp,
                properties,
            } => Some(CallType::set_props(
                SimpleText::from(identity),
                timestamp,
                properties,
            )),
            Self::Alias {
                identity,
                identity2,
            } => Some(CallType::alias(
                SimpleText::from(identity),
                SimpleText::from(identity2),
            )),
            Self::Help => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("missing subcommand")]
    MissingCommand,

    #[error("unknown subcommand: {0}")]
    UnknownCommand(String),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("invalid --time value {0:?}; expected `now` or epoch seconds")]
    InvalidTime(String),

    #[error("invalid property {0:?}; expected name=value")]
    InvalidProperty(String),
}

/// Parses the arguments that follow the program name.
pub fn parse_args<I>(args: I) -> Result<Invocation, ArgsError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter().peekable();
    let mut config_path = None;

    while let Some(arg) = args.peek() {
        match arg.as_str() {
            "--config" => {
                args.next();
                config_path = Some(args.next().ok_or(ArgsError::MissingArgument("PATH"))?);
            }
            "-h" | "--help" => {
                return Ok(Invocation {
                    config_path,
                    command: Command::Help,
                })
            }
            _ => break,
        }
    }

    let subcommand = args.next().ok_or(ArgsError::MissingCommand)?;
    let rest: Vec<String> = args.collect();

    let command = match subcommand.as_str() {
        "record" => {
            let (positional, timestamp, properties) = split_options(rest)?;
            let mut positional = positional.into_iter();
            let event = positional.next().ok_or(ArgsError::MissingArgument("event"))?;
            let identity = positional
                .next()
                .ok_or(ArgsError::MissingArgument("identity"))?;
            reject_extra(positional)?;
            Command::Record {
                event,
                identity,
                timestamp,
                properties,
            }
        }
        "set" => {
            let (positional, timestamp, properties) = split_options(rest)?;
            let mut positional = positional.into_iter();
            let identity = positional
                .next()
                .ok_or(ArgsError::MissingArgument("identity"))?;
            reject_extra(positional)?;
            Command::SetProps {
                identity,
                timestamp,
                properties,
            }
        }
        "alias" => {
            let mut rest = rest.into_iter().filter(|arg| arg != "--");
            let identity = rest.next().ok_or(ArgsError::MissingArgument("identity"))?;
            let identity2 = rest.next().ok_or(ArgsError::MissingArgument("identity2"))?;
            reject_extra(rest)?;
            Command::Alias {
                identity,
                identity2,
            }
        }
        "help" => Command::Help,
        other => return Err(ArgsError::UnknownCommand(other.to_string())),
    };

    Ok(Invocation {
        config_path,
        command,
    })
}

/// Splits `--time`, `name=value` properties, and bare positional arguments.
/// Positional arguments must come before any property, except after `--`,
/// where every remaining argument is positional.
fn split_options(
    args: Vec<String>,
) -> Result<(Vec<String>, Timestamp, Vec<Property>), ArgsError> {
    let mut positional = Vec::new();
    let mut timestamp = Timestamp::Automatic;
    let mut properties = Vec::new();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if arg == "--" {
            positional.extend(args.by_ref());
            break;
        }
        if arg == "--time" {
            let value = args.next().ok_or(ArgsError::MissingArgument("--time"))?;
            timestamp = parse_time(&value)?;
        } else if let Some((name, value)) = arg.split_once('=') {
            if name.is_empty() {
                return Err(ArgsError::InvalidProperty(arg));
            }
            properties.push(Property::new(name, value));
        } else if properties.is_empty() {
            positional.push(arg);
        } else {
            return Err(ArgsError::InvalidProperty(arg));
        }
    }

    Ok((positional, timestamp, properties))
}

fn parse_time(value: &str) -> Result<Timestamp, ArgsError> {
    if value == "now" {
        return Ok(Timestamp::now());
    }
    value
        .parse::<i64>()
        .ok()
        .and_then(Timestamp::from_epoch_seconds)
        .ok_or_else(|| ArgsError::InvalidTime(value.to_string()))
}

fn reject_extra(mut rest: impl Iterator<Item = String>) -> Result<(), ArgsError> {
    match rest.next() {
        Some(extra) => Err(ArgsError::UnexpectedArgument(extra)),
        None => Ok(()),
    }
}
