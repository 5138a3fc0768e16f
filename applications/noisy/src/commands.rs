//! Line commands read from stdin

use std::str::FromStr;
use thiserror::Error;

/// Help text listing every command
pub const HELP: &str = "\
commands:
  vol <track> <level>   set a track volume (0..1 or 0..100%)
  toggle                pause everything / resume the last mix
  mute                  silence every track
  timer <minutes>       start a sleep timer (same preset again cancels)
  timer off             cancel the sleep timer
  status                show the current mix
  tracks                list tracks
  help                  show this help
  quit                  exit";

/// Parsed user command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Volume { track: String, volume: f32 },
    Toggle,
    Mute,
    Timer(u32),
    TimerOff,
    Status,
    Tracks,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid volume '{0}'")]
    InvalidVolume(String),

    #[error("invalid minutes '{0}'")]
    InvalidMinutes(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Empty);
        };
        let args: Vec<&str> = words.collect();

        match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("vol" | "volume" | "v", [track, level]) => Ok(Command::Volume {
                track: (*track).to_string(),
                volume: parse_volume(level)?,
            }),
            ("vol" | "volume" | "v", _) => Err(CommandError::Usage("vol <track> <level>")),
            ("toggle" | "play" | "pause" | "p", []) => Ok(Command::Toggle),
            ("mute", []) => Ok(Command::Mute),
            ("timer" | "t", ["off" | "cancel"]) => Ok(Command::TimerOff),
            ("timer" | "t", [minutes]) => minutes
                .parse()
                .map(Command::Timer)
                .map_err(|_| CommandError::InvalidMinutes((*minutes).to_string())),
            ("timer" | "t", _) => Err(CommandError::Usage("timer <minutes>|off")),
            ("status" | "s", []) => Ok(Command::Status),
            ("tracks" | "ls", []) => Ok(Command::Tracks),
            ("help" | "h" | "?", []) => Ok(Command::Help),
            ("quit" | "exit" | "q", []) => Ok(Command::Quit),
            (other, _) => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Parse `0.5`, `.5` or `50%`
fn parse_volume(level: &str) -> Result<f32, CommandError> {
    let invalid = || CommandError::InvalidVolume(level.to_string());

    let volume = match level.strip_suffix('%') {
        Some(percent) => percent.parse::<f32>().map_err(|_| invalid())? / 100.0,
        None => level.parse::<f32>().map_err(|_| invalid())?,
    };

    if volume.is_finite() {
        Ok(volume)
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_volume_forms() {
        assert_eq!(
            "vol rain 0.5".parse::<Command>().unwrap(),
            Command::Volume {
                track: "rain".to_string(),
                volume: 0.5
            }
        );
        assert_eq!(
            "v ocean 25%".parse::<Command>().unwrap(),
            Command::Volume {
                track: "ocean".to_string(),
                volume: 0.25
            }
        );
    }

    #[test]
    fn out_of_range_volume_is_left_to_the_mixer() {
        assert_eq!(
            "vol rain 150%".parse::<Command>().unwrap(),
            Command::Volume {
                track: "rain".to_string(),
                volume: 1.5
            }
        );
    }

    #[test]
    fn rejects_bad_volumes() {
        assert_eq!(
            "vol rain loud".parse::<Command>(),
            Err(CommandError::InvalidVolume("loud".to_string()))
        );
        assert!(matches!(
            "vol rain NaN".parse::<Command>(),
            Err(CommandError::InvalidVolume(_))
        ));
        assert!(matches!(
            "vol rain".parse::<Command>(),
            Err(CommandError::Usage(_))
        ));
    }

    #[test]
    fn parses_timer_commands() {
        assert_eq!("timer 30".parse::<Command>().unwrap(), Command::Timer(30));
        assert_eq!("t off".parse::<Command>().unwrap(), Command::TimerOff);
        assert_eq!(
            "timer soon".parse::<Command>(),
            Err(CommandError::InvalidMinutes("soon".to_string()))
        );
    }

    #[test]
    fn parses_simple_commands_case_insensitively() {
        assert_eq!("TOGGLE".parse::<Command>().unwrap(), Command::Toggle);
        assert_eq!("mute".parse::<Command>().unwrap(), Command::Mute);
        assert_eq!("q".parse::<Command>().unwrap(), Command::Quit);
        assert_eq!("   ".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "dance".parse::<Command>(),
            Err(CommandError::Unknown("dance".to_string()))
        );
    }
}
