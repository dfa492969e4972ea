//! Commands accepted by the interactive dashboard

use crate::filter::parse_range;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// How the model input is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputMode {
    /// Use a dataset row selected by index
    Index,
    /// Enter every feature value by hand
    Manual,
}

/// Filter settings; unset fields keep their current value
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Vendor id to show
    #[arg(long, value_name = "ID")]
    pub vendor: Option<String>,

    /// Inclusive passenger count range, e.g. 1..4
    #[arg(long, value_name = "MIN..MAX", value_parser = parse_range, allow_hyphen_values = true)]
    pub passengers: Option<(i64, i64)>,

    /// Inclusive pickup hour range, e.g. 0..23
    #[arg(long, value_name = "MIN..MAX", value_parser = parse_range, allow_hyphen_values = true)]
    pub hours: Option<(i64, i64)>,
}

/// One line typed at the dashboard prompt
#[derive(Debug, Parser)]
#[command(
    name = "dashboard",
    no_binary_name = true,
    disable_version_flag = true,
    help_template = "{subcommands}"
)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum SessionCommand {
    /// Choose how the model input is entered
    Mode {
        #[arg(value_enum)]
        mode: InputMode,
    },

    /// Select a dataset row by index
    Index {
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },

    /// Set a manual feature value; the rest of the line is the value, spacing
    /// included (omit it to enter blank text)
    Set {
        feature: String,
        #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },

    /// Restore every manual value to its default
    Reset,

    /// Show the dataset filtered by vendor, passenger count and pickup hour
    Filter(FilterArgs),

    /// Show the first rows of the dataset
    Preview {
        #[arg(long)]
        rows: Option<usize>,
    },

    /// Show manual entry kinds, defaults and current values
    Defaults,

    /// Show the current model input
    Show,

    /// Run every model on the current input
    Predict,

    /// List the loaded models
    Models,

    /// Leave the dashboard
    #[command(visible_alias = "exit")]
    Quit,
}

impl SessionLine {
    /// Parse a prompt line split on whitespace. The value of `set` is taken
    /// from the raw line so inner spacing survives.
    pub fn parse_line(line: &str) -> Result<SessionCommand, clap::Error> {
        let mut command = Self::try_parse_from(line.split_whitespace())?.command;
        if let SessionCommand::Set { value, .. } = &mut command {
            let raw = skip_words(line, 2);
            if !raw.is_empty() {
                *value = vec![raw.to_string()];
            }
        }
        Ok(command)
    }
}

/// Text after the first `count` whitespace-separated words
fn skip_words(line: &str, count: usize) -> &str {
    let mut rest = line.trim_start();
    for _ in 0..count {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        rest = rest[end..].trim_start();
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_and_index() {
        assert!(matches!(
            SessionLine::parse_line("mode manual"),
            Ok(SessionCommand::Mode {
                mode: InputMode::Manual
            })
        ));
        assert!(matches!(
            SessionLine::parse_line("index -2"),
            Ok(SessionCommand::Index { index: -2 })
        ));
    }

    #[test]
    fn test_parse_set() {
        match SessionLine::parse_line("set speed 12.5").unwrap() {
            SessionCommand::Set { feature, value } => {
                assert_eq!(feature, "speed");
                assert_eq!(value, vec!["12.5".to_string()]);
            }
            other => panic!("unexpected {:?}", other),
        }

        match SessionLine::parse_line("set trip_category_encoded").unwrap() {
            SessionCommand::Set { value, .. } => assert!(value.is_empty()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_set_value_is_raw_remainder() {
        match SessionLine::parse_line("  set trip_category_encoded  a  b").unwrap() {
            SessionCommand::Set { feature, value } => {
                assert_eq!(feature, "trip_category_encoded");
                assert_eq!(value, vec!["a  b".to_string()]);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(skip_words("set x", 2), "");
    }

    #[test]
    fn test_parse_filter() {
        match SessionLine::parse_line("filter --vendor 2 --hours 6..9").unwrap() {
            SessionCommand::Filter(args) => {
                assert_eq!(args.vendor.as_deref(), Some("2"));
                assert_eq!(args.passengers, None);
                assert_eq!(args.hours, Some((6, 9)));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_command_is_error() {
        assert!(SessionLine::parse_line("launch").is_err());
        assert!(SessionLine::parse_line("index").is_err());
    }

    #[test]
    fn test_exit_alias() {
        assert!(matches!(
            SessionLine::parse_line("exit"),
            Ok(SessionCommand::Quit)
        ));
    }
}
