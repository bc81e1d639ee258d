//! Command-line argument parsing.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use cinerec_core::{parse_title_list, RequestDescription};

/// Default number of recommendations to ask for.
pub const DEFAULT_K: u32 = 10;

/// Which recommendation list to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Popular { k: u32 },
    ForYou { user_id: u32, k: u32 },
    ByTitles { titles: Vec<String> },
    Help,
}

impl Command {
    /// The request description backing this command.
    pub fn description(&self) -> Option<RequestDescription> {
        match self {
            Command::Popular { k } => Some(RequestDescription::popular(*k)),
            Command::ForYou { user_id, k } => Some(RequestDescription::item_cf(Some(*user_id), *k)),
            Command::ByTitles { titles } => Some(RequestDescription::by_titles(titles.clone())),
            Command::Help => None,
        }
    }

    /// Heading printed above the cards.
    pub fn heading(&self) -> String {
        match self {
            Command::Popular { .. } => "Popular now".to_string(),
            Command::ForYou { user_id, .. } => format!("Recommended for user {}", user_id),
            Command::ByTitles { titles } => format!("Because you liked {}", titles.join(", ")),
            Command::Help => String::new(),
        }
    }
}

/// Parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub command: Command,
    pub config_path: Option<PathBuf>,
    pub posters: bool,
}

pub fn usage() -> &'static str {
    "Usage:
  cinerec popular [--k N]
  cinerec for-you --user-id N [--k N]
  cinerec by-titles \"Toy Story, Matrix\"

Options:
  --config PATH   Read configuration from PATH (also CINEREC_CONFIG)
  --no-posters    Skip poster lookups"
}

/// Parse arguments, excluding the program name.
pub fn parse_args<I, S>(args: I) -> Result<Cli>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();

    let mut positional = Vec::new();
    let mut k = None;
    let mut user_id = None;
    let mut config_path = None;
    let mut posters = true;
    let mut help = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--k" => k = Some(number(&mut iter, "--k")?),
            "--user-id" => user_id = Some(number(&mut iter, "--user-id")?),
            "--config" => {
                let path = iter.next().ok_or_else(|| anyhow!("--config needs a path"))?;
                config_path = Some(PathBuf::from(path));
            }
            "--no-posters" => posters = false,
            "-h" | "--help" => help = true,
            flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
            _ => positional.push(arg.clone()),
        }
    }

    if help {
        return Ok(Cli {
            command: Command::Help,
            config_path,
            posters,
        });
    }

    let mut positional = positional.into_iter();
    let command = match positional.next().as_deref() {
        None | Some("help") => Command::Help,
        Some("popular") => Command::Popular {
            k: k.unwrap_or(DEFAULT_K),
        },
        Some("for-you") => {
            let user_id = user_id
                .filter(|id| *id > 0)
                .ok_or_else(|| anyhow!("for-you needs --user-id N (N > 0)"))?;
            Command::ForYou {
                user_id,
                k: k.unwrap_or(DEFAULT_K),
            }
        }
        Some("by-titles") => {
            let joined = positional.collect::<Vec<_>>().join(",");
            let titles = parse_title_list(&joined);
            if titles.is_empty() {
                bail!("by-titles needs at least one title");
            }
            return Ok(Cli {
                command: Command::ByTitles { titles },
                config_path,
                posters,
            });
        }
        Some(other) => bail!("Unknown command: {}", other),
    };

    if let Some(extra) = positional.next() {
        bail!("Unexpected argument: {}", extra);
    }

    Ok(Cli {
        command,
        config_path,
        posters,
    })
}

fn number<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<u32> {
    let value = iter
        .next()
        .ok_or_else(|| anyhow!("{} needs a value", flag))?;
    value
        .parse()
        .with_context(|| format!("{} expects a number, got '{}'", flag, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinerec_core::HttpMethod;

    #[test]
    fn test_popular_defaults() {
        let cli = parse_args(["popular"]).unwrap();
        assert_eq!(cli.command, Command::Popular { k: DEFAULT_K });
        assert!(cli.posters);
        assert!(cli.config_path.is_none());
    }

    #[test]
    fn test_popular_with_k_and_flags() {
        let cli = parse_args(["popular", "--k", "5", "--no-posters", "--config", "cfg.toml"]).unwrap();
        assert_eq!(cli.command, Command::Popular { k: 5 });
        assert!(!cli.posters);
        assert_eq!(cli.config_path, Some(PathBuf::from("cfg.toml")));
    }

    #[test]
    fn test_for_you_requires_user_id() {
        assert!(parse_args(["for-you"]).is_err());
        assert!(parse_args(["for-you", "--user-id", "0"]).is_err());

        let cli = parse_args(["for-you", "--user-id", "42"]).unwrap();
        assert_eq!(
            cli.command,
            Command::ForYou {
                user_id: 42,
                k: DEFAULT_K
            }
        );
    }

    #[test]
    fn test_by_titles_joins_and_splits() {
        let cli = parse_args(["by-titles", "Toy Story, Matrix", "Heat"]).unwrap();
        assert_eq!(
            cli.command,
            Command::ByTitles {
                titles: vec![
                    "Toy Story".to_string(),
                    "Matrix".to_string(),
                    "Heat".to_string()
                ]
            }
        );

        let description = cli.command.description().unwrap();
        assert_eq!(description.method, HttpMethod::Post);
        assert!(description.enabled);
    }

    #[test]
    fn test_by_titles_rejects_blank_list() {
        assert!(parse_args(["by-titles", " , "]).is_err());
    }

    #[test]
    fn test_bad_input() {
        assert!(parse_args(["popular", "--k", "ten"]).is_err());
        assert!(parse_args(["popular", "--k"]).is_err());
        assert!(parse_args(["popular", "--verbose"]).is_err());
        assert!(parse_args(["trending"]).is_err());
        assert!(parse_args(["popular", "extra"]).is_err());
    }

    #[test]
    fn test_help() {
        assert_eq!(parse_args(Vec::<String>::new()).unwrap().command, Command::Help);
        assert_eq!(parse_args(["--help"]).unwrap().command, Command::Help);
        assert_eq!(parse_args(["popular", "-h"]).unwrap().command, Command::Help);
        assert!(Command::Help.description().is_none());
    }
}
