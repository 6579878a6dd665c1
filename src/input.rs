use anyhow::{anyhow, bail, Result};

use crate::service::QueryMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Query { mode: QueryMode, date: String },
    Info,
    Help,
}

pub fn parse_cli_command(args: &[String]) -> Result<CliCommand> {
    let Some(first) = args.first() else {
        return Ok(CliCommand::Help);
    };
    match first.as_str() {
        "info" => Ok(CliCommand::Info),
        "help" | "--help" | "-h" => Ok(CliCommand::Help),
        other => {
            let mode = QueryMode::parse(other).map_err(|_| {
                anyhow!(
                    "unknown subcommand `{}`. expected one of: lookup|forecast|1|2|info|help",
                    other
                )
            })?;
            let date = args
                .get(1)
                .ok_or_else(|| anyhow!("`{}` requires a date argument (YYYY-MM-DD)", other))?;
            if args.len() > 2 {
                bail!("unexpected extra arguments after `{}`", date);
            }
            Ok(CliCommand::Query {
                mode,
                date: date.clone(),
            })
        }
    }
}

pub fn usage() -> &'static str {
    "usage:\n  \
     price-forecast lookup <date>     predicted close for the day after a historical date\n  \
     price-forecast forecast <date>   recursive forecast for a date after the series ends\n  \
     price-forecast info              series bounds and held-out error\n\n\
     `1` and `2` are accepted as aliases for lookup and forecast."
}
