use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "rowview")]
#[command(about = "Load a handful of rows from a Supabase table and show them as formatted records")]
#[command(version)]
pub struct Cli {
    /// Table to read rows from (overrides ROWVIEW_TABLE)
    #[arg(short, long)]
    pub table: Option<String>,

    /// Maximum number of rows to fetch (overrides ROWVIEW_LIMIT)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Print the result and exit instead of starting the TUI
    #[arg(long)]
    pub cli: bool,

    /// Serve rows from a JSON file instead of the network
    #[arg(long, value_name = "FILE")]
    pub fixture: Option<PathBuf>,
}

impl Cli {
    /// Apply command line overrides on top of the environment configuration
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(table) = &self.table {
            config.table = table.clone();
        }
        if let Some(limit) = self.limit {
            config.limit = limit;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::parse_from(["rowview", "--table", "members", "-l", "3", "--cli"]);
        assert_eq!(cli.table.as_deref(), Some("members"));
        assert_eq!(cli.limit, Some(3));
        assert!(cli.cli);
        assert!(cli.fixture.is_none());
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = Cli::parse_from(["rowview", "--limit", "5"]);
        let config = cli.apply(Config::default());
        assert_eq!(config.limit, 5);
        assert_eq!(config.table, "your_table");
    }

    #[test]
    fn test_rejects_non_numeric_limit() {
        assert!(Cli::try_parse_from(["rowview", "--limit", "many"]).is_err());
    }
}
