use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use folio_client::DEFAULT_API_URL;

#[derive(Debug, Parser)]
#[command(author, version, about = "Browse, analyze and read books served by a text analysis backend")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Runs the interactive UI when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Base URL of the analysis API.
    #[arg(long, env = "FOLIO_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Number of top words requested per search (5-50).
    #[arg(long, env = "FOLIO_TOP_WORDS", default_value_t = 20, global = true)]
    pub top_words: usize,

    /// Number of similar books requested per search (1-20).
    #[arg(long, env = "FOLIO_RECOMMENDATIONS", default_value_t = 10, global = true)]
    pub recommendations: usize,

    /// Reader lines per page.
    #[arg(long, env = "FOLIO_LINES_PER_PAGE", default_value_t = 30, global = true)]
    pub lines_per_page: usize,

    /// Directory holding preferences and the log file.
    #[arg(long, env = "FOLIO_CONFIG_DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Log file for the interactive UI.
    #[arg(long, env = "FOLIO_LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the books the backend knows about.
    Books {
        /// Case-insensitive substring filter.
        #[arg(long)]
        filter: Option<String>,
    },
    /// Print the top words of a book.
    Summary { book: String },
    /// Print books similar to a book.
    Recommend { book: String },
    /// Print one page of a book's text.
    Read {
        book: String,

        /// 1-based page; out-of-range values are clamped.
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,
    },
    /// Show or change the saved theme.
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeAction {
    Light,
    Dark,
    Toggle,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn every_global_option_has_an_env_fallback() {
        let command = Cli::command();
        let env_of = |id: &str| {
            command
                .get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_env())
                .map(|env| env.to_string_lossy().into_owned())
        };
        assert_eq!(env_of("api_url").as_deref(), Some("FOLIO_API_URL"));
        assert_eq!(env_of("top_words").as_deref(), Some("FOLIO_TOP_WORDS"));
        assert_eq!(env_of("recommendations").as_deref(), Some("FOLIO_RECOMMENDATIONS"));
        assert_eq!(env_of("lines_per_page").as_deref(), Some("FOLIO_LINES_PER_PAGE"));
        assert_eq!(env_of("config_dir").as_deref(), Some("FOLIO_CONFIG_DIR"));
        assert_eq!(env_of("log_file").as_deref(), Some("FOLIO_LOG_FILE"));
    }

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["folio"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.global.top_words, 20);
        assert_eq!(cli.global.recommendations, 10);
        assert_eq!(cli.global.lines_per_page, 30);
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "folio",
            "read",
            "Moby_Dick.txt",
            "--page",
            "-2",
            "--lines-per-page",
            "50",
        ])
        .unwrap();
        assert_eq!(cli.global.lines_per_page, 50);
        match cli.command {
            Some(Command::Read { book, page }) => {
                assert_eq!(book, "Moby_Dick.txt");
                assert_eq!(page, -2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn theme_actions_parse() {
        let cli = Cli::try_parse_from(["folio", "theme", "toggle"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Theme {
                action: Some(ThemeAction::Toggle)
            })
        ));
    }
}
