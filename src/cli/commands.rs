use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `Hannah` - website chat assistant, driven from the terminal.
#[derive(Parser, Debug)]
#[command(name = "hannah")]
#[command(version)]
#[command(about = "Ask questions about a website page through a chat endpoint.", long_about = None)]
pub struct Cli {
    /// Log at debug level regardless of config
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of ~/.hannah/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the context string extracted from a page
    Context {
        /// HTML file path or http(s) URL
        #[arg(long)]
        page: String,
    },

    /// Print the sanitized, linkified markup for a piece of text
    Render {
        /// Raw text to render
        text: String,
    },

    /// Send a single message and print the answer
    Ask {
        /// HTML file path or http(s) URL
        #[arg(long)]
        page: String,

        /// Override the configured chat endpoint
        #[arg(long)]
        endpoint: Option<String>,

        /// Question to send
        message: String,
    },

    /// Start an interactive chat about a page
    Chat {
        /// HTML file path or http(s) URL
        #[arg(long)]
        page: String,

        /// Override the configured chat endpoint
        #[arg(long)]
        endpoint: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_has_no_flag_conflicts() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ask_takes_page_and_message() {
        let cli = Cli::parse_from([
            "hannah",
            "--verbose",
            "ask",
            "--page",
            "index.html",
            "What are your hours?",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Ask {
                page,
                endpoint,
                message,
            } => {
                assert_eq!(page, "index.html");
                assert!(endpoint.is_none());
                assert_eq!(message, "What are your hours?");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
