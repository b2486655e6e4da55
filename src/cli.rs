//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// mxxr - run and manage a mxxn application
#[derive(Parser, Debug)]
#[command(name = "mxxr")]
#[command(version)]
#[command(about = "Run and manage a mxxn application", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Manage the database migrations of the packages
    #[cfg(feature = "cli")]
    Db {
        #[command(subcommand)]
        action: DbCommands,
    },
}

/// Migration commands
#[cfg(feature = "cli")]
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum DbCommands {
    /// Create the migrations directory of a package with an initial revision
    Init {
        /// Package name (mxxn, an mxn or the application)
        package: String,
    },

    /// Upgrade to a later revision
    Upgrade {
        /// head, heads, +N, <branch>@head or a revision name
        #[arg(default_value = "heads")]
        revision: String,
    },

    /// Revert to a previous revision
    Downgrade {
        /// base, -N, <branch>@base or a revision name
        #[arg(allow_hyphen_values = true)]
        revision: String,
    },

    /// Show the branches
    Branches {
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the current revision of each branch
    Current {
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the head of each branch
    Heads {
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the revisions in chronological order
    History {
        /// Range in the form [start]:[end]
        #[arg(short = 'r', long = "rev-range")]
        rev_range: Option<String>,

        #[arg(short, long)]
        verbose: bool,

        /// Mark the current revisions
        #[arg(short = 'i', long = "indicate-current")]
        indicate_current: bool,
    },

    /// Merge revisions together
    Merge {
        /// Revisions to merge
        #[arg(required = true, num_args = 1..)]
        revisions: Vec<String>,

        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show a revision
    Show {
        revision: String,
    },

    /// Create a new revision
    Revision {
        #[arg(short, long)]
        message: String,

        /// The branch head in the form <branchname>@head
        #[arg(long)]
        head: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Option<Commands> {
        Cli::try_parse_from(std::iter::once("mxxr").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    #[test]
    fn test_default_is_serve() {
        assert!(parse(&[]).is_none());
        assert!(matches!(parse(&["serve"]), Some(Commands::Serve)));
    }

    #[test]
    #[cfg(feature = "cli")]
    fn test_db_commands() {
        let Some(Commands::Db { action }) = parse(&["db", "downgrade", "-1"]) else {
            panic!("expected a db command");
        };
        assert_eq!(action, DbCommands::Downgrade { revision: "-1".into() });

        let Some(Commands::Db { action }) = parse(&["db", "upgrade"]) else {
            panic!("expected a db command");
        };
        assert_eq!(action, DbCommands::Upgrade { revision: "heads".into() });

        let Some(Commands::Db { action }) =
            parse(&["db", "revision", "-m", "add todo", "--head", "mxntodo@head"])
        else {
            panic!("expected a db command");
        };
        assert_eq!(
            action,
            DbCommands::Revision {
                message: "add todo".into(),
                head: "mxntodo@head".into()
            }
        );

        let Some(Commands::Db { action }) = parse(&["db", "history", "-r", "m1:", "-i"]) else {
            panic!("expected a db command");
        };
        assert_eq!(
            action,
            DbCommands::History {
                rev_range: Some("m1:".into()),
                verbose: false,
                indicate_current: true
            }
        );
    }

    #[test]
    #[cfg(feature = "cli")]
    fn test_merge_requires_revisions() {
        assert!(Cli::try_parse_from(["mxxr", "db", "merge"]).is_err());
    }
}
