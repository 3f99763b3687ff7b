use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hiit", version, about = "Interval training timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a work/rest interval session
    Routine {
        /// Work phase length in seconds (5-3600)
        #[arg(long)]
        work: Option<u32>,
        /// Rest phase length in seconds (0-3600); 0 skips rest
        #[arg(long)]
        rest: Option<u32>,
        /// Number of sets (1-99)
        #[arg(long)]
        sets: Option<u32>,
    },
    /// Run a Death by Burpees countdown
    Burpees {
        /// Total length in minutes (1-999)
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Preference management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Routine { work, rest, sets } => commands::run::routine(work, rest, sets),
        Commands::Burpees { minutes } => commands::run::burpees(minutes),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn routine_flags_parse() {
        let cli = Cli::parse_from(["hiit", "routine", "--work", "45", "--rest", "15", "--sets", "6"]);
        match cli.command {
            Commands::Routine { work, rest, sets } => {
                assert_eq!(work, Some(45));
                assert_eq!(rest, Some(15));
                assert_eq!(sets, Some(6));
            }
            _ => panic!("expected routine"),
        }
    }

    #[test]
    fn burpees_defaults_to_stored_minutes() {
        let cli = Cli::parse_from(["hiit", "burpees"]);
        match cli.command {
            Commands::Burpees { minutes } => assert_eq!(minutes, None),
            _ => panic!("expected burpees"),
        }
    }
}
