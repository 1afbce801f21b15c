use anyhow::Context;
use clap::Parser;
use phonebook::cli::{run_add, run_delete, run_list, run_menu, run_search, run_show, run_update, Cli, Commands};
use phonebook::{logging, Config, Database};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?.with_database(cli.db);
    logging::init(&config)?;

    // Without a database nothing else can run; report and stop
    let db = Database::open(&config).context("cannot start phonebook")?;

    match cli.command {
        None => {
            // No subcommand provided - start the interactive session
            run_menu(&db)?;
        }
        Some(Commands::List) => {
            run_list(&db)?;
        }
        Some(Commands::Search(args)) => {
            run_search(&db, args)?;
        }
        Some(Commands::Show(args)) => {
            run_show(&db, args.id)?;
        }
        Some(Commands::Add(args)) => {
            run_add(&db, args)?;
        }
        Some(Commands::Edit(args)) => {
            run_update(&db, args.id, args.fields)?;
        }
        Some(Commands::Delete(args)) => {
            run_delete(&db, args.id, args.force)?;
        }
    }

    Ok(())
}
