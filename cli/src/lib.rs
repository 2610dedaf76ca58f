pub mod category;
pub mod shell;

use crate::category::CategoryCli;
use clap::CommandFactory;
use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream;
use std::path::PathBuf;
use std::process::ExitCode;
use vaul_store::Command;
use vaul_store::CommandStore;
use vaul_store::factory;

/// Store, organize and run terminal commands.
#[derive(Debug, Parser)]
#[command(name = "vaul", version)]
pub struct Cli {
    /// Directory holding commands.json and categories.json.
    #[arg(long = "data-dir", global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Option<VaulCommand>,
}

#[derive(Debug, clap::Subcommand)]
pub enum VaulCommand {
    /// Save a new command.
    Add {
        content: String,
        /// Category id or name; created if it does not exist yet.
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        alias: Option<String>,
    },
    /// List saved commands, newest first.
    List {
        /// Only commands in this category (id or name).
        #[arg(long, conflicts_with = "uncategorized")]
        category: Option<String>,
        /// Only commands without a category.
        #[arg(long)]
        uncategorized: bool,
        /// Print the raw JSON records.
        #[arg(long)]
        json: bool,
    },
    /// Find commands by content, alias or category name.
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Change a saved command. Omitted fields keep their value; pass an
    /// empty string to clear the category or alias.
    Edit {
        id: String,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        alias: Option<String>,
    },
    /// Remove a saved command by id.
    Rm { id: String },
    /// Print the command behind an alias without running it.
    Show { alias: String },
    /// Run the command behind an alias.
    Run {
        alias: String,
        /// Extra arguments appended to the command.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Manage categories.
    Category(CategoryCli),
    /// Print where the vault files live.
    Path,
    /// `vaul <alias> [args...]` runs the aliased command.
    #[command(external_subcommand)]
    External(Vec<String>),
}

/// Execute the parsed command line.
pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let Some(cmd) = cli.cmd else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };
    let paths = factory::resolve_paths(cli.data_dir);
    let mut store = factory::open_store_at(paths.clone());
    store.set_update_callback(|| tracing::debug!("vault updated"));

    match cmd {
        VaulCommand::Add {
            content,
            category,
            alias,
        } => {
            let content = non_empty_content(&content)?;
            let category = match category {
                Some(c) => category_or_create(&mut store, &c)?,
                None => String::new(),
            };
            let alias = alias.as_deref().map(str::trim).unwrap_or("");
            let cmd = store.add_command(content, &category, alias)?;
            println!("{}", cmd.id);
        }
        VaulCommand::List {
            category,
            uncategorized,
            json,
        } => {
            let listed: Vec<&Command> = if uncategorized {
                store.commands_by_category("")
            } else if let Some(c) = category {
                let id = resolve_category(&store, &c)?;
                store.commands_by_category(&id)
            } else {
                store.commands().iter().collect()
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&listed)?);
            } else {
                for cmd in listed {
                    print_command(&store, cmd);
                }
            }
        }
        VaulCommand::Search { query } => {
            for cmd in store.search(&query.join(" ")) {
                print_command(&store, cmd);
            }
        }
        VaulCommand::Edit {
            id,
            content,
            category,
            alias,
        } => {
            let current = store.command(&id)?.clone();
            let content = match content {
                Some(c) => non_empty_content(&c)?.to_string(),
                None => current.content,
            };
            let category = match category {
                Some(c) => category_or_create(&mut store, &c)?,
                None => current.category,
            };
            let alias = match alias {
                Some(a) => a.trim().to_string(),
                None => current.alias,
            };
            store.update_command(&id, &content, &category, &alias)?;
        }
        VaulCommand::Rm { id } => {
            store.delete_command(&id)?;
        }
        VaulCommand::Show { alias } => {
            println!("{}", lookup_alias(&store, &alias)?.content);
        }
        VaulCommand::Run { alias, args } => {
            return run_alias(&store, &alias, &args);
        }
        VaulCommand::External(argv) => {
            let Some((alias, args)) = argv.split_first() else {
                anyhow::bail!("missing alias");
            };
            return run_alias(&store, alias, args);
        }
        VaulCommand::Category(cli) => {
            category::run(&mut store, cli)?;
        }
        VaulCommand::Path => {
            println!("{}", paths.commands.display());
            println!("{}", paths.categories.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_alias(store: &CommandStore, alias: &str, args: &[String]) -> anyhow::Result<ExitCode> {
    let cmd = lookup_alias(store, alias)?;
    let line = shell::compose(&cmd.content, args)?;
    let code = shell::execute(&line)?;
    Ok(ExitCode::from(code))
}

fn lookup_alias<'a>(store: &'a CommandStore, alias: &str) -> anyhow::Result<&'a Command> {
    store.command_by_alias(alias).map_err(|err| {
        anyhow::anyhow!("{err}\nUse 'vaul list' to see saved aliases, or 'vaul --help' for usage.")
    })
}

fn non_empty_content(content: &str) -> anyhow::Result<&str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        anyhow::bail!("command content must not be empty");
    }
    Ok(trimmed)
}

/// Map a category id or name to its id. An empty string means uncategorized.
pub fn resolve_category(store: &CommandStore, reference: &str) -> anyhow::Result<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Ok(String::new());
    }
    let categories = store.categories();
    let found = categories
        .iter()
        .find(|c| c.id == reference)
        .or_else(|| categories.iter().find(|c| c.name == reference))
        .or_else(|| {
            categories
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(reference))
        });
    match found {
        Some(c) => Ok(c.id.clone()),
        None => anyhow::bail!("unknown category '{reference}'"),
    }
}

fn category_or_create(store: &mut CommandStore, reference: &str) -> anyhow::Result<String> {
    if let Ok(id) = resolve_category(store, reference) {
        return Ok(id);
    }
    let created = store.create_category(reference.trim(), "")?;
    Ok(created.id)
}

fn print_command(store: &CommandStore, cmd: &Command) {
    let alias = if cmd.has_alias() {
        format!(" [{}]", cmd.alias)
    } else {
        String::new()
    };
    println!(
        "{}{}  ({})  {}",
        cmd.id.if_supports_color(Stream::Stdout, |t| t.dimmed()),
        alias.if_supports_color(Stream::Stdout, |t| t.cyan()),
        store.category_label(&cmd.category),
        cmd.content
    );
}
