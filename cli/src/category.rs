use crate::resolve_category;
use clap::Parser;
use vaul_store::CommandStore;

/// Category management.
#[derive(Debug, Parser)]
pub struct CategoryCli {
    #[command(subcommand)]
    pub cmd: CategoryCommand,
}

/// Category subcommands. Categories can be named by id or by name.
#[derive(Debug, clap::Subcommand)]
pub enum CategoryCommand {
    /// List categories with their command counts.
    List,
    /// Create a category (returns the existing one if the name is taken).
    Add {
        name: String,
        #[arg(long, default_value = "")]
        color: String,
    },
    /// Rename a category and optionally change its color.
    Rename {
        category: String,
        name: String,
        #[arg(long)]
        color: Option<String>,
    },
    /// Remove a category, moving its commands elsewhere.
    Rm {
        category: String,
        /// Category receiving the commands; uncategorized if omitted.
        #[arg(long = "reassign-to")]
        reassign_to: Option<String>,
    },
    /// Move all commands from SOURCE into TARGET and remove SOURCE.
    Merge { source: String, target: String },
}

pub fn run(store: &mut CommandStore, cli: CategoryCli) -> anyhow::Result<()> {
    match cli.cmd {
        CategoryCommand::List => {
            let uncategorized = store.commands_by_category("").len();
            for cat in store.categories() {
                let n = store.commands_by_category(&cat.id).len();
                if cat.color.is_empty() {
                    println!("{}  {}  ({n})", cat.id, cat.name);
                } else {
                    println!("{}  {}  {}  ({n})", cat.id, cat.name, cat.color);
                }
            }
            println!("-  {}  ({uncategorized})", vaul_store::vault::UNCATEGORIZED_LABEL);
        }
        CategoryCommand::Add { name, color } => {
            let name = name.trim();
            if name.is_empty() {
                anyhow::bail!("category name must not be empty");
            }
            let cat = store.create_category(name, &color)?;
            println!("{}", cat.id);
        }
        CategoryCommand::Rename {
            category,
            name,
            color,
        } => {
            let id = resolve_category(store, &category)?;
            let color = match color {
                Some(c) => c,
                None => store.category(&id)?.color.clone(),
            };
            store.update_category(&id, name.trim(), &color)?;
        }
        CategoryCommand::Rm {
            category,
            reassign_to,
        } => {
            let id = resolve_category(store, &category)?;
            let target = match reassign_to {
                Some(t) => resolve_category(store, &t)?,
                None => String::new(),
            };
            store.delete_category(&id, &target)?;
        }
        CategoryCommand::Merge { source, target } => {
            let source = resolve_category(store, &source)?;
            let target = resolve_category(store, &target)?;
            store.merge_categories(&source, &target)?;
        }
    }
    Ok(())
}
