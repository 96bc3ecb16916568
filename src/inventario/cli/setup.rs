use clap::{CommandFactory, Parser, Subcommand};
use inventario::model::Condition;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "inventario",
    bin_name = "inventario",
    version,
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Catalogue your belongings by inventory and section", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, help_heading = "Options")]
    pub no_color: bool,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Inventory,
    Item,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Inventory => "Inventories and Sections:",
            CommandGroup::Item => "Items:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    /// Returns the group for a given command name
    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "new" | "list" | "use" | "add-section" | "sections" => Some(CommandGroup::Inventory),
            "add" | "remove" | "show" => Some(CommandGroup::Item),
            "report" | "config" | "help" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[CommandGroup::Inventory, CommandGroup::Item, CommandGroup::Misc]
    }
}

/// Top-level help with commands listed by group.
pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("inventario {version}\n"));
    output.push_str("Catalogue your belongings by inventory and section\n");
    output.push('\n');
    output.push_str("Usage: inventario [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();
    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let name = sc.get_name();
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<12} {}\n", name, about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("  -v, --verbose    Verbose output (debug logging on stderr)\n");
    output.push_str("      --no-color   Disable colored output\n");
    output.push_str("  -h, --help       Print help\n");
    output.push_str("  -V, --version    Print version\n");

    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

/// Name of the subcommand as typed on the command line.
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Inventory(c) => match c {
            InventoryCommands::New { .. } => "new",
            InventoryCommands::List => "list",
            InventoryCommands::Use { .. } => "use",
            InventoryCommands::AddSection { .. } => "add-section",
            InventoryCommands::Sections => "sections",
        },
        Commands::Item(c) => match c {
            ItemCommands::Add { .. } => "add",
            ItemCommands::Remove { .. } => "remove",
            ItemCommands::Show { .. } => "show",
        },
        Commands::Misc(c) => match c {
            MiscCommands::Report { .. } => "report",
            MiscCommands::Config { .. } => "config",
            MiscCommands::Help { .. } => "help",
        },
    }
}

/// Prints help for a command by name
pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();

    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name {
            print!("{}", subcmd.render_help());
            return;
        }
    }

    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Inventory(InventoryCommands),

    #[command(flatten)]
    Item(ItemCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

#[derive(Subcommand, Debug)]
pub enum InventoryCommands {
    /// Create an inventory and start using it
    #[command(alias = "n", display_order = 1)]
    New {
        /// Name words (joined with spaces)
        #[arg(trailing_var_arg = true, required = true)]
        name: Vec<String>,
    },

    /// List inventories
    #[command(alias = "ls", display_order = 2)]
    List,

    /// Select the inventory to work on (no argument clears the selection)
    #[command(display_order = 3)]
    Use {
        /// Inventory id or name
        #[arg(trailing_var_arg = true)]
        inventory: Vec<String>,
    },

    /// Add a section to the current inventory
    #[command(display_order = 4)]
    AddSection {
        /// Name words (joined with spaces)
        #[arg(trailing_var_arg = true, required = true)]
        name: Vec<String>,
    },

    /// List sections of the current inventory
    #[command(display_order = 5)]
    Sections,
}

#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// Add an item to a section
    #[command(alias = "a", display_order = 10)]
    Add {
        /// Section id or name
        section: String,

        /// Item name
        name: String,

        /// How many of this item there are
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,

        /// Nuevo, Bueno, Regular or Malo
        #[arg(short, long, default_value_t = Condition::Nuevo)]
        condition: Condition,

        /// Free text description
        #[arg(short, long)]
        description: Option<String>,

        /// Path to a photo of the item
        #[arg(short, long)]
        image: Option<PathBuf>,
    },

    /// Remove an item from a section
    #[command(alias = "rm", display_order = 11)]
    Remove {
        /// Section id or name
        section: String,

        /// Item id, as shown by `show`
        item: String,
    },

    /// Show the items of the current inventory
    #[command(alias = "v", display_order = 12)]
    Show {
        /// Only this section (id or name), or "all"
        #[arg(short, long, default_value = "all")]
        section: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Export the current inventory as a PDF report
    #[command(display_order = 20)]
    Report {
        /// Directory the PDF is written to (default: current directory)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },

    /// Get or set configuration
    #[command(display_order = 21)]
    Config {
        /// Configuration key
        key: Option<String>,

        /// Value to set
        value: Option<String>,
    },

    /// Print help
    #[command(display_order = 22)]
    Help {
        /// Command to show help for
        command: Option<String>,
    },
}
