//! # CLI Layer
//!
//! The **only** place that knows about terminal I/O, process exit codes and the
//! tracing subscriber. Everything else goes through [`InventarioApi`].
//!
//! ## Structure
//!
//! - `run()`: parses arguments, sets up logging and context, dispatches
//! - `init_tracing()`: installs the `tracing-subscriber` formatter on stderr
//! - `handle_*()`: one handler per command; calls the API and prints the result

use super::render::Output;
use super::setup::{
    command_name, print_grouped_help, print_help_for_command, Cli, Commands, InventoryCommands,
    ItemCommands, MiscCommands,
};
use clap::Parser;
use console::Term;
use inventario::api::{ConfigAction, InventarioApi, NewItem};
use inventario::commands::photo::load_image_file;
use inventario::commands::SectionFilter;
use inventario::config::CONFIG_KEYS;
use inventario::commands::CmdResult;
use inventario::error::{InventarioError, Result};
use inventario::init::{data_dir, initialize};
use inventario::model::Condition;
use inventario::report::raster::CommandRasterizer;
use inventario::store::fs::FileStore;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Env var with a tracing filter directive, e.g. `INVENTARIO_LOG=debug`.
pub const LOG_ENV: &str = "INVENTARIO_LOG";

struct AppContext {
    api: InventarioApi<FileStore>,
    out: Output,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.help {
        match &cli.command {
            Some(command) => print_help_for_command(command_name(command)),
            None => print_grouped_help(),
        }
        return Ok(());
    }
    if let Some(Commands::Misc(MiscCommands::Help { command })) = &cli.command {
        match command {
            Some(name) => print_help_for_command(name),
            None => print_grouped_help(),
        }
        return Ok(());
    }

    let use_color = !cli.no_color && Term::stdout().features().colors_supported();
    let mut ctx = init_context(use_color)?;

    match cli.command {
        Some(Commands::Inventory(cmd)) => match cmd {
            InventoryCommands::New { name } => handle_new(&mut ctx, &name.join(" ")),
            InventoryCommands::List => handle_list(&mut ctx),
            InventoryCommands::Use { inventory } => handle_use(&mut ctx, inventory),
            InventoryCommands::AddSection { name } => handle_add_section(&mut ctx, &name.join(" ")),
            InventoryCommands::Sections => handle_sections(&mut ctx),
        },
        Some(Commands::Item(cmd)) => match cmd {
            ItemCommands::Add {
                section,
                name,
                quantity,
                condition,
                description,
                image,
            } => handle_add(
                &mut ctx,
                &section,
                &name,
                quantity,
                condition,
                description,
                image,
            ),
            ItemCommands::Remove { section, item } => handle_remove(&mut ctx, &section, &item),
            ItemCommands::Show { section } => handle_show(&mut ctx, &section),
        },
        Some(Commands::Misc(cmd)) => match cmd {
            MiscCommands::Report { out_dir } => handle_report(&mut ctx, out_dir),
            MiscCommands::Config { key, value } => handle_config(&mut ctx, key, value),
            MiscCommands::Help { .. } => Ok(()),
        },
        None => handle_show(&mut ctx, "all"),
    }
}

/// `INVENTARIO_LOG`, then `RUST_LOG`, then `warn` (`debug` with `--verbose`).
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn init_context(use_color: bool) -> Result<AppContext> {
    let dir = data_dir()?;
    tracing::debug!(data_dir = %dir.display(), "opening data directory");
    let ctx = initialize(dir);

    Ok(AppContext {
        api: ctx.api,
        out: Output::new(use_color),
    })
}

/// Shows what a mutation did even when it could not be saved.
fn applied(out: &Output, result: Result<CmdResult>) -> Result<CmdResult> {
    if let Err(InventarioError::Unsaved { result: unsaved, .. }) = &result {
        out.print_messages(&unsaved.messages);
    }
    result
}

fn handle_new(ctx: &mut AppContext, name: &str) -> Result<()> {
    let result = applied(&ctx.out, ctx.api.create_inventory(name))?;
    ctx.out.print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.list_inventories()?;
    let output = ctx.out.render_listing(
        "",
        &result.inventories,
        ("section", "sections"),
        "No inventories yet. Create one with `inventario new <name>`.",
    );
    print!("{}", output);
    ctx.out.print_messages(&result.messages);
    Ok(())
}

fn handle_use(ctx: &mut AppContext, inventory: Vec<String>) -> Result<()> {
    let key = inventory.join(" ");
    let key = (!key.trim().is_empty()).then_some(key);
    let result = applied(&ctx.out, ctx.api.select_inventory(key.as_deref()))?;
    ctx.out.print_messages(&result.messages);
    Ok(())
}

fn handle_add_section(ctx: &mut AppContext, name: &str) -> Result<()> {
    let result = applied(&ctx.out, ctx.api.create_section(name))?;
    ctx.out.print_messages(&result.messages);
    Ok(())
}

fn handle_sections(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.list_sections()?;
    if ctx.api.state().current.is_some() {
        let output = ctx.out.render_listing(
            "",
            &result.sections,
            ("item", "items"),
            "No sections yet. Add one with `inventario add-section <name>`.",
        );
        print!("{}", output);
    }
    ctx.out.print_messages(&result.messages);
    Ok(())
}

fn handle_add(
    ctx: &mut AppContext,
    section: &str,
    name: &str,
    quantity: i64,
    condition: Condition,
    description: Option<String>,
    image: Option<PathBuf>,
) -> Result<()> {
    let mut item = NewItem::new(name, quantity, condition);
    if let Some(description) = description {
        item = item.with_description(description);
    }
    if let Some(path) = image {
        item = item.with_image(load_image_file(&path)?);
    }

    let result = applied(&ctx.out, ctx.api.add_item(section, item))?;
    ctx.out.print_messages(&result.messages);
    Ok(())
}

fn handle_remove(ctx: &mut AppContext, section: &str, item: &str) -> Result<()> {
    let result = applied(&ctx.out, ctx.api.remove_item(section, item))?;
    ctx.out.print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &mut AppContext, section: &str) -> Result<()> {
    let filter: SectionFilter = section.parse().unwrap_or_default();
    let result = ctx.api.project(&filter)?;

    if let Some((_, inventory)) = ctx.api.state().current_inventory() {
        print!("{}", ctx.out.render_items(&inventory.name, &result.items));
        return Ok(());
    }
    ctx.out.print_messages(&result.messages);
    Ok(())
}

fn handle_report(ctx: &mut AppContext, out_dir: Option<PathBuf>) -> Result<()> {
    let out_dir = match out_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let rasterizer = CommandRasterizer::from_config(ctx.api.settings());
    let result = ctx.api.generate_report(&rasterizer, &out_dir)?;
    ctx.out.print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            let lines: Vec<String> = CONFIG_KEYS
                .iter()
                .filter_map(|key| config.get(key).ok().map(|value| format!("{} = {}", key, value)))
                .collect();
            print!("{}", ctx.out.render_text_list(&lines, "No configuration values."));
        }
    }
    ctx.out.print_messages(&result.messages);
    Ok(())
}
