//! displayctl - display configuration tool
//!
//! Entry point for the `displayctl` binary.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::debug;

use displayctl::cli::{parse_prefs, parse_set, Cli, Command, PrefsArgs, SetArgs, ShowArgs};
use displayctl::configure::build_config;
use displayctl::dbus::DisplayConfig;
use displayctl::model::ColorMode;
use displayctl::show::{print_config, print_current_state};
use displayctl::wire::apply_request;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Show(args) => cmd_show(args).await,
        Command::Set(args) => cmd_set(args).await,
        Command::Prefs(args) => cmd_prefs(args).await,
    };

    if let Err(error) = result {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn connect() -> Result<DisplayConfig<'static>> {
    let connection = zbus::Connection::session().await?;
    Ok(DisplayConfig::new(&connection).await?)
}

async fn cmd_show(args: ShowArgs) -> Result<()> {
    let display_config = connect()
        .await
        .context("Failed to retrieve current state")?;
    let state = display_config
        .current_state()
        .await
        .context("Failed to retrieve current state")?;

    // older servers have no Luminance property; show the rest regardless
    let luminance = match display_config.luminance().await {
        Ok(entries) => entries,
        Err(error) => {
            debug!(%error, "luminance preferences unavailable");
            Vec::new()
        }
    };

    let (show_modes, show_properties) = if args.verbose {
        (true, true)
    } else {
        (args.modes, args.properties)
    };
    print_current_state(
        std::io::stdout().lock(),
        &state,
        &luminance,
        show_modes,
        show_properties,
    )?;
    Ok(())
}

async fn cmd_set(args: SetArgs) -> Result<()> {
    let command = parse_set(&args.args).context("Failed to create configuration")?;

    let display_config = connect()
        .await
        .context("Failed to retrieve current state")?;
    let mut state = display_config
        .current_state()
        .await
        .context("Failed to retrieve current state")?;

    let config =
        build_config(&mut state, &command.request).context("Failed to create configuration")?;
    let request = apply_request(&state, &config, command.method)
        .context("Failed to create configuration")?;

    if command.verbose {
        print_config(std::io::stdout().lock(), &state, &config)?;
    }

    display_config
        .apply(&request)
        .await
        .context("Failed to apply configuration")?;
    Ok(())
}

async fn cmd_prefs(args: PrefsArgs) -> Result<()> {
    let command = parse_prefs(&args.args)?;

    let display_config = connect()
        .await
        .context("Failed to retrieve current state")?;
    let state = display_config
        .current_state()
        .await
        .context("Failed to retrieve current state")?;

    for prefs in &command.monitors {
        let monitor = state
            .monitor(&prefs.connector)
            .ok_or_else(|| anyhow!("Monitor with connector {} not found", prefs.connector))?;
        let color_mode = monitor.color_mode.unwrap_or(ColorMode::Default);

        if let Some(luminance) = prefs.luminance {
            display_config
                .set_luminance(&prefs.connector, color_mode, luminance)
                .await?;
        } else if prefs.reset_luminance {
            display_config
                .reset_luminance(&prefs.connector, color_mode)
                .await?;
        }
    }
    Ok(())
}
