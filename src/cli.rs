//! Command-Line Interface
//!
//! Subcommand routing is plain clap derive. The `set` and `prefs`
//! subcommands take order-sensitive option groups (`--logical-monitor`
//! opens a group, `--monitor` a sub-group, and following options attach to
//! the innermost open group), which clap cannot express; their raw
//! arguments are captured verbatim and handed to the explicit group parsers
//! below, which produce fully-formed immutable requests.

use anyhow::{anyhow, bail, Result};
use clap::{Args, Parser, Subcommand};

use crate::configure::{ConfigRequest, LogicalMonitorSpec, MonitorSpec, Placement};
use crate::model::ApplyMethod;

#[derive(Debug, Parser)]
#[command(name = "displayctl")]
#[command(version, about = "Display control utility", long_about = None)]
pub struct Cli {
    /// Selected subcommand
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show display configuration
    Show(ShowArgs),
    /// Set display configuration
    Set(SetArgs),
    /// Set display preferences
    Prefs(PrefsArgs),
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// List available monitor modes
    #[arg(short, long)]
    pub modes: bool,

    /// List properties
    #[arg(short, long)]
    pub properties: bool,

    /// Display all available information
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Configuration options, parsed as ordered groups
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    pub args: Vec<String>,
}

#[derive(Debug, Args)]
pub struct PrefsArgs {
    /// Preference options, parsed as ordered groups
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    pub args: Vec<String>,
}

/// A fully parsed `set` invocation.
#[derive(Debug, Clone)]
pub struct SetCommand {
    /// How the configuration should be applied
    pub method: ApplyMethod,
    /// Echo the built configuration before applying
    pub verbose: bool,
    /// The requested configuration
    pub request: ConfigRequest,
}

/// Preferences for one monitor in a `prefs` invocation.
#[derive(Debug, Clone, Default)]
pub struct MonitorPrefsSpec {
    /// Connector of the monitor
    pub connector: String,
    /// Luminance to set, in percent
    pub luminance: Option<f64>,
    /// Reset the luminance preference instead
    pub reset_luminance: bool,
}

/// A fully parsed `prefs` invocation.
#[derive(Debug, Clone, Default)]
pub struct PrefsCommand {
    /// Per-monitor preference groups
    pub monitors: Vec<MonitorPrefsSpec>,
}

struct Tokens<'a> {
    args: &'a [String],
    index: usize,
    // value split off an --option=value token
    inline_value: Option<String>,
}

impl<'a> Tokens<'a> {
    fn new(args: &'a [String]) -> Self {
        Self {
            args,
            index: 0,
            inline_value: None,
        }
    }

    fn next_option(&mut self) -> Option<String> {
        self.inline_value = None;
        let token = self.args.get(self.index)?;
        self.index += 1;
        if let Some((option, value)) = token.split_once('=').filter(|_| token.starts_with("--")) {
            self.inline_value = Some(value.to_string());
            Some(option.to_string())
        } else {
            Some(token.clone())
        }
    }

    fn value(&mut self, option: &str) -> Result<String> {
        if let Some(value) = self.inline_value.take() {
            return Ok(value);
        }
        let value = self
            .args
            .get(self.index)
            .ok_or_else(|| anyhow!("Option {option} requires a value"))?;
        self.index += 1;
        Ok(value.clone())
    }
}

fn current_group<'a>(
    groups: &'a mut [LogicalMonitorSpec],
    option: &str,
) -> Result<&'a mut LogicalMonitorSpec> {
    groups
        .last_mut()
        .ok_or_else(|| anyhow!("Option {option} must follow --logical-monitor"))
}

fn current_monitor<'a>(
    groups: &'a mut [LogicalMonitorSpec],
    option: &str,
) -> Result<&'a mut MonitorSpec> {
    current_group(groups, option)?
        .monitors
        .last_mut()
        .ok_or_else(|| anyhow!("Option {option} must follow --monitor"))
}

/// Parse the trailing arguments of `set` into an immutable command.
pub fn parse_set(args: &[String]) -> Result<SetCommand> {
    let mut persistent = false;
    let mut verify = false;
    let mut verbose = false;
    let mut request = ConfigRequest::default();
    let mut tokens = Tokens::new(args);

    while let Some(option) = tokens.next_option() {
        match option.as_str() {
            "-P" | "--persistent" => persistent = true,
            "-V" | "--verify" => verify = true,
            "-v" | "--verbose" => verbose = true,
            "-l" | "--layout-mode" => {
                let value = tokens.value(&option)?;
                request.layout_mode = Some(value.parse().map_err(anyhow::Error::msg)?);
            }
            "-e" | "--for-lease-monitor" => {
                request.monitors_for_lease.push(tokens.value(&option)?);
            }
            "-L" | "--logical-monitor" => {
                request.logical_monitors.push(LogicalMonitorSpec::default());
            }
            "-M" | "--monitor" => {
                let connector = tokens.value(&option)?;
                current_group(&mut request.logical_monitors, &option)?
                    .monitors
                    .push(MonitorSpec {
                        connector,
                        ..Default::default()
                    });
            }
            "-p" | "--primary" => {
                current_group(&mut request.logical_monitors, &option)?.is_primary = true;
            }
            "-s" | "--scale" => {
                let value: f64 = tokens.value(&option)?.parse()?;
                current_group(&mut request.logical_monitors, &option)?.scale = Some(value);
            }
            "-t" | "--transform" => {
                let value = tokens.value(&option)?;
                current_group(&mut request.logical_monitors, &option)?.transform =
                    Some(value.parse().map_err(anyhow::Error::msg)?);
            }
            "-x" | "--x" => {
                let value: i32 = tokens.value(&option)?.parse()?;
                current_group(&mut request.logical_monitors, &option)?
                    .placements
                    .push(Placement::X(value));
            }
            "-y" | "--y" => {
                let value: i32 = tokens.value(&option)?.parse()?;
                current_group(&mut request.logical_monitors, &option)?
                    .placements
                    .push(Placement::Y(value));
            }
            "--right-of" => {
                let connector = tokens.value(&option)?;
                current_group(&mut request.logical_monitors, &option)?
                    .placements
                    .push(Placement::RightOf(connector));
            }
            "--left-of" => {
                let connector = tokens.value(&option)?;
                current_group(&mut request.logical_monitors, &option)?
                    .placements
                    .push(Placement::LeftOf(connector));
            }
            "--above" => {
                let connector = tokens.value(&option)?;
                current_group(&mut request.logical_monitors, &option)?
                    .placements
                    .push(Placement::Above(connector));
            }
            "--below" => {
                let connector = tokens.value(&option)?;
                current_group(&mut request.logical_monitors, &option)?
                    .placements
                    .push(Placement::Below(connector));
            }
            "-m" | "--mode" => {
                let value = tokens.value(&option)?;
                current_monitor(&mut request.logical_monitors, &option)?.mode = Some(value);
            }
            "-c" | "--color-mode" => {
                let value = tokens.value(&option)?;
                current_monitor(&mut request.logical_monitors, &option)?.color_mode =
                    Some(value.parse().map_err(anyhow::Error::msg)?);
            }
            other => bail!("Unrecognized option {other}"),
        }
    }

    if persistent && verify {
        bail!("Configuration can't be both persistent and verify-only");
    }
    let method = if persistent {
        ApplyMethod::Persistent
    } else if verify {
        ApplyMethod::Verify
    } else {
        ApplyMethod::Temporary
    };

    Ok(SetCommand {
        method,
        verbose,
        request,
    })
}

/// Parse the trailing arguments of `prefs` into an immutable command.
pub fn parse_prefs(args: &[String]) -> Result<PrefsCommand> {
    let mut command = PrefsCommand::default();
    let mut tokens = Tokens::new(args);

    while let Some(option) = tokens.next_option() {
        match option.as_str() {
            "-M" | "--monitor" => {
                let connector = tokens.value(&option)?;
                command.monitors.push(MonitorPrefsSpec {
                    connector,
                    ..Default::default()
                });
            }
            "-l" | "--luminance" => {
                let value: f64 = tokens.value(&option)?.parse()?;
                command
                    .monitors
                    .last_mut()
                    .ok_or_else(|| anyhow!("Option {option} must follow --monitor"))?
                    .luminance = Some(value);
            }
            "--reset-luminance" => {
                command
                    .monitors
                    .last_mut()
                    .ok_or_else(|| anyhow!("Option {option} must follow --monitor"))?
                    .reset_luminance = true;
            }
            other => bail!("Unrecognized option {other}"),
        }
    }

    for monitor in &command.monitors {
        if monitor.luminance.is_some() && monitor.reset_luminance {
            bail!("Cannot both set and reset luminance");
        }
    }
    Ok(command)
}
