//! Tree Rendering
//!
//! Renders the current state and built configurations as box-drawing trees.
//! The printer keeps a list of tree levels with open branches; continuation
//! bars are drawn into the indentation of every later line until the branch
//! closes with its last child.

use std::io::{self, Write};

use crate::configure::Config;
use crate::dbus::{find_luminance, LuminanceEntry};
use crate::model::{ColorMode, LogicalMonitor, Monitor, MonitorMode, Properties};
use crate::state::MonitorsState;

/// Writer-backed box-drawing tree printer.
pub struct TreePrinter<W: Write> {
    out: W,
    open_levels: Vec<i32>,
}

impl<W: Write> TreePrinter<W> {
    /// Start a printer writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            open_levels: Vec::new(),
        }
    }

    /// Print one tree node at `level`. A negative level prints the data
    /// without any tree decoration.
    fn node(&mut self, level: i32, is_last: bool, data: &str) -> io::Result<()> {
        if level < 0 {
            writeln!(self.out, "{data}")?;
            return Ok(());
        }

        let link = if is_last { '└' } else { '├' };
        let indent = ((level * 4) as usize).max(1);
        let mut buffer: Vec<char> = format!("{link:>indent$}──{data}").chars().collect();
        for &open in &self.open_levels {
            if open == level {
                continue;
            }
            let mut index = (open * 4) as usize;
            if open > 0 {
                index -= 1;
            }
            if index < buffer.len() {
                buffer[index] = '│';
            }
        }
        writeln!(self.out, "{}", buffer.into_iter().collect::<String>())?;

        if is_last {
            self.open_levels.retain(|&open| open != level);
        } else if !self.open_levels.contains(&level) {
            self.open_levels.push(level);
        }
        Ok(())
    }

    fn raw(&mut self, data: &str) -> io::Result<()> {
        writeln!(self.out, "{data}")
    }

    fn properties(&mut self, level: i32, properties: &Properties) -> io::Result<()> {
        self.node(level, true, &format!("Properties: ({})", properties.len()))?;
        let last = properties.len();
        for (index, (key, value)) in properties.iter().enumerate() {
            self.node(level + 1, index + 1 == last, &format!("{key} ⇒  {value}"))?;
        }
        Ok(())
    }

    fn mode(
        &mut self,
        mode: &MonitorMode,
        is_last: bool,
        show_properties: bool,
    ) -> io::Result<()> {
        self.node(2, is_last, &mode.name)?;
        if !show_properties {
            return Ok(());
        }
        self.node(3, false, &format!("Dimension: {}", mode.resolution))?;
        self.node(3, false, &format!("Refresh rate: {:.3}", mode.refresh_rate))?;
        self.node(3, false, &format!("Preferred scale: {}", mode.preferred_scale))?;
        self.node(
            3,
            false,
            &format!("Supported scales: {:?}", mode.supported_scales),
        )?;
        self.properties(3, &mode.properties)
    }

    fn monitor_prefs(
        &mut self,
        monitor: &Monitor,
        luminance: &[LuminanceEntry],
        level: i32,
        is_last: bool,
    ) -> io::Result<()> {
        self.node(level, is_last, "Preferences:")?;
        self.node(level + 1, true, "Luminances:")?;

        // color modes without a reported entry are skipped, so is_last must
        // track the printed rows rather than the supported-mode list
        let entries: Vec<(ColorMode, &LuminanceEntry)> = monitor
            .supported_color_modes
            .iter()
            .filter_map(|&color_mode| {
                find_luminance(luminance, &monitor.connector, color_mode)
                    .map(|entry| (color_mode, entry))
            })
            .collect();
        let last = entries.len();
        for (index, (color_mode, entry)) in entries.into_iter().enumerate() {
            let is_default = if entry.is_unset { " (default)" } else { "" };
            let is_current = if monitor.color_mode == Some(color_mode) {
                " (current)"
            } else {
                ""
            };
            self.node(
                level + 2,
                index + 1 == last,
                &format!(
                    "{color_mode} ⇒  {}{is_default}{is_current}",
                    entry.luminance
                ),
            )?;
        }
        Ok(())
    }
}

fn monitor_title(monitor: &Monitor) -> String {
    match monitor.display_name() {
        Some(name) => format!("Monitor {} ({name})", monitor.connector),
        None => format!("Monitor {}", monitor.connector),
    }
}

fn member_title(monitor: &Monitor) -> String {
    match monitor.display_name() {
        Some(name) => format!("{} ({name})", monitor.connector),
        None => monitor.connector.clone(),
    }
}

/// Print the full current state, mirroring `show`'s output layout.
pub fn print_current_state<W: Write>(
    out: W,
    state: &MonitorsState,
    luminance: &[LuminanceEntry],
    show_modes: bool,
    show_properties: bool,
) -> io::Result<()> {
    let mut printer = TreePrinter::new(out);
    printer.raw("Monitors:")?;

    let last_monitor = state.monitors.len();
    for (index, monitor) in state.monitors.iter().enumerate() {
        printer.node(0, index + 1 == last_monitor, &monitor_title(monitor))?;

        if let Some(vendor) = &monitor.vendor {
            printer.node(1, false, &format!("Vendor: {vendor}"))?;
        }
        if let Some(product) = &monitor.product {
            printer.node(1, false, &format!("Product: {product}"))?;
        }
        if let Some(serial) = &monitor.serial {
            printer.node(1, false, &format!("Serial: {serial}"))?;
        }

        if show_modes {
            printer.node(1, !show_properties, &format!("Modes ({})", monitor.modes.len()))?;
            let last_mode = monitor.modes.len();
            for (mode_index, mode) in monitor.modes.iter().enumerate() {
                printer.mode(mode, mode_index + 1 == last_mode, show_properties)?;
            }
        } else {
            let labelled = monitor
                .current()
                .map(|mode| ("Current", mode))
                .or_else(|| monitor.preferred().map(|mode| ("Preferred", mode)));
            if let Some((label, mode)) = labelled {
                printer.node(1, false, &format!("{label} mode"))?;
                printer.mode(mode, true, show_properties)?;
            }
        }

        printer.monitor_prefs(monitor, luminance, 1, !show_properties)?;

        if show_properties {
            printer.properties(1, &monitor.properties)?;
        }
    }

    printer.raw("")?;
    printer.raw("Logical monitors:")?;
    let last_logical = state.logical_monitors.len();
    for (index, logical_monitor) in state.logical_monitors.iter().enumerate() {
        printer.node(
            0,
            index + 1 == last_logical,
            &format!("Logical monitor #{}", index + 1),
        )?;
        print_logical_monitor_body(&mut printer, state, logical_monitor, show_properties)?;
        if show_properties {
            printer.properties(1, &logical_monitor.properties)?;
        }
    }

    if show_properties {
        printer.raw("")?;
        printer.properties(-1, &state.properties)?;
    }
    Ok(())
}

fn print_logical_monitor_body<W: Write>(
    printer: &mut TreePrinter<W>,
    state: &MonitorsState,
    logical_monitor: &LogicalMonitor,
    show_properties: bool,
) -> io::Result<()> {
    printer.node(
        1,
        false,
        &format!(
            "Position: ({}, {})",
            logical_monitor.position.x, logical_monitor.position.y
        ),
    )?;
    printer.node(1, false, &format!("Scale: {}", logical_monitor.scale))?;
    printer.node(1, false, &format!("Transform: {}", logical_monitor.transform))?;
    printer.node(
        1,
        false,
        &format!(
            "Primary: {}",
            if logical_monitor.is_primary { "yes" } else { "no" }
        ),
    )?;
    printer.node(
        1,
        !show_properties,
        &format!("Monitors: ({})", logical_monitor.monitors.len()),
    )?;
    let last = logical_monitor.monitors.len();
    for (index, connector) in logical_monitor.monitors.iter().enumerate() {
        let title = match state.monitor(connector) {
            Some(monitor) => member_title(monitor),
            None => connector.clone(),
        };
        printer.node(2, index + 1 == last, &title)?;
    }
    Ok(())
}

/// Echo a built configuration before applying it (`set --verbose`).
pub fn print_config<W: Write>(out: W, state: &MonitorsState, config: &Config) -> io::Result<()> {
    let mut printer = TreePrinter::new(out);
    printer.raw("Configuration:")?;
    printer.node(0, false, &format!("Layout mode: {}", config.layout_mode))?;
    printer.node(
        0,
        false,
        &format!("Logical monitors ({})", config.logical_monitors.len()),
    )?;

    let last_logical = config.logical_monitors.len();
    for (index, logical_monitor) in config.logical_monitors.iter().enumerate() {
        printer.node(
            1,
            index + 1 == last_logical,
            &format!("Logical monitor #{}", index + 1),
        )?;
        printer.node(
            2,
            false,
            &format!(
                "Position: ({}, {})",
                logical_monitor.position.x, logical_monitor.position.y
            ),
        )?;
        printer.node(2, false, &format!("Scale: {}", logical_monitor.scale))?;
        printer.node(2, false, &format!("Transform: {}", logical_monitor.transform))?;
        printer.node(
            2,
            false,
            &format!(
                "Primary: {}",
                if logical_monitor.is_primary { "yes" } else { "no" }
            ),
        )?;
        printer.node(
            2,
            true,
            &format!("Monitors: ({})", logical_monitor.monitors.len()),
        )?;

        let last = logical_monitor.monitors.len();
        for (member_index, connector) in logical_monitor.monitors.iter().enumerate() {
            let Some(monitor) = state.monitor(connector) else {
                continue;
            };
            printer.node(3, member_index + 1 == last, &monitor_title(monitor))?;
            let color_mode: Option<ColorMode> = monitor.selected_color_mode;
            if let Some(mode) = monitor.configured_mode() {
                printer.node(4, color_mode.is_none(), &format!("Mode: {}", mode.name))?;
            }
            if let Some(color_mode) = color_mode {
                printer.node(4, true, &format!("Color mode: {color_mode}"))?;
            }
        }
    }

    printer.node(
        0,
        true,
        &format!("Monitors for lease ({})", config.monitors_for_lease.len()),
    )?;
    let last = config.monitors_for_lease.len();
    for (index, connector) in config.monitors_for_lease.iter().enumerate() {
        let title = match state.monitor(connector) {
            Some(monitor) => monitor_title(monitor),
            None => format!("Monitor {connector}"),
        };
        printer.node(1, index + 1 == last, &title)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configure::{build_config, ConfigRequest, LogicalMonitorSpec, MonitorSpec};
    use crate::state::tests::{logical_descriptor, reply_with, test_monitor};
    use crate::state::MonitorsState;

    fn render_state(state: &MonitorsState, show_modes: bool, show_properties: bool) -> String {
        let mut out = Vec::new();
        print_current_state(&mut out, state, &[], show_modes, show_properties).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_tree_layout_single_monitor() {
        let state = MonitorsState::from_reply(reply_with(
            vec![test_monitor("DP-1")],
            vec![logical_descriptor(0, 0, &["DP-1"], true)],
            true,
        ))
        .unwrap();

        let expected = "\
Monitors:
└──Monitor DP-1 (Test DP-1)
   ├──Vendor: TST
   ├──Product: TestPanel
   ├──Serial: 0x0001
   ├──Current mode
   │   └──1920x1080@60
   └──Preferences:
       └──Luminances:

Logical monitors:
└──Logical monitor #1
   ├──Position: (0, 0)
   ├──Scale: 1
   ├──Transform: normal
   ├──Primary: yes
   └──Monitors: (1)
       └──DP-1 (Test DP-1)
";
        assert_eq!(render_state(&state, false, false), expected);
    }

    #[test]
    fn test_luminance_branch_closes_after_missing_entries() {
        let mut state = MonitorsState::from_reply(reply_with(
            vec![test_monitor("DP-1")],
            vec![logical_descriptor(0, 0, &["DP-1"], true)],
            true,
        ))
        .unwrap();
        {
            let monitor = state.monitor_mut("DP-1").unwrap();
            monitor.supported_color_modes = vec![ColorMode::Default, ColorMode::Bt2100];
            monitor.color_mode = Some(ColorMode::Default);
        }

        // only the first supported color mode has a reported luminance
        let luminance = vec![LuminanceEntry {
            connector: "DP-1".to_string(),
            color_mode: ColorMode::Default,
            luminance: 80.0,
            is_unset: false,
        }];

        let mut out = Vec::new();
        print_current_state(&mut out, &state, &luminance, false, false).unwrap();
        let rendered = String::from_utf8(out).unwrap();

        // the single printed row closes its branch, and no stray
        // continuation bar leaks into the logical monitor section
        assert!(rendered.contains("           └──default ⇒  80 (current)"));
        assert!(rendered.contains("└──Logical monitor #1"));
    }

    #[test]
    fn test_continuation_bars_between_siblings() {
        let state = MonitorsState::from_reply(reply_with(
            vec![test_monitor("DP-1"), test_monitor("DP-2")],
            vec![],
            true,
        ))
        .unwrap();

        let rendered = render_state(&state, false, false);
        // the first monitor's subtree carries a bar down to the second
        assert!(rendered.contains("├──Monitor DP-1 (Test DP-1)"));
        assert!(rendered.contains("│  ├──Vendor: TST"));
        assert!(rendered.contains("│  │   └──1920x1080@60"));
        assert!(rendered.contains("└──Monitor DP-2 (Test DP-2)"));
        assert!(rendered.contains("\n   ├──Vendor: TST"));
    }

    #[test]
    fn test_modes_listing() {
        let state = MonitorsState::from_reply(reply_with(
            vec![test_monitor("DP-1")],
            vec![],
            true,
        ))
        .unwrap();

        let rendered = render_state(&state, true, false);
        assert!(rendered.contains("└──Modes (1)"));
        assert!(rendered.contains("└──1920x1080@60"));
        assert!(!rendered.contains("Current mode"));
    }

    #[test]
    fn test_properties_listing() {
        let state = MonitorsState::from_reply(reply_with(
            vec![test_monitor("DP-1")],
            vec![],
            true,
        ))
        .unwrap();

        let rendered = render_state(&state, false, true);
        assert!(rendered.contains("└──Properties: (1)"));
        assert!(rendered.contains("display-name ⇒  Test DP-1"));
        // top-level state properties, undecorated header
        assert!(rendered.contains("\nProperties: (2)"));
        assert!(rendered.contains("supports-changing-layout-mode ⇒  yes"));
    }

    #[test]
    fn test_print_config_echo() {
        let mut state = MonitorsState::from_reply(reply_with(
            vec![test_monitor("DP-1"), test_monitor("DP-2")],
            vec![],
            true,
        ))
        .unwrap();

        let request = ConfigRequest {
            layout_mode: None,
            logical_monitors: vec![LogicalMonitorSpec {
                monitors: vec![MonitorSpec {
                    connector: "DP-1".to_string(),
                    mode: None,
                    color_mode: Some(crate::model::ColorMode::Bt2100),
                }],
                is_primary: true,
                ..Default::default()
            }],
            monitors_for_lease: vec!["DP-2".to_string()],
        };
        let config = build_config(&mut state, &request).unwrap();

        let mut out = Vec::new();
        print_config(&mut out, &state, &config).unwrap();
        let rendered = String::from_utf8(out).unwrap();

        assert!(rendered.starts_with("Configuration:\n├──Layout mode: logical"));
        assert!(rendered.contains("Logical monitor #1"));
        assert!(rendered.contains("Mode: 1920x1080@60"));
        assert!(rendered.contains("Color mode: bt2100"));
        assert!(rendered.contains("└──Monitors for lease (1)"));
        assert!(rendered.contains("└──Monitor DP-2 (Test DP-2)"));
    }
}
