//! Interactive dashboard session.
//!
//! Holds the form state of one user: input mode, selected index, manual
//! values and filter settings. The dataset and models are only borrowed.

use super::command::{FilterArgs, InputMode, SessionCommand, SessionLine};
use super::render;
use super::Dashboard;
use crate::dataset::schema::{PASSENGER_COLUMN, PICKUP_HOUR_COLUMN};
use crate::feature_resolver::ManualInput;
use crate::filter::RowFilter;
use crate::types::FeatureVector;
use anyhow::Result;
use std::io::Write;
use tracing::{debug, warn};

const TITLE: &str = "NYC Taxi Trip Duration Analysis";

/// Whether the session keeps reading commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<'a> {
    dashboard: &'a Dashboard,
    mode: InputMode,
    selected_index: i64,
    manual: ManualInput,
    filter: Option<RowFilter>,
}

impl<'a> Session<'a> {
    /// Fresh session in index mode on the first row, manual values at defaults
    pub fn new(dashboard: &'a Dashboard) -> Self {
        let resolver = dashboard.resolver();
        let selected_index = resolver.index_bounds().map_or(0, |(min, _)| min as i64);

        Self {
            dashboard,
            mode: InputMode::Index,
            selected_index,
            manual: resolver.defaults(),
            filter: dashboard.build_filter(None, &FilterArgs::default()),
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn selected_index(&self) -> i64 {
        self.selected_index
    }

    pub fn manual(&self) -> &ManualInput {
        &self.manual
    }

    pub fn filter(&self) -> Option<&RowFilter> {
        self.filter.as_ref()
    }

    /// Model input for the current mode. An unresolvable index yields an
    /// empty vector.
    pub fn current_vector(&self) -> FeatureVector {
        let resolver = self.dashboard.resolver();
        match self.mode {
            InputMode::Index => resolver
                .resolve_index(self.selected_index)
                .unwrap_or_else(|_| FeatureVector::empty()),
            InputMode::Manual => resolver.resolve_manual(&self.manual),
        }
    }

    /// Prompt shown by the line editor for the current mode
    pub fn prompt(&self) -> &'static str {
        match self.mode {
            InputMode::Index => "index> ",
            InputMode::Manual => "manual> ",
        }
    }

    /// Title, help hint and the prompt for the starting mode
    pub fn write_banner<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "{}", TITLE)?;
        writeln!(out, "Type 'help' for commands.")?;
        self.write_mode_prompt(out)
    }

    /// Parse and apply one typed line. Parse errors and help are written
    /// to `out` and the session continues.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }

        match SessionLine::parse_line(line) {
            Ok(command) => self.execute(command, out),
            Err(e) => {
                write!(out, "{}", e)?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Apply one command and render its view
    pub fn execute<W: Write>(&mut self, command: SessionCommand, out: &mut W) -> Result<Flow> {
        debug!(?command, "Dashboard command");
        let dashboard = self.dashboard;

        match command {
            SessionCommand::Mode { mode } => {
                self.mode = mode;
                self.write_mode_prompt(out)?;
            }
            SessionCommand::Index { index } => {
                self.selected_index = index;
                if self.mode != InputMode::Index {
                    writeln!(out, "Switched to index mode")?;
                    self.mode = InputMode::Index;
                }
                self.write_selected_row(out)?;
            }
            SessionCommand::Set { feature, value } => {
                let raw = value.join(" ");
                match dashboard.resolver().set_manual(&mut self.manual, &feature, &raw) {
                    Ok(()) => {
                        if self.mode != InputMode::Manual {
                            writeln!(out, "Switched to manual mode")?;
                            self.mode = InputMode::Manual;
                        }
                        writeln!(out, "{} = {}", feature, raw)?;
                    }
                    Err(e) => writeln!(out, "Error: {}", e)?,
                }
            }
            SessionCommand::Reset => {
                self.manual = dashboard.resolver().defaults();
                writeln!(out, "Manual values reset to defaults")?;
            }
            SessionCommand::Filter(args) => {
                self.filter = dashboard.build_filter(self.filter.as_ref(), &args);
                self.write_filtered(out)?;
            }
            SessionCommand::Preview { rows } => {
                let n = rows.unwrap_or(dashboard.preview_rows());
                let rows: Vec<_> = dashboard.dataset().head(n).iter().collect();
                writeln!(out, "Dataset Preview")?;
                render::write_rows(out, dashboard.dataset(), &rows)?;
            }
            SessionCommand::Defaults => {
                render::write_manual(out, dashboard.dataset().schema(), &self.manual)?;
            }
            SessionCommand::Show => match self.mode {
                InputMode::Index => self.write_selected_row(out)?,
                InputMode::Manual => render::write_vector(out, &self.current_vector())?,
            },
            SessionCommand::Predict => {
                let vector = self.current_vector();
                match dashboard.predict(&vector) {
                    Ok(report) => render::write_report(out, &report)?,
                    Err(e) => writeln!(out, "Error: {}", e)?,
                }
            }
            SessionCommand::Models => render::write_models(out, dashboard.engine())?,
            SessionCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn write_mode_prompt<W: Write>(&self, out: &mut W) -> Result<()> {
        match self.mode {
            InputMode::Index => match self.dashboard.resolver().index_bounds() {
                Some((min, max)) => writeln!(
                    out,
                    "Select Row by Index: enter 'index N' with N between {} and {}",
                    min, max
                )?,
                None => writeln!(out, "The dataset has no rows to select")?,
            },
            InputMode::Manual => {
                writeln!(out, "Enter Feature Values Manually: 'set FEATURE VALUE'")?;
                render::write_manual(out, self.dashboard.dataset().schema(), &self.manual)?;
            }
        }
        Ok(())
    }

    fn write_selected_row<W: Write>(&self, out: &mut W) -> Result<()> {
        let dataset = self.dashboard.dataset();
        match self.dashboard.resolver().resolve_index(self.selected_index) {
            Ok(_) => {
                let rows: Vec<_> = usize::try_from(self.selected_index)
                    .ok()
                    .and_then(|index| dataset.find(index))
                    .into_iter()
                    .collect();
                render::write_rows(out, dataset, &rows)?;
            }
            Err(e) => {
                warn!(index = self.selected_index, error = %e, "Invalid index selected");
                writeln!(out, "Warning: {}", e)?;
            }
        }
        Ok(())
    }

    fn write_filtered<W: Write>(&self, out: &mut W) -> Result<()> {
        let dataset = self.dashboard.dataset();
        let Some(filter) = &self.filter else {
            writeln!(out, "No vendors to filter by")?;
            return Ok(());
        };

        let vendors: Vec<String> = self
            .dashboard
            .vendor_choices()
            .iter()
            .map(|v| v.to_string())
            .collect();
        writeln!(
            out,
            "Filters: vendor={} (choices: {}), passengers {}..={}, pickup hour {}..={}",
            filter.vendor,
            vendors.join(", "),
            filter.passenger_range.0,
            filter.passenger_range.1,
            filter.hour_range.0,
            filter.hour_range.1
        )?;

        if let (Some(passengers), Some(hours)) = (
            dataset.numeric_range(PASSENGER_COLUMN),
            dataset.numeric_range(PICKUP_HOUR_COLUMN),
        ) {
            writeln!(
                out,
                "Data ranges: passengers {}..={}, pickup hour {}..={}",
                passengers.0, passengers.1, hours.0, hours.1
            )?;
        }

        let rows = filter.apply(dataset);
        render::write_rows(out, dataset, &rows)?;
        Ok(())
    }
}
