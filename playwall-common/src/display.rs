use std::fmt;
use crate::error::{PlaywallError, DisplayError};
use crate::Result;

/// One physical monitor's active pixel rectangle, in absolute screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Display {
    pub index: usize,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Display {
    pub fn new(index: usize, x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { index, x, y, width, height }
    }

    /// Window geometry in the player's `WxH+X+Y` form.
    pub fn geometry(&self) -> String {
        format!("{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "screen {} at ({}, {}, {}, {})", self.index, self.x, self.y, self.width, self.height)
    }
}

/// Source of the display topology.
pub trait DisplaySource {
    fn displays(&self) -> Result<Vec<Display>>;
}

/// Queries the operating system for the active monitors.
pub struct SystemDisplays;

impl DisplaySource for SystemDisplays {
    fn displays(&self) -> Result<Vec<Display>> {
        let query_error = |e: xcap::XCapError| {
            PlaywallError::Display(DisplayError::Query { message: e.to_string() })
        };

        let monitors = xcap::Monitor::all().map_err(query_error)?;
        let mut displays = Vec::with_capacity(monitors.len());
        for (index, monitor) in monitors.iter().enumerate() {
            displays.push(Display::new(
                index,
                monitor.x().map_err(query_error)?,
                monitor.y().map_err(query_error)?,
                monitor.width().map_err(query_error)?,
                monitor.height().map_err(query_error)?,
            ));
        }
        Ok(displays)
    }
}

/// A fixed topology, typically taken from the `[[displays]]` config table.
#[derive(Debug, Clone, Default)]
pub struct StaticDisplays {
    displays: Vec<Display>,
}

impl StaticDisplays {
    /// Builds the list from `(x, y, width, height)` rectangles, indexing them in order.
    pub fn from_rects(rects: &[(i32, i32, u32, u32)]) -> Self {
        let displays = rects
            .iter()
            .enumerate()
            .map(|(index, &(x, y, width, height))| Display::new(index, x, y, width, height))
            .collect();
        Self { displays }
    }
}

impl DisplaySource for StaticDisplays {
    fn displays(&self) -> Result<Vec<Display>> {
        Ok(self.displays.clone())
    }
}

/// Reads the topology once and rejects an empty or degenerate result.
pub fn enumerate_displays(source: &dyn DisplaySource) -> Result<Vec<Display>> {
    let displays = source.displays()?;

    if displays.is_empty() {
        return Err(PlaywallError::Display(DisplayError::NoDisplays));
    }

    if let Some(bad) = displays.iter().find(|d| d.width == 0 || d.height == 0) {
        return Err(PlaywallError::Display(DisplayError::InvalidGeometry {
            index: bad.index,
            width: bad.width,
            height: bad.height,
        }));
    }

    log::info!(
        "Detected displays (screen, x, y, width, height): {:?}",
        displays.iter().map(|d| (d.index, d.x, d.y, d.width, d.height)).collect::<Vec<_>>()
    );
    Ok(displays)
}
