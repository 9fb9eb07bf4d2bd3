use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Point;
use crate::foundation::error::{StickcastError, StickcastResult};

/// Where and how the mouth sits on one body bitmap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouthPlacement {
    /// Mouth center in body pixel space.
    pub anchor: Point,
    /// Horizontal scale; negative mirrors the mouth.
    pub scale_x: f64,
    /// Vertical scale.
    pub scale_y: f64,
    /// Clockwise rotation in degrees.
    pub rotation_deg: f64,
}

impl MouthPlacement {
    /// Placement that pastes the mouth unchanged at `anchor`.
    pub fn at(anchor: Point) -> Self {
        Self {
            anchor,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation_deg: 0.0,
        }
    }
}

/// Mouth placement table indexed by body bitmap.
#[derive(Clone, Debug, PartialEq)]
pub struct MouthGeometry {
    rows: Vec<MouthPlacement>,
}

impl MouthGeometry {
    /// Build a table from rows already in body pixel space.
    pub fn from_rows(rows: Vec<MouthPlacement>) -> Self {
        Self { rows }
    }

    /// Parse the CSV table: `anchor_x,anchor_y,scale_x,scale_y,rotation_deg` per line.
    ///
    /// Blank lines are skipped. At least `required_rows` rows must be present and every row needs
    /// five numeric cells. Anchors are multiplied by `anchor_scale`.
    pub fn parse_csv(text: &str, required_rows: usize, anchor_scale: f64) -> StickcastResult<Self> {
        let mut rows = Vec::with_capacity(required_rows);
        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let cells: Vec<&str> = line.split(',').map(str::trim).collect();
            if cells.len() < 5 {
                return Err(StickcastError::config(format!(
                    "geometry line {}: expected 5 columns, got {}",
                    line_no + 1,
                    cells.len()
                )));
            }
            let mut v = [0.0f64; 5];
            for (slot, cell) in v.iter_mut().zip(&cells) {
                *slot = cell.parse().map_err(|e| {
                    StickcastError::config(format!(
                        "geometry line {}: bad number '{cell}': {e}",
                        line_no + 1
                    ))
                })?;
            }
            rows.push(MouthPlacement {
                anchor: Point::new(v[0] * anchor_scale, v[1] * anchor_scale),
                scale_x: v[2],
                scale_y: v[3],
                rotation_deg: v[4],
            });
        }
        if rows.len() < required_rows {
            return Err(StickcastError::config(format!(
                "geometry has {} rows, need one per body bitmap ({required_rows})",
                rows.len()
            )));
        }
        Ok(Self { rows })
    }

    /// Load and parse a geometry CSV file.
    pub fn from_path(
        path: &Path,
        required_rows: usize,
        anchor_scale: f64,
    ) -> StickcastResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read geometry '{}'", path.display()))?;
        Self::parse_csv(&text, required_rows, anchor_scale)
    }

    /// Placement for body bitmap `index`.
    pub fn row(&self, index: u32) -> StickcastResult<&MouthPlacement> {
        self.rows.get(index as usize).ok_or_else(|| {
            StickcastError::evaluation(format!(
                "no mouth geometry for body {index} ({} rows)",
                self.rows.len()
            ))
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Return `true` when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/geometry.rs"]
mod tests;
