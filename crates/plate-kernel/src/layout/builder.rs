use keyplate_types::{KeyModifier, LayoutEntry, LayoutRow};
use tracing::{debug, info, instrument};

use super::{Cell, LayoutError, LayoutGrid, Support};
use crate::config::Parameters;
use crate::geometry::Point2d;

/// Cursor state carried across a layout description.
///
/// `x`, `w`, `h` reset at every row; `y` and the rotation group persist.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    rotation: f64,
    rx: f64,
    ry: f64,
    decal: bool,
}

impl Cursor {
    fn new() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            w: 1.0,
            h: 1.0,
            rotation: 0.0,
            rx: 0.0,
            ry: 0.0,
            decal: false,
        }
    }

    fn start_row(&mut self) {
        self.x = 0.0;
        self.w = 1.0;
        self.h = 1.0;
    }

    fn apply(&mut self, m: &KeyModifier) {
        if let Some(r) = m.r {
            self.rotation = r;
            self.x = 0.0;
            self.y = 0.0;
        }
        if let Some(rx) = m.rx {
            self.rx = rx;
        }
        if let Some(ry) = m.ry {
            self.ry = ry;
        }
        if let Some(x) = m.x {
            self.x += x;
        }
        if let Some(y) = m.y {
            self.y += y;
        }
        if let Some(w) = m.w {
            self.w = w;
        }
        if let Some(h) = m.h {
            self.h = h;
        }
        if let Some(d) = m.d {
            self.decal = d;
        }
    }

    fn cell(&self, label: &str, params: &Parameters) -> Result<Cell, LayoutError> {
        let cell = Cell::new(self.x, -self.y, self.w, self.h)?
            .with_label(label)
            .with_kerf(params.kerf);
        if self.rotation == 0.0 {
            Ok(cell)
        } else {
            cell.rotated(self.rotation, Point2d::new(self.rx, -self.ry))
        }
    }

    fn advance(&mut self) {
        self.x += self.w;
        self.w = 1.0;
        self.h = 1.0;
        self.decal = false;
    }
}

/// Key label shown on a keycap: the last line of a multi-legend string.
fn key_label(legend: &str) -> &str {
    legend.rsplit('\n').next().unwrap_or(legend)
}

/// Build a grid from layout rows.
///
/// Each key becomes a cell at `(x, -y)` in layout units with its support-bar
/// companion. Rows run downward, so row `n` sits at `y = -n` unless a `y`
/// modifier moves it. Decal keys advance the cursor but produce no cell.
#[instrument(skip_all, fields(rows = rows.len()))]
pub fn build_grid(rows: &[LayoutRow], params: &Parameters) -> Result<LayoutGrid, LayoutError> {
    let mut grid = LayoutGrid::new();
    let mut cursor = Cursor::new();
    let mut decals = 0usize;

    for row in rows {
        cursor.start_row();
        for entry in row {
            match entry {
                LayoutEntry::Modifier(m) => cursor.apply(m),
                LayoutEntry::Key(legend) => {
                    if cursor.decal {
                        decals += 1;
                    } else {
                        let cell = cursor.cell(key_label(legend), params)?;
                        debug!(cell = %cell, "key");
                        let support = Support::for_cell(&cell, params);
                        grid.add_cell_with_support(cell, support);
                    }
                    cursor.advance();
                }
            }
        }
        cursor.y += 1.0;
    }

    info!(cells = grid.len(), decals, "layout built");
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parse(json: &str) -> Vec<LayoutRow> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_two_rows() {
        let rows = parse(r#"[["Q", "W"], [{"w": 1.5}, "Tab", "A"]]"#);
        let grid = build_grid(&rows, &Parameters::default()).unwrap();
        assert_eq!(grid.len(), 4);

        let tab = grid.cell_at(0.0, -1.0, 0.0, (0.0, 0.0)).unwrap();
        assert_relative_eq!(grid.get(tab).unwrap().w(), 1.5);
        let a = grid.cell_at(1.5, -1.0, 0.0, (0.0, 0.0)).unwrap();
        assert_relative_eq!(grid.get(a).unwrap().w(), 1.0);
        assert_eq!(grid.get(a).unwrap().label(), "A");
        assert!(grid.support(a).is_some());
    }

    #[test]
    fn test_offsets_accumulate() {
        let rows = parse(r#"[["Esc", {"x": 1}, "F1"], [{"y": 0.5}, "`"]]"#);
        let grid = build_grid(&rows, &Parameters::default()).unwrap();
        assert!(grid.cell_at(2.0, 0.0, 0.0, (0.0, 0.0)).is_some());
        assert!(grid.cell_at(0.0, -1.5, 0.0, (0.0, 0.0)).is_some());
    }

    #[test]
    fn test_multiline_legend_keeps_last_line() {
        let rows = parse(r#"[["!\n1"]]"#);
        let grid = build_grid(&rows, &Parameters::default()).unwrap();
        let (_, cell) = grid.iter().next().unwrap();
        assert_eq!(cell.label(), "1");
    }

    #[test]
    fn test_rotation_group() {
        let rows = parse(r#"[[{"r": 15, "rx": 4, "ry": 2}, "R"]]"#);
        let grid = build_grid(&rows, &Parameters::default()).unwrap();
        let (_, cell) = grid.iter().next().unwrap();
        assert!(cell.is_rotated());
        assert_relative_eq!(cell.rotation(), 15.0);
        assert_relative_eq!(cell.pivot().x, 4.0);
        assert_relative_eq!(cell.pivot().y, -2.0);
        assert_relative_eq!(cell.x(), 0.0);
    }

    #[test]
    fn test_decal_advances_without_cell() {
        let rows = parse(r#"[[{"d": true}, "logo", "K"]]"#);
        let grid = build_grid(&rows, &Parameters::default()).unwrap();
        assert_eq!(grid.len(), 1);
        assert!(grid.cell_at(1.0, 0.0, 0.0, (0.0, 0.0)).is_some());
    }

    #[test]
    fn test_kerf_from_parameters() {
        let params = Parameters { kerf: 0.15, ..Parameters::default() };
        let grid = build_grid(&parse(r#"[["K"]]"#), &params).unwrap();
        let (_, cell) = grid.iter().next().unwrap();
        assert_relative_eq!(cell.kerf(), 0.15);
    }

    #[test]
    fn test_bad_size_is_an_error() {
        let rows = parse(r#"[[{"w": 0}, "K"]]"#);
        assert!(matches!(
            build_grid(&rows, &Parameters::default()),
            Err(LayoutError::InvalidCellSize { .. })
        ));
    }
}
