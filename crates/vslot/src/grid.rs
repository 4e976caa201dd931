//! Occupancy grids and the locations derived from them.
//!
//! A grid marks which 20 mm cells of a multi-rail cross-section are filled.
//! Index `(i, j)` runs along X and Y respectively.

use vslot_ir::{Align, Align2D};

use crate::CadError;

/// The four in-plane directions, in the order +X, +Y, -X, -Y.
///
/// Direction `n` corresponds to a rotation of `90° · n`.
pub const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// Boolean occupancy of a rectangular grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    nx: usize,
    ny: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Build from rows: `rows[i][j]` is cell `(i, j)`.
    ///
    /// All rows must have the same, non-zero length.
    pub fn from_rows(rows: &[Vec<bool>]) -> Result<Self, CadError> {
        let nx = rows.len();
        let ny = rows.first().map_or(0, Vec::len);
        if nx == 0 || ny == 0 {
            return Err(CadError::GridShape("grid is empty".to_string()));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ny) {
            return Err(CadError::GridShape(format!(
                "row {i} has {} cells, expected {ny}",
                row.len()
            )));
        }
        Ok(Self {
            nx,
            ny,
            cells: rows.concat(),
        })
    }

    /// Every cell occupied (a box profile).
    pub fn filled(nx: usize, ny: usize) -> Result<Self, CadError> {
        if nx == 0 || ny == 0 {
            return Err(CadError::GridShape(format!("{nx} x {ny} grid is empty")));
        }
        Ok(Self {
            nx,
            ny,
            cells: vec![true; nx * ny],
        })
    }

    /// A C-beam: filled, except the inner rows above the first column.
    pub fn c_beam(nx: usize, ny: usize) -> Result<Self, CadError> {
        let mut grid = Self::filled(nx, ny)?;
        for i in 1..nx.saturating_sub(1) {
            for j in 1..ny {
                grid.cells[i * ny + j] = false;
            }
        }
        Ok(grid)
    }

    /// `(nx, ny)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Whether `(i, j)` lies inside the grid.
    pub fn in_bounds(&self, i: isize, j: isize) -> bool {
        i >= 0 && j >= 0 && (i as usize) < self.nx && (j as usize) < self.ny
    }

    /// Occupancy of `(i, j)`; `false` outside the grid.
    pub fn get(&self, i: isize, j: isize) -> bool {
        self.in_bounds(i, j) && self.cells[i as usize * self.ny + j as usize]
    }

    /// Occupied cells in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.nx)
            .flat_map(move |i| (0..self.ny).map(move |j| (i, j)))
            .filter(move |&(i, j)| self.cells[i * self.ny + j])
    }

    /// Number of occupied cells.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

/// A 2D placement: position plus rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLocation {
    /// X position.
    pub x: f64,
    /// Y position.
    pub y: f64,
    /// Rotation about Z in degrees.
    pub angle: f64,
}

impl GridLocation {
    /// Location without rotation.
    pub fn at(x: f64, y: f64) -> Self {
        Self { x, y, angle: 0.0 }
    }
}

fn align_offsets(x_spacing: f64, y_spacing: f64, nx: usize, ny: usize, align: Align2D) -> [f64; 2] {
    let size = [
        x_spacing * (nx as f64 - 1.0),
        y_spacing * (ny as f64 - 1.0),
    ];
    let axes = align.axes();
    [0, 1].map(|k| match axes[k] {
        Align::Min => 0.0,
        Align::Center => -size[k] / 2.0,
        Align::Max => -size[k],
    })
}

/// A regular `nx × ny` grid of points; empty when either count is zero.
pub fn grid_locations(
    x_spacing: f64,
    y_spacing: f64,
    nx: usize,
    ny: usize,
    align: Align2D,
) -> Vec<GridLocation> {
    if nx == 0 || ny == 0 {
        return Vec::new();
    }
    let [ox, oy] = align_offsets(x_spacing, y_spacing, nx, ny, align);
    (0..nx)
        .flat_map(|i| (0..ny).map(move |j| (i, j)))
        .map(|(i, j)| GridLocation::at(i as f64 * x_spacing + ox, j as f64 * y_spacing + oy))
        .collect()
}

/// One point per occupied cell.
pub fn array_grid_locations(
    x_spacing: f64,
    y_spacing: f64,
    grid: &OccupancyGrid,
    align: Align2D,
) -> Vec<GridLocation> {
    let (nx, ny) = grid.shape();
    let [ox, oy] = align_offsets(x_spacing, y_spacing, nx, ny, align);
    grid.occupied()
        .map(|(i, j)| GridLocation::at(i as f64 * x_spacing + ox, j as f64 * y_spacing + oy))
        .collect()
}

/// Locations on the sides of occupied cells.
///
/// For every occupied cell of `a` and each of the four [`DIRECTIONS`], a
/// location is emitted when the neighbor's occupancy in `b` differs from
/// `invert`: with `invert == false` the sides facing occupied neighbors,
/// with `invert == true` the open sides. Each location is offset by
/// `radius` along its direction and, when `rotate`, turned by `90° · n`.
#[allow(clippy::too_many_arguments)]
pub fn array_polar_locations(
    x_spacing: f64,
    y_spacing: f64,
    a: &OccupancyGrid,
    b: Option<&OccupancyGrid>,
    invert: bool,
    radius: f64,
    rotate: bool,
    align: Align2D,
) -> Result<Vec<GridLocation>, CadError> {
    let b = b.unwrap_or(a);
    if a.shape() != b.shape() {
        return Err(CadError::GridShape(format!(
            "grids differ in shape: {:?} vs {:?}",
            a.shape(),
            b.shape()
        )));
    }
    let (nx, ny) = a.shape();
    let [ox, oy] = align_offsets(x_spacing, y_spacing, nx, ny, align);

    let mut locations = Vec::new();
    for (i, j) in a.occupied() {
        for (n, (di, dj)) in DIRECTIONS.into_iter().enumerate() {
            if b.get(i as isize + di, j as isize + dj) == invert {
                continue;
            }
            locations.push(GridLocation {
                x: i as f64 * x_spacing + ox + radius * di as f64,
                y: j as f64 * y_spacing + oy + radius * dj as f64,
                angle: if rotate { 90.0 * n as f64 } else { 0.0 },
            });
        }
    }
    Ok(locations)
}
