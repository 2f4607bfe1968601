use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::Context;

use crate::common::Position;
use crate::error::{Result, SearchError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Obstacle,
    Package(usize),
    Dropoff(usize),
}

impl Cell {
    pub fn is_passable(&self) -> bool {
        !matches!(self, Cell::Obstacle)
    }

    /// Parse a map token: `.`, `O` or `@`, `P<id>`, `D<id>`.
    pub fn parse(token: &str) -> Option<Cell> {
        match token {
            "." => Some(Cell::Empty),
            "O" | "@" => Some(Cell::Obstacle),
            _ => {
                let mut chars = token.chars();
                let kind = chars.next()?;
                let id = chars.as_str().parse::<usize>().ok()?;
                match kind {
                    'P' => Some(Cell::Package(id)),
                    'D' => Some(Cell::Dropoff(id)),
                    _ => None,
                }
            }
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => write!(f, "."),
            Cell::Obstacle => write!(f, "O"),
            Cell::Package(id) => write!(f, "P{id}"),
            Cell::Dropoff(id) => write!(f, "D{id}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tile {
    cell: Cell,
    pub neighbors: Vec<Position>, // Stores coordinates of accessible neighbors
}

impl Tile {
    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn is_passable(&self) -> bool {
        self.cell.is_passable()
    }
}

/// Warehouse floor: a fixed-size occupancy grid with paired package and
/// drop-off cells.
///
/// Construction validates the layout once; searches never re-check it.
#[derive(Debug, Clone)]
pub struct Grid {
    pub height: usize,
    pub width: usize,
    pub grid: Vec<Vec<Tile>>,
    packages: Vec<Position>,
    dropoffs: Vec<Position>,
}

impl Grid {
    /// Build a grid from coordinate lists. `packages[i]` is paired with
    /// `dropoffs[i]` and both are tagged with id `i + 1`.
    pub fn new(
        height: usize,
        width: usize,
        obstacles: &[Position],
        packages: &[Position],
        dropoffs: &[Position],
    ) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(SearchError::MalformedGrid(format!(
                "grid dimensions must be positive, got {height}x{width}"
            )));
        }
        if packages.len() != dropoffs.len() {
            return Err(SearchError::MalformedGrid(format!(
                "{} packages but {} drop-off points",
                packages.len(),
                dropoffs.len()
            )));
        }

        let mut cells = vec![vec![Cell::Empty; width]; height];
        let specials = packages
            .iter()
            .enumerate()
            .map(|(i, &p)| (p, Cell::Package(i + 1)))
            .chain(
                dropoffs
                    .iter()
                    .enumerate()
                    .map(|(i, &p)| (p, Cell::Dropoff(i + 1))),
            )
            .chain(obstacles.iter().map(|&p| (p, Cell::Obstacle)));

        for ((row, col), cell) in specials {
            if row >= height || col >= width {
                return Err(SearchError::MalformedGrid(format!(
                    "{cell} at ({row}, {col}) is outside the {height}x{width} grid"
                )));
            }
            if cells[row][col] != Cell::Empty {
                return Err(SearchError::MalformedGrid(format!(
                    "{cell} overlaps {} at ({row}, {col})",
                    cells[row][col]
                )));
            }
            cells[row][col] = cell;
        }

        Grid::from_cells(cells)
    }

    /// Build a grid from tagged cells, pairing package and drop-off cells by
    /// id. Ids need not be contiguous; pairs are ordered by id.
    pub fn from_cells(cells: Vec<Vec<Cell>>) -> Result<Self> {
        let height = cells.len();
        let width = cells.first().map_or(0, |row| row.len());
        if height == 0 || width == 0 {
            return Err(SearchError::MalformedGrid("grid is empty".to_string()));
        }

        let mut packages = BTreeMap::new();
        let mut dropoffs = BTreeMap::new();
        for (row, line) in cells.iter().enumerate() {
            if line.len() != width {
                return Err(SearchError::MalformedGrid(format!(
                    "row {row} has {} cells, expected {width}",
                    line.len()
                )));
            }
            for (col, cell) in line.iter().enumerate() {
                let (table, id) = match cell {
                    Cell::Package(id) => (&mut packages, *id),
                    Cell::Dropoff(id) => (&mut dropoffs, *id),
                    _ => continue,
                };
                if table.insert(id, (row, col)).is_some() {
                    return Err(SearchError::MalformedGrid(format!(
                        "{cell} appears more than once"
                    )));
                }
            }
        }

        if !packages.keys().eq(dropoffs.keys()) {
            return Err(SearchError::MalformedGrid(format!(
                "package ids {:?} do not match drop-off ids {:?}",
                packages.keys().collect::<Vec<_>>(),
                dropoffs.keys().collect::<Vec<_>>()
            )));
        }

        let grid = cells
            .into_iter()
            .map(|line| {
                line.into_iter()
                    .map(|cell| Tile {
                        cell,
                        neighbors: Vec::new(),
                    })
                    .collect()
            })
            .collect();

        let mut map = Grid {
            height,
            width,
            grid,
            packages: packages.into_values().collect(),
            dropoffs: dropoffs.into_values().collect(),
        };
        map.initialize_neighbors();

        Ok(map)
    }

    /// Parse the text map format:
    ///
    /// ```text
    /// height 3
    /// width 4
    /// map
    /// P1 . O D1
    /// .  . O .
    /// .  . . .
    /// ```
    pub fn from_text(text: &str) -> anyhow::Result<Self> {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());

        let mut header = |key: &str| -> anyhow::Result<usize> {
            let line = lines
                .next()
                .with_context(|| format!("missing `{key}` header"))?;
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(k), Some(value)) if k == key => value
                    .parse::<usize>()
                    .with_context(|| format!("invalid {key} value {value}")),
                _ => Err(anyhow::anyhow!("expected `{key} <n>`, got `{line}`")),
            }
        };
        let height = header("height")?;
        let width = header("width")?;

        match lines.next().map(str::trim) {
            Some("map") => {}
            other => anyhow::bail!("expected `map` line, got {other:?}"),
        }

        let mut cells = Vec::with_capacity(height);
        for (row, line) in lines.take(height).enumerate() {
            let tiles_row = line
                .split_whitespace()
                .map(|token| {
                    Cell::parse(token)
                        .with_context(|| format!("unknown cell `{token}` in row {row}"))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            if tiles_row.len() != width {
                anyhow::bail!("row {row} has {} cells, expected {width}", tiles_row.len());
            }
            cells.push(tiles_row);
        }
        if cells.len() != height {
            anyhow::bail!("expected {height} rows, found {}", cells.len());
        }

        Ok(Grid::from_cells(cells)?)
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| format!("cannot open map {path}"))?;
        let mut text = String::new();
        for line in BufReader::new(file).lines() {
            text.push_str(&line?);
            text.push('\n');
        }
        Grid::from_text(&text).with_context(|| format!("error with map file: {path}"))
    }

    fn initialize_neighbors(&mut self) {
        for x in 0..self.height {
            for y in 0..self.width {
                if self.grid[x][y].is_passable() {
                    self.grid[x][y].neighbors = self.get_neighbors(x, y);
                }
            }
        }
    }

    pub fn get_neighbors(&self, x: usize, y: usize) -> Vec<Position> {
        let directions = [(-1, 0), (1, 0), (0, -1), (0, 1)]; // Up, down, left, right
        let mut neighbors = Vec::new();

        for &(dx, dy) in &directions {
            let new_x = x as isize + dx;
            let new_y = y as isize + dy;
            if new_x >= 0
                && new_y >= 0
                && new_x < self.height as isize
                && new_y < self.width as isize
                && self.grid[new_x as usize][new_y as usize].is_passable()
            {
                neighbors.push((new_x as usize, new_y as usize));
            }
        }

        neighbors
    }

    pub fn contains(&self, (x, y): Position) -> bool {
        x < self.height && y < self.width
    }

    pub fn cell(&self, (x, y): Position) -> Option<Cell> {
        self.grid.get(x).and_then(|row| row.get(y)).map(Tile::cell)
    }

    pub fn is_passable(&self, x: usize, y: usize) -> bool {
        self.grid[x][y].is_passable()
    }

    pub fn neighbors(&self, (x, y): Position) -> &[Position] {
        &self.grid[x][y].neighbors
    }

    pub fn packages(&self) -> &[Position] {
        &self.packages
    }

    pub fn dropoffs(&self) -> &[Position] {
        &self.dropoffs
    }

    /// Package and drop-off cells, pair by pair, in id order.
    pub fn deliveries(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.packages
            .iter()
            .copied()
            .zip(self.dropoffs.iter().copied())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.grid {
            let line: Vec<String> = row.iter().map(|tile| tile.cell.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
