use crate::grid::CellState::{Alive, Dead};
use rand::Rng;

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum CellState {
    #[default]
    Dead,
    Alive,
}

impl CellState {
    pub fn is_alive(self) -> bool {
        self == Alive
    }

    pub fn toggled(self) -> Self {
        match self {
            Alive => Dead,
            Dead => Alive,
        }
    }

    /// The state this cell takes in the next generation.
    fn next(self, alive_neighbors: usize) -> Self {
        match (self, alive_neighbors) {
            (Alive, 2..=3) => Alive, // Survives
            (Dead, 3) => Alive,      // Becomes alive
            _ => Dead,               // Dies or remains dead
        }
    }
}

/// A row/column address. Signed, because neighbors of edge cells and clicks
/// outside the drawn area fall off the grid.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Position {
    pub row: isize,
    pub column: isize,
}

const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl Position {
    pub fn new(row: isize, column: isize) -> Self {
        Position { row, column }
    }

    /// The Moore neighborhood, in or out of bounds.
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        NEIGHBOR_OFFSETS.iter().map(move |(dr, dc)| {
            Position::new(self.row.saturating_add(*dr), self.column.saturating_add(*dc))
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Vec<CellState>>,
}

impl Grid {
    pub fn new(rows: usize, columns: usize) -> Self {
        Grid {
            rows,
            columns,
            cells: vec![vec![Dead; columns]; rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    fn index(&self, row: isize, column: isize) -> Option<(usize, usize)> {
        let row = usize::try_from(row).ok().filter(|r| *r < self.rows)?;
        let column = usize::try_from(column).ok().filter(|c| *c < self.columns)?;
        Some((row, column))
    }

    /// The cell at the given position, or `None` outside the grid.
    pub fn cell_at(&self, row: isize, column: isize) -> Option<CellState> {
        self.index(row, column).map(|(r, c)| self.cells[r][c])
    }

    pub fn is_alive(&self, row: isize, column: isize) -> bool {
        self.cell_at(row, column).is_some_and(CellState::is_alive)
    }

    /// Flip a cell. Coordinates outside the grid leave it untouched and are
    /// only reported in the log.
    pub fn toggle_cell(&mut self, row: isize, column: isize) {
        match self.index(row, column) {
            Some((r, c)) => self.cells[r][c] = self.cells[r][c].toggled(),
            None => log::warn!(
                "ignoring toggle at row {row}, column {column}: outside {}x{} grid",
                self.rows,
                self.columns
            ),
        }
    }

    /// Returns false if the position is off the grid.
    pub fn set_cell(&mut self, row: isize, column: isize, state: CellState) -> bool {
        match self.index(row, column) {
            Some((r, c)) => {
                self.cells[r][c] = state;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.cells = vec![vec![Dead; self.columns]; self.rows];
    }

    pub fn live_cells(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|cell| cell.is_alive()).count())
            .sum()
    }

    /// Replace every cell, each one alive with probability `density`.
    pub fn randomize_with<R: Rng>(&mut self, rng: &mut R, density: f64) {
        let density = density.clamp(0.0, 1.0);
        let mut next_grid = vec![vec![Dead; self.columns]; self.rows];
        for row in next_grid.iter_mut() {
            for cell in row.iter_mut() {
                *cell = if rng.random_bool(density) { Alive } else { Dead };
            }
        }
        self.cells = next_grid;
    }

    /// Advance the grid by one step (Game of Life logic).
    ///
    /// Every new state is computed from the current generation only; the new
    /// generation replaces it once complete. Returns whether anything changed.
    pub fn advance_generation(&mut self) -> bool {
        let mut next_grid = vec![vec![Dead; self.columns]; self.rows];

        for (row, next_row) in next_grid.iter_mut().enumerate() {
            for (col, next_cell) in next_row.iter_mut().enumerate() {
                let alive_neighbors = self.alive_neighbors(row as isize, col as isize);
                *next_cell = self.cells[row][col].next(alive_neighbors);
            }
        }

        if self.cells == next_grid {
            return false;
        }
        self.cells = next_grid;
        true
    }

    /// Count the alive neighbors of a cell. No wraparound.
    pub fn alive_neighbors(&self, row: isize, column: isize) -> usize {
        Position::new(row, column)
            .neighbors()
            .filter(|neighbor| self.is_alive(neighbor.row, neighbor.column))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log, Metadata, Record};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::sync::Once;

    thread_local! {
        static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
    }

    /// Keeps each test thread's log records apart from the others.
    struct ThreadLogger;

    impl Log for ThreadLogger {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            RECORDS.with(|records| records.borrow_mut().push((record.level(), record.args().to_string())));
        }

        fn flush(&self) {}
    }

    static LOGGER: ThreadLogger = ThreadLogger;
    static INIT_LOGGER: Once = Once::new();

    fn capture_logs<F: FnOnce()>(f: F) -> Vec<(Level, String)> {
        INIT_LOGGER.call_once(|| {
            let _ = log::set_logger(&LOGGER);
            log::set_max_level(log::LevelFilter::Trace);
        });
        RECORDS.with(|records| records.borrow_mut().clear());
        f();
        RECORDS.with(|records| records.borrow_mut().drain(..).collect())
    }

    fn grid_with(rows: usize, columns: usize, alive: &[(isize, isize)]) -> Grid {
        let mut grid = Grid::new(rows, columns);
        for &(r, c) in alive {
            assert!(grid.set_cell(r, c, Alive));
        }
        grid
    }

    fn alive_positions(grid: &Grid) -> Vec<(isize, isize)> {
        let mut alive = Vec::new();
        for r in 0..grid.rows() as isize {
            for c in 0..grid.columns() as isize {
                if grid.is_alive(r, c) {
                    alive.push((r, c));
                }
            }
        }
        alive
    }

    #[test]
    fn new_grid_is_all_dead() {
        let grid = Grid::new(4, 7);
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.columns(), 7);
        assert_eq!(grid.live_cells(), 0);
        assert_eq!(grid.cell_at(3, 6), Some(Dead));
    }

    #[test]
    fn all_dead_stays_dead() {
        let mut grid = Grid::new(6, 6);
        assert!(!grid.advance_generation());
        assert_eq!(grid.live_cells(), 0);
    }

    #[test]
    fn cell_at_out_of_range_is_none() {
        let grid = Grid::new(3, 3);
        assert_eq!(grid.cell_at(-1, 0), None);
        assert_eq!(grid.cell_at(0, -1), None);
        assert_eq!(grid.cell_at(3, 0), None);
        assert_eq!(grid.cell_at(0, 3), None);
        assert_eq!(grid.cell_at(isize::MIN, isize::MAX), None);
    }

    #[test]
    fn double_toggle_restores_state() {
        let mut grid = grid_with(3, 3, &[(1, 1)]);
        grid.toggle_cell(0, 2);
        assert_eq!(grid.cell_at(0, 2), Some(Alive));
        grid.toggle_cell(0, 2);
        assert_eq!(grid.cell_at(0, 2), Some(Dead));

        grid.toggle_cell(1, 1);
        grid.toggle_cell(1, 1);
        assert_eq!(grid.cell_at(1, 1), Some(Alive));
    }

    #[test]
    fn toggle_out_of_bounds_is_a_no_op() {
        let mut grid = grid_with(3, 3, &[(0, 0)]);
        let before = grid.clone();
        grid.toggle_cell(-1, 0);
        grid.toggle_cell(0, 3);
        grid.toggle_cell(3, 3);
        assert_eq!(grid, before);
    }

    #[test]
    fn toggle_out_of_bounds_logs_a_warning() {
        let mut grid = Grid::new(3, 3);
        let records = capture_logs(|| grid.toggle_cell(-1, 0));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, Level::Warn);
        assert!(records[0].1.contains("row -1, column 0"));

        let records = capture_logs(|| grid.toggle_cell(1, 1));
        assert!(records.is_empty());
    }

    #[test]
    fn survival_rule() {
        // Centre cell at (2, 2) with n neighbors drawn from its ring.
        let ring = [(1, 1), (1, 2), (1, 3), (2, 1), (2, 3), (3, 1), (3, 2), (3, 3)];
        for n in 0..=8 {
            let mut alive = vec![(2, 2)];
            alive.extend_from_slice(&ring[..n]);
            let mut grid = grid_with(5, 5, &alive);
            assert_eq!(grid.alive_neighbors(2, 2), n);
            grid.advance_generation();
            assert_eq!(grid.is_alive(2, 2), n == 2 || n == 3, "live cell with {n} neighbors");
        }
    }

    #[test]
    fn birth_rule() {
        let ring = [(1, 1), (1, 2), (1, 3), (2, 1), (2, 3), (3, 1), (3, 2), (3, 3)];
        for n in 0..=8 {
            let mut grid = grid_with(5, 5, &ring[..n]);
            grid.advance_generation();
            assert_eq!(grid.is_alive(2, 2), n == 3, "dead cell with {n} neighbors");
        }
    }

    #[test]
    fn neighbors_do_not_wrap() {
        // With wraparound the corner would see all three cells on the far edges.
        let grid = grid_with(4, 4, &[(3, 3), (0, 3), (3, 0)]);
        assert_eq!(grid.alive_neighbors(0, 0), 0);

        let grid = grid_with(3, 3, &[(0, 1), (1, 0), (1, 1)]);
        assert_eq!(grid.alive_neighbors(0, 0), 3);
        assert_eq!(Position::new(0, 0).neighbors().count(), 8);
    }

    #[test]
    fn corner_birth_uses_in_bounds_neighbors_only() {
        let mut grid = grid_with(3, 3, &[(0, 1), (1, 0), (1, 1)]);
        grid.advance_generation();
        // The three live cells plus the corner form a block.
        assert_eq!(alive_positions(&grid), vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn update_is_synchronous() {
        // Scanning row by row and writing in place lets the birth at (1, 2)
        // feed a second birth at (1, 3). From a snapshot it cannot.
        let seed = [(2, 1), (2, 2), (2, 3), (3, 3)];
        let mut grid = grid_with(6, 6, &seed);

        let mut sequential = grid_with(6, 6, &seed);
        for r in 0..6 {
            for c in 0..6 {
                let n = sequential.alive_neighbors(r, c);
                let next = sequential.cell_at(r, c).unwrap_or_default().next(n);
                sequential.set_cell(r, c, next);
            }
        }

        grid.advance_generation();
        assert_eq!(alive_positions(&grid), vec![(1, 2), (2, 2), (2, 3), (3, 3)]);
        assert!(sequential.is_alive(1, 3));
        assert!(!grid.is_alive(1, 3));
    }

    #[test]
    fn blinker_oscillates() {
        let horizontal = vec![(2, 1), (2, 2), (2, 3)];
        let vertical = vec![(1, 2), (2, 2), (3, 2)];
        let mut grid = grid_with(5, 5, &horizontal);

        assert!(grid.advance_generation());
        assert_eq!(alive_positions(&grid), vertical);

        assert!(grid.advance_generation());
        assert_eq!(alive_positions(&grid), horizontal);
    }

    #[test]
    fn block_is_still_life() {
        let block = vec![(1, 1), (1, 2), (2, 1), (2, 2)];
        let mut grid = grid_with(4, 4, &block);
        for _ in 0..10 {
            assert!(!grid.advance_generation());
            assert_eq!(alive_positions(&grid), block);
        }
    }

    #[test]
    fn lonely_cell_dies() {
        let mut grid = grid_with(5, 5, &[(2, 2)]);
        assert!(grid.advance_generation());
        assert_eq!(grid.live_cells(), 0);
    }

    #[test]
    fn randomize_respects_density_extremes() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut grid = Grid::new(8, 9);

        grid.randomize_with(&mut rng, 1.0);
        assert_eq!(grid.live_cells(), 72);

        grid.randomize_with(&mut rng, 0.0);
        assert_eq!(grid.live_cells(), 0);
    }

    #[test]
    fn clear_kills_everything() {
        let mut grid = grid_with(3, 3, &[(0, 0), (2, 2)]);
        grid.clear();
        assert_eq!(grid.live_cells(), 0);
        assert_eq!(grid.rows(), 3);
    }
}
