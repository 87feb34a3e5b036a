/**
* A live cell dies if it has fewer than two live neighbors.
* A live cell with two or three live neighbors lives on to the next generation.
* A live cell with more than three live neighbors dies.
* A dead cell will be brought back to live if it has exactly three live neighbors.
*
* The grid has hard edges: anything outside it counts as dead.
*/

pub mod config;
pub mod grid;
pub mod render;
pub mod session;
pub mod ticker;

pub use config::{Config, ConfigError};
pub use grid::{CellState, Grid, Position};
pub use render::{grid_extent, visible_cells, Color, Rect, Renderer, Surface};
pub use session::Simulation;
pub use ticker::{Speed, Ticker};
