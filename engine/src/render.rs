use crate::grid::{Grid, Position};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const GREY: Color = Color::rgb(0xD3, 0xD3, 0xD3);
    pub const RED: Color = Color::rgb(0xFF, 0x00, 0x00);
    pub const GREEN: Color = Color::rgb(0x00, 0xFF, 0x00);
    pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Channels scaled to `0.0..=1.0`.
    pub fn to_f32(self) -> [f32; 3] {
        [self.r as f32 / 255.0, self.g as f32 / 255.0, self.b as f32 / 255.0]
    }
}

/// Axis-aligned rectangle in surface pixels, `min` being the top-left corner.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Rect {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl Rect {
    pub fn from_min_size(min: [f32; 2], size: f32) -> Self {
        Rect {
            min,
            max: [min[0] + size, min[1] + size],
        }
    }

    pub fn contains(&self, point: [f32; 2]) -> bool {
        point[0] >= self.min[0] && point[0] <= self.max[0] && point[1] >= self.min[1] && point[1] <= self.max[1]
    }

    pub fn width(&self) -> f32 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f32 {
        self.max[1] - self.min[1]
    }
}

/// Something rectangles can be painted onto. Coordinates are surface-local
/// pixels with the origin at the top-left.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color);
}

/// Number of whole cells that fit on a surface, as (rows, columns).
/// Partially visible edge cells are not counted.
pub fn visible_cells(surface_width: f32, surface_height: f32, cell_size: f32) -> (usize, usize) {
    let rows = (surface_height / cell_size).floor().max(0.0) as usize;
    let columns = (surface_width / cell_size).floor().max(0.0) as usize;
    (rows, columns)
}

/// Surface size, as [width, height], that shows every cell of `grid`. Half a
/// cell of slack keeps float rounding from flooring away the last row or
/// column in [`visible_cells`].
pub fn grid_extent(grid: &Grid, cell_size: f32) -> [f32; 2] {
    let slack = cell_size / 2.0;
    [
        grid.columns() as f32 * cell_size + slack,
        grid.rows() as f32 * cell_size + slack,
    ]
}

/// Map a surface pixel to the cell under it. Pixels left of or above the
/// origin map to negative positions.
pub fn position_at(point: [f32; 2], cell_size: f32) -> Position {
    Position::new(
        (point[1] / cell_size).floor() as isize,
        (point[0] / cell_size).floor() as isize,
    )
}

/// Paints a grid onto a surface it owns. Never touches the grid itself.
pub struct Renderer<S> {
    surface: S,
    background: Color,
    grid_line: Color,
}

impl<S: Surface> Renderer<S> {
    pub fn new(surface: S) -> Self {
        Renderer {
            surface,
            background: Color::WHITE,
            grid_line: Color::GREY,
        }
    }

    pub fn with_colors(mut self, background: Color, grid_line: Color) -> Self {
        self.background = background;
        self.grid_line = grid_line;
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Draw every whole cell that fits on the surface. Live cells are filled
    /// with `cell_color` and every cell gets an outline. `cell_size` must be
    /// positive.
    pub fn render(&mut self, grid: &Grid, cell_size: f32, cell_color: Color) {
        debug_assert!(cell_size > 0.0, "cell size must be positive");
        self.surface.clear(self.background);

        let (rows, columns) = visible_cells(self.surface.width(), self.surface.height(), cell_size);
        for row in 0..rows {
            let y = row as f32 * cell_size;
            for column in 0..columns {
                let x = column as f32 * cell_size;
                let rect = Rect::from_min_size([x, y], cell_size);
                if grid.is_alive(row as isize, column as isize) {
                    self.surface.fill_rect(rect, cell_color);
                }
                self.surface.stroke_rect(rect, self.grid_line);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::grid::CellState;

    #[derive(Debug, PartialEq, Clone, Copy)]
    pub(crate) enum Command {
        Clear(Color),
        Fill(Rect, Color),
        Stroke(Rect, Color),
    }

    pub(crate) struct RecordingSurface {
        pub width: f32,
        pub height: f32,
        pub commands: Vec<Command>,
    }

    impl RecordingSurface {
        pub(crate) fn new(width: f32, height: f32) -> Self {
            RecordingSurface {
                width,
                height,
                commands: Vec::new(),
            }
        }

        pub(crate) fn fills(&self) -> Vec<Rect> {
            self.commands
                .iter()
                .filter_map(|command| match command {
                    Command::Fill(rect, _) => Some(*rect),
                    _ => None,
                })
                .collect()
        }

        pub(crate) fn strokes(&self) -> usize {
            self.commands
                .iter()
                .filter(|command| matches!(command, Command::Stroke(..)))
                .count()
        }
    }

    impl Surface for RecordingSurface {
        fn width(&self) -> f32 {
            self.width
        }

        fn height(&self) -> f32 {
            self.height
        }

        fn clear(&mut self, color: Color) {
            self.commands.clear();
            self.commands.push(Command::Clear(color));
        }

        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.commands.push(Command::Fill(rect, color));
        }

        fn stroke_rect(&mut self, rect: Rect, color: Color) {
            self.commands.push(Command::Stroke(rect, color));
        }
    }

    #[test]
    fn visible_cells_floors() {
        assert_eq!(visible_cells(100.0, 50.0, 10.0), (5, 10));
        assert_eq!(visible_cells(105.0, 59.9, 10.0), (5, 10));
        assert_eq!(visible_cells(9.0, 9.0, 10.0), (0, 0));
    }

    #[test]
    fn grid_extent_keeps_last_row_and_column_at_any_zoom() {
        let grid = Grid::new(112, 200);
        let mut cell_size = 2.0f32;
        while cell_size <= 64.0 {
            let [width, height] = grid_extent(&grid, cell_size);
            assert_eq!(visible_cells(width, height, cell_size), (112, 200), "cell size {cell_size}");
            cell_size += 0.01;
        }
    }

    #[test]
    fn position_at_floors_and_goes_negative() {
        assert_eq!(position_at([0.0, 0.0], 8.0), Position::new(0, 0));
        assert_eq!(position_at([15.9, 8.0], 8.0), Position::new(1, 1));
        assert_eq!(position_at([-0.5, 3.0], 8.0), Position::new(0, -1));
    }

    #[test]
    fn clears_first_then_outlines_every_visible_cell() {
        let grid = Grid::new(3, 4);
        let mut renderer = Renderer::new(RecordingSurface::new(40.0, 30.0));
        renderer.render(&grid, 10.0, Color::RED);

        let surface = renderer.surface();
        assert_eq!(surface.commands[0], Command::Clear(Color::WHITE));
        assert_eq!(surface.strokes(), 12);
        assert!(surface.fills().is_empty());
        assert!(surface.commands[1..]
            .iter()
            .all(|command| matches!(command, Command::Stroke(_, Color::GREY))));
    }

    #[test]
    fn fills_live_cells_at_their_pixel_origin() {
        let mut grid = Grid::new(3, 4);
        grid.set_cell(1, 2, CellState::Alive);
        grid.set_cell(2, 0, CellState::Alive);

        let mut renderer = Renderer::new(RecordingSurface::new(40.0, 30.0));
        renderer.render(&grid, 10.0, Color::BLUE);

        let fills = renderer.surface().fills();
        assert_eq!(
            fills,
            vec![
                Rect::from_min_size([20.0, 10.0], 10.0),
                Rect::from_min_size([0.0, 20.0], 10.0),
            ]
        );
        assert!(renderer
            .surface()
            .commands
            .contains(&Command::Fill(fills[0], Color::BLUE)));
    }

    #[test]
    fn partial_edge_cells_are_skipped() {
        let mut grid = Grid::new(3, 3);
        grid.set_cell(2, 2, CellState::Alive);

        // Room for two and a half cells in each direction.
        let mut renderer = Renderer::new(RecordingSurface::new(25.0, 25.0));
        renderer.render(&grid, 10.0, Color::RED);

        assert_eq!(renderer.surface().strokes(), 4);
        assert!(renderer.surface().fills().is_empty());
    }

    #[test]
    fn surface_larger_than_grid_outlines_absent_cells() {
        let mut grid = Grid::new(1, 1);
        grid.set_cell(0, 0, CellState::Alive);

        let mut renderer = Renderer::new(RecordingSurface::new(30.0, 20.0));
        renderer.render(&grid, 10.0, Color::RED);

        assert_eq!(renderer.surface().strokes(), 6);
        assert_eq!(renderer.surface().fills().len(), 1);
    }

    #[test]
    fn render_leaves_grid_untouched() {
        let mut grid = Grid::new(4, 4);
        grid.set_cell(1, 1, CellState::Alive);
        let before = grid.clone();

        let mut renderer = Renderer::new(RecordingSurface::new(40.0, 40.0)).with_colors(Color::BLACK, Color::GREEN);
        renderer.render(&grid, 10.0, Color::RED);

        assert_eq!(grid, before);
        assert_eq!(renderer.surface().commands[0], Command::Clear(Color::BLACK));
    }
}
