use life_engine::{Color, Rect, Surface};

use crate::gpu::Vertex;

const FONT_WIDTH: usize = 5;
const FONT_HEIGHT: usize = 7;
const LINE_WIDTH: f32 = 1.0;

/// Converts pixel rectangles into triangles in normalized device coordinates.
pub struct Canvas<'a> {
    vertices: &'a mut Vec<Vertex>,
    window_size: [f32; 2],
    srgb: bool,
}

impl<'a> Canvas<'a> {
    pub fn new(vertices: &'a mut Vec<Vertex>, window_size: [f32; 2], srgb: bool) -> Self {
        Canvas {
            vertices,
            window_size,
            srgb,
        }
    }

    pub fn vertex_color(&self, color: Color) -> [f32; 3] {
        shader_color(color, self.srgb)
    }

    pub fn push_rect(&mut self, rect: Rect, color: Color) {
        let color = self.vertex_color(color);
        let [width, height] = self.window_size;
        let x0 = to_ndc(rect.min[0], width);
        let y0 = to_ndc_y(rect.min[1], height);
        let x1 = to_ndc(rect.max[0], width);
        let y1 = to_ndc_y(rect.max[1], height);

        self.vertices.push(Vertex { position: [x0, y1], color });
        self.vertices.push(Vertex { position: [x1, y1], color });
        self.vertices.push(Vertex { position: [x0, y0], color });
        self.vertices.push(Vertex { position: [x0, y0], color });
        self.vertices.push(Vertex { position: [x1, y1], color });
        self.vertices.push(Vertex { position: [x1, y0], color });
    }

    /// Block-letter text. Characters without a glyph are skipped but still
    /// take up space.
    pub fn draw_text(&mut self, text: &str, origin: [f32; 2], scale: f32, color: Color) {
        let mut cursor_x = origin[0];
        for ch in text.to_uppercase().chars() {
            if let Some(rows) = glyph_bits(ch) {
                for (row, bits) in rows.iter().enumerate() {
                    for col in 0..FONT_WIDTH {
                        if (bits >> (FONT_WIDTH - 1 - col)) & 1 == 1 {
                            let rect = Rect {
                                min: [cursor_x + col as f32 * scale, origin[1] + row as f32 * scale],
                                max: [cursor_x + (col as f32 + 1.0) * scale, origin[1] + (row as f32 + 1.0) * scale],
                            };
                            self.push_rect(rect, color);
                        }
                    }
                }
            }
            cursor_x += (FONT_WIDTH as f32 + 1.0) * scale;
        }
    }

    /// A drawing surface for the region below `top` pixels, no larger than
    /// `extent`.
    pub fn region(&mut self, top: f32, extent: [f32; 2]) -> GridSurface<'_, 'a> {
        let width = self.window_size[0].min(extent[0]);
        let height = (self.window_size[1] - top).max(0.0).min(extent[1]);
        GridSurface {
            canvas: self,
            origin: [0.0, top],
            size: [width, height],
        }
    }
}

/// The part of the window the grid is painted into.
pub struct GridSurface<'c, 'a> {
    canvas: &'c mut Canvas<'a>,
    origin: [f32; 2],
    size: [f32; 2],
}

impl GridSurface<'_, '_> {
    fn to_window(&self, rect: Rect) -> Rect {
        Rect {
            min: [rect.min[0] + self.origin[0], rect.min[1] + self.origin[1]],
            max: [rect.max[0] + self.origin[0], rect.max[1] + self.origin[1]],
        }
    }
}

impl Surface for GridSurface<'_, '_> {
    fn width(&self) -> f32 {
        self.size[0]
    }

    fn height(&self) -> f32 {
        self.size[1]
    }

    fn clear(&mut self, color: Color) {
        let rect = Rect {
            min: [0.0, 0.0],
            max: self.size,
        };
        let rect = self.to_window(rect);
        self.canvas.push_rect(rect, color);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let rect = self.to_window(rect);
        self.canvas.push_rect(rect, color);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        let Rect { min, max } = self.to_window(rect);
        let edges = [
            Rect { min, max: [max[0], min[1] + LINE_WIDTH] },
            Rect { min: [min[0], max[1] - LINE_WIDTH], max },
            Rect { min, max: [min[0] + LINE_WIDTH, max[1]] },
            Rect { min: [max[0] - LINE_WIDTH, min[1]], max },
        ];
        for edge in edges {
            self.canvas.push_rect(edge, color);
        }
    }
}

/// Channel values as the shader should output them. sRGB targets expect
/// linear values and encode them on write.
pub fn shader_color(color: Color, srgb: bool) -> [f32; 3] {
    let channels = color.to_f32();
    if srgb {
        channels.map(srgb_to_linear)
    } else {
        channels
    }
}

fn srgb_to_linear(channel: f32) -> f32 {
    if channel <= 0.04045 {
        channel / 12.92
    } else {
        ((channel + 0.055) / 1.055).powf(2.4)
    }
}

pub fn to_ndc(x: f32, width: f32) -> f32 {
    (x / width) * 2.0 - 1.0
}

pub fn to_ndc_y(y: f32, height: f32) -> f32 {
    1.0 - (y / height) * 2.0
}

pub fn text_pixel_width(text: &str, scale: f32) -> f32 {
    let units = text.chars().count() as f32 * (FONT_WIDTH as f32 + 1.0);
    (units - 1.0).max(0.0) * scale
}

pub fn text_pixel_height(scale: f32) -> f32 {
    FONT_HEIGHT as f32 * scale
}

fn glyph_bits(ch: char) -> Option<[u8; FONT_HEIGHT]> {
    match ch {
        'A' => Some([0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
        'D' => Some([0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110]),
        'E' => Some([0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
        'F' => Some([0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
        'G' => Some([0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111]),
        'I' => Some([0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b11111]),
        'L' => Some([0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
        'M' => Some([0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
        'N' => Some([0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001]),
        'O' => Some([0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        'P' => Some([0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
        'R' => Some([0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
        'S' => Some([0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
        'U' => Some([0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        'Z' => Some([0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111]),
        '0' => Some([0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
        '1' => Some([0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
        '2' => Some([0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
        '3' => Some([0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110]),
        '4' => Some([0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
        '5' => Some([0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
        '6' => Some([0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
        '7' => Some([0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
        '8' => Some([0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
        '9' => Some([0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
        _ => None,
    }
}
