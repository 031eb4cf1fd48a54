//! Raw immediate-mode drawing surface wrapped by the draw scope.

use crate::animation::LengthPair;
use gpui::{Bounds, Hsla, Pixels, Point, px};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaintStyle {
    Fill,
    Stroke(Pixels),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub color: Hsla,
    pub style: PaintStyle,
}

impl Paint {
    pub fn fill(color: Hsla) -> Self {
        Self {
            color,
            style: PaintStyle::Fill,
        }
    }

    pub fn stroke(color: Hsla, width: Pixels) -> Self {
        Self {
            color,
            style: PaintStyle::Stroke(width),
        }
    }

    /// Zero for fills.
    pub fn stroke_width(&self) -> Pixels {
        match self.style {
            PaintStyle::Fill => px(0.0),
            PaintStyle::Stroke(width) => width,
        }
    }

    pub fn with_color(self, color: Hsla) -> Self {
        Self { color, ..self }
    }
}

impl From<Hsla> for Paint {
    fn from(color: Hsla) -> Self {
        Paint::fill(color)
    }
}

/// Backend the draw scope issues real draw calls to during the layout pass.
pub trait Canvas {
    fn draw_rect(&mut self, bounds: Bounds<Pixels>, paint: &Paint);

    fn draw_round_rect(&mut self, bounds: Bounds<Pixels>, corner_radius: LengthPair, paint: &Paint);

    fn draw_circle(&mut self, center: Point<Pixels>, radius: Pixels, paint: &Paint);

    fn draw_oval(&mut self, bounds: Bounds<Pixels>, paint: &Paint);

    /// Angles in degrees, clockwise from 3 o'clock. A fill draws the sector through the center.
    fn draw_arc(&mut self, bounds: Bounds<Pixels>, start_angle: f32, sweep_angle: f32, paint: &Paint);

    fn draw_line(&mut self, start: Point<Pixels>, end: Point<Pixels>, stroke_width: Pixels, color: Hsla);

    fn draw_points(&mut self, points: &[Point<Pixels>], stroke_width: Pixels, color: Hsla);

    fn draw_path(&mut self, points: &[Point<Pixels>], closed: bool, paint: &Paint);

    fn draw_text(&mut self, text: &str, origin: Point<Pixels>, font_size: Pixels, color: Hsla);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Rect {
        bounds: Bounds<Pixels>,
        paint: Paint,
    },
    RoundRect {
        bounds: Bounds<Pixels>,
        corner_radius: LengthPair,
        paint: Paint,
    },
    Circle {
        center: Point<Pixels>,
        radius: Pixels,
        paint: Paint,
    },
    Oval {
        bounds: Bounds<Pixels>,
        paint: Paint,
    },
    Arc {
        bounds: Bounds<Pixels>,
        start_angle: f32,
        sweep_angle: f32,
        paint: Paint,
    },
    Line {
        start: Point<Pixels>,
        end: Point<Pixels>,
        stroke_width: Pixels,
        color: Hsla,
    },
    Points {
        points: Vec<Point<Pixels>>,
        stroke_width: Pixels,
        color: Hsla,
    },
    Path {
        points: Vec<Point<Pixels>>,
        closed: bool,
        paint: Paint,
    },
    Text {
        text: String,
        origin: Point<Pixels>,
        font_size: Pixels,
        color: Hsla,
    },
}

impl DrawCommand {
    /// Color the command paints with.
    pub fn color(&self) -> Hsla {
        match self {
            DrawCommand::Rect { paint, .. }
            | DrawCommand::RoundRect { paint, .. }
            | DrawCommand::Circle { paint, .. }
            | DrawCommand::Oval { paint, .. }
            | DrawCommand::Arc { paint, .. }
            | DrawCommand::Path { paint, .. } => paint.color,
            DrawCommand::Line { color, .. }
            | DrawCommand::Points { color, .. }
            | DrawCommand::Text { color, .. } => *color,
        }
    }
}

/// Canvas that records draw calls instead of rasterizing them. Used headless and in tests.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn draw_rect(&mut self, bounds: Bounds<Pixels>, paint: &Paint) {
        self.commands.push(DrawCommand::Rect {
            bounds,
            paint: *paint,
        });
    }

    fn draw_round_rect(&mut self, bounds: Bounds<Pixels>, corner_radius: LengthPair, paint: &Paint) {
        self.commands.push(DrawCommand::RoundRect {
            bounds,
            corner_radius,
            paint: *paint,
        });
    }

    fn draw_circle(&mut self, center: Point<Pixels>, radius: Pixels, paint: &Paint) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            paint: *paint,
        });
    }

    fn draw_oval(&mut self, bounds: Bounds<Pixels>, paint: &Paint) {
        self.commands.push(DrawCommand::Oval {
            bounds,
            paint: *paint,
        });
    }

    fn draw_arc(&mut self, bounds: Bounds<Pixels>, start_angle: f32, sweep_angle: f32, paint: &Paint) {
        self.commands.push(DrawCommand::Arc {
            bounds,
            start_angle,
            sweep_angle,
            paint: *paint,
        });
    }

    fn draw_line(&mut self, start: Point<Pixels>, end: Point<Pixels>, stroke_width: Pixels, color: Hsla) {
        self.commands.push(DrawCommand::Line {
            start,
            end,
            stroke_width,
            color,
        });
    }

    fn draw_points(&mut self, points: &[Point<Pixels>], stroke_width: Pixels, color: Hsla) {
        self.commands.push(DrawCommand::Points {
            points: points.to_vec(),
            stroke_width,
            color,
        });
    }

    fn draw_path(&mut self, points: &[Point<Pixels>], closed: bool, paint: &Paint) {
        self.commands.push(DrawCommand::Path {
            points: points.to_vec(),
            closed,
            paint: *paint,
        });
    }

    fn draw_text(&mut self, text: &str, origin: Point<Pixels>, font_size: Pixels, color: Hsla) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin,
            font_size,
            color,
        });
    }
}
