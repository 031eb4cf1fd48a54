//! Canvas backed by a GPUI window, used from a `canvas()` paint callback.

use crate::animation::LengthPair;
use crate::canvas::{Canvas, Paint, PaintStyle};
use crate::utils::PixelsExt;
use gpui::*;
use tracing::warn;

/// Segments used to approximate a full ellipse.
const CURVE_SEGMENTS: usize = 64;

pub struct WindowCanvas<'a> {
    window: &'a mut Window,
    cx: &'a mut App,
}

impl<'a> WindowCanvas<'a> {
    pub fn new(window: &'a mut Window, cx: &'a mut App) -> Self {
        Self { window, cx }
    }

    fn paint_polyline(&mut self, points: &[Point<Pixels>], closed: bool, paint: &Paint) {
        if points.len() < 2 {
            return;
        }
        let mut builder = match paint.style {
            PaintStyle::Fill => PathBuilder::fill(),
            PaintStyle::Stroke(width) => PathBuilder::stroke(width),
        };
        builder.move_to(points[0]);
        for point in &points[1..] {
            builder.line_to(*point);
        }
        if closed {
            builder.line_to(points[0]);
        }
        match builder.build() {
            Ok(path) => self.window.paint_path(path, paint.color),
            Err(err) => warn!(?err, "failed to build canvas path"),
        }
    }
}

/// Points along an elliptical arc inscribed in `bounds`.
pub fn arc_points(
    bounds: Bounds<Pixels>,
    start_angle: f32,
    sweep_angle: f32,
) -> Vec<Point<Pixels>> {
    let rx = bounds.size.width.as_f32() / 2.0;
    let ry = bounds.size.height.as_f32() / 2.0;
    let cx = bounds.origin.x.as_f32() + rx;
    let cy = bounds.origin.y.as_f32() + ry;

    let steps = ((sweep_angle.abs() / 360.0) * CURVE_SEGMENTS as f32).ceil().max(1.0) as usize;
    (0..=steps)
        .map(|i| {
            let angle = (start_angle + sweep_angle * i as f32 / steps as f32).to_radians();
            Point::new(px(cx + rx * angle.cos()), px(cy + ry * angle.sin()))
        })
        .collect()
}

fn round_rect_points(bounds: Bounds<Pixels>, corner_radius: LengthPair) -> Vec<Point<Pixels>> {
    let w = bounds.size.width.as_f32();
    let h = bounds.size.height.as_f32();
    let rx = corner_radius.x.as_f32().clamp(0.0, w / 2.0);
    let ry = corner_radius.y.as_f32().clamp(0.0, h / 2.0);
    let (x0, y0) = (bounds.origin.x.as_f32(), bounds.origin.y.as_f32());

    let corner = |cx: f32, cy: f32, start: f32| {
        arc_points(
            Bounds::new(
                Point::new(px(cx - rx), px(cy - ry)),
                Size::new(px(rx * 2.0), px(ry * 2.0)),
            ),
            start,
            90.0,
        )
    };

    let mut points = Vec::new();
    points.extend(corner(x0 + w - rx, y0 + ry, 270.0));
    points.extend(corner(x0 + w - rx, y0 + h - ry, 0.0));
    points.extend(corner(x0 + rx, y0 + h - ry, 90.0));
    points.extend(corner(x0 + rx, y0 + ry, 180.0));
    points
}

impl Canvas for WindowCanvas<'_> {
    fn draw_rect(&mut self, bounds: Bounds<Pixels>, paint: &Paint) {
        match paint.style {
            PaintStyle::Fill => self.window.paint_quad(fill(bounds, paint.color)),
            PaintStyle::Stroke(_) => {
                let points = [
                    bounds.origin,
                    Point::new(bounds.origin.x + bounds.size.width, bounds.origin.y),
                    Point::new(
                        bounds.origin.x + bounds.size.width,
                        bounds.origin.y + bounds.size.height,
                    ),
                    Point::new(bounds.origin.x, bounds.origin.y + bounds.size.height),
                ];
                self.paint_polyline(&points, true, paint);
            }
        }
    }

    fn draw_round_rect(&mut self, bounds: Bounds<Pixels>, corner_radius: LengthPair, paint: &Paint) {
        if paint.style == PaintStyle::Fill && corner_radius.x == corner_radius.y {
            self.window
                .paint_quad(fill(bounds, paint.color).corner_radii(Corners::all(corner_radius.x)));
            return;
        }
        let points = round_rect_points(bounds, corner_radius);
        self.paint_polyline(&points, true, paint);
    }

    fn draw_circle(&mut self, center: Point<Pixels>, radius: Pixels, paint: &Paint) {
        let bounds = Bounds::new(
            Point::new(center.x - radius, center.y - radius),
            Size::new(radius * 2.0, radius * 2.0),
        );
        match paint.style {
            PaintStyle::Fill => self
                .window
                .paint_quad(fill(bounds, paint.color).corner_radii(Corners::all(radius))),
            PaintStyle::Stroke(_) => self.draw_oval(bounds, paint),
        }
    }

    fn draw_oval(&mut self, bounds: Bounds<Pixels>, paint: &Paint) {
        let points = arc_points(bounds, 0.0, 360.0);
        self.paint_polyline(&points, true, paint);
    }

    fn draw_arc(&mut self, bounds: Bounds<Pixels>, start_angle: f32, sweep_angle: f32, paint: &Paint) {
        let mut points = arc_points(bounds, start_angle, sweep_angle);
        match paint.style {
            PaintStyle::Fill => {
                points.insert(0, bounds.center());
                self.paint_polyline(&points, true, paint);
            }
            PaintStyle::Stroke(_) => self.paint_polyline(&points, false, paint),
        }
    }

    fn draw_line(&mut self, start: Point<Pixels>, end: Point<Pixels>, stroke_width: Pixels, color: Hsla) {
        self.paint_polyline(&[start, end], false, &Paint::stroke(color, stroke_width));
    }

    fn draw_points(&mut self, points: &[Point<Pixels>], stroke_width: Pixels, color: Hsla) {
        let radius = (stroke_width / 2.0).max(px(0.5));
        for point in points {
            let bounds = Bounds::new(
                Point::new(point.x - radius, point.y - radius),
                Size::new(radius * 2.0, radius * 2.0),
            );
            self.window
                .paint_quad(fill(bounds, color).corner_radii(Corners::all(radius)));
        }
    }

    fn draw_path(&mut self, points: &[Point<Pixels>], closed: bool, paint: &Paint) {
        self.paint_polyline(points, closed, paint);
    }

    fn draw_text(&mut self, text: &str, origin: Point<Pixels>, font_size: Pixels, color: Hsla) {
        if text.is_empty() {
            return;
        }
        let run = TextRun {
            len: text.len(),
            font: self.window.text_style().font(),
            color,
            background_color: None,
            underline: None,
            strikethrough: None,
        };
        let line = self
            .window
            .text_system()
            .shape_line(SharedString::from(text.to_string()), font_size, &[run], None);
        let line_height = self.window.line_height();
        if let Err(err) = line.paint(origin, line_height, self.window, self.cx) {
            warn!(?err, "failed to paint canvas text");
        }
    }
}
