use eframe::egui::{self, Color32, Pos2, Shape, Stroke};

use crate::gallery::model::ConnectionStyle;

pub const LINE_BLUE: Color32 = Color32::from_rgb(0x3B, 0x82, 0xF6);
pub const LINE_RED: Color32 = Color32::from_rgb(0xEF, 0x44, 0x44);
pub const LINE_GREEN: Color32 = Color32::from_rgb(0x10, 0xB9, 0x81);

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineStyle {
    pub color: Color32,
    pub width: f32,
    // (dash, gap) in points; None draws a solid line
    pub dash: Option<(f32, f32)>,
}

impl LineStyle {
    pub fn stroke(&self) -> Stroke {
        Stroke::new(self.width, self.color)
    }

    pub fn shapes(&self, a: Pos2, b: Pos2) -> Vec<Shape> {
        match self.dash {
            Some((dash, gap)) => Shape::dashed_line(&[a, b], self.stroke(), dash, gap),
            None => vec![Shape::line_segment([a, b], self.stroke())],
        }
    }
}

pub fn line_style(style: ConnectionStyle) -> LineStyle {
    let solid = |color, width| LineStyle { color, width, dash: None };
    match style {
        ConnectionStyle::Default => solid(LINE_BLUE, 2.0),
        ConnectionStyle::Dashed => LineStyle { dash: Some((5.0, 5.0)), ..solid(LINE_BLUE, 2.0) },
        ConnectionStyle::Dotted => LineStyle { dash: Some((2.0, 2.0)), ..solid(LINE_BLUE, 2.0) },
        ConnectionStyle::Thick => solid(LINE_BLUE, 4.0),
        ConnectionStyle::Red => solid(LINE_RED, 2.0),
        ConnectionStyle::Green => solid(LINE_GREEN, 2.0),
    }
}

/// Line following the pointer while a connection is being dragged out.
pub fn temp_line_style() -> LineStyle {
    LineStyle { color: LINE_BLUE, width: 2.0, dash: Some((5.0, 5.0)) }
}

pub fn paint_line(painter: &egui::Painter, a: Pos2, b: Pos2, style: &LineStyle) {
    painter.extend(style.shapes(a, b));
}
