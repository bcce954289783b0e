//! Minimal SVG builder for the static charts.

use std::fmt::Write as _;

use crate::utils::escape_markup;

const FONT_FAMILY: &str = "DejaVu Sans, Arial, sans-serif";
const GRID_COLOR: &str = "#d0d0d0";
const AXIS_COLOR: &str = "#444444";
pub const TEXT_COLOR: &str = "#222222";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(&self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// A single line of text.
#[derive(Debug, Clone)]
pub struct Text<'a> {
    x: f64,
    y: f64,
    content: &'a str,
    size: f64,
    anchor: Anchor,
    bold: bool,
    fill: &'a str,
    central: bool,
    rotate: Option<f64>,
}

impl<'a> Text<'a> {
    pub fn new(x: f64, y: f64, content: &'a str) -> Self {
        Text {
            x,
            y,
            content,
            size: 12.0,
            anchor: Anchor::Start,
            bold: false,
            fill: TEXT_COLOR,
            central: false,
            rotate: None,
        }
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn middle(self) -> Self {
        self.anchor(Anchor::Middle)
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn fill(mut self, fill: &'a str) -> Self {
        self.fill = fill;
        self
    }

    /// Center vertically on `y` instead of sitting on it.
    pub fn central(mut self) -> Self {
        self.central = true;
        self
    }

    pub fn rotate(mut self, degrees: f64) -> Self {
        self.rotate = Some(degrees);
        self
    }
}

/// Rectangular plotting area in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Frame { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Canvas y for `value` on a vertical axis running from 0 to `max`.
    pub fn value_y(&self, value: f64, max: f64) -> f64 {
        if max <= 0.0 {
            return self.bottom();
        }
        self.bottom() - (value / max).clamp(0.0, 1.0) * self.height
    }

    /// Canvas x for `value` on a horizontal axis running from 0 to `max`.
    pub fn value_x(&self, value: f64, max: f64) -> f64 {
        if max <= 0.0 {
            return self.x;
        }
        self.x + (value / max).clamp(0.0, 1.0) * self.width
    }
}

pub struct Svg {
    width: f64,
    height: f64,
    body: String,
}

impl Svg {
    pub fn new(width: f64, height: f64) -> Self {
        let mut body = String::new();
        let _ = writeln!(body, "  <defs>");
        let _ = writeln!(
            body,
            "    <marker id='arrow' viewBox='0 0 10 10' refX='9' refY='5' markerWidth='7' markerHeight='7' orient='auto'>"
        );
        let _ = writeln!(body, "      <path d='M0,0 L10,5 L0,10 z' fill='#808080'/>");
        let _ = writeln!(body, "    </marker>");
        let _ = writeln!(body, "  </defs>");
        let _ = writeln!(body, "  <rect width='{width:.0}' height='{height:.0}' fill='#ffffff'/>");
        Svg { width, height, body }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: &str) {
        let _ = writeln!(
            self.body,
            "  <rect x='{x:.2}' y='{y:.2}' width='{:.2}' height='{:.2}' fill='{fill}' stroke='#ffffff' stroke-width='2'/>",
            width.max(0.0),
            height.max(0.0)
        );
    }

    /// Unfilled dashed box, used for stages that have no image.
    pub fn outline(&mut self, x: f64, y: f64, width: f64, height: f64, stroke: &str) {
        let _ = writeln!(
            self.body,
            "  <rect x='{x:.2}' y='{y:.2}' width='{:.2}' height='{:.2}' fill='none' stroke='{stroke}' stroke-width='1.5' stroke-dasharray='6 4'/>",
            width.max(0.0),
            height.max(0.0)
        );
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, width: f64) {
        let _ = writeln!(
            self.body,
            "  <line x1='{x1:.2}' y1='{y1:.2}' x2='{x2:.2}' y2='{y2:.2}' stroke='{stroke}' stroke-width='{width}'/>"
        );
    }

    pub fn dashed_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, opacity: f64) {
        let _ = writeln!(
            self.body,
            "  <line x1='{x1:.2}' y1='{y1:.2}' x2='{x2:.2}' y2='{y2:.2}' stroke='{stroke}' stroke-width='1.5' stroke-dasharray='8 5' stroke-opacity='{opacity}'/>"
        );
    }

    pub fn arrow(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let _ = writeln!(
            self.body,
            "  <line x1='{x1:.2}' y1='{y1:.2}' x2='{x2:.2}' y2='{y2:.2}' stroke='#808080' stroke-width='1.5' marker-end='url(#arrow)'/>"
        );
    }

    pub fn text(&mut self, text: Text<'_>) {
        let weight = if text.bold { " font-weight='bold'" } else { "" };
        let baseline = if text.central { " dominant-baseline='central'" } else { "" };
        let transform = match text.rotate {
            Some(degrees) => format!(" transform='rotate({degrees} {:.2} {:.2})'", text.x, text.y),
            None => String::new(),
        };
        let _ = writeln!(
            self.body,
            "  <text x='{:.2}' y='{:.2}' fill='{}' font-family='{FONT_FAMILY}' font-size='{}' text-anchor='{}'{weight}{baseline}{transform}>{}</text>",
            text.x,
            text.y,
            text.fill,
            text.size,
            text.anchor.as_str(),
            escape_markup(text.content)
        );
    }

    /// Pie slice starting `start` degrees clockwise from 12 o'clock. `explode`
    /// pushes the slice outwards by that fraction of the radius.
    pub fn wedge(&mut self, cx: f64, cy: f64, radius: f64, start: f64, sweep: f64, fill: &str, explode: f64) {
        let mid = (start + sweep / 2.0).to_radians();
        let cx = cx + explode * radius * mid.sin();
        let cy = cy - explode * radius * mid.cos();

        if sweep >= 359.999 {
            let _ = writeln!(
                self.body,
                "  <circle cx='{cx:.2}' cy='{cy:.2}' r='{radius:.2}' fill='{fill}' stroke='#ffffff' stroke-width='2'/>"
            );
            return;
        }

        let (x0, y0) = polar(cx, cy, radius, start);
        let (x1, y1) = polar(cx, cy, radius, start + sweep);
        let large_arc = if sweep > 180.0 { 1 } else { 0 };
        let _ = writeln!(
            self.body,
            "  <path d='M{cx:.2},{cy:.2} L{x0:.2},{y0:.2} A{radius:.2},{radius:.2} 0 {large_arc} 1 {x1:.2},{y1:.2} Z' fill='{fill}' stroke='#ffffff' stroke-width='2'/>"
        );
    }

    /// Dashed grid and tick labels for a vertical value axis.
    pub fn value_axis(&mut self, frame: &Frame, max: f64, suffix: &str) {
        for tick in nice_ticks(max) {
            let y = frame.value_y(tick, max);
            if tick > 0.0 {
                self.dashed_line(frame.x, y, frame.right(), y, GRID_COLOR, 0.8);
            }
            let label = format!("{tick:.0}{suffix}");
            self.text(Text::new(frame.x - 8.0, y, &label).size(11.0).anchor(Anchor::End).central());
        }
        self.line(frame.x, frame.y, frame.x, frame.bottom(), AXIS_COLOR, 1.0);
        self.line(frame.x, frame.bottom(), frame.right(), frame.bottom(), AXIS_COLOR, 1.0);
    }

    /// Dashed grid and tick labels for a horizontal value axis.
    pub fn horizontal_value_axis(&mut self, frame: &Frame, max: f64, suffix: &str) {
        for tick in nice_ticks(max) {
            let x = frame.value_x(tick, max);
            if tick > 0.0 {
                self.dashed_line(x, frame.y, x, frame.bottom(), GRID_COLOR, 0.8);
            }
            let label = format!("{tick:.0}{suffix}");
            self.text(Text::new(x, frame.bottom() + 18.0, &label).size(11.0).middle());
        }
        self.line(frame.x, frame.y, frame.x, frame.bottom(), AXIS_COLOR, 1.0);
        self.line(frame.x, frame.bottom(), frame.right(), frame.bottom(), AXIS_COLOR, 1.0);
    }

    pub fn finish(self) -> String {
        let mut svg = String::with_capacity(self.body.len() + 256);
        let _ = writeln!(
            svg,
            "<svg xmlns='http://www.w3.org/2000/svg' width='{:.0}' height='{:.0}' viewBox='0 0 {:.0} {:.0}' role='img'>",
            self.width, self.height, self.width, self.height
        );
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }
}

pub fn polar(cx: f64, cy: f64, radius: f64, degrees: f64) -> (f64, f64) {
    let angle = degrees.to_radians();
    (cx + radius * angle.sin(), cy - radius * angle.cos())
}

/// Tick values from 0 to `max` on a 1-2-5 step.
pub fn nice_ticks(max: f64) -> Vec<f64> {
    if !max.is_finite() || max <= 0.0 {
        return vec![0.0];
    }
    let raw = max / 5.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = match raw / magnitude {
        n if n <= 1.0 => magnitude,
        n if n <= 2.0 => 2.0 * magnitude,
        n if n <= 5.0 => 5.0 * magnitude,
        _ => 10.0 * magnitude,
    };
    let count = (max / step + 1e-9).floor() as usize;
    (0..=count).map(|i| i as f64 * step).collect()
}

/// Full turn in degrees for a share of `total`.
pub fn sweep_of(value: f64, total: f64) -> f64 {
    if total <= 0.0 { 0.0 } else { value / total * 360.0 }
}
