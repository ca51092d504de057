//! Static export of plot surfaces as SVG documents or PNG images.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use egui::Color32;
use image::RgbaImage;
use tracing::info;

use crate::color_scheme::{to_hex, ColorScheme};
use crate::error::{PlotError, PlotResult};
use crate::plot::surface::{ElementClass, Shape, Surface, TextAnchor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Svg,
    Png,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(ExportFormat::Svg),
            "png" => Ok(ExportFormat::Png),
            other => Err(format!("unknown export format '{other}' (expected svg or png)")),
        }
    }
}

/// Serialize `surface` into a standalone SVG document.
pub fn surface_to_svg(surface: &Surface, scheme: &ColorScheme) -> String {
    let w = surface.width();
    let h = surface.height();
    let m = surface.margin();
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#
    );
    let _ = writeln!(
        out,
        r#"<rect width="{w}" height="{h}" fill="{}"/>"#,
        to_hex(scheme.background())
    );
    let _ = writeln!(
        out,
        r#"<defs><clipPath id="plot-area"><rect width="{}" height="{}"/></clipPath></defs>"#,
        surface.inner_width(),
        surface.inner_height()
    );
    let _ = writeln!(out, r#"<g transform="translate({},{})">"#, m.left, m.top);
    for class in [
        ElementClass::Axis,
        ElementClass::Title,
        ElementClass::Series,
        ElementClass::Marker,
        ElementClass::Legend,
    ] {
        let clipped = class == ElementClass::Series;
        if clipped {
            out.push_str(r#"<g clip-path="url(#plot-area)">"#);
            out.push('\n');
        }
        for el in surface.of_class(class) {
            write_shape(&mut out, &el.shape);
        }
        if clipped {
            out.push_str("</g>\n");
        }
    }
    out.push_str("</g>\n</svg>\n");
    out
}

fn write_shape(out: &mut String, shape: &Shape) {
    let _ = match shape {
        Shape::Polyline { points, color, width } => {
            if points.len() < 2 {
                return;
            }
            let pts: Vec<String> = points.iter().map(|p| format!("{:.2},{:.2}", p[0], p[1])).collect();
            writeln!(
                out,
                r#"<polyline points="{}" fill="none"{} stroke-width="{width}"/>"#,
                pts.join(" "),
                paint("stroke", *color)
            )
        }
        Shape::Circle { center, radius, fill } => writeln!(
            out,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{radius}"{}/>"#,
            center[0],
            center[1],
            paint("fill", *fill)
        ),
        Shape::Rect { min, size, fill } => writeln!(
            out,
            r#"<rect x="{:.2}" y="{:.2}" width="{}" height="{}"{}/>"#,
            min[0],
            min[1],
            size[0],
            size[1],
            paint("fill", *fill)
        ),
        Shape::Line { from, to, color, width } => writeln!(
            out,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke-width="{width}"{}/>"#,
            from[0],
            from[1],
            to[0],
            to[1],
            paint("stroke", *color)
        ),
        Shape::Text {
            pos,
            text,
            size,
            anchor,
            color,
            rotation,
        } => {
            let anchor = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let transform = if *rotation != 0.0 {
                format!(r#" transform="rotate({rotation} {:.2} {:.2})""#, pos[0], pos[1])
            } else {
                String::new()
            };
            writeln!(
                out,
                r#"<text x="{:.2}" y="{:.2}" dy="0.35em" font-size="{size}" text-anchor="{anchor}"{}{transform}>{}</text>"#,
                pos[0],
                pos[1],
                paint("fill", *color),
                escape_text(text)
            )
        }
    };
}

/// `fill="#rrggbb"` plus an opacity attribute for translucent colors.
fn paint(attr: &str, c: Color32) -> String {
    let [r, g, b, a] = c.to_srgba_unmultiplied();
    let hex = to_hex(Color32::from_rgb(r, g, b));
    if a == 255 {
        format!(r#" {attr}="{hex}""#)
    } else {
        format!(r#" {attr}="{hex}" {attr}-opacity="{:.3}""#, a as f32 / 255.0)
    }
}

pub fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Rasterize an SVG document at its intrinsic size.
pub fn svg_to_image(svg: &str) -> PlotResult<RgbaImage> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_data(svg.as_bytes(), &options)
        .map_err(|e| PlotError::Render(format!("SVG parse failed: {e}")))?;
    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| PlotError::Render("pixmap allocation failed".to_string()))?;
    // The document paints its own opaque background, so premultiplied data is straight RGBA.
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    RgbaImage::from_raw(size.width(), size.height(), pixmap.take())
        .ok_or_else(|| PlotError::Render("pixel buffer size mismatch".to_string()))
}

pub fn save_svg<P: AsRef<Path>>(surface: &Surface, scheme: &ColorScheme, path: P) -> PlotResult<()> {
    let path = path.as_ref();
    fs::write(path, surface_to_svg(surface, scheme)).map_err(|e| PlotError::io(path, e))?;
    info!(path = %path.display(), "saved SVG");
    Ok(())
}

pub fn save_png<P: AsRef<Path>>(surface: &Surface, scheme: &ColorScheme, path: P) -> PlotResult<()> {
    let path = path.as_ref();
    let img = svg_to_image(&surface_to_svg(surface, scheme))?;
    img.save(path)?;
    info!(path = %path.display(), width = img.width(), height = img.height(), "saved PNG");
    Ok(())
}

pub fn save<P: AsRef<Path>>(surface: &Surface, scheme: &ColorScheme, path: P, format: ExportFormat) -> PlotResult<()> {
    match format {
        ExportFormat::Svg => save_svg(surface, scheme, path),
        ExportFormat::Png => save_png(surface, scheme, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::surface::Margin;

    #[test]
    fn text_is_escaped() {
        assert_eq!(escape_text(r#"a<b & "c">"#), "a&lt;b &amp; &quot;c&quot;&gt;");
    }

    #[test]
    fn format_parsing() {
        assert_eq!("PNG".parse::<ExportFormat>(), Ok(ExportFormat::Png));
        assert_eq!("svg".parse::<ExportFormat>(), Ok(ExportFormat::Svg));
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn svg_contains_every_class() {
        let mut s = Surface::new(200.0, 100.0, Margin::default());
        s.push(
            ElementClass::Series,
            Shape::Polyline {
                points: vec![[0.0, 0.0], [10.0, 10.0]],
                color: Color32::from_rgb(0xA4, 0, 0),
                width: 1.5,
            },
        );
        s.push(
            ElementClass::Marker,
            Shape::Circle {
                center: [10.0, 10.0],
                radius: 5.0,
                fill: Color32::from_rgb(0x16, 0x31, 0x7D),
            },
        );
        s.push(
            ElementClass::Legend,
            Shape::Text {
                pos: [5.0, 5.0],
                text: "MDS".into(),
                size: 12.0,
                anchor: TextAnchor::End,
                color: Color32::BLACK,
                rotation: 0.0,
            },
        );
        let svg = surface_to_svg(&s, &ColorScheme::Light);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r##"stroke="#a40000""##));
        assert!(svg.contains(r##"fill="#16317d""##));
        assert!(svg.contains(r#"text-anchor="end""#));
        assert!(svg.contains(">MDS</text>"));
        assert!(svg.contains("clip-path"));
    }

    #[test]
    fn single_point_polyline_is_omitted() {
        let mut s = Surface::new(200.0, 100.0, Margin::default());
        s.push(
            ElementClass::Series,
            Shape::Polyline {
                points: vec![[1.0, 1.0]],
                color: Color32::BLACK,
                width: 1.0,
            },
        );
        assert!(!surface_to_svg(&s, &ColorScheme::Light).contains("<polyline"));
    }

    #[test]
    fn rasterizes_at_surface_size() {
        let s = Surface::new(64.0, 32.0, Margin::default());
        let img = svg_to_image(&surface_to_svg(&s, &ColorScheme::Light)).unwrap();
        assert_eq!((img.width(), img.height()), (64, 32));
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }
}
