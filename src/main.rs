use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cairo::{Context as CairoContext, Format, ImageSurface, LineCap, SvgSurface};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use render_bgc_rs::layout::{layout_cluster, ClusterLayout, Glyph, GlyphKind, Point};
use render_bgc_rs::model::Cluster;
use render_bgc_rs::random::random_cluster;

const DEFAULT_HEIGHT_PX: i64 = 40;
const DEFAULT_LINE_WIDTH: f64 = 2.0;
const BACKGROUND_COLOR: (f64, f64, f64) = (1.0, 1.0, 1.0);
const STROKE_COLOR: (f64, f64, f64) = (0.0, 0.0, 0.0);
const FALLBACK_FILL_COLOR: (f64, f64, f64) = (128.0 / 255.0, 128.0 / 255.0, 128.0 / 255.0);

#[derive(Parser)]
#[command(author, version, about = "Render gene cluster diagrams to PNG", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(name = "draw_cluster")]
    DrawCluster {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "cluster.png")]
        output: PathBuf,
        #[arg(long, default_value_t = DEFAULT_HEIGHT_PX)]
        height: i64,
    },
    #[command(name = "draw_random")]
    DrawRandom {
        #[arg(long, default_value = "cluster.png")]
        output: PathBuf,
        #[arg(long, default_value_t = DEFAULT_HEIGHT_PX)]
        height: i64,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::DrawCluster {
            input,
            output,
            height,
        } => {
            let cluster = load_cluster(&input)?;
            draw_cluster(&cluster, height, &output)
        }
        Command::DrawRandom {
            output,
            height,
            seed,
        } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let cluster = random_cluster(&mut rng);
            draw_cluster(&cluster, height, &output)
        }
    }
}

fn load_cluster(input: &Path) -> Result<Cluster> {
    let json = fs::read_to_string(input).with_context(|| format!("Failed to read {:?}", input))?;
    let cluster: Cluster =
        serde_json::from_str(&json).context("Failed to parse cluster JSON")?;
    Ok(cluster)
}

fn setup_context(ctx: &CairoContext) -> Result<()> {
    ctx.set_source_rgb(BACKGROUND_COLOR.0, BACKGROUND_COLOR.1, BACKGROUND_COLOR.2);
    ctx.paint()?;
    ctx.set_source_rgb(STROKE_COLOR.0, STROKE_COLOR.1, STROKE_COLOR.2);
    ctx.set_line_width(DEFAULT_LINE_WIDTH);
    ctx.set_line_cap(LineCap::Square);
    Ok(())
}

fn create_png_surface(width: i32, height: i32) -> Result<(ImageSurface, CairoContext)> {
    let surface = ImageSurface::create(Format::ARgb32, width, height)
        .context("Failed to create image surface")?;
    let ctx = CairoContext::new(&surface).context("Failed to create Cairo context")?;
    setup_context(&ctx)?;
    Ok((surface, ctx))
}

fn default_svg_output_path(output: &Path) -> PathBuf {
    let mut svg_path = output.to_path_buf();
    svg_path.set_extension("svg");
    svg_path
}

fn render_svg<F>(svg_path: &Path, width: f64, height: f64, render: F) -> Result<()>
where
    F: FnOnce(&CairoContext) -> Result<()>,
{
    let surface = SvgSurface::new(width, height, Some(svg_path))
        .context("Failed to create SVG surface")?;
    let ctx = CairoContext::new(&surface).context("Failed to create Cairo context")?;
    setup_context(&ctx)?;
    render(&ctx)?;
    surface.finish();
    Ok(())
}

fn draw_cluster(cluster: &Cluster, height: i64, output: &Path) -> Result<()> {
    let layout = layout_cluster(cluster, height).context("Failed to lay out cluster")?;

    let width_px = layout.width.max(1) as i32;
    let height_px = layout.height.max(1) as i32;
    let (surface, ctx) = create_png_surface(width_px, height_px)?;
    render_layout(&ctx, &layout)?;

    let mut file = fs::File::create(output).context("Failed to create PNG file")?;
    surface
        .write_to_png(&mut file)
        .context("Failed to write PNG")?;

    let svg_path = default_svg_output_path(output);
    render_svg(&svg_path, width_px as f64, height_px as f64, |ctx| {
        render_layout(ctx, &layout)
    })?;
    Ok(())
}

fn render_layout(ctx: &CairoContext, layout: &ClusterLayout) -> Result<()> {
    for glyph in &layout.glyphs {
        match glyph.kind {
            GlyphKind::Backbone => draw_backbone(ctx, glyph)?,
            GlyphKind::Orf | GlyphKind::Domain => draw_polygon_glyph(ctx, glyph)?,
        }
    }
    Ok(())
}

fn draw_backbone(ctx: &CairoContext, glyph: &Glyph) -> Result<()> {
    if glyph.polygon.len() < 2 {
        return Ok(());
    }
    ctx.set_source_rgb(STROKE_COLOR.0, STROKE_COLOR.1, STROKE_COLOR.2);
    ctx.set_line_width(glyph.style.stroke_width);
    for pair in glyph.polygon.windows(2) {
        ctx.move_to(pair[0].x, pair[0].y);
        ctx.line_to(pair[1].x, pair[1].y);
        ctx.stroke()?;
    }
    Ok(())
}

fn draw_polygon_glyph(ctx: &CairoContext, glyph: &Glyph) -> Result<()> {
    if glyph.polygon.len() < 3 {
        return Ok(());
    }
    path_polygon(ctx, &glyph.polygon);
    let fill = parse_fill_color(&glyph.style.fill);
    ctx.set_source_rgb(fill.0, fill.1, fill.2);
    if glyph.style.stroke_width > 0.0 {
        ctx.fill_preserve()?;
        ctx.set_source_rgb(STROKE_COLOR.0, STROKE_COLOR.1, STROKE_COLOR.2);
        ctx.set_line_width(glyph.style.stroke_width);
        ctx.stroke()?;
    } else {
        ctx.fill()?;
    }
    Ok(())
}

fn path_polygon(ctx: &CairoContext, points: &[Point]) {
    ctx.new_path();
    ctx.move_to(points[0].x, points[0].y);
    for point in &points[1..] {
        ctx.line_to(point.x, point.y);
    }
    ctx.close_path();
}

fn parse_fill_color(color: &str) -> (f64, f64, f64) {
    parse_color(color).unwrap_or(FALLBACK_FILL_COLOR)
}

/// Parse `rgb(r,g,b)`, `#rrggbb`, or the SVG color names the cluster records
/// use.
fn parse_color(color: &str) -> Option<(f64, f64, f64)> {
    let color = color.trim();
    if let Some(inner) = color
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let mut channels = inner.split(',').map(str::trim);
        let r = channels.next()?.parse::<f64>().ok()?;
        let g = channels.next()?.parse::<f64>().ok()?;
        let b = channels.next()?.parse::<f64>().ok()?;
        if channels.next().is_some() {
            return None;
        }
        return Some((
            (r / 255.0).clamp(0.0, 1.0),
            (g / 255.0).clamp(0.0, 1.0),
            (b / 255.0).clamp(0.0, 1.0),
        ));
    }
    if let Some(hex) = color.strip_prefix('#') {
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            return Some(rgb8(r, g, b));
        }
        return None;
    }
    match color.to_ascii_lowercase().as_str() {
        "black" => Some(rgb8(0, 0, 0)),
        "white" => Some(rgb8(255, 255, 255)),
        "red" => Some(rgb8(255, 0, 0)),
        "green" => Some(rgb8(0, 128, 0)),
        "blue" => Some(rgb8(0, 0, 255)),
        "yellow" => Some(rgb8(255, 255, 0)),
        "cyan" => Some(rgb8(0, 255, 255)),
        "magenta" => Some(rgb8(255, 0, 255)),
        "orange" => Some(rgb8(255, 165, 0)),
        "purple" => Some(rgb8(128, 0, 128)),
        "brown" => Some(rgb8(165, 42, 42)),
        "pink" => Some(rgb8(255, 192, 203)),
        "gray" | "grey" => Some(rgb8(128, 128, 128)),
        "lightgray" | "lightgrey" => Some(rgb8(211, 211, 211)),
        "darkgray" | "darkgrey" => Some(rgb8(169, 169, 169)),
        "silver" => Some(rgb8(192, 192, 192)),
        _ => None,
    }
}

fn rgb8(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rgb_and_hex_colors() {
        assert_eq!(parse_color("rgb(255, 0, 0)"), Some((1.0, 0.0, 0.0)));
        assert_eq!(parse_color("#ff0000"), Some((1.0, 0.0, 0.0)));
        assert_eq!(parse_color("white"), Some((1.0, 1.0, 1.0)));
        assert_eq!(parse_color("no-such-color"), None);
        assert_eq!(parse_color("rgb(1,2)"), None);
    }

    #[test]
    fn unknown_colors_fall_back_to_gray() {
        assert_eq!(parse_fill_color("???"), FALLBACK_FILL_COLOR);
    }
}
