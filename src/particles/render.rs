use vello_cpu::kurbo::{BezPath, Circle, Rect, Shape as _, Stroke};

use crate::foundation::error::{GifwrightError, GifwrightResult};
use crate::foundation::math::over_premul_rgb;
use crate::frame::buffer::FrameRgb;
use crate::particles::particle::{Particle, ParticleShape};

const CIRCLE_TOLERANCE: f64 = 0.1;
const STAR_STROKE_WIDTH: f64 = 2.0;

/// Rasterize live particles into a transparent layer and composite it over `frame`.
///
/// Positions are truncated to whole pixels. A disc or square of size `s` covers the pixels
/// `x - s ..= x + s`; a star is the open polyline top, left, bottom, right through
/// `(x, y - s)`, `(x - s/2, y)`, `(x, y + s)`, `(x + s/2, y)`, stroked two pixels wide.
pub(crate) fn render_particles(particles: &[Particle], frame: &mut FrameRgb) -> GifwrightResult<()> {
    if frame.pixel_count() == 0 || !particles.iter().any(Particle::is_alive) {
        return Ok(());
    }
    let width: u16 = frame
        .width
        .try_into()
        .map_err(|_| GifwrightError::validation("frame width exceeds u16"))?;
    let height: u16 = frame
        .height
        .try_into()
        .map_err(|_| GifwrightError::validation("frame height exceeds u16"))?;

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_stroke(Stroke::new(STAR_STROKE_WIDTH));
    for p in particles.iter().filter(|p| p.is_alive()) {
        draw_particle(&mut ctx, p);
    }
    ctx.flush();

    let mut layer = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut layer);

    for (dst, src) in frame
        .data
        .chunks_exact_mut(3)
        .zip(layer.data_as_u8_slice().chunks_exact(4))
    {
        over_premul_rgb(dst, src);
    }
    Ok(())
}

fn draw_particle(ctx: &mut vello_cpu::RenderContext, p: &Particle) {
    let alpha = p.opacity();
    let c = p.color.scale(alpha);
    let size = ((f64::from(p.size) * alpha) as u32).max(1);
    let s = f64::from(size);
    let x = p.position.x.trunc();
    let y = p.position.y.trunc();

    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255));
    match p.shape {
        ParticleShape::Disc => {
            let circle = Circle::new((x + 0.5, y + 0.5), s + 0.5);
            let path: BezPath = circle.to_path(CIRCLE_TOLERANCE);
            ctx.fill_path(&path);
        }
        ParticleShape::Square => {
            ctx.fill_rect(&Rect::new(x - s, y - s, x + s + 1.0, y + s + 1.0));
        }
        ParticleShape::Star => {
            ctx.stroke_path(&star_path(x + 0.5, y + 0.5, s, f64::from(size / 2)));
        }
    }
}

fn star_path(cx: f64, cy: f64, arm: f64, half: f64) -> BezPath {
    let mut path = BezPath::new();
    path.move_to((cx, cy - arm));
    path.line_to((cx - half, cy));
    path.line_to((cx, cy + arm));
    path.line_to((cx + half, cy));
    path
}
