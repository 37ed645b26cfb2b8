//! Scene assembly
//!
//! Turns a `GameState` into two render lists: colored triangles for the GPU
//! and positioned emoji sprites for the DOM overlay (browsers draw color
//! emoji far better than we could rasterize them).

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::hex_to_rgba;
use crate::sim::{Arrow, Balloon, GameState};

/// Left/right extent of the scenery (covers any sane aspect ratio)
const SCENE_HALF_WIDTH: f32 = 40.0;
/// Grass line
const GROUND_TOP: f32 = -5.5;

const ARCHER_GLYPH: &str = "🏹";
const ARCHER_SIZE: f32 = 2.5;

/// One emoji to draw over the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct EmojiSprite<'a> {
    pub glyph: &'a str,
    /// Center in world units
    pub pos: Vec2,
    /// Height in world units
    pub size: f32,
    /// Radians, counter-clockwise
    pub rotation: f32,
    pub opacity: f32,
}

/// Build the full vertex list for one frame
pub fn build_vertices(state: &GameState, time: f32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(4096);

    background(&mut vertices);

    if let Some(power) = state.pending_powerup {
        let pulse = 1.0 + (time * 6.0).sin() * 0.1;
        let alpha = if power.pierces() { 0.6 } else { 0.45 };
        let glow = hex_to_rgba(colors::POWER_GLOW, alpha);
        vertices.extend(shapes::ring(state.archer.pos(), 1.2 * pulse, 1.6 * pulse, glow, 32));
    }

    for balloon in &state.balloons {
        vertices.extend(balloon_vertices(balloon));
    }

    for arrow in &state.arrows {
        vertices.extend(arrow_vertices(arrow, time));
    }

    for sparkle in &state.effects.sparkles {
        let color = hex_to_rgba(sparkle.color, sparkle.opacity());
        vertices.extend(shapes::circle(sparkle.pos, sparkle.size, color, 8));
    }

    vertices
}

/// Static scenery: sky, ground, mountains, trees, clouds
fn background(out: &mut Vec<Vertex>) {
    let sky_top = VIEW_HALF_HEIGHT + 1.0;
    out.extend(shapes::gradient_rect(
        Vec2::new(-SCENE_HALF_WIDTH, GROUND_TOP),
        Vec2::new(2.0 * SCENE_HALF_WIDTH, sky_top - GROUND_TOP),
        hex_to_rgba(colors::SKY, 1.0),
        hex_to_rgba(colors::SKY_TOP, 1.0),
    ));

    let ground_bottom = -VIEW_HALF_HEIGHT - 1.0;
    out.extend(shapes::rect(
        Vec2::new(-SCENE_HALF_WIDTH, ground_bottom),
        Vec2::new(2.0 * SCENE_HALF_WIDTH, GROUND_TOP - ground_bottom),
        hex_to_rgba(colors::GROUND, 1.0),
    ));

    // (left foot, peak, right foot) along y = -8
    let mountains = [
        (-15.0, Vec2::new(-12.0, -2.0), -9.0),
        (-10.0, Vec2::new(-6.0, 0.0), -2.0),
        (5.0, Vec2::new(9.0, -1.0), 13.0),
    ];
    for ((left, peak, right), color) in mountains.into_iter().zip(colors::MOUNTAINS) {
        out.extend(shapes::triangle(
            Vec2::new(left, -8.0),
            Vec2::new(right, -8.0),
            peak,
            hex_to_rgba(color, 1.0),
        ));
    }

    for x in [-12.0, -7.0, 3.0, 8.0, 12.0] {
        let base = Vec2::new(x, -7.0);
        out.extend(shapes::rect(
            base - Vec2::new(0.15, 0.0),
            Vec2::new(0.3, 1.5),
            hex_to_rgba(colors::TRUNK, 1.0),
        ));
        let crown = base + Vec2::new(0.0, 1.8);
        out.extend(shapes::triangle(
            crown + Vec2::new(-0.6, -0.2),
            crown + Vec2::new(0.6, -0.2),
            crown + Vec2::new(0.0, 0.8),
            hex_to_rgba(colors::FOLIAGE, 1.0),
        ));
    }

    let cloud = hex_to_rgba(colors::CLOUD, 0.8);
    for (i, center) in [
        Vec2::new(-10.0, 7.0),
        Vec2::new(-3.0, 8.0),
        Vec2::new(5.0, 7.5),
        Vec2::new(11.0, 8.0),
    ]
    .into_iter()
    .enumerate()
    {
        // Three puffs, sized by a fixed per-cloud pattern
        for puff in 0..3 {
            let wobble = ((i * 3 + puff) as f32 * 1.7).sin();
            let offset = Vec2::new(puff as f32 * 0.6 - 0.6, 0.1 + wobble * 0.1);
            out.extend(shapes::circle(center + offset, 0.65 + wobble * 0.15, cloud, 16));
        }
    }
}

fn balloon_vertices(balloon: &Balloon) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(200);
    let r = balloon.size;
    let body = hex_to_rgba(balloon.color, 1.0);

    // String first so the body covers its top end
    let anchor = balloon.string_anchor();
    let half = Vec2::new(0.0, STRING_LENGTH / 2.0);
    out.extend(shapes::line(
        anchor + half,
        anchor - half,
        0.04,
        hex_to_rgba(colors::STRING, 1.0),
    ));

    out.extend(shapes::ellipse(balloon.pos, Vec2::new(r, r * 1.1), body, 32));

    let bottom = balloon.pos - Vec2::new(0.0, r * 1.1);
    out.extend(shapes::triangle(
        bottom + Vec2::new(-0.12, -0.15),
        bottom + Vec2::new(0.12, -0.15),
        bottom + Vec2::new(0.0, 0.05),
        hex_to_rgba(colors::KNOT, 0.8),
    ));

    // Shine
    out.extend(shapes::ellipse(
        balloon.pos + Vec2::new(-0.35 * r, 0.4 * r),
        Vec2::new(0.18 * r, 0.28 * r),
        [1.0, 1.0, 1.0, 0.5],
        12,
    ));

    out
}

fn arrow_vertices(arrow: &Arrow, time: f32) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(12);
    let scale = arrow.hit_radius_scale;

    let (shaft, head) = if arrow.pierces() {
        let hue = (time * 0.8 + arrow.id as f32 * 0.13).fract();
        (rainbow(hue), rainbow((hue + 0.5).fract()))
    } else {
        (
            hex_to_rgba(colors::ARROW_SHAFT, 1.0),
            hex_to_rgba(colors::ARROW_HEAD, 1.0),
        )
    };

    let tail = arrow.pos - Vec2::new(0.5 * scale, 0.0);
    let tip = arrow.pos + Vec2::new(0.5 * scale, 0.0);
    out.extend(shapes::line(tail, tip, 0.06 * scale, shaft));
    out.extend(shapes::triangle(
        tip + Vec2::new(0.0, 0.1 * scale),
        tip + Vec2::new(0.0, -0.1 * scale),
        tip + Vec2::new(0.3 * scale, 0.0),
        head,
    ));
    out
}

/// Fully saturated color for a hue in [0, 1)
fn rainbow(hue: f32) -> [f32; 4] {
    let h = hue * 6.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    [r, g, b, 1.0]
}

/// Every emoji on screen this frame, back to front
pub fn emoji_sprites(state: &GameState) -> Vec<EmojiSprite<'_>> {
    let mut sprites = Vec::with_capacity(
        2 + state.effects.big_emojis.len() + state.effects.confetti.len(),
    );

    sprites.push(EmojiSprite {
        glyph: ARCHER_GLYPH,
        pos: state.archer.pos(),
        size: ARCHER_SIZE,
        // Tipped 45° clockwise so the arrow points at the balloons
        rotation: -std::f32::consts::FRAC_PI_4,
        opacity: 1.0,
    });

    if let Some(mascot) = &state.mascot {
        sprites.push(EmojiSprite {
            glyph: &mascot.emoji,
            pos: Vec2::new(ARCHER_X + 2.0, GROUND_TOP - 1.0 + mascot.hop_height()),
            size: 1.8,
            rotation: 0.0,
            opacity: 1.0,
        });
    }

    for big in &state.effects.big_emojis {
        sprites.push(EmojiSprite {
            glyph: state.emoji(big.emoji),
            pos: big.pos,
            size: big.scale(),
            rotation: 0.0,
            opacity: big.opacity(),
        });
    }

    for c in &state.effects.confetti {
        sprites.push(EmojiSprite {
            glyph: state.emoji(c.emoji),
            pos: c.pos,
            size: c.size,
            rotation: c.rotation,
            opacity: c.opacity(),
        });
    }

    sprites
}
