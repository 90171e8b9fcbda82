//! Shape generation for 2D primitives
//!
//! Vertices are emitted in playfield pixel coordinates; the pipeline maps them
//! to clip space.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::sim::{GameState, Rect};

/// Segments used to tessellate the ball
const BALL_SEGMENTS: u32 = 24;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a filled rectangle (two triangles)
pub fn rect(rect: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let [tl, tr, br, bl] = rect.corners();
    vec![
        Vertex::new(tl.x, tl.y, color),
        Vertex::new(bl.x, bl.y, color),
        Vertex::new(tr.x, tr.y, color),
        Vertex::new(tr.x, tr.y, color),
        Vertex::new(bl.x, bl.y, color),
        Vertex::new(br.x, br.y, color),
    ]
}

/// Full frame: bricks, then paddle, then ball on top
pub fn scene(state: &GameState) -> Vec<Vertex> {
    let mut vertices =
        Vec::with_capacity(state.bricks.len() * 6 + 6 + (BALL_SEGMENTS * 3) as usize);

    for brick in &state.bricks {
        vertices.extend(rect(&brick.rect, colors::from_rgb(brick.rgb())));
    }
    vertices.extend(rect(&state.paddle.rect(), colors::PADDLE));
    vertices.extend(circle(
        state.ball.pos,
        state.ball.radius,
        colors::BALL,
        BALL_SEGMENTS,
    ));

    vertices
}
