//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::Snapshot;
use super::vertex::{Vertex, colors};
use crate::consts::PLAYER_SIZE;

/// Interpolate color by remaining health (full=green, half=yellow, empty=red)
pub fn health_color(fraction: f32, alpha: f32) -> [f32; 4] {
    let t = fraction.clamp(0.0, 1.0);
    let (r, g, b) = if t > 0.5 {
        // Yellow to green
        let u = (t - 0.5) / 0.5;
        (1.0 - 0.8 * u, 0.85, 0.2)
    } else {
        // Red to yellow
        let u = t / 0.5;
        (1.0, 0.2 + 0.65 * u, 0.2)
    };
    [r, g, b, alpha]
}

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

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let (s1, c1) = ((i as f32 / segments as f32) * 2.0 * PI).sin_cos();
        let (s2, c2) = (((i + 1) as f32 / segments as f32) * 2.0 * PI).sin_cos();

        let inner1 = center + Vec2::new(c1, s1) * inner_radius;
        let outer1 = center + Vec2::new(c1, s1) * outer_radius;
        let inner2 = center + Vec2::new(c2, s2) * inner_radius;
        let outer2 = center + Vec2::new(c2, s2) * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Axis-aligned filled rectangle from its top-left corner
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Thin line as a quad
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    let (a, b, c, d) = (from + perp, from - perp, to + perp, to - perp);
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Health bar centred above a body
pub fn health_bar(center: Vec2, radius: f32, fraction: f32) -> Vec<Vertex> {
    let width = radius * 2.0;
    let min = center - Vec2::new(radius, radius + 8.0);
    let mut vertices = rect(min, Vec2::new(width, 4.0), colors::HEALTH_BACK);
    vertices.extend(rect(
        min,
        Vec2::new(width * fraction.clamp(0.0, 1.0), 4.0),
        health_color(fraction, 1.0),
    ));
    vertices
}

/// Full triangle list for one frame, back to front
pub fn frame(snapshot: &Snapshot) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for particle in &snapshot.effects.particles {
        let mut color = colors::particle(particle.kind);
        color[3] = particle.life.clamp(0.0, 1.0);
        vertices.extend(circle(particle.pos, particle.size, color, 6));
    }

    for monster in &snapshot.monsters {
        let radius = monster.radius();
        vertices.extend(circle(monster.pos, radius, colors::monster(monster.kind), 16));
        if monster.dot.is_some() {
            vertices.extend(ring(monster.pos, radius, radius + 3.0, colors::DOT, 16));
        }
        if monster.is_boss() && snapshot.boss.as_ref().is_some_and(|b| !b.vulnerable) {
            vertices.extend(ring(monster.pos, radius + 3.0, radius + 6.0, colors::SHIELD, 24));
        }
        vertices.extend(health_bar(monster.pos, radius, monster.health / monster.max_health));
    }

    for projectile in &snapshot.projectiles {
        let radius = 4.0 + projectile.charge_level as f32 * 2.0;
        vertices.extend(circle(projectile.pos, radius, colors::projectile(projectile.kind()), 8));
    }

    let avatar = &snapshot.avatar;
    let radius = PLAYER_SIZE / 2.0;
    vertices.extend(circle(avatar.pos, radius, colors::AVATAR, 20));
    let tip = avatar.pos + crate::direction_from_angle(avatar.aim) * (radius + 12.0);
    vertices.extend(line(avatar.pos, tip, 3.0, colors::AIM));
    if snapshot.hud.charge_level > 0 {
        let outer = radius + 2.0 + 3.0 * snapshot.hud.charge_level as f32;
        vertices.extend(ring(avatar.pos, radius + 2.0, outer, colors::CHARGE, 20));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertex_count() {
        let vertices = circle(Vec2::ZERO, 10.0, colors::AVATAR, 12);
        assert_eq!(vertices.len(), 36);
        for v in vertices.iter().skip(1).step_by(3) {
            let r = Vec2::new(v.position[0], v.position[1]).length();
            assert!((r - 10.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_health_color_gradient() {
        let full = health_color(1.0, 1.0);
        let empty = health_color(0.0, 1.0);
        assert!(full[1] > full[0]);
        assert!(empty[0] > empty[1]);
    }

    #[test]
    fn test_health_bar_scales_fill() {
        let vertices = health_bar(Vec2::new(100.0, 100.0), 10.0, 0.5);
        assert_eq!(vertices.len(), 12);
        let fill_right = vertices[6..]
            .iter()
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max);
        assert!((fill_right - 100.0).abs() < 1e-4);
    }
}
