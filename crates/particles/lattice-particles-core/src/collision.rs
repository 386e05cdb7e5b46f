//! Layer obstacles and particle-particle contacts.

use hashbrown::HashMap;

use crate::config::{CollisionConfig, RectCollider};
use crate::particle::Particle;

#[inline]
fn radius(p: &Particle, cfg: &CollisionConfig) -> f32 {
    p.size * cfg.radius_scale
}

/// Push particles out of rectangles along the shallowest axis and reflect the
/// matching velocity component.
pub(crate) fn resolve_colliders(particles: &mut [Particle], cfg: &CollisionConfig) {
    for rect in &cfg.colliders {
        for p in particles.iter_mut() {
            push_out(p, rect, radius(p, cfg), cfg.restitution);
        }
    }
}

fn push_out(p: &mut Particle, rect: &RectCollider, r: f32, restitution: f32) {
    let (left, right) = (rect.x - r, rect.x + rect.width + r);
    let (top, bottom) = (rect.y - r, rect.y + rect.height + r);
    if p.x <= left || p.x >= right || p.y <= top || p.y >= bottom {
        return;
    }
    let candidates = [
        (p.x - left, 0u8),
        (right - p.x, 1),
        (p.y - top, 2),
        (bottom - p.y, 3),
    ];
    let mut best = candidates[0];
    for c in &candidates[1..] {
        if c.0 < best.0 {
            best = *c;
        }
    }
    match best.1 {
        0 => {
            p.x = left;
            if p.vx > 0.0 {
                p.vx = -p.vx * restitution;
            }
        }
        1 => {
            p.x = right;
            if p.vx < 0.0 {
                p.vx = -p.vx * restitution;
            }
        }
        2 => {
            p.y = top;
            if p.vy > 0.0 {
                p.vy = -p.vy * restitution;
            }
        }
        _ => {
            p.y = bottom;
            if p.vy < 0.0 {
                p.vy = -p.vy * restitution;
            }
        }
    }
}

type Cell = (i32, i32);

#[inline]
fn cell_of(x: f32, y: f32, size: f32) -> Cell {
    ((x / size).floor() as i32, (y / size).floor() as i32)
}

/// Equal-mass elastic contacts between overlapping particles.
///
/// Pairs are resolved in ascending `(i, j)` index order, independent of the
/// grid's hash iteration order.
pub(crate) fn resolve_particles(particles: &mut [Particle], cfg: &CollisionConfig) {
    if particles.len() < 2 {
        return;
    }
    let max_r = particles
        .iter()
        .map(|p| radius(p, cfg))
        .fold(0.0f32, f32::max);
    if max_r <= 0.0 {
        return;
    }
    let cell = (max_r * 2.0).max(1.0);

    let mut grid: HashMap<Cell, Vec<usize>> = HashMap::new();
    for (i, p) in particles.iter().enumerate() {
        grid.entry(cell_of(p.x, p.y, cell)).or_default().push(i);
    }

    let mut neighbors = Vec::new();
    for i in 0..particles.len() {
        let (cx, cy) = cell_of(particles[i].x, particles[i].y, cell);
        neighbors.clear();
        for dy in -1..=1 {
            for dx in -1..=1 {
                if let Some(bucket) = grid.get(&(cx.saturating_add(dx), cy.saturating_add(dy))) {
                    neighbors.extend(bucket.iter().copied().filter(|&j| j > i));
                }
            }
        }
        neighbors.sort_unstable();
        neighbors.dedup();
        for &j in &neighbors {
            let (head, tail) = particles.split_at_mut(j);
            contact(&mut head[i], &mut tail[0], cfg);
        }
    }
}

fn contact(a: &mut Particle, b: &mut Particle, cfg: &CollisionConfig) {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let dist = (dx * dx + dy * dy).sqrt();
    let reach = radius(a, cfg) + radius(b, cfg);
    if dist >= reach || dist <= f32::EPSILON {
        return;
    }
    let (nx, ny) = (dx / dist, dy / dist);
    let half = (reach - dist) * 0.5;
    a.x -= nx * half;
    a.y -= ny * half;
    b.x += nx * half;
    b.y += ny * half;

    let vn = (b.vx - a.vx) * nx + (b.vy - a.vy) * ny;
    if vn < 0.0 {
        let impulse = -(1.0 + cfg.restitution) * vn * 0.5;
        a.vx -= impulse * nx;
        a.vy -= impulse * ny;
        b.vx += impulse * nx;
        b.vy += impulse * ny;
    }
}
