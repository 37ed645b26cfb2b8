//! Arrow vs balloon collision
//!
//! Arrows are tested along the segment they travelled this tick, not just at
//! their new position, so a fast (power-up) arrow can't skip over a balloon.

use glam::Vec2;

use super::state::Balloon;

/// Earliest parameter `t` in [0, 1] along segment `a -> b` at which the
/// moving point comes within `radius` of `center`.
///
/// A point already inside the circle hits at `t = 0`. Grazing the circle
/// exactly (tangent) is not a hit.
pub fn segment_circle_hit(a: Vec2, b: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let f = a - center;
    let c = f.length_squared() - radius * radius;
    if c < 0.0 {
        return Some(0.0);
    }

    let d = b - a;
    let qa = d.length_squared();
    if qa <= f32::EPSILON {
        // Not moving and not inside
        return None;
    }

    let qb = 2.0 * f.dot(d);
    let disc = qb * qb - 4.0 * qa * c;
    if disc <= 0.0 {
        return None;
    }

    let t = (-qb - disc.sqrt()) / (2.0 * qa);
    (0.0..=1.0).contains(&t).then_some(t)
}

/// Point-in-balloon test used for a resting arrow
pub fn point_in_balloon(point: Vec2, balloon: &Balloon, radius_scale: f32) -> bool {
    point.distance(balloon.pos) < balloon.size * radius_scale
}

/// All balloons hit by an arrow moving `from -> to`, as `(t, balloon_id)`
/// sorted by time of impact (ties broken by id).
pub fn arrow_hits(from: Vec2, to: Vec2, balloons: &[Balloon], radius_scale: f32) -> Vec<(f32, u32)> {
    let mut hits: Vec<(f32, u32)> = balloons
        .iter()
        .filter_map(|b| {
            segment_circle_hit(from, to, b.pos, b.size * radius_scale).map(|t| (t, b.id))
        })
        .collect();

    hits.sort_by(|x, y| {
        x.0.partial_cmp(&y.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(x.1.cmp(&y.1))
    });
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn balloon(id: u32, x: f32, y: f32) -> Balloon {
        Balloon::new(id, Vec2::new(x, y), 0xff0000, 0.0, 1.2)
    }

    #[test]
    fn test_segment_hits_circle_head_on() {
        let t = segment_circle_hit(Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0), Vec2::ZERO, 1.0)
            .expect("should hit");
        // Enters at x = -1 -> t = 0.4
        assert!((t - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_segment_starting_inside() {
        let t = segment_circle_hit(Vec2::new(0.5, 0.0), Vec2::new(1.0, 0.0), Vec2::ZERO, 1.0);
        assert_eq!(t, Some(0.0));
    }

    #[test]
    fn test_segment_miss_above() {
        let t = segment_circle_hit(Vec2::new(-5.0, 2.0), Vec2::new(5.0, 2.0), Vec2::ZERO, 1.0);
        assert!(t.is_none());
    }

    #[test]
    fn test_segment_stops_short() {
        let t = segment_circle_hit(Vec2::new(-5.0, 0.0), Vec2::new(-2.0, 0.0), Vec2::ZERO, 1.0);
        assert!(t.is_none());
    }

    #[test]
    fn test_tangent_is_not_a_hit() {
        let t = segment_circle_hit(Vec2::new(-5.0, 1.0), Vec2::new(5.0, 1.0), Vec2::ZERO, 1.0);
        assert!(t.is_none());
    }

    #[test]
    fn test_degenerate_segment() {
        assert_eq!(
            segment_circle_hit(Vec2::ZERO, Vec2::ZERO, Vec2::new(0.5, 0.0), 1.0),
            Some(0.0)
        );
        assert!(segment_circle_hit(Vec2::ZERO, Vec2::ZERO, Vec2::new(3.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn test_fast_arrow_cannot_tunnel() {
        // Jumps clean over the balloon's center in one step
        let b = balloon(1, 0.0, 0.0);
        assert!(!point_in_balloon(Vec2::new(-3.0, 0.0), &b, 1.0));
        assert!(!point_in_balloon(Vec2::new(3.0, 0.0), &b, 1.0));
        let hits = arrow_hits(Vec2::new(-3.0, 0.0), Vec2::new(3.0, 0.0), &[b], 1.0);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_arrow_hits_sorted_by_impact() {
        let balloons = vec![balloon(1, 4.0, 0.0), balloon(2, 1.0, 0.5), balloon(3, 2.0, 5.0)];
        let hits = arrow_hits(Vec2::new(-2.0, 0.0), Vec2::new(8.0, 0.0), &balloons, 1.0);
        let ids: Vec<u32> = hits.iter().map(|h| h.1).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_radius_scale_widens_hits() {
        let balloons = vec![balloon(1, 0.0, 2.0)];
        assert!(arrow_hits(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0), &balloons, 1.0).is_empty());
        assert_eq!(
            arrow_hits(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0), &balloons, 2.0).len(),
            1
        );
    }

    proptest! {
        #[test]
        fn endpoint_inside_always_hits(
            ax in -20.0f32..20.0, ay in -10.0f32..10.0,
            bx in -20.0f32..20.0, by in -10.0f32..10.0,
            r in 0.2f32..3.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            // Center placed strictly inside the circle around the endpoint
            let center = b + Vec2::new(r * 0.5, 0.0);
            prop_assert!(segment_circle_hit(a, b, center, r).is_some());
        }

        #[test]
        fn hit_point_is_on_or_inside_circle(
            ax in -20.0f32..-5.0, ay in -3.0f32..3.0,
            len in 0.1f32..30.0,
            cx in -5.0f32..5.0, cy in -3.0f32..3.0,
            r in 0.5f32..2.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = a + Vec2::new(len, 0.0);
            let center = Vec2::new(cx, cy);
            if let Some(t) = segment_circle_hit(a, b, center, r) {
                let p = a.lerp(b, t);
                prop_assert!(p.distance(center) <= r + 1e-3);
            }
        }
    }
}
