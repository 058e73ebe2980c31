//! Viewport rendering with visibility culling.
//!
//! Output is `height` newline-terminated rows of `width` glyphs. Screen
//! position `(x, y)`, both 1-based, maps to world coordinate
//! `(x + pos.x - vw/2, y + pos.y - vh/2)` where `pos` is the viewer's
//! position and `vw`/`vh` its own stored viewport, so the viewer sits at
//! the centre of the window it asked for at creation or last resize.
//!
//! Each glyph is chosen by the first rule that applies:
//!
//! 1. the viewer's overlay, where it has a glyph;
//! 2. fog, where the map has no cell;
//! 3. fog, outside the visibility radius around the viewer;
//! 4. the occupant's glyph;
//! 5. the terrain glyph.

use gridworld_types::{ActorId, Coord, Viewport};
use gridworld_world::Overlay;

use crate::config::RenderConfig;
use crate::world::World;

/// Render `size` glyphs of the world around `viewer`.
///
/// An unknown viewer is treated as an observer standing on the spawn cell
/// with no overlay, using `size` as its viewport. Rendering never mutates
/// the world.
pub fn render_view(world: &World, viewer: &ActorId, size: Viewport) -> String {
    let (centre, anchor, overlay) = world.actor(viewer).map_or_else(
        || (world.config().world.spawn, size, None),
        |actor| (actor.position, actor.viewport, actor.overlay.as_ref()),
    );
    let (half_w, half_h) = anchor.half();
    let origin_x = centre.x.saturating_sub(half_w);
    let origin_y = centre.y.saturating_sub(half_h);
    let settings = &world.config().render;

    let row_len = usize::from(size.width).saturating_add(1);
    let mut out = String::with_capacity(row_len.saturating_mul(usize::from(size.height)));
    for y in 1..=i32::from(size.height) {
        for x in 1..=i32::from(size.width) {
            let at = Coord::new(x.saturating_add(origin_x), y.saturating_add(origin_y));
            out.push(glyph_at(world, overlay, settings, (x, y), at, centre));
        }
        out.push('\n');
    }
    out
}

fn glyph_at(
    world: &World,
    overlay: Option<&Overlay>,
    settings: &RenderConfig,
    (screen_x, screen_y): (i32, i32),
    at: Coord,
    centre: Coord,
) -> char {
    if let Some(glyph) = overlay.and_then(|o| o.glyph_at(screen_x, screen_y)) {
        return glyph;
    }
    let Some(cell) = world.map().get(at) else {
        return settings.fog_glyph;
    };
    if at.x.abs_diff(centre.x) > settings.visibility_x
        || at.y.abs_diff(centre.y) > settings.visibility_y
    {
        return settings.fog_glyph;
    }
    match &cell.occupant {
        Some(id) => world.actor(id).map_or(cell.glyph, |a| a.glyph),
        None => cell.glyph,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use gridworld_world::parse_map;
    use tokio::time::Instant;

    use super::*;
    use crate::config::GridworldConfig;
    use crate::tick::apply_command;
    use crate::world::tests::{admit_player, test_world};

    fn rows(frame: &str) -> Vec<Vec<char>> {
        frame.lines().map(|l| l.chars().collect()).collect()
    }

    #[test]
    fn frame_has_requested_shape() {
        let world = test_world(GridworldConfig::default());
        let frame = render_view(&world, &ActorId::new("nobody"), Viewport::new(7, 4));
        assert!(frame.ends_with('\n'));
        let rows = rows(&frame);
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.len() == 7));
    }

    #[test]
    fn viewer_sits_at_the_centre() {
        let mut world = test_world(GridworldConfig::default());
        let id = admit_player(&mut world, "alice", Coord::new(3, 3));
        apply_command(&mut world, &id, ">clear", Instant::now());
        apply_command(&mut world, &id, ">resize 5 5", Instant::now());
        let glyph = world.actor(&id).unwrap().glyph;

        let frame = render_view(&world, &id, Viewport::new(5, 5));
        let rows = rows(&frame);
        // Origin is (3 - 2, 3 - 2), so the viewer at (3,3) lands on screen (2,2).
        assert_eq!(rows.get(1).and_then(|r| r.get(1)), Some(&glyph));
        // Screen (1,1) is world (2,2): floor.
        assert_eq!(rows.first().and_then(|r| r.first()), Some(&' '));
        // Screen (5,5) is world (6,6): outside the 6x5 map.
        assert_eq!(rows.get(4).and_then(|r| r.get(4)), Some(&'·'));
    }

    #[test]
    fn overlay_wins_over_world() {
        let mut world = test_world(GridworldConfig::default());
        let id = admit_player(&mut world, "alice", Coord::new(2, 3));
        let frame = render_view(&world, &id, Viewport::new(20, 10));
        let rows = rows(&frame);
        // Help card: blank first row, frame corner at (1,2).
        assert_eq!(rows.get(1).and_then(|r| r.first()), Some(&'┌'));

        apply_command(&mut world, &id, ">clear", Instant::now());
        let frame = render_view(&world, &id, Viewport::new(20, 10));
        assert!(!frame.contains('┌'));
    }

    #[test]
    fn cells_beyond_visibility_are_fogged() {
        let mut config = GridworldConfig::default();
        config.render.visibility_x = 1;
        config.render.visibility_y = 1;
        let line = " ".repeat(9);
        let text = [line.as_str(); 9].join("\n");
        let mut world = World::new(parse_map(&text).unwrap(), Arc::new(config));
        let id = admit_player(&mut world, "alice", Coord::new(5, 5));
        apply_command(&mut world, &id, ">clear", Instant::now());
        apply_command(&mut world, &id, ">resize 9 9", Instant::now());

        let frame = render_view(&world, &id, Viewport::new(9, 9));
        let rows = rows(&frame);
        // Screen (x, y) is world (x + 1, y + 1); only the 3x3 block around
        // (5,5) is visible.
        assert_eq!(rows.get(2).and_then(|r| r.get(2)), Some(&' '));
        assert_eq!(rows.get(3).and_then(|r| r.get(1)), Some(&'·'));
        assert_eq!(rows.get(5).and_then(|r| r.get(3)), Some(&'·'));
    }

    #[test]
    fn rendering_does_not_mutate() {
        let mut world = test_world(GridworldConfig::default());
        let id = admit_player(&mut world, "alice", Coord::new(2, 3));
        let before = world.summaries();
        let first = render_view(&world, &id, Viewport::new(12, 6));
        let second = render_view(&world, &id, Viewport::new(12, 6));
        assert_eq!(first, second);
        assert_eq!(before, world.summaries());
    }

    #[test]
    fn zero_height_is_empty() {
        let world = test_world(GridworldConfig::default());
        let id = ActorId::new("x");
        assert!(render_view(&world, &id, Viewport::new(10, 0)).is_empty());
        assert_eq!(render_view(&world, &id, Viewport::new(0, 2)), "\n\n");
    }
}
