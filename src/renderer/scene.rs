//! Scene building: game state to a triangle list
//!
//! Drawn as a pseudo-3D track. Lateral road coordinates map to screen x;
//! forward distance to an obstacle maps to depth, where depth 0 is the
//! player's line (`road.y`) and depth 1 is the horizon.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::sim::{
    GameState, Obstacle, ObstacleKind, ParticleTint, RoadGeometry, Side, SplitPhase,
};

/// Horizon height as a fraction of the ground line
const HORIZON_FRACTION: f32 = 0.35;
/// Width at the horizon relative to the near road
const FAR_SCALE: f32 = 0.25;
const EDGE_WIDTH: f32 = 4.0;
const CENTER_LINE_WIDTH: f32 = 3.0;
const PARTICLE_SIZE: f32 = 4.0;

/// Projection from road space to the screen
#[derive(Debug, Clone, Copy)]
struct Perspective {
    center_x: f32,
    ground_y: f32,
    horizon_y: f32,
}

impl Perspective {
    fn new(road: &RoadGeometry) -> Self {
        Self {
            center_x: road.center_x(),
            ground_y: road.y,
            horizon_y: road.y * HORIZON_FRACTION,
        }
    }

    fn scale(&self, depth: f32) -> f32 {
        1.0 - (1.0 - FAR_SCALE) * depth
    }

    fn y(&self, depth: f32) -> f32 {
        self.ground_y - depth * (self.ground_y - self.horizon_y)
    }

    /// Depth of a screen row below the ground line (negative)
    fn depth_at(&self, y: f32) -> f32 {
        (self.ground_y - y) / (self.ground_y - self.horizon_y)
    }

    fn project(&self, lateral_x: f32, depth: f32) -> Vec2 {
        Vec2::new(
            self.center_x + (lateral_x - self.center_x) * self.scale(depth),
            self.y(depth),
        )
    }
}

/// Build the full frame; reads state only
pub fn build(state: &GameState) -> Vec<Vertex> {
    let road = &state.road;
    let view = Perspective::new(road);
    let mut out = Vec::with_capacity(1024);

    out.extend(shapes::gradient_rect(
        0.0,
        0.0,
        road.canvas_width,
        road.canvas_height,
        colors::SKY_TOP,
        colors::SKY_BOTTOM,
    ));

    for element in &state.scenery {
        out.extend(shapes::rect(
            element.x,
            element.y,
            element.width,
            element.height,
            colors::SCENERY,
        ));
    }

    road_surface(state, &view, &mut out);

    // Far obstacles first so near ones overlap them
    let mut obstacles: Vec<&Obstacle> = state.obstacles.iter().collect();
    obstacles.sort_by(|a, b| b.x.total_cmp(&a.x));
    for obstacle in obstacles {
        obstacle_shape(road, &view, obstacle, &mut out);
    }

    player_shape(state, &mut out);

    for particle in &state.particles.particles {
        let tint = match particle.tint {
            ParticleTint::Warning | ParticleTint::Failure => colors::WARNING,
            ParticleTint::Success => colors::SUCCESS,
        };
        out.extend(shapes::rect(
            particle.pos.x,
            particle.pos.y,
            PARTICLE_SIZE,
            PARTICLE_SIZE,
            colors::with_alpha(tint, particle.alpha()),
        ));
    }

    out
}

fn road_surface(state: &GameState, view: &Perspective, out: &mut Vec<Vertex>) {
    let road = &state.road;
    let near = view.depth_at(road.y + road.height);
    let split = &state.split;

    if split.phase == SplitPhase::Normal && split.progress <= 0.0 {
        let left = road.left_x;
        let right = road.left_x + road.width;
        track(view, left, right, near, [colors::ROAD_FAR, colors::ROAD_NEAR], out);

        // Centre line
        out.extend(shapes::line(
            view.project(road.center_x(), 1.0),
            view.project(road.center_x(), near),
            CENTER_LINE_WIDTH,
            colors::CENTER_LINE,
        ));
        return;
    }

    for side in [Side::Left, Side::Right] {
        let (left, right) = branch_span(state, side);
        let far = if split.selected == Some(side) {
            match side {
                Side::Left => colors::BRANCH_LEFT,
                Side::Right => colors::BRANCH_RIGHT,
            }
        } else {
            colors::ROAD_FAR
        };
        track(view, left, right, near, [far, colors::ROAD_NEAR], out);
    }
}

/// Lateral extent of one branch, centred on the line the player follows.
/// Branches narrow from the full road to half its width as they part.
fn branch_span(state: &GameState, side: Side) -> (f32, f32) {
    let road = &state.road;
    let half = road.width / 2.0 - road.width / 4.0 * state.split.progress.clamp(0.0, 1.0);
    let center = state
        .split
        .branch_center_x(road, side, state.tuning.split_offset);
    (center - half, center + half)
}

/// One road strip from the horizon to `near`, with white edges
fn track(
    view: &Perspective,
    left: f32,
    right: f32,
    near: f32,
    [far_color, near_color]: [[f32; 4]; 2],
    out: &mut Vec<Vertex>,
) {
    let corners = [
        view.project(left, 1.0),
        view.project(right, 1.0),
        view.project(right, near),
        view.project(left, near),
    ];
    out.extend(shapes::quad(
        corners,
        [far_color, far_color, near_color, near_color],
    ));
    out.extend(shapes::line(corners[0], corners[3], EDGE_WIDTH, colors::ROAD_EDGE));
    out.extend(shapes::line(corners[1], corners[2], EDGE_WIDTH, colors::ROAD_EDGE));
}

fn obstacle_shape(road: &RoadGeometry, view: &Perspective, obstacle: &Obstacle, out: &mut Vec<Vertex>) {
    let span = road.spawn_x() - road.strike_x();
    if span <= 0.0 {
        return;
    }
    let depth = ((obstacle.x - road.strike_x()) / span).min(1.0);
    let scale = view.scale(depth);
    let base = view.project(road.obstacle_lane_x(obstacle.lane), depth);
    let w = obstacle.width * scale;
    let h = obstacle.height * scale;

    match obstacle.kind {
        ObstacleKind::Block => {
            out.extend(shapes::rect(base.x - w / 2.0, base.y - h, w, h, colors::WARNING));
        }
        ObstacleKind::Spike => out.extend(shapes::triangle(
            Vec2::new(base.x, base.y - h),
            Vec2::new(base.x + w / 2.0, base.y),
            Vec2::new(base.x - w / 2.0, base.y),
            colors::WARNING,
        )),
    }
}

fn player_shape(state: &GameState, out: &mut Vec<Vertex>) {
    let player = &state.player;
    let size = state.stats.size;
    let w = player.scaled_width(size);
    let h = player.scaled_height(size);
    let x = player.x - w / 2.0;
    let body = colors::hex(player.color, 1.0);

    // Motion trail
    out.extend(shapes::rect(
        x - 8.0,
        player.y + 8.0,
        8.0,
        (h - 16.0).max(0.0),
        colors::with_alpha(body, 0x44 as f32 / 255.0),
    ));
    out.extend(shapes::rect(x, player.y, w, h, body));
    out.extend(shapes::circle(
        Vec2::new(player.x, player.y + h / 3.0),
        3.0,
        colors::PLAYER_EYE,
        12,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BurstKind, ScriptedRandom};
    use crate::tuning::Tuning;

    fn playing() -> GameState {
        let mut state = GameState::new(Tuning::default());
        state.start(&[], &mut ScriptedRandom::constant(0.5));
        state
    }

    #[test]
    fn test_build_is_triangle_list() {
        let mut state = playing();
        let mut rng = ScriptedRandom::constant(0.5);
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::spawn(id, &state.road, &mut rng));
        state
            .particles
            .emit(BurstKind::Impact, Vec2::new(100.0, 100.0), &mut rng);

        let verts = build(&state);
        assert!(!verts.is_empty());
        assert_eq!(verts.len() % 3, 0);
        assert!(verts.iter().all(|v| v.color.iter().all(|c| (0.0..=1.0).contains(c))));
    }

    #[test]
    fn test_build_does_not_touch_state() {
        let state = playing();
        let before = serde_json::to_string(&state).expect("serialize");
        let first = build(&state);
        let second = build(&state);
        assert_eq!(first, second);
        assert_eq!(serde_json::to_string(&state).expect("serialize"), before);
    }

    #[test]
    fn test_split_road_draws_two_tracks() {
        let mut state = playing();
        let normal = build(&state).len();
        state.split.begin(1);
        state.split.advance(0.5);
        let split = build(&state).len();
        // Two edged strips (18 each) replace one edged strip plus the centre line (24)
        assert_eq!(split, normal + 12);
    }

    #[test]
    fn test_player_rides_middle_of_branch() {
        let mut state = playing();
        state.split.begin(1);
        state.split.advance(1.0);
        assert!(state.split.split);

        let target = state
            .player
            .target_x(&state.road, &state.split, state.tuning.split_offset);
        let (left, right) = branch_span(&state, Side::Left);
        assert!((target - (left + right) / 2.0).abs() < 1e-3);
        assert!((right - left - state.road.width / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_branches_start_as_full_road() {
        let mut state = playing();
        state.split.begin(1);
        let (left, right) = branch_span(&state, Side::Right);
        assert!((left - state.road.left_x).abs() < 1e-3);
        assert!((right - (state.road.left_x + state.road.width)).abs() < 1e-3);
    }

    #[test]
    fn test_perspective_shrinks_with_depth() {
        let road = RoadGeometry::default();
        let view = Perspective::new(&road);
        assert_eq!(view.y(0.0), road.y);
        assert!(view.y(1.0) < road.y);
        let near = view.project(road.left_x, 0.0);
        let far = view.project(road.left_x, 1.0);
        assert_eq!(near.x, road.left_x);
        assert!(far.x > near.x);
    }
}
