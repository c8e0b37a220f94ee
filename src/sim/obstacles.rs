//! Obstacle generation and world scrolling
//!
//! Obstacles travel along the forward axis from the spawn edge toward the
//! player. Scenery is purely cosmetic and never collides.

use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use super::road::{RoadGeometry, Side};
use crate::consts::*;

/// Obstacle look
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Block,
    Spike,
}

/// Something to jump over or steer around
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Forward coordinate of the leading edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
    /// Obstacle lane, `0..LANE_COUNT`
    pub lane: usize,
}

impl Obstacle {
    /// Spawn at the forward edge of the world
    pub fn spawn(id: u32, road: &RoadGeometry, rng: &mut impl RandomSource) -> Self {
        let lane = rng.index(LANE_COUNT);
        let kind = if rng.coin_flip() {
            ObstacleKind::Block
        } else {
            ObstacleKind::Spike
        };
        Self {
            id,
            x: road.spawn_x(),
            y: road.ground_for(OBSTACLE_HEIGHT),
            width: OBSTACLE_WIDTH,
            height: OBSTACLE_HEIGHT,
            kind,
            lane,
        }
    }

    pub fn bounds(&self) -> super::physics::Rect {
        super::physics::Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Fully behind the player
    #[inline]
    pub fn is_gone(&self) -> bool {
        self.x + self.width <= 0.0
    }
}

/// Move obstacles toward the player and drop the ones that left the world
pub fn scroll_obstacles(obstacles: &mut Vec<Obstacle>, distance: f32) {
    obstacles.retain_mut(|obstacle| {
        obstacle.x -= distance;
        !obstacle.is_gone()
    });
}

/// Keep obstacles on the road after a resize
pub fn relayout_obstacles(obstacles: &mut [Obstacle], from: &RoadGeometry, to: &RoadGeometry) {
    let scale = if from.canvas_width > 0.0 {
        to.canvas_width / from.canvas_width
    } else {
        1.0
    };
    for obstacle in obstacles {
        obstacle.x *= scale;
        obstacle.y = to.ground_for(obstacle.height);
    }
}

/// Cosmetic roadside element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenery {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub side: Side,
}

impl Scenery {
    pub fn spawn(road: &RoadGeometry, rng: &mut impl RandomSource) -> Self {
        let side = if rng.coin_flip() { Side::Left } else { Side::Right };
        let x = match side {
            Side::Left => SCENERY_INSET,
            Side::Right => road.canvas_width - SCENERY_WIDTH - SCENERY_INSET,
        };
        Self {
            x,
            y: road.y + rng.next_unit() * 50.0,
            width: SCENERY_WIDTH,
            height: SCENERY_MIN_HEIGHT + rng.next_unit() * SCENERY_HEIGHT_JITTER,
            side,
        }
    }
}

/// Spawn and drift roadside scenery for one frame
pub fn update_scenery(
    scenery: &mut Vec<Scenery>,
    road: &RoadGeometry,
    chance: f32,
    drift: f32,
    rng: &mut impl RandomSource,
) {
    if rng.chance(chance) {
        scenery.push(Scenery::spawn(road, rng));
    }
    let cull = road.canvas_height + SCENERY_CULL_MARGIN;
    scenery.retain_mut(|element| {
        element.y += drift;
        element.y < cull
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::ScriptedRandom;

    #[test]
    fn test_spawn_at_forward_edge() {
        let road = RoadGeometry::from_canvas(800.0, 600.0);
        let mut rng = ScriptedRandom::new(vec![0.9, 0.2]);
        let obstacle = Obstacle::spawn(1, &road, &mut rng);
        assert_eq!(obstacle.x, 850.0);
        assert_eq!(obstacle.lane, 2);
        assert_eq!(obstacle.kind, ObstacleKind::Block);
        assert_eq!(obstacle.y + obstacle.height, road.y);
    }

    #[test]
    fn test_removed_exactly_when_past_rear_edge() {
        let road = RoadGeometry::from_canvas(800.0, 600.0);
        let mut rng = ScriptedRandom::constant(0.0);
        let mut obstacles = vec![Obstacle::spawn(1, &road, &mut rng)];

        // 850 + 40 = 890 = 178 steps of 5
        for step in 1..=178 {
            scroll_obstacles(&mut obstacles, 5.0);
            if step < 178 {
                assert_eq!(obstacles.len(), 1, "removed early at step {}", step);
                assert!(obstacles[0].x + obstacles[0].width > 0.0);
            }
        }
        assert!(obstacles.is_empty());
    }

    #[test]
    fn test_relayout_moves_to_new_ground() {
        let from = RoadGeometry::from_canvas(800.0, 600.0);
        let to = RoadGeometry::from_canvas(400.0, 500.0);
        let mut rng = ScriptedRandom::constant(0.5);
        let mut obstacles = vec![Obstacle::spawn(1, &from, &mut rng)];
        obstacles[0].x = 400.0;

        relayout_obstacles(&mut obstacles, &from, &to);
        assert_eq!(obstacles[0].x, 200.0);
        assert_eq!(obstacles[0].y + obstacles[0].height, to.y);
    }

    #[test]
    fn test_scenery_drifts_and_culls() {
        let road = RoadGeometry::from_canvas(800.0, 600.0);
        let mut rng = ScriptedRandom::constant(0.0);
        let mut scenery = Vec::new();
        update_scenery(&mut scenery, &road, 1.0, 2.5, &mut rng);
        assert_eq!(scenery.len(), 1);
        assert_eq!(scenery[0].side, Side::Left);

        for _ in 0..1000 {
            update_scenery(&mut scenery, &road, 0.0, 2.5, &mut rng);
        }
        assert!(scenery.is_empty());
    }
}
