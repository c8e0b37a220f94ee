//! Player physics and collision boxes
//!
//! Lateral motion eases toward a lane target; vertical motion is simple
//! gravity integration clamped to the road surface.

use serde::{Deserialize, Serialize};

use super::road::{Lane, RoadGeometry, RoadSplit, Side};
use crate::consts::{PLAYER_HEIGHT, PLAYER_WIDTH};

/// Axis-aligned box (x right, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Strict overlap; touching edges do not collide
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Lateral position on the road (box centre)
    pub x: f32,
    /// Top edge of the bounding box
    pub y: f32,
    pub vel_y: f32,
    pub on_ground: bool,
    pub lane: Lane,
    /// Unscaled box size
    pub width: f32,
    pub height: f32,
    /// Cosmetic tint (RGB hex)
    pub color: u32,
}

impl Player {
    pub const COLOR: u32 = 0x00ffff;

    /// A player standing in the centre lane
    pub fn new(road: &RoadGeometry, size: f32) -> Self {
        let mut player = Self {
            x: road.center_x(),
            y: 0.0,
            vel_y: 0.0,
            on_ground: true,
            lane: Lane::Center,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            color: Self::COLOR,
        };
        player.y = player.ground(road, size);
        player
    }

    #[inline]
    pub fn scaled_width(&self, size: f32) -> f32 {
        self.width * size
    }

    #[inline]
    pub fn scaled_height(&self, size: f32) -> f32 {
        self.height * size
    }

    /// Highest allowed `y` (standing on the road)
    #[inline]
    pub fn ground(&self, road: &RoadGeometry, size: f32) -> f32 {
        road.ground_for(self.scaled_height(size))
    }

    /// Jump if standing and not locked by a question; airborne requests are dropped
    pub fn try_jump(&mut self, jump_velocity: f32, question_active: bool) -> bool {
        if !self.on_ground || question_active {
            return false;
        }
        self.vel_y = jump_velocity;
        self.on_ground = false;
        true
    }

    /// Change lane by one, bounded to the road
    pub fn shift_lane(&mut self, side: Side) {
        self.lane = self.lane.shifted(side);
    }

    /// Lateral target for the current lane and road shape
    pub fn target_x(&self, road: &RoadGeometry, split: &RoadSplit, split_offset: f32) -> f32 {
        if split.split {
            let branch = split.selected.unwrap_or_else(|| self.lane.branch());
            split.branch_center_x(road, branch, split_offset)
        } else {
            road.lane_x(self.lane)
        }
    }

    /// One frame of motion
    pub fn advance(
        &mut self,
        road: &RoadGeometry,
        split: &RoadSplit,
        size: f32,
        tuning: &crate::Tuning,
    ) {
        let target = self.target_x(road, split, tuning.split_offset);
        self.x += (target - self.x) * tuning.lane_follow;

        self.vel_y += tuning.gravity;
        self.y += self.vel_y;
        self.clamp_to_ground(road, size);
    }

    /// Enforce the ground invariant
    pub fn clamp_to_ground(&mut self, road: &RoadGeometry, size: f32) {
        let ground = self.ground(road, size);
        if self.y >= ground {
            self.y = ground;
            self.vel_y = 0.0;
            self.on_ground = true;
        }
    }

    /// Collision box; `strike_x` is the forward coordinate of the player
    pub fn bounds(&self, strike_x: f32, size: f32) -> Rect {
        let w = self.scaled_width(size);
        Rect::new(strike_x - w / 2.0, self.y, w, self.scaled_height(size))
    }

    /// Follow a road resize, keeping lane and relative lateral spot
    pub fn relayout(&mut self, from: &RoadGeometry, to: &RoadGeometry, size: f32) {
        self.x = from.remap_lateral(self.x, to);
        if self.on_ground {
            self.y = self.ground(to, size);
        } else {
            self.y += to.y - from.y;
            self.clamp_to_ground(to, size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;

    fn road() -> RoadGeometry {
        RoadGeometry::from_canvas(800.0, 600.0)
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Touching edges do not collide
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_jump_only_from_ground() {
        let road = road();
        let tuning = Tuning::default();
        let mut player = Player::new(&road, 1.0);

        assert!(player.try_jump(tuning.jump_velocity, false));
        assert_eq!(player.vel_y, tuning.jump_velocity);
        assert!(!player.on_ground);

        // No double jump, no queueing
        player.advance(&road, &RoadSplit::default(), 1.0, &tuning);
        let vel = player.vel_y;
        assert!(!player.try_jump(tuning.jump_velocity, false));
        assert_eq!(player.vel_y, vel);
    }

    #[test]
    fn test_jump_blocked_during_question() {
        let mut player = Player::new(&road(), 1.0);
        assert!(!player.try_jump(-15.0, true));
        assert!(player.on_ground);
    }

    #[test]
    fn test_jump_lands_back_on_ground() {
        let road = road();
        let tuning = Tuning::default();
        let mut player = Player::new(&road, 1.0);
        let ground = player.ground(&road, 1.0);
        player.try_jump(tuning.jump_velocity, false);

        let mut peak = ground;
        for _ in 0..200 {
            player.advance(&road, &RoadSplit::default(), 1.0, &tuning);
            assert!(player.y <= ground);
            peak = peak.min(player.y);
        }
        assert!(player.on_ground);
        assert_eq!(player.y, ground);
        assert!(ground - peak > 100.0);
    }

    #[test]
    fn test_lane_easing() {
        let road = road();
        let tuning = Tuning::default();
        let mut player = Player::new(&road, 1.0);
        player.shift_lane(Side::Right);

        let target = road.lane_x(Lane::Right);
        for _ in 0..100 {
            player.advance(&road, &RoadSplit::default(), 1.0, &tuning);
        }
        assert!((player.x - target).abs() < 0.5);
    }

    #[test]
    fn test_split_target_follows_selected_branch() {
        let road = road();
        let mut split = RoadSplit {
            progress: 1.0,
            split: true,
            ..RoadSplit::default()
        };
        let player = Player::new(&road, 1.0);

        // Centre lane rides the left branch until a side is chosen
        assert_eq!(player.target_x(&road, &split, 100.0), road.center_x() - 100.0);
        split.selected = Some(Side::Right);
        assert_eq!(player.target_x(&road, &split, 100.0), road.center_x() + 100.0);
    }

    #[test]
    fn test_relayout_keeps_relative_position() {
        let from = road();
        let to = RoadGeometry::from_canvas(1200.0, 500.0);
        let mut player = Player::new(&from, 1.0);
        player.lane = Lane::Left;
        player.x = from.lane_x(Lane::Left);

        player.relayout(&from, &to, 1.0);
        assert_eq!(player.lane, Lane::Left);
        assert!((player.x - to.lane_x(Lane::Left)).abs() < 1e-3);
        assert_eq!(player.y, player.ground(&to, 1.0));
    }
}
