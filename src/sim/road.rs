//! Road geometry and the split/merge state machine
//!
//! Geometry is derived from the canvas size and recomputed on resize. The
//! split state machine gates question decisions:
//!
//! `Normal -> Splitting -> Split -> Merging -> Normal`

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Player lane on the unsplit road
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lane {
    Left,
    #[default]
    Center,
    Right,
}

impl Lane {
    /// Lane offset from center in lane spacings
    pub fn offset(self) -> f32 {
        match self {
            Lane::Left => -1.0,
            Lane::Center => 0.0,
            Lane::Right => 1.0,
        }
    }

    /// One lane over, clamped to the road
    pub fn shifted(self, side: Side) -> Self {
        match (self, side) {
            (Lane::Right, Side::Left) => Lane::Center,
            (Lane::Center, Side::Left) | (Lane::Left, Side::Left) => Lane::Left,
            (Lane::Left, Side::Right) => Lane::Center,
            (Lane::Center, Side::Right) | (Lane::Right, Side::Right) => Lane::Right,
        }
    }

    /// Branch this lane rides on a split road
    pub fn branch(self) -> Side {
        match self {
            Lane::Right => Side::Right,
            Lane::Left | Lane::Center => Side::Left,
        }
    }
}

/// Branch of a split road, or the direction of a lane change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Road layout in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadGeometry {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Ground line (top edge of the road surface)
    pub y: f32,
    pub height: f32,
    pub left_x: f32,
    pub width: f32,
}

impl Default for RoadGeometry {
    fn default() -> Self {
        Self::from_canvas(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }
}

impl RoadGeometry {
    pub fn from_canvas(width: f32, height: f32) -> Self {
        Self {
            canvas_width: width,
            canvas_height: height,
            y: height - ROAD_BOTTOM_MARGIN,
            height: ROAD_HEIGHT,
            left_x: width * ROAD_LEFT_FRACTION,
            width: width * ROAD_WIDTH_FRACTION,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.left_x + self.width / 2.0
    }

    /// Distance between player lanes
    #[inline]
    pub fn lane_spacing(&self) -> f32 {
        self.width / 4.0
    }

    /// Width of one obstacle lane
    #[inline]
    pub fn lane_width(&self) -> f32 {
        self.width / LANE_COUNT as f32
    }

    /// Lateral center of an obstacle lane
    pub fn obstacle_lane_x(&self, lane: usize) -> f32 {
        self.left_x + (lane as f32 + 0.5) * self.lane_width()
    }

    /// Lateral target for a player lane on the unsplit road
    pub fn lane_x(&self, lane: Lane) -> f32 {
        self.center_x() + lane.offset() * self.lane_spacing()
    }

    /// Forward coordinate where obstacles meet the player
    #[inline]
    pub fn strike_x(&self) -> f32 {
        self.center_x()
    }

    /// Forward coordinate where obstacles appear
    #[inline]
    pub fn spawn_x(&self) -> f32 {
        self.canvas_width + OBSTACLE_SPAWN_MARGIN
    }

    /// Top-edge y at which a box of `box_height` stands on the road
    #[inline]
    pub fn ground_for(&self, box_height: f32) -> f32 {
        self.y - box_height
    }

    /// Map a lateral coordinate to the same relative spot on another road
    pub fn remap_lateral(&self, x: f32, to: &RoadGeometry) -> f32 {
        let rel = if self.width > 0.0 {
            (x - self.left_x) / self.width
        } else {
            0.5
        };
        to.left_x + rel * to.width
    }
}

/// Split/merge phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SplitPhase {
    #[default]
    Normal,
    Splitting,
    /// Fully split, waiting for a decision or the merge timer
    Split,
    Merging,
}

/// Road split state owned by the question controller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoadSplit {
    pub phase: SplitPhase,
    /// 0 = single road, 1 = fully split
    pub progress: f32,
    /// True from full split until the merge completes
    pub split: bool,
    /// True from question trigger until the merge completes
    pub question_active: bool,
    /// Branch the player committed to
    pub selected: Option<Side>,
    /// Serial of the question this split belongs to
    pub serial: u32,
}

impl RoadSplit {
    /// Start splitting for a new question
    pub fn begin(&mut self, serial: u32) {
        self.phase = SplitPhase::Splitting;
        self.serial = serial;
        self.progress = 0.0;
        self.question_active = true;
        self.selected = None;
    }

    /// Advance the animation by one frame
    pub fn advance(&mut self, step: f32) {
        match self.phase {
            SplitPhase::Splitting => {
                self.progress = (self.progress + step).min(1.0);
                if self.progress >= 1.0 {
                    self.phase = SplitPhase::Split;
                    self.split = true;
                }
            }
            SplitPhase::Merging => {
                self.progress = (self.progress - step).max(0.0);
                if self.progress <= 0.0 {
                    self.phase = SplitPhase::Normal;
                    self.split = false;
                    self.question_active = false;
                    self.selected = None;
                }
            }
            SplitPhase::Normal | SplitPhase::Split => {}
        }
    }

    /// Start merging; only valid from a full split
    pub fn begin_merge(&mut self) -> bool {
        if self.phase == SplitPhase::Split {
            self.phase = SplitPhase::Merging;
            true
        } else {
            false
        }
    }

    /// Lateral offset of each branch from the road centre
    pub fn branch_offset(&self, full_offset: f32) -> f32 {
        full_offset * self.progress
    }

    /// Lateral centre of one branch; the player rides this line while split
    pub fn branch_center_x(&self, road: &RoadGeometry, side: Side, full_offset: f32) -> f32 {
        road.center_x() + side.sign() * self.branch_offset(full_offset)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_from_canvas() {
        let road = RoadGeometry::from_canvas(1000.0, 600.0);
        assert_eq!(road.y, 400.0);
        assert_eq!(road.left_x, 200.0);
        assert_eq!(road.width, 600.0);
        assert_eq!(road.center_x(), 500.0);
        assert_eq!(road.lane_x(Lane::Left), 350.0);
        assert_eq!(road.lane_x(Lane::Right), 650.0);
        assert_eq!(road.obstacle_lane_x(0), 300.0);
        assert_eq!(road.obstacle_lane_x(2), 700.0);
    }

    #[test]
    fn test_remap_lateral_keeps_relative_spot() {
        let from = RoadGeometry::from_canvas(800.0, 600.0);
        let to = RoadGeometry::from_canvas(1200.0, 600.0);
        let x = from.lane_x(Lane::Right);
        assert!((from.remap_lateral(x, &to) - to.lane_x(Lane::Right)).abs() < 1e-3);
    }

    #[test]
    fn test_lane_shift_bounded() {
        assert_eq!(Lane::Left.shifted(Side::Left), Lane::Left);
        assert_eq!(Lane::Left.shifted(Side::Right), Lane::Center);
        assert_eq!(Lane::Right.shifted(Side::Right), Lane::Right);
        assert_eq!(Lane::Center.shifted(Side::Left), Lane::Left);
    }

    #[test]
    fn test_split_cycle() {
        let mut road = RoadSplit::default();
        road.begin(1);
        assert_eq!(road.phase, SplitPhase::Splitting);
        assert!(road.question_active);

        let mut ticks = 0;
        while road.phase == SplitPhase::Splitting {
            let before = road.progress;
            road.advance(0.02);
            assert!(road.progress >= before);
            ticks += 1;
        }
        assert_eq!(road.phase, SplitPhase::Split);
        assert!(road.split);
        assert!((49..=51).contains(&ticks));

        // Split holds until merge is requested
        road.advance(0.02);
        assert_eq!(road.progress, 1.0);

        road.selected = Some(Side::Left);
        assert!(road.begin_merge());
        while road.phase == SplitPhase::Merging {
            let before = road.progress;
            road.advance(0.02);
            assert!(road.progress <= before);
        }
        assert_eq!(road.phase, SplitPhase::Normal);
        assert!(!road.split);
        assert!(!road.question_active);
        assert_eq!(road.selected, None);
        assert_eq!(road.progress, 0.0);
    }

    #[test]
    fn test_merge_only_from_split() {
        let mut road = RoadSplit::default();
        assert!(!road.begin_merge());
        road.begin(1);
        assert!(!road.begin_merge());
        assert_eq!(road.phase, SplitPhase::Splitting);
    }
}
