//! Per-frame simulation tick
//!
//! Advances one run by exactly one display frame. Side effects (life loss,
//! question resolution, end of run) happen synchronously inside the tick and
//! are reported as events.

use glam::Vec2;

use super::obstacles::{Obstacle, scroll_obstacles, update_scenery};
use super::particles::BurstKind;
use super::question::{ActiveQuestion, Verdict, apply_verdict};
use super::random::RandomSource;
use super::road::{Lane, Side, SplitPhase};
use super::schedule::Deferred;
use super::state::{GameEvent, GamePhase, GameState, Outcome};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (Space / W / ArrowUp)
    pub jump: bool,
    /// Left lane or left branch (A / ArrowLeft)
    pub left: bool,
    /// Right lane or right branch (D / ArrowRight)
    pub right: bool,
}

impl TickInput {
    /// Requested direction; opposing presses cancel out
    pub fn side(&self) -> Option<Side> {
        match (self.left, self.right) {
            (true, false) => Some(Side::Left),
            (false, true) => Some(Side::Right),
            _ => None,
        }
    }
}

/// Advance the game state by one frame
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    now_ms: f64,
    rng: &mut impl RandomSource,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Playing {
        return events;
    }
    state.time_ticks += 1;

    for deferred in state.scheduler.take_due(now_ms) {
        run_deferred(state, deferred, &mut events);
    }

    // Forward progress
    let step = state.effective_speed();
    state.distance += step;
    state.stats.score += step.floor() as u64;

    state.split.advance(state.tuning.split_step);

    // Decisions take over lane input while the road is split
    if state.awaiting_decision() {
        if let Some(side) = input.side() {
            resolve_question(state, side, now_ms, rng, &mut events);
            if state.phase != GamePhase::Playing {
                return events;
            }
        }
    } else if let Some(side) = input.side() {
        if state.split.phase != SplitPhase::Split {
            state.player.shift_lane(side);
        }
    }
    maybe_trigger_question(state, rng, &mut events);

    // Player
    if input.jump {
        let jump_velocity = state.tuning.jump_velocity;
        state
            .player
            .try_jump(jump_velocity, state.split.question_active);
    }
    state
        .player
        .advance(&state.road, &state.split, state.stats.size, &state.tuning);

    // Obstacles
    scroll_obstacles(&mut state.obstacles, step * state.tuning.scroll_factor);
    check_obstacle_collisions(state, rng, &mut events);
    if state.phase != GamePhase::Playing {
        return events;
    }

    state.particles.update();

    // Generation pauses while a question is on the road
    if !state.split.question_active
        && rng.chance(state.tuning.spawn_chance(state.stats.speed_multiplier))
    {
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::spawn(id, &state.road, rng));
    }
    let drift = state.speed * state.tuning.scenery_drift;
    update_scenery(
        &mut state.scenery,
        &state.road,
        state.tuning.scenery_chance,
        drift,
        rng,
    );

    if state.distance >= state.tuning.max_distance {
        state.end_game(Outcome::Win, &mut events);
    }

    events
}

fn run_deferred(state: &mut GameState, deferred: Deferred, events: &mut Vec<GameEvent>) {
    match deferred {
        Deferred::BeginMerge { serial } => begin_merge(state, serial, events),
    }
}

/// Merge the road back, unless the split belongs to another question
fn begin_merge(state: &mut GameState, serial: u32, events: &mut Vec<GameEvent>) {
    if state.split.serial != serial || state.split.selected.is_none() {
        log::debug!("Dropping stale merge for question {}", serial);
        return;
    }
    if state.split.begin_merge() {
        state.player.lane = Lane::Center;
        events.push(GameEvent::MergeStarted { serial });
    }
}

fn maybe_trigger_question(
    state: &mut GameState,
    rng: &mut impl RandomSource,
    events: &mut Vec<GameEvent>,
) {
    if state.split.phase != SplitPhase::Normal
        || state.split.question_active
        || state.question.is_some()
        || state.pool.is_empty()
    {
        return;
    }
    if state.distance - state.last_question_distance < state.tuning.question_interval {
        return;
    }
    let Some(record) = state.pool.draw() else {
        return;
    };

    let serial = state.next_question_serial();
    let question = ActiveQuestion::new(serial, record, rng);
    log::info!(
        "Question {} at {} km, safe side {}",
        serial,
        state.distance_km(),
        question.correct_side.as_str()
    );
    state.split.begin(serial);
    state.last_question_distance = state.distance;
    state.question = Some(question);
    events.push(GameEvent::QuestionStarted { serial });
}

fn resolve_question(
    state: &mut GameState,
    side: Side,
    now_ms: f64,
    rng: &mut impl RandomSource,
    events: &mut Vec<GameEvent>,
) {
    let Some(question) = state.question.take() else {
        return;
    };
    let serial = question.serial;
    let correct = question.is_correct(side);

    state.split.selected = Some(side);
    state.player.lane = Lane::Center;

    let verdict = apply_verdict(&mut state.stats, correct, &state.tuning);
    state.player.clamp_to_ground(&state.road, state.stats.size);
    let origin = player_center(state);
    state
        .particles
        .emit(BurstKind::Bonus { correct }, origin, rng);

    log::info!(
        "Question {} answered {} ({})",
        serial,
        side.as_str(),
        if correct { "correct" } else { "wrong" }
    );
    events.push(GameEvent::QuestionAnswered { serial, correct });

    if state.tuning.merge_delay_ms <= 0.0 {
        begin_merge(state, serial, events);
    } else {
        state.scheduler.schedule(
            now_ms + state.tuning.merge_delay_ms,
            Deferred::BeginMerge { serial },
        );
    }

    if verdict == Verdict::Penalty {
        state.after_life_lost(events);
    }
}

/// First obstacle hit this frame costs a life and is removed
fn check_obstacle_collisions(
    state: &mut GameState,
    rng: &mut impl RandomSource,
    events: &mut Vec<GameEvent>,
) {
    let player_box = state.player.bounds(state.road.strike_x(), state.stats.size);
    let tolerance = state.road.lane_width() / 2.0;
    let player_x = state.player.x;

    let hit = state.obstacles.iter().position(|obstacle| {
        let lane_gap = (player_x - state.road.obstacle_lane_x(obstacle.lane)).abs();
        lane_gap < tolerance && player_box.intersects(&obstacle.bounds())
    });

    if let Some(index) = hit {
        let obstacle = state.obstacles.remove(index);
        events.push(GameEvent::ObstacleHit { id: obstacle.id });
        let origin = player_center(state);
        state.particles.emit(BurstKind::Impact, origin, rng);
        state.lose_life(events);
    }
}

fn player_center(state: &GameState) -> Vec2 {
    let player = &state.player;
    Vec2::new(
        player.x,
        player.y + player.scaled_height(state.stats.size) / 2.0,
    )
}
