//! Per-frame simulation tick
//!
//! Advances the game by one step as a pure function of the previous state, the
//! frame's input and an injected jitter source.

use glam::Vec2;

use super::collision::{
    ball_out_of_bounds, ball_paddle_collision, ball_wall_collision, first_brick_hit,
    reflect_velocity,
};
use super::jitter::JitterSource;
use super::rect::Rect;
use super::state::{Brick, GameEvent, GamePhase, GameState, Playfield};
use crate::consts::*;

/// Input captured by the host for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Pointer x in playfield pixels (None until the pointer has been seen)
    pub pointer_x: Option<f32>,
}

impl TickInput {
    pub fn pointer(x: f32) -> Self {
        Self { pointer_x: Some(x) }
    }
}

/// Advance the game state by one tick
///
/// Steps run in a fixed order: move, walls, paddle, bricks, clear check,
/// bottom check, paddle tracking. Wall, paddle and brick checks are all
/// evaluated; only the brick scan stops at its first hit. A stopped state is
/// returned unchanged.
pub fn tick(state: &GameState, input: &TickInput, jitter: &mut impl JitterSource) -> GameState {
    let mut next = state.clone();
    if state.is_stopped() {
        return next;
    }

    next.events.clear();
    next.ticks += 1;

    let ball = &mut next.ball;
    ball.pos += ball.vel;

    let walls = ball_wall_collision(ball, next.playfield);
    if walls.side {
        ball.vel = reflect_velocity(ball.vel, Vec2::X);
        next.events.push(GameEvent::WallBounce);
    }
    if walls.top {
        ball.vel = reflect_velocity(ball.vel, Vec2::Y);
        next.events.push(GameEvent::CeilingBounce);
    }

    if ball_paddle_collision(ball, &next.paddle) {
        ball.vel = reflect_velocity(ball.vel, Vec2::Y);
        ball.vel.x += jitter.jitter();
        next.events.push(GameEvent::PaddleHit);
    }

    if let Some(index) = first_brick_hit(ball, &next.bricks) {
        let brick = next.bricks.remove(index);
        ball.vel = reflect_velocity(ball.vel, Vec2::Y);
        ball.vel.x += jitter.jitter();
        log::debug!(
            "Brick {} destroyed at ({}, {}), {} left",
            index,
            brick.rect.left(),
            brick.rect.top(),
            next.bricks.len()
        );
        next.events.push(GameEvent::BrickDestroyed {
            index,
            color: brick.color,
        });
    }

    if next.bricks.is_empty() {
        next.phase = GamePhase::Cleared;
        next.events.push(GameEvent::Cleared);
        log::info!("All bricks cleared after {} ticks", next.ticks);
    }

    if ball_out_of_bounds(&next.ball, next.playfield) && next.phase == GamePhase::Playing {
        next.phase = GamePhase::Lost;
        next.events.push(GameEvent::BallLost);
        log::info!(
            "Ball lost after {} ticks with {} bricks left",
            next.ticks,
            next.bricks.len()
        );
    }

    let playfield = next.playfield;
    if let Some(x) = input.pointer_x.filter(|&x| playfield.contains_x(x)) {
        next.paddle.track(x);
    }

    next
}

/// Build the brick grid for a playfield
///
/// Five rows; as many columns as fit the width. Bricks are stored row by row
/// and colored cyclically through the palette.
pub fn generate_bricks(playfield: Playfield) -> Vec<Brick> {
    let columns = playfield.columns();
    let palette_len = BRICK_PALETTE.len() as u32;

    let mut bricks = Vec::with_capacity((BRICK_ROWS * columns) as usize);
    for row in 0..BRICK_ROWS {
        for col in 0..columns {
            let x = col as f32 * (BRICK_WIDTH + BRICK_GAP) + BRICK_LEFT_OFFSET;
            let y = row as f32 * (BRICK_HEIGHT + BRICK_GAP) + BRICK_TOP_OFFSET;
            bricks.push(Brick {
                rect: Rect::new(x, y, BRICK_WIDTH, BRICK_HEIGHT),
                color: ((row * columns + col) % palette_len) as u8,
            });
        }
    }
    bricks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::jitter::{FixedJitter, SeededJitter};
    use crate::sim::state::Ball;
    use proptest::prelude::*;

    const EPS: f32 = 1e-4;

    fn field() -> Playfield {
        Playfield::new(800, 600)
    }

    /// State with the ball placed so that after moving it lands on `target`
    fn state_with_ball_landing_at(target: Vec2, vel: Vec2) -> GameState {
        let mut state = GameState::new(field());
        state.ball = Ball {
            pos: target - vel,
            vel,
            radius: BALL_RADIUS,
        };
        state
    }

    #[test]
    fn test_generate_bricks_grid() {
        let bricks = generate_bricks(field());
        assert_eq!(bricks.len(), 65);

        // Row-major: first brick top-left, 14th brick starts row 1
        assert_eq!(bricks[0].rect, Rect::new(5.0, 30.0, 50.0, 20.0));
        assert_eq!(bricks[1].rect.left(), 65.0);
        assert_eq!(bricks[12].rect.left(), 725.0);
        assert_eq!(bricks[13].rect, Rect::new(5.0, 60.0, 50.0, 20.0));
        assert_eq!(bricks[64].rect, Rect::new(725.0, 150.0, 50.0, 20.0));

        // Colors cycle through the palette across row boundaries
        assert_eq!(bricks[0].color, 0);
        assert_eq!(bricks[9].color, 9);
        assert_eq!(bricks[10].color, 0);
        assert_eq!(bricks[13].color, 3);
    }

    #[test]
    fn test_generate_bricks_degenerate_width() {
        assert!(generate_bricks(Playfield::new(0, 0)).is_empty());
        assert!(generate_bricks(Playfield::new(59, 600)).is_empty());
        assert_eq!(generate_bricks(Playfield::new(60, 600)).len(), 5);
    }

    #[test]
    fn test_tick_moves_ball_by_velocity() {
        let state = GameState::new(field());
        let next = tick(&state, &TickInput::default(), &mut FixedJitter(0.0));

        assert_eq!(next.ball.pos, Vec2::new(410.0, 290.0));
        assert_eq!(next.ball.vel, Vec2::new(10.0, -10.0));
        assert_eq!(next.ticks, 1);
        assert!(next.events.is_empty());
        assert_eq!(next.bricks.len(), 65);
        // Input state untouched
        assert_eq!(state.ball.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.ticks, 0);
    }

    #[test]
    fn test_side_wall_flips_vx_only() {
        let state = state_with_ball_landing_at(Vec2::new(795.0, 300.0), Vec2::new(10.0, -10.0));
        let next = tick(&state, &TickInput::default(), &mut FixedJitter(0.0));

        assert_eq!(next.ball.vel, Vec2::new(-10.0, -10.0));
        assert_eq!(next.events, vec![GameEvent::WallBounce]);
    }

    #[test]
    fn test_left_wall_flips_vx() {
        let state = state_with_ball_landing_at(Vec2::new(5.0, 300.0), Vec2::new(-10.0, 10.0));
        let next = tick(&state, &TickInput::default(), &mut FixedJitter(0.0));
        assert_eq!(next.ball.vel, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_ceiling_flips_vy_only() {
        let mut state =
            state_with_ball_landing_at(Vec2::new(400.0, 5.0), Vec2::new(10.0, -10.0));
        state.bricks.clear();
        state.bricks.push(Brick {
            rect: Rect::new(0.0, 400.0, BRICK_WIDTH, BRICK_HEIGHT),
            color: 0,
        });
        let next = tick(&state, &TickInput::default(), &mut FixedJitter(0.0));

        assert_eq!(next.ball.vel, Vec2::new(10.0, 10.0));
        assert_eq!(next.events, vec![GameEvent::CeilingBounce]);
    }

    #[test]
    fn test_corner_flips_both_components() {
        let mut state = state_with_ball_landing_at(Vec2::new(5.0, 5.0), Vec2::new(-10.0, -10.0));
        state.bricks = vec![Brick {
            rect: Rect::new(300.0, 300.0, BRICK_WIDTH, BRICK_HEIGHT),
            color: 0,
        }];
        let next = tick(&state, &TickInput::default(), &mut FixedJitter(0.0));

        assert_eq!(next.ball.vel, Vec2::new(10.0, 10.0));
        assert_eq!(
            next.events,
            vec![GameEvent::WallBounce, GameEvent::CeilingBounce]
        );
    }

    #[test]
    fn test_paddle_hit_negates_vy_and_jitters_vx() {
        // Paddle spans [350, 450] with its top at 550
        let mut state =
            state_with_ball_landing_at(Vec2::new(400.0, 545.0), Vec2::new(10.0, 10.0));
        state.bricks = vec![Brick {
            rect: Rect::new(5.0, 30.0, BRICK_WIDTH, BRICK_HEIGHT),
            color: 4,
        }];
        let paddle_before = state.paddle;
        let bricks_before = state.bricks.clone();

        let next = tick(&state, &TickInput::default(), &mut FixedJitter(0.75));

        assert_eq!(next.ball.vel.y, -10.0);
        assert!((next.ball.vel.x - 10.75).abs() < EPS);
        assert_eq!(next.paddle, paddle_before);
        assert_eq!(next.bricks, bricks_before);
        assert_eq!(next.events, vec![GameEvent::PaddleHit]);
        assert!(!next.is_stopped());
    }

    #[test]
    fn test_paddle_jitter_within_unit_range() {
        for seed in 0..50 {
            let mut state =
                state_with_ball_landing_at(Vec2::new(400.0, 545.0), Vec2::new(10.0, 10.0));
            state.bricks = vec![Brick {
                rect: Rect::new(5.0, 30.0, BRICK_WIDTH, BRICK_HEIGHT),
                color: 0,
            }];
            let next = tick(&state, &TickInput::default(), &mut SeededJitter::new(seed));
            let kick = next.ball.vel.x - 10.0;
            assert!((-1.0 - EPS..=1.0 + EPS).contains(&kick), "kick {kick} out of range");
            assert_eq!(next.ball.vel.y, -10.0);
        }
    }

    #[test]
    fn test_brick_hit_removes_exactly_one() {
        // Ball lands in the gap between bricks 0 and 1 of the first row,
        // overlapping both inflated boxes
        let state = state_with_ball_landing_at(Vec2::new(60.0, 40.0), Vec2::new(10.0, -10.0));
        let next = tick(&state, &TickInput::default(), &mut FixedJitter(-0.5));

        assert_eq!(next.bricks.len(), 64);
        // The first match in storage order (brick 0) is the one removed
        assert_eq!(next.bricks[0].rect.left(), 65.0);
        assert_eq!(next.ball.vel.y, 10.0);
        assert!((next.ball.vel.x - 9.5).abs() < EPS);
        assert_eq!(
            next.events,
            vec![GameEvent::BrickDestroyed { index: 0, color: 0 }]
        );
    }

    #[test]
    fn test_last_brick_clears_and_stops() {
        let mut state =
            state_with_ball_landing_at(Vec2::new(400.0, 300.0), Vec2::new(10.0, -10.0));
        state.bricks = vec![Brick {
            rect: Rect::new(380.0, 290.0, BRICK_WIDTH, BRICK_HEIGHT),
            color: 7,
        }];

        let next = tick(&state, &TickInput::default(), &mut FixedJitter(0.0));
        assert!(next.bricks.is_empty());
        assert!(next.is_cleared());
        assert!(next.is_stopped());
        assert_eq!(
            next.events,
            vec![
                GameEvent::BrickDestroyed { index: 0, color: 7 },
                GameEvent::Cleared
            ]
        );

        // Further ticks change nothing
        let after = tick(&next, &TickInput::pointer(100.0), &mut FixedJitter(1.0));
        assert_eq!(after, next);
        assert!(after.is_cleared());
    }

    #[test]
    fn test_empty_grid_clears_on_first_tick() {
        let state = GameState::new(Playfield::new(0, 0));
        assert!(state.bricks.is_empty());
        let next = tick(&state, &TickInput::default(), &mut FixedJitter(0.0));
        assert!(next.is_cleared());
    }

    #[test]
    fn test_ball_below_playfield_is_lost() {
        let mut state = GameState::new(field());
        state.ball.pos = Vec2::new(395.0, 601.0);
        state.ball.vel = Vec2::ZERO;

        let next = tick(&state, &TickInput::default(), &mut FixedJitter(0.0));
        assert!(next.is_stopped());
        assert!(!next.is_cleared());
        assert_eq!(next.phase, GamePhase::Lost);
        assert!(next.events.contains(&GameEvent::BallLost));
        assert_eq!(next.bricks.len(), 65);
    }

    #[test]
    fn test_cleared_wins_over_lost_in_same_tick() {
        let mut state = GameState::new(field());
        state.bricks.clear();
        state.ball.pos = Vec2::new(395.0, 700.0);
        state.ball.vel = Vec2::ZERO;

        let next = tick(&state, &TickInput::default(), &mut FixedJitter(0.0));
        assert_eq!(next.phase, GamePhase::Cleared);
    }

    #[test]
    fn test_paddle_tracks_pointer_inside_playfield() {
        let state = GameState::new(field());

        let next = tick(&state, &TickInput::pointer(200.0), &mut FixedJitter(0.0));
        assert_eq!(next.paddle.pos.x, 150.0);

        let at_edge = tick(&state, &TickInput::pointer(0.0), &mut FixedJitter(0.0));
        assert_eq!(at_edge.paddle.pos.x, -50.0);

        let at_far_edge = tick(&state, &TickInput::pointer(800.0), &mut FixedJitter(0.0));
        assert_eq!(at_far_edge.paddle.pos.x, 750.0);
    }

    #[test]
    fn test_paddle_ignores_pointer_outside_playfield() {
        let state = GameState::new(field());
        let start_x = state.paddle.pos.x;

        for x in [-1.0, 800.5, 2000.0] {
            let next = tick(&state, &TickInput::pointer(x), &mut FixedJitter(0.0));
            assert_eq!(next.paddle.pos.x, start_x);
        }

        let no_pointer = tick(&state, &TickInput::default(), &mut FixedJitter(0.0));
        assert_eq!(no_pointer.paddle.pos.x, start_x);
    }

    #[test]
    fn test_paddle_moves_after_collision_checks() {
        // Ball lands left of the current paddle; pointer would move the paddle
        // under it, but tracking happens after the paddle check
        let mut state =
            state_with_ball_landing_at(Vec2::new(100.0, 545.0), Vec2::new(10.0, 10.0));
        state.bricks = vec![Brick {
            rect: Rect::new(600.0, 30.0, BRICK_WIDTH, BRICK_HEIGHT),
            color: 0,
        }];
        let next = tick(&state, &TickInput::pointer(100.0), &mut FixedJitter(0.0));

        assert_eq!(next.ball.vel.y, 10.0);
        assert_eq!(next.paddle.pos.x, 50.0);
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput::pointer(380.0),
            TickInput::default(),
            TickInput::pointer(420.0),
            TickInput::pointer(-20.0),
        ];

        let mut a = GameState::new(field());
        let mut b = GameState::new(field());
        let mut jitter_a = SeededJitter::new(99999);
        let mut jitter_b = SeededJitter::new(99999);

        for i in 0..400 {
            let input = &inputs[i % inputs.len()];
            a = tick(&a, input, &mut jitter_a);
            b = tick(&b, input, &mut jitter_b);
        }

        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    proptest! {
        #[test]
        fn brick_count_never_grows(
            seed in any::<u64>(),
            width in 200u32..1600,
            height in 200u32..1000,
            pointers in prop::collection::vec(-100.0f32..1700.0, 1..64),
        ) {
            let mut state = GameState::new(Playfield::new(width, height));
            let mut jitter = SeededJitter::new(seed);

            for i in 0..600 {
                let input = TickInput::pointer(pointers[i % pointers.len()]);
                let next = tick(&state, &input, &mut jitter);

                prop_assert!(next.bricks.len() <= state.bricks.len());
                prop_assert!(state.bricks.len() - next.bricks.len() <= 1);
                prop_assert!(next.ball.vel.is_finite());
                prop_assert_eq!(next.ball.radius, BALL_RADIUS);
                prop_assert_eq!(next.paddle.width, PADDLE_WIDTH);
                if state.is_cleared() {
                    prop_assert!(next.is_cleared());
                    prop_assert!(next.bricks.is_empty());
                }
                state = next;
            }
        }

        #[test]
        fn stacked_bricks_lose_at_most_one(offset in 0.0f32..10.0, copies in 2usize..6) {
            let mut state = GameState::new(field());
            state.ball.pos = Vec2::new(400.0, 300.0);
            state.ball.vel = Vec2::ZERO;
            let brick = Brick {
                rect: Rect::new(380.0 + offset, 290.0, BRICK_WIDTH, BRICK_HEIGHT),
                color: 1,
            };
            state.bricks = vec![brick; copies];

            let next = tick(&state, &TickInput::default(), &mut FixedJitter(0.0));
            prop_assert_eq!(next.bricks.len(), copies - 1);
        }
    }
}
