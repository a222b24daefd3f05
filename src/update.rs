// ── Per-frame update step ────────────────────────────────────────────────────
//
// Movement is discrete: one key press moves the player exactly one tile and
// the key is consumed. Held directions are tried in `Direction::PRIORITY`
// order and at most one of them moves per step, so there is no diagonal
// movement. A blocked direction keeps its key held and changes nothing.

use crate::geometry::{Direction, TilePos};
use crate::state::GameState;
use crate::tiles::TileRegistry;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// No movement key held.
    Idle,
    /// Every held direction was out of bounds or collidable.
    Blocked,
    Moved { to: TilePos },
    /// Moved onto a transition tile.
    Transition { at: TilePos },
}

pub fn step(state: &mut GameState, registry: &TileRegistry) -> StepOutcome {
    let mut blocked = false;

    for dir in Direction::PRIORITY {
        let Some(&key) = dir.keys().iter().find(|k| state.keys_pressed.contains(*k)) else {
            continue;
        };
        let target = state.player.pos().offset(dir);
        if !state.tile_map.is_walkable(target, registry) {
            blocked = true;
            continue;
        }

        state.keys_pressed.remove(&key);
        state.player.x = target.x;
        state.player.y = target.y;
        tracing::debug!(x = target.x, y = target.y, ?dir, "player moved");

        let on_portal = state
            .tile_map
            .get(target.x, target.y)
            .is_some_and(|id| registry.is_transition(id));
        return if on_portal {
            StepOutcome::Transition { at: target }
        } else {
            StepOutcome::Moved { to: target }
        };
    }

    if blocked { StepOutcome::Blocked } else { StepOutcome::Idle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileMap;
    use crate::state::Player;
    use crate::tiles::{FLOOR, PORTAL, WALL};
    use winit::keyboard::KeyCode;

    fn state_with(rows: Vec<Vec<u16>>, x: i32, y: i32) -> GameState {
        GameState::new(TileMap::from_rows(rows).unwrap(), Player { x, y })
    }

    #[test]
    fn no_keys_is_idle() {
        let mut s = GameState::default();
        assert_eq!(step(&mut s, &TileRegistry::default()), StepOutcome::Idle);
    }

    #[test]
    fn move_consumes_the_key() {
        let mut s = GameState::default();
        s.keys_pressed.insert(KeyCode::ArrowRight);
        let out = step(&mut s, &TileRegistry::default());
        assert_eq!(out, StepOutcome::Moved { to: TilePos::new(3, 2) });
        assert!(s.keys_pressed.is_empty());
        assert_eq!(step(&mut s, &TileRegistry::default()), StepOutcome::Idle);
    }

    #[test]
    fn wall_blocks_and_keeps_key() {
        let mut s = state_with(vec![vec![FLOOR, WALL]], 0, 0);
        s.keys_pressed.insert(KeyCode::KeyD);
        assert_eq!(step(&mut s, &TileRegistry::default()), StepOutcome::Blocked);
        assert_eq!(s.player, Player { x: 0, y: 0 });
        assert!(s.keys_pressed.contains(&KeyCode::KeyD));
    }

    #[test]
    fn edge_of_map_blocks() {
        let mut s = state_with(vec![vec![FLOOR]], 0, 0);
        s.keys_pressed.insert(KeyCode::ArrowUp);
        s.keys_pressed.insert(KeyCode::ArrowLeft);
        assert_eq!(step(&mut s, &TileRegistry::default()), StepOutcome::Blocked);
        assert_eq!(s.player, Player { x: 0, y: 0 });
    }

    #[test]
    fn up_wins_over_right_and_only_one_axis_moves() {
        let mut s = GameState::default();
        s.keys_pressed.insert(KeyCode::ArrowUp);
        s.keys_pressed.insert(KeyCode::ArrowRight);
        assert_eq!(step(&mut s, &TileRegistry::default()), StepOutcome::Moved { to: TilePos::new(2, 1) });
        assert!(s.keys_pressed.contains(&KeyCode::ArrowRight));
        assert_eq!(step(&mut s, &TileRegistry::default()), StepOutcome::Moved { to: TilePos::new(3, 1) });
    }

    #[test]
    fn blocked_direction_falls_through_to_next() {
        let rows = vec![
            vec![WALL, WALL, WALL],
            vec![FLOOR, FLOOR, FLOOR],
        ];
        let mut s = state_with(rows, 1, 1);
        s.keys_pressed.insert(KeyCode::ArrowUp);
        s.keys_pressed.insert(KeyCode::ArrowLeft);
        assert_eq!(step(&mut s, &TileRegistry::default()), StepOutcome::Moved { to: TilePos::new(0, 1) });
        assert!(s.keys_pressed.contains(&KeyCode::ArrowUp));
    }

    #[test]
    fn stepping_on_portal_reports_transition() {
        let mut s = state_with(vec![vec![FLOOR, PORTAL]], 0, 0);
        s.keys_pressed.insert(KeyCode::ArrowRight);
        assert_eq!(
            step(&mut s, &TileRegistry::default()),
            StepOutcome::Transition { at: TilePos::new(1, 0) }
        );
        assert_eq!(s.player, Player { x: 1, y: 0 });
    }
}
