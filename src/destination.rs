// Destination selection
//
// Food while hungry or short, an ambush point when one well-fed opponent is
// left, otherwise our own tail.

use log::debug;

use crate::board::{Board, Point};
use crate::config::DestinationConfig;

/// Picks this turn's goal point
pub fn choose_destination(board: &Board, config: &DestinationConfig) -> Point {
    let agent = board.agent();
    let head = agent.head();

    if agent.health < config.hungry_health || agent.len() < config.min_length {
        let food = if agent.health <= config.urgent_health {
            nearest_food(board, head)
        } else {
            nearest_food(board, board.center())
        };
        if let Some(food) = food {
            debug!("Destination: food at ({}, {})", food.x, food.y);
            return food;
        }
    }

    if board.snakes.len() == config.ambush_snake_count && agent.health > config.ambush_health {
        if let Some(point) = ambush_point(board, config.ambush_lead) {
            debug!("Destination: ambush at ({}, {})", point.x, point.y);
            return point;
        }
    }

    agent.tip()
}

/// First food closest to `origin`
fn nearest_food(board: &Board, origin: Point) -> Option<Point> {
    board.food.iter().copied().min_by_key(|f| origin.distance(*f))
}

/// The free cell `lead` steps ahead of the first opponent's head, following
/// the direction it last moved in
fn ambush_point(board: &Board, lead: i32) -> Option<Point> {
    let opponent = board
        .snakes
        .iter()
        .enumerate()
        .find(|(idx, _)| *idx != board.agent_index())
        .map(|(_, s)| s)?;

    if opponent.len() < 2 {
        return None;
    }

    let head = opponent.head();
    let neck = opponent.body[1];
    let target = Point::new(
        head.x + (head.x - neck.x) * lead,
        head.y + (head.y - neck.y) * lead,
    );

    if target != head && board.is_free(target) {
        Some(target)
    } else {
        None
    }
}
