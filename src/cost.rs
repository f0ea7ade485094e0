// Step cost shaping for the path search
//
// The cost of entering a cell mixes distance to the goal, head-to-head
// opportunity, an edge penalty, food attraction, and a strong pull toward the
// board center.

use crate::board::{Board, Cell, Point};
use crate::config::CostConfig;

/// Cost of stepping into `cell` while heading for `goal`. Never negative.
pub fn step_cost(board: &Board, cell: Point, goal: Point, weights: &CostConfig) -> i64 {
    let distance = cell.distance(goal) as i64;
    let mut cost = distance;

    if favourable_head_to_head(board, cell) {
        cost -= distance;
    }

    if in_frame(board, cell, weights.frame_divisor) {
        cost += distance;
    }

    let adjacent_food = cell.neighbors().iter().filter(|n| board.has_food(**n)).count() as i64;
    cost -= adjacent_food * weights.food_adjacent_bonus;

    cost += center_offset(board, cell) * weights.center_weight;

    cost.max(0)
}

/// True when every occupied neighbor of an empty `cell` is the head of a
/// strictly shorter opponent
pub fn favourable_head_to_head(board: &Board, cell: Point) -> bool {
    if !board.is_free(cell) {
        return false;
    }

    let agent_len = board.agent().len();
    let mut saw_head = false;

    for n in cell.neighbors() {
        match board.occupied_by(n) {
            Cell::Empty => {}
            Cell::Snake(idx) => {
                if !board.is_opponent_head(n) || board.snakes[idx].len() >= agent_len {
                    return false;
                }
                saw_head = true;
            }
        }
    }

    saw_head
}

/// Whether `cell` lies in the outer band of the board
pub fn in_frame(board: &Board, cell: Point, divisor: i32) -> bool {
    if divisor <= 0 {
        return false;
    }
    let band_x = board.width / divisor;
    let band_y = board.height / divisor;

    cell.x < band_x
        || cell.x >= board.width - band_x
        || cell.y < band_y
        || cell.y >= board.height - band_y
}

/// Manhattan offset from the board center
pub fn center_offset(board: &Board, cell: Point) -> i64 {
    cell.distance(board.center()) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Snake;
    use crate::config::Config;

    fn pts(coords: &[(i32, i32)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn weights() -> CostConfig {
        Config::default_hardcoded().cost
    }

    fn lone_agent(size: i32, body: &[(i32, i32)], food: &[(i32, i32)]) -> Board {
        Board::new(
            "me",
            size,
            size,
            vec![Snake::new("me", pts(body), body.len(), 80)],
            pts(food),
        )
        .unwrap()
    }

    #[test]
    fn test_center_cell_costs_only_distance() {
        let board = lone_agent(7, &[(0, 0)], &[]);
        let cost = step_cost(&board, Point::new(3, 3), Point::new(3, 5), &weights());
        assert_eq!(cost, 2);
    }

    #[test]
    fn test_centering_dominates() {
        let board = lone_agent(11, &[(0, 0)], &[]);
        let w = weights();
        let goal = Point::new(5, 9);
        let central = step_cost(&board, Point::new(5, 5), goal, &w);
        let off_center = step_cost(&board, Point::new(7, 5), goal, &w);
        assert!(off_center > central);
        assert_eq!(off_center - central, 2 * 10 + 2);
    }

    #[test]
    fn test_frame_band() {
        let board = lone_agent(11, &[(5, 5)], &[]);
        assert!(in_frame(&board, Point::new(0, 5), 4));
        assert!(in_frame(&board, Point::new(1, 5), 4));
        assert!(!in_frame(&board, Point::new(2, 5), 4));
        assert!(in_frame(&board, Point::new(5, 9), 4));
        assert!(!in_frame(&board, Point::new(5, 8), 4));
        assert!(!in_frame(&board, Point::new(0, 0), 0));
    }

    #[test]
    fn test_frame_term_doubles_distance() {
        let board = lone_agent(7, &[(6, 6)], &[]);
        // (0,3): distance 3 to (3,3), offset 3 from center, inside the band
        let cost = step_cost(&board, Point::new(0, 3), Point::new(3, 3), &weights());
        assert_eq!(cost, 3 + 3 + 30);
    }

    #[test]
    fn test_adjacent_food_lowers_cost() {
        let plain = lone_agent(7, &[(6, 6)], &[]);
        let fed = lone_agent(7, &[(6, 6)], &[(3, 2), (2, 3)]);
        let w = weights();
        let goal = Point::new(3, 5);
        let a = step_cost(&plain, Point::new(3, 3), goal, &w);
        let b = step_cost(&fed, Point::new(3, 3), goal, &w);
        assert_eq!(a - b, 2);
    }

    #[test]
    fn test_cost_never_negative() {
        let board = lone_agent(7, &[(6, 6)], &[(3, 2), (2, 3), (4, 3), (3, 4)]);
        assert_eq!(step_cost(&board, Point::new(3, 3), Point::new(3, 3), &weights()), 0);
    }

    #[test]
    fn test_head_to_head_against_shorter_opponent() {
        let board = Board::new(
            "me",
            7,
            7,
            vec![
                Snake::new("me", pts(&[(1, 3), (0, 3), (0, 4)]), 3, 80),
                Snake::new("them", pts(&[(3, 2), (3, 1)]), 2, 80),
            ],
            vec![],
        )
        .unwrap();
        // (3,3) touches only the opponent head at (3,2)
        assert!(favourable_head_to_head(&board, Point::new(3, 3)));
        // (2,3) touches our own head
        assert!(!favourable_head_to_head(&board, Point::new(2, 3)));
        // (5,5) touches nobody
        assert!(!favourable_head_to_head(&board, Point::new(5, 5)));

        let goal = Point::new(3, 6);
        let cost = step_cost(&board, Point::new(3, 3), goal, &weights());
        assert_eq!(cost, 0);
    }

    #[test]
    fn test_no_head_to_head_against_equal_opponent() {
        let board = Board::new(
            "me",
            7,
            7,
            vec![
                Snake::new("me", pts(&[(1, 3), (0, 3)]), 2, 80),
                Snake::new("them", pts(&[(3, 2), (3, 1)]), 2, 80),
            ],
            vec![],
        )
        .unwrap();
        assert!(!favourable_head_to_head(&board, Point::new(3, 3)));
    }
}
