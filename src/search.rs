// Weighted A* over the occupancy grid
//
// Each edge weighs (1 step, step_cost of the entered cell). Weights compare
// lexicographically, so routes stay as short as the grid allows and the cost
// function decides between routes of equal length.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};

use crate::board::{Board, Cell, Path, Point};
use crate::config::CostConfig;
use crate::cost::step_cost;

/// (steps taken, accumulated shaping cost)
type Weight = (u32, i64);

#[derive(Debug, PartialEq, Eq)]
struct Frontier {
    priority: Weight,
    seq: u64,
    weight: Weight,
    point: Point,
}

// Min-heap on priority; earlier insertions win ties
impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cheapest path from `start` to `end`, or an empty path.
///
/// `start` may be occupied (it is usually a head). Every other cell on the
/// path, `end` included, must be in bounds and empty.
pub fn find_path(board: &Board, start: Point, end: Point, weights: &CostConfig) -> Path {
    if board.out_of_bounds(start) || board.out_of_bounds(end) {
        return Vec::new();
    }
    if start == end {
        return vec![start];
    }
    if !board.is_free(end) {
        return Vec::new();
    }

    let mut frontier = BinaryHeap::new();
    let mut best: HashMap<Point, Weight> = HashMap::new();
    let mut came_from: HashMap<Point, Point> = HashMap::new();
    let mut seq = 0u64;

    best.insert(start, (0, 0));
    frontier.push(Frontier {
        priority: (start.distance(end) as u32, 0),
        seq,
        weight: (0, 0),
        point: start,
    });

    while let Some(Frontier { weight, point, .. }) = frontier.pop() {
        if point == end {
            return reconstruct(&came_from, start, end);
        }
        if best.get(&point).map_or(false, |&w| w < weight) {
            continue;
        }

        for next in point.neighbors() {
            if !board.is_free(next) {
                continue;
            }

            let candidate = (weight.0 + 1, weight.1 + step_cost(board, next, end, weights));
            let improved = match best.entry(next) {
                Entry::Vacant(slot) => {
                    slot.insert(candidate);
                    true
                }
                Entry::Occupied(mut slot) => {
                    if candidate < *slot.get() {
                        slot.insert(candidate);
                        true
                    } else {
                        false
                    }
                }
            };

            if improved {
                came_from.insert(next, point);
                seq += 1;
                frontier.push(Frontier {
                    priority: (candidate.0 + next.distance(end) as u32, candidate.1),
                    seq,
                    weight: candidate,
                    point: next,
                });
            }
        }
    }

    Vec::new()
}

/// Like `find_path`, but when `end` is a snake's tip that will have moved on
/// by the time we arrive, the tip cell is treated as open.
///
/// The tip vacates after `tip_stack` turns, so it is cleared only when the
/// straight-line distance exceeds the stack.
pub fn find_path_trimmed(board: &Board, start: Point, end: Point, weights: &CostConfig) -> Path {
    if let Cell::Snake(idx) = board.occupied_by(end) {
        let snake = &board.snakes[idx];
        if snake.tip() == end && start.distance(end) as usize > snake.tip_stack() {
            let mut trimmed = board.clone();
            trimmed.mark_empty(end);
            return find_path(&trimmed, start, end, weights);
        }
    }

    find_path(board, start, end, weights)
}

fn reconstruct(came_from: &HashMap<Point, Point>, start: Point, end: Point) -> Path {
    let mut path = vec![end];
    let mut current = end;
    while current != start {
        match came_from.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}
