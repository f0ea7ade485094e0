// Move planning
//
// Each turn runs an ordered chain of strategies against the destination:
//
// 1. Disjoint: a route to the destination that leaves a separate way back
//    to our own tail.
// 2. TailCut: pretend our tail has already moved on, by increasing amounts,
//    until a route appears.
// 3. SpaceFill: take the neighbor of the head with the longest route ahead.
//
// The first strategy to produce a usable path wins. If none does, or the
// deadline passes, an escape step onto any open neighbor is returned.

use log::{debug, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::time::Instant;

use crate::board::{Board, Cell, Path, Point, Snake};
use crate::config::Config;
use crate::destination::choose_destination;
use crate::search::{find_path, find_path_trimmed};
use crate::types::Direction;

/// Which part of the chain produced the move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Disjoint,
    TailCut,
    SpaceFill,
    Escape,
}

impl Strategy {
    /// Strategies tried in order before escaping
    pub const CHAIN: [Strategy; 3] = [Strategy::Disjoint, Strategy::TailCut, Strategy::SpaceFill];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Disjoint => "disjoint",
            Strategy::TailCut => "tail_cut",
            Strategy::SpaceFill => "space_fill",
            Strategy::Escape => "escape",
        }
    }
}

/// The decision for one turn, with enough context to explain it
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub strategy: Strategy,
    pub destination: Point,
    /// Starts at our head; the second point is the next step
    pub path: Path,
    pub direction: Direction,
}

impl Plan {
    fn from_path(strategy: Strategy, destination: Point, path: Path, agent: &Snake) -> Self {
        let direction = map_move(agent, path[1]);
        Plan {
            strategy,
            destination,
            path,
            direction,
        }
    }
}

/// Result of the tail-cut simulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutPath {
    pub path: Path,
    pub cut_length: usize,
    /// Where our tail would be after `cut_length` turns
    pub freed: Option<Point>,
}

pub struct Planner<'a> {
    config: &'a Config,
    deadline: Option<Instant>,
}

impl<'a> Planner<'a> {
    pub fn new(config: &'a Config) -> Self {
        Planner {
            config,
            deadline: None,
        }
    }

    /// Stop trying strategies once `deadline` has passed
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    fn expired(&self) -> bool {
        self.deadline.map_or(false, |d| Instant::now() >= d)
    }

    /// Runs the strategy chain for the board's agent
    pub fn plan_turn(&self, board: &Board) -> Plan {
        let agent = board.agent();
        let destination = choose_destination(board, &self.config.destination);
        let mut incumbent = Path::new();

        for strategy in Strategy::CHAIN {
            if self.expired() {
                warn!("Deadline reached before {} strategy", strategy.as_str());
                break;
            }
            if let Some(path) = self.attempt(strategy, board, destination, &mut incumbent) {
                return Plan::from_path(strategy, destination, path, agent);
            }
        }

        escape_plan(board, destination)
    }

    /// Runs one strategy. `incumbent` carries a usable but unsafe route
    /// forward for the space-fill comparison.
    fn attempt(
        &self,
        strategy: Strategy,
        board: &Board,
        destination: Point,
        incumbent: &mut Path,
    ) -> Option<Path> {
        let agent = board.agent();

        match strategy {
            Strategy::Disjoint => {
                let (path, return_exists) = self.disjoint_path(board, destination);
                debug!(
                    "Disjoint: {} cells, return route {}",
                    path.len(),
                    if return_exists { "found" } else { "missing" }
                );
                if !usable(&path) {
                    return None;
                }
                if return_exists {
                    return Some(path);
                }
                *incumbent = path;
                None
            }
            Strategy::TailCut => {
                let cut = self.cut_path(board, agent.head(), destination);
                debug!(
                    "TailCut: {} cells at cut {}",
                    cut.path.len(),
                    cut.cut_length
                );
                let freed_tail = matches!(cut.freed, Some(p) if p != agent.head());
                if usable(&cut.path) && freed_tail && clears_own_body(board, &cut.path) {
                    Some(cut.path)
                } else {
                    None
                }
            }
            Strategy::SpaceFill => {
                let best = self.longer_path(board, agent.tip(), incumbent.clone(), true);
                let best = self.longer_path(board, destination, best, false);
                debug!("SpaceFill: {} cells", best.len());
                if usable(&best) {
                    Some(best)
                } else {
                    None
                }
            }
            Strategy::Escape => None,
        }
    }

    /// Route from the head to `destination`, kept apart from the route back
    /// to our tail where possible. The flag reports whether a way back exists.
    pub fn disjoint_path(&self, board: &Board, destination: Point) -> (Path, bool) {
        let weights = &self.config.cost;
        let agent = board.agent();
        let path_init = find_path_trimmed(board, agent.head(), destination, weights);

        // nothing to come back to
        if !agent.has_tail() {
            return (path_init, true);
        }

        let path_return = find_path_trimmed(board, destination, agent.tip(), weights);
        let return_exists = !path_return.is_empty();

        let outbound: HashSet<Point> = path_init.iter().copied().collect();
        let mut shared: HashSet<Point> = path_return
            .iter()
            .copied()
            .filter(|p| outbound.contains(p))
            .collect();
        shared.remove(&destination);

        if shared.is_empty() {
            return (path_init, return_exists);
        }

        let mut blocked = board.clone();
        for p in &shared {
            blocked.mark_occupied(*p, board.agent_index());
        }

        let disjoint = find_path_trimmed(&blocked, agent.head(), destination, weights);
        if disjoint.is_empty() {
            (path_init, return_exists)
        } else {
            (disjoint, return_exists)
        }
    }

    /// Prunes our tail by growing amounts until `goal` becomes reachable, then
    /// heads for the cell the tail frees at that depth.
    pub fn cut_path(&self, board: &Board, start: Point, goal: Point) -> CutPath {
        let weights = &self.config.cost;
        let agent_index = board.agent_index();
        let head = board.agent().head();
        let mut last = CutPath {
            path: Path::new(),
            cut_length: 0,
            freed: None,
        };

        for cut_length in cut_schedule(board.agent().tail().len()) {
            if self.expired() {
                break;
            }

            let mut pruned = board.clone();
            let freed = pruned.prune_tail(agent_index, cut_length);
            let path = find_path(&pruned, start, goal, weights);

            match freed {
                Some(freed) if usable(&path) && freed != head => {
                    let retargeted = find_path(&pruned, start, freed, weights);
                    if let Some(timed) = [retargeted, path.clone()]
                        .into_iter()
                        .find(|p| usable(p) && clears_own_body(board, p))
                    {
                        return CutPath {
                            path: timed,
                            cut_length,
                            freed: Some(freed),
                        };
                    }
                    debug!("TailCut: cut {} reaches body that is still there", cut_length);
                    last = CutPath {
                        path,
                        cut_length,
                        freed: Some(freed),
                    };
                }
                _ => {
                    last = CutPath {
                        path,
                        cut_length,
                        freed,
                    };
                }
            }
        }

        last
    }

    /// Longest route toward `target` starting from any open neighbor of the
    /// head. Candidates are reported from the head; ties keep `current_best`.
    pub fn longer_path(
        &self,
        board: &Board,
        target: Point,
        current_best: Path,
        prune_tip: bool,
    ) -> Path {
        let weights = &self.config.cost;
        let head = board.agent().head();
        let mut best = current_best;

        for start in head.neighbors() {
            if !board.is_free(start) {
                continue;
            }

            let found = if prune_tip {
                find_path_trimmed(board, start, target, weights)
            } else {
                find_path(board, start, target, weights)
            };
            if found.is_empty() {
                continue;
            }

            if found.len() + 1 > best.len() {
                let mut candidate = Vec::with_capacity(found.len() + 1);
                candidate.push(head);
                candidate.extend(found);
                best = candidate;
            }
        }

        best
    }
}

/// Cut depths to try: 0, 1, 2, 3, 5, 8, ... up to `limit`, ending on `limit`
pub fn cut_schedule(limit: usize) -> Vec<usize> {
    let mut schedule = vec![0];
    let (mut a, mut b) = (1, 2);
    while a <= limit {
        schedule.push(a);
        (a, b) = (b, a + b);
    }
    if limit > 0 && schedule.last() != Some(&limit) {
        schedule.push(limit);
    }
    schedule
}

/// Direction from the snake's head to the adjacent `next` point
pub fn map_move(snake: &Snake, next: Point) -> Direction {
    let head = snake.head();
    let dx = head.x - next.x;
    let dy = head.y - next.y;

    if dx != 0 {
        if dx < 0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy < 0 {
        Direction::Down
    } else {
        Direction::Up
    }
}

/// Last resort: first open neighbor, then any in-bounds neighbor, then up
pub fn escape_plan(board: &Board, destination: Point) -> Plan {
    let head = board.agent().head();
    let direction = Direction::all()
        .into_iter()
        .find(|d| board.is_free(head.neighbor(*d)))
        .or_else(|| {
            Direction::all()
                .into_iter()
                .find(|d| !board.out_of_bounds(head.neighbor(*d)))
        })
        .unwrap_or(Direction::Up);

    Plan {
        strategy: Strategy::Escape,
        destination,
        path: vec![head, head.neighbor(direction)],
        direction,
    }
}

fn usable(path: &Path) -> bool {
    path.len() > 1
}

/// Whether every step of a path from our head lands on a cell that is free
/// by then. Our own `body[len - k]` clears after k moves, so it may only
/// appear at index k or later.
fn clears_own_body(board: &Board, path: &Path) -> bool {
    let agent = board.agent();
    let own = Cell::Snake(board.agent_index());

    path.iter().enumerate().skip(1).all(|(turns, p)| {
        if board.is_free(*p) {
            return true;
        }
        let still_there = &agent.body[..agent.len().saturating_sub(turns)];
        board.occupied_by(*p) == own && !still_there.contains(p)
    })
}
