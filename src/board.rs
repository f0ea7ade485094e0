// Board model used by the planner
//
// A board is a per-turn occupancy snapshot. Planning strategies never mutate
// the turn's board: they clone it, mutate the clone, and drop it.
//
// Grid coordinates put the origin in the top-left corner with `y` growing
// downward, so "up" is `y - 1`. `Board::from_api` converts from the engine's
// bottom-left origin.

use serde::{Deserialize, Serialize};

use crate::types::{self, Direction};

/// A cell coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// Manhattan distance
    pub fn distance(&self, other: Point) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// The adjacent point one step in `direction`
    pub fn neighbor(&self, direction: Direction) -> Point {
        match direction {
            Direction::Up => Point::new(self.x, self.y - 1),
            Direction::Down => Point::new(self.x, self.y + 1),
            Direction::Left => Point::new(self.x - 1, self.y),
            Direction::Right => Point::new(self.x + 1, self.y),
        }
    }

    pub fn neighbors(&self) -> [Point; 4] {
        Direction::all().map(|d| self.neighbor(d))
    }
}

/// Ordered cells from start to goal, both included. Empty means no path.
pub type Path = Vec<Point>;

/// A snake as the planner sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    pub id: String,
    /// Head first, tip last. May end in repeated points while growing.
    pub body: Vec<Point>,
    /// Length reported by the engine
    pub length: usize,
    pub health: i32,
}

impl Snake {
    pub fn new(id: impl Into<String>, body: Vec<Point>, length: usize, health: i32) -> Self {
        Snake {
            id: id.into(),
            body,
            length,
            health,
        }
    }

    pub fn head(&self) -> Point {
        self.body[0]
    }

    pub fn tail(&self) -> &[Point] {
        &self.body[1..]
    }

    pub fn tip(&self) -> Point {
        self.body[self.body.len() - 1]
    }

    /// Number of trailing body entries stacked on the tip
    pub fn tip_stack(&self) -> usize {
        let tip = self.tip();
        self.body.iter().rev().take_while(|&&p| p == tip).count()
    }

    /// Whether the tip occupies a different cell than the head
    pub fn has_tail(&self) -> bool {
        self.tip() != self.head()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// What a grid cell holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    /// Index into `Board::snakes`
    Snake(usize),
}

#[derive(Debug, Clone)]
pub struct Board {
    pub width: i32,
    pub height: i32,
    pub snakes: Vec<Snake>,
    pub food: Vec<Point>,
    agent: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Builds the turn's board, checking the invariants the planner relies on
    pub fn new(
        agent_id: &str,
        width: i32,
        height: i32,
        snakes: Vec<Snake>,
        food: Vec<Point>,
    ) -> Result<Self, String> {
        if width <= 0 || height <= 0 {
            return Err(format!("Invalid board dimensions {}x{}", width, height));
        }
        // cell indices are computed in i32
        let cell_count = width
            .checked_mul(height)
            .ok_or_else(|| format!("Board dimensions {}x{} are too large", width, height))?;

        let agent = snakes
            .iter()
            .position(|s| s.id == agent_id)
            .ok_or_else(|| format!("Agent snake '{}' not found on board", agent_id))?;

        let mut board = Board {
            width,
            height,
            snakes,
            food,
            agent,
            cells: vec![Cell::Empty; cell_count as usize],
        };

        for (idx, snake) in board.snakes.iter().enumerate() {
            if snake.is_empty() {
                return Err(format!("Snake '{}' has an empty body", snake.id));
            }
            if let Some(p) = snake.body.iter().find(|p| board.out_of_bounds(**p)) {
                return Err(format!(
                    "Snake '{}' has body point ({}, {}) outside the {}x{} board",
                    snake.id, p.x, p.y, width, height
                ));
            }
            for p in &snake.body {
                let i = board.index(*p);
                board.cells[i] = Cell::Snake(idx);
            }
        }

        if let Some(p) = board.food.iter().find(|p| board.out_of_bounds(**p)) {
            return Err(format!("Food at ({}, {}) is outside the board", p.x, p.y));
        }

        Ok(board)
    }

    /// Converts an engine board into grid coordinates, dropping dead snakes
    pub fn from_api(api: &types::Board, agent_id: &str) -> Result<Self, String> {
        let height = api.height;
        let flip = |c: &types::Coord| Point::new(c.x, height - 1 - c.y);

        let snakes = api
            .snakes
            .iter()
            .filter(|s| s.health > 0)
            .map(|s| {
                Snake::new(
                    s.id.clone(),
                    s.body.iter().map(flip).collect(),
                    s.length.max(0) as usize,
                    s.health,
                )
            })
            .collect();
        let food = api.food.iter().map(flip).collect();

        Board::new(agent_id, api.width, height, snakes, food)
    }

    fn index(&self, p: Point) -> usize {
        (p.y * self.width + p.x) as usize
    }

    pub fn out_of_bounds(&self, p: Point) -> bool {
        p.x < 0 || p.y < 0 || p.x >= self.width || p.y >= self.height
    }

    /// Cell contents; out-of-bounds points read as empty
    pub fn occupied_by(&self, p: Point) -> Cell {
        if self.out_of_bounds(p) {
            return Cell::Empty;
        }
        self.cells[self.index(p)]
    }

    /// In bounds and not covered by any snake
    pub fn is_free(&self, p: Point) -> bool {
        !self.out_of_bounds(p) && self.occupied_by(p) == Cell::Empty
    }

    pub fn mark_empty(&mut self, p: Point) {
        if !self.out_of_bounds(p) {
            let i = self.index(p);
            self.cells[i] = Cell::Empty;
        }
    }

    pub fn mark_occupied(&mut self, p: Point, snake: usize) {
        if !self.out_of_bounds(p) {
            let i = self.index(p);
            self.cells[i] = Cell::Snake(snake);
        }
    }

    /// Vacates the last `n` body entries of `snake` and returns the point
    /// `n` positions from its tip, where the tail will be after `n` turns
    /// without growth. The head always stays occupied.
    pub fn prune_tail(&mut self, snake: usize, n: usize) -> Option<Point> {
        if n == 0 {
            return None;
        }

        let body = self.snakes[snake].body.clone();
        let keep = body.len().saturating_sub(n).max(1);

        for p in &body[1..] {
            self.mark_empty(*p);
        }
        for p in &body[..keep] {
            self.mark_occupied(*p, snake);
        }

        body.len().checked_sub(n).map(|i| body[i])
    }

    pub fn distance(&self, a: Point, b: Point) -> i32 {
        a.distance(b)
    }

    pub fn agent_index(&self) -> usize {
        self.agent
    }

    pub fn agent(&self) -> &Snake {
        &self.snakes[self.agent]
    }

    pub fn is_opponent_head(&self, p: Point) -> bool {
        match self.occupied_by(p) {
            Cell::Snake(idx) => idx != self.agent && self.snakes[idx].head() == p,
            Cell::Empty => false,
        }
    }

    pub fn has_food(&self, p: Point) -> bool {
        self.food.contains(&p)
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2, self.height / 2)
    }

    pub fn free_cells(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Empty).count()
    }
}
