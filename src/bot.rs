// Welcome to
// __________         __    __  .__                               __
// \______   \_____ _/  |__/  |_|  |   ____   ______ ____ _____  |  | __ ____
//  |    |  _/\__  \\   __\   __\  | _/ __ \ /  ___//    \\__  \ |  |/ // __ \
//  |    |   \ / __ \|  |  |  | |  |_\  ___/ \___ \|   |  \/ __ \|    <\  ___/
//  |________/(______/__|  |__| |____/\_____>______>___|__(______/__|__\\_____>
//
// The bot turns each API request into a planner run and answers with a move.
// Planning is CPU-bound, so it runs on the blocking pool under the turn's
// time budget.

use log::{error, info, warn};
use serde_json::{json, Value};
use std::time::{Duration, Instant};

use crate::board::{self as grid, Point};
use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::planner::{escape_plan, Plan, Planner};
use crate::types::{Battlesnake, Board, Direction, Game};

/// Battlesnake bot: static configuration plus one method per API endpoint
pub struct Bot {
    config: Config,
    debug_logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with debug logging off
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Bot {
            config,
            debug_logger: DebugLogger::disabled(),
        }
    }

    pub fn with_debug_logger(config: Config, debug_logger: DebugLogger) -> Self {
        Bot {
            config,
            debug_logger,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "author": "tailchaser",
            "color": "#1A0F05",
            "head": "default",
            "tail": "default",
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, game: &Game, _turn: &i32, board: &Board, _you: &Battlesnake) {
        info!(
            "GAME START {} ({}x{}, {} snakes)",
            game.id,
            board.width,
            board.height,
            board.snakes.len()
        );
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, game: &Game, turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("GAME OVER {} after {} turns", game.id, turn);
    }

    /// Plans and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// The planner runs on tokio's blocking pool. If it has not answered
    /// within the effective budget, or the board is malformed, an escape
    /// move is returned instead so the engine always gets a direction.
    ///
    /// # Returns
    /// * `Value` - JSON response containing the chosen move direction
    pub async fn get_move(&self, _game: &Game, turn: &i32, board: &Board, you: &Battlesnake) -> Value {
        let start_time = Instant::now();

        let turn_board = match grid::Board::from_api(board, &you.id) {
            Ok(turn_board) => turn_board,
            Err(e) => {
                error!("Turn {}: rejecting board: {}", turn, e);
                return json!({ "move": Direction::Up.as_str() });
            }
        };

        let budget = Duration::from_millis(self.config.timing.effective_budget_ms());
        let deadline = start_time + budget;
        let config = self.config.clone();
        let task_board = turn_board.clone();

        let search = tokio::task::spawn_blocking(move || {
            Planner::new(&config)
                .with_deadline(deadline)
                .plan_turn(&task_board)
        });

        let plan = match tokio::time::timeout(budget, search).await {
            Ok(Ok(plan)) => plan,
            Ok(Err(e)) => {
                error!("Turn {}: planner task failed: {}", turn, e);
                Self::fallback(&turn_board)
            }
            Err(_) => {
                warn!("Turn {}: planner exceeded {}ms", turn, budget.as_millis());
                Self::fallback(&turn_board)
            }
        };

        info!(
            "Turn {}: Chose {} via {} toward ({}, {}) (path: {}, time: {}ms)",
            turn,
            plan.direction.as_str(),
            plan.strategy.as_str(),
            plan.destination.x,
            plan.destination.y,
            plan.path.len(),
            start_time.elapsed().as_millis()
        );

        self.debug_logger
            .log_move(*turn, &you.id, board.clone(), &plan);

        json!({ "move": plan.direction.as_str() })
    }

    /// Plans a turn synchronously, with no deadline
    pub fn plan(&self, board: &grid::Board) -> Plan {
        Planner::new(&self.config).plan_turn(board)
    }

    fn fallback(turn_board: &grid::Board) -> Plan {
        let tip: Point = turn_board.agent().tip();
        escape_plan(turn_board, tip)
    }
}
