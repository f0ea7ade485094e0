// Library exports for the Tailchaser Battlesnake
// The server binary and the replay tool both build on these modules

pub mod board;
pub mod bot;
pub mod config;
pub mod cost;
pub mod debug_logger;
pub mod destination;
pub mod planner;
pub mod replay;
pub mod search;
pub mod types;
