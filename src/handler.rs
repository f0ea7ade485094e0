// Rocket routes for the Battlesnake API
//
// Each route unpacks the request and hands it to the managed `Bot`.

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde_json::Value;

use tailchaser::bot::Bot;
use tailchaser::types::GameState;

/// GET / : appearance and API version
#[get("/")]
pub fn index(bot: &State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// POST /start
#[post("/start", format = "json", data = "<req>")]
pub fn start(bot: &State<Bot>, req: Json<GameState>) -> Status {
    bot.start(&req.game, &req.turn, &req.board, &req.you);
    Status::Ok
}

/// POST /move : answers `{"move": "<direction>"}` within the turn budget
#[post("/move", format = "json", data = "<req>")]
pub async fn get_move(bot: &State<Bot>, req: Json<GameState>) -> Json<Value> {
    Json(bot.get_move(&req.game, &req.turn, &req.board, &req.you).await)
}

/// POST /end
#[post("/end", format = "json", data = "<req>")]
pub fn end(bot: &State<Bot>, req: Json<GameState>) -> Status {
    bot.end(&req.game, &req.turn, &req.board, &req.you);
    Status::Ok
}
