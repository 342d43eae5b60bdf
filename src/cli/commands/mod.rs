mod check;
mod leaderboard;
mod seed;
mod user;

pub use check::cmd_check;
pub use leaderboard::cmd_leaderboard;
pub use seed::cmd_seed;
pub use user::cmd_user_create;
