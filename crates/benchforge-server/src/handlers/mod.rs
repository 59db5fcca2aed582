pub mod leaderboard;
pub mod submit;
pub mod view_submission;
