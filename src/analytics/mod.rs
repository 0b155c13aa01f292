//! Analytics over the persisted session history
//!
//! Everything here is a pure read of finalized records and can run alongside
//! live sessions.

mod history;
mod insights;

pub use history::{insights_from_store, latest_session, session_history};
pub use insights::{
    compute_insights, current_streak, mood_distribution, top_topics, total_minutes,
    DailyActivity, InsightsReport, MoodCount, TopicCount, ACTIVITY_DAYS, STREAK_SCAN_DAYS,
    TOP_TOPICS,
};
