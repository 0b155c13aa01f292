use crate::session::{Mood, StoredSession};
use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Calendar days covered by the activity buckets, today included
pub const ACTIVITY_DAYS: i64 = 7;

/// How far back the streak scan looks
pub const STREAK_SCAN_DAYS: i64 = 30;

pub const TOP_TOPICS: usize = 5;

/// Score used when a session carries no mood
const DEFAULT_MOOD_SCORE: u8 = 3;

/// Activity for one local calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    /// Short weekday name, e.g. `Mon`
    pub day: String,
    pub sessions: usize,
    pub total_minutes: i64,
    /// Mood score (1-5) of the last session processed for this day
    pub mood_score: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodCount {
    pub mood: Mood,
    pub name: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicCount {
    pub topic: String,
    pub count: usize,
}

/// Statistics reconstructed from the stored session history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightsReport {
    /// Oldest day first, today last
    pub daily: Vec<DailyActivity>,
    pub mood_distribution: Vec<MoodCount>,
    pub top_topics: Vec<TopicCount>,
    pub total_sessions: usize,
    pub total_minutes: i64,
    pub average_session_minutes: i64,
    pub current_streak: u32,
}

impl InsightsReport {
    /// Total time split into whole hours and remaining minutes
    pub fn hours_minutes(&self) -> (i64, i64) {
        (self.total_minutes / 60, self.total_minutes % 60)
    }
}

/// Compute insights over `sessions` (newest first) as of `now`.
///
/// Sessions are bucketed by their creation instant converted to `now`'s time
/// zone, so "today" is the caller's local calendar day.
pub fn compute_insights<Tz: TimeZone>(sessions: &[StoredSession], now: &DateTime<Tz>) -> InsightsReport {
    let tz = now.timezone();
    let today = now.date_naive();
    let local_dates: Vec<NaiveDate> = sessions
        .iter()
        .map(|s| s.created_at.with_timezone(&tz).date_naive())
        .collect();

    let total_minutes = total_minutes(sessions);
    let average_session_minutes = if sessions.is_empty() {
        0
    } else {
        (total_minutes as f64 / sessions.len() as f64).round() as i64
    };

    let active_days: HashSet<NaiveDate> = local_dates.iter().copied().collect();

    InsightsReport {
        daily: daily_activity(sessions, &local_dates, today),
        mood_distribution: mood_distribution(sessions),
        top_topics: top_topics(sessions),
        total_sessions: sessions.len(),
        total_minutes,
        average_session_minutes,
        current_streak: current_streak(&active_days, today),
    }
}

fn daily_activity(
    sessions: &[StoredSession],
    local_dates: &[NaiveDate],
    today: NaiveDate,
) -> Vec<DailyActivity> {
    let mut days: Vec<DailyActivity> = (0..ACTIVITY_DAYS)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            DailyActivity {
                date,
                day: date.format("%a").to_string(),
                sessions: 0,
                total_minutes: 0,
                mood_score: None,
            }
        })
        .collect();

    for (session, date) in sessions.iter().zip(local_dates) {
        if let Some(day) = days.iter_mut().find(|d| d.date == *date) {
            day.sessions += 1;
            day.total_minutes += session.record.duration_minutes.unwrap_or(0);
            day.mood_score = Some(
                session
                    .record
                    .mood_after
                    .map(Mood::score)
                    .unwrap_or(DEFAULT_MOOD_SCORE),
            );
        }
    }

    days
}

/// Sessions per mood, in mood order, omitting moods nobody reported
pub fn mood_distribution(sessions: &[StoredSession]) -> Vec<MoodCount> {
    let mut counts: BTreeMap<Mood, usize> = BTreeMap::new();
    for mood in sessions.iter().filter_map(|s| s.record.mood_after) {
        *counts.entry(mood).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(mood, count)| MoodCount {
            mood,
            name: mood.display_name(),
            count,
        })
        .collect()
}

/// The most frequent topics, most frequent first
pub fn top_topics(sessions: &[StoredSession]) -> Vec<TopicCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<TopicCount> = Vec::new();

    for topic in sessions.iter().flat_map(|s| s.record.topics.iter()) {
        match index.get(topic.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(topic.as_str(), counts.len());
                counts.push(TopicCount {
                    topic: topic.clone(),
                    count: 1,
                });
            }
        }
    }

    // Stable: ties keep first-seen order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_TOPICS);
    counts
}

pub fn total_minutes(sessions: &[StoredSession]) -> i64 {
    sessions
        .iter()
        .map(|s| s.record.duration_minutes.unwrap_or(0))
        .sum()
}

/// Consecutive days with at least one session, counting back from `today`.
///
/// A day without sessions ends the streak, except today itself: an empty
/// today is skipped and the count continues from yesterday.
pub fn current_streak(active_days: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;

    for offset in 0..STREAK_SCAN_DAYS {
        let day = today - Duration::days(offset);
        if active_days.contains(&day) {
            streak += 1;
        } else if offset > 0 {
            break;
        }
    }

    streak
}
