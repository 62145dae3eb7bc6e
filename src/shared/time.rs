use chrono::{DateTime, Utc};

/// タイムスタンプを相対表記にする。30日以上前は日付そのまま。
pub fn time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);
    let days = elapsed.num_days();

    if days >= 30 {
        return timestamp.format("%B %-d, %Y").to_string();
    }
    if days > 1 {
        return format!("{days} days ago");
    }
    if days == 1 {
        return "1 day ago".to_string();
    }

    let hours = elapsed.num_hours();
    if hours >= 1 {
        return format!("{hours} hours ago");
    }

    let minutes = elapsed.num_minutes();
    if minutes >= 1 {
        return format!("{minutes} minutes ago");
    }

    "Just now".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn fresh_timestamps_are_just_now() {
        let now = Utc::now();
        assert_eq!(time_ago(now, now), "Just now");
        assert_eq!(time_ago(now - Duration::seconds(30), now), "Just now");
    }

    #[test]
    fn minutes_and_hours_are_spelled_out() {
        let now = Utc::now();
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(time_ago(now - Duration::hours(3), now), "3 hours ago");
    }

    #[test]
    fn days_have_a_singular_form() {
        let now = Utc::now();
        assert_eq!(time_ago(now - Duration::days(1), now), "1 day ago");
        assert_eq!(time_ago(now - Duration::days(12), now), "12 days ago");
    }

    #[test]
    fn a_month_or_older_falls_back_to_the_date() {
        let now = Utc::now();
        let old = now - Duration::days(45);
        let rendered = time_ago(old, now);
        assert!(rendered.contains(&old.format("%Y").to_string()));
        assert!(!rendered.contains("ago"));
    }
}
