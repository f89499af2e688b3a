//! Plain-text rendering of pages and notices

use colored::{ColoredString, Colorize};

use api_models::models::UserProfile;

use crate::controller::notices::{Notice, NoticeLevel};
use crate::models::release_note::ReleaseNote;
use crate::models::review::Review;
use crate::models::schedule::{Schedule, ScheduleStatus};
use crate::models::time_slot::TimeSlot;
use crate::routes::Route;

pub fn status_colored(status: ScheduleStatus, width: usize) -> ColoredString {
    let padded = format!("{:<width$}", status.as_str(), width = width);
    match status {
        ScheduleStatus::Scheduled => padded.blue(),
        ScheduleStatus::InProgress => padded.yellow(),
        ScheduleStatus::Completed => padded.green(),
        ScheduleStatus::Failed => padded.red(),
    }
}

/// Cuts `text` to at most `width` characters
fn clip(text: &str, width: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= width {
        return single_line;
    }
    let mut clipped: String = single_line.chars().take(width.saturating_sub(1)).collect();
    clipped.push('~');
    clipped
}

fn header(route: Route) -> String {
    format!("{}\n", route.title().bold())
}

pub fn navigation(current: Option<Route>, user: Option<&UserProfile>) -> String {
    let links: Vec<String> = Route::navigation()
        .iter()
        .map(|route| {
            if Some(*route) == current {
                route.title().underline().to_string()
            } else {
                route.title().to_string()
            }
        })
        .collect();
    let mut out = links.join(" | ");
    if let Some(user) = user {
        out.push_str(&format!("    signed in as {}", user.display_name().bold()));
    }
    out.push('\n');
    out
}

pub fn schedules(records: &[Schedule]) -> String {
    let mut out = header(Route::Schedule);
    if records.is_empty() {
        out.push_str("No schedules yet\n");
        return out;
    }
    out.push_str(&format!(
        "{:<24} | {:<24} | {:<10} | {:<11} | {:<11} | {}\n",
        "ID", "APP", "DATE", "SLOT", "STATUS", "DEVELOPERS"
    ));
    for schedule in records {
        out.push_str(&format!(
            "{:<24} | {:<24} | {:<10} | {:<11} | {} | {}\n",
            schedule.id,
            clip(&schedule.app_name, 24),
            schedule.deployment_date,
            schedule.time_slot.label(),
            status_colored(schedule.status, 11),
            schedule.developers.join(", ")
        ));
        if let Some(reason) = &schedule.failure_reason {
            out.push_str(&format!("    failure: {}\n", reason.red()));
        }
    }
    out
}

pub fn schedule_detail(schedule: &Schedule) -> String {
    let mut out = format!("{} ({})\n", schedule.app_name.bold(), schedule.id);
    out.push_str(&format!(
        "  when:   {} {}\n",
        schedule.deployment_date, schedule.time_slot
    ));
    out.push_str(&format!("  status: {}\n", status_colored(schedule.status, 0)));
    if let Some(reason) = &schedule.failure_reason {
        out.push_str(&format!("  reason: {}\n", reason));
    }
    if let Some(notes) = &schedule.notes {
        out.push_str(&format!("  notes:  {}\n", notes));
    }
    if !schedule.developers.is_empty() {
        out.push_str(&format!("  team:   {}\n", schedule.developers.join(", ")));
    }
    if let Some(notification) = &schedule.notification {
        let when = notification
            .sent_at
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  notified: {} ({} recipient(s), {})\n",
            if notification.sent { "yes" } else { "no" },
            notification.recipients.len(),
            when
        ));
    }
    out
}

pub fn release_notes(records: &[ReleaseNote]) -> String {
    let mut out = header(Route::Updates);
    if records.is_empty() {
        out.push_str("No updates yet\n");
        return out;
    }
    out.push_str(&format!(
        "{:<24} | {:<24} | {:<10} | {:<10} | {}\n",
        "ID", "APP", "START", "END", "FEATURES"
    ));
    for note in records {
        out.push_str(&format!(
            "{:<24} | {:<24} | {:<10} | {:<10} | {}\n",
            note.id,
            clip(&note.app_name, 24),
            note.start_date,
            note.end_date,
            clip(&note.features_added, 60)
        ));
    }
    out
}

pub fn reviews(records: &[Review], max_rating: u8) -> String {
    let mut out = header(Route::Reviews);
    if records.is_empty() {
        out.push_str("No reviews yet\n");
        return out;
    }
    out.push_str(&format!(
        "{:<24} | {:<24} | {:<7} | {}\n",
        "ID", "APP", "RATING", "FEEDBACK"
    ));
    for review in records {
        out.push_str(&format!(
            "{:<24} | {:<24} | {:<7} | {}\n",
            review.id,
            clip(&review.app_name, 24),
            format!("{}/{}", review.rating, max_rating),
            clip(&review.feedback, 60)
        ));
        if let Some(recommendations) = &review.recommendations {
            out.push_str(&format!("    recommends: {}\n", clip(recommendations, 80)));
        }
    }
    out
}

pub fn time_slots() -> String {
    let mut out = String::new();
    for slot in TimeSlot::all() {
        out.push_str(&slot.label());
        out.push('\n');
    }
    out
}

pub fn notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Success => format!("{} {}", "✔".green(), notice.message),
        NoticeLevel::Info => format!("{} {}", "ℹ".blue(), notice.message),
        NoticeLevel::Error => format!("{} {}", "✖".red(), notice.message.red()),
    }
}
