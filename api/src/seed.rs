//! The five demo emails every fresh installation starts with. The Postgres
//! store receives the same rows from the `seed_emails` migration.

use chrono::{DateTime, TimeZone, Utc};
use webmail_types::NewEmail;

struct Fixture {
    sent_at: (i32, u32, u32, u32, u32),
    cc: &'static str,
    bcc: &'static str,
    subject: &'static str,
    body: &'static str,
}

const FIXTURES: [Fixture; 5] = [
    Fixture {
        sent_at: (2024, 1, 15, 10, 30),
        cc: "team@example.com",
        bcc: "",
        subject: "Project Update - Q1 Results",
        body: "Hi team, I wanted to share the Q1 results with everyone. We exceeded our targets by 15% and are on track for a successful year. Please review the attached report and let me know if you have any questions.",
    },
    Fixture {
        sent_at: (2024, 1, 14, 16, 45),
        cc: "",
        bcc: "",
        subject: "Meeting Tomorrow at 2 PM",
        body: "Hi, just a reminder about our meeting tomorrow at 2 PM. Please prepare the quarterly report and bring any questions you might have. We'll be discussing the upcoming project timeline.",
    },
    Fixture {
        sent_at: (2024, 1, 13, 9, 15),
        cc: "hr@example.com",
        bcc: "",
        subject: "New Employee Onboarding",
        body: "We have a new team member joining next week. Please review the onboarding schedule and make sure your departments are prepared. The new employee will be shadowing different teams for the first week.",
    },
    Fixture {
        sent_at: (2024, 1, 12, 14, 20),
        cc: "marketing@example.com",
        bcc: "legal@example.com",
        subject: "Marketing Campaign Approval",
        body: "The new marketing campaign has been reviewed and is ready for approval. Please review the materials and let us know if any changes are needed before we proceed with the launch.",
    },
    Fixture {
        sent_at: (2024, 1, 11, 11, 0),
        cc: "",
        bcc: "",
        subject: "System Maintenance Notice",
        body: "Scheduled system maintenance will occur this weekend from 2 AM to 6 AM. During this time, the email system may experience brief interruptions. We apologize for any inconvenience.",
    },
];

const SEED_RECIPIENT: &str = "me@example.com";

/// Seed emails paired with their send time, newest first.
pub fn fixtures() -> Vec<(DateTime<Utc>, NewEmail)> {
    FIXTURES
        .iter()
        .filter_map(|fixture| {
            let (year, month, day, hour, minute) = fixture.sent_at;
            let sent_at = Utc
                .with_ymd_and_hms(year, month, day, hour, minute, 0)
                .single()?;
            let email = NewEmail {
                to: SEED_RECIPIENT.to_string(),
                cc: fixture.cc.to_string(),
                bcc: fixture.bcc.to_string(),
                subject: fixture.subject.to_string(),
                body: fixture.body.to_string(),
            };
            Some((sent_at, email))
        })
        .collect()
}
