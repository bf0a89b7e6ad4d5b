//! End-to-end flow: calendar -> reschedule -> focus session -> record.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use slotwise_core::{
    CalendarProvider, EngineConfig, Event, FixedCalendar, Interval, MemorySessionStore, Phase,
    PomodoroConfig, PomodoroSession, ProjectContext, SessionState, Task,
};

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

// 2026-03-02 is a Monday.
fn monday(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap()
}

#[tokio::test]
async fn schedule_then_work_a_session() {
    let now = monday(8, 0);

    // Calendar has a standup 10:00-11:00.
    let calendar = FixedCalendar::new(vec![Interval::new(monday(10, 0), monday(11, 0))]);

    let mut projects = HashMap::new();
    projects.insert(
        "acme".to_string(),
        ProjectContext {
            project_weight: 70.0,
            client_weight: 80.0,
        },
    );

    let report = Task::new("report", "Quarterly report", 90)
        .with_due_date(now + Duration::days(1))
        .with_project("acme")
        .with_created_at(now - Duration::days(2));
    let cleanup = Task::new("cleanup", "Inbox cleanup", 30).with_created_at(now - Duration::days(1));

    let rescheduler = EngineConfig::default().rescheduler().unwrap();
    let outcome = rescheduler
        .reschedule_via(
            &calendar,
            &[report, cleanup],
            &projects,
            monday(0, 0),
            monday(23, 0),
            now,
            1,
        )
        .await
        .unwrap();

    // The report is packed first, but 90 contiguous minutes only exist
    // after the standup: 9:00-10:00 is a two-slot run.
    let report_iv = outcome.assignments["report"].unwrap();
    assert_eq!(report_iv, Interval::new(monday(11, 0), monday(12, 30)));
    assert!(!report_iv.overlaps(&Interval::new(monday(10, 0), monday(11, 0))));
    assert_eq!(outcome.ranked[0], "report");

    // The half-hour cleanup then takes the first morning slot.
    let cleanup_iv = outcome.assignments["cleanup"].unwrap();
    assert_eq!(cleanup_iv, Interval::new(monday(9, 0), monday(9, 30)));
    assert_eq!(outcome.unplaced(), 0);

    // Publish the assignment to the calendar.
    let event_id = calendar
        .create_event(report_iv, serde_json::json!({ "task": "report" }))
        .await
        .unwrap();
    assert_eq!(calendar.created_events().len(), 1);

    // Work a focus interval against the scheduled task.
    let mut session = PomodoroSession::new(PomodoroConfig {
        work_min: 1,
        break_min: 1,
    })
    .with_task("report");
    session.start();
    for _ in 0..60 {
        session.tick();
    }
    assert_eq!(session.phase(), Phase::Break);
    assert_eq!(session.state(), SessionState::Paused);
    assert_eq!(session.completed_work_intervals(), 1);

    let store = MemorySessionStore::new();
    session.persist_into(&store).unwrap();
    let records = store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].task_id.as_deref(), Some("report"));

    // Cleanup path for a superseded assignment.
    calendar.delete_event(&event_id).await.unwrap();
    assert!(calendar.created_events().is_empty());
}

#[tokio::test]
async fn newer_pass_supersedes_older_by_sequence_number() {
    let now = monday(8, 0);
    let calendar = FixedCalendar::new(Vec::new());
    let task = Task::new("t", "task", 60).with_created_at(now);
    let rescheduler = EngineConfig::default().rescheduler().unwrap();
    let projects = HashMap::new();

    let first = rescheduler
        .reschedule_via(&calendar, std::slice::from_ref(&task), &projects, monday(0, 0), monday(23, 0), now, 1)
        .await
        .unwrap();
    let second = rescheduler
        .reschedule_via(&calendar, &[task], &projects, monday(0, 0), monday(23, 0), now, 2)
        .await
        .unwrap();

    // The engine holds no session state; callers keep the outcome with
    // the highest sequence number.
    let latest = if second.seq > first.seq { &second } else { &first };
    assert_eq!(latest.seq, 2);

    match latest.event(now) {
        Event::ScheduleComputed { seq, placed, .. } => {
            assert_eq!(seq, 2);
            assert_eq!(placed, 1);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}
