use browniejar_client::AppError;
use browniejar_client::redeem::plan_redemption;
use browniejar_client::stats::{
    Summary, available_points, pending_for_review, pending_own, points_for_rating, relevant_tasks,
    summarize, total_earned,
};
use browniejar_shared::api::PointsHistoryRow;
use browniejar_shared::domain::{
    BrowniePoint, PointId, PointKind, Task, TaskId, TaskKind, TaskStatus, UserId, now_utc,
};
use time::OffsetDateTime;
use time::macros::datetime;

fn task(
    id: &str,
    owner: &str,
    kind: TaskKind,
    rating: i32,
    status: TaskStatus,
    at: OffsetDateTime,
) -> Task {
    Task {
        id: TaskId::from(id),
        title: id.to_string(),
        kind,
        rating,
        user_id: UserId::from(owner),
        status,
        comment: None,
        created_at: at,
    }
}

fn point(id: &str, to: &str, points: i32, redeemed: bool, at: OffsetDateTime) -> BrowniePoint {
    BrowniePoint {
        id: PointId::from(id),
        from_user_id: UserId::from("sender"),
        to_user_id: UserId::from(to),
        kind: PointKind::Effort,
        message: format!("note {id}"),
        points,
        redeemed,
        created_at: at,
    }
}

fn history(points: i32, at: OffsetDateTime) -> PointsHistoryRow {
    PointsHistoryRow {
        points,
        created_at: at,
    }
}

fn hours_ago(h: i64) -> OffsetDateTime {
    now_utc() - time::Duration::hours(h)
}

fn days_ago(d: i64) -> OffsetDateTime {
    now_utc() - time::Duration::days(d)
}

#[test]
fn rating_conversion_steps() {
    let cases = [
        (1, 1),
        (2, 1),
        (3, 1),
        (4, 2),
        (5, 2),
        (6, 2),
        (7, 3),
        (8, 3),
        (9, 4),
        (10, 4),
    ];
    for (rating, expected) in cases {
        assert_eq!(points_for_rating(rating), expected, "rating {rating}");
    }
}

#[test]
fn summary_counts_both_partners() {
    let ada = UserId::from("ada");
    let grace = UserId::from("grace");
    let cutoff = days_ago(7);
    let tasks = [
        task("t1", "ada", TaskKind::Mental, 5, TaskStatus::Pending, hours_ago(2)),
        task("t2", "ada", TaskKind::Both, 7, TaskStatus::Approved, hours_ago(4)),
        task("t3", "grace", TaskKind::Mental, 2, TaskStatus::Approved, days_ago(1)),
        task("t4", "mallory", TaskKind::Physical, 9, TaskStatus::Approved, hours_ago(1)),
    ];
    let ledger = [history(4, days_ago(1)), history(2, days_ago(8))];

    let s = summarize(&tasks, &ledger, cutoff, &ada, Some(&grace));
    assert_eq!((s.user_task_count, s.partner_task_count), (2, 1));
    assert_eq!(s.user_contribution, 67, "2 of 3 tasks, rounded half up");
    assert_eq!(s.mental_tasks, 3, "`both` counts toward mental");
    assert_eq!(s.physical_tasks, 1);
    assert_eq!(s.user_points, 7, "pending ratings do not count");
    assert_eq!(s.partner_points, 2);
    assert_eq!(s.points_this_week, 4);
}

#[test]
fn summary_defaults_when_the_jar_is_untouched() {
    let ada = UserId::from("ada");
    let grace = UserId::from("grace");
    let cutoff = days_ago(7);
    let ledger = [history(9, days_ago(1))];

    // No tasks and no partner: the fixed default, ledger ignored.
    let s = summarize(&[], &ledger, cutoff, &ada, None);
    assert_eq!(s.user_contribution, 50);
    assert_eq!(s.points_this_week, 0);
    assert_eq!(s.user_task_count + s.partner_task_count, 0);

    // A linked partner without tasks still gets the ledger sum.
    let s = summarize(&[], &ledger, cutoff, &ada, Some(&grace));
    assert_eq!(s.user_contribution, 50, "an even split until someone logs a task");
    assert_eq!(s.points_this_week, 9);

    let d = Summary::default();
    assert_eq!(d.user_contribution, 50);
}

#[test]
fn snapshot_task_filter() {
    let ada = UserId::from("ada");
    let cutoff = days_ago(7);
    let all = [
        task("keep-pending", "grace", TaskKind::Both, 5, TaskStatus::Pending, days_ago(40)),
        task("keep-approved", "grace", TaskKind::Both, 5, TaskStatus::Approved, days_ago(2)),
        task("drop-approved", "ada", TaskKind::Both, 5, TaskStatus::Approved, days_ago(9)),
        task("keep-rejected", "ada", TaskKind::Both, 5, TaskStatus::Rejected, days_ago(60)),
        task("drop-rejected", "grace", TaskKind::Both, 5, TaskStatus::Rejected, hours_ago(1)),
    ];
    let kept: Vec<String> = relevant_tasks(&all, cutoff, &ada)
        .into_iter()
        .map(|t| t.id.0)
        .collect();
    assert_eq!(kept, ["keep-pending", "keep-approved", "keep-rejected"]);
}

#[test]
fn pending_queues_sort_newest_first() {
    let ada = UserId::from("ada");
    let tasks = [
        task("mine-old", "ada", TaskKind::Both, 5, TaskStatus::Pending, hours_ago(9)),
        task("theirs-new", "grace", TaskKind::Both, 5, TaskStatus::Pending, hours_ago(1)),
        task("theirs-old", "grace", TaskKind::Both, 5, TaskStatus::Pending, hours_ago(6)),
        task("mine-new", "ada", TaskKind::Both, 5, TaskStatus::Pending, hours_ago(3)),
        task("decided", "grace", TaskKind::Both, 5, TaskStatus::Approved, hours_ago(2)),
    ];

    let review: Vec<String> = pending_for_review(&tasks, &ada)
        .into_iter()
        .map(|t| t.id.0)
        .collect();
    assert_eq!(review, ["theirs-new", "theirs-old"]);

    let own: Vec<String> = pending_own(&tasks, &ada).into_iter().map(|t| t.id.0).collect();
    assert_eq!(own, ["mine-new", "mine-old"]);
}

#[test]
fn balance_ignores_redeemed_and_foreign_rows() {
    let ada = UserId::from("ada");
    let rows = [
        point("p1", "ada", 2, false, days_ago(1)),
        point("p2", "ada", 3, true, days_ago(2)),
        point("p3", "grace", 4, false, days_ago(3)),
    ];
    assert_eq!(available_points(&rows, &ada), 2);

    let ledger = [history(3, days_ago(1)), history(5, days_ago(400))];
    assert_eq!(total_earned(&ledger), 8, "lifetime total has no window");
}

#[test]
fn redemption_plan_is_fifo_regardless_of_input_order() {
    let d1 = datetime!(2026-08-10 08:00 UTC);
    let d2 = datetime!(2026-08-12 09:30 UTC);
    // Rows arrive newest first; the planner re-sorts.
    let rows = [point("p2", "ada", 4, false, d2), point("p1", "ada", 2, false, d1)];

    let plan = plan_redemption(&rows, 5).unwrap();
    assert_eq!(plan.delete_ids, [PointId::from("p1"), PointId::from("p2")]);
    assert_eq!(plan.reinsert.len(), 1);
    let rest = &plan.reinsert[0];
    assert_eq!(rest.points, 1);
    assert_eq!(rest.created_at, Some(d2), "remainder keeps the split row's age");
    assert_eq!(rest.message, "note p2");
    assert_eq!(rest.kind, PointKind::Effort);
    assert!(!rest.redeemed);
}

#[test]
fn redemption_plan_splits_midway_and_leaves_the_tail() {
    let d1 = datetime!(2026-08-01 10:00 UTC);
    let d2 = datetime!(2026-08-02 10:00 UTC);
    let d3 = datetime!(2026-08-03 10:00 UTC);
    let rows = [
        point("p1", "ada", 3, false, d1),
        point("p2", "ada", 5, false, d2),
        point("p3", "ada", 2, false, d3),
    ];

    let plan = plan_redemption(&rows, 6).unwrap();
    assert_eq!(plan.delete_ids, [PointId::from("p1"), PointId::from("p2")]);
    assert_eq!(plan.reinsert.len(), 2, "overshoot comes back as one-point rows");
    for rest in &plan.reinsert {
        assert_eq!(rest.points, 1);
        assert_eq!(rest.created_at, Some(d2));
        assert_eq!(rest.message, "note p2");
    }
}

#[test]
fn redemption_plan_exact_and_short_balances() {
    let d1 = datetime!(2026-08-01 10:00 UTC);
    let d2 = datetime!(2026-08-02 10:00 UTC);
    let rows = [point("p1", "ada", 2, false, d1), point("p2", "ada", 3, false, d2)];

    let plan = plan_redemption(&rows, 5).unwrap();
    assert_eq!(plan.delete_ids.len(), 2);
    assert!(plan.reinsert.is_empty(), "exact consumption recreates nothing");

    match plan_redemption(&rows, 6).unwrap_err() {
        AppError::InsufficientPoints { needed, available } => {
            assert_eq!((needed, available), (6, 5));
        }
        other => panic!("unexpected error: {other}"),
    }

    match plan_redemption(&[], 1).unwrap_err() {
        AppError::InsufficientPoints { needed, available } => {
            assert_eq!((needed, available), (1, 0));
        }
        other => panic!("unexpected error: {other}"),
    }
}
