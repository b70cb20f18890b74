//! Property tests for the filter pipeline and the identity/timestamp policy.

use flowtask_core::lifecycle::{materialize, merge, next_task_id};
use flowtask_core::{
    NewTask, Priority, PriorityFilter, StatusFilter, Task, TaskFilter, TaskId, TaskPatch, apply_filters,
};
use proptest::prelude::*;
use time::OffsetDateTime;
use time::macros::datetime;

fn priority_strategy() -> impl Strategy<Value = Priority> {
    prop_oneof![Just(Priority::Low), Just(Priority::Medium), Just(Priority::High)]
}

fn priority_filter_strategy() -> impl Strategy<Value = PriorityFilter> {
    prop_oneof![
        Just(PriorityFilter::All),
        priority_strategy().prop_map(PriorityFilter::Only),
    ]
}

fn status_filter_strategy() -> impl Strategy<Value = StatusFilter> {
    prop_oneof![
        Just(StatusFilter::All),
        Just(StatusFilter::Active),
        Just(StatusFilter::Completed),
    ]
}

fn tasks_strategy() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(("[a-cA-C ]{0,6}", priority_strategy(), any::<bool>()), 0..32).prop_map(
        |rows| {
            rows.into_iter()
                .zip(1..)
                .map(|((title, priority, completed), id)| {
                    let mut task = materialize(
                        TaskId(id),
                        NewTask {
                            title,
                            priority: Some(priority),
                            ..NewTask::default()
                        },
                        OffsetDateTime::UNIX_EPOCH,
                    );
                    task.completed = completed;
                    task
                })
                .collect()
        },
    )
}

fn filter_strategy() -> impl Strategy<Value = TaskFilter> {
    ("[a-cA-C]{0,2}", priority_filter_strategy(), status_filter_strategy()).prop_map(
        |(search, priority, status)| TaskFilter {
            search,
            priority,
            status,
        },
    )
}

fn only_search(filter: &TaskFilter) -> TaskFilter {
    TaskFilter {
        search: filter.search.clone(),
        ..TaskFilter::default()
    }
}

fn only_priority(filter: &TaskFilter) -> TaskFilter {
    TaskFilter {
        priority: filter.priority,
        ..TaskFilter::default()
    }
}

fn only_status(filter: &TaskFilter) -> TaskFilter {
    TaskFilter {
        status: filter.status,
        ..TaskFilter::default()
    }
}

proptest! {
    #[test]
    fn filtering_is_idempotent(tasks in tasks_strategy(), filter in filter_strategy()) {
        let once = apply_filters(&tasks, &filter);
        let twice = apply_filters(&once, &filter);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn predicate_order_does_not_matter(tasks in tasks_strategy(), filter in filter_strategy()) {
        let combined = apply_filters(&tasks, &filter);

        let status_first = apply_filters(
            &apply_filters(&apply_filters(&tasks, &only_status(&filter)), &only_priority(&filter)),
            &only_search(&filter),
        );
        let priority_first = apply_filters(
            &apply_filters(&apply_filters(&tasks, &only_priority(&filter)), &only_search(&filter)),
            &only_status(&filter),
        );

        prop_assert_eq!(&combined, &status_first);
        prop_assert_eq!(&combined, &priority_first);
    }

    #[test]
    fn filtered_result_is_an_ordered_subsequence(tasks in tasks_strategy(), filter in filter_strategy()) {
        let filtered = apply_filters(&tasks, &filter);
        let mut remaining = tasks.iter();
        for kept in &filtered {
            prop_assert!(filter.matches(kept));
            prop_assert!(remaining.any(|task| task == kept));
        }
        let expected = tasks.iter().filter(|task| filter.matches(task)).count();
        prop_assert_eq!(filtered.len(), expected);
    }

    #[test]
    fn ids_follow_the_running_maximum(seed_ids in prop::collection::btree_set(1u64..500, 0..16), creates in 1usize..12) {
        let mut tasks: Vec<Task> = seed_ids
            .iter()
            .map(|&id| materialize(TaskId(id), NewTask::titled("seed"), OffsetDateTime::UNIX_EPOCH))
            .collect();

        for _ in 0..creates {
            let expected = tasks.iter().map(|task| task.id.get()).max().unwrap_or(0) + 1;
            prop_assert_eq!(next_task_id(&tasks), Some(TaskId(expected)));
            let id = TaskId(expected);
            prop_assert!(tasks.iter().all(|task| task.id < id));
            tasks.push(materialize(id, NewTask::titled("new"), OffsetDateTime::UNIX_EPOCH));
        }
    }

    #[test]
    fn completed_at_tracks_merged_completion(
        start_completed in any::<bool>(),
        completed in prop::option::of(any::<bool>()),
        title in prop::option::of("[a-z]{1,8}"),
        priority in prop::option::of(priority_strategy()),
    ) {
        let created = datetime!(2025-01-01 00:00:00 UTC);
        let mut task = materialize(TaskId(1), NewTask::titled("start"), created);
        task = merge(&task, TaskPatch::completion(start_completed), created);

        let now = datetime!(2025-06-01 12:00:00 UTC);
        let patch = TaskPatch { title, completed, priority, ..TaskPatch::default() };
        let merged = merge(&task, patch, now);

        prop_assert_eq!(merged.completed_at.is_some(), merged.completed);
        if merged.completed {
            prop_assert_eq!(merged.completed_at, Some(now));
        }
        prop_assert_eq!(merged.created_at, created);
        prop_assert_eq!(merged.id, task.id);
    }
}
