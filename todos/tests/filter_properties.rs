//! Property tests for the filtered views and counts.

use checklist_todos::filter::{TodoCounts, TodoFilter, visible};
use checklist_todos::{Todo, TodoId, UserId};
use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;

fn collection() -> impl Strategy<Value = Vec<Todo>> {
    prop::collection::vec((any::<bool>(), "[a-z ]{1,12}"), 0..40).prop_map(|rows| {
        let base = DateTime::<Utc>::default();
        rows.into_iter()
            .enumerate()
            .map(|(i, (completed, title))| {
                let created_at = base + Duration::minutes(i64::try_from(i).unwrap_or_default());
                Todo {
                    id: TodoId::new(format!("todo-{i}")),
                    title,
                    description: None,
                    completed,
                    created_at,
                    updated_at: created_at,
                    user_id: UserId::new("u1"),
                }
            })
            .collect()
    })
}

fn filter() -> impl Strategy<Value = TodoFilter> {
    prop::sample::select(TodoFilter::ALL.to_vec())
}

proptest! {
    #[test]
    fn pending_and_completed_partition_the_collection(todos in collection()) {
        let pending = visible(&todos, TodoFilter::Pending);
        let completed = visible(&todos, TodoFilter::Completed);

        prop_assert_eq!(pending.len() + completed.len(), todos.len());
        for todo in &pending {
            prop_assert!(!completed.iter().any(|other| other.id == todo.id));
        }
    }

    #[test]
    fn visible_is_an_ordered_subset(todos in collection(), filter in filter()) {
        let shown = visible(&todos, filter);

        prop_assert!(shown.iter().all(|todo| todos.contains(todo)));
        prop_assert!(shown.iter().all(|todo| filter.matches(todo)));

        let positions: Vec<usize> = shown
            .iter()
            .filter_map(|todo| todos.iter().position(|t| t.id == todo.id))
            .collect();
        prop_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn all_filter_shows_everything(todos in collection()) {
        prop_assert_eq!(visible(&todos, TodoFilter::All).len(), todos.len());
    }

    #[test]
    fn counts_match_views_and_ignore_filter(todos in collection(), filter in filter()) {
        let counts = TodoCounts::of(&todos);

        prop_assert_eq!(counts.total, todos.len());
        prop_assert_eq!(counts.pending + counts.completed, counts.total);
        prop_assert_eq!(counts.for_filter(filter), visible(&todos, filter).len());
    }

    #[test]
    fn filter_names_round_trip(filter in filter()) {
        prop_assert_eq!(filter.to_string().parse::<TodoFilter>(), Ok(filter));
    }
}
