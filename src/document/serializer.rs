//! Rendering tasks back into canonical section text.

use crate::document::headers::SectionHeaders;
use crate::document::task::Task;

/// Render the task section, plus the abandoned section when needed.
///
/// Non-abandoned tasks go under the task header in their original relative
/// order; the header is always emitted, even with no tasks under it.
/// Abandoned tasks go under the abandoned header, re-normalized to `[~]`, and
/// the whole abandoned block is omitted when there are none. The result has
/// no trailing newline.
pub fn serialize_tasks(tasks: &[Task], headers: &SectionHeaders) -> String {
    let (abandoned, main): (Vec<&Task>, Vec<&Task>) =
        tasks.iter().partition(|task| task.is_abandoned());

    let mut lines = vec![headers.task.clone(), String::new()];
    lines.extend(main.iter().map(|task| task.to_line()));

    if !abandoned.is_empty() {
        lines.push(String::new());
        lines.push(headers.abandoned.clone());
        lines.push(String::new());
        lines.extend(abandoned.iter().map(|task| task.to_line()));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::parse_tasks;
    use crate::document::task::TaskStatus;

    fn headers() -> SectionHeaders {
        SectionHeaders::default()
    }

    #[test]
    fn test_empty_list_emits_header_only() {
        assert_eq!(serialize_tasks(&[], &headers()), "## Task\n");
    }

    #[test]
    fn test_main_tasks_only() {
        let tasks = vec![
            Task::new(1, "write report", TaskStatus::Pending),
            Task::new(2, "email client", TaskStatus::Done),
        ];
        assert_eq!(
            serialize_tasks(&tasks, &headers()),
            "## Task\n\n- [ ] write report\n- [x] email client"
        );
    }

    #[test]
    fn test_abandoned_partitioned_in_relative_order() {
        let tasks = vec![
            Task::new(1, "a", TaskStatus::Abandoned),
            Task::new(2, "b", TaskStatus::Pending),
            Task::new(3, "c", TaskStatus::Abandoned),
            Task::new(4, "d", TaskStatus::Done),
        ];
        assert_eq!(
            serialize_tasks(&tasks, &headers()),
            "## Task\n\n- [ ] b\n- [x] d\n\n## Abandoned\n\n- [~] a\n- [~] c"
        );
    }

    #[test]
    fn test_only_abandoned_keeps_empty_task_header() {
        let tasks = vec![Task::new(1, "gone", TaskStatus::Abandoned)];
        assert_eq!(
            serialize_tasks(&tasks, &headers()),
            "## Task\n\n\n## Abandoned\n\n- [~] gone"
        );
    }

    #[test]
    fn test_abandoned_marker_is_normalized() {
        let doc = "## Abandoned\n- [x] was done\n";
        let tasks = parse_tasks(doc, &headers());
        assert!(serialize_tasks(&tasks, &headers()).ends_with("- [~] was done"));
    }

    #[test]
    fn test_round_trip_example() {
        let doc = "# 2024-01-01\n\n## Task\n\n- [ ] write report\n- [x] email client\n\n## Abandoned\n\n- [~] old\n";
        let first = parse_tasks(doc, &headers());
        let second = parse_tasks(&serialize_tasks(&first, &headers()), &headers());
        assert_eq!(first, second);
    }

    #[test]
    fn test_abandoned_inside_task_section_is_reindexed() {
        let doc = "## Task\n- [~] dropped\n- [ ] a\n- [x] b\n";
        let first = parse_tasks(doc, &headers());
        let summary = |tasks: &[Task]| -> Vec<(usize, String, TaskStatus)> {
            tasks
                .iter()
                .map(|t| (t.index, t.title.clone(), t.status))
                .collect()
        };
        assert_eq!(
            summary(&first),
            vec![
                (1, "dropped".to_string(), TaskStatus::Abandoned),
                (2, "a".to_string(), TaskStatus::Pending),
                (3, "b".to_string(), TaskStatus::Done),
            ]
        );

        let second = parse_tasks(&serialize_tasks(&first, &headers()), &headers());
        assert_eq!(
            summary(&second),
            vec![
                (1, "a".to_string(), TaskStatus::Pending),
                (2, "b".to_string(), TaskStatus::Done),
                (3, "dropped".to_string(), TaskStatus::Abandoned),
            ]
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_status() -> impl Strategy<Value = TaskStatus> {
            prop_oneof![
                Just(TaskStatus::Pending),
                Just(TaskStatus::Done),
                Just(TaskStatus::Abandoned),
            ]
        }

        /// Tasks in canonical order: all non-abandoned first.
        fn arb_canonical_tasks() -> impl Strategy<Value = Vec<Task>> {
            prop::collection::vec((arb_status(), "[a-z][a-z ]{0,15}[a-z]?"), 0..20).prop_map(
                |mut items| {
                    items.sort_by_key(|(status, _)| *status == TaskStatus::Abandoned);
                    items
                        .into_iter()
                        .enumerate()
                        .map(|(i, (status, title))| {
                            Task::new(i + 1, title.trim().to_string(), status)
                        })
                        .collect()
                },
            )
        }

        fn key(tasks: &[Task]) -> Vec<(usize, String, TaskStatus)> {
            tasks
                .iter()
                .map(|t| (t.index, t.title.clone(), t.status))
                .collect()
        }

        proptest! {
            // Property: parse(serialize(tasks)) == tasks for canonical lists
            #[test]
            fn prop_round_trip(tasks in arb_canonical_tasks()) {
                let headers = SectionHeaders::default();
                let parsed = parse_tasks(&serialize_tasks(&tasks, &headers), &headers);
                prop_assert_eq!(key(&parsed), key(&tasks));
            }

            // Property: one parse/serialize pass reaches a fixed point
            #[test]
            fn prop_serialize_is_fixed_point(tasks in arb_canonical_tasks(), shuffle in any::<bool>()) {
                let headers = SectionHeaders::default();
                let mut input = tasks;
                if shuffle {
                    input.reverse();
                }
                let once = serialize_tasks(&input, &headers);
                let twice = serialize_tasks(&parse_tasks(&once, &headers), &headers);
                prop_assert_eq!(once, twice);
            }
        }
    }
}
