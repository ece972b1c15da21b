//! Groups a page of tasks by sub-category.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::TaskRow;

/// Tasks of one sub-category, in the order they were listed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskGroup {
    pub category_id: i64,
    pub category_name: String,
    pub sub_category_id: i64,
    pub sub_category_name: String,
    pub tasks: Vec<TaskRow>,
}

impl TaskGroup {
    fn for_row(row: &TaskRow) -> Self {
        Self {
            category_id: row.category_id,
            category_name: row.category_name.clone(),
            sub_category_id: row.task.sub_category_id,
            sub_category_name: row.sub_category_name.clone(),
            tasks: Vec::new(),
        }
    }

    /// Heading shown above the group, e.g. `Aircraft - Narrow body`.
    pub fn title(&self) -> String {
        format!("{} - {}", self.category_name, self.sub_category_name)
    }
}

/// Groups rows by sub-category in one pass.
///
/// Groups appear in the order their sub-category is first seen, and tasks
/// keep their input order within a group. Groups are keyed by sub-category
/// id, so equally named sub-categories of different categories stay apart.
/// Only the given rows are grouped; nothing is merged across pages.
pub fn group_tasks(rows: impl IntoIterator<Item = TaskRow>) -> Vec<TaskGroup> {
    let mut groups: Vec<TaskGroup> = Vec::new();
    let mut slots: HashMap<i64, usize> = HashMap::new();

    for row in rows {
        let slot = *slots.entry(row.task.sub_category_id).or_insert_with(|| {
            groups.push(TaskGroup::for_row(&row));
            groups.len() - 1
        });
        groups[slot].tasks.push(row);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;
    use chrono::Utc;

    fn row(id: i64, sub_category_id: i64, sub: &str, category_id: i64, cat: &str) -> TaskRow {
        let now = Utc::now();
        TaskRow {
            task: Task {
                id,
                sub_category_id,
                name: format!("task-{id}"),
                description: String::new(),
                volume: 0.0,
                unit: String::new(),
                hds: String::new(),
                total: String::new(),
                price: String::new(),
                weight: 0.0,
                created_at: now,
                updated_at: now,
            },
            sub_category_name: sub.to_string(),
            category_id,
            category_name: cat.to_string(),
            latest_progress: None,
        }
    }

    fn ids(group: &TaskGroup) -> Vec<i64> {
        group.tasks.iter().map(|t| t.task.id).collect()
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_tasks(Vec::new()).is_empty());
    }

    #[test]
    fn preserves_first_seen_order() {
        let groups = group_tasks(vec![
            row(1, 20, "Wings", 1, "Airframe"),
            row(2, 10, "Engines", 1, "Airframe"),
            row(3, 20, "Wings", 1, "Airframe"),
            row(4, 30, "Seats", 2, "Cabin"),
        ]);

        let names: Vec<_> = groups.iter().map(|g| g.sub_category_name.as_str()).collect();
        assert_eq!(names, ["Wings", "Engines", "Seats"]);
        assert_eq!(ids(&groups[0]), [1, 3]);
        assert_eq!(ids(&groups[1]), [2]);
        assert_eq!(groups[2].title(), "Cabin - Seats");
    }

    #[test]
    fn same_name_under_different_categories_stays_separate() {
        let groups = group_tasks(vec![
            row(1, 10, "General", 1, "Airframe"),
            row(2, 11, "General", 2, "Cabin"),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category_name, "Airframe");
        assert_eq!(groups[1].category_name, "Cabin");
    }
}
