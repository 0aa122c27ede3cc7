use serde::Serialize;

use super::domain::{Employee, Group, GroupId, Task, TaskId};

/// The three collections as returned by one successful fetch-all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DepartmentSnapshot {
    pub groups: Vec<Group>,
    pub employees: Vec<Employee>,
    pub tasks: Vec<Task>,
}

/// Dashboard state container.
///
/// Collections are only ever swapped as a whole through [`DashboardState::set_collections`], so
/// readers never observe groups from one fetch next to tasks from another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardState {
    snapshot: DepartmentSnapshot,
    selected_group: Option<GroupId>,
    loading: bool,
    generation: u64,
    applied_refresh: u64,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            snapshot: DepartmentSnapshot::default(),
            selected_group: None,
            loading: true,
            generation: 0,
            applied_refresh: 0,
        }
    }
}

impl DashboardState {
    pub fn set_collections(&mut self, snapshot: DepartmentSnapshot) {
        self.snapshot = snapshot;
        self.generation += 1;
    }

    /// Apply the result of refresh number `refresh` unless a later-started one already landed.
    pub fn apply_refresh(&mut self, refresh: u64, snapshot: DepartmentSnapshot) -> bool {
        if refresh <= self.applied_refresh {
            return false;
        }
        self.applied_refresh = refresh;
        self.set_collections(snapshot);
        true
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Select `group`, or clear the filter when it is already selected.
    pub fn select_group(&mut self, group: GroupId) {
        self.selected_group = if self.selected_group == Some(group) {
            None
        } else {
            Some(group)
        };
    }

    pub fn snapshot(&self) -> &DepartmentSnapshot {
        &self.snapshot
    }

    pub fn groups(&self) -> &[Group] {
        &self.snapshot.groups
    }

    pub fn selected_group(&self) -> Option<GroupId> {
        self.selected_group
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Number of snapshots applied so far; 0 until the first successful fetch.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.snapshot.groups.iter().find(|group| group.id == id)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.snapshot.tasks.iter().find(|task| task.id == id)
    }

    /// `None` returns every employee.
    pub fn employees_in_group(&self, group: Option<GroupId>) -> Vec<&Employee> {
        self.snapshot
            .employees
            .iter()
            .filter(|employee| group.map_or(true, |id| employee.group_id == id))
            .collect()
    }

    /// `None` returns every task, assigned or not.
    pub fn tasks_in_group(&self, group: Option<GroupId>) -> Vec<&Task> {
        self.snapshot
            .tasks
            .iter()
            .filter(|task| group.map_or(true, |id| task.group_id == id))
            .collect()
    }

    /// Assignee choices for a task created in `group`.
    pub fn group_employees(&self, group: GroupId) -> Vec<&Employee> {
        self.employees_in_group(Some(group))
    }

    pub fn visible_employees(&self) -> Vec<&Employee> {
        self.employees_in_group(self.selected_group)
    }

    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks_in_group(self.selected_group)
    }

    /// Heading for the current view, e.g. "Задачи Дизайн" or "Все задачи".
    pub fn tasks_heading(&self) -> String {
        match self.selected_group.and_then(|id| self.group(id)) {
            Some(group) => format!("Задачи {}", group.name),
            None => "Все задачи".to_string(),
        }
    }

    pub fn employees_heading(&self) -> String {
        match self.selected_group.and_then(|id| self.group(id)) {
            Some(group) => format!("Сотрудники {}", group.name),
            None => "Все сотрудники".to_string(),
        }
    }
}
