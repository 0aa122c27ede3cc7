use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Server-assigned group identifier.
    GroupId
);
id_type!(EmployeeId);
id_type!(TaskId);

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub employee_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub task_count: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
    #[serde(other)]
    Unknown,
}

impl EmployeeStatus {
    pub const fn badge(self) -> Badge {
        match self {
            EmployeeStatus::Active => Badge::new("Активен", BadgeVariant::Default),
            EmployeeStatus::Inactive | EmployeeStatus::Unknown => {
                Badge::new("Неактивен", BadgeVariant::Secondary)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub group_id: GroupId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: EmployeeStatus,
    #[serde(default)]
    pub group_name: Option<String>,
}

/// Task lifecycle: `todo -> in_progress -> completed`.
///
/// Strings outside the enumeration land in `Unknown`, which displays like `todo` but offers no
/// transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    pub const fn label(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Unknown => "unknown",
        }
    }

    pub const fn badge(self) -> Badge {
        match self {
            TaskStatus::Todo | TaskStatus::Unknown => {
                Badge::new("К выполнению", BadgeVariant::Secondary)
            }
            TaskStatus::InProgress => Badge::new("В работе", BadgeVariant::Default),
            TaskStatus::Completed => Badge::new("Завершено", BadgeVariant::Outline),
        }
    }

    /// The single action the dashboard offers for a task in this state.
    pub const fn available_action(self) -> Option<TaskAction> {
        match self {
            TaskStatus::Todo => Some(TaskAction::Start),
            TaskStatus::InProgress => Some(TaskAction::Complete),
            TaskStatus::Completed | TaskStatus::Unknown => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed)
    }

    /// Whether the dashboard exposes a move from `self` to `next`.
    pub fn can_advance_to(self, next: TaskStatus) -> bool {
        self.available_action()
            .is_some_and(|action| action.target() == next)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    #[serde(other)]
    Unknown,
}

impl TaskPriority {
    pub const fn label(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Unknown => "unknown",
        }
    }

    /// Unknown priorities display as medium.
    pub const fn badge(self) -> Badge {
        match self {
            TaskPriority::High => Badge::new("Высокий", BadgeVariant::Destructive),
            TaskPriority::Medium | TaskPriority::Unknown => {
                Badge::new("Средний", BadgeVariant::Default)
            }
            TaskPriority::Low => Badge::new("Низкий", BadgeVariant::Secondary),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub group_id: GroupId,
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: TaskPriority,
    #[serde(default)]
    pub employee_name: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,
}

impl Task {
    pub fn is_assigned(&self) -> bool {
        self.employee_id.is_some()
    }
}

/// Dashboard affordance attached to a task card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    Start,
    Complete,
}

impl TaskAction {
    pub const fn target(self) -> TaskStatus {
        match self {
            TaskAction::Start => TaskStatus::InProgress,
            TaskAction::Complete => TaskStatus::Completed,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            TaskAction::Start => "Начать работу",
            TaskAction::Complete => "Завершить",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeVariant {
    Default,
    Secondary,
    Outline,
    Destructive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: &'static str,
    pub variant: BadgeVariant,
}

impl Badge {
    const fn new(label: &'static str, variant: BadgeVariant) -> Self {
        Self { label, variant }
    }
}

/// Draft for the "add employee" dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFields {
    pub group_id: Option<GroupId>,
    pub name: String,
    pub position: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Draft for the "new task" dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFields {
    pub group_id: Option<GroupId>,
    pub employee_id: Option<EmployeeId>,
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
}

/// Body for `POST ?resource=employees`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewEmployee {
    pub group_id: GroupId,
    pub name: String,
    pub position: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: EmployeeStatus,
}

/// Body for `POST ?resource=tasks`. `employee_id: null` means unassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub group_id: GroupId,
    pub employee_id: Option<EmployeeId>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
}

/// Body for `PUT ?resource=tasks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskStatusChange {
    pub id: TaskId,
    pub status: TaskStatus,
}

/// Body for `PUT ?resource=employees`. Absent fields are left unchanged on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeUpdate {
    pub id: EmployeeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EmployeeStatus>,
}

impl EmployeeUpdate {
    pub fn new(id: EmployeeId) -> Self {
        Self {
            id,
            name: None,
            position: None,
            email: None,
            phone: None,
            status: None,
        }
    }

    pub fn status(id: EmployeeId, status: EmployeeStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::new(id)
        }
    }

    /// Trim text fields and reject updates that would blank a required column.
    pub fn normalized(&self) -> Result<Self, FieldError> {
        let name = self
            .name
            .as_deref()
            .map(|name| required(name, "name"))
            .transpose()?;
        let position = self
            .position
            .as_deref()
            .map(|position| required(position, "position"))
            .transpose()?;
        if self.status == Some(EmployeeStatus::Unknown) {
            return Err(FieldError::Unsupported("status"));
        }

        let update = Self {
            id: self.id,
            name,
            position,
            email: self.email.as_ref().map(|email| email.trim().to_string()),
            phone: self.phone.as_ref().map(|phone| phone.trim().to_string()),
            status: self.status,
        };
        if update == Self::new(self.id) {
            return Err(FieldError::Empty);
        }
        Ok(update)
    }
}

/// Body for `PUT ?resource=tasks` changing the title or the assignee.
///
/// `employee_id: Some(None)` is sent as `null` and unassigns the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskEdit {
    pub id: TaskId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<Option<EmployeeId>>,
}

impl TaskEdit {
    pub fn reassign(id: TaskId, employee: Option<EmployeeId>) -> Self {
        Self {
            id,
            title: None,
            employee_id: Some(employee),
        }
    }

    pub fn rename(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: Some(title.into()),
            employee_id: None,
        }
    }

    pub fn normalized(&self) -> Result<Self, FieldError> {
        let title = self
            .title
            .as_deref()
            .map(|title| required(title, "title"))
            .transpose()?;
        if title.is_none() && self.employee_id.is_none() {
            return Err(FieldError::Empty);
        }
        Ok(Self {
            id: self.id,
            title,
            employee_id: self.employee_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("field `{0}` is required")]
    Missing(&'static str),
    #[error("field `{0}` has an unsupported value")]
    Unsupported(&'static str),
    #[error("nothing to update")]
    Empty,
}

fn required(value: &str, field: &'static str) -> Result<String, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FieldError::Missing(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl EmployeeFields {
    /// New employees always start out active.
    pub fn to_request(&self) -> Result<NewEmployee, FieldError> {
        Ok(NewEmployee {
            group_id: self.group_id.ok_or(FieldError::Missing("group_id"))?,
            name: required(&self.name, "name")?,
            position: required(&self.position, "position")?,
            email: optional(&self.email),
            phone: optional(&self.phone),
            status: EmployeeStatus::Active,
        })
    }
}

impl TaskFields {
    /// New tasks always start in `todo`.
    pub fn to_request(&self) -> Result<NewTask, FieldError> {
        let priority = match self.priority {
            TaskPriority::Unknown => TaskPriority::Medium,
            known => known,
        };
        Ok(NewTask {
            group_id: self.group_id.ok_or(FieldError::Missing("group_id"))?,
            employee_id: self.employee_id,
            title: required(&self.title, "title")?,
            description: optional(&self.description),
            status: TaskStatus::Todo,
            priority,
        })
    }
}
