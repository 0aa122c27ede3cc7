//! In-memory stand-in for the submission and department endpoints.
//!
//! Speaks the same JSON contracts as the deployed endpoints so the console and the integration
//! tests can run without them. Nothing is persisted and no e-mail is sent.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use tracing::info;

use crate::careers::application::is_valid_email;
use crate::careers::ApplicationType;
use crate::department::{
    Employee, EmployeeId, EmployeeStatus, Group, GroupId, Task, TaskId, TaskPriority, TaskStatus,
};

pub const APPLICATIONS_PATH: &str = "/applications";
pub const DEPARTMENT_PATH: &str = "/department";

/// Application accepted by the sandbox, kept for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredApplication {
    pub id: i64,
    pub application_type: ApplicationType,
    pub email: String,
    pub body: Value,
}

#[derive(Debug, Default)]
struct SandboxData {
    groups: BTreeMap<GroupId, Group>,
    employees: BTreeMap<EmployeeId, Employee>,
    tasks: BTreeMap<TaskId, Task>,
    applications: Vec<StoredApplication>,
    next_id: i64,
}

impl SandboxData {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn group_name(&self, id: GroupId) -> Option<String> {
        self.groups.get(&id).map(|group| group.name.clone())
    }

    fn groups_view(&self) -> Vec<Group> {
        self.groups
            .values()
            .map(|group| Group {
                employee_count: self
                    .employees
                    .values()
                    .filter(|employee| employee.group_id == group.id)
                    .count() as u32,
                task_count: self
                    .tasks
                    .values()
                    .filter(|task| task.group_id == group.id)
                    .count() as u32,
                ..group.clone()
            })
            .collect()
    }

    fn employees_view(&self, group: Option<GroupId>) -> Vec<Employee> {
        let mut employees: Vec<Employee> = self
            .employees
            .values()
            .filter(|employee| group.map_or(true, |id| employee.group_id == id))
            .map(|employee| Employee {
                group_name: self.group_name(employee.group_id),
                ..employee.clone()
            })
            .collect();
        employees.sort_by_key(|employee| (employee.group_id, employee.id));
        employees
    }

    /// Newest first.
    fn tasks_view(&self, group: Option<GroupId>) -> Vec<Task> {
        self.tasks
            .values()
            .rev()
            .filter(|task| group.map_or(true, |id| task.group_id == id))
            .map(|task| Task {
                group_name: self.group_name(task.group_id),
                employee_name: task
                    .employee_id
                    .and_then(|id| self.employees.get(&id))
                    .map(|employee| employee.name.clone()),
                ..task.clone()
            })
            .collect()
    }
}

/// Shared handle to the sandbox data.
#[derive(Debug, Clone, Default)]
pub struct SandboxState {
    inner: Arc<Mutex<SandboxData>>,
}

impl SandboxState {
    /// A small department to click around in.
    pub fn seeded() -> Self {
        let state = Self::default();
        {
            let mut data = state.lock();
            for (name, description) in [
                ("Разработка", "Frontend и backend команда"),
                ("Дизайн", "Интерфейсы и визуальный стиль"),
                ("Аналитика", "Метрики и отчётность"),
            ] {
                let id = GroupId(data.next_id());
                data.groups.insert(
                    id,
                    Group {
                        id,
                        name: name.to_string(),
                        description: description.to_string(),
                        employee_count: 0,
                        task_count: 0,
                    },
                );
            }

            for (group, name, position) in [
                (1, "Иван Иванов", "Frontend Developer"),
                (1, "Сергей Смирнов", "Backend Developer"),
                (2, "Мария Петрова", "UX/UI Designer"),
            ] {
                let id = EmployeeId(data.next_id());
                data.employees.insert(
                    id,
                    Employee {
                        id,
                        group_id: GroupId(group),
                        name: name.to_string(),
                        position: position.to_string(),
                        email: None,
                        phone: None,
                        status: EmployeeStatus::Active,
                        group_name: None,
                    },
                );
            }

            for (group, employee, title, status, priority) in [
                (1, Some(4), "Перевести форму заявки на новый API", TaskStatus::InProgress, TaskPriority::High),
                (1, None, "Настроить мониторинг", TaskStatus::Todo, TaskPriority::Medium),
                (2, Some(6), "Макет страницы вакансий", TaskStatus::Completed, TaskPriority::Low),
            ] {
                let id = TaskId(data.next_id());
                data.tasks.insert(
                    id,
                    Task {
                        id,
                        group_id: GroupId(group),
                        employee_id: employee.map(EmployeeId),
                        title: title.to_string(),
                        description: None,
                        status,
                        priority,
                        employee_name: None,
                        group_name: None,
                    },
                );
            }
        }
        state
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SandboxData> {
        self.inner.lock().expect("sandbox mutex poisoned")
    }

    pub fn applications(&self) -> Vec<StoredApplication> {
        self.lock().applications.clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.lock().tasks_view(None)
    }
}

/// Router serving both endpoints under [`APPLICATIONS_PATH`] and [`DEPARTMENT_PATH`].
pub fn sandbox_router(state: SandboxState) -> Router {
    Router::new()
        .route(APPLICATIONS_PATH, post(submit_application))
        .route(
            DEPARTMENT_PATH,
            get(read_resource).post(create_resource).put(update_resource),
        )
        .with_state(state)
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn invalid_request() -> Response {
    error(StatusCode::BAD_REQUEST, "Invalid request")
}

fn text_field<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

async fn submit_application(State(state): State<SandboxState>, Json(body): Json<Value>) -> Response {
    let application_type = match body.get("application_type").and_then(Value::as_str) {
        Some("applicant") => ApplicationType::Applicant,
        Some("student") => ApplicationType::Student,
        _ => return error(StatusCode::BAD_REQUEST, "Invalid application_type"),
    };

    for field in ["name", "surname", "email"] {
        if text_field(&body, field).is_none() {
            return error(StatusCode::BAD_REQUEST, &format!("{field} is required"));
        }
    }
    let email = text_field(&body, "email").unwrap_or_default().to_string();
    if !is_valid_email(&email) {
        return error(StatusCode::BAD_REQUEST, "invalid email");
    }

    let mut data = state.lock();
    let id = data.next_id();
    data.applications.push(StoredApplication {
        id,
        application_type,
        email: email.clone(),
        body,
    });
    info!(application_id = id, application_type = application_type.label(), "sandbox stored application");

    Json(json!({
        "success": true,
        "application_id": id,
        "email_sent": false,
        "message": "Application saved successfully. Email not sent (sandbox)",
    }))
    .into_response()
}

#[derive(Debug, Default, Deserialize)]
struct ResourceQuery {
    #[serde(default)]
    resource: Option<String>,
    #[serde(default)]
    group_id: Option<i64>,
}

async fn read_resource(State(state): State<SandboxState>, Query(query): Query<ResourceQuery>) -> Response {
    let data = state.lock();
    let group = query.group_id.map(GroupId);
    match query.resource.as_deref().unwrap_or("groups") {
        "groups" => Json(json!({ "groups": data.groups_view() })).into_response(),
        "employees" => Json(json!({ "employees": data.employees_view(group) })).into_response(),
        "tasks" => Json(json!({ "tasks": data.tasks_view(group) })).into_response(),
        _ => invalid_request(),
    }
}

#[derive(Debug, Deserialize)]
struct EmployeeBody {
    group_id: Option<GroupId>,
    name: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    status: Option<EmployeeStatus>,
}

#[derive(Debug, Deserialize)]
struct TaskBody {
    group_id: Option<GroupId>,
    #[serde(default)]
    employee_id: Option<EmployeeId>,
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<TaskStatus>,
    #[serde(default)]
    priority: Option<TaskPriority>,
}

#[derive(Debug, Deserialize)]
struct TaskUpdateBody {
    id: Option<TaskId>,
    #[serde(default)]
    status: Option<TaskStatus>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    employee_id: Option<Option<EmployeeId>>,
}

#[derive(Debug, Deserialize)]
struct EmployeeUpdateBody {
    id: Option<EmployeeId>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    status: Option<EmployeeStatus>,
}

/// Keep an explicit `null` apart from a missing key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

async fn create_resource(
    State(state): State<SandboxState>,
    Query(query): Query<ResourceQuery>,
    Json(body): Json<Value>,
) -> Response {
    let mut data = state.lock();
    match query.resource.as_deref().unwrap_or("groups") {
        "employees" => {
            let Ok(body) = serde_json::from_value::<EmployeeBody>(body) else {
                return invalid_request();
            };
            let (Some(group_id), Some(name)) = (body.group_id, body.name) else {
                return invalid_request();
            };
            if !data.groups.contains_key(&group_id) {
                return error(StatusCode::BAD_REQUEST, "group not found");
            }
            let id = EmployeeId(data.next_id());
            data.employees.insert(
                id,
                Employee {
                    id,
                    group_id,
                    name,
                    position: body.position.unwrap_or_default(),
                    email: body.email,
                    phone: body.phone,
                    status: body.status.unwrap_or_default(),
                    group_name: None,
                },
            );
            Json(json!({ "success": true, "id": id })).into_response()
        }
        "tasks" => {
            let Ok(body) = serde_json::from_value::<TaskBody>(body) else {
                return invalid_request();
            };
            let (Some(group_id), Some(title)) = (body.group_id, body.title) else {
                return invalid_request();
            };
            if !data.groups.contains_key(&group_id) {
                return error(StatusCode::BAD_REQUEST, "group not found");
            }
            if let Some(employee) = body.employee_id {
                if !data.employees.contains_key(&employee) {
                    return error(StatusCode::BAD_REQUEST, "employee not found");
                }
            }
            let id = TaskId(data.next_id());
            data.tasks.insert(
                id,
                Task {
                    id,
                    group_id,
                    employee_id: body.employee_id,
                    title,
                    description: body.description,
                    status: body.status.unwrap_or_default(),
                    priority: body.priority.unwrap_or_default(),
                    employee_name: None,
                    group_name: None,
                },
            );
            Json(json!({ "success": true, "id": id })).into_response()
        }
        _ => invalid_request(),
    }
}

async fn update_resource(
    State(state): State<SandboxState>,
    Query(query): Query<ResourceQuery>,
    Json(body): Json<Value>,
) -> Response {
    match query.resource.as_deref() {
        Some("tasks") => update_task(&state, body),
        Some("employees") => update_employee(&state, body),
        _ => invalid_request(),
    }
}

fn update_task(state: &SandboxState, body: Value) -> Response {
    let Ok(TaskUpdateBody {
        id: Some(id),
        status,
        title,
        employee_id,
    }) = serde_json::from_value::<TaskUpdateBody>(body)
    else {
        return invalid_request();
    };

    let mut data = state.lock();
    if let Some(Some(employee)) = employee_id {
        if !data.employees.contains_key(&employee) {
            return error(StatusCode::BAD_REQUEST, "employee not found");
        }
    }
    let Some(task) = data.tasks.get_mut(&id) else {
        return error(StatusCode::NOT_FOUND, "task not found");
    };
    if let Some(status) = status {
        task.status = status;
    }
    if let Some(title) = title {
        task.title = title;
    }
    if let Some(employee_id) = employee_id {
        task.employee_id = employee_id;
    }
    Json(json!({ "success": true })).into_response()
}

fn update_employee(state: &SandboxState, body: Value) -> Response {
    let Ok(EmployeeUpdateBody {
        id: Some(id),
        name,
        position,
        email,
        phone,
        status,
    }) = serde_json::from_value::<EmployeeUpdateBody>(body)
    else {
        return invalid_request();
    };

    let mut data = state.lock();
    let Some(employee) = data.employees.get_mut(&id) else {
        return error(StatusCode::NOT_FOUND, "employee not found");
    };
    if let Some(name) = name {
        employee.name = name;
    }
    if let Some(position) = position {
        employee.position = position;
    }
    if email.is_some() {
        employee.email = email;
    }
    if phone.is_some() {
        employee.phone = phone;
    }
    if let Some(status) = status {
        employee.status = status;
    }
    Json(json!({ "success": true })).into_response()
}
