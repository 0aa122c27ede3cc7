use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use super::domain::{
    EmployeeFields, EmployeeId, EmployeeStatus, EmployeeUpdate, FieldError, GroupId, TaskAction,
    TaskEdit, TaskFields, TaskId, TaskStatus, TaskStatusChange,
};
use super::gateway::{DepartmentGateway, GatewayError};
use super::store::{DashboardState, DepartmentSnapshot};
use crate::forms::FormSlot;
use crate::notify::{Notification, Notifier, SUCCESS_TITLE};

pub const LOAD_FAILED: &str = "Не удалось загрузить данные";
pub const EMPLOYEE_ADDED: &str = "Сотрудник добавлен";
pub const EMPLOYEE_FAILED: &str = "Не удалось добавить сотрудника";
pub const TASK_CREATED: &str = "Задача создана";
pub const TASK_FAILED: &str = "Не удалось создать задачу";
pub const STATUS_UPDATED: &str = "Статус задачи обновлён";
pub const STATUS_FAILED: &str = "Не удалось обновить статус";
pub const EMPLOYEE_UPDATED: &str = "Данные сотрудника обновлены";
pub const EMPLOYEE_UPDATE_FAILED: &str = "Не удалось обновить сотрудника";
pub const TASK_UPDATED: &str = "Задача обновлена";
pub const TASK_UPDATE_FAILED: &str = "Не удалось обновить задачу";

#[derive(Debug, thiserror::Error)]
pub enum DepartmentError {
    #[error(transparent)]
    Fields(#[from] FieldError),
    #[error("a submission from this form is already in flight")]
    InFlight,
    #[error("task {task} cannot move from {from} to {to}")]
    InvalidTransition {
        task: TaskId,
        from: TaskStatus,
        to: TaskStatus,
    },
    #[error("no dashboard action leads to status {0}")]
    UnreachableStatus(TaskStatus),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Department dashboard: the state container plus every flow that talks to the endpoint.
///
/// The remote store is the source of truth. Each successful mutation is followed by a full
/// [`refresh_all`](Self::refresh_all) instead of a local patch.
pub struct DepartmentDashboard<G, N> {
    gateway: Arc<G>,
    notifier: Arc<N>,
    state: Mutex<DashboardState>,
    refreshes: AtomicU64,
}

impl<G, N> DepartmentDashboard<G, N>
where
    G: DepartmentGateway + 'static,
    N: Notifier + 'static,
{
    pub fn new(gateway: Arc<G>, notifier: Arc<N>) -> Self {
        Self {
            gateway,
            notifier,
            state: Mutex::new(DashboardState::default()),
            refreshes: AtomicU64::new(0),
        }
    }

    /// Run `read` against the current state. The lock is never held across an await.
    pub fn with_state<R>(&self, read: impl FnOnce(&DashboardState) -> R) -> R {
        let guard = self.state.lock().expect("dashboard mutex poisoned");
        read(&guard)
    }

    pub fn state(&self) -> DashboardState {
        self.with_state(DashboardState::clone)
    }

    pub fn select_group(&self, group: GroupId) {
        self.state
            .lock()
            .expect("dashboard mutex poisoned")
            .select_group(group);
    }

    /// Fetch groups, employees, and tasks concurrently and swap them in together.
    ///
    /// The first failure drops the remaining requests, raises a single notice, and keeps the
    /// previous snapshot. Results of a refresh overtaken by a later-started one are discarded.
    pub async fn refresh_all(&self) -> Result<(), DepartmentError> {
        let ticket = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
        let fetched = tokio::try_join!(
            self.gateway.groups(),
            self.gateway.employees(),
            self.gateway.tasks(),
        );

        let outcome = {
            let mut state = self.state.lock().expect("dashboard mutex poisoned");
            let outcome = match fetched {
                Ok((groups, employees, tasks)) => {
                    let counts = (groups.len(), employees.len(), tasks.len());
                    let applied = state.apply_refresh(
                        ticket,
                        DepartmentSnapshot {
                            groups,
                            employees,
                            tasks,
                        },
                    );
                    if applied {
                        info!(
                            groups = counts.0,
                            employees = counts.1,
                            tasks = counts.2,
                            "department snapshot refreshed"
                        );
                    } else {
                        debug!(refresh = ticket, "stale department snapshot discarded");
                    }
                    Ok(())
                }
                Err(err) => Err(err),
            };
            state.set_loading(false);
            outcome
        };

        outcome.map_err(|err| {
            warn!(error = %err, "department refresh failed; keeping previous snapshot");
            self.notifier.notify(Notification::error(LOAD_FAILED));
            DepartmentError::from(err)
        })
    }

    /// Add an employee from `form`. Status is always sent as active.
    pub async fn create_employee(
        &self,
        form: &FormSlot<EmployeeFields>,
    ) -> Result<Option<EmployeeId>, DepartmentError> {
        let Some(_submitting) = form.begin() else {
            return Err(DepartmentError::InFlight);
        };
        let request = form.draft().to_request()?;

        match self.gateway.create_employee(&request).await {
            Ok(id) => {
                info!(employee_id = ?id, group_id = %request.group_id, "employee created");
                self.notifier
                    .notify(Notification::info(SUCCESS_TITLE, EMPLOYEE_ADDED));
                form.reset();
                self.resync().await;
                Ok(id)
            }
            Err(err) => Err(self.report_failure(err, EMPLOYEE_FAILED)),
        }
    }

    /// Create a task from `form`. Tasks start in `todo`; no assignee means unassigned.
    pub async fn create_task(
        &self,
        form: &FormSlot<TaskFields>,
    ) -> Result<Option<TaskId>, DepartmentError> {
        let Some(_submitting) = form.begin() else {
            return Err(DepartmentError::InFlight);
        };
        let request = form.draft().to_request()?;

        match self.gateway.create_task(&request).await {
            Ok(id) => {
                info!(task_id = ?id, group_id = %request.group_id, "task created");
                self.notifier
                    .notify(Notification::info(SUCCESS_TITLE, TASK_CREATED));
                form.reset();
                self.resync().await;
                Ok(id)
            }
            Err(err) => Err(self.report_failure(err, TASK_FAILED)),
        }
    }

    /// Move a task forward to `next`.
    ///
    /// A task present in the current snapshot may only take the transition its status offers.
    /// Tasks missing from the snapshot are sent as-is and left to the server.
    pub async fn advance_task_status(
        &self,
        task: TaskId,
        next: TaskStatus,
    ) -> Result<(), DepartmentError> {
        if !matches!(next, TaskStatus::InProgress | TaskStatus::Completed) {
            return Err(DepartmentError::UnreachableStatus(next));
        }
        let current = self.with_state(|state| state.task(task).map(|found| found.status));
        if let Some(from) = current {
            if !from.can_advance_to(next) {
                return Err(DepartmentError::InvalidTransition {
                    task,
                    from,
                    to: next,
                });
            }
        }

        let change = TaskStatusChange {
            id: task,
            status: next,
        };
        match self.gateway.update_task_status(&change).await {
            Ok(()) => {
                info!(task_id = %task, status = %next, "task status updated");
                self.notifier
                    .notify(Notification::info(SUCCESS_TITLE, STATUS_UPDATED));
                self.resync().await;
                Ok(())
            }
            Err(err) => Err(self.report_failure(err, STATUS_FAILED)),
        }
    }

    /// Trigger the affordance shown on a task card.
    pub async fn apply_task_action(
        &self,
        task: TaskId,
        action: TaskAction,
    ) -> Result<(), DepartmentError> {
        self.advance_task_status(task, action.target()).await
    }

    /// Send the fields set in `update`; the rest stay as the server has them.
    pub async fn update_employee(&self, update: &EmployeeUpdate) -> Result<(), DepartmentError> {
        let update = update.normalized()?;

        match self.gateway.update_employee(&update).await {
            Ok(()) => {
                info!(employee_id = %update.id, status = ?update.status, "employee updated");
                self.notifier
                    .notify(Notification::info(SUCCESS_TITLE, EMPLOYEE_UPDATED));
                self.resync().await;
                Ok(())
            }
            Err(err) => Err(self.report_failure(err, EMPLOYEE_UPDATE_FAILED)),
        }
    }

    pub async fn set_employee_status(
        &self,
        employee: EmployeeId,
        status: EmployeeStatus,
    ) -> Result<(), DepartmentError> {
        self.update_employee(&EmployeeUpdate::status(employee, status))
            .await
    }

    /// Hand `task` to `employee`, or leave it unassigned with `None`.
    pub async fn reassign_task(
        &self,
        task: TaskId,
        employee: Option<EmployeeId>,
    ) -> Result<(), DepartmentError> {
        self.update_task(&TaskEdit::reassign(task, employee)).await
    }

    pub async fn rename_task(&self, task: TaskId, title: &str) -> Result<(), DepartmentError> {
        self.update_task(&TaskEdit::rename(task, title)).await
    }

    /// Change a task's title or assignee. Status moves go through
    /// [`advance_task_status`](Self::advance_task_status).
    pub async fn update_task(&self, edit: &TaskEdit) -> Result<(), DepartmentError> {
        let edit = edit.normalized()?;
        if let Some(Some(employee)) = edit.employee_id {
            let groups = self.with_state(|state| {
                let task_group = state.task(edit.id).map(|task| task.group_id)?;
                let member = state
                    .snapshot()
                    .employees
                    .iter()
                    .find(|candidate| candidate.id == employee)?;
                Some((task_group, member.group_id))
            });
            if let Some((task_group, employee_group)) = groups {
                if task_group != employee_group {
                    warn!(task_id = %edit.id, %employee, %task_group, %employee_group, "assignee belongs to another group");
                }
            }
        }

        match self.gateway.update_task(&edit).await {
            Ok(()) => {
                info!(task_id = %edit.id, "task updated");
                self.notifier
                    .notify(Notification::info(SUCCESS_TITLE, TASK_UPDATED));
                self.resync().await;
                Ok(())
            }
            Err(err) => Err(self.report_failure(err, TASK_UPDATE_FAILED)),
        }
    }

    async fn resync(&self) {
        if let Err(err) = self.refresh_all().await {
            debug!(error = %err, "resync after mutation failed");
        }
    }

    fn report_failure(&self, err: GatewayError, fallback: &str) -> DepartmentError {
        warn!(error = %err, "department mutation failed");
        let description = err.server_message().unwrap_or(fallback).to_string();
        self.notifier.notify(Notification::error(description));
        DepartmentError::Gateway(err)
    }
}
