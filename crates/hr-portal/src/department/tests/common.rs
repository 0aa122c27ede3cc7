use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{Barrier, Notify};

use crate::department::domain::{
    Employee, EmployeeId, EmployeeStatus, EmployeeUpdate, Group, GroupId, NewEmployee, NewTask,
    Task, TaskEdit, TaskId, TaskPriority, TaskStatus, TaskStatusChange,
};
use crate::department::gateway::{DepartmentGateway, GatewayError, Resource};
use crate::department::store::DepartmentSnapshot;
use crate::department::DepartmentDashboard;
use crate::notify::NotificationLog;

/// In-memory stand-in for the resource endpoint with switchable failures.
pub(super) struct FakeGateway {
    pub(super) data: Mutex<DepartmentSnapshot>,
    pub(super) failing_reads: Mutex<Vec<Resource>>,
    pub(super) rejection: Mutex<Option<Option<String>>>,
    pub(super) calls: Mutex<Vec<String>>,
    pub(super) barrier: Option<Barrier>,
    gate: Mutex<Option<(String, Arc<Notify>)>>,
    holding: AtomicBool,
    next_id: AtomicI64,
}

impl FakeGateway {
    pub(super) fn new(data: DepartmentSnapshot) -> Self {
        Self {
            data: Mutex::new(data),
            failing_reads: Mutex::new(Vec::new()),
            rejection: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            barrier: None,
            gate: Mutex::new(None),
            holding: AtomicBool::new(false),
            next_id: AtomicI64::new(1000),
        }
    }

    /// Every fetch waits until all three are in flight.
    pub(super) fn requiring_concurrent_fetches(data: DepartmentSnapshot) -> Self {
        Self {
            barrier: Some(Barrier::new(3)),
            ..Self::new(data)
        }
    }

    pub(super) fn fail_reads(&self, resource: Resource) {
        self.failing_reads.lock().expect("fake mutex").push(resource);
    }

    pub(super) fn heal_reads(&self) {
        self.failing_reads.lock().expect("fake mutex").clear();
    }

    pub(super) fn reject_mutations(&self, message: Option<&str>) {
        *self.rejection.lock().expect("fake mutex") = Some(message.map(str::to_string));
    }

    /// Park the next `call` (e.g. "GET groups") until the returned handle is notified.
    ///
    /// Reads capture their data before parking.
    pub(super) fn hold_next(&self, call: &str) -> Arc<Notify> {
        let release = Arc::new(Notify::new());
        *self.gate.lock().expect("fake mutex") = Some((call.to_string(), release.clone()));
        self.holding.store(false, Ordering::SeqCst);
        release
    }

    /// Whether the held call has reached its gate.
    pub(super) fn is_holding(&self) -> bool {
        self.holding.load(Ordering::SeqCst)
    }

    async fn pass_gate(&self, call: &str) {
        let release = {
            let mut gate = self.gate.lock().expect("fake mutex");
            match gate.take() {
                Some((held, release)) if held == call => Some(release),
                other => {
                    *gate = other;
                    None
                }
            }
        };
        if let Some(release) = release {
            self.holding.store(true, Ordering::SeqCst);
            release.notified().await;
        }
    }

    pub(super) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("fake mutex").clone()
    }

    pub(super) fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    async fn read<T>(
        &self,
        resource: Resource,
        select: impl FnOnce(&DepartmentSnapshot) -> Vec<T>,
    ) -> Result<Vec<T>, GatewayError> {
        self.calls
            .lock()
            .expect("fake mutex")
            .push(format!("GET {resource}"));
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if self
            .failing_reads
            .lock()
            .expect("fake mutex")
            .contains(&resource)
        {
            return Err(GatewayError::Transport {
                resource,
                message: "connection refused".to_string(),
            });
        }
        let rows = select(&self.data.lock().expect("fake mutex"));
        self.pass_gate(&format!("GET {resource}")).await;
        Ok(rows)
    }

    fn check_rejection(&self, resource: Resource, call: String) -> Result<(), GatewayError> {
        self.calls.lock().expect("fake mutex").push(call);
        match self.rejection.lock().expect("fake mutex").clone() {
            Some(message) => Err(GatewayError::Rejected {
                resource,
                status: 400,
                message,
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DepartmentGateway for FakeGateway {
    async fn groups(&self) -> Result<Vec<Group>, GatewayError> {
        self.read(Resource::Groups, |data| data.groups.clone()).await
    }

    async fn employees(&self) -> Result<Vec<Employee>, GatewayError> {
        self.read(Resource::Employees, |data| data.employees.clone())
            .await
    }

    async fn tasks(&self) -> Result<Vec<Task>, GatewayError> {
        self.read(Resource::Tasks, |data| data.tasks.clone()).await
    }

    async fn create_employee(
        &self,
        employee: &NewEmployee,
    ) -> Result<Option<EmployeeId>, GatewayError> {
        self.pass_gate("POST employees").await;
        self.check_rejection(Resource::Employees, "POST employees".to_string())?;
        let id = EmployeeId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.data.lock().expect("fake mutex").employees.push(Employee {
            id,
            group_id: employee.group_id,
            name: employee.name.clone(),
            position: employee.position.clone(),
            email: employee.email.clone(),
            phone: employee.phone.clone(),
            status: employee.status,
            group_name: None,
        });
        Ok(Some(id))
    }

    async fn create_task(&self, task: &NewTask) -> Result<Option<TaskId>, GatewayError> {
        self.pass_gate("POST tasks").await;
        self.check_rejection(Resource::Tasks, "POST tasks".to_string())?;
        let id = TaskId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.data.lock().expect("fake mutex").tasks.push(Task {
            id,
            group_id: task.group_id,
            employee_id: task.employee_id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            employee_name: None,
            group_name: None,
        });
        Ok(Some(id))
    }

    async fn update_task_status(&self, change: &TaskStatusChange) -> Result<(), GatewayError> {
        self.check_rejection(Resource::Tasks, format!("PUT tasks {}", change.id))?;
        let mut data = self.data.lock().expect("fake mutex");
        if let Some(task) = data.tasks.iter_mut().find(|task| task.id == change.id) {
            task.status = change.status;
        }
        Ok(())
    }

    async fn update_employee(&self, update: &EmployeeUpdate) -> Result<(), GatewayError> {
        self.check_rejection(Resource::Employees, format!("PUT employees {}", update.id))?;
        let mut data = self.data.lock().expect("fake mutex");
        if let Some(employee) = data
            .employees
            .iter_mut()
            .find(|employee| employee.id == update.id)
        {
            if let Some(name) = &update.name {
                employee.name = name.clone();
            }
            if let Some(position) = &update.position {
                employee.position = position.clone();
            }
            if let Some(email) = &update.email {
                employee.email = Some(email.clone());
            }
            if let Some(phone) = &update.phone {
                employee.phone = Some(phone.clone());
            }
            if let Some(status) = update.status {
                employee.status = status;
            }
        }
        Ok(())
    }

    async fn update_task(&self, edit: &TaskEdit) -> Result<(), GatewayError> {
        self.check_rejection(Resource::Tasks, format!("PUT tasks {}", edit.id))?;
        let mut data = self.data.lock().expect("fake mutex");
        if let Some(task) = data.tasks.iter_mut().find(|task| task.id == edit.id) {
            if let Some(title) = &edit.title {
                task.title = title.clone();
            }
            if let Some(employee) = edit.employee_id {
                task.employee_id = employee;
            }
        }
        Ok(())
    }
}

pub(super) type Dashboard = DepartmentDashboard<FakeGateway, NotificationLog>;

pub(super) fn dashboard(
    gateway: FakeGateway,
) -> (Dashboard, Arc<FakeGateway>, Arc<NotificationLog>) {
    let gateway = Arc::new(gateway);
    let log = Arc::new(NotificationLog::default());
    let dashboard = DepartmentDashboard::new(gateway.clone(), log.clone());
    (dashboard, gateway, log)
}

pub(super) fn seed() -> DepartmentSnapshot {
    DepartmentSnapshot {
        groups: vec![
            Group {
                id: GroupId(1),
                name: "Разработка".to_string(),
                description: "Продуктовая команда".to_string(),
                employee_count: 2,
                task_count: 2,
            },
            Group {
                id: GroupId(2),
                name: "Дизайн".to_string(),
                description: String::new(),
                employee_count: 1,
                task_count: 1,
            },
        ],
        employees: vec![
            employee(10, 1, "Иван Иванов"),
            employee(11, 1, "Пётр Петров"),
            employee(20, 2, "Анна Смирнова"),
        ],
        tasks: vec![
            task(100, 1, Some(10), TaskStatus::Todo),
            task(101, 1, None, TaskStatus::InProgress),
            task(200, 2, Some(20), TaskStatus::Completed),
        ],
    }
}

fn employee(id: i64, group: i64, name: &str) -> Employee {
    Employee {
        id: EmployeeId(id),
        group_id: GroupId(group),
        name: name.to_string(),
        position: "Инженер".to_string(),
        email: Some(format!("user{id}@example.com")),
        phone: None,
        status: EmployeeStatus::Active,
        group_name: None,
    }
}

fn task(id: i64, group: i64, employee: Option<i64>, status: TaskStatus) -> Task {
    Task {
        id: TaskId(id),
        group_id: GroupId(group),
        employee_id: employee.map(EmployeeId),
        title: format!("Задача {id}"),
        description: None,
        status,
        priority: TaskPriority::Medium,
        employee_name: None,
        group_name: None,
    }
}
