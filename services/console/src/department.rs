use crate::infra::{badge, ConsoleNotifier, EmployeeStatusArg, PriorityArg};
use clap::Subcommand;
use hr_portal::config::AppConfig;
use hr_portal::department::{
    DashboardState, DepartmentDashboard, EmployeeFields, EmployeeId, EmployeeUpdate, GroupId,
    HttpDepartmentGateway, TaskAction, TaskFields, TaskId,
};
use hr_portal::error::AppError;
use hr_portal::forms::FormSlot;
use std::sync::Arc;
use tracing::warn;

type Dashboard = DepartmentDashboard<HttpDepartmentGateway, ConsoleNotifier>;

#[derive(Subcommand, Debug)]
pub(crate) enum DepartmentCommand {
    /// Print groups, employees, and tasks
    Show {
        /// Only show employees and tasks of this group
        #[arg(long)]
        group: Option<i64>,
    },
    /// Add an employee to a group
    AddEmployee {
        #[arg(long)]
        group: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        position: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Create a task, unassigned unless --employee is given
    AddTask {
        #[arg(long)]
        group: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        employee: Option<i64>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_enum, default_value_t = PriorityArg::Medium)]
        priority: PriorityArg,
    },
    /// Change an employee's details; omitted flags stay as they are
    UpdateEmployee {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Mark an employee active or inactive
    SetEmployeeStatus {
        id: i64,
        #[arg(long, value_enum)]
        status: EmployeeStatusArg,
    },
    /// Hand a task to an employee, or unassign it when --employee is omitted
    ReassignTask {
        id: i64,
        #[arg(long)]
        employee: Option<i64>,
    },
    /// Change a task's title
    RenameTask {
        id: i64,
        #[arg(long)]
        title: String,
    },
    /// Move a todo task to in progress
    StartTask { id: i64 },
    /// Move an in-progress task to completed
    CompleteTask { id: i64 },
}

pub(crate) async fn run_department(
    config: &AppConfig,
    command: DepartmentCommand,
) -> Result<(), AppError> {
    let gateway = HttpDepartmentGateway::new(
        config.endpoints.department_url.clone(),
        config.endpoints.request_timeout,
    )?;
    let dashboard: Dashboard = DepartmentDashboard::new(Arc::new(gateway), Arc::new(ConsoleNotifier));
    dashboard.refresh_all().await?;

    match command {
        DepartmentCommand::Show { group } => {
            if let Some(group) = group {
                dashboard.select_group(GroupId(group));
            }
        }
        DepartmentCommand::AddEmployee {
            group,
            name,
            position,
            email,
            phone,
        } => {
            let form = FormSlot::new(EmployeeFields {
                group_id: Some(GroupId(group)),
                name,
                position,
                email,
                phone,
            });
            dashboard.create_employee(&form).await?;
            dashboard.select_group(GroupId(group));
        }
        DepartmentCommand::AddTask {
            group,
            title,
            employee,
            description,
            priority,
        } => {
            if let Some(employee) = employee.map(EmployeeId) {
                let in_group = dashboard.with_state(|state| {
                    state
                        .group_employees(GroupId(group))
                        .iter()
                        .any(|candidate| candidate.id == employee)
                });
                if !in_group {
                    warn!(%employee, group, "assignee is not a member of the task's group");
                }
            }
            let form = FormSlot::new(TaskFields {
                group_id: Some(GroupId(group)),
                employee_id: employee.map(EmployeeId),
                title,
                description,
                priority: priority.into(),
            });
            dashboard.create_task(&form).await?;
            dashboard.select_group(GroupId(group));
        }
        DepartmentCommand::UpdateEmployee {
            id,
            name,
            position,
            email,
            phone,
        } => {
            let update = EmployeeUpdate {
                name,
                position,
                email,
                phone,
                ..EmployeeUpdate::new(EmployeeId(id))
            };
            dashboard.update_employee(&update).await?;
        }
        DepartmentCommand::SetEmployeeStatus { id, status } => {
            dashboard
                .set_employee_status(EmployeeId(id), status.into())
                .await?;
        }
        DepartmentCommand::ReassignTask { id, employee } => {
            dashboard
                .reassign_task(TaskId(id), employee.map(EmployeeId))
                .await?;
        }
        DepartmentCommand::RenameTask { id, title } => {
            dashboard.rename_task(TaskId(id), &title).await?;
        }
        DepartmentCommand::StartTask { id } => {
            dashboard
                .apply_task_action(TaskId(id), TaskAction::Start)
                .await?;
        }
        DepartmentCommand::CompleteTask { id } => {
            dashboard
                .apply_task_action(TaskId(id), TaskAction::Complete)
                .await?;
        }
    }

    dashboard.with_state(render);
    Ok(())
}

fn render(state: &DashboardState) {
    println!("Группы");
    for group in state.groups() {
        let marker = if state.selected_group() == Some(group.id) {
            "*"
        } else {
            "-"
        };
        println!(
            "{marker} #{} {}: {} сотрудников, {} задач",
            group.id, group.name, group.employee_count, group.task_count
        );
    }

    println!("\n{}", state.employees_heading());
    let employees = state.visible_employees();
    if employees.is_empty() {
        println!("  нет сотрудников");
    }
    for employee in employees {
        println!(
            "- #{} {} ({}) {}",
            employee.id,
            employee.name,
            employee.position,
            badge(employee.status.badge())
        );
    }

    println!("\n{}", state.tasks_heading());
    let tasks = state.visible_tasks();
    if tasks.is_empty() {
        println!("  нет задач");
    }
    for task in tasks {
        let assignee = task.employee_name.as_deref().unwrap_or("не назначена");
        let action = task
            .status
            .available_action()
            .map(|action| format!(" -> {}", action.label()))
            .unwrap_or_default();
        println!(
            "- #{} {} {} {} | {}{}",
            task.id,
            task.title,
            badge(task.status.badge()),
            badge(task.priority.badge()),
            assignee,
            action
        );
    }
}
