//! Internal department dashboard: groups, employees, and tasks mirrored from the resource endpoint.

pub mod dashboard;
pub mod domain;
pub mod gateway;
pub mod store;

#[cfg(test)]
mod tests;

pub use dashboard::{DepartmentDashboard, DepartmentError};
pub use domain::{
    Badge, BadgeVariant, Employee, EmployeeFields, EmployeeId, EmployeeStatus, EmployeeUpdate,
    FieldError, Group, GroupId, NewEmployee, NewTask, Task, TaskAction, TaskEdit, TaskFields,
    TaskId, TaskPriority, TaskStatus, TaskStatusChange,
};
pub use gateway::{DepartmentGateway, GatewayError, HttpDepartmentGateway, Resource};
pub use store::{DashboardState, DepartmentSnapshot};
