use hr_portal::department::{Badge, EmployeeStatus, TaskPriority};
use hr_portal::notify::{Notification, Notifier};

/// Prints notices as they are raised; errors go to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        if notification.is_error() {
            eprintln!("[{}] {}", notification.title, notification.description);
        } else {
            println!("[{}] {}", notification.title, notification.description);
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, Default)]
pub(crate) enum PriorityArg {
    Low,
    #[default]
    Medium,
    High,
}

impl From<PriorityArg> for TaskPriority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::Low => TaskPriority::Low,
            PriorityArg::Medium => TaskPriority::Medium,
            PriorityArg::High => TaskPriority::High,
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub(crate) enum EmployeeStatusArg {
    Active,
    Inactive,
}

impl From<EmployeeStatusArg> for EmployeeStatus {
    fn from(value: EmployeeStatusArg) -> Self {
        match value {
            EmployeeStatusArg::Active => EmployeeStatus::Active,
            EmployeeStatusArg::Inactive => EmployeeStatus::Inactive,
        }
    }
}

pub(crate) fn badge(badge: Badge) -> String {
    format!("[{}]", badge.label)
}
