use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{
    Employee, EmployeeId, EmployeeUpdate, Group, NewEmployee, NewTask, Task, TaskEdit, TaskId,
    TaskStatusChange,
};
use crate::http::{build_client, read_lenient, Rejection};

/// Logical collection selected through the `resource` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Groups,
    Employees,
    Tasks,
}

impl Resource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Resource::Groups => "groups",
            Resource::Employees => "employees",
            Resource::Tasks => "tasks",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of one call against the department endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("{resource} request failed to complete: {message}")]
    Transport { resource: Resource, message: String },
    #[error("{resource} request rejected with status {status}")]
    Rejected {
        resource: Resource,
        status: u16,
        message: Option<String>,
    },
    #[error("{resource} response could not be decoded: {message}")]
    Decode { resource: Resource, message: String },
}

impl GatewayError {
    /// Text the server put in its `error` field, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            GatewayError::Rejected { message, .. } => message.as_deref(),
            GatewayError::Transport { .. } | GatewayError::Decode { .. } => None,
        }
    }
}

/// Reply to a create call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Created {
    #[serde(default)]
    pub id: Option<i64>,
}

/// Outbound seam for the department resource endpoint.
#[async_trait]
pub trait DepartmentGateway: Send + Sync {
    async fn groups(&self) -> Result<Vec<Group>, GatewayError>;
    async fn employees(&self) -> Result<Vec<Employee>, GatewayError>;
    async fn tasks(&self) -> Result<Vec<Task>, GatewayError>;
    async fn create_employee(
        &self,
        employee: &NewEmployee,
    ) -> Result<Option<EmployeeId>, GatewayError>;
    async fn create_task(&self, task: &NewTask) -> Result<Option<TaskId>, GatewayError>;
    async fn update_task_status(&self, change: &TaskStatusChange) -> Result<(), GatewayError>;
    async fn update_employee(&self, update: &EmployeeUpdate) -> Result<(), GatewayError>;
    async fn update_task(&self, edit: &TaskEdit) -> Result<(), GatewayError>;
}

#[derive(Debug, Default, Deserialize)]
struct GroupsEnvelope {
    #[serde(default)]
    groups: Option<Vec<Group>>,
}

#[derive(Debug, Default, Deserialize)]
struct EmployeesEnvelope {
    #[serde(default)]
    employees: Option<Vec<Employee>>,
}

#[derive(Debug, Default, Deserialize)]
struct TasksEnvelope {
    #[serde(default)]
    tasks: Option<Vec<Task>>,
}

/// Gateway talking JSON to a single URL disambiguated by `?resource=`.
#[derive(Debug, Clone)]
pub struct HttpDepartmentGateway {
    client: Client,
    endpoint: Url,
}

impl HttpDepartmentGateway {
    pub fn new(endpoint: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_client(timeout)?, endpoint))
    }

    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    fn request(&self, method: Method, resource: Resource) -> RequestBuilder {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("resource", resource.as_str());
        debug!(%method, %url, "department request");
        self.client.request(method, url)
    }

    async fn fetch<T>(&self, resource: Resource) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let transport = |err: reqwest::Error| GatewayError::Transport {
            resource,
            message: err.to_string(),
        };
        let response = self
            .request(Method::GET, resource)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(transport)?;
        if !status.is_success() {
            let rejection = Rejection::from_body(status, &bytes);
            return Err(GatewayError::Rejected {
                resource,
                status: rejection.status.as_u16(),
                message: rejection.message,
            });
        }

        serde_json::from_slice(&bytes).map_err(|err| GatewayError::Decode {
            resource,
            message: err.to_string(),
        })
    }

    async fn send<B>(
        &self,
        method: Method,
        resource: Resource,
        body: &B,
    ) -> Result<Created, GatewayError>
    where
        B: Serialize + Sync,
    {
        let response = self
            .request(method, resource)
            .json(body)
            .send()
            .await
            .map_err(|err| GatewayError::Transport {
                resource,
                message: err.to_string(),
            })?;

        read_lenient::<Created>(response)
            .await
            .map_err(|err| GatewayError::Transport {
                resource,
                message: err.to_string(),
            })?
            .map_err(|rejection| GatewayError::Rejected {
                resource,
                status: rejection.status.as_u16(),
                message: rejection.message,
            })
    }
}

#[async_trait]
impl DepartmentGateway for HttpDepartmentGateway {
    async fn groups(&self) -> Result<Vec<Group>, GatewayError> {
        let envelope: GroupsEnvelope = self.fetch(Resource::Groups).await?;
        Ok(envelope.groups.unwrap_or_default())
    }

    async fn employees(&self) -> Result<Vec<Employee>, GatewayError> {
        let envelope: EmployeesEnvelope = self.fetch(Resource::Employees).await?;
        Ok(envelope.employees.unwrap_or_default())
    }

    async fn tasks(&self) -> Result<Vec<Task>, GatewayError> {
        let envelope: TasksEnvelope = self.fetch(Resource::Tasks).await?;
        Ok(envelope.tasks.unwrap_or_default())
    }

    async fn create_employee(
        &self,
        employee: &NewEmployee,
    ) -> Result<Option<EmployeeId>, GatewayError> {
        let created = self.send(Method::POST, Resource::Employees, employee).await?;
        Ok(created.id.map(EmployeeId))
    }

    async fn create_task(&self, task: &NewTask) -> Result<Option<TaskId>, GatewayError> {
        let created = self.send(Method::POST, Resource::Tasks, task).await?;
        Ok(created.id.map(TaskId))
    }

    async fn update_task_status(&self, change: &TaskStatusChange) -> Result<(), GatewayError> {
        self.send(Method::PUT, Resource::Tasks, change).await?;
        Ok(())
    }

    async fn update_employee(&self, update: &EmployeeUpdate) -> Result<(), GatewayError> {
        self.send(Method::PUT, Resource::Employees, update).await?;
        Ok(())
    }

    async fn update_task(&self, edit: &TaskEdit) -> Result<(), GatewayError> {
        self.send(Method::PUT, Resource::Tasks, edit).await?;
        Ok(())
    }
}
