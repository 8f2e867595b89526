//! Employee document store.
//!
//! # Responsibilities
//! - Define the collaborator interface the CRUD handlers consume
//! - Provide an in-process collection keyed by employee id
//! - Query by field equality, assign ids on create
//!
//! # Design Decisions
//! - The trait is the seam for a managed database; handlers only see
//!   `Arc<dyn EmployeeStore>`
//! - One write lock covers id assignment and insert, so concurrent creates
//!   never share an id
//! - New ids are `max + 1`, so a deleted top id can be reused

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::employees::model::Employee;

/// Store failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("employee {0} not found")]
    NotFound(i64),

    #[error("unknown search field {0:?}")]
    UnknownField(String),

    #[error("invalid value {value:?} for field {field}")]
    InvalidValue { field: &'static str, value: String },

    #[error("failed to load seed data: {0}")]
    Seed(String),

    #[error("no employee id left after {0}")]
    IdsExhausted(i64),
}

/// Fields the store can be queried on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Id,
    FirstName,
    LastName,
    Email,
    Role,
}

impl SearchField {
    pub const ALL: [SearchField; 5] = [
        Self::Id,
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Role,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Role => "role",
        }
    }
}

impl FromStr for SearchField {
    type Err = StoreError;

    /// Case-insensitive; underscores are ignored (`first_name`, `FirstName`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "id" => Ok(Self::Id),
            "firstname" => Ok(Self::FirstName),
            "lastname" => Ok(Self::LastName),
            "email" => Ok(Self::Email),
            "role" => Ok(Self::Role),
            _ => Err(StoreError::UnknownField(s.to_string())),
        }
    }
}

/// Document-store operations over the employee collection.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Every employee, ordered by id.
    async fn list(&self) -> Result<Vec<Employee>, StoreError>;

    async fn get(&self, id: i64) -> Result<Employee, StoreError>;

    /// Employees whose `field` equals `value` exactly.
    async fn search(&self, field: SearchField, value: &str) -> Result<Vec<Employee>, StoreError>;

    /// Insert with a newly assigned id; returns the stored record.
    async fn create(&self, employee: Employee) -> Result<Employee, StoreError>;

    /// Replace the record at `id`, keeping `id`.
    async fn update(&self, id: i64, employee: Employee) -> Result<Employee, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

/// In-process employee collection.
#[derive(Debug)]
pub struct MemoryStore {
    collection: String,
    documents: RwLock<BTreeMap<i64, Employee>>,
}

impl MemoryStore {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            documents: RwLock::new(BTreeMap::new()),
        }
    }

    /// Build a store holding `employees`, keyed by their ids.
    pub fn with_employees(collection: impl Into<String>, employees: Vec<Employee>) -> Self {
        let documents = employees.into_iter().map(|e| (e.id, e)).collect();
        Self {
            collection: collection.into(),
            documents: RwLock::new(documents),
        }
    }

    /// Load a JSON array of employees from `path`.
    pub async fn from_seed_file(
        collection: impl Into<String>,
        path: &Path,
    ) -> Result<Self, StoreError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::Seed(format!("{}: {}", path.display(), e)))?;
        let employees: Vec<Employee> = serde_json::from_str(&content)
            .map_err(|e| StoreError::Seed(format!("{}: {}", path.display(), e)))?;

        tracing::info!(
            path = %path.display(),
            count = employees.len(),
            "Loaded employee seed data"
        );
        Ok(Self::with_employees(collection, employees))
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

fn field_equals(employee: &Employee, field: SearchField, value: &str) -> bool {
    match field {
        SearchField::Id => false,
        SearchField::FirstName => employee.first_name == value,
        SearchField::LastName => employee.last_name == value,
        SearchField::Email => employee.email == value,
        SearchField::Role => employee.role == value,
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Employee>, StoreError> {
        Ok(self.documents.read().await.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Employee, StoreError> {
        self.documents
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn search(&self, field: SearchField, value: &str) -> Result<Vec<Employee>, StoreError> {
        let documents = self.documents.read().await;

        if field == SearchField::Id {
            let id: i64 = value.parse().map_err(|_| StoreError::InvalidValue {
                field: field.as_str(),
                value: value.to_string(),
            })?;
            return Ok(documents.get(&id).cloned().into_iter().collect());
        }

        Ok(documents
            .values()
            .filter(|e| field_equals(e, field, value))
            .cloned()
            .collect())
    }

    async fn create(&self, mut employee: Employee) -> Result<Employee, StoreError> {
        let mut documents = self.documents.write().await;
        let last = documents.keys().next_back().copied().unwrap_or(0);
        let id = last.checked_add(1).ok_or(StoreError::IdsExhausted(last))?;
        employee.id = id;
        documents.insert(id, employee.clone());
        tracing::debug!(collection = %self.collection, id, "Employee created");
        Ok(employee)
    }

    async fn update(&self, id: i64, mut employee: Employee) -> Result<Employee, StoreError> {
        let mut documents = self.documents.write().await;
        let slot = documents.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        employee.id = id;
        *slot = employee.clone();
        tracing::debug!(collection = %self.collection, id, "Employee updated");
        Ok(employee)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        documents.remove(&id).ok_or(StoreError::NotFound(id))?;
        tracing::debug!(collection = %self.collection, id, "Employee deleted");
        Ok(())
    }
}
