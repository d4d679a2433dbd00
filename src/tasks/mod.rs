// Tasks module
// Owner-scoped CRUD over the task resource; every id-addressed operation is
// authorized through the ownership guard

pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;

// Re-export commonly used types
pub use error::TaskError;
pub use models::{CreateTaskRequest, Task, TaskListQuery, TaskResponse, UpdateTaskRequest};
pub use repository::{PgTaskRepository, TaskStore};
