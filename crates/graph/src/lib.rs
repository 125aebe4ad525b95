pub mod compile;
pub mod error;
pub mod loader;
pub mod statement;

pub use compile::{Compiled, compile, normalize_id};
pub use error::GraphError;
pub use loader::{
    FailureLog, GraphLoader, LoadReport, Neo4jConfig, StatementExecutor, StatementFailure,
};
pub use statement::Statement;
