//! Model-invocable tools. The only one offered is the read-only SQL gateway.

pub mod gateway;
pub mod sqlite;

pub use gateway::{
    sql_from_arguments, tool_definition, validate_readonly, GatewayError, QueryExecutor, Record,
    SafeQueryGateway, EXECUTE_SQL_TOOL,
};
pub use sqlite::SqliteQueryExecutor;
