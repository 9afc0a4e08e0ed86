/// Database access layer
///
/// - `pool`: PostgreSQL connection pool construction and health checks
/// - `migrations`: schema migration runner

pub mod migrations;
pub mod pool;
