//! Shared helpers for integration tests

use chatter_common::DatabaseConfig;
use chatter_db::{create_pool, init_schema};
use chatter_service::ServiceContext;

use crate::fixtures::Fixture;

/// Fresh service context over a private in-memory database
pub async fn test_context() -> ServiceContext {
    let pool = create_pool(&DatabaseConfig::in_memory())
        .await
        .expect("create pool");
    init_schema(&pool).await.expect("init schema");
    ServiceContext::with_sqlite(pool)
}

/// Fresh context with the standard fixture world already seeded
pub async fn seeded() -> Fixture {
    Fixture::seed(test_context().await).await
}
