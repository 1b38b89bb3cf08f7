#![allow(clippy::unwrap_used, clippy::expect_used)]
#![cfg(feature = "integration-pg")]

//! Both backends against a real Postgres container.
//!
//! Each test brings up its own container and runs the full shared suite,
//! so the SeaORM mapper and the hand-written SQL are held to the same
//! observable behavior on the same engine.

mod support;

use anyhow::Result;

#[tokio::test]
async fn sea_orm_backend_passes_shared_cases() -> Result<()> {
    let dut = support::bring_up_postgres().await?;
    let h = support::pg_orm_harness(&dut.url).await;
    support::run_all(&h).await;
    Ok(())
}

#[tokio::test]
async fn sqlx_backend_passes_shared_cases() -> Result<()> {
    let dut = support::bring_up_postgres().await?;
    let h = support::pg_sqlx_harness(&dut.url).await;
    support::run_all(&h).await;
    Ok(())
}
