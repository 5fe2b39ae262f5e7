//! Lifecycle orchestrator.
//!
//! Sequences statement-builder and diff-engine output through the execution
//! collaborator, strictly one statement at a time. A statement that fails or
//! times out halts the sequence immediately; statements already applied stay
//! applied. Partial application is a known, accepted failure mode; there is
//! no compensating rollback.

use std::time::Duration;

use tracing::{debug, info};

use crate::diff::diff;
use crate::error::{DdlError, Result};
use crate::executor::{StatementExecutor, MAX_EXEC_WAIT};
use crate::managed::ManagedProperties;
use crate::schema::TableDescription;
use crate::statement::{build_create_statement, build_drop_statement};

/// Fetches catalog metadata and updates ownership.
pub trait CatalogClient {
    /// Fetches the current description of the object by its dot-joined
    /// fully-qualified name.
    fn get_table(
        &self,
        full_name: &str,
    ) -> impl std::future::Future<Output = Result<TableDescription>> + Send;

    /// Updates the owner attribute of the named object.
    fn update_owner(
        &self,
        full_name: &str,
        owner: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Create/Read/Update/Delete entry points over one catalog object.
pub struct TableLifecycle<E, C> {
    executor: E,
    catalog: C,
    managed: ManagedProperties,
    wait_timeout: Duration,
}

impl<E, C> TableLifecycle<E, C>
where
    E: StatementExecutor + Sync,
    C: CatalogClient + Sync,
{
    /// Creates an orchestrator with the default managed-key classifier and
    /// wait timeout.
    #[must_use]
    pub fn new(executor: E, catalog: C) -> Self {
        Self {
            executor,
            catalog,
            managed: ManagedProperties::new(),
            wait_timeout: MAX_EXEC_WAIT,
        }
    }

    /// Replaces the managed-key classifier.
    #[must_use]
    pub fn managed(mut self, managed: ManagedProperties) -> Self {
        self.managed = managed;
        self
    }

    /// Overrides the per-statement wait timeout.
    #[must_use]
    pub fn wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Creates the object and returns its canonical identity (the dot-joined
    /// fully-qualified name) for use as the persisted resource identifier.
    pub async fn create(&self, desired: &TableDescription) -> Result<String> {
        let statement = build_create_statement(desired, &self.managed);
        self.apply_statement(&statement).await?;

        if !desired.owner.is_empty() {
            self.catalog
                .update_owner(&desired.full_name(), &desired.owner)
                .await?;
        }

        info!(table = %desired.full_name(), "created");
        Ok(desired.full_name())
    }

    /// Fetches the current description read-only.
    pub async fn read(&self, full_name: &str) -> Result<TableDescription> {
        self.catalog.get_table(full_name).await
    }

    /// Reconciles the object toward `desired`.
    ///
    /// The previous description is fetched immediately before the diff is
    /// computed; generated statements run strictly sequentially and the
    /// sequence halts on the first failure.
    pub async fn update(&self, desired: &TableDescription) -> Result<()> {
        let full_name = desired.full_name();
        let previous = self.catalog.get_table(&full_name).await?;

        let statements = diff(desired, &previous, &self.managed)?;
        debug!(table = %full_name, count = statements.len(), "computed DDL plan");

        for statement in &statements {
            self.apply_statement(statement).await?;
        }

        if !desired.owner.is_empty() && desired.owner != previous.owner {
            self.catalog.update_owner(&full_name, &desired.owner).await?;
        }

        info!(table = %full_name, applied = statements.len(), "updated");
        Ok(())
    }

    /// Drops the object.
    pub async fn delete(&self, desired: &TableDescription) -> Result<()> {
        let statement = build_drop_statement(desired);
        self.apply_statement(&statement).await?;
        info!(table = %desired.full_name(), "dropped");
        Ok(())
    }

    /// Runs one statement under the wait timeout.
    async fn apply_statement(&self, statement: &str) -> Result<()> {
        info!(sql = %statement, "executing statement");

        let outcome =
            tokio::time::timeout(self.wait_timeout, self.executor.execute_statement(statement))
                .await;
        match outcome {
            Ok(Ok(status)) if status.succeeded => Ok(()),
            Ok(Ok(status)) => Err(DdlError::Execution {
                statement: statement.to_string(),
                detail: status.detail,
            }),
            Ok(Err(err)) => Err(err),
            Err(_elapsed) => {
                self.executor.cancel_running().await;
                Err(DdlError::Timeout {
                    statement: statement.to_string(),
                    waited_secs: self.wait_timeout.as_secs(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::StatementStatus;
    use crate::schema::{ColumnDescription, TableKind};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockExecutor {
        executed: Mutex<Vec<String>>,
        fail_on: Option<String>,
        sleep: Option<Duration>,
        cancelled: AtomicBool,
    }

    impl MockExecutor {
        fn failing_on(fragment: &str) -> Self {
            Self {
                fail_on: Some(fragment.to_string()),
                ..Self::default()
            }
        }

        fn sleeping(duration: Duration) -> Self {
            Self {
                sleep: Some(duration),
                ..Self::default()
            }
        }

        fn executed(&self) -> Vec<String> {
            self.executed.lock().unwrap().clone()
        }
    }

    impl StatementExecutor for MockExecutor {
        async fn execute_statement(&self, statement: &str) -> Result<StatementStatus> {
            if let Some(duration) = self.sleep {
                tokio::time::sleep(duration).await;
            }
            self.executed.lock().unwrap().push(statement.to_string());
            if let Some(fragment) = &self.fail_on {
                if statement.contains(fragment.as_str()) {
                    return Ok(StatementStatus::failed("FAILED"));
                }
            }
            Ok(StatementStatus::succeeded())
        }

        async fn cancel_running(&self) {
            self.cancelled.store(true, Ordering::SeqCst);
        }
    }

    struct MockCatalog {
        table: TableDescription,
        owner_updates: Mutex<Vec<(String, String)>>,
    }

    impl MockCatalog {
        fn holding(table: TableDescription) -> Self {
            Self {
                table,
                owner_updates: Mutex::new(Vec::new()),
            }
        }
    }

    impl CatalogClient for MockCatalog {
        async fn get_table(&self, _full_name: &str) -> Result<TableDescription> {
            Ok(self.table.clone())
        }

        async fn update_owner(&self, full_name: &str, owner: &str) -> Result<()> {
            self.owner_updates
                .lock()
                .unwrap()
                .push((full_name.to_string(), owner.to_string()));
            Ok(())
        }
    }

    fn orders() -> TableDescription {
        TableDescription::new("main", "sales", "orders", TableKind::Managed)
            .column(ColumnDescription::new("id", "bigint").not_null())
            .data_source_format("DELTA")
    }

    #[tokio::test]
    async fn test_create_returns_full_name_as_identity() {
        let lifecycle =
            TableLifecycle::new(MockExecutor::default(), MockCatalog::holding(orders()));

        let id = lifecycle.create(&orders()).await.unwrap();
        assert_eq!(id, "main.sales.orders");

        let executed = lifecycle.executor.executed();
        assert_eq!(executed.len(), 1);
        assert!(executed[0].starts_with("CREATE TABLE `main`.`sales`.`orders`"));
    }

    #[tokio::test]
    async fn test_create_pushes_owner() {
        let lifecycle =
            TableLifecycle::new(MockExecutor::default(), MockCatalog::holding(orders()));

        lifecycle.create(&orders().owner("data-eng")).await.unwrap();

        let updates = lifecycle.catalog.owner_updates.lock().unwrap();
        assert_eq!(
            updates.as_slice(),
            &[("main.sales.orders".to_string(), "data-eng".to_string())]
        );
    }

    #[tokio::test]
    async fn test_update_applies_statements_in_order() {
        let previous = orders().comment("old").property("gone", "1");
        let desired = orders().comment("new");

        let lifecycle =
            TableLifecycle::new(MockExecutor::default(), MockCatalog::holding(previous));
        lifecycle.update(&desired).await.unwrap();

        let executed = lifecycle.executor.executed();
        assert_eq!(executed.len(), 3);
        assert!(executed[0].starts_with("COMMENT ON TABLE"));
        assert!(executed[1].contains("UNSET TBLPROPERTIES"));
        assert!(executed[2].contains("SET TBLPROPERTIES"));
    }

    #[tokio::test]
    async fn test_update_with_no_drift_executes_nothing() {
        let lifecycle =
            TableLifecycle::new(MockExecutor::default(), MockCatalog::holding(orders()));
        lifecycle.update(&orders()).await.unwrap();
        assert!(lifecycle.executor.executed().is_empty());
    }

    #[tokio::test]
    async fn test_update_halts_on_first_failure() {
        let previous = orders().comment("old").property("gone", "1");
        let desired = orders().comment("new");

        let lifecycle = TableLifecycle::new(
            MockExecutor::failing_on("UNSET"),
            MockCatalog::holding(previous),
        );
        let err = lifecycle.update(&desired).await.unwrap_err();

        assert!(matches!(err, DdlError::Execution { .. }));
        // The comment statement before the failing one stays applied; the
        // trailing SET statement is never issued.
        let executed = lifecycle.executor.executed();
        assert_eq!(executed.len(), 2);
        assert!(executed[0].starts_with("COMMENT ON TABLE"));
        assert!(executed[1].contains("UNSET"));
    }

    #[tokio::test]
    async fn test_validation_error_prevents_any_execution() {
        let previous = orders();
        let mut desired = orders();
        desired.columns[0].type_text = "string".to_string();

        let lifecycle =
            TableLifecycle::new(MockExecutor::default(), MockCatalog::holding(previous));
        let err = lifecycle.update(&desired).await.unwrap_err();

        assert!(matches!(err, DdlError::TypeChange { .. }));
        assert!(lifecycle.executor.executed().is_empty());
    }

    #[tokio::test]
    async fn test_update_reconciles_owner_change() {
        let previous = orders().owner("old-team");
        let desired = orders().owner("new-team");

        let lifecycle =
            TableLifecycle::new(MockExecutor::default(), MockCatalog::holding(previous));
        lifecycle.update(&desired).await.unwrap();

        let updates = lifecycle.catalog.owner_updates.lock().unwrap();
        assert_eq!(
            updates.as_slice(),
            &[("main.sales.orders".to_string(), "new-team".to_string())]
        );
    }

    #[tokio::test]
    async fn test_delete_issues_drop() {
        let lifecycle =
            TableLifecycle::new(MockExecutor::default(), MockCatalog::holding(orders()));
        lifecycle.delete(&orders()).await.unwrap();

        assert_eq!(
            lifecycle.executor.executed(),
            vec!["DROP TABLE `main`.`sales`.`orders`".to_string()]
        );
    }

    #[tokio::test]
    async fn test_timeout_cancels_and_surfaces() {
        let lifecycle = TableLifecycle::new(
            MockExecutor::sleeping(Duration::from_secs(5)),
            MockCatalog::holding(orders()),
        )
        .wait_timeout(Duration::from_millis(20));

        let err = lifecycle.delete(&orders()).await.unwrap_err();

        assert!(matches!(err, DdlError::Timeout { .. }));
        assert!(lifecycle.executor.cancelled.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_read_fetches_from_catalog() {
        let lifecycle =
            TableLifecycle::new(MockExecutor::default(), MockCatalog::holding(orders()));
        let table = lifecycle.read("main.sales.orders").await.unwrap();
        assert_eq!(table, orders());
    }
}
