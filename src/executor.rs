//! Execution collaborator contracts.
//!
//! The engine never talks to a warehouse or cluster directly; it generates
//! statement text and hands it to a [`StatementExecutor`]. Two transports
//! exist remotely: an ad-hoc statement endpoint, and command execution bound
//! to a provisioned compute target. [`ComputeBoundExecutor`] adapts the
//! latter to the former so the orchestrator only ever sees one seam.

use std::time::Duration;

use crate::error::{DdlError, Result};

/// Hard upper bound on the wait for a single statement before the in-flight
/// execution is told to cancel. A timeout is surfaced as a failure, never
/// silently retried.
pub const MAX_EXEC_WAIT: Duration = Duration::from_secs(50);

/// Outcome of one statement as reported by the execution collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementStatus {
    /// Whether the statement completed successfully.
    pub succeeded: bool,
    /// Error detail for non-success outcomes.
    pub detail: String,
}

impl StatementStatus {
    /// A successful outcome.
    #[must_use]
    pub fn succeeded() -> Self {
        Self {
            succeeded: true,
            detail: String::new(),
        }
    }

    /// A failed outcome with the given detail.
    #[must_use]
    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            detail: detail.into(),
        }
    }
}

/// Executes SQL statements against the remote engine, one at a time.
///
/// Implementations hold at most one outstanding statement; the orchestrator
/// never issues the next statement before the previous one resolved.
pub trait StatementExecutor {
    /// Executes one statement and reports its outcome. A transport failure is
    /// an `Err`; a statement-level failure is a non-success status.
    fn execute_statement(
        &self,
        statement: &str,
    ) -> impl std::future::Future<Output = Result<StatementStatus>> + Send;

    /// Instructs the collaborator to cancel the in-flight statement. Called
    /// when the wait timeout elapses.
    fn cancel_running(&self) -> impl std::future::Future<Output = ()> + Send;
}

/// Result of a command run on a provisioned compute target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the command failed.
    pub failed: bool,
    /// Error detail for failed commands.
    pub error: String,
}

/// Runs language-tagged commands on a provisioned compute target.
///
/// Used when no ad-hoc statement endpoint is configured.
pub trait CommandExecutor {
    /// Executes `command` in the given language on the compute target.
    fn execute(
        &self,
        compute_id: &str,
        language: &str,
        command: &str,
    ) -> impl std::future::Future<Output = Result<CommandOutput>> + Send;
}

/// Adapts a [`CommandExecutor`] plus a compute id into a
/// [`StatementExecutor`] issuing `sql` commands.
#[derive(Debug, Clone)]
pub struct ComputeBoundExecutor<C> {
    compute_id: String,
    commands: C,
}

impl<C: CommandExecutor> ComputeBoundExecutor<C> {
    /// Binds the command executor to a compute target.
    #[must_use]
    pub fn new(compute_id: impl Into<String>, commands: C) -> Self {
        Self {
            compute_id: compute_id.into(),
            commands,
        }
    }

    /// Returns the bound compute id.
    #[must_use]
    pub fn compute_id(&self) -> &str {
        &self.compute_id
    }
}

impl<C: CommandExecutor + Sync> StatementExecutor for ComputeBoundExecutor<C> {
    async fn execute_statement(&self, statement: &str) -> Result<StatementStatus> {
        let output = self
            .commands
            .execute(&self.compute_id, "sql", statement)
            .await?;
        if output.failed {
            Ok(StatementStatus::failed(output.error))
        } else {
            Ok(StatementStatus::succeeded())
        }
    }

    async fn cancel_running(&self) {
        // Command execution cancels server-side when the command context is
        // torn down; there is no separate cancel call on this transport.
    }
}

/// Sizing request for a compute target used to run DDL.
///
/// The provisioner resolves this to the smallest capable node type and an
/// auto-terminating single-node target, creating and starting it if needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeRequest {
    /// Stable name used to find or create the target.
    pub name: String,
    /// Idle minutes before the target terminates itself.
    pub autotermination_minutes: u32,
    /// Whether the node type must have local disk.
    pub local_disk: bool,
}

impl Default for ComputeRequest {
    fn default() -> Self {
        Self {
            name: "lakeddl-exec".to_string(),
            autotermination_minutes: 10,
            local_disk: true,
        }
    }
}

impl ComputeRequest {
    /// Creates a request with the given target name and default sizing.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Obtains (or creates and starts) a compute target able to run statements.
///
/// Failures surface as [`DdlError::Provisioning`] before any statement is
/// generated.
pub trait ComputeProvisioner {
    /// Resolves the request to a running compute target id.
    fn ensure_running(
        &self,
        request: &ComputeRequest,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Provisions a compute target and binds a command executor to it.
pub async fn provision_bound_executor<P, C>(
    provisioner: &P,
    commands: C,
    request: &ComputeRequest,
) -> Result<ComputeBoundExecutor<C>>
where
    P: ComputeProvisioner,
    C: CommandExecutor,
{
    let compute_id = provisioner
        .ensure_running(request)
        .await
        .map_err(|err| match err {
            DdlError::Provisioning(_) => err,
            other => DdlError::Provisioning(other.to_string()),
        })?;
    Ok(ComputeBoundExecutor::new(compute_id, commands))
}
