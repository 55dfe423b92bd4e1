//! Processes: sensitivity-driven statement bodies.

use crate::ids::{ProcessId, SignalId, StmtId};
use crate::stmt::Statement;
use hdlkit_common::Ident;
use serde::{Deserialize, Serialize};

/// A process owned by an architecture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    /// The unique ID of this process within its architecture.
    pub id: ProcessId,
    /// The process name.
    pub name: Ident,
    /// Signals whose change wakes the process.
    pub sensitivity: Vec<SignalId>,
    /// The statement body.
    pub body: Vec<Statement>,
}

impl Process {
    /// Returns the highest statement ID in the body, if the body is non-empty.
    pub fn max_stmt_id(&self) -> Option<StmtId> {
        self.body.iter().map(Statement::max_stmt_id).max()
    }
}
