//! Behavioral statements for process bodies.

use crate::expr::Expr;
use crate::ids::{SignalId, StmtId};
use serde::{Deserialize, Serialize};

/// A behavioral statement.
///
/// Every statement carries a [`StmtId`] so processes can be ordered by the
/// newest statement they contain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// `dst <= src`.
    Assignment {
        /// Statement ID.
        id: StmtId,
        /// The assigned signal.
        dst: SignalId,
        /// The assigned value.
        src: Expr,
        /// Index expressions for a partial assignment, if requested.
        indexes: Option<Vec<Expr>>,
        /// Whether the assignment happens on a clock event.
        is_event_dependent: bool,
    },
    /// An if/elif/else chain.
    ///
    /// Each condition is a list of operands that must all hold.
    If {
        /// Statement ID.
        id: StmtId,
        /// The condition operands.
        cond: Vec<Expr>,
        /// Body when `cond` holds.
        if_true: Vec<Statement>,
        /// Ordered `elif` branches.
        elifs: Vec<(Vec<Expr>, Vec<Statement>)>,
        /// Body when no condition holds.
        if_false: Vec<Statement>,
    },
    /// A case statement. A `None` key is the default case.
    Switch {
        /// Statement ID.
        id: StmtId,
        /// The subject expression.
        switch_on: Expr,
        /// Ordered cases.
        cases: Vec<(Option<Expr>, Vec<Statement>)>,
    },
    /// A wait statement.
    Wait {
        /// Statement ID.
        id: StmtId,
        /// True for `wait for <time>`.
        is_time_wait: bool,
        /// The wait duration for a timed wait.
        wait_for: Option<u64>,
    },
}

impl Statement {
    /// Returns the ID of this statement.
    pub fn id(&self) -> StmtId {
        match self {
            Statement::Assignment { id, .. }
            | Statement::If { id, .. }
            | Statement::Switch { id, .. }
            | Statement::Wait { id, .. } => *id,
        }
    }

    /// Returns the highest statement ID in this statement and its bodies.
    pub fn max_stmt_id(&self) -> StmtId {
        let nested = match self {
            Statement::Assignment { .. } | Statement::Wait { .. } => None,
            Statement::If {
                if_true,
                elifs,
                if_false,
                ..
            } => if_true
                .iter()
                .chain(elifs.iter().flat_map(|(_, body)| body))
                .chain(if_false)
                .map(Statement::max_stmt_id)
                .max(),
            Statement::Switch { cases, .. } => cases
                .iter()
                .flat_map(|(_, body)| body)
                .map(Statement::max_stmt_id)
                .max(),
        };
        nested.map_or(self.id(), |n| n.max(self.id()))
    }

    /// Calls `f` with this statement and every nested statement, depth first.
    pub fn walk(&self, f: &mut impl FnMut(&Statement)) {
        f(self);
        match self {
            Statement::Assignment { .. } | Statement::Wait { .. } => {}
            Statement::If {
                if_true,
                elifs,
                if_false,
                ..
            } => {
                for s in if_true
                    .iter()
                    .chain(elifs.iter().flat_map(|(_, body)| body))
                    .chain(if_false)
                {
                    s.walk(f);
                }
            }
            Statement::Switch { cases, .. } => {
                for s in cases.iter().flat_map(|(_, body)| body) {
                    s.walk(f);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assign(id: u32) -> Statement {
        Statement::Assignment {
            id: StmtId::from_raw(id),
            dst: SignalId::from_raw(0),
            src: Expr::Signal(SignalId::from_raw(1)),
            indexes: None,
            is_event_dependent: false,
        }
    }

    #[test]
    fn leaf_max_is_own_id() {
        assert_eq!(assign(7).max_stmt_id(), StmtId::from_raw(7));
    }

    #[test]
    fn if_max_looks_into_all_branches() {
        let stmt = Statement::If {
            id: StmtId::from_raw(1),
            cond: vec![Expr::Signal(SignalId::from_raw(2))],
            if_true: vec![assign(2)],
            elifs: vec![(vec![Expr::Signal(SignalId::from_raw(3))], vec![assign(9)])],
            if_false: vec![assign(4)],
        };
        assert_eq!(stmt.max_stmt_id(), StmtId::from_raw(9));
    }

    #[test]
    fn switch_max_and_walk() {
        let stmt = Statement::Switch {
            id: StmtId::from_raw(10),
            switch_on: Expr::Signal(SignalId::from_raw(0)),
            cases: vec![(None, vec![assign(3)])],
        };
        assert_eq!(stmt.max_stmt_id(), StmtId::from_raw(10));

        let mut seen = Vec::new();
        stmt.walk(&mut |s| seen.push(s.id()));
        assert_eq!(seen, vec![StmtId::from_raw(10), StmtId::from_raw(3)]);
    }
}
