//! Expression trees.
//!
//! [`Expr`] is a closed union over signal references, literals, and operator
//! applications. Consumers match on it exhaustively.

use crate::ids::{SignalId, TypeId};
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// An operator tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Logical/bitwise AND.
    AndLog,
    /// Logical/bitwise OR.
    OrLog,
    /// Bitwise XOR.
    Xor,
    /// Bitwise NOT.
    Not,
    /// Function call; the first operand is the function name as a string literal.
    Call,
    /// Concatenation of two operands.
    Concat,
    /// Division.
    Div,
    /// Range bound `a downto b`.
    DownTo,
    /// Equality.
    Eq,
    /// Inequality.
    Neq,
    /// Signal event (any change).
    Event,
    /// Rising edge of a signal.
    RisingEdge,
    /// Falling edge of a signal.
    FallingEdge,
    /// Greater than.
    GreaterThan,
    /// Greater than or equal.
    Ge,
    /// Less than or equal.
    Le,
    /// Indexing `a[b]`.
    Index,
    /// Less than.
    LowerThan,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Addition.
    Add,
    /// Conditional `cond ? a : b`; operands are `[cond, a, b]`.
    Ternary,
    /// Reinterpret bits as signed.
    BitsAsSigned,
    /// Reinterpret bits as unsigned.
    BitsAsUnsigned,
    /// Reinterpret bits as a plain vector.
    BitsAsVec,
    /// Exponentiation.
    Pow,
}

/// An operator applied to ordered operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// The operator.
    pub operator: Operator,
    /// The operands, in order.
    pub operands: Vec<Expr>,
    /// The result type.
    pub ty: TypeId,
}

/// An expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A reference to a signal.
    Signal(SignalId),
    /// A literal constant.
    Literal(Value),
    /// An operator application.
    Op(Box<Operation>),
}

impl Expr {
    /// Builds an operator application.
    pub fn op(operator: Operator, operands: Vec<Expr>, ty: TypeId) -> Self {
        Expr::Op(Box::new(Operation {
            operator,
            operands,
            ty,
        }))
    }

    /// Returns the operation if this is an operator application.
    pub fn as_op(&self) -> Option<&Operation> {
        match self {
            Expr::Op(op) => Some(op),
            _ => None,
        }
    }

    /// Collects every signal referenced in this expression, in visit order.
    pub fn signals(&self, out: &mut Vec<SignalId>) {
        match self {
            Expr::Signal(s) => out.push(*s),
            Expr::Literal(_) => {}
            Expr::Op(op) => {
                for operand in &op.operands {
                    operand.signals(out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeDb;

    #[test]
    fn op_builder() {
        let mut db = TypeDb::new();
        let ty = db.bits(8);
        let e = Expr::op(
            Operator::Add,
            vec![Expr::Signal(SignalId::from_raw(0)), Expr::Signal(SignalId::from_raw(1))],
            ty,
        );
        let op = e.as_op().unwrap();
        assert_eq!(op.operator, Operator::Add);
        assert_eq!(op.operands.len(), 2);
        assert!(Expr::Signal(SignalId::from_raw(0)).as_op().is_none());
    }

    #[test]
    fn collect_signals() {
        let mut db = TypeDb::new();
        let ty = db.bits(8);
        let inner = Expr::op(
            Operator::Sub,
            vec![
                Expr::Signal(SignalId::from_raw(1)),
                Expr::Literal(Value::from_u64(&mut db, 1, 8)),
            ],
            ty,
        );
        let e = Expr::op(Operator::Mul, vec![Expr::Signal(SignalId::from_raw(0)), inner], ty);
        let mut sigs = Vec::new();
        e.signals(&mut sigs);
        assert_eq!(sigs, vec![SignalId::from_raw(0), SignalId::from_raw(1)]);
    }
}
