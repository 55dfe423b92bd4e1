//! Operator precedence and arity.
//!
//! Lower numbers bind tighter. Casts and `Pow` render call-shaped and have no
//! precedence; their operands are never parenthesized.

use hdlkit_ir::Operator;

/// Returns the precedence of `op`, or `None` for call-shaped operators.
pub fn precedence(op: Operator) -> Option<u8> {
    use Operator::*;
    match op {
        Not | Event | RisingEdge | FallingEdge | Index | Ternary | Call | Concat | DownTo => {
            Some(1)
        }
        Mul | Div => Some(4),
        Add | Sub => Some(5),
        AndLog => Some(8),
        Xor => Some(9),
        OrLog => Some(10),
        Eq | Neq | GreaterThan | LowerThan | Ge | Le => Some(11),
        BitsAsSigned | BitsAsUnsigned | BitsAsVec | Pow => None,
    }
}

/// Returns `true` if an operand produced by `child` needs parentheses inside
/// `parent`.
///
/// Equal precedence parenthesizes too, so same-level chains keep redundant
/// parentheses.
pub fn needs_parens(child: Operator, parent: Operator) -> bool {
    match (precedence(child), precedence(parent)) {
        (Some(c), Some(p)) => c <= p,
        _ => false,
    }
}

/// The number of operands an operator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many operands.
    Exactly(usize),
    /// At least this many operands.
    AtLeast(usize),
}

impl Arity {
    /// Returns `true` if `count` operands are accepted.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

/// Returns the operand count `op` accepts.
pub fn arity(op: Operator) -> Arity {
    use Operator::*;
    match op {
        Not | Event | RisingEdge | FallingEdge | BitsAsSigned | BitsAsUnsigned | BitsAsVec => {
            Arity::Exactly(1)
        }
        Concat | Eq | Index | Pow => Arity::Exactly(2),
        Ternary => Arity::Exactly(3),
        Call => Arity::AtLeast(1),
        AndLog | OrLog | Xor | Div | DownTo | Neq | GreaterThan | Ge | Le | LowerThan | Sub
        | Mul | Add => Arity::AtLeast(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_values() {
        assert_eq!(precedence(Operator::Not), Some(1));
        assert_eq!(precedence(Operator::Mul), Some(4));
        assert_eq!(precedence(Operator::Sub), Some(5));
        assert_eq!(precedence(Operator::AndLog), Some(8));
        assert_eq!(precedence(Operator::Xor), Some(9));
        assert_eq!(precedence(Operator::OrLog), Some(10));
        assert_eq!(precedence(Operator::Le), Some(11));
        assert_eq!(precedence(Operator::Pow), None);
    }

    #[test]
    fn parens_on_tighter_or_equal() {
        assert!(needs_parens(Operator::Sub, Operator::Sub));
        assert!(needs_parens(Operator::Mul, Operator::Add));
        assert!(!needs_parens(Operator::Add, Operator::Mul));
        assert!(!needs_parens(Operator::Add, Operator::Pow));
        assert!(!needs_parens(Operator::BitsAsSigned, Operator::Add));
    }

    #[test]
    fn arities() {
        assert!(arity(Operator::Not).accepts(1));
        assert!(!arity(Operator::Not).accepts(2));
        assert!(arity(Operator::Add).accepts(3));
        assert!(!arity(Operator::Ternary).accepts(2));
        assert!(arity(Operator::Call).accepts(1));
    }
}
