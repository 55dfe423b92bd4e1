//! Target-language dialects.
//!
//! A [`Dialect`] knows the surface syntax of one output language: operator
//! patterns, keywords, type names, and statement shapes. Everything that is
//! shared, such as precedence, literal bit formatting, and declaration
//! bookkeeping, lives in the [`Serializer`](crate::Serializer).

mod sim_model;
mod vhdl;

pub use sim_model::SimModel;
pub use vhdl::Vhdl;

use hdlkit_ir::{Operator, Signedness};

use crate::error::SerializeError;
use crate::name_scope::NameScope;

/// How a declared signal is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    /// Something drives the signal.
    Signal,
    /// The signal is only read.
    Constant,
}

/// A signal declaration with every piece already rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalDecl<'a> {
    /// Checked signal name.
    pub name: &'a str,
    /// Rendered type.
    pub ty: &'a str,
    /// Rendered default value, if it has any valid bit.
    pub default: Option<&'a str>,
    /// Usage class, `None` when the signal is neither driven nor read.
    pub kind: Option<SignalKind>,
}

/// The surface syntax of one output language.
pub trait Dialect {
    /// Human-readable dialect name.
    fn name(&self) -> &'static str;

    /// Reserved words generated names must avoid.
    fn keywords(&self) -> &'static [&'static str];

    /// Whether identifiers compare case-insensitively.
    fn ignore_case(&self) -> bool;

    /// Returns a fresh naming scope preloaded with the keywords and `extra`
    /// reserved words.
    fn base_scope(&self, extra: &[String]) -> NameScope {
        let mut scope = NameScope::new(self.keywords().iter().copied(), self.ignore_case());
        scope.reserve(extra.iter().map(String::as_str));
        scope
    }

    /// Renders a read of the signal `name`.
    fn signal_ref(&self, name: &str) -> String;

    /// Renders the target of an assignment to `name`.
    fn assignment_target(&self, name: &str) -> String;

    /// Renders `op` applied to already rendered and parenthesized operands.
    ///
    /// For `Call` the first operand is the bare function name; for `Ternary`
    /// the first operand is the rendered condition.
    fn operator(&self, op: Operator, operands: &[String]) -> Result<String, SerializeError>;

    /// Returns `true` if [`Dialect::operator`] already wraps operand `index`
    /// of `op` in parentheses.
    fn wraps_operand(&self, _op: Operator, _index: usize) -> bool {
        false
    }

    /// The joiner for conjunctive condition lists.
    fn logical_and(&self) -> &'static str;

    /// Renders a boolean constant.
    fn boolean(&self, value: bool) -> &'static str;

    /// Renders a string constant.
    fn string_literal(&self, value: &str) -> String;

    /// Renders an undefined scalar value of the named type.
    fn undefined(&self, type_name: &str) -> Result<String, SerializeError>;

    /// The single-bit type keyword.
    fn bit_type(&self) -> &'static str;

    /// Renders a bit vector type.
    fn vector_type(&self, width: u32, signedness: Signedness) -> String;

    /// Renders a process assignment statement.
    fn assignment(&self, dst: &str, src: &str, is_event_dependent: bool) -> String;

    /// Renders a concurrent connection `dst <= src` between named signals.
    fn connection(&self, dst: &str, src: &str) -> String;

    /// Renders a timed wait.
    fn timed_wait(&self, amount: u64, unit: &str) -> String;

    /// Renders an unconditional wait.
    fn wait_forever(&self) -> String;

    /// Renders a signal declaration.
    fn signal_declaration(&self, decl: &SignalDecl<'_>) -> Result<String, SerializeError>;
}

/// Joins operands with ` op `.
pub(crate) fn binary(op: &str, operands: &[String]) -> String {
    operands.join(&format!(" {op} "))
}
