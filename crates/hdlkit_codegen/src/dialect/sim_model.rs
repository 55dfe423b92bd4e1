//! Event-driven simulation model text.
//!
//! Signals are attributes of the model object. Reads see the value from the
//! previous delta step (`._oldVal`); writes are yielded as updates.

use hdlkit_ir::{Operator, Signedness};

use super::{binary, Dialect, SignalDecl};
use crate::error::SerializeError;

/// Python keywords plus the names the model reserves for itself.
const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield", "sim", "self",
];

/// The simulation model dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimModel;

impl Dialect for SimModel {
    fn name(&self) -> &'static str {
        "sim_model"
    }

    fn keywords(&self) -> &'static [&'static str] {
        KEYWORDS
    }

    fn ignore_case(&self) -> bool {
        false
    }

    fn signal_ref(&self, name: &str) -> String {
        format!("self.{name}._oldVal")
    }

    fn assignment_target(&self, name: &str) -> String {
        format!("self.{name}")
    }

    fn operator(&self, op: Operator, o: &[String]) -> Result<String, SerializeError> {
        use Operator::*;
        Ok(match op {
            AndLog => binary("&", o),
            OrLog => binary("|", o),
            Xor => binary("^", o),
            Not => format!("~{}", o[0]),
            Call => format!("{}({})", o[0], o[1..].join(", ")),
            Concat => format!("Concat({}, {})", o[0], o[1]),
            Div => binary("//", o),
            DownTo => binary(":", o),
            Eq => format!("({})._eq({})", o[0], o[1]),
            Neq => binary("!=", o),
            Event => format!("{}._hasEvent(sim)", o[0]),
            RisingEdge => format!("{}._onRisingEdge(sim)", o[0]),
            FallingEdge => format!("{}._onFallingEdge(sim)", o[0]),
            GreaterThan => binary(">", o),
            Ge => binary(">=", o),
            Le => binary("<=", o),
            Index => format!("{}[{}]", o[0], o[1]),
            LowerThan => binary("<", o),
            Sub => binary("-", o),
            Mul => binary("*", o),
            Add => binary("+", o),
            Ternary => format!("{} if {} else {}", o[1], o[0], o[2]),
            BitsAsSigned => format!("{}._signed()", o[0]),
            BitsAsUnsigned => format!("{}._unsigned()", o[0]),
            BitsAsVec => format!("{}._vec()", o[0]),
            Pow => format!("pow({}, {})", o[0], o[1]),
        })
    }

    fn logical_and(&self) -> &'static str {
        " and "
    }

    fn boolean(&self, value: bool) -> &'static str {
        if value {
            "True"
        } else {
            "False"
        }
    }

    fn string_literal(&self, value: &str) -> String {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }

    fn undefined(&self, _type_name: &str) -> Result<String, SerializeError> {
        Ok("None".to_string())
    }

    fn bit_type(&self) -> &'static str {
        "BIT"
    }

    fn vector_type(&self, width: u32, signedness: Signedness) -> String {
        let signed = match signedness {
            Signedness::None => "None",
            Signedness::Signed => "True",
            Signedness::Unsigned => "False",
        };
        format!("vecT({width}, {signed})")
    }

    fn assignment(&self, dst: &str, src: &str, is_event_dependent: bool) -> String {
        format!(
            "yield ({dst}, mkUpdater({src}), {})",
            self.boolean(is_event_dependent)
        )
    }

    fn connection(&self, dst: &str, src: &str) -> String {
        format!("self._connect(self.{dst}, self.{src})")
    }

    fn wraps_operand(&self, op: Operator, index: usize) -> bool {
        op == Operator::Eq && index == 0
    }

    fn timed_wait(&self, amount: u64, unit: &str) -> String {
        format!("wait for {amount} {unit}")
    }

    fn wait_forever(&self) -> String {
        "wait".to_string()
    }

    fn signal_declaration(&self, decl: &SignalDecl<'_>) -> Result<String, SerializeError> {
        Ok(format!(
            "self.{name} = mkSig(sim, \"{name}\", {ty}, {default})",
            name = decl.name,
            ty = decl.ty,
            default = decl.default.unwrap_or("None")
        ))
    }
}
