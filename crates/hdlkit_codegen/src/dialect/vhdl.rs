//! VHDL text.

use hdlkit_ir::{Operator, Signedness};

use super::{binary, Dialect, SignalDecl, SignalKind};
use crate::error::SerializeError;

/// VHDL-93/2008 reserved words.
const KEYWORDS: &[&str] = &[
    "abs", "access", "after", "alias", "all", "and", "architecture", "array", "assert",
    "assume", "attribute", "begin", "block", "body", "buffer", "bus", "case", "component",
    "configuration", "constant", "context", "cover", "default", "disconnect", "downto", "else",
    "elsif", "end", "entity", "exit", "fairness", "file", "for", "force", "function",
    "generate", "generic", "group", "guarded", "if", "impure", "in", "inertial", "inout", "is",
    "label", "library", "linkage", "literal", "loop", "map", "mod", "nand", "new", "next",
    "nor", "not", "null", "of", "on", "open", "or", "others", "out", "package", "parameter",
    "port", "postponed", "procedure", "process", "property", "protected", "pure", "range",
    "record", "register", "reject", "release", "rem", "report", "restrict", "return", "rol",
    "ror", "select", "sequence", "severity", "shared", "signal", "sla", "sll", "sra", "srl",
    "strong", "subtype", "then", "to", "transport", "type", "unaffected", "units", "until",
    "use", "variable", "vmode", "vprop", "vunit", "wait", "when", "while", "with", "xnor",
    "xor",
];

/// The VHDL dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vhdl;

impl Dialect for Vhdl {
    fn name(&self) -> &'static str {
        "vhdl"
    }

    fn keywords(&self) -> &'static [&'static str] {
        KEYWORDS
    }

    fn ignore_case(&self) -> bool {
        true
    }

    fn signal_ref(&self, name: &str) -> String {
        name.to_string()
    }

    fn assignment_target(&self, name: &str) -> String {
        name.to_string()
    }

    fn operator(&self, op: Operator, o: &[String]) -> Result<String, SerializeError> {
        use Operator::*;
        Ok(match op {
            AndLog => binary("AND", o),
            OrLog => binary("OR", o),
            Xor => binary("XOR", o),
            Not => format!("NOT {}", o[0]),
            Call => format!("{}({})", o[0], o[1..].join(", ")),
            Concat => binary("&", o),
            Div => binary("/", o),
            DownTo => binary("DOWNTO", o),
            Eq => binary("=", o),
            Neq => binary("/=", o),
            Event => format!("{}'EVENT", o[0]),
            RisingEdge => format!("RISING_EDGE({})", o[0]),
            FallingEdge => format!("FALLING_EDGE({})", o[0]),
            GreaterThan => binary(">", o),
            Ge => binary(">=", o),
            Le => binary("<=", o),
            Index => format!("{}({})", o[0], o[1]),
            LowerThan => binary("<", o),
            Sub => binary("-", o),
            Mul => binary("*", o),
            Add => binary("+", o),
            Ternary => {
                return Err(SerializeError::unsupported(
                    "ternary expression in vhdl dialect",
                ))
            }
            BitsAsSigned => format!("SIGNED({})", o[0]),
            BitsAsUnsigned => format!("UNSIGNED({})", o[0]),
            BitsAsVec => format!("STD_LOGIC_VECTOR({})", o[0]),
            Pow => binary("**", o),
        })
    }

    fn logical_and(&self) -> &'static str {
        " AND "
    }

    fn boolean(&self, value: bool) -> &'static str {
        if value {
            "TRUE"
        } else {
            "FALSE"
        }
    }

    fn string_literal(&self, value: &str) -> String {
        format!("\"{}\"", value.replace('"', "\"\""))
    }

    fn undefined(&self, type_name: &str) -> Result<String, SerializeError> {
        Err(SerializeError::unsupported(format!(
            "undefined {type_name} value in vhdl dialect"
        )))
    }

    fn bit_type(&self) -> &'static str {
        "STD_LOGIC"
    }

    fn vector_type(&self, width: u32, signedness: Signedness) -> String {
        let base = match signedness {
            Signedness::None => "STD_LOGIC_VECTOR",
            Signedness::Signed => "SIGNED",
            Signedness::Unsigned => "UNSIGNED",
        };
        format!("{base}({} DOWNTO 0)", width.saturating_sub(1))
    }

    fn assignment(&self, dst: &str, src: &str, _is_event_dependent: bool) -> String {
        format!("{dst} <= {src};")
    }

    fn connection(&self, dst: &str, src: &str) -> String {
        format!("{dst} <= {src};")
    }

    fn timed_wait(&self, amount: u64, unit: &str) -> String {
        format!("WAIT FOR {amount} {unit};")
    }

    fn wait_forever(&self) -> String {
        "WAIT;".to_string()
    }

    fn signal_declaration(&self, decl: &SignalDecl<'_>) -> Result<String, SerializeError> {
        let prefix = match decl.kind {
            Some(SignalKind::Signal) => "SIGNAL",
            Some(SignalKind::Constant) => "CONSTANT",
            None => {
                return Err(SerializeError::unsupported(format!(
                    "signal {} is declared but not used",
                    decl.name
                )))
            }
        };
        let mut text = format!("{prefix} {} : {}", decl.name, decl.ty);
        if let Some(default) = decl.default {
            text.push_str(&format!(" := {default}"));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn operator_patterns() {
        let v = Vhdl;
        assert_eq!(v.operator(Operator::AndLog, &ops(&["a", "b"])).unwrap(), "a AND b");
        assert_eq!(v.operator(Operator::Neq, &ops(&["a", "b"])).unwrap(), "a /= b");
        assert_eq!(v.operator(Operator::Event, &ops(&["clk"])).unwrap(), "clk'EVENT");
        assert_eq!(
            v.operator(Operator::RisingEdge, &ops(&["clk"])).unwrap(),
            "RISING_EDGE(clk)"
        );
        assert_eq!(v.operator(Operator::Index, &ops(&["mem", "i"])).unwrap(), "mem(i)");
        assert_eq!(
            v.operator(Operator::Call, &ops(&["resize", "a", "8"])).unwrap(),
            "resize(a, 8)"
        );
        assert_eq!(
            v.operator(Operator::BitsAsVec, &ops(&["x"])).unwrap(),
            "STD_LOGIC_VECTOR(x)"
        );
        assert_eq!(v.operator(Operator::Pow, &ops(&["2", "n"])).unwrap(), "2 ** n");
    }

    #[test]
    fn no_ternary() {
        let err = Vhdl
            .operator(Operator::Ternary, &ops(&["c", "a", "b"]))
            .unwrap_err();
        assert!(matches!(err, SerializeError::UnsupportedConstruct { .. }));
    }

    #[test]
    fn vector_types() {
        assert_eq!(Vhdl.vector_type(8, Signedness::None), "STD_LOGIC_VECTOR(7 DOWNTO 0)");
        assert_eq!(Vhdl.vector_type(4, Signedness::Signed), "SIGNED(3 DOWNTO 0)");
        assert_eq!(Vhdl.vector_type(1, Signedness::Unsigned), "UNSIGNED(0 DOWNTO 0)");
    }

    #[test]
    fn signal_declarations() {
        let decl = SignalDecl {
            name: "s",
            ty: "STD_LOGIC",
            default: Some("'0'"),
            kind: Some(SignalKind::Signal),
        };
        assert_eq!(
            Vhdl.signal_declaration(&decl).unwrap(),
            "SIGNAL s : STD_LOGIC := '0'"
        );
        let constant = SignalDecl {
            kind: Some(SignalKind::Constant),
            default: None,
            ..decl.clone()
        };
        assert_eq!(
            Vhdl.signal_declaration(&constant).unwrap(),
            "CONSTANT s : STD_LOGIC"
        );
        let unused = SignalDecl { kind: None, ..decl };
        assert!(Vhdl.signal_declaration(&unused).is_err());
    }

    #[test]
    fn keywords_are_lowercase() {
        assert!(Vhdl.keywords().iter().all(|k| k.chars().all(|c| c.is_ascii_lowercase())));
        let mut scope = Vhdl.base_scope(&["top".to_string()]);
        assert!(scope.is_used("SIGNAL"));
        assert!(scope.is_used("Top"));
        assert_eq!(
            scope.checked_name("entity", crate::ScopeOwner::Instance(0)),
            "entity_0"
        );
    }
}
