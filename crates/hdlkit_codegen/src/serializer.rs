//! Expression, statement, type, and architecture serialization.
//!
//! The [`Serializer`] walks one [`Architecture`] and renders it through a
//! [`Dialect`] and a [`TemplateRenderer`]. It owns the per-unit bookkeeping:
//! checked names of every declared object and the single declaration site of
//! every enum and array type.

use std::collections::HashMap;

use hdlkit_common::{BitVec, Interner};
use hdlkit_ir::{
    Architecture, Expr, HdlType, Operation, Operator, PortDirection, ProcessId, Signal, SignalId,
    Signedness, Statement, TypeDb, TypeId, Value, ValueData,
};

use crate::dialect::{Dialect, SignalDecl, SignalKind};
use crate::error::SerializeError;
use crate::literal::{bit_literal, bit_string, signed_bit_string, unsigned_bit_string};
use crate::name_scope::{NameScope, ScopeOwner};
use crate::precedence::{arity, needs_parens};
use crate::templates::{
    IfBindings, InstanceBinding, PortBinding, ProcessBindings, SwitchBindings, Template,
    TemplateRenderer, UnitBindings,
};

type Result<T> = std::result::Result<T, SerializeError>;

/// Renders one architecture in one dialect.
pub struct Serializer<'a, D: Dialect> {
    dialect: D,
    arch: &'a Architecture,
    types: &'a TypeDb,
    interner: &'a Interner,
    scope: &'a mut NameScope,
    declared: HashMap<TypeId, String>,
    names: HashMap<SignalId, String>,
    wait_time_unit: String,
}

impl<'a, D: Dialect> Serializer<'a, D> {
    /// Creates a serializer for `arch` that allocates names in `scope`.
    pub fn new(
        dialect: D,
        arch: &'a Architecture,
        types: &'a TypeDb,
        interner: &'a Interner,
        scope: &'a mut NameScope,
    ) -> Self {
        Self {
            dialect,
            arch,
            types,
            interner,
            scope,
            declared: HashMap::new(),
            names: HashMap::new(),
            wait_time_unit: "ns".to_string(),
        }
    }

    /// Sets the unit used for timed waits.
    pub fn with_time_unit(mut self, unit: impl Into<String>) -> Self {
        self.wait_time_unit = unit.into();
        self
    }

    /// Returns the dialect.
    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Returns the type of `expr`.
    pub fn expr_type(&self, expr: &Expr) -> TypeId {
        match expr {
            Expr::Signal(id) => self.arch.signals[*id].ty,
            Expr::Literal(v) => v.ty,
            Expr::Op(op) => op.ty,
        }
    }

    fn signal_name(&self, id: SignalId) -> String {
        match self.names.get(&id) {
            Some(name) => name.clone(),
            None => self
                .interner
                .resolve(self.arch.signals[id].name)
                .to_string(),
        }
    }

    /// Renders an expression.
    ///
    /// A hidden signal renders the expression it stands for.
    pub fn serialize_expr(&self, expr: &Expr) -> Result<String> {
        match expr {
            Expr::Signal(id) => match self.arch.signals[*id].alias() {
                Some(origin) => self.serialize_expr(origin),
                None => Ok(self.dialect.signal_ref(&self.signal_name(*id))),
            },
            Expr::Literal(value) => self.serialize_value(value),
            Expr::Op(op) => self.serialize_op(op),
        }
    }

    fn serialize_op(&self, op: &Operation) -> Result<String> {
        let count = op.operands.len();
        if !arity(op.operator).accepts(count) {
            return Err(SerializeError::unsupported(format!(
                "{:?} with {count} operands",
                op.operator
            )));
        }
        let operands = match op.operator {
            Operator::Call => {
                let name = match &op.operands[0] {
                    Expr::Literal(Value {
                        data: ValueData::Str(Some(name)),
                        ..
                    }) => name.clone(),
                    _ => return Err(SerializeError::unsupported("call without a function name")),
                };
                let mut out = vec![name];
                for arg in &op.operands[1..] {
                    out.push(self.serialize_expr(arg)?);
                }
                out
            }
            Operator::Index => vec![
                self.serialize_expr(&op.operands[0])?,
                self.serialize_expr(&op.operands[1])?,
            ],
            Operator::Ternary => vec![
                self.cond_as_hdl(&op.operands[..1], true)?,
                self.operand(&op.operands[1], op.operator, 1)?,
                self.operand(&op.operands[2], op.operator, 2)?,
            ],
            _ => op
                .operands
                .iter()
                .enumerate()
                .map(|(i, o)| self.operand(o, op.operator, i))
                .collect::<Result<Vec<_>>>()?,
        };
        self.dialect.operator(op.operator, &operands)
    }

    /// Renders operand `index` of `parent`, parenthesized when [`needs_parens`]
    /// says so for its operator and the dialect does not wrap it already.
    fn operand(&self, expr: &Expr, parent: Operator, index: usize) -> Result<String> {
        let text = self.serialize_expr(expr)?;
        if self.dialect.wraps_operand(parent, index) {
            return Ok(text);
        }
        let child = match expr {
            Expr::Op(op) => Some(op.operator),
            Expr::Signal(id) => self.arch.signals[*id]
                .alias()
                .and_then(Expr::as_op)
                .map(|op| op.operator),
            Expr::Literal(_) => None,
        };
        Ok(match child {
            Some(child) if needs_parens(child, parent) => format!("({text})"),
            _ => text,
        })
    }

    /// Renders a constant.
    pub fn serialize_value(&self, value: &Value) -> Result<String> {
        let ty = self.types.get(value.ty);
        match &value.data {
            ValueData::Bits(bits) if self.types.bit_width(value.ty) != Some(bits.width()) => {
                Err(SerializeError::type_mismatch(format!(
                    "{}-bit literal for type {}",
                    bits.width(),
                    self.serialize_type(value.ty)
                )))
            }
            ValueData::Bits(bits) => match ty {
                HdlType::Bits {
                    signedness: Signedness::Signed,
                    ..
                } => signed_bit_string(bits),
                HdlType::Bits {
                    signedness: Signedness::Unsigned,
                    ..
                } => unsigned_bit_string(bits),
                ty if ty.is_scalar_bit() => Ok(bit_literal(bits)),
                _ => Ok(bit_string(bits)),
            },
            ValueData::Bool(Some(b)) => Ok(self.dialect.boolean(*b).to_string()),
            ValueData::Int(Some(i)) => Ok(i.to_string()),
            ValueData::Str(Some(s)) => Ok(self.dialect.string_literal(s)),
            ValueData::Enum(Some(index)) => match ty {
                HdlType::Enum { labels, .. } => {
                    labels.get(*index as usize).cloned().ok_or_else(|| {
                        SerializeError::unsupported(format!(
                            "enum label {index} of {}",
                            self.serialize_type(value.ty)
                        ))
                    })
                }
                _ => Err(SerializeError::type_mismatch(format!(
                    "enum label {index} on non-enum type {}",
                    self.serialize_type(value.ty)
                ))),
            },
            ValueData::Bool(None)
            | ValueData::Int(None)
            | ValueData::Str(None)
            | ValueData::Enum(None) => self.dialect.undefined(&self.serialize_type(value.ty)),
        }
    }

    /// Renders a condition list as one boolean expression.
    ///
    /// With `force_bool`, a single-bit operand compares against one and a
    /// multi-bit operand against all zeros.
    pub fn cond_as_hdl(&self, cond: &[Expr], force_bool: bool) -> Result<String> {
        if cond.is_empty() {
            return Err(SerializeError::unsupported("empty condition"));
        }
        let parts = cond
            .iter()
            .map(|c| {
                let text = self.condition_operand(c, force_bool)?;
                let mixed = cond.len() > 1
                    && matches!(c.as_op().map(|op| op.operator), Some(Operator::OrLog | Operator::Xor));
                Ok(if mixed { format!("({text})") } else { text })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(parts.join(self.dialect.logical_and()))
    }

    fn condition_operand(&self, cond: &Expr, force_bool: bool) -> Result<String> {
        if !force_bool {
            return self.serialize_expr(cond);
        }
        let ty = self.expr_type(cond);
        match self.types.get(ty) {
            HdlType::Boolean => self.serialize_expr(cond),
            t if t.is_scalar_bit() => {
                let one = bit_literal(&BitVec::from_bool(true));
                self.dialect
                    .operator(Operator::Eq, &[self.operand(cond, Operator::Eq, 0)?, one])
            }
            HdlType::Bits { width, .. } => {
                let zero = bit_string(&BitVec::all_zero(*width));
                self.dialect
                    .operator(Operator::Neq, &[self.operand(cond, Operator::Neq, 0)?, zero])
            }
            _ => Err(SerializeError::unsupported(format!(
                "condition of type {}",
                self.serialize_type(ty)
            ))),
        }
    }

    /// Renders a statement.
    pub fn serialize_statement(
        &self,
        stmt: &Statement,
        renderer: &dyn TemplateRenderer,
    ) -> Result<String> {
        match stmt {
            Statement::Assignment {
                dst,
                src,
                indexes,
                is_event_dependent,
                ..
            } => {
                let dst_ty = self.arch.signals[*dst].ty;
                let src_ty = self.expr_type(src);
                let target = self.dialect.assignment_target(&self.signal_name(*dst));
                let value = self.serialize_expr(src)?;
                if dst_ty != src_ty {
                    return Err(SerializeError::type_mismatch(format!(
                        "{target} <= {value} is not a valid assignment because types are different ({}; {})",
                        self.serialize_type(dst_ty),
                        self.serialize_type(src_ty)
                    )));
                }
                if indexes.is_some() {
                    return Err(SerializeError::unsupported(format!(
                        "indexed assignment to {target}"
                    )));
                }
                Ok(self.dialect.assignment(&target, &value, *is_event_dependent))
            }
            Statement::If {
                cond,
                if_true,
                elifs,
                if_false,
                ..
            } => {
                let elifs = elifs
                    .iter()
                    .map(|(c, body)| {
                        Ok((
                            self.cond_as_hdl(c, true)?,
                            self.serialize_statements(body, renderer)?,
                        ))
                    })
                    .collect::<Result<Vec<_>>>()?;
                let bindings = IfBindings {
                    cond: self.cond_as_hdl(cond, true)?,
                    if_true: self.serialize_statements(if_true, renderer)?,
                    elifs,
                    if_false: self.serialize_statements(if_false, renderer)?,
                };
                Ok(renderer.render(&Template::If(bindings)))
            }
            Statement::Switch {
                switch_on, cases, ..
            } => {
                let cases = cases
                    .iter()
                    .map(|(key, body)| {
                        let key = key.as_ref().map(|k| self.serialize_expr(k)).transpose()?;
                        Ok((key, self.serialize_statements(body, renderer)?))
                    })
                    .collect::<Result<Vec<_>>>()?;
                let bindings = SwitchBindings {
                    switch_on: self.cond_as_hdl(std::slice::from_ref(switch_on), false)?,
                    cases,
                };
                Ok(renderer.render(&Template::Switch(bindings)))
            }
            Statement::Wait {
                is_time_wait,
                wait_for,
                ..
            } => match (is_time_wait, wait_for) {
                (true, Some(amount)) => Ok(self.dialect.timed_wait(*amount, &self.wait_time_unit)),
                (false, None) => Ok(self.dialect.wait_forever()),
                (true, None) => Err(SerializeError::unsupported("timed wait without a duration")),
                (false, Some(_)) => Err(SerializeError::unsupported(
                    "duration on a wait that is not timed",
                )),
            },
        }
    }

    /// Renders a statement list.
    pub fn serialize_statements(
        &self,
        stmts: &[Statement],
        renderer: &dyn TemplateRenderer,
    ) -> Result<Vec<String>> {
        stmts
            .iter()
            .map(|s| self.serialize_statement(s, renderer))
            .collect()
    }

    /// Renders a reference to a type.
    ///
    /// Enum and array types render their declared name. A type that was never
    /// declared falls back to a synthetic name.
    pub fn serialize_type(&self, ty: TypeId) -> String {
        match self.types.get(ty) {
            t if t.is_scalar_bit() => self.dialect.bit_type().to_string(),
            HdlType::Bits {
                width, signedness, ..
            } => self.dialect.vector_type(*width, *signedness),
            HdlType::Boolean => "BOOLEAN".to_string(),
            HdlType::Integer => "INTEGER".to_string(),
            HdlType::String => "STRING".to_string(),
            t @ (HdlType::Enum { .. } | HdlType::Array { .. }) => {
                if let Some(name) = self.declared.get(&ty) {
                    return name.clone();
                }
                let prefix = if matches!(t, HdlType::Enum { .. }) {
                    "enumT_"
                } else {
                    "arrT_"
                };
                let name = format!("{prefix}{}", ty.as_raw());
                log::warn!("type {name} is referenced before it is declared");
                name
            }
        }
    }

    /// Declares an enum or array type.
    ///
    /// Returns `None` if the type was already declared in this unit.
    pub fn declare_type(&mut self, ty: TypeId) -> Result<Option<String>> {
        if self.declared.contains_key(&ty) {
            return Ok(None);
        }
        let types = self.types;
        match types.get(ty) {
            HdlType::Enum { name, labels } => {
                let candidate = name.as_deref().unwrap_or("enumT_").to_uppercase();
                let checked = self.scope.checked_name(&candidate, ScopeOwner::Type(ty));
                self.declared.insert(ty, checked.clone());
                Ok(Some(format!("TYPE {checked} IS ({})", labels.join(", "))))
            }
            HdlType::Array {
                name,
                element,
                size,
            } => {
                let candidate = name.as_deref().unwrap_or("arrT_");
                let checked = self.scope.checked_name(candidate, ScopeOwner::Type(ty));
                self.declared.insert(ty, checked.clone());
                Ok(Some(format!(
                    "TYPE {checked} IS ARRAY (({}) DOWNTO 0) OF {}",
                    i64::from(*size) - 1,
                    self.serialize_type(*element)
                )))
            }
            _ => Err(SerializeError::unsupported(format!(
                "declaration of type {}",
                self.serialize_type(ty)
            ))),
        }
    }

    /// Declares `ty` after everything its declaration refers to.
    fn declare_with_dependencies(&mut self, ty: TypeId, out: &mut Vec<String>) -> Result<()> {
        let types = self.types;
        let t = types.get(ty);
        if !t.needs_declaration() {
            return Ok(());
        }
        if let HdlType::Array { element, .. } = t {
            self.declare_with_dependencies(*element, out)?;
        }
        if let Some(decl) = self.declare_type(ty)? {
            out.push(decl);
        }
        Ok(())
    }

    /// Renders the declaration of a signal that already has a checked name.
    pub fn declare_signal(&self, id: SignalId) -> Result<String> {
        let sig = &self.arch.signals[id];
        let name = self.signal_name(id);
        let ty = self.serialize_type(sig.ty);
        let default = match &sig.default {
            Some(v) if v.has_valid_bits() => Some(self.serialize_value(v)?),
            _ => None,
        };
        let kind = if !sig.drivers.is_empty() {
            Some(SignalKind::Signal)
        } else if !sig.readers.is_empty() {
            Some(SignalKind::Constant)
        } else {
            None
        };
        self.dialect.signal_declaration(&SignalDecl {
            name: &name,
            ty: &ty,
            default: default.as_deref(),
            kind,
        })
    }

    /// Renders one process.
    pub fn serialize_process(
        &mut self,
        pid: ProcessId,
        renderer: &dyn TemplateRenderer,
    ) -> Result<String> {
        let process = &self.arch.processes[pid];
        let name = self
            .scope
            .checked_name(self.interner.resolve(process.name), ScopeOwner::Process(pid));
        let mut sensitivity: Vec<String> = process
            .sensitivity
            .iter()
            .map(|s| self.signal_name(*s))
            .collect();
        sensitivity.sort();
        sensitivity.dedup();
        let lines = self.serialize_statements(&process.body, renderer)?;
        Ok(renderer.render(&Template::Process(ProcessBindings {
            name,
            sensitivity,
            lines,
        })))
    }

    /// Renders the whole architecture with its entity.
    ///
    /// Every name is allocated in a fresh scope level that is released
    /// afterwards. On error nothing is returned.
    pub fn serialize_architecture(&mut self, renderer: &dyn TemplateRenderer) -> Result<String> {
        self.scope.push_level();
        let result = self.architecture_body(renderer);
        self.scope.pop_level();
        result
    }

    fn architecture_body(&mut self, renderer: &dyn TemplateRenderer) -> Result<String> {
        let arch = self.arch;
        let interner = self.interner;

        let mut ports = Vec::new();
        let mut port_names = HashMap::new();
        for port in arch.entity.ports.values() {
            let name = self
                .scope
                .checked_name(interner.resolve(port.name), ScopeOwner::Port(port.id));
            port_names.insert(port.id, name.clone());
            ports.push(PortBinding {
                name,
                direction: port.direction,
                ty: self.serialize_type(port.ty),
            });
        }

        let mut signals: Vec<&Signal> = arch.signals.values().filter(|s| !s.hidden).collect();
        signals.sort_by(|a, b| interner.resolve(a.name).cmp(interner.resolve(b.name)));
        let mut extra_types = Vec::new();
        for sig in &signals {
            self.declare_with_dependencies(sig.ty, &mut extra_types)?;
            let name = self
                .scope
                .checked_name(interner.resolve(sig.name), ScopeOwner::Signal(sig.id));
            self.names.insert(sig.id, name);
        }
        let declarations = signals
            .iter()
            .map(|sig| self.declare_signal(sig.id))
            .collect::<Result<Vec<_>>>()?;

        let mut connections: Vec<(String, String)> = arch
            .connections
            .iter()
            .map(|c| (self.signal_name(c.dst), self.signal_name(c.src)))
            .collect();
        for (port, sig) in &arch.port_bindings {
            let port_name = port_names[port].clone();
            let sig_name = self.signal_name(*sig);
            match arch.entity.ports[*port].direction {
                PortDirection::In => connections.push((sig_name, port_name)),
                PortDirection::Out => connections.push((port_name, sig_name)),
                PortDirection::InOut => {
                    return Err(SerializeError::unsupported(format!(
                        "binding signal {sig_name} to inout port {port_name}"
                    )))
                }
            }
        }
        connections.sort();
        let connections = connections
            .iter()
            .map(|(dst, src)| self.dialect.connection(dst, src))
            .collect();

        let mut order: Vec<_> = arch.processes.values().collect();
        order.sort_by(|a, b| {
            (interner.resolve(a.name), a.max_stmt_id())
                .cmp(&(interner.resolve(b.name), b.max_stmt_id()))
        });
        let mut processes = Vec::with_capacity(order.len());
        for process in order {
            processes.push(self.serialize_process(process.id, renderer)?);
        }

        let mut sorted: Vec<_> = arch.instances.iter().collect();
        sorted.sort_by(|a, b| interner.resolve(a.name).cmp(interner.resolve(b.name)));
        let mut instances = Vec::with_capacity(sorted.len());
        for (n, inst) in sorted.into_iter().enumerate() {
            let name = self
                .scope
                .checked_name(interner.resolve(inst.name), ScopeOwner::Instance(n as u32));
            let port_map = inst
                .port_map
                .iter()
                .map(|(port, sig)| (interner.resolve(*port).to_string(), self.signal_name(*sig)))
                .collect();
            instances.push(InstanceBinding {
                name,
                entity: interner.resolve(inst.entity).to_string(),
                port_map,
            });
        }

        log::debug!(
            "rendering {} of {} in {}: {} signals, {} processes",
            interner.resolve(arch.name),
            interner.resolve(arch.entity.name),
            self.dialect.name(),
            declarations.len(),
            processes.len()
        );
        Ok(renderer.render(&Template::Unit(UnitBindings {
            entity: interner.resolve(arch.entity.name).to_string(),
            architecture: interner.resolve(arch.name).to_string(),
            ports,
            extra_types,
            signals: declarations,
            connections,
            instances,
            processes,
        })))
    }
}
