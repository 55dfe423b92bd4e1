//! Text templates for units, processes, and compound statements.
//!
//! The serializer fills a [`Template`] with already-rendered pieces and hands
//! it to a [`TemplateRenderer`], which only arranges and indents them.

use hdlkit_ir::PortDirection;

/// A port of the rendered unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortBinding {
    /// Port name.
    pub name: String,
    /// Port direction.
    pub direction: PortDirection,
    /// Rendered port type.
    pub ty: String,
}

/// A component instance of the rendered unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceBinding {
    /// Instance label.
    pub name: String,
    /// Instantiated entity name.
    pub entity: String,
    /// Port name to signal name.
    pub port_map: Vec<(String, String)>,
}

/// Everything a unit template needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitBindings {
    /// Entity name.
    pub entity: String,
    /// Architecture name.
    pub architecture: String,
    /// Ports in declaration order.
    pub ports: Vec<PortBinding>,
    /// Enum and array type declarations.
    pub extra_types: Vec<String>,
    /// Signal declarations.
    pub signals: Vec<String>,
    /// Concurrent connection statements.
    pub connections: Vec<String>,
    /// Component instances.
    pub instances: Vec<InstanceBinding>,
    /// Rendered processes.
    pub processes: Vec<String>,
}

/// Everything a process template needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessBindings {
    /// Process name.
    pub name: String,
    /// Names of the signals the process is sensitive to.
    pub sensitivity: Vec<String>,
    /// Rendered statements.
    pub lines: Vec<String>,
}

/// Everything an if/elif/else template needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfBindings {
    /// Rendered condition.
    pub cond: String,
    /// Statements when the condition holds.
    pub if_true: Vec<String>,
    /// Rendered `elif` conditions with their statements.
    pub elifs: Vec<(String, Vec<String>)>,
    /// Statements when no condition holds.
    pub if_false: Vec<String>,
}

/// Everything a case template needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchBindings {
    /// Rendered subject.
    pub switch_on: String,
    /// Rendered keys with their statements; `None` is the default case.
    pub cases: Vec<(Option<String>, Vec<String>)>,
}

/// A template with its bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    /// A whole unit.
    Unit(UnitBindings),
    /// One process.
    Process(ProcessBindings),
    /// An if/elif/else statement.
    If(IfBindings),
    /// A case statement.
    Switch(SwitchBindings),
}

/// Turns a filled template into text.
pub trait TemplateRenderer {
    /// Renders `template`.
    fn render(&self, template: &Template) -> String;
}

/// Indents every line of every block by `indent`.
fn indented(blocks: &[String], indent: &str) -> Vec<String> {
    blocks
        .iter()
        .flat_map(|block| block.lines())
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect()
}

/// Renders VHDL entity/architecture text.
#[derive(Debug, Clone)]
pub struct VhdlTemplates {
    indent: String,
}

impl VhdlTemplates {
    /// Creates a renderer indenting nested blocks by `indent`.
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
        }
    }

    fn unit(&self, b: &UnitBindings) -> String {
        let i = &self.indent;
        let mut out = Vec::new();
        out.push(format!("ENTITY {} IS", b.entity));
        if !b.ports.is_empty() {
            out.push(format!("{i}PORT ("));
            let last = b.ports.len() - 1;
            for (n, p) in b.ports.iter().enumerate() {
                let dir = match p.direction {
                    PortDirection::In => "IN",
                    PortDirection::Out => "OUT",
                    PortDirection::InOut => "INOUT",
                };
                let sep = if n == last { "" } else { ";" };
                out.push(format!("{i}{i}{} : {dir} {}{sep}", p.name, p.ty));
            }
            out.push(format!("{i});"));
        }
        out.push(format!("END ENTITY {};", b.entity));
        out.push(String::new());
        out.push(format!("ARCHITECTURE {} OF {} IS", b.architecture, b.entity));
        for decl in b.extra_types.iter().chain(&b.signals) {
            out.push(format!("{i}{decl};"));
        }
        out.push("BEGIN".to_string());
        out.extend(indented(&b.connections, i));
        for inst in &b.instances {
            out.push(format!("{i}{}: ENTITY work.{}", inst.name, inst.entity));
            if !inst.port_map.is_empty() {
                out.push(format!("{i}{i}PORT MAP ("));
                let last = inst.port_map.len() - 1;
                for (n, (port, sig)) in inst.port_map.iter().enumerate() {
                    let sep = if n == last { "" } else { "," };
                    out.push(format!("{i}{i}{i}{port} => {sig}{sep}"));
                }
                out.push(format!("{i}{i})"));
            }
            if let Some(line) = out.last_mut() {
                line.push(';');
            }
        }
        out.extend(indented(&b.processes, i));
        out.push(format!("END ARCHITECTURE {};", b.architecture));
        out.join("\n")
    }

    fn process(&self, b: &ProcessBindings) -> String {
        let mut out = Vec::new();
        if b.sensitivity.is_empty() {
            out.push(format!("{}: PROCESS", b.name));
        } else {
            out.push(format!("{}: PROCESS ({})", b.name, b.sensitivity.join(", ")));
        }
        out.push("BEGIN".to_string());
        out.extend(self.body(&b.lines));
        out.push("END PROCESS;".to_string());
        out.join("\n")
    }

    fn if_stmt(&self, b: &IfBindings) -> String {
        let mut out = vec![format!("IF {} THEN", b.cond)];
        out.extend(self.body(&b.if_true));
        for (cond, body) in &b.elifs {
            out.push(format!("ELSIF {cond} THEN"));
            out.extend(self.body(body));
        }
        if !b.if_false.is_empty() {
            out.push("ELSE".to_string());
            out.extend(self.body(&b.if_false));
        }
        out.push("END IF;".to_string());
        out.join("\n")
    }

    fn switch(&self, b: &SwitchBindings) -> String {
        let i = &self.indent;
        let mut out = vec![format!("CASE {} IS", b.switch_on)];
        for (key, body) in &b.cases {
            let key = key.as_deref().unwrap_or("OTHERS");
            out.push(format!("{i}WHEN {key} =>"));
            out.extend(self.body(body).into_iter().map(|l| {
                if l.is_empty() {
                    l
                } else {
                    format!("{i}{l}")
                }
            }));
        }
        out.push("END CASE;".to_string());
        out.join("\n")
    }

    fn body(&self, lines: &[String]) -> Vec<String> {
        if lines.is_empty() {
            vec![format!("{}NULL;", self.indent)]
        } else {
            indented(lines, &self.indent)
        }
    }
}

impl TemplateRenderer for VhdlTemplates {
    fn render(&self, template: &Template) -> String {
        match template {
            Template::Unit(b) => self.unit(b),
            Template::Process(b) => self.process(b),
            Template::If(b) => self.if_stmt(b),
            Template::Switch(b) => self.switch(b),
        }
    }
}

/// Renders an event-driven simulation model class.
#[derive(Debug, Clone)]
pub struct SimModelTemplates {
    indent: String,
}

impl SimModelTemplates {
    /// Creates a renderer indenting nested blocks by `indent`.
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
        }
    }

    fn unit(&self, b: &UnitBindings) -> String {
        let i = &self.indent;
        let mut out = Vec::new();
        out.push(format!("class {}(SimModel):", b.entity));
        out.push(format!("{i}_name = \"{}\"", b.entity));
        out.push(String::new());
        out.push(format!("{i}def __init__(self, sim):"));
        out.push(format!("{i}{i}super().__init__(sim)"));
        for p in &b.ports {
            out.push(format!(
                "{i}{i}self.{name} = mkSig(sim, \"{name}\", {ty}, None)",
                name = p.name,
                ty = p.ty
            ));
        }
        for decl in &b.extra_types {
            out.push(format!("{i}{i}# {decl}"));
        }
        for decl in b.signals.iter().chain(&b.connections) {
            out.push(format!("{i}{i}{decl}"));
        }
        for inst in &b.instances {
            out.push(format!("{i}{i}self.{} = {}(sim)", inst.name, inst.entity));
            for (port, sig) in &inst.port_map {
                out.push(format!(
                    "{i}{i}self._connect(self.{}.{port}, self.{sig})",
                    inst.name
                ));
            }
        }
        let names: Vec<String> = b
            .processes
            .iter()
            .filter_map(|p| process_name(p))
            .map(|n| format!("self.{n}"))
            .collect();
        out.push(format!("{i}{i}self._processes = ({})", tuple(&names)));
        for p in &b.processes {
            out.push(String::new());
            out.extend(indented(std::slice::from_ref(p), i));
        }
        out.join("\n")
    }

    fn process(&self, b: &ProcessBindings) -> String {
        let mut out = vec![format!("def {}(self, sim):", b.name)];
        if !b.sensitivity.is_empty() {
            out.push(format!("{}# sensitivity: {}", self.indent, b.sensitivity.join(", ")));
        }
        out.extend(self.body(&b.lines));
        out.join("\n")
    }

    fn if_stmt(&self, b: &IfBindings) -> String {
        let mut out = vec![format!("if {}:", b.cond)];
        out.extend(self.body(&b.if_true));
        for (cond, body) in &b.elifs {
            out.push(format!("elif {cond}:"));
            out.extend(self.body(body));
        }
        if !b.if_false.is_empty() {
            out.push("else:".to_string());
            out.extend(self.body(&b.if_false));
        }
        out.join("\n")
    }

    fn switch(&self, b: &SwitchBindings) -> String {
        let keyed: Vec<_> = b.cases.iter().filter(|(k, _)| k.is_some()).collect();
        let default = b.cases.iter().find(|(k, _)| k.is_none()).map(|(_, body)| body);
        if keyed.is_empty() {
            return match default {
                Some(body) if !body.is_empty() => body.join("\n"),
                _ => "pass".to_string(),
            };
        }
        let mut out = Vec::new();
        for (n, (key, body)) in keyed.iter().enumerate() {
            let kw = if n == 0 { "if" } else { "elif" };
            let key = key.as_deref().unwrap_or_default();
            out.push(format!("{kw} ({})._eq({key}):", b.switch_on));
            out.extend(self.body(body));
        }
        if let Some(body) = default {
            out.push("else:".to_string());
            out.extend(self.body(body));
        }
        out.join("\n")
    }

    fn body(&self, lines: &[String]) -> Vec<String> {
        if lines.is_empty() {
            vec![format!("{}pass", self.indent)]
        } else {
            indented(lines, &self.indent)
        }
    }
}

impl TemplateRenderer for SimModelTemplates {
    fn render(&self, template: &Template) -> String {
        match template {
            Template::Unit(b) => self.unit(b),
            Template::Process(b) => self.process(b),
            Template::If(b) => self.if_stmt(b),
            Template::Switch(b) => self.switch(b),
        }
    }
}

fn process_name(rendered: &str) -> Option<&str> {
    rendered
        .strip_prefix("def ")
        .and_then(|rest| rest.split('(').next())
}

fn tuple(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [one] => format!("{one},"),
        many => many.join(", "),
    }
}
