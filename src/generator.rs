use crate::block::{Block, VariableDecl, Workspace};
use crate::error::{CodegenError, CodegenResult};
use crate::names::NameDb;
use crate::order::{Fragment, Order};
use crate::rules::Rule;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

pub const INCLUDE_MATH_KEY: &str = "include_math";
pub const INCLUDE_MATH: &str = "#define _USE_MATH_DEFINES\n#include \"math.h\"\n";
const VARIABLES_KEY: &str = "variables";
const INCLUDE_PREFIX: &str = "include_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub one_based_index: bool,
    pub indent: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            one_based_index: true,
            indent: "  ".to_string(),
        }
    }
}

impl GeneratorOptions {
    pub fn for_workspace(workspace: &Workspace) -> Self {
        let mut options = Self::default();
        if let Some(one_based) = workspace.options.one_based_index {
            options.one_based_index = one_based;
        }
        options
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockCode {
    Value(Fragment),
    Statement(String),
}

/// Includes and helper definitions, written once per program no matter how
/// many blocks ask for them. The first text registered under a key wins.
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    entries: Vec<(String, String)>,
    keys: HashSet<String>,
}

impl Declarations {
    pub fn register(&mut self, key: &str, text: &str) -> bool {
        if !self.keys.insert(key.to_string()) {
            return false;
        }
        self.entries.push((key.to_string(), text.to_string()));
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, text)| text.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Generator {
    options: GeneratorOptions,
    declarations: Declarations,
    names: NameDb,
    variable_names: HashMap<String, String>,
}

impl Generator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            options,
            declarations: Declarations::default(),
            names: NameDb::new(),
            variable_names: HashMap::new(),
        }
    }

    pub fn for_workspace(workspace: &Workspace, options: GeneratorOptions) -> Self {
        let mut generator = Self::new(options);
        let mut decls = String::new();
        for variable in &workspace.variables {
            let name = generator.names.get_name(&variable.name);
            generator
                .variable_names
                .insert(variable.id.clone(), variable.name.clone());
            decls.push_str(&format!("{} {};\n", c_type(variable), name));
        }
        if !decls.is_empty() {
            generator.register_declaration(VARIABLES_KEY, &decls);
        }
        generator
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn declarations(&self) -> &Declarations {
        &self.declarations
    }

    pub fn register_declaration(&mut self, key: &str, text: &str) {
        if self.declarations.register(key, text) {
            tracing::debug!(key, "registered declaration");
        }
    }

    pub fn block_to_code(&mut self, block: &Block) -> CodegenResult<BlockCode> {
        let rule = Rule::lookup(&block.kind)
            .ok_or_else(|| CodegenError::UnknownBlockType(block.kind.clone()))?;
        tracing::trace!(block_type = %block.kind, block_id = ?block.id, ?rule, "generating block");
        rule.apply(self, block)
    }

    /// Code of the value plugged into `socket`, parenthesized when its own
    /// order is too loose for `order`. `None` when the socket is empty.
    pub fn value_to_code(
        &mut self,
        block: &Block,
        socket: &str,
        order: Order,
    ) -> CodegenResult<Option<String>> {
        let Some(child) = block.input_block(socket) else {
            return Ok(None);
        };
        let fragment = match self.block_to_code(child)? {
            BlockCode::Value(fragment) => fragment,
            BlockCode::Statement(_) => return Err(CodegenError::ExpectedValue(child.kind.clone())),
        };
        if fragment.code.is_empty() {
            return Ok(None);
        }
        Ok(Some(order.wrap(fragment.code, fragment.order)))
    }

    pub fn value_or(
        &mut self,
        block: &Block,
        socket: &str,
        order: Order,
        fallback: &str,
    ) -> CodegenResult<String> {
        Ok(self
            .value_to_code(block, socket, order)?
            .unwrap_or_else(|| fallback.to_string()))
    }

    pub fn statement_chain(&mut self, block: &Block) -> CodegenResult<String> {
        let mut out = String::new();
        let mut current = Some(block);
        while let Some(stmt) = current {
            match self.block_to_code(stmt)? {
                BlockCode::Value(fragment) => {
                    out.push_str(&fragment.code);
                    out.push_str(";\n");
                }
                BlockCode::Statement(code) => out.push_str(&code),
            }
            current = stmt.next_block();
        }
        Ok(out)
    }

    pub fn variable_name(&mut self, block: &Block, field: &str) -> CodegenResult<String> {
        let missing = || CodegenError::MissingField {
            block_type: block.kind.clone(),
            field: field.to_string(),
        };
        let name = match block.field(field).ok_or_else(missing)? {
            Value::String(raw) => self
                .variable_names
                .get(raw)
                .cloned()
                .unwrap_or_else(|| raw.clone()),
            Value::Object(reference) => {
                if let Some(id) = reference.get("id").and_then(Value::as_str) {
                    self.variable_names
                        .get(id)
                        .cloned()
                        .ok_or_else(|| CodegenError::UnknownVariable(id.to_string()))?
                } else if let Some(name) = reference.get("name").and_then(Value::as_str) {
                    name.to_string()
                } else {
                    return Err(missing());
                }
            }
            _ => return Err(missing()),
        };
        Ok(self.names.get_name(&name))
    }

    pub fn finish(&self, body: &str) -> String {
        let mut out = String::new();
        let (includes, definitions): (Vec<_>, Vec<_>) = self
            .declarations
            .iter()
            .partition(|(key, _)| key.starts_with(INCLUDE_PREFIX));
        for (_, text) in &includes {
            out.push_str(text);
        }
        if !includes.is_empty() {
            out.push('\n');
        }
        for (_, text) in &definitions {
            out.push_str(text);
            out.push('\n');
        }
        out.push_str("void setup() {\n}\n\nvoid loop() {\n");
        out.push_str(&prefix_lines(body, &self.options.indent));
        out.push_str("}\n");
        out
    }
}

#[tracing::instrument(skip_all, fields(top_blocks = workspace.top_blocks().len()))]
pub fn generate_program(workspace: &Workspace, options: GeneratorOptions) -> CodegenResult<String> {
    let mut generator = Generator::for_workspace(workspace, options);
    let mut body = String::new();
    for block in workspace.top_blocks() {
        body.push_str(&generator.statement_chain(block)?);
    }
    tracing::debug!(
        declarations = generator.declarations().len(),
        "generation pass complete"
    );
    Ok(generator.finish(&body))
}

pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

fn c_type(variable: &VariableDecl) -> &str {
    match variable.var_type.as_str() {
        "" => "int",
        "Number" => "double",
        "String" => "String",
        "Boolean" => "boolean",
        other => other,
    }
}

fn prefix_lines(code: &str, indent: &str) -> String {
    let mut out = String::with_capacity(code.len());
    for line in code.lines() {
        if !line.is_empty() {
            out.push_str(indent);
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
