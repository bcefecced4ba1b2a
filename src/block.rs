use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub blocks: TopBlocks,
    #[serde(default)]
    pub variables: Vec<VariableDecl>,
    #[serde(default)]
    pub options: WorkspaceOptions,
}

impl Workspace {
    pub fn from_json_str(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    pub fn top_blocks(&self) -> &[Block] {
        &self.blocks.blocks
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopBlocks {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceOptions {
    pub one_based_index: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariableDecl {
    pub name: String,
    pub id: String,
    #[serde(default, rename = "type")]
    pub var_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
    #[serde(default)]
    pub inputs: BTreeMap<String, Input>,
    #[serde(default)]
    pub next: Option<Input>,
}

/// A socket. A real block plugged into it hides the shadow block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Input {
    #[serde(default)]
    pub block: Option<Box<Block>>,
    #[serde(default)]
    pub shadow: Option<Box<Block>>,
}

impl Input {
    pub fn connected(&self) -> Option<&Block> {
        self.block.as_deref().or(self.shadow.as_deref())
    }
}

impl Block {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            id: None,
            fields: BTreeMap::new(),
            inputs: BTreeMap::new(),
            next: None,
        }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn with_input(mut self, name: &str, child: Block) -> Self {
        self.inputs.insert(
            name.to_string(),
            Input {
                block: Some(Box::new(child)),
                shadow: None,
            },
        );
        self
    }

    pub fn with_next(mut self, next: Block) -> Self {
        self.next = Some(Input {
            block: Some(Box::new(next)),
            shadow: None,
        });
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Scalar field value rendered as text. Objects and arrays yield `None`.
    pub fn field_text(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn input_block(&self, name: &str) -> Option<&Block> {
        self.inputs.get(name).and_then(Input::connected)
    }

    pub fn next_block(&self) -> Option<&Block> {
        self.next.as_ref().and_then(Input::connected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_blockly_serialization() {
        let source = r#"{
            "blocks": {
                "languageVersion": 0,
                "blocks": [
                    {
                        "type": "math_change",
                        "id": "a1",
                        "fields": {"VAR": {"id": "v1"}},
                        "inputs": {
                            "DELTA": {
                                "shadow": {"type": "math_number", "fields": {"NUM": 1}},
                                "block": {"type": "math_number", "fields": {"NUM": 5}}
                            }
                        }
                    }
                ]
            },
            "variables": [{"name": "count", "id": "v1"}],
            "options": {"oneBasedIndex": false}
        }"#;
        let workspace = Workspace::from_json_str(source).unwrap();
        assert_eq!(workspace.top_blocks().len(), 1);
        assert_eq!(workspace.variables[0].name, "count");
        assert_eq!(workspace.variables[0].var_type, "");
        assert_eq!(workspace.options.one_based_index, Some(false));

        let block = &workspace.top_blocks()[0];
        assert_eq!(block.id.as_deref(), Some("a1"));
        let delta = block.input_block("DELTA").unwrap();
        assert_eq!(delta.field_text("NUM").as_deref(), Some("5"));
    }

    #[test]
    fn shadow_fills_an_empty_socket() {
        let source = r#"{"type": "text_length", "inputs": {
            "VALUE": {"shadow": {"type": "text", "fields": {"TEXT": "abc"}}}
        }}"#;
        let block: Block = serde_json::from_str(source).unwrap();
        let child = block.input_block("VALUE").unwrap();
        assert_eq!(child.kind, "text");
        assert!(block.input_block("MISSING").is_none());
    }

    #[test]
    fn next_links_form_a_chain() {
        let block = Block::new("math_change").with_next(Block::new("text_append"));
        assert_eq!(block.next_block().map(|b| b.kind.as_str()), Some("text_append"));
        assert!(block.next_block().unwrap().next_block().is_none());
    }

    #[test]
    fn object_fields_have_no_text() {
        let block = Block::new("math_change").with_field("VAR", serde_json::json!({"id": "v1"}));
        assert!(block.field_text("VAR").is_none());
        assert!(block.field("VAR").is_some());
    }
}
