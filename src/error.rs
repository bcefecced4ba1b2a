use thiserror::Error;

/// Fatal failures of a generation pass. Any of these aborts the pass; no
/// partial program is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error("Unknown {block_type} operator '{operator}'.")]
    UnknownOperator { block_type: String, operator: String },

    #[error("Unhandled option '{option}' ({block_type}).")]
    UnhandledOption { block_type: String, option: String },

    #[error("Unknown block type '{0}'.")]
    UnknownBlockType(String),

    #[error("Block '{block_type}' is missing field '{field}'.")]
    MissingField { block_type: String, field: String },

    #[error("Invalid number '{value}' in field '{field}' of '{block_type}'.")]
    InvalidNumber {
        block_type: String,
        field: String,
        value: String,
    },

    #[error("Block '{0}' is a statement and cannot be used as a value.")]
    ExpectedValue(String),

    #[error("Variable id '{0}' is not declared in the workspace.")]
    UnknownVariable(String),
}

impl CodegenError {
    pub fn unknown_operator(block_type: &str, operator: &str) -> Self {
        CodegenError::UnknownOperator {
            block_type: block_type.to_string(),
            operator: operator.to_string(),
        }
    }

    pub fn unhandled_option(block_type: &str, option: &str) -> Self {
        CodegenError::UnhandledOption {
            block_type: block_type.to_string(),
            option: option.to_string(),
        }
    }
}

pub type CodegenResult<T> = Result<T, CodegenError>;
