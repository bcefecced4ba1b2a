//! Per-block translation rules. Each rule turns one block into either a
//! value fragment or a statement, pulling child code through the
//! [`Generator`].

pub mod math;
pub mod text;

use crate::block::Block;
use crate::error::{CodegenError, CodegenResult};
use crate::generator::{BlockCode, Generator};

/// Every block type this generator knows how to translate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    MathNumber,
    MathArithmetic,
    MathSingle,
    MathConstant,
    MathNumberProperty,
    MathChange,
    MathModulo,
    MathConstrain,
    MathRandomInt,
    Text,
    TextAppend,
    TextLength,
    TextIsEmpty,
    TextIndexOf,
    TextCharAt,
    TextGetSubstring,
    TextChangeCase,
    TextTrim,
}

impl Rule {
    pub fn lookup(block_type: &str) -> Option<Rule> {
        let rule = match block_type {
            "math_number" => Rule::MathNumber,
            "math_arithmetic" => Rule::MathArithmetic,
            // rounding and trigonometry share the single-operand rule
            "math_single" | "math_round" | "math_trig" => Rule::MathSingle,
            "math_constant" => Rule::MathConstant,
            "math_number_property" => Rule::MathNumberProperty,
            "math_change" => Rule::MathChange,
            "math_modulo" => Rule::MathModulo,
            "math_constrain" => Rule::MathConstrain,
            "math_random_int" => Rule::MathRandomInt,
            "text" => Rule::Text,
            "text_append" => Rule::TextAppend,
            "text_length" => Rule::TextLength,
            "text_isEmpty" => Rule::TextIsEmpty,
            "text_indexOf" => Rule::TextIndexOf,
            "text_charAt" => Rule::TextCharAt,
            "text_getSubstring" => Rule::TextGetSubstring,
            "text_changeCase" => Rule::TextChangeCase,
            "text_trim" => Rule::TextTrim,
            _ => return None,
        };
        Some(rule)
    }

    pub fn apply(self, generator: &mut Generator, block: &Block) -> CodegenResult<BlockCode> {
        match self {
            Rule::MathNumber => math::number(block).map(BlockCode::Value),
            Rule::MathArithmetic => math::arithmetic(generator, block).map(BlockCode::Value),
            Rule::MathSingle => math::single(generator, block).map(BlockCode::Value),
            Rule::MathConstant => math::constant(generator, block).map(BlockCode::Value),
            Rule::MathNumberProperty => {
                math::number_property(generator, block).map(BlockCode::Value)
            }
            Rule::MathChange => math::change(generator, block).map(BlockCode::Statement),
            Rule::MathModulo => math::modulo(generator, block).map(BlockCode::Value),
            Rule::MathConstrain => math::constrain(generator, block).map(BlockCode::Value),
            Rule::MathRandomInt => math::random_int(generator, block).map(BlockCode::Value),
            Rule::Text => text::literal(block).map(BlockCode::Value),
            Rule::TextAppend => text::append(generator, block).map(BlockCode::Statement),
            Rule::TextLength => text::length(generator, block).map(BlockCode::Value),
            Rule::TextIsEmpty => text::is_empty(generator, block).map(BlockCode::Value),
            Rule::TextIndexOf => text::index_of(generator, block).map(BlockCode::Value),
            Rule::TextCharAt => text::char_at(generator, block).map(BlockCode::Value),
            Rule::TextGetSubstring => text::get_substring(generator, block).map(BlockCode::Value),
            Rule::TextChangeCase => text::change_case(generator, block).map(BlockCode::Value),
            Rule::TextTrim => text::trim(generator, block).map(BlockCode::Value),
        }
    }
}

pub(crate) fn required_field(block: &Block, field: &str) -> CodegenResult<String> {
    block
        .field_text(field)
        .ok_or_else(|| CodegenError::MissingField {
            block_type: block.kind.clone(),
            field: field.to_string(),
        })
}

/// Parses an operator-style dropdown; values outside the set are
/// `UnknownOperator`.
pub(crate) fn operator_field<T>(
    block: &Block,
    field: &str,
    parse: fn(&str) -> Option<T>,
) -> CodegenResult<T> {
    let raw = required_field(block, field)?;
    parse(&raw).ok_or_else(|| CodegenError::unknown_operator(&block.kind, &raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_share_the_single_operand_rule() {
        assert_eq!(Rule::lookup("math_round"), Some(Rule::MathSingle));
        assert_eq!(Rule::lookup("math_trig"), Some(Rule::MathSingle));
        assert_eq!(Rule::lookup("math_single"), Some(Rule::MathSingle));
    }

    #[test]
    fn unknown_types_have_no_rule() {
        assert_eq!(Rule::lookup("controls_if"), None);
        assert_eq!(Rule::lookup("Text"), None);
    }

    #[test]
    fn missing_operator_field_is_reported() {
        let block = Block::new("math_arithmetic");
        let err = operator_field(&block, "OP", |_| Some(())).unwrap_err();
        assert_eq!(
            err,
            CodegenError::MissingField {
                block_type: "math_arithmetic".to_string(),
                field: "OP".to_string(),
            }
        );
    }
}
