use super::{operator_field, required_field};
use crate::block::Block;
use crate::error::{CodegenError, CodegenResult};
use crate::generator::{quote, Generator};
use crate::order::{Fragment, Order};

const EMPTY_STRING: &str = "String(\"\")";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Where {
    FromStart,
    FromEnd,
}

impl Where {
    /// Reads a `WHERE`-style dropdown; an absent field counts from the start.
    fn from_block(block: &Block, field: &str) -> CodegenResult<Self> {
        match block.field_text(field).as_deref() {
            None | Some("FROM_START") => Ok(Self::FromStart),
            Some("FROM_END") => Ok(Self::FromEnd),
            Some(other) => Err(CodegenError::unhandled_option(&block.kind, other)),
        }
    }

    /// Index code for an `AT`-style socket, rewritten against `text` when
    /// counting from the end.
    fn index(
        self,
        generator: &mut Generator,
        block: &Block,
        socket: &str,
        text: &str,
    ) -> CodegenResult<String> {
        match self {
            Self::FromStart => generator.value_or(block, socket, Order::None, "0"),
            Self::FromEnd => {
                let at = generator.value_or(block, socket, Order::ADDITION, "0")?;
                Ok(format!("{}.length() - {}", text, at))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseChange {
    Upper,
    Lower,
    Title,
}

impl CaseChange {
    pub fn from_field(value: &str) -> Option<Self> {
        match value {
            "UPPERCASE" => Some(Self::Upper),
            "LOWERCASE" => Some(Self::Lower),
            "TITLECASE" => Some(Self::Title),
            _ => None,
        }
    }

    fn method(self) -> Option<&'static str> {
        match self {
            Self::Upper => Some(".toUpperCase()"),
            Self::Lower => Some(".toLowerCase()"),
            Self::Title => None,
        }
    }
}

pub fn literal(block: &Block) -> CodegenResult<Fragment> {
    let text = block.field_text("TEXT").unwrap_or_default();
    Ok(Fragment::new(
        format!("String({})", quote(&text)),
        Order::Atomic,
    ))
}

pub fn append(generator: &mut Generator, block: &Block) -> CodegenResult<String> {
    let name = generator.variable_name(block, "VAR")?;
    let value = generator.value_or(block, "TEXT", Order::None, "\"\"")?;
    Ok(format!(
        "{} = String({}) + String({});\n",
        name, name, value
    ))
}

pub fn length(generator: &mut Generator, block: &Block) -> CodegenResult<Fragment> {
    let text = generator.value_or(block, "VALUE", Order::FunctionCall, EMPTY_STRING)?;
    Ok(Fragment::new(format!("{}.length()", text), Order::Member))
}

pub fn is_empty(generator: &mut Generator, block: &Block) -> CodegenResult<Fragment> {
    let text = generator.value_or(block, "VALUE", Order::Member, EMPTY_STRING)?;
    Ok(Fragment::new(
        format!("!{}.length()", text),
        Order::LOGICAL_NOT,
    ))
}

pub fn index_of(generator: &mut Generator, block: &Block) -> CodegenResult<Fragment> {
    let end = required_field(block, "END")?;
    let method = match end.as_str() {
        "FIRST" => "indexOf",
        "LAST" => "lastIndexOf",
        other => return Err(CodegenError::unhandled_option(&block.kind, other)),
    };
    let substring = generator.value_or(block, "FIND", Order::None, "\"\"")?;
    let text = generator.value_or(block, "VALUE", Order::Member, EMPTY_STRING)?;
    let code = format!("{}.{}({})", text, method, substring);
    if generator.options().one_based_index {
        return Ok(Fragment::new(format!("{} + 1", code), Order::ADDITION));
    }
    Ok(Fragment::new(code, Order::FunctionCall))
}

pub fn char_at(generator: &mut Generator, block: &Block) -> CodegenResult<Fragment> {
    let where_ = Where::from_block(block, "WHERE")?;
    let text = generator.value_or(block, "VALUE", Order::Member, EMPTY_STRING)?;
    let at = where_.index(generator, block, "AT", &text)?;
    Ok(Fragment::new(
        format!("{}.charAt({})", text, at),
        Order::FunctionCall,
    ))
}

pub fn get_substring(generator: &mut Generator, block: &Block) -> CodegenResult<Fragment> {
    let where1 = Where::from_block(block, "WHERE1")?;
    let where2 = Where::from_block(block, "WHERE2")?;
    let text = generator.value_or(block, "STRING", Order::FunctionCall, EMPTY_STRING)?;
    let at1 = where1.index(generator, block, "AT1", &text)?;
    let at2 = where2.index(generator, block, "AT2", &text)?;
    Ok(Fragment::new(
        format!("{}.substring({}, {})", text, at1, at2),
        Order::FunctionCall,
    ))
}

pub fn change_case(generator: &mut Generator, block: &Block) -> CodegenResult<Fragment> {
    let case = operator_field(block, "CASE", CaseChange::from_field)?;
    match case.method() {
        Some(method) => {
            let text = generator.value_or(block, "TEXT", Order::Member, EMPTY_STRING)?;
            Ok(Fragment::new(
                format!("{}{}", text, method),
                Order::FunctionCall,
            ))
        }
        None => {
            // no title-case primitive on the target; the text passes through
            let text = generator.value_or(block, "TEXT", Order::None, EMPTY_STRING)?;
            Ok(Fragment::new(text, Order::None))
        }
    }
}

pub fn trim(generator: &mut Generator, block: &Block) -> CodegenResult<Fragment> {
    let text = generator.value_or(block, "TEXT", Order::Member, EMPTY_STRING)?;
    Ok(Fragment::new(
        format!("{}.trim()", text),
        Order::FunctionCall,
    ))
}
