use super::{operator_field, required_field};
use crate::block::Block;
use crate::error::{CodegenError, CodegenResult};
use crate::generator::{Generator, INCLUDE_MATH, INCLUDE_MATH_KEY};
use crate::order::{Fragment, Order};
use serde_json::Value;

pub const PRIME_HELPER_KEY: &str = "define_mathIsPrime";
pub const PRIME_HELPER: &str = "bool mathIsPrime(double n) {\n\
\x20 if (isnan(n) || n != floor(n) || n < 2) {\n\
\x20   return false;\n\
\x20 }\n\
\x20 long k = (long)n;\n\
\x20 if (k == 2 || k == 3) {\n\
\x20   return true;\n\
\x20 }\n\
\x20 if (k % 2 == 0 || k % 3 == 0) {\n\
\x20   return false;\n\
\x20 }\n\
\x20 // only 6k - 1 and 6k + 1 can divide what is left\n\
\x20 for (long x = 6; x <= sqrt(n) + 1; x += 6) {\n\
\x20   if (k % (x - 1) == 0 || k % (x + 1) == 0) {\n\
\x20     return false;\n\
\x20   }\n\
\x20 }\n\
\x20 return true;\n\
}\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Minus,
    Multiply,
    Divide,
    Power,
}

impl ArithmeticOp {
    pub fn from_field(value: &str) -> Option<Self> {
        match value {
            "ADD" => Some(Self::Add),
            "MINUS" => Some(Self::Minus),
            "MULTIPLY" => Some(Self::Multiply),
            "DIVIDE" => Some(Self::Divide),
            "POWER" => Some(Self::Power),
            _ => None,
        }
    }

    /// Infix token and its order; `None` when C has no infix form.
    fn infix(self) -> Option<(&'static str, Order)> {
        match self {
            Self::Add => Some((" + ", Order::Additive)),
            Self::Minus => Some((" - ", Order::Additive)),
            Self::Multiply => Some((" * ", Order::Multiplicative)),
            Self::Divide => Some((" / ", Order::Multiplicative)),
            Self::Power => None,
        }
    }
}

/// Single-operand functions of `math_single`. Negation is not one of them;
/// it never touches `math.h` and has its own order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathFunction {
    Abs,
    Root,
    Ln,
    Exp,
    Pow10,
    Round,
    RoundUp,
    RoundDown,
    Sin,
    Cos,
    Tan,
    Log10,
    Asin,
    Acos,
    Atan,
}

impl MathFunction {
    pub fn from_field(value: &str) -> Option<Self> {
        let func = match value {
            "ABS" => Self::Abs,
            "ROOT" => Self::Root,
            "LN" => Self::Ln,
            "EXP" => Self::Exp,
            "POW10" => Self::Pow10,
            "ROUND" => Self::Round,
            "ROUNDUP" => Self::RoundUp,
            "ROUNDDOWN" => Self::RoundDown,
            "SIN" => Self::Sin,
            "COS" => Self::Cos,
            "TAN" => Self::Tan,
            "LOG10" => Self::Log10,
            "ASIN" => Self::Asin,
            "ACOS" => Self::Acos,
            "ATAN" => Self::Atan,
            _ => return None,
        };
        Some(func)
    }

    fn takes_degrees(self) -> bool {
        matches!(self, Self::Sin | Self::Cos | Self::Tan)
    }

    fn apply(self, arg: &str) -> Fragment {
        let call = |code: String| Fragment::new(code, Order::FunctionCall);
        let quotient = |code: String| Fragment::new(code, Order::DIVISION);
        match self {
            Self::Abs => call(format!("abs({})", arg)),
            Self::Root => call(format!("sqrt({})", arg)),
            Self::Ln => call(format!("log({})", arg)),
            Self::Exp => call(format!("exp({})", arg)),
            Self::Pow10 => call(format!("pow(10, {})", arg)),
            Self::Round => call(format!("round({})", arg)),
            Self::RoundUp => call(format!("ceil({})", arg)),
            Self::RoundDown => call(format!("floor({})", arg)),
            Self::Sin => call(format!("sin({} / 180 * M_PI)", arg)),
            Self::Cos => call(format!("cos({} / 180 * M_PI)", arg)),
            Self::Tan => call(format!("tan({} / 180 * M_PI)", arg)),
            Self::Log10 => quotient(format!("log({}) / log(10)", arg)),
            Self::Asin => quotient(format!("asin({}) / M_PI * 180", arg)),
            Self::Acos => quotient(format!("acos({}) / M_PI * 180", arg)),
            Self::Atan => quotient(format!("atan({}) / M_PI * 180", arg)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathConstant {
    Pi,
    E,
    GoldenRatio,
    Sqrt2,
    Sqrt1_2,
    Infinity,
}

impl MathConstant {
    pub fn from_field(value: &str) -> Option<Self> {
        match value {
            "PI" => Some(Self::Pi),
            "E" => Some(Self::E),
            "GOLDEN_RATIO" => Some(Self::GoldenRatio),
            "SQRT2" => Some(Self::Sqrt2),
            "SQRT1_2" => Some(Self::Sqrt1_2),
            "INFINITY" => Some(Self::Infinity),
            _ => None,
        }
    }

    fn fragment(self) -> Fragment {
        match self {
            Self::Pi => Fragment::new("M_PI", Order::Atomic),
            Self::E => Fragment::new("M_E", Order::Atomic),
            Self::GoldenRatio => Fragment::new("(1 + sqrt(5)) / 2", Order::DIVISION),
            Self::Sqrt2 => Fragment::new("M_SQRT2", Order::Atomic),
            Self::Sqrt1_2 => Fragment::new("M_SQRT1_2", Order::Atomic),
            // no usable infinity on the target; a large sentinel stands in
            Self::Infinity => Fragment::new("10000000", Order::Atomic),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberProperty {
    Even,
    Odd,
    Whole,
    Positive,
    Negative,
    DivisibleBy,
    Prime,
}

impl NumberProperty {
    pub fn from_field(value: &str) -> Option<Self> {
        match value {
            "EVEN" => Some(Self::Even),
            "ODD" => Some(Self::Odd),
            "WHOLE" => Some(Self::Whole),
            "POSITIVE" => Some(Self::Positive),
            "NEGATIVE" => Some(Self::Negative),
            "DIVISIBLE_BY" => Some(Self::DivisibleBy),
            "PRIME" => Some(Self::Prime),
            _ => None,
        }
    }
}

pub fn number(block: &Block) -> CodegenResult<Fragment> {
    let value = number_field(block, "NUM")?;
    // a negative literal is really unary minus applied to a number
    let order = if value < 0.0 {
        Order::UnaryPrefix
    } else {
        Order::Atomic
    };
    Ok(Fragment::new(format_num(value), order))
}

pub fn arithmetic(generator: &mut Generator, block: &Block) -> CodegenResult<Fragment> {
    let op = operator_field(block, "OP", ArithmeticOp::from_field)?;
    match op.infix() {
        Some((token, order)) => {
            let a = generator.value_or(block, "A", order, "0")?;
            let b = generator.value_or(block, "B", order, "0")?;
            Ok(Fragment::new(format!("{}{}{}", a, token, b), order))
        }
        None => {
            generator.register_declaration(INCLUDE_MATH_KEY, INCLUDE_MATH);
            let a = generator.value_or(block, "A", Order::Comma, "0")?;
            let b = generator.value_or(block, "B", Order::Comma, "0")?;
            Ok(Fragment::new(
                format!("pow({}, {})", a, b),
                Order::FunctionCall,
            ))
        }
    }
}

pub fn single(generator: &mut Generator, block: &Block) -> CodegenResult<Fragment> {
    let op = required_field(block, "OP")?;
    if op == "NEG" {
        let mut arg = generator.value_or(block, "NUM", Order::UNARY_NEGATION, "0")?;
        if arg.starts_with('-') {
            // keep "- -x" from collapsing into "--x"
            arg.insert(0, ' ');
        }
        return Ok(Fragment::new(format!("-{}", arg), Order::UNARY_NEGATION));
    }
    let func = MathFunction::from_field(&op)
        .ok_or_else(|| CodegenError::unknown_operator(&block.kind, &op))?;
    generator.register_declaration(INCLUDE_MATH_KEY, INCLUDE_MATH);
    let arg_order = if func.takes_degrees() {
        Order::DIVISION
    } else {
        Order::None
    };
    let arg = generator.value_or(block, "NUM", arg_order, "0")?;
    Ok(func.apply(&arg))
}

pub fn constant(generator: &mut Generator, block: &Block) -> CodegenResult<Fragment> {
    let constant = operator_field(block, "CONSTANT", MathConstant::from_field)?;
    generator.register_declaration(INCLUDE_MATH_KEY, INCLUDE_MATH);
    Ok(constant.fragment())
}

pub fn number_property(generator: &mut Generator, block: &Block) -> CodegenResult<Fragment> {
    let property = operator_field(block, "PROPERTY", NumberProperty::from_field)?;
    generator.register_declaration(INCLUDE_MATH_KEY, INCLUDE_MATH);
    let n = generator.value_or(block, "NUMBER_TO_CHECK", Order::MODULUS, "0")?;
    let code = match property {
        NumberProperty::Prime => {
            generator.register_declaration(PRIME_HELPER_KEY, PRIME_HELPER);
            return Ok(Fragment::new(
                format!("mathIsPrime({})", n),
                Order::FunctionCall,
            ));
        }
        NumberProperty::Even => format!("{} % 2 == 0", n),
        NumberProperty::Odd => format!("{} % 2 == 1", n),
        NumberProperty::Whole => format!("{} % 1 == 0", n),
        NumberProperty::Positive => format!("{} > 0", n),
        NumberProperty::Negative => format!("{} < 0", n),
        NumberProperty::DivisibleBy => {
            let divisor = generator.value_or(block, "DIVISOR", Order::MODULUS, "0")?;
            format!("{} % {} == 0", n, divisor)
        }
    };
    Ok(Fragment::new(code, Order::Equality))
}

pub fn change(generator: &mut Generator, block: &Block) -> CodegenResult<String> {
    let delta = generator.value_or(block, "DELTA", Order::ADDITION, "0")?;
    let name = generator.variable_name(block, "VAR")?;
    Ok(format!("{} += {};\n", name, delta))
}

pub fn modulo(generator: &mut Generator, block: &Block) -> CodegenResult<Fragment> {
    let dividend = generator.value_or(block, "DIVIDEND", Order::MODULUS, "0")?;
    let divisor = generator.value_or(block, "DIVISOR", Order::MODULUS, "0")?;
    Ok(Fragment::new(
        format!("{} % {}", dividend, divisor),
        Order::MODULUS,
    ))
}

pub fn constrain(generator: &mut Generator, block: &Block) -> CodegenResult<Fragment> {
    let value = generator.value_or(block, "VALUE", Order::Comma, "0")?;
    let low = generator.value_or(block, "LOW", Order::Comma, "0")?;
    let high = generator.value_or(block, "HIGH", Order::Comma, "100000000")?;
    Ok(Fragment::new(
        format!("min(max({}, {}), {})", value, low, high),
        Order::FunctionCall,
    ))
}

pub fn random_int(generator: &mut Generator, block: &Block) -> CodegenResult<Fragment> {
    let from = generator.value_or(block, "FROM", Order::Comma, "0")?;
    let to = generator.value_or(block, "TO", Order::Comma, "0")?;
    Ok(Fragment::new(
        format!("random({}, {})", from, to),
        Order::FunctionCall,
    ))
}

fn number_field(block: &Block, field: &str) -> CodegenResult<f64> {
    let raw = match block.field(field) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
        None => {
            return Err(CodegenError::MissingField {
                block_type: block.kind.clone(),
                field: field.to_string(),
            })
        }
    };
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CodegenError::InvalidNumber {
            block_type: block.kind.clone(),
            field: field.to_string(),
            value: raw,
        }),
    }
}

fn format_num(value: f64) -> String {
    let magnitude = value.abs();
    if value == 0.0 {
        // also folds -0 into 0
        "0".to_string()
    } else if magnitude >= 1e15 || magnitude < 1e-6 {
        // whole digits past this overflow C integer literals
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}
