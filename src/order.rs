/// Operator precedence tiers of the generated C, tightest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Order {
    Atomic,
    Member,
    FunctionCall,
    UnaryPostfix,
    UnaryPrefix,
    Multiplicative,
    Additive,
    Shift,
    Relational,
    Equality,
    BitwiseAnd,
    BitwiseXor,
    BitwiseOr,
    LogicalAnd,
    LogicalOr,
    Conditional,
    Assignment,
    Comma,
    None,
}

impl Order {
    pub const UNARY_NEGATION: Order = Order::UnaryPrefix;
    pub const LOGICAL_NOT: Order = Order::UnaryPrefix;
    pub const DIVISION: Order = Order::Multiplicative;
    pub const MODULUS: Order = Order::Multiplicative;
    pub const ADDITION: Order = Order::Additive;

    /// Whether a fragment of order `actual` must be parenthesized when it is
    /// used where at least `required` binding strength is expected.
    pub fn needs_parens(required: Order, actual: Order) -> bool {
        if actual > required {
            return true;
        }
        if actual < required {
            return false;
        }
        !matches!(
            actual,
            Order::Atomic
                | Order::None
                | Order::Member
                | Order::FunctionCall
                | Order::UnaryPostfix
                | Order::UnaryPrefix
                | Order::LogicalAnd
                | Order::LogicalOr
        )
    }

    pub fn wrap(self, code: String, actual: Order) -> String {
        if Order::needs_parens(self, actual) {
            format!("({})", code)
        } else {
            code
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub code: String,
    pub order: Order,
}

impl Fragment {
    pub fn new(code: impl Into<String>, order: Order) -> Self {
        Self {
            code: code.into(),
            order,
        }
    }
}
