/// Parsed temporal expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Operands of a `&&` chain, evaluated left to right
    And(Vec<Node>),
    Or(Vec<Node>),
    Not(Box<Node>),

    /// `always`, `never`, `weekday` or `weekend`
    Keyword(String),

    /// `HH:MM-HH:MM`, validated at evaluation
    TimeRange(String),

    /// Five-field cron spec without the `cron:` prefix
    Cron(String),

    NthWeekday { day: String, occurrences: Vec<i64> },
    LastWeekday(String),

    /// Name resolved through a registered evaluator
    Custom(String),

    /// Constant produced by an empty expression
    Literal(bool),
}

impl Node {
    /// `&&` over `operands`; a single operand stands alone.
    pub fn and(mut operands: Vec<Node>) -> Node {
        match operands.len() {
            1 => operands.remove(0),
            _ => Node::And(operands),
        }
    }

    pub fn or(mut operands: Vec<Node>) -> Node {
        match operands.len() {
            1 => operands.remove(0),
            _ => Node::Or(operands),
        }
    }

    pub fn not(operand: Node) -> Node {
        Node::Not(Box::new(operand))
    }
}
