use std::fmt;

/// The syntactic category of a placeholder.
///
/// # Examples
/// ```text
/// User.name               Model
/// users.0.email           Collection
/// User.address.city       Relation
/// settings.theme          Table
/// User.$field_name        Dynamic
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// `Model.field`
    Model,
    /// `table.column`
    Table,
    /// `Model.relation.field`
    Relation,
    /// `Model.$indicator`
    Dynamic,
    /// `Model.items.0`, `first`, `last`, `*`
    Collection,
    /// `name(args)`
    Function,
    /// `$name`
    Variable,
    /// `2 + 3`
    Math,
    /// `path ?? 'default'`
    NullCoalesce,
    /// `TEMPORAL:`, `NOW`, `TODAY`
    Temporal,
    Literal,
    Unknown,
    Compound,
    UseDeclaration,
    LocalVariable,
    Formatter,
}

impl TokenType {
    pub const ALL: [TokenType; 16] = [
        TokenType::Model,
        TokenType::Table,
        TokenType::Relation,
        TokenType::Dynamic,
        TokenType::Collection,
        TokenType::Function,
        TokenType::Variable,
        TokenType::Math,
        TokenType::NullCoalesce,
        TokenType::Temporal,
        TokenType::Literal,
        TokenType::Unknown,
        TokenType::Compound,
        TokenType::UseDeclaration,
        TokenType::LocalVariable,
        TokenType::Formatter,
    ];

    /// Stable lowercase identifier
    pub fn as_str(self) -> &'static str {
        match self {
            TokenType::Model => "model",
            TokenType::Table => "table",
            TokenType::Relation => "relation",
            TokenType::Dynamic => "dynamic",
            TokenType::Collection => "collection",
            TokenType::Function => "function",
            TokenType::Variable => "variable",
            TokenType::Math => "math",
            TokenType::NullCoalesce => "null_coalesce",
            TokenType::Temporal => "temporal",
            TokenType::Literal => "literal",
            TokenType::Unknown => "unknown",
            TokenType::Compound => "compound",
            TokenType::UseDeclaration => "use_declaration",
            TokenType::LocalVariable => "local_variable",
            TokenType::Formatter => "formatter",
        }
    }

    /// Whether resolving this type needs a data accessor.
    pub fn requires_accessor(self) -> bool {
        self.is_path_based()
    }

    /// Whether this type walks nested structures.
    pub fn supports_nesting(self) -> bool {
        self.is_path_based()
    }

    fn is_path_based(self) -> bool {
        matches!(
            self,
            TokenType::Model
                | TokenType::Table
                | TokenType::Relation
                | TokenType::Dynamic
                | TokenType::Collection
        )
    }

    pub fn is_compound_related(self) -> bool {
        matches!(
            self,
            TokenType::Compound
                | TokenType::UseDeclaration
                | TokenType::LocalVariable
                | TokenType::Formatter
        )
    }

    pub fn description(self) -> &'static str {
        match self {
            TokenType::Model => "Model field access",
            TokenType::Table => "Direct table access",
            TokenType::Relation => "Relation chain navigation",
            TokenType::Dynamic => "Dynamic field resolution",
            TokenType::Collection => "Collection/array access",
            TokenType::Function => "Function call",
            TokenType::Variable => "Variable reference",
            TokenType::Math => "Math expression",
            TokenType::NullCoalesce => "Null coalesce expression",
            TokenType::Temporal => "Temporal expression",
            TokenType::Literal => "Literal value",
            TokenType::Unknown => "Unknown token type",
            TokenType::Compound => "Compound expression with USE clause",
            TokenType::UseDeclaration => "USE clause variable declaration",
            TokenType::LocalVariable => "Local variable reference",
            TokenType::Formatter => "Formatter function call",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
