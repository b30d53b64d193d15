use std::{collections::HashSet, path::PathBuf};

use codemap::{Span, Spanned};

use crate::common::Identifier;

use super::{CallArgs, Expr, Interpolation, MediaQuery, Params, Selector};

/// A style rule: a selector and a block of child statements.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub selector: Selector,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A property declaration, e.g. `color: red`.
///
/// `value` and `body` may both be present (`font: 12px { weight: bold; }`);
/// a declaration with a `body` is a property set and its children were
/// parsed in the `Properties` scope.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: Interpolation,
    pub value: Option<Spanned<Expr>>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl Declaration {
    /// Whether the property name begins with `--`. Custom-property values
    /// are stored as verbatim string schemas, never parsed as expressions.
    pub fn is_custom_property(&self) -> bool {
        self.name.initial_plain().starts_with("--")
    }
}

/// A variable assignment, e.g. `$x: 1 !default;`.
#[derive(Debug, Clone)]
pub struct VariableDecl {
    pub name: Identifier,
    pub value: Expr,
    /// Set by `!default`.
    pub is_guarded: bool,
    /// Set by `!global`.
    pub is_global: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ImportRule {
    pub imports: Vec<Import>,
}

#[derive(Debug, Clone)]
pub enum Import {
    /// An import the output CSS keeps verbatim: a `url(…)` form or a quoted
    /// target with a media query / supports modifier.
    Css(CssImport),
    /// A quoted target to be resolved and inlined by the compiler.
    Dynamic(DynamicImport),
}

impl Import {
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Import::Dynamic(..))
    }
}

#[derive(Debug, Clone)]
pub struct CssImport {
    pub url: Interpolation,
    pub modifiers: Option<Interpolation>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct DynamicImport {
    pub url: String,
    /// True when a custom importer claimed this target; default resolution
    /// is then suppressed and the import acts as a stub.
    pub handled: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ExtendRule {
    pub selector: Selector,
    pub is_optional: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MediaRule {
    pub queries: Vec<MediaQuery>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum SupportsCondition {
    Negation(Box<Self>),
    Operation {
        left: Box<Self>,
        /// `and` or `or`; a chain never mixes the two.
        operator: String,
        right: Box<Self>,
    },
    /// A bare `#{…}` standing in for a whole condition.
    Interpolation(Expr),
    Declaration {
        name: Expr,
        value: Expr,
    },
}

#[derive(Debug, Clone)]
pub struct SupportsRule {
    pub condition: SupportsCondition,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct AtRootRule {
    pub query: Option<Spanned<AtRootQuery>>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// The parsed `(with: …)` / `(without: …)` query of an `@at-root` rule.
///
/// Names are collected without validation; the evaluator decides which are
/// meaningful.
#[derive(Debug, Clone)]
pub struct AtRootQuery {
    pub include: bool,
    pub names: HashSet<String>,
}

impl AtRootQuery {
    pub fn new(include: bool, names: HashSet<String>) -> Self {
        Self { include, names }
    }

    pub fn excludes_name(&self, name: &str) -> bool {
        (self.names.contains("all") || self.names.contains(name)) != self.include
    }

    pub fn excludes_style_rules(&self) -> bool {
        (self.names.contains("all") || self.names.contains("rule")) != self.include
    }
}

impl Default for AtRootQuery {
    fn default() -> Self {
        let mut names = HashSet::new();
        names.insert("rule".to_owned());
        Self {
            include: false,
            names,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UnknownAtRule {
    pub name: Interpolation,
    pub value: Option<Interpolation>,
    pub body: Option<Vec<Stmt>>,
    pub span: Span,
}

/// An `@if`, with `@else if` represented as a nested `If` forming the sole
/// statement of `alternative`.
#[derive(Debug, Clone)]
pub struct If {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    pub alternative: Option<Vec<Stmt>>,
}

#[derive(Debug, Clone)]
pub struct For {
    pub variable: Spanned<Identifier>,
    pub from: Spanned<Expr>,
    pub to: Spanned<Expr>,
    /// `through` includes the upper bound; `to` excludes it.
    pub is_inclusive: bool,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct Each {
    pub variables: Vec<Identifier>,
    pub list: Expr,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct While {
    pub condition: Expr,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct Return {
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MixinDecl {
    pub name: Identifier,
    pub params: Params,
    pub body: Vec<Stmt>,
    /// Whether the body contains a `@content` rule.
    pub has_content: bool,
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: Spanned<Identifier>,
    pub params: Params,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct Include {
    pub name: Spanned<Identifier>,
    pub args: CallArgs,
    pub content: Option<ContentBlock>,
    pub span: Span,
}

/// The trailing block of an `@include`, with its optional `using (…)`
/// parameters.
#[derive(Debug, Clone)]
pub struct ContentBlock {
    pub params: Params,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct ContentRule {
    pub args: CallArgs,
}

#[derive(Debug, Clone)]
pub struct LoudComment {
    pub text: Interpolation,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SilentComment {
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct DebugRule {
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WarnRule {
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ErrorRule {
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    RuleSet(RuleSet),
    Declaration(Declaration),
    VariableDecl(VariableDecl),
    ImportRule(ImportRule),
    Extend(ExtendRule),
    Media(MediaRule),
    Supports(SupportsRule),
    AtRoot(AtRootRule),
    UnknownAtRule(UnknownAtRule),
    If(If),
    For(For),
    Each(Each),
    While(While),
    Return(Return),
    Mixin(MixinDecl),
    FunctionDecl(FunctionDecl),
    Include(Include),
    Content(ContentRule),
    LoudComment(LoudComment),
    SilentComment(SilentComment),
    Debug(DebugRule),
    Warn(WarnRule),
    Error(ErrorRule),
}

/// The root of a parsed source file.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    pub body: Vec<Stmt>,
    pub url: PathBuf,
}

impl StyleSheet {
    pub fn new(url: PathBuf) -> Self {
        Self {
            body: Vec::new(),
            url,
        }
    }
}
