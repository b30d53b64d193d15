/// The kind of construct the parser is currently inside.
///
/// Certain directives are only legal within certain scopes, so the parser
/// keeps a stack of these and consults it before committing to a directive.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Scope {
    Root,
    Function,
    Mixin,
    Rules,
    Control,
    Properties,
    Media,
    AtRoot,
}

#[derive(Debug)]
pub(crate) struct ScopeStack(Vec<Scope>);

impl ScopeStack {
    pub fn new() -> Self {
        Self(vec![Scope::Root])
    }

    pub fn push(&mut self, scope: Scope) {
        self.0.push(scope);
    }

    pub fn pop(&mut self) {
        debug_assert!(self.0.len() > 1);
        self.0.pop();
    }

    pub fn current(&self) -> Scope {
        *self.0.last().unwrap()
    }

    pub fn contains(&self, scope: Scope) -> bool {
        self.0.contains(&scope)
    }

    pub fn in_mixin(&self) -> bool {
        self.contains(Scope::Mixin)
    }

    pub fn in_function(&self) -> bool {
        self.contains(Scope::Function)
    }

    pub fn in_control_flow(&self) -> bool {
        self.contains(Scope::Control)
    }

    pub fn in_style_rule(&self) -> bool {
        self.contains(Scope::Rules)
    }

    /// Whether `@debug`, `@warn`, and `@error` are legal here.
    pub fn allows_diagnostics(&self) -> bool {
        matches!(
            self.current(),
            Scope::Root | Scope::Function | Scope::Mixin | Scope::Control | Scope::Rules
        )
    }

    /// Whether a dynamic `@import` is legal here.
    pub fn allows_import(&self) -> bool {
        matches!(
            self.current(),
            Scope::Root | Scope::Function | Scope::Rules | Scope::Media
        )
    }
}
