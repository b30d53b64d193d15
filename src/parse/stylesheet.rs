use std::{collections::HashSet, path::Path, sync::Arc};

use codemap::{CodeMap, Span, Spanned};

use crate::{
    ast::*,
    common::{Identifier, QuoteKind},
    error::{Error, ParseResult},
    lexer::{Lexer, Token},
    scope::{Scope, ScopeStack},
    selector::SelectorParser,
    Options,
};

use super::{AtRootQueryParser, BaseParser, Lookahead, RESERVED_IDENTIFIERS};

/// The stylesheet parser.
///
/// Consumes the token stream linearly, producing one [`Stmt`] per statement.
/// Statement dispatch is driven by the lookahead probes: a region that looks
/// like a selector followed by `{` becomes a ruleset, anything else falls
/// through to a declaration. All errors are fatal; there is no recovery.
pub(crate) struct Parser<'a> {
    pub toks: Lexer,
    pub map: &'a CodeMap,
    pub path: &'a Path,
    pub empty_span: Span,
    pub options: &'a Options<'a>,
    pub(crate) scopes: ScopeStack,
    /// Whether `&` is legal in selectors here.
    pub(crate) allow_parent: bool,
    /// Whether a parenthesized context disables the division delay.
    pub(crate) in_parens: bool,
    /// Whether a bare `=` is an operator (inside call arguments, for legacy
    /// IE filter syntax).
    pub(crate) allow_single_eq: bool,
    found_content_rule: bool,
    nestings: usize,
}

impl BaseParser for Parser<'_> {
    fn toks(&self) -> &Lexer {
        &self.toks
    }

    fn toks_mut(&mut self) -> &mut Lexer {
        &mut self.toks
    }
}

impl<'a> Parser<'a> {
    pub fn new(
        toks: Lexer,
        map: &'a CodeMap,
        options: &'a Options<'a>,
        empty_span: Span,
        path: &'a Path,
    ) -> Self {
        Parser {
            toks,
            map,
            path,
            empty_span,
            options,
            scopes: ScopeStack::new(),
            allow_parent: true,
            in_parens: false,
            allow_single_eq: false,
            found_content_rule: false,
            nestings: 0,
        }
    }

    pub(crate) fn enter_nesting(&mut self) -> ParseResult<()> {
        self.nestings += 1;
        if self.nestings > self.options.max_nesting {
            return Err(("Exceeded maximum nesting level.", self.toks.current_span()).into());
        }
        Ok(())
    }

    pub(crate) fn exit_nesting(&mut self) {
        self.nestings = self.nestings.saturating_sub(1);
    }

    pub(crate) fn warn(&self, span: Span, message: &str) {
        if self.options.quiet {
            return;
        }
        self.options.logger.warn(self.map.look_up_span(span), message);
    }

    /// A fatal `Invalid CSS after "…": <middle> "…"` error quoting the
    /// source around the current position.
    pub(crate) fn framed_error(&self, middle: &str) -> Box<Error> {
        let message = format!("Invalid CSS{}", self.framed_error_text(" after ", middle));
        (message, self.toks.current_span()).into()
    }

    /// Parse the entire source into a stylesheet.
    pub fn parse(&mut self) -> ParseResult<StyleSheet> {
        let mut style_sheet = StyleSheet::new(self.path.to_path_buf());

        // A byte-order mark may begin the document.
        self.scan_char('\u{feff}');

        if let Some(header) = self.options.custom_header {
            let mut header_parser = Parser::new(
                Lexer::new_from_string(header, self.empty_span),
                self.map,
                self.options,
                self.empty_span,
                self.path,
            );
            style_sheet.body =
                header_parser.parse_statements(|parser| Ok(Some(parser.parse_statement()?)))?;
        }

        let body = self.parse_statements(|parser| {
            if parser.next_matches("@charset") {
                if !parser.options.allows_charset {
                    return Err((
                        "@charset rules are not allowed here.",
                        parser.toks.current_span(),
                    )
                        .into());
                }
                parser.expect_char('@')?;
                parser.expect_identifier("charset", false)?;
                parser.whitespace()?;
                parser.parse_string()?;
                return Ok(None);
            }

            Ok(Some(parser.parse_statement()?))
        })?;

        style_sheet.body.extend(body);

        Ok(style_sheet)
    }

    fn parse_statements(
        &mut self,
        statement: fn(&mut Self) -> ParseResult<Option<Stmt>>,
    ) -> ParseResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        self.whitespace_without_comments();

        while let Some(tok) = self.toks.peek() {
            match tok.kind {
                '$' => stmts.push(Stmt::VariableDecl(self.parse_variable_declaration()?)),
                '/' => match self.toks.peek_n(1) {
                    Some(Token { kind: '/', .. }) => {
                        stmts.push(self.parse_silent_comment()?);
                        self.whitespace_without_comments();
                    }
                    Some(Token { kind: '*', .. }) => {
                        stmts.push(Stmt::LoudComment(self.parse_loud_comment()?));
                        self.whitespace_without_comments();
                    }
                    _ => {
                        if let Some(stmt) = statement(self)? {
                            stmts.push(stmt);
                        }
                    }
                },
                ';' => {
                    self.toks.next();
                    self.whitespace_without_comments();
                }
                _ => {
                    if let Some(stmt) = statement(self)? {
                        stmts.push(stmt);
                    }
                }
            }
        }

        Ok(stmts)
    }

    /// Parse a `{`-delimited block of child statements.
    fn parse_children(
        &mut self,
        child: fn(&mut Self) -> ParseResult<Stmt>,
    ) -> ParseResult<Vec<Stmt>> {
        if !self.scan_char('{') {
            return Err(self.framed_error(": expected \"{\", was "));
        }
        self.whitespace_without_comments();

        let mut children = Vec::new();
        let mut found_matching_brace = false;

        while let Some(tok) = self.toks.peek() {
            match tok.kind {
                '$' => children.push(Stmt::VariableDecl(self.parse_variable_declaration()?)),
                '/' => match self.toks.peek_n(1) {
                    Some(Token { kind: '/', .. }) => {
                        children.push(self.parse_silent_comment()?);
                        self.whitespace_without_comments();
                    }
                    Some(Token { kind: '*', .. }) => {
                        children.push(Stmt::LoudComment(self.parse_loud_comment()?));
                        self.whitespace_without_comments();
                    }
                    _ => children.push(child(self)?),
                },
                ';' => {
                    self.toks.next();
                    self.whitespace_without_comments();
                }
                '}' => {
                    self.toks.next();
                    found_matching_brace = true;
                    break;
                }
                _ => children.push(child(self)?),
            }
        }

        if !found_matching_brace {
            return Err(self.framed_error(": expected \"}\", was "));
        }

        Ok(children)
    }

    fn with_children(
        &mut self,
        child: fn(&mut Self) -> ParseResult<Stmt>,
    ) -> ParseResult<Spanned<Vec<Stmt>>> {
        let start = self.toks.cursor();
        let children = self.parse_children(child)?;
        let span = self.toks.span_from(start);
        self.whitespace_without_comments();
        Ok(Spanned {
            node: children,
            span,
        })
    }

    fn looking_at_children(&self) -> bool {
        self.toks.next_char_is('{')
    }

    fn at_end_of_statement(&self) -> bool {
        matches!(
            self.toks.peek(),
            Some(Token {
                kind: ';' | '}' | '{',
                ..
            }) | None
        )
    }

    fn expect_statement_separator(&mut self) -> ParseResult<()> {
        self.whitespace_without_comments();
        match self.toks.peek() {
            Some(Token {
                kind: ';' | '}', ..
            })
            | None => Ok(()),
            _ => {
                self.expect_char(';')?;
                unreachable!();
            }
        }
    }

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        match self.toks.peek() {
            Some(Token { kind: '@', .. }) => self.parse_at_rule(Self::parse_statement),
            Some(Token { kind: '}', .. }) => {
                Err(("unmatched \"}\".", self.toks.current_span()).into())
            }
            Some(..) => {
                let lookahead = self.lookahead_for_selector(self.toks.cursor());

                if !lookahead.errored && !lookahead.is_custom_property {
                    self.parse_style_rule(lookahead, false)
                } else if self.scopes.current() == Scope::Root {
                    Err(self.framed_error(": expected 1 selector or at-rule, was "))
                } else {
                    self.parse_declaration()
                }
            }
            None => Err(("expected more input.", self.toks.current_span()).into()),
        }
    }

    /// The restricted child parser for `@function` bodies: only variable
    /// assignments and control directives are legal.
    fn function_child(&mut self) -> ParseResult<Stmt> {
        let start = self.toks.cursor();

        if !self.toks.next_char_is('@') {
            if self.toks.next_char_is('$') {
                return Ok(Stmt::VariableDecl(self.parse_variable_declaration()?));
            }

            return Err((
                "@function rules may not contain style rules.",
                self.toks.span_from(start),
            )
                .into());
        }

        match self.plain_at_rule_name()?.as_str() {
            "debug" => self.parse_debug_rule(start),
            "each" => self.parse_each_rule(Self::function_child),
            "error" => self.parse_error_rule(start),
            "for" => self.parse_for_rule(Self::function_child),
            "if" => self.parse_if_rule(Self::function_child),
            "return" => self.parse_return_rule(),
            "warn" => self.parse_warn_rule(start),
            "while" => self.parse_while_rule(Self::function_child),
            _ => self.parse_disallowed_at_rule(start),
        }
    }

    fn plain_at_rule_name(&mut self) -> ParseResult<String> {
        self.expect_char('@')?;
        let name = self.parse_identifier(false, false)?;
        self.whitespace()?;
        Ok(name)
    }

    fn parse_at_rule(&mut self, child: fn(&mut Self) -> ParseResult<Stmt>) -> ParseResult<Stmt> {
        let start = self.toks.cursor();

        self.expect_char('@')?;
        let name = self.parse_interpolated_identifier()?;
        self.whitespace()?;

        match name.as_plain() {
            Some("at-root") => self.parse_at_root_rule(start),
            Some("content") => self.parse_content_rule(start),
            Some("debug") => self.parse_debug_rule(start),
            Some("each") => self.parse_each_rule(child),
            Some("else") => Err((
                "Invalid CSS: @else must come after @if",
                self.toks.span_from(start),
            )
                .into()),
            Some("error") => self.parse_error_rule(start),
            Some("extend") => self.parse_extend_rule(start),
            Some("for") => self.parse_for_rule(child),
            Some("function") => self.parse_function_rule(start),
            Some("if") => self.parse_if_rule(child),
            Some("import") => self.parse_import_rule(start),
            Some("include") => self.parse_include_rule(),
            Some("media") => self.parse_media_rule(start),
            Some("mixin") => self.parse_mixin_rule(start),
            Some("return") => self.parse_disallowed_at_rule(start),
            Some("supports") => self.parse_supports_rule(start),
            Some("warn") => self.parse_warn_rule(start),
            Some("while") => self.parse_while_rule(child),
            Some(..) | None => self.unknown_at_rule(name, start),
        }
    }

    fn parse_disallowed_at_rule(&mut self, start: usize) -> ParseResult<Stmt> {
        self.almost_any_value()?;
        Err((
            "This at-rule is not allowed here.",
            self.toks.span_from(start),
        )
            .into())
    }

    // ------------------------------------------------------------------
    // Rulesets and selectors
    // ------------------------------------------------------------------

    fn parse_style_rule(&mut self, lookahead: Lookahead, from_at_root: bool) -> ParseResult<Stmt> {
        self.enter_nesting()?;
        self.whitespace()?;

        let start = self.toks.cursor();

        let selector = if lookahead.parsable {
            Selector::List(self.parse_selector_list_inline(self.allow_parent)?)
        } else {
            Selector::Schema(self.parse_selector_schema(lookahead.position, from_at_root)?)
        };

        self.scopes.push(Scope::Rules);
        let children = self.with_children(Self::parse_statement);
        self.scopes.pop();
        let children = children?;

        self.exit_nesting();

        let span = selector.span().merge(children.span);

        Ok(Stmt::RuleSet(RuleSet {
            selector,
            body: children.node,
            span,
        }))
    }

    /// Parse a concrete selector list directly off the main token stream.
    fn parse_selector_list_inline(
        &mut self,
        allows_parent: bool,
    ) -> ParseResult<crate::selector::SelectorList> {
        let span = self.toks.current_span();
        let max_nesting = self.options.max_nesting;
        let mut selector_parser =
            SelectorParser::new(&mut self.toks, allows_parent, true, max_nesting, span);
        selector_parser.parse_selector_list()
    }

    /// Parse a selector containing interpolation as a string schema covering
    /// the region up to `end`.
    fn parse_selector_schema(
        &mut self,
        end: usize,
        from_at_root: bool,
    ) -> ParseResult<SelectorSchema> {
        self.enter_nesting()?;

        let start = self.toks.cursor();
        let mut contents = Interpolation::new();

        while self.toks.cursor() < end {
            match self.toks.peek() {
                Some(Token { kind: '#', .. })
                    if matches!(self.toks.peek_n(1), Some(Token { kind: '{', .. })) =>
                {
                    contents.append(self.parse_single_interpolation()?);
                }
                Some(tok) => {
                    self.toks.next();
                    contents.push_char(tok.kind);
                }
                None => break,
            }
        }

        self.exit_nesting();

        // Trailing whitespace before the block opener is not part of the
        // selector.
        let drop_last = match contents.parts.last_mut() {
            Some(InterpolationPart::Text(text)) => {
                let trimmed_len = text.trim_end().len();
                text.truncate(trimmed_len);
                trimmed_len == 0
            }
            _ => false,
        };
        if drop_last {
            contents.parts.pop();
        }

        Ok(SelectorSchema {
            contents,
            connect_parent: !from_at_root,
            span: self.toks.span_from(start),
        })
    }

    // ------------------------------------------------------------------
    // Declarations and variables
    // ------------------------------------------------------------------

    fn parse_declaration(&mut self) -> ParseResult<Stmt> {
        let start = self.toks.cursor();

        let mut name = Interpolation::new();

        // The "*prop", ":prop", "#prop", and ".prop" IE hacks.
        if matches!(
            self.toks.peek(),
            Some(Token {
                kind: ':' | '*' | '.',
                ..
            })
        ) || (self.toks.next_char_is('#')
            && !matches!(self.toks.peek_n(1), Some(Token { kind: '{', .. })))
        {
            name.push_char(self.toks.next().unwrap().kind);
            name.push_str(&self.raw_text(|p| p.whitespace()));
        }

        if !self.looking_at_interpolated_identifier() {
            return Err(self.framed_error(": expected \"}\", was "));
        }

        name.append(self.parse_interpolated_identifier()?);

        if self.next_matches("/*") {
            name.push_str(&self.fallible_raw_text(Self::skip_loud_comment)?);
        }

        self.whitespace()?;
        if !self.scan_char(':') {
            return Err((
                format!(
                    "property \"{}\" must be followed by a ':'",
                    name.as_plain().unwrap_or_else(|| name.initial_plain())
                ),
                self.toks.current_span(),
            )
                .into());
        }

        if name.initial_plain().starts_with("--") {
            let value_start = self.toks.cursor();
            let value = self.parse_interpolated_declaration_value(false, false, true)?;
            let value_span = self.toks.span_from(value_start);
            self.expect_statement_separator()?;
            return Ok(Stmt::Declaration(Declaration {
                name,
                value: Some(
                    Expr::String(StringExpr(value, QuoteKind::None), value_span).span(value_span),
                ),
                body: Vec::new(),
                span: self.toks.span_from(start),
            }));
        }

        self.whitespace()?;

        if self.toks.next_char_is(';') {
            return Err((
                "style declaration must contain a value",
                self.toks.current_span(),
            )
                .into());
        }

        if self.looking_at_children() {
            self.scopes.push(Scope::Properties);
            let body = self.with_children(Self::parse_statement);
            self.scopes.pop();

            return Ok(Stmt::Declaration(Declaration {
                name,
                value: None,
                body: body?.node,
                span: self.toks.span_from(start),
            }));
        }

        let lookahead = self.lookahead_for_value(self.toks.cursor());
        let value = if lookahead.found.is_some() && lookahead.has_interpolants {
            self.parse_value_schema(lookahead.position)?
        } else {
            self.parse_expression(None)?
        };

        if self.looking_at_children() {
            self.scopes.push(Scope::Properties);
            let body = self.with_children(Self::parse_statement);
            self.scopes.pop();

            Ok(Stmt::Declaration(Declaration {
                name,
                value: Some(value),
                body: body?.node,
                span: self.toks.span_from(start),
            }))
        } else {
            self.expect_statement_separator()?;
            Ok(Stmt::Declaration(Declaration {
                name,
                value: Some(value),
                body: Vec::new(),
                span: self.toks.span_from(start),
            }))
        }
    }

    fn parse_variable_declaration(&mut self) -> ParseResult<VariableDecl> {
        let start = self.toks.cursor();

        let name = self.parse_variable_name()?;
        self.whitespace()?;

        if !self.scan_char(':') {
            return Err((
                format!("expected ':' after {} in assignment statement", name),
                self.toks.current_span(),
            )
                .into());
        }
        self.whitespace()?;

        if self.at_end_of_statement() {
            return Err(self.framed_error(": expected expression (e.g. 1px, bold), was "));
        }

        let lookahead = self.lookahead_for_value(self.toks.cursor());
        let value = if lookahead.found.is_some() && lookahead.has_interpolants {
            self.parse_value_schema(lookahead.position)?
        } else {
            self.parse_expression(None)?
        };

        let mut is_guarded = false;
        let mut is_global = false;

        while self.scan_char('!') {
            let flag_start = self.toks.cursor();
            let flag = self.parse_identifier(false, false)?;

            match flag.as_str() {
                "default" => is_guarded = true,
                "global" => is_global = true,
                _ => {
                    return Err(
                        ("Invalid flag name.", self.toks.span_from(flag_start)).into()
                    )
                }
            }

            self.whitespace()?;
        }

        self.expect_statement_separator()?;

        Ok(VariableDecl {
            name: Identifier::from(name),
            value: value.node,
            is_guarded,
            is_global,
            span: self.toks.span_from(start),
        })
    }

    // ------------------------------------------------------------------
    // Control directives
    // ------------------------------------------------------------------

    fn scan_else(&mut self) -> ParseResult<bool> {
        let start = self.toks.cursor();

        self.whitespace()?;

        if self.scan_char('@') {
            if self.scan_identifier("else", true)? {
                return Ok(true);
            }

            if self.scan_identifier("elseif", true)? {
                // The deprecated one-word spelling; rewind so "if" is read
                // as the else-if keyword.
                let new_cursor = self.toks.cursor() - 2;
                self.toks.set_cursor(new_cursor);
                return Ok(true);
            }
        }

        self.toks.set_cursor(start);

        Ok(false)
    }

    fn parse_if_rule(&mut self, child: fn(&mut Self) -> ParseResult<Stmt>) -> ParseResult<Stmt> {
        self.scopes.push(Scope::Control);

        let result = self.parse_if_rule_inner(child);

        self.scopes.pop();

        result.map(Stmt::If)
    }

    fn parse_if_rule_inner(
        &mut self,
        child: fn(&mut Self) -> ParseResult<Stmt>,
    ) -> ParseResult<If> {
        let condition = self.parse_expression(None)?.node;
        let body = self.parse_children(child)?;
        self.whitespace_without_comments();

        let mut alternative = None;

        if self.scan_else()? {
            self.whitespace()?;
            if self.scan_identifier("if", false)? {
                self.whitespace()?;
                let nested = self.parse_if_rule_inner(child)?;
                alternative = Some(vec![Stmt::If(nested)]);
            } else {
                alternative = Some(self.parse_children(child)?);
                self.whitespace_without_comments();
            }
        }

        Ok(If {
            condition,
            body,
            alternative,
        })
    }

    fn parse_each_rule(&mut self, child: fn(&mut Self) -> ParseResult<Stmt>) -> ParseResult<Stmt> {
        self.scopes.push(Scope::Control);

        let result = (|| {
            let mut variables = vec![Identifier::from(self.parse_variable_name()?)];
            self.whitespace()?;
            while self.scan_char(',') {
                self.whitespace()?;
                variables.push(Identifier::from(self.parse_variable_name()?));
                self.whitespace()?;
            }

            self.expect_identifier("in", false)?;
            self.whitespace()?;

            let list = self.parse_expression(None)?.node;
            let body = self.with_children(child)?.node;

            Ok(Stmt::Each(Each {
                variables,
                list,
                body,
            }))
        })();

        self.scopes.pop();

        result
    }

    fn parse_for_rule(&mut self, child: fn(&mut Self) -> ParseResult<Stmt>) -> ParseResult<Stmt> {
        self.scopes.push(Scope::Control);

        let result = (|| {
            let var_start = self.toks.cursor();
            let variable = Spanned {
                node: Identifier::from(self.parse_variable_name()?),
                span: self.toks.span_from(var_start),
            };
            self.whitespace()?;

            self.expect_identifier("from", false)?;
            self.whitespace()?;

            let from = self.parse_expression(Some(&|parser| {
                Ok(parser.peek_identifier("to")? || parser.peek_identifier("through")?)
            }))?;

            self.whitespace()?;

            let is_inclusive = if self.scan_identifier("through", false)? {
                true
            } else if self.scan_identifier("to", false)? {
                false
            } else {
                return Err((
                    "Expected \"to\" or \"through\".",
                    self.toks.current_span(),
                )
                    .into());
            };

            self.whitespace()?;

            let to = self.parse_expression(None)?;

            let body = self.with_children(child)?.node;

            Ok(Stmt::For(For {
                variable,
                from,
                to,
                is_inclusive,
                body,
            }))
        })();

        self.scopes.pop();

        result
    }

    fn parse_while_rule(&mut self, child: fn(&mut Self) -> ParseResult<Stmt>) -> ParseResult<Stmt> {
        self.scopes.push(Scope::Control);

        let result = (|| {
            self.whitespace()?;

            if self.at_end_of_statement() {
                return Err(self.framed_error(": expected expression (e.g. 1px, bold), was "));
            }

            let condition = self.parse_expression(None)?.node;
            let body = self.with_children(child)?.node;

            Ok(Stmt::While(While { condition, body }))
        })();

        self.scopes.pop();

        result
    }

    fn parse_return_rule(&mut self) -> ParseResult<Stmt> {
        if self.at_end_of_statement() {
            return Err(self.framed_error(": expected expression (e.g. 1px, bold), was "));
        }

        let value = self.parse_expression(None)?;
        self.expect_statement_separator()?;

        Ok(Stmt::Return(Return {
            value: value.node,
            span: value.span,
        }))
    }

    // ------------------------------------------------------------------
    // Diagnostics directives
    // ------------------------------------------------------------------

    fn expect_diagnostics_allowed(&self, start: usize) -> ParseResult<()> {
        if self.scopes.allows_diagnostics() {
            return Ok(());
        }

        Err((
            "Illegal nesting: Only properties may be nested beneath properties.",
            self.toks.span_from(start),
        )
            .into())
    }

    fn parse_debug_rule(&mut self, start: usize) -> ParseResult<Stmt> {
        self.expect_diagnostics_allowed(start)?;

        let value = self.parse_expression(None)?;
        self.expect_statement_separator()?;

        Ok(Stmt::Debug(DebugRule {
            value: value.node,
            span: value.span,
        }))
    }

    fn parse_warn_rule(&mut self, start: usize) -> ParseResult<Stmt> {
        self.expect_diagnostics_allowed(start)?;

        let value = self.parse_expression(None)?;
        self.expect_statement_separator()?;

        Ok(Stmt::Warn(WarnRule {
            value: value.node,
            span: value.span,
        }))
    }

    fn parse_error_rule(&mut self, start: usize) -> ParseResult<Stmt> {
        self.expect_diagnostics_allowed(start)?;

        let value = self.parse_expression(None)?;
        self.expect_statement_separator()?;

        Ok(Stmt::Error(ErrorRule {
            value: value.node,
            span: value.span,
        }))
    }

    // ------------------------------------------------------------------
    // Mixins and functions
    // ------------------------------------------------------------------

    fn parse_mixin_rule(&mut self, start: usize) -> ParseResult<Stmt> {
        let name = Identifier::from(self.parse_identifier(true, false)?);
        self.whitespace()?;

        let params = if self.toks.next_char_is('(') {
            self.parse_params()?
        } else {
            Params::empty()
        };

        if self.scopes.in_mixin() {
            return Err((
                "Mixins may not contain mixin declarations.",
                self.toks.span_from(start),
            )
                .into());
        } else if self.scopes.in_control_flow() {
            return Err((
                "Mixins may not be declared in control directives.",
                self.toks.span_from(start),
            )
                .into());
        }

        self.whitespace()?;

        let old_found_content_rule = self.found_content_rule;
        self.found_content_rule = false;
        self.scopes.push(Scope::Mixin);

        let body = self.with_children(Self::parse_statement);

        let has_content = self.found_content_rule;
        self.found_content_rule = old_found_content_rule;
        self.scopes.pop();

        Ok(Stmt::Mixin(MixinDecl {
            name,
            params,
            body: body?.node,
            has_content,
        }))
    }

    fn parse_function_rule(&mut self, start: usize) -> ParseResult<Stmt> {
        let name_start = self.toks.cursor();
        let name = self.parse_identifier(true, false)?;
        let name_span = self.toks.span_from(name_start);
        self.whitespace()?;

        let params = self.parse_params()?;

        if self.scopes.in_mixin() {
            return Err((
                "Mixins may not contain function declarations.",
                self.toks.span_from(start),
            )
                .into());
        } else if self.scopes.in_control_flow() {
            return Err((
                "Functions may not be declared in control directives.",
                self.toks.span_from(start),
            )
                .into());
        }

        if RESERVED_IDENTIFIERS.contains(&crate::common::unvendor(&name)) {
            return Err(("Invalid function name.", self.toks.span_from(start)).into());
        }

        self.whitespace()?;

        self.scopes.push(Scope::Function);
        let body = self.with_children(Self::function_child);
        self.scopes.pop();

        Ok(Stmt::FunctionDecl(FunctionDecl {
            name: Spanned {
                node: Identifier::from(name),
                span: name_span,
            },
            params,
            body: body?.node,
        }))
    }

    fn parse_content_rule(&mut self, start: usize) -> ParseResult<Stmt> {
        if !self.scopes.in_mixin() {
            return Err((
                "@content is only allowed within mixin declarations.",
                self.toks.span_from(start),
            )
                .into());
        }

        self.whitespace()?;

        let args = if self.toks.next_char_is('(') {
            self.parse_call_args()?
        } else {
            CallArgs::empty(self.toks.current_span())
        };

        self.expect_statement_separator()?;

        self.found_content_rule = true;

        Ok(Stmt::Content(ContentRule { args }))
    }

    fn parse_include_rule(&mut self) -> ParseResult<Stmt> {
        let name_start = self.toks.cursor();
        let name = Identifier::from(self.parse_identifier(true, false)?);
        let name_span = self.toks.span_from(name_start);

        self.whitespace()?;

        let args = if self.toks.next_char_is('(') {
            self.parse_call_args()?
        } else {
            CallArgs::empty(self.toks.current_span())
        };

        self.whitespace()?;

        let content_params = if self.scan_identifier("using", false)? {
            self.whitespace()?;
            if !self.toks.next_char_is('(') {
                return Err(self.framed_error(": expected \"(\", was "));
            }
            let params = self.parse_params()?;
            self.whitespace()?;
            Some(params)
        } else {
            None
        };

        let mut content = None;

        if content_params.is_some() || self.looking_at_children() {
            let params = content_params.unwrap_or_else(Params::empty);
            self.scopes.push(Scope::Rules);
            let body = self.with_children(Self::parse_statement);
            self.scopes.pop();
            content = Some(ContentBlock {
                params,
                body: body?.node,
            });
        } else {
            self.expect_statement_separator()?;
        }

        Ok(Stmt::Include(Include {
            name: Spanned {
                node: name,
                span: name_span,
            },
            args,
            content,
            span: name_span,
        }))
    }

    // ------------------------------------------------------------------
    // Parameter and argument lists
    // ------------------------------------------------------------------

    fn parse_params(&mut self) -> ParseResult<Params> {
        self.expect_char('(')?;
        self.whitespace()?;

        let mut params = Vec::new();
        let mut named = HashSet::new();
        let mut rest: Option<Identifier> = None;

        while self.toks.next_char_is('$') {
            let name_start = self.toks.cursor();
            let name = Identifier::from(self.parse_variable_name()?);
            let name_span = self.toks.span_from(name_start);
            self.whitespace()?;

            let mut default: Option<Expr> = None;

            if self.scan_char(':') {
                self.whitespace()?;
                default = Some(self.parse_expression_until_comma()?.node);
            } else if self.scan_char('.') {
                self.expect_char('.')?;
                self.expect_char('.')?;
                self.whitespace()?;
                rest = Some(name);
                break;
            }

            params.push(Param { name, default });

            if !named.insert(name) {
                return Err(("Duplicate argument.", name_span).into());
            }

            if !self.scan_char(',') {
                break;
            }
            self.whitespace()?;
        }

        self.expect_char(')')?;

        Ok(Params { params, rest })
    }

    pub(crate) fn parse_call_args(&mut self) -> ParseResult<CallArgs> {
        let start = self.toks.cursor();

        self.expect_char('(')?;
        self.whitespace()?;

        let was_single_eq = self.allow_single_eq;
        self.allow_single_eq = true;
        let result = self.parse_call_args_inner(start);
        self.allow_single_eq = was_single_eq;

        result
    }

    fn parse_call_args_inner(&mut self, start: usize) -> ParseResult<CallArgs> {
        let mut positional = Vec::new();
        let mut named = std::collections::BTreeMap::new();
        let mut rest: Option<Expr> = None;
        let mut keyword_rest: Option<Expr> = None;

        while self.looking_at_expression() {
            let expression = self.parse_expression_until_comma()?;
            self.whitespace()?;

            if expression.node.is_variable() && self.scan_char(':') {
                let name = match expression.node {
                    Expr::Variable { name } => name,
                    _ => unreachable!(),
                };

                self.whitespace()?;
                if named.contains_key(&name.node) {
                    return Err(("Duplicate argument.", name.span).into());
                }

                named.insert(name.node, self.parse_expression_until_comma()?.node);
            } else if self.scan_char('.') {
                self.expect_char('.')?;
                self.expect_char('.')?;

                if rest.is_none() {
                    rest = Some(expression.node);
                } else {
                    keyword_rest = Some(expression.node);
                    self.whitespace()?;
                    break;
                }
            } else if !named.is_empty() {
                return Err((
                    "Positional arguments must come before keyword arguments.",
                    expression.span,
                )
                    .into());
            } else {
                positional.push(expression.node);
            }

            self.whitespace()?;
            if !self.scan_char(',') {
                break;
            }
            self.whitespace()?;
        }

        self.expect_char(')')?;

        Ok(CallArgs {
            positional,
            named,
            rest,
            keyword_rest,
            span: self.toks.span_from(start),
        })
    }

    // ------------------------------------------------------------------
    // @extend
    // ------------------------------------------------------------------

    fn parse_extend_rule(&mut self, start: usize) -> ParseResult<Stmt> {
        if !self.scopes.in_style_rule() && !self.scopes.in_mixin() {
            return Err((
                "@extend may only be used within style rules.",
                self.toks.span_from(start),
            )
                .into());
        }

        let lookahead = self.lookahead_for_include(self.toks.cursor());
        if lookahead.found.is_none() {
            return Err(self.framed_error(": expected selector, was "));
        }

        let selector = if lookahead.parsable {
            Selector::List(self.parse_selector_list_inline(false)?)
        } else {
            Selector::Schema(self.parse_selector_schema(lookahead.position, true)?)
        };

        self.whitespace()?;

        let is_optional = self.scan_char('!');
        if is_optional {
            self.expect_identifier("optional", false)?;
        }

        self.expect_statement_separator()?;

        Ok(Stmt::Extend(ExtendRule {
            selector,
            is_optional,
            span: self.toks.span_from(start),
        }))
    }

    // ------------------------------------------------------------------
    // @import
    // ------------------------------------------------------------------

    fn parse_import_rule(&mut self, start: usize) -> ParseResult<Stmt> {
        let mut imports = Vec::new();

        loop {
            self.whitespace()?;
            let mut argument = self.parse_import_argument()?;

            if let Import::Dynamic(dynamic) = &mut argument {
                if self.scopes.in_control_flow() || self.scopes.in_mixin() {
                    return self.parse_disallowed_at_rule(start);
                }

                if !self.scopes.allows_import() {
                    return Err((
                        "This at-rule is not allowed here.",
                        self.toks.span_from(start),
                    )
                        .into());
                }

                for importer in &self.options.importers {
                    if importer.import(&dynamic.url, self.path, dynamic.span) {
                        dynamic.handled = true;
                        break;
                    }
                }
            }

            imports.push(argument);
            self.whitespace()?;

            if !self.scan_char(',') {
                break;
            }
        }

        self.expect_statement_separator()?;

        Ok(Stmt::ImportRule(ImportRule { imports }))
    }

    fn parse_import_argument(&mut self) -> ParseResult<Import> {
        let start = self.toks.cursor();

        if self.toks.next_char_is('u') || self.toks.next_char_is('U') {
            let url = self.parse_dynamic_url()?;
            self.whitespace()?;
            let modifiers = self.try_import_modifiers()?;
            let span = self.toks.span_from(start);
            return Ok(Import::Css(CssImport {
                url: Interpolation::from_expr(url.span(span)),
                modifiers,
                span,
            }));
        }

        let url = self.parse_string()?;
        let raw_url = self.toks.raw_text(start);
        self.whitespace()?;
        let modifiers = self.try_import_modifiers()?;

        let span = self.toks.span_from(start);

        if is_css_import_url(&url) || modifiers.is_some() {
            Ok(Import::Css(CssImport {
                url: Interpolation::plain(raw_url),
                modifiers,
                span,
            }))
        } else {
            Ok(Import::Dynamic(DynamicImport {
                url,
                handled: false,
                span,
            }))
        }
    }

    fn try_import_modifiers(&mut self) -> ParseResult<Option<Interpolation>> {
        if !self.looking_at_interpolated_identifier() && !self.toks.next_char_is('(') {
            return Ok(None);
        }

        let modifiers = self.parse_interpolated_declaration_value(false, true, true)?;

        if modifiers.is_empty() {
            Ok(None)
        } else {
            Ok(Some(modifiers))
        }
    }

    fn parse_dynamic_url(&mut self) -> ParseResult<Expr> {
        let start = self.toks.cursor();
        self.expect_identifier("url", false)?;

        Ok(match self.try_url_contents(None)? {
            Some(contents) => Expr::String(
                StringExpr(contents, QuoteKind::None),
                self.toks.span_from(start),
            ),
            None => {
                let arguments = self.parse_call_args()?;
                let span = self.toks.span_from(start);
                Expr::InterpolatedFunction(Arc::new(InterpolatedFunctionExpr {
                    name: Interpolation::plain("url".to_owned()),
                    arguments,
                    span,
                }))
            }
        })
    }

    // ------------------------------------------------------------------
    // @media
    // ------------------------------------------------------------------

    fn parse_media_rule(&mut self, start: usize) -> ParseResult<Stmt> {
        let queries = self.parse_media_query_list()?;

        self.scopes.push(Scope::Media);
        let body = self.with_children(Self::parse_statement);
        self.scopes.pop();

        Ok(Stmt::Media(MediaRule {
            queries,
            body: body?.node,
            span: self.toks.span_from(start),
        }))
    }

    fn parse_media_query_list(&mut self) -> ParseResult<Vec<MediaQuery>> {
        let mut queries = Vec::new();

        loop {
            self.whitespace()?;
            queries.push(self.parse_media_query()?);
            self.whitespace()?;

            if !self.scan_char(',') {
                break;
            }
        }

        Ok(queries)
    }

    fn parse_media_query(&mut self) -> ParseResult<MediaQuery> {
        let start = self.toks.cursor();

        let mut modifier = None;
        let mut media_type = None;
        let mut features = Vec::new();

        if self.looking_at_interpolated_identifier() {
            let identifier1 = self.parse_interpolated_identifier()?;
            self.whitespace()?;

            match identifier1
                .as_plain()
                .map(str::to_ascii_lowercase)
                .as_deref()
            {
                Some("not") | Some("only") => {
                    modifier = Some(identifier1);
                    if self.looking_at_interpolated_identifier() {
                        media_type = Some(self.parse_interpolated_identifier()?);
                        self.whitespace()?;
                    }
                }
                _ => media_type = Some(identifier1),
            }
        }

        if media_type.is_some() {
            while self.scan_identifier("and", false)? {
                self.expect_whitespace()?;
                features.push(self.parse_media_expression()?);
                self.whitespace()?;
            }
        } else {
            features.push(self.parse_media_expression()?);
            self.whitespace()?;
            while self.scan_identifier("and", false)? {
                self.whitespace()?;
                features.push(self.parse_media_expression()?);
                self.whitespace()?;
            }
        }

        Ok(MediaQuery {
            modifier,
            media_type,
            features,
            span: self.toks.span_from(start),
        })
    }

    fn parse_media_expression(&mut self) -> ParseResult<MediaQueryExpression> {
        let start = self.toks.cursor();

        if self.toks.next_char_is('#')
            && matches!(self.toks.peek_n(1), Some(Token { kind: '{', .. }))
        {
            let interpolation = self.parse_single_interpolation()?;
            return Ok(MediaQueryExpression::Interpolation(
                interpolation,
                self.toks.span_from(start),
            ));
        }

        if !self.scan_char('(') {
            return Err(self.framed_error(": expected \"(\", was "));
        }
        self.whitespace()?;

        let name = self.parse_expression(Some(&|parser| {
            Ok(matches!(parser.toks.peek(), Some(Token { kind: ':', .. })))
        }))?;

        let value = if self.scan_char(':') {
            self.whitespace()?;
            Some(self.parse_expression(None)?)
        } else {
            None
        };

        self.expect_char(')')?;
        self.whitespace()?;

        Ok(MediaQueryExpression::Feature {
            name,
            value,
            span: self.toks.span_from(start),
        })
    }

    // ------------------------------------------------------------------
    // @supports
    // ------------------------------------------------------------------

    fn parse_supports_rule(&mut self, start: usize) -> ParseResult<Stmt> {
        let condition = self.parse_supports_condition()?;
        self.whitespace()?;

        self.scopes.push(Scope::Media);
        let body = self.with_children(Self::parse_statement);
        self.scopes.pop();

        Ok(Stmt::Supports(SupportsRule {
            condition,
            body: body?.node,
            span: self.toks.span_from(start),
        }))
    }

    /// Parse a full supports condition. The outermost condition need not be
    /// parenthesized when it is a negation or an interpolation; everything
    /// else requires parens.
    fn parse_supports_condition(&mut self) -> ParseResult<SupportsCondition> {
        if self.scan_identifier("not", false)? {
            self.whitespace()?;
            return Ok(SupportsCondition::Negation(Box::new(
                self.supports_condition_in_parens()?,
            )));
        }

        let mut condition = self.supports_condition_in_parens()?;
        self.whitespace()?;

        let mut operator: Option<String> = None;

        while self.looking_at_identifier() {
            if let Some(operator) = &operator {
                self.expect_identifier(operator, false)?;
            } else if self.scan_identifier("or", false)? {
                operator = Some("or".to_owned());
            } else {
                self.expect_identifier("and", false)?;
                operator = Some("and".to_owned());
            }

            self.whitespace()?;
            let right = self.supports_condition_in_parens()?;
            condition = SupportsCondition::Operation {
                left: Box::new(condition),
                operator: operator.clone().unwrap(),
                right: Box::new(right),
            };
            self.whitespace()?;
        }

        Ok(condition)
    }

    fn supports_condition_in_parens(&mut self) -> ParseResult<SupportsCondition> {
        if self.toks.next_char_is('#')
            && matches!(self.toks.peek_n(1), Some(Token { kind: '{', .. }))
        {
            return Ok(SupportsCondition::Interpolation(
                self.parse_interpolation_expr()?.node,
            ));
        }

        self.expect_char('(')?;
        self.whitespace()?;

        if self.scan_identifier("not", false)? {
            self.whitespace()?;
            let condition = self.supports_condition_in_parens()?;
            self.expect_char(')')?;
            return Ok(SupportsCondition::Negation(Box::new(condition)));
        } else if self.toks.next_char_is('(') {
            let condition = self.parse_supports_condition()?;
            self.expect_char(')')?;
            return Ok(condition);
        }

        let name = self.parse_expression(Some(&|parser| {
            Ok(matches!(parser.toks.peek(), Some(Token { kind: ':', .. })))
        }))?;

        self.expect_char(':')?;

        let value = match &name.node {
            Expr::String(StringExpr(text, QuoteKind::None), ..)
                if text.initial_plain().starts_with("--") =>
            {
                let value_start = self.toks.cursor();
                let text = self.parse_interpolated_declaration_value(false, false, true)?;
                Expr::String(
                    StringExpr(text, QuoteKind::None),
                    self.toks.span_from(value_start),
                )
            }
            _ => {
                self.whitespace()?;
                self.parse_expression(None)?.node
            }
        };

        self.expect_char(')')?;

        Ok(SupportsCondition::Declaration {
            name: name.node,
            value,
        })
    }

    // ------------------------------------------------------------------
    // @at-root
    // ------------------------------------------------------------------

    fn parse_at_root_rule(&mut self, start: usize) -> ParseResult<Stmt> {
        if self.toks.next_char_is('(') {
            let query_start = self.toks.cursor();
            let query = AtRootQueryParser::new(&mut self.toks).parse()?;
            let query_span = self.toks.span_from(query_start);
            self.whitespace()?;

            self.scopes.push(Scope::AtRoot);
            let body = self.with_children(Self::parse_statement);
            self.scopes.pop();

            return Ok(Stmt::AtRoot(AtRootRule {
                query: Some(Spanned {
                    node: query,
                    span: query_span,
                }),
                body: body?.node,
                span: self.toks.span_from(start),
            }));
        }

        if self.looking_at_children() {
            self.scopes.push(Scope::AtRoot);
            let body = self.with_children(Self::parse_statement);
            self.scopes.pop();

            return Ok(Stmt::AtRoot(AtRootRule {
                query: None,
                body: body?.node,
                span: self.toks.span_from(start),
            }));
        }

        let lookahead = self.lookahead_for_selector(self.toks.cursor());
        if lookahead.errored || lookahead.is_custom_property {
            return Err(self.framed_error(": expected selector, was "));
        }

        self.scopes.push(Scope::AtRoot);
        let child = self.parse_style_rule(lookahead, true);
        self.scopes.pop();

        Ok(Stmt::AtRoot(AtRootRule {
            query: None,
            body: vec![child?],
            span: self.toks.span_from(start),
        }))
    }

    // ------------------------------------------------------------------
    // Unknown at-rules
    // ------------------------------------------------------------------

    fn unknown_at_rule(&mut self, name: Interpolation, start: usize) -> ParseResult<Stmt> {
        let value = if !self.toks.next_char_is('!') && !self.at_end_of_statement() {
            Some(self.almost_any_value()?)
        } else {
            None
        };

        let body = if self.looking_at_children() {
            self.scopes.push(Scope::Rules);
            let body = self.with_children(Self::parse_statement);
            self.scopes.pop();
            Some(body?.node)
        } else {
            self.expect_statement_separator()?;
            None
        };

        Ok(Stmt::UnknownAtRule(UnknownAtRule {
            name,
            value,
            body,
            span: self.toks.span_from(start),
        }))
    }

    // ------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------

    fn parse_silent_comment(&mut self) -> ParseResult<Stmt> {
        let start = self.toks.cursor();
        debug_assert!(self.next_matches("//"));
        self.toks.next();
        self.toks.next();

        let mut buffer = String::new();

        while let Some(tok) = self.toks.next() {
            if tok.kind == '\n' {
                break;
            }

            buffer.push(tok.kind);
        }

        self.whitespace_without_comments();

        Ok(Stmt::SilentComment(SilentComment {
            text: buffer,
            span: self.toks.span_from(start),
        }))
    }

    fn parse_loud_comment(&mut self) -> ParseResult<LoudComment> {
        let start = self.toks.cursor();
        self.expect_char('/')?;
        self.expect_char('*')?;

        let mut buffer = Interpolation::plain("/*".to_owned());

        while let Some(tok) = self.toks.peek() {
            match tok.kind {
                '#' => {
                    if matches!(self.toks.peek_n(1), Some(Token { kind: '{', .. })) {
                        buffer.append(self.parse_single_interpolation()?);
                    } else {
                        self.toks.next();
                        buffer.push_char(tok.kind);
                    }
                }
                '*' => {
                    self.toks.next();
                    buffer.push_char(tok.kind);

                    if self.scan_char('/') {
                        buffer.push_char('/');

                        return Ok(LoudComment {
                            text: buffer,
                            span: self.toks.span_from(start),
                        });
                    }
                }
                _ => {
                    self.toks.next();
                    buffer.push_char(tok.kind);
                }
            }
        }

        Err(("expected more input.", self.toks.current_span()).into())
    }

    // ------------------------------------------------------------------
    // Interpolation machinery
    // ------------------------------------------------------------------

    /// Parse a `#{…}` and return its inner expression.
    pub(crate) fn parse_interpolation_expr(&mut self) -> ParseResult<Spanned<Expr>> {
        self.expect_char('#')?;
        self.expect_char('{')?;
        self.whitespace()?;

        if self.toks.next_char_is('}') {
            return Err(("Expected expression.", self.toks.current_span()).into());
        }

        let contents = self.parse_expression(None)?;
        self.expect_char('}')?;

        Ok(contents)
    }

    pub(crate) fn parse_single_interpolation(&mut self) -> ParseResult<Interpolation> {
        Ok(Interpolation::from_expr(self.parse_interpolation_expr()?))
    }

    pub(crate) fn looking_at_interpolated_identifier(&self) -> bool {
        let first = match self.toks.peek() {
            Some(Token { kind: '\\', .. }) => return true,
            Some(Token { kind: '#', .. }) => {
                return matches!(self.toks.peek_n(1), Some(Token { kind: '{', .. }))
            }
            Some(Token { kind, .. }) if crate::utils::is_name_start(kind) => return true,
            Some(tok) => tok,
            None => return false,
        };

        if first.kind != '-' {
            return false;
        }

        match self.toks.peek_n(1) {
            Some(Token { kind: '#', .. }) => {
                matches!(self.toks.peek_n(2), Some(Token { kind: '{', .. }))
            }
            Some(Token {
                kind: '\\' | '-', ..
            }) => true,
            Some(Token { kind, .. }) => crate::utils::is_name_start(kind),
            None => false,
        }
    }

    fn looking_at_interpolated_identifier_body(&self) -> bool {
        match self.toks.peek() {
            Some(Token { kind: '\\', .. }) => true,
            Some(Token { kind: '#', .. }) => {
                matches!(self.toks.peek_n(1), Some(Token { kind: '{', .. }))
            }
            Some(Token { kind, .. }) => crate::utils::is_name(kind),
            None => false,
        }
    }

    pub(crate) fn parse_interpolated_identifier(&mut self) -> ParseResult<Interpolation> {
        let mut buffer = Interpolation::new();

        if self.scan_char('-') {
            buffer.push_char('-');

            if self.scan_char('-') {
                buffer.push_char('-');
                self.parse_interpolated_identifier_body(&mut buffer)?;
                return Ok(buffer);
            }
        }

        match self.toks.peek() {
            Some(tok) if crate::utils::is_name_start(tok.kind) => {
                buffer.push_char(tok.kind);
                self.toks.next();
            }
            Some(Token { kind: '\\', .. }) => {
                buffer.push_str(&self.parse_escape(true)?);
            }
            Some(Token { kind: '#', .. })
                if matches!(self.toks.peek_n(1), Some(Token { kind: '{', .. })) =>
            {
                buffer.append(self.parse_single_interpolation()?);
            }
            Some(..) | None => {
                return Err(("Expected identifier.", self.toks.current_span()).into())
            }
        }

        self.parse_interpolated_identifier_body(&mut buffer)?;

        Ok(buffer)
    }

    fn parse_interpolated_identifier_body(
        &mut self,
        buffer: &mut Interpolation,
    ) -> ParseResult<()> {
        while let Some(next) = self.toks.peek() {
            match next.kind {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' | '\u{80}'..=std::char::MAX => {
                    buffer.push_char(next.kind);
                    self.toks.next();
                }
                '\\' => {
                    buffer.push_str(&self.parse_escape(false)?);
                }
                '#' if matches!(self.toks.peek_n(1), Some(Token { kind: '{', .. })) => {
                    buffer.append(self.parse_single_interpolation()?);
                }
                _ => break,
            }
        }

        Ok(())
    }

    pub(crate) fn parse_interpolated_string(&mut self) -> ParseResult<Spanned<StringExpr>> {
        let start = self.toks.cursor();
        let quote = match self.toks.next() {
            Some(Token {
                kind: kind @ ('"' | '\''),
                ..
            }) => kind,
            Some(..) | None => unreachable!("Expected string."),
        };

        let mut buffer = Interpolation::new();
        let mut found_closing_quote = false;

        while let Some(next) = self.toks.peek() {
            match next.kind {
                c if c == quote => {
                    self.toks.next();
                    found_closing_quote = true;
                    break;
                }
                '\n' => break,
                '\\' => match self.toks.peek_n(1) {
                    Some(Token { kind: '\n', .. }) => {
                        self.toks.next();
                        self.toks.next();
                    }
                    _ => buffer.push_char(self.consume_escaped_char()?),
                },
                '#' => {
                    if matches!(self.toks.peek_n(1), Some(Token { kind: '{', .. })) {
                        buffer.append(self.parse_single_interpolation()?);
                    } else {
                        self.toks.next();
                        buffer.push_char(next.kind);
                    }
                }
                _ => {
                    buffer.push_char(next.kind);
                    self.toks.next();
                }
            }
        }

        if !found_closing_quote {
            return Err((format!("Expected {}.", quote), self.toks.current_span()).into());
        }

        Ok(Spanned {
            node: StringExpr(buffer, QuoteKind::Quoted),
            span: self.toks.span_from(start),
        })
    }

    /// The bracket-aware state machine for raw declaration values: custom
    /// properties, special-function arguments, and import modifiers.
    ///
    /// Consumes anything balanced, tracking `()`, `[]`, and `{}` scopes;
    /// a top-level `;` (without `allow_semicolon`), top-level `:` (without
    /// `allow_colon`), or unmatched closer terminates. Quoted strings and
    /// `#{…}` pass through with interpolation intact.
    pub(crate) fn parse_interpolated_declaration_value(
        &mut self,
        allow_semicolon: bool,
        allow_empty: bool,
        allow_colon: bool,
    ) -> ParseResult<Interpolation> {
        let mut buffer = Interpolation::new();

        let mut brackets = Vec::new();
        let mut wrote_newline = false;

        while let Some(tok) = self.toks.peek() {
            match tok.kind {
                '\\' => {
                    buffer.push_str(&self.parse_escape(true)?);
                    wrote_newline = false;
                }
                '"' | '\'' => {
                    let string = self.parse_interpolated_string()?;
                    buffer.append(string.node.as_interpolation());
                    wrote_newline = false;
                }
                '/' => {
                    if matches!(self.toks.peek_n(1), Some(Token { kind: '*', .. })) {
                        let comment = self.fallible_raw_text(Self::skip_loud_comment)?;
                        buffer.push_str(&comment);
                    } else {
                        self.toks.next();
                        buffer.push_char(tok.kind);
                    }

                    wrote_newline = false;
                }
                '#' => {
                    if matches!(self.toks.peek_n(1), Some(Token { kind: '{', .. })) {
                        // A full interpolated identifier is parsed here so
                        // that `#{…}--1` keeps its trailing text.
                        buffer.append(self.parse_interpolated_identifier()?);
                    } else {
                        self.toks.next();
                        buffer.push_char(tok.kind);
                    }

                    wrote_newline = false;
                }
                ' ' | '\t' => {
                    if wrote_newline
                        || !matches!(
                            self.toks.peek_n(1),
                            Some(Token {
                                kind: ' ' | '\t' | '\n',
                                ..
                            })
                        )
                    {
                        buffer.push_char(tok.kind);
                    }

                    self.toks.next();
                }
                '\n' => {
                    if !matches!(self.toks.peek_behind(1), Some(Token { kind: '\n', .. })) {
                        buffer.push_char('\n');
                    }
                    self.toks.next();
                    wrote_newline = true;
                }
                '(' | '{' | '[' => {
                    self.toks.next();
                    buffer.push_char(tok.kind);
                    brackets.push(crate::utils::opposite_bracket(tok.kind));
                    wrote_newline = false;
                }
                ')' | '}' | ']' => {
                    if brackets.is_empty() {
                        break;
                    }
                    buffer.push_char(tok.kind);
                    self.expect_char(brackets.pop().unwrap())?;
                    wrote_newline = false;
                }
                ';' => {
                    if !allow_semicolon && brackets.is_empty() {
                        break;
                    }
                    buffer.push_char(tok.kind);
                    self.toks.next();
                    wrote_newline = false;
                }
                ':' => {
                    if !allow_colon && brackets.is_empty() {
                        break;
                    }
                    buffer.push_char(tok.kind);
                    self.toks.next();
                    wrote_newline = false;
                }
                'u' | 'U' => {
                    let before_url = self.toks.cursor();

                    if !self.scan_identifier("url", false)? {
                        buffer.push_char(tok.kind);
                        self.toks.next();
                        wrote_newline = false;
                        continue;
                    }

                    match self.try_url_contents(None)? {
                        Some(contents) => {
                            buffer.append(contents);
                        }
                        None => {
                            self.toks.set_cursor(before_url);
                            buffer.push_char(tok.kind);
                            self.toks.next();
                        }
                    }

                    wrote_newline = false;
                }
                _ => {
                    if self.looking_at_identifier() {
                        buffer.push_str(&self.parse_identifier(false, false)?);
                    } else {
                        buffer.push_char(tok.kind);
                        self.toks.next();
                    }
                    wrote_newline = false;
                }
            }
        }

        if let Some(&last) = brackets.last() {
            self.expect_char(last)?;
        }

        // Whitespace alone is not a value.
        let is_blank = buffer.parts.iter().all(
            |part| matches!(part, InterpolationPart::Text(text) if text.trim().is_empty()),
        );
        if !allow_empty && is_blank {
            return Err(("Expected token.", self.toks.current_span()).into());
        }

        Ok(buffer)
    }

    /// Reassemble the region up to `end` as one unquoted string schema.
    /// Used when a value lookahead reports interpolation, so that
    /// `url-#{$x}-suffix` stays a single value.
    fn parse_value_schema(&mut self, end: usize) -> ParseResult<Spanned<Expr>> {
        let start = self.toks.cursor();
        let mut buffer = Interpolation::new();

        while self.toks.cursor() < end {
            match self.toks.peek() {
                Some(Token { kind: '#', .. })
                    if matches!(self.toks.peek_n(1), Some(Token { kind: '{', .. })) =>
                {
                    buffer.append(self.parse_single_interpolation()?);
                }
                Some(Token { kind: '"' | '\'', .. }) => {
                    let string = self.parse_interpolated_string()?;
                    buffer.append(string.node.as_interpolation());
                }
                Some(Token { kind: '\\', .. }) => {
                    buffer.push_str(&self.parse_escape(true)?);
                }
                Some(tok) => {
                    self.toks.next();
                    buffer.push_char(tok.kind);
                }
                None => break,
            }
        }

        let span = self.toks.span_from(start);

        Ok(Expr::String(StringExpr(buffer, QuoteKind::None), span).span(span))
    }

    /// Consume almost any value-shaped run of tokens as an interpolation,
    /// stopping at `!`, `;`, `{`, or `}`. Used for unknown at-rule values.
    fn almost_any_value(&mut self) -> ParseResult<Interpolation> {
        let mut buffer = Interpolation::new();

        while let Some(tok) = self.toks.peek() {
            match tok.kind {
                '\\' => {
                    // A literal backslash, because this text is re-parsed.
                    buffer.push_char(tok.kind);
                    self.toks.next();
                    match self.toks.next() {
                        Some(tok) => buffer.push_char(tok.kind),
                        None => {
                            return Err(
                                ("expected more input.", self.toks.current_span()).into()
                            )
                        }
                    }
                }
                '"' | '\'' => {
                    let string = self.parse_interpolated_string()?;
                    buffer.append(string.node.as_interpolation());
                }
                '/' => {
                    let comment_start = self.toks.cursor();
                    if self.scan_comment()? {
                        buffer.push_str(&self.toks.raw_text(comment_start));
                    } else {
                        self.toks.next();
                        buffer.push_char(tok.kind);
                    }
                }
                '#' => {
                    if matches!(self.toks.peek_n(1), Some(Token { kind: '{', .. })) {
                        buffer.append(self.parse_interpolated_identifier()?);
                    } else {
                        self.toks.next();
                        buffer.push_char(tok.kind);
                    }
                }
                '!' | ';' | '{' | '}' => break,
                'u' | 'U' => {
                    let before_url = self.toks.cursor();
                    if !self.scan_identifier("url", false)? {
                        self.toks.next();
                        buffer.push_char(tok.kind);
                        continue;
                    }

                    match self.try_url_contents(None)? {
                        Some(contents) => buffer.append(contents),
                        None => {
                            self.toks.set_cursor(before_url);
                            self.toks.next();
                            buffer.push_char(tok.kind);
                        }
                    }
                }
                _ => {
                    if self.looking_at_identifier() {
                        buffer.push_str(&self.parse_identifier(false, false)?);
                    } else {
                        self.toks.next();
                        buffer.push_char(tok.kind);
                    }
                }
            }
        }

        Ok(buffer)
    }

    /// Try to consume raw `url(…)` contents as an interpolation, with
    /// backtracking to a function-call parse when the contents are not
    /// URL-shaped.
    pub(crate) fn try_url_contents(
        &mut self,
        name: Option<&str>,
    ) -> ParseResult<Option<Interpolation>> {
        let start = self.toks.cursor();
        if !self.scan_char('(') {
            return Ok(None);
        }
        self.whitespace_without_comments();

        let mut buffer = Interpolation::new();
        buffer.push_str(name.unwrap_or("url"));
        buffer.push_char('(');

        while let Some(next) = self.toks.peek() {
            match next.kind {
                '\\' => buffer.push_str(&self.parse_escape(false)?),
                '!' | '%' | '&' | '*'..='~' | '\u{80}'..=char::MAX => {
                    self.toks.next();
                    buffer.push_char(next.kind);
                }
                '#' => {
                    if matches!(self.toks.peek_n(1), Some(Token { kind: '{', .. })) {
                        buffer.append(self.parse_single_interpolation()?);
                    } else {
                        self.toks.next();
                        buffer.push_char(next.kind);
                    }
                }
                ')' => {
                    self.toks.next();
                    buffer.push_char(next.kind);
                    return Ok(Some(buffer));
                }
                ' ' | '\t' | '\n' => {
                    self.whitespace_without_comments();
                    if !self.toks.next_char_is(')') {
                        break;
                    }
                }
                _ => break,
            }
        }

        self.toks.set_cursor(start);

        Ok(None)
    }
}

/// Whether an `@import` target stays in the output as a plain CSS import.
fn is_css_import_url(url: &str) -> bool {
    url.ends_with(".css")
        || url.starts_with("http://")
        || url.starts_with("https://")
        || url.starts_with("//")
}
