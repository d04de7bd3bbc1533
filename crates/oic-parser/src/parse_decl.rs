//! Top-level item parsing.
//!
//! Recognises three item forms and skips everything else:
//!
//! ```text
//! extern <type> <symbol>(<params>);
//! EXTERN_FN(<namespace>, <type>, <method>[, <params>...]);
//! struct MODULE_METADATA <binding> = { ... };
//! ```
//!
//! Items inside `extern "C" { ... }` are parsed like top-level items.

use oic_lexer::token::{Token, TokenKind};
use oic_types::ast::*;
use oic_types::{ErrorCode, Span};

use crate::parser::Parser;
use crate::{EXTERN_FN_MACRO, METADATA_STRUCT};

/// Type words that can end a parameter without a name (`unsigned int`).
const TYPE_WORDS: &[&str] = &[
    "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned", "_Bool",
    "bool", "const", "volatile", "int8_t", "int16_t", "int32_t", "int64_t", "uint8_t",
    "uint16_t", "uint32_t", "uint64_t", "size_t", "intptr_t", "uintptr_t",
];

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Unit
    // ══════════════════════════════════════════════════════════════════════════

    pub(crate) fn parse_unit(&mut self) -> SourceUnit {
        let start = self.current_span();
        let mut items = Vec::new();

        while !self.at_end() && !self.too_many_errors() {
            match self.peek_kind() {
                TokenKind::Extern => {
                    if let Some(decl) = self.parse_extern() {
                        items.push(Item::Extern(decl));
                    }
                }
                TokenKind::Identifier(_) if self.at_extern_fn() => {
                    if let Some(decl) = self.parse_extern_fn() {
                        items.push(Item::Extern(decl));
                    }
                }
                TokenKind::Identifier(name)
                    if (name == "const" || name == "static")
                        && self.struct_follows_qualifiers() =>
                {
                    self.advance();
                }
                TokenKind::Struct => {
                    if let Some(decl) = self.parse_struct_item() {
                        items.push(Item::ModuleMetadata(decl));
                    }
                }
                TokenKind::Semicolon => {
                    self.advance();
                }
                TokenKind::RBrace if self.linkage_depth > 0 => {
                    self.advance();
                    self.linkage_depth -= 1;
                }
                _ => self.skip_item(),
            }
        }

        if self.linkage_depth > 0 && !self.too_many_errors() {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                "unclosed 'extern \"C\" {' block before end of file",
            );
        }

        SourceUnit {
            items,
            span: start.merge(self.current_span()),
        }
    }

    fn at_extern_fn(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Identifier(name) if name == EXTERN_FN_MACRO)
            && *self.look_ahead(1) == TokenKind::LParen
    }

    fn struct_follows_qualifiers(&self) -> bool {
        let mut n = 1;
        loop {
            match self.look_ahead(n) {
                TokenKind::Struct => return true,
                TokenKind::Identifier(q) if q == "const" || q == "static" => n += 1,
                _ => return false,
            }
        }
    }

    /// Skip one item we do not model: up to the next top-level `;`, or a
    /// top-level `{ ... }` group plus an optional trailing `;`.
    fn skip_item(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek_kind() {
                TokenKind::Eof => return,
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                    depth += 1;
                    self.advance();
                }
                // The `}` of an enclosing linkage block ends the item.
                TokenKind::RBrace if depth == 0 && self.linkage_depth > 0 => return,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace if depth == 0 => {
                    let kind = self.peek_kind().clone();
                    self.error_at_current(
                        ErrorCode::UNEXPECTED_TOKEN,
                        format!("unbalanced '{kind}'"),
                    );
                    self.advance();
                    return;
                }
                TokenKind::RBrace => {
                    depth -= 1;
                    self.advance();
                    if depth == 0 {
                        self.eat(&TokenKind::Semicolon);
                        return;
                    }
                }
                TokenKind::RParen | TokenKind::RBracket => {
                    depth -= 1;
                    self.advance();
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════════
    // extern prototypes
    // ══════════════════════════════════════════════════════════════════════════

    /// `extern <type> <symbol>(<params>);`
    fn parse_extern(&mut self) -> Option<ExternDecl> {
        let start = self.advance().span; // `extern`

        // `extern "C" { ... }` opens a block whose items are parsed as if at
        // top level; `extern "C" <prototype>;` is an ordinary prototype.
        if matches!(self.peek_kind(), TokenKind::StringLiteral(_)) {
            self.advance();
            if self.eat(&TokenKind::LBrace) {
                self.linkage_depth += 1;
                return None;
            }
            if self.at_extern_fn() {
                return None;
            }
        }

        let mut head = Vec::new();
        loop {
            match self.peek_kind() {
                TokenKind::LParen => break,
                // `extern int counter;` declares data, not a function.
                TokenKind::Semicolon => {
                    self.advance();
                    return None;
                }
                TokenKind::Eof | TokenKind::LBrace | TokenKind::RBrace => {
                    self.error_at_current(
                        ErrorCode::MALFORMED_DECLARATION,
                        format!("expected '(' in extern declaration, got '{}'", self.peek_kind()),
                    );
                    self.synchronize();
                    return None;
                }
                _ => head.push(self.advance()),
            }
        }

        let symbol = match head.split_last() {
            Some((
                Token {
                    kind: TokenKind::Identifier(name),
                    span,
                },
                ret,
            )) if !ret.is_empty() => {
                let ident = Ident::new(name.clone(), *span);
                let ret = render_type(ret);
                (ident, ret)
            }
            _ => {
                let span = head.first().map(|t| t.span).unwrap_or(start);
                self.error_at(
                    ErrorCode::MALFORMED_DECLARATION,
                    "extern declaration needs a return type followed by a symbol name",
                    span,
                );
                self.synchronize();
                return None;
            }
        };

        self.advance(); // `(`
        let groups = self.comma_group()?;
        let (params, variadic) = self.params_from_groups(groups);

        self.finish_declaration()?;
        let (ident, ret) = symbol;
        Some(ExternDecl {
            symbol: SymbolSpelling::Flat(ident),
            ret,
            params,
            variadic,
            span: start.merge(self.previous_span()),
        })
    }

    // ══════════════════════════════════════════════════════════════════════════
    // EXTERN_FN helper form
    // ══════════════════════════════════════════════════════════════════════════

    /// `EXTERN_FN(<namespace>, <type>, <method>[, <params>...]);`
    fn parse_extern_fn(&mut self) -> Option<ExternDecl> {
        let start = self.advance().span; // EXTERN_FN
        self.advance(); // `(`
        let mut args = self.comma_group()?.into_iter();

        let call_span = start.merge(self.previous_span());
        let (Some(ns), Some(ret), Some(method)) = (args.next(), args.next(), args.next()) else {
            self.error_at(
                ErrorCode::MALFORMED_DECLARATION,
                format!("{EXTERN_FN_MACRO} expects a namespace, a return type and a method name"),
                call_span,
            );
            self.synchronize();
            return None;
        };

        let namespace = self.single_identifier(&ns, "namespace", call_span)?;
        if ret.is_empty() {
            self.error_at(
                ErrorCode::MALFORMED_DECLARATION,
                format!("{EXTERN_FN_MACRO} return type is empty"),
                call_span,
            );
            self.synchronize();
            return None;
        }
        let ret = render_type(&ret);
        let method = self.single_identifier(&method, "method name", call_span)?;
        let (params, variadic) = self.params_from_groups(args.collect());

        self.finish_declaration()?;
        Some(ExternDecl {
            symbol: SymbolSpelling::Split { namespace, method },
            ret,
            params,
            variadic,
            span: start.merge(self.previous_span()),
        })
    }

    fn single_identifier(&mut self, tokens: &[Token], what: &str, fallback: Span) -> Option<Ident> {
        match tokens {
            [Token {
                kind: TokenKind::Identifier(name),
                span,
            }] => Some(Ident::new(name.clone(), *span)),
            _ => {
                let span = tokens.first().map(|t| t.span).unwrap_or(fallback);
                self.error_at(
                    ErrorCode::MALFORMED_DECLARATION,
                    format!("{EXTERN_FN_MACRO} {what} must be a single identifier"),
                    span,
                );
                self.synchronize();
                None
            }
        }
    }

    /// Expect the closing `;` of a prototype. A body is rejected and skipped.
    fn finish_declaration(&mut self) -> Option<()> {
        if self.check_exact(&TokenKind::LBrace) {
            self.error_at_current(
                ErrorCode::MALFORMED_DECLARATION,
                "foreign function declarations must not have a body",
            );
            self.skip_braces();
            self.eat(&TokenKind::Semicolon);
            return None;
        }
        if self.expect(&TokenKind::Semicolon).is_none() {
            self.synchronize();
            return None;
        }
        Some(())
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Parameters
    // ══════════════════════════════════════════════════════════════════════════

    fn params_from_groups(&mut self, groups: Vec<Vec<Token>>) -> (Vec<Param>, bool) {
        // `(void)` means no parameters.
        if let [only] = groups.as_slice() {
            if let [Token {
                kind: TokenKind::Identifier(v),
                ..
            }] = only.as_slice()
            {
                if v == "void" {
                    return (Vec::new(), false);
                }
            }
        }

        let count = groups.len();
        let mut params = Vec::new();
        let mut variadic = false;
        for (i, group) in groups.into_iter().enumerate() {
            match group.as_slice() {
                [Token {
                    kind: TokenKind::Ellipsis,
                    span,
                }] => {
                    if i + 1 != count {
                        self.error_at(
                            ErrorCode::MALFORMED_DECLARATION,
                            "'...' must be the last parameter",
                            *span,
                        );
                    }
                    variadic = true;
                }
                [] => {
                    self.error_at(
                        ErrorCode::MALFORMED_DECLARATION,
                        "empty parameter",
                        self.previous_span(),
                    );
                }
                tokens => params.push(parse_param(tokens)),
            }
        }
        (params, variadic)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // struct MODULE_METADATA
    // ══════════════════════════════════════════════════════════════════════════

    /// A `struct` item. Only an initialised `MODULE_METADATA` instance is
    /// kept; the struct definition and other structs are skipped.
    fn parse_struct_item(&mut self) -> Option<MetadataDecl> {
        let is_instance = matches!(self.look_ahead(1), TokenKind::Identifier(tag) if tag == METADATA_STRUCT)
            && matches!(self.look_ahead(2), TokenKind::Identifier(_))
            && *self.look_ahead(3) == TokenKind::Eq;
        if !is_instance {
            self.skip_item();
            return None;
        }

        let start = self.advance().span; // `struct`
        self.advance(); // tag
        let binding = self.expect_identifier()?;
        self.advance(); // `=`
        if self.expect(&TokenKind::LBrace).is_none() {
            self.synchronize();
            return None;
        }

        let fields = if self.check_exact(&TokenKind::Dot) {
            self.parse_designated_fields()?
        } else {
            MetadataFields::Positional(self.parse_positional_fields()?)
        };

        if self.expect(&TokenKind::Semicolon).is_none() {
            self.synchronize();
            return None;
        }
        Some(MetadataDecl {
            binding,
            fields,
            span: start.merge(self.previous_span()),
        })
    }

    /// `"a", "b", "c" }`
    fn parse_positional_fields(&mut self) -> Option<Vec<String>> {
        let mut values = Vec::new();
        loop {
            if self.eat(&TokenKind::RBrace) {
                return Some(values);
            }
            values.push(self.string_value()?);
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RBrace).or_else(|| {
                    self.synchronize();
                    None
                })?;
                return Some(values);
            }
        }
    }

    /// `.name = "a", .version = "b" }`
    fn parse_designated_fields(&mut self) -> Option<MetadataFields> {
        let mut values = Vec::new();
        loop {
            if self.eat(&TokenKind::RBrace) {
                return Some(MetadataFields::Designated(values));
            }
            if self.expect(&TokenKind::Dot).is_none() {
                self.synchronize();
                return None;
            }
            let field = self.expect_identifier()?;
            if self.expect(&TokenKind::Eq).is_none() {
                self.synchronize();
                return None;
            }
            let value = self.string_value()?;
            values.push((field, value));
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RBrace).or_else(|| {
                    self.synchronize();
                    None
                })?;
                return Some(MetadataFields::Designated(values));
            }
        }
    }

    /// One or more adjacent string literals, concatenated.
    fn string_value(&mut self) -> Option<String> {
        let mut value = match self.peek_kind() {
            TokenKind::StringLiteral(s) => s.clone(),
            other => {
                let message = format!("module metadata fields must be string literals, got '{other}'");
                self.error_at_current(ErrorCode::MALFORMED_DECLARATION, message);
                self.synchronize();
                return None;
            }
        };
        self.advance();
        while let TokenKind::StringLiteral(more) = self.peek_kind() {
            value.push_str(more);
            self.advance();
        }
        Some(value)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Free helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Render type tokens as text: `*` and brackets attach, everything else is
/// space separated (`const char*`, `uint8_t[4]`).
pub(crate) fn render_type(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut prev: Option<&TokenKind> = None;
    for token in tokens {
        let attach = matches!(
            token.kind,
            TokenKind::Star | TokenKind::LBracket | TokenKind::RBracket
        ) || matches!(prev, Some(TokenKind::LBracket));
        if !out.is_empty() && !attach {
            out.push(' ');
        }
        out.push_str(&token.kind.to_string());
        prev = Some(&token.kind);
    }
    out
}

/// Split one parameter's tokens into type and optional name.
fn parse_param(tokens: &[Token]) -> Param {
    let span = match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => first.span.merge(last.span),
        _ => Span::point(1, 1),
    };

    // Trailing array suffixes belong to the type: `uint8_t data[4]`.
    let mut end = tokens.len();
    while end > 0 && tokens[end - 1].kind == TokenKind::RBracket {
        match tokens[..end]
            .iter()
            .rposition(|t| t.kind == TokenKind::LBracket)
        {
            Some(open) => end = open,
            None => break,
        }
    }
    let suffix = &tokens[end..];

    if end >= 2 {
        if let TokenKind::Identifier(name) = &tokens[end - 1].kind {
            if !TYPE_WORDS.contains(&name.as_str()) {
                let mut ty = render_type(&tokens[..end - 1]);
                ty.push_str(&render_type(suffix));
                return Param {
                    ty,
                    name: Some(name.clone()),
                    span,
                };
            }
        }
    }
    Param {
        ty: render_type(tokens),
        name: None,
        span,
    }
}
