use crate::utils::{Result, TinypackError};
use oxc_allocator::Allocator;
use oxc_ast::ast::{Argument, CallExpression, Expression};
use oxc_ast_visit::{walk, Visit};
use oxc_parser::Parser;
use oxc_span::{SourceType, Span};
use std::path::Path;

pub const REQUIRE_CALLEE: &str = "require";

/// One `require('<literal>')` call found in a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireCall {
    pub specifier: String,
    pub callee_span: Span,
    pub argument_span: Span,
}

/// Everything the graph builder needs from one parse of a module
#[derive(Debug, Clone, Default)]
pub struct ScannedModule {
    pub calls: Vec<RequireCall>,
    /// `#!...` line; only legal at the start of a script, so it cannot be wrapped as-is
    pub hashbang: Option<Span>,
}

/// Finds dependency references in module source.
///
/// Only calls whose first argument is a string literal are reported;
/// `require(name)` or `require('a' + b)` stay untouched and create no edge.
pub struct DependencyScanner {
    callee: String,
}

impl DependencyScanner {
    pub fn new() -> Self {
        Self::with_callee(REQUIRE_CALLEE)
    }

    pub fn with_callee(callee: impl Into<String>) -> Self {
        Self {
            callee: callee.into(),
        }
    }

    pub fn scan(&self, source: &str, path: &Path) -> Result<Vec<RequireCall>> {
        Ok(self.scan_module(source, path)?.calls)
    }

    pub fn scan_module(&self, source: &str, path: &Path) -> Result<ScannedModule> {
        let allocator = Allocator::default();
        let source_type = SourceType::from_path(path).unwrap_or_default();

        let parsed = Parser::new(&allocator, source, source_type).parse();

        if let Some(error) = parsed.errors.first() {
            return Err(TinypackError::parse(path, error.to_string()));
        }
        if parsed.panicked {
            return Err(TinypackError::parse(path, "parser aborted"));
        }

        let mut collector = RequireCollector {
            callee: &self.callee,
            calls: Vec::new(),
        };
        collector.visit_program(&parsed.program);

        Ok(ScannedModule {
            calls: collector.calls,
            hashbang: parsed.program.hashbang.as_ref().map(|hashbang| hashbang.span),
        })
    }
}

impl Default for DependencyScanner {
    fn default() -> Self {
        Self::new()
    }
}

struct RequireCollector<'s> {
    callee: &'s str,
    calls: Vec<RequireCall>,
}

impl<'a> Visit<'a> for RequireCollector<'_> {
    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if let Expression::Identifier(ident) = &call.callee {
            if ident.name.as_str() == self.callee {
                if let Some(Argument::StringLiteral(literal)) = call.arguments.first() {
                    self.calls.push(RequireCall {
                        specifier: literal.value.to_string(),
                        callee_span: ident.span,
                        argument_span: literal.span,
                    });
                }
            }
        }
        walk::walk_call_expression(self, call);
    }
}
