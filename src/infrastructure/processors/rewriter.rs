use crate::infrastructure::processors::scanner::RequireCall;
use oxc_span::Span;

pub const LOADER_FUNCTION: &str = "__tinypack_require__";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Span,
    pub replacement: String,
}

/// Span edits computed from a scan, applied in one pass afterwards
#[derive(Debug, Default)]
pub struct RewritePlan {
    edits: Vec<Edit>,
}

impl RewritePlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point a `require('<specifier>')` call at the loader with a module id
    pub fn redirect(&mut self, call: &RequireCall, module_id: &str) {
        self.edits.push(Edit {
            span: call.callee_span,
            replacement: LOADER_FUNCTION.to_string(),
        });
        self.edits.push(Edit {
            span: call.argument_span,
            replacement: quote(module_id),
        });
    }

    /// Turn a leading `#!` line into a line comment so the module can be wrapped
    pub fn comment_out_hashbang(&mut self, hashbang: Span) {
        self.edits.push(Edit {
            span: Span::new(hashbang.start, hashbang.start + 2),
            replacement: "//".to_string(),
        });
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Edits never overlap: a callee and its literal argument are disjoint.
    pub fn apply(mut self, source: &str) -> String {
        self.edits.sort_by_key(|edit| std::cmp::Reverse(edit.span.start));

        let mut output = source.to_string();
        for edit in &self.edits {
            let range = edit.span.start as usize..edit.span.end as usize;
            output.replace_range(range, &edit.replacement);
        }
        output
    }
}

/// JSON string quoting is valid JS string literal syntax
pub fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}
