use crate::core::models::Chunk;
use crate::infrastructure::processors::rewriter::{quote, LOADER_FUNCTION};
use crate::utils::Timer;

const MODULES_VAR: &str = "__tinypack_modules__";
const CACHE_VAR: &str = "__tinypack_module_cache__";

/// Serializes a chunk into a standalone script: a registry of module
/// functions, an instance cache, the loader, and an isolated entry call.
///
/// Module sources are embedded verbatim (no re-indentation) so template
/// literals and line-sensitive code keep their meaning.
pub struct BundleEmitter;

impl BundleEmitter {
    pub fn new() -> Self {
        Self
    }

    pub fn emit(&self, chunk: &Chunk) -> String {
        let _timer = Timer::start(&format!("Emitting chunk {}", chunk.name));

        let mut bundle = String::new();
        bundle.push_str(&format!("// tinypack chunk: {}\n", chunk.name));
        bundle.push_str("(() => {\n");

        bundle.push_str(&format!("  var {} = {{\n", MODULES_VAR));
        let registry: Vec<String> = chunk
            .modules
            .iter()
            .map(|module| {
                format!(
                    "    {}: (module, exports, {}) => {{\n{}\n    }}",
                    quote(&module.id),
                    LOADER_FUNCTION,
                    module.source.trim_end()
                )
            })
            .collect();
        bundle.push_str(&registry.join(",\n"));
        bundle.push_str("\n  };\n\n");

        bundle.push_str(&format!("  var {} = {{}};\n\n", CACHE_VAR));
        bundle.push_str(&Self::loader());

        // The entry runs in its own scope so chunks sharing a global don't collide.
        bundle.push_str("  (() => {\n");
        bundle.push_str(&format!(
            "    {}({});\n",
            LOADER_FUNCTION,
            quote(&chunk.entry_module.id)
        ));
        bundle.push_str("  })();\n");
        bundle.push_str("})();\n");

        bundle
    }

    fn loader() -> String {
        // The cache entry exists before the module body runs, so a cycle
        // observes partially populated exports instead of recursing.
        format!(
            r#"  function {loader}(moduleId) {{
    var cachedModule = {cache}[moduleId];
    if (cachedModule !== undefined) {{
      return cachedModule.exports;
    }}
    var module = ({cache}[moduleId] = {{
      exports: {{}}
    }});
    {modules}[moduleId](module, module.exports, {loader});
    return module.exports;
  }}

"#,
            loader = LOADER_FUNCTION,
            cache = CACHE_VAR,
            modules = MODULES_VAR,
        )
    }
}

impl Default for BundleEmitter {
    fn default() -> Self {
        Self::new()
    }
}
