//! The compile step applied to document bodies during fetch

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Options passed through to the compiler
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Produce compact output
    pub minify: bool,
    /// Compiler specific settings
    pub options: Map<String, Value>,
}

/// Turns document source text into executable output
///
/// Implementations must be deterministic: identical source and options
/// give identical output.
#[async_trait]
pub trait Compiler: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    async fn compile(&self, source: &str, options: &CompileOptions) -> Result<String>;
}

/// Emits a JavaScript module whose default export is the source text
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralCompiler;

#[async_trait]
impl Compiler for LiteralCompiler {
    fn name(&self) -> &str {
        "literal"
    }

    async fn compile(&self, source: &str, options: &CompileOptions) -> Result<String> {
        let literal = serde_json::to_string(source)?;
        if options.minify {
            Ok(format!("export default {};", literal))
        } else {
            Ok(format!("const content = {};\n\nexport default content;\n", literal))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_literal_compiler_escapes_source() {
        let compiler = LiteralCompiler;
        let output = compiler
            .compile("# Title\n\"quoted\"", &CompileOptions::default())
            .await
            .unwrap();
        assert_eq!(
            output,
            "const content = \"# Title\\n\\\"quoted\\\"\";\n\nexport default content;\n"
        );
    }

    #[tokio::test]
    async fn test_literal_compiler_minify_and_determinism() {
        let compiler = LiteralCompiler;
        let options = CompileOptions {
            minify: true,
            ..Default::default()
        };
        let first = compiler.compile("body", &options).await.unwrap();
        let second = compiler.compile("body", &options).await.unwrap();
        assert_eq!(first, "export default \"body\";");
        assert_eq!(first, second);
    }
}
