use crate::env::Environment;
use crate::partition::Export;
use crate::util::quote_literal;

/// Reserved build flag; set to [`STRIP_LITERALS_SENTINEL`] it switches
/// rendering to [`RenderMode::Generic`].
pub const STRIP_LITERALS_FLAG: &str = "VERCEL";
pub const STRIP_LITERALS_SENTINEL: &str = "1";

/// How export types are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Union of single-quoted literal values.
    #[default]
    Literal,
    /// Plain `string`, keeping values out of generated code.
    Generic,
}

impl RenderMode {
    pub fn from_env(env: &Environment) -> Self {
        if env.get(STRIP_LITERALS_FLAG) == Some(STRIP_LITERALS_SENTINEL) {
            RenderMode::Generic
        } else {
            RenderMode::Literal
        }
    }
}

/// Render one `export const` line.
pub fn render_export(export: &Export, mode: RenderMode) -> String {
    let ty = match mode {
        RenderMode::Literal => export
            .values
            .iter()
            .map(|v| quote_literal(v))
            .collect::<Vec<_>>()
            .join(" | "),
        RenderMode::Generic => "string".to_string(),
    };
    format!(
        "export const {key} = process.env.{key} as {ty};",
        key = export.key
    )
}

/// Render a module: one export per line, separated by a blank line.
pub fn render(exports: &[Export], mode: RenderMode) -> String {
    exports
        .iter()
        .map(|export| render_export(export, mode))
        .collect::<Vec<_>>()
        .join("\n\n")
}
