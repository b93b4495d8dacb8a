//! Template engine for outbound email bodies.
//!
//! Provides variable expansion (`{{name}}`) over templates loaded from a
//! directory or from strings. `\{{` outputs a literal `{{`. Values are
//! substituted verbatim; callers rendering HTML escape values first with
//! [`html_escape`].
//!
//! # Example
//!
//! ```
//! use buzon::template::TemplateEngine;
//! use std::collections::HashMap;
//!
//! let mut engine = TemplateEngine::new();
//! engine.load("greeting", "Hola, {{name}}!").unwrap();
//!
//! let mut vars = HashMap::new();
//! vars.insert("name".to_string(), "Mundo".to_string());
//!
//! let result = engine.render("greeting", &vars).unwrap();
//! assert_eq!(result, "Hola, Mundo!");
//! ```

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

/// Template-related errors.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Template not found.
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Variable not found in the render context.
    #[error("Variable not found: {0}")]
    VariableNotFound(String),

    /// I/O error while loading templates.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// A parsed template segment.
#[derive(Debug, Clone, PartialEq)]
enum Segment {
    /// Literal text emitted as-is.
    Literal(String),
    /// Variable reference replaced at render time.
    Var(String),
}

/// Parse a template string into segments.
fn parse(content: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut rest = content;

    while let Some(idx) = rest.find("{{") {
        // An escaped tag keeps the braces as literal output.
        if idx > 0 && rest.as_bytes()[idx - 1] == b'\\' {
            segments.push(Segment::Literal(format!("{}{{{{", &rest[..idx - 1])));
            rest = &rest[idx + 2..];
            continue;
        }

        if idx > 0 {
            segments.push(Segment::Literal(rest[..idx].to_string()));
        }

        let after = &rest[idx + 2..];
        let close = after
            .find("}}")
            .ok_or_else(|| TemplateError::Parse("unclosed variable tag".to_string()))?;
        let name = after[..close].trim();
        if name.is_empty() {
            return Err(TemplateError::Parse("empty variable name".to_string()));
        }
        segments.push(Segment::Var(name.to_string()));
        rest = &after[close + 2..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Literal(rest.to_string()));
    }

    Ok(segments)
}

/// Render parsed segments against a variable map.
fn render_segments(segments: &[Segment], vars: &HashMap<String, String>) -> Result<String> {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Var(name) => {
                let value = vars
                    .get(name)
                    .ok_or_else(|| TemplateError::VariableNotFound(name.clone()))?;
                out.push_str(value);
            }
        }
    }
    Ok(out)
}

/// Escape a value for interpolation into HTML content.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Template engine for parsing and rendering templates.
#[derive(Debug, Default)]
pub struct TemplateEngine {
    /// Parsed templates by name.
    templates: HashMap<String, Vec<Segment>>,
}

impl TemplateEngine {
    /// Create a new template engine.
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Load a template from a string.
    pub fn load(&mut self, name: impl Into<String>, content: &str) -> Result<()> {
        let segments = parse(content)?;
        self.templates.insert(name.into(), segments);
        Ok(())
    }

    /// Load every `.html` and `.txt` file in a directory.
    ///
    /// Templates are named by file stem. Returns the number of templates
    /// loaded.
    pub fn load_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<usize> {
        let mut loaded = 0;
        for entry in std::fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            let is_template = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("html") | Some("txt")
            );
            if !path.is_file() || !is_template {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let content = std::fs::read_to_string(&path)?;
            self.load(name.to_string(), &content)?;
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Check if a template is loaded.
    pub fn has_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Render a template with the given variables.
    pub fn render(&self, name: &str, vars: &HashMap<String, String>) -> Result<String> {
        let segments = self
            .templates
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        render_segments(segments, vars)
    }

    /// Render a template string directly without loading.
    pub fn render_str(content: &str, vars: &HashMap<String, String>) -> Result<String> {
        render_segments(&parse(content)?, vars)
    }
}
