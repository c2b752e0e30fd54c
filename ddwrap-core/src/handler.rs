//! Handler reference parsing.
//!
//! A handler reference names a module and an exported function:
//!
//! ```text
//! src/handlers/user.create      -> module [src, handlers, user], method create
//! handlers.user.create          -> module [handlers, user],      method create
//! ```
//!
//! The method is always the token after the last `.`; the module path before
//! it may use `/` or `.` between segments. Import syntax is left to the
//! renderer, which asks for either [`ParsedReference::dotted_module`] or
//! [`ParsedReference::slashed_module`].

use std::fmt;

use thiserror::Error;

/// A handler reference split into module segments and a method name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReference {
    module: Vec<String>,
    method: String,
}

impl ParsedReference {
    /// Module path segments, outermost first.
    pub fn module_segments(&self) -> &[String] {
        &self.module
    }

    /// Exported function name.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// `dir.file` — Python import form.
    pub fn dotted_module(&self) -> String {
        self.module.join(".")
    }

    /// `dir/file` — relative require/import form.
    pub fn slashed_module(&self) -> String {
        self.module.join("/")
    }
}

impl fmt::Display for ParsedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.slashed_module(), self.method)
    }
}

/// Why a handler reference was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidHandler {
    #[error("handler '{0}' has no '.' separating module from method")]
    MissingSeparator(String),

    #[error("handler '{0}' has an empty method name")]
    EmptyMethod(String),

    #[error("handler '{0}' has a method name that is not an identifier")]
    BadMethodName(String),

    #[error("handler '{0}' has an empty, relative or malformed module segment")]
    BadModuleSegment(String),
}

/// `[A-Za-z_][A-Za-z0-9_]*`, Unicode letters included.
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Module segments end up inside string literals and import statements.
fn is_module_segment(s: &str) -> bool {
    !s.is_empty()
        && s != ".."
        && s.chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '@' | '$'))
}

/// Parse a raw handler string.
///
/// Never panics; a rejected reference is reported as [`InvalidHandler`] so the
/// caller can skip that one function.
pub fn parse_handler(raw: &str) -> Result<ParsedReference, InvalidHandler> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix("./").unwrap_or(trimmed);

    let Some((module, method)) = trimmed.rsplit_once('.') else {
        return Err(InvalidHandler::MissingSeparator(raw.to_owned()));
    };
    if method.is_empty() {
        return Err(InvalidHandler::EmptyMethod(raw.to_owned()));
    }
    if !is_identifier(method) {
        return Err(InvalidHandler::BadMethodName(raw.to_owned()));
    }

    let segments: Vec<String> = module.split(['/', '.']).map(str::to_owned).collect();
    if !segments.iter().all(|s| is_module_segment(s)) {
        return Err(InvalidHandler::BadModuleSegment(raw.to_owned()));
    }

    Ok(ParsedReference {
        module: segments,
        method: method.to_owned(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("mydir/func.myhandler", &["mydir", "func"], "myhandler")]
    #[case("mydir.func.myhandler", &["mydir", "func"], "myhandler")]
    #[case("my.myhandler", &["my"], "myhandler")]
    #[case("./src/handler.main", &["src", "handler"], "main")]
    #[case("a/b.c/d.run", &["a", "b", "c", "d"], "run")]
    fn parses_valid_references(
        #[case] raw: &str,
        #[case] module: &[&str],
        #[case] method: &str,
    ) {
        let parsed = parse_handler(raw).expect("valid handler");
        assert_eq!(parsed.module_segments(), module);
        assert_eq!(parsed.method(), method);
    }

    #[rstest]
    #[case("mydir-myhandler")]
    #[case("")]
    #[case("handler.")]
    #[case(".handler")]
    #[case("dir//file.main")]
    #[case("../up.main")]
    #[case("app.main-handler")]
    #[case("app.2fast")]
    #[case("app/my file.main")]
    #[case("app\\\"); evil(\".main")]
    fn rejects_invalid_references(#[case] raw: &str) {
        assert!(parse_handler(raw).is_err(), "'{raw}' should be rejected");
    }

    #[test]
    fn missing_separator_is_reported() {
        let err = parse_handler("mydir-myhandler").unwrap_err();
        assert_eq!(err, InvalidHandler::MissingSeparator("mydir-myhandler".into()));
        assert!(err.to_string().contains("mydir-myhandler"));
    }

    #[test]
    fn method_must_be_identifier() {
        assert_eq!(
            parse_handler("app.main-handler").unwrap_err(),
            InvalidHandler::BadMethodName("app.main-handler".into())
        );
        assert!(parse_handler("app._private").is_ok());
        assert!(parse_handler("my-app/api.main").is_ok());
    }

    #[test]
    fn quotes_in_module_are_rejected() {
        let raw = r#"app"x.main"#;
        assert_eq!(
            parse_handler(raw).unwrap_err(),
            InvalidHandler::BadModuleSegment(raw.into())
        );
    }

    #[test]
    fn module_forms() {
        let parsed = parse_handler("mydir/func.myhandler").unwrap();
        assert_eq!(parsed.dotted_module(), "mydir.func");
        assert_eq!(parsed.slashed_module(), "mydir/func");
        assert_eq!(parsed.to_string(), "mydir/func.myhandler");
    }
}
