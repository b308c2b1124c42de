//! go.mod parser for Go projects
//!
//! Handles:
//! - module directive
//! - require statements (single and block)
//! - // indirect comments
//! - replace / exclude / retract directives (skipped)
//!
//! Every require entry keeps the byte span of its version token so an update
//! can rewrite that token and nothing else.

use crate::domain::Version;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// Parser for go.mod files
pub struct GoModParser;

// Entry body: module/path v1.2.3 (path may be quoted)
static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*("[^"]+"|\S+)\s+(\S+)\s*$"#).unwrap());

/// A go.mod syntax error with its 1-based line number
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct GoModError {
    pub line: usize,
    pub message: String,
}

impl GoModError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// One `require` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub path: String,
    pub version: Version,
    pub indirect: bool,
    /// 1-based line number
    pub line: usize,
    /// Byte range of the version token within the file
    pub version_span: Range<usize>,
}

/// Parsed content of a go.mod file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoMod {
    pub module: String,
    pub requirements: Vec<Requirement>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Block {
    Require,
    Other,
}

impl GoModParser {
    /// Parse go.mod content
    pub fn parse(&self, content: &str) -> Result<GoMod, GoModError> {
        let mut module = None;
        let mut requirements = Vec::new();
        let mut block: Option<(Block, usize)> = None;
        let mut offset = 0;
        let mut line_no = 0;

        for raw_line in content.split_inclusive('\n') {
            line_no += 1;
            let line_start = offset;
            offset += raw_line.len();

            let line = raw_line.trim_end_matches(['\n', '\r']);
            let code = match line.find("//") {
                Some(idx) => &line[..idx],
                None => line,
            };
            let comment = &line[code.len()..];
            let trimmed = code.trim();

            if trimmed.is_empty() {
                continue;
            }

            if let Some((kind, _)) = block {
                if trimmed == ")" {
                    block = None;
                    continue;
                }
                if kind == Block::Require {
                    requirements.push(parse_entry(code, line_start, line_no, comment)?);
                }
                continue;
            }

            let lead = code.len() - code.trim_start().len();
            let word_end = trimmed
                .find(|c: char| c.is_whitespace() || c == '(')
                .unwrap_or(trimmed.len());
            let directive = &trimmed[..word_end];
            let rest = &trimmed[word_end..];
            let opens_block = rest.trim() == "(";
            let empty_block = rest.split_whitespace().collect::<String>() == "()";

            match directive {
                "module" => {
                    let name = rest.trim().trim_matches('"');
                    if name.is_empty() {
                        return Err(GoModError::new(line_no, "module directive without a path"));
                    }
                    module = Some(name.to_string());
                }
                "require" if opens_block => block = Some((Block::Require, line_no)),
                "require" if empty_block => {}
                "require" => {
                    let rest_start = lead + word_end;
                    requirements.push(parse_entry(
                        &code[rest_start..],
                        line_start + rest_start,
                        line_no,
                        comment,
                    )?);
                }
                "replace" | "exclude" | "retract" | "godebug" | "tool" | "ignore" => {
                    if opens_block {
                        block = Some((Block::Other, line_no));
                    }
                }
                "go" | "toolchain" => {}
                other => {
                    return Err(GoModError::new(
                        line_no,
                        format!("unknown directive '{}'", other),
                    ));
                }
            }
        }

        if let Some((_, opened_at)) = block {
            return Err(GoModError::new(opened_at, "unterminated block"));
        }

        let module = module.ok_or_else(|| GoModError::new(1, "missing module directive"))?;

        Ok(GoMod {
            module,
            requirements,
        })
    }

    /// Replace the pinned version of `module` with `new_version`.
    ///
    /// Only the version token changes; indentation, comments and line endings
    /// are preserved.
    pub fn update_version(
        &self,
        content: &str,
        module: &str,
        new_version: &Version,
    ) -> Result<String, GoModError> {
        let parsed = self.parse(content)?;
        let requirement = parsed
            .requirements
            .iter()
            .find(|r| r.path == module)
            .ok_or_else(|| GoModError::new(0, format!("module '{}' is not required", module)))?;

        let mut updated = String::with_capacity(content.len() + 8);
        updated.push_str(&content[..requirement.version_span.start]);
        updated.push_str(new_version.as_str());
        updated.push_str(&content[requirement.version_span.end..]);
        Ok(updated)
    }
}

fn parse_entry(
    code: &str,
    base: usize,
    line_no: usize,
    comment: &str,
) -> Result<Requirement, GoModError> {
    let caps = ENTRY_RE
        .captures(code)
        .ok_or_else(|| GoModError::new(line_no, "expected 'module/path version'"))?;
    let (Some(path), Some(version)) = (caps.get(1), caps.get(2)) else {
        return Err(GoModError::new(line_no, "expected 'module/path version'"));
    };

    if !version.as_str().starts_with('v') {
        return Err(GoModError::new(
            line_no,
            format!("version '{}' must start with 'v'", version.as_str()),
        ));
    }
    let parsed = Version::parse(version.as_str())
        .map_err(|e| GoModError::new(line_no, e.to_string()))?;

    Ok(Requirement {
        path: path.as_str().trim_matches('"').to_string(),
        version: parsed,
        indirect: is_indirect(comment),
        line: line_no,
        version_span: base + version.start()..base + version.end(),
    })
}

fn is_indirect(comment: &str) -> bool {
    let text = comment.trim_start_matches('/').trim();
    text == "indirect" || text.starts_with("indirect;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<GoMod, GoModError> {
        GoModParser.parse(content)
    }

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_parse_single_require() {
        let content = r#"
module example.com/myproject

go 1.21

require github.com/gin-gonic/gin v1.9.1
"#;

        let go_mod = parse(content).unwrap();
        assert_eq!(go_mod.module, "example.com/myproject");
        assert_eq!(go_mod.requirements.len(), 1);
        assert_eq!(go_mod.requirements[0].path, "github.com/gin-gonic/gin");
        assert_eq!(go_mod.requirements[0].version.as_str(), "v1.9.1");
        assert_eq!(go_mod.requirements[0].line, 6);
    }

    #[test]
    fn test_parse_require_block() {
        let content = r#"
module example.com/myproject

go 1.21

require (
	github.com/gin-gonic/gin v1.9.1
	github.com/stretchr/testify v1.8.4
)
"#;

        let go_mod = parse(content).unwrap();
        let paths: Vec<&str> = go_mod
            .requirements
            .iter()
            .map(|r| r.path.as_str())
            .collect();
        assert_eq!(
            paths,
            vec!["github.com/gin-gonic/gin", "github.com/stretchr/testify"]
        );
    }

    #[test]
    fn test_parse_indirect_dependencies() {
        let content = r#"
module example.com/myproject

require (
	github.com/gin-gonic/gin v1.9.1
	golang.org/x/text v0.14.0 // indirect
)
"#;

        let go_mod = parse(content).unwrap();
        assert!(!go_mod.requirements[0].indirect);
        assert!(go_mod.requirements[1].indirect);
    }

    #[test]
    fn test_parse_skips_replace_and_exclude() {
        let content = r#"
module example.com/myproject

require github.com/gin-gonic/gin v1.9.1

replace github.com/gin-gonic/gin => ../local-gin

replace (
	github.com/other/lib v1.0.0 => ../other-lib
)

exclude github.com/bad/lib v0.1.0
"#;

        let go_mod = parse(content).unwrap();
        assert_eq!(go_mod.requirements.len(), 1);
        assert_eq!(go_mod.requirements[0].path, "github.com/gin-gonic/gin");
    }

    #[test]
    fn test_parse_incompatible_and_pseudo() {
        let content = r#"
module example.com/myproject

require (
	github.com/old/module v2.0.0+incompatible
	github.com/new/module v0.0.0-20210101120000-abcdef123456
)
"#;

        let go_mod = parse(content).unwrap();
        assert!(go_mod.requirements[0].version.is_incompatible());
        assert!(go_mod.requirements[1].version.is_pseudo());
    }

    #[test]
    fn test_parse_crlf() {
        let content = "module example.com/m\r\n\r\nrequire example.com/a v1.0.0\r\n";
        let go_mod = parse(content).unwrap();
        assert_eq!(go_mod.requirements[0].version.as_str(), "v1.0.0");
    }

    #[test]
    fn test_parse_without_requirements() {
        let go_mod = parse("module example.com/myproject\n\ngo 1.21\n").unwrap();
        assert!(go_mod.requirements.is_empty());
    }

    #[test]
    fn test_parse_empty_inline_blocks() {
        let content = "module example.com/m\n\nrequire ()\nexclude ( )\n\nrequire example.com/a v1.0.0\n";
        let go_mod = parse(content).unwrap();
        assert_eq!(go_mod.requirements.len(), 1);
        assert_eq!(go_mod.requirements[0].path, "example.com/a");
        assert_eq!(go_mod.requirements[0].line, 6);
    }

    #[test]
    fn test_parse_missing_module() {
        let err = parse("go 1.21\n").unwrap_err();
        assert!(err.message.contains("missing module"));
    }

    #[test]
    fn test_parse_invalid_version() {
        let content = "module example.com/m\n\nrequire example.com/a 1.0.0\n";
        let err = parse(content).unwrap_err();
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_parse_entry_without_version() {
        let content = "module example.com/m\n\nrequire (\n\texample.com/a\n)\n";
        let err = parse(content).unwrap_err();
        assert_eq!(err.line, 4);
    }

    #[test]
    fn test_parse_unterminated_block() {
        let content = "module example.com/m\n\nrequire (\n\texample.com/a v1.0.0\n";
        let err = parse(content).unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn test_parse_unknown_directive() {
        let err = parse("module example.com/m\nfrobnicate x\n").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_update_single_require() {
        let content = r#"module example.com/myproject

go 1.21

require github.com/gin-gonic/gin v1.9.1
"#;

        let result = GoModParser
            .update_version(content, "github.com/gin-gonic/gin", &v("v1.10.0"))
            .unwrap();
        assert!(result.contains("require github.com/gin-gonic/gin v1.10.0\n"));
        assert!(!result.contains("v1.9.1"));
    }

    #[test]
    fn test_update_require_block_preserves_others() {
        let content = "module example.com/myproject\n\nrequire (\n\tgithub.com/gin-gonic/gin   v1.9.1 // web\n\tgithub.com/stretchr/testify v1.8.4\n)\n";

        let result = GoModParser
            .update_version(content, "github.com/gin-gonic/gin", &v("v1.10.0"))
            .unwrap();
        assert_eq!(
            result,
            "module example.com/myproject\n\nrequire (\n\tgithub.com/gin-gonic/gin   v1.10.0 // web\n\tgithub.com/stretchr/testify v1.8.4\n)\n"
        );
    }

    #[test]
    fn test_update_ignores_replace_lines() {
        let content = "module example.com/m\n\nrequire example.com/a v1.0.0\n\nreplace (\n\texample.com/a v1.0.0 => ../a\n)\n";

        let result = GoModParser
            .update_version(content, "example.com/a", &v("v1.2.0"))
            .unwrap();
        assert!(result.contains("require example.com/a v1.2.0\n"));
        assert!(result.contains("example.com/a v1.0.0 => ../a"));
    }

    #[test]
    fn test_update_keeps_crlf() {
        let content = "module example.com/m\r\nrequire example.com/a v1.0.0\r\n";
        let result = GoModParser
            .update_version(content, "example.com/a", &v("v1.1.0"))
            .unwrap();
        assert_eq!(result, "module example.com/m\r\nrequire example.com/a v1.1.0\r\n");
    }

    #[test]
    fn test_update_not_found() {
        let content = "module example.com/m\n\nrequire github.com/gin-gonic/gin v1.9.1\n";
        let result = GoModParser.update_version(content, "github.com/nonexistent", &v("v1.0.0"));
        assert!(result.is_err());
    }
}
