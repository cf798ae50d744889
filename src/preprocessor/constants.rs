//! Inline `#(name)` substitution

use crate::preprocessor::error::{PreprocessorError, PreprocessorResult};
use crate::preprocessor::options::Options;
use crate::preprocessor::parser::parse_constant;

/// Replace the first `#(name)` token of `line` with the value bound to `name`
///
/// Only the first `#` of the line is looked at. A line without `#` is returned
/// unchanged; a `#` that does not start a well-formed `#(name)` is a syntax
/// error. The rewritten line may not exceed `max_len` bytes.
pub fn substitute_constant(
    line: &str,
    options: &Options,
    max_len: usize,
) -> PreprocessorResult<String> {
    let start = match line.find('#') {
        Some(start) => start,
        None => return Ok(line.to_string()),
    };

    let (rest, name) = parse_constant(&line[start..]).map_err(|_| {
        PreprocessorError::syntax(format!(
            "expected '#(name)' at column {}",
            start + 1
        ))
    })?;

    let value = options
        .constant_value(name)
        .ok_or_else(|| PreprocessorError::InvalidConstant {
            name: name.to_string(),
        })?
        .to_string();

    let len = start + value.len() + rest.len();
    if len > max_len {
        return Err(PreprocessorError::syntax(format!(
            "line is {} bytes after substitution, limit is {}",
            len, max_len
        )));
    }

    let mut result = String::with_capacity(len);
    result.push_str(&line[..start]);
    result.push_str(&value);
    result.push_str(rest);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = 128;

    #[test]
    fn test_substitute_integer() {
        let options = Options::new().constant("workgroup_x", 8);
        let result = substitute_constant("var b = #(workgroup_x)", &options, LIMIT).unwrap();
        assert_eq!(result, "var b = 8");
    }

    #[test]
    fn test_rest_of_line_is_preserved() {
        let options = Options::new().constant("scale", 2.0);
        let result =
            substitute_constant("    let s = #(scale) * x; // scaled", &options, LIMIT).unwrap();
        assert_eq!(result, "    let s = 2.0 * x; // scaled");
    }

    #[test]
    fn test_only_first_token_is_replaced() {
        let options = Options::new().constant("a", 1).constant("b", 2);
        let result = substitute_constant("#(a) + #(b)", &options, LIMIT).unwrap();
        assert_eq!(result, "1 + #(b)");
    }

    #[test]
    fn test_line_without_hash() {
        let result = substitute_constant("var a = 5;", &Options::new(), LIMIT).unwrap();
        assert_eq!(result, "var a = 5;");
    }

    #[test]
    fn test_unknown_constant() {
        let err = substitute_constant("var b = #(missing);", &Options::new(), LIMIT).unwrap_err();
        assert_eq!(
            err,
            PreprocessorError::InvalidConstant {
                name: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_token() {
        let options = Options::new().constant("a", 1);
        for line in ["x = #a;", "x = #(a;", "x = #();", "x = # (a);"] {
            let err = substitute_constant(line, &options, LIMIT).unwrap_err();
            assert!(matches!(err, PreprocessorError::SyntaxError { .. }), "{}", line);
        }
    }

    #[test]
    fn test_line_length_limit() {
        let options = Options::new().constant("long", "x".repeat(LIMIT));
        let err = substitute_constant("let v = #(long);", &options, LIMIT).unwrap_err();
        assert!(matches!(err, PreprocessorError::SyntaxError { .. }));

        let options = Options::new().constant("short", "x");
        assert!(substitute_constant("#(short)", &options, 1).is_ok());
    }
}
