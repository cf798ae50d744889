//! Parser combinators for preprocessor directives using nom

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{alphanumeric1, char, multispace0, space0, space1},
    combinator::{eof, opt, recognize},
    multi::{many0, many_m_n},
    sequence::{delimited, pair, tuple},
    IResult,
};

/// Maximum number of `_*[A-Za-z0-9]+` units joined into one identifier
pub const MAX_IDENTIFIER_UNITS: usize = 16;

/// Maximum number of directory segments in front of the file name of an import
pub const MAX_PATH_SEGMENTS: usize = 16;

/// Extension every imported file must carry
pub const SHADER_EXTENSION: &str = ".wgsl";

/// Represents a preprocessor directive
///
/// Payloads are owned copies of the matched text; the caller keeps them
/// after the source line is dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// #import "path.wgsl"
    Import { path: String },

    /// #if NAME
    If { name: String },

    /// #else
    Else,

    /// #endif
    EndIf,
}

/// Coarse classification of a line, decided from its leading characters only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Starts with `#import`
    Import,
    /// Starts with `#if`, `#else` or `#endif`
    Conditional,
    /// Starts with `#` but is neither a directive nor a constant reference
    Unknown,
    /// Anything else, including lines that open with `#(`
    Content,
}

/// Classify a line whose leading horizontal whitespace is already trimmed
pub fn line_kind(trimmed: &str) -> LineKind {
    if trimmed.starts_with("#import") {
        LineKind::Import
    } else if trimmed.starts_with("#if")
        || trimmed.starts_with("#else")
        || trimmed.starts_with("#endif")
    {
        LineKind::Conditional
    } else if trimmed.starts_with('#') && !trimmed.starts_with("#(") {
        LineKind::Unknown
    } else {
        LineKind::Content
    }
}

/// One identifier unit: an optional underscore run, then alphanumerics
fn identifier_unit(input: &str) -> IResult<&str, &str> {
    recognize(pair(take_while(|c: char| c == '_'), alphanumeric1))(input)
}

/// Parse an identifier made of up to 16 units (`_a`, `foo_bar2`, `__x_y`)
pub fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(many_m_n(1, MAX_IDENTIFIER_UNITS, identifier_unit))(input)
}

/// `./`, `../`, `.../` and so on
fn dot_prefix(input: &str) -> IResult<&str, &str> {
    recognize(pair(take_while1(|c: char| c == '.'), char('/')))(input)
}

/// A directory segment including its trailing slash
fn path_segment(input: &str) -> IResult<&str, &str> {
    recognize(tuple((many0(dot_prefix), identifier, char('/'))))(input)
}

/// The final file name including the mandatory extension
fn file_name(input: &str) -> IResult<&str, &str> {
    recognize(tuple((many0(dot_prefix), identifier, tag(SHADER_EXTENSION))))(input)
}

/// Parse an import path such as `../shaders/common.wgsl`
///
/// The recognized slice is returned verbatim; no normalization happens here.
pub fn import_path(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(char('/')),
        many_m_n(0, MAX_PATH_SEGMENTS, path_segment),
        file_name,
    )))(input)
}

/// Parse #import directive
fn parse_import(input: &str) -> IResult<&str, Directive> {
    let (input, _) = tag("#import")(input)?;
    let (input, _) = space0(input)?;
    let (input, path) = delimited(char('"'), import_path, char('"'))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = eof(input)?;

    Ok((
        input,
        Directive::Import {
            path: path.to_string(),
        },
    ))
}

/// Parse #if directive
fn parse_if(input: &str) -> IResult<&str, Directive> {
    let (input, _) = tag("#if")(input)?;
    let (input, _) = space1(input)?;
    let (input, name) = identifier(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = eof(input)?;

    Ok((
        input,
        Directive::If {
            name: name.to_string(),
        },
    ))
}

/// Parse #else directive
fn parse_else(input: &str) -> IResult<&str, Directive> {
    let (input, _) = tag("#else")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = eof(input)?;

    Ok((input, Directive::Else))
}

/// Parse #endif directive
fn parse_endif(input: &str) -> IResult<&str, Directive> {
    let (input, _) = tag("#endif")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = eof(input)?;

    Ok((input, Directive::EndIf))
}

/// Parse any preprocessor directive; the whole line has to match
pub fn parse_directive(input: &str) -> IResult<&str, Directive> {
    alt((parse_import, parse_endif, parse_else, parse_if))(input)
}

/// Parse an inline constant reference `#(name)` and return `name`
pub fn parse_constant(input: &str) -> IResult<&str, &str> {
    delimited(tag("#("), identifier, char(')'))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed_path(input: &str) -> Option<String> {
        match parse_directive(&format!("#import \"{}\"", input)) {
            Ok((_, Directive::Import { path })) => Some(path),
            _ => None,
        }
    }

    #[test]
    fn test_parse_import() {
        let input = r#"#import "shaders/test1.wgsl""#;
        let (_, directive) = parse_directive(input).unwrap();
        assert_eq!(
            directive,
            Directive::Import {
                path: "shaders/test1.wgsl".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_import_whitespace() {
        assert_eq!(
            parsed_path("common.wgsl"),
            Some("common.wgsl".to_string())
        );
        let (_, directive) = parse_directive("#import\t \"common.wgsl\"  \r\n").unwrap();
        assert_eq!(
            directive,
            Directive::Import {
                path: "common.wgsl".to_string(),
            }
        );
        let (_, directive) = parse_directive("#import\"common.wgsl\"").unwrap();
        assert!(matches!(directive, Directive::Import { .. }));
    }

    #[test]
    fn test_valid_paths_are_returned_verbatim() {
        for path in [
            "shaders/test1.wgsl",
            "./shaders/test1.wgsl",
            "../shaders/test1.wgsl",
            "../shaders/../test1.wgsl",
            "../../lib/noise.wgsl",
            "/usr/share/shaders/common.wgsl",
            "_private/__util_fns.wgsl",
        ] {
            assert_eq!(parsed_path(path), Some(path.to_string()), "{}", path);
        }
    }

    #[test]
    fn test_invalid_paths() {
        for path in [
            "shaders/test1.glsl",
            "shaders//test1.wgsl",
            "shaders/test1",
            "",
            "shaders/",
            "shaders/test-1.wgsl",
        ] {
            assert_eq!(parsed_path(path), None, "{}", path);
        }
    }

    #[test]
    fn test_path_segment_cap() {
        let sixteen = "d/".repeat(MAX_PATH_SEGMENTS) + "f.wgsl";
        assert_eq!(parsed_path(&sixteen), Some(sixteen.clone()));

        let seventeen = "d/".repeat(MAX_PATH_SEGMENTS + 1) + "f.wgsl";
        assert_eq!(parsed_path(&seventeen), None);
    }

    #[test]
    fn test_import_rejects_trailing_garbage() {
        assert!(parse_directive(r#"#import "a.wgsl" extra"#).is_err());
        assert!(parse_directive(r#"#import "a.wgsl"#).is_err());
        assert!(parse_directive("#import a.wgsl").is_err());
    }

    #[test]
    fn test_parse_if() {
        let (_, directive) = parse_directive("#if USE_SHADOWS").unwrap();
        assert_eq!(
            directive,
            Directive::If {
                name: "USE_SHADOWS".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_if_requires_identifier() {
        assert!(parse_directive("#if").is_err());
        assert!(parse_directive("#ifdef FOO").is_err());
        assert!(parse_directive("#if FOO BAR").is_err());
        assert!(parse_directive("#if foo-bar").is_err());
    }

    #[test]
    fn test_parse_else_endif() {
        assert_eq!(parse_directive("#else").unwrap().1, Directive::Else);
        assert_eq!(parse_directive("#endif \n").unwrap().1, Directive::EndIf);
        assert!(parse_directive("#else if").is_err());
        assert!(parse_directive("#endiff").is_err());
    }

    #[test]
    fn test_identifier_units() {
        assert_eq!(identifier("workgroup_x)").unwrap(), (")", "workgroup_x"));
        assert_eq!(identifier("__a__b2 rest").unwrap(), (" rest", "__a__b2"));
        assert!(identifier("_").is_err());
        assert!(identifier("-x").is_err());

        let long = "a_".repeat(MAX_IDENTIFIER_UNITS + 1);
        let (rest, name) = identifier(&long).unwrap();
        assert_eq!(name.len(), "a_".len() * MAX_IDENTIFIER_UNITS - 1);
        assert_eq!(rest, "_a_");
    }

    #[test]
    fn test_parse_constant() {
        assert_eq!(
            parse_constant("#(workgroup_x);").unwrap(),
            (";", "workgroup_x")
        );
        assert!(parse_constant("#workgroup_x").is_err());
        assert!(parse_constant("#(workgroup_x").is_err());
        assert!(parse_constant("#()").is_err());
    }

    #[test]
    fn test_line_kind() {
        assert_eq!(line_kind(r#"#import "a.wgsl""#), LineKind::Import);
        assert_eq!(line_kind("#if A"), LineKind::Conditional);
        assert_eq!(line_kind("#else"), LineKind::Conditional);
        assert_eq!(line_kind("#endif"), LineKind::Conditional);
        assert_eq!(line_kind("#define A 1"), LineKind::Unknown);
        assert_eq!(line_kind("#(size) * 2"), LineKind::Content);
        assert_eq!(line_kind("var a = 1;"), LineKind::Content);
    }
}
