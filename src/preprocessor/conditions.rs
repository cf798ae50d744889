//! Nested `#if` / `#else` / `#endif` state

use crate::preprocessor::error::{PreprocessorError, PreprocessorResult};
use crate::preprocessor::options::Options;
use crate::preprocessor::parser::Directive;

#[derive(Debug, Clone, Copy)]
struct OpenBlock {
    active: bool,
    /// 1-based line of the `#if` that opened the block
    line: usize,
}

/// Stack of currently open conditional blocks of one file
#[derive(Debug, Default)]
pub struct ConditionStack {
    blocks: Vec<OpenBlock>,
}

impl ConditionStack {
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Lines are emitted only when every enclosing block is active
    pub fn is_visible(&self) -> bool {
        self.blocks.iter().all(|b| b.active)
    }

    /// Apply a conditional directive found at `line`
    pub fn apply(
        &mut self,
        directive: &Directive,
        line: usize,
        options: &Options,
    ) -> PreprocessorResult<()> {
        match directive {
            Directive::If { name } => {
                let active = options.condition_value(name).ok_or_else(|| {
                    PreprocessorError::InvalidCondition { name: name.clone() }
                })?;
                self.blocks.push(OpenBlock { active, line });
            }
            Directive::Else => {
                let block = self
                    .blocks
                    .pop()
                    .ok_or_else(|| PreprocessorError::mismatched_if("#else without matching #if"))?;
                self.blocks.push(OpenBlock {
                    active: !block.active,
                    line: block.line,
                });
            }
            Directive::EndIf => {
                self.blocks
                    .pop()
                    .ok_or_else(|| PreprocessorError::mismatched_if("#endif without matching #if"))?;
            }
            Directive::Import { .. } => {
                return Err(PreprocessorError::syntax(
                    "#import is not a conditional directive",
                ));
            }
        }
        Ok(())
    }

    /// Called at end of input; returns the line of the innermost unclosed `#if`
    pub fn finish(&self) -> Result<(), usize> {
        match self.blocks.last() {
            Some(block) => Err(block.line),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn if_(name: &str) -> Directive {
        Directive::If {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_visibility_is_and_of_all_blocks() {
        let options = Options::new().condition("a", true).condition("b", false);
        let mut stack = ConditionStack::new();
        assert!(stack.is_visible());

        stack.apply(&if_("a"), 1, &options).unwrap();
        assert!(stack.is_visible());
        stack.apply(&if_("b"), 2, &options).unwrap();
        assert!(!stack.is_visible());
        stack.apply(&if_("a"), 3, &options).unwrap();
        assert!(!stack.is_visible());

        stack.apply(&Directive::EndIf, 4, &options).unwrap();
        stack.apply(&Directive::Else, 5, &options).unwrap();
        assert!(stack.is_visible());
        stack.apply(&Directive::EndIf, 6, &options).unwrap();
        stack.apply(&Directive::EndIf, 7, &options).unwrap();
        assert_eq!(stack.finish(), Ok(()));
    }

    #[test]
    fn test_else_negates_innermost_only() {
        let options = Options::new().condition("outer", false).condition("inner", true);
        let mut stack = ConditionStack::new();
        stack.apply(&if_("outer"), 1, &options).unwrap();
        stack.apply(&if_("inner"), 2, &options).unwrap();
        stack.apply(&Directive::Else, 3, &options).unwrap();
        assert!(!stack.is_visible());
        stack.apply(&Directive::EndIf, 4, &options).unwrap();
        stack.apply(&Directive::Else, 5, &options).unwrap();
        assert!(stack.is_visible());
    }

    #[test]
    fn test_unknown_condition() {
        let mut stack = ConditionStack::new();
        let err = stack.apply(&if_("missing"), 1, &Options::new()).unwrap_err();
        assert_eq!(
            err,
            PreprocessorError::InvalidCondition {
                name: "missing".to_string()
            }
        );
        assert_eq!(stack.finish(), Ok(()));
    }

    #[test]
    fn test_unbalanced() {
        let options = Options::new().condition("a", true);
        let mut stack = ConditionStack::new();
        assert!(matches!(
            stack.apply(&Directive::Else, 1, &options),
            Err(PreprocessorError::MismatchedIf { .. })
        ));
        assert!(matches!(
            stack.apply(&Directive::EndIf, 1, &options),
            Err(PreprocessorError::MismatchedIf { .. })
        ));

        stack.apply(&if_("a"), 7, &options).unwrap();
        assert_eq!(stack.finish(), Err(7));
        stack.apply(&Directive::EndIf, 8, &options).unwrap();
        assert_eq!(stack.finish(), Ok(()));
    }
}
