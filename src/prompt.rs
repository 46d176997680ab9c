//! Interactive prompting capability for the `gst` application.
//!
//! Business logic depends on the [Prompt] trait rather than on a terminal
//! directly, so scripted implementations can drive it in tests.

use crate::errors::StResult;

/// The prompting capability required by stack operations.
pub trait Prompt {
    /// Asks a yes/no question and returns the answer.
    fn confirm(&self, message: &str, default: bool) -> StResult<bool>;

    /// Presents an enumerated choice and returns the selected index.
    fn select(&self, message: &str, options: &[String]) -> StResult<usize>;

    /// Asks for a single line of free-form text.
    fn text(&self, message: &str) -> StResult<String>;

    /// Opens the operator's editor for a multi-line response.
    fn editor(&self, message: &str) -> StResult<String>;
}

/// [Prompt] implementation backed by [inquire], for interactive terminal use.
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str, default: bool) -> StResult<bool> {
        Ok(inquire::Confirm::new(message)
            .with_default(default)
            .prompt()?)
    }

    fn select(&self, message: &str, options: &[String]) -> StResult<usize> {
        Ok(inquire::Select::new(message, options.to_vec())
            .raw_prompt()?
            .index)
    }

    fn text(&self, message: &str) -> StResult<String> {
        Ok(inquire::Text::new(message).prompt()?)
    }

    fn editor(&self, message: &str) -> StResult<String> {
        Ok(inquire::Editor::new(message).prompt()?)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Prompt;
    use crate::errors::StResult;
    use std::{cell::RefCell, collections::VecDeque};

    /// [Prompt] implementation that replays scripted answers.
    ///
    /// Panics when an unscripted prompt is consumed, which makes "this path
    /// must not prompt" assertions free.
    #[derive(Default)]
    pub(crate) struct ScriptedPrompt {
        confirms: RefCell<VecDeque<bool>>,
        selections: RefCell<VecDeque<usize>>,
    }

    impl ScriptedPrompt {
        pub(crate) fn with_confirms(answers: impl IntoIterator<Item = bool>) -> Self {
            Self {
                confirms: RefCell::new(answers.into_iter().collect()),
                ..Default::default()
            }
        }

        pub(crate) fn with_selections(answers: impl IntoIterator<Item = usize>) -> Self {
            Self {
                selections: RefCell::new(answers.into_iter().collect()),
                ..Default::default()
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn confirm(&self, message: &str, _default: bool) -> StResult<bool> {
            Ok(self
                .confirms
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| panic!("unscripted confirmation prompt: {message}")))
        }

        fn select(&self, message: &str, _options: &[String]) -> StResult<usize> {
            Ok(self
                .selections
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| panic!("unscripted selection prompt: {message}")))
        }

        fn text(&self, message: &str) -> StResult<String> {
            panic!("unscripted text prompt: {message}")
        }

        fn editor(&self, message: &str) -> StResult<String> {
            panic!("unscripted editor prompt: {message}")
        }
    }
}
