//! The interactive command console: grammar, interpreter, and autocomplete.

pub mod grammar;
pub mod interpreter;
pub mod suggest;

pub use grammar::{Command, ParseError};
pub use interpreter::{execute, Outcome};
pub use suggest::ShortcutIndex;
