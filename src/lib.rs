//! shoal - a small line-oriented command interpreter
//!
//! One line in, a sequence of commands out: segments chained with `;`,
//! `&&`, `||`, and `|`, with aliases, redirection, and a directory stack.

pub mod shell;

pub use shell::Shell;
