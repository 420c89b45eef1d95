//! Terminal UI layer shared by the task and chat pages.
//!
//! The UI module owns rendering, key translation, and loop control for the
//! text user interface.
//!
//! Key submodules include:
//! - [`event_loop`]: the loop that feeds terminal input and command outcomes
//!   into a [`crate::core::page::TerminalPage`].
//! - [`executors`]: run page commands against the remote services on tokio
//!   tasks.
//! - [`renderer`] and [`theme`]: frame output and color policy.
//! - [`keys`] and [`lifecycle`]: input translation and raw-mode setup.
//!
//! Ownership boundary: this layer presents and captures interaction state, while
//! [`crate::core`] owns page state and [`crate::api`] talks to the backends.

pub mod event_loop;
pub mod executors;
pub mod keys;
pub mod lifecycle;
pub mod renderer;
pub mod theme;
