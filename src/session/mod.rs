/*!
 * Per-novel session state.
 *
 * A session accumulates the glossary knowledge graph, the running context
 * memory fed into later chapters and the term suggestions extracted along
 * the way. Everything lives in plain files so runs can be resumed and the
 * state hand-edited between them.
 */

pub mod models;
pub mod store;

// Re-export main types
pub use models::{Glossary, TermEntry};
pub use store::SessionStore;
