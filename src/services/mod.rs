//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own session bookkeeping and the AI round trips so route
//! handlers can stay focused on protocol translation.

pub mod generation;
