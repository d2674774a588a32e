//! # dotora
//!
//! A parser and editor for Oracle dot-ora files (`tnsnames.ora`, `sqlnet.ora`,
//! `listener.ora`).
//!
//! The library turns file text into a list of named parameters, each holding a
//! nested attribute tree, applies path-addressed edits to that tree and renders
//! the result back to text. See [`dotora::editing::DotOraFile`] for the editing
//! API and [`dotora::editing::request`] for the one-shot request interface used
//! by the `dotora` binary.

pub mod dotora;
