#![warn(rust_2018_idioms)]

//! Core of the table display: the snapshot model, the addressing scheme of
//! the rendered document, and the reset-then-apply pass that brings a view in
//! line with a snapshot.

pub mod address;
pub mod model;
pub mod protocol;
pub mod render;
pub mod view;

pub use model::{CardCode, Hand, Snapshot, Suit};
pub use render::{Pass, RenderError, RenderOptions, Renderer};
pub use view::{Fill, Ink, TableLayout, View, ViewTree};
