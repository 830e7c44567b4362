//! Filter-and-aggregate pipeline behind the Netflix catalogue explorer.
//!
//! The [`data`] layer turns a titles file into chart-ready summaries with no
//! knowledge of rendering; [`settings`] holds the layered runtime
//! configuration used by the desktop front-end.

pub mod data;
pub mod settings;
