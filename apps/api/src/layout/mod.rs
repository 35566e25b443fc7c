//! Long-form card layout: canvas configuration, text measurement, and the
//! block-stream paginator.

pub mod canvas;
pub mod handlers;
pub mod measure;
pub mod paginator;
