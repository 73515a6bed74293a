//! Request routing for single-page apps served from the edge.
//!
//! Every request path is rewritten to the app's entry document unless it
//! starts with a passthrough prefix (static assets, robots.txt, favicons,
//! ...). The decision is a pure function, evaluated per request, and the same
//! rule renders the function body installed at the edge.
//!
//! ```text
//! /assets/app.js  -> /assets/app.js
//! /favicon.ico    -> /favicon.ico
//! /about          -> /index.html
//! /               -> /index.html
//! ```

mod function;
mod rewrite;

pub use function::*;
pub use rewrite::*;
