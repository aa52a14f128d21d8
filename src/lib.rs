//! A minimal element-tree rendering runtime.
//!
//! Element values (text, numbers, fragments, existing nodes) are
//! materialized into an in-memory [`Document`](dom::Document). Intrinsic
//! tags are built from props and children; [`Component`](render::Component)s
//! render to elements and may hook into creation and attachment. An
//! [`App`](app::App) renders a body component under a mount point and shows
//! an error view when rendering fails.

pub mod app;
pub mod css;
pub mod diagnostic;
pub mod dom;
pub mod element;
pub mod error;
pub mod html;
mod jobs;
pub mod render;

pub use tagtree_macros::component;

pub mod prelude {
    pub use crate::app::{App, AppSettings};
    pub use crate::css::{
        class_names, style, styles, Classes, IntoClasses, IntoStyleValue, IntoStyles, StyleValue,
        Styles,
    };
    pub use crate::diagnostic::{Diagnostic, DiagnosticKind};
    pub use crate::dom::{ConnectionWatch, Document, Event, NodeId};
    pub use crate::element::{Element, PropValue, Props};
    pub use crate::error::RenderError;
    pub use crate::render::{append, attach, create, Component, ElementType};
    pub use crate::{cls, component, h, props, styles};
}
