//! The rendering pipeline: element resolution, intrinsic elements,
//! components, dispatch and mounting.

mod component;
mod dispatch;
mod intrinsic;
mod materialize;
mod mount;

pub use component::{invoke_component, AttachHook, Component, CreateHook, RenderFn};
pub use dispatch::{create, ElementType};
pub use intrinsic::build_intrinsic;
pub use materialize::{create_empty, create_fragment, materialize, to_element, to_html};
pub use mount::{append, attach};
