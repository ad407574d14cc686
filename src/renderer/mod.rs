pub mod components;
pub mod extract;
pub mod links;
pub mod registry;
pub mod renderer;
pub mod signature;
pub mod traits;
pub mod walker;

pub use components::*;
pub use registry::{lookup, RenderRule, SemanticKey};
pub use renderer::*;
pub use traits::*;
