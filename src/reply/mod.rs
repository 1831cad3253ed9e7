//! Auto-reply composition.
//!
//! ```text
//! text + label ─▶ category ─▶ generator chain ─▶ augment ─▶ reply
//!                              (remote → template)
//! ```

pub mod augment;
pub mod category;
pub mod composer;
pub mod generator;
pub mod sender;
pub mod subject;
pub mod templates;

pub use composer::ReplyComposer;
pub use generator::{FallbackGenerator, RemoteConfig, RemoteGenerator, ReplyGenerator};
pub use templates::{Entropy, FixedEntropy, SystemEntropy, TemplateGenerator};
