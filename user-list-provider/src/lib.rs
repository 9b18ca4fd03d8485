#![allow(clippy::type_complexity)]
#![warn(clippy::disallowed_types)]
#![warn(missing_docs)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]
// When docs auto created for docs.rs, will include features, given docs.rs uses nightly by default:
#![cfg_attr(all(doc, CHANNEL_NIGHTLY), feature(doc_auto_cfg))]

mod backend;
mod flavor;
mod ids;
mod lists;
mod options;
mod page;
mod provider;
mod records;
mod session;
mod store;
mod utils;

pub use backend::*;
pub use flavor::*;
pub use ids::*;
pub use lists::*;
pub use options::*;
pub use page::*;
pub use provider::*;
pub use records::*;
pub use session::*;
pub use store::{UserListState, UserListStore};
