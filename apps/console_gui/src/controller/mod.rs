//! Controller layer: backend events and command queue orchestration. The
//! dispatch reducer itself lives in `client_core::controller`.

pub mod events;
pub mod orchestration;
