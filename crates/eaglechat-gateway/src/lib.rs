//! Registration coordinator and provider-key broker: the two stateful
//! collaborators sitting above the vault, the store, and the signer.

pub mod broker;
pub mod prelude;
pub mod registration;

// vim: ts=4
