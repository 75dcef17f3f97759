pub use crate::broker::ProviderKeyBroker;
pub use crate::registration::{CallbackRetryPolicy, RegistrationCoordinator, RegistrationRequest, RegistrationResponse};
pub use eaglechat_types::prelude::*;

// vim: ts=4
