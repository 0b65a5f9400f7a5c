use std::collections::HashMap;

/// Full role map for a user: downstream service path to the role names held
/// there.
pub type RoleMap = HashMap<String, Vec<String>>;

/// A downstream service as declared in the service registry.
///
/// The `roles` field is the service's role vocabulary: the only role names
/// that may be assigned for that service path.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct ServiceDescriptor {
    pub path: String,
    pub roles: Vec<String>,
}
