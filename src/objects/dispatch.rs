//! Polymorphic dispatch from untyped directory payloads
//!
//! Graph directory endpoints return polymorphic JSON. The dispatcher
//! maps each payload to its concrete wrapper through an explicit
//! resolver: hint first, then the `@odata.type` discriminator, then an
//! ordered table of shape predicates, and finally the generic wrapper.
//! It is pure (no network) and total (every input produces a wrapper).

use serde_json::Value;

use super::application::Application;
use super::base::{DirectoryObject, DirectoryResource};
use super::group::Group;
use super::service_principal::ServicePrincipal;
use super::user::User;
use crate::api::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    User,
    Group,
    Application,
    ServicePrincipal,
    Other,
}

impl ObjectType {
    /// Map an `@odata.type` discriminator to a concrete type.
    pub fn from_odata_type(value: &str) -> Option<Self> {
        match value.trim_start_matches('#') {
            "microsoft.graph.user" => Some(ObjectType::User),
            "microsoft.graph.group" => Some(ObjectType::Group),
            "microsoft.graph.application" => Some(ObjectType::Application),
            "microsoft.graph.servicePrincipal" => Some(ObjectType::ServicePrincipal),
            _ => None,
        }
    }

    /// Collection path for this type; the generic fallback lives under
    /// `directoryObjects`.
    pub fn resource_path(self) -> &'static str {
        match self {
            ObjectType::User => "users",
            ObjectType::Group => "groups",
            ObjectType::Application => "applications",
            ObjectType::ServicePrincipal => "servicePrincipals",
            ObjectType::Other => "directoryObjects",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ObjectType::User => "user",
            ObjectType::Group => "group",
            ObjectType::Application => "application",
            ObjectType::ServicePrincipal => "servicePrincipal",
            ObjectType::Other => "other",
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

type ShapePredicate = fn(&Value) -> bool;

fn looks_like_user(value: &Value) -> bool {
    value.get("userPrincipalName").is_some()
}

fn looks_like_group(value: &Value) -> bool {
    value.get("mailEnabled").is_some() && value.get("securityEnabled").is_some()
}

fn looks_like_service_principal(value: &Value) -> bool {
    value.get("servicePrincipalType").is_some() || value.get("appOwnerOrganizationId").is_some()
}

fn looks_like_application(value: &Value) -> bool {
    value.get("appId").is_some()
        && (value.get("signInAudience").is_some() || value.get("publisherDomain").is_some())
}

/// Ordered shape table; service principals are checked before
/// applications because both payloads carry `appId`.
const SHAPE_TABLE: &[(ShapePredicate, ObjectType)] = &[
    (looks_like_user, ObjectType::User),
    (looks_like_group, ObjectType::Group),
    (looks_like_service_principal, ObjectType::ServicePrincipal),
    (looks_like_application, ObjectType::Application),
];

/// Decide the concrete type for a payload. Total over all inputs: an
/// unrecognized shape resolves to [`ObjectType::Other`].
pub fn resolve_type(value: &Value, hint: Option<ObjectType>) -> ObjectType {
    if let Some(hint) = hint {
        if hint != ObjectType::Other {
            return hint;
        }
    }

    if let Some(discriminator) = value.get("@odata.type").and_then(|t| t.as_str()) {
        if let Some(object_type) = ObjectType::from_odata_type(discriminator) {
            return object_type;
        }
    }

    for (predicate, object_type) in SHAPE_TABLE {
        if predicate(value) {
            return *object_type;
        }
    }

    ObjectType::Other
}

/// A dispatched directory object of any concrete type.
#[derive(Debug)]
pub enum AnyObject {
    User(User),
    Group(Group),
    Application(Application),
    ServicePrincipal(ServicePrincipal),
    Other(DirectoryObject),
}

impl AnyObject {
    pub fn object_type(&self) -> ObjectType {
        match self {
            AnyObject::User(_) => ObjectType::User,
            AnyObject::Group(_) => ObjectType::Group,
            AnyObject::Application(_) => ObjectType::Application,
            AnyObject::ServicePrincipal(_) => ObjectType::ServicePrincipal,
            AnyObject::Other(_) => ObjectType::Other,
        }
    }

    pub fn object(&self) -> &DirectoryObject {
        match self {
            AnyObject::User(u) => u.object(),
            AnyObject::Group(g) => g.object(),
            AnyObject::Application(a) => a.object(),
            AnyObject::ServicePrincipal(sp) => sp.object(),
            AnyObject::Other(o) => o,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.object().id()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.object().display_name()
    }

    pub fn into_user(self) -> Option<User> {
        match self {
            AnyObject::User(u) => Some(u),
            _ => None,
        }
    }

    pub fn into_group(self) -> Option<Group> {
        match self {
            AnyObject::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn into_application(self) -> Option<Application> {
        match self {
            AnyObject::Application(a) => Some(a),
            _ => None,
        }
    }

    pub fn into_service_principal(self) -> Option<ServicePrincipal> {
        match self {
            AnyObject::ServicePrincipal(sp) => Some(sp),
            _ => None,
        }
    }
}

/// Wrap a raw payload in the typed wrapper its shape (or the hint)
/// calls for. Pure data transformation; no network call is made.
pub fn dispatch(session: &Session, value: Value, hint: Option<ObjectType>) -> AnyObject {
    let object_type = resolve_type(&value, hint);
    let base = DirectoryObject::new(session.clone(), object_type, value);
    match object_type {
        ObjectType::User => AnyObject::User(User::from_object(base)),
        ObjectType::Group => AnyObject::Group(Group::from_object(base)),
        ObjectType::Application => AnyObject::Application(Application::from_object(base)),
        ObjectType::ServicePrincipal => {
            AnyObject::ServicePrincipal(ServicePrincipal::from_object(base))
        }
        ObjectType::Other => AnyObject::Other(base),
    }
}
