//! Service principal directory object

use reqwest::Method;
use serde_json::Value;

use super::base::{
    Deletable, DirectoryObject, DirectoryResource, MembershipQueryable, Updatable,
};
use super::dispatch::ObjectType;
use crate::api::Session;
use crate::error::Result;

#[derive(Debug)]
pub struct ServicePrincipal {
    base: DirectoryObject,
}

impl ServicePrincipal {
    pub(crate) fn from_object(base: DirectoryObject) -> Self {
        Self { base }
    }

    pub(crate) fn from_payload(session: Session, payload: Value) -> Self {
        Self::from_object(DirectoryObject::new(
            session,
            ObjectType::ServicePrincipal,
            payload,
        ))
    }

    pub fn id(&self) -> Option<&str> {
        self.base.id()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.base.display_name()
    }

    /// The app registration this principal was created from.
    pub fn app_id(&self) -> Option<&str> {
        self.base.property("appId").and_then(|v| v.as_str())
    }

    /// Escape hatch scoped to this principal's resource path.
    pub async fn do_operation(
        &self,
        suboperation: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Value> {
        self.base.do_operation(suboperation, method, body).await
    }
}

impl DirectoryResource for ServicePrincipal {
    fn object(&self) -> &DirectoryObject {
        &self.base
    }

    fn object_mut(&mut self) -> &mut DirectoryObject {
        &mut self.base
    }
}

impl Updatable for ServicePrincipal {}
impl Deletable for ServicePrincipal {}
impl MembershipQueryable for ServicePrincipal {}
