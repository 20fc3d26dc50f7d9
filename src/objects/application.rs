//! Application (app registration) directory object

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use reqwest::Method;
use serde_json::{json, Value};

use super::base::{
    Deletable, DirectoryObject, DirectoryResource, MembershipQueryable, Updatable,
};
use super::dispatch::ObjectType;
use super::service_principal::ServicePrincipal;
use crate::api::Session;
use crate::error::{Error, Result};

#[derive(Debug)]
pub struct Application {
    base: DirectoryObject,
}

impl Application {
    pub(crate) fn from_object(base: DirectoryObject) -> Self {
        Self { base }
    }

    pub(crate) fn from_payload(session: Session, payload: Value) -> Self {
        Self::from_object(DirectoryObject::new(
            session,
            ObjectType::Application,
            payload,
        ))
    }

    pub fn id(&self) -> Option<&str> {
        self.base.id()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.base.display_name()
    }

    /// The application (client) id, distinct from the object id.
    pub fn app_id(&self) -> Option<&str> {
        self.base.property("appId").and_then(|v| v.as_str())
    }

    /// Create the service principal for this app registration in the
    /// session's tenant.
    pub async fn create_service_principal(&self) -> Result<ServicePrincipal> {
        let app_id = self.app_id().ok_or_else(|| {
            Error::InvalidArguments("application has no 'appId' property".to_string())
        })?;

        let session = self.base.session().clone();
        let payload = session
            .call(
                "servicePrincipals",
                Method::POST,
                Some(json!({ "appId": app_id })),
                &[],
                &[],
            )
            .await?;

        Ok(ServicePrincipal::from_payload(session, payload))
    }

    /// Mint a new client secret valid for `lifetime`. The secret is only
    /// present in the returned credential payload; the server never
    /// returns it again.
    pub async fn add_password(&self, name: &str, lifetime: Duration) -> Result<Value> {
        let lifetime = chrono::Duration::from_std(lifetime)
            .map_err(|e| Error::InvalidArguments(format!("credential lifetime out of range: {}", e)))?;
        let end_date_time = (Utc::now() + lifetime).to_rfc3339_opts(SecondsFormat::Secs, true);

        let body = json!({
            "passwordCredential": {
                "displayName": name,
                "endDateTime": end_date_time,
            }
        });
        self.base
            .do_operation("addPassword", Method::POST, Some(body))
            .await
    }

    /// Escape hatch scoped to this application's resource path.
    pub async fn do_operation(
        &self,
        suboperation: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Value> {
        self.base.do_operation(suboperation, method, body).await
    }
}

impl DirectoryResource for Application {
    fn object(&self) -> &DirectoryObject {
        &self.base
    }

    fn object_mut(&mut self) -> &mut DirectoryObject {
        &mut self.base
    }
}

impl Updatable for Application {}
impl Deletable for Application {}
impl MembershipQueryable for Application {}
