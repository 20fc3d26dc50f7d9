//! User directory object

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::RngCore;
use reqwest::Method;
use serde_json::json;

use super::base::{
    Deletable, DirectoryObject, DirectoryResource, MembershipQueryable, Updatable,
};
use super::dispatch::ObjectType;
use crate::api::query::filter_query;
use crate::api::{Filter, Pager, Session};
use crate::error::Result;

/// Random bytes per generated password, base64-encoded before use.
const GENERATED_PASSWORD_BYTES: usize = 40;

#[derive(Debug)]
pub struct User {
    base: DirectoryObject,
}

impl User {
    pub(crate) fn from_object(base: DirectoryObject) -> Self {
        Self { base }
    }

    pub(crate) fn from_payload(session: Session, payload: serde_json::Value) -> Self {
        Self::from_object(DirectoryObject::new(session, ObjectType::User, payload))
    }

    pub fn id(&self) -> Option<&str> {
        self.base.id()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.base.display_name()
    }

    pub fn user_principal_name(&self) -> Option<&str> {
        self.base.property("userPrincipalName").and_then(|v| v.as_str())
    }

    pub fn mail(&self) -> Option<&str> {
        self.base.property("mail").and_then(|v| v.as_str())
    }

    /// Set a new password, generating a random one when none is given.
    /// Returns the plaintext exactly once; the server never echoes
    /// secrets on subsequent reads, so it is not retrievable afterwards.
    pub async fn reset_password(
        &mut self,
        password: Option<String>,
        force_change: bool,
    ) -> Result<String> {
        let password = password.unwrap_or_else(generate_password);
        let patch = json!({
            "passwordProfile": {
                "password": password,
                "forceChangePasswordNextSignIn": force_change,
            }
        });
        self.base.update(patch).await?;
        Ok(password)
    }

    /// Directory objects this user created. Mixed-type endpoint; `types`
    /// restricts the yielded sequence client-side.
    pub async fn list_created_objects(
        &self,
        filter: Option<Filter>,
        types: Option<Vec<ObjectType>>,
    ) -> Result<Pager> {
        self.base
            .list_relation("createdObjects", filter_query(filter.as_ref()), None, types)
            .await
    }

    /// Escape hatch scoped to this user's resource path.
    pub async fn do_operation(
        &self,
        suboperation: &str,
        method: Method,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        self.base.do_operation(suboperation, method, body).await
    }
}

fn generate_password() -> String {
    let mut bytes = [0u8; GENERATED_PASSWORD_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    STANDARD.encode(bytes)
}

impl DirectoryResource for User {
    fn object(&self) -> &DirectoryObject {
        &self.base
    }

    fn object_mut(&mut self) -> &mut DirectoryObject {
        &mut self.base
    }
}

impl Updatable for User {}
impl Deletable for User {}
impl MembershipQueryable for User {}
