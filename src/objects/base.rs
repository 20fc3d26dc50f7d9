//! The shared directory object record and its capability traits
//!
//! Concrete entity types embed a [`DirectoryObject`] and pick up their
//! CRUD surface from the capability traits ([`Updatable`],
//! [`Deletable`], [`MembershipQueryable`]) instead of inheriting it.
//! The record holds a clone of the owning session; it never mutates the
//! session's credential.

use async_trait::async_trait;
use log::debug;
use reqwest::Method;
use serde_json::{Map, Value};

use super::dispatch::ObjectType;
use crate::api::query::filter_query;
use crate::api::{Filter, Page, Pager, Session};
use crate::error::{Error, Result};
use crate::prompts;

/// One directory object: its resolved type, its server-defined
/// properties, and the session it came from. The type is decided once
/// at construction and never changes.
#[derive(Debug)]
pub struct DirectoryObject {
    session: Session,
    object_type: ObjectType,
    properties: Map<String, Value>,
    deleted: bool,
}

impl DirectoryObject {
    pub(crate) fn new(session: Session, object_type: ObjectType, payload: Value) -> Self {
        let properties = match payload {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            session,
            object_type,
            properties,
            deleted: false,
        }
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn id(&self) -> Option<&str> {
        self.property("id").and_then(|v| v.as_str())
    }

    pub fn display_name(&self) -> Option<&str> {
        self.property("displayName").and_then(|v| v.as_str())
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    /// Resource path of this object, e.g. `users/{id}`.
    pub fn resource_path(&self) -> Result<String> {
        let id = self.id().ok_or_else(|| {
            Error::InvalidArguments("directory object has no 'id' property".to_string())
        })?;
        Ok(format!("{}/{}", self.object_type.resource_path(), id))
    }

    fn ensure_live(&self) -> Result<()> {
        if self.deleted {
            return Err(Error::InvalidArguments(
                "directory object was deleted; this wrapper is inert".to_string(),
            ));
        }
        Ok(())
    }

    /// Escape hatch: issue an arbitrary request scoped to this object's
    /// resource path. An empty `suboperation` targets the object itself.
    pub async fn do_operation(
        &self,
        suboperation: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Value> {
        self.ensure_live()?;
        let base = self.resource_path()?;
        let path = if suboperation.is_empty() {
            base
        } else {
            format!("{}/{}", base, suboperation.trim_start_matches('/'))
        };
        self.session.call(&path, method, body, &[], &[]).await
    }

    /// Re-fetch this object and replace `properties` wholesale. Local
    /// state is never merged; the server's view always wins.
    pub async fn sync_fields(&mut self) -> Result<()> {
        self.ensure_live()?;
        let path = self.resource_path()?;
        let value = self.session.call(&path, Method::GET, None, &[], &[]).await?;
        self.properties = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::Payload(format!(
                    "expected a JSON object when syncing {}, got {}",
                    path, other
                )))
            }
        };
        Ok(())
    }

    /// PATCH the given fields, then re-fetch the full object so local
    /// state reflects whatever the server actually stored.
    pub async fn update(&mut self, patch: Value) -> Result<()> {
        self.ensure_live()?;
        let path = self.resource_path()?;
        debug!("Updating {}", path);
        self.session
            .call(&path, Method::PATCH, Some(patch), &[], &[])
            .await?;
        self.sync_fields().await
    }

    /// Delete this object on the server. With `confirm` set, an
    /// interactive affirmation is required first; declining returns
    /// `Ok(false)` without any network call. After a successful delete
    /// the wrapper is inert and returns `Ok(true)`.
    pub async fn delete(&mut self, confirm: bool) -> Result<bool> {
        self.ensure_live()?;
        let path = self.resource_path()?;

        if confirm {
            let name = self.display_name().unwrap_or("<unnamed>");
            let prompt = format!("Delete {} '{}'? This cannot be undone.", self.object_type, name);
            if !prompts::confirm(&prompt, false).await? {
                debug!("Delete of {} declined", path);
                return Ok(false);
            }
        }

        self.session
            .call(&path, Method::DELETE, None, &[], &[])
            .await?;
        self.deleted = true;
        Ok(true)
    }

    /// List a relationship endpoint of this object, returning a pager
    /// over the (possibly heterogeneous) results.
    pub(crate) async fn list_relation(
        &self,
        relation: &str,
        query: Vec<(String, String)>,
        hint: Option<ObjectType>,
        type_filter: Option<Vec<ObjectType>>,
    ) -> Result<Pager> {
        self.ensure_live()?;
        let path = format!("{}/{}", self.resource_path()?, relation);
        let json = self.session.call(&path, Method::GET, None, &query, &[]).await?;
        let page = Page::from_json(json)?;

        let mut pager = Pager::new(self.session.clone(), page);
        if let Some(hint) = hint {
            pager = pager.with_hint(hint);
        }
        if let Some(types) = type_filter {
            pager = pager.with_type_filter(types);
        }
        Ok(pager)
    }
}

/// Access to the underlying directory object record.
pub trait DirectoryResource: Send + Sync {
    fn object(&self) -> &DirectoryObject;
    fn object_mut(&mut self) -> &mut DirectoryObject;
}

impl DirectoryResource for DirectoryObject {
    fn object(&self) -> &DirectoryObject {
        self
    }

    fn object_mut(&mut self) -> &mut DirectoryObject {
        self
    }
}

#[async_trait]
pub trait Updatable: DirectoryResource {
    /// Partial update followed by a full re-fetch.
    async fn update(&mut self, patch: Value) -> Result<()> {
        self.object_mut().update(patch).await
    }

    /// Replace local properties with the server's current state.
    async fn sync_fields(&mut self) -> Result<()> {
        self.object_mut().sync_fields().await
    }
}

#[async_trait]
pub trait Deletable: DirectoryResource {
    /// Delete on the server, optionally gated on interactive
    /// confirmation. Returns whether the delete was issued.
    async fn delete(&mut self, confirm: bool) -> Result<bool> {
        self.object_mut().delete(confirm).await
    }
}

#[async_trait]
pub trait MembershipQueryable: DirectoryResource {
    /// Groups this object is a direct member of. The `memberOf`
    /// endpoint returns mixed types (groups, directory roles); non-group
    /// results are dropped client-side after dispatch.
    async fn list_group_memberships(&self, filter: Option<Filter>) -> Result<Pager> {
        self.object()
            .list_relation(
                "memberOf",
                filter_query(filter.as_ref()),
                None,
                Some(vec![ObjectType::Group]),
            )
            .await
    }

    /// Directory objects owned by this object. The endpoint returns
    /// mixed types; `types` restricts the yielded sequence client-side
    /// without changing which pages are fetched.
    async fn list_owned_objects(
        &self,
        filter: Option<Filter>,
        types: Option<Vec<ObjectType>>,
    ) -> Result<Pager> {
        self.object()
            .list_relation("ownedObjects", filter_query(filter.as_ref()), None, types)
            .await
    }
}

impl Updatable for DirectoryObject {}
impl Deletable for DirectoryObject {}
impl MembershipQueryable for DirectoryObject {}
