//! Group directory object

use reqwest::Method;
use serde_json::json;

use super::base::{
    Deletable, DirectoryObject, DirectoryResource, MembershipQueryable, Updatable,
};
use super::dispatch::ObjectType;
use crate::api::constants::directory_object_ref;
use crate::api::{Pager, Session};
use crate::error::Result;

#[derive(Debug)]
pub struct Group {
    base: DirectoryObject,
}

impl Group {
    pub(crate) fn from_object(base: DirectoryObject) -> Self {
        Self { base }
    }

    pub(crate) fn from_payload(session: Session, payload: serde_json::Value) -> Self {
        Self::from_object(DirectoryObject::new(session, ObjectType::Group, payload))
    }

    pub fn id(&self) -> Option<&str> {
        self.base.id()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.base.display_name()
    }

    /// Add a directory object to this group's members.
    pub async fn add_member(&self, member_id: &str) -> Result<()> {
        let reference = json!({
            "@odata.id": directory_object_ref(self.base.session().host(), member_id),
        });
        self.base
            .do_operation("members/$ref", Method::POST, Some(reference))
            .await?;
        Ok(())
    }

    /// Remove a member by id.
    pub async fn remove_member(&self, member_id: &str) -> Result<()> {
        let suboperation = format!("members/{}/$ref", member_id);
        self.base
            .do_operation(&suboperation, Method::DELETE, None)
            .await?;
        Ok(())
    }

    /// Id-only member listing. Yields raw items; pull them with
    /// [`Pager::take_values`].
    pub async fn list_members(&self) -> Result<Pager> {
        self.base
            .list_relation(
                "members",
                vec![("$select".to_string(), "id".to_string())],
                None,
                None,
            )
            .await
    }

    /// Escape hatch scoped to this group's resource path.
    pub async fn do_operation(
        &self,
        suboperation: &str,
        method: Method,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        self.base.do_operation(suboperation, method, body).await
    }
}

impl DirectoryResource for Group {
    fn object(&self) -> &DirectoryObject {
        &self.base
    }

    fn object_mut(&mut self) -> &mut DirectoryObject {
        &mut self.base
    }
}

impl Updatable for Group {}
impl Deletable for Group {}
impl MembershipQueryable for Group {}
