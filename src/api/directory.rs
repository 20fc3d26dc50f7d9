//! Collection-level directory operations
//!
//! List, lookup, and create entry points for the four directory
//! collections, hung off [`Session`]. Lookups by name or email validate
//! their selectors locally before any network call and refuse to guess
//! when a lookup is ambiguous.

use reqwest::Method;
use serde_json::{json, Value};

use super::page::Page;
use super::pager::Pager;
use super::query::{filter_query, Filter};
use super::session::Session;
use crate::error::{Error, Result};
use crate::objects::{Application, Group, ObjectType, ServicePrincipal, User};

impl Session {
    async fn list_collection(
        &self,
        object_type: ObjectType,
        filter: Option<&Filter>,
    ) -> Result<Pager> {
        let query = filter_query(filter);
        let json = self
            .call(object_type.resource_path(), Method::GET, None, &query, &[])
            .await?;
        let page = Page::from_json(json)?;
        Ok(Pager::new(self.clone(), page).with_hint(object_type))
    }

    pub async fn list_users(&self, filter: Option<Filter>) -> Result<Pager> {
        self.list_collection(ObjectType::User, filter.as_ref()).await
    }

    pub async fn list_groups(&self, filter: Option<Filter>) -> Result<Pager> {
        self.list_collection(ObjectType::Group, filter.as_ref()).await
    }

    pub async fn list_applications(&self, filter: Option<Filter>) -> Result<Pager> {
        self.list_collection(ObjectType::Application, filter.as_ref())
            .await
    }

    pub async fn list_service_principals(&self, filter: Option<Filter>) -> Result<Pager> {
        self.list_collection(ObjectType::ServicePrincipal, filter.as_ref())
            .await
    }

    /// Run a filtered lookup expected to match exactly one object.
    async fn lookup_single(
        &self,
        object_type: ObjectType,
        filter: Filter,
        what: &str,
    ) -> Result<Value> {
        let mut pager = self.list_collection(object_type, Some(&filter)).await?;
        let mut matches = pager.take_values(2).await?;
        match matches.len() {
            1 => Ok(matches.remove(0)),
            n => Err(Error::AmbiguousLookup {
                what: what.to_string(),
                matched: n,
            }),
        }
    }

    async fn get_by_id(&self, object_type: ObjectType, id: &str) -> Result<Value> {
        let path = format!("{}/{}", object_type.resource_path(), id);
        self.call(&path, Method::GET, None, &[], &[]).await
    }

    /// Fetch one user by exactly one of object id, email, or display
    /// name. Supplying zero or several selectors is a local error; an
    /// email or name resolving to zero or multiple users is an
    /// ambiguous-lookup error.
    pub async fn get_user(
        &self,
        id: Option<&str>,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<User> {
        require_one_selector(&[("id", id), ("email", email), ("name", name)])?;

        let payload = if let Some(id) = id {
            self.get_by_id(ObjectType::User, id).await?
        } else if let Some(email) = email {
            let filter = Filter::or(vec![
                Filter::eq("mail", email),
                Filter::eq("userPrincipalName", email),
            ]);
            self.lookup_single(ObjectType::User, filter, &format!("user email '{}'", email))
                .await?
        } else if let Some(name) = name {
            self.lookup_single(
                ObjectType::User,
                Filter::eq("displayName", name),
                &format!("user name '{}'", name),
            )
            .await?
        } else {
            unreachable!("selector validation guarantees one selector")
        };

        Ok(User::from_payload(self.clone(), payload))
    }

    /// Fetch one group by exactly one of object id or display name.
    pub async fn get_group(&self, id: Option<&str>, name: Option<&str>) -> Result<Group> {
        require_one_selector(&[("id", id), ("name", name)])?;

        let payload = if let Some(id) = id {
            self.get_by_id(ObjectType::Group, id).await?
        } else if let Some(name) = name {
            self.lookup_single(
                ObjectType::Group,
                Filter::eq("displayName", name),
                &format!("group name '{}'", name),
            )
            .await?
        } else {
            unreachable!("selector validation guarantees one selector")
        };

        Ok(Group::from_payload(self.clone(), payload))
    }

    /// Fetch one application by exactly one of object id, application
    /// (client) id, or display name.
    pub async fn get_application(
        &self,
        id: Option<&str>,
        app_id: Option<&str>,
        name: Option<&str>,
    ) -> Result<Application> {
        require_one_selector(&[("id", id), ("app_id", app_id), ("name", name)])?;

        let payload = if let Some(id) = id {
            self.get_by_id(ObjectType::Application, id).await?
        } else if let Some(app_id) = app_id {
            self.lookup_single(
                ObjectType::Application,
                Filter::eq("appId", app_id),
                &format!("application id '{}'", app_id),
            )
            .await?
        } else if let Some(name) = name {
            self.lookup_single(
                ObjectType::Application,
                Filter::eq("displayName", name),
                &format!("application name '{}'", name),
            )
            .await?
        } else {
            unreachable!("selector validation guarantees one selector")
        };

        Ok(Application::from_payload(self.clone(), payload))
    }

    /// Fetch one service principal by exactly one of object id,
    /// application (client) id, or display name.
    pub async fn get_service_principal(
        &self,
        id: Option<&str>,
        app_id: Option<&str>,
        name: Option<&str>,
    ) -> Result<ServicePrincipal> {
        require_one_selector(&[("id", id), ("app_id", app_id), ("name", name)])?;

        let payload = if let Some(id) = id {
            self.get_by_id(ObjectType::ServicePrincipal, id).await?
        } else if let Some(app_id) = app_id {
            self.lookup_single(
                ObjectType::ServicePrincipal,
                Filter::eq("appId", app_id),
                &format!("service principal app id '{}'", app_id),
            )
            .await?
        } else if let Some(name) = name {
            self.lookup_single(
                ObjectType::ServicePrincipal,
                Filter::eq("displayName", name),
                &format!("service principal name '{}'", name),
            )
            .await?
        } else {
            unreachable!("selector validation guarantees one selector")
        };

        Ok(ServicePrincipal::from_payload(self.clone(), payload))
    }

    /// Create an enabled user with an initial password that must be
    /// changed at next sign-in.
    pub async fn create_user(
        &self,
        display_name: &str,
        user_principal_name: &str,
        password: &str,
    ) -> Result<User> {
        let mail_nickname = user_principal_name
            .split('@')
            .next()
            .unwrap_or(user_principal_name);
        let body = json!({
            "accountEnabled": true,
            "displayName": display_name,
            "mailNickname": mail_nickname,
            "userPrincipalName": user_principal_name,
            "passwordProfile": {
                "password": password,
                "forceChangePasswordNextSignIn": true,
            }
        });
        let payload = self.call("users", Method::POST, Some(body), &[], &[]).await?;
        Ok(User::from_payload(self.clone(), payload))
    }

    /// Create a security group.
    pub async fn create_group(&self, display_name: &str, mail_nickname: &str) -> Result<Group> {
        let body = json!({
            "displayName": display_name,
            "mailNickname": mail_nickname,
            "mailEnabled": false,
            "securityEnabled": true,
        });
        let payload = self.call("groups", Method::POST, Some(body), &[], &[]).await?;
        Ok(Group::from_payload(self.clone(), payload))
    }

    /// Create an application registration.
    pub async fn create_application(&self, display_name: &str) -> Result<Application> {
        let body = json!({ "displayName": display_name });
        let payload = self
            .call("applications", Method::POST, Some(body), &[], &[])
            .await?;
        Ok(Application::from_payload(self.clone(), payload))
    }
}

/// Exactly one selector must be supplied; anything else fails locally
/// before a request is made.
fn require_one_selector(selectors: &[(&str, Option<&str>)]) -> Result<()> {
    let supplied: Vec<&str> = selectors
        .iter()
        .filter(|(_, value)| value.is_some())
        .map(|(name, _)| *name)
        .collect();

    match supplied.len() {
        1 => Ok(()),
        0 => {
            let names: Vec<&str> = selectors.iter().map(|(name, _)| *name).collect();
            Err(Error::InvalidArguments(format!(
                "one of {} must be supplied",
                names.join(", ")
            )))
        }
        _ => Err(Error::InvalidArguments(format!(
            "only one selector may be supplied, got {}",
            supplied.join(", ")
        ))),
    }
}
