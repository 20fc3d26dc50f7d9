//! Typed async client for Microsoft Graph directory objects.
//!
//! Covers the four directory object collections (users, groups,
//! applications, service principals) plus the generic directory object
//! fallback. A [`Session`] owns the HTTP traffic and the bearer
//! credential; list operations return a [`Pager`] that lazily follows
//! `@odata.nextLink` continuation references and dispatches each raw
//! JSON item to the matching typed wrapper.

pub mod api;
pub mod auth;
pub mod error;
pub mod objects;
pub mod prompts;

pub use api::{BatchRequest, BatchResponseItem, Filter, FilterValue, Page, Pager, Session};
pub use auth::{Credentials, TokenCredential};
pub use error::{Error, Result};
pub use objects::{
    dispatch, AnyObject, Application, Deletable, DirectoryObject, DirectoryResource, Group,
    MembershipQueryable, ObjectType, ServicePrincipal, Updatable, User,
};

pub use reqwest::Method;
