//! Typed directory object wrappers and the polymorphic dispatcher

pub mod application;
pub mod base;
pub mod dispatch;
pub mod group;
pub mod service_principal;
pub mod user;

pub use application::Application;
pub use base::{Deletable, DirectoryObject, DirectoryResource, MembershipQueryable, Updatable};
pub use dispatch::{dispatch, AnyObject, ObjectType};
pub use group::Group;
pub use service_principal::ServicePrincipal;
pub use user::User;
