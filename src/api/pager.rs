//! Lazy traversal of paginated collections
//!
//! A [`Pager`] is a forward-only, single-consumer cursor over the pages
//! of one list result. Continuation links are opaque and single-use;
//! the pager never iterates backward or refetches a consumed page.

use std::collections::VecDeque;

use log::debug;
use reqwest::Method;
use serde_json::Value;

use super::page::Page;
use super::session::Session;
use crate::error::Result;
use crate::objects::{dispatch, AnyObject, ObjectType};

pub struct Pager {
    session: Session,
    pending: VecDeque<Value>,
    next_link: Option<String>,
    /// Explicit dispatch hint for homogeneous collection endpoints.
    hint: Option<ObjectType>,
    /// Client-side allow-set applied after dispatch; never changes which
    /// pages get fetched, only which items are yielded.
    type_filter: Option<Vec<ObjectType>>,
}

impl Pager {
    pub(crate) fn new(session: Session, first: Page) -> Self {
        Self {
            session,
            next_link: first.next_link.clone(),
            pending: first.items.into(),
            hint: None,
            type_filter: None,
        }
    }

    pub(crate) fn with_hint(mut self, hint: ObjectType) -> Self {
        self.hint = Some(hint);
        self
    }

    pub(crate) fn with_type_filter(mut self, types: Vec<ObjectType>) -> Self {
        self.type_filter = Some(types);
        self
    }

    /// Whether more items may still be produced.
    pub fn has_more(&self) -> bool {
        !self.pending.is_empty() || self.next_link.is_some()
    }

    /// Return the next page of raw items. Buffered items are handed out
    /// first; otherwise one GET against the continuation link produces
    /// the next page; once neither remains, an empty sentinel page
    /// signals end-of-sequence (never an error).
    pub async fn next_batch(&mut self) -> Result<Page> {
        if !self.pending.is_empty() {
            let items: Vec<Value> = self.pending.drain(..).collect();
            return Ok(Page {
                items,
                next_link: self.next_link.clone(),
                count: None,
            });
        }

        match self.next_link.take() {
            Some(link) => self.fetch(&link).await,
            None => Ok(Page::empty()),
        }
    }

    async fn fetch(&mut self, link: &str) -> Result<Page> {
        debug!("Following continuation link");
        let json = self
            .session
            .call(link, Method::GET, None, &[], &[])
            .await?;
        let page = Page::from_json(json)?;
        self.next_link = page.next_link.clone();
        Ok(page)
    }

    /// Yield up to `n` typed entities, fetching additional pages only
    /// while still short of `n`. Items whose resolved type is not in
    /// the allow-set are dropped before being counted.
    pub async fn take(&mut self, n: usize) -> Result<Vec<AnyObject>> {
        let mut out = Vec::new();
        if n == 0 {
            return Ok(out);
        }

        loop {
            while let Some(item) = self.pending.pop_front() {
                let object = dispatch(&self.session, item, self.hint);
                if let Some(allowed) = &self.type_filter {
                    if !allowed.contains(&object.object_type()) {
                        continue;
                    }
                }
                out.push(object);
                if out.len() == n {
                    return Ok(out);
                }
            }

            let Some(link) = self.next_link.take() else {
                break;
            };
            let page = self.fetch(&link).await?;
            self.pending.extend(page.items);
        }

        Ok(out)
    }

    /// Drain the whole collection into typed entities.
    pub async fn take_all(&mut self) -> Result<Vec<AnyObject>> {
        self.take(usize::MAX).await
    }

    /// Yield up to `n` raw JSON items with no dispatch and no type
    /// filter; used for id-only relationship listings.
    pub async fn take_values(&mut self, n: usize) -> Result<Vec<Value>> {
        let mut out = Vec::new();
        if n == 0 {
            return Ok(out);
        }

        loop {
            while let Some(item) = self.pending.pop_front() {
                out.push(item);
                if out.len() == n {
                    return Ok(out);
                }
            }

            let Some(link) = self.next_link.take() else {
                break;
            };
            let page = self.fetch(&link).await?;
            self.pending.extend(page.items);
        }

        Ok(out)
    }

    /// Drain the whole collection as raw JSON items.
    pub async fn take_all_values(&mut self) -> Result<Vec<Value>> {
        self.take_values(usize::MAX).await
    }
}

impl std::fmt::Debug for Pager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pager")
            .field("buffered", &self.pending.len())
            .field("has_next_link", &self.next_link.is_some())
            .finish_non_exhaustive()
    }
}
