//! Request descriptors: one not-yet-executed API call.
//!
//! # Design
//! A descriptor carries the method, a path relative to the API root and the
//! ordered wire pairs. The type parameter records what the response decodes
//! into, so `delete` calls are typed as acknowledgments and listings as
//! pages without the caller naming the type again.

use std::fmt;
use std::marker::PhantomData;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::form::WirePair;
use crate::http::HttpMethod;

/// Everything outside RFC 3986 "unreserved" is escaped in an id segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// A collection, optionally narrowed to one item by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResourcePath {
    collection: &'static str,
    id: Option<String>,
}

impl ResourcePath {
    /// Path as written by hand, e.g. `plans/gold`.
    fn raw(&self) -> String {
        match &self.id {
            Some(id) => format!("{}/{id}", self.collection),
            None => self.collection.to_string(),
        }
    }

    /// Path safe to append to a URL; the id is always exactly one segment.
    fn encoded(&self) -> String {
        match &self.id {
            Some(id) => format!("{}/{}", self.collection, utf8_percent_encode(id, SEGMENT)),
            None => self.collection.to_string(),
        }
    }
}

pub(crate) fn collection_path(collection: &'static str) -> ResourcePath {
    ResourcePath {
        collection,
        id: None,
    }
}

/// Item path for a resource: `collection/id`.
pub(crate) fn item_path(collection: &'static str, id: &impl fmt::Display) -> ResourcePath {
    ResourcePath {
        collection,
        id: Some(id.to_string()),
    }
}

pub struct RequestDescriptor<T> {
    method: HttpMethod,
    location: ResourcePath,
    path: String,
    pairs: Vec<WirePair>,
    response: PhantomData<fn() -> T>,
}

impl<T> RequestDescriptor<T> {
    pub(crate) fn new(method: HttpMethod, location: ResourcePath, pairs: Vec<WirePair>) -> Self {
        Self {
            method,
            path: location.raw(),
            location,
            pairs,
            response: PhantomData,
        }
    }

    pub(crate) fn get(location: ResourcePath, pairs: Vec<WirePair>) -> Self {
        Self::new(HttpMethod::Get, location, pairs)
    }

    pub(crate) fn post(location: ResourcePath, pairs: Vec<WirePair>) -> Self {
        Self::new(HttpMethod::Post, location, pairs)
    }

    pub(crate) fn delete(location: ResourcePath) -> Self {
        Self::new(HttpMethod::Delete, location, Vec::new())
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// `path()` with the id segment percent-encoded.
    pub fn url_path(&self) -> String {
        self.location.encoded()
    }

    pub fn pairs(&self) -> &[WirePair] {
        &self.pairs
    }

    /// Name of the type the response body decodes into.
    pub fn response_type(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

impl<T> fmt::Debug for RequestDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("pairs", &self.pairs)
            .field("response", &self.response_type())
            .finish()
    }
}

impl<T> PartialEq for RequestDescriptor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method && self.location == other.location && self.pairs == other.pairs
    }
}
