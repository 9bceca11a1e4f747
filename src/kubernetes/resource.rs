// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Retried get/delete/update for any typed Kubernetes resource

use crate::error::Result;
use crate::kubernetes::poll::{poll_immediate, poll_until, PollSchedule};
use kube::{
    api::{DeleteParams, PostParams},
    Api, Resource, ResourceExt,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use tracing::{info, instrument, warn};

/// Get an object by name, retrying every error until `PollSchedule::SHORT` expires
#[instrument(skip(api))]
pub async fn get<K>(api: &Api<K>, name: &str) -> Result<K>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug,
{
    let kind = K::kind(&());
    let kind = kind.as_ref();

    poll_until(
        &format!("get {} {:?}", kind, name),
        PollSchedule::SHORT,
        || async move {
            match api.get(name).await {
                Ok(object) => Ok(Some(object)),
                Err(e) => {
                    warn!(
                        "Error querying api for {} object {:?}: {}, retrying...",
                        kind, name, e
                    );
                    Ok(None)
                }
            }
        },
    )
    .await
}

/// Delete an object by name, retrying every error until `PollSchedule::SHORT` expires
#[instrument(skip(api))]
pub async fn delete<K>(api: &Api<K>, name: &str) -> Result<()>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug,
{
    let kind = K::kind(&());
    let kind = kind.as_ref();

    poll_immediate(
        &format!("delete {} {:?}", kind, name),
        PollSchedule::SHORT,
        || async move {
            match api.delete(name, &DeleteParams::default()).await {
                Ok(_) => {
                    info!("Deleted {} {:?}", kind, name);
                    Ok(true)
                }
                Err(e) => {
                    warn!("Error deleting {} object {:?}: {}, retrying...", kind, name, e);
                    Ok(false)
                }
            }
        },
    )
    .await
}

/// Replace the live object with `updated`, retrying until `PollSchedule::MEDIUM` expires.
///
/// Every attempt re-reads the live object so the write carries its current
/// resourceVersion; a conflict with a concurrent writer is simply retried.
#[instrument(skip(api, updated))]
pub async fn update<K>(api: &Api<K>, name: &str, updated: &K) -> Result<()>
where
    K: Resource<DynamicType = ()> + Clone + Serialize + DeserializeOwned + Debug,
{
    let kind = K::kind(&());
    let kind = kind.as_ref();

    poll_immediate(
        &format!("update {} {:?}", kind, name),
        PollSchedule::MEDIUM,
        || async move {
            let current = match get(api, name).await {
                Ok(current) => current,
                Err(e) => {
                    warn!("Error getting {} {:?}: {}", kind, name, e);
                    return Ok(false);
                }
            };

            let desired = with_resource_version(updated, current.resource_version());
            match api.replace(name, &PostParams::default(), &desired).await {
                Ok(_) => {
                    info!("Updated {} {:?}", kind, name);
                    Ok(true)
                }
                Err(e) => {
                    warn!("Error updating {} object {:?}: {}, retrying...", kind, name, e);
                    Ok(false)
                }
            }
        },
    )
    .await
}

fn with_resource_version<K: Resource + Clone>(object: &K, resource_version: Option<String>) -> K {
    let mut object = object.clone();
    let meta = object.meta_mut();
    meta.resource_version = resource_version;
    meta.managed_fields = None;
    object
}
