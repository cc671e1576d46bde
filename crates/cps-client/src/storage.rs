use std::collections::HashMap;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::client::CpsClient;
use crate::error::Result;
use crate::types::{KvGroup, StorageContainer, ValueBody, ValuesBody, Visibility};

/// Address of a key-value storage: owner class, owner id and visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KvStorage<'a> {
    pub container: StorageContainer,
    pub owner_id: &'a str,
    pub visibility: Visibility,
}

impl<'a> KvStorage<'a> {
    pub const fn new(container: StorageContainer, owner_id: &'a str, visibility: Visibility) -> Self {
        Self {
            container,
            owner_id,
            visibility,
        }
    }

    /// `/v0/{container}/{owner}/kv/{visibility}` followed by `rest`
    fn segments(&self, rest: &[&'a str]) -> Vec<&'a str> {
        let visibility: &'static str = self.visibility.into();

        let mut segments = vec!["v0"];
        segments.extend_from_slice(self.container.path_segments());
        segments.extend([self.owner_id, "kv", visibility]);
        segments.extend_from_slice(rest);
        segments
    }
}

impl CpsClient {
    /// Every group of the storage
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn kv_storage(&self, storage: KvStorage<'_>) -> Result<HashMap<String, KvGroup>> {
        let builder = self.request(Method::GET, &storage.segments(&[]))?;
        self.fetch(builder).await
    }

    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn kv_group(&self, storage: KvStorage<'_>, group: &str) -> Result<KvGroup> {
        let builder = self.request(Method::GET, &storage.segments(&[group]))?;
        self.fetch(builder).await
    }

    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn kv_value(&self, storage: KvStorage<'_>, group: &str, key: &str) -> Result<Value> {
        let builder = self.request(Method::GET, &storage.segments(&[group, key]))?;
        self.fetch(builder).await
    }

    /// Create or replace a whole group
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn put_kv_group<T: Serialize + Sync>(
        &self,
        storage: KvStorage<'_>,
        group: &str,
        values: &T,
    ) -> Result<()> {
        let builder = self
            .request(Method::PUT, &storage.segments(&[group]))?
            .json(&ValuesBody { values });
        self.execute(builder).await
    }

    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn put_kv_value<T: Serialize + Sync>(
        &self,
        storage: KvStorage<'_>,
        group: &str,
        key: &str,
        value: &T,
    ) -> Result<()> {
        let builder = self
            .request(Method::PUT, &storage.segments(&[group, key]))?
            .json(&ValueBody { value });
        self.execute(builder).await
    }

    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn delete_kv_group(&self, storage: KvStorage<'_>, group: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, &storage.segments(&[group]))?;
        self.execute(builder).await
    }

    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn delete_kv_value(&self, storage: KvStorage<'_>, group: &str, key: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, &storage.segments(&[group, key]))?;
        self.execute(builder).await
    }
}

#[cfg(test)]
mod tests {
    use cps_errors::Variant;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::client::tests::{ok, test_client};

    const USER_PUBLIC: KvStorage<'static> = KvStorage::new(StorageContainer::Users, "u1", Visibility::Public);

    #[tokio::test]
    async fn user_storage_path() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v0/services/current/users/u1/kv/public"))
            .respond_with(ok(json!({"profile": {"name": "Ann", "age": 30}})))
            .mount(&server)
            .await;

        let storage = test_client(&server).kv_storage(USER_PUBLIC).await.unwrap();
        assert_eq!(storage["profile"]["name"], json!("Ann"));
    }

    #[tokio::test]
    async fn group_and_value_reads() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v0/devices/d1/kv/local/settings"))
            .respond_with(ok(json!({"interval": 10})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v0/devices/d1/kv/local/settings/interval"))
            .respond_with(ok(json!(10)))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let storage = KvStorage::new(StorageContainer::Devices, "d1", Visibility::Local);

        let group = client.kv_group(storage, "settings").await.unwrap();
        assert_eq!(group.get("interval"), Some(&json!(10)));

        let value = client.kv_value(storage, "settings", "interval").await.unwrap();
        assert_eq!(value, json!(10));
    }

    #[tokio::test]
    async fn writes_wrap_payload() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/v0/services/s1/kv/public/limits"))
            .and(body_json(json!({"values": {"max": 5}})))
            .respond_with(ok(json!("")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/v0/services/s1/kv/public/limits/max"))
            .and(body_json(json!({"value": 7})))
            .respond_with(ok(json!(null)))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let storage = KvStorage::new(StorageContainer::Services, "s1", Visibility::Public);

        client.put_kv_group(storage, "limits", &json!({"max": 5})).await.unwrap();
        client.put_kv_value(storage, "limits", "max", &7).await.unwrap();
    }

    #[tokio::test]
    async fn deletes() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v0/services/current/users/u1/kv/public/profile"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v0/services/current/users/u1/kv/public/profile/age"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.delete_kv_value(USER_PUBLIC, "profile", "age").await.unwrap();
        client.delete_kv_group(USER_PUBLIC, "profile").await.unwrap();
    }

    #[tokio::test]
    async fn missing_object_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v0/services/current/users/u1/kv/public/nope"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": "error",
                "code": 1002,
                "data": {"group": "Unknown group nope"}
            })))
            .mount(&server)
            .await;

        let err = test_client(&server).kv_group(USER_PUBLIC, "nope").await.unwrap_err();
        assert!(err.is(Variant::ObjectNotFound));
        assert_eq!(err.cps().unwrap().message(), "Unknown group nope");
    }
}
