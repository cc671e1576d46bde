use std::collections::HashMap;

use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::CpsClient;
use crate::error::Result;
use crate::types::{
    CreationMode, ItemRange, ItemsDelete, ItemsPatch, Sequence, SequenceType, ValueBody, ValuesBody,
};

fn sequence_path<'a>(device_id: &'a str, name: &'a str, rest: &[&'a str]) -> Vec<&'a str> {
    let mut segments = vec!["v0", "devices", device_id, "sequences", name];
    segments.extend_from_slice(rest);
    segments
}

#[derive(Debug, Serialize)]
struct ConditionalDelete<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    when_value: Option<&'a Value>,
}

impl CpsClient {
    /// Sequences of a device, keyed by name
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn sequences(&self, device_id: &str) -> Result<HashMap<String, Sequence>> {
        let builder = self.request(Method::GET, &["v0", "devices", device_id, "sequences"])?;
        self.fetch(builder).await
    }

    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn sequence(&self, device_id: &str, name: &str) -> Result<Sequence> {
        let builder = self.request(Method::GET, &sequence_path(device_id, name, &[]))?;
        self.fetch(builder).await
    }

    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn create_sequence(
        &self,
        device_id: &str,
        name: &str,
        kind: SequenceType,
        mode: CreationMode,
    ) -> Result<()> {
        let builder = self
            .request(Method::PUT, &sequence_path(device_id, name, &[]))?
            .query(&[("type", kind.as_ref()), ("creation_mode", mode.as_ref())]);
        self.execute(builder).await
    }

    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn delete_sequence(&self, device_id: &str, name: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, &sequence_path(device_id, name, &[]))?;
        self.execute(builder).await
    }

    /// Every item of the sequence, keyed by item id
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn sequence_items(&self, device_id: &str, name: &str) -> Result<Map<String, Value>> {
        let builder = self.request(Method::GET, &sequence_path(device_id, name, &["items"]))?;
        self.fetch(builder).await
    }

    /// Items inside `range`, keyed by item id
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn sequence_item_range(
        &self,
        device_id: &str,
        name: &str,
        range: &ItemRange,
    ) -> Result<Map<String, Value>> {
        let builder = self.ranged_request(&sequence_path(device_id, name, &["items"]), range)?;
        self.fetch(builder).await
    }

    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn sequence_item(&self, device_id: &str, name: &str, item_id: &str) -> Result<Value> {
        let builder = self.request(
            Method::GET,
            &sequence_path(device_id, name, &["items", item_id]),
        )?;
        self.fetch(builder).await
    }

    /// Store `value` under an explicit item id
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn put_sequence_item<T: Serialize + Sync>(
        &self,
        device_id: &str,
        name: &str,
        item_id: &str,
        value: &T,
    ) -> Result<()> {
        let builder = self
            .request(Method::PUT, &sequence_path(device_id, name, &["items", item_id]))?
            .json(&ValueBody { value });
        self.execute(builder).await
    }

    /// Append `value` under a server-assigned key
    ///
    /// Only `datetime` sequences accept keyless items; the platform rejects
    /// the rest.
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn append_sequence_item<T: Serialize + Sync>(
        &self,
        device_id: &str,
        name: &str,
        value: &T,
    ) -> Result<()> {
        let builder = self
            .request(Method::POST, &sequence_path(device_id, name, &["items"]))?
            .json(&ValueBody { value });
        self.execute(builder).await
    }

    /// Store several items at once, keyed by item id
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn put_sequence_items(
        &self,
        device_id: &str,
        name: &str,
        values: &Map<String, Value>,
    ) -> Result<()> {
        let builder = self
            .request(Method::PUT, &sequence_path(device_id, name, &["items"]))?
            .json(&ValuesBody { values });
        self.execute(builder).await
    }

    /// Update several items, optionally only those still equal to `when_values`
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn patch_sequence_items(
        &self,
        device_id: &str,
        name: &str,
        values: &Map<String, Value>,
        when_values: Option<&Map<String, Value>>,
    ) -> Result<()> {
        let builder = self
            .request(Method::PATCH, &sequence_path(device_id, name, &["items"]))?
            .json(&ItemsPatch { values, when_values });
        self.execute(builder).await
    }

    /// Delete the items under `keys`, optionally only those still equal to
    /// `when_values`
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn delete_sequence_items(
        &self,
        device_id: &str,
        name: &str,
        keys: &[&str],
        when_values: Option<&Map<String, Value>>,
    ) -> Result<()> {
        let builder = self
            .request(Method::DELETE, &sequence_path(device_id, name, &["items"]))?
            .json(&ItemsDelete { keys, when_values });
        self.execute(builder).await
    }

    /// Delete an item, optionally only while it still equals `when_value`
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn delete_sequence_item(
        &self,
        device_id: &str,
        name: &str,
        item_id: &str,
        when_value: Option<&Value>,
    ) -> Result<()> {
        let builder = self
            .request(Method::DELETE, &sequence_path(device_id, name, &["items", item_id]))?
            .json(&ConditionalDelete { when_value });
        self.execute(builder).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::client::tests::{ok, range_query, test_client};

    #[tokio::test]
    async fn sequence_metadata() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v0/devices/d1/sequences"))
            .respond_with(ok(json!({
                "temp": {"name": "temp", "type": "datetime"},
                "count": {"name": "count", "type": "integer"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v0/devices/d1/sequences/temp"))
            .respond_with(ok(json!({"name": "temp", "type": "datetime", "service_id": "svc-1"})))
            .mount(&server)
            .await;

        let client = test_client(&server);

        let sequences = client.sequences("d1").await.unwrap();
        assert_eq!(sequences["count"].kind, SequenceType::Integer);

        let sequence = client.sequence("d1", "temp").await.unwrap();
        assert_eq!(sequence.kind, SequenceType::Datetime);
    }

    #[tokio::test]
    async fn create_and_delete_sequence() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/v0/devices/d1/sequences/temp"))
            .and(query_param("type", "real"))
            .and(query_param("creation_mode", "overwrite_if_exists"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v0/devices/d1/sequences/temp"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client
            .create_sequence("d1", "temp", SequenceType::Real, CreationMode::default())
            .await
            .unwrap();
        client.delete_sequence("d1", "temp").await.unwrap();
    }

    #[tokio::test]
    async fn item_reads() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v0/devices/d1/sequences/temp/items"))
            .respond_with(ok(json!({"2017-01-01T00:00:00Z": 21.5, "2017-01-01T01:00:00Z": 22.0})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v0/devices/d1/sequences/temp/items/42"))
            .respond_with(ok(json!(21.5)))
            .mount(&server)
            .await;

        let client = test_client(&server);

        let items = client.sequence_items("d1", "temp").await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items.keys().next().map(String::as_str), Some("2017-01-01T00:00:00Z"));

        let item = client.sequence_item("d1", "temp", "42").await.unwrap();
        assert_eq!(item, json!(21.5));
    }

    #[tokio::test]
    async fn item_writes() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/v0/devices/d1/sequences/count/items/7"))
            .and(body_json(json!({"value": 3})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v0/devices/d1/sequences/temp/items"))
            .and(body_json(json!({"value": 19.0})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.put_sequence_item("d1", "count", "7", &3).await.unwrap();
        client.append_sequence_item("d1", "temp", &19.0).await.unwrap();
    }

    #[tokio::test]
    async fn conditional_item_delete() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v0/devices/d1/sequences/count/items/7"))
            .and(body_json(json!({"when_value": 3})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v0/devices/d1/sequences/count/items/8"))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client
            .delete_sequence_item("d1", "count", "7", Some(&json!(3)))
            .await
            .unwrap();
        client.delete_sequence_item("d1", "count", "8", None).await.unwrap();
    }

    #[tokio::test]
    async fn ranged_item_read() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v0/devices/d1/sequences/temp/items"))
            .and(range_query(json!({
                "from": "2017-01-01T00:00:00+03:00",
                "to": "2017-01-02T00:00:00+03:00",
                "keys": ["2017-01-01T10:00:00+03:00"]
            })))
            .respond_with(ok(json!({"2017-01-01T10:00:00+03:00": 21.5})))
            .expect(1)
            .mount(&server)
            .await;

        let range = ItemRange::between("2017-01-01T00:00:00+03:00", "2017-01-02T00:00:00+03:00")
            .with_keys(["2017-01-01T10:00:00+03:00"]);
        let items = test_client(&server)
            .sequence_item_range("d1", "temp", &range)
            .await
            .unwrap();
        assert_eq!(items["2017-01-01T10:00:00+03:00"], json!(21.5));
    }

    #[tokio::test]
    async fn bulk_item_writes() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/v0/devices/d1/sequences/count/items"))
            .and(body_json(json!({"values": {"1": 10, "2": 20}})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/v0/devices/d1/sequences/count/items"))
            .and(body_json(json!({"values": {"1": 11}, "when_values": {"1": 10}})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/v0/devices/d1/sequences/count/items"))
            .and(body_json(json!({"values": {"2": 21}})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let object = |value: Value| value.as_object().cloned().unwrap();
        let client = test_client(&server);

        client
            .put_sequence_items("d1", "count", &object(json!({"1": 10, "2": 20})))
            .await
            .unwrap();
        client
            .patch_sequence_items(
                "d1",
                "count",
                &object(json!({"1": 11})),
                Some(&object(json!({"1": 10}))),
            )
            .await
            .unwrap();
        client
            .patch_sequence_items("d1", "count", &object(json!({"2": 21})), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn bulk_item_delete() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v0/devices/d1/sequences/count/items"))
            .and(body_json(json!({"keys": ["1", "2"]})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v0/devices/d1/sequences/count/items"))
            .and(body_json(json!({"keys": ["3"], "when_values": {"3": 30}})))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": "error",
                "code": 1001,
                "data": {"3": "value changed"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.delete_sequence_items("d1", "count", &["1", "2"], None).await.unwrap();

        let when = json!({"3": 30}).as_object().cloned().unwrap();
        let err = client
            .delete_sequence_items("d1", "count", &["3"], Some(&when))
            .await
            .unwrap_err();
        assert!(err.is(cps_errors::Variant::ResourceNotFound));
        assert_eq!(err.cps().unwrap().message(), "value changed");
    }
}
