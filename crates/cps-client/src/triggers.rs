use std::collections::HashMap;

use reqwest::Method;
use serde::Serialize;

use crate::client::CpsClient;
use crate::error::Result;
use crate::types::{Trigger, TriggerContainer};

/// Resource a trigger hangs off: a device's sequence or command queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerParent<'a> {
    pub device_id: &'a str,
    pub container: TriggerContainer,
    pub name: &'a str,
}

impl<'a> TriggerParent<'a> {
    pub const fn sequence(device_id: &'a str, name: &'a str) -> Self {
        Self {
            device_id,
            container: TriggerContainer::Sequences,
            name,
        }
    }

    pub const fn command_queue(device_id: &'a str, name: &'a str) -> Self {
        Self {
            device_id,
            container: TriggerContainer::CommandQueues,
            name,
        }
    }

    fn segments(&self, rest: &[&'a str]) -> Vec<&'a str> {
        let container: &'static str = self.container.into();

        let mut segments = vec!["v0", "devices", self.device_id, container, self.name, "triggers"];
        segments.extend_from_slice(rest);
        segments
    }
}

#[derive(Debug, Serialize)]
struct EnabledBody {
    enabled: bool,
}

impl CpsClient {
    /// Triggers attached to `parent`, keyed by name
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn triggers(&self, parent: TriggerParent<'_>) -> Result<HashMap<String, Trigger>> {
        let builder = self.request(Method::GET, &parent.segments(&[]))?;
        self.fetch(builder).await
    }

    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn trigger(&self, parent: TriggerParent<'_>, name: &str) -> Result<Trigger> {
        let builder = self.request(Method::GET, &parent.segments(&[name]))?;
        self.fetch(builder).await
    }

    /// Switch a trigger on or off
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn set_trigger_enabled(&self, parent: TriggerParent<'_>, name: &str, enabled: bool) -> Result<()> {
        let builder = self
            .request(Method::PATCH, &parent.segments(&[name]))?
            .json(&EnabledBody { enabled });
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

    #[tokio::test]
    async fn sequence_triggers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v0/devices/d1/sequences/temp/triggers"))
            .respond_with(ok(json!({
                "overheat": {
                    "name": "overheat",
                    "enabled": true,
                    "parameter_values": {"threshold": 80},
                    "trigger": {"name": "threshold", "service_id": "svc-1"}
                }
            })))
            .mount(&server)
            .await;

        let triggers = test_client(&server)
            .triggers(TriggerParent::sequence("d1", "temp"))
            .await
            .unwrap();

        let overheat = &triggers["overheat"];
        assert!(overheat.enabled);
        assert_eq!(overheat.parameter_values["threshold"], json!(80));
        assert_eq!(overheat.trigger.as_ref().unwrap().name, "threshold");
    }

    #[tokio::test]
    async fn command_queue_trigger_toggle() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v0/devices/d1/command-queues/main/triggers/notify"))
            .respond_with(ok(json!({"name": "notify", "enabled": false})))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/v0/devices/d1/command-queues/main/triggers/notify"))
            .and(body_json(json!({"enabled": true})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let parent = TriggerParent::command_queue("d1", "main");

        let trigger = client.trigger(parent, "notify").await.unwrap();
        assert!(!trigger.enabled);

        client.set_trigger_enabled(parent, "notify", true).await.unwrap();
    }

    #[tokio::test]
    async fn toggling_foreign_trigger_is_forbidden() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/v0/devices/d1/sequences/temp/triggers/other"))
            .respond_with(ResponseTemplate::new(403).set_body_string("not yours"))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .set_trigger_enabled(TriggerParent::sequence("d1", "temp"), "other", false)
            .await
            .unwrap_err();
        assert!(err.is(Variant::Forbidden));
        assert_eq!(err.cps().unwrap().http_status(), 403);
    }
}
