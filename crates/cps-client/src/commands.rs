use std::collections::HashMap;

use reqwest::Method;
use serde::Serialize;

use crate::client::CpsClient;
use crate::error::Result;
use crate::types::{Command, CommandQueue, CommandRange, CreationMode, NewCommand};

fn queue_path<'a>(device_id: &'a str, queue: &'a str, rest: &[&'a str]) -> Vec<&'a str> {
    let mut segments = vec!["v0", "devices", device_id, "command-queues", queue];
    segments.extend_from_slice(rest);
    segments
}

impl CpsClient {
    /// Command queues of a device, keyed by name
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn command_queues(&self, device_id: &str) -> Result<HashMap<String, CommandQueue>> {
        let builder = self.request(Method::GET, &["v0", "devices", device_id, "command-queues"])?;
        self.fetch(builder).await
    }

    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn command_queue(&self, device_id: &str, queue: &str) -> Result<CommandQueue> {
        let builder = self.request(Method::GET, &queue_path(device_id, queue, &[]))?;
        self.fetch(builder).await
    }

    /// # Errors
    ///
    /// Returns the classified platform error, e.g. `ObjectAlreadyExists`
    /// under [`CreationMode::ErrorIfExists`]
    pub async fn create_command_queue(
        &self,
        device_id: &str,
        queue: &str,
        mode: CreationMode,
    ) -> Result<CommandQueue> {
        let builder = self
            .request(Method::PUT, &queue_path(device_id, queue, &[]))?
            .query(&[("creation_mode", mode.as_ref())]);
        self.fetch(builder).await
    }

    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn delete_command_queue(&self, device_id: &str, queue: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, &queue_path(device_id, queue, &[]))?;
        self.execute(builder).await
    }

    /// Every command in the queue regardless of state
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn commands(&self, device_id: &str, queue: &str) -> Result<Vec<Command>> {
        let builder = self.request(Method::GET, &queue_path(device_id, queue, &["commands"]))?;
        self.fetch(builder).await
    }

    /// Commands whose ids fall inside `range`
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn command_range(
        &self,
        device_id: &str,
        queue: &str,
        range: &CommandRange,
    ) -> Result<Vec<Command>> {
        let builder =
            self.ranged_request(&queue_path(device_id, queue, &["commands"]), &range.bounds())?;
        self.fetch(builder).await
    }

    /// Commands still waiting to be acquired
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn queued_commands(&self, device_id: &str, queue: &str) -> Result<Vec<Command>> {
        let builder = self.request(
            Method::GET,
            &queue_path(device_id, queue, &["commands", "next"]),
        )?;
        self.fetch(builder).await
    }

    /// Oldest command still waiting to be acquired
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn nearest_command(&self, device_id: &str, queue: &str) -> Result<Command> {
        let builder = self.request(
            Method::GET,
            &queue_path(device_id, queue, &["commands", "next", "nearest"]),
        )?;
        self.fetch(builder).await
    }

    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn command(&self, device_id: &str, queue: &str, command_id: &str) -> Result<Command> {
        let builder = self.request(
            Method::GET,
            &queue_path(device_id, queue, &["commands", command_id]),
        )?;
        self.fetch(builder).await
    }

    /// Enqueue a command with an optional payload
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn add_command<T: Serialize + Sync>(
        &self,
        device_id: &str,
        queue: &str,
        command: &str,
        payload: Option<&T>,
    ) -> Result<Command> {
        let builder = self
            .request(Method::POST, &queue_path(device_id, queue, &["commands"]))?
            .json(&NewCommand { command, payload });
        self.fetch(builder).await
    }

    /// Mark a command as taken for execution
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn acquire_command(&self, device_id: &str, queue: &str, command_id: &str) -> Result<()> {
        let builder = self.request(
            Method::POST,
            &queue_path(device_id, queue, &["commands", command_id, "acquire"]),
        )?;
        self.execute(builder).await
    }

    /// Mark a command as executed and record its result
    ///
    /// # Errors
    ///
    /// Returns the classified platform error on failure
    pub async fn complete_command<T: Serialize + Sync>(
        &self,
        device_id: &str,
        queue: &str,
        command_id: &str,
        result: &T,
    ) -> Result<()> {
        let builder = self
            .request(
                Method::POST,
                &queue_path(device_id, queue, &["commands", command_id, "execute"]),
            )?
            .json(result);
        self.execute(builder).await
    }
}
