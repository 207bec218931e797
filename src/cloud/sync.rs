use super::{CloudError, CloudTransport};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::thread;

/// A finished cloud operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloudEvent {
    /// The user's save, or None if they have never uploaded one
    Fetched(Option<String>),
    Uploaded,
    Failed(String),
}

/// Runs cloud requests on background threads and hands back the results.
///
/// Each request gets its own thread and channel. Call `poll` once per frame. There
/// is no retry: a failed request reports `Failed` and is forgotten.
pub struct CloudSyncManager {
    transport: Arc<dyn CloudTransport>,
    pending: Vec<Receiver<CloudEvent>>,
}

impl CloudSyncManager {
    pub fn new(transport: impl CloudTransport + 'static) -> Self {
        CloudSyncManager {
            transport: Arc::new(transport),
            pending: Vec::new(),
        }
    }

    /// Starts downloading the save for `username`
    pub fn fetch_cloud_save(&mut self, username: &str) {
        self.spawn(username, |transport, username| {
            transport.fetch(&username).map(CloudEvent::Fetched)
        });
    }

    /// Starts uploading `json` as the save for `username`
    pub fn upload_save(&mut self, username: &str, json: String) {
        self.spawn(username, move |transport, username| {
            transport.upload(&username, &json).map(|_| CloudEvent::Uploaded)
        });
    }

    fn spawn<F>(&mut self, username: &str, request: F)
    where
        F: FnOnce(&dyn CloudTransport, String) -> Result<CloudEvent, CloudError> + Send + 'static,
    {
        let (sender, receiver) = channel();
        self.pending.push(receiver);

        let username = username.trim().to_string();
        if username.is_empty() {
            let _ = sender.send(CloudEvent::Failed(CloudError::EmptyUsername.to_string()));
            return;
        }

        let transport = Arc::clone(&self.transport);
        thread::spawn(move || {
            let event = match request(transport.as_ref(), username) {
                Ok(event) => event,
                Err(e) => CloudEvent::Failed(e.to_string()),
            };
            let _ = sender.send(event);
        });
    }

    /// Collects every operation that finished since the last poll
    pub fn poll(&mut self) -> Vec<CloudEvent> {
        let mut events = Vec::new();

        self.pending.retain(|receiver| match receiver.try_recv() {
            Ok(event) => {
                events.push(event);
                false
            }
            Err(TryRecvError::Empty) => true,
            Err(TryRecvError::Disconnected) => {
                events.push(CloudEvent::Failed("cloud operation stopped unexpectedly".to_string()));
                false
            }
        });

        for event in &events {
            match event {
                CloudEvent::Failed(reason) => log::warn!("Cloud sync failed: {}", reason),
                other => log::info!("Cloud sync finished: {:?}", summary(other)),
            }
        }

        events
    }

    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Polls until every pending operation has finished
    pub fn wait(&mut self) -> Vec<CloudEvent> {
        let mut events = Vec::new();
        while self.is_busy() {
            events.extend(self.poll());
            if self.is_busy() {
                thread::sleep(std::time::Duration::from_millis(10));
            }
        }
        events
    }
}

fn summary(event: &CloudEvent) -> &'static str {
    match event {
        CloudEvent::Fetched(Some(_)) => "fetched save",
        CloudEvent::Fetched(None) => "no cloud save",
        CloudEvent::Uploaded => "uploaded",
        CloudEvent::Failed(_) => "failed",
    }
}
