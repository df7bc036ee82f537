//! Recording `ObjectStore` and `CdnInvalidator` doubles for tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CdnInvalidator, ObjectMetadata, ObjectStore, PublishError};

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub body: Vec<u8>,
    pub metadata: ObjectMetadata,
}

#[derive(Default)]
pub struct RecordingObjectStore {
    objects: Mutex<Vec<StoredObject>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingObjectStore {
    pub fn fail_key(&self, key: &str) {
        self.failing.lock().unwrap().insert(key.to_string());
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .map(|o| o.key.clone())
            .collect()
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|o| o.key == key)
            .cloned()
    }
}

#[async_trait]
impl ObjectStore for RecordingObjectStore {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        metadata: ObjectMetadata,
    ) -> Result<(), PublishError> {
        if self.failing.lock().unwrap().contains(key) {
            return Err(PublishError::ObjectStore {
                key: key.to_string(),
                message: "simulated outage".to_string(),
            });
        }
        self.objects.lock().unwrap().push(StoredObject {
            key: key.to_string(),
            body,
            metadata,
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingInvalidator {
    calls: Mutex<Vec<Vec<String>>>,
    fail: bool,
}

impl RecordingInvalidator {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CdnInvalidator for RecordingInvalidator {
    async fn invalidate(&self, paths: &[String]) -> Result<(), PublishError> {
        if self.fail {
            return Err(PublishError::Invalidation("simulated outage".to_string()));
        }
        self.calls.lock().unwrap().push(paths.to_vec());
        Ok(())
    }
}
