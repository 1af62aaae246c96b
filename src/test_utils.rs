//! src/test_utils.rs
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A throwaway directory under the system temp dir, removed on drop.
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("order-stats-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&path).expect("Failed to create scratch directory");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path.join(name);
        std::fs::write(&path, contents).expect("Failed to write scratch file");
        path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// One JSON array holding an order per status.
pub fn orders_with_statuses(statuses: &[&str]) -> String {
    let orders: Vec<String> = statuses
        .iter()
        .enumerate()
        .map(|(i, status)| format!(r#"{{"id": "ord-{i}", "status": "{status}"}}"#))
        .collect();
    format!("[{}]", orders.join(","))
}
