#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use sidechat::api::{ChatApiConfig, ConversationMessage, HttpChatApi};
use sidechat::sidebar::{SessionListController, UserNotifier};
use tempfile::TempDir;

pub type Selections = Arc<Mutex<Vec<(i64, Vec<ConversationMessage>)>>>;

#[derive(Default)]
pub struct Notes {
    pub prompts: Mutex<Vec<String>>,
    pub alerts: Mutex<Vec<String>>,
    pub saved: Mutex<Vec<PathBuf>>,
}

impl UserNotifier for Notes {
    fn prompt(&self, message: &str) {
        self.prompts.lock().unwrap().push(message.to_string());
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn saved(&self, path: &Path) {
        self.saved.lock().unwrap().push(path.to_path_buf());
    }
}

pub struct Sidebar {
    pub controller: Arc<SessionListController>,
    pub selections: Selections,
    pub notes: Arc<Notes>,
    pub download_dir: TempDir,
}

pub fn http_api(base_url: &str) -> HttpChatApi {
    HttpChatApi::new(ChatApiConfig {
        base_url: base_url.to_string(),
        token: None,
        timeout_secs: 5,
    })
    .expect("failed to build chat api client")
}

pub fn sidebar(base_url: &str, user_id: Option<i64>) -> Sidebar {
    let selections: Selections = Arc::new(Mutex::new(Vec::new()));
    let recorded = selections.clone();
    let notes = Arc::new(Notes::default());
    let download_dir = TempDir::new().expect("failed to create tempdir");

    let controller = SessionListController::new(
        Arc::new(http_api(base_url)),
        user_id,
        Arc::new(move |id: i64, messages: Vec<ConversationMessage>| {
            recorded.lock().unwrap().push((id, messages));
        }),
        notes.clone(),
        download_dir.path().to_path_buf(),
    );

    Sidebar {
        controller: Arc::new(controller),
        selections,
        notes,
        download_dir,
    }
}
