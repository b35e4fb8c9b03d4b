//! A view-model style consumer: each test configures only the collaborator
//! it exercises and leaves the rest to strict substitutes.

use autoconstruct::logging::init_test_logging;
use autoconstruct::*;
use std::sync::{Arc, Mutex};

#[mockable]
pub trait DataService {
    fn data(&self) -> Vec<String>;
}

#[mockable]
pub trait MessageBoxService {
    fn show(&self, text: &str, caption: &str) -> bool;
}

pub struct MainViewModel {
    service: Arc<dyn DataService>,
    message_box: Arc<dyn MessageBoxService>,
}

#[auto_construct]
impl MainViewModel {
    pub fn new(
        service: Arc<dyn DataService>,
        message_box: Arc<dyn MessageBoxService>,
    ) -> Self {
        Self {
            service,
            message_box,
        }
    }

    pub fn data(&self) -> Vec<String> {
        self.service.data()
    }

    pub fn click_me(&self) -> bool {
        self.message_box.show("Hello!", "Test")
    }
}

struct CannedData(Vec<&'static str>);

impl DataService for CannedData {
    fn data(&self) -> Vec<String> {
        self.0.iter().map(|s| s.to_string()).collect()
    }
}

#[derive(Default)]
struct RecordingMessageBox {
    shown: Mutex<Vec<(String, String)>>,
}

impl MessageBoxService for RecordingMessageBox {
    fn show(&self, text: &str, caption: &str) -> bool {
        self.shown
            .lock()
            .unwrap()
            .push((text.to_string(), caption.to_string()));
        true
    }
}

#[test]
fn test_data_is_fetched_from_service() {
    init_test_logging();

    let mut context = ConstructorContext::<MainViewModel>::new().unwrap();
    context
        .inject(Arc::new(CannedData(vec!["a", "b", "c"])) as Arc<dyn DataService>)
        .unwrap();

    let view_model = context.build().unwrap();

    assert_eq!(view_model.data(), ["a", "b", "c"]);
}

#[test]
fn test_click_me_requests_message_box() {
    init_test_logging();

    let mut context = ConstructorContext::<MainViewModel>::new().unwrap();
    let recorder = Arc::new(RecordingMessageBox::default());
    context
        .inject(recorder.clone() as Arc<dyn MessageBoxService>)
        .unwrap();

    let view_model = context.build().unwrap();

    assert!(view_model.click_me());
    let shown = recorder.shown.lock().unwrap();
    assert_eq!(
        shown.as_slice(),
        [("Hello!".to_string(), "Test".to_string())]
    );
}

#[test]
#[should_panic(expected = "MessageBoxService::show is an unconfigured member")]
fn test_untouched_collaborator_fails_loudly() {
    let mut context = ConstructorContext::<MainViewModel>::new().unwrap();
    context
        .inject(Arc::new(CannedData(vec![])) as Arc<dyn DataService>)
        .unwrap();

    let view_model = context.build().unwrap();
    view_model.click_me();
}
