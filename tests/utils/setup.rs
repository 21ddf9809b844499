use std::sync::Arc;
use std::time::Duration;

use roomchat::{
    assistant::{Assistant, AssistantService},
    room::BroadcastCoordinator,
    websockets::{ConnectionManager, WebsocketReceiveHandler},
};

use super::mocks::MockConnectionManager;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub coordinator: Arc<BroadcastCoordinator>,
    pub mock_conn_manager: Arc<MockConnectionManager>,
    pub input_handler: WebsocketReceiveHandler,
}

pub struct TestSetupBuilder {
    history_capacity: usize,
    assistant: Option<Arc<dyn Assistant>>,
    assistant_timeout: Duration,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            history_capacity: 0,
            assistant: None,
            assistant_timeout: Duration::from_secs(1),
        }
    }

    #[allow(dead_code)]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    #[allow(dead_code)]
    pub fn with_assistant(mut self, assistant: Arc<dyn Assistant>, timeout: Duration) -> Self {
        self.assistant = Some(assistant);
        self.assistant_timeout = timeout;
        self
    }

    pub fn build(self) -> TestSetup {
        let mock_conn_manager = Arc::new(MockConnectionManager::new());
        let connection_manager: Arc<dyn ConnectionManager> = mock_conn_manager.clone();
        let assistant = Arc::new(AssistantService::new(
            self.assistant,
            self.assistant_timeout,
        ));

        let coordinator = Arc::new(BroadcastCoordinator::new(
            self.history_capacity,
            connection_manager,
            assistant,
        ));
        let input_handler = WebsocketReceiveHandler::new(coordinator.clone());

        TestSetup {
            coordinator,
            mock_conn_manager,
            input_handler,
        }
    }
}
