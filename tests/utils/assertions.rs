//! Test assertion helpers - fluent API for verifying test expectations
#![allow(dead_code)] // Test utilities may not all be used in every test

use roomchat::websockets::{MessageType, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct MessageAssertion<'a> {
    setup: &'a TestSetup,
    identities: Vec<&'a str>,
}

impl<'a> MessageAssertion<'a> {
    pub fn for_identity(setup: &'a TestSetup, identity: &'a str) -> Self {
        Self {
            setup,
            identities: vec![identity],
        }
    }

    pub fn for_identities(setup: &'a TestSetup, identities: Vec<&'a str>) -> Self {
        Self { setup, identities }
    }

    /// Assert that every identity received a message of this type next
    /// (consumes it) and that all of them saw the same payload
    pub async fn received_message_type(self, expected_type: MessageType) -> MessageContent {
        let mut messages = vec![];

        for identity in &self.identities {
            let message = self
                .setup
                .mock_conn_manager
                .consume_message_for(identity)
                .await
                .unwrap_or_else(|| panic!("{} should have received a message", identity));

            let msg: WebSocketMessage = serde_json::from_str(&message).unwrap();
            assert_eq!(
                msg.message_type, expected_type,
                "{} received wrong message type",
                identity
            );
            messages.push(msg);
        }

        let first_payload = &messages[0].payload;
        for (i, msg) in messages.iter().enumerate().skip(1) {
            assert_eq!(
                &msg.payload, first_payload,
                "{} payload differs from {}",
                self.identities[i], self.identities[0]
            );
        }

        MessageContent {
            payload: messages[0].payload.clone(),
        }
    }

    /// Assert that identities have no unread messages
    pub async fn received_no_messages(self) {
        for identity in &self.identities {
            let messages = self.setup.mock_conn_manager.get_messages_for(identity).await;
            assert!(
                messages.is_empty(),
                "{} should not have received any messages, got {:?}",
                identity,
                messages
            );
        }
    }

    /// Assert that identities received these message types next, in order
    /// (consumes them). Returns the first identity's payloads.
    pub async fn received_message_sequence(
        self,
        expected_types: Vec<MessageType>,
    ) -> Vec<MessageContent> {
        let mut result_messages = vec![];

        for identity in &self.identities {
            for (i, expected_type) in expected_types.iter().enumerate() {
                let frame = self
                    .setup
                    .mock_conn_manager
                    .consume_message_for(identity)
                    .await
                    .unwrap_or_else(|| {
                        panic!("{} is missing message {} ({:?})", identity, i, expected_type)
                    });
                let msg: WebSocketMessage = serde_json::from_str(&frame).unwrap_or_else(|e| {
                    panic!("Failed to parse message {} for {}: {}", i, identity, e)
                });

                assert_eq!(
                    msg.message_type, *expected_type,
                    "{} message {} has wrong type: expected {:?}, got {:?}",
                    identity, i, expected_type, msg.message_type
                );

                if identity == &self.identities[0] {
                    result_messages.push(MessageContent {
                        payload: msg.payload,
                    });
                }
            }
        }

        result_messages
    }
}

// ============================================================================
// Message Content Assertions
// ============================================================================

pub struct MessageContent {
    payload: serde_json::Value,
}

impl MessageContent {
    pub fn with_msg(self, expected: &str) -> Self {
        assert_eq!(self.payload["msg"], expected);
        self
    }

    pub fn with_username(self, expected: &str) -> Self {
        assert_eq!(self.payload["username"], expected);
        self
    }

    pub fn is_system(self, expected: bool) -> Self {
        assert_eq!(self.payload["system"], expected);
        self
    }

    pub fn msg(&self) -> String {
        self.payload["msg"].as_str().unwrap_or_default().to_string()
    }

    /// Assert an update_users payload lists exactly these identities
    pub fn with_users(self, expected: Vec<&str>) -> Self {
        let users: Vec<String> = serde_json::from_value(self.payload["users"].clone()).unwrap();
        assert_eq!(users, expected);
        self
    }

    /// Assert a chat_history payload replays events with these texts, in order
    pub fn with_history(self, expected: Vec<&str>) -> Self {
        let texts: Vec<String> = self.payload["history"]
            .as_array()
            .expect("history should be an array")
            .iter()
            .map(|event| event["msg"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(texts, expected);
        self
    }
}
